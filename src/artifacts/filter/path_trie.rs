use std::collections::HashMap;
use std::hash::Hash;

/// Prefix tree over path components
///
/// A path matches when it, or one of its ancestor directories, was inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trie<T: Hash + Eq + Clone> {
    is_matching: bool,
    children: HashMap<T, Trie<T>>,
}

impl<T: Hash + Eq + Clone> Default for Trie<T> {
    fn default() -> Self {
        Trie::new()
    }
}

impl<T: Hash + Eq + Clone> Trie<T> {
    pub fn new() -> Self {
        Trie {
            is_matching: false,
            children: HashMap::new(),
        }
    }

    pub fn insert(&mut self, path: &[T]) {
        let mut node = self;
        for part in path {
            node = node.children.entry(part.clone()).or_default();
        }
        node.is_matching = true;
    }

    pub fn is_empty(&self) -> bool {
        !self.is_matching && self.children.is_empty()
    }

    /// Whether `path` was inserted or lies below an inserted path
    pub fn covers<Q>(&self, path: &[Q]) -> bool
    where
        T: std::borrow::Borrow<Q>,
        Q: Hash + Eq,
    {
        let mut node = self;
        for part in path {
            if node.is_matching {
                return true;
            }
            match node.children.get(part) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.is_matching
    }
}

/// Trie of `/`-separated repository paths; empty components are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTrie {
    trie: Trie<String>,
}

impl PathTrie {
    pub fn new<P: AsRef<str>>(paths: impl IntoIterator<Item = P>) -> Self {
        let mut trie = Trie::new();
        for path in paths {
            trie.insert(&Self::components(path.as_ref()));
        }

        PathTrie { trie }
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn covers(&self, path: &str) -> bool {
        self.trie.covers(&Self::components(path))
    }

    fn components(path: &str) -> Vec<String> {
        path.split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .map(str::to_string)
            .collect()
    }
}
