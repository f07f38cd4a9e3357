use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub trait Packable {
    /// Serialize the object body, without the `<type> <size>\0` header
    fn serialize_content(&self) -> Result<Bytes>;

    fn serialize(&self) -> Result<Bytes>
    where
        Self: Object,
    {
        let content = self.serialize_content()?;

        let mut object_bytes = Vec::with_capacity(content.len() + 32);
        write!(
            object_bytes,
            "{} {}\0",
            self.object_type().as_str(),
            content.len()
        )?;
        object_bytes.write_all(&content)?;

        Ok(Bytes::from(object_bytes))
    }
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn object_id(&self) -> Result<ObjectId>
    where
        Self: Sized,
    {
        let content = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        ObjectId::from_digest(&hasher.finalize())
    }

    fn object_path(&self) -> Result<PathBuf>
    where
        Self: Sized,
    {
        Ok(self.object_id()?.to_path())
    }
}

pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}
