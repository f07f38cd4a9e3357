use thiserror::Error;

/// Invalid filter configuration, reported when the filter is built
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid message pattern '{pattern}'. {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Invalid changed-line range: minimum {min} exceeds maximum {max}")]
    InvalidLineRange { min: usize, max: usize },
    #[error("Unknown change kind in '{0}', expected letters from 'ADM'")]
    UnknownChangeKind(String),
}
