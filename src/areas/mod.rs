//! Core repository components
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `refs`: Reference management (branches, HEAD)
//! - `repository`: Ties the components together and owns the output writer

pub mod database;
pub mod refs;
pub mod repository;
