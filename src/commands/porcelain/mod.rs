//! Porcelain commands
//!
//! - `log`: Filtered commit history

pub mod log;
