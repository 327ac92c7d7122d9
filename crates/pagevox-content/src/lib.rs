//! Book content abstraction layer for PageVox
//!
//! This crate provides the contract the playback controller uses to reach the
//! hosting reader: paragraph text lookup, reading-position get/set, and book
//! metadata. The host side of the contract may live in another process, so
//! every call can fail with a connectivity error.

pub mod error;
pub mod source;
pub mod text_file;
pub mod types;

pub use error::{ContentError, ContentResult};
pub use source::ContentSource;
pub use text_file::TextFileBook;
pub use types::TextPosition;
