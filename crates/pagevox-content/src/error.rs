//! Error types for content access

use thiserror::Error;

/// Content access error types
///
/// The controller treats every variant the same way: log it and degrade
/// (no further content, or skip the position sync). Nothing here is fatal.
#[derive(Error, Debug)]
pub enum ContentError {
    /// Requested paragraph index is outside the book
    #[error("paragraph index {index} out of range (count {count})")]
    InvalidIndex { index: usize, count: usize },

    /// Connection to the content host was lost
    #[error("content host not available: {0}")]
    Disconnected(String),
}

/// Result type for content operations
pub type ContentResult<T> = Result<T, ContentError>;
