//! Content source abstraction

use crate::error::ContentResult;
use crate::types::TextPosition;
use async_trait::async_trait;

/// Book content interface consumed by the playback controller
///
/// Implementations provide paragraph text, the paragraph count, and the
/// current page position of the hosting reader. The host may sit across a
/// process boundary, so any call may fail; callers are expected to catch and
/// degrade rather than propagate.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Text of the paragraph at `index`. Structural paragraphs (section
    /// breaks, images) yield an empty string.
    async fn paragraph_text(&self, index: usize) -> ContentResult<String>;

    /// Total number of paragraphs in the book.
    async fn paragraphs_count(&self) -> ContentResult<usize>;

    /// Position at which the currently displayed page starts.
    async fn page_start(&self) -> ContentResult<TextPosition>;

    /// Move the displayed page so it starts at `position`.
    async fn set_page_start(&self, position: TextPosition) -> ContentResult<()>;

    /// Whether the displayed page already reaches the end of the text.
    async fn is_page_end_of_text(&self) -> ContentResult<bool>;

    /// Language code of the book (e.g. "en", "fr-FR"). May be empty when
    /// the book carries no language metadata.
    async fn book_language(&self) -> ContentResult<String>;
}
