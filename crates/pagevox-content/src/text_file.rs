//! Plain-text book backed by a local file
//!
//! One line per paragraph; blank lines become empty paragraphs, which the
//! playback controller skips the same way it skips section breaks and images
//! in a real book. Useful as the in-process host for the CLI binary and for
//! integration-style tests.

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{ContentError, ContentResult};
use crate::source::ContentSource;
use crate::types::TextPosition;

pub struct TextFileBook {
    paragraphs: Vec<String>,
    language: String,
    page_start: Mutex<TextPosition>,
}

impl TextFileBook {
    pub fn new(paragraphs: Vec<String>, language: impl Into<String>) -> Self {
        Self {
            paragraphs,
            language: language.into(),
            page_start: Mutex::new(TextPosition::paragraph_start(0)),
        }
    }

    /// Load a book from a UTF-8 text file, one paragraph per line.
    pub fn load(path: &Path, language: impl Into<String>) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let paragraphs: Vec<String> = contents
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect();
        debug!(
            target: "content",
            "Loaded {} paragraphs from {}",
            paragraphs.len(),
            path.display()
        );
        Ok(Self::new(paragraphs, language))
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

#[async_trait]
impl ContentSource for TextFileBook {
    async fn paragraph_text(&self, index: usize) -> ContentResult<String> {
        self.paragraphs
            .get(index)
            .cloned()
            .ok_or(ContentError::InvalidIndex {
                index,
                count: self.paragraphs.len(),
            })
    }

    async fn paragraphs_count(&self) -> ContentResult<usize> {
        Ok(self.paragraphs.len())
    }

    async fn page_start(&self) -> ContentResult<TextPosition> {
        Ok(*self.page_start.lock())
    }

    async fn set_page_start(&self, position: TextPosition) -> ContentResult<()> {
        if position.paragraph_index >= self.paragraphs.len() {
            return Err(ContentError::InvalidIndex {
                index: position.paragraph_index,
                count: self.paragraphs.len(),
            });
        }
        *self.page_start.lock() = position;
        Ok(())
    }

    async fn is_page_end_of_text(&self) -> ContentResult<bool> {
        let start = self.page_start.lock().paragraph_index;
        Ok(start + 1 >= self.paragraphs.len())
    }

    async fn book_language(&self) -> ContentResult<String> {
        Ok(self.language.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sample_book() -> TextFileBook {
        TextFileBook::new(
            vec![
                "First paragraph.".to_string(),
                String::new(),
                "Third paragraph.".to_string(),
            ],
            "en",
        )
    }

    #[tokio::test]
    async fn paragraph_lookup_and_bounds() {
        let book = sample_book();
        assert_eq!(book.paragraph_text(0).await.unwrap(), "First paragraph.");
        assert_eq!(book.paragraph_text(1).await.unwrap(), "");
        assert!(matches!(
            book.paragraph_text(3).await,
            Err(ContentError::InvalidIndex { index: 3, count: 3 })
        ));
    }

    #[tokio::test]
    async fn page_start_round_trip() {
        let book = sample_book();
        book.set_page_start(TextPosition::paragraph_start(2))
            .await
            .unwrap();
        assert_eq!(book.page_start().await.unwrap().paragraph_index, 2);
        assert!(book.is_page_end_of_text().await.unwrap());
    }

    #[tokio::test]
    async fn set_page_start_rejects_out_of_range() {
        let book = sample_book();
        let err = book
            .set_page_start(TextPosition::paragraph_start(9))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidIndex { index: 9, .. }));
    }

    #[tokio::test]
    async fn load_keeps_blank_lines_as_empty_paragraphs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "One.").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Three.").unwrap();

        let book = TextFileBook::load(file.path(), "en").unwrap();
        assert_eq!(book.len(), 3);
        assert_eq!(book.paragraph_text(1).await.unwrap(), "");
        assert_eq!(book.book_language().await.unwrap(), "en");
    }
}
