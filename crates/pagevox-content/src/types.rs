//! Core types for content access

/// A reading position inside the book.
///
/// Mirrors the host reader's notion of where a page starts: the paragraph,
/// the element within the paragraph, and the character within the element.
/// The playback controller only ever sets whole-paragraph positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPosition {
    pub paragraph_index: usize,
    pub element_index: usize,
    pub char_index: usize,
}

impl TextPosition {
    /// Position at the start of the given paragraph.
    pub fn paragraph_start(paragraph_index: usize) -> Self {
        Self {
            paragraph_index,
            element_index: 0,
            char_index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TextPosition;

    #[test]
    fn paragraph_start_zeroes_inner_indices() {
        let pos = TextPosition::paragraph_start(7);
        assert_eq!(pos.paragraph_index, 7);
        assert_eq!(pos.element_index, 0);
        assert_eq!(pos.char_index, 0);
    }
}
