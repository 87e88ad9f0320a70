//! Fragment extraction options.

use std::ops::RangeInclusive;

/// Options for extracting a fragment feed from a PDF.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Which pages to extract text from (1-indexed)
    pub pages: PageSelection,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set a page range (1-indexed, inclusive).
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.pages = PageSelection::Range(range);
        self
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    #[default]
    Strict,
    /// Log and skip pages that cannot be read
    Lenient,
}

/// Page selection for extraction.
///
/// Unselected pages keep their height in the feed but contribute no fragments,
/// so page indices stay those of the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A contiguous range (1-indexed, inclusive)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Whether a 1-indexed page number is selected.
    pub fn includes(&self, page_num: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page_num),
            PageSelection::Pages(pages) => pages.contains(&page_num),
        }
    }

    /// First selected page beyond a document of `page_count` pages.
    ///
    /// A range only counts as out of bounds when it starts past the end.
    pub fn out_of_range(&self, page_count: u32) -> Option<u32> {
        match self {
            PageSelection::All => None,
            PageSelection::Range(range) => Some(*range.start()).filter(|&p| p > page_count),
            PageSelection::Pages(pages) => pages.iter().copied().find(|&p| p > page_count),
        }
    }

    /// Parse a selection such as `1-3`, `5` or `1,4,7`.
    pub fn parse(selection: &str) -> Option<Self> {
        let selection = selection.trim();
        if selection.is_empty() || selection.eq_ignore_ascii_case("all") {
            return Some(PageSelection::All);
        }
        if let Some((start, end)) = selection.split_once('-') {
            let start: u32 = start.trim().parse().ok()?;
            let end: u32 = end.trim().parse().ok()?;
            return (start >= 1 && start <= end).then(|| PageSelection::Range(start..=end));
        }
        let pages = selection
            .split(',')
            .map(|p| p.trim().parse::<u32>().ok().filter(|&n| n >= 1))
            .collect::<Option<Vec<_>>>()?;
        Some(PageSelection::Pages(pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new().lenient().with_page_range(2..=4);
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.pages.includes(3));
        assert!(!options.pages.includes(1));
    }

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.pages.includes(100));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(PageSelection::All.out_of_range(0), None);
        assert_eq!(PageSelection::Range(2..=9).out_of_range(3), None);
        assert_eq!(PageSelection::Range(4..=9).out_of_range(3), Some(4));
        assert_eq!(PageSelection::Pages(vec![1, 5, 7]).out_of_range(3), Some(5));
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all"), Some(PageSelection::All));
        assert_eq!(PageSelection::parse("1-3"), Some(PageSelection::Range(1..=3)));
        assert_eq!(
            PageSelection::parse("1, 4,7"),
            Some(PageSelection::Pages(vec![1, 4, 7]))
        );
        assert_eq!(PageSelection::parse("3-1"), None);
        assert_eq!(PageSelection::parse("0"), None);
        assert_eq!(PageSelection::parse("x"), None);
    }
}
