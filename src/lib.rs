//! # pdfoutline
//!
//! Document outline inference for PDF files.
//!
//! The library reads the positioned, styled text fragments of a PDF and
//! infers its title and a three-level heading hierarchy from typography and
//! layout alone. No embedded bookmarks are consulted.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{outline_file, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let doc = outline_file("report.pdf")?;
//!
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Feed**: PDF content streams become [`TextFragment`]s in reading order
//! - **Title**: the largest bold run near the top of the first page
//! - **Baseline**: the dominant body-text font and size
//! - **Scoring**: weighted typographic rules accept heading candidates
//! - **Levels**: the three largest candidate sizes become H1, H2 and H3

pub mod batch;
pub mod detect;
pub mod error;
pub mod feed;
pub mod model;
pub mod outline;
pub mod render;

// Re-export commonly used types
pub use batch::{run_batch, BatchOptions, BatchReport};
pub use detect::{detect_input_kind, detect_input_kind_from_bytes, is_pdf, InputKind};
pub use error::{Error, Result};
pub use feed::{ErrorMode, ExtractOptions, FragmentSource, PageSelection, PdfFeedReader};
pub use model::{
    BoundingBox, FragmentFeed, HeadingLevel, OutlineDocument, OutlineEntry, StyleFlags,
    TextFragment,
};
pub use outline::{extract_outline, OutlineConfig};
pub use render::JsonFormat;

use std::path::Path;

/// Infer the outline of a PDF or JSON feed file with default settings.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::outline_file;
///
/// let doc = outline_file("report.pdf").unwrap();
/// for entry in &doc.outline {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<OutlineDocument> {
    Outliner::new().outline_file(path)
}

/// Infer the outline of a PDF held in memory.
pub fn outline_bytes(data: &[u8]) -> Result<OutlineDocument> {
    Outliner::new().outline_bytes(data)
}

/// Infer the outline of a file and render it as JSON.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{to_json, JsonFormat};
///
/// let json = to_json("report.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("report.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = outline_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for outline inference.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{OutlineConfig, Outliner};
///
/// let doc = Outliner::new()
///     .with_config(OutlineConfig::default().with_accept_score(4.0))
///     .lenient()
///     .outline_file("report.pdf")?;
/// # Ok::<(), pdfoutline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Outliner {
    config: OutlineConfig,
    extract_options: ExtractOptions,
}

impl Outliner {
    /// Create a new builder with default heuristics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the heuristic configuration.
    pub fn with_config(mut self, config: OutlineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Skip unreadable pages instead of failing.
    pub fn lenient(mut self) -> Self {
        self.extract_options = self.extract_options.lenient();
        self
    }

    /// Restrict extraction to some pages.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.extract_options = self.extract_options.with_pages(pages);
        self
    }

    /// The heuristic configuration in use.
    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Validate a feed and infer its outline.
    pub fn extract(&self, feed: &FragmentFeed) -> Result<OutlineDocument> {
        feed.validate()?;
        Ok(extract_outline(feed, &self.config))
    }

    /// Read the fragment feed of a PDF or JSON feed file.
    pub fn read_feed<P: AsRef<Path>>(&self, path: P) -> Result<FragmentFeed> {
        feed::read_feed(path, &self.extract_options)
    }

    /// Infer the outline of a PDF or JSON feed file.
    pub fn outline_file<P: AsRef<Path>>(&self, path: P) -> Result<OutlineDocument> {
        let feed = self.read_feed(path)?;
        self.extract(&feed)
    }

    /// Infer the outline of a PDF held in memory.
    pub fn outline_bytes(&self, data: &[u8]) -> Result<OutlineDocument> {
        let reader = PdfFeedReader::from_bytes_with_options(data, self.extract_options.clone())?;
        self.extract(&reader.read_feed()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, size: f32, y0: f32) -> TextFragment {
        TextFragment::new(
            text,
            size,
            "Arial",
            0,
            BoundingBox::new(50.0, y0, 300.0, y0 + size),
        )
    }

    #[test]
    fn test_outliner_rejects_malformed_feed() {
        let mut feed = FragmentFeed::new();
        feed.push(frag("Fine", 12.0, 10.0));
        feed.push(frag("Broken", f32::NAN, 30.0));

        assert!(matches!(
            Outliner::new().extract(&feed),
            Err(Error::MalformedFragment { index: 1, .. })
        ));
    }

    #[test]
    fn test_outliner_extracts_valid_feed() {
        let mut feed = FragmentFeed::new();
        feed.add_page(792.0);
        feed.push(frag("Field Guide to Alpine Flowers", 22.0, 40.0).bold());

        let doc = Outliner::new().extract(&feed).unwrap();
        assert_eq!(doc.title, "Field Guide to Alpine Flowers");
        assert!(doc.outline.is_empty());
    }

    #[test]
    fn test_outliner_custom_fallback_title() {
        let mut config = OutlineConfig::default();
        config.title.fallback = "(no title)".to_string();
        let doc = Outliner::new()
            .with_config(config)
            .extract(&FragmentFeed::new())
            .unwrap();
        assert_eq!(doc.title, "(no title)");
    }

    #[test]
    fn test_outline_bytes_rejects_garbage() {
        assert!(matches!(
            outline_bytes(b"not a pdf"),
            Err(Error::UnknownFormat)
        ));
    }
}
