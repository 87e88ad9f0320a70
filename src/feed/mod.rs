//! Fragment feeds: where the outline engine's input comes from.
//!
//! A feed is either extracted from a PDF ([`PdfFeedReader`]) or loaded from
//! a JSON capture of an earlier extraction ([`JsonFeedFile`]). Both sit
//! behind [`FragmentSource`], and [`open_source`] picks one by sniffing
//! the file's leading bytes.

mod content;
mod layout;
mod options;
mod pdf;

pub use content::{decode_text_simple, strip_subset_prefix, ContentWalker, RawSpan};
pub use layout::{group_into_blocks, group_into_lines, layout_page, TextLine};
pub use options::{ErrorMode, ExtractOptions, PageSelection};
pub use pdf::PdfFeedReader;

use std::path::{Path, PathBuf};

use crate::detect::{detect_input_kind, InputKind};
use crate::error::Result;
use crate::model::FragmentFeed;

/// Anything that can produce a document's fragment feed.
pub trait FragmentSource {
    /// Produce the feed, in reading order.
    fn read_feed(&self) -> Result<FragmentFeed>;
}

/// A fragment feed captured as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFeedFile {
    path: PathBuf,
}

impl JsonFeedFile {
    /// Point at a JSON feed file; nothing is read until [`FragmentSource::read_feed`].
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the feed file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FragmentSource for JsonFeedFile {
    fn read_feed(&self) -> Result<FragmentFeed> {
        FragmentFeed::from_json_file(&self.path)
    }
}

/// Open the right source for a file, based on its leading bytes.
pub fn open_source<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<Box<dyn FragmentSource>> {
    let path = path.as_ref();
    let kind = detect_input_kind(path)?;
    log::debug!("{}: {}", path.display(), kind);

    Ok(match kind {
        InputKind::Pdf { .. } => Box::new(PdfFeedReader::open_with_options(path, options.clone())?),
        InputKind::FeedJson => Box::new(JsonFeedFile::new(path)),
    })
}

/// Read the fragment feed of a PDF or JSON feed file.
pub fn read_feed<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<FragmentFeed> {
    open_source(path, options)?.read_feed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BoundingBox, TextFragment};
    use std::io::Write;

    #[test]
    fn test_json_feed_file() {
        let mut feed = FragmentFeed::new();
        feed.add_page(792.0);
        feed.push(TextFragment::new(
            "Hello",
            12.0,
            "Arial",
            0,
            BoundingBox::new(0.0, 0.0, 30.0, 12.0),
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(feed.to_json().unwrap().as_bytes()).unwrap();

        let loaded = read_feed(file.path(), &ExtractOptions::default()).unwrap();
        assert_eq!(loaded, feed);
    }

    #[test]
    fn test_unknown_input_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"plain text, not a document").unwrap();

        assert!(matches!(
            open_source(file.path(), &ExtractOptions::default()),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            read_feed("/nonexistent/file.pdf", &ExtractOptions::default()),
            Err(Error::Io(_))
        ));
    }
}
