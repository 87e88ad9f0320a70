//! PDF fragment feed built on lopdf.

use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use super::content::ContentWalker;
use super::layout::layout_page;
use super::options::{ErrorMode, ExtractOptions};
use super::FragmentSource;
use crate::detect::{detect_input_kind_from_bytes, InputKind};
use crate::error::{Error, Result};
use crate::model::{FragmentFeed, TextFragment};

/// Default page height (US Letter) when no MediaBox is found.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Reads a PDF document into a [`FragmentFeed`].
pub struct PdfFeedReader {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl PdfFeedReader {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        if !matches!(detect_input_kind_from_bytes(data)?, InputKind::Pdf { .. }) {
            return Err(Error::UnknownFormat);
        }

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Ok(Self { doc, options })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// PDF header version, e.g. `1.7`.
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    /// Extract the feed: every selected page, in page order.
    pub fn extract(&self) -> Result<FragmentFeed> {
        let pages = self.doc.get_pages();
        if let Some(page_num) = self.options.pages.out_of_range(pages.len() as u32) {
            let err = Error::PageOutOfRange(page_num, pages.len() as u32);
            if self.options.error_mode == ErrorMode::Strict {
                return Err(err);
            }
            log::warn!("{}", err);
        }

        let mut feed = FragmentFeed::new();

        for &page_id in pages.values() {
            feed.add_page(self.page_height(page_id));
        }

        for (&page_num, &page_id) in &pages {
            if !self.options.pages.includes(page_num) {
                continue;
            }

            let page = page_num - 1;
            let height = feed.page_height(page).unwrap_or(DEFAULT_PAGE_HEIGHT);
            match self.page_fragments(page_id, page, height) {
                Ok(fragments) => {
                    log::debug!("Page {}: {} fragments", page_num, fragments.len());
                    for frag in fragments {
                        feed.push(frag);
                    }
                }
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping page {}: {}", page_num, e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(feed)
    }

    fn page_fragments(
        &self,
        page_id: ObjectId,
        page: u32,
        height: f32,
    ) -> Result<Vec<TextFragment>> {
        let content = self.page_content(page_id)?;
        let spans = ContentWalker::new(&self.doc, page_id)?.walk(&content)?;
        Ok(layout_page(spans, page, height))
    }

    /// Decompressed content stream of a page; arrays are concatenated.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(obj) => obj,
            // A page without content is blank, not broken
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Stream(s) => Ok(stream_bytes(s)),
                Object::Array(arr) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    content.extend_from_slice(&stream_bytes(s));
                    content.push(b' ');
                }
            }
        }
        content
    }

    /// Page height from the MediaBox, following `Parent` inheritance.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        let mut dict = self.doc.get_dictionary(page_id).ok();
        // Bounded walk guards against cyclic Parent chains
        for _ in 0..32 {
            let Some(current) = dict else { break };
            if let Some(height) = self.media_box_height(current) {
                return height;
            }
            dict = current
                .get(b"Parent")
                .and_then(Object::as_reference)
                .and_then(|id| self.doc.get_dictionary(id))
                .ok();
        }
        DEFAULT_PAGE_HEIGHT
    }

    fn media_box_height(&self, dict: &Dictionary) -> Option<f32> {
        let media_box = match dict.get(b"MediaBox").ok()? {
            Object::Reference(r) => self.doc.get_object(*r).ok()?,
            other => other,
        };
        let array = media_box.as_array().ok()?;
        if array.len() < 4 {
            return None;
        }
        let y0 = number(&array[1])?;
        let y1 = number(&array[3])?;
        let height = (y1 - y0).abs();
        (height > 0.0).then_some(height)
    }
}

impl FragmentSource for PdfFeedReader {
    fn read_feed(&self) -> Result<FragmentFeed> {
        self.extract()
    }
}

/// Stream data, decompressed when a filter applies.
fn stream_bytes(stream: &Stream) -> Vec<u8> {
    // Unfiltered streams make decompression fail; their raw content is the data
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::dictionary;

    /// Build a one-page PDF with the given text operations.
    fn build_pdf(lines: &[(&str, &str, f32, f32, f32)]) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let mut operations = Vec::new();
        for &(font, text, size, x, y) in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
            operations.push(Operation::new("Td", vec![x.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap_or_default(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_rejects_non_pdf() {
        assert!(matches!(
            PdfFeedReader::from_bytes(b"hello world"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_extract_fragments() {
        let pdf = build_pdf(&[
            ("F2", "Annual Report", 18.0, 72.0, 720.0),
            ("F1", "Body text line", 10.0, 72.0, 690.0),
        ]);
        let reader = PdfFeedReader::from_bytes(&pdf).unwrap();
        assert_eq!(reader.page_count(), 1);

        let feed = reader.extract().unwrap();
        assert_eq!(feed.page_heights, vec![792.0]);
        assert_eq!(feed.len(), 2);
        assert!(feed.validate().is_ok());

        let heading = &feed.fragments[0];
        assert_eq!(heading.text, "Annual Report");
        assert_eq!(heading.font_family, "Helvetica-Bold");
        assert!(heading.is_bold());
        assert_eq!(heading.font_size, 18.0);
        assert_eq!(heading.page, 0);
        // baseline 720, ascender 0.8 * 18
        assert!((heading.bbox.y0 - 57.6).abs() < 0.01);

        assert!(!feed.fragments[1].is_bold());
        assert!(feed.fragments[1].bbox.y0 > heading.bbox.y1);
    }

    #[test]
    fn test_page_out_of_range_strict() {
        let pdf = build_pdf(&[("F1", "Only page", 10.0, 72.0, 700.0)]);
        let options = ExtractOptions::new().with_page_range(2..=3);
        let reader = PdfFeedReader::from_bytes_with_options(&pdf, options).unwrap();
        assert!(matches!(
            reader.extract(),
            Err(Error::PageOutOfRange(2, 1))
        ));
    }

    #[test]
    fn test_page_selection_keeps_heights() {
        let pdf = build_pdf(&[("F1", "Only page", 10.0, 72.0, 700.0)]);
        let options = ExtractOptions::new().lenient().with_page_range(2..=3);
        let reader = PdfFeedReader::from_bytes_with_options(&pdf, options).unwrap();
        let feed = reader.extract().unwrap();
        assert!(feed.is_empty());
        assert_eq!(feed.page_heights.len(), 1);
    }
}
