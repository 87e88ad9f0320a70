//! Shared fixtures for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdfoutline::{BoundingBox, FragmentFeed, TextFragment};

/// A body paragraph line long enough to vote for the body baseline.
pub const BODY: &str =
    "Operating costs fell in every region while service levels stayed broadly stable";

/// One text line of a generated PDF: (font resource, text, size, x, baseline y).
pub type PdfLine<'a> = (&'a str, &'a str, f32, f32, f32);

/// Build a PDF with one page per slice of lines.
///
/// `F1` is Helvetica and `F2` is Helvetica-Bold.
pub fn build_pdf(pages: &[&[PdfLine<'_>]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
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

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for &(font, text, size, x, y) in lines.iter() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
            operations.push(Operation::new("Td", vec![x.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
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

/// A two-page report with a title, two first-page sections and one on page two.
pub fn report_pdf() -> Vec<u8> {
    build_pdf(&[
        &[
            ("F2", "Quarterly Operations Review 2024", 24.0, 72.0, 740.0),
            ("F2", "Executive Summary", 16.0, 72.0, 690.0),
            ("F1", BODY, 10.0, 72.0, 670.0),
            ("F1", BODY, 10.0, 72.0, 656.0),
            ("F2", "Key Findings", 13.0, 72.0, 620.0),
            ("F1", BODY, 10.0, 72.0, 600.0),
        ],
        &[
            ("F2", "Outlook", 16.0, 72.0, 720.0),
            ("F1", BODY, 10.0, 72.0, 700.0),
            ("F1", BODY, 10.0, 72.0, 686.0),
        ],
    ])
}

/// A Times fragment in a multi-line block on page `page`, top edge at `y0`.
pub fn frag(text: &str, size: f32, page: u32, y0: f32) -> TextFragment {
    TextFragment::new(
        text,
        size,
        "Times",
        page,
        BoundingBox::new(72.0, y0, 480.0, y0 + size),
    )
    .with_layout(3, 1)
}

/// A bold fragment alone in its block.
pub fn heading(text: &str, size: f32, page: u32, y0: f32) -> TextFragment {
    frag(text, size, page, y0).bold().with_layout(1, 1)
}

/// A feed over `pages` Letter-sized pages.
pub fn feed_of(pages: usize, fragments: Vec<TextFragment>) -> FragmentFeed {
    let mut feed = FragmentFeed::new();
    for _ in 0..pages {
        feed.add_page(792.0);
    }
    for f in fragments {
        feed.push(f);
    }
    feed
}
