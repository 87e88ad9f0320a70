//! Positioned text fragments produced by the fragment feed.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page coordinates (origin top-left, y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Whether all four coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

/// Text style flags of a fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleFlags {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

impl StyleFlags {
    /// Plain (regular weight, upright, not underlined).
    pub const PLAIN: StyleFlags = StyleFlags {
        bold: false,
        italic: false,
        underline: false,
    };

    /// Bold only.
    pub const BOLD: StyleFlags = StyleFlags {
        bold: true,
        italic: false,
        underline: false,
    };

    /// Infer weight and slant from a font name such as `Helvetica-BoldOblique`.
    pub fn from_font_name(font_name: &str) -> Self {
        let lower = font_name.to_lowercase();
        Self {
            bold: lower.contains("bold") || lower.contains("black") || lower.contains("heavy"),
            italic: lower.contains("italic") || lower.contains("oblique"),
            underline: false,
        }
    }
}

/// A contiguous run of text sharing one font, style and color.
///
/// Fragments are immutable once produced; the outline engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFragment {
    /// Text content, trimmed and non-empty
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Font family (base font name without subset prefix)
    pub font_family: String,
    /// Style flags
    #[serde(default)]
    pub style: StyleFlags,
    /// Fill color as packed sRGB (0xRRGGBB)
    #[serde(default)]
    pub color: u32,
    /// Page index (0-based)
    pub page: u32,
    /// Bounding box in page coordinates
    pub bbox: BoundingBox,
    /// Number of lines in the enclosing layout block
    pub block_line_count: u32,
    /// Number of fragments sharing this fragment's line
    pub line_span_count: u32,
    /// Position in the reading-ordered feed
    pub sequence_index: u32,
}

impl TextFragment {
    /// Create a fragment with plain style, black color and single-line context.
    ///
    /// Use the `with_*` methods to fill in the remaining attributes.
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        font_family: impl Into<String>,
        page: u32,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_family: font_family.into(),
            style: StyleFlags::PLAIN,
            color: 0,
            page,
            bbox,
            block_line_count: 1,
            line_span_count: 1,
            sequence_index: 0,
        }
    }

    /// Set the style flags.
    pub fn with_style(mut self, style: StyleFlags) -> Self {
        self.style = style;
        self
    }

    /// Mark the fragment bold.
    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    /// Set the packed fill color.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Set the layout context (lines in block, fragments on line).
    pub fn with_layout(mut self, block_line_count: u32, line_span_count: u32) -> Self {
        self.block_line_count = block_line_count;
        self.line_span_count = line_span_count;
        self
    }

    /// Set the reading-order position.
    pub fn with_sequence(mut self, sequence_index: u32) -> Self {
        self.sequence_index = sequence_index;
        self
    }

    /// Whether the fragment is bold.
    pub fn is_bold(&self) -> bool {
        self.style.bold
    }

    /// Number of whitespace-delimited words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Font size as a hashable key with 0.1pt precision.
    pub fn size_key(&self) -> i32 {
        size_key(self.font_size)
    }
}

/// Quantize a font size to 0.1pt so it can be counted and compared exactly.
pub fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Round a font size to 0.1pt, the precision every size comparison works at.
pub fn round_size(size: f32) -> f32 {
    size_key(size) as f32 / 10.0
}
