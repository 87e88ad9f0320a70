//! Content stream walking: positioned, styled text runs from one page.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Document as LopdfDocument, Object};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// A text run shown by one text operator, in PDF user space (y grows up).
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    pub text: String,
    /// Left edge
    pub x: f32,
    /// Baseline
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    pub font_size: f32,
    /// Base font name with any subset prefix removed
    pub font_name: String,
    /// Packed sRGB fill color
    pub color: u32,
}

impl RawSpan {
    /// Top of the glyph box (approximate ascender).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    /// Bottom of the glyph box (approximate descender).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Estimated advance of a string when glyph widths are unknown.
pub(crate) fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

/// Strip a subset tag such as `ABCDEF+` from a base font name.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

/// Walks a page content stream and collects text runs.
pub struct ContentWalker<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a lopdf::Dictionary>,
    base_fonts: HashMap<Vec<u8>, String>,
}

impl<'a> ContentWalker<'a> {
    /// Prepare a walker for one page.
    pub fn new(doc: &'a LopdfDocument, page_id: lopdf::ObjectId) -> Result<Self> {
        let fonts = doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let base_fonts = fonts
            .iter()
            .map(|(name, font)| {
                let base = font
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                (name.clone(), strip_subset_prefix(&base).to_string())
            })
            .collect();

        Ok(Self {
            doc,
            fonts,
            base_fonts,
        })
    }

    /// Decode the content stream and return its text runs in stream order.
    pub fn walk(&self, content: &[u8]) -> Result<Vec<RawSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut state = TextState::default();
        let mut color = 0u32;
        let mut color_stack: Vec<u32> = Vec::new();
        let mut in_text = false;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => color_stack.push(color),
                "Q" => color = color_stack.pop().unwrap_or(color),
                "g" | "rg" | "k" | "sc" | "scn" => {
                    if let Some(c) = fill_color(operands) {
                        color = c;
                    }
                }
                "BT" => {
                    in_text = true;
                    state.matrix = TextMatrix::default();
                }
                "ET" => in_text = false,
                "Tf" => {
                    if operands.len() >= 2 {
                        if let Object::Name(name) = &operands[0] {
                            state.font_key = name.clone();
                        }
                        state.font_size = get_number(&operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if operands.len() >= 2 {
                        let tx = get_number(&operands[0]).unwrap_or(0.0);
                        let ty = get_number(&operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if operands.len() >= 6 {
                        state.matrix.set(
                            get_number(&operands[0]).unwrap_or(1.0),
                            get_number(&operands[1]).unwrap_or(0.0),
                            get_number(&operands[2]).unwrap_or(0.0),
                            get_number(&operands[3]).unwrap_or(1.0),
                            get_number(&operands[4]).unwrap_or(0.0),
                            get_number(&operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => state.matrix.next_line(state.leading),
                "Tj" | "TJ" if in_text => {
                    let text = match operands.first() {
                        Some(Object::Array(items)) => self.decode_array(&state.font_key, items),
                        Some(Object::String(bytes, _)) => self.decode(&state.font_key, bytes),
                        _ => String::new(),
                    };
                    self.emit(&mut spans, &mut state, text, color);
                }
                "'" | "\"" => {
                    state.matrix.next_line(state.leading);
                    if in_text {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = operands.get(text_idx) {
                            let text = self.decode(&state.font_key, bytes);
                            self.emit(&mut spans, &mut state, text, color);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    fn emit(&self, spans: &mut Vec<RawSpan>, state: &mut TextState, text: String, color: u32) {
        let text: String = text.nfc().collect();
        let size = state.font_size * state.matrix.scale();
        let width = estimate_width(&text, size);

        if !text.trim().is_empty() && size > 0.0 {
            let (x, y) = state.matrix.position();
            let font_name = self
                .base_fonts
                .get(&state.font_key)
                .cloned()
                .unwrap_or_else(|| String::from_utf8_lossy(&state.font_key).to_string());
            spans.push(RawSpan {
                text,
                x,
                y,
                width,
                font_size: size,
                font_name,
                color,
            });
        }

        state.matrix.advance(width);
    }

    /// Decode a string with the font's encoding, falling back to simple decoding.
    fn decode(&self, font_key: &[u8], bytes: &[u8]) -> String {
        self.fonts
            .get(font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok())
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }

    /// Decode a TJ array; large negative kerning becomes a word space.
    fn decode_array(&self, font_key: &[u8], items: &[Object]) -> String {
        // 1/1000 text space units; ~0.2 em marks a word break
        const SPACE_THRESHOLD: f32 = 200.0;

        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(font_key, bytes)),
                other => {
                    let Some(adjust) = get_number(other) else {
                        continue;
                    };
                    let needs_space = -adjust > SPACE_THRESHOLD
                        && combined
                            .chars()
                            .last()
                            .map(|c| !c.is_whitespace() && !is_spaceless_script_char(c))
                            .unwrap_or(false);
                    if needs_space {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }
}

#[derive(Debug, Clone)]
struct TextState {
    matrix: TextMatrix,
    font_key: Vec<u8>,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            font_key: Vec::new(),
            font_size: 12.0,
            leading: 12.0,
        }
    }
}

/// Text matrix tracking the current text position.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    /// Start of the current line (Td/T* are relative to it)
    line_e: f32,
    line_f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
        };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    fn advance(&mut self, width: f32) {
        self.e += width;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Packed sRGB from fill color operands (gray, RGB or CMYK in 0..1).
fn fill_color(operands: &[Object]) -> Option<u32> {
    let values: Vec<f32> = operands.iter().filter_map(get_number).collect();
    let (r, g, b) = match values.as_slice() {
        [gray] => (*gray, *gray, *gray),
        [r, g, b] => (*r, *g, *b),
        [c, m, y, k] => (
            (1.0 - c) * (1.0 - k),
            (1.0 - m) * (1.0 - k),
            (1.0 - y) * (1.0 - k),
        ),
        _ => return None,
    };
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    Some((channel(r) << 16) | (channel(g) << 8) | channel(b))
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Characters of scripts written without word spaces (Chinese, Japanese kana).
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

/// Decode bytes without a font encoding: UTF-16BE with BOM, then UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
