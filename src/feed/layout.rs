//! Page layout: text runs grouped into lines and blocks, emitted as fragments.

use std::cmp::Ordering;

use super::content::{is_spaceless_script_char, RawSpan};
use crate::model::{round_size, size_key, BoundingBox, StyleFlags, TextFragment};

/// Spans sharing one baseline, sorted left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub spans: Vec<RawSpan>,
    /// Baseline
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size, weighted by text length
    pub font_size: f32,
}

impl TextLine {
    /// Build a line from spans; adjacent runs of the same style are coalesced.
    pub fn from_spans(mut spans: Vec<RawSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        let spans = coalesce_runs(spans);

        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted: f32 = spans.iter().map(|s| s.font_size * s.text.len() as f32).sum();
        let font_size = match (total_chars, spans.first()) {
            (0, Some(first)) => first.font_size,
            (0, None) => 0.0,
            (n, _) => weighted / n as f32,
        };

        let (x, y) = spans.first().map(|s| (s.x, s.y)).unwrap_or((0.0, 0.0));
        Self {
            spans,
            y,
            x,
            font_size,
        }
    }
}

/// Merge neighbouring runs of identical font, size and color into one run.
///
/// Producers often split a word or phrase across several show operators;
/// the outline engine expects one fragment per styled run.
fn coalesce_runs(spans: Vec<RawSpan>) -> Vec<RawSpan> {
    let mut out: Vec<RawSpan> = Vec::with_capacity(spans.len());

    for span in spans {
        if let Some(last) = out.last_mut() {
            let gap = span.x - last.right();
            let same_style = last.font_name == span.font_name
                && size_key(last.font_size) == size_key(span.font_size)
                && last.color == span.color;
            if same_style && gap < span.font_size {
                let needs_space = gap > span.font_size * 0.1
                    && !last.text.ends_with(char::is_whitespace)
                    && !span.text.starts_with(char::is_whitespace)
                    && !last.text.chars().last().is_some_and(is_spaceless_script_char)
                    && !span.text.chars().next().is_some_and(is_spaceless_script_char);
                if needs_space {
                    last.text.push(' ');
                }
                last.text.push_str(&span.text);
                last.width = span.right() - last.x;
                continue;
            }
        }
        out.push(span);
    }

    out
}

/// Group spans into lines by baseline, top to bottom.
pub fn group_into_lines(mut spans: Vec<RawSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF y grows upward: descending y is top to bottom
    spans.sort_by(|a, b| match b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal),
        other => other,
    });

    let mut lines = Vec::new();
    let mut current: Vec<RawSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Group consecutive lines into blocks (paragraph-like units).
pub fn group_into_blocks(lines: Vec<TextLine>) -> Vec<Vec<TextLine>> {
    let avg_spacing = avg_line_spacing(&lines);
    let mut blocks: Vec<Vec<TextLine>> = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line, avg_spacing) {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn avg_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    (prev.y - curr.y).abs() > avg_spacing * 1.5
        || (prev.font_size - curr.font_size).abs() > 1.0
        || (prev.x - curr.x).abs() > 20.0
}

/// Lay out one page's spans and emit fragments in reading order.
///
/// Coordinates are flipped to a top-left origin using `page_height`.
/// Sequence indices are left at zero for the feed to assign.
pub fn layout_page(spans: Vec<RawSpan>, page: u32, page_height: f32) -> Vec<TextFragment> {
    let blocks = group_into_blocks(group_into_lines(spans));
    let mut fragments = Vec::new();

    for block in &blocks {
        let block_lines = block.len() as u32;
        for line in block {
            let line_spans = line.spans.len() as u32;
            for span in &line.spans {
                let text = span.text.trim();
                let font_size = round_size(span.font_size);
                if text.is_empty() || font_size <= 0.0 {
                    continue;
                }
                let bbox = BoundingBox::new(
                    span.x,
                    page_height - span.top(),
                    span.right(),
                    page_height - span.bottom(),
                );
                fragments.push(
                    TextFragment::new(text, font_size, span.font_name.clone(), page, bbox)
                        .with_style(StyleFlags::from_font_name(&span.font_name))
                        .with_color(span.color)
                        .with_layout(block_lines, line_spans),
                );
            }
        }
    }

    fragments
}
