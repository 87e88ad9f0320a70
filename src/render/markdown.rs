//! Markdown rendering for outlines.

use crate::model::OutlineDocument;

/// Render an outline as a Markdown table of contents.
///
/// The title becomes a `#` heading; entries form a bullet list indented two
/// spaces per level below H1, each with a `(p. N)` page suffix.
pub fn to_markdown(doc: &OutlineDocument) -> String {
    let mut output = String::new();
    output.push_str("# ");
    output.push_str(&escape_markdown(&doc.title));
    output.push_str("\n\n");

    for entry in &doc.outline {
        for _ in 0..entry.level.depth() {
            output.push_str("  ");
        }
        output.push_str("- ");
        output.push_str(&escape_markdown(&entry.text));
        output.push_str(&format!(" (p. {})\n", entry.page));
    }

    output
}

fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
