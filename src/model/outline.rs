//! Outline output types.

use serde::{Deserialize, Serialize};

/// Title used when no fragment qualifies as the document title.
pub const UNTITLED: &str = "Untitled Document";

/// Relative heading rank. `H1` is the coarsest (largest) level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Level by rank (0 => H1). Ranks past H3 have no level.
    pub fn from_rank(rank: usize) -> Option<Self> {
        match rank {
            0 => Some(HeadingLevel::H1),
            1 => Some(HeadingLevel::H2),
            2 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    /// Nesting depth (H1 => 0).
    pub fn depth(&self) -> usize {
        match self {
            HeadingLevel::H1 => 0,
            HeadingLevel::H2 => 1,
            HeadingLevel::H3 => 2,
        }
    }

    /// Label as written in the output ("H1", "H2", "H3").
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fragment (or merged run of fragments) accepted as a heading.
///
/// Size, page and `y0` come from the originating fragment; merging only
/// extends the text.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    pub text: String,
    pub font_size: f32,
    /// 0-based page index
    pub page: u32,
    pub y0: f32,
}

/// One entry of the inferred outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    /// 1-based page number
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Inferred document structure: a title and an ordered heading list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineDocument {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

impl OutlineDocument {
    /// Create a document outline.
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// The outline of a document with no usable text.
    pub fn untitled() -> Self {
        Self::new(UNTITLED, Vec::new())
    }

    /// Whether a title was detected.
    pub fn has_title(&self) -> bool {
        self.title != UNTITLED
    }

    /// Check if the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Entries at one level, in document order.
    pub fn entries_at(&self, level: HeadingLevel) -> impl Iterator<Item = &OutlineEntry> {
        self.outline.iter().filter(move |e| e.level == level)
    }
}

impl Default for OutlineDocument {
    fn default() -> Self {
        Self::untitled()
    }
}
