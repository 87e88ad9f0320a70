//! The fragment feed: a document's text fragments in reading order plus page geometry.

use serde::{Deserialize, Serialize};

use super::TextFragment;
use crate::error::{Error, Result};

/// All fragments of one document together with each page's height.
///
/// Fragments must be in reading order: pages ascending, and within the
/// feed `sequence_index` strictly increasing. [`FragmentFeed::validate`]
/// checks that contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FragmentFeed {
    /// Fragments in reading order
    pub fragments: Vec<TextFragment>,
    /// Page heights in points, indexed by 0-based page number
    #[serde(default)]
    pub page_heights: Vec<f32>,
}

impl FragmentFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a feed from fragments and page heights.
    pub fn from_parts(fragments: Vec<TextFragment>, page_heights: Vec<f32>) -> Self {
        Self {
            fragments,
            page_heights,
        }
    }

    /// Append a fragment, assigning it the next sequence index.
    pub fn push(&mut self, fragment: TextFragment) {
        let next = self
            .fragments
            .last()
            .map(|f| f.sequence_index + 1)
            .unwrap_or(0);
        self.fragments.push(fragment.with_sequence(next));
    }

    /// Append a page height.
    pub fn add_page(&mut self, height: f32) {
        self.page_heights.push(height);
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        let from_fragments = self.fragments.iter().map(|f| f.page + 1).max().unwrap_or(0);
        from_fragments.max(self.page_heights.len() as u32)
    }

    /// Height of a page, if known.
    pub fn page_height(&self, page: u32) -> Option<f32> {
        self.page_heights.get(page as usize).copied()
    }

    /// Check whether the feed has no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Fragments on one page, in reading order.
    pub fn page_fragments(&self, page: u32) -> impl Iterator<Item = &TextFragment> {
        self.fragments.iter().filter(move |f| f.page == page)
    }

    /// Verify the feed contract: well-formed fragments in reading order.
    pub fn validate(&self) -> Result<()> {
        for (index, frag) in self.fragments.iter().enumerate() {
            if frag.text.trim().is_empty() {
                return Err(Error::MalformedFragment {
                    index,
                    reason: "empty text".to_string(),
                });
            }
            if !frag.font_size.is_finite() || frag.font_size <= 0.0 {
                return Err(Error::MalformedFragment {
                    index,
                    reason: format!("invalid font size {}", frag.font_size),
                });
            }
            if !frag.bbox.is_finite() || frag.bbox.x1 < frag.bbox.x0 || frag.bbox.y1 < frag.bbox.y0
            {
                return Err(Error::MalformedFragment {
                    index,
                    reason: format!("invalid bounding box {:?}", frag.bbox),
                });
            }
        }

        for (index, pair) in self.fragments.windows(2).enumerate() {
            let (prev, curr) = (&pair[0], &pair[1]);
            if curr.page < prev.page {
                return Err(Error::UnorderedFeed(format!(
                    "fragment #{} on page {} follows page {}",
                    index + 1,
                    curr.page,
                    prev.page
                )));
            }
            if curr.sequence_index <= prev.sequence_index {
                return Err(Error::UnorderedFeed(format!(
                    "fragment #{} has sequence index {} after {}",
                    index + 1,
                    curr.sequence_index,
                    prev.sequence_index
                )));
            }
        }

        for (page, height) in self.page_heights.iter().enumerate() {
            if !height.is_finite() || *height <= 0.0 {
                return Err(Error::Other(format!(
                    "page {} has invalid height {}",
                    page, height
                )));
            }
        }

        Ok(())
    }

    /// Decode a feed from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::FeedDecode(e.to_string()))
    }

    /// Read a feed from a JSON file.
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Encode the feed as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }
}
