//! Font-size to heading-level assignment.

use std::cmp::Ordering;

use crate::model::{size_key, HeadingCandidate, HeadingLevel};

/// Sort candidates into document order: page, then top coordinate.
pub fn sort_candidates(candidates: &mut [HeadingCandidate]) {
    candidates.sort_by(|a, b| match a.page.cmp(&b.page) {
        Ordering::Equal => a.y0.total_cmp(&b.y0),
        other => other,
    });
}

/// Mapping from candidate font sizes to heading levels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelMap {
    /// (size key, level), largest size first
    entries: Vec<(i32, HeadingLevel)>,
}

impl LevelMap {
    /// Rank the distinct candidate sizes and map the three largest to H1..H3.
    pub fn from_candidates(candidates: &[HeadingCandidate]) -> Self {
        let mut counts: Vec<(i32, usize)> = Vec::new();
        for cand in candidates {
            let key = size_key(cand.font_size);
            match counts.iter_mut().find(|(k, _)| *k == key) {
                Some((_, count)) => *count += 1,
                None => counts.push((key, 1)),
            }
        }

        // Size descending; frequency descending among equal sizes
        counts.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

        let mut entries: Vec<(i32, HeadingLevel)> = counts
            .iter()
            .enumerate()
            .filter_map(|(rank, (key, _))| HeadingLevel::from_rank(rank).map(|lvl| (*key, lvl)))
            .collect();

        if entries.is_empty() {
            if let Some(first) = candidates.first() {
                entries.push((size_key(first.font_size), HeadingLevel::H1));
            }
        }

        log::debug!(
            "Level map: {}",
            entries
                .iter()
                .map(|(k, l)| format!("{:.1}pt={}", *k as f32 / 10.0, l))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self { entries }
    }

    /// Level for a font size.
    ///
    /// Sizes ranked past H3 fall back to H2 when an H1 size exists, else H1.
    pub fn level_for(&self, font_size: f32) -> HeadingLevel {
        let key = size_key(font_size);
        if let Some((_, level)) = self.entries.iter().find(|(k, _)| *k == key) {
            return *level;
        }
        if self.has_level(HeadingLevel::H1) {
            HeadingLevel::H2
        } else {
            HeadingLevel::H1
        }
    }

    /// Whether some size maps to `level`.
    pub fn has_level(&self, level: HeadingLevel) -> bool {
        self.entries.iter().any(|(_, l)| *l == level)
    }

    /// Number of mapped sizes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no size is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
