//! Heuristic configuration for outline inference.
//!
//! All weights, thresholds and deny lists live here as plain data. The
//! defaults reproduce the stock heuristic; a JSON file may override any
//! subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::UNTITLED;

/// Score contributed by each heading rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub bold: f32,
    pub larger_than_body: f32,
    pub isolated_block: f32,
    pub short_line: f32,
    pub font_change: f32,
    pub vertical_gap: f32,
    pub numbered_label: f32,
    /// Applied to a lone numeral such as "3." (negative)
    pub bare_numeral: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            bold: 2.5,
            larger_than_body: 1.5,
            isolated_block: 1.0,
            short_line: 0.8,
            font_change: 0.5,
            vertical_gap: 1.5,
            numbered_label: 2.0,
            bare_numeral: -3.0,
        }
    }
}

/// Thresholds used by the rule predicates, acceptance and merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    /// A fragment is "larger" when its size exceeds body size times this ratio
    pub larger_ratio: f32,
    /// Maximum word count of a short line
    pub short_line_words: usize,
    /// Gap above a fragment must exceed its font size times this ratio
    pub gap_ratio: f32,
    /// Gaps at or beyond this many units are ignored
    pub gap_cap: f32,
    /// Minimum total score for acceptance without the bold shortcut
    pub accept_score: f32,
    /// Fragments with more words are never merged into a heading line
    pub merge_max_words: usize,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            larger_ratio: 1.1,
            short_line_words: 10,
            gap_ratio: 1.5,
            gap_cap: 50.0,
            accept_score: 3.5,
            merge_max_words: 10,
        }
    }
}

/// Title detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    pub min_words: usize,
    pub max_words: usize,
    pub min_size: f32,
    /// Title must start above `page_height / top_divisor`
    pub top_divisor: f32,
    /// Title reported when nothing qualifies
    pub fallback: String,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            min_words: 3,
            max_words: 15,
            min_size: 12.0,
            top_divisor: 3.0,
            fallback: UNTITLED.to_string(),
        }
    }
}

/// Body-text baseline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Only fragments with more words than this vote
    pub min_words: usize,
    /// Body size used when no fragment votes
    pub fallback_size: f32,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            min_words: 5,
            fallback_size: 9.0,
        }
    }
}

/// Text that is never reported as a heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Denylist {
    /// Lowercase phrases; a heading containing any of them is dropped
    pub phrases: Vec<String>,
    /// Lowercase labels; a heading equal to one of them (trimmed) is dropped
    pub noise_words: Vec<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self {
            phrases: ["declare that", "undertake to", "lump sum"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            noise_words: ["date", "rs.", "name", "s.no", "age", "relationship"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Denylist {
    /// Check whether a text is boilerplate or a form-label noise word.
    pub fn rejects(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        if self.phrases.iter().any(|p| lower.contains(p.as_str())) {
            return true;
        }
        let trimmed = lower.trim();
        self.noise_words.iter().any(|w| w == trimmed)
    }
}

/// Complete configuration of the outline engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    pub weights: ScoreWeights,
    pub thresholds: ScoreThresholds,
    pub title: TitleConfig,
    pub baseline: BaselineConfig,
    pub denylist: Denylist,
}

impl OutlineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set score weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set score thresholds.
    pub fn with_thresholds(mut self, thresholds: ScoreThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set title detection parameters.
    pub fn with_title(mut self, title: TitleConfig) -> Self {
        self.title = title;
        self
    }

    /// Set baseline parameters.
    pub fn with_baseline(mut self, baseline: BaselineConfig) -> Self {
        self.baseline = baseline;
        self
    }

    /// Set the deny list.
    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = denylist;
        self
    }

    /// Set the acceptance score.
    pub fn with_accept_score(mut self, score: f32) -> Self {
        self.thresholds.accept_score = score;
        self
    }

    /// Add a boilerplate phrase to the deny list.
    pub fn deny_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.denylist.phrases.push(phrase.into().to_lowercase());
        self
    }

    /// Add a noise word to the deny list.
    pub fn deny_word(mut self, word: impl Into<String>) -> Self {
        self.denylist
            .noise_words
            .push(word.into().trim().to_lowercase());
        self
    }

    /// Decode a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Encode the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = ScoreWeights::default();
        assert_eq!(w.bold, 2.5);
        assert_eq!(w.bare_numeral, -3.0);
        assert_eq!(ScoreThresholds::default().accept_score, 3.5);
    }

    #[test]
    fn test_denylist_phrases_and_words() {
        let deny = Denylist::default();
        assert!(deny.rejects("I hereby DECLARE THAT the above is true"));
        assert!(deny.rejects("  Date "));
        assert!(deny.rejects("S.No"));
        assert!(!deny.rejects("Date of birth"));
        assert!(!deny.rejects("Introduction"));
    }

    #[test]
    fn test_partial_json_override() {
        let config =
            OutlineConfig::from_json_str(r#"{"thresholds": {"accept_score": 5.0}}"#).unwrap();
        assert_eq!(config.thresholds.accept_score, 5.0);
        assert_eq!(config.thresholds.gap_cap, 50.0);
        assert_eq!(config.weights, ScoreWeights::default());
    }

    #[test]
    fn test_invalid_json() {
        let result = OutlineConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder() {
        let config = OutlineConfig::new()
            .with_accept_score(4.0)
            .deny_phrase("Signature")
            .deny_word(" Place ");
        assert_eq!(config.thresholds.accept_score, 4.0);
        assert!(config.denylist.rejects("signature of applicant"));
        assert!(config.denylist.rejects("place"));
    }

    #[test]
    fn test_json_round_trip_default() {
        let json = OutlineConfig::default().to_json().unwrap();
        let back = OutlineConfig::from_json_str(&json).unwrap();
        assert_eq!(back, OutlineConfig::default());
    }
}
