//! Declarative heading-score rules.
//!
//! Every typographic or geometric signal that makes a fragment look like a
//! heading is a [`Rule`]. Signals are computed once per fragment into
//! [`FragmentSignals`]; scoring then walks [`Rule::ALL`] and sums the
//! weights of the rules that fire.

use std::sync::OnceLock;

use regex::Regex;

use super::baseline::BodyBaseline;
use super::config::{ScoreThresholds, ScoreWeights};
use crate::model::TextFragment;

/// A token made only of digits and periods, with at least one digit ("3", "2.1.", ".5").
fn numeral_regex() -> &'static Regex {
    static NUMERAL: OnceLock<Regex> = OnceLock::new();
    NUMERAL.get_or_init(|| Regex::new(r"^[\d.]*\d[\d.]*$").unwrap())
}

/// Whether a single token is numeric once periods are ignored.
pub fn is_numeral_token(token: &str) -> bool {
    numeral_regex().is_match(token)
}

/// Whether a text is nothing but one numeral token.
pub fn is_bare_number(text: &str) -> bool {
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => is_numeral_token(token),
        _ => false,
    }
}

/// Boolean signals observed on one fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FragmentSignals {
    pub bold: bool,
    pub larger_than_body: bool,
    pub isolated_block: bool,
    pub short_line: bool,
    pub font_change: bool,
    pub vertical_gap: bool,
    /// Starts with a numeral and has more words ("1. Name of applicant")
    pub numbered_label: bool,
    /// A lone numeral ending with a period ("3.")
    pub bare_numeral: bool,
}

impl FragmentSignals {
    /// Compute the signals of `frag`.
    ///
    /// `prev` is the fragment read just before it, if any; the gap signal
    /// only applies when both sit on the same page.
    pub fn compute(
        frag: &TextFragment,
        prev: Option<&TextFragment>,
        baseline: &BodyBaseline,
        thresholds: &ScoreThresholds,
    ) -> Self {
        let words = frag.word_count();
        let first_is_numeral = frag
            .text
            .split_whitespace()
            .next()
            .map(is_numeral_token)
            .unwrap_or(false);

        let vertical_gap = prev
            .filter(|p| p.page == frag.page)
            .map(|p| {
                let gap = frag.bbox.y0 - p.bbox.y1;
                gap > frag.font_size * thresholds.gap_ratio && gap < thresholds.gap_cap
            })
            .unwrap_or(false);

        let numbered_label = first_is_numeral && words > 1;

        Self {
            bold: frag.is_bold(),
            larger_than_body: frag.font_size > baseline.size * thresholds.larger_ratio,
            isolated_block: frag.block_line_count == 1,
            short_line: words <= thresholds.short_line_words,
            font_change: frag.font_family != baseline.font,
            vertical_gap,
            numbered_label,
            bare_numeral: !numbered_label
                && words == 1
                && first_is_numeral
                && frag.text.trim_end().ends_with('.'),
        }
    }
}

/// One heading-score rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    VerticalGap,
    Bold,
    LargerThanBody,
    IsolatedBlock,
    ShortLine,
    FontChange,
    NumberedLabel,
    BareNumeral,
}

impl Rule {
    /// The rule table, in evaluation order.
    pub const ALL: [Rule; 8] = [
        Rule::VerticalGap,
        Rule::Bold,
        Rule::LargerThanBody,
        Rule::IsolatedBlock,
        Rule::ShortLine,
        Rule::FontChange,
        Rule::NumberedLabel,
        Rule::BareNumeral,
    ];

    /// Short identifier used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Rule::VerticalGap => "vertical_gap",
            Rule::Bold => "bold",
            Rule::LargerThanBody => "larger_than_body",
            Rule::IsolatedBlock => "isolated_block",
            Rule::ShortLine => "short_line",
            Rule::FontChange => "font_change",
            Rule::NumberedLabel => "numbered_label",
            Rule::BareNumeral => "bare_numeral",
        }
    }

    /// Score delta when the rule fires.
    pub fn weight(self, weights: &ScoreWeights) -> f32 {
        match self {
            Rule::VerticalGap => weights.vertical_gap,
            Rule::Bold => weights.bold,
            Rule::LargerThanBody => weights.larger_than_body,
            Rule::IsolatedBlock => weights.isolated_block,
            Rule::ShortLine => weights.short_line,
            Rule::FontChange => weights.font_change,
            Rule::NumberedLabel => weights.numbered_label,
            Rule::BareNumeral => weights.bare_numeral,
        }
    }

    /// Whether the rule fires for the given signals.
    pub fn fires(self, signals: &FragmentSignals) -> bool {
        match self {
            Rule::VerticalGap => signals.vertical_gap,
            Rule::Bold => signals.bold,
            Rule::LargerThanBody => signals.larger_than_body,
            Rule::IsolatedBlock => signals.isolated_block,
            Rule::ShortLine => signals.short_line,
            Rule::FontChange => signals.font_change,
            Rule::NumberedLabel => signals.numbered_label,
            Rule::BareNumeral => signals.bare_numeral,
        }
    }
}

/// Total heading score of a fragment and the rules that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub total: f32,
    pub fired: Vec<Rule>,
}

impl Score {
    /// Evaluate the rule table against a fragment's signals.
    pub fn evaluate(signals: &FragmentSignals, weights: &ScoreWeights) -> Self {
        let fired: Vec<Rule> = Rule::ALL
            .iter()
            .copied()
            .filter(|rule| rule.fires(signals))
            .collect();
        let total = fired.iter().map(|rule| rule.weight(weights)).sum();
        Self { total, fired }
    }

    /// Comma-separated rule names, for logging.
    pub fn describe(&self) -> String {
        self.fired
            .iter()
            .map(|r| r.name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Acceptance rule: bold with a strong structural cue, or a high total score.
pub fn is_accepted(signals: &FragmentSignals, score: &Score, thresholds: &ScoreThresholds) -> bool {
    let strong_bold = signals.bold
        && (signals.numbered_label || signals.larger_than_body || signals.isolated_block);
    strong_bold || score.total >= thresholds.accept_score
}
