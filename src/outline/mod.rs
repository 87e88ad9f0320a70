//! Outline inference engine.
//!
//! The engine runs in five steps over one document's fragment feed:
//!
//! 1. title detection on the first page ([`detect_title`]),
//! 2. body-text baseline estimation ([`BodyBaseline`]),
//! 3. heading scoring and same-line merging ([`HeadingScorer`]),
//! 4. size-to-level ranking ([`LevelMap`]),
//! 5. assembly into an [`OutlineDocument`].
//!
//! [`extract_outline`] is pure: no I/O, no shared state, and the same feed
//! always produces the same outline.

mod assemble;
mod baseline;
mod config;
mod levels;
mod rules;
mod scorer;
mod title;

pub use assemble::assemble;
pub use baseline::BodyBaseline;
pub use config::{
    BaselineConfig, Denylist, OutlineConfig, ScoreThresholds, ScoreWeights, TitleConfig,
};
pub use levels::{sort_candidates, LevelMap};
pub use rules::{is_accepted, is_bare_number, is_numeral_token, FragmentSignals, Rule, Score};
pub use scorer::HeadingScorer;
pub use title::{detect_title, TitleMatch};

use std::borrow::Cow;

use crate::model::{round_size, FragmentFeed, OutlineDocument, TextFragment};

/// Infer the title and heading outline of one document.
///
/// The feed is expected to satisfy [`FragmentFeed::validate`]. Reading order
/// is re-asserted with a stable sort on `(page, sequence_index)`, which
/// leaves a well-ordered feed untouched, and font sizes are rounded to 0.1pt
/// before any comparison.
pub fn extract_outline(feed: &FragmentFeed, config: &OutlineConfig) -> OutlineDocument {
    if feed.is_empty() {
        return OutlineDocument::new(config.title.fallback.clone(), Vec::new());
    }

    let fragments = normalize(&feed.fragments);

    let title = detect_title(&fragments, feed.page_height(0), &config.title);
    let mut consumed = vec![false; fragments.len()];
    if let Some(ref m) = title {
        for &i in &m.consumed {
            consumed[i] = true;
        }
    }

    let baseline = BodyBaseline::estimate(
        fragments
            .iter()
            .zip(&consumed)
            .filter(|(_, &taken)| !taken)
            .map(|(f, _)| f),
        title::first_page_max_size(&fragments),
        &config.baseline,
    );
    log::debug!(
        "Body baseline: font {:?}, size {:.1}",
        baseline.font,
        baseline.size
    );

    let scorer = HeadingScorer::new(config, &baseline);
    let mut candidates = scorer.collect_candidates(&fragments, &mut consumed);
    sort_candidates(&mut candidates);

    let levels = LevelMap::from_candidates(&candidates);
    let title_text = title
        .map(|m| m.text)
        .unwrap_or_else(|| config.title.fallback.clone());

    assemble(title_text, candidates, &levels)
}

/// Borrow the fragments if already in reading order with 0.1pt sizes,
/// otherwise fix up a copy.
fn normalize(fragments: &[TextFragment]) -> Cow<'_, [TextFragment]> {
    let ordered = fragments.windows(2).all(|w| {
        (w[0].page, w[0].sequence_index) <= (w[1].page, w[1].sequence_index)
    });
    let rounded = fragments
        .iter()
        .all(|f| f.font_size == round_size(f.font_size));
    if ordered && rounded {
        return Cow::Borrowed(fragments);
    }

    let mut fixed = fragments.to_vec();
    if !ordered {
        log::warn!("Fragment feed out of reading order; re-sorting by page and sequence");
        fixed.sort_by_key(|f| (f.page, f.sequence_index));
    }
    for frag in &mut fixed {
        frag.font_size = round_size(frag.font_size);
    }
    Cow::Owned(fixed)
}
