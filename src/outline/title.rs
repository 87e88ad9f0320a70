//! Document title detection on the first page.

use super::config::TitleConfig;
use crate::model::{size_key, BoundingBox, TextFragment};

/// The fragment chosen as title and every fragment it consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleMatch {
    pub text: String,
    pub page: u32,
    pub bbox: BoundingBox,
    /// Indices of fragments sharing the title's page and bounding box
    pub consumed: Vec<usize>,
}

/// Find the most title-like fragment on page 0.
///
/// Size tiers are scanned from the largest down. Within a tier, fragments
/// starting in the top part of the page are tried top-to-bottom, then
/// left-to-right; the first bold fragment with an acceptable word count and
/// size wins. `page_height` of `None` puts no limit on the position.
pub fn detect_title(
    fragments: &[TextFragment],
    page_height: Option<f32>,
    config: &TitleConfig,
) -> Option<TitleMatch> {
    let top_limit = page_height
        .map(|h| h / config.top_divisor)
        .unwrap_or(f32::INFINITY);

    let mut tiers: Vec<i32> = fragments
        .iter()
        .filter(|f| f.page == 0)
        .map(|f| f.size_key())
        .collect();
    tiers.sort_unstable_by(|a, b| b.cmp(a));
    tiers.dedup();

    for tier in tiers {
        let mut in_tier: Vec<&TextFragment> = fragments
            .iter()
            .filter(|f| f.page == 0 && f.size_key() == tier && f.bbox.y0 < top_limit)
            .collect();
        in_tier.sort_by(|a, b| {
            a.bbox
                .y0
                .total_cmp(&b.bbox.y0)
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        let winner = in_tier.into_iter().find(|f| {
            let words = f.word_count();
            words >= config.min_words
                && words <= config.max_words
                && f.is_bold()
                && f.font_size >= config.min_size
        });

        if let Some(winner) = winner {
            let consumed = fragments
                .iter()
                .enumerate()
                .filter(|(_, f)| f.page == winner.page && f.bbox == winner.bbox)
                .map(|(i, _)| i)
                .collect();

            log::debug!(
                "Title found at size {:.1}: {:?}",
                tier as f32 / 10.0,
                winner.text
            );

            return Some(TitleMatch {
                text: winner.text.clone(),
                page: winner.page,
                bbox: winner.bbox,
                consumed,
            });
        }
    }

    log::debug!("No title candidate on the first page");
    None
}

/// Largest size tier on page 0, as used by the baseline estimator.
pub(crate) fn first_page_max_size(fragments: &[TextFragment]) -> Option<f32> {
    fragments
        .iter()
        .filter(|f| f.page == 0)
        .map(|f| size_key(f.font_size))
        .max()
        .map(|key| key as f32 / 10.0)
}
