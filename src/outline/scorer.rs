//! Heading scoring and line merging.

use super::baseline::BodyBaseline;
use super::config::OutlineConfig;
use super::rules::{is_accepted, is_bare_number, FragmentSignals, Score};
use crate::model::{HeadingCandidate, TextFragment};

/// Scores fragments against the body baseline and collects heading candidates.
pub struct HeadingScorer<'a> {
    config: &'a OutlineConfig,
    baseline: &'a BodyBaseline,
}

impl<'a> HeadingScorer<'a> {
    /// Create a scorer.
    pub fn new(config: &'a OutlineConfig, baseline: &'a BodyBaseline) -> Self {
        Self { config, baseline }
    }

    /// Compute signals and score for one fragment.
    pub fn score(
        &self,
        frag: &TextFragment,
        prev: Option<&TextFragment>,
    ) -> (FragmentSignals, Score) {
        let signals =
            FragmentSignals::compute(frag, prev, self.baseline, &self.config.thresholds);
        let score = Score::evaluate(&signals, &self.config.weights);
        (signals, score)
    }

    /// Walk the fragments in reading order and collect heading candidates.
    ///
    /// `consumed` flags fragments that must not be evaluated (the title);
    /// fragments absorbed into a merged heading line are flagged as well.
    pub fn collect_candidates(
        &self,
        fragments: &[TextFragment],
        consumed: &mut [bool],
    ) -> Vec<HeadingCandidate> {
        let working: Vec<usize> = (0..fragments.len()).filter(|&i| !consumed[i]).collect();
        let mut candidates = Vec::new();

        for (pos, &idx) in working.iter().enumerate() {
            if consumed[idx] {
                continue;
            }

            let frag = &fragments[idx];
            let prev = pos.checked_sub(1).map(|p| &fragments[working[p]]);
            let (signals, score) = self.score(frag, prev);

            log::trace!(
                "score {:.1} [{}] page {} {:?}",
                score.total,
                score.describe(),
                frag.page,
                frag.text
            );

            if !is_accepted(&signals, &score, &self.config.thresholds) {
                continue;
            }
            if self.config.denylist.rejects(&frag.text) {
                log::debug!("Denylisted heading dropped: {:?}", frag.text);
                continue;
            }

            let text = self.merge_line(fragments, &working[pos + 1..], frag, consumed);

            if is_bare_number(&text) {
                log::debug!("Bare number dropped: {:?}", text);
                continue;
            }

            log::debug!(
                "Heading candidate (score {:.1}) page {}: {:?}",
                score.total,
                frag.page,
                text
            );

            candidates.push(HeadingCandidate {
                text,
                font_size: frag.font_size,
                page: frag.page,
                y0: frag.bbox.y0,
            });
        }

        candidates
    }

    /// Absorb the fragments that continue `origin` on the same visual line.
    ///
    /// `following` lists the indices after `origin` in reading order. Each
    /// absorbed fragment is flagged in `consumed`. Stops at the first
    /// fragment that is off the line, to the left, styled differently, or
    /// too long.
    fn merge_line(
        &self,
        fragments: &[TextFragment],
        following: &[usize],
        origin: &TextFragment,
        consumed: &mut [bool],
    ) -> String {
        let mut text = origin.text.clone();

        for &next_idx in following {
            let next = &fragments[next_idx];
            let on_line = next.page == origin.page
                && (next.bbox.y0 - origin.bbox.y0).abs() < origin.font_size / 2.0
                && next.bbox.x0 > origin.bbox.x0;
            if !on_line {
                break;
            }

            let same_style = next.size_key() == origin.size_key()
                && next.font_family == origin.font_family
                && next.color == origin.color;
            if !same_style || next.word_count() > self.config.thresholds.merge_max_words {
                break;
            }

            text.push(' ');
            text.push_str(&next.text);
            consumed[next_idx] = true;
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn baseline() -> BodyBaseline {
        BodyBaseline {
            font: "Times".to_string(),
            size: 10.0,
        }
    }

    fn frag(text: &str, x0: f32, y0: f32) -> TextFragment {
        TextFragment::new(
            text,
            10.0,
            "Times",
            0,
            BoundingBox::new(x0, y0, x0 + 80.0, y0 + 10.0),
        )
        .with_layout(4, 1)
    }

    fn run(fragments: &[TextFragment]) -> Vec<HeadingCandidate> {
        let config = OutlineConfig::default();
        let baseline = baseline();
        let scorer = HeadingScorer::new(&config, &baseline);
        let mut consumed = vec![false; fragments.len()];
        scorer.collect_candidates(fragments, &mut consumed)
    }

    #[test]
    fn test_merges_same_line_fragments() {
        let frags = vec![
            frag("1. Personal", 50.0, 100.0).bold(),
            frag("Details", 140.0, 101.0).bold(),
            frag("body text follows here and it is long", 50.0, 114.0),
        ];
        let candidates = run(&frags);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "1. Personal Details");
        assert_eq!(candidates[0].y0, 100.0);
    }

    #[test]
    fn test_merge_stops_on_style_change() {
        let frags = vec![
            frag("1. Personal", 50.0, 100.0).bold(),
            frag("Details", 140.0, 100.0).bold().with_color(0xFF0000),
            frag("More", 230.0, 100.0).bold(),
        ];
        let candidates = run(&frags);
        assert_eq!(candidates[0].text, "1. Personal");
        // The red fragment is evaluated independently (bold but not isolated, no number)
        assert!(candidates.iter().all(|c| c.text != "Details More"));
    }

    #[test]
    fn test_merge_requires_fragment_to_the_right() {
        let frags = vec![
            frag("2. Scope of work", 200.0, 100.0).bold(),
            frag("Left", 50.0, 100.0).bold(),
        ];
        let candidates = run(&frags);
        assert_eq!(candidates[0].text, "2. Scope of work");
    }

    #[test]
    fn test_absorbed_fragments_are_not_rescored() {
        let frags = vec![
            frag("3. Terms", 50.0, 100.0).bold(),
            frag("4. Conditions", 140.0, 100.0).bold(),
        ];
        let candidates = run(&frags);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "3. Terms 4. Conditions");
    }

    #[test]
    fn test_repeated_heading_text_is_kept() {
        let frags = vec![
            frag("1. Summary", 50.0, 100.0).bold(),
            frag("ordinary paragraph text that runs on and on", 50.0, 114.0),
            frag("1. Summary", 50.0, 300.0).bold(),
        ];
        let candidates = run(&frags);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_denylisted_text_dropped() {
        let frags = vec![
            frag("Name", 50.0, 100.0).bold().with_layout(1, 1),
            frag("Date", 50.0, 140.0).bold().with_layout(1, 1),
            frag("I declare that all is true", 50.0, 180.0)
                .bold()
                .with_layout(1, 1),
            frag("Declaration", 50.0, 220.0).bold().with_layout(1, 1),
        ];
        let candidates = run(&frags);
        let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Declaration"]);
    }

    #[test]
    fn test_bare_numeral_never_emitted() {
        let frags = vec![
            frag("3.", 50.0, 100.0).bold().with_layout(1, 1),
            frag("12", 50.0, 140.0).bold().with_layout(1, 1),
        ];
        assert!(run(&frags).is_empty());
    }

    #[test]
    fn test_consumed_fragments_skipped() {
        let frags = vec![frag("Heading Text", 50.0, 100.0).bold().with_layout(1, 1)];
        let config = OutlineConfig::default();
        let baseline = baseline();
        let scorer = HeadingScorer::new(&config, &baseline);
        let mut consumed = vec![true];
        assert!(scorer.collect_candidates(&frags, &mut consumed).is_empty());
    }
}
