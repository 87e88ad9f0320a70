//! Body text baseline estimation.

use std::collections::HashMap;
use std::hash::Hash;

use super::config::BaselineConfig;
use crate::model::TextFragment;

/// Font family and size of ordinary body text.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyBaseline {
    pub font: String,
    pub size: f32,
}

impl BodyBaseline {
    /// Baseline used when no fragment looks like body text.
    pub fn fallback(config: &BaselineConfig) -> Self {
        Self {
            font: String::new(),
            size: config.fallback_size,
        }
    }

    /// Estimate the baseline by majority vote.
    ///
    /// Only non-bold fragments with more than `config.min_words` words and a
    /// size strictly below `title_size` vote; `title_size` is the largest size
    /// seen on the first page (`None` lets every size vote).
    pub fn estimate<'a, I>(fragments: I, title_size: Option<f32>, config: &BaselineConfig) -> Self
    where
        I: IntoIterator<Item = &'a TextFragment>,
    {
        let limit = title_size.unwrap_or(f32::INFINITY);
        let voters: Vec<&TextFragment> = fragments
            .into_iter()
            .filter(|f| !f.is_bold() && f.word_count() > config.min_words && f.font_size < limit)
            .collect();

        let font = most_common(voters.iter().map(|f| f.font_family.as_str()));
        let size = most_common(voters.iter().map(|f| f.size_key()));

        match (font, size) {
            (Some(font), Some(key)) => Self {
                font: font.to_string(),
                size: key as f32 / 10.0,
            },
            _ => Self::fallback(config),
        }
    }
}

/// Most frequent item; ties go to the item seen first.
pub(crate) fn most_common<T, I>(items: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut order: Vec<(T, usize)> = Vec::new();
    let mut index: HashMap<T, usize> = HashMap::new();

    for item in items {
        match index.get(&item) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(item.clone(), order.len());
                order.push((item, 1));
            }
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (item, count) in order {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((item, count));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn frag(text: &str, size: f32, font: &str) -> TextFragment {
        TextFragment::new(text, size, font, 0, BoundingBox::new(0.0, 0.0, 100.0, size))
    }

    const LONG: &str = "this sentence has more than five words in it";

    #[test]
    fn test_most_common_first_seen_wins_ties() {
        assert_eq!(most_common(vec!["b", "a", "a", "b"]), Some("b"));
        assert_eq!(most_common(vec![1, 2, 2]), Some(2));
        assert_eq!(most_common(Vec::<i32>::new()), None);
    }

    #[test]
    fn test_estimate_majority() {
        let frags = vec![
            frag(LONG, 10.0, "Times"),
            frag(LONG, 10.0, "Times"),
            frag(LONG, 11.0, "Arial"),
            frag("Short heading", 14.0, "Arial"),
        ];
        let baseline = BodyBaseline::estimate(&frags, Some(20.0), &BaselineConfig::default());
        assert_eq!(baseline.font, "Times");
        assert_eq!(baseline.size, 10.0);
    }

    #[test]
    fn test_estimate_excludes_bold_short_and_title_sized() {
        let frags = vec![
            frag(LONG, 9.0, "Times").bold(),
            frag("five words exactly right here", 9.0, "Times"),
            frag(LONG, 20.0, "Times"),
            frag(LONG, 11.0, "Georgia"),
        ];
        let baseline = BodyBaseline::estimate(&frags, Some(20.0), &BaselineConfig::default());
        assert_eq!(baseline.font, "Georgia");
        assert_eq!(baseline.size, 11.0);
    }

    #[test]
    fn test_estimate_fallback() {
        let frags = vec![frag("Short", 10.0, "Times")];
        let baseline = BodyBaseline::estimate(&frags, None, &BaselineConfig::default());
        assert_eq!(baseline, BodyBaseline::fallback(&BaselineConfig::default()));
        assert_eq!(baseline.font, "");
        assert_eq!(baseline.size, 9.0);
    }
}
