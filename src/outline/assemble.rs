//! Final outline assembly.

use super::levels::LevelMap;
use crate::model::{HeadingCandidate, OutlineDocument, OutlineEntry};

/// Zip sorted candidates with their levels into the output document.
///
/// Pages become 1-based. Duplicate texts and levels pass through untouched.
pub fn assemble(
    title: String,
    candidates: Vec<HeadingCandidate>,
    levels: &LevelMap,
) -> OutlineDocument {
    let outline = candidates
        .into_iter()
        .map(|cand| OutlineEntry::new(levels.level_for(cand.font_size), cand.text, cand.page + 1))
        .collect();
    OutlineDocument::new(title, outline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    #[test]
    fn test_assemble_one_based_pages() {
        let cands = vec![
            HeadingCandidate {
                text: "Intro".to_string(),
                font_size: 16.0,
                page: 0,
                y0: 10.0,
            },
            HeadingCandidate {
                text: "Intro".to_string(),
                font_size: 12.0,
                page: 3,
                y0: 10.0,
            },
        ];
        let map = LevelMap::from_candidates(&cands);
        let doc = assemble("Report".to_string(), cands, &map);

        assert_eq!(doc.title, "Report");
        assert_eq!(
            doc.outline,
            vec![
                OutlineEntry::new(HeadingLevel::H1, "Intro", 1),
                OutlineEntry::new(HeadingLevel::H2, "Intro", 4),
            ]
        );
    }
}
