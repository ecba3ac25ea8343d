//! Property-based tests for the markup parser

use super::*;
use proptest::prelude::*;

fn arb_content() -> impl Strategy<Value = String> {
    // Bias toward the characters the parser cares about
    prop::collection::vec(
        prop_oneof![
            4 => "[a-zA-Z0-9 ]{1,6}",
            2 => Just("**".to_string()),
            1 => Just("*".to_string()),
            1 => Just("\n".to_string()),
        ],
        0..20,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_one_paragraph_per_line(content in arb_content()) {
        let parsed = parse(&content);
        prop_assert_eq!(parsed.len(), content.matches('\n').count() + 1);
    }

    #[test]
    fn prop_segments_alternate_plain_first(content in arb_content()) {
        for paragraph in parse(&content) {
            prop_assert!(!paragraph.is_empty());
            for (index, segment) in paragraph.iter().enumerate() {
                prop_assert_eq!(segment.is_emphasis(), index % 2 == 1);
            }
        }
    }

    #[test]
    fn prop_segment_count_tracks_delimiters(content in arb_content()) {
        for (line, paragraph) in content.split('\n').zip(parse(&content)) {
            prop_assert_eq!(paragraph.len(), line.matches(EMPHASIS_DELIMITER).count() + 1);
        }
    }

    #[test]
    fn prop_rejoining_restores_content(content in arb_content()) {
        let rebuilt = parse(&content)
            .iter()
            .map(|paragraph| {
                paragraph
                    .iter()
                    .map(Segment::text)
                    .collect::<Vec<_>>()
                    .join(EMPHASIS_DELIMITER)
            })
            .collect::<Vec<_>>()
            .join("\n");
        prop_assert_eq!(rebuilt, content);
    }

    #[test]
    fn prop_reparse_of_plain_output_is_stable(text in "[a-zA-Z0-9 .,!?]{0,40}") {
        let first = parse(&text);
        let second = parse(&plain_text(&first));
        prop_assert_eq!(first.len(), 1);
        prop_assert_eq!(first[0].len(), 1);
        prop_assert_eq!(second, first);
    }
}
