// =====
// TESTS: 4
// =====
//
// Line wrapper invariants over generated messages.

use proptest::prelude::*;
use slick::text::{PartKind, PrintablePart, wrap_parts};

fn part() -> impl Strategy<Value = PrintablePart> {
    let kind = prop_oneof![
        Just(PartKind::PlainText),
        Just(PartKind::Bold),
        Just(PartKind::Code),
        Just(PartKind::Newline),
    ];
    (kind, "[a-z ]{0,24}").prop_map(|(kind, content)| {
        if kind == PartKind::Newline { PrintablePart::newline() } else { PrintablePart::new(kind, content) }
    })
}

fn joined(parts: &[PrintablePart]) -> String {
    parts.iter().map(|p| p.content.as_str()).collect()
}

proptest! {
    #[test]
    fn rows_rejoin_to_the_input(parts in prop::collection::vec(part(), 0..12), width in 1isize..40) {
        let rows = wrap_parts(&parts, width);
        let rejoined: String = rows.iter().flatten().map(|p| p.content.as_str()).collect();
        prop_assert_eq!(rejoined, joined(&parts));
    }

    #[test]
    fn rows_fit_and_hold_no_empty_parts(parts in prop::collection::vec(part(), 0..12), width in 1isize..40) {
        for row in wrap_parts(&parts, width) {
            let used: usize = row.iter().map(PrintablePart::width).sum();
            prop_assert!(isize::try_from(used).unwrap() <= width);
            prop_assert!(row.iter().all(|p| !p.content.is_empty()));
        }
    }

    #[test]
    fn non_positive_width_terminates(parts in prop::collection::vec(part(), 1..12), width in -50isize..=0) {
        let rows = wrap_parts(&parts, width);
        let has_text = parts.iter().any(|p| !p.content.is_empty() || p.kind == PartKind::Newline);
        prop_assert!(!has_text || !rows.is_empty());
        let rejoined: String = rows.iter().flatten().map(|p| p.content.as_str()).collect();
        prop_assert_eq!(rejoined, joined(&parts));
    }

    #[test]
    fn long_messages_wrap_within_width(
        words in prop::collection::vec("[a-z]{1,12}", 0..600),
        width in 1isize..120,
    ) {
        let text = words.join(" ");
        let rows = wrap_parts(&[PrintablePart::new(PartKind::Bold, text.clone())], width);
        let rejoined: String = rows.iter().flatten().map(|p| p.content.as_str()).collect();
        prop_assert_eq!(rejoined, text);
        for row in &rows {
            let used: usize = row.iter().map(PrintablePart::width).sum();
            prop_assert!(isize::try_from(used).unwrap() <= width);
        }
    }
}
