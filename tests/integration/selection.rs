// =====
// TESTS: 4
// =====
//
// Selection input properties: window bounds under arbitrary movement and
// reset on show.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use slick::app::picker::{Entry, PAGE_SIZE, SelectionInput};

type Picker = SelectionInput<usize, ()>;

fn picker(len: usize) -> Picker {
    let mut p = Picker::default();
    p.set_entries((0..len).map(|i| Entry::new(i, format!("item {i}"))).collect(), 0);
    p.show(Box::new(|_: &mut (), _| {}));
    p
}

proptest! {
    #[test]
    fn moves_keep_selection_inside_window(len in 0usize..40, moves in prop::collection::vec(any::<bool>(), 0..120)) {
        let mut p = picker(len);
        for down in moves {
            if down { p.move_down() } else { p.move_up() }
            let (sel, bottom) = (p.selected_index(), p.bottom_index());
            prop_assert!(sel <= len.saturating_sub(1));
            prop_assert!(bottom <= sel);
            prop_assert!(sel < bottom + PAGE_SIZE);
        }
    }

    #[test]
    fn show_always_resets(len in 1usize..40, downs in 0usize..60) {
        let mut p = picker(len);
        for _ in 0..downs {
            p.move_down();
        }
        p.show(Box::new(|_: &mut (), _| {}));
        prop_assert_eq!((p.selected_index(), p.bottom_index()), (0, 0));
    }
}

#[test]
fn ranking_prefers_later_positions_and_sinks_dotfiles() {
    let mut p = Picker::default();
    p.set_entries(
        vec![
            Entry::new(0, "general"),
            Entry::new(1, ".general"),
            Entry::new(2, "random"),
            Entry::new(3, "dev-general"),
        ],
        0,
    );
    p.set_needle("general");
    let order: Vec<usize> = p.entries().iter().map(|e| e.item).collect();
    assert_eq!(order, vec![3, 0, 1, 2]);
}

#[test]
fn page_never_exceeds_page_size() {
    let p = picker(PAGE_SIZE * 3);
    assert_eq!(p.page().count(), PAGE_SIZE);
    let small = picker(3);
    assert_eq!(small.page().count(), 3);
}
