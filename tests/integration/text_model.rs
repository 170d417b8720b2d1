// =====
// TESTS: 9
// =====
//
// Tokenizer and text model behaviour seen from outside the crate.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use slick::error::LookupError;
use slick::text::{CHANNEL_ID, HREF, PartKind, PrintableMessage, PrintablePart, USER_ID, tokenize};
use std::rc::Rc;

fn resolver(id: &str) -> Result<String, LookupError> {
    match id {
        "U1" => Ok("ryan".to_owned()),
        _ => Err(LookupError::UnknownUser(id.to_owned())),
    }
}

fn kinds_and_content(message: &PrintableMessage) -> Vec<(PartKind, String)> {
    message.parts().iter().map(|p| (p.kind, p.content.clone())).collect()
}

#[test]
fn emphasis() {
    let message = tokenize("hello *world*", resolver);
    assert_eq!(
        kinds_and_content(&message),
        vec![(PartKind::PlainText, "hello ".into()), (PartKind::Bold, "world".into())]
    );
}

#[test]
fn channel_user_and_group_tags() {
    let message = tokenize("<#C1|general> foo <@U1|ryan> bar <!here> baz", resolver);
    assert_eq!(
        kinds_and_content(&message),
        vec![
            (PartKind::Channel, "#general".into()),
            (PartKind::PlainText, " foo ".into()),
            (PartKind::AtMentionUser, "@ryan".into()),
            (PartKind::PlainText, " bar ".into()),
            (PartKind::AtMentionGroup, "@here".into()),
            (PartKind::PlainText, " baz".into()),
        ]
    );
    assert_eq!(message.parts()[0].meta(CHANNEL_ID), Some("C1"));
    assert_eq!(message.parts()[2].meta(USER_ID), Some("U1"));
}

#[test]
fn unresolvable_mention_degrades_to_id() {
    let message = tokenize("hi <@U404>", resolver);
    assert_eq!(message.parts()[1].content, "@U404");
    assert_eq!(message.parts()[1].kind, PartKind::AtMentionUser);
}

#[test]
fn unterminated_tag_stays_text() {
    let message = tokenize("see <http://x.y and more", resolver);
    assert_eq!(message.plain_text(), "see <http://x.y and more");
}

#[test]
fn lines_are_memoized_per_width() {
    let message = tokenize("a fairly long message that wraps", resolver);
    let first = message.lines(10);
    assert!(Rc::ptr_eq(&first, &message.lines(10)));
    let other = message.lines(12);
    assert!(!Rc::ptr_eq(&first, &other));
}

#[test]
fn set_parts_invalidates_lines() {
    let mut message = PrintableMessage::new(vec![PrintablePart::plain("short")]);
    let before = message.lines(80);
    message.set_parts(vec![PrintablePart::plain("replaced")]);
    let after = message.lines(80);
    assert_eq!(after[0][0].content, "replaced");
    assert!(!Rc::ptr_eq(&before, &after));
}

#[test]
fn snake_case_before_link_keeps_the_link() {
    let message = tokenize("see my_var at <https://example.com/some_page>", resolver);
    let link = &message.parts()[1];
    assert_eq!(message.parts()[0].content, "see my_var at ");
    assert_eq!(link.kind, PartKind::Link);
    assert_eq!(link.meta(HREF), Some("https://example.com/some_page"));
}

#[test]
fn mention_inside_emphasis_is_resolved() {
    let message = tokenize("_ping <@U1> please_", resolver);
    assert_eq!(
        kinds_and_content(&message),
        vec![
            (PartKind::Italic, "ping ".into()),
            (PartKind::AtMentionUser, "@ryan".into()),
            (PartKind::Italic, " please".into()),
        ]
    );
}

fn word() -> impl Strategy<Value = (String, bool)> {
    prop_oneof![
        "[a-z_*`]{1,6}".prop_map(|w| (w, false)),
        "[a-z_*]{1,6}".prop_map(|path| (format!("<https://x.io/{path}>"), true)),
        Just(("<@U1>".to_owned(), true)),
        "[a-z_]{1,6}".prop_map(|name| (format!("<#C1|{name}>"), true)),
    ]
}

proptest! {
    #[test]
    fn tags_survive_any_emphasis_markers(words in prop::collection::vec(word(), 0..16)) {
        let raw = words.iter().map(|(w, _)| w.as_str()).collect::<Vec<_>>().join(" ");
        let tags = words.iter().filter(|(_, is_tag)| *is_tag).count();
        let message = tokenize(&raw, resolver);
        let tagged = message
            .parts()
            .iter()
            .filter(|p| matches!(p.kind, PartKind::Link | PartKind::AtMentionUser | PartKind::Channel))
            .count();
        prop_assert_eq!(tagged, tags);
        prop_assert!(message.parts().iter().all(|p| !p.content.contains('<') && !p.content.contains('>')));
    }
}
