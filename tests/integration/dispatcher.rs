// =====
// TESTS: 25
// =====
//
// Mode dispatcher integration tests.
// Drives the App with key events and checks mode, buffer, picker and the
// commands queued for the connection.

use crossterm::event::{Event, KeyCode};
use pretty_assertions::assert_eq;
use slick::app::{Mode, PickerItem, PickerKind, handle_terminal_event};
use slick::connection::{ClientEvent, ConnectionCommand};
use slick::error::CommandError;

use crate::helpers::{
    add_connection, connected_app, ctrl, drain, press, raw, send_client_event, test_app, type_str,
};

fn send(channel: &str, text: &str) -> ConnectionCommand {
    ConnectionCommand::SendMessage { channel_id: channel.into(), text: text.into() }
}

// --- entering and leaving writ ---

#[test]
fn starts_in_chat() {
    let app = test_app();
    assert_eq!(app.mode, Mode::Chat);
    assert!(app.buffer.is_empty());
    assert!(!app.picker.is_visible());
}

#[test]
fn slash_on_empty_buffer_shows_full_palette() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.mode, Mode::Writ);
    assert_eq!(app.buffer.text(), "/");
    assert!(app.picker.is_visible());
    assert_eq!(app.picker_kind, PickerKind::Palette);
    assert_eq!(app.picker.len(), app.commands.commands().len());
}

#[test]
fn backspace_past_start_cancels() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('/'));
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.mode, Mode::Writ);
    assert!(app.buffer.is_empty());
    assert!(!app.picker.is_visible());
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.mode, Mode::Chat);
}

#[test]
fn escape_clears_and_returns_to_chat() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('w'));
    type_str(&mut app, "draft");
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.mode, Mode::Chat);
    assert!(app.buffer.is_empty());
}

#[test]
fn editing_keys_move_and_delete() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('w'));
    type_str(&mut app, "one two");
    ctrl(&mut app, 'a');
    assert_eq!(app.buffer.cursor(), 0);
    press(&mut app, KeyCode::Right);
    ctrl(&mut app, 'l');
    assert_eq!(app.buffer.cursor(), 2);
    ctrl(&mut app, 'h');
    assert_eq!(app.buffer.cursor(), 1);
    ctrl(&mut app, 'e');
    ctrl(&mut app, 'w');
    assert_eq!(app.buffer.text(), "one ");
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.buffer.text(), "on ");
}

#[test]
fn ctrl_c_quits() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('w'));
    ctrl(&mut app, 'c');
    assert!(app.should_quit);
}

// --- submitting ---

#[test]
fn enter_sends_to_selected_channel_and_resets() {
    let (mut app, mut rx) = connected_app();
    drain(&mut rx);
    press(&mut app, KeyCode::Char('w'));
    type_str(&mut app, "hi");
    press(&mut app, KeyCode::Enter);

    let commands = drain(&mut rx);
    assert_eq!(commands.last(), Some(&send("C0", "hi")));
    assert_eq!(app.mode, Mode::Chat);
    assert!(app.buffer.is_empty());
    assert!(app.status.is_none());
}

#[test]
fn every_typed_char_in_writ_sends_typing() {
    let (mut app, mut rx) = connected_app();
    drain(&mut rx);
    press(&mut app, KeyCode::Char('w'));
    type_str(&mut app, "abc");
    let typing = drain(&mut rx)
        .into_iter()
        .filter(|c| matches!(c, ConnectionCommand::Typing { .. }))
        .count();
    assert_eq!(typing, 3);
}

#[test]
fn filtering_the_picker_sends_no_typing() {
    let (mut app, mut rx) = connected_app();
    drain(&mut rx);
    press(&mut app, KeyCode::Char('p'));
    type_str(&mut app, "ran");
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn failed_send_still_resets_command_bar() {
    let mut app = test_app();
    let rx = add_connection(&mut app, "work", &["general"]);
    drop(rx);
    press(&mut app, KeyCode::Char('w'));
    type_str(&mut app, "lost");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, Mode::Chat);
    assert!(app.buffer.is_empty());
    let status = app.status.clone().unwrap();
    assert!(status.is_error);
    assert_eq!(status.text, CommandError::ConnectionClosed("work".into()).to_string());
}

#[test]
fn enter_without_channel_reports_it() {
    let mut app = test_app();
    let _rx = add_connection(&mut app, "empty", &[]);
    press(&mut app, KeyCode::Char('w'));
    type_str(&mut app, "hello");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.status.map(|s| s.text), Some(CommandError::NoChannel.to_string()));
}

#[test]
fn empty_submit_is_quiet() {
    let (mut app, mut rx) = connected_app();
    drain(&mut rx);
    press(&mut app, KeyCode::Char('w'));
    type_str(&mut app, "   ");
    drain(&mut rx);
    press(&mut app, KeyCode::Enter);
    assert!(drain(&mut rx).is_empty());
    assert!(app.status.is_none());
}

#[test]
fn paste_inserts_text_with_one_typing_notification() {
    let (mut app, mut rx) = connected_app();
    drain(&mut rx);
    press(&mut app, KeyCode::Char('w'));
    handle_terminal_event(&mut app, Event::Paste("hi\nthere".into()));
    assert_eq!(app.buffer.text(), "hithere");
    let typing = drain(&mut rx)
        .into_iter()
        .filter(|c| matches!(c, ConnectionCommand::Typing { .. }))
        .count();
    assert_eq!(typing, 1);
}

#[test]
fn paste_with_closed_connection_is_quiet() {
    let mut app = test_app();
    let rx = add_connection(&mut app, "work", &["general"]);
    drop(rx);
    press(&mut app, KeyCode::Char('w'));
    handle_terminal_event(&mut app, Event::Paste("lost".into()));
    assert_eq!(app.buffer.text(), "lost");
    assert!(app.status.is_none());
}

#[test]
fn emoticon_at_start_is_sent_as_message() {
    let (mut app, mut rx) = connected_app();
    drain(&mut rx);
    press(&mut app, KeyCode::Char(':'));
    type_str(&mut app, ") thanks");
    assert!(!app.picker.is_visible());
    press(&mut app, KeyCode::Enter);
    assert_eq!(drain(&mut rx).last(), Some(&send("C0", ":) thanks")));
    assert!(app.status.is_none());
}

// --- commands ---

#[test]
fn me_command_sends_italic_action() {
    let (mut app, mut rx) = connected_app();
    press(&mut app, KeyCode::Char('/'));
    type_str(&mut app, "me waves");
    press(&mut app, KeyCode::Enter);
    assert_eq!(drain(&mut rx).last(), Some(&send("C0", "_waves_")));
}

#[test]
fn palette_quit() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char(':'));
    press(&mut app, KeyCode::Char('q'));
    press(&mut app, KeyCode::Enter);
    assert!(app.should_quit);
}

#[test]
fn pick_command_with_filter_opens_filtered_picker() {
    let (mut app, _rx) = connected_app();
    type_str(&mut app, "/pick ran");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode, Mode::Pick);
    assert_eq!(app.buffer.text(), "ran");
    assert_eq!(app.picker.selected_entry().map(|e| e.label.as_str()), Some("work #random"));
}

#[test]
fn help_posts_notice_in_channel() {
    let (mut app, _rx) = connected_app();
    type_str(&mut app, "/help");
    press(&mut app, KeyCode::Enter);
    let history = app.active_connection().unwrap().message_history();
    let notice = history.last().unwrap();
    assert!(notice.sender.is_none());
    assert!(notice.text.contains("/pick /p :p :pick"));
}

#[test]
fn clear_empties_the_view() {
    let (mut app, _rx) = connected_app();
    send_client_event(&mut app, ClientEvent::MessageReceived { connection: 0, message: raw("C0", "U1", "x") });
    type_str(&mut app, ":clear");
    press(&mut app, KeyCode::Enter);
    assert!(app.active_connection().unwrap().message_history().is_empty());
}

// --- picking channels ---

#[test]
fn picker_lists_every_connection_channel_pair() {
    let (mut app, _rx) = connected_app();
    let _rx2 = add_connection(&mut app, "home", &["family"]);
    press(&mut app, KeyCode::Char('p'));
    assert_eq!(app.mode, Mode::Pick);
    let labels: Vec<_> = app.picker.entries().iter().map(|e| e.label.clone()).collect();
    assert_eq!(labels, vec!["work #general", "work #random", "home #family"]);
}

#[test]
fn picking_a_channel_selects_it_and_fetches_history() {
    let (mut app, mut rx) = connected_app();
    drain(&mut rx);
    press(&mut app, KeyCode::Char('p'));
    ctrl(&mut app, 'j');
    assert_eq!(
        app.picker.selected_entry().map(|e| e.item.clone()),
        Some(PickerItem::Channel { connection: 0, channel_id: "C1".into() })
    );
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, Mode::Chat);
    assert_eq!(
        app.active_connection().unwrap().selected_channel().map(|c| c.name.as_str()),
        Some("random")
    );
    assert_eq!(drain(&mut rx), vec![ConnectionCommand::FetchHistory { channel_id: "C1".into() }]);
    assert_eq!(app.saved.selected_channels.get("work").map(String::as_str), Some("random"));
}

#[test]
fn picking_on_another_connection_switches_active() {
    let (mut app, _rx) = connected_app();
    let _rx2 = add_connection(&mut app, "home", &["family"]);
    assert_eq!(app.active, Some(0));
    press(&mut app, KeyCode::Char('p'));
    type_str(&mut app, "fam");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.active, Some(1));
    assert_eq!(app.saved.active_connection.as_deref(), Some("home"));
}

#[test]
fn ctrl_p_in_pick_toggles_back() {
    let (mut app, _rx) = connected_app();
    press(&mut app, KeyCode::Char('p'));
    ctrl(&mut app, 'p');
    assert_eq!(app.mode, Mode::Chat);
    assert!(!app.picker.is_visible());
    assert!(app.picker.is_empty());
}

// --- history navigation ---

#[test]
fn j_and_k_walk_history_within_bounds() {
    let (mut app, _rx) = connected_app();
    for text in ["a", "b", "c"] {
        send_client_event(
            &mut app,
            ClientEvent::MessageReceived { connection: 0, message: raw("C0", "U1", text) },
        );
    }
    for _ in 0..5 {
        press(&mut app, KeyCode::Char('k'));
    }
    assert_eq!(app.cursor.selected(), 2);
    for _ in 0..5 {
        press(&mut app, KeyCode::Char('j'));
    }
    assert_eq!(app.cursor.selected(), 0);
}
