// slick - A modal terminal chat client
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use super::commands::{self, is_command_prefix, is_palette_token};
use super::state::{App, Mode, PickerKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A guarded transition. Rules are tried in table order; the first whose
/// guard holds runs and the rest are skipped.
pub struct KeyRule {
    pub name: &'static str,
    guard: fn(&App, &KeyEvent) -> bool,
    action: fn(&mut App, KeyEvent),
}

pub const RULES: &[KeyRule] = &[
    KeyRule { name: "quit", guard: |_, k| is_ctrl(k, 'c'), action: |app, _| app.should_quit = true },
    KeyRule { name: "cancel", guard: |_, k| k.code == KeyCode::Esc, action: cancel },
    KeyRule {
        name: "toggle_picker",
        guard: |app, k| is_ctrl(k, 'p') || (app.mode == Mode::Chat && is_plain(k, 'p')),
        action: toggle_picker,
    },
    KeyRule {
        name: "start_writ",
        guard: |app, k| app.mode == Mode::Chat && is_plain(k, 'w'),
        action: |app, _| {
            app.buffer.clear();
            app.status = None;
            app.set_mode(Mode::Writ);
        },
    },
    KeyRule {
        name: "start_command",
        guard: |app, k| {
            app.mode == Mode::Chat && matches!(k.code, KeyCode::Char(c) if is_command_prefix(c))
        },
        action: |app, k| {
            app.buffer.clear();
            app.status = None;
            app.set_mode(Mode::Writ);
            if let KeyCode::Char(c) = k.code {
                insert_char(app, c);
            }
        },
    },
    KeyRule {
        name: "history_older",
        guard: |app, k| app.mode == Mode::Chat && (is_plain(k, 'k') || k.code == KeyCode::Up),
        action: |app, _| {
            let total = app.visible_history_len();
            app.cursor.move_older(total);
        },
    },
    KeyRule {
        name: "history_newer",
        guard: |app, k| app.mode == Mode::Chat && (is_plain(k, 'j') || k.code == KeyCode::Down),
        action: |app, _| app.cursor.move_newer(),
    },
    KeyRule {
        name: "picker_down",
        guard: |app, k| app.picker.is_visible() && (is_ctrl(k, 'j') || k.code == KeyCode::Down),
        action: |app, _| app.picker.move_down(),
    },
    KeyRule {
        name: "picker_up",
        guard: |app, k| app.picker.is_visible() && (is_ctrl(k, 'k') || k.code == KeyCode::Up),
        action: |app, _| app.picker.move_up(),
    },
    KeyRule {
        name: "cursor_left",
        guard: |app, k| editing(app) && (k.code == KeyCode::Left || is_ctrl(k, 'h')),
        action: |app, _| app.buffer.move_left(),
    },
    KeyRule {
        name: "cursor_right",
        guard: |app, k| editing(app) && (k.code == KeyCode::Right || is_ctrl(k, 'l')),
        action: |app, _| app.buffer.move_right(),
    },
    KeyRule {
        name: "cursor_home",
        guard: |app, k| editing(app) && (k.code == KeyCode::Home || is_ctrl(k, 'a')),
        action: |app, _| app.buffer.move_home(),
    },
    KeyRule {
        name: "cursor_end",
        guard: |app, k| editing(app) && (k.code == KeyCode::End || is_ctrl(k, 'e')),
        action: |app, _| app.buffer.move_end(),
    },
    KeyRule {
        name: "delete_word",
        guard: |app, k| editing(app) && is_ctrl(k, 'w'),
        action: |app, _| {
            app.buffer.delete_word_back();
            after_edit(app);
        },
    },
    KeyRule {
        name: "backspace",
        guard: |app, k| editing(app) && k.code == KeyCode::Backspace,
        action: |app, _| {
            if app.buffer.backspace() {
                after_edit(app);
            } else {
                app.reset_command_bar();
            }
        },
    },
    KeyRule {
        name: "submit",
        guard: |app, k| editing(app) && k.code == KeyCode::Enter,
        action: |app, _| submit(app),
    },
    KeyRule {
        name: "insert",
        guard: |app, k| {
            editing(app)
                && matches!(k.code, KeyCode::Char(_))
                && is_printable_text_modifiers(k.modifiers)
        },
        action: |app, k| {
            if let KeyCode::Char(c) = k.code {
                insert_char(app, c);
            }
        },
    },
];

/// Run the first matching rule. Returns false when no rule matched.
pub fn dispatch_key(app: &mut App, key: KeyEvent) -> bool {
    let Some(rule) = RULES.iter().find(|rule| (rule.guard)(app, &key)) else {
        return false;
    };
    tracing::trace!(rule = rule.name, mode = app.mode.label(), "key rule");
    (rule.action)(app, key);
    true
}

fn editing(app: &App) -> bool {
    matches!(app.mode, Mode::Writ | Mode::Pick)
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && !key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SUPER)
        && matches!(key.code, KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
}

fn is_plain(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c) && is_printable_text_modifiers(key.modifiers)
}

/// Shift and AltGr (reported as Ctrl+Alt on Windows) still produce text.
fn is_printable_text_modifiers(modifiers: KeyModifiers) -> bool {
    let ctrl_alt = KeyModifiers::CONTROL | KeyModifiers::ALT;
    modifiers.difference(KeyModifiers::SHIFT).is_empty()
        || modifiers.difference(KeyModifiers::SHIFT) == ctrl_alt
}

fn cancel(app: &mut App, _key: KeyEvent) {
    app.reset_command_bar();
}

fn toggle_picker(app: &mut App, _key: KeyEvent) {
    if app.mode == Mode::Pick {
        app.reset_command_bar();
    } else {
        app.open_channel_picker(None);
    }
}

/// Insert at the cursor. In writ mode this also pings the active connection
/// with a typing notification.
pub fn insert_char(app: &mut App, c: char) {
    app.buffer.insert(c);
    if app.mode == Mode::Writ
        && let Ok(conn) = app.active_connection()
        && let Err(err) = conn.send_typing()
    {
        tracing::debug!("typing notification dropped: {err}");
    }
    after_edit(app);
}

/// Paste a block of text as if typed, with one typing notification.
pub fn insert_str(app: &mut App, text: &str) {
    for c in text.chars().filter(|c| !c.is_control()) {
        app.buffer.insert(c);
    }
    if app.mode == Mode::Writ
        && let Ok(conn) = app.active_connection()
        && let Err(err) = conn.send_typing()
    {
        tracing::debug!("typing notification dropped: {err}");
    }
    after_edit(app);
}

/// Keep the picker in step with the buffer.
fn after_edit(app: &mut App) {
    let text = app.buffer.text();
    match app.mode {
        Mode::Pick if app.picker_kind == PickerKind::Channels => app.picker.set_needle(&text),
        Mode::Writ => refresh_palette(app, &text),
        _ => {}
    }
}

fn refresh_palette(app: &mut App, text: &str) {
    let palette_open = app.picker.is_visible() && app.picker_kind == PickerKind::Palette;
    if !is_palette_token(text) {
        if palette_open {
            app.picker.hide();
        }
        return;
    }
    if !palette_open {
        commands::open_palette(app);
    }
    app.picker.set_needle(text);
    if !app.picker.any_match() {
        app.picker.hide();
    }
}

/// Enter: run the picker's choice if it is showing, otherwise submit the
/// buffer in writ mode. The command bar is back in chat mode afterwards
/// unless the action itself moved it.
fn submit(app: &mut App) {
    let text = app.buffer.text();
    let mode = app.mode;
    let picked = app.picker.take_selection();
    app.reset_command_bar();

    if let Some((on_selected, item)) = picked {
        on_selected(app, item);
    } else if mode == Mode::Writ {
        let result = submit_text(app, &text);
        app.report(result);
    }
}

fn submit_text(app: &mut App, text: &str) -> Result<(), crate::error::CommandError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    if commands::is_invocation(&app.commands, trimmed) {
        return commands::dispatch(app, trimmed);
    }
    app.active_connection()?.send_message(text)?;
    app.cursor.reset();
    Ok(())
}
