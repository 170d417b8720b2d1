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

use super::keys::{dispatch_key, insert_str};
use super::state::{App, Mode};
use crate::connection::{ClientEvent, ConnectionStatus};
use crossterm::event::{Event, KeyEventKind};

pub fn handle_terminal_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
            dispatch_key(app, key);
        }
        Event::Paste(text) if matches!(app.mode, Mode::Writ | Mode::Pick) => {
            insert_str(app, &text);
        }
        Event::FocusGained => {
            app.force_redraw = true;
        }
        // Resize is handled automatically by ratatui
        _ => {}
    }
}

pub fn handle_client_event(app: &mut App, event: ClientEvent) {
    match event {
        ClientEvent::Connected { connection, session } => {
            let Some(handle) = app.connections.get_mut(connection) else {
                tracing::warn!(connection, "event for unknown connection");
                return;
            };
            handle.apply_session(session);
            restore_channel(app, connection);
        }
        ClientEvent::History { connection, channel_id, messages } => {
            let Some(handle) = app.connections.get_mut(connection) else { return };
            tracing::debug!(connection = %handle.name, %channel_id, count = messages.len(), "history");
            handle.set_history(&channel_id, messages);
            if app.active == Some(connection) {
                let total = app.visible_history_len();
                app.cursor.clamp(total);
            }
        }
        ClientEvent::MessageReceived { connection, message } => {
            let Some(handle) = app.connections.get_mut(connection) else { return };
            let on_screen = handle.push_message(message) && app.active == Some(connection);
            if on_screen {
                app.cursor.message_appended();
            }
        }
        ClientEvent::Typing { connection, channel_id, user_id } => {
            if let Some(handle) = app.connections.get_mut(connection) {
                handle.set_typing(channel_id, &user_id);
            }
        }
        ClientEvent::SendFailed { connection, error } => {
            let name = app.connections.get(connection).map_or("?", |c| c.name.as_str());
            let text = format!("{name}: {error}");
            app.set_error(&text);
        }
        ClientEvent::Disconnected { connection, reason } => {
            let Some(handle) = app.connections.get_mut(connection) else { return };
            handle.status = ConnectionStatus::Disconnected(reason.clone());
            let text = format!("{} disconnected: {reason}", handle.name);
            app.set_error(&text);
        }
    }
}

/// Reselect the channel saved for this connection, falling back to its first
/// channel. Leaves the active connection alone unless it was this one.
fn restore_channel(app: &mut App, connection: usize) {
    let Some(handle) = app.connections.get(connection) else { return };
    let saved = app
        .saved
        .selected_channels
        .get(&handle.name)
        .and_then(|name| handle.channel_by_name(name))
        .or_else(|| handle.channels().first())
        .map(|c| c.id.clone());
    let Some(channel_id) = saved else {
        tracing::info!(connection = %handle.name, "no channels to select");
        return;
    };

    let was_active = app.active;
    let cursor = app.cursor;
    let result = app.select_channel(connection, &channel_id);
    app.report(result);
    if let Some(active) = was_active.filter(|&active| active != connection) {
        app.active = Some(active);
        app.saved.active_connection = app.connections.get(active).map(|c| c.name.clone());
        app.cursor = cursor;
    }
}
