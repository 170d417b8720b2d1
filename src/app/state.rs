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

use super::buffer::CommandBuffer;
use super::commands::CommandRegistry;
use super::history::MessageCursor;
use super::picker::{Entry, SelectionInput};
use crate::connection::{ClientEvent, ConnectionHandle};
use crate::error::CommandError;
use crate::persist::SavedState;
use crate::text::{PartKind, PrintablePart};
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Browsing history.
    #[default]
    Chat,
    /// Composing a message or a `/`/`:` command.
    Writ,
    /// Channel picker.
    Pick,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Chat => "CHAT",
            Self::Writ => "WRIT",
            Self::Pick => "PICK",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerItem {
    Channel { connection: usize, channel_id: String },
    Command(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Channels,
    Palette,
}

pub type Picker = SelectionInput<PickerItem, App>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    pub mode: Mode,
    pub buffer: CommandBuffer,
    pub picker: Picker,
    pub picker_kind: PickerKind,
    pub cursor: MessageCursor,
    pub commands: CommandRegistry,
    pub connections: Vec<ConnectionHandle>,
    /// Index into `connections` that receives sends and is shown.
    pub active: Option<usize>,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    /// `chrono` format string for message timestamps.
    pub time_format: String,
    pub saved: SavedState,
    pub event_tx: mpsc::UnboundedSender<ClientEvent>,
    pub event_rx: mpsc::UnboundedReceiver<ClientEvent>,
    /// Force a full terminal clear on next render frame.
    pub force_redraw: bool,
}

impl App {
    pub fn new(commands: CommandRegistry, time_format: String, saved: SavedState) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            mode: Mode::Chat,
            buffer: CommandBuffer::default(),
            picker: Picker::default(),
            picker_kind: PickerKind::Channels,
            cursor: MessageCursor::default(),
            commands,
            connections: Vec::new(),
            active: None,
            status: None,
            should_quit: false,
            time_format,
            saved,
            event_tx,
            event_rx,
            force_redraw: false,
        }
    }

    /// Built-in commands, default time format, empty saved state, no connections.
    pub fn test_default() -> Self {
        Self::new(CommandRegistry::with_builtins(), "%H:%M".to_owned(), SavedState::default())
    }

    pub fn add_connection(&mut self, handle: ConnectionHandle) {
        if self.active.is_none() {
            self.active = Some(self.connections.len());
        }
        self.connections.push(handle);
    }

    pub fn active_connection(&self) -> Result<&ConnectionHandle, CommandError> {
        self.active.and_then(|i| self.connections.get(i)).ok_or(CommandError::NoConnection)
    }

    pub fn active_connection_mut(&mut self) -> Result<&mut ConnectionHandle, CommandError> {
        self.active.and_then(|i| self.connections.get_mut(i)).ok_or(CommandError::NoConnection)
    }

    pub fn connection_by_name(&self, name: &str) -> Option<usize> {
        self.connections.iter().position(|c| c.name == name)
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage { text: text.into(), is_error: false });
    }

    pub fn set_error(&mut self, err: &impl std::fmt::Display) {
        let text = err.to_string();
        tracing::warn!("{text}");
        self.status = Some(StatusMessage { text, is_error: true });
    }

    pub fn report(&mut self, result: Result<(), CommandError>) {
        if let Err(err) = result {
            self.set_error(&err);
        }
    }

    /// Clear the command bar, hide the picker, and go back to chat.
    pub fn reset_command_bar(&mut self) {
        self.buffer.clear();
        self.picker.hide();
        self.set_mode(Mode::Chat);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(from = self.mode.label(), to = mode.label(), "mode change");
            self.mode = mode;
        }
    }

    /// Show a local notice in the selected channel, or on the status line
    /// when there is nowhere to put it.
    pub fn notice(&mut self, parts: Vec<PrintablePart>) {
        let shown = self.active_connection_mut().is_ok_and(|conn| conn.push_notice(parts.clone()));
        if shown {
            self.cursor.message_appended();
        } else {
            let text: String = parts
                .iter()
                .map(|p| if p.kind == PartKind::Newline { "  " } else { p.content.as_str() })
                .collect();
            self.set_info(text);
        }
    }

    /// Switch to `channel_id` on `connection` and remember the choice.
    pub fn select_channel(&mut self, connection: usize, channel_id: &str) -> Result<(), CommandError> {
        let handle = self.connections.get_mut(connection).ok_or(CommandError::NoConnection)?;
        handle.select_channel(channel_id)?;
        let channel_name = handle.selected_channel().map(|c| c.name.clone());
        let connection_name = handle.name.clone();
        tracing::info!(connection = %connection_name, channel = ?channel_name, "channel selected");

        self.active = Some(connection);
        self.cursor.reset();
        self.saved.active_connection = Some(connection_name.clone());
        if let Some(name) = channel_name {
            self.saved.selected_channels.insert(connection_name, name);
        }
        Ok(())
    }

    /// Enter pick mode listing every channel of every connected connection.
    pub fn open_channel_picker(&mut self, filter: Option<&str>) {
        let entries = self
            .connections
            .iter()
            .flat_map(|conn| {
                conn.channels().iter().map(move |ch| {
                    Entry::new(
                        PickerItem::Channel { connection: conn.index, channel_id: ch.id.clone() },
                        format!("{} #{}", conn.name, ch.name),
                    )
                })
            })
            .collect();

        self.buffer.clear();
        self.set_mode(Mode::Pick);
        self.picker.hide();
        self.picker.set_entries(entries, 0);
        self.picker_kind = PickerKind::Channels;
        self.picker.show(Box::new(|app: &mut Self, item| {
            if let PickerItem::Channel { connection, channel_id } = item {
                let result = app.select_channel(connection, &channel_id);
                app.report(result);
            }
        }));
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            self.buffer.set_text(filter);
            self.picker.set_needle(filter);
        }
    }

    /// Messages in the active connection's selected channel.
    pub fn visible_history_len(&self) -> usize {
        self.active_connection().map_or(0, |c| c.message_history().len())
    }

    /// Fresh typing indicator for the channel on screen.
    pub fn typing_user(&self, now: Instant) -> Option<&str> {
        self.active_connection().ok().and_then(|c| c.typing_in_selected(now))
    }
}
