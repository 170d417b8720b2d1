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

pub mod loopback;

use crate::error::{CommandError, LookupError};
use crate::text::{PrintableMessage, PrintablePart, tokenize};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long a typing notification stays on the status line.
pub const TYPING_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// A message as a service delivers it, before tokenization.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub id: String,
    pub channel_id: String,
    pub user_id: Option<String>,
    pub text: String,
    pub sent_at: DateTime<Local>,
}

/// A tokenized message in a channel's history. `sender` is `None` for local
/// notices that never went through a service.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub sender: Option<User>,
    pub sent_at: DateTime<Local>,
    pub text: String,
    pub printable: PrintableMessage,
}

/// What a service reports once connected.
#[derive(Debug, Clone)]
pub struct Session {
    pub self_user: User,
    pub channels: Vec<Channel>,
    pub users: Vec<User>,
}

/// Events pushed by a service without a matching request.
#[derive(Debug, Clone)]
pub enum ServiceEvent {
    Message(RawMessage),
    Typing { channel_id: String, user_id: String },
}

/// Messages sent from connection drivers to the App/UI layer.
#[derive(Debug)]
pub enum ClientEvent {
    Connected { connection: usize, session: Session },
    History { connection: usize, channel_id: String, messages: Vec<RawMessage> },
    MessageReceived { connection: usize, message: RawMessage },
    Typing { connection: usize, channel_id: String, user_id: String },
    SendFailed { connection: usize, error: String },
    Disconnected { connection: usize, reason: String },
}

/// Requests queued by the App for a connection driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCommand {
    SendMessage { channel_id: String, text: String },
    Typing { channel_id: String },
    FetchHistory { channel_id: String },
    Shutdown,
}

/// A chat backend. Implementations only speak their own protocol; the driver
/// task translates between them and the App.
#[async_trait(?Send)]
pub trait ChatService {
    async fn connect(&mut self) -> anyhow::Result<Session>;
    async fn send_message(&mut self, channel_id: &str, text: &str) -> anyhow::Result<RawMessage>;
    async fn send_typing(&mut self, channel_id: &str) -> anyhow::Result<()>;
    async fn history(&mut self, channel_id: &str) -> anyhow::Result<Vec<RawMessage>>;
    /// Next unsolicited event. Must be cancel safe. `None` ends the inbound stream.
    async fn next_event(&mut self) -> Option<ServiceEvent>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected(String),
}

#[derive(Debug, Clone)]
pub struct TypingIndicator {
    pub user: String,
    pub channel_id: String,
    pub since: Instant,
}

/// App-side view of one connection: directory, selection, history, and the
/// outgoing queue to its driver.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub index: usize,
    pub name: String,
    pub status: ConnectionStatus,
    pub typing: Option<TypingIndicator>,
    self_user: Option<User>,
    channels: Vec<Channel>,
    users: HashMap<String, User>,
    selected_channel: Option<String>,
    history: HashMap<String, Vec<Message>>,
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
}

impl ConnectionHandle {
    pub fn new(
        index: usize,
        name: impl Into<String>,
        command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            status: ConnectionStatus::Connecting,
            typing: None,
            self_user: None,
            channels: Vec::new(),
            users: HashMap::new(),
            selected_channel: None,
            history: HashMap::new(),
            command_tx,
        }
    }

    pub fn apply_session(&mut self, session: Session) {
        self.users = session.users.into_iter().map(|u| (u.id.clone(), u)).collect();
        self.users.insert(session.self_user.id.clone(), session.self_user.clone());
        self.self_user = Some(session.self_user);
        self.channels = session.channels;
        self.status = ConnectionStatus::Connected;
        if self.selected_channel.as_ref().is_some_and(|id| self.channel(id).is_none()) {
            self.selected_channel = None;
        }
    }

    pub fn self_user(&self) -> Option<&User> {
        self.self_user.as_ref()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn channel_by_name(&self, name: &str) -> Option<&Channel> {
        let name = name.trim_start_matches('#');
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn selected_channel(&self) -> Option<&Channel> {
        self.selected_channel.as_deref().and_then(|id| self.channel(id))
    }

    /// Select a channel and ask the driver for its history.
    pub fn select_channel(&mut self, channel_id: &str) -> Result<(), CommandError> {
        if self.channel(channel_id).is_none() {
            return Err(CommandError::Usage(format!("no channel `{channel_id}` on {}", self.name)));
        }
        self.selected_channel = Some(channel_id.to_owned());
        self.send(ConnectionCommand::FetchHistory { channel_id: channel_id.to_owned() })
    }

    /// History of the selected channel, oldest first.
    pub fn message_history(&self) -> &[Message] {
        self.selected_channel
            .as_deref()
            .and_then(|id| self.history.get(id))
            .map_or(&[], Vec::as_slice)
    }

    pub fn resolve_user(&self, id: &str) -> Result<User, LookupError> {
        self.users.get(id).cloned().ok_or_else(|| LookupError::UnknownUser(id.to_owned()))
    }

    fn to_message(&self, raw: RawMessage) -> Message {
        let printable = tokenize(&raw.text, |id| self.resolve_user(id).map(|u| u.name));
        let sender = raw.user_id.as_deref().map(|id| {
            self.resolve_user(id).unwrap_or_else(|_| User { id: id.to_owned(), name: id.to_owned() })
        });
        Message {
            id: raw.id,
            channel_id: raw.channel_id,
            sender,
            sent_at: raw.sent_at,
            text: raw.text,
            printable,
        }
    }

    /// Replace a channel's history with freshly fetched messages.
    pub fn set_history(&mut self, channel_id: &str, raw: Vec<RawMessage>) {
        let messages = raw.into_iter().map(|m| self.to_message(m)).collect();
        self.history.insert(channel_id.to_owned(), messages);
    }

    /// Append an incoming message. Returns true when it landed in the
    /// selected channel.
    pub fn push_message(&mut self, raw: RawMessage) -> bool {
        let sender = raw.user_id.as_deref().and_then(|id| self.users.get(id));
        if self.typing.as_ref().is_some_and(|t| {
            t.channel_id == raw.channel_id && sender.is_some_and(|u| u.name == t.user)
        }) {
            self.typing = None;
        }
        let message = self.to_message(raw);
        let in_selected = self.selected_channel.as_deref() == Some(message.channel_id.as_str());
        self.history.entry(message.channel_id.clone()).or_default().push(message);
        in_selected
    }

    /// Append a local notice to the selected channel. Returns false when no
    /// channel is selected.
    pub fn push_notice(&mut self, parts: Vec<PrintablePart>) -> bool {
        let Some(channel_id) = self.selected_channel.clone() else {
            return false;
        };
        let printable = PrintableMessage::new(parts);
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.clone(),
            sender: None,
            sent_at: Local::now(),
            text: printable.plain_text(),
            printable,
        };
        self.history.entry(channel_id).or_default().push(message);
        true
    }

    /// Drop the local copy of the selected channel's history.
    pub fn clear_history(&mut self) {
        if let Some(id) = self.selected_channel.as_deref()
            && let Some(messages) = self.history.get_mut(id)
        {
            messages.clear();
        }
    }

    pub fn set_typing(&mut self, channel_id: String, user_id: &str) {
        let user = self.resolve_user(user_id).map_or_else(|_| user_id.to_owned(), |u| u.name);
        self.typing = Some(TypingIndicator { user, channel_id, since: Instant::now() });
    }

    /// Name of whoever is typing in the selected channel, if still fresh.
    pub fn typing_in_selected(&self, now: Instant) -> Option<&str> {
        let typing = self.typing.as_ref()?;
        let fresh = now.saturating_duration_since(typing.since) < TYPING_TTL;
        (fresh && self.selected_channel.as_deref() == Some(typing.channel_id.as_str()))
            .then_some(typing.user.as_str())
    }

    /// Queue `text` for the selected channel.
    pub fn send_message(&self, text: &str) -> Result<(), CommandError> {
        let channel = self.selected_channel().ok_or(CommandError::NoChannel)?;
        self.send(ConnectionCommand::SendMessage {
            channel_id: channel.id.clone(),
            text: text.to_owned(),
        })
    }

    pub fn send_typing(&self) -> Result<(), CommandError> {
        let channel = self.selected_channel().ok_or(CommandError::NoChannel)?;
        self.send(ConnectionCommand::Typing { channel_id: channel.id.clone() })
    }

    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    fn send(&self, command: ConnectionCommand) -> Result<(), CommandError> {
        self.command_tx.send(command).map_err(|_| CommandError::ConnectionClosed(self.name.clone()))
    }
}

/// Spawn the driver task for `service` on the current `LocalSet`.
pub fn spawn(
    index: usize,
    name: &str,
    service: Box<dyn ChatService>,
    event_tx: mpsc::UnboundedSender<ClientEvent>,
) -> ConnectionHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let driver_name = name.to_owned();
    tokio::task::spawn_local(async move {
        drive(index, &driver_name, service, command_rx, event_tx).await;
    });
    ConnectionHandle::new(index, name, command_tx)
}

enum Step {
    Command(Option<ConnectionCommand>),
    Event(Option<ServiceEvent>),
}

async fn drive(
    connection: usize,
    name: &str,
    mut service: Box<dyn ChatService>,
    mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
    event_tx: mpsc::UnboundedSender<ClientEvent>,
) {
    tracing::info!(connection = name, "connecting");
    match service.connect().await {
        Ok(session) => {
            tracing::info!(
                connection = name,
                channels = session.channels.len(),
                users = session.users.len(),
                "connected"
            );
            let _ = event_tx.send(ClientEvent::Connected { connection, session });
        }
        Err(err) => {
            tracing::error!(connection = name, "connect failed: {err:#}");
            let _ = event_tx.send(ClientEvent::Disconnected { connection, reason: err.to_string() });
            return;
        }
    }

    let mut inbound_open = true;
    loop {
        let step = tokio::select! {
            command = command_rx.recv() => Step::Command(command),
            event = service.next_event(), if inbound_open => Step::Event(event),
        };

        let outcome = match step {
            Step::Command(None | Some(ConnectionCommand::Shutdown)) => break,
            Step::Command(Some(command)) => {
                handle_command(connection, service.as_mut(), command, &event_tx).await
            }
            Step::Event(Some(ServiceEvent::Message(message))) => {
                event_tx.send(ClientEvent::MessageReceived { connection, message }).map_err(drop)
            }
            Step::Event(Some(ServiceEvent::Typing { channel_id, user_id })) => {
                event_tx.send(ClientEvent::Typing { connection, channel_id, user_id }).map_err(drop)
            }
            Step::Event(None) => {
                tracing::debug!(connection = name, "inbound stream closed");
                inbound_open = false;
                Ok(())
            }
        };
        if outcome.is_err() {
            tracing::debug!(connection = name, "app event channel closed");
            break;
        }
    }
    tracing::info!(connection = name, "driver stopped");
}

async fn handle_command(
    connection: usize,
    service: &mut dyn ChatService,
    command: ConnectionCommand,
    event_tx: &mpsc::UnboundedSender<ClientEvent>,
) -> Result<(), ()> {
    let event = match command {
        ConnectionCommand::SendMessage { channel_id, text } => {
            match service.send_message(&channel_id, &text).await {
                Ok(message) => ClientEvent::MessageReceived { connection, message },
                Err(err) => {
                    tracing::warn!("send to {channel_id} failed: {err:#}");
                    ClientEvent::SendFailed { connection, error: err.to_string() }
                }
            }
        }
        ConnectionCommand::Typing { channel_id } => {
            if let Err(err) = service.send_typing(&channel_id).await {
                tracing::debug!("typing notification to {channel_id} failed: {err:#}");
            }
            return Ok(());
        }
        ConnectionCommand::FetchHistory { channel_id } => match service.history(&channel_id).await
        {
            Ok(messages) => ClientEvent::History { connection, channel_id, messages },
            Err(err) => {
                tracing::warn!("history for {channel_id} failed: {err:#}");
                ClientEvent::SendFailed { connection, error: err.to_string() }
            }
        },
        ConnectionCommand::Shutdown => return Ok(()),
    };
    event_tx.send(event).map_err(drop)
}
