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

use super::{Channel, ChatService, RawMessage, ServiceEvent, Session, User};
use async_trait::async_trait;
use chrono::Local;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::Instant;

const BOT_ID: &str = "UECHO";
const TYPING_DELAY: Duration = Duration::from_millis(300);
const REPLY_DELAY: Duration = Duration::from_millis(900);

/// In-process service: keeps history in memory and, with `echo` on, has a
/// bot answer every message after a short typing pause.
pub struct LoopbackService {
    user: User,
    bot: User,
    channels: Vec<Channel>,
    echo: bool,
    history: HashMap<String, Vec<RawMessage>>,
    scheduled: VecDeque<(Instant, ServiceEvent)>,
}

impl LoopbackService {
    pub fn new(user_name: &str, channel_names: &[String], echo: bool) -> Self {
        let channels: Vec<Channel> = channel_names
            .iter()
            .enumerate()
            .map(|(i, name)| Channel {
                id: format!("C{i:03}"),
                name: name.trim_start_matches('#').to_owned(),
            })
            .collect();
        let user = User { id: "U000".to_owned(), name: user_name.to_owned() };
        let bot = User { id: BOT_ID.to_owned(), name: "echo".to_owned() };

        let mut history: HashMap<String, Vec<RawMessage>> = HashMap::new();
        if let Some(first) = channels.first() {
            let others = channels
                .iter()
                .skip(1)
                .map(|c| format!("<#{}|{}>", c.id, c.name))
                .collect::<Vec<_>>()
                .join(" ");
            let mut welcome = format!(
                "Welcome <@{}> :wave: This is *{}*. Press `p` to switch channels",
                user.id, first.name
            );
            if !others.is_empty() {
                welcome.push_str(&format!(", e.g. {others}"));
            }
            welcome.push('.');
            history.insert(first.id.clone(), vec![raw(&first.id, &bot.id, welcome)]);
        }

        Self { user, bot, channels, echo, history, scheduled: VecDeque::new() }
    }

    /// Queue `event` after `delay`, keeping the queue in deadline order.
    /// Events due at the same instant stay in the order they were scheduled.
    fn schedule(&mut self, delay: Duration, event: ServiceEvent) {
        let at = Instant::now() + delay;
        let pos = self.scheduled.partition_point(|(due, _)| *due <= at);
        self.scheduled.insert(pos, (at, event));
    }
}

fn raw(channel_id: &str, user_id: &str, text: String) -> RawMessage {
    RawMessage {
        id: uuid::Uuid::new_v4().to_string(),
        channel_id: channel_id.to_owned(),
        user_id: Some(user_id.to_owned()),
        text,
        sent_at: Local::now(),
    }
}

#[async_trait(?Send)]
impl ChatService for LoopbackService {
    async fn connect(&mut self) -> anyhow::Result<Session> {
        Ok(Session {
            self_user: self.user.clone(),
            channels: self.channels.clone(),
            users: vec![self.bot.clone()],
        })
    }

    async fn send_message(&mut self, channel_id: &str, text: &str) -> anyhow::Result<RawMessage> {
        if !self.channels.iter().any(|c| c.id == channel_id) {
            anyhow::bail!("unknown channel {channel_id}");
        }
        let message = raw(channel_id, &self.user.id, text.to_owned());
        self.history.entry(channel_id.to_owned()).or_default().push(message.clone());

        if self.echo {
            self.schedule(
                TYPING_DELAY,
                ServiceEvent::Typing { channel_id: channel_id.to_owned(), user_id: self.bot.id.clone() },
            );
            let reply = raw(channel_id, &self.bot.id, format!("<@{}> said: {text}", self.user.id));
            self.schedule(REPLY_DELAY, ServiceEvent::Message(reply));
        }
        Ok(message)
    }

    async fn send_typing(&mut self, _channel_id: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn history(&mut self, channel_id: &str) -> anyhow::Result<Vec<RawMessage>> {
        Ok(self.history.get(channel_id).cloned().unwrap_or_default())
    }

    async fn next_event(&mut self) -> Option<ServiceEvent> {
        // Only pop after the deadline so a cancelled wait loses nothing.
        let Some(&(at, _)) = self.scheduled.front() else {
            return std::future::pending().await;
        };
        tokio::time::sleep_until(at).await;
        let (_, event) = self.scheduled.pop_front()?;
        if let ServiceEvent::Message(message) = &event {
            self.history.entry(message.channel_id.clone()).or_default().push(message.clone());
        }
        Some(event)
    }
}
