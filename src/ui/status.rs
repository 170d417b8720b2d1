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

use super::{row_spans, theme};
use crate::app::App;
use crate::connection::ConnectionStatus;
use crate::text::{CHANNEL_ID, PartKind, PrintableMessage, PrintablePart};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use std::time::Instant;

/// Where the user is, as message parts: connection then channel.
pub fn location(app: &App) -> PrintableMessage {
    let Ok(conn) = app.active_connection() else {
        return PrintableMessage::new(vec![PrintablePart::plain("not connected")]);
    };
    let mut parts = vec![PrintablePart::new(PartKind::Connection, conn.name.clone())];
    if let Some(channel) = conn.selected_channel() {
        parts.push(PrintablePart::plain(" "));
        parts.push(
            PrintablePart::new(PartKind::Channel, format!("#{}", channel.name))
                .with_meta(CHANNEL_ID, channel.id.clone()),
        );
    }
    PrintableMessage::new(parts)
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let location = location(app);
    let width = isize::try_from(area.width).unwrap_or(isize::MAX);
    let mut spans: Vec<Span<'static>> =
        location.lines(width).first().map(|row| row_spans(row)).unwrap_or_default();

    let detail = if let Some(status) = &app.status {
        let style = if status.is_error {
            Style::default().fg(theme::STATUS_ERROR)
        } else {
            Style::default().fg(theme::NOTICE)
        };
        Some(Span::styled(status.text.clone(), style))
    } else if let Some(user) = app.typing_user(Instant::now()) {
        Some(Span::styled(
            format!("{user} is typing…"),
            Style::default().fg(theme::DIM).add_modifier(Modifier::ITALIC),
        ))
    } else {
        app.active_connection().ok().and_then(|conn| match &conn.status {
            ConnectionStatus::Connecting => {
                Some(Span::styled("connecting…", Style::default().fg(theme::DIM)))
            }
            ConnectionStatus::Disconnected(_) => {
                Some(Span::styled("disconnected", Style::default().fg(theme::STATUS_ERROR)))
            }
            ConnectionStatus::Connected => None,
        })
    };
    if let Some(detail) = detail {
        spans.push(Span::raw("  "));
        spans.push(detail);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
