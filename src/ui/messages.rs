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
use crate::app::{App, Mode};
use crate::connection::{ConnectionStatus, Message};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

const INDENT: &str = "  ";

/// Draw the active channel bottom-up from the cursor's anchor and record how
/// many messages fit entirely.
pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    let height = usize::from(area.height);
    let (rows, fully_visible) = match app.active_connection() {
        Err(_) => (hint("No connection"), 0),
        Ok(conn) => match conn.selected_channel() {
            None => {
                let text = match &conn.status {
                    ConnectionStatus::Connecting => format!("Connecting to {}…", conn.name),
                    ConnectionStatus::Disconnected(reason) => {
                        format!("{} is disconnected: {reason}", conn.name)
                    }
                    ConnectionStatus::Connected => "Press p to pick a channel".to_owned(),
                };
                (hint(&text), 0)
            }
            Some(channel) if conn.message_history().is_empty() => {
                (hint(&format!("Nothing in #{} yet. Press w to write.", channel.name)), 0)
            }
            Some(_) => {
                let selected = (app.mode == Mode::Chat).then(|| app.cursor.selected());
                stack_rows(
                    conn.message_history(),
                    app.cursor.bottom(),
                    selected,
                    area.width,
                    height,
                    &app.time_format,
                )
            }
        },
    };

    let used = u16::try_from(rows.len()).unwrap_or(area.height).min(area.height);
    let target = Rect { y: area.y + area.height - used, height: used, ..area };
    frame.render_widget(Paragraph::new(rows), target);
    app.cursor.set_visible(fully_visible);
}

fn hint(text: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(text.to_owned(), Style::default().fg(theme::DIM)))
            .alignment(Alignment::Center),
    ]
}

/// Rows for the messages from `bottom` (counted back from the newest)
/// upward, cut at `height`. The topmost message may be partial.
fn stack_rows(
    history: &[Message],
    bottom: usize,
    selected: Option<usize>,
    width: u16,
    height: usize,
    time_format: &str,
) -> (Vec<Line<'static>>, usize) {
    let body_width = isize::try_from(width).unwrap_or(isize::MAX) - 2;
    let mut rows: Vec<Line<'static>> = Vec::with_capacity(height);
    let mut fully_visible = 0;

    for (offset, message) in history.iter().rev().enumerate().skip(bottom) {
        if rows.len() >= height {
            break;
        }
        let lines = message_lines(message, body_width, time_format, selected == Some(offset));
        let room = height - rows.len();
        if lines.len() > room {
            rows.extend(lines.into_iter().rev().take(room));
            break;
        }
        rows.extend(lines.into_iter().rev());
        fully_visible += 1;
    }
    rows.reverse();
    (rows, fully_visible)
}

fn message_lines(
    message: &Message,
    body_width: isize,
    time_format: &str,
    selected: bool,
) -> Vec<Line<'static>> {
    let time = message.sent_at.format(time_format).to_string();
    let sender = match &message.sender {
        Some(user) => Span::styled(
            user.name.clone(),
            Style::default().fg(theme::SENDER).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("*", Style::default().fg(theme::NOTICE).add_modifier(Modifier::BOLD)),
    };
    let header = vec![Span::styled(time, Style::default().fg(theme::DIM)), Span::raw(" "), sender];
    let mut lines = vec![Line::from(header)];

    for row in message.printable.lines(body_width).iter() {
        let mut spans = vec![Span::raw(INDENT)];
        spans.extend(row_spans(row));
        lines.push(Line::from(spans));
    }

    if selected {
        lines = lines.into_iter().map(|l| l.style(Style::default().bg(theme::SELECTED_BG))).collect();
    }
    lines
}
