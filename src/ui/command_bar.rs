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

use super::theme;
use crate::app::{App, Mode};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CHAT_HINT: &str = "w write · p pick · : command · j/k scroll · ctrl-c quit";

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let tag = format!(" {} ", app.mode.label());
    let tag_style = Style::default()
        .fg(ratatui::style::Color::Black)
        .bg(theme::mode_color(app.mode))
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::styled(tag.clone(), tag_style), Span::raw(" ")];

    if app.mode == Mode::Chat {
        spans.push(Span::styled(CHAT_HINT, Style::default().fg(theme::DIM)));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        return;
    }

    let prompt = format!("{} ", theme::PROMPT_CHAR);
    let prefix_width = tag.width() + 1 + prompt.width();
    spans.push(Span::styled(prompt, Style::default().fg(theme::mode_color(app.mode))));

    let room = usize::from(area.width).saturating_sub(prefix_width);
    let (visible, cursor_col) = scroll_to_cursor(&app.buffer.text(), app.buffer.cursor_column(), room);
    spans.push(Span::raw(visible));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let x = u16::try_from(prefix_width + cursor_col).unwrap_or(u16::MAX);
    if x < area.width {
        frame.set_cursor_position(Position::new(area.x + x, area.y));
    }
}

/// Cut `text` so the cursor column stays inside `room` columns. Returns the
/// visible slice and the cursor's column within it.
fn scroll_to_cursor(text: &str, cursor_col: usize, room: usize) -> (String, usize) {
    if room == 0 {
        return (String::new(), 0);
    }
    let skip = cursor_col.saturating_sub(room - 1);
    let mut skipped = 0;
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if skipped < skip {
            skipped += w;
            continue;
        }
        if used + w > room {
            break;
        }
        used += w;
        out.push(c);
    }
    (out, cursor_col - skipped.min(cursor_col))
}
