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

mod command_bar;
mod layout;
mod messages;
mod picker;
mod status;
pub mod theme;

use crate::app::App;
use crate::text::PrintablePart;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, app: &mut App) {
    let areas = layout::compute(frame.area());

    messages::render(frame, areas.messages, app);
    render_separator(frame, areas.separator);
    status::render(frame, areas.status, app);
    command_bar::render(frame, areas.command, app);

    // Picker floats above the command bar, over the history
    if app.picker.is_visible() {
        picker::render(frame, areas.command, app);
    }
}

fn render_separator(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let line = theme::SEPARATOR_CHAR.repeat(usize::from(area.width));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(line, Style::default().fg(theme::DIM)))),
        area,
    );
}

/// One wrapped row of message parts as styled spans.
pub(crate) fn row_spans(row: &[PrintablePart]) -> Vec<Span<'static>> {
    row.iter()
        .map(|part| Span::styled(part.content.clone(), theme::part_style(part.kind)))
        .collect()
}
