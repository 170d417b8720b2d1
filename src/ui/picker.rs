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
use crate::app::picker::PAGE_SIZE;
use crate::app::{App, PickerItem, PickerKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

/// Max overlay width (characters).
const MAX_WIDTH: u16 = 72;

/// Render the picker page as a floating overlay above the command bar.
#[allow(clippy::cast_possible_truncation)]
pub fn render(frame: &mut Frame, command_area: Rect, app: &App) {
    let picker = &app.picker;
    let rows = picker.len().clamp(1, PAGE_SIZE) as u16;
    let height = (rows + 2).min(command_area.y);
    if height < 3 {
        return;
    }
    let width = command_area.width.min(MAX_WIDTH);
    let area = Rect { x: command_area.x, y: command_area.y - height, width, height };

    let mut lines: Vec<Line<'static>> = Vec::with_capacity(usize::from(rows));
    for (index, entry) in picker.page() {
        let selected = index == picker.selected_index();
        let mut spans = vec![if selected {
            Span::styled(" ▸ ", Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD))
        } else {
            Span::raw("   ")
        }];
        let label_style = if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(entry.label.clone(), label_style));

        if let PickerItem::Command(name) = &entry.item
            && let Some(command) = app.commands.get(name)
        {
            spans.push(Span::styled(
                format!("  {}", command.permutations.join(" ")),
                Style::default().fg(theme::ACCENT),
            ));
            if let Some(hint) = &command.argument_hint {
                spans.push(Span::styled(format!(" {hint}"), Style::default().fg(theme::DIM)));
            }
            spans.push(Span::styled(
                format!("  {}", command.description),
                Style::default().fg(theme::DIM),
            ));
        }
        lines.push(Line::from(spans));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("   no matches", Style::default().fg(theme::DIM))));
    }

    let what = match app.picker_kind {
        PickerKind::Channels => "Channels",
        PickerKind::Palette => "Commands",
    };
    let title = format!(" {what} ({}) ", picker.len());
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(theme::DIM)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::DIM));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
