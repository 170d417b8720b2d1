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

use ratatui::layout::{Constraint, Layout, Rect};

pub struct AppLayout {
    pub messages: Rect,
    pub separator: Rect,
    pub status: Rect,
    pub command: Rect,
}

pub fn compute(area: Rect) -> AppLayout {
    if area.height < 4 {
        // Too short for chrome: history and the command bar only
        let [messages, command] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        let zero = Rect::new(area.x, command.y, area.width, 0);
        return AppLayout { messages, separator: zero, status: zero, command };
    }
    let [messages, separator, status, command] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);
    AppLayout { messages, separator, status, command }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn total_height(layout: &AppLayout) -> u16 {
        layout.messages.height + layout.separator.height + layout.status.height + layout.command.height
    }

    #[test]
    fn normal_layout_fills_area() {
        let layout = compute(Rect::new(0, 0, 80, 24));
        assert_eq!(total_height(&layout), 24);
        assert_eq!(layout.messages.height, 21);
        assert_eq!(layout.command.y, 23);
    }

    #[test]
    fn tiny_terminal_keeps_command_bar() {
        let layout = compute(Rect::new(0, 0, 80, 3));
        assert_eq!(layout.command.height, 1);
        assert_eq!(layout.status.height, 0);
        assert_eq!(total_height(&layout), 3);
    }

    #[test]
    fn zero_height_does_not_panic() {
        let layout = compute(Rect::new(0, 0, 80, 0));
        assert_eq!(layout.messages.height, 0);
    }
}
