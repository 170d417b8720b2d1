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

use crate::text::PartKind;
use ratatui::style::{Color, Modifier, Style};

// Accent
pub const ACCENT: Color = Color::Rgb(244, 118, 0);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const PROMPT_CHAR: &str = "❯";
pub const SEPARATOR_CHAR: &str = "─";
pub const SELECTED_BG: Color = Color::Rgb(40, 44, 52);

// Mode tags
pub const MODE_CHAT: Color = Color::Blue;
pub const MODE_WRIT: Color = Color::Green;
pub const MODE_PICK: Color = Color::Magenta;

pub const STATUS_ERROR: Color = Color::Red;
pub const SENDER: Color = Color::White;
pub const NOTICE: Color = Color::Yellow;

const CODE_FG: Color = Color::Rgb(230, 150, 120);
const CODE_BG: Color = Color::Rgb(30, 30, 30);
const MENTION: Color = Color::Cyan;
const GROUP_MENTION: Color = Color::Yellow;
const CHANNEL: Color = Color::LightBlue;

/// Style for one kind of message part.
pub fn part_style(kind: PartKind) -> Style {
    let base = Style::default();
    match kind {
        PartKind::PlainText | PartKind::Newline => base,
        PartKind::Bold => base.add_modifier(Modifier::BOLD),
        PartKind::Italic => base.add_modifier(Modifier::ITALIC),
        PartKind::Preformatted => base.fg(Color::Gray).bg(CODE_BG),
        PartKind::Code => base.fg(CODE_FG).bg(CODE_BG),
        PartKind::AtMentionUser => base.fg(MENTION).add_modifier(Modifier::BOLD),
        PartKind::AtMentionGroup => base.fg(GROUP_MENTION).add_modifier(Modifier::BOLD),
        PartKind::Channel => base.fg(CHANNEL).add_modifier(Modifier::BOLD),
        PartKind::Link => base.fg(CHANNEL).add_modifier(Modifier::UNDERLINED),
        PartKind::Connection => base.fg(ACCENT).add_modifier(Modifier::BOLD),
    }
}

pub fn mode_color(mode: crate::app::Mode) -> Color {
    use crate::app::Mode;
    match mode {
        Mode::Chat => MODE_CHAT,
        Mode::Writ => MODE_WRIT,
        Mode::Pick => MODE_PICK,
    }
}
