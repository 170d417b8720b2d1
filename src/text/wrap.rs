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

use super::{PartKind, PrintablePart, Row};
use unicode_width::UnicodeWidthChar;

/// Greedily wrap `parts` into rows no wider than `width` columns.
///
/// A part that overflows the current row is split on spaces: the longest
/// word prefix that still fits stays on this row and the remainder seeds the
/// next row as a part of the same kind. The space at the split point stays on
/// the upper row and counts toward its width, so concatenating every row
/// reproduces the input exactly.
///
/// A single word wider than a fresh row is broken at the column limit. With
/// `width <= 0` nothing fits, so each part is emitted undivided on its own row.
pub fn wrap_parts(parts: &[PrintablePart], width: isize) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    let mut row: Row = Vec::new();
    let mut row_width = 0usize;

    for part in parts {
        if part.kind == PartKind::Newline {
            rows.push(std::mem::take(&mut row));
            row_width = 0;
            continue;
        }

        // Walk the part as a shrinking slice so each row only measures what it keeps.
        let mut rest = part.content.as_str();
        let mut rest_width = part.width();
        while !rest.is_empty() {
            if fits(row_width + rest_width, width) {
                row.push(part.with_content(rest));
                row_width += rest_width;
                break;
            }

            let room = usize::try_from(width).unwrap_or(0).saturating_sub(row_width);
            if let Some((head, head_width)) = split_on_words(rest, room) {
                row.push(part.with_content(head));
                rows.push(std::mem::take(&mut row));
                row_width = 0;
                rest = &rest[head.len()..];
                rest_width = rest_width.saturating_sub(head_width);
            } else if !row.is_empty() {
                // Nothing fits beside what is already on this row: retry on a fresh one.
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            } else if room > 0 {
                let (head, head_width) = break_at_column(rest, room);
                rows.push(vec![part.with_content(head)]);
                rest = &rest[head.len()..];
                rest_width = rest_width.saturating_sub(head_width);
            } else {
                rows.push(vec![part.with_content(rest)]);
                break;
            }
        }
    }

    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

fn fits(total: usize, width: isize) -> bool {
    usize::try_from(width).is_ok_and(|w| total <= w)
}

/// Longest prefix of `content` ending in a space that fits in `room`
/// columns, with its width. A lone leading space does not count as a word
/// boundary. Stops scanning at the first column past `room`.
fn split_on_words(content: &str, room: usize) -> Option<(&str, usize)> {
    let mut used = 0usize;
    let mut split = None;
    for (idx, ch) in content.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > room {
            break;
        }
        if ch == ' ' && idx > 0 {
            split = Some((idx + 1, used));
        }
    }
    split.map(|(at, head_width)| (&content[..at], head_width))
}

/// Hard break for a word wider than a whole row. Always takes at least one
/// character so the caller makes progress.
fn break_at_column(content: &str, room: usize) -> (&str, usize) {
    let mut used = 0usize;
    let mut split_at = content.len();
    for (idx, ch) in content.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > room && idx > 0 {
            split_at = idx;
            break;
        }
        used += w;
    }
    (&content[..split_at], used)
}
