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

/// Messages kept between the selection and the top edge of the history view.
pub const LOOK_AHEAD: usize = 2;

/// Selection and scroll anchor over a channel's history. Both indices count
/// back from the newest message, so `0` is the latest one and the view is
/// drawn upward starting at `bottom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageCursor {
    selected: usize,
    bottom: usize,
    /// Messages that fit in the last rendered frame.
    visible: usize,
}

impl MessageCursor {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn bottom(&self) -> usize {
        self.bottom
    }

    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible;
    }

    pub fn is_following(&self) -> bool {
        self.selected == 0 && self.bottom == 0
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.bottom = 0;
    }

    /// `k`: one message back in time.
    pub fn move_older(&mut self, total: usize) {
        if self.selected + 1 >= total {
            return;
        }
        self.selected += 1;
        let window = self.visible.max(1);
        while self.bottom < self.selected && self.selected + LOOK_AHEAD >= self.bottom + window {
            self.bottom += 1;
        }
    }

    /// `j`: one message forward in time.
    pub fn move_newer(&mut self) {
        if self.selected == 0 {
            return;
        }
        self.selected -= 1;
        while self.bottom > 0 && self.selected < self.bottom + LOOK_AHEAD {
            self.bottom -= 1;
        }
    }

    /// Keep the view on the same messages when one arrives underneath a
    /// scrolled-back selection. At the newest message the view follows.
    pub fn message_appended(&mut self) {
        if !self.is_following() {
            self.selected += 1;
            self.bottom += 1;
        }
    }

    /// Pull indices back inside a history of `total` messages.
    pub fn clamp(&mut self, total: usize) {
        let last = total.saturating_sub(1);
        self.selected = self.selected.min(last);
        self.bottom = self.bottom.min(self.selected);
    }
}
