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

/// Rows of the picker shown at once.
pub const PAGE_SIZE: usize = 10;

/// Subtracted from the rank of labels starting with `.`.
const HIDDEN_PENALTY: isize = 10;

/// A candidate paired with the label it is matched and rendered by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub item: T,
    pub label: String,
}

impl<T> Entry<T> {
    pub fn new(item: T, label: impl Into<String>) -> Self {
        Self { item, label: label.into() }
    }
}

/// Completion callback, run with the owning context once an entry is chosen.
pub type OnSelected<T, C> = Box<dyn FnOnce(&mut C, T)>;
/// Extra ordering pass run after the rank sort, given the full needle.
pub type OnResort<T> = Box<dyn Fn(&mut Vec<Entry<T>>, &str)>;

/// Ranked, scroll-windowed list of candidates filtered by a needle.
///
/// `selected` is an index into the current ordering; `bottom` is the first
/// row of the visible page. Both are clamped on every move and reset on
/// [`show`](Self::show) and whenever the needle changes.
pub struct SelectionInput<T, C> {
    entries: Vec<Entry<T>>,
    needle: String,
    throw_away_prefix_len: usize,
    selected: usize,
    bottom: usize,
    visible: bool,
    on_selected: Option<OnSelected<T, C>>,
    on_resort: Option<OnResort<T>>,
}

impl<T, C> Default for SelectionInput<T, C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            needle: String::new(),
            throw_away_prefix_len: 0,
            selected: 0,
            bottom: 0,
            visible: false,
            on_selected: None,
            on_resort: None,
        }
    }
}

impl<T, C> SelectionInput<T, C> {
    /// Replace the candidates. `throw_away_prefix_len` chars at the start of
    /// the needle are ignored when ranking (the `/` or `:` of a command).
    pub fn set_entries(&mut self, entries: Vec<Entry<T>>, throw_away_prefix_len: usize) {
        self.entries = entries;
        self.throw_away_prefix_len = throw_away_prefix_len;
        self.selected = 0;
        self.bottom = 0;
        self.resort();
    }

    pub fn set_on_resort(&mut self, on_resort: OnResort<T>) {
        self.on_resort = Some(on_resort);
        self.resort();
    }

    pub fn show(&mut self, on_selected: OnSelected<T, C>) {
        self.visible = true;
        self.selected = 0;
        self.bottom = 0;
        self.on_selected = Some(on_selected);
    }

    pub fn hide(&mut self) {
        self.entries.clear();
        self.needle.clear();
        self.throw_away_prefix_len = 0;
        self.selected = 0;
        self.bottom = 0;
        self.visible = false;
        self.on_selected = None;
        self.on_resort = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Update the filter, re-rank, and jump back to the top.
    pub fn set_needle(&mut self, needle: &str) {
        if self.needle == needle {
            return;
        }
        needle.clone_into(&mut self.needle);
        self.selected = 0;
        self.bottom = 0;
        self.resort();
    }

    fn search_term(&self) -> &str {
        self.needle
            .char_indices()
            .nth(self.throw_away_prefix_len)
            .map_or("", |(byte, _)| &self.needle[byte..])
    }

    /// Char position of the search term in `label`, or -1, minus a penalty
    /// for dot-prefixed labels.
    pub fn rank(&self, label: &str) -> isize {
        let found = label
            .find(self.search_term())
            .map_or(-1, |byte| isize::try_from(label[..byte].chars().count()).unwrap_or(isize::MAX));
        if label.starts_with('.') { found - HIDDEN_PENALTY } else { found }
    }

    /// Whether `label` contains the search term at all.
    pub fn matches(&self, label: &str) -> bool {
        label.contains(self.search_term())
    }

    pub fn any_match(&self) -> bool {
        self.entries.iter().any(|e| self.matches(&e.label))
    }

    fn resort(&mut self) {
        let mut entries = std::mem::take(&mut self.entries);
        // Stable: equal keys keep their order between keystrokes. Misses
        // always sink below matches, whatever the penalty did to the rank.
        entries.sort_by_cached_key(|e| {
            std::cmp::Reverse((self.matches(&e.label), self.rank(&e.label)))
        });
        if let Some(on_resort) = &self.on_resort {
            on_resort(&mut entries, &self.needle);
        }
        self.entries = entries;
    }

    pub fn move_up(&mut self) {
        if self.selected == 0 {
            return;
        }
        self.selected -= 1;
        if self.selected < self.bottom {
            self.bottom -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 >= self.entries.len() {
            return;
        }
        self.selected += 1;
        if self.selected >= self.bottom + PAGE_SIZE {
            self.bottom += 1;
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn bottom_index(&self) -> usize {
        self.bottom
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn selected_entry(&self) -> Option<&Entry<T>> {
        self.entries.get(self.selected)
    }

    /// The visible page as `(index, entry)` pairs, top row first.
    pub fn page(&self) -> impl Iterator<Item = (usize, &Entry<T>)> {
        self.entries.iter().enumerate().skip(self.bottom).take(PAGE_SIZE)
    }

    /// Take the completion callback and the highlighted item, then reset.
    /// `None` when hidden or empty; the picker is reset either way.
    pub fn take_selection(&mut self) -> Option<(OnSelected<T, C>, T)> {
        let picked = if self.visible && self.selected < self.entries.len() {
            let item = self.entries.swap_remove(self.selected).item;
            self.on_selected.take().map(|callback| (callback, item))
        } else {
            None
        };
        self.hide();
        picked
    }
}
