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

mod emoji;
mod tokenize;
mod wrap;

pub use emoji::expand_shortcodes;
pub use tokenize::{decode_entities, tokenize};
pub use wrap::wrap_parts;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use unicode_width::UnicodeWidthChar;

/// Metadata key carrying a link target.
pub const HREF: &str = "Href";
/// Metadata key carrying the raw id of a mentioned user.
pub const USER_ID: &str = "UserId";
/// Metadata key carrying the raw id of a referenced channel.
pub const CHANNEL_ID: &str = "ChannelId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    PlainText,
    Bold,
    Italic,
    Preformatted,
    Code,
    Newline,
    AtMentionUser,
    AtMentionGroup,
    Channel,
    Link,
    Connection,
}

/// One typed, stylable fragment of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintablePart {
    pub kind: PartKind,
    pub content: String,
    pub metadata: Option<BTreeMap<String, String>>,
}

impl PrintablePart {
    pub fn new(kind: PartKind, content: impl Into<String>) -> Self {
        Self { kind, content: content.into(), metadata: None }
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(PartKind::PlainText, content)
    }

    pub fn newline() -> Self {
        Self::new(PartKind::Newline, String::new())
    }

    #[must_use]
    pub fn with_meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.get_or_insert_with(BTreeMap::new).insert(key.to_owned(), value.into());
        self
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.get(key)).map(String::as_str)
    }

    /// Same kind and metadata, different content. Used when a part is split
    /// across rows so formatting carries over.
    #[must_use]
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self { kind: self.kind, content: content.into(), metadata: self.metadata.clone() }
    }

    /// Display width in terminal columns, summed per char so any prefix
    /// measures the same as it does inside the wrapper.
    pub fn width(&self) -> usize {
        self.content.chars().map(|c| c.width().unwrap_or(0)).sum()
    }
}

/// A wrapped row of parts.
pub type Row = Vec<PrintablePart>;

#[derive(Debug)]
struct LineCache {
    width: isize,
    lines: Rc<Vec<Row>>,
}

/// Tokenized chat text plus a width-keyed cache of its wrapped rows.
#[derive(Debug, Default)]
pub struct PrintableMessage {
    parts: Vec<PrintablePart>,
    cache: RefCell<Option<LineCache>>,
}

impl PrintableMessage {
    pub fn new(parts: Vec<PrintablePart>) -> Self {
        Self { parts, cache: RefCell::new(None) }
    }

    pub fn parts(&self) -> &[PrintablePart] {
        &self.parts
    }

    /// Replace the parts. Drops any cached rows.
    pub fn set_parts(&mut self, parts: Vec<PrintablePart>) {
        self.parts = parts;
        self.cache.get_mut().take();
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Concatenated content of every part, markers and tags already stripped.
    pub fn plain_text(&self) -> String {
        self.parts.iter().map(|p| p.content.as_str()).collect()
    }

    /// Rows of parts wrapped to `width` columns. Repeated calls with the same
    /// width return the same `Rc`.
    pub fn lines(&self, width: isize) -> Rc<Vec<Row>> {
        if let Some(cache) = self.cache.borrow().as_ref()
            && cache.width == width
        {
            return Rc::clone(&cache.lines);
        }
        let lines = Rc::new(wrap_parts(&self.parts, width));
        *self.cache.borrow_mut() = Some(LineCache { width, lines: Rc::clone(&lines) });
        lines
    }
}

impl Clone for PrintableMessage {
    fn clone(&self) -> Self {
        Self::new(self.parts.clone())
    }
}

impl PartialEq for PrintableMessage {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl From<Vec<PrintablePart>> for PrintableMessage {
    fn from(parts: Vec<PrintablePart>) -> Self {
        Self::new(parts)
    }
}
