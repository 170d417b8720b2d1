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

use super::{CHANNEL_ID, HREF, PartKind, PrintableMessage, PrintablePart, USER_ID};
use crate::error::LookupError;
use crate::text::expand_shortcodes;

const PREFORMATTED: &str = "```";

/// Tokenize raw chat text into typed parts.
///
/// Shortcodes are expanded and `&amp;`/`&lt;`/`&gt;` decoded first, then the
/// text is scanned left to right for `<...>` tags, emphasis markers and
/// newlines. Never fails: a user the resolver cannot find renders as the raw
/// id, and a tag with no closing `>` stays literal text.
///
/// Emphasis does not nest and markers cannot be escaped. A marker only opens
/// a span when its closing marker appears later on the same line (anywhere
/// later for preformatted blocks); otherwise it is literal text. Tags are
/// recognized everywhere: a tag inside an open span splits the span around it,
/// and markers inside a tag body never open or close a span.
pub fn tokenize<F>(raw: &str, resolve_user: F) -> PrintableMessage
where
    F: Fn(&str) -> Result<String, LookupError>,
{
    let text = decode_entities(&expand_shortcodes(raw));
    let chars: Vec<char> = text.chars().collect();
    let mut out = PartSink::default();
    let mut span: Option<Span> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(end) = tag_end(&chars, i) {
            if let Some(open) = span.as_mut() {
                out.push_styled(open.kind, std::mem::take(&mut open.content));
            }
            let body: String = chars[i + 1..end].iter().collect();
            out.push(tag_part(&body, &resolve_user));
            i = end + 1;
            continue;
        }

        if let Some(open) = span.as_mut() {
            if starts_with(&chars, i, open.delimiter) {
                out.push_styled(open.kind, std::mem::take(&mut open.content));
                i += open.delimiter.len();
                span = None;
            } else if c == '\n' {
                // Only preformatted spans reach here; see `closing_marker_exists`.
                out.push_styled(open.kind, std::mem::take(&mut open.content));
                out.push(PrintablePart::newline());
                i += 1;
            } else {
                open.content.push(c);
                i += 1;
            }
            continue;
        }

        if c == '\n' {
            out.push(PrintablePart::newline());
            i += 1;
            continue;
        }

        if let Some((kind, delimiter)) = marker_at(&chars, i)
            && closing_marker_exists(&chars, i + delimiter.len(), kind, delimiter)
        {
            span = Some(Span { kind, delimiter, content: String::new() });
            i += delimiter.len();
            continue;
        }

        out.push_plain_char(c);
        i += 1;
    }

    out.finish()
}

/// Decode the three HTML entities chat services escape. Single pass, so
/// `&amp;lt;` becomes `&lt;` rather than `<`.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let (decoded, consumed) = if tail.starts_with("&amp;") {
            ('&', 5)
        } else if tail.starts_with("&lt;") {
            ('<', 4)
        } else if tail.starts_with("&gt;") {
            ('>', 4)
        } else {
            ('&', 1)
        };
        out.push(decoded);
        rest = &tail[consumed..];
    }
    out.push_str(rest);
    out
}

struct Span {
    kind: PartKind,
    delimiter: &'static str,
    content: String,
}

/// Accumulates parts, merging adjacent plain text.
#[derive(Default)]
struct PartSink {
    parts: Vec<PrintablePart>,
    plain: String,
}

impl PartSink {
    fn push_plain_char(&mut self, c: char) {
        self.plain.push(c);
    }

    fn flush_plain(&mut self) {
        if self.plain.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.plain);
        match self.parts.last_mut() {
            Some(last) if last.kind == PartKind::PlainText && last.metadata.is_none() => {
                last.content.push_str(&text);
            }
            _ => self.parts.push(PrintablePart::plain(text)),
        }
    }

    fn push(&mut self, part: PrintablePart) {
        self.flush_plain();
        self.parts.push(part);
    }

    fn push_styled(&mut self, kind: PartKind, content: String) {
        if !content.is_empty() {
            self.push(PrintablePart::new(kind, content));
        }
    }

    fn finish(mut self) -> PrintableMessage {
        self.flush_plain();
        PrintableMessage::new(self.parts)
    }
}

/// Index of the `>` closing a tag that opens at `at`. A tag body is never
/// empty and never starts with whitespace, which keeps decoded comparisons
/// like "a < b > c" out of tag parsing.
fn tag_end(chars: &[char], at: usize) -> Option<usize> {
    if chars.get(at) != Some(&'<') || chars.get(at + 1).is_none_or(|ch| ch.is_whitespace()) {
        return None;
    }
    let close = chars[at + 1..].iter().position(|&ch| ch == '>')?;
    (close > 0).then_some(at + 1 + close)
}

fn starts_with(chars: &[char], at: usize, pattern: &str) -> bool {
    let mut idx = at;
    for p in pattern.chars() {
        if chars.get(idx) != Some(&p) {
            return false;
        }
        idx += 1;
    }
    true
}

fn marker_at(chars: &[char], at: usize) -> Option<(PartKind, &'static str)> {
    if starts_with(chars, at, PREFORMATTED) {
        return Some((PartKind::Preformatted, PREFORMATTED));
    }
    match chars.get(at)? {
        '`' => Some((PartKind::Code, "`")),
        '*' => Some((PartKind::Bold, "*")),
        '_' => Some((PartKind::Italic, "_")),
        _ => None,
    }
}

fn closing_marker_exists(chars: &[char], from: usize, kind: PartKind, delimiter: &str) -> bool {
    let mut idx = from;
    while idx < chars.len() {
        if let Some(end) = tag_end(chars, idx) {
            idx = end + 1;
            continue;
        }
        if starts_with(chars, idx, delimiter) {
            return true;
        }
        if chars[idx] == '\n' && kind != PartKind::Preformatted {
            return false;
        }
        idx += 1;
    }
    false
}

fn split_label(body: &str) -> (&str, Option<&str>) {
    match body.split_once('|') {
        Some((target, label)) => (target, Some(label)),
        None => (body, None),
    }
}

fn tag_part<F>(body: &str, resolve_user: &F) -> PrintablePart
where
    F: Fn(&str) -> Result<String, LookupError>,
{
    if let Some(rest) = body.strip_prefix('@') {
        let (id, label) = split_label(rest);
        let name = match label {
            Some(label) => label.trim_start_matches('@').to_owned(),
            None => resolve_user(id).unwrap_or_else(|err| {
                tracing::debug!("mention lookup failed: {err}");
                id.to_owned()
            }),
        };
        return PrintablePart::new(PartKind::AtMentionUser, format!("@{name}"))
            .with_meta(USER_ID, id);
    }

    if let Some(rest) = body.strip_prefix('!') {
        let (name, label) = split_label(rest);
        let shown = label.unwrap_or(name).trim_start_matches('@');
        return PrintablePart::new(PartKind::AtMentionGroup, format!("@{shown}"));
    }

    if let Some(rest) = body.strip_prefix('#') {
        return match split_label(rest) {
            (id, Some(name)) => {
                PrintablePart::new(PartKind::Channel, format!("#{name}")).with_meta(CHANNEL_ID, id)
            }
            (name, None) => PrintablePart::new(PartKind::Channel, format!("#{name}")),
        };
    }

    let (url, label) = split_label(body);
    let shown = label.filter(|l| !l.is_empty()).unwrap_or(url);
    PrintablePart::new(PartKind::Link, shown).with_meta(HREF, url)
}
