//! Minimal HTML tag scanner for inline markup.
//!
//! Only element tags are recognized; a `<` not followed by a tag name is
//! plain text. Comments, doctype and entities are treated as text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)([^<>]*)>").expect("valid tag regex"));

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta", "wbr"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind {
    Open,
    Close,
    /// `<x/>` or a void element such as `<img>`.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag {
    pub kind: TagKind,
    /// Lowercase element name.
    pub name: String,
    /// Byte range of the whole tag, `<` through `>`.
    pub range: Range<usize>,
}

/// Returns every element tag in document order.
pub(crate) fn scan_tags(text: &str) -> Vec<Tag> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(2)?.as_str().to_ascii_lowercase();
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let attrs = caps.get(3).map_or("", |m| m.as_str());
            let kind = if closing {
                TagKind::Close
            } else if attrs.trim_end().ends_with('/') || VOID_ELEMENTS.contains(&name.as_str()) {
                TagKind::Empty
            } else {
                TagKind::Open
            };
            Some(Tag {
                kind,
                name,
                range: whole.range(),
            })
        })
        .collect()
}

/// Open-element stack used while walking tags in order.
#[derive(Debug, Default)]
pub(crate) struct ElementStack {
    open: Vec<usize>,
}

impl ElementStack {
    /// Feeds tag `index`; returns the index of the open tag a closing tag
    /// matched. Unmatched closing tags are ignored; elements left open
    /// inside a matched pair are implicitly closed.
    pub fn feed(&mut self, tags: &[Tag], index: usize) -> Option<usize> {
        let tag = &tags[index];
        match tag.kind {
            TagKind::Open => {
                self.open.push(index);
                None
            }
            TagKind::Empty => None,
            TagKind::Close => {
                let position = self
                    .open
                    .iter()
                    .rposition(|&open| tags[open].name == tag.name)?;
                let matched = self.open[position];
                self.open.truncate(position);
                Some(matched)
            }
        }
    }

    /// Innermost open element named `name`.
    pub fn innermost(&self, tags: &[Tag], name: &str) -> Option<usize> {
        self.open
            .iter()
            .rev()
            .copied()
            .find(|&open| tags[open].name == name)
    }
}

/// For every open tag, the byte range of its matching closing tag.
pub(crate) fn closing_tags(tags: &[Tag]) -> Vec<Option<Range<usize>>> {
    let mut closes = vec![None; tags.len()];
    let mut stack = ElementStack::default();
    for index in 0..tags.len() {
        if let Some(open) = stack.feed(tags, index) {
            closes[open] = Some(tags[index].range.clone());
        }
    }
    closes
}
