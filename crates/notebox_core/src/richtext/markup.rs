//! Tag-pair toggling over a selection (bold, italic, ...).

use crate::richtext::{
    apply_splices, shift, MarkupAction, MarkupEdit, RichTextError, Selection, Splice,
};

/// Literal opening/closing tag pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub open: String,
    pub close: String,
}

impl TagPair {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// `<name>` / `</name>`.
    pub fn element(name: &str) -> Self {
        Self::new(format!("<{name}>"), format!("</{name}>"))
    }

    pub fn bold() -> Self {
        Self::element("b")
    }

    pub fn italic() -> Self {
        Self::element("i")
    }
}

/// What to do when the selection contains only one tag of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialTagPolicy {
    /// Remove the tag that was found (desktop editor behavior).
    #[default]
    RemoveFound,
    /// Insert the missing tag so the pair is complete.
    Complete,
}

/// Toggles `pair` over `selection` in `text`.
///
/// - Both tags inside the selection: the first opening and the last
///   closing tag are removed.
/// - Neither tag: the closing tag is inserted at `end`, then the opening
///   tag at `start`.
/// - Exactly one tag: handled according to `policy`.
pub fn toggle_tag(
    text: &str,
    selection: Selection,
    pair: &TagPair,
    policy: PartialTagPolicy,
) -> Result<MarkupEdit, RichTextError> {
    selection.validate(text)?;
    let selected = &text[selection.range()];
    let open_at = selected.find(&pair.open).map(|at| selection.start + at);
    let close_at = selected.rfind(&pair.close).map(|at| selection.start + at);

    let (splices, action) = match (open_at, close_at) {
        (Some(open), Some(close)) => (
            vec![
                Splice::remove(open..open + pair.open.len()),
                Splice::remove(close..close + pair.close.len()),
            ],
            MarkupAction::Unwrapped,
        ),
        (None, None) => (
            vec![
                Splice::insert(selection.end, pair.close.as_str()),
                Splice::insert(selection.start, pair.open.as_str()),
            ],
            MarkupAction::Wrapped,
        ),
        (Some(open), None) => match policy {
            PartialTagPolicy::RemoveFound => (
                vec![Splice::remove(open..open + pair.open.len())],
                MarkupAction::RemovedPartialTag,
            ),
            PartialTagPolicy::Complete => (
                vec![Splice::insert(selection.end, pair.close.as_str())],
                MarkupAction::CompletedPartialTag,
            ),
        },
        (None, Some(close)) => match policy {
            PartialTagPolicy::RemoveFound => (
                vec![Splice::remove(close..close + pair.close.len())],
                MarkupAction::RemovedPartialTag,
            ),
            PartialTagPolicy::Complete => (
                vec![Splice::insert(selection.start, pair.open.as_str())],
                MarkupAction::CompletedPartialTag,
            ),
        },
    };

    let (text, delta) = apply_splices(text, splices);
    Ok(MarkupEdit {
        text,
        selection: Selection::new(selection.start, shift(selection.end, delta)),
        action,
    })
}
