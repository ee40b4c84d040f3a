//! Inline HTML markup over a text selection.
//!
//! # Responsibility
//! - Toggle tag pairs (bold/italic) around a selection.
//! - Merge inline `style` declarations (font family/size) into the runs a
//!   selection covers.
//! - Embed local images as `data:` URIs.
//!
//! # Invariants
//! - Offsets are byte offsets into the raw HTML text and must sit on
//!   `char` boundaries outside of any tag.
//! - Every edit is applied from the highest offset down, so a closing
//!   insertion never shifts the offset of its opening insertion.
//! - Operations are pure: they return a new text and selection and leave
//!   the input untouched.

mod html;
pub mod image;
pub mod markup;
pub mod style;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::path::PathBuf;

pub use image::{image_data_uri, image_tag, insert_image, mime_for_path};
pub use markup::{toggle_tag, PartialTagPolicy, TagPair};
pub use style::{apply_inline_style, merge_style_declarations, StyleDeclaration, FONT_SIZES};

/// Error for rich-text markup operations.
#[derive(Debug)]
pub enum RichTextError {
    /// Selection is outside the text or not on a `char` boundary.
    InvalidSelection { start: usize, end: usize, len: usize },
    /// A selection boundary falls inside an HTML tag.
    SelectionInsideTag { offset: usize },
    /// Operation needs at least one selected character.
    EmptySelection,
    /// Reading an embedded resource failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for RichTextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSelection { start, end, len } => write!(
                f,
                "selection {start}..{end} is not valid for text of {len} bytes"
            ),
            Self::SelectionInsideTag { offset } => {
                write!(f, "selection boundary {offset} falls inside a tag")
            }
            Self::EmptySelection => write!(f, "selection is empty"),
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for RichTextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Byte range selected in the editor text. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Builds a selection from two anchors in either order.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self {
            start: anchor.min(head),
            end: anchor.max(head),
        }
    }

    /// Empty selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Checks bounds, `char` boundaries and tag interiors against `text`.
    pub fn validate(&self, text: &str) -> Result<(), RichTextError> {
        if self.end > text.len()
            || !text.is_char_boundary(self.start)
            || !text.is_char_boundary(self.end)
        {
            return Err(RichTextError::InvalidSelection {
                start: self.start,
                end: self.end,
                len: text.len(),
            });
        }
        for tag in html::scan_tags(text) {
            for offset in [self.start, self.end] {
                if tag.range.start < offset && offset < tag.range.end {
                    return Err(RichTextError::SelectionInsideTag { offset });
                }
            }
        }
        Ok(())
    }
}

/// What a markup operation did to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupAction {
    /// Opening and closing tags were inserted around the selection.
    Wrapped,
    /// Both tags were found in the selection and removed.
    Unwrapped,
    /// Only one tag was found and it was removed.
    RemovedPartialTag,
    /// Only one tag was found and the missing one was inserted.
    CompletedPartialTag,
    /// Style declaration merged into existing spans and new spans.
    Styled {
        merged_spans: usize,
        wrapped_runs: usize,
    },
    /// An image tag was inserted at the caret.
    ImageInserted,
}

/// Result of a markup operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupEdit {
    /// Full text after the edit.
    pub text: String,
    /// Selection covering the same logical content after the edit.
    pub selection: Selection,
    pub action: MarkupAction,
}

/// One replacement of `range` in the original text.
#[derive(Debug, Clone)]
struct Splice {
    range: Range<usize>,
    replacement: String,
}

impl Splice {
    fn insert(offset: usize, replacement: impl Into<String>) -> Self {
        Self {
            range: offset..offset,
            replacement: replacement.into(),
        }
    }

    fn remove(range: Range<usize>) -> Self {
        Self {
            range,
            replacement: String::new(),
        }
    }

    fn delta(&self) -> isize {
        self.replacement.len() as isize - self.range.len() as isize
    }
}

/// Applies non-overlapping splices from the highest offset down.
///
/// At equal start offsets the wider range goes first, so an insertion at
/// the start of a replaced tag lands in front of the rewritten tag.
fn apply_splices(text: &str, mut splices: Vec<Splice>) -> (String, isize) {
    splices.sort_by(|a, b| {
        b.range
            .start
            .cmp(&a.range.start)
            .then(b.range.end.cmp(&a.range.end))
    });
    let mut out = text.to_string();
    let mut delta = 0;
    for splice in splices {
        delta += splice.delta();
        out.replace_range(splice.range, &splice.replacement);
    }
    (out, delta)
}

fn shift(offset: usize, delta: isize) -> usize {
    offset.saturating_add_signed(delta)
}
