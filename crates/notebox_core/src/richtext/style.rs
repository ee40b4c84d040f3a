//! Inline `style` merging for font family/size changes.

use crate::richtext::html::{closing_tags, scan_tags, ElementStack};
use crate::richtext::{
    apply_splices, shift, MarkupAction, MarkupEdit, RichTextError, Selection, Splice,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::ops::Range;

static STYLE_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|\s)(style\s*=\s*(?:"([^"]*)"|'([^']*)'))"#).expect("valid style regex")
});

/// Font sizes offered by the size picker, in points.
pub const FONT_SIZES: [u16; 11] = [8, 9, 10, 11, 12, 14, 16, 18, 20, 22, 24];

/// One CSS declaration such as `font-size: 12pt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
    property: String,
    value: String,
}

impl StyleDeclaration {
    /// Property names are trimmed and lowercased; values are trimmed.
    pub fn new(property: &str, value: &str) -> Self {
        Self {
            property: property.trim().to_ascii_lowercase(),
            value: value.trim().to_string(),
        }
    }

    pub fn font_family(family: &str) -> Self {
        Self::new("font-family", family)
    }

    pub fn font_size(points: u16) -> Self {
        Self::new("font-size", &format!("{points}pt"))
    }

    /// Parses `name: value` with an optional trailing `;`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (property, value) = raw.trim().trim_end_matches(';').split_once(':')?;
        if property.trim().is_empty() || value.trim().is_empty() {
            return None;
        }
        Some(Self::new(property, value))
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// `name: value;`
    pub fn to_css(&self) -> String {
        format!("{}: {};", self.property, self.value)
    }
}

/// Merges `property: value` into an inline style string.
///
/// An existing declaration of the same property (case-insensitive) has
/// its value replaced in place and later duplicates are dropped; otherwise
/// the declaration is appended. Other declarations keep their order.
pub fn merge_style_declarations(style: &str, property: &str, value: &str) -> String {
    let property = property.trim().to_ascii_lowercase();
    let value = value.trim();
    let mut declarations: Vec<(String, String)> = Vec::new();
    let mut replaced = false;

    for raw in style.split(';') {
        let Some((name, current)) = raw.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if name.eq_ignore_ascii_case(&property) {
            if !replaced {
                declarations.push((property.clone(), value.to_string()));
                replaced = true;
            }
            continue;
        }
        declarations.push((name.to_string(), current.trim().to_string()));
    }
    if !replaced {
        declarations.push((property, value.to_string()));
    }

    declarations
        .iter()
        .map(|(name, current)| format!("{name}: {current};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Applies `declaration` to every text run inside `selection`.
///
/// A run whose innermost `<span>` has all of its content inside the
/// selection has that span's `style` attribute merged (created when
/// missing). The span's own tags may lie outside the selection. Any other
/// run is wrapped in a new `<span style="...">`.
pub fn apply_inline_style(
    text: &str,
    selection: Selection,
    declaration: &StyleDeclaration,
) -> Result<MarkupEdit, RichTextError> {
    selection.validate(text)?;
    if selection.is_empty() {
        return Err(RichTextError::EmptySelection);
    }

    let tags = scan_tags(text);
    let closes = closing_tags(&tags);
    let mut merged: BTreeSet<usize> = BTreeSet::new();
    let mut wrapped: Vec<Range<usize>> = Vec::new();

    let mut classify = |run: Range<usize>, stack: &ElementStack| {
        let clipped = run.start.max(selection.start)..run.end.min(selection.end);
        if clipped.is_empty() {
            return;
        }
        let covered_span = stack.innermost(&tags, "span").filter(|&open| {
            tags[open].range.end >= selection.start
                && closes[open]
                    .as_ref()
                    .is_some_and(|close| close.start <= selection.end)
        });
        match covered_span {
            Some(open) => {
                merged.insert(open);
            }
            None => wrapped.push(clipped),
        }
    };

    let mut stack = ElementStack::default();
    let mut cursor = 0;
    for index in 0..tags.len() {
        classify(cursor..tags[index].range.start, &stack);
        stack.feed(&tags, index);
        cursor = tags[index].range.end;
    }
    classify(cursor..text.len(), &stack);

    let action = MarkupAction::Styled {
        merged_spans: merged.len(),
        wrapped_runs: wrapped.len(),
    };
    let mut splices = Vec::with_capacity(merged.len() + wrapped.len() * 2);
    let mut start_delta = 0;
    for open in merged {
        let range = tags[open].range.clone();
        let rewritten = rewrite_open_tag(&text[range.clone()], declaration);
        if range.end <= selection.start {
            start_delta += rewritten.len() as isize - range.len() as isize;
        }
        splices.push(Splice {
            range,
            replacement: rewritten,
        });
    }
    let span_open = format!("<span style={}>", quote_attr(&declaration.to_css()));
    for run in wrapped {
        splices.push(Splice::insert(run.end, "</span>"));
        splices.push(Splice::insert(run.start, span_open.as_str()));
    }

    let (text, delta) = apply_splices(text, splices);
    Ok(MarkupEdit {
        text,
        selection: Selection::new(
            shift(selection.start, start_delta),
            shift(selection.end, delta),
        ),
        action,
    })
}

fn rewrite_open_tag(tag: &str, declaration: &StyleDeclaration) -> String {
    if let Some(caps) = STYLE_ATTR_RE.captures(tag) {
        let current = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str());
        let merged =
            merge_style_declarations(current, declaration.property(), declaration.value());
        let Some(attribute) = caps.get(1) else {
            return tag.to_string();
        };
        let mut out = tag.to_string();
        out.replace_range(attribute.range(), &format!("style={}", quote_attr(&merged)));
        return out;
    }

    let insert_at = if tag.ends_with("/>") {
        tag.len() - 2
    } else {
        tag.len() - 1
    };
    let mut out = tag.to_string();
    out.insert_str(
        insert_at,
        &format!(" style={}", quote_attr(&declaration.to_css())),
    );
    out
}

fn quote_attr(value: &str) -> String {
    if value.contains('"') {
        format!("'{value}'")
    } else {
        format!("\"{value}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_inline_style, merge_style_declarations, StyleDeclaration};
    use crate::richtext::{MarkupAction, RichTextError, Selection};

    #[test]
    fn merge_replaces_only_matching_property() {
        let merged = merge_style_declarations(
            "font-family: Arial; FONT-SIZE:12pt; color: red",
            "font-size",
            "14pt",
        );
        assert_eq!(merged, "font-family: Arial; font-size: 14pt; color: red;");
    }

    #[test]
    fn merge_appends_missing_property_and_drops_duplicates() {
        assert_eq!(
            merge_style_declarations("", "font-size", "9pt"),
            "font-size: 9pt;"
        );
        assert_eq!(
            merge_style_declarations("font-size: 8pt; font-size: 10pt;", "font-size", "9pt"),
            "font-size: 9pt;"
        );
    }

    #[test]
    fn plain_text_is_wrapped_in_a_new_span() {
        let edit = apply_inline_style(
            "one two",
            Selection::new(4, 7),
            &StyleDeclaration::font_size(12),
        )
        .unwrap();
        assert_eq!(edit.text, "one <span style=\"font-size: 12pt;\">two</span>");
        assert_eq!(edit.selection, Selection::new(4, edit.text.len()));
    }

    #[test]
    fn span_without_style_gets_a_style_attribute() {
        let text = "<span class=\"x\">hi</span>";
        let edit = apply_inline_style(
            text,
            Selection::new(0, text.len()),
            &StyleDeclaration::font_family("Serif"),
        )
        .unwrap();
        assert_eq!(
            edit.text,
            "<span class=\"x\" style=\"font-family: Serif;\">hi</span>"
        );
        assert_eq!(
            edit.action,
            MarkupAction::Styled {
                merged_spans: 1,
                wrapped_runs: 0
            }
        );
    }

    #[test]
    fn selection_inside_a_styled_span_nests_a_new_span() {
        let text = "<span style=\"font-size: 8pt;\">abcd</span>";
        let start = text.find("bc").unwrap();
        let edit = apply_inline_style(
            text,
            Selection::new(start, start + 2),
            &StyleDeclaration::font_size(20),
        )
        .unwrap();
        assert_eq!(
            edit.text,
            "<span style=\"font-size: 8pt;\">a<span style=\"font-size: 20pt;\">bc</span>d</span>"
        );
    }

    #[test]
    fn data_style_attribute_is_left_alone() {
        let text = "<span data-style=\"keep\">hi</span>";
        let edit = apply_inline_style(
            text,
            Selection::new(0, text.len()),
            &StyleDeclaration::font_size(12),
        )
        .unwrap();
        assert_eq!(
            edit.text,
            "<span data-style=\"keep\" style=\"font-size: 12pt;\">hi</span>"
        );
    }

    #[test]
    fn runs_split_by_tags_are_styled_separately() {
        let text = "a<b>c</b>";
        let edit = apply_inline_style(
            text,
            Selection::new(0, text.len()),
            &StyleDeclaration::font_size(10),
        )
        .unwrap();
        assert_eq!(
            edit.text,
            "<span style=\"font-size: 10pt;\">a</span><b><span style=\"font-size: 10pt;\">c</span></b>"
        );
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = apply_inline_style("abc", Selection::caret(1), &StyleDeclaration::font_size(8))
            .unwrap_err();
        assert!(matches!(err, RichTextError::EmptySelection));
    }

    #[test]
    fn parse_accepts_trailing_semicolon() {
        let decl = StyleDeclaration::parse(" Font-Size : 12pt; ").unwrap();
        assert_eq!(decl.property(), "font-size");
        assert_eq!(decl.value(), "12pt");
        assert!(StyleDeclaration::parse("nonsense").is_none());
    }
}
