//! Inline image embedding as `data:` URIs.

use crate::richtext::{apply_splices, MarkupAction, MarkupEdit, RichTextError, Selection, Splice};
use base64::Engine;
use log::info;
use std::path::Path;

/// Guesses an image MIME type from the file extension; defaults to PNG.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}

/// `data:{mime};base64,{payload}`
pub fn image_data_uri(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{payload}")
}

/// Inline `<img>` tag referencing the embedded bytes.
pub fn image_tag(mime: &str, bytes: &[u8]) -> String {
    format!("<img src='{}'/>", image_data_uri(mime, bytes))
}

/// Reads the image at `path` and inserts it at `caret` in `text`.
///
/// The returned selection is a caret just after the inserted tag.
pub fn insert_image(text: &str, caret: usize, path: &Path) -> Result<MarkupEdit, RichTextError> {
    Selection::caret(caret).validate(text)?;
    let bytes = std::fs::read(path).map_err(|source| RichTextError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mime = mime_for_path(path);
    let tag = image_tag(mime, &bytes);
    let inserted_len = tag.len();
    let (text, _) = apply_splices(text, vec![Splice::insert(caret, tag)]);
    info!(
        "event=image_insert module=richtext status=ok mime={mime} bytes={}",
        bytes.len()
    );
    Ok(MarkupEdit {
        text,
        selection: Selection::caret(caret + inserted_len),
        action: MarkupAction::ImageInserted,
    })
}

#[cfg(test)]
mod tests {
    use super::{image_data_uri, insert_image, mime_for_path};
    use crate::richtext::{RichTextError, Selection};
    use std::path::Path;

    #[test]
    fn data_uri_uses_standard_base64() {
        assert_eq!(image_data_uri("image/png", b"hi!"), "data:image/png;base64,aGkh");
    }

    #[test]
    fn mime_defaults_to_png() {
        assert_eq!(mime_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.unknown")), "image/png");
    }

    #[test]
    fn insert_places_tag_at_caret() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.gif");
        std::fs::write(&path, b"hi!").unwrap();

        let edit = insert_image("ab", 1, &path).unwrap();
        let expected_tag = "<img src='data:image/gif;base64,aGkh'/>";
        assert_eq!(edit.text, format!("a{expected_tag}b"));
        assert_eq!(edit.selection, Selection::caret(1 + expected_tag.len()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = insert_image("", 0, &dir.path().join("none.png")).unwrap_err();
        assert!(matches!(err, RichTextError::Io { .. }));
    }
}
