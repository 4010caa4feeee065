//! MIME type detection for captured frames.

use std::path::Path;

/// Detect an image MIME type by file extension. `None` for non-images.
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_common_image_types() {
        assert_eq!(image_mime_type(Path::new("max.JPG")), Some("image/jpeg"));
        assert_eq!(image_mime_type(Path::new("frames/001.png")), Some("image/png"));
        assert_eq!(image_mime_type(Path::new("notes.txt")), None);
        assert_eq!(image_mime_type(Path::new("README")), None);
    }
}
