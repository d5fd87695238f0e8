/// How an uploaded artifact is routed through ingestion, decided by
/// filename extension alone. No content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaClass {
    Image,
    Video,
    Generic,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mpeg", "webm", "avi"];

impl MediaClass {
    pub fn from_filename(filename: &str) -> Self {
        let ext = extension_of(filename);
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            MediaClass::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaClass::Video
        } else {
            MediaClass::Generic
        }
    }

    pub fn needs_vision(&self) -> bool {
        matches!(self, MediaClass::Image | MediaClass::Video)
    }
}

/// Lowercased extension without the dot; empty when the name has none.
pub fn extension_of(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

pub fn mime_type_of(filename: &str) -> &'static str {
    match extension_of(filename).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(MediaClass::from_filename("photo.JPG"), MediaClass::Image);
        assert_eq!(MediaClass::from_filename("photo.jpg"), MediaClass::Image);
        assert_eq!(MediaClass::from_filename("clip.MP4"), MediaClass::Video);
        assert_eq!(MediaClass::from_filename("clip.webm"), MediaClass::Video);
    }

    #[test]
    fn test_unknown_and_missing_extensions_are_generic() {
        assert_eq!(MediaClass::from_filename("report.pdf"), MediaClass::Generic);
        assert_eq!(MediaClass::from_filename("notes"), MediaClass::Generic);
        assert_eq!(MediaClass::from_filename(".gitignore"), MediaClass::Generic);
        assert_eq!(MediaClass::from_filename(""), MediaClass::Generic);
    }

    #[test]
    fn test_needs_vision() {
        assert!(MediaClass::Image.needs_vision());
        assert!(MediaClass::Video.needs_vision());
        assert!(!MediaClass::Generic.needs_vision());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.PNG"), "png");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("noext"), "");
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type_of("x.jpeg"), "image/jpeg");
        assert_eq!(mime_type_of("x.webp"), "image/webp");
        assert_eq!(mime_type_of("x.bin"), "application/octet-stream");
    }
}
