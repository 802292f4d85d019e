//! Small helpers shared by the exporters.

use std::path::Path;

/// Turn a display string into a filename token.
///
/// Spaces become underscores and `/` is removed. Nothing else is touched, so
/// characters like `:` or `"` pass through unchanged.
///
/// ```
/// assert_eq!(booksmith::filename("My Book/Part One"), "My_BookPart_One");
/// ```
pub fn filename(name: &str) -> String {
    name.replace(' ', "_").replace('/', "")
}

/// Get a time-based seed value for pseudo-random identifiers.
pub(crate) fn time_seed_nanos() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(12345)
}

/// Generate a random-looking UUID v4 string (not cryptographically secure).
pub(crate) fn uuid_v4() -> String {
    let mut state = time_seed_nanos();
    let mut bytes = [0u8; 16];
    for byte in &mut bytes {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        *byte = (state >> 33) as u8;
    }

    // Set version (4) and variant (2)
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Guess media type from file extension.
pub(crate) fn guess_media_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xhtml" | "html" | "htm" => "application/xhtml+xml",
        "css" => "text/css",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// File extension (with dot) for an image media type.
pub(crate) fn extension_for_media_type(media_type: &str) -> &'static str {
    match media_type {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/svg+xml" => ".svg",
        "image/webp" => ".webp",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_filename() {
        assert_eq!(filename("My Book/Part One"), "My_BookPart_One");
        assert_eq!(filename("a//b  c"), "ab__c");
        assert_eq!(filename("Title: \"Quoted\""), "Title:_\"Quoted\"");
        assert_eq!(filename(""), "");
    }

    #[test]
    fn test_uuid_v4_shape() {
        let id = uuid_v4();
        assert_eq!(id.len(), 36);
        assert_eq!(id.as_bytes()[14], b'4');
        assert_eq!(id.matches('-').count(), 4);
    }

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type("cover.JPG"), "image/jpeg");
        assert_eq!(guess_media_type("images/pic.png"), "image/png");
        assert_eq!(guess_media_type("noext"), "application/octet-stream");
    }

    proptest! {
        #[test]
        fn filename_has_no_space_or_slash(name in ".*") {
            let out = filename(&name);
            prop_assert!(!out.contains(' '));
            prop_assert!(!out.contains('/'));
        }

        #[test]
        fn filename_is_identity_without_space_or_slash(name in "[^ /]*") {
            prop_assert_eq!(filename(&name), name);
        }
    }
}
