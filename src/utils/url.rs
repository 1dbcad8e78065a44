// src/utils/url.rs

//! URL manipulation utilities.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Shortest token accepted as a Drive file identifier.
pub const MIN_DRIVE_ID_LEN: usize = 10;

/// Identifier patterns in priority order; the first match wins.
static DRIVE_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"/file/d/([a-zA-Z0-9_-]+)/view",
        r"/file/d/([a-zA-Z0-9_-]+)",
        r"/d/([a-zA-Z0-9_-]+)",
        r"id=([a-zA-Z0-9_-]+)",
        r"/open\?id=([a-zA-Z0-9_-]+)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Extract domain from a URL.
///
/// # Examples
/// ```
/// use on2cook_media::utils::url::get_domain;
///
/// assert_eq!(
///     get_domain("https://Drive.Google.com/file/d/abc"),
///     Some("drive.google.com".to_string())
/// );
/// ```
pub fn get_domain(url: &str) -> Option<String> {
    let scheme_end = url.find("://")?;
    let after_scheme = &url[scheme_end + 3..];
    let authority = after_scheme.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?.split(':').next()?;
    if host.is_empty() {
        return None;
    }
    Some(host.to_lowercase())
}

/// Whether a locator is a Google Drive share-style URL.
///
/// Links pasted without a scheme (`drive.google.com/file/d/...`) count too.
pub fn is_drive_url(locator: &str) -> bool {
    let host = if locator.contains("://") {
        get_domain(locator)
    } else {
        get_domain(&format!("https://{}", locator.trim()))
    };
    matches!(
        host.as_deref(),
        Some("drive.google.com" | "docs.google.com")
    )
}

/// Extract the Drive file identifier embedded in a share URL.
///
/// Tokens shorter than [`MIN_DRIVE_ID_LEN`] are treated as a failed extraction.
pub fn extract_drive_id(locator: &str) -> Option<String> {
    let id = DRIVE_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(locator))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())?;

    (id.len() >= MIN_DRIVE_ID_LEN).then(|| id.to_string())
}

/// Shorten a URL for log display without splitting a grapheme.
pub fn truncate_for_display(url: &str, max_graphemes: usize) -> String {
    let mut graphemes = url.graphemes(true);
    let head: String = graphemes.by_ref().take(max_graphemes).collect();
    if graphemes.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "1aX9vQm3Lr7TqKp2WcZ8nBdE4fHjU6yRs";

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("https://Example.COM/path"),
            Some("example.com".to_string())
        );
        assert_eq!(
            get_domain("https://user@host.io:8080?x=1"),
            Some("host.io".to_string())
        );
        assert_eq!(get_domain("invalid-url"), None);
    }

    #[test]
    fn test_is_drive_url() {
        assert!(is_drive_url(&format!("https://drive.google.com/file/d/{ID}/view")));
        assert!(is_drive_url("https://docs.google.com/uc?id=abc"));
        assert!(!is_drive_url("https://images.unsplash.com/photo-1.jpg"));
        assert!(!is_drive_url("assets/drive.google.com.png"));
        assert!(is_drive_url(&format!("drive.google.com/file/d/{ID}/view")));
        assert!(is_drive_url("Drive.Google.com:443/open?id=abc"));
        assert!(!is_drive_url("assets/on2cook-placeholder.png"));
    }

    #[test]
    fn test_extract_drive_id_patterns() {
        let forms = [
            format!("https://drive.google.com/file/d/{ID}/view?usp=sharing"),
            format!("https://drive.google.com/file/d/{ID}"),
            format!("https://drive.google.com/d/{ID}"),
            format!("https://drive.google.com/uc?export=view&id={ID}"),
            format!("https://drive.google.com/open?id={ID}"),
        ];
        for form in &forms {
            assert_eq!(extract_drive_id(form).as_deref(), Some(ID), "{form}");
        }
    }

    #[test]
    fn test_extract_drive_id_rejects_short_token() {
        assert_eq!(extract_drive_id("https://drive.google.com/file/d/abc123/view"), None);
        assert_eq!(extract_drive_id("https://drive.google.com/drive/folders"), None);
    }

    #[test]
    fn test_truncate_for_display() {
        assert_eq!(truncate_for_display("https://a.io", 50), "https://a.io");
        assert_eq!(truncate_for_display("abcdef", 3), "abc...");
        assert_eq!(truncate_for_display("naïve-é", 5), "naïve...");
    }
}
