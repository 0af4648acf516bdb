use std::sync::LazyLock;

use regex::Regex;

const DRIVE_HOST_MARKERS: [&str; 2] = ["drive.google", "googleusercontent"];

static ID_QUERY_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)").expect("valid id query regex"));
static ID_PATH_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").expect("valid /d/ path regex"));

#[must_use]
pub fn is_drive_url(url: &str) -> bool {
    DRIVE_HOST_MARKERS.iter().any(|marker| url.contains(marker))
}

/// Rewrites Google Drive share links into an embeddable thumbnail URL.
///
/// Non-drive URLs, and drive URLs without a recognizable file id, come back
/// unchanged. Empty input yields `None`.
#[must_use]
pub fn normalize(url: Option<&str>) -> Option<String> {
    let url = url.filter(|url| !url.is_empty())?;
    if !is_drive_url(url) {
        return Some(url.to_owned());
    }

    match drive_file_id(url) {
        Some(id) => Some(thumbnail_url(id)),
        None => {
            tracing::debug!(url, "drive url without file id; keeping as-is");
            Some(url.to_owned())
        }
    }
}

fn drive_file_id(url: &str) -> Option<&str> {
    ID_QUERY_PARAM
        .captures(url)
        .or_else(|| ID_PATH_SEGMENT.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn thumbnail_url(id: &str) -> String {
    format!("https://drive.google.com/thumbnail?id={id}&sz=w1000")
}
