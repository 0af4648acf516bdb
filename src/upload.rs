use std::path::Path;

use anyhow::Context as _;
use base64::Engine as _;
use reqwest::header::CONTENT_TYPE;

use crate::formats::{UploadRequest, UploadResponse};

/// Uploads a cover image through the Drive upload script and returns its URL.
pub async fn upload_cover(
    client: &reqwest::Client,
    endpoint: &str,
    book_title: &str,
    image_path: &Path,
) -> anyhow::Result<String> {
    let mime_type = mime_type_for(image_path)?;
    let bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("read image: {}", image_path.display()))?;

    let request = UploadRequest {
        action: "upload".to_owned(),
        image: base64::engine::general_purpose::STANDARD.encode(&bytes),
        mime_type: mime_type.to_owned(),
        filename: upload_filename(book_title, chrono::Utc::now().timestamp_millis()),
        book_title: book_title.to_owned(),
    };
    let body = serde_json::to_string(&request).context("serialize upload request")?;

    tracing::info!(title = book_title, mime_type, bytes = bytes.len(), "uploading cover image");

    // The script endpoint rejects CORS preflights, so the JSON goes out as text/plain.
    let response = client
        .post(endpoint)
        .header(CONTENT_TYPE, "text/plain;charset=utf-8")
        .body(body)
        .send()
        .await
        .with_context(|| format!("POST {endpoint}"))?;

    let status = response.status();
    let raw = response.text().await.context("read upload response body")?;
    if !status.is_success() {
        anyhow::bail!("upload failed ({status}): {raw}");
    }

    let reply: UploadResponse = serde_json::from_str(&raw).context("parse upload response")?;
    if reply.status != "success" {
        let message = reply.message.unwrap_or_else(|| "unknown error from server".to_owned());
        anyhow::bail!("upload rejected: {message}");
    }
    reply
        .url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| anyhow::anyhow!("upload response has no url"))
}

pub fn mime_type_for(path: &Path) -> anyhow::Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => anyhow::bail!("not an image file: {}", path.display()),
    }
}

/// Title with everything outside ASCII alphanumerics and the Arabic block
/// replaced by `_`, suffixed with the upload time.
#[must_use]
pub fn upload_filename(title: &str, millis: i64) -> String {
    let safe = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || ('\u{0600}'..='\u{06FF}').contains(&c) {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();
    format!("{safe}_{millis}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_keep_latin_and_arabic_letters() {
        assert_eq!(upload_filename("Dune: Part 1", 42), "Dune__Part_1_42");
        assert_eq!(upload_filename("رواية الأيام", 7), "رواية_الأيام_7");
    }

    #[test]
    fn mime_types_follow_extension() {
        assert_eq!(mime_type_for(Path::new("a/cover.PNG")).unwrap(), "image/png");
        assert_eq!(mime_type_for(Path::new("cover.jpeg")).unwrap(), "image/jpeg");
        assert!(mime_type_for(Path::new("notes.txt")).is_err());
        assert!(mime_type_for(Path::new("cover")).is_err());
    }
}
