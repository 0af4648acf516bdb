//! JSON state files (cart, image overrides).

use std::path::Path;

use anyhow::Context as _;
use tokio::fs;

/// Reads a JSON file. A missing file is `Ok(None)`.
pub async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("read: {}", path.display())),
    };
    let value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse json: {}", path.display()))?;
    Ok(Some(value))
}

/// Writes through a uniquely named temp file and renames it into place.
pub async fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    let data = serde_json::to_vec_pretty(value).context("serialize json")?;
    fs::write(&tmp_path, &data)
        .await
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_none() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let value: Option<BTreeMap<String, String>> =
            read_json(&temp.path().join("absent.json")).await?;
        assert!(value.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn write_then_read_in_nested_dir() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("state").join("cart.json");
        write_json_atomic(&path, &vec![1, 2, 3]).await?;

        let back: Option<Vec<u32>> = read_json(&path).await?;
        assert_eq!(back, Some(vec![1, 2, 3]));

        let leftovers = std::fs::read_dir(path.parent().unwrap())?.count();
        assert_eq!(leftovers, 1);
        Ok(())
    }
}
