use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::drive_image;
use crate::formats::BookRecord;
use crate::store;

/// Manually assigned cover images, keyed by book title.
///
/// They are layered over freshly fetched records so a new upload shows up
/// before the sheet export catches up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOverrides {
    by_title: BTreeMap<String, String>,
}

impl ImageOverrides {
    #[must_use]
    pub fn get(&self, title: &str) -> Option<&str> {
        self.by_title.get(title).map(String::as_str)
    }

    pub fn set(&mut self, title: impl Into<String>, url: impl Into<String>) {
        self.by_title.insert(title.into(), url.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    #[must_use]
    pub fn apply(&self, mut books: Vec<BookRecord>) -> Vec<BookRecord> {
        for book in &mut books {
            let Some(url) = self.get(&book.title).filter(|url| !url.is_empty()) else {
                continue;
            };
            book.image = drive_image::normalize(Some(url));
            book.is_placeholder = book.image.is_none();
        }
        books
    }
}

#[derive(Debug, Clone)]
pub struct OverrideStore {
    path: PathBuf,
}

impl OverrideStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the overrides. An unreadable file is logged and treated as empty
    /// so a bad edit never blocks the catalog.
    pub async fn load(&self) -> ImageOverrides {
        match store::read_json::<BTreeMap<String, String>>(&self.path).await {
            Ok(by_title) => ImageOverrides {
                by_title: by_title.unwrap_or_default(),
            },
            Err(err) => {
                tracing::warn!(path = %self.path.display(), ?err, "ignoring unreadable image overrides");
                ImageOverrides::default()
            }
        }
    }

    /// Records one override. Unlike [`OverrideStore::load`], an unreadable file
    /// is an error here and is left untouched.
    pub async fn save_one(&self, title: &str, url: &str) -> anyhow::Result<()> {
        let mut by_title = store::read_json::<BTreeMap<String, String>>(&self.path)
            .await
            .with_context(|| format!("read image overrides: {}", self.path.display()))?
            .unwrap_or_default();
        by_title.insert(title.to_owned(), url.to_owned());
        store::write_json_atomic(&self.path, &by_title)
            .await
            .with_context(|| format!("write image overrides: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::build_all;

    #[test]
    fn overrides_replace_image_and_clear_placeholder() {
        let books = build_all("Title,Availability\nA,2\nB,3\n");
        let mut overrides = ImageOverrides::default();
        overrides.set("A", "https://drive.google.com/uc?export=view&id=F1");

        let books = overrides.apply(books);
        assert_eq!(
            books[0].image.as_deref(),
            Some("https://drive.google.com/thumbnail?id=F1&sz=w1000")
        );
        assert!(!books[0].is_placeholder);
        assert_eq!(books[1].image, None);
        assert!(books[1].is_placeholder);
    }

    #[test]
    fn empty_override_keeps_sheet_image() {
        let books = build_all("Title,Availability,Link\nA,2,https://example.com/a.jpg\n");
        let mut overrides = ImageOverrides::default();
        overrides.set("A", "");

        let books = overrides.apply(books);
        assert_eq!(books[0].image.as_deref(), Some("https://example.com/a.jpg"));
        assert!(!books[0].is_placeholder);
    }

    #[tokio::test]
    async fn saving_over_corrupt_file_fails_and_keeps_it() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("overrides.json");
        let corrupt = r#"{"A": "https://example.com/a.jpg",}"#;
        std::fs::write(&path, corrupt)?;

        let store = OverrideStore::new(&path);
        let err = store
            .save_one("B", "https://example.com/b.jpg")
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("read image overrides"));
        assert_eq!(std::fs::read_to_string(&path)?, corrupt);
        Ok(())
    }

    #[tokio::test]
    async fn store_round_trips_and_merges() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = OverrideStore::new(temp.path().join("overrides.json"));
        assert!(store.load().await.is_empty());

        store.save_one("A", "https://example.com/a.jpg").await?;
        store.save_one("B", "https://example.com/b.jpg").await?;

        let loaded = store.load().await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("A"), Some("https://example.com/a.jpg"));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_treated_as_empty() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("overrides.json");
        std::fs::write(&path, "{not json")?;
        assert!(OverrideStore::new(path).load().await.is_empty());
        Ok(())
    }
}
