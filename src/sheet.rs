use std::path::PathBuf;

use anyhow::Context as _;
use async_trait::async_trait;
use url::Url;

use crate::formats::BookRecord;
use crate::overrides::ImageOverrides;
use crate::records;

/// Where the inventory CSV comes from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_csv(&self) -> anyhow::Result<String>;

    fn describe(&self) -> String;
}

/// The published CSV export of the inventory spreadsheet.
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpSheetSource {
    pub fn new(client: reqwest::Client, url: &str) -> anyhow::Result<Self> {
        let url = Url::parse(url).with_context(|| format!("parse sheet url: {url}"))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("sheet url must be http/https: {url}");
        }
        Ok(Self { client, url })
    }
}

/// Adds a timestamp parameter so intermediate caches never serve a stale export.
#[must_use]
pub fn cache_busted(url: &Url, millis: i64) -> Url {
    let mut url = url.clone();
    url.query_pairs_mut().append_pair("_t", &millis.to_string());
    url
}

#[async_trait]
impl CatalogSource for HttpSheetSource {
    async fn fetch_csv(&self) -> anyhow::Result<String> {
        let url = cache_busted(&self.url, chrono::Utc::now().timestamp_millis());
        tracing::debug!(url = %url, "fetching sheet export");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?;
        let status = response.status();
        let body = response.text().await.context("read sheet export body")?;
        if !status.is_success() {
            anyhow::bail!("sheet export failed ({status}): {}", self.url);
        }
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    async fn fetch_csv(&self) -> anyhow::Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("read csv: {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches the CSV, builds records and layers the image overrides on top.
pub async fn load_books(
    source: &dyn CatalogSource,
    overrides: &ImageOverrides,
) -> anyhow::Result<Vec<BookRecord>> {
    let csv = source
        .fetch_csv()
        .await
        .with_context(|| format!("fetch catalog: {}", source.describe()))?;
    let books = overrides.apply(records::build_all(&csv));
    tracing::info!(
        source = %source.describe(),
        books = books.len(),
        overrides = overrides.len(),
        "loaded catalog"
    );
    Ok(books)
}
