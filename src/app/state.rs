use std::sync::Arc;

use anyhow::Context as _;
use tokio::sync::RwLock;

use crate::formats::BookRecord;
use crate::overrides::{ImageOverrides, OverrideStore};
use crate::sheet::{self, CatalogSource};
use crate::storefront::{Catalog, Language};

#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn CatalogSource>,
    overrides: Option<OverrideStore>,
    catalog: Arc<RwLock<Catalog>>,
    client: reqwest::Client,
    order_url: Option<String>,
}

impl AppState {
    /// Fetches the catalog once; later reloads go through [`AppState::refresh`].
    pub async fn load(
        source: Arc<dyn CatalogSource>,
        overrides: Option<OverrideStore>,
        language: Language,
        order_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let books = fetch(source.as_ref(), overrides.as_ref())
            .await
            .context("initial catalog load")?;
        tracing::info!(source = %source.describe(), books = books.len(), "catalog loaded");

        Ok(Self {
            source,
            overrides,
            catalog: Arc::new(RwLock::new(Catalog::new(books, language))),
            client: reqwest::Client::new(),
            order_url,
        })
    }

    pub fn catalog(&self) -> &RwLock<Catalog> {
        &self.catalog
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn order_url(&self) -> Option<&str> {
        self.order_url.as_deref()
    }

    /// Re-reads the source and swaps the catalog, keeping the current language.
    /// A failed fetch leaves the previous catalog in place.
    pub async fn refresh(&self) -> anyhow::Result<usize> {
        let books = fetch(self.source.as_ref(), self.overrides.as_ref()).await?;
        let total = books.len();

        let mut catalog = self.catalog.write().await;
        let language = catalog.language();
        *catalog = Catalog::new(books, language);

        tracing::info!(books = total, "catalog refreshed");
        Ok(total)
    }
}

async fn fetch(
    source: &dyn CatalogSource,
    overrides: Option<&OverrideStore>,
) -> anyhow::Result<Vec<BookRecord>> {
    let overrides = match overrides {
        Some(store) => store.load().await,
        None => ImageOverrides::default(),
    };
    sheet::load_books(source, &overrides).await
}
