use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BooksQuery {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
    #[serde(default)]
    pub exact: bool,
    #[serde(default = "BooksQuery::default_page")]
    pub page: usize,
}

impl BooksQuery {
    pub fn default_page() -> usize {
        1
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageRequest {
    pub lang: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub total_items: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    pub title: String,
    #[serde(default = "OrderItem::default_quantity")]
    pub quantity: u32,
}

impl OrderItem {
    pub fn default_quantity() -> u32 {
        1
    }
}
