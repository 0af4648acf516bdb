use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Purchasable flag, serialized the way the storefront has always stored it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    #[serde(rename = "1")]
    Available,
    #[serde(rename = "0")]
    Unavailable,
}

impl AvailabilityStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "1",
            Self::Unavailable => "0",
        }
    }

    #[must_use]
    pub fn is_available(self) -> bool {
        self == Self::Available
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub title: String,
    pub cost: String,
    pub price: String,
    pub profit: String,
    pub availability: AvailabilityStatus,
    pub availability_quantity: u32,
    pub author: String,
    pub category: String,
    pub image: Option<String>,
    pub is_placeholder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHierarchy {
    pub categories: Vec<String>,
    pub sub_categories_map: BTreeMap<String, Vec<SubCategory>>,
    pub category_hierarchy: BTreeMap<String, String>,
}

/// A cart line: the book as it was when added, plus the requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub book: BookRecord,
    pub quantity: u32,
}

/// Body posted to the order form endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub items: String,
    pub total: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub action: String,
    pub image: String,
    pub mime_type: String,
    pub filename: String,
    pub book_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_record_uses_storefront_field_names() -> anyhow::Result<()> {
        let book = BookRecord {
            title: "Book A".to_owned(),
            cost: "2".to_owned(),
            price: "5".to_owned(),
            profit: "3".to_owned(),
            availability: AvailabilityStatus::Available,
            availability_quantity: 3,
            author: "Author X".to_owned(),
            category: "Fiction / Novels".to_owned(),
            image: None,
            is_placeholder: true,
            overview: None,
        };

        let value = serde_json::to_value(&book)?;
        assert_eq!(value["availability"], "1");
        assert_eq!(value["availabilityQuantity"], 3);
        assert_eq!(value["isPlaceholder"], true);
        assert!(value["image"].is_null());
        assert!(value.get("overview").is_none());

        let back: BookRecord = serde_json::from_value(value)?;
        assert_eq!(back, book);
        Ok(())
    }

    #[test]
    fn upload_response_tolerates_missing_fields() -> anyhow::Result<()> {
        let resp: UploadResponse =
            serde_json::from_str(r#"{"status":"error","message":"Unknown action"}"#)?;
        assert_eq!(resp.status, "error");
        assert_eq!(resp.url, None);
        assert_eq!(resp.message.as_deref(), Some("Unknown action"));
        Ok(())
    }
}
