//! Column discovery for inventory sheets.
//!
//! Headers are matched case-insensitively against a synonym table. When a
//! column is missing from the header, the record builder falls back to the
//! position that column had in one of the known sheet layouts.

use crate::tokenizer::trim_field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Cost,
    Price,
    Profit,
    Availability,
    Quantity,
    Author,
    Category,
    Overview,
    Link,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Title,
        Column::Cost,
        Column::Price,
        Column::Profit,
        Column::Availability,
        Column::Quantity,
        Column::Author,
        Column::Category,
        Column::Overview,
        Column::Link,
    ];
}

/// Header names per column, in priority order.
pub type SynonymTable = &'static [(Column, &'static [&'static str])];

pub const DEFAULT_SYNONYMS: SynonymTable = &[
    (Column::Title, &["title"]),
    (Column::Cost, &["cost"]),
    // The sheet's "Suggestted" (sic) retail price is what customers pay.
    (Column::Price, &["suggestted", "suggested", "price"]),
    (Column::Profit, &["profit"]),
    (Column::Availability, &["availability"]),
    (Column::Quantity, &["quantity"]),
    (Column::Author, &["author"]),
    (Column::Category, &["category"]),
    (Column::Overview, &["overview"]),
    (Column::Link, &["link", "url"]),
];

/// Known sheet layouts, used only for positional fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutVersion {
    /// `Title,Cost,Price,Profit,Suggestted,Availability,Column 8,Author,Category`
    Legacy,
    /// `Title,Cost,Price,Profit,Suggestted,Availability,Quantity,Column 11,Author,Category,Overview`
    Extended,
}

impl LayoutVersion {
    /// A `Quantity` column only exists in the extended layout.
    #[must_use]
    pub fn detect(headers: &HeaderIndexMap) -> Self {
        if headers.get(Column::Quantity).is_some() {
            Self::Extended
        } else {
            Self::Legacy
        }
    }

    #[must_use]
    pub fn fallback_index(self, column: Column) -> Option<usize> {
        POSITIONAL_FALLBACKS
            .iter()
            .find(|(version, _)| *version == self)
            .and_then(|(_, table)| table.iter().find(|(c, _)| *c == column))
            .map(|(_, index)| *index)
    }
}

/// Fixed positions per layout. Columns absent here (e.g. `Link`) have no fallback.
pub const POSITIONAL_FALLBACKS: &[(LayoutVersion, &[(Column, usize)])] = &[
    (
        LayoutVersion::Legacy,
        &[
            (Column::Title, 0),
            (Column::Cost, 1),
            (Column::Profit, 3),
            (Column::Price, 4),
            (Column::Availability, 5),
            (Column::Author, 7),
            (Column::Category, 8),
        ],
    ),
    (
        LayoutVersion::Extended,
        &[
            (Column::Title, 0),
            (Column::Cost, 1),
            (Column::Profit, 3),
            (Column::Price, 4),
            (Column::Availability, 5),
            (Column::Author, 8),
            (Column::Category, 9),
            (Column::Overview, 10),
        ],
    ),
];

/// Column positions found in a header line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndexMap {
    indices: Vec<(Column, usize)>,
}

impl HeaderIndexMap {
    #[must_use]
    pub fn from_headers(headers: &[String], synonyms: SynonymTable) -> Self {
        let normalized = headers
            .iter()
            .map(|header| trim_field(header).to_lowercase())
            .collect::<Vec<_>>();

        let mut indices = Vec::new();
        for (column, names) in synonyms {
            let found = names
                .iter()
                .find_map(|name| normalized.iter().position(|header| header == name));
            if let Some(index) = found {
                indices.push((*column, index));
            }
        }

        Self { indices }
    }

    #[must_use]
    pub fn get(&self, column: Column) -> Option<usize> {
        self.indices
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, index)| *index)
    }

    /// Header position when present, otherwise the layout's fixed position.
    #[must_use]
    pub fn resolve(&self, column: Column, layout: LayoutVersion) -> Option<usize> {
        self.get(column)
            .or_else(|| layout.fallback_index(column))
    }
}
