use serde::{Deserialize, Serialize};

use crate::formats::{BookRecord, CategoryHierarchy};
use crate::hierarchy;

pub const ITEMS_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    #[default]
    Ar,
}

impl Language {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            other => anyhow::bail!("unsupported language: {other}"),
        }
    }

    /// Label of the pseudo-category that selects every book.
    #[must_use]
    pub fn all_label(self) -> &'static str {
        match self {
            Self::En => "All",
            Self::Ar => "الكل",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    /// Every book whose category sits under this top-level label.
    Parent(String),
    /// Books with exactly this full category label.
    Exact(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a> {
    pub items: Vec<&'a BookRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// One fetched catalog together with the taxonomy derived from it.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<BookRecord>,
    hierarchy: CategoryHierarchy,
    language: Language,
}

impl Catalog {
    #[must_use]
    pub fn new(books: Vec<BookRecord>, language: Language) -> Self {
        let hierarchy = hierarchy::from_records(&books, language.all_label());
        Self {
            books,
            hierarchy,
            language,
        }
    }

    #[must_use]
    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    #[must_use]
    pub fn hierarchy(&self) -> &CategoryHierarchy {
        &self.hierarchy
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// The "All" label is language-dependent, so the taxonomy is rebuilt.
    pub fn set_language(&mut self, language: Language) {
        if self.language == language {
            return;
        }
        self.language = language;
        self.hierarchy = hierarchy::from_records(&self.books, language.all_label());
    }

    #[must_use]
    pub fn find(&self, title: &str) -> Option<&BookRecord> {
        self.books.iter().find(|book| book.title == title)
    }

    /// Maps a requested category onto a filter. The localized "All" label (and
    /// an empty request) select everything; `exact` selects a full label.
    #[must_use]
    pub fn category_filter(&self, requested: Option<&str>, exact: bool) -> CategoryFilter {
        match requested.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(label) if label == self.language.all_label() => CategoryFilter::All,
            Some(label) if exact => CategoryFilter::Exact(label.to_owned()),
            Some(label) => CategoryFilter::Parent(label.to_owned()),
        }
    }

    #[must_use]
    pub fn filter(&self, filter: &CategoryFilter, query: &str) -> Vec<&BookRecord> {
        let query = query.trim().to_lowercase();
        self.books
            .iter()
            .filter(|book| self.matches_category(book, filter))
            .filter(|book| matches_query(book, &query))
            .collect()
    }

    fn matches_category(&self, book: &BookRecord, filter: &CategoryFilter) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Exact(label) => book.category == *label,
            CategoryFilter::Parent(parent) => self
                .hierarchy
                .category_hierarchy
                .get(&book.category)
                .is_some_and(|p| p == parent),
        }
    }
}

fn matches_query(book: &BookRecord, lowered_query: &str) -> bool {
    lowered_query.is_empty()
        || book.title.to_lowercase().contains(lowered_query)
        || book.author.to_lowercase().contains(lowered_query)
        || book.category.to_lowercase().contains(lowered_query)
}

/// Slices `items` into the 1-based `page`, clamping out-of-range pages.
#[must_use]
pub fn paginate(items: Vec<&BookRecord>, page: usize, per_page: usize) -> Page<'_> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));

    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

/// Formats a price cell for display; `None` means "price on request".
#[must_use]
pub fn display_price(price: &str) -> Option<String> {
    parse_leading_float(price).map(|value| format!("${value:.2}"))
}

/// Parses the longest numeric prefix of `text` (`"12.5 SAR"` is 12.5).
pub(crate) fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if frac_digits > 0 || int_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    text[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}
