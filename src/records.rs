use crate::availability;
use crate::category::format_category;
use crate::drive_image;
use crate::formats::{BookRecord, UNKNOWN_TITLE};
use crate::layout::{Column, DEFAULT_SYNONYMS, HeaderIndexMap, LayoutVersion, SynonymTable};
use crate::tokenizer::tokenize;

/// Rows with fewer fields than this are dropped.
const MIN_ROW_FIELDS: usize = 2;

/// Builds [`BookRecord`]s from an inventory CSV export using the default column tables.
#[must_use]
pub fn build_all(csv: &str) -> Vec<BookRecord> {
    RecordBuilder::default().build_all(csv)
}

/// Turns spreadsheet rows into book records.
///
/// Columns are located through a synonym table; columns missing from the
/// header fall back to the fixed positions of the detected [`LayoutVersion`].
/// Data-quality problems never fail a build: bad rows are skipped and bad cells
/// resolve to their documented defaults.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder {
    synonyms: SynonymTable,
    layout: Option<LayoutVersion>,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self {
            synonyms: DEFAULT_SYNONYMS,
            layout: None,
        }
    }
}

impl RecordBuilder {
    #[must_use]
    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Pins the fallback layout instead of detecting it from the header.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutVersion) -> Self {
        self.layout = Some(layout);
        self
    }

    #[must_use]
    pub fn build_all(&self, csv: &str) -> Vec<BookRecord> {
        let mut lines = csv.split('\n');
        let header_line = lines.next().unwrap_or_default();
        let headers = HeaderIndexMap::from_headers(&tokenize(header_line), self.synonyms);
        let layout = self
            .layout
            .unwrap_or_else(|| LayoutVersion::detect(&headers));
        tracing::debug!(?layout, ?headers, "resolved sheet columns");

        let columns = ResolvedColumns::new(&headers, layout);
        let mut books = Vec::new();
        let mut skipped = 0usize;

        for (line_no, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let fields = tokenize(line);
            if fields.len() < MIN_ROW_FIELDS {
                // Header is line 1, so the first data line is line 2.
                tracing::debug!(line = line_no + 2, "skipping malformed row");
                skipped += 1;
                continue;
            }

            books.push(columns.build_record(&fields));
        }

        tracing::debug!(rows = books.len(), skipped, "built book records");
        books
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedColumns {
    title: Option<usize>,
    cost: Option<usize>,
    price: Option<usize>,
    profit: Option<usize>,
    availability: Option<usize>,
    author: Option<usize>,
    category: Option<usize>,
    overview: Option<usize>,
    link: Option<usize>,
}

impl ResolvedColumns {
    fn new(headers: &HeaderIndexMap, layout: LayoutVersion) -> Self {
        let resolve = |column| headers.resolve(column, layout);
        Self {
            title: resolve(Column::Title),
            cost: resolve(Column::Cost),
            price: resolve(Column::Price),
            profit: resolve(Column::Profit),
            availability: resolve(Column::Availability),
            author: resolve(Column::Author),
            category: resolve(Column::Category),
            overview: resolve(Column::Overview),
            link: resolve(Column::Link),
        }
    }

    fn build_record(&self, fields: &[String]) -> BookRecord {
        let cell = |index: Option<usize>| index.and_then(|i| fields.get(i)).map(String::as_str);
        let text = |index: Option<usize>| cell(index).unwrap_or_default().to_owned();

        let title = cell(self.title)
            .filter(|title| !title.is_empty())
            .unwrap_or(UNKNOWN_TITLE)
            .to_owned();

        let raw_availability = cell(self.availability);
        let availability = availability::resolve(raw_availability);

        let image_source = cell(self.link)
            .filter(|link| link.starts_with("http"))
            .or_else(|| raw_availability.filter(|raw| raw.starts_with("http")));
        let image = drive_image::normalize(image_source);

        let category = format_category(cell(self.category).unwrap_or_default(), &title);
        let overview = cell(self.overview)
            .filter(|overview| !overview.is_empty())
            .map(str::to_owned);

        BookRecord {
            cost: text(self.cost),
            price: text(self.price),
            profit: text(self.profit),
            availability: availability.status,
            availability_quantity: availability.quantity,
            author: text(self.author),
            category,
            is_placeholder: image.is_none(),
            image,
            overview,
            title,
        }
    }
}
