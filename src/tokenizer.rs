//! Line-level CSV splitting for spreadsheet exports.
//!
//! Quotes only toggle the "inside quoted field" state; they are never copied
//! into the output. An escaped `""` inside a quoted field therefore closes and
//! reopens the quoted region instead of producing a literal quote.

/// Splits one CSV line into trimmed fields.
///
/// Always returns at least one field.
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(trim_field(&current).to_owned());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(trim_field(&current).to_owned());

    fields
}

/// Trims whitespace and byte-order marks, which Google exports prepend to the header.
pub(crate) fn trim_field(field: &str) -> &str {
    field.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}
