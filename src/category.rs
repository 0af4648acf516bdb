/// Labels the sheet uses for rows nobody has categorized yet.
pub const UNCATEGORIZED_SENTINELS: [&str; 2] = ["غير مصنف", "Uncategorized"];

/// Returned when no title heuristic matches.
pub const GENERAL_CATEGORY: &str = "General";

/// Ordered (title substrings, label) rules. First match wins.
pub const TITLE_HEURISTICS: &[(&[&str], &str)] = &[
    (&["رواية"], "رواية / أدب"),
    (&["فقه", "شرح"], "إسلامي / فقه"),
    (&["سيرة"], "سيرة نبوية"),
    (&["تطوير", "الذات"], "تنمية بشرية"),
];

/// Resolves the category of a row.
///
/// A real category passes through untouched. An empty or sentinel category is
/// guessed from the title, falling back to [`GENERAL_CATEGORY`].
#[must_use]
pub fn format_category(raw: &str, title: &str) -> String {
    if !raw.is_empty() && !UNCATEGORIZED_SENTINELS.contains(&raw) {
        return raw.to_owned();
    }

    TITLE_HEURISTICS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| title.contains(needle)))
        .map_or(GENERAL_CATEGORY, |(_, label)| *label)
        .to_owned()
}
