//! Two-level category taxonomy inferred from flat category labels.
//!
//! Labels such as `"Fiction / Novels"` name their parent explicitly. Labels
//! without a separator are attached to the longest other label they contain,
//! so `"Islamic Fiqh"` lands under `"Islamic"` when both exist.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::formats::{BookRecord, CategoryHierarchy, SubCategory};

pub const SEPARATOR: &str = " / ";

/// Builds the hierarchy from the categories of `books`, in catalog order.
#[must_use]
pub fn from_records(books: &[BookRecord], all_label: &str) -> CategoryHierarchy {
    build(books.iter().map(|book| book.category.as_str()), all_label)
}

/// Builds the hierarchy for `labels`. Duplicates and empty labels are ignored;
/// the first occurrence of a label fixes its position.
#[must_use]
pub fn build<I, S>(labels: I, all_label: &str) -> CategoryHierarchy
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let labels = unique_labels(labels);
    let parents = candidate_parents(&labels);

    let mut hierarchy = BTreeMap::new();
    let mut children: BTreeMap<String, Vec<SubCategory>> = BTreeMap::new();

    for label in &labels {
        let (parent, sub_label) = assign_parent(label, &parents);
        hierarchy.insert(label.clone(), parent.clone());

        let entry = children.entry(parent).or_default();
        let sub_label = sub_label.as_deref().map(strip_decorations).unwrap_or_default();
        if !sub_label.is_empty() {
            entry.push(SubCategory {
                label: sub_label.to_owned(),
                value: label.clone(),
            });
        }
    }

    let sub_categories_map = children
        .into_iter()
        .map(|(parent, list)| (parent, dedupe_and_sort(list)))
        .collect();

    let top_level = hierarchy.values().cloned().collect::<BTreeSet<_>>();

    let mut categories = Vec::with_capacity(top_level.len() + 1);
    categories.push(all_label.to_owned());
    categories.extend(top_level);

    CategoryHierarchy {
        categories,
        sub_categories_map,
        category_hierarchy: hierarchy,
    }
}

fn unique_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for label in labels {
        let label = label.as_ref();
        if label.is_empty() || !seen.insert(label.to_owned()) {
            continue;
        }
        out.push(label.to_owned());
    }
    out
}

/// Parents in registration order: explicit separator prefixes first, then
/// separator-less labels that another label contains.
fn candidate_parents(labels: &[String]) -> Vec<String> {
    let mut parents: Vec<String> = Vec::new();
    let mut push = |parent: &str| {
        if !parent.is_empty() && !parents.iter().any(|p| p == parent) {
            parents.push(parent.to_owned());
        }
    };

    let mut orphans = Vec::new();
    for label in labels {
        match label.split_once(SEPARATOR) {
            Some((head, _)) => push(head.trim()),
            None => orphans.push(label),
        }
    }

    for orphan in orphans {
        let contained = labels
            .iter()
            .any(|other| other != orphan && other.contains(orphan.as_str()));
        if contained {
            push(orphan.as_str());
        }
    }

    parents
}

fn assign_parent(label: &str, parents: &[String]) -> (String, Option<String>) {
    if let Some((head, rest)) = label.split_once(SEPARATOR) {
        let head = head.trim();
        if !head.is_empty() {
            return (head.to_owned(), Some(rest.trim().to_owned()));
        }
        return (label.to_owned(), None);
    }

    match longest_contained_parent(label, parents) {
        Some(parent) => {
            let remainder = label.replacen(parent, "", 1).trim().to_owned();
            (parent.to_owned(), Some(remainder))
        }
        None => (label.to_owned(), None),
    }
}

/// Longest candidate that is a strict substring of `label`. Ties keep the
/// earliest registered candidate.
fn longest_contained_parent<'a>(label: &str, parents: &'a [String]) -> Option<&'a str> {
    let mut best: Option<&str> = None;
    for parent in parents {
        if parent == label || !label.contains(parent.as_str()) {
            continue;
        }
        let longer = best.is_none_or(|b| parent.chars().count() > b.chars().count());
        if longer {
            best = Some(parent.as_str());
        }
    }
    best
}

fn strip_decorations(label: &str) -> &str {
    label.trim_matches(|c: char| c == '/' || c == '-' || c.is_whitespace())
}

fn dedupe_and_sort(list: Vec<SubCategory>) -> Vec<SubCategory> {
    let mut seen = HashSet::new();
    let mut unique = list
        .into_iter()
        .filter(|item| seen.insert(item.label.clone()))
        .collect::<Vec<_>>();
    unique.sort_by(|a, b| a.label.cmp(&b.label));
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(label: &str, value: &str) -> SubCategory {
        SubCategory {
            label: label.to_owned(),
            value: value.to_owned(),
        }
    }

    #[test]
    fn explicit_separator_labels() {
        let h = build(["Fiction / Novels", "Fiction / Poetry", "Science"], "All");
        assert_eq!(h.categories, vec!["All", "Fiction", "Science"]);
        assert_eq!(
            h.sub_categories_map["Fiction"],
            vec![
                sub("Novels", "Fiction / Novels"),
                sub("Poetry", "Fiction / Poetry")
            ]
        );
        assert_eq!(h.category_hierarchy["Science"], "Science");
        assert_eq!(h.category_hierarchy["Fiction / Poetry"], "Fiction");
        assert!(h.sub_categories_map["Science"].is_empty());
    }

    #[test]
    fn children_are_sorted_by_label() {
        let h = build(["A / Zeta", "A / Alpha", "A / Mid"], "All");
        let labels = h.sub_categories_map["A"]
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn orphan_contained_in_another_label_becomes_parent() {
        let h = build(["Islamic", "Islamic Fiqh", "History"], "All");
        assert_eq!(h.categories, vec!["All", "History", "Islamic"]);
        assert_eq!(h.category_hierarchy["Islamic Fiqh"], "Islamic");
        assert_eq!(h.category_hierarchy["Islamic"], "Islamic");
        assert_eq!(
            h.sub_categories_map["Islamic"],
            vec![sub("Fiqh", "Islamic Fiqh")]
        );
    }

    #[test]
    fn longest_parent_wins() {
        let h = build(
            ["Science", "Science Fiction", "Science Fiction Classics"],
            "All",
        );
        assert_eq!(
            h.category_hierarchy["Science Fiction Classics"],
            "Science Fiction"
        );
        assert_eq!(h.category_hierarchy["Science Fiction"], "Science");
        assert_eq!(
            h.sub_categories_map["Science Fiction"],
            vec![sub("Classics", "Science Fiction Classics")]
        );
        assert_eq!(h.categories, vec!["All", "Science", "Science Fiction"]);
    }

    #[test]
    fn equal_length_parents_keep_first_registered() {
        let h = build(["Art / Modern", "Law / Civil", "Art Law"], "All");
        assert_eq!(h.category_hierarchy["Art Law"], "Art");
        assert!(h.sub_categories_map["Art"].contains(&sub("Law", "Art Law")));

        let h = build(["Law / Civil", "Art / Modern", "Art Law"], "All");
        assert_eq!(h.category_hierarchy["Art Law"], "Law");
        assert!(h.sub_categories_map["Law"].contains(&sub("Art", "Art Law")));
    }

    #[test]
    fn separator_parent_also_captures_fuzzy_children() {
        let h = build(["رواية / أدب", "رواية مترجمة"], "الكل");
        assert_eq!(h.categories, vec!["الكل", "رواية"]);
        assert_eq!(h.category_hierarchy["رواية مترجمة"], "رواية");
        let labels = h.sub_categories_map["رواية"]
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["أدب", "مترجمة"]);
    }

    #[test]
    fn sub_labels_are_stripped_of_dashes_and_slashes() {
        let h = build(["Kids", "Kids - Stories", "Kids/Games"], "All");
        let labels = h.sub_categories_map["Kids"]
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["Games", "Stories"]);
    }

    #[test]
    fn duplicate_sub_labels_keep_first_value() {
        let h = build(["Art / Modern", "Art /  Modern "], "All");
        assert_eq!(h.sub_categories_map["Art"], vec![sub("Modern", "Art / Modern")]);
    }

    #[test]
    fn deeper_separators_stay_in_sub_label() {
        let h = build(["A / B / C"], "All");
        assert_eq!(h.sub_categories_map["A"], vec![sub("B / C", "A / B / C")]);
    }

    #[test]
    fn empty_parent_falls_back_to_self() {
        let h = build([" / Orphan"], "All");
        assert_eq!(h.category_hierarchy[" / Orphan"], " / Orphan");
        assert_eq!(h.categories, vec!["All", " / Orphan"]);
    }

    #[test]
    fn empty_and_duplicate_labels_are_ignored() {
        let h = build(["", "Poetry", "Poetry"], "All");
        assert_eq!(h.categories, vec!["All", "Poetry"]);
        assert_eq!(h.category_hierarchy.len(), 1);
    }

    #[test]
    fn all_label_is_always_first() {
        let h = build(Vec::<String>::new(), "الكل");
        assert_eq!(h.categories, vec!["الكل"]);
    }
}
