//! Page counts for sections.
//!
//! A section normally renders as one page. A list field holding more items
//! than its configured per-page maximum splits the section into
//! `ceil(items / max)` pages; a card field with two or more cards renders
//! one page per card.
//!
//! When a section holds several paginating fields the first qualifying
//! list field wins; card fields are only considered when no list field
//! qualifies. Counts are never combined.

use super::{Document, FieldType, Section};

/// Number of pages a section occupies. Always at least 1.
pub fn pages_for_section(section: &Section) -> usize {
    let list_pages = section
        .fields()
        .filter(|f| f.field_type == FieldType::List)
        .find_map(|f| {
            let max = f.max_items_per_page().filter(|m| *m > 0)? as usize;
            let items = f.item_count();
            (items > max).then(|| items.div_ceil(max))
        });
    if let Some(pages) = list_pages {
        return pages;
    }

    section
        .fields()
        .filter(|f| f.field_type == FieldType::Card)
        .map(|f| f.item_count())
        .find(|cards| *cards >= 2)
        .unwrap_or(1)
}

/// Total pages over the given section indices. Unknown indices are ignored.
pub fn total_pages(document: &Document, indices: &[usize]) -> usize {
    indices
        .iter()
        .filter_map(|i| document.section(*i))
        .map(pages_for_section)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Field};

    fn section_with(fields: Vec<Field>) -> Section {
        Section::new("s").with_block(Block::with_fields(fields))
    }

    #[test]
    fn test_empty_section_is_one_page() {
        assert_eq!(pages_for_section(&Section::new("empty")), 1);
    }

    #[test]
    fn test_plain_fields_are_one_page() {
        let section = section_with(vec![
            Field::new(FieldType::Text),
            Field::new(FieldType::Number),
            Field::new(FieldType::DateRange),
            Field::new(FieldType::ClimateData),
        ]);
        assert_eq!(pages_for_section(&section), 1);
    }

    #[test]
    fn test_list_pagination() {
        assert_eq!(pages_for_section(&section_with(vec![Field::list(12, Some(5))])), 3);
        assert_eq!(pages_for_section(&section_with(vec![Field::list(10, Some(5))])), 2);
        assert_eq!(pages_for_section(&section_with(vec![Field::list(6, Some(5))])), 2);
    }

    #[test]
    fn test_list_at_or_below_limit_is_one_page() {
        assert_eq!(pages_for_section(&section_with(vec![Field::list(5, Some(5))])), 1);
        assert_eq!(pages_for_section(&section_with(vec![Field::list(0, Some(5))])), 1);
    }

    #[test]
    fn test_list_without_limit_never_paginates() {
        assert_eq!(pages_for_section(&section_with(vec![Field::list(100, None)])), 1);
    }

    #[test]
    fn test_non_positive_limit_is_no_pagination() {
        assert_eq!(pages_for_section(&section_with(vec![Field::list(12, Some(0))])), 1);
        assert_eq!(pages_for_section(&section_with(vec![Field::list(12, Some(-3))])), 1);
    }

    #[test]
    fn test_card_pagination() {
        assert_eq!(pages_for_section(&section_with(vec![Field::cards(4)])), 4);
        assert_eq!(pages_for_section(&section_with(vec![Field::cards(2)])), 2);
        assert_eq!(pages_for_section(&section_with(vec![Field::cards(1)])), 1);
        assert_eq!(pages_for_section(&section_with(vec![Field::cards(0)])), 1);
    }

    #[test]
    fn test_first_qualifying_list_wins() {
        let section = section_with(vec![
            Field::list(3, Some(5)),
            Field::list(9, Some(2)),
            Field::list(30, Some(3)),
        ]);
        assert_eq!(pages_for_section(&section), 5);
    }

    #[test]
    fn test_list_takes_precedence_over_earlier_cards() {
        let section = Section::new("mixed")
            .with_block(Block::with_fields(vec![Field::cards(4)]))
            .with_block(Block::with_fields(vec![Field::list(12, Some(5))]));
        assert_eq!(pages_for_section(&section), 3);
    }

    #[test]
    fn test_cards_used_when_list_does_not_qualify() {
        let section = section_with(vec![Field::list(2, Some(5)), Field::cards(1), Field::cards(3)]);
        assert_eq!(pages_for_section(&section), 3);
    }

    #[test]
    fn test_total_pages_over_subset() {
        let mut doc = Document::new("d");
        doc.add_section(section_with(vec![Field::list(12, Some(5))]));
        doc.add_section(section_with(vec![Field::cards(2)]));
        doc.add_section(Section::new("plain"));

        assert_eq!(total_pages(&doc, &[0, 1, 2]), 6);
        assert_eq!(total_pages(&doc, &[1, 2]), 3);
        assert_eq!(total_pages(&doc, &[7]), 0);
    }

    #[test]
    fn test_float_and_string_limits_paginate() {
        let list_with = |max: serde_json::Value| {
            let mut field = Field::list(12, None);
            field.field_config = serde_json::json!({ "max_items_per_page": max });
            section_with(vec![field])
        };
        assert_eq!(pages_for_section(&list_with(serde_json::json!(5.0))), 3);
        assert_eq!(pages_for_section(&list_with(serde_json::json!("5"))), 3);
        assert_eq!(pages_for_section(&list_with(serde_json::json!("0"))), 1);
        assert_eq!(pages_for_section(&list_with(serde_json::json!(-3.0))), 1);
    }
}
