//! Search and filter stages of the view pipeline.

use std::collections::BTreeMap;

use shared::domain::{DatasetRecord, FilterDimension};

/// Case-insensitive substring match over title, author, species and platform.
pub fn matches_search(record: &DatasetRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [
        &record.title,
        &record.author,
        &record.species,
        &record.platform,
    ]
    .into_iter()
    .any(|haystack| haystack.to_lowercase().contains(&needle))
}

pub fn matches_filters(record: &DatasetRecord, filters: &BTreeMap<FilterDimension, String>) -> bool {
    filters
        .iter()
        .all(|(dimension, value)| record.filter_value(*dimension) == value)
}

/// Indices into `records` that pass both stages, in source order.
pub fn filtered_indices(
    records: &[DatasetRecord],
    query: &str,
    filters: &BTreeMap<FilterDimension, String>,
) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_search(record, query) && matches_filters(record, filters))
        .map(|(index, _)| index)
        .collect()
}

/// Values present for `dimension`, deduplicated, in first-seen order.
pub fn distinct_values(records: &[DatasetRecord], dimension: FilterDimension) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for record in records {
        let value = record.filter_value(dimension);
        if !values.iter().any(|seen| seen == value) {
            values.push(value.to_string());
        }
    }
    values
}
