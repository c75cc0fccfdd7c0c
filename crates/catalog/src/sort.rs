use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::{
    domain::{DatasetRecord, SortDirection, SortField},
    error::UnknownValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Header-click semantics: the active column flips direction, any other column starts ascending.
    pub fn after_column_click(current: Option<SortSpec>, field: SortField) -> SortSpec {
        match current {
            Some(spec) if spec.field == field => SortSpec::new(field, spec.direction.toggled()),
            _ => SortSpec::new(field, SortDirection::Asc),
        }
    }

    pub fn compare(&self, a: &DatasetRecord, b: &DatasetRecord) -> Ordering {
        let ordering = compare_field(self.field, a, b);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.field.as_str(), self.direction.as_str())
    }
}

/// Parses the sort drop-down value, e.g. `year-desc`.
impl FromStr for SortSpec {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((field, direction)) = s.rsplit_once('-') else {
            return Err(UnknownValue::new("sort", s));
        };
        Ok(SortSpec::new(field.parse()?, direction.parse()?))
    }
}

fn compare_field(field: SortField, a: &DatasetRecord, b: &DatasetRecord) -> Ordering {
    match field {
        SortField::Year => a.year.cmp(&b.year),
        SortField::Samples => a.samples.cmp(&b.samples),
        SortField::Cells => a.cells.cmp(&b.cells),
        SortField::Title => compare_text(&a.title, &b.title),
        SortField::Author => compare_text(&a.author, &b.author),
        SortField::Doi => compare_text(&a.doi, &b.doi),
        SortField::Species => compare_text(&a.species, &b.species),
        SortField::Platform => compare_text(&a.platform, &b.platform),
        SortField::Status => compare_text(a.status.label(), b.status.label()),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Stable in-place sort of record indices; equal keys keep their relative order.
pub fn sort_indices(records: &[DatasetRecord], indices: &mut [usize], spec: SortSpec) {
    indices.sort_by(|&a, &b| spec.compare(&records[a], &records[b]));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_drop_down_values() {
        assert_eq!(
            "year-desc".parse::<SortSpec>().expect("spec"),
            SortSpec::new(SortField::Year, SortDirection::Desc)
        );
        assert_eq!(
            "title-asc".parse::<SortSpec>().expect("spec"),
            SortSpec::new(SortField::Title, SortDirection::Asc)
        );
        assert!("year".parse::<SortSpec>().is_err());
        assert!("height-asc".parse::<SortSpec>().is_err());
        assert!("year-up".parse::<SortSpec>().is_err());
    }

    #[test]
    fn display_matches_drop_down_value() {
        let spec = SortSpec::new(SortField::Cells, SortDirection::Asc);
        assert_eq!(spec.to_string(), "cells-asc");
    }

    #[test]
    fn column_click_toggles_active_column_and_resets_others() {
        let first = SortSpec::after_column_click(None, SortField::Year);
        assert_eq!(first, SortSpec::new(SortField::Year, SortDirection::Asc));

        let second = SortSpec::after_column_click(Some(first), SortField::Year);
        assert_eq!(second.direction, SortDirection::Desc);

        let other = SortSpec::after_column_click(Some(second), SortField::Title);
        assert_eq!(other, SortSpec::new(SortField::Title, SortDirection::Asc));
    }
}
