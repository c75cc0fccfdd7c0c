//! Catalog table view state: search, filter, sort and paginate over a fixed record set.
//!
//! [`derive_view`] is the pure pipeline. [`CatalogEngine`] owns the records and the
//! current [`ViewState`] and applies the page's events to it.

use std::collections::BTreeMap;

use serde::Serialize;
use shared::{
    domain::{DatasetRecord, FilterDimension, SortDirection, SortField},
    error::{ApiError, ErrorCode},
};
use thiserror::Error;
use tracing::debug;

pub mod format;
pub mod pagination;
pub mod query;
pub mod sort;

pub use format::format_count;
pub use pagination::{page_window, PageLink};
pub use sort::SortSpec;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(usize),
}

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        ApiError::new(ErrorCode::Validation, value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    search_query: String,
    filters: BTreeMap<FilterDimension, String>,
    sort: Option<SortSpec>,
    page_index: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            filters: BTreeMap::new(),
            sort: None,
            page_index: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewState {
    pub fn new(page_size: usize, sort: Option<SortSpec>) -> Result<Self, CatalogError> {
        if page_size == 0 {
            return Err(CatalogError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            sort,
            ..Self::default()
        })
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn filters(&self) -> &BTreeMap<FilterDimension, String> {
        &self.filters
    }

    pub fn filter(&self, dimension: FilterDimension) -> Option<&str> {
        self.filters.get(&dimension).map(String::as_str)
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

/// One table row: the record plus the display strings presenters need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRow {
    #[serde(flatten)]
    pub record: DatasetRecord,
    pub samples_display: String,
    pub cells_display: String,
    pub status_badge: &'static str,
    pub doi_url: String,
}

impl CatalogRow {
    fn new(record: &DatasetRecord) -> Self {
        Self {
            samples_display: format_count(u64::from(record.samples)),
            cells_display: format_count(record.cells),
            status_badge: record.status.badge_slug(),
            doi_url: record.doi_url(),
            record: record.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub rows: Vec<CatalogRow>,
    pub result_count: usize,
    pub page_count: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub sort: Option<SortSpec>,
    pub pagination: Vec<PageLink>,
}

impl CatalogView {
    /// True when nothing matches; presenters render the empty state instead of a page.
    pub fn is_empty(&self) -> bool {
        self.result_count == 0
    }

    pub fn ids(&self) -> Vec<i64> {
        self.rows.iter().map(|row| row.record.id.0).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    Moved(usize),
    Ignored { requested: usize, page_count: usize },
}

/// Search → filter → sort, returning indices into `records`.
pub fn ordered_indices(records: &[DatasetRecord], state: &ViewState) -> Vec<usize> {
    let mut indices = query::filtered_indices(records, &state.search_query, &state.filters);
    if let Some(spec) = state.sort {
        sort::sort_indices(records, &mut indices, spec);
    }
    indices
}

pub fn derive_view(records: &[DatasetRecord], state: &ViewState) -> CatalogView {
    let indices = ordered_indices(records, state);
    let result_count = indices.len();
    let page_count = pagination::page_count(result_count, state.page_size);
    let page_index = pagination::clamp_page(state.page_index, page_count);
    let bounds = pagination::page_bounds(page_index, state.page_size, result_count);

    let rows = indices[bounds]
        .iter()
        .map(|&index| CatalogRow::new(&records[index]))
        .collect();

    CatalogView {
        rows,
        result_count,
        page_count,
        page_index,
        page_size: state.page_size,
        sort: state.sort,
        pagination: page_window(page_index, page_count),
    }
}

#[derive(Debug, Clone)]
pub struct CatalogEngine {
    records: Vec<DatasetRecord>,
    state: ViewState,
}

impl CatalogEngine {
    pub fn new(records: Vec<DatasetRecord>) -> Self {
        Self::with_state(records, ViewState::default())
    }

    pub fn with_state(records: Vec<DatasetRecord>, state: ViewState) -> Self {
        Self { records, state }
    }

    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> CatalogView {
        derive_view(&self.records, &self.state)
    }

    pub fn result_count(&self) -> usize {
        query::filtered_indices(&self.records, &self.state.search_query, &self.state.filters).len()
    }

    pub fn page_count(&self) -> usize {
        pagination::page_count(self.result_count(), self.state.page_size)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search_query = text.into();
        self.reset_page();
        debug!(query = %self.state.search_query, "catalog search changed");
    }

    /// An empty value clears the dimension.
    pub fn set_filter(&mut self, dimension: FilterDimension, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.state.filters.remove(&dimension);
        } else {
            self.state.filters.insert(dimension, value);
        }
        self.reset_page();
        debug!(
            dimension = dimension.as_str(),
            active = self.state.filters.len(),
            "catalog filter changed"
        );
    }

    /// Clears the search text and every filter; the sort order is kept.
    pub fn clear_filters(&mut self) {
        self.state.search_query.clear();
        self.state.filters.clear();
        self.reset_page();
        debug!("catalog filters cleared");
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.state.sort = sort;
        self.reset_page();
        debug!(sort = ?self.state.sort, "catalog sort changed");
    }

    pub fn sort_by(&mut self, field: SortField, direction: SortDirection) {
        self.set_sort(Some(SortSpec::new(field, direction)));
    }

    pub fn click_column(&mut self, field: SortField) -> SortSpec {
        let spec = SortSpec::after_column_click(self.state.sort, field);
        self.set_sort(Some(spec));
        spec
    }

    /// Out-of-range requests leave the current page untouched.
    pub fn go_to_page(&mut self, page_index: usize) -> PageChange {
        let page_count = self.page_count();
        if page_index < 1 || page_index > page_count {
            debug!(requested = page_index, page_count, "ignored out-of-range page request");
            return PageChange::Ignored {
                requested: page_index,
                page_count,
            };
        }
        self.state.page_index = page_index;
        debug!(page = page_index, "catalog page changed");
        PageChange::Moved(page_index)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), CatalogError> {
        if page_size == 0 {
            return Err(CatalogError::InvalidPageSize(page_size));
        }
        self.state.page_size = page_size;
        self.reset_page();
        debug!(page_size, "catalog page size changed");
        Ok(())
    }

    /// Filter drop-down options for `dimension`.
    pub fn facet_values(&self, dimension: FilterDimension) -> Vec<String> {
        query::distinct_values(&self.records, dimension)
    }

    fn reset_page(&mut self) {
        self.state.page_index = 1;
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
