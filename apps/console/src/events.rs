//! Turns command-line arguments into the page events a browser session would emit.

use anyhow::{anyhow, Context};
use catalog::SortSpec;
use shared::{
    domain::{FieldId, FilterDimension, SortField},
    protocol::UiEvent,
};
use wizard::Step;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    pub search: Option<String>,
    pub filters: Vec<(FilterDimension, String)>,
    pub sort: Option<String>,
    pub click: Vec<SortField>,
    pub page_size: Option<usize>,
    pub page: Option<usize>,
}

/// Event order matches the page: page size, search, filters, sort, then the page number.
pub fn browse_events(request: &BrowseRequest) -> anyhow::Result<Vec<UiEvent>> {
    let mut events = Vec::new();
    if let Some(page_size) = request.page_size {
        events.push(UiEvent::PageSizeChanged(page_size));
    }
    if let Some(search) = &request.search {
        events.push(UiEvent::SearchTextChanged(search.clone()));
    }
    for (dimension, value) in &request.filters {
        events.push(UiEvent::FilterChanged {
            dimension: *dimension,
            value: value.clone(),
        });
    }
    if let Some(sort) = &request.sort {
        let spec: SortSpec = sort
            .parse()
            .with_context(|| format!("invalid sort '{sort}', expected <field>-<asc|desc>"))?;
        events.push(UiEvent::SortChanged {
            field: spec.field,
            direction: spec.direction,
        });
    }
    events.extend(request.click.iter().copied().map(UiEvent::SortColumnClicked));
    if let Some(page) = request.page {
        events.push(UiEvent::PageChanged(page));
    }
    Ok(events)
}

/// Parses `name=value` where `name` is the form field id, e.g. `datasetTitle=Atlas`.
pub fn parse_field_assignment(raw: &str) -> anyhow::Result<(FieldId, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected name=value, got '{raw}'"))?;
    let field = name.parse::<FieldId>()?;
    Ok((field, value.to_string()))
}

/// Fills the wizard step by step, then accepts the terms (if asked) and submits.
pub fn submission_events(fields: &[(FieldId, String)], agree_terms: bool) -> Vec<UiEvent> {
    let mut events = Vec::new();
    for step in Step::ALL {
        for (field, value) in fields.iter().filter(|(field, _)| step.fields().contains(field)) {
            events.push(UiEvent::FieldBlurred {
                field: *field,
                value: value.clone(),
            });
        }
        if !step.is_final() {
            events.push(UiEvent::WizardNext);
        }
    }
    events.push(UiEvent::AgreeTermsToggled(agree_terms));
    events.push(UiEvent::WizardSubmit);
    events
}
