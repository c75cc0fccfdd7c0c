use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::UnknownValue;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RecordId);

/// Reproduction state of a catalog entry. Serialized with the catalog's display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReproStatus {
    #[serde(rename = "已复现")]
    Reproduced,
    #[serde(rename = "复现中")]
    InProgress,
    #[serde(rename = "未复现")]
    NotReproduced,
}

impl ReproStatus {
    pub const ALL: [ReproStatus; 3] = [
        ReproStatus::Reproduced,
        ReproStatus::InProgress,
        ReproStatus::NotReproduced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReproStatus::Reproduced => "已复现",
            ReproStatus::InProgress => "复现中",
            ReproStatus::NotReproduced => "未复现",
        }
    }

    /// ASCII slug used for status badges.
    pub fn badge_slug(self) -> &'static str {
        match self {
            ReproStatus::Reproduced => "reproduced",
            ReproStatus::InProgress => "in-progress",
            ReproStatus::NotReproduced => "not-reproduced",
        }
    }
}

impl fmt::Display for ReproStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReproStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ReproStatus::ALL
            .into_iter()
            .find(|status| status.label() == s || status.badge_slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownValue::new("status", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRecord {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub doi: String,
    pub species: String,
    pub platform: String,
    pub samples: u32,
    pub cells: u64,
    pub status: ReproStatus,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub citation_count: u32,
    #[serde(default)]
    pub data_link: String,
    #[serde(default)]
    pub code_link: String,
    #[serde(default)]
    pub env_requirements: String,
    #[serde(default, rename = "reproTime")]
    pub repro_time_hours: f64,
    #[serde(default)]
    pub description: String,
}

impl DatasetRecord {
    pub fn published_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.publish_date, "%Y-%m-%d").ok()
    }

    pub fn doi_url(&self) -> String {
        format!("https://doi.org/{}", self.doi)
    }

    pub fn has_code(&self) -> bool {
        !self.code_link.trim().is_empty()
    }

    pub fn filter_value(&self, dimension: FilterDimension) -> &str {
        match dimension {
            FilterDimension::Species => &self.species,
            FilterDimension::Platform => &self.platform,
            FilterDimension::Status => self.status.label(),
        }
    }
}

/// One independently toggled equality constraint on the catalog table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Species,
    Platform,
    Status,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 3] = [
        FilterDimension::Species,
        FilterDimension::Platform,
        FilterDimension::Status,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterDimension::Species => "species",
            FilterDimension::Platform => "platform",
            FilterDimension::Status => "status",
        }
    }
}

impl FromStr for FilterDimension {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FilterDimension::ALL
            .into_iter()
            .find(|dimension| {
                dimension.as_str().eq_ignore_ascii_case(s)
                    || format!("{}Filter", dimension.as_str()) == s
            })
            .ok_or_else(|| UnknownValue::new("filter dimension", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Author,
    Year,
    Doi,
    Species,
    Platform,
    Samples,
    Cells,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::Title,
        SortField::Author,
        SortField::Year,
        SortField::Doi,
        SortField::Species,
        SortField::Platform,
        SortField::Samples,
        SortField::Cells,
        SortField::Status,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::Year => "year",
            SortField::Doi => "doi",
            SortField::Species => "species",
            SortField::Platform => "platform",
            SortField::Samples => "samples",
            SortField::Cells => "cells",
            SortField::Status => "status",
        }
    }
}

impl FromStr for SortField {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownValue::new("sort field", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(UnknownValue::new("sort direction", other)),
        }
    }
}

/// Logical form field. The string form is the identifier the page markup uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    DatasetTitle,
    AuthorName,
    AuthorEmail,
    PublicationYear,
    Doi,
    Journal,
    Species,
    Platform,
    SampleCount,
    CellCount,
    DataLink,
    ReproStatus,
    CodeLink,
    EnvRequirements,
    ReproTime,
    AgreeTerms,
    Email,
    Password,
    RegName,
    RegEmail,
    RegPassword,
    ConfirmPassword,
    Institution,
}

impl FieldId {
    pub const ALL: [FieldId; 23] = [
        FieldId::DatasetTitle,
        FieldId::AuthorName,
        FieldId::AuthorEmail,
        FieldId::PublicationYear,
        FieldId::Doi,
        FieldId::Journal,
        FieldId::Species,
        FieldId::Platform,
        FieldId::SampleCount,
        FieldId::CellCount,
        FieldId::DataLink,
        FieldId::ReproStatus,
        FieldId::CodeLink,
        FieldId::EnvRequirements,
        FieldId::ReproTime,
        FieldId::AgreeTerms,
        FieldId::Email,
        FieldId::Password,
        FieldId::RegName,
        FieldId::RegEmail,
        FieldId::RegPassword,
        FieldId::ConfirmPassword,
        FieldId::Institution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldId::DatasetTitle => "datasetTitle",
            FieldId::AuthorName => "authorName",
            FieldId::AuthorEmail => "authorEmail",
            FieldId::PublicationYear => "publicationYear",
            FieldId::Doi => "doi",
            FieldId::Journal => "journal",
            FieldId::Species => "species",
            FieldId::Platform => "platform",
            FieldId::SampleCount => "sampleCount",
            FieldId::CellCount => "cellCount",
            FieldId::DataLink => "dataLink",
            FieldId::ReproStatus => "reproStatus",
            FieldId::CodeLink => "codeLink",
            FieldId::EnvRequirements => "envRequirements",
            FieldId::ReproTime => "reproTime",
            FieldId::AgreeTerms => "agreeTerms",
            FieldId::Email => "email",
            FieldId::Password => "password",
            FieldId::RegName => "regName",
            FieldId::RegEmail => "regEmail",
            FieldId::RegPassword => "regPassword",
            FieldId::ConfirmPassword => "confirmPassword",
            FieldId::Institution => "institution",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FieldId::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownValue::new("field", s))
    }
}
