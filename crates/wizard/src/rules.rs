//! Declarative per-field validation rules shared by the submission wizard and the account forms.

use std::{collections::BTreeMap, ops::RangeInclusive};

use serde::Serialize;
use shared::domain::{FieldId, ReproStatus};
use thiserror::Error;

use crate::validators::{is_valid_doi, is_valid_email, is_valid_url};

pub type FieldValues = BTreeMap<FieldId, String>;

pub const PUBLICATION_YEARS: RangeInclusive<i32> = 2000..=2024;
pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PASSWORD_CHARS: usize = 8;

pub const REQUIRED_MESSAGE: &str = "此字段为必填项";
pub const YEAR_MESSAGE: &str = "年份必须在2000-2024之间";
pub const COUNT_MESSAGE: &str = "数量必须大于0";
pub const NUMBER_MESSAGE: &str = "请输入有效的数字";
pub const NEGATIVE_TIME_MESSAGE: &str = "时间不能为负数";
pub const EMAIL_MESSAGE: &str = "请输入有效的邮箱地址";
pub const DOI_MESSAGE: &str = "请输入有效的DOI格式";
pub const URL_MESSAGE: &str = "请输入有效的URL地址";
pub const STATUS_MESSAGE: &str = "请选择有效的复现状态";
pub const NAME_LENGTH_MESSAGE: &str = "姓名长度至少2位";
pub const PASSWORD_LENGTH_MESSAGE: &str = "密码长度至少8位";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "两次输入的密码不一致";
pub const TERMS_MESSAGE: &str = "请同意服务条款和隐私政策";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: FieldId,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: FieldId, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Year,
    Count,
    NonNegativeDecimal,
    Doi,
    Url,
    Status,
    MinChars(usize),
    Password,
    Confirms(FieldId),
    Checkbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub required: bool,
    pub kind: FieldKind,
    pub required_message: &'static str,
}

impl FieldRule {
    fn required(kind: FieldKind) -> Self {
        Self {
            required: true,
            kind,
            required_message: REQUIRED_MESSAGE,
        }
    }

    fn optional(kind: FieldKind) -> Self {
        Self {
            required: false,
            kind,
            required_message: REQUIRED_MESSAGE,
        }
    }

    fn with_required_message(mut self, message: &'static str) -> Self {
        self.required_message = message;
        self
    }
}

pub fn rule_for(field: FieldId) -> FieldRule {
    use FieldKind::*;

    match field {
        FieldId::DatasetTitle
        | FieldId::AuthorName
        | FieldId::Species
        | FieldId::Platform => FieldRule::required(Text),
        FieldId::AuthorEmail => FieldRule::required(Email),
        FieldId::PublicationYear => FieldRule::required(Year),
        FieldId::SampleCount | FieldId::CellCount => FieldRule::required(Count),
        FieldId::DataLink => FieldRule::required(Url),
        FieldId::ReproStatus => FieldRule::required(Status),
        FieldId::Doi => FieldRule::optional(Doi),
        FieldId::CodeLink => FieldRule::optional(Url),
        FieldId::ReproTime => FieldRule::optional(NonNegativeDecimal),
        FieldId::Journal | FieldId::EnvRequirements | FieldId::Institution => {
            FieldRule::optional(Text)
        }
        FieldId::AgreeTerms => FieldRule::optional(Checkbox),
        FieldId::Email | FieldId::RegEmail => {
            FieldRule::required(Email).with_required_message("邮箱地址不能为空")
        }
        FieldId::Password => FieldRule::required(Text).with_required_message("密码不能为空"),
        FieldId::RegName => {
            FieldRule::required(MinChars(MIN_NAME_CHARS)).with_required_message("姓名不能为空")
        }
        FieldId::RegPassword => FieldRule::required(Password).with_required_message("密码不能为空"),
        FieldId::ConfirmPassword => FieldRule::required(Confirms(FieldId::RegPassword))
            .with_required_message("请确认密码"),
    }
}

/// Checks `field` against its rule. Missing values count as empty.
pub fn validate_field(field: FieldId, values: &FieldValues) -> Result<(), ValidationError> {
    let rule = rule_for(field);
    let raw = values.get(&field).map(String::as_str).unwrap_or_default();
    let value = raw.trim();

    if value.is_empty() {
        if rule.required {
            return Err(ValidationError::new(field, rule.required_message));
        }
        return Ok(());
    }

    let failure = match rule.kind {
        FieldKind::Text | FieldKind::Checkbox => None,
        FieldKind::Email => (!is_valid_email(value)).then_some(EMAIL_MESSAGE),
        FieldKind::Doi => (!is_valid_doi(value)).then_some(DOI_MESSAGE),
        FieldKind::Url => (!is_valid_url(value)).then_some(URL_MESSAGE),
        FieldKind::Year => match value.parse::<i32>() {
            Ok(year) if PUBLICATION_YEARS.contains(&year) => None,
            _ => Some(YEAR_MESSAGE),
        },
        FieldKind::Count => match value.parse::<i64>() {
            Ok(count) if count >= 1 => None,
            Ok(_) => Some(COUNT_MESSAGE),
            Err(_) => Some(NUMBER_MESSAGE),
        },
        FieldKind::NonNegativeDecimal => match value.parse::<f64>() {
            Ok(hours) if hours.is_nan() => Some(NUMBER_MESSAGE),
            Ok(hours) if hours < 0.0 => Some(NEGATIVE_TIME_MESSAGE),
            Ok(_) => None,
            Err(_) => Some(NUMBER_MESSAGE),
        },
        FieldKind::Status => value.parse::<ReproStatus>().is_err().then_some(STATUS_MESSAGE),
        FieldKind::MinChars(min) => (value.chars().count() < min).then_some(NAME_LENGTH_MESSAGE),
        FieldKind::Password => {
            (raw.chars().count() < MIN_PASSWORD_CHARS).then_some(PASSWORD_LENGTH_MESSAGE)
        }
        FieldKind::Confirms(primary) => {
            let primary = values.get(&primary).map(String::as_str).unwrap_or_default();
            (raw != primary).then_some(PASSWORD_MISMATCH_MESSAGE)
        }
    };

    match failure {
        Some(message) => Err(ValidationError::new(field, message)),
        None => Ok(()),
    }
}

/// Validates every field in `fields`, returning all failures in order.
pub fn validate_fields(fields: &[FieldId], values: &FieldValues) -> Vec<ValidationError> {
    fields
        .iter()
        .filter_map(|field| validate_field(*field, values).err())
        .collect()
}
