use serde::Serialize;
use shared::domain::FieldId;

use crate::rules::FieldValues;

const NOT_PROVIDED: &str = "未填写";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryItem {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarySection {
    pub title: &'static str,
    pub items: Vec<SummaryItem>,
}

/// Read-only recap shown on the confirmation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationSummary {
    pub sections: Vec<SummarySection>,
}

impl ConfirmationSummary {
    pub fn from_values(values: &FieldValues) -> Self {
        let value = |field: FieldId| {
            values
                .get(&field)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let item = |label: &'static str, field: FieldId| SummaryItem {
            label,
            value: value(field),
        };

        let repro_time = match value(FieldId::ReproTime) {
            hours if hours.is_empty() => format!("{NOT_PROVIDED} 小时"),
            hours => format!("{hours} 小时"),
        };

        Self {
            sections: vec![
                SummarySection {
                    title: "基本信息",
                    items: vec![
                        item("数据集标题", FieldId::DatasetTitle),
                        item("作者", FieldId::AuthorName),
                        item("邮箱", FieldId::AuthorEmail),
                        item("发表年份", FieldId::PublicationYear),
                    ],
                },
                SummarySection {
                    title: "数据信息",
                    items: vec![
                        item("物种", FieldId::Species),
                        item("平台", FieldId::Platform),
                        item("样本数", FieldId::SampleCount),
                        item("细胞数", FieldId::CellCount),
                    ],
                },
                SummarySection {
                    title: "复现信息",
                    items: vec![
                        item("复现状态", FieldId::ReproStatus),
                        SummaryItem {
                            label: "复现时间",
                            value: repro_time,
                        },
                    ],
                },
            ],
        }
    }

    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|section| section.items.iter())
            .find(|item| item.label == label)
            .map(|item| item.value.as_str())
    }
}
