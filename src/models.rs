use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{AppError, AppResult};

pub const STATUS_NEEDS_REVISION: &str = "修正依頼中";
pub const STATUS_PREPARING: &str = "申請準備中";
pub const STATUS_UNDER_REVIEW: &str = "審査中";
pub const ALL_TAB_VALUE: &str = "all";
pub const ALL_TAB_LABEL: &str = "全案件";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    NeedsRevision,
    Preparing,
    UnderReview,
    Other(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NeedsRevision => STATUS_NEEDS_REVISION,
            Self::Preparing => STATUS_PREPARING,
            Self::UnderReview => STATUS_UNDER_REVIEW,
            Self::Other(value) => value.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn palette(&self) -> Palette {
        match self {
            Self::NeedsRevision => Palette::CORAL,
            Self::Preparing => Palette::AMBER,
            Self::UnderReview => Palette::SAGE,
            Self::Other(_) => Palette::NEUTRAL,
        }
    }
}

impl From<String> for ApplicationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            STATUS_NEEDS_REVISION => Self::NeedsRevision,
            STATUS_PREPARING => Self::Preparing,
            STATUS_UNDER_REVIEW => Self::UnderReview,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ApplicationStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ApplicationStatus> for String {
    fn from(value: ApplicationStatus) -> Self {
        match value {
            ApplicationStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "高")]
    High,
    #[serde(rename = "中")]
    Medium,
    #[serde(rename = "低")]
    Low,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "高",
            Self::Medium => "中",
            Self::Low => "低",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::High => Palette::CORAL,
            Self::Medium => Palette::AMBER,
            Self::Low => Palette::SAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
}

impl Palette {
    pub const CORAL: Palette = Palette {
        background: "#FFE5D6",
        foreground: "#D95E26",
    };
    pub const AMBER: Palette = Palette {
        background: "#FFF0D6",
        foreground: "#B87A2B",
    };
    pub const SAGE: Palette = Palette {
        background: "#E6F2EA",
        foreground: "#2D5A27",
    };
    pub const NEUTRAL: Palette = Palette {
        background: "#F5F5F5",
        foreground: "#666666",
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub text: String,
    pub date: NaiveDate,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: String,
    pub project_name: String,
    pub location: String,
    pub status: ApplicationStatus,
    pub submit_date: NaiveDate,
    pub last_update: NaiveDate,
    pub urgency: Urgency,
    pub revisions: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusTab {
    #[default]
    All,
    Status(ApplicationStatus),
}

impl StatusTab {
    pub fn tab_bar() -> [StatusTab; 4] {
        [
            Self::All,
            Self::Status(ApplicationStatus::NeedsRevision),
            Self::Status(ApplicationStatus::Preparing),
            Self::Status(ApplicationStatus::UnderReview),
        ]
    }

    pub fn value(&self) -> &str {
        match self {
            Self::All => ALL_TAB_VALUE,
            Self::Status(status) => status.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_TAB_LABEL,
            Self::Status(status) => status.as_str(),
        }
    }

    pub fn parse(input: &str) -> AppResult<Self> {
        let input = input.trim();
        if let Ok(index) = input.parse::<usize>() {
            return Self::tab_bar()
                .get(index)
                .cloned()
                .ok_or_else(|| AppError::Invalid(format!("tab index {} out of range (0-3)", index)));
        }
        if input.eq_ignore_ascii_case(ALL_TAB_VALUE) || input == ALL_TAB_LABEL {
            return Ok(Self::All);
        }
        let status = ApplicationStatus::from(input);
        if status.is_known() {
            Ok(Self::Status(status))
        } else {
            Err(AppError::Invalid(format!("unknown tab: {}", input)))
        }
    }
}

impl TryFrom<String> for StatusTab {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StatusTab> for String {
    fn from(value: StatusTab) -> Self {
        value.value().to_string()
    }
}

impl fmt::Display for StatusTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabCount {
    pub tab: StatusTab,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub search_text: String,
    pub active_tab: StatusTab,
    pub tabs: Vec<TabCount>,
    pub records: Vec<ApplicationRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentOutcomeKind {
    Appended,
    Rejected,
    UnknownRecord,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub record_id: String,
    pub outcome: CommentOutcomeKind,
    pub comment: Option<Comment>,
    pub record: Option<ApplicationRecord>,
}

#[cfg(test)]
mod tests {
    use super::{ApplicationRecord, ApplicationStatus, StatusTab, Urgency};

    #[test]
    fn record_round_trips_with_camel_case_fields() {
        let raw = serde_json::json!({
            "id": "APP-2024-009",
            "projectName": "テスト工事",
            "location": "東京都港区",
            "status": "審査中",
            "submitDate": "2024-03-01",
            "lastUpdate": "2024-03-02",
            "urgency": "低",
            "revisions": 0
        });
        let record: ApplicationRecord = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(record.status, ApplicationStatus::UnderReview);
        assert_eq!(record.urgency, Urgency::Low);
        assert!(record.comments.is_empty());

        let back = serde_json::to_value(&record).expect("serialize");
        assert_eq!(back["projectName"], "テスト工事");
        assert_eq!(back["status"], "審査中");
        assert_eq!(back["submitDate"], "2024-03-01");
    }

    #[test]
    fn unknown_status_is_preserved_verbatim() {
        let status = ApplicationStatus::from("差戻し");
        assert!(!status.is_known());
        assert_eq!(status.as_str(), "差戻し");
        assert_eq!(String::from(status), "差戻し");
    }

    #[test]
    fn tab_parse_accepts_value_label_and_index() {
        assert_eq!(StatusTab::parse("all").expect("value"), StatusTab::All);
        assert_eq!(StatusTab::parse("全案件").expect("label"), StatusTab::All);
        assert_eq!(
            StatusTab::parse("2").expect("index"),
            StatusTab::Status(ApplicationStatus::Preparing)
        );
        assert_eq!(
            StatusTab::parse("修正依頼中").expect("status"),
            StatusTab::Status(ApplicationStatus::NeedsRevision)
        );
    }

    #[test]
    fn tab_parse_rejects_unknown_values() {
        assert!(StatusTab::parse("archived").is_err());
        assert!(StatusTab::parse("4").is_err());
    }
}
