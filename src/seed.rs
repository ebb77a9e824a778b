use crate::models::{ApplicationRecord, ApplicationStatus, Comment, Urgency};
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}

fn comment(id: u64, text: &str, on: NaiveDate, user: &str) -> Comment {
    Comment {
        id,
        text: text.to_string(),
        date: on,
        user: user.to_string(),
    }
}

pub fn seed_records() -> Vec<ApplicationRecord> {
    vec![
        ApplicationRecord {
            id: "APP-2024-001".to_string(),
            project_name: "○○マンション新築工事".to_string(),
            location: "東京都渋谷区○○".to_string(),
            status: ApplicationStatus::NeedsRevision,
            submit_date: date(2024, 2, 15),
            last_update: date(2024, 2, 20),
            urgency: Urgency::High,
            revisions: 2,
            comments: vec![
                comment(1, "構造計算書の確認が必要です", date(2024, 2, 15), "田中"),
                comment(2, "防火区画の見直しをお願いします", date(2024, 2, 16), "鈴木"),
            ],
        },
        ApplicationRecord {
            id: "APP-2024-002".to_string(),
            project_name: "△△ビル建替工事".to_string(),
            location: "東京都新宿区△△".to_string(),
            status: ApplicationStatus::Preparing,
            submit_date: date(2024, 2, 18),
            last_update: date(2024, 2, 18),
            urgency: Urgency::Medium,
            revisions: 0,
            comments: Vec::new(),
        },
        ApplicationRecord {
            id: "APP-2024-003".to_string(),
            project_name: "□□住宅新築工事".to_string(),
            location: "東京都目黒区□□".to_string(),
            status: ApplicationStatus::UnderReview,
            submit_date: date(2024, 2, 10),
            last_update: date(2024, 2, 19),
            urgency: Urgency::Low,
            revisions: 1,
            comments: vec![comment(3, "設備図の提出をお待ちしています", date(2024, 2, 19), "山田")],
        },
    ]
}
