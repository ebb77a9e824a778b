use crate::errors::{AppError, AppResult};
use crate::models::{ApplicationRecord, Comment};
use crate::seed::seed_records;
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

pub const DEFAULT_COMMENT_USER: &str = "現在のユーザー";

pub trait Clock: Debug + Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddCommentOutcome {
    Appended { record_id: String, comment: Comment },
    UnknownRecord,
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<ApplicationRecord>,
    clock: Arc<dyn Clock>,
    comment_user: String,
    next_comment_id: u64,
}

impl RecordStore {
    pub fn seeded(clock: Arc<dyn Clock>, comment_user: impl Into<String>) -> Self {
        let records = seed_records();
        let next_comment_id = next_comment_id_after(&records);
        Self {
            records,
            clock,
            comment_user: comment_user.into(),
            next_comment_id,
        }
    }

    pub fn from_records(
        records: Vec<ApplicationRecord>,
        clock: Arc<dyn Clock>,
        comment_user: impl Into<String>,
    ) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(AppError::Invalid(format!("duplicate application id {}", record.id)));
            }
        }
        let next_comment_id = next_comment_id_after(&records);
        Ok(Self {
            records,
            clock,
            comment_user: comment_user.into(),
            next_comment_id,
        })
    }

    pub fn records(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn get(&self, record_id: &str) -> Option<&ApplicationRecord> {
        self.records.iter().find(|record| record.id == record_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    // Text is stored as given; trimming and the empty check belong to callers.
    pub fn add_comment(&mut self, record_id: &str, text: &str) -> AddCommentOutcome {
        let Some(record) = self.records.iter_mut().find(|record| record.id == record_id) else {
            tracing::debug!(record_id = %record_id, "add_comment ignored for unknown record");
            return AddCommentOutcome::UnknownRecord;
        };

        let comment = Comment {
            id: self.next_comment_id,
            text: text.to_string(),
            date: self.clock.today(),
            user: self.comment_user.clone(),
        };
        self.next_comment_id += 1;
        record.comments.push(comment.clone());

        tracing::info!(
            record_id = %record_id,
            comment_id = comment.id,
            thread_len = record.comments.len(),
            "comment appended"
        );

        AddCommentOutcome::Appended {
            record_id: record_id.to_string(),
            comment,
        }
    }
}

fn next_comment_id_after(records: &[ApplicationRecord]) -> u64 {
    records
        .iter()
        .flat_map(|record| record.comments.iter())
        .map(|comment| comment.id)
        .max()
        .map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::{AddCommentOutcome, FixedClock, RecordStore, DEFAULT_COMMENT_USER};
    use crate::seed::seed_records;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    fn store() -> RecordStore {
        RecordStore::seeded(Arc::new(FixedClock(today())), DEFAULT_COMMENT_USER)
    }

    #[test]
    fn append_grows_only_the_target_thread() {
        let mut store = store();
        let before = store.records().to_vec();

        let outcome = store.add_comment("APP-2024-002", "ok");
        let AddCommentOutcome::Appended { record_id, comment } = outcome else {
            panic!("expected append");
        };
        assert_eq!(record_id, "APP-2024-002");
        assert_eq!(comment.text, "ok");
        assert_eq!(comment.date, today());
        assert_eq!(comment.user, DEFAULT_COMMENT_USER);

        let after = store.records();
        assert_eq!(after[1].comments.len(), 1);
        assert_eq!(after[1].comments[0], comment);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
    }

    #[test]
    fn append_keeps_existing_comments_in_order() {
        let mut store = store();
        let prior = store.get("APP-2024-001").expect("record").comments.clone();

        store.add_comment("APP-2024-001", "hello");

        let thread = &store.get("APP-2024-001").expect("record").comments;
        assert_eq!(thread.len(), prior.len() + 1);
        assert_eq!(&thread[..prior.len()], prior.as_slice());
        assert_eq!(thread.last().map(|c| c.text.as_str()), Some("hello"));
    }

    #[test]
    fn append_does_not_touch_last_update_or_revisions() {
        let mut store = store();
        let before = store.get("APP-2024-003").cloned().expect("record");
        store.add_comment("APP-2024-003", "図面受領");
        let after = store.get("APP-2024-003").expect("record");
        assert_eq!(after.last_update, before.last_update);
        assert_eq!(after.revisions, before.revisions);
    }

    #[test]
    fn unknown_record_is_a_silent_no_op() {
        let mut store = store();
        let before = store.records().to_vec();
        assert_eq!(store.add_comment("NOT-FOUND", "x"), AddCommentOutcome::UnknownRecord);
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn comment_ids_continue_after_seed_and_never_repeat() {
        let mut store = store();
        let mut ids = Vec::new();
        for text in ["a", "b", "c"] {
            if let AddCommentOutcome::Appended { comment, .. } = store.add_comment("APP-2024-002", text) {
                ids.push(comment.id);
            }
        }
        assert_eq!(ids, vec![4, 5, 6]);
    }

    #[test]
    fn store_does_not_trim_text() {
        let mut store = store();
        store.add_comment("APP-2024-002", "  padded  ");
        let thread = &store.get("APP-2024-002").expect("record").comments;
        assert_eq!(thread[0].text, "  padded  ");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut records = seed_records();
        records.push(records[0].clone());
        let err = RecordStore::from_records(records, Arc::new(FixedClock(today())), "tester")
            .expect_err("duplicate should fail");
        assert!(err.to_string().contains("APP-2024-001"));
    }

    #[test]
    fn empty_store_starts_comment_ids_at_one() {
        let mut records = seed_records();
        records.iter_mut().for_each(|record| record.comments.clear());
        let mut store =
            RecordStore::from_records(records, Arc::new(FixedClock(today())), "tester").expect("store");
        match store.add_comment("APP-2024-001", "first") {
            AddCommentOutcome::Appended { comment, .. } => assert_eq!(comment.id, 1),
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
