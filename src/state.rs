use crate::errors::{AppError, AppResult};
use crate::filter::{filter, tab_counts};
use crate::models::{ApplicationRecord, Comment, StatusTab, TabCount};
use crate::store::{AddCommentOutcome, RecordStore};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(Comment),
    Rejected,
    UnknownRecord,
}

#[derive(Debug, Clone)]
pub struct DeskState {
    store: RecordStore,
    search_text: String,
    active_tab: StatusTab,
    selected: Option<String>,
    drafts: HashMap<String, String>,
}

impl DeskState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            search_text: String::new(),
            active_tab: StatusTab::All,
            selected: None,
            drafts: HashMap::new(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn active_tab(&self) -> &StatusTab {
        &self.active_tab
    }

    pub fn set_search_text(&mut self, raw: impl Into<String>) {
        self.search_text = raw.into();
    }

    pub fn set_active_tab(&mut self, tab: StatusTab) {
        self.active_tab = tab;
    }

    pub fn visible(&self) -> Vec<&ApplicationRecord> {
        filter(self.store.records(), &self.search_text, &self.active_tab)
    }

    pub fn tab_counts(&self) -> Vec<TabCount> {
        tab_counts(self.store.records(), &self.search_text)
    }

    pub fn select_record(&mut self, record_id: &str) -> AppResult<&ApplicationRecord> {
        let Some(record) = self.store.get(record_id) else {
            return Err(AppError::NotFound(format!("no application {}", record_id)));
        };
        self.selected = Some(record.id.clone());
        Ok(record)
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&ApplicationRecord> {
        self.selected.as_deref().and_then(|id| self.store.get(id))
    }

    pub fn set_draft(&mut self, record_id: &str, text: impl Into<String>) {
        self.drafts.insert(record_id.to_string(), text.into());
    }

    pub fn draft(&self, record_id: &str) -> &str {
        self.drafts.get(record_id).map(String::as_str).unwrap_or_default()
    }

    pub fn submit_comment(&mut self, record_id: &str) -> SubmitOutcome {
        let draft = self.draft(record_id).to_string();
        let outcome = self.submit_comment_text(record_id, &draft);
        if matches!(outcome, SubmitOutcome::Submitted(_)) {
            self.drafts.remove(record_id);
        }
        outcome
    }

    pub fn submit_comment_text(&mut self, record_id: &str, text: &str) -> SubmitOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::debug!(record_id = %record_id, "empty comment rejected");
            return SubmitOutcome::Rejected;
        }
        match self.store.add_comment(record_id, trimmed) {
            AddCommentOutcome::Appended { comment, .. } => SubmitOutcome::Submitted(comment),
            AddCommentOutcome::UnknownRecord => SubmitOutcome::UnknownRecord,
        }
    }
}
