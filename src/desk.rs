use crate::config::DeskSettings;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ApplicationRecord, CommentOutcomeKind, CommentResponse, ListResponse, StatusTab,
};
use crate::render::Renderer;
use crate::state::{DeskState, SubmitOutcome};
use crate::store::{Clock, LocalClock, RecordStore};
use std::sync::Arc;

#[derive(Debug)]
pub struct DeskCore {
    state: DeskState,
    renderer: Renderer,
}

impl DeskCore {
    pub fn new(settings: &DeskSettings) -> Self {
        Self::with_clock(settings, Arc::new(LocalClock))
    }

    pub fn with_clock(settings: &DeskSettings, clock: Arc<dyn Clock>) -> Self {
        let store = RecordStore::seeded(clock, settings.current_user.clone());
        tracing::info!(records = store.len(), user = %settings.current_user, "desk seeded");
        Self {
            state: DeskState::new(store),
            renderer: Renderer::new(settings.color),
        }
    }

    pub fn state(&self) -> &DeskState {
        &self.state
    }

    pub fn renderer(&self) -> Renderer {
        self.renderer
    }

    pub fn search(&mut self, text: &str) -> ListResponse {
        self.state.set_search_text(text);
        tracing::debug!(search = %text, "search text changed");
        self.list()
    }

    pub fn switch_tab(&mut self, raw: &str) -> AppResult<ListResponse> {
        let tab = StatusTab::parse(raw)?;
        tracing::debug!(tab = %tab, "tab switched");
        self.state.set_active_tab(tab);
        Ok(self.list())
    }

    pub fn list(&self) -> ListResponse {
        ListResponse {
            search_text: self.state.search_text().to_string(),
            active_tab: self.state.active_tab().clone(),
            tabs: self.state.tab_counts(),
            records: self.state.visible().into_iter().cloned().collect(),
        }
    }

    pub fn show(&self, record_id: &str) -> AppResult<ApplicationRecord> {
        self.state
            .store()
            .get(record_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("no application {}", record_id)))
    }

    pub fn open(&mut self, record_id: &str) -> AppResult<ApplicationRecord> {
        let record = self.state.select_record(record_id)?.clone();
        tracing::debug!(record_id = %record.id, "detail opened");
        Ok(record)
    }

    pub fn close(&mut self) -> bool {
        let was_open = self.state.selected().is_some();
        self.state.close_detail();
        was_open
    }

    pub fn draft(&mut self, record_id: &str, text: &str) -> AppResult<()> {
        if self.state.store().get(record_id).is_none() {
            return Err(AppError::NotFound(format!("no application {}", record_id)));
        }
        self.state.set_draft(record_id, text);
        Ok(())
    }

    pub fn submit_draft(&mut self, record_id: &str) -> CommentResponse {
        let outcome = self.state.submit_comment(record_id);
        self.comment_response(record_id, outcome)
    }

    pub fn comment(&mut self, record_id: &str, text: &str) -> CommentResponse {
        let outcome = self.state.submit_comment_text(record_id, text);
        self.comment_response(record_id, outcome)
    }

    fn comment_response(&self, record_id: &str, outcome: SubmitOutcome) -> CommentResponse {
        let (kind, comment) = match outcome {
            SubmitOutcome::Submitted(comment) => (CommentOutcomeKind::Appended, Some(comment)),
            SubmitOutcome::Rejected => (CommentOutcomeKind::Rejected, None),
            SubmitOutcome::UnknownRecord => (CommentOutcomeKind::UnknownRecord, None),
        };
        CommentResponse {
            record_id: record_id.to_string(),
            outcome: kind,
            comment,
            record: self.state.store().get(record_id).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DeskCore;
    use crate::config::DeskSettings;
    use crate::models::CommentOutcomeKind;
    use crate::store::FixedClock;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn desk() -> DeskCore {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"));
        DeskCore::with_clock(&DeskSettings::default(), Arc::new(clock))
    }

    #[test]
    fn switch_tab_rejects_unknown_value_and_keeps_current_tab() {
        let mut desk = desk();
        desk.switch_tab("審査中").expect("switch");
        assert!(desk.switch_tab("完了").is_err());
        assert_eq!(desk.list().active_tab.value(), "審査中");
    }

    #[test]
    fn list_reports_tabs_and_visible_records() {
        let mut desk = desk();
        let response = desk.search("新宿");
        assert_eq!(response.records.len(), 1);
        assert_eq!(response.records[0].id, "APP-2024-002");
        assert_eq!(response.tabs[0].count, 1);
    }

    #[test]
    fn comment_reports_each_outcome() {
        let mut desk = desk();
        let appended = desk.comment("APP-2024-002", "ok");
        assert_eq!(appended.outcome, CommentOutcomeKind::Appended);
        assert_eq!(appended.record.map(|record| record.comments.len()), Some(1));

        let rejected = desk.comment("APP-2024-002", "   ");
        assert_eq!(rejected.outcome, CommentOutcomeKind::Rejected);
        assert_eq!(rejected.record.map(|record| record.comments.len()), Some(1));

        let unknown = desk.comment("NOT-FOUND", "x");
        assert_eq!(unknown.outcome, CommentOutcomeKind::UnknownRecord);
        assert!(unknown.record.is_none());
    }

    #[test]
    fn draft_requires_known_record() {
        let mut desk = desk();
        assert!(desk.draft("NOT-FOUND", "x").is_err());
        desk.draft("APP-2024-003", "了解").expect("draft");
        let response = desk.submit_draft("APP-2024-003");
        assert_eq!(response.comment.map(|comment| comment.text), Some("了解".to_string()));
    }

    #[test]
    fn close_reports_whether_a_detail_was_open() {
        let mut desk = desk();
        assert!(!desk.close());
        desk.open("APP-2024-001").expect("open");
        assert!(desk.close());
    }
}
