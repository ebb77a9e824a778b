use crate::models::{ApplicationRecord, StatusTab, TabCount};

pub fn matches_search(record: &ApplicationRecord, search_term: &str) -> bool {
    if search_term.is_empty() {
        return true;
    }
    let needle = search_term.to_lowercase();
    [&record.project_name, &record.location, &record.id]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_tab(record: &ApplicationRecord, tab: &StatusTab) -> bool {
    match tab {
        StatusTab::All => true,
        StatusTab::Status(status) => &record.status == status,
    }
}

pub fn filter<'a>(
    records: &'a [ApplicationRecord],
    search_term: &str,
    active_tab: &StatusTab,
) -> Vec<&'a ApplicationRecord> {
    records
        .iter()
        .filter(|record| matches_search(record, search_term) && matches_tab(record, active_tab))
        .collect()
}

pub fn tab_counts(records: &[ApplicationRecord], search_term: &str) -> Vec<TabCount> {
    StatusTab::tab_bar()
        .into_iter()
        .map(|tab| TabCount {
            count: filter(records, search_term, &tab).len(),
            label: tab.label().to_string(),
            tab,
        })
        .collect()
}
