use std::collections::BTreeMap;
use std::sync::Arc;

use crate::document::Document;
use crate::error::Error;
use crate::filter::{self, FilterOutcome, MATCH_ALL};
use crate::tab::TabId;
use crate::table::{render_tab, Listener, Table};
use crate::url_sync::{self, Location};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub active_tab: TabId,
    pub filters_by_table: BTreeMap<TabId, Vec<String>>,
}

impl ViewState {
    pub fn new(active_tab: TabId) -> Self {
        Self {
            active_tab,
            filters_by_table: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    document: Option<Arc<Document>>,
    tables: BTreeMap<TabId, Table>,
    state: ViewState,
    show_reverted: bool,
    default_tab: TabId,
    pub location: Location,
}

impl Dashboard {
    pub fn new(default_tab: TabId) -> Self {
        Self {
            document: None,
            tables: BTreeMap::new(),
            state: ViewState::new(default_tab),
            show_reverted: false,
            default_tab,
            location: Location::default(),
        }
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_deref()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn show_reverted(&self) -> bool {
        self.show_reverted
    }

    pub fn active_tab(&self) -> TabId {
        self.state.active_tab
    }

    pub fn table(&self, tab: TabId) -> Option<&Table> {
        self.tables.get(&tab)
    }

    pub fn active_table(&self) -> Option<&Table> {
        self.table(self.state.active_tab)
    }

    pub fn display(&mut self, document: Arc<Document>) -> Result<(), Error> {
        self.document = Some(document);
        self.render_all()?;
        self.sync_location();
        Ok(())
    }

    pub fn set_show_reverted(&mut self, show_reverted: bool) -> Result<(), Error> {
        log::debug!("show reverted: {show_reverted}");
        self.show_reverted = show_reverted;
        self.render_all()
    }

    pub fn open_tab(&mut self, tab: TabId) {
        log::debug!("open tab {tab}");
        self.state.active_tab = tab;
        self.sync_location();
    }

    pub fn on_filter_input(
        &mut self,
        listener: Listener,
        value: &str,
        selection: Option<(usize, usize)>,
    ) -> Result<FilterOutcome, Error> {
        let Listener { tab, column } = listener;
        let table = self.tables.get_mut(&tab).ok_or(Error::NoDocument)?;
        if !table.listeners.contains(&listener) {
            return Err(Error::UnknownColumn { tab, column });
        }
        let filters = self
            .state
            .filters_by_table
            .entry(tab)
            .or_insert_with(|| vec![MATCH_ALL.to_owned(); table.column_count()]);
        let outcome = filter::apply_filter(table, filters, column, value, selection)?;
        if outcome.is_applied() {
            self.sync_location();
        }
        Ok(outcome)
    }

    pub fn type_filter(
        &mut self,
        tab: TabId,
        column: usize,
        value: &str,
        selection: Option<(usize, usize)>,
    ) -> Result<FilterOutcome, Error> {
        let table = self.tables.get(&tab).ok_or(Error::NoDocument)?;
        let listener = table
            .listeners
            .iter()
            .find(|l| l.column == column)
            .copied()
            .ok_or(Error::UnknownColumn { tab, column })?;
        self.on_filter_input(listener, value, selection)
    }

    pub fn restore(&mut self, query: &str) {
        let plan = url_sync::restore_plan(query, self.default_tab);
        self.state.filters_by_table.remove(&plan.tab);
        if let Some(document) = &self.document {
            let table = render_tab(plan.tab, document, self.show_reverted);
            self.tables.insert(plan.tab, table);
        }
        self.open_tab(plan.tab);
        for (column, pattern) in plan.edits {
            match self.type_filter(plan.tab, column, &pattern, None) {
                Ok(FilterOutcome::Applied { .. }) => {}
                Ok(FilterOutcome::Rejected(e)) => {
                    log::warn!("restored filter f{column} of {} is invalid: {e}", plan.tab)
                }
                Err(e) => log::warn!("failed to restore filter f{column}: {e}"),
            }
        }
    }

    fn render_all(&mut self) -> Result<(), Error> {
        let document = match &self.document {
            Some(d) => d.clone(),
            None => return Ok(()),
        };
        let mut tables = BTreeMap::new();
        for tab in TabId::ALL {
            let mut table = render_tab(tab, &document, self.show_reverted);
            if let Some(filters) = self.state.filters_by_table.get(&tab) {
                filter::reapply(&mut table, filters)?;
            }
            tables.insert(tab, table);
        }
        self.tables = tables;
        Ok(())
    }

    fn sync_location(&mut self) {
        let tab = self.state.active_tab;
        let defaults = match self.tables.get(&tab) {
            Some(table) => vec![MATCH_ALL.to_owned(); table.column_count()],
            None => Vec::new(),
        };
        let filters = self.state.filters_by_table.get(&tab).unwrap_or(&defaults);
        self.location.replace_query(url_sync::serialize(tab, filters.as_slice()));
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Dashboard::new(TabId::DataConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Commit, PullRequestRef};
    use crate::fixtures;
    use crate::table::Validity;

    fn loaded() -> Dashboard {
        let mut dashboard = Dashboard::default();
        dashboard.display(Arc::new(fixtures::document())).unwrap();
        dashboard
    }

    fn titles(dashboard: &Dashboard, tab: TabId) -> Vec<String> {
        dashboard
            .table(tab)
            .unwrap()
            .visible_rows()
            .map(|r| r.cells[0].text.clone())
            .collect()
    }

    #[test]
    fn single_from_list_commit() {
        let doc = crate::document::Document {
            downstream_commits: vec![Commit {
                upstream_pr: Some(PullRequestRef::Number(42)),
                author: Some("A".to_owned()),
                authored_seconds_since_epoch: Some(1700000000),
                committed_seconds_since_epoch: Some(1700000100),
                ..fixtures::commit("abcdef1234567890", "[nrf fromlist] fix X")
            }],
            ..fixtures::empty_document()
        };
        let mut dashboard = Dashboard::default();
        dashboard.display(Arc::new(doc)).unwrap();
        let table = dashboard.table(TabId::FromList).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells[3].text, "#42");
        assert!(table.rows[0].cells[3].html.contains(">#42</a>"));
        assert_eq!(table.summary.to_string(), "Showing 1 out of 1 elements");
    }

    #[test]
    fn filters_update_location() {
        let mut dashboard = loaded();
        assert_eq!(
            dashboard.location.query,
            "tab=data_config&f0=.*&f1=.*"
        );
        dashboard.open_tab(TabId::FromList);
        dashboard
            .type_filter(TabId::FromList, 0, ".*feat.*", None)
            .unwrap();
        assert_eq!(
            dashboard.location.query,
            "tab=commits_fromlist&f0=.*feat.*&f1=.*&f2=.*&f3=.*&f4=.*&f5=.*"
        );
        assert_eq!(dashboard.location.history_len, 1);
        assert_eq!(
            dashboard.state().filters_by_table[&TabId::FromList][0],
            ".*feat.*"
        );
    }

    #[test]
    fn rejected_filters_leave_location() {
        let mut dashboard = loaded();
        dashboard.open_tab(TabId::FromList);
        let before = dashboard.location.clone();
        let outcome = dashboard
            .type_filter(TabId::FromList, 1, "[", None)
            .unwrap();
        assert!(!outcome.is_applied());
        assert_eq!(dashboard.location, before);
        assert_eq!(
            dashboard.active_table().unwrap().inputs[1].validity,
            Validity::Invalid
        );
    }

    #[test]
    fn restore_matches_typing() {
        let query = "tab=commits_fromlist&f0=.*feat.*";
        let mut restored = loaded();
        restored.restore(query);
        assert_eq!(restored.active_tab(), TabId::FromList);
        assert_eq!(
            restored.active_table().unwrap().inputs[0].value,
            ".*feat.*"
        );

        let mut typed = loaded();
        typed.open_tab(TabId::FromList);
        typed.type_filter(TabId::FromList, 0, ".*feat.*", None).unwrap();
        assert_eq!(
            titles(&restored, TabId::FromList),
            titles(&typed, TabId::FromList)
        );
        assert_eq!(titles(&restored, TabId::FromList).len(), 2);
        assert_eq!(restored.location.query, typed.location.query);
    }

    #[test]
    fn restore_literal_prefix_query() {
        let mut restored = loaded();
        restored.restore("tab=commits_fromlist&f0=feat.*");
        let mut typed = loaded();
        typed.open_tab(TabId::FromList);
        typed.type_filter(TabId::FromList, 0, "feat.*", None).unwrap();
        assert_eq!(
            titles(&restored, TabId::FromList),
            titles(&typed, TabId::FromList)
        );
    }

    #[test]
    fn location_holds_filters_in_effect() {
        let mut shown = loaded();
        shown.open_tab(TabId::FromList);
        shown.type_filter(TabId::FromList, 5, "Bob", None).unwrap();
        let outcome = shown.type_filter(TabId::FromList, 5, "Bob(", None).unwrap();
        assert!(!outcome.is_applied());
        shown.type_filter(TabId::FromList, 0, ".*", None).unwrap();
        assert!(shown.location.query.ends_with("&f5=Bob"));

        let mut restored = loaded();
        restored.restore(&shown.location.query);
        assert_eq!(
            titles(&restored, TabId::FromList),
            titles(&shown, TabId::FromList)
        );
        assert_eq!(titles(&restored, TabId::FromList).len(), 1);
    }

    #[test]
    fn restore_resets_previous_filters() {
        let mut dashboard = loaded();
        dashboard.open_tab(TabId::FromList);
        dashboard.type_filter(TabId::FromList, 5, "Bob", None).unwrap();
        dashboard.type_filter(TabId::FromList, 0, ".*feat.*", None).unwrap();

        dashboard.restore("tab=commits_fromlist&f5=.*");
        let table = dashboard.active_table().unwrap();
        assert_eq!(table.summary.to_string(), "Showing 3 out of 3 elements");
        assert!(table.inputs.iter().all(|i| i.value == MATCH_ALL));
        assert!(!dashboard.location.query.contains("Bob"));

        dashboard.restore("tab=commits_fromlist&f5=Alice");
        let table = dashboard.active_table().unwrap();
        assert_eq!(table.summary.to_string(), "Showing 2 out of 3 elements");
        assert_eq!(table.inputs[0].value, MATCH_ALL);
    }

    #[test]
    fn restore_without_tab_opens_default() {
        let mut dashboard = Dashboard::new(TabId::NoUp);
        dashboard.display(Arc::new(fixtures::document())).unwrap();
        dashboard.open_tab(TabId::FromTree);
        dashboard.restore("f0=x");
        assert_eq!(dashboard.active_tab(), TabId::NoUp);
    }

    #[test]
    fn toggle_keeps_filters() {
        let mut dashboard = loaded();
        dashboard
            .type_filter(TabId::OnlyDownstream, 0, "(?i).*revert.*|.*add.*", None)
            .unwrap();
        assert_eq!(titles(&dashboard, TabId::OnlyDownstream).len(), 2);
        dashboard.set_show_reverted(true).unwrap();
        let table = dashboard.table(TabId::OnlyDownstream).unwrap();
        assert_eq!(table.summary.to_string(), "Showing 3 out of 4 elements");
        assert_eq!(table.inputs[0].value, "(?i).*revert.*|.*add.*");
    }

    #[test]
    fn summary_counts_after_filters() {
        let mut dashboard = loaded();
        for (column, pattern) in [(0, ".*"), (5, "Alice"), (2, "2023-11-1[45]")] {
            dashboard
                .type_filter(TabId::FromList, column, pattern, None)
                .unwrap();
            let table = dashboard.table(TabId::FromList).unwrap();
            let visible = table.rows.iter().filter(|r| r.visible).count();
            assert_eq!(
                table.summary.to_string(),
                format!("Showing {visible} out of {} elements", table.rows.len())
            );
        }
        assert_eq!(titles(&dashboard, TabId::FromList).len(), 1);
    }

    #[test]
    fn reload_replaces_document() {
        let mut dashboard = loaded();
        dashboard.open_tab(TabId::FromList);
        dashboard
            .type_filter(TabId::FromList, 5, "Bob", None)
            .unwrap();
        dashboard
            .display(Arc::new(fixtures::empty_document()))
            .unwrap();
        let table = dashboard.active_table().unwrap();
        assert_eq!(table.summary.to_string(), "Showing 0 out of 0 elements");
        assert_eq!(table.inputs[5].value, "Bob");
        assert_eq!(dashboard.active_tab(), TabId::FromList);
    }

    #[test]
    fn events_before_load() {
        let mut dashboard = Dashboard::default();
        assert!(matches!(
            dashboard.type_filter(TabId::NoUp, 0, ".*", None),
            Err(Error::NoDocument)
        ));
        dashboard.restore("tab=commits_noup&f0=x");
        assert_eq!(dashboard.active_tab(), TabId::NoUp);
        assert_eq!(dashboard.location.query, "tab=commits_noup");
    }
}
