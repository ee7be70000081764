use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::filter::MATCH_ALL;
use crate::tab::TabId;

pub const TAB_PARAM: &str = "tab";
pub const FILTER_PARAM_PREFIX: char = 'f';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: String,
    pub history_len: usize,
}

impl Location {
    pub fn new<S: Into<String>>(path: S) -> Self {
        Self {
            path: path.into(),
            query: String::new(),
            history_len: 1,
        }
    }

    pub fn replace_query(&mut self, query: String) {
        log::debug!("replace location query: {query}");
        self.query = query;
    }

    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new("index.html")
    }
}

pub fn serialize<S: AsRef<str>>(active_tab: TabId, filters: &[S]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair(TAB_PARAM, active_tab.as_str());
    for (i, pattern) in filters.iter().enumerate() {
        serializer.append_pair(&format!("{FILTER_PARAM_PREFIX}{i}"), pattern.as_ref());
    }
    serializer.finish()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryState {
    pub tab: Option<String>,
    pub filters: BTreeMap<usize, String>,
}

pub fn parse(query: &str) -> QueryState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut state = QueryState::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key == TAB_PARAM {
            state.tab = Some(value.into_owned());
        } else if let Some(column) = key
            .strip_prefix(FILTER_PARAM_PREFIX)
            .and_then(|i| i.parse::<usize>().ok())
        {
            state.filters.insert(column, value.into_owned());
        } else {
            log::debug!("ignore query parameter {key:?}");
        }
    }
    state
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorePlan {
    pub tab: TabId,
    pub edits: Vec<(usize, String)>,
}

pub fn restore_plan(query: &str, default_tab: TabId) -> RestorePlan {
    let state = parse(query);
    let tab = match state.tab.as_deref() {
        None => default_tab,
        Some(name) => match name.parse() {
            Ok(tab) => tab,
            Err(e) => {
                log::warn!("{e}, falling back to {default_tab}");
                default_tab
            }
        },
    };
    let edits = state
        .filters
        .into_iter()
        .filter(|(_, pattern)| pattern != MATCH_ALL)
        .collect();
    RestorePlan { tab, edits }
}
