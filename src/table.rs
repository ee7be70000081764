use std::fmt;

use crate::classify;
use crate::document::{Commit, Document};
use crate::filter::{self, MATCH_ALL};
use crate::format::{sha_to_link, utc_seconds_to_date, Cell};
use crate::tab::TabId;

pub trait Record {
    fn in_revert_pair(&self) -> bool {
        false
    }
}

impl Record for Commit {
    fn in_revert_pair(&self) -> bool {
        Commit::in_revert_pair(self)
    }
}

pub struct Column<'a, R> {
    pub header: &'static str,
    template: Box<dyn Fn(&R) -> Cell + 'a>,
}

impl<'a, R> Column<'a, R> {
    pub fn new<F>(header: &'static str, template: F) -> Self
    where
        F: Fn(&R) -> Cell + 'a,
    {
        Self {
            header,
            template: Box::new(template),
        }
    }

    pub fn cell(&self, record: &R) -> Cell {
        (self.template)(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid,
}

impl Validity {
    pub fn color(self) -> &'static str {
        match self {
            Validity::Valid => "green",
            Validity::Invalid => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterInput {
    pub value: String,
    pub validity: Validity,
}

impl Default for FilterInput {
    fn default() -> Self {
        Self {
            value: MATCH_ALL.to_owned(),
            validity: Validity::Valid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub target: String,
    pub visible: usize,
    pub total: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Showing {} out of {} elements", self.visible, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFocus {
    pub column: usize,
    pub selection_start: usize,
    pub selection_end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub tab: TabId,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub tab: TabId,
    pub headers: Vec<&'static str>,
    pub inputs: Vec<FilterInput>,
    pub rows: Vec<Row>,
    pub summary: Summary,
    pub focus: Option<InputFocus>,
    pub listeners: Vec<Listener>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.visible)
    }

    pub fn visible_texts(&self) -> Vec<Vec<&str>> {
        self.visible_rows()
            .map(|r| r.cells.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }
}

pub fn render<R: Record>(
    tab: TabId,
    columns: &[Column<'_, R>],
    records: &[&R],
    show_reverted: bool,
) -> Table {
    let rows: Vec<Row> = records
        .iter()
        .copied()
        .filter(|r| show_reverted || !r.in_revert_pair())
        .map(|r| Row {
            cells: columns.iter().map(|c| c.cell(r)).collect(),
            visible: true,
        })
        .collect();
    let total = rows.len();
    log::debug!(
        "render {tab}: {total} of {} records, show reverted: {show_reverted}",
        records.len()
    );
    let mut table = Table {
        tab,
        headers: columns.iter().map(|c| c.header).collect(),
        inputs: vec![FilterInput::default(); columns.len()],
        rows,
        summary: Summary {
            target: tab.summary_id(),
            visible: total,
            total,
        },
        focus: None,
        listeners: Vec::new(),
    };
    table.listeners = filter::attach_listeners(&table);
    table
}

pub fn render_tab(tab: TabId, doc: &Document, show_reverted: bool) -> Table {
    match tab {
        TabId::DataConfig => {
            let entries = overview(doc);
            let records: Vec<&OverviewEntry> = entries.iter().collect();
            render(tab, &overview_columns(), &records, show_reverted)
        }
        _ => render(
            tab,
            &tab.columns(&doc.meta),
            &tab.records(doc),
            show_reverted,
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewEntry {
    pub name: &'static str,
    pub value: Cell,
}

impl Record for OverviewEntry {}

fn optional_date(seconds: Option<i64>) -> Cell {
    seconds
        .map(|t| Cell::plain(utc_seconds_to_date(t)))
        .unwrap_or_default()
}

pub fn overview(doc: &Document) -> Vec<OverviewEntry> {
    let meta = &doc.meta;
    let entry = |name, value| OverviewEntry { name, value };
    vec![
        entry("Upstream URL", Cell::plain(&meta.upstream_url)),
        entry("Upstream revision", Cell::plain(&meta.upstream_rev)),
        entry("Downstream URL", Cell::plain(&meta.downstream_url)),
        entry("Downstream revision", Cell::plain(&meta.downstream_rev)),
        entry(
            "Data was obtained at",
            optional_date(meta.authored_seconds_since_epoch),
        ),
        entry(
            "Last rebase/Merge base SHA",
            sha_to_link(&meta.downstream_url, &doc.merge_base.sha),
        ),
        entry(
            "Last rebase/Merge base timestamp",
            optional_date(doc.merge_base.authored_seconds_since_epoch),
        ),
        entry(
            "Number of noup commits",
            Cell::plain(classify::downstream_noup(doc).len().to_string()),
        ),
        entry(
            "Number of fromlist commits",
            Cell::plain(classify::downstream_from_list(doc).len().to_string()),
        ),
        entry(
            "Number of fromtree commits",
            Cell::plain(classify::downstream_from_tree(doc).len().to_string()),
        ),
        entry(
            "Number of commits upstream only",
            Cell::plain(classify::upstream_only(doc).len().to_string()),
        ),
        entry(
            "Number of commits to be synced",
            Cell::plain(classify::commits_to_be_synced(doc).to_string()),
        ),
    ]
}

fn overview_columns<'a>() -> Vec<Column<'a, OverviewEntry>> {
    vec![
        Column::new("Name", |e: &OverviewEntry| Cell::plain(e.name)),
        Column::new("Value", |e: &OverviewEntry| e.value.clone()),
    ]
}
