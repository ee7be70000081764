use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classify;
use crate::document::{Commit, Document, Meta};
use crate::error::Error;
use crate::format::{pr_to_link, sha_to_link, utc_seconds_to_date, Cell};
use crate::table::Column;

#[derive(
    clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum TabId {
    #[value(name = "data_config")]
    DataConfig,
    #[value(name = "commits_noup")]
    #[serde(rename = "commits_noup")]
    NoUp,
    #[value(name = "commits_fromlist")]
    #[serde(rename = "commits_fromlist")]
    FromList,
    #[value(name = "commits_fromtree")]
    #[serde(rename = "commits_fromtree")]
    FromTree,
    #[value(name = "commits_only_downstream")]
    #[serde(rename = "commits_only_downstream")]
    OnlyDownstream,
    #[value(name = "commits_reverted")]
    #[serde(rename = "commits_reverted")]
    Reverted,
    #[value(name = "commits_not_downstream")]
    #[serde(rename = "commits_not_downstream")]
    UpstreamOnly,
}

impl TabId {
    pub const ALL: [TabId; 7] = [
        TabId::DataConfig,
        TabId::NoUp,
        TabId::FromList,
        TabId::FromTree,
        TabId::OnlyDownstream,
        TabId::Reverted,
        TabId::UpstreamOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TabId::DataConfig => "data_config",
            TabId::NoUp => "commits_noup",
            TabId::FromList => "commits_fromlist",
            TabId::FromTree => "commits_fromtree",
            TabId::OnlyDownstream => "commits_only_downstream",
            TabId::Reverted => "commits_reverted",
            TabId::UpstreamOnly => "commits_not_downstream",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TabId::DataConfig => "Data source",
            TabId::NoUp => "noup",
            TabId::FromList => "fromlist",
            TabId::FromTree => "fromtree",
            TabId::OnlyDownstream => "Downstream only",
            TabId::Reverted => "Reverted",
            TabId::UpstreamOnly => "Upstream only",
        }
    }

    pub fn table_id(self) -> String {
        format!("tbl_{}", self.as_str())
    }

    pub fn summary_id(self) -> String {
        format!("summary_{}", self.as_str())
    }

    pub fn records(self, doc: &Document) -> Vec<&Commit> {
        match self {
            TabId::DataConfig => Vec::new(),
            TabId::NoUp => classify::downstream_noup(doc),
            TabId::FromList => classify::downstream_from_list(doc),
            TabId::FromTree => classify::downstream_from_tree(doc),
            TabId::OnlyDownstream => classify::downstream_only(doc),
            TabId::Reverted => classify::downstream_reverted(doc),
            TabId::UpstreamOnly => classify::upstream_only(doc),
        }
    }

    pub fn columns(self, meta: &Meta) -> Vec<Column<'_, Commit>> {
        let up = meta.upstream_url.as_str();
        let down = meta.downstream_url.as_str();
        match self {
            TabId::DataConfig => Vec::new(),
            TabId::NoUp | TabId::OnlyDownstream => vec![
                title(),
                sha(down),
                committed_date(),
                upstream_pr(up),
                author(),
            ],
            TabId::FromList => vec![
                title(),
                sha(down),
                committed_date(),
                upstream_pr(up),
                Column::new("Upstream SHA guess", move |c: &Commit| {
                    optional_sha(up, &c.upstream_sha_guess)
                }),
                author(),
            ],
            TabId::FromTree => vec![
                title(),
                sha(down),
                Column::new("Upstream SHA", move |c: &Commit| {
                    optional_sha(up, &c.upstream_sha)
                }),
                committed_date(),
                author(),
            ],
            TabId::Reverted => vec![
                title(),
                sha(down),
                Column::new("Reverted by", move |c: &Commit| {
                    optional_sha(down, &c.reverted_by_sha)
                }),
                committed_date(),
                author(),
            ],
            TabId::UpstreamOnly => vec![
                title(),
                sha(up),
                committed_date(),
                author(),
                Column::new("Clean cherry-pick", |c: &Commit| {
                    match c.supports_clean_cherry_pick {
                        Some(true) => Cell::plain("yes"),
                        Some(false) => Cell::plain("no"),
                        None => Cell::empty(),
                    }
                }),
            ],
        }
    }
}

fn title<'a>() -> Column<'a, Commit> {
    Column::new("Title", |c: &Commit| Cell::plain(&c.title))
}

fn sha(repo_url: &str) -> Column<'_, Commit> {
    Column::new("SHA", move |c: &Commit| sha_to_link(repo_url, &c.sha))
}

fn committed_date<'a>() -> Column<'a, Commit> {
    Column::new("Committed date", |c: &Commit| {
        c.committed_seconds_since_epoch
            .map(|t| Cell::plain(utc_seconds_to_date(t)))
            .unwrap_or_default()
    })
}

fn upstream_pr(upstream_url: &str) -> Column<'_, Commit> {
    Column::new("Upstream PR", move |c: &Commit| match &c.upstream_pr {
        Some(pr) if pr.is_set() => pr_to_link(upstream_url, pr),
        _ => Cell::empty(),
    })
}

fn author<'a>() -> Column<'a, Commit> {
    Column::new("Author", |c: &Commit| {
        c.author.as_deref().map(Cell::plain).unwrap_or_default()
    })
}

fn optional_sha(repo_url: &str, sha: &Option<String>) -> Cell {
    match sha.as_deref() {
        Some(s) if !s.is_empty() => sha_to_link(repo_url, s),
        _ => Cell::empty(),
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TabId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TabId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownTab(s.to_owned()))
    }
}
