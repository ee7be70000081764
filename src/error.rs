use std::path::PathBuf;

use thiserror::Error;

use crate::tab::TabId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unclosed quote")]
    UnclosedQuote,
    #[error("bad escape")]
    BadEscape,
    #[error("{0}")]
    Clap(#[from] clap::Error),
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
    #[error("failed to clone git repository '{url}' into {path:?}, output: {output:?}")]
    GitClone {
        url: String,
        path: PathBuf,
        output: std::process::Output,
    },
    #[error("failed to fetch remote '{remote}', output: {output:?}")]
    GitFetch {
        remote: String,
        output: std::process::Output,
    },
    #[error("remote '{name}' points to '{actual}', expected '{expected}'")]
    RemoteMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("remote '{0}' has no url")]
    RemoteWithoutUrl(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),
    #[error("task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("unknown tab: '{0}'")]
    UnknownTab(String),
    #[error("tab '{tab}' has no column {column}")]
    UnknownColumn { tab: TabId, column: usize },
    #[error("invalid selection range: '{0}'")]
    InvalidSelection(String),
    #[error("no document loaded")]
    NoDocument,
    #[error("load of {0} was superseded by a later load")]
    Superseded(String),
}
