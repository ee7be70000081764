use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify;
use crate::document::{is_set, Commit, Document};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Stats {
    pub time: Option<DateTime<Utc>>,
    pub upstream_commits: usize,
    pub downstream_commits: usize,
    pub noup: usize,
    pub fromtree: usize,
    pub fromlist: usize,
    pub fromlist_likely_merged: usize,
    pub upstream_only: usize,
    pub bluetooth_upstream_only: usize,
}

fn not_reverted(commit: &Commit) -> bool {
    !is_set(&commit.reverted_by_sha)
}

fn is_bluetooth(commit: &Commit) -> bool {
    commit.title.starts_with("Bluetooth") || commit.title.starts_with("bluetooth")
}

fn count<F>(commits: &[Commit], predicate: F) -> usize
where
    F: Fn(&Commit) -> bool,
{
    commits.iter().filter(|c| predicate(c)).count()
}

pub fn collect(doc: &Document) -> Stats {
    let downstream = &doc.downstream_commits;
    Stats {
        time: doc
            .meta
            .authored_seconds_since_epoch
            .and_then(|t| DateTime::from_timestamp(t, 0)),
        upstream_commits: doc.upstream_commits.len(),
        downstream_commits: downstream.len(),
        noup: count(downstream, |c| classify::is_noup(c) && not_reverted(c)),
        fromtree: count(downstream, |c| {
            classify::is_from_tree_title(c) && not_reverted(c)
        }),
        fromlist: count(downstream, |c| {
            classify::is_from_list_title(c) && not_reverted(c)
        }),
        fromlist_likely_merged: count(downstream, |c| {
            classify::is_from_list_title(c) && not_reverted(c) && is_set(&c.upstream_sha_guess)
        }),
        upstream_only: classify::upstream_only(doc).len(),
        bluetooth_upstream_only: classify::upstream_only(doc)
            .into_iter()
            .filter(|c| is_bluetooth(c))
            .count(),
    }
}
