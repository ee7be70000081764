use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::NOUP_PREFIX;
use crate::document::{Commit, PullRequestRef};

static UPSTREAM_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^Upstream PR(?: #)?: (?P<upstream_pr>.+)|^\(cherry picked from commit (?P<upstream_sha>[0-9a-f]+)\)",
    )
    .unwrap()
});

static REVERT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^This reverts commit (?P<sha>[0-9a-f]+)").unwrap());

const REVERT_PREFIX: &str = "Revert";
const FROM_LIST_TITLE_PREFIX: &str = "[nrf fromlist] ";

/// What the collector reads from a git commit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCommit {
    pub sha: String,
    pub summary: String,
    pub message: String,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub authored_seconds_since_epoch: i64,
    pub committed_seconds_since_epoch: i64,
}

impl RawCommit {
    fn describe(&self) -> Commit {
        Commit {
            sha: self.sha.clone(),
            title: self.summary.clone(),
            author: self.author.clone(),
            author_email: self.author_email.clone(),
            authored_seconds_since_epoch: Some(self.authored_seconds_since_epoch),
            committed_seconds_since_epoch: Some(self.committed_seconds_since_epoch),
            ..Default::default()
        }
    }

    fn is_revert(&self) -> bool {
        self.summary.starts_with(REVERT_PREFIX)
    }

    /// The first upstream reference in the message, either a pull request
    /// or the commit it was cherry-picked from.
    pub fn upstream_reference(&self) -> (Option<PullRequestRef>, Option<String>) {
        if self.is_revert() || self.summary.starts_with(NOUP_PREFIX) {
            return (None, None);
        }
        match UPSTREAM_REF_RE.captures(&self.message) {
            None => (None, None),
            Some(captures) => (
                captures
                    .name("upstream_pr")
                    .map(|m| PullRequestRef::parse(m.as_str())),
                captures.name("upstream_sha").map(|m| m.as_str().to_owned()),
            ),
        }
    }

    pub fn reverted_sha(&self) -> Option<String> {
        if !self.is_revert() {
            return None;
        }
        REVERT_RE
            .captures(&self.message)
            .and_then(|c| c.name("sha"))
            .map(|m| m.as_str().to_owned())
    }
}

/// Links the two histories, both given newest first.
pub fn annotate(upstream: &[RawCommit], downstream: &[RawCommit]) -> (Vec<Commit>, Vec<Commit>) {
    let mut downstream_commits = Vec::with_capacity(downstream.len());
    let mut picked_from: BTreeMap<String, String> = BTreeMap::new();
    let mut from_list_titles: BTreeMap<String, usize> = BTreeMap::new();
    let mut reverted_by: BTreeMap<String, String> = BTreeMap::new();

    for raw in downstream {
        let mut item = raw.describe();
        let (upstream_pr, upstream_sha) = raw.upstream_reference();
        item.upstream_pr = upstream_pr;
        item.upstream_sha = upstream_sha;
        item.reverts_sha = raw.reverted_sha();

        if let Some(sha) = &item.upstream_sha {
            picked_from.insert(sha.clone(), item.sha.clone());
        } else if item.upstream_pr.is_some() {
            let title = raw
                .summary
                .strip_prefix(FROM_LIST_TITLE_PREFIX)
                .unwrap_or(&raw.summary);
            from_list_titles.insert(title.to_owned(), downstream_commits.len());
        }
        if let Some(sha) = &item.reverts_sha {
            reverted_by.insert(sha.clone(), item.sha.clone());
        }
        // reverts are newer than what they revert, so they come first
        item.reverted_by_sha = reverted_by.get(&item.sha).cloned();
        downstream_commits.push(item);
    }

    let mut upstream_commits = Vec::with_capacity(upstream.len());
    for raw in upstream {
        let mut item = raw.describe();
        item.downstream_sha = picked_from.get(&raw.sha).cloned();
        if let Some(&index) = from_list_titles.get(&raw.summary) {
            let picked: &mut Commit = &mut downstream_commits[index];
            picked.upstream_sha_guess = Some(raw.sha.clone());
            item.downstream_sha_guess = Some(picked.sha.clone());
        }
        upstream_commits.push(item);
    }

    log::info!(
        "annotated {} upstream and {} downstream commits, {} picked by sha, {} by pull request",
        upstream_commits.len(),
        downstream_commits.len(),
        picked_from.len(),
        from_list_titles.len()
    );
    (upstream_commits, downstream_commits)
}
