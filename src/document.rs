use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub meta: Meta,
    pub merge_base: MergeBase,
    #[serde(default)]
    pub upstream_commits: Vec<Commit>,
    #[serde(default)]
    pub downstream_commits: Vec<Commit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    pub upstream_url: String,
    pub upstream_rev: String,
    pub downstream_url: String,
    pub downstream_rev: String,
    // documents written by older collectors use the shorter key
    #[serde(default, alias = "seconds_since_epoch")]
    pub authored_seconds_since_epoch: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeBase {
    pub sha: String,
    #[serde(default, alias = "seconds_since_epoch")]
    pub authored_seconds_since_epoch: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Commit {
    pub sha: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authored_seconds_since_epoch: Option<i64>,
    #[serde(
        default,
        alias = "seconds_since_epoch",
        skip_serializing_if = "Option::is_none"
    )]
    pub committed_seconds_since_epoch: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_pr: Option<PullRequestRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_sha_guess: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downstream_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downstream_sha_guess: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverted_by_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverts_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_clean_cherry_pick: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PullRequestRef {
    Number(u64),
    Text(String),
}

impl PullRequestRef {
    pub fn parse(s: &str) -> Self {
        let id = s.trim().rsplit('/').next().unwrap_or_default();
        match id.parse() {
            Ok(n) => PullRequestRef::Number(n),
            Err(_) => PullRequestRef::Text(id.to_owned()),
        }
    }

    pub fn id(&self) -> String {
        match self {
            PullRequestRef::Number(n) => n.to_string(),
            PullRequestRef::Text(s) => s.rsplit('/').next().unwrap_or_default().to_owned(),
        }
    }

    pub fn url(&self, upstream_url: &str) -> String {
        match self {
            PullRequestRef::Text(s) if s.contains("://") => s.clone(),
            _ => format!("{}/pull/{}", upstream_url.trim_end_matches('/'), self.id()),
        }
    }

    pub fn is_set(&self) -> bool {
        match self {
            PullRequestRef::Number(n) => *n != 0,
            PullRequestRef::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.id())
    }
}

pub fn is_set(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

impl Commit {
    pub fn has_upstream_pr(&self) -> bool {
        self.upstream_pr.as_ref().is_some_and(PullRequestRef::is_set)
    }

    pub fn in_revert_pair(&self) -> bool {
        is_set(&self.reverted_by_sha) || is_set(&self.reverts_sha)
    }
}

impl Document {
    pub fn duplicate_shas(&self) -> Vec<String> {
        let mut result = Vec::new();
        for commits in [&self.upstream_commits, &self.downstream_commits] {
            let mut seen = BTreeSet::new();
            for commit in commits {
                if !seen.insert(commit.sha.as_str()) {
                    result.push(commit.sha.clone());
                }
            }
        }
        result
    }
}
