use crate::document::{Commit, Document, MergeBase, Meta, PullRequestRef};

pub const UPSTREAM_URL: &str = "https://github.com/example/upstream";
pub const DOWNSTREAM_URL: &str = "https://github.com/example/downstream";

pub fn commit(sha: &str, title: &str) -> Commit {
    Commit {
        sha: sha.to_owned(),
        title: title.to_owned(),
        ..Default::default()
    }
}

pub fn meta() -> Meta {
    Meta {
        upstream_url: UPSTREAM_URL.to_owned(),
        upstream_rev: "main".to_owned(),
        downstream_url: DOWNSTREAM_URL.to_owned(),
        downstream_rev: "main".to_owned(),
        authored_seconds_since_epoch: Some(1700500000),
    }
}

pub fn empty_document() -> Document {
    Document {
        meta: meta(),
        merge_base: MergeBase {
            sha: "base000000ffff".to_owned(),
            authored_seconds_since_epoch: Some(1690000000),
        },
        upstream_commits: Vec::new(),
        downstream_commits: Vec::new(),
    }
}

pub fn document() -> Document {
    let alice = || Some("Alice".to_owned());
    Document {
        upstream_commits: vec![
            Commit {
                downstream_sha: Some("d200000000aaaa".to_owned()),
                ..commit("u100000000bbbb", "picked")
            },
            Commit {
                downstream_sha_guess: Some("d100000000aaaa".to_owned()),
                ..commit("u200000000bbbb", "net: fix X")
            },
            commit("u300000000bbbb", "Bluetooth: new thing"),
            Commit {
                supports_clean_cherry_pick: Some(true),
                ..commit("u400000000bbbb", "drivers: foo")
            },
        ],
        downstream_commits: vec![
            Commit {
                upstream_pr: Some(PullRequestRef::Number(42)),
                upstream_sha_guess: Some("u200000000bbbb".to_owned()),
                author: alice(),
                committed_seconds_since_epoch: Some(1700000000),
                ..commit("d100000000aaaa", "[nrf fromlist] net: fix X")
            },
            Commit {
                upstream_sha: Some("u100000000bbbb".to_owned()),
                reverted_by_sha: Some("d400000000aaaa".to_owned()),
                ..commit("d200000000aaaa", "[nrf fromtree] picked")
            },
            commit("d300000000aaaa", "[nrf noup] local hack"),
            Commit {
                reverts_sha: Some("d200000000aaaa".to_owned()),
                ..commit("d400000000aaaa", "Revert \"[nrf fromtree] picked\"")
            },
            Commit {
                upstream_pr: Some(PullRequestRef::Text(format!("{UPSTREAM_URL}/pull/43"))),
                author: Some("Bob".to_owned()),
                committed_seconds_since_epoch: Some(1700100000),
                ..commit("d500000000aaaa", "[nrf fromlist] feat: add Y")
            },
            Commit {
                upstream_pr: Some(PullRequestRef::Number(44)),
                author: alice(),
                committed_seconds_since_epoch: Some(1700200000),
                ..commit("d600000000aaaa", "[nrf fromlist] feat: add Z")
            },
        ],
        ..empty_document()
    }
}
