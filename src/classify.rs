use crate::document::{is_set, Commit, Document};

pub const NOUP_PREFIX: &str = "[nrf noup]";
pub const FROM_LIST_PREFIX: &str = "[nrf fromlist]";
pub const FROM_TREE_PREFIX: &str = "[nrf fromtree]";

pub fn is_noup(commit: &Commit) -> bool {
    commit.title.starts_with(NOUP_PREFIX)
}

pub fn is_from_list_title(commit: &Commit) -> bool {
    commit.title.starts_with(FROM_LIST_PREFIX)
}

pub fn is_from_tree_title(commit: &Commit) -> bool {
    commit.title.starts_with(FROM_TREE_PREFIX)
}

pub fn downstream_noup(doc: &Document) -> Vec<&Commit> {
    select(&doc.downstream_commits, is_noup)
}

pub fn downstream_from_list(doc: &Document) -> Vec<&Commit> {
    select(&doc.downstream_commits, Commit::has_upstream_pr)
}

pub fn downstream_from_tree(doc: &Document) -> Vec<&Commit> {
    select(&doc.downstream_commits, |c| is_set(&c.upstream_sha))
}

pub fn downstream_only(doc: &Document) -> Vec<&Commit> {
    select(&doc.downstream_commits, |c| {
        !is_set(&c.upstream_sha) && !is_set(&c.upstream_sha_guess)
    })
}

pub fn downstream_reverted(doc: &Document) -> Vec<&Commit> {
    select(&doc.downstream_commits, |c| is_set(&c.reverted_by_sha))
}

pub fn upstream_only(doc: &Document) -> Vec<&Commit> {
    select(&doc.upstream_commits, |c| {
        !is_set(&c.downstream_sha) && !is_set(&c.downstream_sha_guess)
    })
}

/// Upstream commits not yet brought in through a from-list pick.
pub fn commits_to_be_synced(doc: &Document) -> usize {
    doc.upstream_commits
        .len()
        .saturating_sub(downstream_from_list(doc).len())
}

fn select<F>(commits: &[Commit], predicate: F) -> Vec<&Commit>
where
    F: Fn(&Commit) -> bool,
{
    commits.iter().filter(|c| predicate(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MergeBase, Meta, PullRequestRef};

    fn commit(sha: &str, title: &str) -> Commit {
        Commit {
            sha: sha.to_owned(),
            title: title.to_owned(),
            ..Default::default()
        }
    }

    fn document() -> Document {
        Document {
            meta: Meta {
                upstream_url: "https://example.com/up".to_owned(),
                upstream_rev: "main".to_owned(),
                downstream_url: "https://example.com/down".to_owned(),
                downstream_rev: "main".to_owned(),
                authored_seconds_since_epoch: None,
            },
            merge_base: MergeBase {
                sha: "base".to_owned(),
                authored_seconds_since_epoch: None,
            },
            upstream_commits: vec![
                Commit {
                    downstream_sha: Some("d2".to_owned()),
                    ..commit("u1", "picked")
                },
                Commit {
                    downstream_sha_guess: Some("d1".to_owned()),
                    ..commit("u2", "fix X")
                },
                commit("u3", "Bluetooth: new thing"),
                Commit {
                    downstream_sha: Some(String::new()),
                    ..commit("u4", "empty counts as absent")
                },
            ],
            downstream_commits: vec![
                Commit {
                    upstream_pr: Some(PullRequestRef::Number(42)),
                    upstream_sha_guess: Some("u2".to_owned()),
                    ..commit("d1", "[nrf fromlist] fix X")
                },
                Commit {
                    upstream_sha: Some("u1".to_owned()),
                    reverted_by_sha: Some("d4".to_owned()),
                    ..commit("d2", "[nrf fromtree] picked")
                },
                commit("d3", "[nrf noup] local hack"),
                Commit {
                    reverts_sha: Some("d2".to_owned()),
                    ..commit("d4", "Revert \"[nrf fromtree] picked\"")
                },
                Commit {
                    upstream_pr: Some(PullRequestRef::Number(0)),
                    ..commit("d5", "[nrf fromlist] bogus pr")
                },
            ],
        }
    }

    fn shas(commits: Vec<&Commit>) -> Vec<&str> {
        commits.into_iter().map(|c| c.sha.as_str()).collect()
    }

    #[test]
    fn downstream_partitions() {
        let doc = document();
        assert_eq!(shas(downstream_noup(&doc)), vec!["d3"]);
        assert_eq!(shas(downstream_from_list(&doc)), vec!["d1"]);
        assert_eq!(shas(downstream_from_tree(&doc)), vec!["d2"]);
        assert_eq!(shas(downstream_only(&doc)), vec!["d3", "d4", "d5"]);
        assert_eq!(shas(downstream_reverted(&doc)), vec!["d2"]);
    }

    #[test]
    fn upstream_partitions() {
        let doc = document();
        assert_eq!(shas(upstream_only(&doc)), vec!["u3", "u4"]);
        assert_eq!(commits_to_be_synced(&doc), 3);
    }

    #[test]
    fn membership_laws() {
        let doc = document();
        let from_list = downstream_from_list(&doc);
        let from_tree = downstream_from_tree(&doc);
        let reverted = downstream_reverted(&doc);
        let noup = downstream_noup(&doc);
        let only = downstream_only(&doc);
        for c in &doc.downstream_commits {
            let contains = |set: &Vec<&Commit>| set.iter().any(|s| s.sha == c.sha);
            assert_eq!(contains(&from_list), c.has_upstream_pr());
            assert_eq!(contains(&from_tree), is_set(&c.upstream_sha));
            assert_eq!(contains(&reverted), is_set(&c.reverted_by_sha));
            assert_eq!(contains(&noup), c.title.starts_with(NOUP_PREFIX));
            assert_eq!(
                contains(&only),
                !is_set(&c.upstream_sha) && !is_set(&c.upstream_sha_guess)
            );
        }
        let upstream = upstream_only(&doc);
        for c in &doc.upstream_commits {
            let contains = upstream.iter().any(|s| s.sha == c.sha);
            assert_eq!(
                contains,
                !is_set(&c.downstream_sha) && !is_set(&c.downstream_sha_guess)
            );
        }
    }

    #[test]
    fn title_predicates() {
        assert!(is_from_list_title(&commit("a", "[nrf fromlist] x")));
        assert!(is_from_tree_title(&commit("a", "[nrf fromtree] x")));
        assert!(!is_noup(&commit("a", "x [nrf noup]")));
    }
}
