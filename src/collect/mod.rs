pub mod annotate;

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Utc;
use git2::{Commit as GitCommit, ErrorCode, Oid, Repository, Sort};
use tokio::task;

use crate::document::{is_set, Commit, Document, MergeBase, Meta};
use crate::error::Error;
use crate::options::CollectOptions;

use self::annotate::{annotate, RawCommit};

pub async fn collect(options: CollectOptions) -> Result<Document, Error> {
    let path = options.clone_dir.clone();
    clone_or_open(&path, &options.upstream_url, &options.upstream_remote).await?;
    ensure_remote(&path, &options.downstream_url, &options.downstream_remote).await?;
    if options.refetch_remote {
        log::info!("fetching changes upstream");
        fetch(&path, &options.upstream_remote).await?;
        log::info!("fetching changes downstream");
        fetch(&path, &options.downstream_remote).await?;
    }
    task::spawn_blocking(move || build_document(&options)).await?
}

async fn clone_or_open(path: &Path, url: &str, remote: &str) -> Result<(), Error> {
    if path.exists() {
        // a directory used by something else fails to open here
        Repository::open(path)?;
        return ensure_remote(path, url, remote).await;
    }
    log::info!("try clone '{url}' into {path:?}");
    let output = {
        let url = url.to_owned();
        let path = path.to_owned();
        let remote = remote.to_owned();
        task::spawn_blocking(move || {
            Command::new("git")
                .arg("clone")
                .arg("--origin")
                .arg(remote)
                .arg(url)
                .arg(path)
                .output()
        })
        .await??
    };
    if !output.status.success() {
        return Err(Error::GitClone {
            url: url.to_owned(),
            path: path.to_owned(),
            output,
        });
    }
    log::info!("cloned git repository {path:?}");
    Ok(())
}

pub async fn ensure_remote(path: &Path, url: &str, name: &str) -> Result<(), Error> {
    let added = {
        let repo = Repository::open(path)?;
        let added = match repo.find_remote(name) {
            Ok(remote) => {
                let actual = remote
                    .url()
                    .ok_or_else(|| Error::RemoteWithoutUrl(name.to_owned()))?;
                if actual != url {
                    return Err(Error::RemoteMismatch {
                        name: name.to_owned(),
                        expected: url.to_owned(),
                        actual: actual.to_owned(),
                    });
                }
                false
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                log::info!("adding remote named {name} pointing to {url}");
                repo.remote(name, url)?;
                true
            }
            Err(e) => return Err(e.into()),
        };
        added
    };
    if added {
        fetch(path, name).await?;
    }
    Ok(())
}

pub async fn fetch(path: &Path, remote: &str) -> Result<(), Error> {
    log::info!("fetch {remote} in {path:?}");
    let output = {
        let path: PathBuf = path.to_owned();
        let remote = remote.to_owned();
        task::spawn_blocking(move || {
            Command::new("git")
                .arg("fetch")
                .arg(remote)
                .current_dir(path)
                .output()
        })
        .await??
    };
    if !output.status.success() {
        return Err(Error::GitFetch {
            remote: remote.to_owned(),
            output,
        });
    }
    Ok(())
}

fn resolve<'r>(repo: &'r Repository, remote: &str, rev: &str) -> Result<GitCommit<'r>, Error> {
    let name = format!("{remote}/{rev}");
    log::debug!("resolve {name}");
    Ok(repo.revparse_single(&name)?.peel_to_commit()?)
}

fn raw_commit(commit: &GitCommit) -> RawCommit {
    let author = commit.author();
    RawCommit {
        sha: commit.id().to_string(),
        summary: commit.summary().unwrap_or_default().to_owned(),
        message: commit.message().unwrap_or_default().to_owned(),
        author: author.name().map(str::to_owned),
        author_email: author.email().map(str::to_owned),
        authored_seconds_since_epoch: author.when().seconds(),
        committed_seconds_since_epoch: commit.time().seconds(),
    }
}

fn commits_after(repo: &Repository, tip: Oid, base: Oid) -> Result<Vec<RawCommit>, Error> {
    let mut walk = repo.revwalk()?;
    walk.set_sorting(Sort::TIME)?;
    walk.push(tip)?;
    walk.hide(base)?;
    let mut result = Vec::new();
    for oid in walk {
        let commit = repo.find_commit(oid?)?;
        result.push(raw_commit(&commit));
    }
    Ok(result)
}

fn check_cherry_picks(
    repo: &Repository,
    onto: &GitCommit,
    commits: &mut [Commit],
) -> Result<(), Error> {
    for commit in commits
        .iter_mut()
        .filter(|c| !is_set(&c.downstream_sha) && !is_set(&c.downstream_sha_guess))
    {
        let picked = repo.find_commit(Oid::from_str(&commit.sha)?)?;
        commit.supports_clean_cherry_pick = match repo.cherrypick_commit(&picked, onto, 0, None) {
            Ok(index) => Some(!index.has_conflicts()),
            Err(e) => {
                log::debug!("can not cherry-pick {}: {e}", commit.sha);
                None
            }
        };
    }
    Ok(())
}

pub fn build_document(options: &CollectOptions) -> Result<Document, Error> {
    let repo = Repository::open(&options.clone_dir)?;
    let upstream_tip = resolve(&repo, &options.upstream_remote, &options.upstream_rev)?;
    let downstream_tip = resolve(&repo, &options.downstream_remote, &options.downstream_rev)?;
    let base_oid = repo.merge_base(upstream_tip.id(), downstream_tip.id())?;
    let base = repo.find_commit(base_oid)?;
    log::info!("merge base of upstream and downstream: {base_oid}");

    let upstream = commits_after(&repo, upstream_tip.id(), base_oid)?;
    let downstream = commits_after(&repo, downstream_tip.id(), base_oid)?;
    let (mut upstream_commits, downstream_commits) = annotate(&upstream, &downstream);
    if options.check_cherry_pick {
        log::info!("checking cherry-picks onto {}", downstream_tip.id());
        check_cherry_picks(&repo, &downstream_tip, &mut upstream_commits)?;
    }

    let base_time = base.author().when().seconds();
    let document = Document {
        meta: Meta {
            upstream_url: options.upstream_url.clone(),
            upstream_rev: options.upstream_rev.clone(),
            downstream_url: options.downstream_url.clone(),
            downstream_rev: options.downstream_rev.clone(),
            authored_seconds_since_epoch: Some(Utc::now().timestamp()),
        },
        merge_base: MergeBase {
            sha: base_oid.to_string(),
            authored_seconds_since_epoch: Some(base_time),
        },
        upstream_commits,
        downstream_commits,
    };
    Ok(document)
}
