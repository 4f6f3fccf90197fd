//! Inspection of tap repositories produced by a fixture.
//!
//! Read-only helpers built on `git2`, so assertions do not go through the
//! runner under test.

use std::path::Path;

use tap_fixture::runner::find_executable;

/// Whether a `git` executable is on `PATH`.
///
/// Tests that pass `git` through to the real binary skip when this is false.
pub fn git_available() -> bool {
    find_executable("git").is_some()
}

/// Subject line of the commit `HEAD` points to.
///
/// # Panics
/// Panics if `root` is not a repository with at least one commit.
pub fn head_message(root: &Path) -> String {
    let repo = open(root);
    let commit = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .unwrap_or_else(|e| panic!("head_message: no HEAD commit in {}: {e}", root.display()));
    commit.summary().unwrap_or_default().to_string()
}

/// Number of commits reachable from `HEAD`; 0 for an unborn branch.
///
/// # Panics
/// Panics if `root` is not a repository.
pub fn commit_count(root: &Path) -> usize {
    let repo = open(root);
    if repo.head().is_err() {
        return 0;
    }
    let mut walk = repo
        .revwalk()
        .unwrap_or_else(|e| panic!("commit_count: revwalk failed: {e}"));
    walk.push_head()
        .unwrap_or_else(|e| panic!("commit_count: push_head failed: {e}"));
    walk.count()
}

/// Content of `path` (relative to the repository root) as committed at `HEAD`.
///
/// # Panics
/// Panics if there is no such file in the `HEAD` tree.
pub fn committed_file(root: &Path, path: &str) -> String {
    let repo = open(root);
    let tree = repo
        .head()
        .and_then(|h| h.peel_to_tree())
        .unwrap_or_else(|e| panic!("committed_file: no HEAD tree: {e}"));
    let entry = tree
        .get_path(Path::new(path))
        .unwrap_or_else(|e| panic!("committed_file: {path} not in HEAD: {e}"));
    let blob = repo
        .find_blob(entry.id())
        .unwrap_or_else(|e| panic!("committed_file: {path} is not a blob: {e}"));
    String::from_utf8_lossy(blob.content()).into_owned()
}

fn open(root: &Path) -> git2::Repository {
    git2::Repository::open(root)
        .unwrap_or_else(|e| panic!("failed to open repository at {}: {e}", root.display()))
}
