//! Fixture tests against a real `git`, with `brew` scripted
//!
//! These check what actually lands in the tap repository. They skip when no
//! `git` executable is on PATH.

use pretty_assertions::assert_eq;
use tap_fixture::{FixtureConfig, TapFixture, Version};
use tap_test_utils::git::{commit_count, committed_file, git_available, head_message};
use tap_test_utils::ScriptedRunner;

const FORMULA: &str = "Formula/tapfixturetestpackage.rb";

fn real_git_fixture() -> Option<TapFixture<ScriptedRunner>> {
    if !git_available() {
        eprintln!("skipping: git not found on PATH");
        return None;
    }
    tap_fixture::logging::init_for_tests();
    let runner = ScriptedRunner::new().passthrough("git");
    let mut fixture = TapFixture::new(FixtureConfig::default(), runner).unwrap();
    fixture.setup().unwrap();
    Some(fixture)
}

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

#[test]
fn test_setup_initializes_repository() {
    let Some(fixture) = real_git_fixture() else {
        return;
    };
    let root = fixture.root().unwrap();

    assert!(root.join(".git").is_dir());
    assert!(root.join("Formula").is_dir());
    assert_eq!(commit_count(root), 0);
}

#[test]
fn test_package_commits_formula() {
    let Some(mut fixture) = real_git_fixture() else {
        return;
    };
    fixture.package_version(v("1.0.0")).unwrap();
    let root = fixture.root().unwrap();

    assert_eq!(commit_count(root), 1);
    assert_eq!(head_message(root), "Updated test formula to 1.0.0");
    let committed = committed_file(root, FORMULA);
    assert!(committed.contains("version \"1.0.0\""));
}

#[test]
fn test_latest_version_is_at_head() {
    let Some(mut fixture) = real_git_fixture() else {
        return;
    };
    fixture.package_version(v("1.0.0")).unwrap();
    fixture.package_version(v("1.2.0")).unwrap();
    let root = fixture.root().unwrap();

    assert_eq!(commit_count(root), 2);
    assert_eq!(head_message(root), "Updated test formula to 1.2.0");
    let committed = committed_file(root, FORMULA);
    assert!(committed.contains("version \"1.2.0\""));
    assert!(!committed.contains("version \"1.0.0\""));
}

#[test]
fn test_republishing_same_version_does_not_fail() {
    let Some(mut fixture) = real_git_fixture() else {
        return;
    };
    fixture.package_version(v("1.0.0")).unwrap();
    fixture.package().unwrap();

    assert_eq!(commit_count(fixture.root().unwrap()), 2);
}

#[test]
fn test_full_cycle_with_scripted_brew() {
    let Some(mut fixture) = real_git_fixture() else {
        return;
    };
    fixture.package_version(v("1.0.0")).unwrap();
    fixture.install().unwrap();
    assert!(fixture.is_installed());
    fixture.uninstall().unwrap();
    assert!(!fixture.is_installed());

    fixture.package_version(v("2.0.0")).unwrap();
    fixture.install().unwrap();
    let root = fixture.root().unwrap().to_path_buf();
    fixture.cleanup().unwrap();

    assert!(!fixture.is_installed());
    assert!(!root.exists());
}
