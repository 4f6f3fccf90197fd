//! End-to-end scenario against real `git` and `brew`
//!
//! Modifies the local Homebrew installation, so it only runs on request:
//! `cargo test -p integration-tests --test brew_tests -- --ignored`

use tap_fixture::runner::find_executable;
use tap_fixture::{FixtureConfig, TapFixture, Version};

fn tools_available() -> bool {
    find_executable("git").is_some() && find_executable("brew").is_some()
}

#[test]
#[ignore = "installs into the local Homebrew prefix"]
fn test_install_uninstall_scenario() {
    if !tools_available() {
        eprintln!("skipping: git or brew not found on PATH");
        return;
    }
    tap_fixture::logging::init_for_tests();

    let mut fixture = TapFixture::system(FixtureConfig::default()).unwrap();
    fixture.setup().unwrap();
    fixture.package_version(Version::new(1, 0, 0)).unwrap();
    fixture.install().unwrap();
    assert!(fixture.is_installed());
    fixture.uninstall().unwrap();
    assert!(!fixture.is_installed());
    fixture.cleanup().unwrap();
}

#[test]
#[ignore = "installs into the local Homebrew prefix"]
fn test_update_picks_up_newer_version() {
    if !tools_available() {
        eprintln!("skipping: git or brew not found on PATH");
        return;
    }
    tap_fixture::logging::init_for_tests();

    let mut fixture = TapFixture::system(FixtureConfig::default()).unwrap();
    fixture.setup().unwrap();
    fixture.package_version(Version::new(1, 0, 0)).unwrap();
    fixture.package_version(Version::new(1, 1, 0)).unwrap();
    fixture.install().unwrap();
    fixture.cleanup().unwrap();
}
