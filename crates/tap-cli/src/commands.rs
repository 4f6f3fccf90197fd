//! Command implementations

use std::path::Path;

use colored::Colorize;
use semver::Version;
use tap_fixture::{FixtureConfig, TapFixture};

use crate::error::{CliError, Result};

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<FixtureConfig> {
    match path {
        Some(path) => Ok(FixtureConfig::load(path)?),
        None => Ok(FixtureConfig::default()),
    }
}

/// Full lifecycle for each version. Cleanup runs whatever happened before it.
pub fn run_smoke(config: FixtureConfig, versions: &[Version]) -> Result<()> {
    let mut fixture = TapFixture::system(config)?;

    let outcome = smoke_steps(&mut fixture, versions);
    let cleaned = fixture.cleanup();

    outcome?;
    cleaned.map_err(|e| CliError::step("cleanup", e))?;
    println!("{} smoke run passed", "ok".green().bold());
    Ok(())
}

fn smoke_steps(fixture: &mut TapFixture, versions: &[Version]) -> Result<()> {
    fixture.setup().map_err(|e| CliError::step("setup", e))?;
    println!(
        "{} tap {} at {}",
        "provisioned".cyan(),
        fixture.config().tap_name,
        fixture.root().map(|p| p.display().to_string()).unwrap_or_default()
    );

    for version in versions {
        fixture
            .package_version(version.clone())
            .map_err(|e| CliError::step(format!("package {version}"), e))?;
        fixture
            .install()
            .map_err(|e| CliError::step(format!("install {version}"), e))?;
        fixture
            .uninstall()
            .map_err(|e| CliError::step(format!("uninstall {version}"), e))?;
        println!("{} {}", "passed".green(), version);
    }
    Ok(())
}

/// Lenient uninstall followed by untap, without provisioning anything.
pub fn run_cleanup(config: FixtureConfig) -> Result<()> {
    let mut fixture = TapFixture::system(config)?;
    if let Err(e) = fixture.uninstall() {
        tracing::warn!(error = %e, "Could not remove leftover installation");
    }
    fixture.cleanup()?;
    println!("{} leftovers removed", "ok".green().bold());
    Ok(())
}

/// Print the formula for `version`.
pub fn run_render(config: &FixtureConfig, version: &Version) -> Result<()> {
    let template = config.template()?;
    print!("{}", template.render(&config.package_name, version));
    Ok(())
}
