//! The tap fixture: provisioning, publishing and the install lifecycle.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use tempfile::TempDir;
use url::Url;

use crate::config::{FixtureConfig, Tool};
use crate::error::{Error, Result};
use crate::formula::{self, FORMULA_DIR, FormulaTemplate};
use crate::runner::{self, CommandRunner, Invocation, SystemRunner, Verify};
use crate::state::InstallState;

const TEMP_PREFIX: &str = "tap-fixture-";

/// A disposable Homebrew tap with one formula in it.
///
/// ```rust,no_run
/// use tap_fixture::{FixtureConfig, TapFixture};
///
/// let mut fixture = TapFixture::system(FixtureConfig::default())?;
/// fixture.setup()?;
/// fixture.package_version("1.0.0".parse()?)?;
/// fixture.install()?;
/// assert!(fixture.is_installed());
/// fixture.uninstall()?;
/// fixture.cleanup()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// Dropping the fixture runs [`cleanup`](Self::cleanup) if it has not run
/// since the last [`setup`](Self::setup).
pub struct TapFixture<R: CommandRunner = SystemRunner> {
    config: FixtureConfig,
    template: FormulaTemplate,
    runner: R,
    root: Option<TempDir>,
    /// Set once every setup step succeeded.
    ready: bool,
    state: InstallState,
    version: Version,
    cleanup_pending: bool,
}

impl TapFixture<SystemRunner> {
    /// Fixture driving the real `git` and `brew` executables.
    pub fn system(config: FixtureConfig) -> Result<Self> {
        Self::new(config, SystemRunner)
    }
}

impl<R: CommandRunner> TapFixture<R> {
    /// Create an empty fixture. Nothing touches the filesystem or the package
    /// manager until [`setup`](Self::setup).
    pub fn new(config: FixtureConfig, runner: R) -> Result<Self> {
        config.validate()?;
        let template = config.template()?;
        Ok(Self {
            config,
            template,
            runner,
            root: None,
            ready: false,
            state: InstallState::NotInstalled,
            version: Version::new(1, 0, 0),
            cleanup_pending: false,
        })
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    /// Root of the tap repository while provisioned.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_ref().map(TempDir::path)
    }

    /// Whether setup completed successfully.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_installed(&self) -> bool {
        self.state.is_installed()
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Version used by the next [`package`](Self::package).
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// Absolute path of the formula file while provisioned.
    pub fn formula_path(&self) -> Option<PathBuf> {
        self.root()
            .map(|root| root.join(formula::relative_path(&self.config.package_name)))
    }

    /// `file://` URL of the tap's git metadata directory.
    pub fn tap_url(&self) -> Result<Url> {
        let git_dir = self.require_root()?.join(".git");
        Url::from_file_path(&git_dir).map_err(|()| Error::InvalidTapPath { path: git_dir })
    }

    /// Provision the tap: temp directory, git repository, registration.
    ///
    /// On error the fixture must only be cleaned up, not used.
    pub fn setup(&mut self) -> Result<()> {
        if let Some(root) = self.root() {
            return Err(Error::AlreadyProvisioned {
                root: root.to_path_buf(),
            });
        }
        self.cleanup_pending = true;
        self.ready = false;

        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir()
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;
        let root = dir.path().to_path_buf();
        self.root = Some(dir);
        tracing::debug!(root = %root.display(), "Created tap directory");

        let formula_dir = root.join(FORMULA_DIR);
        fs::create_dir_all(&formula_dir).map_err(|e| Error::io(&formula_dir, e))?;

        self.git(["init"])?;
        let identity = self.config.git_identity.clone();
        self.git(["config", "user.name", identity.name.as_str()])?;
        self.git(["config", "user.email", identity.email.as_str()])?;
        self.git(["config", "commit.gpgsign", "false"])?;

        let tap_name = self.config.tap_name.clone();
        let url = self.tap_url()?;
        self.brew(Verify::Strict, ["tap", tap_name.as_str(), url.as_str()])?;

        // A crashed earlier run may have left the package installed.
        if let Err(e) = self.uninstall() {
            tracing::warn!(error = %e, "Could not remove leftover installation");
        }

        self.ready = true;
        tracing::info!(tap = %tap_name, root = %root.display(), "Tap provisioned");
        Ok(())
    }

    /// Write the formula for the current version and commit it.
    pub fn package(&mut self) -> Result<()> {
        if !self.ready {
            return Err(Error::NotProvisioned);
        }
        let root = self.require_root()?.to_path_buf();
        let relative = formula::relative_path(&self.config.package_name);
        let path = root.join(&relative);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let text = self.template.render(&self.config.package_name, &self.version);
        fs::write(&path, text).map_err(|e| Error::io(&path, e))?;

        let message = format!("Updated test formula to {}", self.version);
        self.git(["add", relative.as_str()])?;
        self.git(["commit", "--allow-empty", "-m", message.as_str()])?;

        tracing::debug!(version = %self.version, "Published formula");
        Ok(())
    }

    /// Set the version and publish it.
    pub fn package_version(&mut self, version: Version) -> Result<()> {
        self.set_version(version);
        self.package()
    }

    /// Refresh the package manager and install the package.
    pub fn install(&mut self) -> Result<()> {
        if self.state.is_installed() {
            return Err(Error::AlreadyInstalled);
        }
        if !self.ready {
            return Err(Error::NotProvisioned);
        }

        let package = self.config.package_name.clone();
        self.brew(Verify::Strict, ["update"])?;
        self.brew(Verify::Strict, ["install", package.as_str()])?;

        self.state = InstallState::Installed;
        tracing::debug!(package = %package, "Installed");
        Ok(())
    }

    /// Force-uninstall the package.
    ///
    /// Verified only when this fixture installed it. The state is
    /// `NotInstalled` afterwards even when the command failed.
    pub fn uninstall(&mut self) -> Result<()> {
        let verify = self.state.uninstall_verify();
        let package = self.config.package_name.clone();
        let result = self.brew(verify, ["uninstall", "--force", package.as_str()]);

        self.state = InstallState::NotInstalled;
        tracing::debug!(package = %package, "Uninstalled");
        result
    }

    /// Restore a clean package manager state and release the tap directory.
    ///
    /// Uninstalls the package if this fixture installed it, then deregisters
    /// the tap on a best-effort basis. Every step runs even if an earlier
    /// one failed; the only error returned is a failed uninstall of an
    /// installed package. Safe to call repeatedly and after a failed setup.
    pub fn cleanup(&mut self) -> Result<()> {
        let uninstalled = if self.state.is_installed() {
            self.uninstall()
        } else {
            Ok(())
        };

        let tap_name = self.config.tap_name.clone();
        if let Err(e) = self.brew(Verify::Lenient, ["untap", tap_name.as_str()]) {
            tracing::warn!(error = %e, tap = %tap_name, "Could not deregister tap");
        }

        if let Some(dir) = self.root.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!(error = %e, root = %path.display(), "Could not remove tap directory");
            }
        }

        self.ready = false;
        self.cleanup_pending = false;
        uninstalled
    }

    fn require_root(&self) -> Result<&Path> {
        self.root().ok_or(Error::NotProvisioned)
    }

    fn tool(&self, tool: Tool) -> Result<PathBuf> {
        if let Some(path) = self.config.tool_override(tool) {
            return Ok(path.to_path_buf());
        }
        let name = tool.executable_name();
        self.runner.locate(name).ok_or_else(|| Error::ToolNotFound {
            name: name.to_string(),
        })
    }

    fn git<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let root = self.require_root()?.to_path_buf();
        let invocation = Invocation::new(self.tool(Tool::Git)?)
            .args(args)
            .current_dir(root);
        runner::run(&mut self.runner, &invocation)
    }

    fn brew<I, S>(&mut self, verify: Verify, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let invocation = Invocation::new(self.tool(Tool::Brew)?)
            .args(args)
            .verify(verify);
        runner::run(&mut self.runner, &invocation)
    }
}

impl<R: CommandRunner> Drop for TapFixture<R> {
    fn drop(&mut self) {
        if self.cleanup_pending
            && let Err(e) = self.cleanup()
        {
            tracing::error!(error = %e, "Fixture cleanup failed");
        }
    }
}

impl<R: CommandRunner> std::fmt::Debug for TapFixture<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapFixture")
            .field("tap_name", &self.config.tap_name)
            .field("package_name", &self.config.package_name)
            .field("root", &self.root())
            .field("ready", &self.ready)
            .field("state", &self.state)
            .field("version", &self.version)
            .finish()
    }
}
