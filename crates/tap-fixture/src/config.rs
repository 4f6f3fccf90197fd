//! Fixture configuration
//!
//! The tap name is a global identifier in Homebrew's configuration, so it is
//! carried here explicitly instead of being hard-coded into the fixture.
//! Two fixtures with different tap and package names can coexist.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formula::FormulaTemplate;

/// Default tap registered with the package manager.
pub const DEFAULT_TAP_NAME: &str = "tap-fixture/test";
/// Default formula name published into the tap.
pub const DEFAULT_PACKAGE_NAME: &str = "tapfixturetestpackage";

/// Configuration for a [`TapFixture`](crate::TapFixture).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Name the tap is registered under (`owner/repo`).
    pub tap_name: String,
    /// Formula name, also the file stem under `Formula/`.
    pub package_name: String,
    /// Custom formula template. Must contain `{version}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula_template: Option<String>,
    /// Explicit executable paths.
    pub tools: ToolPaths,
    /// Author identity written into the tap repository's local git config.
    pub git_identity: GitIdentity,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            tap_name: DEFAULT_TAP_NAME.to_string(),
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            formula_template: None,
            tools: ToolPaths::default(),
            git_identity: GitIdentity::default(),
        }
    }
}

/// Overrides for executable discovery. `None` means search `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brew: Option<PathBuf>,
}

/// The external tools the fixture drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Git,
    Brew,
}

impl Tool {
    /// Executable name looked up in `PATH`.
    pub fn executable_name(self) -> &'static str {
        match self {
            Tool::Git => "git",
            Tool::Brew => "brew",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for GitIdentity {
    fn default() -> Self {
        Self {
            name: "tap-fixture".to_string(),
            email: "tap-fixture@localhost".to_string(),
        }
    }
}

impl FixtureConfig {
    /// Parse and validate a TOML configuration string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::config(e.message()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content).map_err(|e| match e {
            Error::Config { message } => Error::ConfigFile {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn with_tap_name(mut self, name: impl Into<String>) -> Self {
        self.tap_name = name.into();
        self
    }

    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = name.into();
        self
    }

    pub fn with_formula_template(mut self, template: impl Into<String>) -> Self {
        self.formula_template = Some(template.into());
        self
    }

    pub fn with_tool(mut self, tool: Tool, path: impl Into<PathBuf>) -> Self {
        let path = Some(path.into());
        match tool {
            Tool::Git => self.tools.git = path,
            Tool::Brew => self.tools.brew = path,
        }
        self
    }

    /// Explicit path configured for `tool`, if any.
    pub fn tool_override(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Git => self.tools.git.as_deref(),
            Tool::Brew => self.tools.brew.as_deref(),
        }
    }

    /// The formula template in effect.
    pub fn template(&self) -> Result<FormulaTemplate> {
        match &self.formula_template {
            Some(text) => FormulaTemplate::parse(text),
            None => Ok(FormulaTemplate::default()),
        }
    }

    /// Check names and the template.
    pub fn validate(&self) -> Result<()> {
        let mut parts = self.tap_name.split('/');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty()
        );
        if !well_formed {
            return Err(Error::config(format!(
                "tap_name '{}' must have the form owner/repo",
                self.tap_name
            )));
        }
        if self.tap_name.chars().any(char::is_whitespace) {
            return Err(Error::config("tap_name must not contain whitespace"));
        }

        if self.package_name.is_empty() {
            return Err(Error::config("package_name must not be empty"));
        }
        if !self
            .package_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
        {
            return Err(Error::config(format!(
                "package_name '{}' contains characters not allowed in a formula name",
                self.package_name
            )));
        }

        self.template()?;
        Ok(())
    }
}
