//! Formula template rendering
//!
//! A template has one parameter per publish, `{version}`. The tokens
//! `{package}` and `{class}` are filled from the fixture configuration and do
//! not change between publishes.

use semver::Version;

use crate::error::{Error, Result};

/// Directory inside the tap that holds formula files.
pub const FORMULA_DIR: &str = "Formula";

const VERSION_TOKEN: &str = "{version}";
const PACKAGE_TOKEN: &str = "{package}";
const CLASS_TOKEN: &str = "{class}";

const DEFAULT_TEMPLATE: &str = r##"class {class} < Formula
  desc "Disposable package published by tap-fixture"
  homepage "https://example.invalid/tap-fixture"
  url "file:///dev/null"
  version "{version}"
  sha256 "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"

  def install
    (bin/"{package}").write <<~EOS
      #!/bin/sh
      echo "{package} {version}"
    EOS
  end

  test do
    assert_match "{version}", shell_output("#{bin}/{package}")
  end
end
"##;

/// A package definition template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaTemplate {
    text: String,
}

impl Default for FormulaTemplate {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl FormulaTemplate {
    /// Accept a template, requiring at least one `{version}` token.
    pub fn parse(text: &str) -> Result<Self> {
        if !text.contains(VERSION_TOKEN) {
            return Err(Error::InvalidTemplate {
                reason: format!("missing {VERSION_TOKEN} placeholder"),
            });
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Render the formula for `package` at `version`.
    pub fn render(&self, package: &str, version: &Version) -> String {
        self.text
            .replace(CLASS_TOKEN, &class_name(package))
            .replace(PACKAGE_TOKEN, package)
            .replace(VERSION_TOKEN, &version.to_string())
    }
}

/// Path of the formula file relative to the tap root.
pub fn relative_path(package: &str) -> String {
    format!("{FORMULA_DIR}/{package}.rb")
}

/// Homebrew's formula class name: CamelCase over `-`, `_` and `.`, with `@`
/// spelled out as `AT`.
pub fn class_name(package: &str) -> String {
    let mut out = String::with_capacity(package.len());
    let mut upper = true;
    for c in package.chars() {
        match c {
            '-' | '_' | '.' => upper = true,
            '@' => {
                out.push_str("AT");
                upper = true;
            }
            c if upper => {
                out.extend(c.to_uppercase());
                upper = false;
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_class_name() {
        assert_eq!(class_name("tapfixturetestpackage"), "Tapfixturetestpackage");
        assert_eq!(class_name("my-tool"), "MyTool");
        assert_eq!(class_name("foo_bar.baz"), "FooBarBaz");
        assert_eq!(class_name("python@3.12"), "PythonAT312");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("widget"), "Formula/widget.rb");
    }

    #[test]
    fn test_render_default_template() {
        let version = Version::parse("1.2.3").unwrap();
        let text = FormulaTemplate::default().render("my-tool", &version);
        assert!(text.starts_with("class MyTool < Formula\n"));
        assert!(text.contains("version \"1.2.3\""));
        assert!(text.contains("(bin/\"my-tool\")"));
        assert!(!text.contains("{version}"));
        assert!(!text.contains("{package}"));
        assert!(!text.contains("{class}"));
        // Ruby interpolation is left alone
        assert!(text.contains("#{bin}"));
    }

    #[test]
    fn test_render_custom_template() {
        let template = FormulaTemplate::parse("v={version} v2={version}").unwrap();
        let version = Version::parse("2.0.0-rc.1").unwrap();
        assert_eq!(template.render("x", &version), "v=2.0.0-rc.1 v2=2.0.0-rc.1");
    }

    #[test]
    fn test_parse_requires_version_token() {
        let err = FormulaTemplate::parse("class {class} < Formula\nend\n").unwrap_err();
        assert!(err.to_string().contains("{version}"));
    }
}
