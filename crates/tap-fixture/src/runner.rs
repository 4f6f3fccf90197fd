//! External process invocation
//!
//! Every command the fixture issues goes through [`run`], which logs the
//! command line, waits for the child and applies the [`Verify`] policy.
//! Launching itself is delegated to a [`CommandRunner`] so test suites can
//! substitute a fake for the real `git` and `brew` binaries.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// How a non-zero exit code is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verify {
    /// Non-zero exit aborts the current operation.
    Strict,
    /// Non-zero exit is logged as a warning.
    Lenient,
}

impl Verify {
    pub fn strict_if(condition: bool) -> Self {
        if condition {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// A single external command request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: Option<PathBuf>,
    pub verify: Verify,
}

impl Invocation {
    /// Create a strict invocation of `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            verify: Verify::Strict,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn verify(mut self, verify: Verify) -> Self {
        self.verify = verify;
        self
    }

    /// File name of the program, used to identify the tool in fakes and logs.
    pub fn program_name(&self) -> &str {
        self.program
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Arguments as lossy UTF-8 strings.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// How a launched child finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, or `None` when the child was terminated by a signal.
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn terminated() -> Self {
        Self { code: None }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to launch external programs and resolve executables.
pub trait CommandRunner {
    /// Launch the invocation and block until the child exits.
    ///
    /// Only launch failures are errors here; exit codes are reported in the
    /// outcome and judged by [`run`].
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome>;

    /// Resolve an executable name to a path.
    fn locate(&self, name: &str) -> Option<PathBuf> {
        find_executable(name)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome> {
        (**self).execute(invocation)
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        (**self).locate(name)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome> {
        (**self).execute(invocation)
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        (**self).locate(name)
    }
}

/// Runs real child processes.
///
/// Standard input is bound to the null device so an unexpected prompt cannot
/// hang the test; standard output and error are inherited so the tool's own
/// diagnostics end up on the test runner's console.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|source| Error::Launch {
            program: invocation.program.clone(),
            source,
        })?;

        Ok(ExitOutcome {
            code: status.code(),
        })
    }
}

/// Execute `invocation` and enforce its verification mode.
pub fn run<R: CommandRunner + ?Sized>(runner: &mut R, invocation: &Invocation) -> Result<()> {
    tracing::info!(command = %invocation, "Executing");

    let outcome = runner.execute(invocation)?;
    match outcome.code {
        None => Err(Error::Terminated {
            program: invocation.program.clone(),
        }),
        Some(0) => Ok(()),
        Some(code) => match invocation.verify {
            Verify::Strict => Err(Error::UncleanExit {
                program: invocation.program.clone(),
                code,
            }),
            Verify::Lenient => {
                tracing::warn!(
                    program = %invocation.program.display(),
                    code,
                    "Process exited with unclean exit code"
                );
                Ok(())
            }
        },
    }
}

/// Search `PATH` for an executable named `name`.
///
/// Names containing a path separator are checked as given.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .flat_map(|dir| executable_names(name).map(move |n| dir.join(n)))
        .find(|p| is_executable(p))
}

#[cfg(windows)]
fn executable_names(name: &str) -> impl Iterator<Item = String> {
    let name = name.to_string();
    ["", ".exe", ".cmd", ".bat"]
        .into_iter()
        .map(move |ext| format!("{name}{ext}"))
}

#[cfg(not(windows))]
fn executable_names(name: &str) -> impl Iterator<Item = String> {
    std::iter::once(name.to_string())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a fixed outcome and remembers what it was asked to run.
    struct Canned {
        outcome: Option<ExitOutcome>,
        seen: Vec<Invocation>,
    }

    impl Canned {
        fn exiting(code: i32) -> Self {
            Self {
                outcome: Some(ExitOutcome::code(code)),
                seen: Vec::new(),
            }
        }

        fn failing_to_launch() -> Self {
            Self {
                outcome: None,
                seen: Vec::new(),
            }
        }
    }

    impl CommandRunner for Canned {
        fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome> {
            self.seen.push(invocation.clone());
            self.outcome.ok_or_else(|| Error::Launch {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
        }
    }

    #[test]
    fn test_strict_success() {
        let mut runner = Canned::exiting(0);
        let inv = Invocation::new("git").arg("init");
        run(&mut runner, &inv).unwrap();
        assert_eq!(runner.seen, vec![inv]);
    }

    #[test]
    fn test_exit_outcome_success() {
        assert_eq!(ExitOutcome::success(), ExitOutcome::code(0));
        assert!(ExitOutcome::success().is_success());
        assert!(!ExitOutcome::code(1).is_success());
        assert!(!ExitOutcome::terminated().is_success());
    }

    #[test]
    fn test_strict_nonzero_fails() {
        let mut runner = Canned::exiting(2);
        let inv = Invocation::new("/usr/bin/git").arg("commit");
        let err = run(&mut runner, &inv).unwrap_err();
        match err {
            Error::UncleanExit { program, code } => {
                assert_eq!(program, PathBuf::from("/usr/bin/git"));
                assert_eq!(code, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lenient_nonzero_is_ok() {
        let mut runner = Canned::exiting(1);
        let inv = Invocation::new("brew")
            .args(["untap", "a/b"])
            .verify(Verify::Lenient);
        assert!(run(&mut runner, &inv).is_ok());
    }

    #[test]
    fn test_launch_failure_is_fatal_even_when_lenient() {
        let mut runner = Canned::failing_to_launch();
        let inv = Invocation::new("brew").verify(Verify::Lenient);
        let err = run(&mut runner, &inv).unwrap_err();
        assert!(matches!(err, Error::Launch { .. }));
    }

    #[test]
    fn test_terminated_is_fatal_even_when_lenient() {
        let mut runner = Canned {
            outcome: Some(ExitOutcome::terminated()),
            seen: Vec::new(),
        };
        let inv = Invocation::new("brew").verify(Verify::Lenient);
        let err = run(&mut runner, &inv).unwrap_err();
        assert!(matches!(err, Error::Terminated { .. }));
    }

    #[test]
    fn test_verify_strict_if() {
        assert_eq!(Verify::strict_if(true), Verify::Strict);
        assert_eq!(Verify::strict_if(false), Verify::Lenient);
    }

    #[test]
    fn test_invocation_display_quotes_spaces() {
        let inv = Invocation::new("git").args(["commit", "-m", "Updated test formula to 1.0.0"]);
        assert_eq!(
            inv.to_string(),
            "git commit -m \"Updated test formula to 1.0.0\""
        );
    }

    #[test]
    fn test_program_name_strips_directory() {
        let inv = Invocation::new("/opt/homebrew/bin/brew");
        assert_eq!(inv.program_name(), "brew");
    }

    #[test]
    fn test_find_executable_missing() {
        assert!(find_executable("definitely-not-a-real-tool-4f1c2a").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_find_executable_explicit_path() {
        assert_eq!(find_executable("/bin/sh"), Some(PathBuf::from("/bin/sh")));
        assert!(find_executable("/nonexistent/dir/sh").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_codes() {
        let mut runner = SystemRunner;
        let ok = runner
            .execute(&Invocation::new("/bin/sh").args(["-c", "exit 0"]))
            .unwrap();
        assert!(ok.is_success());

        let failed = runner
            .execute(&Invocation::new("/bin/sh").args(["-c", "exit 7"]))
            .unwrap();
        assert_eq!(failed.code, Some(7));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_uses_working_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut runner = SystemRunner;
        let inv = Invocation::new("/bin/sh")
            .args(["-c", "touch marker"])
            .current_dir(temp.path());
        run(&mut runner, &inv).unwrap();
        assert!(temp.path().join("marker").exists());
    }

    #[test]
    fn test_system_runner_launch_failure() {
        let mut runner = SystemRunner;
        let err = runner
            .execute(&Invocation::new("/nonexistent/tool-4f1c2a"))
            .unwrap_err();
        assert!(matches!(err, Error::Launch { .. }));
    }
}
