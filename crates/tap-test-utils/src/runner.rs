//! [`ScriptedRunner`]: a fake command runner with canned exit codes.
//!
//! Every invocation is recorded. By default every command exits 0 and every
//! tool resolves to `/fake/bin/<name>`; rules override that per program and
//! argument prefix.

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use tap_fixture::runner::find_executable;
use tap_fixture::{CommandRunner, Error, ExitOutcome, Invocation, Result, SystemRunner};

/// Directory fake tools are "located" in.
pub const FAKE_BIN: &str = "/fake/bin";

/// What a scripted command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Exit with the given code.
    Exit(i32),
    /// Finish without an exit code, as if killed by a signal.
    Terminated,
    /// Fail to start.
    LaunchFailure,
    /// Run the real program.
    Passthrough,
}

#[derive(Debug, Clone)]
struct Rule {
    program: String,
    args_prefix: Vec<String>,
    response: Response,
}

impl Rule {
    fn matches(&self, invocation: &Invocation) -> bool {
        if invocation.program_name() != self.program {
            return false;
        }
        let args = invocation.args_lossy();
        args.len() >= self.args_prefix.len()
            && self.args_prefix.iter().zip(&args).all(|(a, b)| a == b)
    }
}

/// A [`CommandRunner`] that records invocations and answers from a script.
///
/// # Example
///
/// ```rust
/// use tap_test_utils::{Response, ScriptedRunner};
///
/// let runner = ScriptedRunner::new()
///     .respond("brew", &["uninstall"], Response::Exit(1))
///     .without_tool("git");
/// assert!(runner.calls().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    missing: HashSet<String>,
    passthrough: HashSet<String>,
    calls: Vec<Invocation>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer invocations of `program` whose arguments start with
    /// `args_prefix`. Later rules win over earlier ones.
    pub fn respond(mut self, program: &str, args_prefix: &[&str], response: Response) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            args_prefix: args_prefix.iter().map(|s| s.to_string()).collect(),
            response,
        });
        self
    }

    /// Run `program` for real and resolve it from `PATH`.
    pub fn passthrough(mut self, program: &str) -> Self {
        self.passthrough.insert(program.to_string());
        self.respond(program, &[], Response::Passthrough)
    }

    /// Make `name` unresolvable, as if it were not installed.
    pub fn without_tool(mut self, name: &str) -> Self {
        self.missing.insert(name.to_string());
        self
    }

    /// Every invocation seen so far, in order.
    pub fn calls(&self) -> &[Invocation] {
        &self.calls
    }

    /// Invocations rendered as `"<program name> <args...>"`.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .iter()
            .map(|inv| {
                std::iter::once(inv.program_name().to_string())
                    .chain(inv.args_lossy())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Invocations of `program` whose arguments start with `args_prefix`.
    pub fn calls_to(&self, program: &str, args_prefix: &[&str]) -> Vec<&Invocation> {
        let rule = Rule {
            program: program.to_string(),
            args_prefix: args_prefix.iter().map(|s| s.to_string()).collect(),
            response: Response::Exit(0),
        };
        self.calls.iter().filter(|inv| rule.matches(inv)).collect()
    }

    /// Whether any invocation used `program`.
    pub fn invoked(&self, program: &str) -> bool {
        self.calls.iter().any(|inv| inv.program_name() == program)
    }

    /// Forget recorded invocations, keeping the script.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn response_for(&self, invocation: &Invocation) -> Response {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(invocation))
            .map(|rule| rule.response)
            .unwrap_or(Response::Exit(0))
    }
}

impl CommandRunner for ScriptedRunner {
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome> {
        self.calls.push(invocation.clone());
        match self.response_for(invocation) {
            Response::Exit(code) => Ok(ExitOutcome::code(code)),
            Response::Terminated => Ok(ExitOutcome::terminated()),
            Response::LaunchFailure => Err(Error::Launch {
                program: invocation.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "scripted launch failure"),
            }),
            Response::Passthrough => SystemRunner.execute(invocation),
        }
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        if self.missing.contains(name) {
            return None;
        }
        if self.passthrough.contains(name) {
            return find_executable(name);
        }
        Some(PathBuf::from(FAKE_BIN).join(name))
    }
}
