// src/lifecycle.rs

//! Lifecycle runner: executes a recipe's build steps in order
//!
//! A lifecycle is a strictly linear state machine. Steps run one at a time,
//! each to completion; the first step that exits non-zero moves the
//! lifecycle to `Failed` and nothing after it runs. There is no retry and no
//! rollback of files a step already wrote.
//!
//! Process spawning sits behind the [`StepRunner`] trait so the sequencing
//! can be exercised without real build tools.

use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// One invocation of a wrapped build tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Name used in logs and errors (e.g. `bootstrap`, `qtbase:install`)
    pub name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub workdir: PathBuf,
}

impl Step {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            workdir: workdir.into(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The command line as it would be typed into a shell
    pub fn command_line(&self) -> String {
        let mut parts = vec![quote(&self.program.to_string_lossy())];
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.name, self.command_line())
    }
}

fn quote(token: &str) -> String {
    if token.is_empty() {
        "\"\"".to_string()
    } else if token.contains(|c: char| c.is_whitespace() || c == '"') {
        format!("\"{}\"", token.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        token.to_string()
    }
}

/// Executes a single step and reports its exit code
///
/// `Ok(Some(0))` is success, `Ok(Some(n))` a failure exit, `Ok(None)` a
/// process killed without an exit code.
pub trait StepRunner {
    fn run_step(&self, step: &Step) -> Result<Option<i32>>;
}

/// Runs steps as child processes with inherited stdio
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl StepRunner for ProcessRunner {
    fn run_step(&self, step: &Step) -> Result<Option<i32>> {
        let status = Command::new(&step.program)
            .args(&step.args)
            .current_dir(&step.workdir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| Error::Spawn {
                step: step.name.clone(),
                source,
            })?;

        Ok(status.code())
    }
}

/// Where a lifecycle is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NotStarted,
    /// Running the step at this index
    InProgress(usize),
    /// The step at this index failed
    Failed(usize),
    Complete,
}

/// Runs an ordered list of steps through a [`StepRunner`]
pub struct Lifecycle<'a> {
    runner: &'a dyn StepRunner,
    state: LifecycleState,
    completed: Vec<String>,
}

impl<'a> Lifecycle<'a> {
    pub fn new(runner: &'a dyn StepRunner) -> Self {
        Self {
            runner,
            state: LifecycleState::NotStarted,
            completed: Vec::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Names of the steps that finished successfully
    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    /// Run every step in order
    ///
    /// A lifecycle runs once; calling this again after it has started fails.
    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        if self.state != LifecycleState::NotStarted {
            return Err(Error::Config(format!(
                "lifecycle already ran (state {:?})",
                self.state
            )));
        }

        for (index, step) in steps.iter().enumerate() {
            self.state = LifecycleState::InProgress(index);
            info!("Running {}", step.command_line());
            debug!("Step {} in {}", step.name, step.workdir.display());

            let code = match self.runner.run_step(step) {
                Ok(code) => code,
                Err(e) => {
                    self.state = LifecycleState::Failed(index);
                    return Err(e);
                }
            };

            if code != Some(0) {
                warn!("Step {} failed: {}", step.name, step.command_line());
                self.state = LifecycleState::Failed(index);
                return Err(Error::BuildStepFailed {
                    step: step.name.clone(),
                    exit_code: code,
                });
            }

            self.completed.push(step.name.clone());
        }

        self.state = LifecycleState::Complete;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every step and fails the one named `fail_at`
    struct FakeRunner {
        fail_at: Option<&'static str>,
        seen: RefCell<Vec<String>>,
    }

    impl StepRunner for FakeRunner {
        fn run_step(&self, step: &Step) -> Result<Option<i32>> {
            self.seen.borrow_mut().push(step.name.clone());
            if self.fail_at == Some(step.name.as_str()) {
                Ok(Some(3))
            } else {
                Ok(Some(0))
            }
        }
    }

    fn steps() -> Vec<Step> {
        ["generate", "build", "install"]
            .iter()
            .map(|n| Step::new(*n, "cmake", "/tmp"))
            .collect()
    }

    #[test]
    fn test_all_steps_complete() {
        let runner = FakeRunner {
            fail_at: None,
            seen: RefCell::new(Vec::new()),
        };
        let mut lifecycle = Lifecycle::new(&runner);
        lifecycle.run(&steps()).unwrap();

        assert_eq!(lifecycle.state(), LifecycleState::Complete);
        assert_eq!(*runner.seen.borrow(), ["generate", "build", "install"]);
    }

    #[test]
    fn test_failure_stops_lifecycle() {
        let runner = FakeRunner {
            fail_at: Some("build"),
            seen: RefCell::new(Vec::new()),
        };
        let mut lifecycle = Lifecycle::new(&runner);
        let err = lifecycle.run(&steps()).unwrap_err();

        match err {
            Error::BuildStepFailed { step, exit_code } => {
                assert_eq!(step, "build");
                assert_eq!(exit_code, Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(lifecycle.state(), LifecycleState::Failed(1));
        assert_eq!(*runner.seen.borrow(), ["generate", "build"]);
        assert_eq!(lifecycle.completed(), ["generate"]);
    }

    #[test]
    fn test_lifecycle_runs_once() {
        let runner = FakeRunner {
            fail_at: None,
            seen: RefCell::new(Vec::new()),
        };
        let mut lifecycle = Lifecycle::new(&runner);
        lifecycle.run(&steps()).unwrap();
        assert!(lifecycle.run(&steps()).is_err());
        assert_eq!(runner.seen.borrow().len(), 3);
    }

    #[test]
    fn test_command_line_quoting() {
        let step = Step::new("build", "b2", "/src")
            .arg("variant=release")
            .arg("cxxflags=-fPIC -O2")
            .arg("");
        assert_eq!(
            step.command_line(),
            "b2 variant=release \"cxxflags=-fPIC -O2\" \"\""
        );
    }

    #[test]
    fn test_command_line_escapes_quotes() {
        let step = Step::new("generate", "cmake", "/src")
            .arg("-DCMAKE_CXX_FLAGS=-DNAME=\"a b\"")
            .arg("say\"hi");
        assert_eq!(
            step.command_line(),
            r#"cmake "-DCMAKE_CXX_FLAGS=-DNAME=\"a b\"" "say\"hi""#
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_exit_codes() {
        let runner = ProcessRunner::new();
        let ok = Step::new("true", "sh", "/").args(["-c", "exit 0"]);
        let bad = Step::new("false", "sh", "/").args(["-c", "exit 7"]);
        assert_eq!(runner.run_step(&ok).unwrap(), Some(0));
        assert_eq!(runner.run_step(&bad).unwrap(), Some(7));
    }

    #[test]
    fn test_process_runner_missing_tool() {
        let runner = ProcessRunner::new();
        let step = Step::new("bootstrap", "/nonexistent/pantry-tool", "/");
        let err = runner.run_step(&step).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
