/*
 * runner.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Generator process execution.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use crate::error::{CoreError, Result};

/// Captured output of one generator execution.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability interface for running generator commands.
///
/// Command and argument templates are macro-expanded before they reach
/// the runner; implementations perform no substitution of their own.
pub trait GeneratorRunner {
    /// Run a command in a working directory, optionally piping `stdin`
    /// to the child, and capture its output.
    fn run(
        &self,
        working_dir: &Path,
        command: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<RunOutput>;
}

/// Runner that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl GeneratorRunner for ProcessRunner {
    fn run(
        &self,
        working_dir: &Path,
        command: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<RunOutput> {
        tracing::debug!(command, ?args, dir = %working_dir.display(), "running generator");

        let mut child = Command::new(command)
            .args(args)
            .current_dir(working_dir)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CoreError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if let Some(input) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                pipe.write_all(input.as_bytes())?;
            }
        }

        let output = child.wait_with_output()?;
        Ok(RunOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// One call observed by a [`RecordingRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub working_dir: PathBuf,
    pub command: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

/// Runner that records calls instead of spawning processes.
///
/// Backs tests and dry runs; every call succeeds with the configured
/// output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<RecordedCall>>,
    output: RunOutput,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record calls and answer each with `output`.
    pub fn with_output(output: RunOutput) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            output,
        }
    }

    /// The calls observed so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("runner lock").clone()
    }
}

impl GeneratorRunner for RecordingRunner {
    fn run(
        &self,
        working_dir: &Path,
        command: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<RunOutput> {
        self.calls.lock().expect("runner lock").push(RecordedCall {
            working_dir: working_dir.to_path_buf(),
            command: command.to_string(),
            args: args.to_vec(),
            stdin: stdin.map(str::to_string),
        });
        Ok(self.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_runner_captures_calls() {
        let runner = RecordingRunner::new();
        runner
            .run(Path::new("/tmp"), "gen", &["-v".to_string()], Some("input"))
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, "gen");
        assert_eq!(calls[0].stdin.as_deref(), Some("input"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_output_and_exit_code() {
        let runner = ProcessRunner;
        let output = runner
            .run(
                Path::new("/tmp"),
                "sh",
                &["-c".to_string(), "printf hello; exit 3".to_string()],
                None,
            )
            .unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout, "hello");
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_pipes_stdin() {
        let runner = ProcessRunner;
        let output = runner
            .run(
                Path::new("/tmp"),
                "sh",
                &["-c".to_string(), "cat".to_string()],
                Some("piped input"),
            )
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "piped input");
    }

    #[test]
    fn test_missing_command_is_spawn_error() {
        let runner = ProcessRunner;
        let err = runner
            .run(Path::new("."), "srcgen-no-such-command", &[], None)
            .unwrap_err();
        assert!(matches!(err, CoreError::Spawn { .. }));
    }
}
