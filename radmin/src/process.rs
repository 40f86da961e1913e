//! External command execution
//!
//! Every external step (package installs, framework generators, the source
//! formatter) goes through [`CommandRunner`]. Commands block until they exit
//! and a non-zero status is an error.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{RadminError, Result};

/// Runs external commands on behalf of the generator
pub trait CommandRunner {
    /// Run `program args..` in `cwd` and wait for it to finish
    ///
    /// # Errors
    ///
    /// Returns [`RadminError::Process`] if the command cannot be spawned or
    /// exits unsuccessfully.
    fn run(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<()>;

    /// Run a command with `input` on stdin and return its stdout
    ///
    /// # Errors
    ///
    /// Returns [`RadminError::Process`] if the command cannot be spawned,
    /// exits unsuccessfully or prints invalid UTF-8.
    fn pipe(&self, cwd: &Path, program: &str, args: &[&str], input: &str) -> Result<String>;
}

/// Runs commands with [`std::process::Command`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<()> {
        let command_line = command_line(program, args);
        tracing::debug!(cwd = %cwd.display(), command = %command_line, "running");

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| process_error(&command_line, err.to_string()))?;

        if !output.status.success() {
            return Err(process_error(
                &command_line,
                failure_reason(output.status, &output.stderr),
            ));
        }

        Ok(())
    }

    fn pipe(&self, cwd: &Path, program: &str, args: &[&str], input: &str) -> Result<String> {
        let command_line = command_line(program, args);
        tracing::trace!(cwd = %cwd.display(), command = %command_line, "piping");

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| process_error(&command_line, err.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|err| process_error(&command_line, err.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|err| process_error(&command_line, err.to_string()))?;

        if !output.status.success() {
            return Err(process_error(
                &command_line,
                failure_reason(output.status, &output.stderr),
            ));
        }

        String::from_utf8(output.stdout)
            .map_err(|err| process_error(&command_line, err.to_string()))
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn process_error(command: &str, reason: String) -> RadminError {
    RadminError::Process {
        command: command.to_string(),
        reason,
    }
}

fn failure_reason(status: std::process::ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let last_lines: Vec<&str> = stderr.lines().rev().take(5).collect();

    if last_lines.is_empty() {
        status.to_string()
    } else {
        let tail: Vec<&str> = last_lines.into_iter().rev().collect();
        format!("{status}\n{}", tail.join("\n"))
    }
}
