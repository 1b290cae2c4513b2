//! External command execution.
//!
//! A [`CommandExecutor`] runs one command, merges its stdout and stderr into a
//! single line stream and hands every cleaned line to a sink. The exit code is
//! only returned once both pipes are drained and the child has been reaped.

pub mod filter;

use crate::errors::ExecError;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

pub use filter::OutputPolicy;

/// Exit code reported for a child terminated by a signal.
pub const SIGNAL_EXIT_CODE: i32 = -1;

const LINE_CHANNEL_CAPACITY: usize = 256;

/// What to run for a step.
///
/// `Shell` strings go to the host shell untouched; quoting is the caller's
/// job. `Argv` bypasses the shell entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCommand {
    Shell(String),
    Argv(Vec<String>),
}

impl StepCommand {
    fn to_command(&self) -> Option<Command> {
        match self {
            StepCommand::Shell(line) => {
                #[cfg(windows)]
                let mut cmd = {
                    let mut cmd = Command::new("cmd");
                    cmd.arg("/C");
                    cmd
                };
                #[cfg(not(windows))]
                let mut cmd = {
                    let mut cmd = Command::new("sh");
                    cmd.arg("-c");
                    cmd
                };
                cmd.arg(line);
                Some(cmd)
            }
            StepCommand::Argv(args) => {
                let (program, rest) = args.split_first()?;
                let mut cmd = Command::new(program);
                cmd.args(rest);
                Some(cmd)
            }
        }
    }
}

impl fmt::Display for StepCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepCommand::Shell(line) => f.write_str(line),
            StepCommand::Argv(args) => {
                let shown: Vec<String> = args
                    .iter()
                    .map(|arg| {
                        if arg.is_empty() || arg.contains(char::is_whitespace) {
                            format!("'{}'", arg)
                        } else {
                            arg.clone()
                        }
                    })
                    .collect();
                f.write_str(&shown.join(" "))
            }
        }
    }
}

impl From<&str> for StepCommand {
    fn from(line: &str) -> Self {
        StepCommand::Shell(line.to_string())
    }
}

impl From<String> for StepCommand {
    fn from(line: String) -> Self {
        StepCommand::Shell(line)
    }
}

/// Runs one external command and streams its output.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `command`, calling `on_line` for every displayable output line.
    ///
    /// Returns the exit code (`SIGNAL_EXIT_CODE` if the child was killed).
    async fn execute(
        &self,
        command: &StepCommand,
        on_line: &mut (dyn FnMut(String) + Send),
    ) -> Result<i32, ExecError>;
}

/// Executor backed by real child processes.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    working_dir: Option<PathBuf>,
    policy: OutputPolicy,
}

impl ShellExecutor {
    pub fn new(policy: OutputPolicy) -> Self {
        Self {
            working_dir: None,
            policy,
        }
    }

    /// Run every command from `dir` instead of the current directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn execute(
        &self,
        command: &StepCommand,
        on_line: &mut (dyn FnMut(String) + Send),
    ) -> Result<i32, ExecError> {
        let shown = command.to_string();
        let mut cmd = command.to_command().ok_or_else(|| ExecError::Spawn {
            command: shown.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty argument vector",
            ),
        })?;

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(command = %shown, "spawning step command");

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecError::Spawn {
                command: shown.clone(),
                source,
            })?;

        let (tx, mut rx) = mpsc::channel::<String>(LINE_CHANNEL_CAPACITY);
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(forward_lines(stdout, tx.clone(), "stdout")));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(forward_lines(stderr, tx.clone(), "stderr")));
        }
        // Only the reader tasks hold senders now, so the loop ends at EOF on both pipes.
        drop(tx);

        while let Some(raw) = rx.recv().await {
            if let Some(line) = self.policy.clean(&raw) {
                on_line(line);
            }
        }

        for reader in readers {
            if let Err(err) = reader.await {
                tracing::warn!(command = %shown, error = %err, "output reader task failed");
            }
        }

        let status = child.wait().await.map_err(|source| ExecError::Wait {
            command: shown.clone(),
            source,
        })?;
        let exit_code = status.code().unwrap_or(SIGNAL_EXIT_CODE);

        tracing::debug!(command = %shown, exit_code, "step command finished");
        Ok(exit_code)
    }
}

/// Read `reader` line by line, decoding lossily, and push every line to `tx`.
async fn forward_lines<R>(reader: R, tx: mpsc::Sender<String>, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(stream, error = %err, "error reading command output, treating as end of stream");
                break;
            }
        }
    }
}
