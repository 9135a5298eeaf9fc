//! External process execution
//!
//! Timeouts are enforced here so callers see a timed-out tool exactly like a
//! failed one. Children are killed when their future is dropped, which is how
//! abandoned region work gets stopped.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, error, info};

use crate::domain::errors::{SliceError, SliceResult};

/// Number of stderr lines kept in a failure report
const STDERR_TAIL_LINES: usize = 20;

/// Launches external tools and captures their output
#[derive(Debug, Clone, Default)]
pub struct ToolRunner {
    timeout: Option<Duration>,
}

impl ToolRunner {
    /// Create a runner with an optional per-invocation timeout
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Run `program` to completion; non-zero exit and timeout are failures
    pub async fn run(&self, program: &str, args: &[OsString]) -> SliceResult<Output> {
        let tool = tool_name(program);
        info!("Executing command: {}", display_command(program, args));

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn {}: {}", tool, e);
                SliceError::ProcessFailure {
                    tool: tool.clone(),
                    status: "failed to start".to_string(),
                    stderr: e.to_string(),
                }
            })?;

        let waited = child.wait_with_output();
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, waited).await {
                Ok(result) => result,
                Err(_) => {
                    error!("{} timed out after {:.1}s", tool, limit.as_secs_f64());
                    return Err(SliceError::ProcessFailure {
                        tool,
                        status: format!("timed out after {:.1}s", limit.as_secs_f64()),
                        stderr: String::new(),
                    });
                }
            },
            None => waited.await,
        };

        let output = result.map_err(|e| SliceError::ProcessFailure {
            tool: tool.clone(),
            status: "wait failed".to_string(),
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = stderr_tail(&output.stderr);
            let status = match output.status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            };
            error!("{} failed with {}: {}", tool, status, stderr);
            return Err(SliceError::ProcessFailure {
                tool,
                status,
                stderr,
            });
        }

        debug!("{} finished successfully", tool);
        Ok(output)
    }
}

/// Shell-quoted rendering of a command line, for logs only
pub fn display_command(program: &str, args: &[OsString]) -> String {
    let mut line = quote(program);
    for arg in args {
        line.push(' ');
        line.push_str(&quote(&arg.to_string_lossy()));
    }
    line
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

fn tool_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string())
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let skip = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[skip..].join("\n")
}
