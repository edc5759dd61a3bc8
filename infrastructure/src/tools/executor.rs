//! Process executor: the client side of the executor boundary.
//!
//! [`ProcessToolExecutor`] implements [`ToolExecutorPort`] by spawning one
//! executor process per invocation:
//!
//! ```text
//! execute(invocation)
//!   ├─ spawn program (piped stdio, kill_on_drop, forwarded env)
//!   ├─ write request to stdin, close it
//!   ├─ wait under timeout           → timeout (process killed)
//!   ├─ stderr not empty             → crashed
//!   └─ decode stdout envelope       → outcome | protocol
//! ```

use async_trait::async_trait;
use atlas_application::ToolExecutorPort;
use atlas_domain::{
    BoundaryRequest, InvocationError, InvocationOutcome, ToolInvocation, decode_response,
};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, warn};

/// Name of the executor binary shipped next to `atlas`
pub const EXECUTOR_BINARY: &str = "atlas-executor";

/// Longest stderr excerpt carried in a `crashed` result
const MAX_DIAGNOSTIC_LEN: usize = 2000;

/// How to launch the executor process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorSettings {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub timeout: Duration,
    /// Extra environment for the child, on top of the inherited one
    pub env: Vec<(String, String)>,
}

impl ExecutorSettings {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(10),
            env: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Locate the executor program.
///
/// A configured path containing a separator is used as is; a bare name is
/// looked up on `PATH`. Without configuration, `atlas-executor` next to the
/// running binary is preferred over a `PATH` lookup.
pub fn resolve_executor_program(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        if path.components().count() > 1 {
            return path.to_path_buf();
        }
        return which::which(path).unwrap_or_else(|_| path.to_path_buf());
    }

    let sibling = std::env::current_exe().ok().and_then(|exe| {
        exe.parent()
            .map(|dir| dir.join(format!("{}{}", EXECUTOR_BINARY, std::env::consts::EXE_SUFFIX)))
    });
    match sibling {
        Some(path) if path.is_file() => path,
        _ => which::which(EXECUTOR_BINARY).unwrap_or_else(|_| PathBuf::from(EXECUTOR_BINARY)),
    }
}

/// Runs each invocation in a fresh executor process.
#[derive(Debug, Clone)]
pub struct ProcessToolExecutor {
    settings: ExecutorSettings,
}

impl ProcessToolExecutor {
    pub fn new(settings: ExecutorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    async fn run(&self, invocation: &ToolInvocation) -> Result<InvocationOutcome, InvocationError> {
        let request = BoundaryRequest::from_invocation(invocation).encode()?;
        let program = &self.settings.program;

        let mut cmd = Command::new(program);
        cmd.args(&self.settings.args)
            .envs(self.settings.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            let message = if e.kind() == std::io::ErrorKind::NotFound {
                format!("Executor program not found: {}", program.display())
            } else {
                format!("Could not start executor {}", program.display())
            };
            InvocationError::executor_unavailable(message).with_details(e.to_string())
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits before reading still gets its output judged below.
            if let Err(e) = stdin.write_all(request.as_bytes()).await {
                debug!(error = %e, "Executor closed stdin early");
            }
        }

        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.settings.timeout, child.wait_with_output())
            .await
            .map_err(|_| InvocationError::timeout(self.settings.timeout.as_secs()))?
            .map_err(|e| {
                InvocationError::executor_unavailable("Lost contact with the executor")
                    .with_details(e.to_string())
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            return Err(InvocationError::crashed(format!(
                "Executor reported an internal error (exit status {})",
                output.status.code().unwrap_or(-1)
            ))
            .with_details(truncate(stderr.trim(), MAX_DIAGNOSTIC_LEN)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Err(InvocationError::protocol(format!(
                "Executor produced no response (exit status {})",
                output.status.code().unwrap_or(-1)
            )));
        }

        decode_response(&stdout)
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl ToolExecutorPort for ProcessToolExecutor {
    async fn execute(&self, invocation: &ToolInvocation) -> InvocationOutcome {
        debug!(
            call_id = %invocation.call_id,
            operation = %invocation.operation_name,
            "Spawning executor"
        );
        match self.run(invocation).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if e.is_fatal() {
                    error!(operation = %invocation.operation_name, error = %e, "Executor failure");
                } else {
                    warn!(operation = %invocation.operation_name, error = %e, "Executor call failed");
                }
                InvocationOutcome::failure(e)
            }
        }
    }
}
