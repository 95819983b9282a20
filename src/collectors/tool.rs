//! External helper programs, each run under a deadline.

use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::Runtime;

use crate::error::ToolError;

/// Run `program` to completion and return its raw output, whatever the exit
/// status. The child is killed if `limit` passes first.
pub async fn tool_output(program: &str, args: &[&str], limit: Duration) -> Result<Output, ToolError> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(limit, child).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ToolError::Missing(program.to_string()))
        }
        Ok(Err(e)) => Err(ToolError::Spawn(e)),
        Err(_) => Err(ToolError::Timeout(program.to_string(), limit.as_secs())),
    }
}

/// Like [`tool_output`], but a non-zero exit is an error and only stdout is
/// kept.
pub async fn run_tool(program: &str, args: &[&str], limit: Duration) -> Result<String, ToolError> {
    let output = tool_output(program, args, limit).await?;
    if !output.status.success() {
        return Err(ToolError::Failed(program.to_string(), output.status.code()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Blocking front end for synchronous collectors. Drives the helpers on the
/// shared runtime with one deadline for every call.
#[derive(Clone)]
pub struct ToolRunner {
    rt: Arc<Runtime>,
    limit: Duration,
}

impl ToolRunner {
    pub fn new(rt: Arc<Runtime>, limit: Duration) -> Self {
        Self { rt, limit }
    }

    pub fn run(&self, program: &str, args: &[&str]) -> Result<String, ToolError> {
        self.rt.block_on(run_tool(program, args, self.limit))
    }

    pub fn output(&self, program: &str, args: &[&str]) -> Result<Output, ToolError> {
        self.rt.block_on(tool_output(program, args, self.limit))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn runner(limit: Duration) -> ToolRunner {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        ToolRunner::new(Arc::new(rt), limit)
    }

    #[tokio::test]
    async fn missing_tool_is_reported() {
        let err = run_tool("definitely-not-a-real-binary-4821", &[], Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Missing(p) if p == "definitely-not-a-real-binary-4821"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_failure() {
        let err = run_tool("false", &[], Duration::from_secs(2)).await.unwrap_err();
        assert!(matches!(err, ToolError::Failed(_, Some(1))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_keeps_raw_output() {
        let out = tool_output("sh", &["-c", "echo partial; exit 1"], Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(out.status.code(), Some(1));
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "partial");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn overrun_is_timeout() {
        let err = run_tool("sleep", &["5"], Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout(p, 0) if p == "sleep"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdout_is_captured() {
        let out = run_tool("echo", &["hello"], Duration::from_secs(2)).await.unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn blocking_runner_enforces_its_deadline() {
        let tools = runner(Duration::from_millis(100));
        let started = Instant::now();
        let err = tools.run("sleep", &["5"]).unwrap_err();
        assert!(matches!(err, ToolError::Timeout(..)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn blocking_runner_returns_stdout() {
        let tools = runner(Duration::from_secs(2));
        assert_eq!(tools.run("echo", &["hi"]).unwrap().trim(), "hi");
    }
}
