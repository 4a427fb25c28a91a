use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::process::Command;

/// External command attached to a menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub run_in_background: bool,
}

/// Run the command and return the lines to show. Failures are reported as
/// text, never as errors.
pub async fn execute(spec: &CommandSpec) -> Vec<String> {
    let text = if spec.run_in_background {
        start_detached(spec)
    } else {
        run_captured(spec).await
    };
    let text = if text.is_empty() {
        "<no output>".to_string()
    } else {
        text
    };
    text.lines().map(str::to_string).collect()
}

fn start_detached(spec: &CommandSpec) -> String {
    match Command::new(&spec.cmd)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
    {
        Ok(child) => {
            tracing::info!(cmd = %spec.cmd, pid = ?child.id(), "started in background");
            "<started>".to_string()
        }
        Err(e) => {
            tracing::error!(cmd = %spec.cmd, "start process error: {e}");
            format!("Err: {e}")
        }
    }
}

async fn run_captured(spec: &CommandSpec) -> String {
    match Command::new(&spec.cmd).args(&spec.args).output().await {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            let text = text.trim().to_string();
            tracing::info!(cmd = %spec.cmd, status = %output.status, "executed");
            if !output.status.success() && text.is_empty() {
                return format!("Err: {}", output.status);
            }
            text
        }
        Err(e) => {
            tracing::error!(cmd = %spec.cmd, "execute error: {e}");
            format!("Err: {e}")
        }
    }
}
