use anyhow::{bail, Context, Result};
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs an external platform CLI and returns its stdout.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

pub struct SystemCommandRunner {}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        debug!(program, args = %args.join(" "), "running platform command");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to spawn {program}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{program} {} exited with {}: {}",
                args.first().map(String::as_str).unwrap_or_default(),
                output.status,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
