use std::process::Command;

use tracing::debug;

use crate::error::{ModtreeError, Result};
use crate::source::traits::EdgeSource;

/// Runs an external command and takes its stdout as the edge list.
pub struct CommandSource {
    pub command: Vec<String>,
}

impl CommandSource {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    pub fn go_mod_graph() -> Self {
        Self::new(vec![
            "go".to_string(),
            "mod".to_string(),
            "graph".to_string(),
        ])
    }
}

impl EdgeSource for CommandSource {
    fn describe(&self) -> String {
        format!("command `{}`", self.command.join(" "))
    }

    fn read(&mut self) -> Result<Vec<u8>> {
        let (program, args) = self.command.split_first().ok_or_else(|| {
            ModtreeError::Other(anyhow::anyhow!("missing input command"))
        })?;
        debug!(command = %self.command.join(" "), "running input command");
        let output = Command::new(program).args(args).output().map_err(|err| {
            ModtreeError::CommandFailed {
                command: self.command.join(" "),
                message: err.to_string(),
            }
        })?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(ModtreeError::CommandFailed {
                command: self.command.join(" "),
                message: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}
