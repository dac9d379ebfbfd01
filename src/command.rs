//! Admin command gateway.
//!
//! Every interaction with the storage cluster goes through a
//! [`CommandGateway`]: a command is a list of plain argument tokens, the reply
//! is the raw JSON bytes written to stdout. [`ProcessGateway`] runs the real
//! admin binary; tests substitute a scripted gateway.

use crate::config::CommandConfig;
use crate::error::{MdsError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Explicit-intent marker required by destructive commands.
pub const CONFIRM_FLAG: &str = "--yes-i-really-mean-it";

/// Executes admin commands against the cluster.
#[async_trait]
pub trait CommandGateway: Send + Sync {
    /// Run a command and return its stdout.
    async fn run(&self, args: &[String]) -> Result<Vec<u8>>;

    /// Run a command, failing with [`MdsError::Timeout`] if it does not finish in time.
    async fn run_with_timeout(&self, args: &[String], timeout: Duration) -> Result<Vec<u8>>;
}

/// Build an owned argument list from string slices.
pub fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Gateway that spawns the admin binary for every command.
pub struct ProcessGateway {
    config: CommandConfig,
}

impl ProcessGateway {
    /// Create a new process gateway.
    pub fn new(config: CommandConfig) -> Self {
        Self { config }
    }

    /// Full argument list passed to the binary, including output format and
    /// connection flags.
    fn full_args(&self, args: &[String]) -> Vec<String> {
        let mut full = args.to_vec();
        full.push("--format".to_string());
        full.push("json".to_string());
        if let Some(cluster) = &self.config.cluster {
            full.push("--cluster".to_string());
            full.push(cluster.clone());
        }
        if let Some(conf) = &self.config.conf {
            full.push("--conf".to_string());
            full.push(conf.display().to_string());
        }
        if let Some(keyring) = &self.config.keyring {
            full.push("--keyring".to_string());
            full.push(keyring.display().to_string());
        }
        full
    }

    async fn execute(&self, args: &[String]) -> Result<Vec<u8>> {
        let command = args.join(" ");
        debug!(binary = %self.config.binary.display(), command = %command, "Running admin command");

        let output = Command::new(&self.config.binary)
            .args(self.full_args(args))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            return Ok(output.stdout);
        }

        // Killed by a signal: no exit code, report it as EIO.
        let code = output.status.code().unwrap_or(libc::EIO);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(command = %command, code, stderr = %stderr, "Admin command failed");
        Err(MdsError::CommandFailed {
            command,
            code,
            stderr,
        })
    }
}

#[async_trait]
impl CommandGateway for ProcessGateway {
    async fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        self.execute(args).await
    }

    async fn run_with_timeout(&self, args: &[String], timeout: Duration) -> Result<Vec<u8>> {
        tokio::time::timeout(timeout, self.execute(args))
            .await
            .map_err(|_| {
                MdsError::Timeout(format!("command `{}` after {:?}", args.join(" "), timeout))
            })?
    }
}
