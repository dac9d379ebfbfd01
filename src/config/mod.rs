//! Configuration module for mdsctl.

use crate::error::{MdsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration for MDS lifecycle management.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MdsConfig {
    /// Admin command configuration.
    #[serde(default)]
    pub command: CommandConfig,
    /// Convergence wait configuration.
    #[serde(default)]
    pub wait: WaitConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl MdsConfig {
    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MdsError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| MdsError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.command.binary.as_os_str().is_empty() {
            return Err(MdsError::InvalidConfig {
                field: "command.binary".to_string(),
                reason: "Admin binary must be set".to_string(),
            });
        }

        if self.command.timeout.is_zero() {
            return Err(MdsError::InvalidConfig {
                field: "command.timeout".to_string(),
                reason: "Command timeout must be non-zero".to_string(),
            });
        }

        validate_poll("wait.rank", self.wait.rank_interval, self.wait.rank_timeout)?;
        validate_poll(
            "wait.standby",
            self.wait.standby_interval,
            self.wait.standby_timeout,
        )?;

        Ok(())
    }

    /// Configuration with short waits, for local clusters.
    pub fn development() -> Self {
        Self {
            command: CommandConfig::default(),
            wait: WaitConfig {
                rank_interval: Duration::from_millis(500),
                rank_timeout: Duration::from_secs(10),
                standby_interval: Duration::from_millis(500),
                standby_timeout: Duration::from_secs(10),
            },
            observability: ObservabilityConfig {
                log_level: "debug".to_string(),
                json_logs: false,
            },
        }
    }
}

fn validate_poll(prefix: &str, interval: Duration, timeout: Duration) -> Result<()> {
    if interval.is_zero() {
        return Err(MdsError::InvalidConfig {
            field: format!("{}_interval", prefix),
            reason: "Poll interval must be non-zero".to_string(),
        });
    }
    if interval > timeout {
        return Err(MdsError::InvalidConfig {
            field: format!("{}_timeout", prefix),
            reason: "Timeout must not be shorter than the poll interval".to_string(),
        });
    }
    Ok(())
}

/// Admin command configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Path or name of the admin binary.
    pub binary: PathBuf,
    /// Cluster name passed with `--cluster`.
    #[serde(default)]
    pub cluster: Option<String>,
    /// Cluster config file passed with `--conf`.
    #[serde(default)]
    pub conf: Option<PathBuf>,
    /// Keyring passed with `--keyring`.
    #[serde(default)]
    pub keyring: Option<PathBuf>,
    /// Timeout for commands run through the timeout-bounded path.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ceph"),
            cluster: None,
            conf: None,
            keyring: None,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Convergence wait configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Interval between rank count checks.
    #[serde(with = "humantime_serde")]
    pub rank_interval: Duration,
    /// Default deadline for rank count convergence.
    #[serde(with = "humantime_serde")]
    pub rank_timeout: Duration,
    /// Interval between standby checks.
    #[serde(with = "humantime_serde")]
    pub standby_interval: Duration,
    /// Default deadline for standby draining.
    #[serde(with = "humantime_serde")]
    pub standby_timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            rank_interval: Duration::from_secs(3),
            rank_timeout: Duration::from_secs(60),
            standby_interval: Duration::from_secs(1),
            standby_timeout: Duration::from_secs(30),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level.
    pub log_level: String,
    /// Enable JSON logging.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Serde helper for Duration using humantime format.
pub mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}ms", duration.as_millis()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        if let Some(ms) = s.strip_suffix("ms") {
            ms.parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| e.to_string())
        } else if let Some(s_val) = s.strip_suffix('s') {
            s_val
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| e.to_string())
        } else if let Some(m) = s.strip_suffix('m') {
            m.parse::<u64>()
                .map(|v| Duration::from_secs(v * 60))
                .map_err(|e| e.to_string())
        } else {
            s.parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| e.to_string())
        }
    }
}
