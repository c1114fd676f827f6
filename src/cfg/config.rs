// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::{
    cfg::{cli::resolve_config_path, logger::LogConfig},
    models::lba_list::{LbaListParser, MAX_ADDRESSES, MAX_INPUT_LINES},
    transport::DEFAULT_TIMEOUT,
};

/// Environment variable naming the YAML config file.
pub const CONFIG_ENV: &str = "SCSI_MAINT_CONFIG";

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Config {
    /// Limits and timeouts used by the command layer.
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Optional structured logging sink; stderr logging is used when absent.
    #[serde(default)]
    pub logger: Option<LogConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
/// Runtime-only settings.
pub struct RuntimeConfig {
    #[serde(rename = "TimeoutSecs", with = "serde_secs", default = "default_timeout")]
    /// Per-command timeout handed to the transport.
    pub timeout: Duration,

    #[serde(rename = "MaxAddresses", default = "default_max_addresses")]
    /// Upper bound on a REASSIGN BLOCKS address list.
    pub max_addresses: usize,

    #[serde(rename = "MaxInputLines", default = "default_max_input_lines")]
    /// Lines read from stdin for `--address=-`.
    pub max_input_lines: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            max_addresses: default_max_addresses(),
            max_input_lines: default_max_input_lines(),
        }
    }
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_max_addresses() -> usize {
    MAX_ADDRESSES
}

fn default_max_input_lines() -> usize {
    MAX_INPUT_LINES
}

impl RuntimeConfig {
    pub fn lba_parser(&self) -> LbaListParser {
        LbaListParser::new(self.max_addresses, self.max_input_lines)
    }
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: Config =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Load from [`CONFIG_ENV`] when set, otherwise use defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => resolve_config_path(&path)
                .and_then(Config::load_from_file)
                .with_context(|| format!("failed to resolve or load config {path:?}")),
            Err(_) => Ok(Config::default()),
        }
    }

    /// Validates invariants.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(
            !self.runtime.timeout.is_zero(),
            "TimeoutSecs must be >= 1"
        );
        ensure!(
            self.runtime.max_addresses >= 1,
            "MaxAddresses must be >= 1"
        );
        ensure!(
            self.runtime.max_input_lines >= 1,
            "MaxInputLines must be >= 1"
        );
        if let Some(logger) = &self.logger {
            ensure!(!logger.level.is_empty(), "logger.level must not be empty");
        }
        Ok(())
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
