// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration persistence for ecsq
//!
//! Stores defaults (region, cluster, snapshot location) in a config file.
//! All ecsq data is stored under ~/.ecsq/:
//! - ~/.ecsq/config.json - user configuration
//! - ~/.ecsq/log/ - log files
//!
//! Session settings are resolved in order: command line, environment, config file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ecs::LIST_PAGE_SIZE;
use crate::error::ConfigError;

/// Environment variables consulted for the region, in order
pub const REGION_ENV_VARS: &[&str] = &["AWS_REGION", "AWS_DEFAULT_REGION", "EC2_REGION"];

/// Get the base ecsq directory (~/.ecsq/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".ecsq"))
        .context("Could not determine home directory")
}

/// ecsq configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Region used when neither --region nor the environment names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Cluster used when --cluster is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_cluster: Option<String>,
    /// Snapshot file served as the remote API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
    /// ListTasks page size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl Config {
    /// Load config from disk, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get the config file path (~/.ecsq/config.json)
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.json"))
    }
}

/// Values given on the command line that take precedence over everything else
#[derive(Debug, Clone, Default)]
pub struct SessionOverrides {
    pub region: Option<String>,
    pub snapshot: Option<PathBuf>,
    pub page_size: Option<u32>,
}

/// Everything needed to open a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub region: String,
    pub snapshot: PathBuf,
    pub page_size: u32,
}

impl SessionSettings {
    /// Resolve settings without touching the network
    ///
    /// `env` looks up environment variables; pass `|k| std::env::var(k).ok()`
    /// outside of tests.
    pub fn resolve(
        overrides: &SessionOverrides,
        config: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let region = overrides
            .region
            .clone()
            .or_else(|| {
                REGION_ENV_VARS
                    .iter()
                    .find_map(|var| env(var).filter(|v| !v.trim().is_empty()))
            })
            .or_else(|| config.region.clone())
            .filter(|r| !r.trim().is_empty())
            .ok_or(ConfigError::MissingRegion)?;

        let snapshot = overrides
            .snapshot
            .clone()
            .or_else(|| config.snapshot.clone())
            .ok_or(ConfigError::MissingSnapshot)?;

        let page_size = overrides
            .page_size
            .or(config.page_size)
            .unwrap_or(LIST_PAGE_SIZE);
        if page_size == 0 || page_size > LIST_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(page_size));
        }

        Ok(Self {
            region,
            snapshot,
            page_size,
        })
    }
}
