//! # execrs Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads the defaults that `execrs run` applies to every command:
//! a working directory, how that directory is applied, and environment
//! overrides. Command-line flags take precedence over anything loaded here.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.execrs.toml` in the current directory or an ancestor
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/execrs/config.toml`)
//! 3. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [run]
//! working_dir = "~/src/app"
//! directory_mode = "explicit"   # or "process-wide"
//!
//! [run.env]
//! RUST_BACKTRACE = "1"
//! ```
//!
//! ```rust,no_run
//! let cfg = execrs::core::config::load_config()?;
//! let env = &cfg.run.env;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
use crate::common::process::DirectoryMode;
use crate::core::error::{ExecrsError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
}

/// Defaults for `execrs run`.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Working directory for launched commands (can use ~). Will be expanded.
    #[serde(default)]
    pub working_dir: Option<String>,
    /// Whether the working directory is passed to the child or applied process-wide.
    #[serde(default)]
    pub directory_mode: Option<DirectoryMode>,
    /// Environment overrides applied on top of the inherited environment.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

const PROJECT_CONFIG_FILENAME: &str = ".execrs.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "execrs", "execrs") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!(
            "No project configuration file ({}) found in current directory or ancestors.",
            PROJECT_CONFIG_FILENAME
        );
        Ok(None)
    }
}

/// Walks from `start` up to the filesystem root (or the first `.git` directory)
/// looking for `.execrs.toml`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win where set; env tables are merged key by key.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut env = user.run.env;
    env.extend(project_cfg.run.env);
    Config {
        run: RunConfig {
            working_dir: project_cfg.run.working_dir.or(user.run.working_dir),
            directory_mode: project_cfg.run.directory_mode.or(user.run.directory_mode),
            env,
        },
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(dir) = config.run.working_dir.take() {
        if dir.is_empty() {
            debug!("Ignoring empty working_dir in configuration.");
        } else {
            let expanded = shellexpand::tilde(&dir).into_owned();
            debug!("Expanded working directory: {}", expanded);
            config.run.working_dir = Some(expanded);
        }
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    for key in config.run.env.keys() {
        validate_env_key(key)?;
    }
    for (key, value) in &config.run.env {
        if value.contains('\0') {
            return Err(anyhow!(ExecrsError::Config(format!(
                "Value of environment variable '{}' contains a NUL byte.",
                key
            ))));
        }
    }
    if let Some(dir) = &config.run.working_dir {
        if !Path::new(dir).is_dir() {
            warn!("Configured working directory '{}' does not exist.", dir);
        }
    }
    Ok(())
}

/// Checks that `key` can be used as an environment variable name.
pub fn validate_env_key(key: &str) -> std::result::Result<(), ExecrsError> {
    if key.is_empty() {
        return Err(ExecrsError::Config(
            "Environment variable names cannot be empty.".to_string(),
        ));
    }
    if key.contains('=') || key.contains('\0') {
        return Err(ExecrsError::Config(format!(
            "Invalid environment variable name '{}': must not contain '=' or NUL.",
            key
        )));
    }
    Ok(())
}
