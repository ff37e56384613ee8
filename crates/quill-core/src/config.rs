//! Configuration types for planning and execution settings.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory
pub const HOME_ENV_VAR: &str = "QUILL_HOME";

/// Complete assistant configuration.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuillConfig {
    /// Planner configuration
    #[serde(default)]
    pub planning: PlanningConfig,
    /// Orchestration engine configuration
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Maximum steps a keyword-derived plan may contain
    pub max_steps: usize,
    /// Force every planned step to require confirmation
    pub require_step_confirmation: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            require_step_confirmation: false,
        }
    }
}

/// Orchestration engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Halt the run after the first failed step
    pub stop_on_error: bool,
    /// Log every step outcome at info level
    pub verbose: bool,
    /// Per-step timeout in milliseconds
    pub timeout_ms: u64,
    /// Validate step lists before running them
    pub validate_steps: bool,
    /// Maximum number of steps accepted per run
    pub max_steps: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            stop_on_error: true,
            verbose: false,
            timeout_ms: 30_000,
            validate_steps: true,
            max_steps: 50,
        }
    }
}

impl QuillConfig {
    /// Get the config directory (`$QUILL_HOME`, else `~/.quill`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(custom) = env::var(HOME_ENV_VAR) {
            return Ok(PathBuf::from(custom));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".quill"))
    }

    /// Get the default config file path (`<config dir>/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, creating it with defaults if missing
    ///
    /// # Errors
    /// Returns an error if the config cannot be read, parsed, or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            tracing::debug!("Wrote default config to {}", config_path.display());
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let header = "# Quill Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))?;
        Ok(())
    }

    /// Reject values the planner and engine cannot work with
    ///
    /// # Errors
    /// Returns [`Error::Config`] describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.planning.max_steps == 0 {
            return Err(Error::Config("planning.max_steps must be at least 1".to_owned()));
        }
        if self.execution.max_steps == 0 {
            return Err(Error::Config("execution.max_steps must be at least 1".to_owned()));
        }
        if self.execution.timeout_ms == 0 {
            return Err(Error::Config("execution.timeout_ms must be positive".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = QuillConfig::default();
        assert_eq!(config.planning.max_steps, 10);
        assert!(!config.planning.require_step_confirmation);
        assert!(config.execution.stop_on_error);
        assert_eq!(config.execution.timeout_ms, 30_000);
        assert_eq!(config.execution.max_steps, 50);
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = QuillConfig::default();
        config.execution.timeout_ms = 5_000;
        config.save_to_file(&path).unwrap();

        let loaded = QuillConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[execution]\nstop_on_error = false\n").unwrap();

        let loaded = QuillConfig::load_from_file(&path).unwrap();
        assert!(!loaded.execution.stop_on_error);
        assert_eq!(loaded.execution.timeout_ms, 30_000);
        assert_eq!(loaded.planning.max_steps, 10);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[execution]\ntimeout_ms = 0\n").unwrap();

        let result = QuillConfig::load_from_file(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
