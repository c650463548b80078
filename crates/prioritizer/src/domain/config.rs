//! Configuration domain facade.

use std::path::{Path, PathBuf};

use tokio::fs;

use super::calendar::HolidayCalendar;
use crate::entities::ScoringConfig;
use crate::errors::{PrioritizerError, PrioritizerResult};

/// Loads and saves the scoring configuration file
pub struct ConfigDomain {
    config_path: PathBuf,
}

impl ConfigDomain {
    /// Create a config domain for the given file path
    pub fn new(config_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration; a missing file yields the defaults
    pub async fn load(&self) -> PrioritizerResult<ScoringConfig> {
        match fs::read_to_string(&self.config_path).await {
            Ok(content) => {
                let config: ScoringConfig =
                    serde_json::from_str(&content).map_err(|e| PrioritizerError::ConfigError {
                        reason: format!("{}: {e}", self.config_path.display()),
                    })?;
                Self::validate(&config)?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ScoringConfig::default()),
            Err(e) => Err(PrioritizerError::FileReadError {
                path: self.config_path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Save configuration
    pub async fn save(&self, config: &ScoringConfig) -> PrioritizerResult<()> {
        Self::validate(config)?;

        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            PrioritizerError::FileWriteError {
                path: self.config_path.display().to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Reject values the scoring pipeline cannot work with
    pub fn validate(config: &ScoringConfig) -> PrioritizerResult<()> {
        if config.urgency_horizon_days <= 0 {
            return Err(PrioritizerError::InvalidConfigValue {
                key: "urgency_horizon_days".to_string(),
                reason: "must be a positive number of days".to_string(),
            });
        }
        if !config.dependent_increment.is_finite() || config.dependent_increment < 0.0 {
            return Err(PrioritizerError::InvalidConfigValue {
                key: "dependent_increment".to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        if config.low_importance > config.high_importance {
            return Err(PrioritizerError::InvalidConfigValue {
                key: "low_importance".to_string(),
                reason: "must not exceed high_importance".to_string(),
            });
        }
        HolidayCalendar::from_entries(&config.holidays)?;
        Ok(())
    }
}
