use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{MAX_RETRIES, PAGE_SIZE, RETRY_DELAY_MS, TRANSITION_DELAY_MS};

/// Upper bound for either fixed delay. Anything longer is almost certainly a
/// unit mistake (seconds passed as milliseconds, etc.).
pub const MAX_DELAY_MS: u64 = 60_000;
pub const MAX_PAGE_SIZE: usize = 1_000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("page_size must be between 1 and {max}, got {value}")]
    PageSize { value: usize, max: usize },
    #[error("{field} must be at most {max} ms, got {value}")]
    Delay {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub page_size: usize,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub transition_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            max_retries: MAX_RETRIES,
            retry_delay_ms: RETRY_DELAY_MS,
            transition_delay_ms: TRANSITION_DELAY_MS,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::PageSize {
                value: self.page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        if self.retry_delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::Delay {
                field: "retry_delay_ms",
                value: self.retry_delay_ms,
                max: MAX_DELAY_MS,
            });
        }
        if self.transition_delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::Delay {
                field: "transition_delay_ms",
                value: self.transition_delay_ms,
                max: MAX_DELAY_MS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_list_view_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_ms, 2_000);
        assert_eq!(config.transition_delay_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let config = PipelineConfig {
            page_size: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PageSize { value: 0, .. })
        ));
    }

    #[test]
    fn oversized_delay_is_rejected() {
        let config = PipelineConfig {
            retry_delay_ms: MAX_DELAY_MS + 1,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Delay { field: "retry_delay_ms", .. })
        ));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"page_size": 25}"#).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_failure_folds_into_config_error_code() {
        let config: PipelineConfig = serde_json::from_str(r#"{"page_size": 0}"#).unwrap();
        let err = crate::AppError::from(config.validate().unwrap_err());
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
