//! Configuration for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::ConfigError;

const ENV_MAX_CONCURRENT: &str = "EXTRACTION_MAX_CONCURRENT";
const ENV_RATE_LIMIT: &str = "EXTRACTION_RATE_LIMIT_PER_MINUTE";
const ENV_LATENCY_MS: &str = "EXTRACTION_LATENCY_MS";

/// Settings supplied when constructing adapters and the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of tasks an orchestrator runs at once.
    ///
    /// Default: 3.
    pub max_concurrent: usize,

    /// Admissions allowed per adapter category in one fixed minute window.
    ///
    /// Default: 10.
    pub rate_limit_per_minute: u32,

    /// Delay the simulated fetcher spends on each extraction.
    ///
    /// Stands in for network, OCR and inference latency. Default: 250ms.
    #[serde(with = "duration_millis")]
    pub simulated_latency: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 3,
            rate_limit_per_minute: 10,
            simulated_latency: Duration::from_millis(250),
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker count.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Set the per-category admission ceiling.
    pub fn with_rate_limit_per_minute(mut self, limit: u32) -> Self {
        self.rate_limit_per_minute = limit;
        self
    }

    /// Set the simulated extraction latency.
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    /// Reject settings that would stall the pipeline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent == 0 {
            return Err(ConfigError::Zero {
                name: "max_concurrent",
            });
        }
        if self.rate_limit_per_minute == 0 {
            return Err(ConfigError::Zero {
                name: "rate_limit_per_minute",
            });
        }
        Ok(())
    }

    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file if present. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Some(value) = read_number(ENV_MAX_CONCURRENT)? {
            config.max_concurrent = value as usize;
        }
        if let Some(value) = read_number(ENV_RATE_LIMIT)? {
            config.rate_limit_per_minute = u32::try_from(value).map_err(|_| {
                ConfigError::InvalidNumber {
                    name: ENV_RATE_LIMIT,
                    value: value.to_string(),
                }
            })?;
        }
        if let Some(value) = read_number(ENV_LATENCY_MS)? {
            config.simulated_latency = Duration::from_millis(value);
        }

        config.validate()?;
        Ok(config)
    }
}

fn read_number(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        Err(_) => Ok(None),
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
