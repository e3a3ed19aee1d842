//! YAML configuration for the front end.
//!
//! Every field is optional:
//!
//! ```yaml
//! service:
//!   base_url: "http://127.0.0.1:8000"
//!   timeout_ms: 5000
//! fallback:
//!   seed: 42
//!   ranges:
//!     rainfall: { min: 0.0, max: 150.0 }
//! ```
//!
//! Command-line flags are applied on top through [`Overrides`].

use crate::Result;
use floodwatch_predict::{AssessmentRequester, FallbackConfig, ServiceConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloodwatchConfig {
    /// Prediction service connection.
    pub service: ServiceConfig,
    /// Demo-mode generation.
    pub fallback: FallbackConfig,
}

/// Values given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Replaces `service.base_url`.
    pub base_url: Option<String>,
    /// Replaces `service.timeout_ms`.
    pub timeout_ms: Option<u64>,
    /// Replaces `fallback.seed`.
    pub seed: Option<u64>,
}

impl FloodwatchConfig {
    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Parse and validate YAML text. Empty text yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.fallback.ranges.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(base_url) = &overrides.base_url {
            self.service.base_url = base_url.clone();
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.service.timeout_ms = Some(timeout_ms);
        }
        if let Some(seed) = overrides.seed {
            self.fallback.seed = Some(seed);
        }
        self
    }

    /// Build the requester this configuration describes.
    pub fn build_requester(&self) -> Result<AssessmentRequester> {
        Ok(AssessmentRequester::new(&self.service, &self.fallback)?)
    }
}
