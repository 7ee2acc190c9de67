//! Startup configuration, read from TOML.
//!
//! ```toml
//! [link]
//! host = "192.168.4.1"
//! port = 21
//!
//! [aim]
//! yaw_limit = 30.0
//! pitch_limit = 50.0
//! pitch_bias = 10.0
//!
//! [tracking]
//! target_class = 0
//! smoothing_alpha = 0.3
//!
//! [engagement]
//! voiceline_threshold = 8
//! close_threshold = 20
//! explicit_fire_off = false
//! ```
//!
//! Every key is optional and falls back to the value shown.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::tracker::{EngagementConfig, PERSON_CLASS_ID, TrackerConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "192.168.4.1".to_string()
}
fn default_port() -> u16 {
    21
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AimConfig {
    #[serde(default = "default_yaw_limit")]
    pub yaw_limit: f32,
    #[serde(default = "default_pitch_limit")]
    pub pitch_limit: f32,
    #[serde(default = "default_pitch_bias")]
    pub pitch_bias: f32,
}

fn default_yaw_limit() -> f32 {
    30.0
}
fn default_pitch_limit() -> f32 {
    50.0
}
fn default_pitch_bias() -> f32 {
    10.0
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            yaw_limit: default_yaw_limit(),
            pitch_limit: default_pitch_limit(),
            pitch_bias: default_pitch_bias(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrackingConfig {
    #[serde(default = "default_target_class")]
    pub target_class: u32,
    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f32,
}

fn default_target_class() -> u32 {
    PERSON_CLASS_ID
}
fn default_smoothing_alpha() -> f32 {
    0.3
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            target_class: default_target_class(),
            smoothing_alpha: default_smoothing_alpha(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngagementSection {
    #[serde(default = "default_voiceline_threshold")]
    pub voiceline_threshold: u32,
    #[serde(default = "default_close_threshold")]
    pub close_threshold: u32,
    #[serde(default)]
    pub explicit_fire_off: bool,
}

fn default_voiceline_threshold() -> u32 {
    8
}
fn default_close_threshold() -> u32 {
    20
}

impl Default for EngagementSection {
    fn default() -> Self {
        Self {
            voiceline_threshold: default_voiceline_threshold(),
            close_threshold: default_close_threshold(),
            explicit_fire_off: false,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TurretConfig {
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub aim: AimConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub engagement: EngagementSection,
}

impl TurretConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: TurretConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.tracking.smoothing_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "tracking.smoothing_alpha must be in (0, 1], got {alpha}"
            )));
        }

        for (name, value) in [
            ("aim.yaw_limit", self.aim.yaw_limit),
            ("aim.pitch_limit", self.aim.pitch_limit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite, non-negative angle, got {value}"
                )));
            }
        }
        if !self.aim.pitch_bias.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "aim.pitch_bias must be finite, got {}",
                self.aim.pitch_bias
            )));
        }

        let e = &self.engagement;
        if e.voiceline_threshold == 0 {
            return Err(ConfigError::Invalid(
                "engagement.voiceline_threshold must be at least 1".into(),
            ));
        }
        if e.voiceline_threshold >= e.close_threshold {
            return Err(ConfigError::Invalid(format!(
                "engagement.voiceline_threshold ({}) must be below close_threshold ({})",
                e.voiceline_threshold, e.close_threshold
            )));
        }

        if self.link.host.trim().is_empty() {
            return Err(ConfigError::Invalid("link.host must not be empty".into()));
        }
        if self.link.port == 0 {
            return Err(ConfigError::Invalid("link.port must not be 0".into()));
        }

        Ok(())
    }

    /// Tracker settings derived from this config.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            target_class: self.tracking.target_class,
            smoothing_alpha: self.tracking.smoothing_alpha,
            yaw_limit: self.aim.yaw_limit,
            pitch_limit: self.aim.pitch_limit,
            pitch_bias: self.aim.pitch_bias,
            engagement: EngagementConfig {
                voiceline_threshold: self.engagement.voiceline_threshold,
                close_threshold: self.engagement.close_threshold,
                explicit_fire_off: self.engagement.explicit_fire_off,
            },
        }
    }
}
