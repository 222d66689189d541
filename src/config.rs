use crate::actuator::ActuatorKind;
use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub actuator: ActuatorConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TableConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ActuatorConfig {
    #[serde(default)]
    pub kind: ActuatorKind,
    #[serde(default = "default_replay_path")]
    pub replay_path: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AnimationConfig {
    /// How long a single step or quarter turn lasts, in seconds.
    #[serde(default = "default_step_secs")]
    pub step_secs: f64,
    /// Pause between two frames, in milliseconds.
    #[serde(default = "default_frame_millis")]
    pub frame_millis: u64,
}

// Default values
fn default_width() -> i32 { 5 }
fn default_height() -> i32 { 5 }
fn default_replay_path() -> String { "replay.json".to_string() }
fn default_step_secs() -> f64 { 1.0 }
fn default_frame_millis() -> u64 { 16 }

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            kind: ActuatorKind::default(),
            replay_path: default_replay_path(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step_secs: default_step_secs(),
            frame_millis: default_frame_millis(),
        }
    }
}

impl Config {
    /// Load configuration from a file, or use defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = Config::parse(&contents).map_err(|source| ConfigError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;
                info!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no configuration file found, using defaults");
                Ok(Config::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Rejects settings the simulator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table.width <= 0 || self.table.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "table dimensions must be positive, got {}x{}",
                self.table.width, self.table.height
            )));
        }

        if !self.animation.step_secs.is_finite() || self.animation.step_secs <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "animation step must last a positive number of seconds, got {}",
                self.animation.step_secs
            )));
        }

        if self.animation.frame_millis == 0 {
            return Err(ConfigError::Invalid(
                "animation frames must be at least one millisecond apart".to_string(),
            ));
        }

        Ok(())
    }
}
