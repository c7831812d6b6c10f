//! TOML configuration for the command-line driver.
//!
//! ```toml
//! [pipeline]
//! kernel_size = 5
//!
//! [paths]
//! input_dir = "data/raw"
//! output_dir = "data/preprocessed"
//!
//! [logging]
//! level = "info"
//! json = false
//! ```
//!
//! Every section and key is optional; missing values take the defaults above.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};
use crate::types::{KernelSize, DEFAULT_KERNEL_SIZE};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Median window side length, must be odd and at most 255.
    pub kernel_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/raw"),
            output_dir: PathBuf::from("data/preprocessed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. "info" or "image_preprocess=debug".
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PreprocessError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| PreprocessError::Configuration(format!("failed to parse config: {e}")))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PreprocessError::Configuration(format!("failed to serialize config: {e}")))
    }

    /// Reject values the pipeline would fail on, before any file is touched.
    pub fn validate(&self) -> Result<()> {
        KernelSize::new(self.pipeline.kernel_size).map_err(|e| {
            PreprocessError::Configuration(format!("pipeline.kernel_size: {e}"))
        })?;

        if self.logging.level.trim().is_empty() {
            return Err(PreprocessError::Configuration(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
