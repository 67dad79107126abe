//! JSON configuration and report helpers for the annotation tool.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::annotate::{AnnotationReport, PassReport};
use crate::draw::MarkerStyle;
use crate::passes::{AnnotationPolicy, ConfigError, DetectionPass};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Configuration for an annotation run.
///
/// Every field is optional; omitted passes or style fall back to the
/// built-in two-pass policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotateConfig {
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub passes: Option<Vec<DetectionPass>>,
    #[serde(default)]
    pub style: Option<MarkerStyle>,
}

impl AnnotateConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the annotated image path: the configured one, or
    /// `<stem>_circles.png` next to `input`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| default_output_path(input))
    }

    /// Build and validate the annotation policy, applying overrides.
    pub fn build_policy(&self) -> Result<AnnotationPolicy, ConfigError> {
        let mut policy = AnnotationPolicy::default();
        if let Some(passes) = self.passes.clone() {
            policy.passes = passes;
        }
        if let Some(style) = self.style {
            policy.style = style;
        }
        policy.validate()?;
        Ok(policy)
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}_circles.png"))
}

/// Serializable summary of one annotation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotateReport {
    pub image_path: String,
    pub width: u32,
    pub height: u32,
    pub passes: Vec<PassReport>,
    pub total_circles: usize,
    pub elapsed_ms: u64,
}

impl AnnotateReport {
    pub fn new(image_path: &Path, annotation: AnnotationReport, elapsed_ms: u64) -> Self {
        Self {
            image_path: image_path.to_string_lossy().into_owned(),
            width: annotation.width,
            height: annotation.height,
            total_circles: annotation.total_circles(),
            passes: annotation.passes,
            elapsed_ms,
        }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
