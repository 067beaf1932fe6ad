#![forbid(unsafe_code)]
//! threadnet-render library.
//!
//! PNG figures for interaction graphs and their metrics, drawn with the
//! `plotters` bitmap backend.
//!
//! # Conventions
//!
//! - **Errors**: Typed [`RenderError`]; plotting backend failures are carried
//!   as [`RenderError::Drawing`].
//! - **Logging**: every saved figure is logged at `info` with its path.
//! - **Sizes**: figures are specified in inches and rasterized at
//!   [`RenderConfig::dpi`]; font sizes are in points.
//! - **Paths**: each plot takes an optional `save_path`. When absent the
//!   figure is written to [`RenderConfig::output_dir`] under a fixed file
//!   name per plot kind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod charts;
pub mod error;
pub mod layout;
pub mod network;
pub mod style;
pub mod wordcloud;

pub use charts::{HeatmapOptions, TEMPORAL_METRICS, histogram};
pub use error::RenderError;
pub use layout::Layout;
pub use network::NetworkPlotOptions;
pub use wordcloud::WordCloudOptions;

use crate::error::Result;

/// Default directory for saved figures.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs/images";
/// Default raster resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Where and how densely figures are rasterized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
    pub dpi: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            dpi: DEFAULT_DPI,
        }
    }
}

/// Figure writer bound to one output directory.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a renderer, creating `config.output_dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if the directory cannot be created.
    pub fn new(config: RenderConfig) -> Result<Self> {
        fs::create_dir_all(&config.output_dir)?;
        debug!(dir = %config.output_dir.display(), dpi = config.dpi, "renderer ready");
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Pixel dimensions for a figure of `inches`.
    #[must_use]
    pub fn canvas_size(&self, inches: (f64, f64)) -> (u32, u32) {
        style::canvas_size(inches, self.config.dpi)
    }

    /// Pixel size of `pt` points.
    #[must_use]
    pub fn points(&self, pt: f64) -> u32 {
        style::points(pt, self.config.dpi)
    }

    /// `save_path` if given, otherwise `<output_dir>/<default_name>`.
    ///
    /// Missing parent directories of an explicit path are created.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if a parent directory cannot be created.
    pub fn target_path(&self, save_path: Option<&Path>, default_name: &str) -> Result<PathBuf> {
        let path = save_path.map_or_else(|| self.config.output_dir.join(default_name), Path::to_path_buf);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }
}

/// Log a written figure.
pub(crate) fn saved(kind: &str, path: &Path) {
    info!(kind, path = %path.display(), "saved {kind} plot to {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_output_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("figures").join("nested");
        let renderer = Renderer::new(RenderConfig {
            output_dir: dir.clone(),
            dpi: 100,
        })
        .expect("renderer");
        assert!(dir.is_dir());
        assert_eq!(renderer.output_dir(), dir.as_path());
        assert_eq!(renderer.canvas_size((15.0, 10.0)), (1500, 1000));
    }

    #[test]
    fn target_path_defaults_into_output_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let renderer = Renderer::new(RenderConfig {
            output_dir: tmp.path().to_path_buf(),
            dpi: 72,
        })
        .expect("renderer");

        let default = renderer.target_path(None, "network.png").expect("path");
        assert_eq!(default, tmp.path().join("network.png"));

        let explicit = tmp.path().join("elsewhere").join("x.png");
        let resolved = renderer.target_path(Some(&explicit), "network.png").expect("path");
        assert_eq!(resolved, explicit);
        assert!(tmp.path().join("elsewhere").is_dir());
    }

    #[test]
    fn default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("outputs/images"));
        assert_eq!(config.dpi, 300);
    }
}
