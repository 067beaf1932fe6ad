//! Optional `threadnet.toml` analysis configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the same settings as the built-in defaults. Option names that belong to
//! downstream crates (time window, centrality metric, community method,
//! layout) are kept as strings here and parsed where they are used.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::columns;
use crate::error::ConfigError;
use crate::text::CleaningMethod;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "threadnet.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub analysis: AnalysisOptions,
    #[serde(default)]
    pub render: RenderOptions,
}

/// Column names used by the graph builders and the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_time")]
    pub time: String,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default = "default_text")]
    pub text: Vec<String>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            target: default_target(),
            time: default_time(),
            weight: None,
            text: default_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default = "default_window")]
    pub window: String,
    #[serde(default = "default_metric")]
    pub metric: String,
    #[serde(default = "default_community_method")]
    pub community_method: String,
    #[serde(default)]
    pub clean_method: CleaningMethod,
    #[serde(default = "default_top")]
    pub top: usize,
    /// Seed for Louvain node ordering; `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            window: default_window(),
            metric: default_metric(),
            community_method: default_community_method(),
            clean_method: CleaningMethod::default(),
            top: default_top(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_layout")]
    pub layout: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            dpi: default_dpi(),
            layout: default_layout(),
        }
    }
}

/// Load configuration from `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `path` if given, else `threadnet.toml` in `dir` if it exists, else
/// defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] if a present file cannot be read or parsed.
pub fn resolve_config(path: Option<&Path>, dir: &Path) -> Result<AnalysisConfig, ConfigError> {
    if let Some(path) = path {
        return load_config(path);
    }
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if candidate.is_file() {
        load_config(&candidate)
    } else {
        Ok(AnalysisConfig::default())
    }
}

fn default_source() -> String {
    columns::AUTHOR.to_string()
}

fn default_target() -> String {
    columns::TOPIC.to_string()
}

fn default_time() -> String {
    columns::DATE.to_string()
}

fn default_text() -> Vec<String> {
    vec![columns::POST.to_string()]
}

fn default_window() -> String {
    "month".to_string()
}

fn default_metric() -> String {
    "degree".to_string()
}

fn default_community_method() -> String {
    "louvain".to_string()
}

const fn default_top() -> usize {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs/images")
}

const fn default_dpi() -> u32 {
    300
}

fn default_layout() -> String {
    "spring".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg: AnalysisConfig = toml::from_str("").expect("parse empty");
        assert_eq!(cfg, AnalysisConfig::default());
        assert_eq!(cfg.columns.source, "msg_author_id");
        assert_eq!(cfg.analysis.window, "month");
        assert_eq!(cfg.render.dpi, 300);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let cfg: AnalysisConfig = toml::from_str(
            r#"
            [columns]
            weight = "score"

            [analysis]
            clean_method = "html_only"
            seed = 7
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.columns.weight.as_deref(), Some("score"));
        assert_eq!(cfg.columns.target, "msg_topic_id");
        assert_eq!(cfg.analysis.clean_method, CleaningMethod::HtmlOnly);
        assert_eq!(cfg.analysis.seed, Some(7));
        assert_eq!(cfg.analysis.top, 10);
    }

    #[test]
    fn resolve_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = resolve_config(None, dir.path()).expect("resolve");
        assert_eq!(cfg, AnalysisConfig::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[render]\ndpi = 72\n")
            .expect("write config");
        let cfg = resolve_config(None, dir.path()).expect("resolve");
        assert_eq!(cfg.render.dpi, 72);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[analysis\n").expect("write");
        let err = load_config(&path).expect_err("parse failure");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
