use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;
use crate::matrix::IntegerMatrix;
use crate::moves::MoveTable;
use crate::seed::{DEFAULT_VARIABLE_PREFIX, Seed};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawConfig {
    #[serde(default)]
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub explore: ExploreConfig,
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub moves: MovesConfig,
}

/// Which labels quiver sub-graphs carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// `k` parallel edges per positive cell, no labels.
    #[default]
    None,
    /// One edge per positive cell, labelled by the skew-symmetry rule.
    Symmetry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixConfig {
    #[serde(default)]
    pub labels: LabelMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreConfig {
    /// Maximum number of classes admitted by a bounded exploration.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    #[serde(default = "default_variable_prefix")]
    pub variable_prefix: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            variable_prefix: default_variable_prefix(),
        }
    }
}

impl ClusterConfig {
    /// Seed for `matrix` with variables named by the configured prefix.
    #[must_use]
    pub fn seed(&self, matrix: IntegerMatrix) -> Seed {
        Seed::with_prefixed_cluster(matrix, &self.variable_prefix)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovesConfig {
    /// Custom move table. Relative paths resolve against the config file.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl DrawConfig {
    /// The move table this configuration selects: the custom table if one is
    /// configured, the bundled one otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the custom table cannot be read or is invalid.
    pub fn move_table(&self) -> Result<MoveTable> {
        match &self.moves.path {
            Some(path) => MoveTable::load(path),
            None => MoveTable::builtin().context("Bundled move table is invalid"),
        }
    }
}

/// Load a config file. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<DrawConfig> {
    if !path.exists() {
        return Ok(DrawConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut config =
        parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    if let Some(moves) = config.moves.path.as_mut() {
        if moves.is_relative() {
            *moves = base.join(&*moves);
        }
    }
    Ok(config)
}

/// # Errors
///
/// Returns an error on malformed TOML or unknown label modes.
pub fn parse_config(text: &str) -> Result<DrawConfig> {
    let code = ErrorCode::ConfigParseError;
    toml::from_str::<DrawConfig>(text).with_context(|| format!("{code}: {}", code.message()))
}

fn default_variable_prefix() -> String {
    DEFAULT_VARIABLE_PREFIX.to_string()
}
