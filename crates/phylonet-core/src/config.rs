use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::property::Property;

/// Analysis switches threaded through every property computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Keep scanning after the first counterexample so every violation is
    /// logged.
    #[serde(default)]
    pub exhaustive: bool,
}

/// How a report line is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `name;fragment;fragment;...`
    #[default]
    Csv,
    /// One JSON object per network.
    Json,
}

/// Project-level report settings (`phylonet.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Short codes to report, in order. Empty means every property.
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub format: ReportFormat,
    /// File that CSV lines are appended to.
    #[serde(default = "default_results_file")]
    pub results_file: PathBuf,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            properties: Vec::new(),
            format: ReportFormat::default(),
            results_file: default_results_file(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl ReportConfig {
    /// The configured properties, or the default report order.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first unknown short code.
    pub fn resolved_properties(&self) -> Result<Vec<Property>> {
        if self.properties.is_empty() {
            return Ok(Property::REPORT_ORDER.to_vec());
        }
        self.properties
            .iter()
            .map(|code| Property::from_code(code.trim()).map_err(anyhow::Error::from))
            .collect()
    }
}

/// Per-user defaults (`<config dir>/phylonet/config.toml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub format: Option<ReportFormat>,
    #[serde(default)]
    pub exhaustive: Option<bool>,
}

/// Load `phylonet.toml` from `project_root`, or the defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ReportConfig> {
    let path = project_root.join("phylonet.toml");
    if !path.exists() {
        return Ok(ReportConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ReportConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user config, or the defaults if there is none.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    load_user_config_from(&config_dir.join("phylonet/config.toml"))
}

fn load_user_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Project settings with user defaults filled in where the project file is
/// silent. Command-line flags are applied on top by the caller.
///
/// # Errors
///
/// Propagates loader errors.
pub fn resolve_config(project_root: &Path) -> Result<ReportConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    Ok(merge(project, &user, project_root))
}

fn merge(mut project: ReportConfig, user: &UserConfig, project_root: &Path) -> ReportConfig {
    let has_project_file = project_root.join("phylonet.toml").exists();
    if !has_project_file {
        if let Some(format) = user.format {
            project.format = format;
        }
        if let Some(exhaustive) = user.exhaustive {
            project.analysis.exhaustive = exhaustive;
        }
    }
    project
}

fn default_results_file() -> PathBuf {
    PathBuf::from("results.csv")
}
