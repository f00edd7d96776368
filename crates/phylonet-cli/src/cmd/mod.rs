pub mod classify;
pub mod completions;
pub mod random;

use anyhow::Result;
use clap::Args;
use phylonet_core::config::{AnalysisConfig, ReportFormat, resolve_config};
use phylonet_core::property::Property;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Report options shared by `classify` and `random`.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Comma-separated short codes to report [default: all, numerics first].
    #[arg(short, long, value_name = "CODES")]
    pub props: Option<String>,

    /// Report line format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// File report lines are appended to [default: results.csv].
    #[arg(long, value_name = "PATH")]
    pub results_file: Option<PathBuf>,

    /// Only print report lines; leave the results file alone.
    #[arg(long)]
    pub no_append: bool,

    /// Keep scanning after the first counterexample and log every one.
    #[arg(long)]
    pub exhaustive: bool,
}

/// Report options after config files and flags are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub properties: Vec<Property>,
    pub format: ReportFormat,
    /// `None` with `--no-append`.
    pub results_file: Option<PathBuf>,
    pub analysis: AnalysisConfig,
}

impl ReportArgs {
    /// Load `phylonet.toml` and the user config, then apply the flags.
    ///
    /// # Errors
    ///
    /// Returns an error for unreadable config files or unknown codes.
    pub fn resolve(&self, project_root: &Path) -> Result<ReportSettings> {
        let config = resolve_config(project_root)?;

        let properties = match &self.props {
            Some(codes) => Property::parse_list(codes)?,
            None => config.resolved_properties()?,
        };
        let format = self.format.map_or(config.format, ReportFormat::from);
        let results_file = (!self.no_append).then(|| {
            project_root.join(self.results_file.as_ref().unwrap_or(&config.results_file))
        });
        let analysis = AnalysisConfig {
            exhaustive: self.exhaustive || config.analysis.exhaustive,
        };

        Ok(ReportSettings {
            properties,
            format,
            results_file,
            analysis,
        })
    }
}
