//! Report rendering and the results file.
//!
//! Every report line goes to stdout. Unless `--no-append` is given, the
//! same line is also appended to the results file, which is created on
//! first use.

use anyhow::{Context, Result};
use clap::ValueEnum;
use phylonet_core::config::ReportFormat;
use phylonet_core::report::NetworkReport;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// `--format` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `name;fragment;fragment;...`
    Csv,
    /// One JSON object per network.
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Render one report as a single line without the trailing newline.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(report: &NetworkReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Csv => Ok(report.csv_line()),
        ReportFormat::Json => report.to_json().context("Failed to serialize report"),
    }
}

/// Destination of report lines.
pub struct ReportSink {
    format: ReportFormat,
    results: Option<(PathBuf, File)>,
}

impl ReportSink {
    /// Open the results file for appending, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be
    /// created.
    pub fn open(format: ReportFormat, results_file: Option<&Path>) -> Result<Self> {
        let results = match results_file {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                Some((path.to_path_buf(), file))
            }
            None => None,
        };
        Ok(Self { format, results })
    }

    /// Print `report` and append it to the results file.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn emit(&mut self, report: &NetworkReport) -> Result<()> {
        let line = render(report, self.format)?;
        writeln!(io::stdout().lock(), "{line}")?;
        if let Some((path, file)) = &mut self.results {
            writeln!(file, "{line}")
                .with_context(|| format!("Failed to append to {}", path.display()))?;
        }
        Ok(())
    }

    /// Path of the results file, if any.
    pub fn results_file(&self) -> Option<&Path> {
        self.results.as_ref().map(|(path, _)| path.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phylonet_core::config::AnalysisConfig;
    use phylonet_core::network::Network;
    use phylonet_core::property::Property;

    fn cherry_report() -> NetworkReport {
        let n = Network::from_edges([("r", "a"), ("r", "b")]).expect("valid network");
        NetworkReport::classify(
            "cherry",
            &n,
            &[Property::Level, Property::TreeChild],
            AnalysisConfig::default(),
        )
    }

    #[test]
    fn csv_and_json_render_one_line() {
        let report = cherry_report();
        assert_eq!(
            render(&report, ReportFormat::Csv).expect("csv"),
            "cherry;0;tc"
        );
        let json = render(&report, ReportFormat::Json).expect("json");
        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["name"], "cherry");
    }

    #[test]
    fn sink_appends_to_results_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/results.csv");

        for _ in 0..2 {
            let mut sink = ReportSink::open(ReportFormat::Csv, Some(&path)).expect("open");
            assert_eq!(sink.results_file(), Some(path.as_path()));
            sink.emit(&cherry_report()).expect("emit");
        }

        let content = std::fs::read_to_string(&path).expect("read results");
        assert_eq!(content, "cherry;0;tc\ncherry;0;tc\n");
    }

    #[test]
    fn sink_without_results_file_only_prints() {
        let mut sink = ReportSink::open(ReportFormat::Csv, None).expect("open");
        assert_eq!(sink.results_file(), None);
        sink.emit(&cherry_report()).expect("emit");
    }
}
