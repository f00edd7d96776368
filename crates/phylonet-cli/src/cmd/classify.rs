use anyhow::{Context, Result, bail};
use clap::Args;
use phylonet_core::error::StructureError;
use phylonet_core::network::Network;
use phylonet_core::report::NetworkReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cmd::ReportArgs;
use crate::output::ReportSink;

/// Arguments for `phylonet classify`.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Edge-list files, one `<parent> <child>` pair per line.
    #[arg(required_unless_present = "dir", conflicts_with = "dir")]
    pub files: Vec<PathBuf>,

    /// Classify every regular file in this directory.
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Classify each input and emit one report line per valid network.
///
/// Invalid networks are reported on stderr and skipped; the command fails
/// at the end if any input could not be classified.
///
/// # Errors
///
/// Returns an error for configuration problems, an unreadable directory or
/// results file, or if at least one input was skipped.
pub fn run_classify(args: &ClassifyArgs, project_root: &Path) -> Result<()> {
    let settings = args.report.resolve(project_root)?;
    let mut sink = ReportSink::open(settings.format, settings.results_file.as_deref())?;

    let inputs = match &args.dir {
        Some(dir) => list_networks(&project_root.join(dir), sink.results_file())?,
        None => args.files.iter().map(|f| project_root.join(f)).collect(),
    };

    let mut failed = 0usize;
    for path in &inputs {
        let name = display_name(path);
        info!(file = %path.display(), "working on");
        match Network::open(path) {
            Ok(network) => {
                let report = NetworkReport::classify(
                    name,
                    &network,
                    &settings.properties,
                    settings.analysis,
                );
                sink.emit(&report)?;
            }
            Err(err) => {
                failed += 1;
                let reason = if err.downcast_ref::<StructureError>().is_some() {
                    "invalid network"
                } else {
                    "unreadable file"
                };
                warn!(file = %path.display(), reason, error = ?err, "skipping input");
                eprintln!("error: {err:#}");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} inputs could not be classified", inputs.len());
    }
    Ok(())
}

/// Regular, non-hidden files of `dir` in name order, without the results
/// file.
fn list_networks(dir: &Path, results_file: Option<&Path>) -> Result<Vec<PathBuf>> {
    let skip = results_file.and_then(|p| fs::canonicalize(p).ok());
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
        {
            continue;
        }
        if skip.is_some() && fs::canonicalize(&path).ok() == skip {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}
