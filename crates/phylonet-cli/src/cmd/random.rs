use anyhow::Result;
use clap::Args;
use phylonet_core::network::Network;
use phylonet_core::report::NetworkReport;
use phylonet_sim::random_binary;
use rand::{SeedableRng, rngs::StdRng};
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

use crate::cmd::ReportArgs;
use crate::output::ReportSink;

/// Arguments for `phylonet random`.
#[derive(Args, Debug)]
pub struct RandomArgs {
    /// Number of vertices; must be odd.
    pub vertices: usize,

    /// Mean reticulation number [default: vertices / 10].
    #[arg(long)]
    pub mean: Option<f64>,

    /// Seed for a reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of networks to generate.
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Print each generated edge list instead of classifying it.
    #[arg(long)]
    pub edges: bool,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Generate `count` random binary networks and classify or print them.
///
/// # Errors
///
/// Returns an error for impossible generator parameters, configuration
/// problems, or a failing write.
pub fn run_random(args: &RandomArgs, project_root: &Path) -> Result<()> {
    let mean = args.mean.unwrap_or_else(|| default_mean(args.vertices));
    let mut rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    if args.edges {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for _ in 0..args.count {
            let network = random_binary(args.vertices, mean, &mut rng)?;
            for (parent, child) in network.edges() {
                writeln!(out, "{parent} {child}")?;
            }
        }
        return Ok(());
    }

    let settings = args.report.resolve(project_root)?;
    let mut sink = ReportSink::open(settings.format, settings.results_file.as_deref())?;
    for _ in 0..args.count {
        let network = random_binary(args.vertices, mean, &mut rng)?;
        info!(hash = network.content_hash(), "generated network");
        let report = NetworkReport::classify(
            random_name(&network),
            &network,
            &settings.properties,
            settings.analysis,
        );
        sink.emit(&report)?;
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn default_mean(vertices: usize) -> f64 {
    vertices as f64 / 10.0
}

/// `(random-<vertices>-<edges>)`
fn random_name(network: &Network) -> String {
    format!(
        "(random-{}-{})",
        network.vertex_count(),
        network.edge_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_carries_vertex_and_edge_counts() {
        let n = Network::from_edges([("r", "a"), ("r", "b")]).expect("valid network");
        assert_eq!(random_name(&n), "(random-3-2)");
    }

    #[test]
    fn default_mean_is_a_tenth_of_the_vertices() {
        assert!((default_mean(51) - 5.1).abs() < 1e-9);
    }
}
