#![no_main]

use libfuzzer_sys::fuzz_target;
use phylonet_core::config::AnalysisConfig;
use phylonet_core::network::Network;
use phylonet_core::property::Property;
use phylonet_core::report::NetworkReport;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(network) = Network::from_edge_list(text) else {
        return;
    };
    // Keep the quadratic analyses cheap.
    if network.vertex_count() > 256 {
        return;
    }
    let report = NetworkReport::classify(
        "fuzz",
        &network,
        &Property::REPORT_ORDER,
        AnalysisConfig::default(),
    );
    assert_eq!(report.properties.len(), Property::COUNT);
});
