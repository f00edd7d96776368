#![no_main]

use libfuzzer_sys::fuzz_target;
use phylonet_core::network::{Network, RawNetwork, parse_edge_list};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let edges = parse_edge_list(text);
    let Ok(mut raw) = RawNetwork::from_edges(edges.iter().cloned()) else {
        return;
    };
    raw.contract_trivial_vertices();
    assert_eq!(raw.contract_trivial_vertices(), 0);
    if raw.validate().is_ok() {
        let network = Network::from_raw(raw).expect("validated network");
        assert!(network.vertex_count() >= network.leaves().len() + 1);
    }
});
