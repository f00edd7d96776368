//! Property tests over randomly generated networks.
//!
//! The generators only produce valid networks whose inner vertices all have
//! total degree 3, so every invariant below must hold for every case.

use petgraph::algo::dominators::simple_fast;
use petgraph::graph::NodeIndex;
use phylonet_core::config::AnalysisConfig;
use phylonet_core::network::{Network, VertexKind};
use phylonet_core::property::{Property, PropertyEngine, Value};
use phylonet_core::report::NetworkReport;
use phylonet_core::stability::Stability;
use phylonet_sim::strategies::{arb_binary_network, arb_binary_tree, arb_subdivided_edges};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn engine(network: &Network) -> PropertyEngine<'_> {
    PropertyEngine::new(network, AnalysisConfig::default())
}

/// Every cached boolean agrees with the implication table.
fn assert_closed(engine: &PropertyEngine<'_>) {
    for p in Property::ALL.into_iter().filter(|p| p.is_boolean()) {
        match engine.peek(p) {
            Some(Value::Bool(true)) => {
                for &q in p.implies() {
                    assert_eq!(engine.peek(q), Some(Value::Bool(true)), "{p} ⇒ {q}");
                }
            }
            Some(Value::Bool(false)) => {
                for &q in p.implied_by() {
                    assert_eq!(engine.peek(q), Some(Value::Bool(false)), "¬{p} ⇒ ¬{q}");
                }
            }
            _ => {}
        }
    }
}

/// Tree-based by definition: some choice of one parent per reticulation
/// leaves every non-leaf vertex with a kept child.
fn has_base_tree(n: &Network) -> bool {
    let choices: Vec<Vec<NodeIndex>> = n
        .reticulations()
        .iter()
        .map(|&r| n.parents(r).collect())
        .collect();
    let total: usize = choices.iter().map(Vec::len).product();
    (0..total).any(|mut code| {
        let mut kept = vec![0usize; n.vertex_count()];
        for v in n.vertices().filter(|&v| n.in_degree(v) == 1) {
            for p in n.parents(v) {
                kept[p.index()] += 1;
            }
        }
        for parents in &choices {
            kept[parents[code % parents.len()].index()] += 1;
            code /= parents.len();
        }
        n.vertices().all(|v| n.out_degree(v) == 0 || kept[v.index()] > 0)
    })
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn generated_networks_are_binary(n in arb_binary_network(61)) {
        let inner = n.count_kind(VertexKind::Tree) + n.reticulations().len();
        // A cherry has no inner vertex and so no regularity.
        prop_assert_eq!(n.is_binary(), inner > 0);
        prop_assert_eq!(n.vertex_count() % 2, 1);
        prop_assert_eq!(n.reticulations().len() + n.vertex_count(), n.edge_count() + 1);
    }

    #[test]
    fn tree_based_matches_base_tree_search(n in arb_binary_network(21)) {
        prop_assert_eq!(
            engine(&n).get(Property::TreeBased),
            Value::Bool(has_base_tree(&n))
        );
    }

    #[test]
    fn contraction_is_confluent(
        (n, edges) in arb_binary_network(41)
            .prop_flat_map(|n| (Just(n.clone()), arb_subdivided_edges(&n, 8)))
    ) {
        let rebuilt = Network::from_edges(edges).expect("subdivision keeps validity");
        prop_assert_eq!(rebuilt.edges(), n.edges());
        prop_assert_eq!(rebuilt.content_hash(), n.content_hash());
    }
}

// ---------------------------------------------------------------------------
// Stability
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn stability_tree_is_dominator_tree(n in arb_binary_network(61)) {
        let stability = Stability::compute(&n);
        let dominators = simple_fast(n.graph(), n.root());
        for v in n.vertices() {
            prop_assert_eq!(
                stability.dominator(v),
                dominators.immediate_dominator(v),
                "vertex {}",
                n.label(v)
            );
        }
    }

    #[test]
    fn leaves_are_stable_on_themselves(n in arb_binary_network(61)) {
        let stability = Stability::compute(&n);
        for &leaf in n.leaves() {
            prop_assert_eq!(stability.stable_leaf(leaf), Some(leaf));
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn cached_values_are_closed(n in arb_binary_network(45)) {
        let mut e = engine(&n);
        e.evaluate_all(&Property::REPORT_ORDER);
        assert_closed(&e);
    }

    #[test]
    fn report_order_agrees_with_fresh_engines(n in arb_binary_network(45)) {
        let report = NetworkReport::classify("n", &n, &Property::REPORT_ORDER, AnalysisConfig::default());
        for p in Property::ALL {
            prop_assert_eq!(report.value(p), Some(engine(&n).get(p)), "{}", p);
        }
    }

    #[test]
    fn reversed_order_gives_the_same_values(n in arb_binary_network(45)) {
        let mut reversed = Property::REPORT_ORDER;
        reversed.reverse();
        let mut forward = engine(&n).evaluate_all(&Property::REPORT_ORDER);
        let mut backward = engine(&n).evaluate_all(&reversed);
        forward.sort_by_key(|(p, _)| *p);
        backward.sort_by_key(|(p, _)| *p);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn galled_tree_iff_level_one(n in arb_binary_network(45)) {
        let mut e = engine(&n);
        let gt = e.get_bool(Property::GalledTree);
        prop_assert_eq!(gt, e.get_int(Property::Level) == 1);
    }

    #[test]
    fn tree_child_implies_weaker_classes(n in arb_binary_network(45)) {
        let mut e = engine(&n);
        if e.get_bool(Property::TreeChild) {
            for p in [
                Property::NearlyTreeChild,
                Property::NearlyStable,
                Property::GeneticallyStable,
                Property::TreeSibling,
                Property::ReticulationVisible,
                Property::ComponentVisible,
            ] {
                prop_assert!(e.get_bool(p), "tc but not {}", p);
            }
        }
    }

    #[test]
    fn counts_are_bounded(n in arb_binary_network(45)) {
        let mut e = engine(&n);
        let r = e.get_int(Property::NumReticulations);
        prop_assert!(e.get_int(Property::Level) <= r);
        prop_assert!(
            e.get_int(Property::NumUnstableRootsPerBlock)
                <= e.get_int(Property::NumUnstableRoots)
        );
        prop_assert!(e.get_int(Property::NestingDepth) >= -1);
        prop_assert!(
            e.get_int(Property::SmallReticulationHeight)
                <= e.get_int(Property::BigReticulationHeight)
        );
    }

    #[test]
    fn exhaustive_scan_does_not_change_the_report(n in arb_binary_network(45)) {
        let fast = NetworkReport::classify("n", &n, &Property::REPORT_ORDER, AnalysisConfig::default());
        let slow = NetworkReport::classify(
            "n",
            &n,
            &Property::REPORT_ORDER,
            AnalysisConfig { exhaustive: true },
        );
        prop_assert_eq!(fast.csv_line(), slow.csv_line());
    }

    #[test]
    fn trees_are_in_every_class_but_galled_tree(n in arb_binary_tree(45)) {
        let report = NetworkReport::classify("t", &n, &Property::REPORT_ORDER, AnalysisConfig::default());
        for p in Property::ALL {
            let expected = match p {
                Property::GalledTree => Value::Bool(false),
                p if p.is_boolean() => Value::Bool(true),
                _ => Value::Int(0),
            };
            prop_assert_eq!(report.value(p), Some(expected), "{}", p);
        }
    }
}
