//! Lazily evaluated, memoized property values with implication propagation.
//!
//! # Overview
//!
//! A [`PropertyEngine`] borrows one [`Network`] and owns everything derived
//! from it: the stability facts (computed up front), the block partition
//! (computed on first use), the height invariants, and one cached
//! [`Value`] slot per [`Property`].
//!
//! ```text
//! get(p) ── cached? ──▶ value
//!    │
//!    └─ compute(p) ──▶ set(p, v) ──▶ worklist over implies / implied_by
//! ```
//!
//! Propagation never overwrites a determined value. Because every `set`
//! runs to a fixed point in both directions, the known values are always
//! closed under the implication table; a conflicting assignment means a
//! recognition procedure is wrong and is logged with `error!`.
//!
//! Some computations settle a second property as a side effect: the level
//! settles `gt`, the unstable-root count settles `cv`, and any of the three
//! height invariants settles the other two.
//!
//! ## Typical Usage
//!
//! ```rust
//! use phylonet_core::config::AnalysisConfig;
//! use phylonet_core::network::Network;
//! use phylonet_core::property::{Property, PropertyEngine, Value};
//!
//! let n = Network::from_edge_list("r a\nr b\na h\nb h\nh x\na y\nb z\n")?;
//! let mut engine = PropertyEngine::new(&n, AnalysisConfig::default());
//! assert_eq!(engine.get(Property::TreeChild), Value::Bool(true));
//! // tree-child networks are reticulation visible without checking
//! assert_eq!(engine.peek(Property::ReticulationVisible), Some(Value::Bool(true)));
//! assert_eq!(engine.report(&[Property::Level, Property::GalledTree]), "1;gt");
//! # Ok::<(), phylonet_core::error::StructureError>(())
//! ```

use petgraph::graph::NodeIndex;
use tracing::{debug, error, info, instrument};

use crate::blocks::Blocks;
use crate::config::AnalysisConfig;
use crate::metrics::{
    self, ancestors::max_uncommon_ancestors, heights::ReticulationHeights,
    indegree::max_reticulation_subgraph_indegree, level, nesting::nesting_depth,
};
use crate::network::Network;
use crate::property::{Property, Value, checks};
use crate::stability::Stability;

/// Per-network property cache and the analyses it draws on.
#[derive(Debug)]
pub struct PropertyEngine<'n> {
    network: &'n Network,
    config: AnalysisConfig,
    stability: Stability,
    blocks: Option<Blocks>,
    unstable_roots: Option<Vec<NodeIndex>>,
    values: [Option<Value>; Property::COUNT],
}

impl<'n> PropertyEngine<'n> {
    /// Run the stability analysis and start with every property unknown.
    #[must_use]
    pub fn new(network: &'n Network, config: AnalysisConfig) -> Self {
        Self {
            network,
            config,
            stability: Stability::compute(network),
            blocks: None,
            unstable_roots: None,
            values: [None; Property::COUNT],
        }
    }

    #[must_use]
    pub const fn network(&self) -> &'n Network {
        self.network
    }

    #[must_use]
    pub const fn stability(&self) -> &Stability {
        &self.stability
    }

    /// The block partition, computed on first use.
    pub fn blocks(&mut self) -> &Blocks {
        let network = self.network;
        self.blocks.get_or_insert_with(|| Blocks::decompose(network))
    }

    /// Cached value of `p`, without computing it.
    #[must_use]
    pub fn peek(&self, p: Property) -> Option<Value> {
        self.values[p.index()]
    }

    /// Value of `p`, computing it on first use.
    pub fn get(&mut self, p: Property) -> Value {
        if let Some(v) = self.values[p.index()] {
            return v;
        }
        let v = self.compute(p);
        self.set(p, v);
        self.values[p.index()].unwrap_or(v)
    }

    /// Boolean value of a class property.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `p` is numeric.
    pub fn get_bool(&mut self, p: Property) -> bool {
        debug_assert!(p.is_boolean(), "{p} is numeric");
        self.get(p).as_bool().unwrap_or(false)
    }

    /// Integer value of a numeric property.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `p` is boolean.
    pub fn get_int(&mut self, p: Property) -> i64 {
        debug_assert!(!p.is_boolean(), "{p} is boolean");
        self.get(p).as_int().unwrap_or(0)
    }

    /// Assign `value` to `p` and propagate it through the implication table.
    ///
    /// `true` spreads along [`Property::implies`], `false` along
    /// [`Property::implied_by`]. Determined values are never overwritten.
    pub fn set(&mut self, p: Property, value: Value) {
        let mut work = vec![(p, value)];
        while let Some((q, v)) = work.pop() {
            match self.values[q.index()] {
                Some(existing) if existing == v => continue,
                Some(existing) => {
                    error!(
                        property = q.code(),
                        kept = %existing,
                        rejected = %v,
                        "contradicting property values"
                    );
                    debug_assert_eq!(existing, v, "contradicting values for {q}");
                    continue;
                }
                None => {}
            }

            debug!(property = q.label(), value = %v, "setting");
            self.values[q.index()] = Some(v);

            if let Value::Bool(b) = v {
                let next = if b { q.implies() } else { q.implied_by() };
                work.extend(next.iter().map(|&r| (r, Value::Bool(b))));
            }
        }
    }

    /// Assign `value` only if `p` is still unknown, without propagation.
    pub fn set_if_none(&mut self, p: Property, value: Value) {
        if self.values[p.index()].is_none() {
            self.values[p.index()] = Some(value);
        }
    }

    /// Compute `properties` in order.
    pub fn evaluate_all(&mut self, properties: &[Property]) -> Vec<(Property, Value)> {
        properties.iter().map(|&p| (p, self.get(p))).collect()
    }

    /// Compute `properties` in order and render them as `;`-joined
    /// fragments.
    #[instrument(skip_all, fields(network = %self.network.content_hash()))]
    pub fn report(&mut self, properties: &[Property]) -> String {
        let fragments: Vec<String> = self
            .evaluate_all(properties)
            .into_iter()
            .map(|(p, v)| {
                debug!(property = p.label(), value = %v, "classified");
                v.fragment(p)
            })
            .collect();
        let line = fragments.join(";");
        info!(%line, "network classified");
        line
    }

    // -- computation --------------------------------------------------------

    fn compute(&mut self, p: Property) -> Value {
        let network = self.network;
        let exhaustive = self.config.exhaustive;
        let stability = &self.stability;
        match p {
            Property::TreeChild => Value::Bool(checks::tree_child(network, exhaustive)),
            Property::NearlyTreeChild => {
                Value::Bool(checks::nearly_tree_child(network, exhaustive))
            }
            Property::GeneticallyStable => {
                Value::Bool(checks::genetically_stable(network, stability, exhaustive))
            }
            Property::TreeSibling => Value::Bool(checks::tree_sibling(network, exhaustive)),
            Property::ReticulationVisible => {
                Value::Bool(checks::reticulation_visible(network, stability, exhaustive))
            }
            Property::ComponentVisible => {
                Value::Bool(checks::component_visible(network, stability, exhaustive))
            }
            Property::Compressed => Value::Bool(checks::compressed(network, exhaustive)),
            Property::NearlyStable => {
                Value::Bool(checks::nearly_stable(network, stability, exhaustive))
            }
            Property::TreeBased => Value::Bool(checks::tree_based(network)),
            Property::GalledTree => Value::Bool(self.get_int(Property::Level) == 1),
            Property::NumReticulations => Value::Int(metrics::as_value(
                network.reticulations().len(),
            )),
            Property::Level => {
                let lvl = metrics::as_value(level::level(network, self.blocks()));
                self.set(Property::GalledTree, Value::Bool(lvl == 1));
                Value::Int(lvl)
            }
            Property::MaxReticulationSubgraphIndegree => Value::Int(metrics::as_value(
                max_reticulation_subgraph_indegree(network),
            )),
            Property::NumUnstableRoots => {
                let count = self.unstable_roots().len();
                self.set(Property::ComponentVisible, Value::Bool(count == 0));
                Value::Int(metrics::as_value(count))
            }
            Property::NumUnstableRootsPerBlock => {
                let roots = self
                    .unstable_roots
                    .get_or_insert_with(|| level::unstable_roots(network, stability));
                let blocks = self
                    .blocks
                    .get_or_insert_with(|| Blocks::decompose(network));
                let per_block = level::unstable_roots_per_block(network, blocks, roots);
                Value::Int(metrics::as_value(per_block))
            }
            Property::NestingDepth => {
                let lvl = self.get_int(Property::Level);
                if lvl <= 1 {
                    Value::Int(lvl)
                } else {
                    let blocks = self
                        .blocks
                        .get_or_insert_with(|| Blocks::decompose(network));
                    Value::Int(nesting_depth(network, &self.stability, blocks, exhaustive))
                }
            }
            Property::ShortestPath
            | Property::SmallReticulationHeight
            | Property::BigReticulationHeight => {
                let heights = ReticulationHeights::compute(network);
                let values = [
                    (Property::ShortestPath, heights.shortest_path),
                    (Property::SmallReticulationHeight, heights.small_height),
                    (Property::BigReticulationHeight, heights.big_height),
                ];
                let mut mine = Value::Int(0);
                for (q, h) in values {
                    let v = Value::Int(metrics::as_value(h));
                    if q == p {
                        mine = v;
                    } else {
                        self.set(q, v);
                    }
                }
                mine
            }
            Property::UncommonAncestors => {
                Value::Int(metrics::as_value(max_uncommon_ancestors(network)))
            }
        }
    }

    fn unstable_roots(&mut self) -> &[NodeIndex] {
        let network = self.network;
        let stability = &self.stability;
        self.unstable_roots
            .get_or_insert_with(|| level::unstable_roots(network, stability))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
