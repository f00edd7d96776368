//! Named network properties and the implication table between them.
//!
//! # Overview
//!
//! Every property has a short code (the stable report contract), a human
//! label, and a kind. Boolean properties are network classes; numeric ones
//! are structural invariants.
//!
//! ```text
//! booleans: tc ntc gs ts rv cv cp ns gt tb
//! numerics: r lvl rsi ur urb nd sp srh brh ua
//! ```
//!
//! Boolean classes form a partial order. Only its transitive reduction is
//! stored ([`Property::implies`]); the reverse edges
//! ([`Property::implied_by`]) carry `false` downward:
//!
//! ```text
//!  tc ──▶ ntc ──▶ gs ──▶ ts
//!   │              │
//!   │              └───▶ rv ──▶ cv
//!   │                    ▲      ▲
//!   └───▶ ns ────────────┼──────┘
//!                 gt ────┘
//! ```
//!
//! Values are cached and propagated by [`PropertyEngine`].

pub mod checks;
pub mod engine;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PropertyError;

pub use engine::PropertyEngine;

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// Whether a property holds a class membership or a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Boolean,
    Numeric,
}

/// Every property the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    TreeChild,
    NearlyTreeChild,
    GeneticallyStable,
    TreeSibling,
    ReticulationVisible,
    ComponentVisible,
    Compressed,
    NearlyStable,
    GalledTree,
    TreeBased,
    NumReticulations,
    Level,
    MaxReticulationSubgraphIndegree,
    NumUnstableRoots,
    NumUnstableRootsPerBlock,
    NestingDepth,
    ShortestPath,
    SmallReticulationHeight,
    BigReticulationHeight,
    UncommonAncestors,
}

impl Property {
    pub const COUNT: usize = 20;

    /// All properties, in discriminant order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::TreeChild,
        Self::NearlyTreeChild,
        Self::GeneticallyStable,
        Self::TreeSibling,
        Self::ReticulationVisible,
        Self::ComponentVisible,
        Self::Compressed,
        Self::NearlyStable,
        Self::GalledTree,
        Self::TreeBased,
        Self::NumReticulations,
        Self::Level,
        Self::MaxReticulationSubgraphIndegree,
        Self::NumUnstableRoots,
        Self::NumUnstableRootsPerBlock,
        Self::NestingDepth,
        Self::ShortestPath,
        Self::SmallReticulationHeight,
        Self::BigReticulationHeight,
        Self::UncommonAncestors,
    ];

    /// Default report order: numeric invariants, then classes.
    pub const REPORT_ORDER: [Self; Self::COUNT] = [
        Self::NumReticulations,
        Self::Level,
        Self::MaxReticulationSubgraphIndegree,
        Self::NumUnstableRoots,
        Self::NumUnstableRootsPerBlock,
        Self::NestingDepth,
        Self::ShortestPath,
        Self::SmallReticulationHeight,
        Self::BigReticulationHeight,
        Self::UncommonAncestors,
        Self::TreeChild,
        Self::NearlyTreeChild,
        Self::GeneticallyStable,
        Self::TreeSibling,
        Self::ReticulationVisible,
        Self::ComponentVisible,
        Self::Compressed,
        Self::NearlyStable,
        Self::GalledTree,
        Self::TreeBased,
    ];

    /// Dense index for cache arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short code used in reports and on the command line.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TreeChild => "tc",
            Self::NearlyTreeChild => "ntc",
            Self::GeneticallyStable => "gs",
            Self::TreeSibling => "ts",
            Self::ReticulationVisible => "rv",
            Self::ComponentVisible => "cv",
            Self::Compressed => "cp",
            Self::NearlyStable => "ns",
            Self::GalledTree => "gt",
            Self::TreeBased => "tb",
            Self::NumReticulations => "r",
            Self::Level => "lvl",
            Self::MaxReticulationSubgraphIndegree => "rsi",
            Self::NumUnstableRoots => "ur",
            Self::NumUnstableRootsPerBlock => "urb",
            Self::NestingDepth => "nd",
            Self::ShortestPath => "sp",
            Self::SmallReticulationHeight => "srh",
            Self::BigReticulationHeight => "brh",
            Self::UncommonAncestors => "ua",
        }
    }

    /// Human-readable description.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TreeChild => "tree child",
            Self::NearlyTreeChild => "nearly tree child",
            Self::GeneticallyStable => "genetically stable",
            Self::TreeSibling => "tree sibling",
            Self::ReticulationVisible => "reticulation visible",
            Self::ComponentVisible => "component visible",
            Self::Compressed => "compressed",
            Self::NearlyStable => "nearly stable",
            Self::GalledTree => "galled tree",
            Self::TreeBased => "tree based",
            Self::NumReticulations => "#reticulations",
            Self::Level => "level",
            Self::MaxReticulationSubgraphIndegree => {
                "max #incoming edges to any reticulation component"
            }
            Self::NumUnstableRoots => "#unstable component roots",
            Self::NumUnstableRootsPerBlock => "#unstable component roots per block",
            Self::NestingDepth => "nesting depth",
            Self::ShortestPath => "max shortest path above reticulation",
            Self::SmallReticulationHeight => {
                "min distance of any lowest vertex seeing both parents"
            }
            Self::BigReticulationHeight => "max distance of any lowest vertex seeing both parents",
            Self::UncommonAncestors => {
                "max number of uncommon ancestors of parents of any reticulation"
            }
        }
    }

    #[must_use]
    pub const fn kind(self) -> PropertyKind {
        if self.index() < Self::NumReticulations.index() {
            PropertyKind::Boolean
        } else {
            PropertyKind::Numeric
        }
    }

    #[must_use]
    pub const fn is_boolean(self) -> bool {
        matches!(self.kind(), PropertyKind::Boolean)
    }

    /// Classes directly implied by membership in `self`.
    #[must_use]
    pub const fn implies(self) -> &'static [Self] {
        match self {
            Self::TreeChild => &[Self::NearlyTreeChild, Self::NearlyStable],
            Self::NearlyTreeChild => &[Self::GeneticallyStable],
            Self::GeneticallyStable => &[Self::TreeSibling, Self::ReticulationVisible],
            Self::ReticulationVisible | Self::NearlyStable => &[Self::ComponentVisible],
            Self::GalledTree => &[Self::ReticulationVisible],
            _ => &[],
        }
    }

    /// Classes that cannot hold when `self` does not: the properties whose
    /// [`implies`](Self::implies) list contains `self`.
    #[must_use]
    pub const fn implied_by(self) -> &'static [Self] {
        match self {
            Self::NearlyTreeChild | Self::NearlyStable => &[Self::TreeChild],
            Self::GeneticallyStable => &[Self::NearlyTreeChild],
            Self::TreeSibling => &[Self::GeneticallyStable],
            Self::ReticulationVisible => &[Self::GeneticallyStable, Self::GalledTree],
            Self::ComponentVisible => &[Self::ReticulationVisible, Self::NearlyStable],
            _ => &[],
        }
    }

    /// Look a property up by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::UnknownCode`] for anything else.
    pub fn from_code(code: &str) -> Result<Self, PropertyError> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.code() == code)
            .ok_or_else(|| PropertyError::UnknownCode(code.to_string()))
    }

    /// Parse a comma-separated list of short codes, ignoring blanks.
    ///
    /// # Errors
    ///
    /// Returns the first unknown code.
    pub fn parse_list(codes: &str) -> Result<Vec<Self>, PropertyError> {
        codes
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(Self::from_code)
            .collect()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Property {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A computed property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
}

impl Value {
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            Self::Int(_) => None,
        }
    }

    #[must_use]
    pub const fn as_int(self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(i),
            Self::Bool(_) => None,
        }
    }

    /// Report fragment for `property`: `code`, `not code`, or the number.
    #[must_use]
    pub fn fragment(self, property: Property) -> String {
        match self {
            Self::Bool(true) => property.code().to_string(),
            Self::Bool(false) => format!("not {}", property.code()),
            Self::Int(i) => i.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
