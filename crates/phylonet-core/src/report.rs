//! Per-network classification reports.
//!
//! A [`NetworkReport`] is what the command line prints or appends for one
//! network: a name, a few structural facts, and the requested property
//! values in order.
//!
//! ```text
//! cherry.txt;0;0;0;0;0;0;0;0;0;0;tc;ntc;gs;ts;rv;cv;cp;ns;not gt;tb
//! ```

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::network::Network;
use crate::property::{Property, PropertyEngine, Value};

/// One property value in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyEntry {
    #[serde(skip)]
    pub property: Property,
    pub code: &'static str,
    pub label: &'static str,
    pub value: Value,
}

impl PropertyEntry {
    #[must_use]
    pub fn new(property: Property, value: Value) -> Self {
        Self {
            property,
            code: property.code(),
            label: property.label(),
            value,
        }
    }

    /// `code`, `not code`, or the number.
    #[must_use]
    pub fn fragment(&self) -> String {
        self.value.fragment(self.property)
    }
}

/// Classification of one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkReport {
    pub name: String,
    pub content_hash: String,
    pub vertices: usize,
    pub edges: usize,
    pub leaves: usize,
    pub reticulations: usize,
    pub regularity: usize,
    pub properties: Vec<PropertyEntry>,
}

impl NetworkReport {
    /// Evaluate `properties` on `network` with a fresh engine.
    #[must_use]
    pub fn classify(
        name: impl Into<String>,
        network: &Network,
        properties: &[Property],
        config: AnalysisConfig,
    ) -> Self {
        let mut engine = PropertyEngine::new(network, config);
        let properties = engine
            .evaluate_all(properties)
            .into_iter()
            .map(|(p, v)| PropertyEntry::new(p, v))
            .collect();
        Self {
            name: name.into(),
            content_hash: network.content_hash().to_string(),
            vertices: network.vertex_count(),
            edges: network.edge_count(),
            leaves: network.leaves().len(),
            reticulations: network.reticulations().len(),
            regularity: network.regularity(),
            properties,
        }
    }

    /// `name;fragment;fragment;...`
    #[must_use]
    pub fn csv_line(&self) -> String {
        let mut line = self.name.clone();
        for entry in &self.properties {
            line.push(';');
            line.push_str(&entry.fragment());
        }
        line
    }

    /// Single-line JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Value of `property`, if it was requested.
    #[must_use]
    pub fn value(&self, property: Property) -> Option<Value> {
        self.properties
            .iter()
            .find(|e| e.property == property)
            .map(|e| e.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cherry() -> Network {
        Network::from_edges([("r", "a"), ("r", "b")]).expect("valid network")
    }

    #[test]
    fn csv_line_prefixes_name() {
        let n = cherry();
        let report = NetworkReport::classify(
            "cherry.txt",
            &n,
            &[Property::NumReticulations, Property::TreeChild, Property::GalledTree],
            AnalysisConfig::default(),
        );
        assert_eq!(report.csv_line(), "cherry.txt;0;tc;not gt");
    }

    #[test]
    fn empty_property_list_is_just_the_name() {
        let n = cherry();
        let report = NetworkReport::classify("cherry", &n, &[], AnalysisConfig::default());
        assert_eq!(report.csv_line(), "cherry");
    }

    #[test]
    fn json_carries_structure_and_values() {
        let n = cherry();
        let report = NetworkReport::classify(
            "cherry",
            &n,
            &[Property::Level, Property::Compressed],
            AnalysisConfig::default(),
        );
        let json: serde_json::Value =
            serde_json::from_str(&report.to_json().expect("serialize")).expect("parse");
        assert_eq!(json["name"], "cherry");
        assert_eq!(json["vertices"], 3);
        assert_eq!(json["leaves"], 2);
        assert_eq!(json["properties"][0]["code"], "lvl");
        assert_eq!(json["properties"][0]["value"], 0);
        assert_eq!(json["properties"][1]["value"], true);
        assert!(
            json["content_hash"]
                .as_str()
                .expect("hash is a string")
                .starts_with("blake3:")
        );
    }

    #[test]
    fn value_looks_up_by_property() {
        let n = cherry();
        let report =
            NetworkReport::classify("cherry", &n, &[Property::Level], AnalysisConfig::default());
        assert_eq!(report.value(Property::Level), Some(Value::Int(0)));
        assert_eq!(report.value(Property::TreeChild), None);
    }
}
