use std::collections::HashSet;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::InsightBase;
use crate::validation::{Rule, Validate, Violations};

const fn default_strength() -> f64 {
    1.0
}

/// A node of the cascade graph: one insight at the time it was recorded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CascadeNode {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
}

/// A directed "led to" edge between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CascadeEdge {
    pub source: String,
    pub target: String,
    #[serde(default = "default_strength")]
    pub strength: f64,
}

/// How insights lead to other insights over time.
///
/// The graph is a general directed graph. Cycles are allowed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CascadeMap {
    #[serde(flatten)]
    pub base: InsightBase,
    pub nodes: Vec<CascadeNode>,
    pub edges: Vec<CascadeEdge>,
    pub root_insight_id: String,
}

impl CascadeMap {
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&CascadeNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// The node with the most outgoing edges, ties going to the source that
    /// appears first in `edges`. Falls back to the earliest-dated node when
    /// there are no edges.
    #[must_use]
    pub fn suggested_root(&self) -> Option<&str> {
        let mut outgoing: Vec<(&str, usize)> = Vec::new();
        for edge in &self.edges {
            match outgoing.iter_mut().find(|(source, _)| *source == edge.source) {
                Some((_, count)) => *count += 1,
                None => outgoing.push((edge.source.as_str(), 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (source, count) in outgoing {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((source, count));
            }
        }

        best.map(|(source, _)| source).or_else(|| {
            self.nodes
                .iter()
                .min_by_key(|node| node.date)
                .map(|node| node.id.as_str())
        })
    }
}

impl Validate for CascadeMap {
    fn check(&self, out: &mut Violations) {
        self.base.check(out);

        let mut node_ids: HashSet<&str> = HashSet::with_capacity(self.nodes.len());
        out.scoped("nodes", |out| {
            for (i, node) in self.nodes.iter().enumerate() {
                out.scoped(format!("[{i}]"), |out| {
                    out.not_blank("id", &node.id);
                    out.not_blank("name", &node.name);
                    if !node_ids.insert(node.id.as_str()) {
                        out.push(
                            "id",
                            Rule::Duplicate,
                            format!("node id '{}' appears more than once", node.id),
                        );
                    }
                });
            }
        });

        out.scoped("edges", |out| {
            for (i, edge) in self.edges.iter().enumerate() {
                out.scoped(format!("[{i}]"), |out| {
                    for (field, endpoint) in [("source", &edge.source), ("target", &edge.target)] {
                        if !node_ids.contains(endpoint.as_str()) {
                            out.push(
                                field,
                                Rule::DanglingReference,
                                format!("references unknown node '{endpoint}'"),
                            );
                        }
                    }
                    if edge.strength.is_finite() && edge.strength < 0.0 {
                        out.push(
                            "strength",
                            Rule::OutOfRange,
                            format!("must not be negative, got {}", edge.strength),
                        );
                    } else {
                        out.finite("strength", edge.strength);
                    }
                });
            }
        });

        if !node_ids.contains(self.root_insight_id.as_str()) {
            out.push(
                "root_insight_id",
                Rule::DanglingReference,
                format!("references unknown node '{}'", self.root_insight_id),
            );
        }
    }
}
