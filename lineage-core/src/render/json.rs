//! Node-link JSON export.

use serde::Serialize;

use super::{tooltip, GraphRenderer};
use crate::error::Result;
use crate::graph::{GraphStats, LineageGraph};
use crate::types::{LineageEdge, LineageNode};

/// Node-link JSON with render hints on every node. Duplicate edges are kept.
#[derive(Debug, Clone, Copy)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonRenderer {
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    metadata: JsonMetadata,
    nodes: Vec<JsonNode<'a>>,
    edges: &'a [LineageEdge],
}

#[derive(Serialize)]
struct JsonMetadata {
    node_count: usize,
    edge_count: usize,
    #[serde(flatten)]
    stats: GraphStats,
    generated_by: &'static str,
}

#[derive(Serialize)]
struct JsonNode<'a> {
    #[serde(flatten)]
    node: &'a LineageNode,
    color: &'static str,
    shape: &'static str,
    title: String,
}

impl GraphRenderer for JsonRenderer {
    fn render(&self, graph: &LineageGraph) -> Result<String> {
        let document = JsonGraph {
            metadata: JsonMetadata {
                node_count: graph.node_count(),
                edge_count: graph.edge_count(),
                stats: graph.stats(),
                generated_by: concat!("lineage ", env!("CARGO_PKG_VERSION")),
            },
            nodes: graph
                .nodes()
                .iter()
                .map(|node| JsonNode {
                    node,
                    color: node.color(),
                    shape: node.shape(),
                    title: tooltip(node),
                })
                .collect(),
            edges: graph.edges(),
        };

        let text = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(text)
    }
}
