//! Mermaid flowchart export.

use std::collections::HashMap;

use super::{distinct_edges, GraphRenderer};
use crate::error::Result;
use crate::graph::LineageGraph;
use crate::types::{Layer, LineageNode};

/// Left-to-right Mermaid flowchart with one style class per layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidRenderer;

const LAYERS: [Layer; 6] = [
    Layer::Source,
    Layer::Bronze,
    Layer::Silver,
    Layer::Gold,
    Layer::Unknown,
    Layer::Job,
];

impl GraphRenderer for MermaidRenderer {
    fn render(&self, graph: &LineageGraph) -> Result<String> {
        let mut output = String::new();

        output.push_str("flowchart LR\n");
        output.push_str("    %% Lineage Graph Export\n\n");

        // Mermaid needs clean ids
        let id_map: HashMap<&str, String> = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), format!("n{}", i)))
            .collect();

        output.push_str("    %% Nodes\n");
        for node in graph.nodes() {
            if let Some(clean_id) = id_map.get(node.id.as_str()) {
                output.push_str(&format!("    {}\n", node_shape(clean_id, node)));
            }
        }

        output.push('\n');
        output.push_str("    %% Edges\n");
        for edge in distinct_edges(graph) {
            if let (Some(source_id), Some(target_id)) = (
                id_map.get(edge.source.as_str()),
                id_map.get(edge.target.as_str()),
            ) {
                output.push_str(&format!("    {} --> {}\n", source_id, target_id));
            }
        }

        output.push('\n');
        output.push_str("    %% Layers\n");
        for layer in LAYERS {
            output.push_str(&format!(
                "    classDef {} fill:{},stroke:#1F2937,color:#111827\n",
                layer,
                layer.color()
            ));
        }
        for layer in LAYERS {
            let members: Vec<&str> = graph
                .nodes()
                .iter()
                .filter(|n| n.layer == layer)
                .filter_map(|n| id_map.get(n.id.as_str()).map(String::as_str))
                .collect();
            if !members.is_empty() {
                output.push_str(&format!("    class {} {}\n", members.join(","), layer));
            }
        }

        Ok(output)
    }
}

fn node_shape(clean_id: &str, node: &LineageNode) -> String {
    let label = escape(&node.label);
    match node.shape() {
        "database" => format!("{}[(\"{}\")]", clean_id, label),
        "diamond" => format!("{}{{\"{}\"}}", clean_id, label),
        "ellipse" => format!("{}([\"{}\"])", clean_id, label),
        _ => format!("{}[\"{}\"]", clean_id, label),
    }
}

fn escape(label: &str) -> String {
    label.replace('"', "#quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::extract;
    use crate::types::{DatasetRef, Event};

    #[test]
    fn test_mermaid_export() {
        let event = Event::new("lake", "ingest")
            .with_input(DatasetRef::new("postgres://prod", "public.orders"))
            .with_output(DatasetRef::new("s3://lake", "bronze/orders"));
        let graph = extract(&[event.clone(), event]);
        let output = MermaidRenderer.render(&graph).unwrap();

        assert!(output.starts_with("flowchart LR\n"));
        assert!(output.contains("    n0{\"ingest\"}\n"));
        assert!(output.contains("    n1[(\"public.orders\")]\n"));
        assert!(output.contains("    n2[\"bronze/orders\"]\n"));
        assert!(output.contains("    n1 --> n0\n"));
        assert!(output.contains("    n0 --> n2\n"));
        // Duplicate edges drawn once
        assert_eq!(output.matches("n0 --> n2").count(), 1);
        assert!(output.contains("classDef bronze fill:#CD7F32"));
        assert!(output.contains("    class n2 bronze\n"));
        assert!(!output.contains("class  silver"));
    }

    #[test]
    fn test_mermaid_escapes_quotes() {
        let graph = extract(&[Event::new("ns", "say \"hi\"")]);
        let output = MermaidRenderer.render(&graph).unwrap();
        assert!(output.contains("#quot;hi#quot;"));
    }
}
