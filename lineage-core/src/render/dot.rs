//! Graphviz DOT export.

use super::{distinct_edges, tooltip, GraphRenderer};
use crate::error::Result;
use crate::graph::LineageGraph;

/// Graphviz digraph laid out left to right, filled by layer color.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl GraphRenderer for DotRenderer {
    fn render(&self, graph: &LineageGraph) -> Result<String> {
        let mut output = String::new();

        output.push_str("digraph lineage {\n");
        output.push_str("    rankdir=LR;\n");
        output.push_str("    node [style=filled, fontname=\"Helvetica\"];\n");
        output.push_str("    edge [color=\"#9CA3AF\"];\n\n");

        for node in graph.nodes() {
            output.push_str(&format!(
                "    \"{}\" [label=\"{}\", shape={}, fillcolor=\"{}\", tooltip=\"{}\"];\n",
                escape(&node.id),
                escape(&node.label),
                dot_shape(node.shape()),
                node.color(),
                escape(&tooltip(node)),
            ));
        }

        output.push('\n');
        for edge in distinct_edges(graph) {
            output.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                escape(&edge.source),
                escape(&edge.target)
            ));
        }

        output.push_str("}\n");
        Ok(output)
    }
}

fn dot_shape(shape: &str) -> &'static str {
    match shape {
        "database" => "cylinder",
        "diamond" => "diamond",
        "ellipse" => "ellipse",
        _ => "box",
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::extract;
    use crate::types::{DatasetRef, Event};

    #[test]
    fn test_dot_export() {
        let event = Event::new("lake", "curate")
            .with_input(DatasetRef::new("s3://lake", "bronze/orders"))
            .with_output(DatasetRef::new("s3://lake", "silver/orders"));
        let graph = extract(&[event.clone(), event]);
        let output = DotRenderer.render(&graph).unwrap();

        assert!(output.starts_with("digraph lineage {\n    rankdir=LR;\n"));
        assert!(output.contains(
            "\"job_curate\" [label=\"curate\", shape=diamond, fillcolor=\"#6366F1\""
        ));
        assert!(output.contains(
            "\"s3://lake/silver/orders\" [label=\"silver/orders\", shape=box, fillcolor=\"#C0C0C0\""
        ));
        assert_eq!(
            output
                .matches("\"s3://lake/bronze/orders\" -> \"job_curate\";")
                .count(),
            1
        );
        assert!(output.trim_end().ends_with('}'));
    }

    #[test]
    fn test_dot_escapes() {
        assert_eq!(escape("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }
}
