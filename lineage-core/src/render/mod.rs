//! Render adapters: turn a [`LineageGraph`] into text for other tools.
//!
//! Renderers only read the graph. Nothing else in the crate depends on them,
//! so a new output format is one more [`GraphRenderer`] impl.

mod dot;
mod json;
mod mermaid;
mod tooltip;

pub use dot::DotRenderer;
pub use json::JsonRenderer;
pub use mermaid::MermaidRenderer;
pub use tooltip::{thousands, tooltip};

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::graph::LineageGraph;
use crate::types::LineageEdge;

/// Render a lineage graph to a string.
pub trait GraphRenderer {
    fn render(&self, graph: &LineageGraph) -> Result<String>;
}

/// Output formats with a built-in renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    Json,
    Mermaid,
    Dot,
}

impl RenderFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Mermaid => "mermaid",
            Self::Dot => "dot",
        }
    }

    /// The default renderer for this format.
    pub fn renderer(&self) -> Box<dyn GraphRenderer> {
        match self {
            Self::Json => Box::new(JsonRenderer::default()),
            Self::Mermaid => Box::new(MermaidRenderer),
            Self::Dot => Box::new(DotRenderer),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "mermaid" | "mmd" => Ok(Self::Mermaid),
            "dot" | "graphviz" => Ok(Self::Dot),
            _ => Err(format!(
                "Unknown export format: {}. Valid formats: json, mermaid, dot",
                s
            )),
        }
    }
}

/// Edges in first-seen order with repeats removed. Diagrams draw each
/// relationship once.
pub(crate) fn distinct_edges(graph: &LineageGraph) -> Vec<&LineageEdge> {
    let mut seen = HashSet::new();
    graph.edges().iter().filter(|e| seen.insert(*e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::extract;
    use crate::types::{DatasetRef, Event};

    #[test]
    fn test_render_format_from_str() {
        assert_eq!("JSON".parse::<RenderFormat>().unwrap(), RenderFormat::Json);
        assert_eq!("mmd".parse::<RenderFormat>().unwrap(), RenderFormat::Mermaid);
        assert_eq!("graphviz".parse::<RenderFormat>().unwrap(), RenderFormat::Dot);
        assert!("d2".parse::<RenderFormat>().is_err());
    }

    #[test]
    fn test_distinct_edges() {
        let event = Event::new("ns", "job")
            .with_input(DatasetRef::new("s3://lake", "bronze/a"))
            .with_output(DatasetRef::new("s3://lake", "silver/a"));
        let graph = extract(&[event.clone(), event]);

        assert_eq!(graph.edge_count(), 4);
        assert_eq!(distinct_edges(&graph).len(), 2);
    }

    #[test]
    fn test_every_format_renders() {
        let graph = extract(&[Event::new("ns", "job")
            .with_output(DatasetRef::new("s3://lake", "gold/a"))]);
        for format in [RenderFormat::Json, RenderFormat::Mermaid, RenderFormat::Dot] {
            let text = format.renderer().render(&graph).unwrap();
            assert!(text.contains("gold/a"), "{} output lacks dataset", format);
        }
    }
}
