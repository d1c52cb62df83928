//! Export command - Render the lineage graph for other tools
//!
//! Supported formats:
//! - json: nodes with colors, shapes and hover text, plus edges
//! - mermaid: flowchart for Markdown and docs
//! - dot: Graphviz digraph

use crate::commands::{EventSource, GraphView};
use crate::output::{Output, OutputFormat, SuccessMessage};
use anyhow::{Context, Result};
use lineage_core::{GraphRenderer, JsonRenderer, LineageGraph, RenderFormat};
use std::path::Path;

/// Render `graph` in `format`. `compact` only affects JSON.
pub fn render(graph: &LineageGraph, format: RenderFormat, compact: bool) -> Result<String> {
    let renderer: Box<dyn GraphRenderer> = match format {
        RenderFormat::Json if compact => Box::new(JsonRenderer::compact()),
        _ => format.renderer(),
    };
    renderer
        .render(graph)
        .with_context(|| format!("Failed to render {} export", format))
}

/// Run the export command
pub fn run(
    source: &EventSource,
    view: &GraphView,
    export_format: &str,
    output_path: Option<&Path>,
    compact: bool,
    format: OutputFormat,
) -> Result<()> {
    let export_format: RenderFormat = export_format.parse().map_err(anyhow::Error::msg)?;

    let graph = view.apply(source.load_graph()?)?;
    let content = render(&graph, export_format, compact)?;

    match output_path {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            tracing::info!("Wrote {} export to {}", export_format, path.display());

            let message = SuccessMessage::new(format!(
                "Exported {} nodes, {} edges as {} to {}",
                graph.node_count(),
                graph.edge_count(),
                export_format,
                path.display()
            ));
            Output::new(message, format).render()
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::medallion_graph;
    use tempfile::TempDir;

    #[test]
    fn test_render_each_format() {
        let graph = medallion_graph();

        let json = render(&graph, RenderFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 10);
        assert!(json.contains('\n'));

        let compact = render(&graph, RenderFormat::Json, true).unwrap();
        assert!(!compact.contains('\n'));

        let mermaid = render(&graph, RenderFormat::Mermaid, true).unwrap();
        assert!(mermaid.starts_with("flowchart LR"));

        let dot = render(&graph, RenderFormat::Dot, false).unwrap();
        assert!(dot.starts_with("digraph lineage {"));
    }

    #[test]
    fn test_run_writes_file() {
        let dir = TempDir::new().unwrap();
        let events = dir.path().join("events.json");
        std::fs::write(
            &events,
            serde_json::to_string(&crate::commands::fixtures::medallion_events()).unwrap(),
        )
        .unwrap();
        let out = dir.path().join("lineage.mmd");

        let source = EventSource {
            path: events,
            latest_only: false,
        };
        let view = GraphView {
            show_jobs: true,
            ..Default::default()
        };
        run(&source, &view, "mermaid", Some(&out), false, OutputFormat::Json).unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("flowchart LR"));
        assert!(written.contains("classDef gold"));
    }

    #[test]
    fn test_run_rejects_unknown_format() {
        let source = EventSource {
            path: "unused.json".into(),
            latest_only: true,
        };
        let view = GraphView::default();
        let err = run(&source, &view, "png", None, false, OutputFormat::Table).unwrap_err();
        assert!(err.to_string().contains("Valid formats: json, mermaid, dot"));
    }
}
