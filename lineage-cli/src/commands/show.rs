//! Show command - Upstream and downstream lineage of one table
//!
//! Resolves a table name to its dataset node, then walks the graph in both
//! directions: everything that feeds the table, and everything it feeds.

use crate::commands::graph::badge_line;
use crate::commands::{validate_system, EventSource, NodeRow};
use crate::output::{
    Column, CsvOutput, Output, OutputConfig, OutputFormat, Outputter, TreeKind, TreeNode,
    TreeOutput,
};
use anyhow::Result;
use colored::Colorize;
use lineage_core::{tooltip, GraphStats, LineageEngine, LineageGraph};
use serde::Serialize;

/// Lineage of a single dataset
#[derive(Debug, Serialize)]
pub struct TableLineage {
    pub table: String,
    pub dataset: NodeRow,
    /// Hover text of the dataset, as the diagram renderers show it
    pub details: String,
    pub upstream: Vec<NodeRow>,
    pub downstream: Vec<NodeRow>,
    /// Counts for the restricted subgraph
    pub subgraph: GraphStats,
}

/// Row of the flattened CSV view
#[derive(Serialize)]
struct DirectedRow<'a> {
    direction: &'static str,
    #[serde(flatten)]
    node: &'a NodeRow,
}

impl TableLineage {
    /// Build the lineage of the first dataset named `table`, if any.
    pub fn resolve(graph: &LineageGraph, table: &str) -> Option<Self> {
        let target = graph.find_by_table(table)?;
        let engine = LineageEngine::new(graph);

        let rows = |ids: Vec<String>| -> Vec<NodeRow> {
            ids.iter()
                .filter(|id| **id != target.id)
                .filter_map(|id| graph.node(id))
                .map(NodeRow::from)
                .collect()
        };

        Some(Self {
            table: table.to_string(),
            dataset: NodeRow::from(target),
            details: tooltip(target),
            upstream: rows(engine.ancestors(&target.id)),
            downstream: rows(engine.descendants(&target.id)),
            subgraph: graph.restrict(table).stats(),
        })
    }

    fn csv_columns() -> Vec<Column> {
        vec![
            Column::new("direction", "direction"),
            Column::new("id", "id"),
            Column::new("type", "type"),
            Column::new("label", "label"),
            Column::new("layer", "layer"),
            Column::new("source_system", "source_system"),
        ]
    }
}

fn section(title: &str, nodes: &[NodeRow], config: &OutputConfig) -> String {
    let mut output = format!("\n{} ({}):\n", title.bold(), nodes.len());
    if nodes.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for node in nodes {
        output.push_str(&format!("  {}\n", badge_line(node, config)));
    }
    output
}

fn tree_group(title: &str, nodes: &[NodeRow]) -> TreeNode {
    let children = nodes
        .iter()
        .map(|n| TreeNode::new(n.label.clone(), TreeKind::Layer(n.layer)).with_suffix(n.id.clone()))
        .collect();
    TreeNode::new(title, TreeKind::Group)
        .with_suffix(format!("({})", nodes.len()))
        .with_children(children)
}

impl Outputter for TableLineage {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Lineage of".bold(),
            badge_line(&self.dataset, config)
        ));
        output.push_str(&format!("{}\n", "-".repeat(60)));
        for line in self.details.lines() {
            output.push_str(&format!("  {}\n", line));
        }

        output.push_str(&section("Upstream", &self.upstream, config));
        output.push_str(&section("Downstream", &self.downstream, config));

        output.push_str(&format!(
            "\n{}: {} datasets, {} jobs, {} connections\n",
            "Subgraph".bold(),
            self.subgraph.datasets,
            self.subgraph.jobs,
            self.subgraph.connections
        ));
        output
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        let rows: Vec<DirectedRow> = self
            .upstream
            .iter()
            .map(|node| DirectedRow {
                direction: "upstream",
                node,
            })
            .chain(self.downstream.iter().map(|node| DirectedRow {
                direction: "downstream",
                node,
            }))
            .collect();
        CsvOutput::format_with_columns(&rows, &Self::csv_columns())
    }

    fn to_tree(&self, config: &OutputConfig) -> String {
        let children = vec![
            tree_group("Upstream", &self.upstream),
            tree_group("Downstream", &self.downstream),
        ];
        let root = format!("{} ({})", self.dataset.label, self.dataset.id);
        TreeOutput::from_nodes(&root, &children, config)
    }
}

/// Run the show command
pub fn run(
    source: &EventSource,
    table: &str,
    system: Option<&str>,
    show_jobs: bool,
    format: OutputFormat,
) -> Result<()> {
    if table.trim().is_empty() {
        return Err(anyhow::anyhow!("Table name cannot be empty"));
    }

    let mut graph = source.load_graph()?;
    if let Some(system) = system {
        validate_system(system)?;
        graph = graph.filter_by_source_system(system);
    }
    if !show_jobs {
        graph = graph.collapse_jobs();
    }

    let lineage = TableLineage::resolve(&graph, table).ok_or_else(|| {
        let known: Vec<String> = graph.table_names(None).into_iter().take(10).collect();
        anyhow::anyhow!(
            "No dataset with table name '{}'. Known tables include: {}",
            table,
            known.join(", ")
        )
    })?;

    tracing::debug!(
        "{}: {} upstream, {} downstream",
        lineage.dataset.id,
        lineage.upstream.len(),
        lineage.downstream.len()
    );

    Output::new(lineage, format).render()
}
