//! Graph command - Summarize the lineage graph
//!
//! Shows headline counts, every node of the current view, and any
//! dependency cycles found in it.

use crate::commands::{EventSource, GraphView, NodeRow};
use crate::output::{
    layer_badge, Alignment, Column, CsvOutput, Output, OutputConfig, OutputFormat, Outputter,
    TableOutput, TreeKind, TreeNode, TreeOutput,
};
use anyhow::Result;
use colored::Colorize;
use lineage_core::render::thousands;
use lineage_core::{GraphStats, Layer, LineageEdge, LineageEngine, LineageGraph};
use serde::Serialize;

const LAYER_ORDER: [Layer; 6] = [
    Layer::Source,
    Layer::Bronze,
    Layer::Silver,
    Layer::Gold,
    Layer::Unknown,
    Layer::Job,
];

/// Summary of one graph view
#[derive(Debug, Serialize)]
pub struct GraphSummary {
    pub input: String,
    #[serde(flatten)]
    pub stats: GraphStats,
    pub nodes: Vec<NodeRow>,
    pub edges: Vec<LineageEdge>,
    /// Node ids of each dependency cycle
    pub cycles: Vec<Vec<String>>,
}

impl GraphSummary {
    pub fn new(input: impl Into<String>, graph: &LineageGraph) -> Self {
        let cycles = LineageEngine::new(graph).find_cycles();
        Self {
            input: input.into(),
            stats: graph.stats(),
            nodes: graph.nodes().iter().map(NodeRow::from).collect(),
            edges: graph.edges().to_vec(),
            cycles,
        }
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Type", "type"),
            Column::new("Name", "label").with_max_width(40),
            Column::new("Layer", "layer"),
            Column::new("Source", "source_system"),
            Column::new("Rows", "row_count").with_alignment(Alignment::Right),
        ]
    }

    fn csv_columns() -> Vec<Column> {
        vec![
            Column::new("id", "id"),
            Column::new("type", "type"),
            Column::new("label", "label"),
            Column::new("layer", "layer"),
            Column::new("source_system", "source_system"),
            Column::new("table_name", "table_name"),
            Column::new("row_count", "row_count"),
            Column::new("size", "size"),
        ]
    }
}

impl Outputter for GraphSummary {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Lineage Graph".bold(), self.input.dimmed()));
        output.push_str(&format!("{}\n", "-".repeat(60)));

        if self.nodes.is_empty() {
            output.push_str(&"  No lineage data in this view.\n".dimmed().to_string());
            return output;
        }

        let metrics = [
            ("Datasets", self.stats.datasets.to_string()),
            ("Jobs", self.stats.jobs.to_string()),
            ("Connections", self.stats.connections.to_string()),
            ("Layers", self.stats.layers.to_string()),
        ];
        output.push_str(&TableOutput::format_key_value(&metrics, config));
        output.push('\n');
        output.push_str(&TableOutput::format_with_columns(
            &self.nodes,
            &Self::columns(),
            config,
        ));
        output.push('\n');

        for cycle in &self.cycles {
            output.push_str(&format!(
                "\n{} Cycle through {} nodes: {}\n",
                "WARNING:".yellow().bold(),
                cycle.len(),
                cycle.join(" -> ")
            ));
        }

        output
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        CsvOutput::format_with_columns(&self.nodes, &Self::csv_columns())
    }

    fn to_tree(&self, config: &OutputConfig) -> String {
        let groups: Vec<TreeNode> = LAYER_ORDER
            .iter()
            .filter_map(|&layer| {
                let members: Vec<TreeNode> = self
                    .nodes
                    .iter()
                    .filter(|n| n.layer == layer)
                    .map(|n| {
                        let node = TreeNode::new(n.label.clone(), TreeKind::Layer(layer));
                        match n.row_count {
                            Some(rows) => node.with_suffix(format!("({} rows)", thousands(rows))),
                            None => node,
                        }
                    })
                    .collect();
                if members.is_empty() {
                    return None;
                }
                Some(
                    TreeNode::new(layer.as_str().to_uppercase(), TreeKind::Group)
                        .with_suffix(format!("({})", members.len()))
                        .with_children(members),
                )
            })
            .collect();

        let root = format!(
            "Lineage Graph ({} datasets, {} jobs)",
            self.stats.datasets, self.stats.jobs
        );
        TreeOutput::from_nodes(&root, &groups, config)
    }
}

/// `[LAYER] label id` line for a node.
pub fn badge_line(node: &NodeRow, config: &OutputConfig) -> String {
    if config.use_colors() {
        format!("{} {} {}", layer_badge(node.layer), node.label, node.id.dimmed())
    } else {
        format!(
            "[{}] {} {}",
            node.layer.as_str().to_uppercase(),
            node.label,
            node.id
        )
    }
}

/// Run the graph command
pub fn run(source: &EventSource, view: &GraphView, format: OutputFormat) -> Result<()> {
    let graph = view.apply(source.load_graph()?)?;
    let summary = GraphSummary::new(source.path.display().to_string(), &graph);

    if !summary.cycles.is_empty() {
        tracing::warn!("Lineage graph contains {} cycle(s)", summary.cycles.len());
    }

    Output::new(summary, format).render()
}
