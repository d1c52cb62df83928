//! Catalog command - Dataset details and schemas
//!
//! Lists datasets of the current view with their layer, source, volume
//! and schema columns.

use crate::commands::{EventSource, GraphView};
use crate::output::{
    layer_badge, Column, CsvOutput, Output, OutputConfig, OutputFormat, Outputter, TableOutput,
    TreeKind, TreeNode, TreeOutput,
};
use anyhow::Result;
use colored::Colorize;
use lineage_core::render::thousands;
use lineage_core::{Layer, LineageGraph, LineageNode, SchemaField, SourceSystem};
use serde::Serialize;

/// Catalog entry of one dataset
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub table_name: Option<String>,
    pub layer: Layer,
    pub source_system: SourceSystem,
    pub row_count: Option<u64>,
    pub size: Option<u64>,
    pub columns: Vec<SchemaField>,
}

impl From<&LineageNode> for CatalogEntry {
    fn from(node: &LineageNode) -> Self {
        Self {
            id: node.id.clone(),
            table_name: node.table_name.clone(),
            layer: node.layer,
            source_system: node.source_system,
            row_count: node.details.row_count,
            size: node.details.size,
            columns: node.schema_fields.clone(),
        }
    }
}

impl CatalogEntry {
    fn name(&self) -> &str {
        self.table_name.as_deref().unwrap_or(&self.id)
    }

    /// `Rows: 1,234  Size: 0.50 MB`, or None when neither was reported.
    fn volume(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(rows) = self.row_count {
            parts.push(format!("Rows: {}", thousands(rows)));
        }
        if let Some(size) = self.size {
            parts.push(format!("Size: {:.2} MB", size as f64 / (1024.0 * 1024.0)));
        }
        (!parts.is_empty()).then(|| parts.join("  "))
    }
}

/// Datasets of a catalog view
#[derive(Debug, Serialize)]
pub struct Catalog {
    pub datasets: Vec<CatalogEntry>,
}

#[derive(Serialize)]
struct ColumnRow<'a> {
    table_name: &'a str,
    layer: Layer,
    source_system: SourceSystem,
    column: &'a str,
    #[serde(rename = "type")]
    field_type: &'a str,
    description: Option<&'a str>,
}

impl Catalog {
    /// Datasets of `graph`, optionally only those in `layer`.
    pub fn collect(graph: &LineageGraph, layer: Option<Layer>) -> Self {
        let datasets = graph
            .datasets()
            .filter(|n| layer.map_or(true, |l| n.layer == l))
            .map(CatalogEntry::from)
            .collect();
        Self { datasets }
    }
}

impl Outputter for Catalog {
    fn to_table(&self, config: &OutputConfig) -> String {
        if self.datasets.is_empty() {
            return "(no datasets)".to_string();
        }

        let columns = vec![
            Column::new("Column", "name"),
            Column::new("Type", "type"),
            Column::new("Description", "description").with_max_width(50),
        ];

        let mut output = String::new();
        for entry in &self.datasets {
            output.push_str(&format!(
                "{} {} {}\n",
                layer_badge(entry.layer),
                entry.name().bold(),
                entry.id.dimmed()
            ));
            output.push_str(&format!("  Source: {}", entry.source_system));
            if let Some(volume) = entry.volume() {
                output.push_str(&format!("  {}", volume));
            }
            output.push('\n');

            if entry.columns.is_empty() {
                output.push_str(&format!("  {}\n", "No schema reported".dimmed()));
            } else {
                output.push_str(&TableOutput::format_with_columns(
                    &entry.columns,
                    &columns,
                    config,
                ));
                output.push('\n');
            }
            output.push('\n');
        }

        output.push_str(&format!("{} datasets", self.datasets.len()));
        output
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        let rows: Vec<ColumnRow> = self
            .datasets
            .iter()
            .flat_map(|entry| {
                entry.columns.iter().map(move |field| ColumnRow {
                    table_name: entry.name(),
                    layer: entry.layer,
                    source_system: entry.source_system,
                    column: &field.name,
                    field_type: &field.field_type,
                    description: field.description.as_deref(),
                })
            })
            .collect();
        let columns = vec![
            Column::new("table_name", "table_name"),
            Column::new("layer", "layer"),
            Column::new("source_system", "source_system"),
            Column::new("column", "column"),
            Column::new("type", "type"),
            Column::new("description", "description"),
        ];
        CsvOutput::format_with_columns(&rows, &columns)
    }

    fn to_tree(&self, config: &OutputConfig) -> String {
        let children: Vec<TreeNode> = self
            .datasets
            .iter()
            .map(|entry| {
                let columns = entry
                    .columns
                    .iter()
                    .map(|f| TreeNode::new(f.name.clone(), TreeKind::Column).with_suffix(f.field_type.clone()))
                    .collect();
                let node = TreeNode::new(entry.name(), TreeKind::Layer(entry.layer))
                    .with_children(columns);
                match entry.volume() {
                    Some(volume) => node.with_suffix(format!("({})", volume)),
                    None => node,
                }
            })
            .collect();
        TreeOutput::from_nodes("Catalog", &children, config)
    }
}

/// Run the catalog command
pub fn run(
    source: &EventSource,
    view: &GraphView,
    layer: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let layer = layer
        .map(|l| l.parse::<Layer>().map_err(anyhow::Error::msg))
        .transpose()?;

    let graph = view.apply(source.load_graph()?)?;
    Output::new(Catalog::collect(&graph, layer), format).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::medallion_graph;

    fn plain(format: OutputFormat) -> OutputConfig {
        OutputConfig::new(format).without_colors().without_truncation()
    }

    #[test]
    fn test_collect_all_datasets() {
        let catalog = Catalog::collect(&medallion_graph(), None);
        assert_eq!(catalog.datasets.len(), 6);
        assert_eq!(catalog.datasets[0].id, "postgres://prod:5432/public.orders");
        assert_eq!(catalog.datasets[0].columns.len(), 2);
    }

    #[test]
    fn test_collect_by_layer() {
        let catalog = Catalog::collect(&medallion_graph(), Some(Layer::Bronze));
        let names: Vec<&str> = catalog.datasets.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["bronze/orders", "bronze/users"]);
    }

    #[test]
    fn test_volume() {
        let catalog = Catalog::collect(&medallion_graph(), Some(Layer::Bronze));
        assert_eq!(
            catalog.datasets[0].volume().as_deref(),
            Some("Rows: 250,000  Size: 1.00 MB")
        );
        assert_eq!(catalog.datasets[1].volume(), None);
    }

    #[test]
    fn test_table_shows_schema() {
        colored::control::set_override(false);
        let catalog = Catalog::collect(&medallion_graph(), Some(Layer::Source));
        let table = catalog.to_table(&plain(OutputFormat::Table));

        assert!(table.starts_with("[SOURCE] orders postgres://prod:5432/public.orders"));
        assert!(table.contains("Source: PostgreSQL"));
        assert!(table.contains("DECIMAL(10,2)"));
        assert!(table.ends_with("1 datasets"));
    }

    #[test]
    fn test_csv_one_row_per_column() {
        let catalog = Catalog::collect(&medallion_graph(), None);
        let csv = catalog.to_csv(&plain(OutputFormat::Csv));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "table_name,layer,source_system,column,type,description");
        assert_eq!(lines[1], "orders,source,PostgreSQL,order_id,BIGINT,");
        assert_eq!(lines[2], "orders,source,PostgreSQL,amount,\"DECIMAL(10,2)\",");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_tree_lists_columns() {
        let catalog = Catalog::collect(&medallion_graph(), Some(Layer::Source));
        let tree = catalog.to_tree(&plain(OutputFormat::Tree));
        let lines: Vec<&str> = tree.lines().collect();

        assert_eq!(lines[0], "Catalog");
        assert_eq!(lines[1], "└── [SOURCE] orders");
        assert_eq!(lines[2], "    ├── order_id BIGINT");
        assert_eq!(lines[3], "    └── amount DECIMAL(10,2)");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::collect(&medallion_graph(), Some(Layer::Job));
        assert_eq!(catalog.to_table(&plain(OutputFormat::Table)), "(no datasets)");
    }
}
