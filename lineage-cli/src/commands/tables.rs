//! Tables command - List table names by source system
//!
//! The table selector of other commands takes these names.

use crate::commands::{validate_system, EventSource};
use crate::output::{
    Alignment, Column, CsvOutput, Output, OutputConfig, OutputFormat, Outputter, TableOutput,
    TreeKind, TreeNode, TreeOutput,
};
use anyhow::Result;
use lineage_core::{selects_all_systems, LineageGraph, SourceSystem};
use serde::Serialize;

/// Table names of one source system
#[derive(Debug, Serialize)]
pub struct SystemTables {
    pub system: SourceSystem,
    pub count: usize,
    pub tables: Vec<String>,
}

/// Table listing across source systems
#[derive(Debug, Serialize)]
pub struct TableListing {
    pub systems: Vec<SystemTables>,
    pub total: usize,
}

#[derive(Serialize)]
struct TableRow<'a> {
    system: SourceSystem,
    table: &'a str,
}

impl TableListing {
    /// List every system present in the graph, or just `system`.
    pub fn collect(graph: &LineageGraph, system: Option<SourceSystem>) -> Self {
        let systems: Vec<SourceSystem> = match system {
            Some(system) => vec![system],
            None => graph.source_systems(),
        };

        let systems: Vec<SystemTables> = systems
            .into_iter()
            .map(|system| {
                let tables = graph.table_names(Some(system));
                SystemTables {
                    system,
                    count: tables.len(),
                    tables,
                }
            })
            .collect();
        let total = systems.iter().map(|s| s.count).sum();

        Self { systems, total }
    }
}

impl Outputter for TableListing {
    fn to_table(&self, config: &OutputConfig) -> String {
        let columns = vec![
            Column::new("System", "system"),
            Column::new("Count", "count").with_alignment(Alignment::Right),
            Column::new("Tables", "tables").with_max_width(60),
        ];

        // Join names so the table shows them instead of an item count
        let rows: Vec<serde_json::Value> = self
            .systems
            .iter()
            .map(|s| {
                serde_json::json!({
                    "system": s.system,
                    "count": s.count,
                    "tables": s.tables.join(", "),
                })
            })
            .collect();

        format!(
            "{}\n{} tables",
            TableOutput::format_with_columns(&rows, &columns, config),
            self.total
        )
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        let rows: Vec<TableRow> = self
            .systems
            .iter()
            .flat_map(|s| {
                s.tables.iter().map(|table| TableRow {
                    system: s.system,
                    table,
                })
            })
            .collect();
        let columns = vec![Column::new("system", "system"), Column::new("table", "table")];
        CsvOutput::format_with_columns(&rows, &columns)
    }

    fn to_tree(&self, config: &OutputConfig) -> String {
        let groups: Vec<TreeNode> = self
            .systems
            .iter()
            .map(|s| {
                let tables = s
                    .tables
                    .iter()
                    .map(|t| TreeNode::new(t.clone(), TreeKind::Other))
                    .collect();
                TreeNode::new(s.system.as_str(), TreeKind::Group)
                    .with_suffix(format!("({})", s.count))
                    .with_children(tables)
            })
            .collect();
        TreeOutput::from_nodes("Source Systems", &groups, config)
    }
}

/// Run the tables command
pub fn run(source: &EventSource, system: Option<&str>, format: OutputFormat) -> Result<()> {
    let system = match system {
        Some(label) => {
            validate_system(label)?;
            if selects_all_systems(label) {
                None
            } else {
                label.parse::<SourceSystem>().ok()
            }
        }
        None => None,
    };

    let graph = source.load_graph()?;
    Output::new(TableListing::collect(&graph, system), format).render()
}
