//! Command implementations for the lineage CLI
//!
//! Each command module provides a `run` function that executes the command logic.
//! Shared here: reading the event file and narrowing the graph to a view.

pub mod catalog;
pub mod completions;
pub mod export;
pub mod graph;
pub mod show;
pub mod tables;

use anyhow::{Context, Result};
use lineage_core::{
    extract, latest_complete_per_job, load_events, selects_all_systems, selects_all_tables, Layer,
    LineageGraph, LineageNode, NodeKind, SourceSystem,
};
use serde::Serialize;
use std::path::PathBuf;

/// Where events come from, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct EventSource {
    pub path: PathBuf,
    /// Keep only the most recent COMPLETE event of each job.
    pub latest_only: bool,
}

impl EventSource {
    /// Load the events and build the full lineage graph.
    pub fn load_graph(&self) -> Result<LineageGraph> {
        let events = load_events(&self.path)
            .with_context(|| format!("Failed to load events from {}", self.path.display()))?;

        let total = events.len();
        let events = if self.latest_only {
            latest_complete_per_job(events)
        } else {
            events
        };
        tracing::debug!("Building graph from {} of {} events", events.len(), total);

        Ok(extract(&events))
    }
}

/// Which part of the graph a command looks at.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    pub system: Option<String>,
    pub table: Option<String>,
    pub show_jobs: bool,
}

impl GraphView {
    /// Source-system filter first, then table lineage, then the job-less view.
    pub fn apply(&self, graph: LineageGraph) -> Result<LineageGraph> {
        let graph = match self.system.as_deref() {
            Some(system) => {
                validate_system(system)?;
                graph.filter_by_source_system(system)
            }
            None => graph,
        };

        let graph = match self.table.as_deref() {
            Some(table) => {
                if is_missing_table(&graph, table) {
                    tracing::warn!("No dataset with table name '{}', showing the full graph", table);
                }
                graph.restrict(table)
            }
            None => graph,
        };

        Ok(if self.show_jobs {
            graph
        } else {
            graph.collapse_jobs()
        })
    }
}

/// A table selector that names no dataset and is not an identity selector.
fn is_missing_table(graph: &LineageGraph, table: &str) -> bool {
    !selects_all_tables(table) && graph.find_by_table(table).is_none()
}

/// Reject source-system names no dataset could ever carry.
pub fn validate_system(system: &str) -> Result<()> {
    if selects_all_systems(system) || system.parse::<SourceSystem>().is_ok() {
        return Ok(());
    }
    let known: Vec<&str> = SourceSystem::ALL.iter().map(|s| s.as_str()).collect();
    anyhow::bail!(
        "Unknown source system '{}'. Known systems: {}",
        system,
        known.join(", ")
    )
}

/// Flat, serializable view of a node for command output.
#[derive(Debug, Clone, Serialize)]
pub struct NodeRow {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub layer: Layer,
    pub source_system: SourceSystem,
    pub table_name: Option<String>,
    pub row_count: Option<u64>,
    pub size: Option<u64>,
}

impl From<&LineageNode> for NodeRow {
    fn from(node: &LineageNode) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind,
            label: node.label.clone(),
            layer: node.layer,
            source_system: node.source_system,
            table_name: node.table_name.clone(),
            row_count: node.details.row_count,
            size: node.details.size,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lineage_core::{DatasetRef, Event, LineageGraph, SchemaField};

    /// postgres -> bronze -> silver -> gold, plus a Mongo feed into bronze.
    pub fn medallion_events() -> Vec<Event> {
        vec![
            Event::new("lake", "ingest_orders")
                .at("2024-03-01T10:00:00Z")
                .with_input(DatasetRef::new("postgres://prod:5432", "public.orders").with_schema(
                    vec![
                        SchemaField::new("order_id", "BIGINT"),
                        SchemaField::new("amount", "DECIMAL(10,2)"),
                    ],
                ))
                .with_output(
                    DatasetRef::new("s3://lake", "bronze/orders")
                        .with_statistics(Some(250000), Some(1048576)),
                ),
            Event::new("lake", "ingest_users")
                .at("2024-03-01T10:05:00Z")
                .with_input(DatasetRef::new("mongodb://app", "app.users"))
                .with_output(DatasetRef::new("s3://lake", "bronze/users")),
            Event::new("lake", "curate_orders")
                .at("2024-03-01T11:00:00Z")
                .with_input(DatasetRef::new("s3://lake", "bronze/orders"))
                .with_output(DatasetRef::new("s3://lake", "silver/orders")),
            Event::new("lake", "revenue")
                .at("2024-03-01T12:00:00Z")
                .with_input(DatasetRef::new("s3://lake", "silver/orders"))
                .with_output(DatasetRef::new("s3://lake", "gold/revenue")),
        ]
    }

    pub fn medallion_graph() -> LineageGraph {
        lineage_core::extract(&medallion_events())
    }
}
