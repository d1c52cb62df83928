//! Lineage Core - OpenLineage run events in, lineage graphs out.
//!
//! This crate turns a flat list of OpenLineage-style run events into a
//! directed graph of jobs and datasets, classifies datasets into medallion
//! layers, and answers "what feeds this table, and what does it feed?"
//!
//! # Features
//!
//! - **Extraction**: one pass over the events, merging repeated observations
//! - **Classification**: medallion layer, source system and table name per dataset
//! - **Subgraphs**: ancestor/descendant restriction, source-system filter, job-less view
//! - **Loading**: JSON envelope, bare array or JSON Lines; latest COMPLETE run per job
//! - **Rendering**: JSON, Mermaid and Graphviz DOT adapters
//!
//! # Usage
//!
//! ```no_run
//! use lineage_core::{extract, latest_complete_per_job, load_events};
//!
//! let events = latest_complete_per_job(load_events("events.json")?);
//! let graph = extract(&events);
//! let orders = graph.restrict("orders");
//! println!("{} nodes upstream or downstream of orders", orders.node_count());
//! # Ok::<(), lineage_core::LineageError>(())
//! ```

pub mod builder;
pub mod classify;
pub mod engine;
pub mod error;
pub mod graph;
pub mod loader;
pub mod render;
pub mod types;

pub use builder::{dataset_node_id, extract, job_node_id, GraphBuilder};
pub use classify::{determine_layer, extract_source_system, get_source_table_name};
pub use engine::LineageEngine;
pub use error::{LineageError, Result};
pub use graph::{
    selects_all_systems, selects_all_tables, GraphStats, LineageGraph, ALL_SYSTEMS, ALL_TABLES,
};
pub use loader::{latest_complete_per_job, load_events, parse_event_time, parse_events};
pub use render::{tooltip, DotRenderer, GraphRenderer, JsonRenderer, MermaidRenderer, RenderFormat};
pub use types::{
    DatasetRef, Event, Layer, LineageEdge, LineageNode, NodeDetails, NodeKind, SchemaField,
    SourceSystem,
};
