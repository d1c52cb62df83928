//! Graph extraction: folds a stream of run events into a [`LineageGraph`].
//!
//! One pass, in input order. Jobs are recorded as first seen. Datasets are
//! classified once, at creation; later observations only fill in an empty
//! schema and refresh output statistics.

use crate::classify::{determine_layer, extract_source_system, get_source_table_name};
use crate::graph::LineageGraph;
use crate::types::{
    DatasetRef, Event, Layer, LineageNode, NodeDetails, NodeKind, SourceSystem,
};

/// Node id of a job.
pub fn job_node_id(job_name: &str) -> String {
    format!("job_{}", job_name)
}

/// Node id of a dataset: `namespace/name`.
pub fn dataset_node_id(namespace: &str, name: &str) -> String {
    format!("{}/{}", namespace, name)
}

/// Build a lineage graph from events. Never fails; an empty input yields an
/// empty graph.
pub fn extract<'a, I>(events: I) -> LineageGraph
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut builder = GraphBuilder::new();
    for event in events {
        builder.observe(event);
    }
    builder.finish()
}

/// Which side of a job a dataset was observed on.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Input,
    Output,
}

/// Incremental accumulator behind [`extract`].
#[derive(Default)]
pub struct GraphBuilder {
    graph: LineageGraph,
    events: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the graph.
    pub fn observe(&mut self, event: &Event) {
        self.events += 1;

        let job_id = job_node_id(event.job_name());
        if !self.graph.contains(&job_id) {
            tracing::debug!("New job node {}", job_id);
            self.graph.insert_node(job_node(&job_id, event));
        }

        for input in &event.inputs {
            let dataset_id = self.merge_dataset(input, Role::Input);
            self.graph.push_edge(dataset_id, job_id.clone());
        }

        for output in &event.outputs {
            let dataset_id = self.merge_dataset(output, Role::Output);
            self.graph.push_edge(job_id.clone(), dataset_id);
        }
    }

    /// Finish the build and hand back the graph.
    pub fn finish(self) -> LineageGraph {
        let stats = self.graph.stats();
        tracing::info!(
            "Built lineage graph from {} events: {} datasets, {} jobs, {} connections",
            self.events,
            stats.datasets,
            stats.jobs,
            stats.connections
        );
        self.graph
    }

    /// Create or update the dataset node for `dataset` and return its id.
    fn merge_dataset(&mut self, dataset: &DatasetRef, role: Role) -> String {
        let id = dataset_node_id(dataset.namespace(), dataset.name());
        let schema = dataset.schema_fields();
        let stats = match role {
            Role::Output => dataset.output_statistics().copied(),
            Role::Input => None,
        };

        match self.graph.node_mut(&id) {
            Some(node) => {
                if node.schema_fields.is_empty() && !schema.is_empty() {
                    tracing::debug!("Adopting {} schema fields for {}", schema.len(), id);
                    node.schema_fields = schema.to_vec();
                }
                if role == Role::Output {
                    let stats = stats.unwrap_or_default();
                    node.details.row_count = stats.row_count.or(node.details.row_count);
                    node.details.size = stats.size.or(node.details.size);
                }
            }
            None => {
                let mut node = dataset_node(&id, dataset);
                if let Some(stats) = stats {
                    node.details.row_count = stats.row_count;
                    node.details.size = stats.size;
                }
                tracing::debug!(
                    "New dataset node {} (layer={}, source={})",
                    id,
                    node.layer,
                    node.source_system
                );
                self.graph.insert_node(node);
            }
        }

        id
    }
}

fn job_node(id: &str, event: &Event) -> LineageNode {
    LineageNode {
        id: id.to_string(),
        kind: NodeKind::Job,
        label: event.job_name().to_string(),
        layer: Layer::Job,
        source_system: SourceSystem::Databricks,
        table_name: None,
        schema_fields: Vec::new(),
        details: NodeDetails {
            namespace: event.job_namespace().to_string(),
            event_time: Some(event.event_time().to_string()),
            ..Default::default()
        },
    }
}

fn dataset_node(id: &str, dataset: &DatasetRef) -> LineageNode {
    let namespace = dataset.namespace();
    let name = dataset.name();

    LineageNode {
        id: id.to_string(),
        kind: NodeKind::Dataset,
        label: name.to_string(),
        layer: determine_layer(name),
        source_system: extract_source_system(namespace),
        table_name: Some(get_source_table_name(namespace, name)),
        schema_fields: dataset.schema_fields().to_vec(),
        details: NodeDetails {
            namespace: namespace.to_string(),
            full_name: Some(id.to_string()),
            ..Default::default()
        },
    }
}
