//! The lineage graph: an insertion-ordered node collection plus a plain edge list.
//!
//! The graph is plain data. Every query here returns a filtered copy and
//! never mutates `self`; reachability lives in [`crate::engine`].

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::engine::LineageEngine;
use crate::types::{Layer, LineageEdge, LineageNode, SourceSystem};

/// Selector value meaning "every table".
pub const ALL_TABLES: &str = "All Tables";

/// Selector value meaning "every source system".
pub const ALL_SYSTEMS: &str = "All Systems";

fn is_identity_selector(selector: &str, all_value: &str) -> bool {
    selector.is_empty() || selector == "all" || selector == all_value
}

/// Whether a table selector asks for the unfiltered graph: `""`, `"all"` or
/// [`ALL_TABLES`], matched exactly.
pub fn selects_all_tables(selector: &str) -> bool {
    is_identity_selector(selector, ALL_TABLES)
}

/// Whether a system selector asks for the unfiltered graph: `""`, `"all"` or
/// [`ALL_SYSTEMS`], matched exactly.
pub fn selects_all_systems(selector: &str) -> bool {
    is_identity_selector(selector, ALL_SYSTEMS)
}

/// Directed graph of jobs and datasets derived from run events.
///
/// Nodes keep first-seen order. Edges are not deduplicated: observing the
/// same input or output twice yields two identical edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LineageGraph {
    nodes: Vec<LineageNode>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    edges: Vec<LineageEdge>,
}

impl LineageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a graph from parts, dropping repeated node ids and edges whose
    /// endpoints are missing.
    pub fn from_parts(nodes: Vec<LineageNode>, edges: Vec<LineageEdge>) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            if !graph.contains(&node.id) {
                graph.insert_node(node);
            }
        }
        for edge in edges {
            if graph.contains(&edge.source) && graph.contains(&edge.target) {
                graph.edges.push(edge);
            } else {
                tracing::debug!(
                    "Dropping dangling edge {} -> {}",
                    edge.source,
                    edge.target
                );
            }
        }
        graph
    }

    pub(crate) fn insert_node(&mut self, node: LineageNode) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut LineageNode> {
        let idx = *self.index.get(id)?;
        self.nodes.get_mut(idx)
    }

    pub(crate) fn push_edge(&mut self, source: String, target: String) {
        self.edges.push(LineageEdge { source, target });
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn node(&self, id: &str) -> Option<&LineageNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in first-seen order.
    pub fn nodes(&self) -> &[LineageNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LineageEdge] {
        &self.edges
    }

    pub fn datasets(&self) -> impl Iterator<Item = &LineageNode> {
        self.nodes.iter().filter(|n| n.is_dataset())
    }

    pub fn jobs(&self) -> impl Iterator<Item = &LineageNode> {
        self.nodes.iter().filter(|n| n.is_job())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First dataset (in first-seen order) whose table name matches.
    ///
    /// Table names are not unique: `pg/public.orders` and `mssql/dbo.orders`
    /// both display as `orders`.
    pub fn find_by_table(&self, table: &str) -> Option<&LineageNode> {
        self.datasets()
            .find(|n| n.table_name.as_deref() == Some(table))
    }

    // ------------------------------------------------------------------
    // Catalog queries
    // ------------------------------------------------------------------

    /// Distinct source systems of dataset nodes, sorted by label.
    pub fn source_systems(&self) -> Vec<SourceSystem> {
        let mut systems: Vec<SourceSystem> = self
            .datasets()
            .map(|n| n.source_system)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        systems.sort_by_key(|s| s.as_str());
        systems
    }

    /// Distinct dataset table names, sorted, optionally limited to one source system.
    pub fn table_names(&self, system: Option<SourceSystem>) -> Vec<String> {
        self.datasets()
            .filter(|n| system.map_or(true, |s| n.source_system == s))
            .filter_map(|n| n.table_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct layers of dataset nodes, in medallion order.
    pub fn layers(&self) -> Vec<Layer> {
        self.datasets()
            .map(|n| n.layer)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            datasets: self.datasets().count(),
            jobs: self.jobs().count(),
            connections: self.edges.len(),
            layers: self.layers().len(),
        }
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    /// Copy of the graph keeping the nodes `keep` accepts and the edges whose
    /// endpoints both survive.
    pub fn retain<F>(&self, mut keep: F) -> LineageGraph
    where
        F: FnMut(&LineageNode) -> bool,
    {
        let mut filtered = LineageGraph::new();
        for node in &self.nodes {
            if keep(node) {
                filtered.insert_node(node.clone());
            }
        }
        filtered.edges = self
            .edges
            .iter()
            .filter(|e| filtered.contains(&e.source) && filtered.contains(&e.target))
            .cloned()
            .collect();
        filtered
    }

    /// Restrict the graph to the lineage of one dataset table.
    ///
    /// The result holds the first dataset whose table name equals `selector`,
    /// every node with a path to it, every node reachable from it, and the
    /// edges among them. An empty selector, `all`, or [`ALL_TABLES`] returns
    /// the graph unchanged, and so does a selector matching no dataset.
    pub fn restrict(&self, selector: &str) -> LineageGraph {
        if selects_all_tables(selector) {
            return self.clone();
        }

        let target = match self.find_by_table(selector) {
            Some(node) => node.id.clone(),
            None => {
                tracing::debug!("No dataset with table name '{}', keeping full graph", selector);
                return self.clone();
            }
        };

        let engine = LineageEngine::new(self);
        let lineage = engine.lineage_of(&target);
        tracing::debug!(
            "Lineage of {} spans {} of {} nodes",
            target,
            lineage.len(),
            self.node_count()
        );

        self.retain(|n| lineage.contains(&n.id))
    }

    /// Keep every job plus the datasets of one source system.
    ///
    /// An empty selector, `all`, or [`ALL_SYSTEMS`] returns the graph
    /// unchanged. An unrecognised system label keeps only the jobs.
    pub fn filter_by_source_system(&self, system: &str) -> LineageGraph {
        if selects_all_systems(system) {
            return self.clone();
        }

        let wanted = system.parse::<SourceSystem>().ok();
        if wanted.is_none() {
            tracing::warn!("Unknown source system '{}'", system);
        }
        self.retain(|n| n.is_job() || Some(n.source_system) == wanted)
    }

    /// Dataset-only view: drop job nodes and connect each job input
    /// directly to each of that job's outputs.
    pub fn collapse_jobs(&self) -> LineageGraph {
        let mut collapsed = self.retain(|n| n.is_dataset());

        for input in &self.edges {
            if !self.is_job_id(&input.target) || self.is_job_id(&input.source) {
                continue;
            }
            for output in self.edges.iter().filter(|e| e.source == input.target) {
                if !self.is_job_id(&output.target) {
                    collapsed.push_edge(input.source.clone(), output.target.clone());
                }
            }
        }

        collapsed
    }

    fn is_job_id(&self, id: &str) -> bool {
        self.node(id).is_some_and(|n| n.is_job())
    }
}

/// Headline counts for a graph view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub datasets: usize,
    pub jobs: usize,
    pub connections: usize,
    /// Distinct dataset layers.
    pub layers: usize,
}
