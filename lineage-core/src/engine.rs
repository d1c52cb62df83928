//! Reachability over a lineage graph, powered by petgraph.
//!
//! [`LineageEngine`] loads a [`LineageGraph`] into an in-memory petgraph
//! `DiGraph` and answers upstream/downstream questions with breadth-first
//! traversals.
//!
//! ```text
//! Vec<Event> -> extract() -> LineageGraph -> LineageEngine -> ancestors / descendants
//! ```
//!
//! - **Ancestors**: every node with a path *to* the start node (incoming BFS)
//! - **Descendants**: every node reachable *from* the start node (outgoing BFS)
//! - **Cycles**: strongly connected components with more than one node
//!
//! All traversals are O(V + E) and terminate on cyclic graphs.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::LineageGraph;

/// Directed reachability view over a [`LineageGraph`].
///
/// Node weights are lineage node ids. Duplicate lineage edges become parallel
/// petgraph edges, which traversal simply revisits and skips.
pub struct LineageEngine {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl LineageEngine {
    /// Build the engine from every node and edge of `lineage`.
    pub fn new(lineage: &LineageGraph) -> Self {
        let mut graph = DiGraph::with_capacity(lineage.node_count(), lineage.edge_count());
        let mut node_map = HashMap::with_capacity(lineage.node_count());

        for node in lineage.nodes() {
            let idx = graph.add_node(node.id.clone());
            node_map.insert(node.id.clone(), idx);
        }

        // Skip edges whose endpoints are unknown
        for edge in lineage.edges() {
            if let (Some(&s), Some(&t)) = (node_map.get(&edge.source), node_map.get(&edge.target)) {
                graph.add_edge(s, t, ());
            }
        }

        Self { graph, node_map }
    }

    /// Nodes with a path to `node_id`, nearest first. Excludes `node_id` itself
    /// unless it sits on a cycle.
    pub fn ancestors(&self, node_id: &str) -> Vec<String> {
        self.traverse_bfs(node_id, Direction::Incoming)
    }

    /// Nodes reachable from `node_id`, nearest first. Excludes `node_id` itself
    /// unless it sits on a cycle.
    pub fn descendants(&self, node_id: &str) -> Vec<String> {
        self.traverse_bfs(node_id, Direction::Outgoing)
    }

    /// `{node_id} ∪ ancestors ∪ descendants`. Empty when `node_id` is unknown.
    pub fn lineage_of(&self, node_id: &str) -> HashSet<String> {
        if !self.has_node(node_id) {
            return HashSet::new();
        }

        let mut lineage: HashSet<String> = HashSet::new();
        lineage.insert(node_id.to_string());
        lineage.extend(self.ancestors(node_id));
        lineage.extend(self.descendants(node_id));
        lineage
    }

    /// Groups of nodes that feed each other, e.g. two jobs writing each
    /// other's inputs.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| scc.into_iter().map(|idx| self.graph[idx].clone()).collect())
            .collect()
    }

    pub fn has_node(&self, node_id: &str) -> bool {
        self.node_map.contains_key(node_id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn traverse_bfs(&self, node_id: &str, direction: Direction) -> Vec<String> {
        let start = match self.node_map.get(node_id) {
            Some(&idx) => idx,
            None => return vec![],
        };

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut result = Vec::new();
        let mut queue = VecDeque::new();

        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for edge in self.graph.edges_directed(current, direction) {
                let neighbor = if direction == Direction::Outgoing {
                    edge.target()
                } else {
                    edge.source()
                };

                if visited.insert(neighbor) {
                    result.push(self.graph[neighbor].clone());
                    queue.push_back(neighbor);
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LineageEdge, LineageNode, Layer, NodeDetails, NodeKind, SourceSystem};

    fn node(id: &str) -> LineageNode {
        LineageNode {
            id: id.to_string(),
            kind: NodeKind::Dataset,
            label: id.to_string(),
            layer: Layer::Unknown,
            source_system: SourceSystem::Unknown,
            table_name: Some(id.to_string()),
            schema_fields: vec![],
            details: NodeDetails::default(),
        }
    }

    fn create_test_engine() -> LineageEngine {
        // a -> b -> c -> a (cycle), b -> d, e isolated
        let nodes = ["a", "b", "c", "d", "e"].map(node).to_vec();
        let edges = vec![
            LineageEdge::new("a", "b"),
            LineageEdge::new("b", "c"),
            LineageEdge::new("c", "a"),
            LineageEdge::new("b", "d"),
        ];
        LineageEngine::new(&LineageGraph::from_parts(nodes, edges))
    }

    #[test]
    fn test_descendants() {
        let engine = create_test_engine();
        let descendants = engine.descendants("b");
        assert_eq!(descendants.len(), 4);
        // Direct neighbours come first
        assert!(descendants[..2].contains(&"c".to_string()));
        assert!(descendants[..2].contains(&"d".to_string()));
        // Cycle leads back to b through a
        assert!(descendants.contains(&"a".to_string()));
        assert!(descendants.contains(&"b".to_string()));
    }

    #[test]
    fn test_ancestors() {
        let engine = create_test_engine();
        let ancestors = engine.ancestors("d");
        assert_eq!(ancestors[0], "b");
        assert!(ancestors.contains(&"a".to_string()));
        assert!(ancestors.contains(&"c".to_string()));
        assert!(!ancestors.contains(&"d".to_string()));
    }

    #[test]
    fn test_lineage_of() {
        let engine = create_test_engine();

        let lineage = engine.lineage_of("d");
        assert_eq!(lineage.len(), 4);
        assert!(!lineage.contains("e"));

        let isolated = engine.lineage_of("e");
        assert_eq!(isolated, HashSet::from(["e".to_string()]));

        assert!(engine.lineage_of("missing").is_empty());
    }

    #[test]
    fn test_find_cycles() {
        let engine = create_test_engine();
        let cycles = engine.find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);
        assert!(!cycles[0].contains(&"d".to_string()));
    }

    #[test]
    fn test_parallel_edges() {
        let nodes = ["x", "y"].map(node).to_vec();
        let edges = vec![LineageEdge::new("x", "y"), LineageEdge::new("x", "y")];
        let engine = LineageEngine::new(&LineageGraph::from_parts(nodes, edges));

        assert_eq!(engine.edge_count(), 2);
        assert_eq!(engine.descendants("x"), vec!["y".to_string()]);
        assert_eq!(engine.ancestors("y"), vec!["x".to_string()]);
        assert!(engine.find_cycles().is_empty());
    }

    #[test]
    fn test_counts() {
        let engine = create_test_engine();
        assert_eq!(engine.node_count(), 5);
        assert_eq!(engine.edge_count(), 4);
        assert!(engine.has_node("e"));
        assert!(!engine.has_node("z"));
    }
}
