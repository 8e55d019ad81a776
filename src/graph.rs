use std::collections::BTreeMap;

use crate::raw::RawValue;

pub type NodeId = String;
pub type AttrMap = BTreeMap<String, RawValue>;

/// The graph container mutated by the visualized algorithm. Nodes and edges
/// carry arbitrary attribute bags which stylizer property sources read.
///
/// Iteration order is deterministic (sorted by id) so transformed states and
/// frames are stable across runs. Undirected graphs normalize edge keys, so
/// `add_edge("b", "a")` and `add_edge("a", "b")` address the same edge.
#[derive(Clone, Debug, Default)]
pub struct VisualGraph {
    directed: bool,
    nodes: BTreeMap<NodeId, AttrMap>,
    edges: BTreeMap<(NodeId, NodeId), AttrMap>,
}

impl VisualGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::default()
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    fn edge_key(&self, u: impl Into<NodeId>, v: impl Into<NodeId>) -> (NodeId, NodeId) {
        let (u, v) = (u.into(), v.into());
        if !self.directed && v < u { (v, u) } else { (u, v) }
    }

    pub fn add_node(&mut self, id: impl Into<NodeId>) {
        self.nodes.entry(id.into()).or_default();
    }

    pub fn remove_node(&mut self, id: &str) {
        self.nodes.remove(id);
        self.edges.retain(|(u, v), _| u != id && v != id);
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Adds an edge, creating missing endpoints implicitly.
    pub fn add_edge(&mut self, u: impl Into<NodeId>, v: impl Into<NodeId>) {
        let key = self.edge_key(u, v);
        self.add_node(key.0.clone());
        self.add_node(key.1.clone());
        self.edges.entry(key).or_default();
    }

    pub fn remove_edge(&mut self, u: &str, v: &str) {
        let key = self.edge_key(u, v);
        self.edges.remove(&key);
    }

    pub fn has_edge(&self, u: &str, v: &str) -> bool {
        self.edges.contains_key(&self.edge_key(u, v))
    }

    pub fn set_node_attr(&mut self, id: impl Into<NodeId>, key: &str, value: impl Into<RawValue>) {
        self.nodes
            .entry(id.into())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    pub fn node_attr(&self, id: &str, key: &str) -> Option<&RawValue> {
        self.nodes.get(id)?.get(key)
    }

    pub fn set_edge_attr(
        &mut self,
        u: impl Into<NodeId>,
        v: impl Into<NodeId>,
        key: &str,
        value: impl Into<RawValue>,
    ) {
        let edge = self.edge_key(u, v);
        self.add_node(edge.0.clone());
        self.add_node(edge.1.clone());
        self.edges
            .entry(edge)
            .or_default()
            .insert(key.to_string(), value.into());
    }

    pub fn edge_attr(&self, u: &str, v: &str, key: &str) -> Option<&RawValue> {
        self.edges.get(&self.edge_key(u, v))?.get(key)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = &(NodeId, NodeId)> {
        self.edges.keys()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn neighbors(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        for (u, v) in self.edges.keys() {
            if u == id {
                out.push(v.clone());
            } else if !self.directed && v == id {
                out.push(u.clone());
            }
        }
        out.sort();
        out.dedup();
        out
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The seam between the generic stylizer and the two element families.
/// Nodes key by id; edges key by the ordered endpoint pair.
pub trait ElementKind {
    type Key: Clone + Ord + std::fmt::Debug;

    fn keys(graph: &VisualGraph) -> Vec<Self::Key>;
    fn attr(graph: &VisualGraph, key: &Self::Key, prop: &str) -> Option<RawValue>;

    /// The string form used as a JSON style-map key.
    fn key_string(key: &Self::Key) -> String;
}

pub struct Nodes;

impl ElementKind for Nodes {
    type Key = NodeId;

    fn keys(graph: &VisualGraph) -> Vec<NodeId> {
        graph.node_ids().cloned().collect()
    }

    fn attr(graph: &VisualGraph, key: &NodeId, prop: &str) -> Option<RawValue> {
        graph.node_attr(key, prop).cloned()
    }

    fn key_string(key: &NodeId) -> String {
        key.clone()
    }
}

pub struct Edges;

impl ElementKind for Edges {
    type Key = (NodeId, NodeId);

    fn keys(graph: &VisualGraph) -> Vec<(NodeId, NodeId)> {
        graph.edge_ids().cloned().collect()
    }

    fn attr(graph: &VisualGraph, key: &(NodeId, NodeId), prop: &str) -> Option<RawValue> {
        graph.edge_attr(&key.0, &key.1, prop).cloned()
    }

    fn key_string(key: &(NodeId, NodeId)) -> String {
        format!("{}->{}", key.0, key.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undirected_edges_normalize_endpoints() {
        let mut g = VisualGraph::new();
        g.add_edge("b", "a");
        assert!(g.has_edge("a", "b"));
        assert!(g.has_edge("b", "a"));
        assert_eq!(g.edge_count(), 1);

        let mut d = VisualGraph::directed();
        d.add_edge("b", "a");
        assert!(d.has_edge("b", "a"));
        assert!(!d.has_edge("a", "b"));
    }

    #[test]
    fn removing_a_node_drops_incident_edges() {
        let mut g = VisualGraph::new();
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        g.remove_node("b");
        assert_eq!(g.edge_count(), 0);
        assert!(g.has_node("a") && g.has_node("c"));
    }

    #[test]
    fn attrs_round_trip() {
        let mut g = VisualGraph::new();
        g.set_node_attr("a", "layer", 2i64);
        g.set_edge_attr("a", "b", "weight", 1.5);
        assert_eq!(g.node_attr("a", "layer"), Some(&RawValue::Int(2)));
        assert_eq!(g.edge_attr("b", "a", "weight"), Some(&RawValue::Float(1.5)));
        assert_eq!(g.node_attr("a", "missing"), None);
    }

    #[test]
    fn neighbors_respect_direction() {
        let mut g = VisualGraph::new();
        g.add_edge("a", "b");
        g.add_edge("c", "a");
        assert_eq!(g.neighbors("a"), vec!["b".to_string(), "c".to_string()]);

        let mut d = VisualGraph::directed();
        d.add_edge("a", "b");
        d.add_edge("c", "a");
        assert_eq!(d.neighbors("a"), vec!["b".to_string()]);
    }

    #[test]
    fn edge_key_strings_are_arrowed() {
        let key = ("a".to_string(), "b".to_string());
        assert_eq!(Edges::key_string(&key), "a->b");
    }
}
