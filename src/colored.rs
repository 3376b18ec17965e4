//! Colored graphs as labelled hypergraphs.
//!
//! Every vertex of the underlying graph becomes a node. Its color is recorded as a self-loop
//! hyperedge labelled [`EdgeLabel::Color`], and every original edge becomes a hyperedge
//! labelled [`EdgeLabel::Structural`] (or [`EdgeLabel::Degree`] for degree-weighted fixed-locus
//! graphs). The label variants are distinct, so color and structure can never be confused.
use open_hypergraphs::lax::{Hyperedge, Hypergraph, NodeId};

use crate::coloring::{Color, Coloring};
use crate::graph::Graph;

/// Hyperedge labels of a [`ColoredGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeLabel {
    /// An edge of the original graph.
    Structural,
    /// An edge of the original graph carrying a degree.
    Degree(u32),
    /// The self-loop carrying a vertex color.
    Color(Color),
}

impl EdgeLabel {
    pub fn is_color(&self) -> bool {
        matches!(self, EdgeLabel::Color(_))
    }
}

/// A graph together with its loop-encoded vertex colors.
#[derive(Clone, Debug)]
pub struct ColoredGraph {
    hypergraph: Hypergraph<(), EdgeLabel>,
}

impl ColoredGraph {
    fn with_vertices(vertices: usize) -> Self {
        let mut hypergraph: Hypergraph<(), EdgeLabel> = Hypergraph::empty();
        hypergraph.nodes = vec![(); vertices];
        ColoredGraph { hypergraph }
    }

    fn add_edge(&mut self, u: usize, v: usize, label: EdgeLabel) {
        let interface = Hyperedge {
            sources: vec![NodeId(u)],
            targets: vec![NodeId(v)],
        };
        self.hypergraph.edges.push(label);
        self.hypergraph.adjacency.push(interface);
    }

    /// Build from `(endpoint, endpoint, label)` triples; `u == v` is a loop.
    pub fn from_labelled_edges(
        vertices: usize,
        edges: impl IntoIterator<Item = (usize, usize, EdgeLabel)>,
    ) -> Self {
        let mut colored = Self::with_vertices(vertices);
        for (u, v, label) in edges {
            colored.add_edge(u, v, label);
        }
        colored
    }

    pub fn hypergraph(&self) -> &Hypergraph<(), EdgeLabel> {
        &self.hypergraph
    }

    pub fn num_vertices(&self) -> usize {
        self.hypergraph.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.hypergraph.edges.len()
    }

    /// Every hyperedge as `(endpoint, endpoint, label)`, loops included.
    pub fn labelled_edges(&self) -> impl Iterator<Item = (usize, usize, EdgeLabel)> + '_ {
        self.hypergraph
            .adjacency
            .iter()
            .zip(self.hypergraph.edges.iter())
            .map(|(Hyperedge { sources, targets }, label)| {
                let u = sources.first().or(targets.first()).map_or(0, |n| n.0);
                let v = targets.first().or(sources.first()).map_or(0, |n| n.0);
                (u, v, *label)
            })
    }

    /// Sorted loop labels of every vertex.
    pub fn loop_labels(&self) -> Vec<Vec<EdgeLabel>> {
        let mut loops = vec![Vec::new(); self.num_vertices()];
        for (u, v, label) in self.labelled_edges() {
            if let Some(labels) = loops.get_mut(u).filter(|_| u == v) {
                labels.push(label);
            }
        }
        for labels in &mut loops {
            labels.sort_unstable();
        }
        loops
    }

    /// Non-loop neighbours of every vertex, with the connecting label.
    pub fn neighbours(&self) -> Vec<Vec<(usize, EdgeLabel)>> {
        let mut neighbours = vec![Vec::new(); self.num_vertices()];
        for (u, v, label) in self.labelled_edges() {
            if u != v && u < neighbours.len() && v < neighbours.len() {
                neighbours[u].push((v, label));
                neighbours[v].push((u, label));
            }
        }
        for list in &mut neighbours {
            list.sort_unstable();
        }
        neighbours
    }

    /// Whether every hyperedge is binary with endpoints in range.
    pub fn is_well_formed(&self) -> bool {
        let n = self.num_vertices();
        self.hypergraph
            .adjacency
            .iter()
            .all(|e| e.sources.len() == 1 && e.targets.len() == 1)
            && self.labelled_edges().all(|(u, v, _)| u < n && v < n)
    }
}

/// Loop-encode a coloring. An empty coloring on a non-empty graph encodes the uncolored
/// graph.
pub fn encode(graph: &Graph, coloring: &Coloring) -> ColoredGraph {
    let mut colored = structure(graph, |_| EdgeLabel::Structural);
    add_color_loops(&mut colored, coloring);
    colored
}

/// The graph with only structural edges and no color loops.
pub fn encode_uncolored(graph: &Graph) -> ColoredGraph {
    structure(graph, |_| EdgeLabel::Structural)
}

/// Loop-encode a coloring of a graph whose edges carry degrees. `degrees[i]` belongs to
/// `graph.edges()[i]`.
pub fn encode_weighted(graph: &Graph, coloring: &Coloring, degrees: &[u32]) -> ColoredGraph {
    let mut colored = structure(graph, |i| {
        degrees
            .get(i)
            .copied()
            .map_or(EdgeLabel::Structural, EdgeLabel::Degree)
    });
    add_color_loops(&mut colored, coloring);
    colored
}

fn structure(graph: &Graph, label: impl Fn(usize) -> EdgeLabel) -> ColoredGraph {
    let mut colored = ColoredGraph::with_vertices(graph.num_vertices());
    for (i, &(u, v)) in graph.edges().iter().enumerate() {
        colored.add_edge(u, v, label(i));
    }
    colored
}

fn add_color_loops(colored: &mut ColoredGraph, coloring: &Coloring) {
    for (vertex, &color) in coloring.as_slice().iter().enumerate() {
        colored.add_edge(vertex, vertex, EdgeLabel::Color(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_adds_one_loop_per_vertex() {
        let graph = Graph::path(3);
        let colored = encode(&graph, &Coloring::new([1, 0, 1]));

        assert_eq!(colored.num_vertices(), 3);
        assert_eq!(colored.num_edges(), 2 + 3);
        assert!(colored.is_well_formed());
        assert_eq!(
            colored.loop_labels(),
            vec![
                vec![EdgeLabel::Color(1)],
                vec![EdgeLabel::Color(0)],
                vec![EdgeLabel::Color(1)],
            ]
        );
    }

    #[test]
    fn test_structural_and_color_labels_never_meet() {
        let graph = Graph::star(4);
        let colored = encode(&graph, &Coloring::new([0, 0, 1, 2]));

        for (u, v, label) in colored.labelled_edges() {
            assert_eq!(u == v, label.is_color(), "edge ({u}, {v}) labelled {label:?}");
        }
    }

    #[test]
    fn test_encode_uncolored_has_no_loops() {
        let colored = encode_uncolored(&Graph::path(4));
        assert!(colored.loop_labels().iter().all(Vec::is_empty));
        assert_eq!(colored.num_edges(), 3);
    }

    #[test]
    fn test_encode_weighted_labels_edges_with_degrees() {
        let graph = Graph::path(3);
        let colored = encode_weighted(&graph, &Coloring::new([0, 1, 0]), &[2, 1]);

        assert_eq!(
            colored.neighbours()[1],
            vec![(0, EdgeLabel::Degree(2)), (2, EdgeLabel::Degree(1))]
        );
    }
}
