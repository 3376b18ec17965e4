use crate::colored::ColoredGraph;
use crate::permutation::*;

/// A pair of permutations (of nodes and of hyperedges) carrying one colored graph onto
/// another while preserving every label.
#[derive(Clone, PartialEq, Debug)]
pub struct Isomorphism {
    nodes: Permutation,
    edges: Permutation,
}

impl Isomorphism {
    pub fn identity(num_nodes: usize, num_edges: usize) -> Self {
        Self {
            nodes: Permutation::identity(num_nodes),
            edges: Permutation::identity(num_edges),
        }
    }

    /// Complete a node permutation `f -> g` with the matching edge permutation. `None` when
    /// `nodes` does not carry the labelled edges of `f` exactly onto those of `g`.
    pub fn from_node_map(
        f: &ColoredGraph,
        g: &ColoredGraph,
        nodes: Permutation,
    ) -> Option<Isomorphism> {
        if nodes.len() != f.num_vertices()
            || f.num_vertices() != g.num_vertices()
            || f.num_edges() != g.num_edges()
        {
            return None;
        }

        let g_edges: Vec<_> = g.labelled_edges().collect();
        let mut used = vec![false; g_edges.len()];
        let mut edges = Vec::with_capacity(g_edges.len());

        for (u, v, label) in f.labelled_edges() {
            let (x, y) = (nodes[u], nodes[v]);
            let j = g_edges.iter().enumerate().position(|(j, &(a, b, l))| {
                !used[j] && l == label && ((a, b) == (x, y) || (a, b) == (y, x))
            })?;
            used[j] = true;
            edges.push(j);
        }

        let edges = Permutation::new(edges)?;
        Some(Isomorphism { nodes, edges })
    }

    pub fn nodes(&self) -> &Permutation {
        &self.nodes
    }

    pub fn edges(&self) -> &Permutation {
        &self.edges
    }

    /// The image of `f`: node `i` becomes `nodes[i]`, hyperedge `e` is moved to position
    /// `edges[e]`.
    pub fn apply(&self, f: &ColoredGraph) -> ColoredGraph {
        let mut image = vec![None; f.num_edges()];
        for (e, (u, v, label)) in f.labelled_edges().enumerate() {
            if let Some(slot) = self.edges.get(e).and_then(|&at| image.get_mut(at)) {
                *slot = Some((self.nodes[u], self.nodes[v], label));
            }
        }
        ColoredGraph::from_labelled_edges(f.num_vertices(), image.into_iter().flatten())
    }
}

/// Count automorphisms by trying every node permutation. Only usable for a handful of
/// vertices; serves as a reference for the oracles.
pub fn count_automorphisms_exhaustive(g: &ColoredGraph) -> u128 {
    Permutation::all(g.num_vertices())
        .filter(|p| Isomorphism::from_node_map(g, g, p.clone()).is_some())
        .count() as u128
}
