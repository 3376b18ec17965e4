//! Backtracking search for an isomorphism between two colored graphs.
//!
//! Used by the standalone comparison helpers and to cross-check canonical forms; the
//! partitioner itself only compares canonical forms.
use open_hypergraphs::lax::NodeId;
use std::collections::HashMap;

use crate::colored::{ColoredGraph, EdgeLabel};
use crate::{Isomorphism, Permutation};

#[derive(Debug, PartialEq)]
pub enum Error {
    /// A nogood check failed
    Nogood,
    /// No node of g has the loop labels and incident edge labels of this f node
    Unsatisfiable(NodeId),
    /// Every candidate assignment was exhausted
    NoIsomorphism,

    InvalidNodePermutation,
    InvalidEdgePermutation,
}

/// Pseudocode:
///
/// ```text
/// // Candidate g nodes for each f node, from loop labels and incident edge labels
/// let domains: Vec<Vec<NodeId>> = signatures(f, g)?;
///
/// // Assign f nodes in order, backtracking on the first inconsistency
/// while let Some(f_node) = next_unassigned() {
///   for g_node in domains[f_node] {
///     if unused(g_node) && same_edges_to_assigned(f_node, g_node) {
///       assign(f_node, g_node);
///     }
///   }
/// }
/// ```
pub fn find_isomorphism(f: &ColoredGraph, g: &ColoredGraph) -> Result<Isomorphism, Error> {
    let state = SearchState::new(f, g)?;
    let node_mapping = state.find_isomorphism()?;

    let nodes = Permutation::new(node_mapping.into_iter().map(|x| x.0));
    let nodes = nodes.ok_or(Error::InvalidNodePermutation)?;

    Isomorphism::from_node_map(f, g, nodes).ok_or(Error::InvalidEdgePermutation)
}

/// Indexes for a pair of colored graphs
struct SearchState {
    f_index: Index,
    g_index: Index,
    // candidate g nodes per f node, ascending
    domains: Vec<Vec<NodeId>>,
}

impl SearchState {
    pub fn new(f: &ColoredGraph, g: &ColoredGraph) -> Result<SearchState, Error> {
        // Run fast nogood checks
        crate::nogood::nogood(f, g).ok_or(Error::Nogood)?;

        let f_index = Index::new(f);
        let g_index = Index::new(g);

        let mut domains = Vec::with_capacity(f.num_vertices());
        for f_node in 0..f.num_vertices() {
            let candidates: Vec<NodeId> = (0..g.num_vertices())
                .filter(|&g_node| g_index.signature[g_node] == f_index.signature[f_node])
                .map(NodeId)
                .collect();
            if candidates.is_empty() {
                return Err(Error::Unsatisfiable(NodeId(f_node)));
            }
            domains.push(candidates);
        }

        Ok(SearchState {
            f_index,
            g_index,
            domains,
        })
    }

    fn find_isomorphism(&self) -> Result<Vec<NodeId>, Error> {
        let n = self.domains.len();

        // The partial map f -> g, and which g nodes it already hits.
        let mut node_mapping: Vec<NodeId> = Vec::with_capacity(n);
        let mut used = vec![false; n];

        // "stack" holds, per assigned f node, the position in its domain to resume from on
        // backtrack.
        let mut stack: Vec<usize> = vec![0];

        while let Some(resume) = stack.pop() {
            let f_node = node_mapping.len();
            if f_node == n {
                return Ok(node_mapping);
            }

            let domain = &self.domains[f_node];
            let found = (resume..domain.len()).find(|&i| {
                let g_node = domain[i].0;
                !used[g_node] && self.consistent(&node_mapping, f_node, g_node)
            });

            match found {
                Some(i) => {
                    let g_node = domain[i].0;
                    used[g_node] = true;
                    node_mapping.push(NodeId(g_node));
                    stack.push(i + 1);
                    stack.push(0);
                }
                None => {
                    // undo the previous assignment and resume after it
                    if let Some(previous) = node_mapping.pop() {
                        used[previous.0] = false;
                    } else {
                        return Err(Error::NoIsomorphism);
                    }
                }
            }
        }

        Err(Error::NoIsomorphism)
    }

    /// The edges between `f_node` and every already-assigned f node must match those between
    /// the proposed `g_node` and their images.
    fn consistent(&self, node_mapping: &[NodeId], f_node: usize, g_node: usize) -> bool {
        node_mapping.iter().enumerate().all(|(f_other, g_other)| {
            self.f_index.between(f_other, f_node) == self.g_index.between(g_other.0, g_node)
        })
    }
}

////////////////////////////////////////////////////////////////////////////////
// Indexes used during search

struct Index {
    // (loop labels, incident edge labels), both sorted
    signature: Vec<(Vec<EdgeLabel>, Vec<EdgeLabel>)>,
    // sorted labels of the edges between an unordered pair of distinct nodes
    between: HashMap<(usize, usize), Vec<EdgeLabel>>,
}

impl Index {
    fn new(graph: &ColoredGraph) -> Self {
        let loops = graph.loop_labels();
        let neighbours = graph.neighbours();

        let signature = loops
            .into_iter()
            .zip(neighbours)
            .map(|(loops, around)| {
                let mut labels: Vec<EdgeLabel> = around.into_iter().map(|(_, l)| l).collect();
                labels.sort_unstable();
                (loops, labels)
            })
            .collect();

        let mut between: HashMap<(usize, usize), Vec<EdgeLabel>> = HashMap::new();
        for (u, v, label) in graph.labelled_edges() {
            if u != v {
                between.entry((u.min(v), u.max(v))).or_default().push(label);
            }
        }
        for labels in between.values_mut() {
            labels.sort_unstable();
        }

        Index { signature, between }
    }

    fn between(&self, u: usize, v: usize) -> Option<&Vec<EdgeLabel>> {
        self.between.get(&(u.min(v), u.max(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::Coloring;
    use crate::colored::encode;
    use crate::graph::Graph;

    /// colored graphs should be isomorphic to themselves
    #[test]
    fn test_find_identity_isomorphism() {
        let graphs = [
            ("empty", encode(&Graph::empty(), &Coloring::empty())),
            ("vertex", encode(&Graph::path(1), &Coloring::new([0]))),
            ("edge", encode(&Graph::path(2), &Coloring::new([0, 1]))),
            ("path", encode(&Graph::path(4), &Coloring::new([0, 1, 2, 3]))),
        ];

        for (name, graph) in graphs {
            println!("testing {name}");
            let expected = Isomorphism::identity(graph.num_vertices(), graph.num_edges());
            let found =
                find_isomorphism(&graph, &graph).expect("should find identity isomorphism");
            assert_eq!(found, expected, "{name}");
        }
    }

    #[test]
    fn test_find_cyclic_isomorphism() {
        // all vertices distinctly colored: the relabelling is the only isomorphism
        let f = encode(&Graph::path(4), &Coloring::new([0, 1, 2, 3]));
        let nodes = Permutation::new([1, 2, 3, 0]).expect("valid permutation");

        // vertex i of f becomes vertex nodes[i] of g
        let relabelled = Graph::new(4, [(1, 2), (2, 3), (3, 0)]).unwrap();
        let g = encode(&relabelled, &Coloring::new([3, 0, 1, 2]));

        let found = find_isomorphism(&f, &g).expect("should find isomorphism");
        assert_eq!(found.nodes(), &nodes);
    }

    #[test]
    fn test_rejects_differently_colored_graphs() {
        let path = Graph::path(3);
        let f = encode(&path, &Coloring::new([0, 1, 0]));
        let g = encode(&path, &Coloring::new([1, 0, 0]));
        assert!(matches!(
            find_isomorphism(&f, &g),
            Err(Error::Unsatisfiable(_))
        ));

        let h = encode(&path, &Coloring::new([1, 1, 0]));
        assert_eq!(find_isomorphism(&f, &h), Err(Error::Nogood));
    }

    #[test]
    fn test_symmetric_graphs_map_consistently() {
        // two leaves of color 1 hanging off different color-0 vertices
        let graph = Graph::new(4, [(0, 1), (1, 2), (2, 3)]).unwrap();
        let f = encode(&graph, &Coloring::new([1, 0, 0, 1]));
        let g = encode(&graph, &Coloring::new([1, 0, 0, 1]));
        let found = find_isomorphism(&f, &g).expect("isomorphic");
        assert!(Isomorphism::from_node_map(&f, &g, found.nodes().clone()).is_some());
    }
}
