//! Sources of unlabelled tree shapes for the driver.
use std::collections::BTreeSet;

use crate::canonical::{CanonicalOracle, ForestOracle};
use crate::colored::encode_uncolored;
use crate::graph::{Graph, GraphError};

/// Supplies one labelled representative per isomorphism type of tree on `n` vertices.
pub trait TreeSource {
    fn trees_with_n_vertices(&self, vertices: usize) -> Vec<Graph>;
}

impl<S: TreeSource + ?Sized> TreeSource for &S {
    fn trees_with_n_vertices(&self, vertices: usize) -> Vec<Graph> {
        (**self).trees_with_n_vertices(vertices)
    }
}

/// All free trees on `n` vertices, in a fixed order.
///
/// Rooted trees are generated as canonical level sequences (each successor is obtained by
/// copying the subtree before the last vertex deeper than level 1), then different rootings
/// of the same free tree are merged by canonical form, keeping the first one seen.
#[derive(Clone, Copy, Debug, Default)]
pub struct FreeTrees;

impl TreeSource for FreeTrees {
    fn trees_with_n_vertices(&self, vertices: usize) -> Vec<Graph> {
        if vertices == 0 {
            return Vec::new();
        }

        let mut seen = BTreeSet::new();
        let mut trees = Vec::new();
        for levels in LevelSequences::new(vertices) {
            // level sequences always describe trees, neither step fails
            let Ok(tree) = from_levels(&levels) else {
                continue;
            };
            let Ok(form) = ForestOracle.canonical_form(&encode_uncolored(&tree)) else {
                continue;
            };
            if seen.insert(form) {
                trees.push(tree);
            }
        }
        trees
    }
}

/// Level sequences of rooted trees on `n` vertices, root at level 0, starting from the path
/// and ending at the star.
struct LevelSequences {
    next: Option<Vec<usize>>,
}

impl LevelSequences {
    fn new(vertices: usize) -> Self {
        LevelSequences {
            next: Some((0..vertices).collect()),
        }
    }
}

impl Iterator for LevelSequences {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        if let Some(p) = current.iter().rposition(|&level| level > 1) {
            let q = current[..p]
                .iter()
                .rposition(|&level| level + 1 == current[p]);
            if let Some(q) = q {
                let mut successor = current.clone();
                for i in p..successor.len() {
                    successor[i] = successor[i - (p - q)];
                }
                self.next = Some(successor);
            }
        }

        Some(current)
    }
}

/// Vertex `i` hangs off the closest earlier vertex one level up.
fn from_levels(levels: &[usize]) -> Result<Graph, GraphError> {
    let mut edges = Vec::with_capacity(levels.len().saturating_sub(1));
    let mut path: Vec<usize> = Vec::new();
    for (vertex, &level) in levels.iter().enumerate() {
        path.truncate(level);
        if let Some(&parent) = path.last() {
            edges.push((parent, vertex));
        }
        path.push(vertex);
    }

    Graph::new(levels.len(), edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_sequences() {
        let sequences: Vec<_> = LevelSequences::new(4).collect();
        assert_eq!(
            sequences,
            vec![
                vec![0, 1, 2, 3],
                vec![0, 1, 2, 2],
                vec![0, 1, 2, 1],
                vec![0, 1, 1, 1],
            ]
        );
    }

    #[test]
    fn test_from_levels() {
        let tree = from_levels(&[0, 1, 2, 1]).unwrap();
        assert_eq!(tree.edges(), &[(0, 1), (1, 2), (0, 3)]);
    }

    #[test]
    fn test_free_tree_counts() {
        // OEIS A000055
        let expected = [1, 1, 1, 2, 3, 6, 11, 23, 47];
        for (n, &count) in expected.iter().enumerate().map(|(i, c)| (i + 1, c)) {
            let trees = FreeTrees.trees_with_n_vertices(n);
            assert_eq!(trees.len(), count, "n = {n}");
            assert!(trees.iter().all(|t| t.is_tree() && t.num_vertices() == n));
        }
    }

    #[test]
    fn test_free_trees_pairwise_non_isomorphic() {
        let forms: BTreeSet<_> = FreeTrees
            .trees_with_n_vertices(7)
            .iter()
            .map(|t| ForestOracle.canonical_form(&encode_uncolored(t)).unwrap())
            .collect();
        assert_eq!(forms.len(), 11);
    }

    #[test]
    fn test_no_trees_without_vertices() {
        assert!(FreeTrees.trees_with_n_vertices(0).is_empty());
    }
}
