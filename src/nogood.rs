use std::collections::HashMap;
use std::hash::Hash;

use crate::coloring::Coloring;
use crate::colored::ColoredGraph;

/// Cheap necessary conditions for two colored graphs to be isomorphic: same number of
/// vertices, the same multiset of hyperedge labels (which covers the color-class sizes), and
/// the same degree sequence.
pub(crate) fn nogood(f: &ColoredGraph, g: &ColoredGraph) -> Option<()> {
    if f.num_vertices() != g.num_vertices() {
        return None;
    }

    if !same_multiset(&f.hypergraph().edges, &g.hypergraph().edges) {
        return None;
    }

    let degrees =
        |x: &ColoredGraph| -> Vec<usize> { x.neighbours().iter().map(Vec::len).collect() };
    if !same_multiset(&degrees(f), &degrees(g)) {
        return None;
    }

    Some(())
}

/// Two colorings of the same graph can only be equivalent when every color is used on the
/// same number of vertices.
pub(crate) fn same_class_sizes(c1: &Coloring, c2: &Coloring) -> bool {
    same_multiset(c1.as_slice(), c2.as_slice())
}

/// Whether `x` and `y` hold the same elements with the same multiplicities.
fn same_multiset<T: Eq + Hash>(x: &[T], y: &[T]) -> bool {
    if x.len() != y.len() {
        return false;
    }

    let mut counts: HashMap<&T, usize> = HashMap::new();
    for item in x {
        *counts.entry(item).or_insert(0) += 1;
    }

    y.iter().all(|item| match counts.get_mut(item) {
        Some(count) if *count > 0 => {
            *count -= 1;
            true
        }
        _ => false,
    })
}
