//! Individualization-refinement for arbitrary colored graphs.
//!
//! Vertices start in cells ranked by their loop labels; cells are refined by the multiset of
//! (neighbour cell, edge labels) until stable. While some cell has more than one vertex, each
//! of its vertices is individualized in turn and the search recurses. Every discrete partition
//! reached is a labelling of the graph; the smallest relabelled edge list is the canonical
//! form, and the number of labellings producing it is the automorphism group order (the
//! search tree is invariant under automorphisms, which act freely on its leaves).
//!
//! The search visits every leaf, so it is exponential on highly symmetric inputs.
use std::cmp::Ordering;

use super::{CanonicalForm, CanonicalOracle, OracleError, Symbol};
use crate::colored::{ColoredGraph, EdgeLabel};

#[derive(Clone, Copy, Debug, Default)]
pub struct SearchOracle;

impl CanonicalOracle for SearchOracle {
    fn canonical_form(&self, graph: &ColoredGraph) -> Result<CanonicalForm, OracleError> {
        let (code, _) = Labelled::new(graph)?.canonical()?;
        Ok(CanonicalForm::new(code))
    }

    fn automorphism_group_order(&self, graph: &ColoredGraph) -> Result<u128, OracleError> {
        let (_, order) = Labelled::new(graph)?.canonical()?;
        Ok(order)
    }
}

struct Labelled {
    loops: Vec<Vec<EdgeLabel>>,
    // adjacency[u][v]: sorted labels of the edges between u != v
    adjacency: Vec<Vec<Vec<EdgeLabel>>>,
}

impl Labelled {
    fn new(graph: &ColoredGraph) -> Result<Self, OracleError> {
        if !graph.is_well_formed() {
            return Err(OracleError::Malformed);
        }

        let n = graph.num_vertices();
        let mut adjacency = vec![vec![Vec::new(); n]; n];
        for (u, v, label) in graph.labelled_edges() {
            if u != v {
                adjacency[u][v].push(label);
                adjacency[v][u].push(label);
            }
        }
        for row in &mut adjacency {
            for labels in row.iter_mut() {
                labels.sort_unstable();
            }
        }

        Ok(Labelled {
            loops: graph.loop_labels(),
            adjacency,
        })
    }

    fn len(&self) -> usize {
        self.loops.len()
    }

    fn canonical(&self) -> Result<(Vec<Symbol>, u128), OracleError> {
        let mut best = None;
        self.search(ranks(&self.loops), &mut best)?;
        // the search always reaches at least one leaf
        best.ok_or(OracleError::Malformed)
    }

    fn refine(&self, mut cells: Vec<usize>) -> Vec<usize> {
        let n = self.len();
        loop {
            let before = num_cells(&cells);
            let signatures: Vec<(usize, Vec<(usize, &Vec<EdgeLabel>)>)> = (0..n)
                .map(|v| {
                    let mut around: Vec<(usize, &Vec<EdgeLabel>)> = (0..n)
                        .filter(|&w| !self.adjacency[v][w].is_empty())
                        .map(|w| (cells[w], &self.adjacency[v][w]))
                        .collect();
                    around.sort();
                    (cells[v], around)
                })
                .collect();
            cells = ranks(&signatures);
            if num_cells(&cells) == before {
                return cells;
            }
        }
    }

    fn search(
        &self,
        cells: Vec<usize>,
        best: &mut Option<(Vec<Symbol>, u128)>,
    ) -> Result<(), OracleError> {
        let cells = self.refine(cells);
        let count = num_cells(&cells);

        if count == self.len() {
            let code = self.relabelled(&cells);
            let replace = match best.as_mut() {
                Some((best_code, leaves)) => match (*best_code).cmp(&code) {
                    Ordering::Equal => {
                        *leaves = leaves.checked_add(1).ok_or(OracleError::Overflow)?;
                        false
                    }
                    Ordering::Less => false,
                    Ordering::Greater => true,
                },
                None => true,
            };
            if replace {
                *best = Some((code, 1));
            }
            return Ok(());
        }

        let mut sizes = vec![0usize; count];
        for &cell in &cells {
            sizes[cell] += 1;
        }
        let Some(target) = sizes.iter().position(|&size| size > 1) else {
            return Err(OracleError::Malformed);
        };

        for v in (0..self.len()).filter(|&v| cells[v] == target) {
            let individualized = cells
                .iter()
                .enumerate()
                .map(|(u, &cell)| {
                    if cell > target || (cell == target && u != v) {
                        cell + 1
                    } else {
                        cell
                    }
                })
                .collect();
            self.search(individualized, best)?;
        }

        Ok(())
    }

    /// The labelled edge list under `vertex v -> position cells[v]`.
    fn relabelled(&self, cells: &[usize]) -> Vec<Symbol> {
        let n = self.len();
        let mut at = vec![0; n];
        for (v, &position) in cells.iter().enumerate() {
            at[position] = v;
        }

        let mut code = vec![Symbol::Vertices(n)];
        for i in 0..n {
            for &label in &self.loops[at[i]] {
                code.push(Symbol::Pair(i, i));
                code.push(Symbol::Loop(label));
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let labels = &self.adjacency[at[i]][at[j]];
                if !labels.is_empty() {
                    code.push(Symbol::Pair(i, j));
                    code.extend(labels.iter().map(|&label| Symbol::Edge(label)));
                }
            }
        }
        code
    }
}

/// Dense ranks `0..` of the keys in sorted order.
fn ranks<T: Ord>(keys: &[T]) -> Vec<usize> {
    let mut distinct: Vec<&T> = keys.iter().collect();
    distinct.sort();
    distinct.dedup();
    keys.iter()
        .map(|key| distinct.partition_point(|x| *x < key))
        .collect()
}

fn num_cells(cells: &[usize]) -> usize {
    cells.iter().max().map_or(0, |&max| max + 1)
}
