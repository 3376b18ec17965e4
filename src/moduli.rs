//! Torus-fixed loci of the moduli space of degree `d` stable maps from genus 0 curves to
//! `P^n`.
//!
//! A fixed locus is a tree whose vertices are colored by the `n + 1` fixed points of `P^n`,
//! adjacent vertices differently, and whose edges carry positive degrees summing to `d`.
//! Two loci are the same when a color- and degree-preserving tree isomorphism maps one onto
//! the other; degrees are encoded as edge labels disjoint from the color loops.
use tracing::debug;

use crate::canonical::{CanonicalOracle, OracleError};
use crate::colored::{ColoredGraph, encode_weighted};
use crate::coloring::{Coloring, ColoringMode, Colorings};
use crate::combinatorics::{arrangements, partitions};
use crate::graph::Graph;
use crate::partition::ClassList;
use crate::trees::{FreeTrees, TreeSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModuliSpace {
    target_dim: usize,
    degree: u32,
}

/// One fixed locus: a tree, a proper coloring, and a degree per edge of `tree.edges()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedLocusGraph {
    pub tree: Graph,
    pub coloring: Coloring,
    pub degrees: Vec<u32>,
}

impl FixedLocusGraph {
    pub fn colored(&self) -> ColoredGraph {
        encode_weighted(&self.tree, &self.coloring, &self.degrees)
    }
}

impl ModuliSpace {
    pub fn new(target_dim: usize, degree: u32) -> Self {
        ModuliSpace { target_dim, degree }
    }

    /// `(n + 1) d + n - 3`
    pub fn dim(&self) -> i64 {
        let n = self.target_dim as i64;
        (n + 1) * i64::from(self.degree) + n - 3
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn dim_proj_space(&self) -> usize {
        self.target_dim
    }

    /// Number of torus-fixed points of `P^n`, which is the number of colors.
    pub fn fixed_points(&self) -> usize {
        self.target_dim + 1
    }

    /// Every fixed locus, isomorphic copies included: trees on `2..=d+1` vertices, each
    /// proper coloring, each ordering of each partition of `d` over the edges.
    pub fn fixed_locus(&self) -> Vec<FixedLocusGraph> {
        let mut loci = Vec::new();
        for vertices in 2..=self.degree as usize + 1 {
            for tree in FreeTrees.trees_with_n_vertices(vertices) {
                let weightings: Vec<Vec<u32>> = partitions(self.degree, tree.num_edges())
                    .iter()
                    .flat_map(|parts| arrangements(parts))
                    .collect();
                for coloring in Colorings::new(&tree, self.fixed_points(), ColoringMode::Proper) {
                    for degrees in &weightings {
                        loci.push(FixedLocusGraph {
                            tree: tree.clone(),
                            coloring: coloring.clone(),
                            degrees: degrees.clone(),
                        });
                    }
                }
            }
        }
        loci
    }

    /// The fixed loci up to isomorphism, each with its automorphism order.
    pub fn fixed_locus_classes<O: CanonicalOracle>(
        &self,
        oracle: &O,
    ) -> Result<ClassList<FixedLocusGraph>, OracleError> {
        let mut classes = ClassList::new();
        for locus in self.fixed_locus() {
            let colored = locus.colored();
            let form = oracle.canonical_form(&colored)?;
            classes.offer(form, locus, || oracle.automorphism_group_order(&colored))?;
        }
        debug!(
            target_dim = self.target_dim,
            degree = self.degree,
            loci = classes.total_members(),
            classes = classes.len(),
            "classified fixed loci"
        );
        Ok(classes)
    }
}
