//! Canonical forms and automorphism-group orders of colored graphs.

/// Centre-rooted canonical codes for forests
pub mod forest;

/// Individualization-refinement search, for arbitrary colored graphs
pub mod search;

pub use forest::ForestOracle;
pub use search::SearchOracle;

use thiserror::Error;

use crate::colored::{ColoredGraph, EdgeLabel};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("colored graph is not a forest (edge {0} - {1} closes a cycle)")]
    NotAForest(usize, usize),

    #[error("automorphism group order overflows u128")]
    Overflow,

    #[error("hyperedge is not a binary edge between existing vertices")]
    Malformed,
}

/// One token of a [`CanonicalForm`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Vertices(usize),
    Centre,
    Bicentre,
    Open,
    Close,
    Loop(EdgeLabel),
    Edge(EdgeLabel),
    Pair(usize, usize),
}

/// An isomorphism-invariant, totally ordered key. Two colored graphs handed to the same
/// oracle are isomorphic iff their forms are equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalForm(Vec<Symbol>);

impl CanonicalForm {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        CanonicalForm(symbols)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }
}

/// The graph canonicalization collaborator used by the partitioner and the driver.
pub trait CanonicalOracle {
    fn canonical_form(&self, graph: &ColoredGraph) -> Result<CanonicalForm, OracleError>;

    /// Number of label-preserving automorphisms; always at least 1.
    fn automorphism_group_order(&self, graph: &ColoredGraph) -> Result<u128, OracleError>;
}

impl<O: CanonicalOracle + ?Sized> CanonicalOracle for &O {
    fn canonical_form(&self, graph: &ColoredGraph) -> Result<CanonicalForm, OracleError> {
        (**self).canonical_form(graph)
    }

    fn automorphism_group_order(&self, graph: &ColoredGraph) -> Result<u128, OracleError> {
        (**self).automorphism_group_order(graph)
    }
}

/// `acc * k!`, checked.
pub(crate) fn times_factorial(acc: u128, k: usize) -> Result<u128, OracleError> {
    (2..=k as u128).try_fold(acc, |acc, i| acc.checked_mul(i).ok_or(OracleError::Overflow))
}

/// `acc * m1! * m2! * ...` where the `mi` are the run lengths of equal items in a sorted
/// slice.
pub(crate) fn times_run_factorials<T: PartialEq>(
    mut acc: u128,
    sorted: &[T],
) -> Result<u128, OracleError> {
    let mut start = 0;
    while start < sorted.len() {
        let end = start
            + sorted[start..]
                .iter()
                .take_while(|x| **x == sorted[start])
                .count();
        acc = times_factorial(acc, end - start)?;
        start = end;
    }
    Ok(acc)
}
