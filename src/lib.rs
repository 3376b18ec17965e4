pub mod artifact;
pub mod canonical;
pub mod colored;
pub mod coloring;
pub mod combinatorics;
pub mod config;
pub mod driver;
pub mod error;
pub mod graph;
pub mod isomorphism;
pub mod moduli;
pub mod partition;
pub mod permutation;
pub mod trees;

// fast nogood checks
mod nogood;

pub use canonical::{CanonicalForm, CanonicalOracle, ForestOracle, SearchOracle};
pub use colored::{ColoredGraph, EdgeLabel};
pub use coloring::{Coloring, ColoringMode};
pub use error::{Error, Result};
pub use graph::Graph;
pub use isomorphism::Isomorphism;
pub use partition::{ClassList, IsomorphismClass, Partitioner, is_isomorphic_colorings};
pub use permutation::Permutation;
