/// Isomorphisms of colored graphs
pub mod types;

/// Backtracking search for an explicit isomorphism between two colored graphs
pub mod traversal;

pub use traversal::{Error, find_isomorphism};
pub use types::{Isomorphism, count_automorphisms_exhaustive};
