//! Partitioning colorings into isomorphism classes.
//!
//! Each coloring is loop-encoded and canonicalized. A binary search over the canonical forms
//! seen so far either finds its class (the coloring is dropped) or gives the insertion point
//! for a new class, and only then is the automorphism group order computed.
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;
use tracing::debug;

use crate::canonical::{CanonicalForm, CanonicalOracle, OracleError};
use crate::coloring::{Coloring, ColoringMode, Colorings};
use crate::colored::{encode, encode_uncolored};
use crate::graph::Graph;
use crate::isomorphism::find_isomorphism;
use crate::nogood::same_class_sizes;

/// One equivalence class: a representative and the automorphism group order of its colored
/// graph (the same for every member).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IsomorphismClass<R> {
    pub representative: R,
    pub automorphism_order: u128,
}

/// Classes in discovery order, plus a sorted index from canonical form to class.
#[derive(Clone, Debug)]
pub struct ClassList<R> {
    classes: Vec<IsomorphismClass<R>>,
    members: Vec<u64>,
    index: Vec<(CanonicalForm, usize)>,
}

impl<R> Default for ClassList<R> {
    fn default() -> Self {
        ClassList {
            classes: Vec::new(),
            members: Vec::new(),
            index: Vec::new(),
        }
    }
}

impl<R> ClassList<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[IsomorphismClass<R>] {
        &self.classes
    }

    pub fn iter(&self) -> impl Iterator<Item = &IsomorphismClass<R>> {
        self.classes.iter()
    }

    /// How many offered items landed in class `i`.
    pub fn members(&self, i: usize) -> u64 {
        self.members.get(i).copied().unwrap_or(0)
    }

    pub fn total_members(&self) -> u64 {
        self.members.iter().sum()
    }

    pub fn find(&self, form: &CanonicalForm) -> Option<&IsomorphismClass<R>> {
        let at = self.search(form).ok()?;
        self.classes.get(self.index[at].1)
    }

    /// Classes keyed by canonical form, in form order.
    pub fn by_form(&self) -> impl Iterator<Item = (&CanonicalForm, &IsomorphismClass<R>)> {
        self.index
            .iter()
            .map(|(form, i)| (form, &self.classes[*i]))
    }

    fn search(&self, form: &CanonicalForm) -> Result<usize, usize> {
        self.index.binary_search_by(|(probe, _)| probe.cmp(form))
    }

    /// Record an item with the given canonical form. A new form opens a class, paying for
    /// `order` once; a known form only bumps the member count. Returns whether a class was
    /// opened.
    pub fn offer<F>(
        &mut self,
        form: CanonicalForm,
        representative: R,
        order: F,
    ) -> Result<bool, OracleError>
    where
        F: FnOnce() -> Result<u128, OracleError>,
    {
        match self.search(&form) {
            Ok(at) => {
                self.members[self.index[at].1] += 1;
                Ok(false)
            }
            Err(at) => {
                let automorphism_order = order()?;
                self.index.insert(at, (form, self.classes.len()));
                self.classes.push(IsomorphismClass {
                    representative,
                    automorphism_order,
                });
                self.members.push(1);
                Ok(true)
            }
        }
    }

    /// Σ |Aut(G)| / order over all classes: by orbit-stabilizer, the number of items the
    /// classes stand for. `None` if some order does not divide `group_order`.
    pub fn orbit_sum(&self, group_order: u128) -> Option<u128> {
        self.classes.iter().try_fold(0u128, |acc, class| {
            let order = class.automorphism_order;
            if order == 0 || group_order % order != 0 {
                return None;
            }
            acc.checked_add(group_order / order)
        })
    }

    pub fn into_classes(self) -> Vec<IsomorphismClass<R>> {
        self.classes
    }
}

/// Classifies the colorings of a graph with one canonicalization oracle.
#[derive(Clone, Debug)]
pub struct Partitioner<O> {
    oracle: O,
    mode: ColoringMode,
}

impl<O: CanonicalOracle> Partitioner<O> {
    pub fn new(oracle: O) -> Self {
        Partitioner {
            oracle,
            mode: ColoringMode::Total,
        }
    }

    pub fn with_mode(mut self, mode: ColoringMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn mode(&self) -> ColoringMode {
        self.mode
    }

    /// Classes of all colorings of `graph` with `num_colors` colors. With no colors there is
    /// a single trivial class standing for the uncolored graph.
    pub fn classify(
        &self,
        graph: &Graph,
        num_colors: usize,
    ) -> Result<ClassList<Coloring>, OracleError> {
        if num_colors == 0 {
            return self.trivial(graph);
        }
        let classes =
            self.classify_colorings(graph, Colorings::new(graph, num_colors, self.mode))?;
        debug!(
            vertices = graph.num_vertices(),
            colors = num_colors,
            colorings = classes.total_members(),
            classes = classes.len(),
            "classified colorings"
        );
        Ok(classes)
    }

    /// Classes of an arbitrary stream of colorings of `graph`.
    pub fn classify_colorings(
        &self,
        graph: &Graph,
        colorings: impl IntoIterator<Item = Coloring>,
    ) -> Result<ClassList<Coloring>, OracleError> {
        let mut classes = ClassList::new();
        for coloring in colorings {
            let colored = encode(graph, &coloring);
            let form = self.oracle.canonical_form(&colored)?;
            classes.offer(form, coloring, || {
                self.oracle.automorphism_group_order(&colored)
            })?;
        }
        Ok(classes)
    }

    /// Like [`Partitioner::classify`], with colorings canonicalized on the rayon pool. The
    /// lookup-then-insert runs under one lock, automorphism order included, so each class
    /// still pays for it once. Class order and representatives depend on scheduling; the
    /// classes and their orders do not.
    pub fn classify_par(
        &self,
        graph: &Graph,
        num_colors: usize,
    ) -> Result<ClassList<Coloring>, OracleError>
    where
        O: Sync,
    {
        if num_colors == 0 {
            return self.trivial(graph);
        }

        let classes = Mutex::new(ClassList::new());
        Colorings::new(graph, num_colors, self.mode)
            .par_bridge()
            .try_for_each(|coloring| {
                let colored = encode(graph, &coloring);
                let form = self.oracle.canonical_form(&colored)?;
                let mut guard = classes.lock().unwrap_or_else(PoisonError::into_inner);
                guard
                    .offer(form, coloring, || {
                        self.oracle.automorphism_group_order(&colored)
                    })
                    .map(|_| ())
            })?;

        Ok(classes.into_inner().unwrap_or_else(PoisonError::into_inner))
    }

    /// Whether two colorings of `graph` fall into the same class.
    pub fn same_class(
        &self,
        graph: &Graph,
        c1: &Coloring,
        c2: &Coloring,
    ) -> Result<bool, OracleError> {
        let f1 = self.oracle.canonical_form(&encode(graph, c1))?;
        let f2 = self.oracle.canonical_form(&encode(graph, c2))?;
        Ok(f1 == f2)
    }

    fn trivial(&self, graph: &Graph) -> Result<ClassList<Coloring>, OracleError> {
        let colored = encode_uncolored(graph);
        let mut classes = ClassList::new();
        classes.offer(
            self.oracle.canonical_form(&colored)?,
            Coloring::empty(),
            || self.oracle.automorphism_group_order(&colored),
        )?;
        Ok(classes)
    }
}

/// Whether some automorphism of `graph` carries coloring `c1` onto `c2`. Colorings with
/// different color-class sizes are answered `false` without searching.
pub fn is_isomorphic_colorings(graph: &Graph, c1: &Coloring, c2: &Coloring) -> bool {
    if !same_class_sizes(c1, c2) {
        return false;
    }
    find_isomorphism(&encode(graph, c1), &encode(graph, c2)).is_ok()
}
