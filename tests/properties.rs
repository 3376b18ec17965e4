//! Property-based tests for the coloring partition.
//!
//! Trees come from random Prüfer sequences, so every labelled tree on a few vertices can
//! show up, not only the representatives the enumeration driver uses.

use std::collections::BTreeMap;

use proptest::prelude::*;

use tree_coloring_classes::artifact::{Alphabet, Artifact, render};
use tree_coloring_classes::canonical::{CanonicalForm, CanonicalOracle, ForestOracle};
use tree_coloring_classes::colored::{encode, encode_uncolored};
use tree_coloring_classes::coloring::{Coloring, ColoringMode, Colorings};
use tree_coloring_classes::graph::Graph;
use tree_coloring_classes::isomorphism::{Isomorphism, find_isomorphism};
use tree_coloring_classes::partition::{Partitioner, is_isomorphic_colorings};
use tree_coloring_classes::permutation::Permutation;

/// Labelled trees on 2 to 7 vertices.
fn tree() -> impl Strategy<Value = Graph> {
    (2usize..=7)
        .prop_flat_map(|n| prop::collection::vec(0..n, n - 2))
        .prop_map(|code| Graph::from_prufer(&code).unwrap())
}

fn tree_and_colors() -> impl Strategy<Value = (Graph, usize)> {
    (tree(), 1usize..=3)
}

/// A tree, a number of colors, and two colorings of it.
fn two_colorings() -> impl Strategy<Value = (Graph, Coloring, Coloring)> {
    (tree(), 1usize..=3).prop_flat_map(|(tree, k)| {
        let n = tree.num_vertices();
        (
            Just(tree),
            prop::collection::vec(0..k, n).prop_map(Coloring::new),
            prop::collection::vec(0..k, n).prop_map(Coloring::new),
        )
    })
}

fn group_order(tree: &Graph) -> u128 {
    ForestOracle
        .automorphism_group_order(&encode_uncolored(tree))
        .unwrap()
}

fn orders_by_form(tree: &Graph, colorings: Vec<Coloring>) -> BTreeMap<CanonicalForm, u128> {
    Partitioner::new(ForestOracle)
        .classify_colorings(tree, colorings)
        .unwrap()
        .by_form()
        .map(|(form, class)| (form.clone(), class.automorphism_order))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every coloring lands in exactly one class, and the classes account for all of them.
    #[test]
    fn partition_is_complete((tree, k) in tree_and_colors()) {
        let classes = Partitioner::new(ForestOracle).classify(&tree, k).unwrap();
        let total = (k as u64).pow(tree.num_vertices() as u32);
        prop_assert_eq!(classes.total_members(), total);

        for coloring in Colorings::total(&tree, k) {
            let form = ForestOracle.canonical_form(&encode(&tree, &coloring)).unwrap();
            prop_assert!(classes.find(&form).is_some());
        }
    }

    /// Orbit sizes |Aut(T)| / |Aut(T, c)| add up to k^n.
    #[test]
    fn burnside_total((tree, k) in tree_and_colors()) {
        let classes = Partitioner::new(ForestOracle).classify(&tree, k).unwrap();
        let total = (k as u128).pow(tree.num_vertices() as u32);
        prop_assert_eq!(classes.orbit_sum(group_order(&tree)), Some(total));
    }

    /// The same identity holds for proper colorings, against however many there are.
    #[test]
    fn burnside_proper((tree, k) in tree_and_colors()) {
        let classes = Partitioner::new(ForestOracle)
            .with_mode(ColoringMode::Proper)
            .classify(&tree, k)
            .unwrap();
        let proper = Colorings::total(&tree, k).filter(|c| c.is_proper(&tree)).count() as u128;
        prop_assert_eq!(classes.orbit_sum(group_order(&tree)), Some(proper));
    }

    /// Classes and their orders do not depend on the enumeration order.
    #[test]
    fn order_independent((tree, k) in tree_and_colors()) {
        let forward: Vec<Coloring> = Colorings::total(&tree, k).collect();
        let mut backward = forward.clone();
        backward.reverse();

        prop_assert_eq!(orders_by_form(&tree, forward), orders_by_form(&tree, backward));
    }

    /// Rendering and parsing an artifact recovers its tree and classes.
    #[test]
    fn artifact_round_trip((tree, k) in tree_and_colors()) {
        let alphabet = Alphabet::default();
        let classes = Partitioner::new(ForestOracle).classify(&tree, k).unwrap();

        let text = render(&tree, classes.classes(), &alphabet).unwrap();
        prop_assert!(text.ends_with("STOP\n"));

        let artifact = Artifact::parse(&text, &alphabet).unwrap();
        prop_assert_eq!(&artifact.classes[..], classes.classes());
        prop_assert_eq!(artifact.tree().unwrap(), tree);
    }

    /// Comparing canonical forms and searching for an isomorphism agree.
    #[test]
    fn same_class_matches_search((tree, c1, c2) in two_colorings()) {
        let partitioner = Partitioner::new(ForestOracle);
        prop_assert_eq!(
            partitioner.same_class(&tree, &c1, &c2).unwrap(),
            is_isomorphic_colorings(&tree, &c1, &c2)
        );
    }

    /// An isomorphism found by search carries the first graph exactly onto the second, and
    /// the oracle gives the image the same canonical form.
    #[test]
    fn found_isomorphism_maps_onto_target((tree, c1, c2) in two_colorings()) {
        let f = encode(&tree, &c1);
        let g = encode(&tree, &c2);
        if let Ok(iso) = find_isomorphism(&f, &g) {
            let image = iso.apply(&f);
            let identity = Permutation::identity(tree.num_vertices());
            prop_assert!(Isomorphism::from_node_map(&image, &g, identity).is_some());
            prop_assert_eq!(
                ForestOracle.canonical_form(&image).unwrap(),
                ForestOracle.canonical_form(&g).unwrap()
            );
        }
    }
}
