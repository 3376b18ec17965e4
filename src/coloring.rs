//! Vertex colorings and their streaming enumeration.
use serde::Deserialize;

use crate::graph::Graph;

pub type Color = usize;

/// A total map `vertex -> color`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coloring(Vec<Color>);

impl Coloring {
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        Coloring(colors.into_iter().collect())
    }

    /// The coloring of the graph with no vertices; also stands in for "uncolored".
    pub fn empty() -> Self {
        Coloring(vec![])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn color(&self, vertex: usize) -> Option<Color> {
        self.0.get(vertex).copied()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.0
    }

    /// The dual view `color -> vertices`, for colors `0..num_colors`. Every vertex lands in
    /// exactly one class; classes may be empty.
    pub fn color_classes(&self, num_colors: usize) -> Vec<Vec<usize>> {
        let num_colors = num_colors.max(self.0.iter().map(|&c| c + 1).max().unwrap_or(0));
        let mut classes = vec![Vec::new(); num_colors];
        for (vertex, &color) in self.0.iter().enumerate() {
            classes[color].push(vertex);
        }
        classes
    }

    /// Rebuild a coloring of `vertices` vertices from its color classes. `None` if some
    /// vertex is missing or appears twice.
    pub fn from_color_classes(vertices: usize, classes: &[Vec<usize>]) -> Option<Self> {
        let mut colors: Vec<Option<Color>> = vec![None; vertices];
        for (color, class) in classes.iter().enumerate() {
            for &vertex in class {
                match colors.get_mut(vertex) {
                    Some(slot @ None) => *slot = Some(color),
                    _ => return None,
                }
            }
        }
        colors.into_iter().collect::<Option<Vec<_>>>().map(Coloring)
    }

    /// Whether adjacent vertices always receive different colors.
    pub fn is_proper(&self, graph: &Graph) -> bool {
        graph
            .edges()
            .iter()
            .all(|&(u, v)| matches!((self.color(u), self.color(v)), (Some(a), Some(b)) if a != b))
    }
}

/// Which colorings the enumerator produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColoringMode {
    /// Every total coloring, `k^n` of them.
    #[default]
    Total,
    /// Only colorings in which adjacent vertices differ.
    Proper,
}

/// Streams the colorings of a graph in lexicographic order (vertex 0 most significant).
/// Holds only the current coloring.
pub struct Colorings<'a> {
    graph: &'a Graph,
    num_colors: usize,
    mode: ColoringMode,
    next: Option<Vec<Color>>,
}

impl<'a> Colorings<'a> {
    pub fn new(graph: &'a Graph, num_colors: usize, mode: ColoringMode) -> Self {
        let n = graph.num_vertices();
        // 0^0 = 1: the graph with no vertices has exactly the empty coloring
        let next = if num_colors == 0 && n > 0 {
            None
        } else {
            Some(vec![0; n])
        };
        Colorings {
            graph,
            num_colors,
            mode,
            next,
        }
    }

    pub fn total(graph: &'a Graph, num_colors: usize) -> Self {
        Self::new(graph, num_colors, ColoringMode::Total)
    }

    /// Odometer step: `false` once the last coloring has been passed.
    fn advance(colors: &mut [Color], num_colors: usize) -> bool {
        for slot in colors.iter_mut().rev() {
            *slot += 1;
            if *slot < num_colors {
                return true;
            }
            *slot = 0;
        }
        false
    }

    fn accepts(&self, colors: &[Color]) -> bool {
        match self.mode {
            ColoringMode::Total => true,
            ColoringMode::Proper => self
                .graph
                .edges()
                .iter()
                .all(|&(u, v)| colors[u] != colors[v]),
        }
    }
}

impl Iterator for Colorings<'_> {
    type Item = Coloring;

    fn next(&mut self) -> Option<Coloring> {
        loop {
            let current = self.next.take()?;
            let mut successor = current.clone();
            if Self::advance(&mut successor, self.num_colors) {
                self.next = Some(successor);
            }
            if self.accepts(&current) {
                return Some(Coloring(current));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_edge_two_colors() {
        let graph = Graph::path(2);
        let colorings: Vec<_> = Colorings::total(&graph, 2).collect();
        assert_eq!(
            colorings,
            vec![
                Coloring::new([0, 0]),
                Coloring::new([0, 1]),
                Coloring::new([1, 0]),
                Coloring::new([1, 1]),
            ]
        );
    }

    #[test]
    fn test_counts_are_powers() {
        let graph = Graph::star(4);
        assert_eq!(Colorings::total(&graph, 3).count(), 81);
        assert_eq!(Colorings::total(&graph, 1).count(), 1);
        assert_eq!(Colorings::total(&graph, 0).count(), 0);
    }

    #[test]
    fn test_empty_graph_has_one_coloring() {
        let graph = Graph::empty();
        assert_eq!(
            Colorings::total(&graph, 0).collect::<Vec<_>>(),
            vec![Coloring::empty()]
        );
        assert_eq!(Colorings::total(&graph, 5).count(), 1);
    }

    #[test]
    fn test_proper_colorings_of_a_path() {
        // k * (k-1)^(n-1)
        let graph = Graph::path(4);
        let colorings: Vec<_> = Colorings::new(&graph, 3, ColoringMode::Proper).collect();
        assert_eq!(colorings.len(), 24);
        assert!(colorings.iter().all(|c| c.is_proper(&graph)));
    }

    #[test]
    fn test_color_classes_are_consistent() {
        let coloring = Coloring::new([2, 0, 2, 1]);
        let classes = coloring.color_classes(4);
        assert_eq!(classes, vec![vec![1], vec![3], vec![0, 2], vec![]]);
        assert_eq!(Coloring::from_color_classes(4, &classes), Some(coloring));
    }

    #[test]
    fn test_from_color_classes_rejects_overlap_and_gaps() {
        assert_eq!(Coloring::from_color_classes(2, &[vec![0], vec![0, 1]]), None);
        assert_eq!(Coloring::from_color_classes(3, &[vec![0], vec![1]]), None);
    }
}
