//! Simple undirected graphs on vertices `0..n`, with the tree helpers the enumeration needs
//! (tree test, Prüfer code and its inverse).
use thiserror::Error;

/// Errors raised while building or interpreting a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge ({0}, {1}) mentions a vertex outside 0..{2}")]
    VertexOutOfRange(usize, usize, usize),

    #[error("self-loop at vertex {0}")]
    SelfLoop(usize),

    #[error("duplicate edge ({0}, {1})")]
    DuplicateEdge(usize, usize),

    #[error("graph with {vertices} vertices and {edges} edges is not a tree")]
    NotATree { vertices: usize, edges: usize },

    #[error("invalid Prüfer sequence: entry {entry} is not below {vertices}")]
    InvalidPrufer { entry: usize, vertices: usize },
}

/// An immutable undirected graph. Edges are stored as `(u, v)` with `u < v`, in the order
/// they were given.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Graph {
    vertices: usize,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    pub fn new(
        vertices: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, GraphError> {
        let mut normalized: Vec<(usize, usize)> = Vec::new();
        for (u, v) in edges {
            if u >= vertices || v >= vertices {
                return Err(GraphError::VertexOutOfRange(u, v, vertices));
            }
            if u == v {
                return Err(GraphError::SelfLoop(u));
            }
            let edge = (u.min(v), u.max(v));
            if normalized.contains(&edge) {
                return Err(GraphError::DuplicateEdge(edge.0, edge.1));
            }
            normalized.push(edge);
        }

        Ok(Graph {
            vertices,
            edges: normalized,
        })
    }

    /// The graph with no vertices.
    pub fn empty() -> Self {
        Graph {
            vertices: 0,
            edges: vec![],
        }
    }

    /// `n` vertices, no edges.
    pub fn edgeless(vertices: usize) -> Self {
        Graph {
            vertices,
            edges: vec![],
        }
    }

    /// The path `0 - 1 - ... - (n-1)`.
    pub fn path(vertices: usize) -> Self {
        Graph {
            vertices,
            edges: (1..vertices).map(|v| (v - 1, v)).collect(),
        }
    }

    /// The star with centre `0` and leaves `1..n`.
    pub fn star(vertices: usize) -> Self {
        Graph {
            vertices,
            edges: (1..vertices).map(|v| (0, v)).collect(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.vertices == 0
    }

    /// Adjacency lists, neighbours in ascending order.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.vertices];
        for &(u, v) in &self.edges {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
        }
        adjacency
    }

    /// Connected with exactly `n - 1` edges. The empty graph is not a tree.
    pub fn is_tree(&self) -> bool {
        if self.vertices == 0 || self.edges.len() + 1 != self.vertices {
            return false;
        }

        let adjacency = self.adjacency();
        let mut seen = vec![false; self.vertices];
        let mut stack = vec![0];
        seen[0] = true;
        let mut reached = 1;
        while let Some(v) = stack.pop() {
            for &w in &adjacency[v] {
                if !seen[w] {
                    seen[w] = true;
                    reached += 1;
                    stack.push(w);
                }
            }
        }
        reached == self.vertices
    }

    /// Prüfer sequence of a labelled tree: repeatedly delete the smallest leaf and record its
    /// neighbour, until two vertices remain.
    pub fn prufer_code(&self) -> Result<Vec<usize>, GraphError> {
        if !self.is_tree() {
            return Err(GraphError::NotATree {
                vertices: self.vertices,
                edges: self.edges.len(),
            });
        }

        let mut adjacency = self.adjacency();
        let mut degree: Vec<usize> = adjacency.iter().map(Vec::len).collect();
        let mut removed = vec![false; self.vertices];
        let mut code = Vec::with_capacity(self.vertices.saturating_sub(2));

        for _ in 0..self.vertices.saturating_sub(2) {
            // n is bounded by the output alphabet, a linear scan is fine
            let leaf = (0..self.vertices)
                .find(|&v| !removed[v] && degree[v] == 1)
                .ok_or(GraphError::NotATree {
                    vertices: self.vertices,
                    edges: self.edges.len(),
                })?;
            let parent = adjacency[leaf]
                .iter()
                .copied()
                .find(|&w| !removed[w])
                .ok_or(GraphError::NotATree {
                    vertices: self.vertices,
                    edges: self.edges.len(),
                })?;

            code.push(parent);
            removed[leaf] = true;
            degree[parent] -= 1;
            adjacency[parent].retain(|&w| w != leaf);
        }

        Ok(code)
    }

    /// Inverse of [`Graph::prufer_code`]: the labelled tree on `code.len() + 2` vertices.
    pub fn from_prufer(code: &[usize]) -> Result<Self, GraphError> {
        let vertices = code.len() + 2;
        if let Some(&entry) = code.iter().find(|&&x| x >= vertices) {
            return Err(GraphError::InvalidPrufer { entry, vertices });
        }

        let mut degree = vec![1usize; vertices];
        for &x in code {
            degree[x] += 1;
        }

        let mut edges = Vec::with_capacity(vertices - 1);
        for &x in code {
            let leaf = (0..vertices)
                .find(|&v| degree[v] == 1)
                .ok_or(GraphError::InvalidPrufer { entry: x, vertices })?;
            edges.push((leaf, x));
            degree[leaf] = 0;
            degree[x] -= 1;
        }

        let last: Vec<usize> = (0..vertices).filter(|&v| degree[v] == 1).collect();
        if let [u, v] = last[..] {
            edges.push((u, v));
        }

        Graph::new(vertices, edges)
    }
}
