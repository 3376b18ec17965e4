//! Canonical codes for colored forests.
//!
//! Each tree is rooted at its centre (or its central edge), and encoded bottom-up with the
//! children of every vertex sorted by code. Isomorphic colored trees get identical codes.
//! Automorphisms only permute children with equal codes, so the group order is the product of
//! the children's orders times the factorial of each run of equal child codes; a bicentral
//! tree doubles when both halves agree, and identical components of a forest multiply in the
//! same way.
use super::{CanonicalForm, CanonicalOracle, OracleError, Symbol};
use super::{times_factorial, times_run_factorials};
use crate::colored::{ColoredGraph, EdgeLabel};

/// Oracle for colored graphs whose non-loop edges form a forest. Anything else is rejected
/// with [`OracleError::NotAForest`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ForestOracle;

impl CanonicalOracle for ForestOracle {
    fn canonical_form(&self, graph: &ColoredGraph) -> Result<CanonicalForm, OracleError> {
        let (code, _) = Forest::new(graph)?.encode()?;
        Ok(CanonicalForm::new(code))
    }

    fn automorphism_group_order(&self, graph: &ColoredGraph) -> Result<u128, OracleError> {
        let (_, order) = Forest::new(graph)?.encode()?;
        Ok(order)
    }
}

/// A code together with the automorphism order of what it encodes.
type Encoded = (Vec<Symbol>, u128);

struct Forest {
    loops: Vec<Vec<EdgeLabel>>,
    neighbours: Vec<Vec<(usize, EdgeLabel)>>,
}

impl Forest {
    fn new(graph: &ColoredGraph) -> Result<Self, OracleError> {
        if !graph.is_well_formed() {
            return Err(OracleError::Malformed);
        }

        let n = graph.num_vertices();
        let mut parent: Vec<usize> = (0..n).collect();
        for (u, v, _) in graph.labelled_edges() {
            if u == v {
                continue;
            }
            let (a, b) = (find(&mut parent, u), find(&mut parent, v));
            if a == b {
                return Err(OracleError::NotAForest(u, v));
            }
            parent[a] = b;
        }

        Ok(Forest {
            loops: graph.loop_labels(),
            neighbours: graph.neighbours(),
        })
    }

    fn encode(&self) -> Result<Encoded, OracleError> {
        let mut components = self
            .components()
            .iter()
            .map(|component| self.encode_component(component))
            .collect::<Result<Vec<_>, _>>()?;
        components.sort_by(|a, b| a.0.cmp(&b.0));

        let mut order: u128 = 1;
        for (_, component_order) in &components {
            order = order
                .checked_mul(*component_order)
                .ok_or(OracleError::Overflow)?;
        }
        let codes: Vec<&Vec<Symbol>> = components.iter().map(|(code, _)| code).collect();
        let order = times_run_factorials(order, &codes)?;

        let mut code = vec![Symbol::Vertices(self.loops.len())];
        for (component_code, _) in components {
            code.extend(component_code);
        }
        Ok((code, order))
    }

    fn components(&self) -> Vec<Vec<usize>> {
        let n = self.loops.len();
        let mut seen = vec![false; n];
        let mut components = Vec::new();

        for start in 0..n {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut component = vec![start];
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                for &(w, _) in &self.neighbours[v] {
                    if !seen[w] {
                        seen[w] = true;
                        component.push(w);
                        stack.push(w);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }

        components
    }

    /// The one or two vertices left after repeatedly stripping all leaves.
    fn centres(&self, component: &[usize]) -> Vec<usize> {
        let mut degree: Vec<usize> = self.neighbours.iter().map(Vec::len).collect();
        let mut removed = vec![false; self.loops.len()];
        let mut remaining = component.len();
        let mut layer: Vec<usize> = component
            .iter()
            .copied()
            .filter(|&v| degree[v] <= 1)
            .collect();

        while remaining > 2 {
            remaining -= layer.len();
            let mut next = Vec::new();
            for &leaf in &layer {
                removed[leaf] = true;
            }
            for &leaf in &layer {
                for &(w, _) in &self.neighbours[leaf] {
                    if !removed[w] {
                        degree[w] -= 1;
                        if degree[w] == 1 {
                            next.push(w);
                        }
                    }
                }
            }
            layer = next;
        }

        component
            .iter()
            .copied()
            .filter(|&v| !removed[v])
            .collect()
    }

    fn encode_component(&self, component: &[usize]) -> Result<Encoded, OracleError> {
        let centres = self.centres(component);
        match centres[..] {
            [centre] => {
                let (code, order) = self.encode_rooted(centre, None)?;
                let mut symbols = vec![Symbol::Centre];
                symbols.extend(code);
                Ok((symbols, order))
            }
            [a, b] => {
                let label = self.neighbours[a]
                    .iter()
                    .find(|(w, _)| *w == b)
                    .map(|(_, label)| *label)
                    .ok_or(OracleError::Malformed)?;
                let mut halves = [
                    self.encode_rooted(a, Some(b))?,
                    self.encode_rooted(b, Some(a))?,
                ];
                halves.sort_by(|x, y| x.0.cmp(&y.0));
                let [(low, low_order), (high, high_order)] = halves;

                let mut order = low_order
                    .checked_mul(high_order)
                    .ok_or(OracleError::Overflow)?;
                if low == high {
                    order = times_factorial(order, 2)?;
                }

                let mut symbols = vec![Symbol::Bicentre, Symbol::Edge(label)];
                symbols.extend(low);
                symbols.extend(high);
                Ok((symbols, order))
            }
            _ => Err(OracleError::Malformed),
        }
    }

    fn encode_rooted(&self, v: usize, parent: Option<usize>) -> Result<Encoded, OracleError> {
        let mut children: Vec<Encoded> = Vec::new();
        for &(w, label) in &self.neighbours[v] {
            if Some(w) == parent {
                continue;
            }
            let (code, order) = self.encode_rooted(w, Some(v))?;
            let mut symbols = vec![Symbol::Edge(label)];
            symbols.extend(code);
            children.push((symbols, order));
        }
        children.sort_by(|a, b| a.0.cmp(&b.0));

        let mut order: u128 = 1;
        for (_, child_order) in &children {
            order = order.checked_mul(*child_order).ok_or(OracleError::Overflow)?;
        }
        let codes: Vec<&Vec<Symbol>> = children.iter().map(|(code, _)| code).collect();
        let order = times_run_factorials(order, &codes)?;

        let mut code = vec![Symbol::Open];
        code.extend(self.loops[v].iter().map(|&label| Symbol::Loop(label)));
        for (child, _) in children {
            code.extend(child);
        }
        code.push(Symbol::Close);
        Ok((code, order))
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}
