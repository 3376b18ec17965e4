use std::ops::Deref;

/// A bijection of `0..n`, stored as its image list: `i` maps to `self[i]`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn new(values: impl IntoIterator<Item = usize>) -> Option<Self> {
        let vec: Vec<usize> = values.into_iter().collect();

        if vec.is_empty() {
            return Some(Self(vec));
        }

        let n = vec.len();
        let mut seen = vec![false; n];

        for &value in &vec {
            if value >= n || seen[value] {
                return None;
            }
            seen[value] = true;
        }

        if seen.iter().all(|&x| x) {
            Some(Self(vec))
        } else {
            None
        }
    }

    pub fn identity(size: usize) -> Self {
        Self((0..size).collect())
    }

    /// Every permutation of `0..size`, in lexicographic order.
    pub fn all(size: usize) -> impl Iterator<Item = Permutation> {
        let mut next = Some((0..size).collect::<Vec<usize>>());
        std::iter::from_fn(move || {
            let current = next.take()?;
            let mut successor = current.clone();
            if next_permutation(&mut successor) {
                next = Some(successor);
            }
            Some(Permutation(current))
        })
    }
}

impl Deref for Permutation {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

/// Rearrange into the lexicographically next permutation; `false` (and unchanged) at the
/// last one.
pub(crate) fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    let Some(pivot) = items.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let Some(swap) = items.iter().rposition(|x| *x > items[pivot]) else {
        return false;
    };
    items.swap(pivot, swap);
    items[pivot + 1..].reverse();
    true
}
