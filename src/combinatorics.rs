//! Integer partitions, multiset arrangements and exact sums of reciprocals.
use crate::permutation::next_permutation;

/// Partitions of `total` into exactly `parts` positive parts, each nonincreasing, in
/// reverse lexicographic order.
pub fn partitions(total: u32, parts: usize) -> Vec<Vec<u32>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(parts);
    extend_partitions(total, parts, total, &mut current, &mut out);
    out
}

fn extend_partitions(
    remaining: u32,
    parts: usize,
    largest: u32,
    current: &mut Vec<u32>,
    out: &mut Vec<Vec<u32>>,
) {
    if parts == 0 {
        if remaining == 0 {
            out.push(current.clone());
        }
        return;
    }

    // the other parts - 1 parts need at least 1 each
    let Some(spare) = remaining.checked_sub(parts as u32 - 1) else {
        return;
    };
    for part in (1..=largest.min(spare)).rev() {
        // the remaining parts are no larger than this one
        if u64::from(part) * (parts as u64) < u64::from(remaining) {
            break;
        }
        current.push(part);
        extend_partitions(remaining - part, parts - 1, part, current, out);
        current.pop();
    }
}

/// Every distinct ordering of a multiset, lexicographically.
pub fn arrangements(items: &[u32]) -> Vec<Vec<u32>> {
    let mut current = items.to_vec();
    current.sort_unstable();
    let mut out = vec![current.clone()];
    while next_permutation(&mut current) {
        out.push(current.clone());
    }
    out
}

/// `sum(1 / d)` over `denominators` as a reduced fraction `(numerator, denominator)`.
/// `None` on overflow or a zero denominator.
pub fn reciprocal_sum(denominators: impl IntoIterator<Item = u128>) -> Option<(u128, u128)> {
    let (mut num, mut den) = (0u128, 1u128);
    for d in denominators {
        if d == 0 {
            return None;
        }
        // num/den + 1/d = (num * d + den) / (den * d), reduced via the lcm
        let g = gcd(den, d);
        let scale = d / g;
        num = num.checked_mul(scale)?.checked_add(den / g)?;
        den = den.checked_mul(scale)?;
        let r = gcd(num, den);
        num /= r;
        den /= r;
    }
    Some((num, den))
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions() {
        assert_eq!(partitions(5, 2), vec![vec![4, 1], vec![3, 2]]);
        assert_eq!(partitions(4, 4), vec![vec![1, 1, 1, 1]]);
        assert_eq!(
            partitions(6, 3),
            vec![vec![4, 1, 1], vec![3, 2, 1], vec![2, 2, 2]]
        );
        assert_eq!(partitions(3, 1), vec![vec![3]]);
        assert!(partitions(2, 3).is_empty());
        assert!(partitions(2, 0).is_empty());
        assert_eq!(partitions(0, 0), vec![Vec::<u32>::new()]);
    }

    #[test]
    fn test_partition_counts() {
        // p(10) = 42, split by number of parts
        let total: usize = (1..=10).map(|k| partitions(10, k).len()).sum();
        assert_eq!(total, 42);
    }

    #[test]
    fn test_arrangements() {
        assert_eq!(
            arrangements(&[2, 1, 1]),
            vec![vec![1, 1, 2], vec![1, 2, 1], vec![2, 1, 1]]
        );
        assert_eq!(arrangements(&[3, 2, 1]).len(), 6);
        assert_eq!(arrangements(&[]), vec![Vec::<u32>::new()]);
    }

    #[test]
    fn test_reciprocal_sum() {
        assert_eq!(reciprocal_sum([1, 2, 2]), Some((2, 1)));
        assert_eq!(reciprocal_sum([2, 3]), Some((5, 6)));
        assert_eq!(reciprocal_sum([]), Some((0, 1)));
        assert_eq!(reciprocal_sum([4, 0]), None);
    }
}
