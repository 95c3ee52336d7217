//! Scrap-minimizing selection for a single source.
//!
//! Bounded knapsack over the live demand: the fill with the largest total
//! wins, ties go to the fill with fewer pieces. Each length is capped at its
//! remaining quantity, so a source never receives more pieces of a length
//! than are still demanded.

use crate::selector::Piece;
use crate::types::DemandItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Fill {
    used: usize,
    pieces: u32,
}

impl Fill {
    fn beats(&self, other: &Fill) -> bool {
        self.used > other.used || (self.used == other.used && self.pieces < other.pieces)
    }
}

/// Up to `count` units of one demand item, packed as a single 0/1 choice.
#[derive(Debug, Clone, Copy)]
struct Bundle {
    item: usize,
    count: u32,
    width: usize,
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Splits each item's usable quantity into power-of-two bundles.
fn bundles(live: &[DemandItem], unit: u32, source_length: u32) -> Vec<Bundle> {
    let mut bundles = Vec::new();
    for (item, d) in live.iter().enumerate() {
        let width = (d.length / unit) as usize;
        let mut left = d.quantity.min(source_length / d.length);
        let mut size = 1u32;
        while left > 0 {
            let count = size.min(left);
            bundles.push(Bundle {
                item,
                count,
                width: width * count as usize,
            });
            left -= count;
            size = size.saturating_mul(2);
        }
    }
    bundles
}

/// Best whole pieces to cut from `source_length`, longest first.
///
/// `demand` is expected in descending length order, as the ledger keeps it.
/// Returns an empty list when no live length fits.
pub fn best_fill(source_length: u32, demand: &[DemandItem]) -> Vec<Piece> {
    let live: Vec<DemandItem> = demand
        .iter()
        .copied()
        .filter(|d| d.quantity > 0 && d.length > 0 && d.length <= source_length)
        .collect();
    if live.is_empty() {
        return Vec::new();
    }

    // Scale by the common divisor of the lengths; exact, and keeps the table
    // small for lengths in round millimetres.
    let unit = live.iter().fold(0, |g, d| gcd(g, d.length));
    let capacity = (source_length / unit) as usize;
    let bundles = bundles(&live, unit, source_length);

    let mut best = vec![Fill::default(); capacity + 1];
    let mut taken = vec![vec![false; capacity + 1]; bundles.len()];

    for (b, bundle) in bundles.iter().enumerate() {
        for j in (bundle.width..=capacity).rev() {
            let prev = best[j - bundle.width];
            let candidate = Fill {
                used: prev.used + bundle.width,
                pieces: prev.pieces + bundle.count,
            };
            if candidate.beats(&best[j]) {
                best[j] = candidate;
                taken[b][j] = true;
            }
        }
    }

    let mut counts = vec![0u32; live.len()];
    let mut j = capacity;
    for (b, bundle) in bundles.iter().enumerate().rev() {
        if taken[b][j] {
            counts[bundle.item] += bundle.count;
            j -= bundle.width;
        }
    }

    live.iter()
        .zip(counts)
        .flat_map(|(d, count)| std::iter::repeat_n(Piece::Whole { length: d.length }, count as usize))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(pieces: &[Piece]) -> Vec<u32> {
        pieces.iter().map(Piece::length).collect()
    }

    fn demand(items: &[(u32, u32)]) -> Vec<DemandItem> {
        items.iter().map(|&(l, q)| DemandItem::new(l, q)).collect()
    }

    #[test]
    fn test_exact_fill() {
        let d = demand(&[(5000, 1), (3000, 1), (2000, 1)]);
        assert_eq!(lengths(&best_fill(12000, &d)), vec![5000, 3000, 2000]);
    }

    #[test]
    fn test_larger_single_piece_wins() {
        // 6 + 5 = 11 does not fit, 6 alone uses more than 5 alone
        let d = demand(&[(6, 1), (5, 1)]);
        assert_eq!(lengths(&best_fill(10, &d)), vec![6]);
    }

    #[test]
    fn test_quantity_caps_repeats() {
        // Unbounded recurrence would pick [3, 3, 3]
        let d = demand(&[(3, 1)]);
        assert_eq!(lengths(&best_fill(10, &d)), vec![3]);

        let d = demand(&[(3, 2), (2, 5)]);
        let pieces = lengths(&best_fill(10, &d));
        assert_eq!(pieces.iter().sum::<u32>(), 10);
        assert!(pieces.iter().filter(|&&p| p == 3).count() <= 2);
        assert!(pieces.iter().filter(|&&p| p == 2).count() <= 5);
    }

    #[test]
    fn test_fewer_pieces_on_tie() {
        let d = demand(&[(10, 1), (5, 2)]);
        assert_eq!(lengths(&best_fill(10, &d)), vec![10]);
    }

    #[test]
    fn test_nothing_fits() {
        let d = demand(&[(5000, 2)]);
        assert!(best_fill(4000, &d).is_empty());
        assert!(best_fill(4000, &[]).is_empty());
    }

    #[test]
    fn test_zero_quantity_ignored() {
        let d = demand(&[(6000, 0), (4000, 1)]);
        assert_eq!(lengths(&best_fill(6000, &d)), vec![4000]);
    }

    #[test]
    fn test_many_units_of_one_length() {
        // 12000 / 250 = 48, capped by the 30 still demanded
        let d = demand(&[(250, 30)]);
        let pieces = best_fill(12000, &d);
        assert_eq!(pieces.len(), 30);
    }

    #[test]
    fn test_coprime_lengths() {
        let d = demand(&[(7, 3), (5, 3)]);
        let pieces = lengths(&best_fill(24, &d));
        // 7 + 7 + 5 + 5 = 24
        assert_eq!(pieces, vec![7, 7, 5, 5]);
    }

    #[test]
    fn test_uses_material_over_piece_count() {
        let d = demand(&[(9000, 1), (4000, 3)]);
        // 4000 x3 = 12000 beats 9000 alone
        assert_eq!(lengths(&best_fill(12000, &d)), vec![4000, 4000, 4000]);
    }
}
