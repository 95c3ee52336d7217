use serde::{Deserialize, Serialize};

use crate::types::StockLot;

/// Which stock length is consumed first. Applied to the leftover pool as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockOrder {
    /// Shortest bars first, keeping long bars for long pieces.
    #[default]
    Ascending,
    Descending,
}

impl StockOrder {
    /// Stable-sorted copy of `lots` without the zero-quantity ones.
    pub fn order_lots(self, lots: &[StockLot]) -> Vec<StockLot> {
        let mut ordered: Vec<StockLot> = lots.iter().copied().filter(|l| l.quantity > 0).collect();
        match self {
            StockOrder::Ascending => ordered.sort_by(|a, b| a.length.cmp(&b.length)),
            StockOrder::Descending => ordered.sort_by(|a, b| b.length.cmp(&a.length)),
        }
        ordered
    }

    pub fn order_lengths(self, lengths: &mut [u32]) {
        match self {
            StockOrder::Ascending => lengths.sort(),
            StockOrder::Descending => lengths.sort_by(|a, b| b.cmp(a)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(lots: &[StockLot]) -> Vec<u32> {
        lots.iter().map(|l| l.length).collect()
    }

    #[test]
    fn test_ascending_lots() {
        let lots = vec![StockLot::new(12000, 2), StockLot::new(6000, 1), StockLot::new(9000, 4)];
        let ordered = StockOrder::Ascending.order_lots(&lots);
        assert_eq!(lengths(&ordered), vec![6000, 9000, 12000]);
    }

    #[test]
    fn test_descending_lots() {
        let lots = vec![StockLot::new(6000, 1), StockLot::new(12000, 2), StockLot::new(9000, 4)];
        let ordered = StockOrder::Descending.order_lots(&lots);
        assert_eq!(lengths(&ordered), vec![12000, 9000, 6000]);
    }

    #[test]
    fn test_zero_quantity_lots_dropped() {
        let lots = vec![StockLot::new(6000, 0), StockLot::new(12000, 1)];
        let ordered = StockOrder::Ascending.order_lots(&lots);
        assert_eq!(ordered, vec![StockLot::new(12000, 1)]);
    }

    #[test]
    fn test_equal_lengths_keep_input_order() {
        let lots = vec![StockLot::new(6000, 3), StockLot::new(6000, 1)];
        let ordered = StockOrder::Descending.order_lots(&lots);
        assert_eq!(ordered, lots);
    }

    #[test]
    fn test_order_lengths() {
        let mut pool = vec![300, 3000, 1200];
        StockOrder::Descending.order_lengths(&mut pool);
        assert_eq!(pool, vec![3000, 1200, 300]);
        StockOrder::Ascending.order_lengths(&mut pool);
        assert_eq!(pool, vec![300, 1200, 3000]);
    }

    #[test]
    fn test_caller_lots_untouched() {
        let lots = vec![StockLot::new(9000, 1), StockLot::new(6000, 1)];
        let _ = StockOrder::Ascending.order_lots(&lots);
        assert_eq!(lengths(&lots), vec![9000, 6000]);
    }
}
