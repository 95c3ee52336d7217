use serde::Serialize;

use crate::config::Strategy;
use crate::dp;
use crate::ledger::DemandLedger;
use crate::weld::WeldSearch;

/// A piece cut from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Piece {
    /// A full demanded length.
    Whole { length: u32 },
    /// First half of a welded piece; the rest is owed as a partner segment.
    Segment { demand_length: u32, length: u32 },
    /// Closes a partner segment opened by an earlier split.
    Partner { demand_length: u32, length: u32 },
}

impl Piece {
    pub fn length(&self) -> u32 {
        match *self {
            Piece::Whole { length }
            | Piece::Segment { length, .. }
            | Piece::Partner { length, .. } => length,
        }
    }
}

/// Pieces chosen for one source, in cutting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub pieces: Vec<Piece>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn lengths(&self) -> Vec<u32> {
        self.pieces.iter().map(Piece::length).collect()
    }

    pub fn total(&self) -> u64 {
        self.pieces.iter().map(|p| p.length() as u64).sum()
    }
}

impl Strategy {
    /// Best cuts for a source of `source_length` against the live demand.
    pub fn select(&self, source_length: u32, ledger: &DemandLedger) -> Selection {
        match *self {
            Strategy::Scrap => Selection {
                pieces: dp::best_fill(source_length, ledger.orders()),
            },
            Strategy::Weld {
                cost,
                search_budget,
            } => WeldSearch::new(cost, search_budget).select(source_length, ledger),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostModel;
    use crate::types::DemandItem;

    #[test]
    fn test_selection_lengths_and_total() {
        let selection = Selection {
            pieces: vec![
                Piece::Whole { length: 5000 },
                Piece::Segment {
                    demand_length: 6400,
                    length: 3900,
                },
                Piece::Partner {
                    demand_length: 4000,
                    length: 1100,
                },
            ],
        };
        assert_eq!(selection.lengths(), vec![5000, 3900, 1100]);
        assert_eq!(selection.total(), 10000);
    }

    #[test]
    fn test_strategies_agree_without_weld_pressure() {
        let ledger = DemandLedger::new(&[
            DemandItem::new(5000, 1),
            DemandItem::new(3000, 1),
            DemandItem::new(2000, 1),
        ]);
        let scrap = Strategy::Scrap.select(12000, &ledger);
        let weld = Strategy::weld(CostModel::default()).select(12000, &ledger);
        assert_eq!(scrap.lengths(), vec![5000, 3000, 2000]);
        assert_eq!(weld.total(), scrap.total());
    }
}
