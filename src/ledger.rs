use crate::error::{PlanError, Result};
use crate::selector::Piece;
use crate::types::{DemandItem, PartnerSegment};

/// Remaining demand for one planning run.
///
/// Orders are kept longest first. Lengths are expected to be unique; when
/// they are not, only the first matching entry is drawn down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandLedger {
    orders: Vec<DemandItem>,
    partners: Vec<PartnerSegment>,
}

impl DemandLedger {
    /// Copies `demand`, dropping zero quantities.
    pub fn new(demand: &[DemandItem]) -> Self {
        let mut orders: Vec<DemandItem> = demand.iter().copied().filter(|d| d.quantity > 0).collect();
        orders.sort_by(|a, b| b.length.cmp(&a.length));
        Self {
            orders,
            partners: Vec::new(),
        }
    }

    pub fn orders(&self) -> &[DemandItem] {
        &self.orders
    }

    /// Open second halves of split pieces.
    pub fn partners(&self) -> &[PartnerSegment] {
        &self.partners
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.partners.is_empty()
    }

    /// Draws the pieces of one selection down from the ledger, in order.
    pub fn consume(&mut self, pieces: &[Piece]) -> Result<()> {
        for piece in pieces {
            match *piece {
                Piece::Whole { length } => self.take_order(length)?,
                Piece::Segment {
                    demand_length,
                    length,
                } => {
                    if length == 0 || length >= demand_length {
                        return Err(PlanError::Invariant(format!(
                            "segment {} cannot be part of a {} piece",
                            length, demand_length
                        )));
                    }
                    self.take_order(demand_length)?;
                    self.partners.push(PartnerSegment {
                        demand_length,
                        length: demand_length - length,
                    });
                }
                Piece::Partner {
                    demand_length,
                    length,
                } => {
                    let idx = self
                        .partners
                        .iter()
                        .position(|p| p.demand_length == demand_length && p.length == length)
                        .ok_or_else(|| {
                            PlanError::Invariant(format!(
                                "no open segment {} for a {} piece",
                                length, demand_length
                            ))
                        })?;
                    self.partners.remove(idx);
                }
            }
        }
        Ok(())
    }

    fn take_order(&mut self, length: u32) -> Result<()> {
        let idx = self
            .orders
            .iter()
            .position(|o| o.length == length)
            .ok_or_else(|| PlanError::Invariant(format!("no live demand for length {}", length)))?;
        if self.orders[idx].quantity > 1 {
            self.orders[idx].quantity -= 1;
        } else {
            self.orders.remove(idx);
        }
        Ok(())
    }

    pub fn into_unmet(self) -> (Vec<DemandItem>, Vec<PartnerSegment>) {
        (self.orders, self.partners)
    }
}
