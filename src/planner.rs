use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::ledger::DemandLedger;
use crate::selector::Piece;
use crate::types::{CutPlanEntry, DemandItem, Plan, SourceKind, StockLot, WeldJoin};

pub struct Planner {
    config: PlannerConfig,
}

/// Where the uncut remainder of a source ends up.
enum Remainder {
    Pool,
    Scrap,
}

enum SourceOutcome {
    /// Nothing fits; the whole source is left over.
    Unusable,
    Cut { offcut: u32 },
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Plans cuts for `demand` out of `stock`. Neither slice is modified.
    ///
    /// Stock is drawn bar by bar in the configured order until demand runs
    /// out, then the collected offcuts get one reuse pass. Demand that could
    /// not be met is reported in the plan rather than as an error.
    ///
    /// Work and output size grow with the number of bars drawn; callers
    /// facing untrusted input should cap total stock quantity.
    pub fn plan(&self, stock: &[StockLot], demand: &[DemandItem]) -> Result<Plan> {
        self.config.validate()?;
        validate_lengths(stock, demand)?;

        let mut ledger = DemandLedger::new(demand);
        let mut plan = Plan::default();
        let mut pool: Vec<u32> = Vec::new();

        for lot in self.config.order.order_lots(stock) {
            let mut drawn = 0;
            while drawn < lot.quantity && !ledger.is_empty() {
                plan.stock_consumed += lot.length as u64;
                let remainder = match self.cut_source(lot.length, SourceKind::Stock, &mut ledger, &mut plan)? {
                    SourceOutcome::Unusable => lot.length,
                    SourceOutcome::Cut { offcut } => offcut,
                };
                if remainder > 0 {
                    match self.route(remainder) {
                        Remainder::Pool => pool.push(remainder),
                        Remainder::Scrap => plan.scrap.push(remainder),
                    }
                }
                drawn += 1;
            }
            if drawn < lot.quantity {
                plan.unused_stock.push(StockLot::new(lot.length, lot.quantity - drawn));
            }
        }

        plan.leftover = if ledger.is_empty() {
            pool
        } else {
            self.reuse_leftovers(pool, &mut ledger, &mut plan)?
        };

        let (unmet, unmet_segments) = ledger.into_unmet();
        plan.unmet = unmet;
        plan.unmet_segments = unmet_segments;

        tracing::info!(
            entries = plan.entries.len(),
            cuts = plan.cut_count,
            welds = plan.weld_count(),
            leftover = plan.leftover.len(),
            unmet = plan.unmet.len() + plan.unmet_segments.len(),
            "cutting plan built"
        );
        Ok(plan)
    }

    /// Offers each pooled offcut as a source, once. Offcuts nothing fits
    /// into are kept as they are.
    fn reuse_leftovers(&self, mut pool: Vec<u32>, ledger: &mut DemandLedger, plan: &mut Plan) -> Result<Vec<u32>> {
        self.config.order.order_lengths(&mut pool);
        tracing::debug!(pool = ?pool, "reusing leftovers");

        let mut kept = Vec::with_capacity(pool.len());
        for length in pool {
            if ledger.is_empty() {
                kept.push(length);
                continue;
            }
            match self.cut_source(length, SourceKind::Leftover, ledger, plan)? {
                SourceOutcome::Unusable => kept.push(length),
                SourceOutcome::Cut { offcut: 0 } => {}
                SourceOutcome::Cut { offcut } => match self.route(offcut) {
                    Remainder::Pool => kept.push(offcut),
                    Remainder::Scrap => plan.scrap.push(offcut),
                },
            }
        }
        Ok(kept)
    }

    /// Cuts one source against the ledger and records the entry.
    fn cut_source(
        &self,
        source_length: u32,
        source: SourceKind,
        ledger: &mut DemandLedger,
        plan: &mut Plan,
    ) -> Result<SourceOutcome> {
        let selection = self.config.strategy.select(source_length, ledger);
        if selection.is_empty() {
            tracing::debug!(source_length, ?source, "no cut fits source");
            return Ok(SourceOutcome::Unusable);
        }

        let entry = CutPlanEntry::new(source_length, source, selection.lengths())?;
        ledger.consume(&selection.pieces)?;

        for piece in &selection.pieces {
            if let Piece::Segment {
                demand_length,
                length,
            } = *piece
            {
                plan.welds.push(WeldJoin {
                    demand_length,
                    first_segment: length,
                    second_segment: demand_length - length,
                });
            }
        }

        plan.cut_count += entry.cuts.len() as u32 - 1;
        let offcut = entry.offcut();
        tracing::debug!(source_length, ?source, cuts = ?entry.cuts, offcut, "source cut");
        plan.entries.push(entry);

        Ok(SourceOutcome::Cut { offcut })
    }

    fn route(&self, remainder: u32) -> Remainder {
        if remainder >= self.config.strategy.reuse_threshold() {
            Remainder::Pool
        } else {
            Remainder::Scrap
        }
    }
}

fn validate_lengths(stock: &[StockLot], demand: &[DemandItem]) -> Result<()> {
    if let Some(i) = stock.iter().position(|s| s.length == 0) {
        return Err(PlanError::InvalidInput(format!(
            "stock lot {} has zero length",
            i + 1
        )));
    }
    if let Some(i) = demand.iter().position(|d| d.length == 0) {
        return Err(PlanError::InvalidInput(format!(
            "demand item {} has zero length",
            i + 1
        )));
    }
    Ok(())
}
