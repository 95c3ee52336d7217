//! Weld-aware selection for a single source.
//!
//! Recursive search over the live demand where every step either cuts a
//! whole piece or splits a piece into a segment cut here plus a partner
//! segment owed later, paying one weld. Outcomes are compared by scrap
//! length plus welds priced in scrap length (`beta / alpha`), and a change
//! is only taken on strict improvement.
//!
//! The search is bounded by a node budget and a depth cap. When either runs
//! out, the rest of the source is filled greedily with whole pieces, so
//! results are heuristic.

use crate::config::CostModel;
use crate::ledger::DemandLedger;
use crate::selector::{Piece, Selection};

const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy)]
struct SearchItem {
    length: u32,
    quantity: u32,
    /// Set for partner segments: the demanded length they complete.
    partner_of: Option<u32>,
}

impl SearchItem {
    fn piece(&self) -> Piece {
        match self.partner_of {
            Some(demand_length) => Piece::Partner {
                demand_length,
                length: self.length,
            },
            None => Piece::Whole {
                length: self.length,
            },
        }
    }
}

#[derive(Debug, Clone)]
struct Outcome {
    pieces: Vec<Piece>,
    leftover: u32,
    welds: u32,
}

impl Outcome {
    fn idle(remaining: u32) -> Self {
        Self {
            pieces: Vec::new(),
            leftover: remaining,
            welds: 0,
        }
    }

    /// Whole pieces, first item first, as many as demand and length allow.
    fn greedy(mut remaining: u32, items: &[SearchItem]) -> Self {
        let mut pieces = Vec::new();
        for item in items {
            if item.quantity == 0 || item.length > remaining {
                continue;
            }
            let count = item.quantity.min(remaining / item.length);
            pieces.extend(std::iter::repeat_n(item.piece(), count as usize));
            remaining -= count * item.length;
        }
        Self {
            pieces,
            leftover: remaining,
            welds: 0,
        }
    }

    fn cost(&self, weld_penalty: f64) -> f64 {
        self.leftover as f64 + self.welds as f64 * weld_penalty
    }

    fn after(piece: Piece, rest: Outcome, extra_welds: u32) -> Self {
        let mut pieces = Vec::with_capacity(rest.pieces.len() + 1);
        pieces.push(piece);
        pieces.extend(rest.pieces);
        Self {
            pieces,
            leftover: rest.leftover,
            welds: rest.welds + extra_welds,
        }
    }
}

pub struct WeldSearch {
    cost: CostModel,
    budget: usize,
}

impl WeldSearch {
    pub fn new(cost: CostModel, budget: usize) -> Self {
        Self { cost, budget }
    }

    pub fn select(&self, source_length: u32, ledger: &DemandLedger) -> Selection {
        let mut items: Vec<SearchItem> = ledger
            .orders()
            .iter()
            .map(|o| SearchItem {
                length: o.length,
                quantity: o.quantity,
                partner_of: None,
            })
            .chain(ledger.partners().iter().map(|p| SearchItem {
                length: p.length,
                quantity: 1,
                partner_of: Some(p.demand_length),
            }))
            .collect();

        let mut nodes = 0;
        let outcome = self.search(source_length, &mut items, 0, 0, &mut nodes);
        if nodes > self.budget {
            tracing::debug!(source_length, budget = self.budget, "weld search budget exhausted");
        }
        Selection {
            pieces: outcome.pieces,
        }
    }

    /// Whole pieces are only taken from `start` onwards so each multiset is
    /// visited once; splits may pick any order item.
    fn search(
        &self,
        remaining: u32,
        items: &mut Vec<SearchItem>,
        start: usize,
        depth: usize,
        nodes: &mut usize,
    ) -> Outcome {
        *nodes += 1;
        if items.iter().all(|i| i.quantity == 0) {
            return Outcome::idle(remaining);
        }
        if *nodes > self.budget || depth >= MAX_DEPTH {
            return Outcome::greedy(remaining, items);
        }

        let penalty = self.cost.weld_penalty();
        let mut best = Outcome::idle(remaining);
        let mut best_cost = best.cost(penalty);

        for i in 0..items.len() {
            let item = items[i];
            if item.quantity == 0 {
                continue;
            }

            if i >= start && item.length <= remaining {
                items[i].quantity -= 1;
                let rest = self.search(remaining - item.length, items, i, depth + 1, nodes);
                items[i].quantity += 1;

                let cost = rest.cost(penalty);
                if cost < best_cost {
                    best = Outcome::after(item.piece(), rest, 0);
                    best_cost = cost;
                }
            }

            if item.partner_of.is_some() {
                continue;
            }
            if let Some(segment) = self.cost.split_segment(item.length, remaining) {
                items[i].quantity -= 1;
                items.push(SearchItem {
                    length: item.length - segment,
                    quantity: 1,
                    partner_of: Some(item.length),
                });
                let rest = self.search(remaining - segment, items, start, depth + 1, nodes);
                items.pop();
                items[i].quantity += 1;

                let cost = rest.cost(penalty) + penalty;
                if cost < best_cost {
                    let piece = Piece::Segment {
                        demand_length: item.length,
                        length: segment,
                    };
                    best = Outcome::after(piece, rest, 1);
                    best_cost = cost;
                }
            }
        }

        best
    }
}
