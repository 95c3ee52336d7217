use serde::Serialize;

use crate::config::CostModel;
use crate::types::{CutPlanEntry, Plan};

const MAX_WIDTH: f64 = 80.0;

/// Display-side figures derived from a finished plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub waste: i64,
    pub cost: f64,
}

impl Totals {
    /// `waste` is the offcut length of all entries minus the final leftover;
    /// `cost` prices it with `alpha` and each completed weld with `beta`.
    /// Welds still waiting on an owed segment are not billed.
    pub fn of(plan: &Plan, cost: &CostModel) -> Self {
        let offcuts: i64 = plan.entries.iter().map(|e| e.offcut() as i64).sum();
        let leftover: i64 = plan.leftover.iter().map(|&l| l as i64).sum();
        let waste = offcuts - leftover;
        Self {
            waste,
            cost: waste as f64 * cost.alpha + plan.completed_weld_count() as f64 * cost.beta,
        }
    }
}

/// One-line ASCII strip of a source with its pieces, scaled to 80 columns.
pub fn render_bar(entry: &CutPlanEntry) -> String {
    let scale = MAX_WIDTH / entry.source_length as f64;
    let total_w = (entry.source_length as f64 * scale).round() as usize;
    if total_w == 0 {
        return String::new();
    }

    let mut row = vec!['.'; total_w + 1];
    row[0] = '|';
    row[total_w] = '|';

    let mut x = 0u32;
    for &cut in &entry.cuts {
        let sx = (x as f64 * scale).round() as usize;
        x += cut;
        let ex = ((x as f64 * scale).round() as usize).min(total_w);
        if ex <= sx {
            continue;
        }

        for cell in row.iter_mut().take(ex).skip(sx + 1) {
            *cell = '=';
        }
        row[sx] = '|';
        row[ex] = '|';

        // Label
        let label: Vec<char> = cut.to_string().chars().collect();
        if ex - sx > label.len() + 1 {
            let start = sx + 1 + (ex - sx - 1 - label.len()) / 2;
            for (i, &ch) in label.iter().enumerate() {
                row[start + i] = ch;
            }
        }
    }

    row.into_iter().collect()
}
