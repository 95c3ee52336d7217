//! Planner configuration: stock ordering and the cut selection strategy.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::ordering::StockOrder;

/// Node budget for one weld-aware search call.
pub const DEFAULT_SEARCH_BUDGET: usize = 200_000;

/// Cost parameters of the weld-aware strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Cost per unit of scrap length.
    pub alpha: f64,
    /// Cost per weld.
    pub beta: f64,
    /// Shortest offcut worth keeping.
    pub gamma: u32,
    /// Shortest segment allowed to take part in a weld.
    pub delta: u32,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 500.0,
            gamma: 100,
            delta: 100,
        }
    }
}

impl CostModel {
    /// One weld expressed in scrap length.
    pub fn weld_penalty(&self) -> f64 {
        self.beta / self.alpha
    }

    /// Length of the first segment when `demand` is split against `remaining`.
    ///
    /// Both segments end up at least `delta` long and the split never
    /// degenerates into the whole piece.
    pub fn split_segment(&self, demand: u32, remaining: u32) -> Option<u32> {
        if demand <= self.delta || remaining <= self.delta {
            return None;
        }
        let segment = (demand - self.delta).min(remaining - self.delta);
        if segment < self.delta.max(1) || segment >= demand {
            return None;
        }
        Some(segment)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "alpha must be a positive number, got {}",
                self.alpha
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "beta must be a non-negative number, got {}",
                self.beta
            )));
        }
        Ok(())
    }
}

fn default_search_budget() -> usize {
    DEFAULT_SEARCH_BUDGET
}

/// How a single source is cut.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Bounded subset-sum: least scrap, then fewest pieces. Never welds.
    #[default]
    Scrap,
    /// Cost-weighted search that may split a piece and weld it.
    Weld {
        #[serde(default)]
        cost: CostModel,
        #[serde(default = "default_search_budget")]
        search_budget: usize,
    },
}

impl Strategy {
    pub fn weld(cost: CostModel) -> Self {
        Strategy::Weld {
            cost,
            search_budget: DEFAULT_SEARCH_BUDGET,
        }
    }

    /// Shortest offcut that goes back into the leftover pool.
    pub fn reuse_threshold(&self) -> u32 {
        match self {
            Strategy::Scrap => 1,
            Strategy::Weld { cost, .. } => cost.gamma.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub order: StockOrder,
    pub strategy: Strategy,
}

impl PlannerConfig {
    pub fn new(order: StockOrder, strategy: Strategy) -> Self {
        Self { order, strategy }
    }

    pub fn validate(&self) -> Result<()> {
        match &self.strategy {
            Strategy::Scrap => Ok(()),
            Strategy::Weld { search_budget: 0, .. } => Err(PlanError::InvalidInput(
                "search budget must be at least 1".to_string(),
            )),
            Strategy::Weld { cost, .. } => cost.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segment_respects_delta() {
        let cost = CostModel::default();
        // 5000 against 4000 left: keep 100 in the bar and 1100 for the partner
        assert_eq!(cost.split_segment(5000, 4000), Some(3900));
        // partner must stay at least delta long
        assert_eq!(cost.split_segment(5000, 9000), Some(4900));
        assert_eq!(cost.split_segment(100, 4000), None);
        assert_eq!(cost.split_segment(5000, 100), None);
        // first segment would be shorter than delta
        assert_eq!(cost.split_segment(5000, 150), None);
    }

    #[test]
    fn test_split_segment_zero_delta() {
        let cost = CostModel {
            delta: 0,
            ..CostModel::default()
        };
        assert_eq!(cost.split_segment(5000, 5000), None);
        assert_eq!(cost.split_segment(5000, 3000), Some(3000));
    }

    #[test]
    fn test_validate_rejects_bad_alpha_beta() {
        let zero_alpha = CostModel {
            alpha: 0.0,
            ..CostModel::default()
        };
        assert!(matches!(zero_alpha.validate(), Err(PlanError::InvalidInput(_))));
        let negative_beta = CostModel {
            beta: -1.0,
            ..CostModel::default()
        };
        assert!(matches!(negative_beta.validate(), Err(PlanError::InvalidInput(_))));
        assert!(CostModel::default().validate().is_ok());
    }

    #[test]
    fn test_reuse_threshold() {
        assert_eq!(Strategy::Scrap.reuse_threshold(), 1);
        let weld = Strategy::weld(CostModel {
            gamma: 0,
            ..CostModel::default()
        });
        assert_eq!(weld.reuse_threshold(), 1);
        assert_eq!(Strategy::weld(CostModel::default()).reuse_threshold(), 100);
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"order": "descending", "strategy": {"kind": "weld"}}"#)
                .unwrap();
        assert_eq!(config.order, StockOrder::Descending);
        assert_eq!(
            config.strategy,
            Strategy::Weld {
                cost: CostModel::default(),
                search_budget: DEFAULT_SEARCH_BUDGET,
            }
        );
        let empty: PlannerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PlannerConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_search_budget() {
        let config = PlannerConfig::new(
            StockOrder::Ascending,
            Strategy::Weld {
                cost: CostModel::default(),
                search_budget: 0,
            },
        );
        assert!(matches!(config.validate(), Err(PlanError::InvalidInput(_))));
        let config = PlannerConfig::new(
            StockOrder::Ascending,
            Strategy::Weld {
                cost: CostModel::default(),
                search_budget: 1,
            },
        );
        assert!(config.validate().is_ok());
    }
}
