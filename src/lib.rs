//! One-dimensional cutting planner for bar stock such as rebar.
//!
//! Given stock lots and demanded piece lengths, [`planner::Planner`] decides
//! how each bar is cut, recycles offcuts in a single reuse pass, and can
//! optionally weld two segments into one demanded piece when the scrap saved
//! outweighs the join cost.

pub mod config;
pub mod dp;
pub mod error;
pub mod ledger;
pub mod ordering;
pub mod planner;
pub mod render;
pub mod selector;
pub mod types;
pub mod weld;
