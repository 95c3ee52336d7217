use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PlanError, Result};

/// A batch of identical raw bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockLot {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub length: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

impl StockLot {
    pub fn new(length: u32, quantity: u32) -> Self {
        Self { length, quantity }
    }
}

/// A required piece length and how many are still needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DemandItem {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub length: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

impl DemandItem {
    pub fn new(length: u32, quantity: u32) -> Self {
        Self { length, quantity }
    }
}

impl std::fmt::Display for DemandItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x{}", self.length, self.quantity)
    }
}

/// Where the material of a plan entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Stock,
    Leftover,
}

/// One source bar (or offcut) and the pieces cut from it, in cutting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CutPlanEntry {
    pub source_length: u32,
    pub source: SourceKind,
    pub cuts: Vec<u32>,
}

impl CutPlanEntry {
    /// Fails if the cuts do not fit in the source.
    pub fn new(source_length: u32, source: SourceKind, cuts: Vec<u32>) -> Result<Self> {
        let used: u64 = cuts.iter().map(|&c| c as u64).sum();
        if used > source_length as u64 {
            return Err(PlanError::Invariant(format!(
                "cuts {:?} total {} exceed source length {}",
                cuts, used, source_length
            )));
        }
        Ok(Self {
            source_length,
            source,
            cuts,
        })
    }

    pub fn used_length(&self) -> u32 {
        self.cuts.iter().sum()
    }

    pub fn offcut(&self) -> u32 {
        self.source_length - self.used_length()
    }
}

/// Second half of a split piece that still has to be cut somewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartnerSegment {
    pub demand_length: u32,
    pub length: u32,
}

/// A demanded length assembled from two welded segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeldJoin {
    pub demand_length: u32,
    pub first_segment: u32,
    pub second_segment: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plan {
    pub entries: Vec<CutPlanEntry>,
    /// Offcuts long enough to keep, including whole bars nothing could be cut from.
    pub leftover: Vec<u32>,
    /// Offcuts below the reuse threshold.
    pub scrap: Vec<u32>,
    /// Cross-cuts made on sources; welds are counted separately.
    pub cut_count: u32,
    pub welds: Vec<WeldJoin>,
    pub unmet: Vec<DemandItem>,
    pub unmet_segments: Vec<PartnerSegment>,
    pub unused_stock: Vec<StockLot>,
    pub stock_consumed: u64,
}

impl Plan {
    pub fn weld_count(&self) -> usize {
        self.welds.len()
    }

    /// Welds whose closing partner was actually cut. Each owed segment in
    /// `unmet_segments` belongs to exactly one recorded weld.
    pub fn completed_weld_count(&self) -> usize {
        self.welds.len().saturating_sub(self.unmet_segments.len())
    }

    pub fn is_complete(&self) -> bool {
        self.unmet.is_empty() && self.unmet_segments.is_empty()
    }

    /// Number of cut pieces of exactly `length` across all entries.
    pub fn pieces_of(&self, length: u32) -> usize {
        self.entries
            .iter()
            .flat_map(|e| &e.cuts)
            .filter(|&&c| c == length)
            .count()
    }
}

/// Accepts JSON integers and integral floats (`3000` or `3000.0`).
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(D::Error::custom(format!(
            "expected a non-negative whole number, got {}",
            value
        )));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_offcut() {
        let entry = CutPlanEntry::new(12000, SourceKind::Stock, vec![5000, 3000, 2000]).unwrap();
        assert_eq!(entry.used_length(), 10000);
        assert_eq!(entry.offcut(), 2000);
    }

    #[test]
    fn test_entry_rejects_overfull_cuts() {
        let err = CutPlanEntry::new(10, SourceKind::Stock, vec![6, 5]).unwrap_err();
        assert!(matches!(err, PlanError::Invariant(_)));
    }

    #[test]
    fn test_deserialize_float_lengths() {
        let lot: StockLot = serde_json::from_str(r#"{"length": 12000.0, "quantity": 3}"#).unwrap();
        assert_eq!(lot, StockLot::new(12000, 3));
    }

    #[test]
    fn test_deserialize_rejects_negative_and_fractional() {
        assert!(serde_json::from_str::<DemandItem>(r#"{"length": -5, "quantity": 1}"#).is_err());
        assert!(serde_json::from_str::<DemandItem>(r#"{"length": 2.5, "quantity": 1}"#).is_err());
    }
}
