use super::*;

impl Optimizer {
    /// Computes bar count, scrap and yield over all patterns.
    pub(super) fn calculate_summary(&self, patterns: &[CuttingPattern]) -> PlanSummary {
        summarize(self.request.stock_length, patterns)
    }
}

/// Aggregates patterns cut from bars of `stock_length`.
///
/// Yield counts kerf as consumed material, so it is the complement of
/// leftover over total purchased length. All fields are zero when there
/// are no patterns.
pub fn summarize(stock_length: f64, patterns: &[CuttingPattern]) -> PlanSummary {
    let total_bars = patterns.len() as u32;
    if total_bars == 0 {
        return PlanSummary::default();
    }

    let total_scrap_length: f64 = patterns.iter().map(|p| p.leftover).sum();
    let total_material = total_bars as f64 * stock_length;
    let total_yield_percentage = if total_material > 0.0 {
        (total_material - total_scrap_length) / total_material * 100.0
    } else {
        0.0
    };

    PlanSummary {
        total_bars,
        total_yield_percentage,
        total_scrap_percentage: 100.0 - total_yield_percentage,
        total_scrap_length,
    }
}
