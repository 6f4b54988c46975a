use crate::types::*;

mod expand;
mod pattern;
mod summary;

use expand::Piece;
pub use pattern::pattern_string;
pub use summary::summarize;

/// A bar opened during placement.
#[derive(Debug, Clone)]
struct OpenBar {
    /// Sum of piece lengths, accumulated in placement order
    used: f64,
    pieces: Vec<f64>,
}

impl OpenBar {
    fn new(length: f64) -> Self {
        Self {
            used: length,
            pieces: vec![length],
        }
    }

    /// Pieces plus one kerf between each adjacent pair.
    ///
    /// The fit test and the reported `bar_usage` both come from here, so an
    /// accepted placement never reports usage above the stock length.
    fn usage(&self, kerf: f64) -> f64 {
        usage_of(self.used, self.pieces.len(), kerf)
    }

    /// Usage this bar would have after appending `length`.
    fn usage_with(&self, length: f64, kerf: f64) -> f64 {
        usage_of(self.used + length, self.pieces.len() + 1, kerf)
    }

    fn push(&mut self, length: f64) {
        self.used += length;
        self.pieces.push(length);
    }
}

fn usage_of(used: f64, count: usize, kerf: f64) -> f64 {
    used + count.saturating_sub(1) as f64 * kerf
}

/// Splits required lengths over stock bars using first-fit decreasing.
///
/// Pieces are sorted longest first and each one goes onto the first
/// previously opened bar with room for it (plus one kerf if that bar
/// already holds a piece). A new bar is opened only when none fits.
/// This is a greedy approximation and does not guarantee the minimum
/// number of bars.
pub struct Optimizer {
    request: PlanRequest,
}

impl Optimizer {
    /// Validates whole-input parameters and builds a new optimizer instance.
    pub fn new(request: PlanRequest) -> Result<Self> {
        if !request.stock_length.is_finite()
            || request.stock_length <= 0.0
            || request.items.is_empty()
        {
            return Err(PlanError::InvalidInput(
                "missing stock length or items".to_string(),
            ));
        }

        if !request.kerf.is_finite() || request.kerf < 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "kerf must be a non-negative number, got {}",
                request.kerf
            )));
        }

        if request.max_pieces == Some(0) {
            return Err(PlanError::InvalidInput(
                "max_pieces must be at least 1".to_string(),
            ));
        }

        Ok(Self { request })
    }

    pub fn stock_length(&self) -> f64 {
        self.request.stock_length
    }

    pub fn kerf(&self) -> f64 {
        self.request.kerf
    }

    /// Executes the full planning flow and returns patterns plus summary.
    pub fn optimize(&self) -> Result<CuttingPlan> {
        let (mut pieces, skipped) = self.expand_items()?;
        if pieces.is_empty() {
            return Err(PlanError::NoValidItems {
                skipped: skipped.len(),
            });
        }

        // Stable, so equal lengths keep input order.
        pieces.sort_by(|a, b| b.length.total_cmp(&a.length));

        let bars = self.first_fit_decreasing(&pieces);
        let patterns = self.build_patterns(bars);
        let summary = self.calculate_summary(&patterns);

        Ok(CuttingPlan {
            stock_length: self.request.stock_length,
            kerf: self.request.kerf,
            patterns,
            summary,
            skipped,
        })
    }

    /// Places every piece on the first open bar that can take it.
    fn first_fit_decreasing(&self, pieces: &[Piece]) -> Vec<OpenBar> {
        let stock_length = self.request.stock_length;
        let kerf = self.request.kerf;
        let mut bars: Vec<OpenBar> = Vec::new();

        for piece in pieces {
            let slot = bars
                .iter()
                .position(|bar| bar.usage_with(piece.length, kerf) <= stock_length);

            match slot {
                Some(idx) => bars[idx].push(piece.length),
                None => bars.push(OpenBar::new(piece.length)),
            }
        }

        bars
    }
}

/// Runs a single plan with the default piece cap.
pub fn generate_cutting_plan(
    stock_length: f64,
    kerf: f64,
    items: Vec<CutRequest>,
) -> Result<CuttingPlan> {
    Optimizer::new(PlanRequest::new(stock_length, kerf, items))?.optimize()
}
