use super::*;

/// One required cut, expanded from a `CutRequest`.
#[derive(Debug, Clone)]
pub(super) struct Piece {
    pub length: f64,
}

impl Optimizer {
    /// Duplicates items according to their floored quantity.
    ///
    /// Lines with a bad length or quantity, or longer than the stock, are
    /// left out and reported back instead of failing the run.
    pub(super) fn expand_items(&self) -> Result<(Vec<Piece>, Vec<SkippedItem>)> {
        let stock_length = self.request.stock_length;
        // Callers may tighten the cap but never raise it.
        let max_pieces = self
            .request
            .max_pieces
            .map_or(DEFAULT_MAX_PIECES, |cap| cap.min(DEFAULT_MAX_PIECES));

        let mut admitted: Vec<(f64, u64)> = Vec::new();
        let mut skipped = Vec::new();
        let mut total: u64 = 0;

        for (index, item) in self.request.items.iter().enumerate() {
            let count = piece_count(item.quantity);
            let reason = if !item.length.is_finite() || item.length <= 0.0 {
                Some(SkipReason::InvalidLength)
            } else if count == 0 {
                Some(SkipReason::InvalidQuantity)
            } else if item.length > stock_length {
                Some(SkipReason::ExceedsStock)
            } else {
                None
            };

            match reason {
                Some(reason) => skipped.push(SkippedItem {
                    index,
                    code: item.code.clone(),
                    description: item.description.clone(),
                    length: item.length,
                    quantity: item.quantity,
                    pieces: count,
                    reason,
                }),
                None => {
                    total = total.saturating_add(count);
                    admitted.push((item.length, count));
                }
            }
        }

        // Checked before allocating anything per piece.
        let total = match usize::try_from(total) {
            Ok(total) if total <= max_pieces => total,
            _ => {
                return Err(PlanError::InvalidInput(format!(
                    "{} pieces requested, limit is {}",
                    total, max_pieces
                )))
            }
        };

        let mut pieces = Vec::with_capacity(total);
        for (length, count) in admitted {
            pieces.extend((0..count).map(|_| Piece { length }));
        }

        Ok((pieces, skipped))
    }
}

/// Whole pieces a quantity stands for; zero for anything non-positive or NaN.
pub(super) fn piece_count(quantity: f64) -> u64 {
    if quantity.is_finite() && quantity >= 1.0 {
        // Saturating float-to-int cast.
        quantity.floor() as u64
    } else {
        0
    }
}
