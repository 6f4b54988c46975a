use super::*;

impl Optimizer {
    /// Turns open bars into numbered patterns with per-bar statistics.
    pub(super) fn build_patterns(&self, bars: Vec<OpenBar>) -> Vec<CuttingPattern> {
        let stock_length = self.request.stock_length;
        let kerf = self.request.kerf;

        bars.into_iter()
            .zip(1u32..)
            .map(|(bar, pattern_id)| {
                let used = bar.used;
                let bar_usage = bar.usage(kerf);
                let leftover = stock_length - bar_usage;

                CuttingPattern {
                    pattern_id,
                    pattern_string: pattern_string(&bar.pieces),
                    pieces: bar.pieces,
                    bar_usage,
                    leftover,
                    yield_percentage: used / stock_length * 100.0,
                    bars_needed: 1,
                }
            })
            .collect()
    }
}

/// Groups pieces by length, longest first: `"2 x 2000mm + 1 x 500mm"`.
pub fn pattern_string(pieces: &[f64]) -> String {
    let mut sorted = pieces.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut groups: Vec<(f64, usize)> = Vec::new();
    for length in sorted {
        match groups.last_mut() {
            Some((last, count)) if *last == length => *count += 1,
            _ => groups.push((length, 1)),
        }
    }

    groups
        .iter()
        .map(|(length, count)| format!("{} x {}mm", count, length))
        .collect::<Vec<_>>()
        .join(" + ")
}
