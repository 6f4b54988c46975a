use serde::{Deserialize, Deserializer, Serialize};

/// Default upper bound on expanded pieces per run.
pub const DEFAULT_MAX_PIECES: usize = 100_000;

/// A required length and how many pieces of it to cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutRequest {
    /// Traceability only; never used by the optimizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "nan", deserialize_with = "lenient_number")]
    pub length: f64,
    /// Floored before expansion, so `2.7` yields two pieces.
    #[serde(default = "nan", deserialize_with = "lenient_number")]
    pub quantity: f64,
}

impl CutRequest {
    pub fn new(length: f64, quantity: f64) -> Self {
        Self {
            code: None,
            description: None,
            length,
            quantity,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input: what the caller provides for one planning run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default = "nan", deserialize_with = "lenient_number")]
    pub stock_length: f64,
    /// Blade width lost between two adjacent pieces on the same bar
    #[serde(default, deserialize_with = "lenient_number")]
    pub kerf: f64,
    /// Missing is treated like empty and rejected by the optimizer.
    #[serde(default)]
    pub items: Vec<CutRequest>,
    /// Reject runs expanding to more pieces than this. Values above
    /// [`DEFAULT_MAX_PIECES`] are clamped to it; absent means the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pieces: Option<usize>,
}

impl PlanRequest {
    pub fn new(stock_length: f64, kerf: f64, items: Vec<CutRequest>) -> Self {
        Self {
            stock_length,
            kerf,
            items,
            max_pieces: None,
        }
    }
}

/// One physical bar and the pieces cut from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuttingPattern {
    /// 1-based, in the order bars were opened.
    pub pattern_id: u32,
    /// e.g. `"2 x 2000mm + 1 x 1500mm"`
    pub pattern_string: String,
    /// Piece lengths in placement order
    pub pieces: Vec<f64>,
    pub bar_usage: f64,
    pub leftover: f64,
    pub yield_percentage: f64,
    /// Always 1: patterns are not deduplicated.
    pub bars_needed: u32,
}

/// Aggregate statistics over every pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub total_bars: u32,
    pub total_yield_percentage: f64,
    pub total_scrap_percentage: f64,
    pub total_scrap_length: f64,
}

/// Why an input line contributed no pieces (or fewer than requested)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Length missing, non-numeric, zero or negative
    InvalidLength,
    /// Quantity missing, non-numeric, or floors to zero
    InvalidQuantity,
    /// Length is greater than the stock length
    ExceedsStock,
}

/// An input line the optimizer dropped before packing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedItem {
    /// Position in the request's `items`
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// NaN when the input value was not a number (serialized as null)
    #[serde(default = "nan", deserialize_with = "lenient_number")]
    pub length: f64,
    #[serde(default = "nan", deserialize_with = "lenient_number")]
    pub quantity: f64,
    /// Pieces this line would have contributed (0 if unknown)
    pub pieces: u64,
    pub reason: SkipReason,
}

/// Output: what the optimizer returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuttingPlan {
    pub stock_length: f64,
    pub kerf: f64,
    pub patterns: Vec<CuttingPattern>,
    pub summary: PlanSummary,
    /// Items dropped before packing; informational only
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<SkippedItem>,
}

/// Error type for cutting plan generation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No valid items to cut")]
    NoValidItems { skipped: usize },
}

impl PlanError {
    /// Stable machine-readable discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::InvalidInput(_) => "invalid_input",
            PlanError::NoValidItems { .. } => "no_valid_items",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;

fn nan() -> f64 {
    f64::NAN
}

/// Accepts any JSON value. Anything that isn't a finite number comes out
/// as NaN instead of failing, leaving the decision to the optimizer.
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn number_from_value(value: &serde_json::Value) -> f64 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => n,
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_request_accepts_numeric_strings() {
        let item: CutRequest =
            serde_json::from_str(r#"{"code":"A1","length":"2000","quantity":"3"}"#).unwrap();
        assert_eq!(item.code.as_deref(), Some("A1"));
        assert_eq!(item.length, 2000.0);
        assert_eq!(item.quantity, 3.0);
    }

    #[test]
    fn test_cut_request_garbage_becomes_nan() {
        let item: CutRequest =
            serde_json::from_str(r#"{"length":"abc","quantity":null}"#).unwrap();
        assert!(item.length.is_nan());
        assert!(item.quantity.is_nan());

        let missing: CutRequest = serde_json::from_str(r#"{"description":"rail"}"#).unwrap();
        assert!(missing.length.is_nan());
        assert!(missing.quantity.is_nan());
    }

    #[test]
    fn test_plan_request_defaults_kerf_to_zero() {
        let request: PlanRequest =
            serde_json::from_str(r#"{"stockLength":6000,"items":[]}"#).unwrap();
        assert_eq!(request.stock_length, 6000.0);
        assert_eq!(request.kerf, 0.0);
        assert!(request.max_pieces.is_none());
    }

    #[test]
    fn test_plan_request_missing_items_is_empty() {
        let request: PlanRequest = serde_json::from_str(r#"{"stockLength":6000}"#).unwrap();
        assert!(request.items.is_empty());
    }

    #[test]
    fn test_pattern_serializes_camel_case() {
        let pattern = CuttingPattern {
            pattern_id: 1,
            pattern_string: "1 x 6000mm".into(),
            pieces: vec![6000.0],
            bar_usage: 6000.0,
            leftover: 0.0,
            yield_percentage: 100.0,
            bars_needed: 1,
        };
        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json["patternId"], 1);
        assert_eq!(json["patternString"], "1 x 6000mm");
        assert_eq!(json["barUsage"], 6000.0);
        assert_eq!(json["yieldPercentage"], 100.0);
        assert_eq!(json["barsNeeded"], 1);
    }

    #[test]
    fn test_error_messages_and_kinds() {
        let invalid = PlanError::InvalidInput("missing stock length or items".into());
        assert_eq!(
            invalid.to_string(),
            "Invalid input: missing stock length or items"
        );
        assert_eq!(invalid.kind(), "invalid_input");

        let none = PlanError::NoValidItems { skipped: 2 };
        assert_eq!(none.to_string(), "No valid items to cut");
        assert_eq!(none.kind(), "no_valid_items");
    }
}
