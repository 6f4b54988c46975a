//! One-dimensional cutting stock planning.
//!
//! Given a bar length, a kerf and a list of required piece lengths, the
//! [`Optimizer`] assigns every piece to a bar with a first-fit decreasing
//! heuristic and reports per-bar and overall yield.
//!
//! ```
//! use cutplan_core::{generate_cutting_plan, CutRequest};
//!
//! let plan = generate_cutting_plan(6000.0, 3.0, vec![CutRequest::new(2000.0, 3.0)]).unwrap();
//! assert_eq!(plan.summary.total_bars, 2);
//! assert_eq!(plan.patterns[0].pattern_string, "2 x 2000mm");
//! ```

pub mod optimizer;
pub mod render;
pub mod types;

pub use optimizer::{generate_cutting_plan, pattern_string, summarize, Optimizer};
pub use render::render_svg;
pub use types::*;
