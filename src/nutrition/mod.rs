//! Nutrition calculation module
//!
//! Aggregation over diary entries and goal-progress math.

pub mod aggregate;
pub mod progress;

pub use aggregate::{breakdown, group_by_meal_type, totals};
pub use progress::{goal_progress, progress, MacroProgress, Progress};
