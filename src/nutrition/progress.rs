//! Goal-progress math
//!
//! How far consumed macros have come toward the daily goals.

use serde::Serialize;

use crate::models::{Macro, Macros};

/// Progress toward one goal value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// Consumed over goal, clamped to [0, 1]; 0 when there is no
    /// positive goal
    pub fraction: f64,
    /// Rounded whole-number percentage of `fraction`
    pub percent: u32,
}

/// Compute progress of a consumed value against a goal
pub fn progress(value: f64, goal: f64) -> Progress {
    let fraction = if goal > 0.0 {
        (value / goal).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Progress {
        fraction,
        percent: (fraction * 100.0).round() as u32,
    }
}

/// Progress of one macro against its goal
#[derive(Debug, Clone, Serialize)]
pub struct MacroProgress {
    pub macro_name: &'static str,
    pub consumed: f64,
    pub goal: f64,
    pub fraction: f64,
    pub percent: u32,
}

/// One progress row per macro, in display order
pub fn goal_progress(totals: &Macros, goals: &Macros) -> Vec<MacroProgress> {
    Macro::ALL
        .into_iter()
        .map(|which| {
            let consumed = totals.get(which);
            let goal = goals.get(which);
            let p = progress(consumed, goal);
            MacroProgress {
                macro_name: which.as_str(),
                consumed,
                goal,
                fraction: p.fraction,
                percent: p.percent,
            }
        })
        .collect()
}
