//! Goal MCP tools
//!
//! Get and replace the user's daily macro goals.

use serde::Serialize;

use crate::models::Macros;
use crate::store::Ledger;

/// Response for get_goals / set_goals
#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub goals: Macros,
}

/// Current macro goals
pub fn get_goals(ledger: &Ledger) -> Result<GoalsResponse, String> {
    Ok(GoalsResponse {
        goals: ledger.read(|state| state.goals()),
    })
}

/// Replace the goals wholesale
///
/// No validation beyond shape; negative targets are stored as given.
pub fn set_goals(ledger: &Ledger, goals: Macros) -> Result<GoalsResponse, String> {
    ledger.set_goals(goals);
    get_goals(ledger)
}
