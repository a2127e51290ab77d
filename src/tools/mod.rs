//! Nutrition Ledger tools module
//!
//! MCP tool implementations over the ledger.

pub mod diary;
pub mod foods;
pub mod goals;
pub mod ingredients;
pub mod status;
