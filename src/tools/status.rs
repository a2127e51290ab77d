//! Nutrition Ledger status tool
//!
//! Provides runtime status information about the service.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::store::Ledger;

/// Diary logging instructions for AI assistants
pub const DIARY_INSTRUCTIONS: &str = r#"
# Nutrition Ledger Diary Instructions

This guide explains how to log food using the Nutrition Ledger tools.

## Overview

To log what someone ate, you need:
1. **Ingredients** - Catalog entries with macro density per 100 g (solid) or 100 ml (liquid)
2. **Foods** - Either composed from ingredient amounts, or "quick add" foods with manual per-portion macros
3. **Diary entries** - A food logged on a date under one meal type, with a servings multiplier

## Typical workflow

1. Search the catalog: `list_ingredients` with a query, or `browse_catalog` for the grouped view
2. Missing ingredient? `add_ingredient` with per-100 macro values
3. Create the food: `add_food` (composed), then `add_food_ingredient` once per ingredient with the amount in g/ml
4. For a one-off meal with known macros, `add_food` with manual macros instead - no ingredient steps needed
5. Log it: `log_food` with date (YYYY-MM-DD, optionally with THH:MM time), meal type (breakfast/lunch/dinner/snacks), food id, and servings

## Reading back

- `get_diary` - one day grouped by meal type, with per-meal subtotals
- `day_summary` - daily totals plus percent-of-goal progress per macro
- `macro_breakdown` - which foods contributed to one macro on one day
- `list_days` - per-day overviews across a date range

## Things to know

- A food's portion_size is the number of portions its ingredient amounts yield; totals are per portion
- Diary servings multiply the food's per-portion totals
- Foods and diary entries embed copies: editing or deleting a catalog ingredient never changes existing foods, and editing a food never changes past diary entries
- Set goals once with `set_goals`; `day_summary` reports progress against them
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct LedgerStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Snapshot information
    pub snapshot_path: Option<String>,
    pub snapshot_size_bytes: Option<u64>,

    /// Ledger contents
    pub ingredient_count: usize,
    pub food_count: usize,
    pub entry_count: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    snapshot_path: Option<PathBuf>,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(snapshot_path: Option<PathBuf>) -> Self {
        Self {
            start_time: Instant::now(),
            snapshot_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, ledger: &Ledger) -> LedgerStatus {
        let build_info = BuildInfo::current();

        let snapshot_size_bytes = self
            .snapshot_path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        let (ingredient_count, food_count, entry_count) = ledger.read(|state| state.counts());

        LedgerStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            snapshot_path: self.snapshot_path.as_ref().map(|p| p.display().to_string()),
            snapshot_size_bytes,
            ingredient_count,
            food_count,
            entry_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
