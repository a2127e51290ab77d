//! Diary MCP tools
//!
//! Tools for logging food consumption and reading daily summaries.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{DiaryEntry, Macro, Macros, MealType};
use crate::nutrition::{breakdown, goal_progress, group_by_meal_type, totals, MacroProgress};
use crate::store::Ledger;

/// Detail of one diary entry
#[derive(Debug, Serialize)]
pub struct EntryDetail {
    pub id: i64,
    pub date: String,
    pub meal_type: String,
    pub food_name: String,
    pub servings: f64,
    pub consumed: Macros,
}

impl From<&DiaryEntry> for EntryDetail {
    fn from(entry: &DiaryEntry) -> Self {
        Self {
            id: entry.id,
            date: entry.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            meal_type: entry.meal_type.as_str().to_string(),
            food_name: entry.food.name.clone(),
            servings: entry.servings,
            consumed: entry.consumed(),
        }
    }
}

/// One meal bucket in a diary day view
#[derive(Debug, Serialize)]
pub struct MealGroup {
    pub meal_type: String,
    pub entries: Vec<EntryDetail>,
    pub subtotal: Macros,
}

/// Response for get_diary
#[derive(Debug, Serialize)]
pub struct DiaryDayResponse {
    pub date: String,
    pub meals: Vec<MealGroup>,
    pub totals: Macros,
    pub entry_count: usize,
}

/// Response for day_summary
#[derive(Debug, Serialize)]
pub struct DaySummaryResponse {
    pub date: String,
    pub totals: Macros,
    pub goals: Macros,
    pub progress: Vec<MacroProgress>,
    pub entry_count: usize,
}

/// One row of a macro drill-down
#[derive(Debug, Serialize)]
pub struct BreakdownRow {
    pub food_name: String,
    pub amount: f64,
}

/// Response for macro_breakdown
#[derive(Debug, Serialize)]
pub struct MacroBreakdownResponse {
    pub date: String,
    pub macro_name: String,
    pub rows: Vec<BreakdownRow>,
    pub total: f64,
}

/// Per-day overview for range listing
#[derive(Debug, Serialize)]
pub struct DayOverview {
    pub date: String,
    pub totals: Macros,
    pub entry_count: usize,
}

/// Response for list_days
#[derive(Debug, Serialize)]
pub struct ListDaysResponse {
    pub days: Vec<DayOverview>,
    pub total: usize,
}

/// Response for delete_entry
#[derive(Debug, Serialize)]
pub struct DeleteEntryResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Parse a calendar day from ISO format (YYYY-MM-DD)
pub fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date (expected YYYY-MM-DD): {}", s))
}

/// Parse a timestamp; a bare date means midnight
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    let trimmed = s.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(format!(
        "Invalid timestamp (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]): {}",
        s
    ))
}

fn parse_meal_type(s: &str) -> Result<MealType, String> {
    MealType::parse(s)
        .ok_or_else(|| format!("Unknown meal type (breakfast/lunch/dinner/snacks): {}", s))
}

/// Log a catalog food to the diary
pub fn log_food(
    ledger: &Ledger,
    date: &str,
    meal_type: &str,
    food_id: i64,
    servings: f64,
) -> Result<EntryDetail, String> {
    let date = parse_timestamp(date)?;
    let meal_type = parse_meal_type(meal_type)?;

    let entry = ledger
        .log_food(date, meal_type, food_id, servings)
        .map_err(|e| e.to_string())?;

    Ok(EntryDetail::from(&entry))
}

/// Delete a diary entry
pub fn delete_entry(ledger: &Ledger, id: i64) -> Result<DeleteEntryResponse, String> {
    ledger.remove_entry(id).map_err(|e| e.to_string())?;
    Ok(DeleteEntryResponse {
        success: true,
        deleted_id: id,
    })
}

/// Get one day's diary, grouped by meal type, optionally narrowed to one
/// meal
pub fn get_diary(
    ledger: &Ledger,
    date: &str,
    meal_type: Option<&str>,
) -> Result<DiaryDayResponse, String> {
    let day = parse_day(date)?;
    let meal_type = meal_type.map(parse_meal_type).transpose()?;

    let entries = ledger.read(|state| state.entries_for(day, meal_type));
    let day_totals = totals(&entries);
    let entry_count = entries.len();

    let meals = group_by_meal_type(&entries)
        .into_iter()
        .map(|(meal, bucket)| MealGroup {
            meal_type: meal.as_str().to_string(),
            subtotal: totals(&bucket),
            entries: bucket.iter().map(EntryDetail::from).collect(),
        })
        .collect();

    Ok(DiaryDayResponse {
        date: day.format("%Y-%m-%d").to_string(),
        meals,
        totals: day_totals,
        entry_count,
    })
}

/// Daily totals with per-macro goal progress
pub fn day_summary(ledger: &Ledger, date: &str) -> Result<DaySummaryResponse, String> {
    let day = parse_day(date)?;

    let (entries, goals) = ledger.read(|state| (state.entries_for(day, None), state.goals()));
    let day_totals = totals(&entries);
    let progress = goal_progress(&day_totals, &goals);

    Ok(DaySummaryResponse {
        date: day.format("%Y-%m-%d").to_string(),
        entry_count: entries.len(),
        totals: day_totals,
        goals,
        progress,
    })
}

/// Per-food drill-down of one macro on one day
pub fn macro_breakdown(
    ledger: &Ledger,
    date: &str,
    macro_name: &str,
) -> Result<MacroBreakdownResponse, String> {
    let day = parse_day(date)?;
    let which = Macro::parse(macro_name)
        .ok_or_else(|| format!("Unknown macro (kcals/protein/carbs/fats/sugars): {}", macro_name))?;

    let entries = ledger.read(|state| state.entries_for(day, None));
    let rows: Vec<BreakdownRow> = breakdown(&entries, which)
        .into_iter()
        .map(|(food_name, amount)| BreakdownRow { food_name, amount })
        .collect();
    let total = rows.iter().map(|r| r.amount).sum();

    Ok(MacroBreakdownResponse {
        date: day.format("%Y-%m-%d").to_string(),
        macro_name: which.as_str().to_string(),
        rows,
        total,
    })
}

/// Per-day overviews over an inclusive date range
pub fn list_days(ledger: &Ledger, start: &str, end: &str) -> Result<ListDaysResponse, String> {
    let start = parse_day(start)?;
    let end = parse_day(end)?;
    if end < start {
        return Err("end date is before start date".to_string());
    }

    let entries = ledger.read(|state| state.entries_between(start, end));

    let mut by_day: BTreeMap<NaiveDate, Vec<DiaryEntry>> = BTreeMap::new();
    for entry in entries {
        by_day.entry(entry.day()).or_default().push(entry);
    }

    let days: Vec<DayOverview> = by_day
        .into_iter()
        .map(|(day, bucket)| DayOverview {
            date: day.format("%Y-%m-%d").to_string(),
            totals: totals(&bucket),
            entry_count: bucket.len(),
        })
        .collect();
    let total = days.len();

    Ok(ListDaysResponse { days, total })
}
