//! Diary entry model
//!
//! One food consumed on one date under one meal category.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Food, Macros};

/// Meal category. Fixed closed set; no open categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealType {
    /// All meal types in display order
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snacks => "snacks",
        }
    }

    /// Parse from string, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snacks" | "snack" => Some(MealType::Snacks),
            _ => None,
        }
    }
}

/// A diary entry holding a snapshot copy of the food it logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: i64,
    pub date: NaiveDateTime,
    pub meal_type: MealType,
    /// Snapshot of the food at logging time; catalog edits do not reach
    /// back into it
    pub food: Food,
    /// Serving multiplier applied on top of the food's per-portion totals
    pub servings: f64,
}

impl DiaryEntry {
    /// Calendar day this entry belongs to
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Macros consumed by this entry (per-portion totals times servings)
    pub fn consumed(&self) -> Macros {
        self.food.compute_totals().scale(self.servings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_parse_round_trip() {
        for meal in MealType::ALL {
            assert_eq!(MealType::parse(meal.as_str()), Some(meal));
        }
        assert_eq!(MealType::parse("Snack"), Some(MealType::Snacks));
        assert_eq!(MealType::parse("brunch"), None);
    }

    #[test]
    fn test_consumed_scales_by_servings() {
        let food = Food {
            id: 1,
            name: "Shake".to_string(),
            ingredients: Vec::new(),
            portion_name: "glass".to_string(),
            portion_size: 1.0,
            manual_macros: Some(Macros {
                kcals: 200.0,
                protein: 25.0,
                carbs: 10.0,
                fats: 4.0,
                sugars: 6.0,
            }),
        };
        let entry = DiaryEntry {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 5, 3)
                .unwrap()
                .and_hms_opt(8, 15, 0)
                .unwrap(),
            meal_type: MealType::Breakfast,
            food,
            servings: 1.5,
        };

        let consumed = entry.consumed();
        assert_eq!(consumed.kcals, 300.0);
        assert_eq!(consumed.protein, 37.5);
        assert_eq!(entry.day(), NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
    }
}
