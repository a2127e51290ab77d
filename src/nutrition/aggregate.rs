//! Aggregation over diary entries
//!
//! Pure functions; callers pass whatever entry slice a query produced.

use crate::models::{DiaryEntry, Macro, Macros, MealType};

/// Sum consumed macros across entries
pub fn totals(entries: &[DiaryEntry]) -> Macros {
    entries.iter().map(DiaryEntry::consumed).sum()
}

/// Per-food contribution to one macro, for drill-down views
///
/// One row per entry, in entry order; the same food logged twice shows
/// twice.
pub fn breakdown(entries: &[DiaryEntry], which: Macro) -> Vec<(String, f64)> {
    entries
        .iter()
        .map(|e| (e.food.name.clone(), e.consumed().get(which)))
        .collect()
}

/// Bucket entries by meal type, one bucket per declared type in declared
/// order, empty buckets included
pub fn group_by_meal_type(entries: &[DiaryEntry]) -> Vec<(MealType, Vec<DiaryEntry>)> {
    MealType::ALL
        .into_iter()
        .map(|meal| {
            let bucket: Vec<DiaryEntry> = entries
                .iter()
                .filter(|e| e.meal_type == meal)
                .cloned()
                .collect();
            (meal, bucket)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Food;
    use chrono::NaiveDate;

    fn manual_food(name: &str, macros: Macros) -> Food {
        Food {
            id: 0,
            name: name.to_string(),
            ingredients: Vec::new(),
            portion_name: "serving".to_string(),
            portion_size: 1.0,
            manual_macros: Some(macros),
        }
    }

    fn entry(id: i64, meal_type: MealType, food: Food, servings: f64) -> DiaryEntry {
        DiaryEntry {
            id,
            date: NaiveDate::from_ymd_opt(2024, 5, 3)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            meal_type,
            food,
            servings,
        }
    }

    fn sample_entries() -> Vec<DiaryEntry> {
        vec![
            entry(
                1,
                MealType::Breakfast,
                manual_food(
                    "Oatmeal",
                    Macros {
                        kcals: 300.0,
                        protein: 10.0,
                        carbs: 54.0,
                        fats: 5.0,
                        sugars: 1.0,
                    },
                ),
                1.0,
            ),
            entry(
                2,
                MealType::Lunch,
                manual_food(
                    "Chicken Wrap",
                    Macros {
                        kcals: 450.0,
                        protein: 35.0,
                        carbs: 40.0,
                        fats: 15.0,
                        sugars: 3.0,
                    },
                ),
                2.0,
            ),
        ]
    }

    #[test]
    fn test_totals_scale_by_servings() {
        let total = totals(&sample_entries());
        assert_eq!(total.kcals, 300.0 + 900.0);
        assert_eq!(total.protein, 10.0 + 70.0);
        assert_eq!(total.sugars, 1.0 + 6.0);
    }

    #[test]
    fn test_totals_additive_over_disjoint_sequences() {
        let entries = sample_entries();
        let (first, second) = entries.split_at(1);

        let combined = totals(&entries);
        let split_sum = totals(first) + totals(second);
        assert_eq!(combined, split_sum);
    }

    #[test]
    fn test_totals_of_empty_slice_is_zero() {
        assert_eq!(totals(&[]), Macros::zero());
    }

    #[test]
    fn test_breakdown_names_and_values() {
        let rows = breakdown(&sample_entries(), Macro::Protein);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ("Oatmeal".to_string(), 10.0));
        assert_eq!(rows[1], ("Chicken Wrap".to_string(), 70.0));
    }

    #[test]
    fn test_group_by_meal_type_includes_empty_buckets() {
        let groups = group_by_meal_type(&sample_entries());
        assert_eq!(groups.len(), MealType::ALL.len());
        assert_eq!(groups[0].0, MealType::Breakfast);
        assert_eq!(groups[0].1.len(), 1);
        assert_eq!(groups[1].0, MealType::Lunch);
        assert_eq!(groups[1].1.len(), 1);
        assert_eq!(groups[2].0, MealType::Dinner);
        assert!(groups[2].1.is_empty());
        assert_eq!(groups[3].0, MealType::Snacks);
        assert!(groups[3].1.is_empty());
    }
}
