use nutriledger::models::{FoodCreate, IngredientCategory, IngredientCreate, IngredientKind, Macros};
use nutriledger::store::Ledger;
use nutriledger::tools::{diary, foods, goals, ingredients};

fn setup_salad(ledger: &Ledger) -> i64 {
    let chicken = ingredients::add_ingredient(
        ledger,
        IngredientCreate {
            name: "Chicken Breast".to_string(),
            kind: IngredientKind::Solid,
            category: IngredientCategory::Meat,
            kcals_per_100: 165.0,
            protein_per_100: 31.0,
            carbs_per_100: 0.0,
            fats_per_100: 3.6,
            sugars_per_100: 0.0,
        },
    )
    .unwrap();
    let oil = ingredients::add_ingredient(
        ledger,
        IngredientCreate {
            name: "Olive Oil".to_string(),
            kind: IngredientKind::Liquid,
            category: IngredientCategory::Oils,
            kcals_per_100: 884.0,
            protein_per_100: 0.0,
            carbs_per_100: 0.0,
            fats_per_100: 100.0,
            sugars_per_100: 0.0,
        },
    )
    .unwrap();

    let food = foods::add_food(
        ledger,
        FoodCreate {
            name: "Grilled Chicken Salad".to_string(),
            portion_name: "plate".to_string(),
            portion_size: 1.0,
            manual_macros: None,
        },
    )
    .unwrap();
    foods::add_food_ingredient(ledger, food.id, chicken.id, 200.0).unwrap();
    foods::add_food_ingredient(ledger, food.id, oil.id, 10.0).unwrap();
    food.id
}

fn quick_add_shake(ledger: &Ledger) -> i64 {
    foods::add_food(
        ledger,
        FoodCreate {
            name: "Protein Shake".to_string(),
            portion_name: "glass".to_string(),
            portion_size: 1.0,
            manual_macros: Some(Macros {
                kcals: 200.0,
                protein: 25.0,
                carbs: 10.0,
                fats: 4.0,
                sugars: 6.0,
            }),
        },
    )
    .unwrap()
    .id
}

// ── logging ─────────────────────────────────────────────────────────────────

#[test]
fn test_log_food_validates_input() {
    let ledger = Ledger::new();
    let shake = quick_add_shake(&ledger);

    let err = diary::log_food(&ledger, "2024-05-03", "brunch", shake, 1.0).unwrap_err();
    assert!(err.contains("meal type"));

    let err = diary::log_food(&ledger, "05/03/2024", "lunch", shake, 1.0).unwrap_err();
    assert!(err.contains("Invalid timestamp"));

    let err = diary::log_food(&ledger, "2024-05-03", "lunch", shake, 0.0).unwrap_err();
    assert!(err.contains("portion size"));

    let err = diary::log_food(&ledger, "2024-05-03", "lunch", 999, 1.0).unwrap_err();
    assert!(err.contains("no food with id 999"));
}

#[test]
fn test_log_and_delete_roundtrip() {
    let ledger = Ledger::new();
    let shake = quick_add_shake(&ledger);

    let before = diary::get_diary(&ledger, "2024-05-03", None).unwrap();
    assert_eq!(before.entry_count, 0);

    let entry = diary::log_food(&ledger, "2024-05-03T08:15", "breakfast", shake, 1.0).unwrap();
    let deleted = diary::delete_entry(&ledger, entry.id).unwrap();
    assert!(deleted.success);

    let after = diary::get_diary(&ledger, "2024-05-03", None).unwrap();
    assert_eq!(after.entry_count, 0);

    let err = diary::delete_entry(&ledger, entry.id).unwrap_err();
    assert!(err.contains("no entry"));
}

// ── day views ───────────────────────────────────────────────────────────────

#[test]
fn test_diary_groups_by_day_and_meal() {
    let ledger = Ledger::new();
    let shake = quick_add_shake(&ledger);

    diary::log_food(&ledger, "2024-05-03T08:00", "breakfast", shake, 1.0).unwrap();
    diary::log_food(&ledger, "2024-05-03T21:30", "snacks", shake, 0.5).unwrap();
    diary::log_food(&ledger, "2024-05-04T08:00", "breakfast", shake, 1.0).unwrap();

    let day = diary::get_diary(&ledger, "2024-05-03", None).unwrap();
    assert_eq!(day.entry_count, 2);
    assert_eq!(day.meals.len(), 4);
    assert_eq!(day.meals[0].meal_type, "breakfast");
    assert_eq!(day.meals[0].entries.len(), 1);
    assert_eq!(day.meals[3].meal_type, "snacks");
    assert_eq!(day.meals[3].entries.len(), 1);
    assert!(day.meals[1].entries.is_empty() && day.meals[2].entries.is_empty());
    assert!((day.totals.kcals - 300.0).abs() < 1e-9);
    assert!((day.meals[3].subtotal.kcals - 100.0).abs() < 1e-9);

    let breakfast_only = diary::get_diary(&ledger, "2024-05-03", Some("breakfast")).unwrap();
    assert_eq!(breakfast_only.entry_count, 1);
    assert!((breakfast_only.totals.kcals - 200.0).abs() < 1e-9);
}

#[test]
fn test_day_summary_reports_goal_progress() {
    let ledger = Ledger::new();
    let salad = setup_salad(&ledger);

    goals::set_goals(
        &ledger,
        Macros {
            kcals: 1673.6,
            protein: 100.0,
            carbs: 250.0,
            fats: 0.0,
            sugars: 40.0,
        },
    )
    .unwrap();

    diary::log_food(&ledger, "2024-05-03T12:30", "lunch", salad, 2.0).unwrap();

    let summary = diary::day_summary(&ledger, "2024-05-03").unwrap();
    assert_eq!(summary.entry_count, 1);
    assert!((summary.totals.kcals - 836.8).abs() < 1e-9);
    assert!((summary.totals.protein - 124.0).abs() < 1e-9);

    assert_eq!(summary.progress.len(), 5);
    let kcals = &summary.progress[0];
    assert_eq!(kcals.macro_name, "kcals");
    assert_eq!(kcals.percent, 50);
    // 124 g consumed against a 100 g goal clamps at 100%
    let protein = &summary.progress[1];
    assert_eq!(protein.percent, 100);
    assert_eq!(protein.fraction, 1.0);
    // No positive fats goal: progress pinned to zero
    let fats = &summary.progress[3];
    assert_eq!(fats.percent, 0);
}

#[test]
fn test_macro_breakdown_lists_contributors() {
    let ledger = Ledger::new();
    let salad = setup_salad(&ledger);
    let shake = quick_add_shake(&ledger);

    diary::log_food(&ledger, "2024-05-03T08:00", "breakfast", shake, 1.0).unwrap();
    diary::log_food(&ledger, "2024-05-03T12:30", "lunch", salad, 1.0).unwrap();

    let breakdown = diary::macro_breakdown(&ledger, "2024-05-03", "protein").unwrap();
    assert_eq!(breakdown.rows.len(), 2);
    assert_eq!(breakdown.rows[0].food_name, "Protein Shake");
    assert!((breakdown.rows[0].amount - 25.0).abs() < 1e-9);
    assert_eq!(breakdown.rows[1].food_name, "Grilled Chicken Salad");
    assert!((breakdown.rows[1].amount - 62.0).abs() < 1e-9);
    assert!((breakdown.total - 87.0).abs() < 1e-9);

    let err = diary::macro_breakdown(&ledger, "2024-05-03", "fiber").unwrap_err();
    assert!(err.contains("Unknown macro"));
}

#[test]
fn test_list_days_over_range() {
    let ledger = Ledger::new();
    let shake = quick_add_shake(&ledger);

    diary::log_food(&ledger, "2024-05-01", "breakfast", shake, 1.0).unwrap();
    diary::log_food(&ledger, "2024-05-03", "lunch", shake, 1.0).unwrap();
    diary::log_food(&ledger, "2024-05-03", "dinner", shake, 1.0).unwrap();
    diary::log_food(&ledger, "2024-05-09", "dinner", shake, 1.0).unwrap();

    let listed = diary::list_days(&ledger, "2024-05-01", "2024-05-05").unwrap();
    assert_eq!(listed.total, 2);
    assert_eq!(listed.days[0].date, "2024-05-01");
    assert_eq!(listed.days[0].entry_count, 1);
    assert_eq!(listed.days[1].date, "2024-05-03");
    assert_eq!(listed.days[1].entry_count, 2);
    assert!((listed.days[1].totals.kcals - 400.0).abs() < 1e-9);

    let err = diary::list_days(&ledger, "2024-05-05", "2024-05-01").unwrap_err();
    assert!(err.contains("before start"));
}

// ── snapshot semantics ──────────────────────────────────────────────────────

#[test]
fn test_food_edits_do_not_change_logged_entries() {
    let ledger = Ledger::new();
    let salad = setup_salad(&ledger);

    diary::log_food(&ledger, "2024-05-03T12:30", "lunch", salad, 1.0).unwrap();

    // Rework the food and even delete it from the catalog
    foods::set_manual_macros(
        &ledger,
        salad,
        Some(Macros {
            kcals: 1.0,
            ..Macros::zero()
        }),
    )
    .unwrap();
    foods::delete_food(&ledger, salad).unwrap();

    let summary = diary::day_summary(&ledger, "2024-05-03").unwrap();
    assert_eq!(summary.entry_count, 1);
    assert!((summary.totals.kcals - 418.4).abs() < 1e-9);
}
