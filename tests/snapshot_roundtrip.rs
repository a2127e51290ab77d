use nutriledger::models::{FoodCreate, IngredientCategory, IngredientCreate, IngredientKind, Macros};
use nutriledger::store::{Ledger, Snapshot};
use nutriledger::tools::{diary, foods, goals, ingredients};

fn populated_ledger() -> Ledger {
    let ledger = Ledger::new();

    let oats = ingredients::add_ingredient(
        &ledger,
        IngredientCreate {
            name: "Rolled Oats".to_string(),
            kind: IngredientKind::Solid,
            category: IngredientCategory::Grains,
            kcals_per_100: 389.0,
            protein_per_100: 16.9,
            carbs_per_100: 66.3,
            fats_per_100: 6.9,
            sugars_per_100: 0.99,
        },
    )
    .unwrap();

    let food = foods::add_food(
        &ledger,
        FoodCreate {
            name: "Morning Oats".to_string(),
            portion_name: "bowl".to_string(),
            portion_size: 2.0,
            manual_macros: None,
        },
    )
    .unwrap();
    foods::add_food_ingredient(&ledger, food.id, oats.id, 160.0).unwrap();

    goals::set_goals(
        &ledger,
        Macros {
            kcals: 2200.0,
            protein: 150.0,
            carbs: 260.0,
            fats: 70.0,
            sugars: 40.0,
        },
    )
    .unwrap();

    diary::log_food(&ledger, "2024-05-03T07:45", "breakfast", food.id, 1.0).unwrap();

    ledger
}

#[test]
fn test_save_load_preserves_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let original = populated_ledger();
    original.snapshot().save(&path).unwrap();

    let restored = Ledger::from_snapshot(Snapshot::load(&path).unwrap());

    let listed = ingredients::list_ingredients(&restored, None, None).unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].name, "Rolled Oats");

    let food = foods::list_foods(&restored, None).unwrap();
    assert_eq!(food.total, 1);
    // Per-portion: 160 g of oats split into 2 bowls
    assert!((food.items[0].kcals_per_portion - 389.0 * 1.6 / 2.0).abs() < 1e-9);

    let current_goals = goals::get_goals(&restored).unwrap();
    assert_eq!(current_goals.goals.kcals, 2200.0);

    let summary = diary::day_summary(&restored, "2024-05-03").unwrap();
    assert_eq!(summary.entry_count, 1);
}

#[test]
fn test_restored_ledger_does_not_reuse_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let original = populated_ledger();
    let first = ingredients::list_ingredients(&original, None, None).unwrap().items[0].id;
    ingredients::delete_ingredient(&original, first).unwrap();
    original.snapshot().save(&path).unwrap();

    let restored = Ledger::from_snapshot(Snapshot::load(&path).unwrap());
    let fresh = ingredients::add_ingredient(
        &restored,
        IngredientCreate {
            name: "Banana".to_string(),
            kind: IngredientKind::Solid,
            category: IngredientCategory::Fruits,
            kcals_per_100: 89.0,
            protein_per_100: 1.1,
            carbs_per_100: 22.8,
            fats_per_100: 0.3,
            sugars_per_100: 12.2,
        },
    )
    .unwrap();
    assert!(fresh.id > first);
}

#[test]
fn test_load_tolerates_minimal_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    std::fs::write(&path, "{}").unwrap();

    let snapshot = Snapshot::load(&path).unwrap();
    let ledger = Ledger::from_snapshot(snapshot);

    let listed = ingredients::list_ingredients(&ledger, None, None).unwrap();
    assert_eq!(listed.total, 0);
    assert_eq!(goals::get_goals(&ledger).unwrap().goals, Macros::zero());
}
