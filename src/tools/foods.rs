//! Food MCP tools
//!
//! Tools for composing foods from ingredient copies or manual macros.

use serde::Serialize;

use crate::models::{Food, FoodCreate, FoodUpdate, Macros};
use crate::store::Ledger;

/// Response for add_food
#[derive(Debug, Serialize)]
pub struct AddFoodResponse {
    pub id: i64,
    pub name: String,
    pub portion_name: String,
    pub portion_size: f64,
    pub mode: &'static str,
}

/// Summary of a food for list results
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub id: i64,
    pub name: String,
    pub portion_name: String,
    pub mode: &'static str,
    pub kcals_per_portion: f64,
}

impl From<&Food> for FoodSummary {
    fn from(food: &Food) -> Self {
        Self {
            id: food.id,
            name: food.name.clone(),
            portion_name: food.portion_name.clone(),
            mode: mode_str(food),
            kcals_per_portion: food.compute_totals().kcals,
        }
    }
}

/// One ingredient row in a food detail view
#[derive(Debug, Serialize)]
pub struct FoodIngredientRow {
    pub index: usize,
    pub name: String,
    pub amount: f64,
    pub unit: &'static str,
    pub kcals: f64,
}

/// Full food detail with computed totals
#[derive(Debug, Serialize)]
pub struct FoodDetail {
    pub id: i64,
    pub name: String,
    pub portion_name: String,
    pub portion_size: f64,
    pub mode: &'static str,
    pub ingredients: Vec<FoodIngredientRow>,
    pub totals: Macros,
}

impl From<&Food> for FoodDetail {
    fn from(food: &Food) -> Self {
        Self {
            id: food.id,
            name: food.name.clone(),
            portion_name: food.portion_name.clone(),
            portion_size: food.portion_size,
            mode: mode_str(food),
            ingredients: food
                .ingredients
                .iter()
                .enumerate()
                .map(|(index, fi)| FoodIngredientRow {
                    index,
                    name: fi.ingredient.name.clone(),
                    amount: fi.amount,
                    unit: fi.ingredient.kind.unit(),
                    kcals: fi.macros().kcals,
                })
                .collect(),
            totals: food.compute_totals(),
        }
    }
}

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub items: Vec<FoodSummary>,
    pub total: usize,
}

/// Response for delete_food
#[derive(Debug, Serialize)]
pub struct DeleteFoodResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn mode_str(food: &Food) -> &'static str {
    if food.is_manual() {
        "manual"
    } else {
        "composed"
    }
}

fn validate_manual_macros(manual: &Macros) -> Result<(), String> {
    for (field, value) in [
        ("kcals", manual.kcals),
        ("protein", manual.protein),
        ("carbs", manual.carbs),
        ("fats", manual.fats),
        ("sugars", manual.sugars),
    ] {
        if value < 0.0 {
            return Err(format!("manual {} cannot be negative", field));
        }
    }
    Ok(())
}

/// Add a new food, composed (empty ingredient list) or manual
pub fn add_food(ledger: &Ledger, data: FoodCreate) -> Result<AddFoodResponse, String> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err("Food name cannot be empty".to_string());
    }
    if data.portion_name.trim().is_empty() {
        return Err("Portion name cannot be empty".to_string());
    }
    if let Some(ref manual) = data.manual_macros {
        validate_manual_macros(manual)?;
    }

    let food = ledger
        .add_food(FoodCreate {
            name: name.to_string(),
            portion_name: data.portion_name.trim().to_string(),
            ..data
        })
        .map_err(|e| e.to_string())?;

    Ok(AddFoodResponse {
        id: food.id,
        name: food.name.clone(),
        portion_name: food.portion_name.clone(),
        portion_size: food.portion_size,
        mode: mode_str(&food),
    })
}

/// Get full food detail with computed totals
pub fn get_food(ledger: &Ledger, id: i64) -> Result<Option<FoodDetail>, String> {
    Ok(ledger.read(|state| state.food(id).map(FoodDetail::from)))
}

/// List foods with optional name search
pub fn list_foods(ledger: &Ledger, query: Option<&str>) -> Result<ListFoodsResponse, String> {
    let items: Vec<FoodSummary> = ledger
        .read(|state| state.list_foods(query))
        .iter()
        .map(FoodSummary::from)
        .collect();
    let total = items.len();

    Ok(ListFoodsResponse { items, total })
}

/// Update a food's name/portion fields
pub fn update_food(ledger: &Ledger, id: i64, data: FoodUpdate) -> Result<FoodDetail, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Food name cannot be empty".to_string());
        }
    }

    let food = ledger.update_food(id, &data).map_err(|e| e.to_string())?;
    Ok(FoodDetail::from(&food))
}

/// Set or clear a food's manual macro override
pub fn set_manual_macros(
    ledger: &Ledger,
    id: i64,
    manual: Option<Macros>,
) -> Result<FoodDetail, String> {
    if let Some(ref m) = manual {
        validate_manual_macros(m)?;
    }

    let food = ledger.set_manual_macros(id, manual).map_err(|e| e.to_string())?;
    Ok(FoodDetail::from(&food))
}

/// Delete a food from the catalog
///
/// Diary entries that logged it keep their embedded snapshot.
pub fn delete_food(ledger: &Ledger, id: i64) -> Result<DeleteFoodResponse, String> {
    ledger.remove_food(id).map_err(|e| e.to_string())?;
    Ok(DeleteFoodResponse {
        success: true,
        deleted_id: id,
    })
}

/// Append a catalog ingredient to a food; returns the updated detail
pub fn add_food_ingredient(
    ledger: &Ledger,
    food_id: i64,
    ingredient_id: i64,
    amount: f64,
) -> Result<FoodDetail, String> {
    let food = ledger
        .add_food_ingredient(food_id, ingredient_id, amount)
        .map_err(|e| e.to_string())?;
    Ok(FoodDetail::from(&food))
}

/// Remove the ingredient at a position from a food
pub fn remove_food_ingredient(
    ledger: &Ledger,
    food_id: i64,
    index: usize,
) -> Result<FoodDetail, String> {
    let food = ledger
        .remove_food_ingredient(food_id, index)
        .map_err(|e| e.to_string())?;
    Ok(FoodDetail::from(&food))
}
