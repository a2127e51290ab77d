//! Ingredient catalog MCP tools
//!
//! Tools for managing the reusable ingredient catalog.

use serde::Serialize;

use crate::models::{Ingredient, IngredientCategory, IngredientCreate, IngredientUpdate};
use crate::store::Ledger;

/// Response for add_ingredient
#[derive(Debug, Serialize)]
pub struct AddIngredientResponse {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub category: String,
}

/// Summary of an ingredient for list results
#[derive(Debug, Serialize)]
pub struct IngredientSummary {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub category: String,
    pub kcals_per_100: f64,
    pub protein_per_100: f64,
}

impl From<&Ingredient> for IngredientSummary {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            kind: ingredient.kind.as_str().to_string(),
            category: ingredient.category.as_str().to_string(),
            kcals_per_100: ingredient.per_100.kcals,
            protein_per_100: ingredient.per_100.protein,
        }
    }
}

/// Response for list_ingredients
#[derive(Debug, Serialize)]
pub struct ListIngredientsResponse {
    pub items: Vec<IngredientSummary>,
    pub total: usize,
}

/// One category bucket of the grouped catalog view
#[derive(Debug, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<IngredientSummary>,
}

/// Response for browse_catalog
#[derive(Debug, Serialize)]
pub struct BrowseCatalogResponse {
    pub groups: Vec<CategoryGroup>,
    pub total: usize,
}

/// Response for delete_ingredient
#[derive(Debug, Serialize)]
pub struct DeleteIngredientResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn validate_densities(values: [(&str, Option<f64>); 5]) -> Result<(), String> {
    for (field, value) in values {
        if let Some(v) = value {
            if v < 0.0 {
                return Err(format!("{} cannot be negative", field));
            }
        }
    }
    Ok(())
}

/// Add a new ingredient to the catalog
pub fn add_ingredient(ledger: &Ledger, data: IngredientCreate) -> Result<AddIngredientResponse, String> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err("Ingredient name cannot be empty".to_string());
    }

    validate_densities([
        ("kcals_per_100", Some(data.kcals_per_100)),
        ("protein_per_100", Some(data.protein_per_100)),
        ("carbs_per_100", Some(data.carbs_per_100)),
        ("fats_per_100", Some(data.fats_per_100)),
        ("sugars_per_100", Some(data.sugars_per_100)),
    ])?;

    let ingredient = ledger.add_ingredient(IngredientCreate {
        name: name.to_string(),
        ..data
    });

    Ok(AddIngredientResponse {
        id: ingredient.id,
        name: ingredient.name,
        kind: ingredient.kind.as_str().to_string(),
        category: ingredient.category.as_str().to_string(),
    })
}

/// Get an ingredient by ID
pub fn get_ingredient(ledger: &Ledger, id: i64) -> Result<Option<Ingredient>, String> {
    Ok(ledger.read(|state| state.ingredient(id).cloned()))
}

/// List ingredients with optional name search and category filter
pub fn list_ingredients(
    ledger: &Ledger,
    query: Option<&str>,
    category: Option<&str>,
) -> Result<ListIngredientsResponse, String> {
    let category = category
        .map(|c| {
            IngredientCategory::parse(c).ok_or_else(|| format!("Unknown category: {}", c))
        })
        .transpose()?;

    let items: Vec<IngredientSummary> = ledger
        .read(|state| state.list_ingredients(query, category))
        .iter()
        .map(IngredientSummary::from)
        .collect();
    let total = items.len();

    Ok(ListIngredientsResponse { items, total })
}

/// Browse the catalog grouped by category, all categories present
pub fn browse_catalog(ledger: &Ledger, query: Option<&str>) -> Result<BrowseCatalogResponse, String> {
    let grouped = ledger.read(|state| state.ingredients_by_category(query));

    let mut total = 0;
    let groups = grouped
        .iter()
        .map(|(category, items)| {
            total += items.len();
            CategoryGroup {
                category: category.as_str().to_string(),
                items: items.iter().map(IngredientSummary::from).collect(),
            }
        })
        .collect();

    Ok(BrowseCatalogResponse { groups, total })
}

/// Update an ingredient; unset fields are left untouched
pub fn update_ingredient(
    ledger: &Ledger,
    id: i64,
    data: IngredientUpdate,
) -> Result<Ingredient, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Ingredient name cannot be empty".to_string());
        }
    }

    validate_densities([
        ("kcals_per_100", data.kcals_per_100),
        ("protein_per_100", data.protein_per_100),
        ("carbs_per_100", data.carbs_per_100),
        ("fats_per_100", data.fats_per_100),
        ("sugars_per_100", data.sugars_per_100),
    ])?;

    ledger.update_ingredient(id, &data).map_err(|e| e.to_string())
}

/// Delete an ingredient from the catalog
///
/// Foods already composed keep their embedded copies.
pub fn delete_ingredient(ledger: &Ledger, id: i64) -> Result<DeleteIngredientResponse, String> {
    ledger.remove_ingredient(id).map_err(|e| e.to_string())?;
    Ok(DeleteIngredientResponse {
        success: true,
        deleted_id: id,
    })
}
