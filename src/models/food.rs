//! Food model
//!
//! A food is either composed from ingredient copies with amounts, or
//! carries manually entered per-portion macros ("quick add").

use serde::{Deserialize, Serialize};

use crate::store::{LedgerError, LedgerResult};

use super::{Ingredient, Macros};

/// One ingredient used in a food, with the amount in g/ml
///
/// Holds its own copy of the catalog ingredient; later catalog edits do
/// not reach into foods already composed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodIngredient {
    pub ingredient: Ingredient,
    pub amount: f64,
}

impl FoodIngredient {
    /// Macro contribution of this ingredient at its amount
    pub fn macros(&self) -> Macros {
        self.ingredient.per_100.scale(self.amount / 100.0)
    }
}

/// A food with per-portion macro totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<FoodIngredient>,
    pub portion_name: String,
    /// Number of portions the composed ingredient amounts yield
    pub portion_size: f64,
    /// When present, totals come from here and the ingredient list is
    /// ignored
    pub manual_macros: Option<Macros>,
}

/// Data for creating a new food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodCreate {
    pub name: String,
    pub portion_name: String,
    pub portion_size: f64,
    pub manual_macros: Option<Macros>,
}

/// Data for updating a food's name/portion fields; None leaves the field
/// untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodUpdate {
    pub name: Option<String>,
    pub portion_name: Option<String>,
    pub portion_size: Option<f64>,
}

impl Food {
    /// Compute per-portion macro totals.
    ///
    /// Manual macros win outright. Otherwise ingredient contributions are
    /// summed at per-100 density and divided by the portion size. A zero
    /// portion size returns the unscaled sum rather than dividing.
    pub fn compute_totals(&self) -> Macros {
        if let Some(ref manual) = self.manual_macros {
            return manual.clone();
        }

        let sum: Macros = self.ingredients.iter().map(FoodIngredient::macros).sum();

        if self.portion_size > 0.0 {
            sum.scale(1.0 / self.portion_size)
        } else {
            sum
        }
    }

    /// Append an ingredient copy with the given amount in g/ml
    pub fn add_ingredient(&mut self, ingredient: Ingredient, amount: f64) -> LedgerResult<()> {
        if amount <= 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        self.ingredients.push(FoodIngredient { ingredient, amount });
        Ok(())
    }

    /// Remove the ingredient at the given position
    pub fn remove_ingredient(&mut self, index: usize) -> LedgerResult<FoodIngredient> {
        if index >= self.ingredients.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.ingredients.len(),
            });
        }
        Ok(self.ingredients.remove(index))
    }

    /// Whether totals come from a manual override
    pub fn is_manual(&self) -> bool {
        self.manual_macros.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientCategory, IngredientKind};

    fn ingredient(name: &str, per_100: Macros) -> Ingredient {
        Ingredient {
            id: 0,
            name: name.to_string(),
            kind: IngredientKind::Solid,
            category: IngredientCategory::Others,
            per_100,
        }
    }

    fn chicken_breast() -> Ingredient {
        ingredient(
            "Chicken Breast",
            Macros {
                kcals: 165.0,
                protein: 31.0,
                carbs: 0.0,
                fats: 3.6,
                sugars: 0.0,
            },
        )
    }

    fn olive_oil() -> Ingredient {
        ingredient(
            "Olive Oil",
            Macros {
                kcals: 884.0,
                protein: 0.0,
                carbs: 0.0,
                fats: 100.0,
                sugars: 0.0,
            },
        )
    }

    fn empty_food(portion_size: f64) -> Food {
        Food {
            id: 1,
            name: "Test Food".to_string(),
            ingredients: Vec::new(),
            portion_name: "plate".to_string(),
            portion_size,
            manual_macros: None,
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_single_ingredient_portion_one() {
        let mut food = empty_food(1.0);
        food.add_ingredient(chicken_breast(), 50.0).unwrap();

        let totals = food.compute_totals();
        assert_close(totals.kcals, 165.0 * 0.5);
        assert_close(totals.protein, 31.0 * 0.5);
        assert_close(totals.fats, 3.6 * 0.5);
    }

    #[test]
    fn test_grilled_chicken_salad() {
        let mut food = empty_food(1.0);
        food.add_ingredient(chicken_breast(), 200.0).unwrap();
        food.add_ingredient(olive_oil(), 10.0).unwrap();

        let totals = food.compute_totals();
        assert_close(totals.kcals, 418.4);
        assert_close(totals.protein, 62.0);
        assert_close(totals.fats, 17.2);
    }

    #[test]
    fn test_manual_macros_override_ingredients() {
        let mut food = empty_food(1.0);
        food.add_ingredient(olive_oil(), 1000.0).unwrap();
        food.manual_macros = Some(Macros {
            kcals: 250.0,
            protein: 12.0,
            carbs: 30.0,
            fats: 8.0,
            sugars: 5.0,
        });

        let totals = food.compute_totals();
        assert_eq!(totals, food.manual_macros.clone().unwrap());
    }

    #[test]
    fn test_scaling_invariance() {
        let mut per_portion = empty_food(1.0);
        per_portion.add_ingredient(chicken_breast(), 300.0).unwrap();
        per_portion.add_ingredient(olive_oil(), 25.0).unwrap();

        let mut batch = per_portion.clone();
        batch.portion_size = 4.0;

        let whole = per_portion.compute_totals();
        let quarter = batch.compute_totals();
        assert_close(quarter.kcals, whole.kcals / 4.0);
        assert_close(quarter.protein, whole.protein / 4.0);
        assert_close(quarter.fats, whole.fats / 4.0);
    }

    #[test]
    fn test_zero_portion_returns_unscaled_sum() {
        let mut food = empty_food(0.0);
        food.add_ingredient(chicken_breast(), 100.0).unwrap();

        let totals = food.compute_totals();
        assert_close(totals.kcals, 165.0);
    }

    #[test]
    fn test_add_ingredient_rejects_non_positive_amount() {
        let mut food = empty_food(1.0);
        let err = food.add_ingredient(chicken_breast(), 0.0).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert!(food.ingredients.is_empty());

        let err = food.add_ingredient(chicken_breast(), -5.0).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }

    #[test]
    fn test_remove_ingredient_out_of_range() {
        let mut food = empty_food(1.0);
        food.add_ingredient(chicken_breast(), 100.0).unwrap();

        let err = food.remove_ingredient(1).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::IndexOutOfRange { index: 1, len: 1 }
        ));

        let removed = food.remove_ingredient(0).unwrap();
        assert_eq!(removed.ingredient.name, "Chicken Breast");
        assert!(food.ingredients.is_empty());
    }
}
