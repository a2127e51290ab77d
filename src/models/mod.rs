//! Data models
//!
//! Rust structs representing ledger entities.

mod diary;
mod food;
mod ingredient;
mod macros;

pub use diary::{DiaryEntry, MealType};
pub use food::{Food, FoodCreate, FoodIngredient, FoodUpdate};
pub use ingredient::{
    Ingredient, IngredientCategory, IngredientCreate, IngredientKind, IngredientUpdate,
};
pub use macros::{Macro, Macros};
