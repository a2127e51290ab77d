//! Ledger state and shared handle
//!
//! All entities live in one in-memory state owned by a single `Ledger`
//! per running process. Mutations go through the handle, which emits a
//! change event per applied write.

use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::models::{
    DiaryEntry, Food, FoodCreate, FoodUpdate, Ingredient, IngredientCategory, IngredientCreate,
    IngredientUpdate, Macros, MealType,
};
use crate::store::Snapshot;

/// Ledger error types
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("no {entity} with id {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("amount must be greater than 0, got {0}")]
    InvalidAmount(f64),

    #[error("portion size must be greater than 0, got {0}")]
    InvalidPortion(f64),

    #[error("ingredient index {index} out of range for list of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Notification emitted after a mutation is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    IngredientAdded(i64),
    IngredientUpdated(i64),
    IngredientRemoved(i64),
    FoodAdded(i64),
    FoodUpdated(i64),
    FoodRemoved(i64),
    EntryAdded(i64),
    EntryRemoved(i64),
    GoalsReplaced,
}

/// The full in-memory ledger state
///
/// Entity vectors keep insertion order; diary queries rely on it.
#[derive(Debug)]
pub struct LedgerState {
    ingredients: Vec<Ingredient>,
    foods: Vec<Food>,
    entries: Vec<DiaryEntry>,
    goals: Macros,
    next_ingredient_id: i64,
    next_food_id: i64,
    next_entry_id: i64,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerState {
    pub fn new() -> Self {
        Self {
            ingredients: Vec::new(),
            foods: Vec::new(),
            entries: Vec::new(),
            goals: Macros::zero(),
            next_ingredient_id: 1,
            next_food_id: 1,
            next_entry_id: 1,
        }
    }

    // --- Ingredient catalog ---

    /// Add an ingredient to the catalog
    pub fn add_ingredient(&mut self, data: IngredientCreate) -> Ingredient {
        let ingredient = Ingredient {
            id: self.next_ingredient_id,
            name: data.name.clone(),
            kind: data.kind,
            category: data.category,
            per_100: data.per_100(),
        };
        self.next_ingredient_id += 1;
        self.ingredients.push(ingredient.clone());
        ingredient
    }

    /// Get an ingredient by id
    pub fn ingredient(&self, id: i64) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    /// Apply a partial update to an ingredient
    pub fn update_ingredient(
        &mut self,
        id: i64,
        data: &IngredientUpdate,
    ) -> LedgerResult<Ingredient> {
        let ingredient = self
            .ingredients
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(LedgerError::NotFound {
                entity: "ingredient",
                id,
            })?;
        data.apply(ingredient);
        Ok(ingredient.clone())
    }

    /// Remove an ingredient from the catalog
    ///
    /// Foods that embedded a copy keep it; nothing cascades.
    pub fn remove_ingredient(&mut self, id: i64) -> LedgerResult<Ingredient> {
        let pos = self
            .ingredients
            .iter()
            .position(|i| i.id == id)
            .ok_or(LedgerError::NotFound {
                entity: "ingredient",
                id,
            })?;
        Ok(self.ingredients.remove(pos))
    }

    /// List ingredients, optionally filtered by case-insensitive name
    /// substring and/or category, sorted by name
    pub fn list_ingredients(
        &self,
        name_contains: Option<&str>,
        category: Option<IngredientCategory>,
    ) -> Vec<Ingredient> {
        let needle = name_contains.map(str::to_lowercase);
        let mut found: Vec<Ingredient> = self
            .ingredients
            .iter()
            .filter(|i| {
                needle
                    .as_deref()
                    .map(|n| i.name.to_lowercase().contains(n))
                    .unwrap_or(true)
            })
            .filter(|i| category.map(|c| i.category == c).unwrap_or(true))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        found
    }

    /// Group the filtered catalog by category, one bucket per declared
    /// category, empty buckets included
    pub fn ingredients_by_category(
        &self,
        name_contains: Option<&str>,
    ) -> Vec<(IngredientCategory, Vec<Ingredient>)> {
        let listed = self.list_ingredients(name_contains, None);
        IngredientCategory::ALL
            .into_iter()
            .map(|cat| {
                let bucket: Vec<Ingredient> = listed
                    .iter()
                    .filter(|i| i.category == cat)
                    .cloned()
                    .collect();
                (cat, bucket)
            })
            .collect()
    }

    // --- Foods ---

    /// Add a food. The ingredient list starts empty for composed foods;
    /// manual foods carry their totals from day one.
    pub fn add_food(&mut self, data: FoodCreate) -> LedgerResult<Food> {
        if data.portion_size <= 0.0 {
            return Err(LedgerError::InvalidPortion(data.portion_size));
        }
        let food = Food {
            id: self.next_food_id,
            name: data.name,
            ingredients: Vec::new(),
            portion_name: data.portion_name,
            portion_size: data.portion_size,
            manual_macros: data.manual_macros,
        };
        self.next_food_id += 1;
        self.foods.push(food.clone());
        Ok(food)
    }

    /// Get a food by id
    pub fn food(&self, id: i64) -> Option<&Food> {
        self.foods.iter().find(|f| f.id == id)
    }

    fn food_mut(&mut self, id: i64) -> LedgerResult<&mut Food> {
        self.foods
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(LedgerError::NotFound { entity: "food", id })
    }

    /// Apply a partial update to a food's name/portion fields
    pub fn update_food(&mut self, id: i64, data: &FoodUpdate) -> LedgerResult<Food> {
        if let Some(size) = data.portion_size {
            if size <= 0.0 {
                return Err(LedgerError::InvalidPortion(size));
            }
        }
        let food = self.food_mut(id)?;
        if let Some(ref name) = data.name {
            food.name = name.clone();
        }
        if let Some(ref portion_name) = data.portion_name {
            food.portion_name = portion_name.clone();
        }
        if let Some(size) = data.portion_size {
            food.portion_size = size;
        }
        Ok(food.clone())
    }

    /// Set or clear a food's manual macro override
    pub fn set_manual_macros(&mut self, id: i64, manual: Option<Macros>) -> LedgerResult<Food> {
        let food = self.food_mut(id)?;
        food.manual_macros = manual;
        Ok(food.clone())
    }

    /// Remove a food from the catalog
    ///
    /// Diary entries that embedded a copy keep it; nothing cascades.
    pub fn remove_food(&mut self, id: i64) -> LedgerResult<Food> {
        let pos = self
            .foods
            .iter()
            .position(|f| f.id == id)
            .ok_or(LedgerError::NotFound { entity: "food", id })?;
        Ok(self.foods.remove(pos))
    }

    /// List foods, optionally filtered by case-insensitive name
    /// substring, sorted by name
    pub fn list_foods(&self, name_contains: Option<&str>) -> Vec<Food> {
        let needle = name_contains.map(str::to_lowercase);
        let mut found: Vec<Food> = self
            .foods
            .iter()
            .filter(|f| {
                needle
                    .as_deref()
                    .map(|n| f.name.to_lowercase().contains(n))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        found
    }

    /// Append a copy of a catalog ingredient to a food
    pub fn add_food_ingredient(
        &mut self,
        food_id: i64,
        ingredient_id: i64,
        amount: f64,
    ) -> LedgerResult<Food> {
        let ingredient = self
            .ingredient(ingredient_id)
            .cloned()
            .ok_or(LedgerError::NotFound {
                entity: "ingredient",
                id: ingredient_id,
            })?;
        let food = self.food_mut(food_id)?;
        food.add_ingredient(ingredient, amount)?;
        Ok(food.clone())
    }

    /// Remove the ingredient at the given position from a food
    pub fn remove_food_ingredient(&mut self, food_id: i64, index: usize) -> LedgerResult<Food> {
        let food = self.food_mut(food_id)?;
        food.remove_ingredient(index)?;
        Ok(food.clone())
    }

    // --- Diary ---

    /// Add a diary entry embedding the given food value as-is
    pub fn add_entry(
        &mut self,
        date: NaiveDateTime,
        meal_type: MealType,
        food: Food,
        servings: f64,
    ) -> LedgerResult<DiaryEntry> {
        if servings <= 0.0 {
            return Err(LedgerError::InvalidPortion(servings));
        }
        let entry = DiaryEntry {
            id: self.next_entry_id,
            date,
            meal_type,
            food,
            servings,
        };
        self.next_entry_id += 1;
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Add a diary entry for a catalog food, embedding a snapshot copy
    pub fn log_food(
        &mut self,
        date: NaiveDateTime,
        meal_type: MealType,
        food_id: i64,
        servings: f64,
    ) -> LedgerResult<DiaryEntry> {
        let food = self.food(food_id).cloned().ok_or(LedgerError::NotFound {
            entity: "food",
            id: food_id,
        })?;
        self.add_entry(date, meal_type, food, servings)
    }

    /// Get a diary entry by id
    pub fn entry(&self, id: i64) -> Option<&DiaryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Remove a diary entry
    pub fn remove_entry(&mut self, id: i64) -> LedgerResult<DiaryEntry> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(LedgerError::NotFound { entity: "entry", id })?;
        Ok(self.entries.remove(pos))
    }

    /// Entries on one calendar day, optionally one meal type, in
    /// insertion order
    pub fn entries_for(&self, day: NaiveDate, meal_type: Option<MealType>) -> Vec<DiaryEntry> {
        self.entries
            .iter()
            .filter(|e| e.day() == day)
            .filter(|e| meal_type.map(|m| e.meal_type == m).unwrap_or(true))
            .cloned()
            .collect()
    }

    /// Entries whose calendar day falls in the inclusive range, in
    /// insertion order
    pub fn entries_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<DiaryEntry> {
        self.entries
            .iter()
            .filter(|e| {
                let day = e.day();
                day >= start && day <= end
            })
            .cloned()
            .collect()
    }

    // --- Goals ---

    /// Current macro goals
    pub fn goals(&self) -> Macros {
        self.goals.clone()
    }

    /// Replace the goals wholesale; no validation beyond shape
    pub fn set_goals(&mut self, goals: Macros) {
        self.goals = goals;
    }

    // --- Counts / snapshot ---

    /// Entity counts: (ingredients, foods, entries)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.ingredients.len(), self.foods.len(), self.entries.len())
    }

    /// Serialize the whole state for the persistence hand-off
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            ingredients: self.ingredients.clone(),
            foods: self.foods.clone(),
            entries: self.entries.clone(),
            goals: self.goals.clone(),
            next_ingredient_id: self.next_ingredient_id,
            next_food_id: self.next_food_id,
            next_entry_id: self.next_entry_id,
        }
    }

    /// Rebuild state from a snapshot. Id counters never go below one
    /// past the highest id present, so reloaded ledgers keep ids unique.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let max_id = |it: &mut dyn Iterator<Item = i64>| it.max().unwrap_or(0);
        let next_ingredient_id = snapshot
            .next_ingredient_id
            .max(max_id(&mut snapshot.ingredients.iter().map(|i| i.id)) + 1);
        let next_food_id = snapshot
            .next_food_id
            .max(max_id(&mut snapshot.foods.iter().map(|f| f.id)) + 1);
        let next_entry_id = snapshot
            .next_entry_id
            .max(max_id(&mut snapshot.entries.iter().map(|e| e.id)) + 1);

        Self {
            ingredients: snapshot.ingredients,
            foods: snapshot.foods,
            entries: snapshot.entries,
            goals: snapshot.goals,
            next_ingredient_id,
            next_food_id,
            next_entry_id,
        }
    }
}

/// Shared handle to the ledger state
///
/// Cloneable; mutations take the write lock and emit a [`ChangeEvent`]
/// once applied. Subscribers come and go freely.
#[derive(Clone)]
pub struct Ledger {
    state: Arc<RwLock<LedgerState>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_state(LedgerState::new())
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::with_state(LedgerState::from_snapshot(snapshot))
    }

    fn with_state(state: LedgerState) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: Arc::new(RwLock::new(state)),
            events,
        }
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    /// Run a closure against the current state under the read lock
    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&LedgerState) -> T,
    {
        f(&self.state.read().unwrap())
    }

    fn emit(&self, event: ChangeEvent) {
        let _ = self.events.send(event);
    }

    // --- Ingredient catalog ---

    pub fn add_ingredient(&self, data: IngredientCreate) -> Ingredient {
        let ingredient = self.state.write().unwrap().add_ingredient(data);
        self.emit(ChangeEvent::IngredientAdded(ingredient.id));
        ingredient
    }

    pub fn update_ingredient(&self, id: i64, data: &IngredientUpdate) -> LedgerResult<Ingredient> {
        let ingredient = self.state.write().unwrap().update_ingredient(id, data)?;
        self.emit(ChangeEvent::IngredientUpdated(id));
        Ok(ingredient)
    }

    pub fn remove_ingredient(&self, id: i64) -> LedgerResult<Ingredient> {
        let ingredient = self.state.write().unwrap().remove_ingredient(id)?;
        self.emit(ChangeEvent::IngredientRemoved(id));
        Ok(ingredient)
    }

    // --- Foods ---

    pub fn add_food(&self, data: FoodCreate) -> LedgerResult<Food> {
        let food = self.state.write().unwrap().add_food(data)?;
        self.emit(ChangeEvent::FoodAdded(food.id));
        Ok(food)
    }

    pub fn update_food(&self, id: i64, data: &FoodUpdate) -> LedgerResult<Food> {
        let food = self.state.write().unwrap().update_food(id, data)?;
        self.emit(ChangeEvent::FoodUpdated(id));
        Ok(food)
    }

    pub fn set_manual_macros(&self, id: i64, manual: Option<Macros>) -> LedgerResult<Food> {
        let food = self.state.write().unwrap().set_manual_macros(id, manual)?;
        self.emit(ChangeEvent::FoodUpdated(id));
        Ok(food)
    }

    pub fn remove_food(&self, id: i64) -> LedgerResult<Food> {
        let food = self.state.write().unwrap().remove_food(id)?;
        self.emit(ChangeEvent::FoodRemoved(id));
        Ok(food)
    }

    pub fn add_food_ingredient(
        &self,
        food_id: i64,
        ingredient_id: i64,
        amount: f64,
    ) -> LedgerResult<Food> {
        let food = self
            .state
            .write()
            .unwrap()
            .add_food_ingredient(food_id, ingredient_id, amount)?;
        self.emit(ChangeEvent::FoodUpdated(food_id));
        Ok(food)
    }

    pub fn remove_food_ingredient(&self, food_id: i64, index: usize) -> LedgerResult<Food> {
        let food = self
            .state
            .write()
            .unwrap()
            .remove_food_ingredient(food_id, index)?;
        self.emit(ChangeEvent::FoodUpdated(food_id));
        Ok(food)
    }

    // --- Diary ---

    pub fn log_food(
        &self,
        date: NaiveDateTime,
        meal_type: MealType,
        food_id: i64,
        servings: f64,
    ) -> LedgerResult<DiaryEntry> {
        let entry = self
            .state
            .write()
            .unwrap()
            .log_food(date, meal_type, food_id, servings)?;
        self.emit(ChangeEvent::EntryAdded(entry.id));
        Ok(entry)
    }

    pub fn add_entry(
        &self,
        date: NaiveDateTime,
        meal_type: MealType,
        food: Food,
        servings: f64,
    ) -> LedgerResult<DiaryEntry> {
        let entry = self
            .state
            .write()
            .unwrap()
            .add_entry(date, meal_type, food, servings)?;
        self.emit(ChangeEvent::EntryAdded(entry.id));
        Ok(entry)
    }

    pub fn remove_entry(&self, id: i64) -> LedgerResult<DiaryEntry> {
        let entry = self.state.write().unwrap().remove_entry(id)?;
        self.emit(ChangeEvent::EntryRemoved(id));
        Ok(entry)
    }

    // --- Goals ---

    pub fn set_goals(&self, goals: Macros) {
        self.state.write().unwrap().set_goals(goals);
        self.emit(ChangeEvent::GoalsReplaced);
    }

    /// Serialize the current state for the persistence hand-off
    pub fn snapshot(&self) -> Snapshot {
        self.read(LedgerState::to_snapshot)
    }
}
