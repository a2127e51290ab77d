//! Nutrition Ledger MCP server implementation
//!
//! Implements the MCP server with all ledger tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::models::{
    FoodCreate, FoodUpdate, IngredientCategory, IngredientCreate, IngredientKind,
    IngredientUpdate, Macros,
};
use crate::store::Ledger;
use crate::tools::status::StatusTracker;
use crate::tools::{diary, foods, goals, ingredients};

/// Nutrition Ledger MCP service
#[derive(Clone)]
pub struct LedgerService {
    ledger: Ledger,
    status_tracker: Arc<Mutex<StatusTracker>>,
    tool_router: ToolRouter<LedgerService>,
}

impl LedgerService {
    pub fn new(ledger: Ledger, snapshot_path: Option<PathBuf>) -> Self {
        Self {
            ledger,
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(snapshot_path))),
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn parse_kind(s: Option<&str>) -> Result<IngredientKind, McpError> {
    match s {
        None => Ok(IngredientKind::default()),
        Some(s) => IngredientKind::parse(s)
            .ok_or_else(|| McpError::internal_error(format!("Unknown kind (solid/liquid): {}", s), None)),
    }
}

fn parse_category(s: Option<&str>) -> Result<IngredientCategory, McpError> {
    match s {
        None => Ok(IngredientCategory::default()),
        Some(s) => IngredientCategory::parse(s).ok_or_else(|| {
            McpError::internal_error(
                format!("Unknown category (meat/vegetables/fruits/dairy/grains/oils/others): {}", s),
                None,
            )
        }),
    }
}

// ============================================================================
// Ingredient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddIngredientParams {
    /// Ingredient name (e.g., "Chicken Breast")
    pub name: String,
    /// Physical form: solid or liquid (default solid)
    pub kind: Option<String>,
    /// Category: meat, vegetables, fruits, dairy, grains, oils, others (default others)
    pub category: Option<String>,
    /// Calories per 100 g/ml
    pub kcals_per_100: f64,
    /// Protein grams per 100 g/ml
    pub protein_per_100: f64,
    /// Carbohydrate grams per 100 g/ml
    pub carbs_per_100: f64,
    /// Fat grams per 100 g/ml
    pub fats_per_100: f64,
    /// Sugar grams per 100 g/ml (default 0)
    #[serde(default)]
    pub sugars_per_100: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetIngredientParams {
    /// Ingredient ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListIngredientsParams {
    /// Case-insensitive name substring to search for (optional)
    pub query: Option<String>,
    /// Restrict to one category (optional)
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BrowseCatalogParams {
    /// Case-insensitive name substring to search for (optional)
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateIngredientParams {
    /// Ingredient ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New kind: solid or liquid (optional)
    pub kind: Option<String>,
    /// New category (optional)
    pub category: Option<String>,
    /// New calories per 100 g/ml (optional)
    pub kcals_per_100: Option<f64>,
    /// New protein per 100 g/ml (optional)
    pub protein_per_100: Option<f64>,
    /// New carbs per 100 g/ml (optional)
    pub carbs_per_100: Option<f64>,
    /// New fats per 100 g/ml (optional)
    pub fats_per_100: Option<f64>,
    /// New sugars per 100 g/ml (optional)
    pub sugars_per_100: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteIngredientParams {
    /// Ingredient ID to delete
    pub id: i64,
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodParams {
    /// Food name (e.g., "Grilled Chicken Salad")
    pub name: String,
    /// Display name for one portion (default "portion")
    #[serde(default = "default_portion_name")]
    pub portion_name: String,
    /// Number of portions the composed ingredient amounts yield (default 1.0)
    #[serde(default = "default_portion_size")]
    pub portion_size: f64,
    /// Manual calories per portion; providing any manual value skips ingredient-based computation
    pub manual_kcals: Option<f64>,
    /// Manual protein grams per portion
    pub manual_protein: Option<f64>,
    /// Manual carb grams per portion
    pub manual_carbs: Option<f64>,
    /// Manual fat grams per portion
    pub manual_fats: Option<f64>,
    /// Manual sugar grams per portion
    pub manual_sugars: Option<f64>,
}

fn default_portion_name() -> String {
    "portion".to_string()
}
fn default_portion_size() -> f64 {
    1.0
}
fn default_servings() -> f64 {
    1.0
}

fn collect_manual_macros(
    kcals: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fats: Option<f64>,
    sugars: Option<f64>,
) -> Option<Macros> {
    if kcals.is_none() && protein.is_none() && carbs.is_none() && fats.is_none() && sugars.is_none()
    {
        return None;
    }
    Some(Macros {
        kcals: kcals.unwrap_or(0.0),
        protein: protein.unwrap_or(0.0),
        carbs: carbs.unwrap_or(0.0),
        fats: fats.unwrap_or(0.0),
        sugars: sugars.unwrap_or(0.0),
    })
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFoodParams {
    /// Food ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodsParams {
    /// Case-insensitive name substring to search for (optional)
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFoodParams {
    /// Food ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New portion display name (optional)
    pub portion_name: Option<String>,
    /// New portion size (optional, must be > 0)
    pub portion_size: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetManualMacrosParams {
    /// Food ID
    pub id: i64,
    /// Set true to clear the override and return to ingredient-based computation
    #[serde(default)]
    pub clear: bool,
    /// Manual calories per portion (default 0 when setting)
    pub kcals: Option<f64>,
    /// Manual protein grams per portion
    pub protein: Option<f64>,
    /// Manual carb grams per portion
    pub carbs: Option<f64>,
    /// Manual fat grams per portion
    pub fats: Option<f64>,
    /// Manual sugar grams per portion
    pub sugars: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFoodParams {
    /// Food ID to delete
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodIngredientParams {
    /// Food ID to add the ingredient to
    pub food_id: i64,
    /// Catalog ingredient ID; a copy is embedded in the food
    pub ingredient_id: i64,
    /// Amount in grams (solid) or milliliters (liquid), must be > 0
    pub amount: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveFoodIngredientParams {
    /// Food ID
    pub food_id: i64,
    /// Zero-based position in the food's ingredient list
    pub index: usize,
}

// ============================================================================
// Diary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Date in ISO format: YYYY-MM-DD, optionally with time (YYYY-MM-DDTHH:MM)
    pub date: String,
    /// Meal type: breakfast, lunch, dinner, or snacks
    pub meal_type: String,
    /// Catalog food ID; a snapshot copy is embedded in the entry
    pub food_id: i64,
    /// Serving multiplier on top of the food's per-portion totals (default 1.0)
    #[serde(default = "default_servings")]
    pub servings: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteEntryParams {
    /// Diary entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDiaryParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Narrow to one meal type (optional)
    pub meal_type: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DaySummaryParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MacroBreakdownParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Macro to drill into: kcals, protein, carbs, fats, or sugars
    pub macro_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDaysParams {
    /// Start date (inclusive), ISO format
    pub start_date: String,
    /// End date (inclusive), ISO format
    pub end_date: String,
}

// ============================================================================
// Goal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetGoalsParams {
    /// Daily calorie goal
    pub kcals: f64,
    /// Daily protein goal in grams
    pub protein: f64,
    /// Daily carb goal in grams
    pub carbs: f64,
    /// Daily fat goal in grams
    pub fats: f64,
    /// Daily sugar goal in grams (default 0)
    #[serde(default)]
    pub sugars: f64,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl LedgerService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutrition Ledger service including build info, ledger counts, and process information")]
    async fn ledger_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.ledger);
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for logging food. Call this when starting a new diary session or when unsure how to use the ledger tools.")]
    fn diary_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::DIARY_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(DIARY_INSTRUCTIONS)]))
    }

    // --- Ingredients ---

    #[tool(description = "Add a reusable ingredient to the catalog with macro density per 100 g/ml")]
    fn add_ingredient(&self, Parameters(p): Parameters<AddIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = IngredientCreate {
            name: p.name,
            kind: parse_kind(p.kind.as_deref())?,
            category: parse_category(p.category.as_deref())?,
            kcals_per_100: p.kcals_per_100,
            protein_per_100: p.protein_per_100,
            carbs_per_100: p.carbs_per_100,
            fats_per_100: p.fats_per_100,
            sugars_per_100: p.sugars_per_100,
        };
        let result = ingredients::add_ingredient(&self.ledger, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get full details for a catalog ingredient")]
    fn get_ingredient(&self, Parameters(p): Parameters<GetIngredientParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::get_ingredient(&self.ledger, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(ingredient) => json_result(&ingredient),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Ingredient not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List catalog ingredients with optional name search and category filter, sorted by name")]
    fn list_ingredients(&self, Parameters(p): Parameters<ListIngredientsParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::list_ingredients(&self.ledger, p.query.as_deref(), p.category.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Browse the ingredient catalog grouped by category; every category appears even when empty")]
    fn browse_catalog(&self, Parameters(p): Parameters<BrowseCatalogParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::browse_catalog(&self.ledger, p.query.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a catalog ingredient. Foods that already embedded a copy keep their old values.")]
    fn update_ingredient(&self, Parameters(p): Parameters<UpdateIngredientParams>) -> Result<CallToolResult, McpError> {
        let kind = match p.kind.as_deref() {
            None => None,
            Some(s) => Some(parse_kind(Some(s))?),
        };
        let category = match p.category.as_deref() {
            None => None,
            Some(s) => Some(parse_category(Some(s))?),
        };
        let data = IngredientUpdate {
            name: p.name,
            kind,
            category,
            kcals_per_100: p.kcals_per_100,
            protein_per_100: p.protein_per_100,
            carbs_per_100: p.carbs_per_100,
            fats_per_100: p.fats_per_100,
            sugars_per_100: p.sugars_per_100,
        };
        let result = ingredients::update_ingredient(&self.ledger, p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a catalog ingredient. Foods composed from it keep their embedded copies.")]
    fn delete_ingredient(&self, Parameters(p): Parameters<DeleteIngredientParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::delete_ingredient(&self.ledger, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Foods ---

    #[tool(description = "Create a food. Provide manual_* values for a quick-add food with fixed per-portion macros; otherwise compose it afterwards with add_food_ingredient.")]
    fn add_food(&self, Parameters(p): Parameters<AddFoodParams>) -> Result<CallToolResult, McpError> {
        let data = FoodCreate {
            name: p.name,
            portion_name: p.portion_name,
            portion_size: p.portion_size,
            manual_macros: collect_manual_macros(
                p.manual_kcals,
                p.manual_protein,
                p.manual_carbs,
                p.manual_fats,
                p.manual_sugars,
            ),
        };
        let result = foods::add_food(&self.ledger, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get full details for a food including its ingredient list and computed per-portion totals")]
    fn get_food(&self, Parameters(p): Parameters<GetFoodParams>) -> Result<CallToolResult, McpError> {
        let result = foods::get_food(&self.ledger, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(detail) => json_result(&detail),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Food not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List foods with optional name search, sorted by name")]
    fn list_foods(&self, Parameters(p): Parameters<ListFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::list_foods(&self.ledger, p.query.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a food's name or portion fields. Past diary entries keep their snapshots.")]
    fn update_food(&self, Parameters(p): Parameters<UpdateFoodParams>) -> Result<CallToolResult, McpError> {
        let data = FoodUpdate {
            name: p.name,
            portion_name: p.portion_name,
            portion_size: p.portion_size,
        };
        let result = foods::update_food(&self.ledger, p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set a food's manual macro override (pass clear=true to return to ingredient-based computation)")]
    fn set_manual_macros(&self, Parameters(p): Parameters<SetManualMacrosParams>) -> Result<CallToolResult, McpError> {
        let manual = if p.clear {
            None
        } else {
            collect_manual_macros(p.kcals, p.protein, p.carbs, p.fats, p.sugars)
        };
        let result = foods::set_manual_macros(&self.ledger, p.id, manual)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a food. Diary entries that logged it keep their snapshots.")]
    fn delete_food(&self, Parameters(p): Parameters<DeleteFoodParams>) -> Result<CallToolResult, McpError> {
        let result = foods::delete_food(&self.ledger, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add a catalog ingredient to a food with an amount in g/ml; a copy of the ingredient is embedded")]
    fn add_food_ingredient(&self, Parameters(p): Parameters<AddFoodIngredientParams>) -> Result<CallToolResult, McpError> {
        let result = foods::add_food_ingredient(&self.ledger, p.food_id, p.ingredient_id, p.amount)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove the ingredient at a zero-based position from a food")]
    fn remove_food_ingredient(&self, Parameters(p): Parameters<RemoveFoodIngredientParams>) -> Result<CallToolResult, McpError> {
        let result = foods::remove_food_ingredient(&self.ledger, p.food_id, p.index)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Diary ---

    #[tool(description = "Log a food to the diary on a date under a meal type with a servings multiplier")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let result = diary::log_food(&self.ledger, &p.date, &p.meal_type, p.food_id, p.servings)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a diary entry")]
    fn delete_entry(&self, Parameters(p): Parameters<DeleteEntryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::delete_entry(&self.ledger, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get one day's diary grouped by meal type with per-meal subtotals and day totals")]
    fn get_diary(&self, Parameters(p): Parameters<GetDiaryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::get_diary(&self.ledger, &p.date, p.meal_type.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get daily macro totals with percent-of-goal progress per macro")]
    fn day_summary(&self, Parameters(p): Parameters<DaySummaryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::day_summary(&self.ledger, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List which foods contributed to one macro on one day")]
    fn macro_breakdown(&self, Parameters(p): Parameters<MacroBreakdownParams>) -> Result<CallToolResult, McpError> {
        let result = diary::macro_breakdown(&self.ledger, &p.date, &p.macro_name)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List per-day totals and entry counts over an inclusive date range")]
    fn list_days(&self, Parameters(p): Parameters<ListDaysParams>) -> Result<CallToolResult, McpError> {
        let result = diary::list_days(&self.ledger, &p.start_date, &p.end_date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Goals ---

    #[tool(description = "Get the current daily macro goals")]
    fn get_goals(&self) -> Result<CallToolResult, McpError> {
        let result = goals::get_goals(&self.ledger)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Replace the daily macro goals wholesale")]
    fn set_goals(&self, Parameters(p): Parameters<SetGoalsParams>) -> Result<CallToolResult, McpError> {
        let new_goals = Macros {
            kcals: p.kcals,
            protein: p.protein,
            carbs: p.carbs,
            fats: p.fats,
            sugars: p.sugars,
        };
        let result = goals::set_goals(&self.ledger, new_goals)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for LedgerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutriledger".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrition Ledger".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrition Ledger - macro and food diary tracking. \
                 IMPORTANT: Call diary_instructions before a food logging session. \
                 Ingredients: add/get/list/update/delete_ingredient, browse_catalog (grouped by category). \
                 Foods: add/get/list/update/delete_food, add/remove_food_ingredient, set_manual_macros. \
                 Foods embed ingredient copies; catalog edits never change existing foods. \
                 Diary: log_food/delete_entry, get_diary (per-meal grouping), day_summary (goal progress), \
                 macro_breakdown (per-food drill-down), list_days (date range). \
                 Diary entries embed food snapshots; later food edits never change logged days. \
                 Goals: get_goals/set_goals (wholesale replace)."
                    .into(),
            ),
        }
    }
}
