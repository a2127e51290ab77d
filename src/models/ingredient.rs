//! Ingredient model
//!
//! A reusable catalog entry with macro density per 100 g/ml.

use serde::{Deserialize, Serialize};

use super::Macros;

/// Physical form of an ingredient; decides whether amounts are grams or
/// milliliters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IngredientKind {
    #[default]
    Solid,
    Liquid,
}

impl IngredientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientKind::Solid => "solid",
            IngredientKind::Liquid => "liquid",
        }
    }

    /// Parse from string, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "solid" => Some(IngredientKind::Solid),
            "liquid" => Some(IngredientKind::Liquid),
            _ => None,
        }
    }

    /// Unit label for amounts of this kind
    pub fn unit(&self) -> &'static str {
        match self {
            IngredientKind::Solid => "g",
            IngredientKind::Liquid => "ml",
        }
    }
}

/// Catalog category, used for grouped listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IngredientCategory {
    Meat,
    Vegetables,
    Fruits,
    Dairy,
    Grains,
    Oils,
    #[default]
    Others,
}

impl IngredientCategory {
    /// All categories in display order
    pub const ALL: [IngredientCategory; 7] = [
        IngredientCategory::Meat,
        IngredientCategory::Vegetables,
        IngredientCategory::Fruits,
        IngredientCategory::Dairy,
        IngredientCategory::Grains,
        IngredientCategory::Oils,
        IngredientCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientCategory::Meat => "meat",
            IngredientCategory::Vegetables => "vegetables",
            IngredientCategory::Fruits => "fruits",
            IngredientCategory::Dairy => "dairy",
            IngredientCategory::Grains => "grains",
            IngredientCategory::Oils => "oils",
            IngredientCategory::Others => "others",
        }
    }

    /// Parse from string, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "meat" => Some(IngredientCategory::Meat),
            "vegetables" => Some(IngredientCategory::Vegetables),
            "fruits" => Some(IngredientCategory::Fruits),
            "dairy" => Some(IngredientCategory::Dairy),
            "grains" => Some(IngredientCategory::Grains),
            "oils" => Some(IngredientCategory::Oils),
            "others" => Some(IngredientCategory::Others),
            _ => None,
        }
    }
}

/// A catalog ingredient with macro density per 100 g/ml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub kind: IngredientKind,
    pub category: IngredientCategory,
    /// Macro amounts per 100 g (solid) or 100 ml (liquid)
    pub per_100: Macros,
}

/// Data for creating a new ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    #[serde(default)]
    pub kind: IngredientKind,
    #[serde(default)]
    pub category: IngredientCategory,
    pub kcals_per_100: f64,
    pub protein_per_100: f64,
    pub carbs_per_100: f64,
    pub fats_per_100: f64,
    #[serde(default)]
    pub sugars_per_100: f64,
}

impl IngredientCreate {
    /// Collect the per-100 fields into a Macros record
    pub fn per_100(&self) -> Macros {
        Macros {
            kcals: self.kcals_per_100,
            protein: self.protein_per_100,
            carbs: self.carbs_per_100,
            fats: self.fats_per_100,
            sugars: self.sugars_per_100,
        }
    }
}

/// Data for updating an ingredient; None leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub kind: Option<IngredientKind>,
    pub category: Option<IngredientCategory>,
    pub kcals_per_100: Option<f64>,
    pub protein_per_100: Option<f64>,
    pub carbs_per_100: Option<f64>,
    pub fats_per_100: Option<f64>,
    pub sugars_per_100: Option<f64>,
}

impl IngredientUpdate {
    /// Apply the set fields to an ingredient in place
    pub fn apply(&self, ingredient: &mut Ingredient) {
        if let Some(ref name) = self.name {
            ingredient.name = name.clone();
        }
        if let Some(kind) = self.kind {
            ingredient.kind = kind;
        }
        if let Some(category) = self.category {
            ingredient.category = category;
        }
        if let Some(v) = self.kcals_per_100 {
            ingredient.per_100.kcals = v;
        }
        if let Some(v) = self.protein_per_100 {
            ingredient.per_100.protein = v;
        }
        if let Some(v) = self.carbs_per_100 {
            ingredient.per_100.carbs = v;
        }
        if let Some(v) = self.fats_per_100 {
            ingredient.per_100.fats = v;
        }
        if let Some(v) = self.sugars_per_100 {
            ingredient.per_100.sugars = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_round_trip() {
        for cat in IngredientCategory::ALL {
            assert_eq!(IngredientCategory::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(IngredientCategory::parse("Dairy"), Some(IngredientCategory::Dairy));
        assert_eq!(IngredientCategory::parse("snacks"), None);
    }

    #[test]
    fn test_kind_units() {
        assert_eq!(IngredientKind::Solid.unit(), "g");
        assert_eq!(IngredientKind::Liquid.unit(), "ml");
        assert_eq!(IngredientKind::parse("LIQUID"), Some(IngredientKind::Liquid));
    }

    #[test]
    fn test_update_applies_only_set_fields() {
        let mut ing = Ingredient {
            id: 1,
            name: "Oats".to_string(),
            kind: IngredientKind::Solid,
            category: IngredientCategory::Grains,
            per_100: Macros {
                kcals: 389.0,
                protein: 16.9,
                carbs: 66.3,
                fats: 6.9,
                sugars: 0.99,
            },
        };

        let update = IngredientUpdate {
            kcals_per_100: Some(380.0),
            ..Default::default()
        };
        update.apply(&mut ing);

        assert_eq!(ing.per_100.kcals, 380.0);
        assert_eq!(ing.name, "Oats");
        assert_eq!(ing.per_100.protein, 16.9);
    }
}
