//! Shared macro-nutrient data structure
//!
//! Used for ingredient densities, food totals, manual overrides, and the
//! user's daily goals.

use serde::{Deserialize, Serialize};

/// Macro-nutrient amounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub kcals: f64,
    pub protein: f64, // grams
    pub carbs: f64,   // grams
    pub fats: f64,    // grams
    pub sugars: f64,  // grams
}

impl Macros {
    /// Create a new Macros with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale all values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            kcals: self.kcals * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fats: self.fats * multiplier,
            sugars: self.sugars * multiplier,
        }
    }

    /// Add another set of macros to this one
    pub fn add(&self, other: &Macros) -> Self {
        Self {
            kcals: self.kcals + other.kcals,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fats: self.fats + other.fats,
            sugars: self.sugars + other.sugars,
        }
    }

    /// Get a single field by selector
    pub fn get(&self, which: Macro) -> f64 {
        match which {
            Macro::Kcals => self.kcals,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fats => self.fats,
            Macro::Sugars => self.sugars,
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Macros {
    type Output = Macros;

    fn mul(self, multiplier: f64) -> Macros {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, m| acc + m)
    }
}

/// Selector for a single macro-nutrient field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Macro {
    Kcals,
    Protein,
    Carbs,
    Fats,
    Sugars,
}

impl Macro {
    /// All selectors in display order
    pub const ALL: [Macro; 5] = [
        Macro::Kcals,
        Macro::Protein,
        Macro::Carbs,
        Macro::Fats,
        Macro::Sugars,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Macro::Kcals => "kcals",
            Macro::Protein => "protein",
            Macro::Carbs => "carbs",
            Macro::Fats => "fats",
            Macro::Sugars => "sugars",
        }
    }

    /// Parse from string, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "kcals" | "calories" => Some(Macro::Kcals),
            "protein" => Some(Macro::Protein),
            "carbs" => Some(Macro::Carbs),
            "fats" => Some(Macro::Fats),
            "sugars" => Some(Macro::Sugars),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_and_add() {
        let a = Macros {
            kcals: 100.0,
            protein: 10.0,
            carbs: 20.0,
            fats: 5.0,
            sugars: 2.0,
        };
        let doubled = a.scale(2.0);
        assert_eq!(doubled.kcals, 200.0);
        assert_eq!(doubled.sugars, 4.0);

        let sum = a.clone() + doubled;
        assert_eq!(sum.protein, 30.0);
        assert_eq!(sum.fats, 15.0);
    }

    #[test]
    fn test_sum_over_iterator() {
        let parts = vec![
            Macros {
                kcals: 50.0,
                ..Macros::zero()
            },
            Macros {
                kcals: 70.0,
                ..Macros::zero()
            },
        ];
        let total: Macros = parts.into_iter().sum();
        assert_eq!(total.kcals, 120.0);
    }

    #[test]
    fn test_macro_parse() {
        assert_eq!(Macro::parse("protein"), Some(Macro::Protein));
        assert_eq!(Macro::parse("Calories"), Some(Macro::Kcals));
        assert_eq!(Macro::parse("fiber"), None);
    }
}
