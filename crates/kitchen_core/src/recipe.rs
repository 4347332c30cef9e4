//! Recipe schema returned by the recipe endpoints.

use serde::{Deserialize, Serialize};

/// Per-serving nutrition facts.
///
/// Calories are numeric; macros stay free-form strings ("12 g", "12г").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    /// Energy in kcal
    pub calories: f64,
    /// Protein amount
    pub protein: String,
    /// Fat amount
    pub fat: String,
    /// Carbohydrate amount
    pub carbs: String,
}

impl Default for Nutrition {
    fn default() -> Self {
        Self {
            calories: 0.0,
            protein: "0".to_string(),
            fat: "0".to_string(),
            carbs: "0".to_string(),
        }
    }
}

/// A generated recipe.
///
/// # Examples
///
/// ```
/// use kitchen_core::{Nutrition, Recipe};
///
/// let recipe = Recipe {
///     title: "Caprese".to_string(),
///     description: "Fresh salad".to_string(),
///     prep_time: "10m".to_string(),
///     difficulty: "Easy".to_string(),
///     nutrition: Nutrition::default(),
///     ingredients_list: vec!["Tomato".to_string(), "Basil".to_string()],
///     instructions: vec!["Slice".to_string()],
/// };
///
/// let json = serde_json::to_value(&recipe).unwrap();
/// assert_eq!(json["prepTime"], "10m");
/// assert_eq!(json["ingredientsList"][1], "Basil");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Dish name
    pub title: String,
    /// Short pitch
    pub description: String,
    /// Preparation time, e.g. "30m"
    pub prep_time: String,
    /// Difficulty label
    pub difficulty: String,
    /// Nutrition facts
    pub nutrition: Nutrition,
    /// Ingredient lines
    pub ingredients_list: Vec<String>,
    /// Ordered steps
    pub instructions: Vec<String>,
}
