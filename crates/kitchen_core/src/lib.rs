//! Core data types for the Kitchen backend.
//!
//! This crate holds the public response schemas (recipes, meal plans, drink
//! pairings, generated images) and the normalization that turns loosely
//! structured model output into those schemas.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod image;
mod language;
mod meal_plan;
mod normalize;
mod recipe;
mod text;

pub use image::GeneratedImage;
pub use language::Language;
pub use meal_plan::{DrinkPairing, MealPlanDay};
pub use normalize::{
    clean_str, extract_number, normalize_drinks, normalize_meal_plan, normalize_recipe,
    normalize_recipes, string_items,
};
pub use recipe::{Nutrition, Recipe};
pub use text::{parse_model_json, strip_code_fences};
