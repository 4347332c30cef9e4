//! Meal plan and drink pairing schemas.

use serde::{Deserialize, Serialize};

/// One day of a weekly meal plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlanDay {
    /// Day label ("Monday")
    pub day: String,
    /// Breakfast dish
    pub breakfast: String,
    /// Lunch dish
    pub lunch: String,
    /// Dinner dish
    pub dinner: String,
}

/// Drink suggestions for a dish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkPairing {
    /// Alcoholic suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol: Option<String>,
    /// Non-alcoholic suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_alcohol: Option<String>,
}
