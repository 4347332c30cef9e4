//! Coercion of loosely structured model output into public schemas.
//!
//! The text model is asked for strict JSON but routinely returns nested
//! objects where strings are expected, numbered steps, units mixed into
//! numbers, or Russian field names. Every function here is total: it never
//! fails, it only falls back to defaults.

use crate::{DrinkPairing, MealPlanDay, Nutrition, Recipe};
use serde_json::Value;

const MAX_RECIPES: usize = 3;
const MAX_PLAN_DAYS: usize = 7;

/// Strip a leading `Step N:` marker, case-insensitively.
fn strip_step_marker(text: &str) -> &str {
    let Some(head) = text.get(..4) else {
        return text;
    };
    if !head.eq_ignore_ascii_case("step") {
        return text;
    }
    let rest = text[4..].trim_start();
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return text;
    }
    match rest[digits..].trim_start().strip_prefix(':') {
        Some(body) => body.trim_start(),
        None => text,
    }
}

/// Strip a leading `N.` or `N)` marker. A decimal such as `12.5g` is kept.
fn strip_number_marker(text: &str) -> &str {
    let rest = text.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == text.len() {
        return text;
    }
    let body = match rest.strip_prefix('.') {
        Some(body) if body.starts_with(|c: char| c.is_ascii_digit()) => return text,
        Some(body) => body,
        None => match rest.strip_prefix(')') {
            Some(body) => body,
            None => return text,
        },
    };
    body.trim_start()
}

/// JavaScript-style truthiness, used for "first non-empty field" fallbacks.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn first_truthy<'a>(candidates: impl IntoIterator<Item = Option<&'a Value>>) -> Option<&'a Value> {
    candidates.into_iter().flatten().find(|v| truthy(v))
}

/// Reduce any JSON value to a display string.
///
/// Objects collapse to their `text`, `instruction`, `name` or `desc` member
/// (or their first string value). A leading `Step N:` or `N.`/`N)` marker is
/// removed.
///
/// # Examples
///
/// ```
/// use kitchen_core::clean_str;
/// use serde_json::json;
///
/// assert_eq!(clean_str(&json!("Step 2: Boil water")), "Boil water");
/// assert_eq!(clean_str(&json!("3) Drain")), "Drain");
/// assert_eq!(clean_str(&json!({"instruction": "Stir"})), "Stir");
/// assert_eq!(clean_str(&json!(42)), "42");
/// assert_eq!(clean_str(&json!(null)), "");
/// ```
pub fn clean_str(value: &Value) -> String {
    let raw = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => first_truthy(
            ["text", "instruction", "name", "desc"]
                .iter()
                .map(|key| map.get(*key)),
        )
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .or_else(|| map.values().find_map(|v| v.as_str().map(str::to_string)))
        .unwrap_or_default(),
        Value::Array(items) => items
            .iter()
            .find_map(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
    };

    strip_number_marker(strip_step_marker(raw.trim()))
        .trim()
        .to_string()
}

/// Parse a number out of free text, dropping everything but digits and dots.
///
/// # Examples
///
/// ```
/// use kitchen_core::extract_number;
/// use serde_json::json;
///
/// assert_eq!(extract_number(&json!("450 kcal")), 450.0);
/// assert_eq!(extract_number(&json!(312.5)), 312.5);
/// assert_eq!(extract_number(&json!("n/a")), 0.0);
/// ```
pub fn extract_number(value: &Value) -> f64 {
    let text = match value {
        Value::Null | Value::Object(_) | Value::Array(_) | Value::Bool(_) => return 0.0,
        Value::Number(n) => return n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Value::String(s) => s,
    };

    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // Longest prefix with at most one decimal point.
    let mut seen_dot = false;
    let prefix: String = digits
        .chars()
        .take_while(|c| {
            if *c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
            }
            true
        })
        .collect();

    prefix
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(clean_str)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Normalize a single recipe-shaped value.
///
/// Returns `None` only for a falsy input (null, empty string, zero, false).
///
/// # Examples
///
/// ```
/// use kitchen_core::normalize_recipe;
/// use serde_json::json;
///
/// let recipe = normalize_recipe(
///     &json!({"recipe": {"steps": ["1. Chop", "Step 2: Fry"], "calories": "300kcal"}}),
///     "Omelette",
/// )
/// .unwrap();
///
/// assert_eq!(recipe.title, "Omelette");
/// assert_eq!(recipe.instructions, vec!["Chop", "Fry"]);
/// assert_eq!(recipe.nutrition.calories, 300.0);
/// ```
pub fn normalize_recipe(raw: &Value, fallback_title: &str) -> Option<Recipe> {
    if !truthy(raw) {
        return None;
    }
    let data = raw.get("recipe").filter(|v| truthy(v)).unwrap_or(raw);
    let nutrition = data.get("nutrition");
    let field = |key: &str| data.get(key).map(clean_str).unwrap_or_default();

    let calories = [
        nutrition.and_then(|n| n.get("calories")),
        nutrition.and_then(|n| n.get("kcal")),
        data.get("calories"),
        data.get("kcal"),
    ]
    .into_iter()
    .flatten()
    .find(|v| !v.is_null())
    .map(extract_number)
    .unwrap_or(0.0);

    let find_macro = |keys: &[&str]| -> String {
        keys.iter()
            .filter_map(|key| {
                nutrition
                    .and_then(|n| n.get(*key))
                    .filter(|v| !v.is_null())
                    .or_else(|| data.get(*key))
            })
            .filter(|v| !v.is_null())
            .map(clean_str)
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| "0".to_string())
    };

    let title = {
        let cleaned = field("title");
        if !cleaned.is_empty() {
            cleaned
        } else {
            non_empty_or(fallback_title.to_string(), "Untitled Recipe")
        }
    };

    let prep_time = first_truthy([data.get("prepTime"), data.get("time")])
        .map(clean_str)
        .unwrap_or_default();

    let ingredients_source = [data.get("ingredientsList"), data.get("ingredients")]
        .into_iter()
        .flatten()
        .find(|v| v.is_array());
    let instructions_source = [data.get("instructions"), data.get("steps")]
        .into_iter()
        .flatten()
        .find(|v| v.is_array());

    Some(Recipe {
        title,
        description: non_empty_or(field("description"), "AI Chef Creation"),
        prep_time: non_empty_or(prep_time, "30m"),
        difficulty: non_empty_or(field("difficulty"), "Normal"),
        nutrition: Nutrition {
            calories,
            protein: find_macro(&["protein", "proteins", "белки", "белок"]),
            fat: find_macro(&["fat", "fats", "жиры", "жир"]),
            carbs: find_macro(&["carbs", "carbohydrates", "углеводы", "углевод"]),
        },
        ingredients_list: string_list(ingredients_source),
        instructions: string_list(instructions_source),
    })
}

/// Normalize a list of recipes, capped at three.
///
/// A single object is treated as a one-element list.
pub fn normalize_recipes(raw: &Value) -> Vec<Recipe> {
    let items: Vec<&Value> = match raw {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![raw],
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| normalize_recipe(item, ""))
        .take(MAX_RECIPES)
        .collect()
}

/// Normalize a weekly meal plan to at most seven entries.
pub fn normalize_meal_plan(raw: &Value) -> Vec<MealPlanDay> {
    let Value::Array(items) = raw else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.is_object())
        .take(MAX_PLAN_DAYS)
        .map(|item| {
            let field = |key: &str| item.get(key).map(clean_str).unwrap_or_default();
            MealPlanDay {
                day: field("day"),
                breakfast: field("breakfast"),
                lunch: field("lunch"),
                dinner: field("dinner"),
            }
        })
        .collect()
}

/// Normalize a drink pairing object.
pub fn normalize_drinks(raw: &Value) -> DrinkPairing {
    let Value::Object(map) = raw else {
        return DrinkPairing::default();
    };
    let field = |key: &str| {
        map.get(key)
            .map(clean_str)
            .filter(|s| !s.is_empty())
    };
    DrinkPairing {
        alcohol: field("alcohol"),
        non_alcohol: field("nonAlcohol"),
    }
}

/// Keep only the string items of an array; anything else yields an empty list.
pub fn string_items(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
