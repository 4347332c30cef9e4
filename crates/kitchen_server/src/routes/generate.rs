//! Text-generation routes.
//!
//! Each handler validates its body, builds one prompt, makes one retried
//! upstream call and normalizes the model's JSON into the public schema.

use crate::{ApiError, AppState, Feature, prompts};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use kitchen_core::{
    DrinkPairing, Language, MealPlanDay, Recipe, normalize_drinks, normalize_meal_plan,
    normalize_recipe, normalize_recipes, parse_model_json, string_items,
};
use kitchen_security::sanitize_text;
use kitchen_upstream::TextRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

/// Body of `POST /api/vision`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionBody {
    image_base64: Option<String>,
    mime_type: Option<String>,
    language: Option<String>,
}

/// Body of `POST /api/recipe` and `POST /api/recipes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientsBody {
    ingredients: Option<Value>,
    language: Option<String>,
    diet: Option<String>,
}

/// Body of the title-driven routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleBody {
    title: Option<String>,
    language: Option<String>,
    diet: Option<String>,
}

/// Detected ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisionResponse {
    ingredients: Vec<String>,
}

/// Run one text generation and parse its JSON.
///
/// `Ok(None)` means the upstream rejected the request or the model said nothing.
#[instrument(skip(state, request))]
async fn generate_json(
    state: &AppState,
    feature: Feature,
    request: TextRequest,
) -> Result<Option<Value>, ApiError> {
    let text = state
        .gemini()
        .generate_text(feature.into(), &request)
        .await
        .map_err(|e| ApiError::upstream(feature, &e))?;

    let parsed = parse_model_json(&text).map_err(|e| {
        error!(%feature, error = %e, "Model output could not be parsed");
        ApiError::Failed(feature)
    })?;
    if parsed.is_none() {
        debug!(%feature, "Model returned no content");
    }
    Ok(parsed)
}

/// `POST /api/vision`
pub async fn vision(
    State(state): State<AppState>,
    body: Result<Json<VisionBody>, JsonRejection>,
) -> Result<Json<VisionResponse>, ApiError> {
    state.require_api_key()?;
    let Json(body) = body?;
    let upload = state
        .validator()
        .image(body.image_base64.as_deref(), body.mime_type.as_deref())?;
    let language = Language::from_code(body.language.as_deref());

    let ingredients = generate_json(&state, Feature::Vision, prompts::vision(language, &upload))
        .await?
        .map(|value| {
            string_items(&value)
                .iter()
                .map(|item| sanitize_text(item))
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(Json(VisionResponse { ingredients }))
}

/// `POST /api/recipe`
pub async fn recipe(
    State(state): State<AppState>,
    body: Result<Json<IngredientsBody>, JsonRejection>,
) -> Result<Json<Recipe>, ApiError> {
    state.require_api_key()?;
    let Json(body) = body?;
    let ingredients = state.validator().ingredients(body.ingredients.as_ref())?;
    let language = Language::from_code(body.language.as_deref());

    let value = generate_json(&state, Feature::Recipe, prompts::recipe(language, &ingredients))
        .await?
        .ok_or(ApiError::Empty(Feature::Recipe))?;
    normalize_recipe(&value, "")
        .map(Json)
        .ok_or(ApiError::Empty(Feature::Recipe))
}

/// `POST /api/recipes`
///
/// A valid empty array from the model is returned as `[]`; no content at all is 502.
pub async fn recipes(
    State(state): State<AppState>,
    body: Result<Json<IngredientsBody>, JsonRejection>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    state.require_api_key()?;
    let Json(body) = body?;
    let ingredients = state.validator().ingredients(body.ingredients.as_ref())?;
    let language = Language::from_code(body.language.as_deref());
    let diet = state.validator().diet(body.diet.as_deref());

    let value = generate_json(
        &state,
        Feature::Recipes,
        prompts::recipes(language, &diet, &ingredients),
    )
    .await?
    .ok_or(ApiError::Empty(Feature::Recipes))?;
    Ok(Json(normalize_recipes(&value)))
}

/// `POST /api/recipe-detail`
pub async fn recipe_detail(
    State(state): State<AppState>,
    body: Result<Json<TitleBody>, JsonRejection>,
) -> Result<Json<Recipe>, ApiError> {
    state.require_api_key()?;
    let Json(body) = body?;
    let title = state.validator().title(body.title.as_deref())?;
    let language = Language::from_code(body.language.as_deref());
    let diet = state.validator().diet(body.diet.as_deref());

    let value = generate_json(
        &state,
        Feature::RecipeDetail,
        prompts::recipe_detail(language, &diet, &title),
    )
    .await?
    .ok_or(ApiError::Empty(Feature::RecipeDetail))?;
    normalize_recipe(&value, &title)
        .map(Json)
        .ok_or(ApiError::Empty(Feature::RecipeDetail))
}

/// `POST /api/meal-plan`
pub async fn meal_plan(
    State(state): State<AppState>,
    body: Result<Json<TitleBody>, JsonRejection>,
) -> Result<Json<Vec<MealPlanDay>>, ApiError> {
    state.require_api_key()?;
    let Json(body) = body?;
    let title = state.validator().title(body.title.as_deref())?;
    let language = Language::from_code(body.language.as_deref());
    let diet = state.validator().diet(body.diet.as_deref());

    let plan = generate_json(
        &state,
        Feature::MealPlan,
        prompts::meal_plan(language, &diet, &title),
    )
    .await?
    .map(|value| normalize_meal_plan(&value))
    .unwrap_or_default();
    Ok(Json(plan))
}

/// `POST /api/drinks`
pub async fn drinks(
    State(state): State<AppState>,
    body: Result<Json<TitleBody>, JsonRejection>,
) -> Result<Json<DrinkPairing>, ApiError> {
    state.require_api_key()?;
    let Json(body) = body?;
    let title = state.validator().title(body.title.as_deref())?;
    let language = Language::from_code(body.language.as_deref());
    let diet = state.validator().diet(body.diet.as_deref());

    let pairing = generate_json(&state, Feature::Drinks, prompts::drinks(language, &diet, &title))
        .await?
        .map(|value| normalize_drinks(&value))
        .unwrap_or_default();
    Ok(Json(pairing))
}
