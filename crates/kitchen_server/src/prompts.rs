//! Prompt templates, one per feature.

use kitchen_core::Language;
use kitchen_security::{ImageSubject, ImageUpload};
use kitchen_upstream::TextRequest;

/// Prompt sent to every image model by the diagnostics route.
pub const DIAGNOSTIC_PROMPT: &str = "red apple";

const DEFAULT_DIET: &str = "none";

const RECIPE_SCHEMA: &str = r#"{ "title": "str", "description": "str", "prepTime": "str", "difficulty": "str", "nutrition": {"calories": num, "protein": "str", "fat": "str", "carbs": "str"}, "ingredientsList": ["str"], "instructions": ["str"] }"#;

fn diet_context(diet: &str) -> String {
    if diet.is_empty() || diet == DEFAULT_DIET {
        String::new()
    } else {
        format!("Diet: {}.", diet)
    }
}

/// Ingredient detection from a photo.
pub fn vision(language: Language, upload: &ImageUpload) -> TextRequest {
    TextRequest::new(format!(
        "List all food items in this photo. Return JSON array of strings in {}.",
        language.prompt_name()
    ))
    .with_inline_image(upload.mime_type().as_str(), upload.base64().as_str())
}

/// A single gourmet recipe.
pub fn recipe(language: Language, ingredients: &[String]) -> TextRequest {
    TextRequest::new(format!("Ingredients: {}", ingredients.join(", "))).with_system_instruction(
        format!(
            "You are a world-class chef. Create a gourmet recipe in {}. Return ONLY JSON. Schema: {}",
            language.prompt_name(),
            RECIPE_SCHEMA
        ),
    )
}

/// Three distinct recipe suggestions.
pub fn recipes(language: Language, diet: &str, ingredients: &[String]) -> TextRequest {
    TextRequest::new(format!("Ingredients: {}", ingredients.join(", "))).with_system_instruction(
        format!(
            "Michelin Chef. Create 3 distinct recipes based on the ingredients provided. \
             Respond ONLY with a JSON array of 3 objects.\n\
             Schema for each object: {} in {}. Diet: {}.",
            RECIPE_SCHEMA,
            language.prompt_name(),
            diet
        ),
    )
}

/// A detailed recipe for a named dish.
pub fn recipe_detail(language: Language, diet: &str, title: &str) -> TextRequest {
    TextRequest::new(format!("Recipe for: {}", title)).with_system_instruction(format!(
        "Expert Chef. Create a detailed recipe for \"{}\". Respond ONLY valid JSON object with schema: {} in {}. Diet: {}.",
        title,
        RECIPE_SCHEMA,
        language.prompt_name(),
        diet
    ))
}

/// A seven-day plan built around a dish.
pub fn meal_plan(language: Language, diet: &str, title: &str) -> TextRequest {
    let prompt = format!(
        "Based on the dish \"{}\", create a balanced 7-day meal plan. Return JSON array of 7 objects. \
         Schema: {{ \"day\": \"Day Name\", \"breakfast\": \"Dish\", \"lunch\": \"Dish\", \"dinner\": \"Dish\" }}. Use {}. {}",
        title,
        language.prompt_name(),
        diet_context(diet)
    );
    TextRequest::new(prompt.trim_end())
}

/// Drink pairings for a dish.
pub fn drinks(language: Language, diet: &str, title: &str) -> TextRequest {
    let context = diet_context(diet);
    let prompt = if context.is_empty() {
        format!(
            "Suggest drinks for \"{}\" in {}. JSON: {{alcohol: \"text\", nonAlcohol: \"text\"}}.",
            title,
            language.prompt_name()
        )
    } else {
        format!(
            "Suggest drinks for \"{}\" in {}. {} JSON: {{alcohol: \"text\", nonAlcohol: \"text\"}}.",
            title,
            language.prompt_name(),
            context
        )
    };
    TextRequest::new(prompt)
}

/// Text sent to the image models.
pub fn image(subject: &ImageSubject) -> String {
    match subject {
        ImageSubject::Prompt(prompt) => prompt.clone(),
        ImageSubject::Title(title) => format!(
            "Gourmet cinematic food photography of {}, exquisite plating, professional lighting, 4k",
            title
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipes_prompt_mentions_language_and_diet() {
        let request = recipes(Language::Ru, "vegan", &["Tomato".into(), "Basil".into()]);
        assert_eq!(request.prompt(), "Ingredients: Tomato, Basil");
        let system = request.system_instruction().as_deref().unwrap();
        assert!(system.contains("in Russian"));
        assert!(system.ends_with("Diet: vegan."));
    }

    #[test]
    fn test_meal_plan_omits_default_diet() {
        let request = meal_plan(Language::En, "none", "Paella");
        assert!(!request.prompt().contains("Diet"));
        assert!(request.prompt().ends_with("Use English."));

        let request = meal_plan(Language::En, "keto", "Paella");
        assert!(request.prompt().ends_with("Diet: keto."));
    }

    #[test]
    fn test_drinks_prompt() {
        let request = drinks(Language::En, "none", "Steak");
        assert_eq!(
            request.prompt(),
            "Suggest drinks for \"Steak\" in English. JSON: {alcohol: \"text\", nonAlcohol: \"text\"}."
        );
    }

    #[test]
    fn test_image_prompt_from_title() {
        let prompt = image(&ImageSubject::Title("Pasta".into()));
        assert!(prompt.starts_with("Gourmet cinematic food photography of Pasta,"));
        assert_eq!(image(&ImageSubject::Prompt("A red apple".into())), "A red apple");
    }
}
