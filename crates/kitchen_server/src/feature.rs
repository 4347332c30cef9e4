//! Product features served by the API.

/// One generation feature. Used as the upstream call label and to pick the
/// client-facing failure message.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Feature {
    /// Ingredient detection from a photo
    Vision,
    /// One recipe from ingredients
    Recipe,
    /// Three recipe suggestions from ingredients
    Recipes,
    /// One recipe from a dish title
    RecipeDetail,
    /// Seven-day plan around a dish
    MealPlan,
    /// Drink pairing for a dish
    Drinks,
    /// Food photography
    Image,
}

impl Feature {
    /// Message returned when the upstream call could not be completed.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Feature::Vision => "Vision request failed",
            Feature::Recipe => "Recipe request failed",
            Feature::Recipes => "Recipes request failed",
            Feature::RecipeDetail => "Recipe detail request failed",
            Feature::MealPlan => "Meal plan request failed",
            Feature::Drinks => "Drinks request failed",
            Feature::Image => "Image request failed",
        }
    }

    /// Message returned when the model answered with nothing usable.
    pub fn empty_message(&self) -> &'static str {
        match self {
            Feature::Recipe | Feature::RecipeDetail => "Model returned no recipe",
            Feature::Recipes => "Model returned no recipes",
            Feature::Vision => "Model returned no ingredients",
            Feature::MealPlan => "Model returned no meal plan",
            Feature::Drinks => "Model returned no drinks",
            Feature::Image => "Model returned no image",
        }
    }
}
