//! Remote recipe model and catalog response envelope.
//!
//! # Responsibility
//! - Decode the catalog's JSON shape (`idMeal`, `strMeal`, numbered
//!   ingredient/measure fields) into a usable domain record.
//! - Provide the list-or-empty response envelope shared by every
//!   catalog endpoint.
//!
//! # Invariants
//! - A recipe carries at most [`MAX_INGREDIENT_SLOTS`] ingredient
//!   slots, in catalog slot order.
//! - A slot renders only when its ingredient is non-blank; a measure
//!   alone is never rendered.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Upper bound on ingredient/measure pairs carried by the catalog.
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// One ingredient/measure pair in catalog slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSlot {
    /// Ingredient text; gates whether the slot is rendered at all.
    pub ingredient: Option<String>,
    /// Measure text; only augments a rendered ingredient.
    pub measure: Option<String>,
}

impl IngredientSlot {
    pub fn new(ingredient: Option<&str>, measure: Option<&str>) -> Self {
        Self {
            ingredient: ingredient.map(str::to_string),
            measure: measure.map(str::to_string),
        }
    }

    /// Renders the slot as one display line, or `None` when the
    /// ingredient is absent or blank.
    pub fn render(&self) -> Option<String> {
        let ingredient = non_blank(self.ingredient.as_deref())?;
        match non_blank(self.measure.as_deref()) {
            Some(measure) => Some(format!("{measure} - {ingredient}")),
            None => Some(ingredient.to_string()),
        }
    }
}

/// A recipe as served by the remote catalog.
///
/// Transient and request-scoped: instances come from deserializing a
/// catalog response or from reconstructing a stored favorite, and are
/// not persisted unless explicitly converted and inserted. The user
/// overlay fields (`user_notes`, `rating`, `date_added`) are never on
/// the wire; they are populated only after a local round-trip.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "WireMeal")]
pub struct Recipe {
    /// Stable catalog id; empty only for not-yet-persisted results.
    pub id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    /// Country/area of origin.
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    /// Up to [`MAX_INGREDIENT_SLOTS`] pairs in catalog slot order.
    pub ingredients: Vec<IngredientSlot>,
    pub user_notes: String,
    /// 0.0 means "unrated"; valid range is 0.0 to 5.0.
    pub rating: f32,
    /// Epoch milliseconds; 0 until the recipe round-trips locally.
    pub date_added: i64,
}

impl Recipe {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Flattens the ingredient slots into display text: one line per
    /// renderable slot, in slot order, at most
    /// [`MAX_INGREDIENT_SLOTS`] lines.
    pub fn formatted_ingredients(&self) -> String {
        self.ingredients
            .iter()
            .take(MAX_INGREDIENT_SLOTS)
            .filter_map(IngredientSlot::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Response envelope shared by every catalog endpoint: one field
/// holding a list of recipes, absent when nothing matched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealsResponse {
    pub meals: Option<Vec<Recipe>>,
}

impl MealsResponse {
    /// True iff the underlying list is present and non-empty.
    pub fn has_results(&self) -> bool {
        self.meals.as_ref().is_some_and(|meals| !meals.is_empty())
    }

    /// First recipe in the response, for single-result endpoints.
    pub fn first(&self) -> Option<&Recipe> {
        self.meals.as_deref().and_then(<[Recipe]>::first)
    }

    pub fn count(&self) -> usize {
        self.meals.as_ref().map_or(0, Vec::len)
    }

    /// Consumes the envelope, yielding the list or an empty vec.
    pub fn into_recipes(self) -> Vec<Recipe> {
        self.meals.unwrap_or_default()
    }
}

/// Raw catalog JSON shape. Named fields are lifted directly; the
/// numbered `strIngredient*`/`strMeasure*` fields land in the
/// flattened map and are regrouped into slots.
#[derive(Debug, Deserialize)]
struct WireMeal {
    #[serde(rename = "idMeal")]
    id: Option<String>,
    #[serde(rename = "strMeal")]
    name: Option<String>,
    #[serde(rename = "strCategory")]
    category: Option<String>,
    #[serde(rename = "strArea")]
    area: Option<String>,
    #[serde(rename = "strInstructions")]
    instructions: Option<String>,
    #[serde(rename = "strMealThumb")]
    image_url: Option<String>,
    #[serde(rename = "strYoutube")]
    video_url: Option<String>,
    #[serde(flatten)]
    rest: BTreeMap<String, Option<String>>,
}

impl From<WireMeal> for Recipe {
    fn from(wire: WireMeal) -> Self {
        let mut ingredients = Vec::new();
        for index in 1..=MAX_INGREDIENT_SLOTS {
            let ingredient = wire_slot(&wire.rest, "strIngredient", index);
            let measure = wire_slot(&wire.rest, "strMeasure", index);
            if ingredient.is_some() || measure.is_some() {
                ingredients.push(IngredientSlot {
                    ingredient,
                    measure,
                });
            }
        }

        Self {
            id: wire.id.unwrap_or_default(),
            name: wire.name,
            category: wire.category,
            area: wire.area,
            instructions: wire.instructions,
            image_url: wire.image_url,
            video_url: wire.video_url,
            ingredients,
            user_notes: String::new(),
            rating: 0.0,
            date_added: 0,
        }
    }
}

fn wire_slot(rest: &BTreeMap<String, Option<String>>, prefix: &str, index: usize) -> Option<String> {
    rest.get(&format!("{prefix}{index}"))
        .and_then(Option::clone)
        .filter(|value| !value.trim().is_empty())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{MealsResponse, Recipe, MAX_INGREDIENT_SLOTS};

    #[test]
    fn wire_recipe_decodes_named_fields_and_slots() {
        let json = r#"{
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven to 350F.",
            "strMealThumb": "https://example.test/52772.jpg",
            "strYoutube": "https://youtube.test/v",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": "starch",
            "strMeasure2": "",
            "strIngredient3": null,
            "strMeasure3": null
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, "52772");
        assert_eq!(recipe.name.as_deref(), Some("Teriyaki Chicken Casserole"));
        assert_eq!(recipe.category.as_deref(), Some("Chicken"));
        assert_eq!(recipe.area.as_deref(), Some("Japanese"));
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].measure.as_deref(), Some("3/4 cup"));
        assert_eq!(recipe.ingredients[1].measure, None);
        assert_eq!(recipe.user_notes, "");
        assert_eq!(recipe.rating, 0.0);
    }

    #[test]
    fn wire_recipe_tolerates_sparse_minimal_objects() {
        // filter.php returns only id, name and thumbnail per recipe.
        let json = r#"{"strMeal":"Baked salmon","strMealThumb":"x.jpg","idMeal":"45"}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, "45");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.instructions.is_none());
    }

    #[test]
    fn envelope_with_meals_reports_results() {
        let json = r#"{"meals":[{"idMeal":"1"},{"idMeal":"2"}]}"#;
        let response: MealsResponse = serde_json::from_str(json).unwrap();
        assert!(response.has_results());
        assert_eq!(response.count(), 2);
        assert_eq!(response.first().unwrap().id, "1");
    }

    #[test]
    fn envelope_with_null_meals_is_empty() {
        let response: MealsResponse = serde_json::from_str(r#"{"meals":null}"#).unwrap();
        assert!(!response.has_results());
        assert_eq!(response.count(), 0);
        assert!(response.first().is_none());
        assert!(response.into_recipes().is_empty());
    }

    #[test]
    fn slots_beyond_the_cap_are_ignored() {
        let mut fields = Vec::new();
        for index in 1..=25 {
            fields.push(format!(r#""strIngredient{index}":"item {index}""#));
        }
        let json = format!(r#"{{"idMeal":"9","{}":"x",{}}}"#, "strMeal", fields.join(","));
        let recipe: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(recipe.ingredients.len(), MAX_INGREDIENT_SLOTS);
    }
}
