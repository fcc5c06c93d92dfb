//! Mapping between the remote and persisted recipe representations.
//!
//! # Responsibility
//! - Flatten a catalog recipe into a storable favorite row.
//! - Reconstruct a displayable recipe from a stored favorite.
//!
//! # Invariants
//! - Remote-to-local always resets user-overlay fields to defaults,
//!   stamping `date_added` from the caller-provided clock value.
//! - Local-to-remote copies overlay fields forward verbatim and never
//!   re-expands the flattened ingredient text into slots.

use crate::model::favorite::FavoriteRecipe;
use crate::model::recipe::Recipe;

/// Converts a catalog recipe into a favorite row ready for first
/// insertion.
///
/// Copies all non-overlay fields verbatim, flattens the ingredient
/// slots into display text and sets the overlay defaults: empty
/// notes, rating 0.0 and `date_added = now_epoch_ms`. Prior overlay
/// values on `recipe` are deliberately ignored.
pub fn to_favorite(recipe: &Recipe, now_epoch_ms: i64) -> FavoriteRecipe {
    FavoriteRecipe {
        id: recipe.id.clone(),
        name: recipe.name.clone(),
        image_url: recipe.image_url.clone(),
        category: recipe.category.clone(),
        area: recipe.area.clone(),
        instructions: recipe.instructions.clone(),
        ingredients: recipe.formatted_ingredients(),
        video_url: recipe.video_url.clone(),
        user_notes: String::new(),
        rating: 0.0,
        date_added: now_epoch_ms,
    }
}

/// Reconstructs a catalog-shaped recipe from a stored favorite.
///
/// All fields including the user overlay come back verbatim. The
/// per-slot ingredient structure is not reconstructible from the
/// flattened text, so `ingredients` is left empty; display code reads
/// the favorite's flattened field instead.
pub fn to_recipe(favorite: &FavoriteRecipe) -> Recipe {
    Recipe {
        id: favorite.id.clone(),
        name: favorite.name.clone(),
        category: favorite.category.clone(),
        area: favorite.area.clone(),
        instructions: favorite.instructions.clone(),
        image_url: favorite.image_url.clone(),
        video_url: favorite.video_url.clone(),
        ingredients: Vec::new(),
        user_notes: favorite.user_notes.clone(),
        rating: favorite.rating,
        date_added: favorite.date_added,
    }
}

#[cfg(test)]
mod tests {
    use super::{to_favorite, to_recipe};
    use crate::model::recipe::{IngredientSlot, Recipe, MAX_INGREDIENT_SLOTS};

    fn recipe_with_slots(slots: Vec<IngredientSlot>) -> Recipe {
        let mut recipe = Recipe::with_id("52772");
        recipe.name = Some("Teriyaki Chicken Casserole".to_string());
        recipe.category = Some("Chicken".to_string());
        recipe.area = Some("Japanese".to_string());
        recipe.instructions = Some("Preheat oven to 350F.".to_string());
        recipe.image_url = Some("https://example.test/52772.jpg".to_string());
        recipe.video_url = Some("https://youtube.test/v".to_string());
        recipe.ingredients = slots;
        recipe
    }

    #[test]
    fn flattening_emits_one_line_per_populated_ingredient() {
        let recipe = recipe_with_slots(vec![
            IngredientSlot::new(Some("soy sauce"), Some("3/4 cup")),
            IngredientSlot::new(Some("water"), None),
            IngredientSlot::new(None, Some("1 tbsp")),
            IngredientSlot::new(Some("  "), Some("2 tsp")),
            IngredientSlot::new(Some("brown sugar"), Some(" 1/2 cup ")),
        ]);

        let favorite = to_favorite(&recipe, 1_700_000_000_000);
        let lines: Vec<&str> = favorite.ingredients.lines().collect();
        assert_eq!(
            lines,
            vec!["3/4 cup - soy sauce", "water", "1/2 cup - brown sugar"]
        );
    }

    #[test]
    fn flattening_caps_at_twenty_lines_and_keeps_slot_order() {
        let slots: Vec<IngredientSlot> = (1..=25)
            .map(|index| IngredientSlot {
                ingredient: Some(format!("item {index}")),
                measure: None,
            })
            .collect();
        let favorite = to_favorite(&recipe_with_slots(slots), 0);
        let lines: Vec<&str> = favorite.ingredients.lines().collect();
        assert_eq!(lines.len(), MAX_INGREDIENT_SLOTS);
        assert_eq!(lines[0], "item 1");
        assert_eq!(lines[19], "item 20");
    }

    #[test]
    fn to_favorite_resets_overlay_fields() {
        let mut recipe = recipe_with_slots(Vec::new());
        recipe.user_notes = "stale notes".to_string();
        recipe.rating = 4.0;
        recipe.date_added = 1;

        let favorite = to_favorite(&recipe, 42);
        assert_eq!(favorite.user_notes, "");
        assert_eq!(favorite.rating, 0.0);
        assert_eq!(favorite.date_added, 42);
    }

    #[test]
    fn round_trip_preserves_catalog_fields_not_slots() {
        let recipe = recipe_with_slots(vec![IngredientSlot::new(Some("rice"), Some("1 cup"))]);
        let restored = to_recipe(&to_favorite(&recipe, 7));

        assert_eq!(restored.id, recipe.id);
        assert_eq!(restored.name, recipe.name);
        assert_eq!(restored.category, recipe.category);
        assert_eq!(restored.area, recipe.area);
        assert_eq!(restored.instructions, recipe.instructions);
        assert_eq!(restored.image_url, recipe.image_url);
        assert_eq!(restored.video_url, recipe.video_url);
        assert!(restored.ingredients.is_empty());
        assert_eq!(restored.date_added, 7);
    }

    #[test]
    fn round_trip_copies_overlay_fields_forward() {
        let mut favorite = to_favorite(&recipe_with_slots(Vec::new()), 9);
        favorite.user_notes = "less soy next time".to_string();
        favorite.rating = 4.5;

        let restored = to_recipe(&favorite);
        assert_eq!(restored.user_notes, "less soy next time");
        assert_eq!(restored.rating, 4.5);
        assert_eq!(restored.date_added, 9);
    }
}
