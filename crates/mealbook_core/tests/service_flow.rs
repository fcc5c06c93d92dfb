mod support;

use mealbook_core::{
    FavoriteRecipe, FavoritesStore, IngredientSlot, MealApiClient, Recipe, RecipeService,
};
use std::sync::mpsc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);
const TICK: Duration = Duration::from_millis(50);

const ONE_MEAL: &str = r#"{"meals":[
    {"idMeal":"52772","strMeal":"Teriyaki Chicken Casserole","strCategory":"Chicken",
     "strArea":"Japanese","strInstructions":"Preheat oven to 350F.",
     "strMealThumb":"https://example.test/52772.jpg",
     "strIngredient1":"soy sauce","strMeasure1":"3/4 cup",
     "strIngredient2":"water","strMeasure2":""}
]}"#;

fn offline_service() -> (RecipeService, FavoritesStore) {
    let store = FavoritesStore::open_in_memory().unwrap();
    let api = MealApiClient::new(support::refused_base_url());
    (RecipeService::new(api, store.clone()), store)
}

fn favorite(id: &str, name: &str, date_added: i64) -> FavoriteRecipe {
    let mut favorite = FavoriteRecipe::new(id, date_added);
    favorite.name = Some(name.to_string());
    favorite
}

#[test]
fn search_resolves_with_decoded_recipes() {
    let catalog = support::serve("200 OK", ONE_MEAL);
    let store = FavoritesStore::open_in_memory().unwrap();
    let service = RecipeService::new(MealApiClient::new(catalog.base_url.as_str()), store);

    let mut fetch = service.search_recipes("teriyaki");
    let recipes = fetch.wait_timeout(WAIT).expect("search should resolve");
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].name.as_deref(), Some("Teriyaki Chicken Casserole"));
}

#[test]
fn empty_failed_and_error_searches_all_resolve_empty() {
    let no_match = support::serve("200 OK", r#"{"meals":null}"#);
    let failing = support::serve("500 Internal Server Error", "{}");

    let store = FavoritesStore::open_in_memory().unwrap();
    let service = RecipeService::new(MealApiClient::new(no_match.base_url.as_str()), store.clone());
    let mut fetch = service.search_recipes("no such dish");
    assert!(fetch.wait_timeout(WAIT).expect("should resolve").is_empty());

    let service = RecipeService::new(MealApiClient::new(failing.base_url.as_str()), store.clone());
    let mut fetch = service.search_recipes("anything");
    assert!(fetch.wait_timeout(WAIT).expect("should resolve").is_empty());

    let (service, _) = offline_service();
    let mut fetch = service.search_recipes("anything");
    assert!(fetch.wait_timeout(WAIT).expect("should resolve").is_empty());
}

#[test]
fn recipe_details_resolves_first_result_or_none() {
    let catalog = support::serve("200 OK", ONE_MEAL);
    let store = FavoritesStore::open_in_memory().unwrap();
    let service = RecipeService::new(MealApiClient::new(catalog.base_url.as_str()), store);

    let mut fetch = service.recipe_details("52772");
    let details = fetch.wait_timeout(WAIT).expect("lookup should resolve");
    assert_eq!(details.as_ref().unwrap().id, "52772");

    let (offline, _) = offline_service();
    let mut fetch = offline.random_recipe();
    assert!(fetch.wait_timeout(WAIT).expect("should resolve").is_none());
}

#[test]
fn add_favorite_converts_and_lands_in_live_queries() {
    let (service, store) = offline_service();
    let mut all = service.all_favorites().unwrap();

    let mut recipe = Recipe::with_id("52772");
    recipe.name = Some("Teriyaki Chicken Casserole".to_string());
    recipe.ingredients = vec![
        IngredientSlot::new(Some("soy sauce"), Some("3/4 cup")),
        IngredientSlot::new(Some("water"), None),
    ];
    service.add_favorite(&recipe);

    let snapshot = all.wait_update(WAIT).expect("insert should refresh watchers");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, "52772");
    assert_eq!(snapshot[0].ingredients, "3/4 cup - soy sauce\nwater");
    assert_eq!(snapshot[0].user_notes, "");
    assert_eq!(snapshot[0].rating, 0.0);
    assert!(snapshot[0].date_added > 0);

    assert!(store.exists("52772").unwrap());
}

#[test]
fn notes_and_rating_updates_flow_to_by_id_watchers() {
    let (service, store) = offline_service();
    store.insert_or_replace(&favorite("52772", "casserole", 10)).unwrap();

    let mut live = service.favorite_by_id("52772").unwrap();
    service.update_notes_and_rating("52772", "great", 4.5);

    let snapshot = live
        .wait_update(WAIT)
        .expect("overlay update should refresh watchers")
        .expect("row should still exist");
    assert_eq!(snapshot.user_notes, "great");
    assert_eq!(snapshot.rating, 4.5);
}

#[test]
fn update_notes_and_rating_on_missing_id_creates_nothing() {
    let (service, store) = offline_service();
    let mut count = service.favorites_count().unwrap();

    service.update_notes_and_rating("52772", "great", 4.5);
    assert!(count.wait_update(TICK * 4).is_none());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn delete_operations_empty_the_store() {
    let (service, store) = offline_service();
    store.insert_or_replace(&favorite("1", "a", 1)).unwrap();
    store.insert_or_replace(&favorite("2", "b", 2)).unwrap();

    let mut count = service.favorites_count().unwrap();
    assert_eq!(count.get(), 2);

    // Waiting between submissions keeps the two pool workers from
    // racing each other on the shared queue.
    service.delete_favorite(&favorite("1", "a", 1));
    assert_eq!(count.wait_update(WAIT), Some(1));

    service.delete_all_favorites();
    assert_eq!(count.wait_update(WAIT), Some(0));
}

#[test]
fn is_favorited_answers_through_the_callback() {
    let (service, store) = offline_service();
    store.insert_or_replace(&favorite("52772", "saved", 1)).unwrap();

    let (tx, rx) = mpsc::channel();
    let probe = tx.clone();
    service.is_favorited("52772", move |favorited| {
        let _ = probe.send(favorited);
    });
    service.is_favorited("404", move |favorited| {
        let _ = tx.send(favorited);
    });

    let mut answers = vec![rx.recv_timeout(WAIT).unwrap(), rx.recv_timeout(WAIT).unwrap()];
    answers.sort();
    assert_eq!(answers, vec![false, true]);
}

#[test]
fn search_favorites_and_top_rated_pass_through() {
    let (service, store) = offline_service();
    let mut lasagna = favorite("1", "Lasagna", 10);
    lasagna.rating = 4.0;
    store.insert_or_replace(&lasagna).unwrap();
    store.insert_or_replace(&favorite("2", "Beef Stew", 20)).unwrap();

    let mut hits = service.search_favorites("lasagna").unwrap();
    assert_eq!(hits.get().len(), 1);

    let mut top = service.top_rated_favorites(3.0).unwrap();
    let snapshot = top.get();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, "1");
}
