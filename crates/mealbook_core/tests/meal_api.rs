mod support;

use mealbook_core::{ApiError, MealApiClient};

const TWO_MEALS: &str = r#"{"meals":[
    {"idMeal":"52772","strMeal":"Teriyaki Chicken Casserole","strCategory":"Chicken",
     "strIngredient1":"soy sauce","strMeasure1":"3/4 cup"},
    {"idMeal":"52773","strMeal":"Honey Teriyaki Salmon","strCategory":"Seafood"}
]}"#;

#[test]
fn search_hits_the_expected_endpoint_and_decodes_results() {
    let catalog = support::serve("200 OK", TWO_MEALS);
    let client = MealApiClient::new(catalog.base_url.as_str());

    let response = client.search_by_name("pasta").unwrap();
    assert!(response.has_results());
    assert_eq!(response.count(), 2);
    assert_eq!(response.first().unwrap().id, "52772");

    let request = catalog.requests.recv().unwrap();
    assert_eq!(request, "GET /search.php?s=pasta HTTP/1.1");
}

#[test]
fn lookup_and_random_use_their_fixed_paths() {
    let catalog = support::serve("200 OK", TWO_MEALS);
    let client = MealApiClient::new(catalog.base_url.as_str());

    client.get_by_id("52772").unwrap();
    client.get_random().unwrap();
    client.filter_by_category("Seafood").unwrap();
    client.list_categories().unwrap();

    assert_eq!(
        catalog.requests.recv().unwrap(),
        "GET /lookup.php?i=52772 HTTP/1.1"
    );
    assert_eq!(catalog.requests.recv().unwrap(), "GET /random.php HTTP/1.1");
    assert_eq!(
        catalog.requests.recv().unwrap(),
        "GET /filter.php?c=Seafood HTTP/1.1"
    );
    assert_eq!(
        catalog.requests.recv().unwrap(),
        "GET /categories.php HTTP/1.1"
    );
}

#[test]
fn zero_matches_is_a_successful_empty_envelope() {
    let catalog = support::serve("200 OK", r#"{"meals":null}"#);
    let client = MealApiClient::new(catalog.base_url.as_str());

    let response = client.search_by_name("xkcd-no-such-dish").unwrap();
    assert!(!response.has_results());
    assert_eq!(response.count(), 0);
    assert!(response.first().is_none());
}

#[test]
fn non_success_status_is_reported_with_its_code() {
    let catalog = support::serve("404 Not Found", "{}");
    let client = MealApiClient::new(catalog.base_url.as_str());

    let err = client.get_by_id("nope").unwrap_err();
    assert!(matches!(err, ApiError::Status { code: 404 }));
}

#[test]
fn malformed_bodies_are_decode_failures() {
    let catalog = support::serve("200 OK", "<html>captive portal</html>");
    let client = MealApiClient::new(catalog.base_url.as_str());

    let err = client.get_random().unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn connection_refusal_surfaces_as_transport_error() {
    let client = MealApiClient::new(support::refused_base_url());

    let err = client.search_by_name("pasta").unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
