//! Tests for the city handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::web;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::guards::ACCESS_TOKEN_HEADER;
use crate::inbound::http::test_utils::{
    admin_token, init_app, seed_city, seed_review, test_state, user_token,
};

#[actix_web::test]
async fn list_cities_filters_by_name_and_paginates() {
    let state = web::Data::new(test_state());
    seed_city(&state, "Leeds").await;
    seed_city(&state, "London").await;
    seed_city(&state, "York").await;
    let app = init_app(state).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/cities?name=l&sort_order=asc&pn=1&ps=1")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["cities"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["cities"][0]["city_name"], "Leeds");
    assert_eq!(body["pagination"]["total_items"], 2);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["filters_applied"]["name"], "l");
}

#[rstest]
#[case("/api/cities?pn=0", "pn")]
#[case("/api/cities?ps=abc", "ps")]
#[actix_web::test]
async fn invalid_pagination_is_rejected(#[case] uri: &str, #[case] field: &str) {
    let app = init_app(web::Data::new(test_state())).await;

    let response = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn get_city_embeds_places_on_request() {
    let state = web::Data::new(test_state());
    let (city_id, place_id) = seed_city(&state, "Leeds").await;
    let app = init_app(state).await;

    let plain = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/cities/{city_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(plain.status(), StatusCode::OK);
    let plain: Value = actix_test::read_body_json(plain).await;
    assert_eq!(plain["includes"]["places"], false);
    assert!(plain["data"].get("places").is_none());

    let embedded = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/cities/{city_id}?include_places=true"))
            .to_request(),
    )
    .await;
    let embedded: Value = actix_test::read_body_json(embedded).await;
    assert_eq!(embedded["includes"]["places"], true);
    assert_eq!(embedded["data"]["places"][0]["id"], place_id.to_string());
}

#[rstest]
#[case("/api/cities/not-an-id", StatusCode::BAD_REQUEST, "invalid_request")]
#[case("/api/cities/65a1f0c2b3d4e5f60718293a", StatusCode::NOT_FOUND, "not_found")]
#[actix_web::test]
async fn unknown_or_malformed_city_ids_fail(
    #[case] uri: &str,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let app = init_app(web::Data::new(test_state())).await;

    let response = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(response.status(), status);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], code);
}

#[actix_web::test]
async fn create_city_requires_a_token() {
    let app = init_app(web::Data::new(test_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/cities")
            .set_json(json!({"city_id": "leeds", "city_name": "Leeds"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "Token is missing");
}

#[actix_web::test]
async fn create_then_rename_city() {
    let app = init_app(web::Data::new(test_state())).await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/cities")
            .insert_header((ACCESS_TOKEN_HEADER, user_token()))
            .set_json(json!({"city_id": "leeds", "city_name": "Leeds"}))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(created).await;
    assert_eq!(created["message"], "City created successfully");
    let id = created["city_id"].as_str().expect("city id").to_owned();

    let updated = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/cities/{id}"))
            .insert_header((ACCESS_TOKEN_HEADER, user_token()))
            .set_json(json!({"city_name": "Leeds City"}))
            .to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Value = actix_test::read_body_json(updated).await;
    assert_eq!(updated["updated_fields"], json!(["city_name"]));
}

#[actix_web::test]
async fn empty_update_names_no_fields() {
    let state = web::Data::new(test_state());
    let (city_id, _) = seed_city(&state, "Leeds").await;
    let app = init_app(state).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/cities/{city_id}"))
            .insert_header((ACCESS_TOKEN_HEADER, user_token()))
            .set_json(json!({}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "no_valid_fields");
}

#[actix_web::test]
async fn malformed_json_is_an_invalid_request() {
    let app = init_app(web::Data::new(test_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/cities")
            .insert_header((ACCESS_TOKEN_HEADER, user_token()))
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn deleting_a_city_needs_admin_rights() {
    let state = web::Data::new(test_state());
    let (city_id, place_id) = seed_city(&state, "Leeds").await;
    let review_id = seed_review(&state, &city_id, &place_id, 4.0).await;
    let app = init_app(state).await;
    let uri = format!("/api/cities/{city_id}");
    let place_uri = format!("{uri}/places/{place_id}");
    let review_uri = format!("{place_uri}/reviews/{review_id}");

    let refused = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&uri)
            .insert_header((ACCESS_TOKEN_HEADER, user_token()))
            .to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);
    let review = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri(&review_uri).to_request(),
    )
    .await;
    assert_eq!(review.status(), StatusCode::OK);

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&uri)
            .insert_header((ACCESS_TOKEN_HEADER, admin_token()))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    for gone_uri in [&uri, &place_uri, &review_uri] {
        let gone = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(gone_uri).to_request(),
        )
        .await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND, "{gone_uri}");
    }
}
