//! Tests for the legacy business handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::web;
use rstest::rstest;
use serde_json::Value;

use crate::inbound::http::test_utils::{TEST_BASE_URL, init_app, test_state};

const PREFIX: &str = "/api/v1.0/businesses";

fn path_of(url: &str) -> String {
    url.strip_prefix(TEST_BASE_URL)
        .expect("url carries the public base")
        .to_owned()
}

async fn create(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    name: &str,
) -> String {
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri(PREFIX)
            .set_form([("name", name), ("town", "Leeds"), ("rating", "4.5")])
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    path_of(body["url"].as_str().expect("url"))
}

#[actix_web::test]
async fn created_business_is_addressable_by_its_url() {
    let app = init_app(web::Data::new(test_state())).await;
    let path = create(&app, "Pie Shop").await;

    let response = actix_test::call_service(&app, actix_test::TestRequest::get().uri(&path).to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["name"], "Pie Shop");
    assert_eq!(body["rating"], 4.5);
    assert_eq!(body["reviews"], serde_json::json!([]));
}

#[rstest]
#[case(&[("town", "Leeds"), ("rating", "3")], "missing_field")]
#[case(&[("name", "Pie Shop"), ("town", "Leeds"), ("rating", "9")], "invalid_parameter")]
#[case(&[("name", "Pie Shop"), ("town", "Leeds"), ("rating", "lots")], "invalid_parameter")]
#[actix_web::test]
async fn invalid_forms_are_rejected(#[case] form: &[(&str, &str)], #[case] code: &str) {
    let app = init_app(web::Data::new(test_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(PREFIX)
            .set_form(form)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn listing_pages_and_reports_empty_pages() {
    let app = init_app(web::Data::new(test_state())).await;
    create(&app, "First").await;
    create(&app, "Second").await;

    let first = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("{PREFIX}?pn=1&ps=1"))
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = actix_test::read_body_json(first).await;
    assert_eq!(first[0]["name"], "First");

    let beyond = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("{PREFIX}?pn=3&ps=1"))
            .to_request(),
    )
    .await;
    assert_eq!(beyond.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn replace_and_delete_business() {
    let app = init_app(web::Data::new(test_state())).await;
    let path = create(&app, "Pie Shop").await;

    let replaced = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&path)
            .set_form([("name", "Pie Palace"), ("town", "York"), ("rating", "5")])
            .to_request(),
    )
    .await;
    assert_eq!(replaced.status(), StatusCode::OK);

    let fetched = actix_test::call_service(&app, actix_test::TestRequest::get().uri(&path).to_request()).await;
    let fetched: Value = actix_test::read_body_json(fetched).await;
    assert_eq!(fetched["town"], "York");

    let deleted =
        actix_test::call_service(&app, actix_test::TestRequest::delete().uri(&path).to_request()).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = actix_test::call_service(&app, actix_test::TestRequest::get().uri(&path).to_request()).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn reviews_round_trip_through_their_urls() {
    let app = init_app(web::Data::new(test_state())).await;
    let business = create(&app, "Pie Shop").await;
    let reviews = format!("{business}/reviews");

    let added = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&reviews)
            .set_form([("username", "sam"), ("comment", "Flaky"), ("stars", "4")])
            .to_request(),
    )
    .await;
    assert_eq!(added.status(), StatusCode::CREATED);
    let added: Value = actix_test::read_body_json(added).await;
    let review = path_of(added["url"].as_str().expect("url"));
    assert!(review.starts_with(&reviews), "{review}");

    let listed = actix_test::call_service(&app, actix_test::TestRequest::get().uri(&reviews).to_request()).await;
    let listed: Value = actix_test::read_body_json(listed).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let replaced = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&review)
            .set_form([("username", "sam"), ("comment", "Superb"), ("stars", "5")])
            .to_request(),
    )
    .await;
    assert_eq!(replaced.status(), StatusCode::OK);

    let fetched = actix_test::call_service(&app, actix_test::TestRequest::get().uri(&review).to_request()).await;
    let fetched: Value = actix_test::read_body_json(fetched).await;
    assert_eq!(fetched["stars"], 5);

    let deleted =
        actix_test::call_service(&app, actix_test::TestRequest::delete().uri(&review).to_request()).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = actix_test::call_service(&app, actix_test::TestRequest::get().uri(&review).to_request()).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_business_ids_are_invalid() {
    let app = init_app(web::Data::new(test_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("{PREFIX}/xyz/reviews"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "business_id");
}
