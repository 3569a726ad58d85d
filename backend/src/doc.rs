//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every handler under `/api` plus the health probes
//! - **Schemas**: domain documents and response envelopes, which derive
//!   `ToSchema` directly
//! - **Security**: the `x-access-token` bearer header and HTTP Basic for
//!   `POST /api/login`
//!
//! The generated document is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Business, BusinessReview, CitySummary, Error, ErrorCode, FiltersApplied, Place, PlaceStatus,
    RatingSummary, Review,
};
use crate::inbound::http::guards::ACCESS_TOKEN_HEADER;
use crate::inbound::http::health::ProbeResponse;

/// Enrich the generated document with the security schemes used by the
/// handlers.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "AccessToken",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                ACCESS_TOKEN_HEADER,
                "Token issued by POST /api/login or POST /api/register. \
                 `Authorization: Bearer` is accepted as well.",
            ))),
        );
        components.add_security_scheme(
            "BasicAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Basic)
                    .description(Some("Username and password for POST /api/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Food places API",
        description = "Cities, their food places and reviews, a legacy business catalogue, and token-based accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::cities::list_cities,
        crate::inbound::http::cities::get_city,
        crate::inbound::http::cities::create_city,
        crate::inbound::http::cities::update_city,
        crate::inbound::http::cities::delete_city,
        crate::inbound::http::places::list_places,
        crate::inbound::http::places::get_place,
        crate::inbound::http::places::add_place,
        crate::inbound::http::places::update_place,
        crate::inbound::http::places::delete_place,
        crate::inbound::http::places::set_place_status,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::get_review,
        crate::inbound::http::reviews::add_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::reviews::refresh_rating,
        crate::inbound::http::businesses::list_businesses,
        crate::inbound::http::businesses::get_business,
        crate::inbound::http::businesses::create_business,
        crate::inbound::http::businesses::replace_business,
        crate::inbound::http::businesses::delete_business,
        crate::inbound::http::businesses::list_business_reviews,
        crate::inbound::http::businesses::add_business_review,
        crate::inbound::http::businesses::get_business_review,
        crate::inbound::http::businesses::replace_business_review,
        crate::inbound::http::businesses::delete_business_review,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CitySummary,
        Place,
        PlaceStatus,
        Review,
        RatingSummary,
        FiltersApplied,
        Business,
        BusinessReview,
        ProbeResponse
    )),
    tags(
        (name = "auth", description = "Registration, login and logout"),
        (name = "cities", description = "City documents"),
        (name = "places", description = "Places embedded in a city"),
        (name = "reviews", description = "Reviews embedded in a place"),
        (name = "businesses", description = "Legacy business catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    #[case("/api/cities")]
    #[case("/api/cities/{city_id}/places/{place_id}/reviews/{review_id}")]
    #[case("/api/cities/{city_id}/places/{place_id}/update-rating")]
    #[case("/api/v1.0/businesses/{business_id}/reviews")]
    #[case("/api/login")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "{path} missing");
    }

    #[rstest]
    #[case("AccessToken")]
    #[case("BasicAuth")]
    fn security_schemes_are_registered(#[case] name: &str) {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(name));
    }
}
