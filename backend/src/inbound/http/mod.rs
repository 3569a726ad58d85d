//! HTTP inbound adapter exposing REST endpoints.
//!
//! Everything except the health probes lives under the `/api` scope:
//! the catalogue (cities, places, reviews), the legacy business catalogue
//! under `/api/v1.0` and the account endpoints.

pub mod auth;
pub mod businesses;
pub mod cities;
pub mod error;
pub mod guards;
pub mod health;
pub mod payloads;
pub mod places;
pub mod query;
pub mod reviews;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api` scope and the extractor configs that render
/// malformed input as `invalid_request` errors.
///
/// The caller supplies [`state::HttpState`] via `App::app_data`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::FormConfig::default().error_handler(error::form_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(
            web::scope("/api")
                .service(auth::register)
                .service(auth::login)
                .service(auth::logout)
                .service(cities::list_cities)
                .service(cities::create_city)
                .service(cities::get_city)
                .service(cities::update_city)
                .service(cities::delete_city)
                .service(places::list_places)
                .service(places::add_place)
                .service(places::get_place)
                .service(places::update_place)
                .service(places::delete_place)
                .service(places::set_place_status)
                .service(reviews::refresh_rating)
                .service(reviews::list_reviews)
                .service(reviews::add_review)
                .service(reviews::get_review)
                .service(reviews::update_review)
                .service(reviews::delete_review)
                .service(businesses::list_businesses)
                .service(businesses::create_business)
                .service(businesses::get_business)
                .service(businesses::replace_business)
                .service(businesses::delete_business)
                .service(businesses::list_business_reviews)
                .service(businesses::add_business_review)
                .service(businesses::get_business_review)
                .service(businesses::replace_business_review)
                .service(businesses::delete_business_review),
        );
}
