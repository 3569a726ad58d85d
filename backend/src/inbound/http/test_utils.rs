//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use chrono::{TimeDelta, Utc};
use mockable::DefaultClock;
use zeroize::Zeroizing;

use crate::domain::ports::TokenCodec;
use crate::domain::{
    AccountPolicy, AccountPorts, AccountService, BusinessService, CatalogueService, Claims,
    DocumentId, Location, NewCity, NewPlace, NewReview, PlaceInfo, PlaceStatus,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{
    MemoryAccountRepository, MemoryBusinessRepository, MemoryCityRepository,
    MemoryTokenBlacklist,
};
use crate::outbound::security::{Argon2Hasher, JwtCodec};

/// Signing secret shared by [`test_state`] and the token helpers.
pub const TEST_SECRET: &[u8] = b"http-adapter-test-secret";

/// Base URL used when building absolute business URLs in tests.
pub const TEST_BASE_URL: &str = "http://localhost:2000";

fn codec() -> JwtCodec {
    JwtCodec::new(&Zeroizing::new(TEST_SECRET.to_vec()))
}

/// State backed by empty in-memory stores.
pub fn test_state() -> HttpState {
    let clock = Arc::new(DefaultClock);
    let catalogue = Arc::new(CatalogueService::new(
        Arc::new(MemoryCityRepository::new()),
        clock.clone(),
    ));
    let accounts = AccountService::new(
        AccountPorts {
            accounts: Arc::new(MemoryAccountRepository::new()),
            hasher: Arc::new(Argon2Hasher::new()),
            tokens: Arc::new(codec()),
            blacklist: Arc::new(MemoryTokenBlacklist::new(clock.clone())),
        },
        clock,
        AccountPolicy::default(),
    );
    HttpState::new(
        HttpStatePorts {
            catalogue_query: catalogue.clone(),
            catalogue_command: catalogue,
            businesses: Arc::new(BusinessService::new(Arc::new(
                MemoryBusinessRepository::new(),
            ))),
            auth: Arc::new(accounts),
        },
        TEST_BASE_URL,
    )
}

fn mint(user: &str, admin: bool) -> String {
    codec()
        .issue(&Claims {
            user: user.to_owned(),
            admin,
            exp: (Utc::now() + TimeDelta::minutes(30)).timestamp(),
        })
        .expect("token issues")
}

/// A valid non-admin token for `sam`.
pub fn user_token() -> String {
    mint("sam", false)
}

/// A valid admin token for `root`.
pub fn admin_token() -> String {
    mint("root", true)
}

/// A token for `sam` that expired a minute ago.
pub fn expired_token() -> String {
    codec()
        .issue(&Claims {
            user: "sam".to_owned(),
            admin: false,
            exp: (Utc::now() - TimeDelta::minutes(1)).timestamp(),
        })
        .expect("token issues")
}

/// Initialise the full `/api` surface over `state`.
pub async fn init_app(
    state: web::Data<HttpState>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(App::new().app_data(state).configure(configure)).await
}

/// A place with the given external id, name and cuisine tag.
pub fn sample_place(place_id: &str, name: &str, tag: &str) -> NewPlace {
    NewPlace::new(
        place_id,
        PlaceInfo {
            name: name.to_owned(),
            place_type: vec![tag.to_owned()],
            status: PlaceStatus::Operational,
        },
        Location::default(),
    )
}

/// Seed a city with one place, returning both generated ids.
pub async fn seed_city(state: &HttpState, city_name: &str) -> (DocumentId, DocumentId) {
    let city_id = state
        .catalogue_command
        .create_city(NewCity {
            city_id: city_name.to_lowercase(),
            city_name: city_name.to_owned(),
            places: Vec::new(),
        })
        .await
        .expect("city seeds");
    let place_id = state
        .catalogue_command
        .add_place(&city_id, sample_place("pl-001", "Kiln", "cafe"))
        .await
        .expect("place seeds");
    (city_id, place_id)
}

/// Seed a review on a place, returning its id.
pub async fn seed_review(
    state: &HttpState,
    city_id: &DocumentId,
    place_id: &DocumentId,
    rating: f64,
) -> DocumentId {
    state
        .catalogue_command
        .add_review(
            city_id,
            place_id,
            NewReview {
                rating,
                author_name: "Sam".to_owned(),
                content: "Lovely".to_owned(),
                language: None,
            },
        )
        .await
        .expect("review seeds")
        .review
        .id
}
