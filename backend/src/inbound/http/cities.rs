//! City endpoints.
//!
//! ```text
//! GET    /api/cities?name=lee&sort_order=desc&pn=1&ps=10
//! GET    /api/cities/{city_id}?include_places=true&min_rating=4
//! POST   /api/cities            {"city_id":"leeds","city_name":"Leeds"}
//! PUT    /api/cities/{city_id}  {"city_name":"Leeds"}
//! DELETE /api/cities/{city_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use pagination::PageInfo;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    CityListQuery, CitySummary, DocumentId, Error, FiltersApplied, Place,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guards::{AdminUser, JwtUser};
use crate::inbound::http::payloads::{CreateCityBody, UpdateCityBody};
use crate::inbound::http::query::{CityDetailParams, CityListParams};
use crate::inbound::http::state::HttpState;

/// Page of cities.
#[derive(Debug, Serialize, ToSchema)]
pub struct CityListResponse {
    pub cities: Vec<CitySummary>,
    pub pagination: PageInfo,
    pub filters_applied: FiltersApplied,
}

/// City fields plus, when requested, its filtered places.
#[derive(Debug, Serialize, ToSchema)]
pub struct CityData {
    #[schema(value_type = String)]
    pub id: DocumentId,
    pub city_id: String,
    pub city_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub places: Option<Vec<Place>>,
}

/// Which optional parts were embedded.
#[derive(Debug, Serialize, ToSchema)]
pub struct CityIncludes {
    pub places: bool,
}

/// Response of `GET /api/cities/{city_id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CityDetailResponse {
    pub data: CityData,
    pub includes: CityIncludes,
    pub filters_applied: FiltersApplied,
}

/// Response of `POST /api/cities`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CityCreatedResponse {
    #[schema(example = "City created successfully")]
    pub message: String,
    #[schema(value_type = String)]
    pub city_id: DocumentId,
}

/// Response of field-masked updates.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedResponse {
    pub message: String,
    pub updated_fields: Vec<String>,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// List cities with optional name filter, sort and page.
#[utoipa::path(
    get,
    path = "/api/cities",
    params(CityListParams),
    responses(
        (status = 200, description = "Page of cities", body = CityListResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["cities"],
    operation_id = "listCities"
)]
#[get("/cities")]
pub async fn list_cities(
    state: web::Data<HttpState>,
    params: web::Query<CityListParams>,
) -> ApiResult<web::Json<CityListResponse>> {
    let query = CityListQuery::try_from(params.into_inner())?;
    let listing = state.catalogue_query.list_cities(query).await?;
    Ok(web::Json(CityListResponse {
        cities: listing.items,
        pagination: listing.page,
        filters_applied: listing.filters_applied,
    }))
}

/// Fetch one city, optionally embedding its filtered places.
#[utoipa::path(
    get,
    path = "/api/cities/{city_id}",
    params(("city_id" = String, Path, description = "24 digit hexadecimal city id"), CityDetailParams),
    responses(
        (status = 200, description = "City", body = CityDetailResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["cities"],
    operation_id = "getCity"
)]
#[get("/cities/{city_id}")]
pub async fn get_city(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<CityDetailParams>,
) -> ApiResult<web::Json<CityDetailResponse>> {
    let city_id = DocumentId::parse_field("city_id", &path.into_inner())?;
    let places = params.places()?;
    let detail = state.catalogue_query.get_city(&city_id, places).await?;
    let includes = CityIncludes {
        places: detail.places.is_some(),
    };
    Ok(web::Json(CityDetailResponse {
        data: CityData {
            id: detail.city.id,
            city_id: detail.city.city_id,
            city_name: detail.city.city_name,
            places: detail.places,
        },
        includes,
        filters_applied: detail.filters_applied,
    }))
}

/// Create a city, optionally with embedded places.
#[utoipa::path(
    post,
    path = "/api/cities",
    request_body = CreateCityBody,
    responses(
        (status = 201, description = "City created", body = CityCreatedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["cities"],
    operation_id = "createCity",
    security(("AccessToken" = []))
)]
#[post("/cities")]
pub async fn create_city(
    state: web::Data<HttpState>,
    user: JwtUser,
    payload: web::Json<CreateCityBody>,
) -> ApiResult<HttpResponse> {
    let city = payload.into_inner().into_new_city(Utc::now())?;
    let id = state.catalogue_command.create_city(city).await?;
    info!(city = %id, username = %user.principal().username, "city created");
    Ok(HttpResponse::Created().json(CityCreatedResponse {
        message: "City created successfully".to_owned(),
        city_id: id,
    }))
}

/// Update a city's name and/or replace its places.
#[utoipa::path(
    put,
    path = "/api/cities/{city_id}",
    params(("city_id" = String, Path, description = "24 digit hexadecimal city id")),
    request_body = UpdateCityBody,
    responses(
        (status = 200, description = "City updated", body = UpdatedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Concurrent modification", body = Error)
    ),
    tags = ["cities"],
    operation_id = "updateCity",
    security(("AccessToken" = []))
)]
#[put("/cities/{city_id}")]
pub async fn update_city(
    state: web::Data<HttpState>,
    _user: JwtUser,
    path: web::Path<String>,
    payload: web::Json<UpdateCityBody>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let city_id = DocumentId::parse_field("city_id", &path.into_inner())?;
    let patch = payload.into_inner().into_patch(Utc::now())?;
    let updated_fields = state.catalogue_command.update_city(&city_id, patch).await?;
    Ok(web::Json(UpdatedResponse {
        message: "City updated successfully".to_owned(),
        updated_fields,
    }))
}

/// Delete a city with all of its places and reviews.
#[utoipa::path(
    delete,
    path = "/api/cities/{city_id}",
    params(("city_id" = String, Path, description = "24 digit hexadecimal city id")),
    responses(
        (status = 200, description = "City deleted", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["cities"],
    operation_id = "deleteCity",
    security(("AccessToken" = []))
)]
#[delete("/cities/{city_id}")]
pub async fn delete_city(
    state: web::Data<HttpState>,
    admin: AdminUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let city_id = DocumentId::parse_field("city_id", &path.into_inner())?;
    state.catalogue_command.delete_city(&city_id).await?;
    info!(city = %city_id, username = %admin.principal().username, "city deleted");
    Ok(web::Json(MessageResponse::new("City deleted successfully")))
}

#[cfg(test)]
#[path = "cities_tests.rs"]
mod tests;
