//! Place endpoints, nested under a city.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::Utc;
use pagination::PageInfo;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{DocumentId, Error, FiltersApplied, Place, PlaceStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cities::{MessageResponse, UpdatedResponse};
use crate::inbound::http::guards::{AdminUser, JwtUser};
use crate::inbound::http::payloads::{PlaceBody, StatusBody, UpdatePlaceBody};
use crate::inbound::http::query::{PageParams, PlaceFilterParams, SortParams, place_list_query};
use crate::inbound::http::state::HttpState;

pub(crate) fn place_ids(path: (String, String)) -> Result<(DocumentId, DocumentId), Error> {
    let (city_id, place_id) = path;
    Ok((
        DocumentId::parse_field("city_id", &city_id)?,
        DocumentId::parse_field("place_id", &place_id)?,
    ))
}

pub(crate) fn city_link(city_id: &DocumentId) -> String {
    format!("/api/cities/{city_id}")
}

pub(crate) fn place_link(city_id: &DocumentId, place_id: &DocumentId) -> String {
    format!("{}/places/{place_id}", city_link(city_id))
}

/// Page of places.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceListResponse {
    pub places: Vec<Place>,
    pub pagination: PageInfo,
    pub filters_applied: FiltersApplied,
}

/// Relative links from a place to its city.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceLinks {
    pub city: String,
    #[serde(rename = "self")]
    pub self_link: String,
}

/// One place with links to itself and its city.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceResponse {
    pub data: Place,
    pub links: PlaceLinks,
}

/// Response of `POST /api/cities/{city_id}/places`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceCreatedResponse {
    #[schema(example = "Place added successfully")]
    pub message: String,
    #[schema(value_type = String)]
    pub place_id: DocumentId,
}

/// Response of a status transition.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Human readable acknowledgement.
    pub message: String,
    /// Status now stored on the place.
    pub status: PlaceStatus,
}

/// List a city's places with filters, sort and page.
#[utoipa::path(
    get,
    path = "/api/cities/{city_id}/places",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        PlaceFilterParams,
        SortParams,
        PageParams
    ),
    responses(
        (status = 200, description = "Page of places", body = PlaceListResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["places"],
    operation_id = "listPlaces"
)]
#[get("/cities/{city_id}/places")]
pub async fn list_places(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    filter: web::Query<PlaceFilterParams>,
    sort: web::Query<SortParams>,
    page: web::Query<PageParams>,
) -> ApiResult<web::Json<PlaceListResponse>> {
    let city_id = DocumentId::parse_field("city_id", &path.into_inner())?;
    let query = place_list_query(&filter, &sort, &page)?;
    let listing = state.catalogue_query.list_places(&city_id, query).await?;
    Ok(web::Json(PlaceListResponse {
        places: listing.items,
        pagination: listing.page,
        filters_applied: listing.filters_applied,
    }))
}

/// Fetch one place.
#[utoipa::path(
    get,
    path = "/api/cities/{city_id}/places/{place_id}",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        ("place_id" = String, Path, description = "24 digit hexadecimal place id")
    ),
    responses(
        (status = 200, description = "Place", body = PlaceResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["places"],
    operation_id = "getPlace"
)]
#[get("/cities/{city_id}/places/{place_id}")]
pub async fn get_place(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<PlaceResponse>> {
    let (city_id, place_id) = place_ids(path.into_inner())?;
    let place = state.catalogue_query.get_place(&city_id, &place_id).await?;
    Ok(web::Json(PlaceResponse {
        data: place,
        links: PlaceLinks {
            city: city_link(&city_id),
            self_link: place_link(&city_id, &place_id),
        },
    }))
}

/// Append a place to a city.
#[utoipa::path(
    post,
    path = "/api/cities/{city_id}/places",
    params(("city_id" = String, Path, description = "24 digit hexadecimal city id")),
    request_body = PlaceBody,
    responses(
        (status = 201, description = "Place added", body = PlaceCreatedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Concurrent modification", body = Error)
    ),
    tags = ["places"],
    operation_id = "addPlace",
    security(("AccessToken" = []))
)]
#[post("/cities/{city_id}/places")]
pub async fn add_place(
    state: web::Data<HttpState>,
    _user: JwtUser,
    path: web::Path<String>,
    payload: web::Json<PlaceBody>,
) -> ApiResult<HttpResponse> {
    let city_id = DocumentId::parse_field("city_id", &path.into_inner())?;
    let place = payload.into_inner().into_new_place(Utc::now())?;
    let place_id = state.catalogue_command.add_place(&city_id, place).await?;
    Ok(HttpResponse::Created().json(PlaceCreatedResponse {
        message: "Place added successfully".to_owned(),
        place_id,
    }))
}

/// Field-masked place update.
#[utoipa::path(
    put,
    path = "/api/cities/{city_id}/places/{place_id}",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        ("place_id" = String, Path, description = "24 digit hexadecimal place id")
    ),
    request_body = UpdatePlaceBody,
    responses(
        (status = 200, description = "Place updated", body = UpdatedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Concurrent modification", body = Error)
    ),
    tags = ["places"],
    operation_id = "updatePlace",
    security(("AccessToken" = []))
)]
#[put("/cities/{city_id}/places/{place_id}")]
pub async fn update_place(
    state: web::Data<HttpState>,
    _user: JwtUser,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdatePlaceBody>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let (city_id, place_id) = place_ids(path.into_inner())?;
    let patch = payload.into_inner().into_patch()?;
    let updated_fields = state
        .catalogue_command
        .update_place(&city_id, &place_id, patch)
        .await?;
    Ok(web::Json(UpdatedResponse {
        message: "Place updated successfully".to_owned(),
        updated_fields,
    }))
}

/// Remove a place and its reviews.
#[utoipa::path(
    delete,
    path = "/api/cities/{city_id}/places/{place_id}",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        ("place_id" = String, Path, description = "24 digit hexadecimal place id")
    ),
    responses(
        (status = 200, description = "Place deleted", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["places"],
    operation_id = "deletePlace",
    security(("AccessToken" = []))
)]
#[delete("/cities/{city_id}/places/{place_id}")]
pub async fn delete_place(
    state: web::Data<HttpState>,
    admin: AdminUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (city_id, place_id) = place_ids(path.into_inner())?;
    state
        .catalogue_command
        .delete_place(&city_id, &place_id)
        .await?;
    info!(city = %city_id, place = %place_id, username = %admin.principal().username, "place deleted");
    Ok(web::Json(MessageResponse::new("Place deleted successfully")))
}

/// Move a place to another operating status.
#[utoipa::path(
    patch,
    path = "/api/cities/{city_id}/places/{place_id}/status",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        ("place_id" = String, Path, description = "24 digit hexadecimal place id")
    ),
    request_body = StatusBody,
    responses(
        (status = 200, description = "Status changed", body = StatusResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Status unchanged", body = Error)
    ),
    tags = ["places"],
    operation_id = "setPlaceStatus",
    security(("AccessToken" = []))
)]
#[patch("/cities/{city_id}/places/{place_id}/status")]
pub async fn set_place_status(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<(String, String)>,
    payload: web::Json<StatusBody>,
) -> ApiResult<web::Json<StatusResponse>> {
    let (city_id, place_id) = place_ids(path.into_inner())?;
    let requested = payload.into_inner().into_status()?;
    let status = state
        .catalogue_command
        .set_place_status(&city_id, &place_id, requested)
        .await?;
    Ok(web::Json(StatusResponse {
        message: format!("Place status updated to {status}"),
        status,
    }))
}

#[cfg(test)]
#[path = "places_tests.rs"]
mod tests;
