//! Review endpoints, nested under a place. Every mutation returns the
//! place's recomputed rating summary.

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::PageInfo;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{DocumentId, Error, FiltersApplied, NewReview, RatingSummary, Review, ReviewPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guards::{AdminUser, JwtUser};
use crate::inbound::http::payloads::{AddReviewBody, UpdateReviewBody};
use crate::inbound::http::places::{city_link, place_ids, place_link};
use crate::inbound::http::query::{PageParams, ReviewFilterParams, SortParams, review_list_query};
use crate::inbound::http::state::HttpState;

fn review_ids(path: (String, String, String)) -> Result<(DocumentId, DocumentId, DocumentId), Error> {
    let (city_id, place_id, review_id) = path;
    let (city_id, place_id) = place_ids((city_id, place_id))?;
    Ok((
        city_id,
        place_id,
        DocumentId::parse_field("review_id", &review_id)?,
    ))
}

/// Page of reviews.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewListResponse {
    /// Reviews on the requested page.
    pub reviews: Vec<Review>,
    /// Page position and totals.
    pub pagination: PageInfo,
    /// Filters that were recognised and applied.
    pub filters_applied: FiltersApplied,
}

/// Relative links from a review to its parents.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewLinks {
    /// Owning city.
    pub city: String,
    /// Owning place.
    pub place: String,
    /// The review itself.
    #[serde(rename = "self")]
    pub self_link: String,
}

/// One review with links to itself and its parents.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    /// The review document.
    pub data: Review,
    /// Links to the review and its parents.
    pub links: ReviewLinks,
}

/// Identifiers of a newly added review.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewRef {
    /// Generated document id.
    #[schema(value_type = String)]
    pub id: DocumentId,
    /// External review reference.
    #[schema(example = "rev_18293a")]
    pub review_id: String,
}

/// Body returned when a review is added.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewAddedResponse {
    /// Human readable acknowledgement.
    #[schema(example = "Review added successfully")]
    pub message: String,
    /// Identifiers of the stored review.
    pub review: ReviewRef,
    /// Summary recomputed in the same write.
    pub ratings: RatingSummary,
}

/// Acknowledgement carrying the recomputed summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingsResponse {
    /// Human readable acknowledgement.
    pub message: String,
    /// Current average and count.
    pub ratings: RatingSummary,
}

impl RatingsResponse {
    fn new(message: &str, ratings: RatingSummary) -> Self {
        Self {
            message: message.to_owned(),
            ratings,
        }
    }
}

/// List a place's reviews, newest first by default.
#[utoipa::path(
    get,
    path = "/api/cities/{city_id}/places/{place_id}/reviews",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        ("place_id" = String, Path, description = "24 digit hexadecimal place id"),
        ReviewFilterParams,
        SortParams,
        PageParams
    ),
    responses(
        (status = 200, description = "Page of reviews", body = ReviewListResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listReviews"
)]
#[get("/cities/{city_id}/places/{place_id}/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    filter: web::Query<ReviewFilterParams>,
    sort: web::Query<SortParams>,
    page: web::Query<PageParams>,
) -> ApiResult<web::Json<ReviewListResponse>> {
    let (city_id, place_id) = place_ids(path.into_inner())?;
    let query = review_list_query(&filter, &sort, &page)?;
    let listing = state
        .catalogue_query
        .list_reviews(&city_id, &place_id, query)
        .await?;
    Ok(web::Json(ReviewListResponse {
        reviews: listing.items,
        pagination: listing.page,
        filters_applied: listing.filters_applied,
    }))
}

/// Fetch one review.
#[utoipa::path(
    get,
    path = "/api/cities/{city_id}/places/{place_id}/reviews/{review_id}",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        ("place_id" = String, Path, description = "24 digit hexadecimal place id"),
        ("review_id" = String, Path, description = "24 digit hexadecimal review id")
    ),
    responses(
        (status = 200, description = "Review", body = ReviewResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "getReview"
)]
#[get("/cities/{city_id}/places/{place_id}/reviews/{review_id}")]
pub async fn get_review(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let (city_id, place_id, review_id) = review_ids(path.into_inner())?;
    let review = state
        .catalogue_query
        .get_review(&city_id, &place_id, &review_id)
        .await?;
    let place = place_link(&city_id, &place_id);
    Ok(web::Json(ReviewResponse {
        data: review,
        links: ReviewLinks {
            city: city_link(&city_id),
            self_link: format!("{place}/reviews/{review_id}"),
            place,
        },
    }))
}

/// Add a review and recompute the place's rating.
#[utoipa::path(
    post,
    path = "/api/cities/{city_id}/places/{place_id}/reviews",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        ("place_id" = String, Path, description = "24 digit hexadecimal place id")
    ),
    request_body = AddReviewBody,
    responses(
        (status = 201, description = "Review added", body = ReviewAddedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Concurrent modification", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "addReview",
    security(("AccessToken" = []))
)]
#[post("/cities/{city_id}/places/{place_id}/reviews")]
pub async fn add_review(
    state: web::Data<HttpState>,
    _user: JwtUser,
    path: web::Path<(String, String)>,
    payload: web::Json<AddReviewBody>,
) -> ApiResult<HttpResponse> {
    let (city_id, place_id) = place_ids(path.into_inner())?;
    let review = NewReview::try_from(payload.into_inner())?;
    let added = state
        .catalogue_command
        .add_review(&city_id, &place_id, review)
        .await?;
    Ok(HttpResponse::Created().json(ReviewAddedResponse {
        message: "Review added successfully".to_owned(),
        review: ReviewRef {
            id: added.review.id,
            review_id: added.review.review_id,
        },
        ratings: added.ratings,
    }))
}

/// Field-masked review update.
#[utoipa::path(
    put,
    path = "/api/cities/{city_id}/places/{place_id}/reviews/{review_id}",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        ("place_id" = String, Path, description = "24 digit hexadecimal place id"),
        ("review_id" = String, Path, description = "24 digit hexadecimal review id")
    ),
    request_body = UpdateReviewBody,
    responses(
        (status = 200, description = "Review updated", body = RatingsResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Concurrent modification", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "updateReview",
    security(("AccessToken" = []))
)]
#[put("/cities/{city_id}/places/{place_id}/reviews/{review_id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    _user: JwtUser,
    path: web::Path<(String, String, String)>,
    payload: web::Json<UpdateReviewBody>,
) -> ApiResult<web::Json<RatingsResponse>> {
    let (city_id, place_id, review_id) = review_ids(path.into_inner())?;
    let patch = ReviewPatch::try_from(payload.into_inner())?;
    let ratings = state
        .catalogue_command
        .update_review(&city_id, &place_id, &review_id, patch)
        .await?;
    Ok(web::Json(RatingsResponse::new(
        "Review updated successfully",
        ratings,
    )))
}

/// Remove a review and recompute the place's rating.
#[utoipa::path(
    delete,
    path = "/api/cities/{city_id}/places/{place_id}/reviews/{review_id}",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        ("place_id" = String, Path, description = "24 digit hexadecimal place id"),
        ("review_id" = String, Path, description = "24 digit hexadecimal review id")
    ),
    responses(
        (status = 200, description = "Review deleted", body = RatingsResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview",
    security(("AccessToken" = []))
)]
#[delete("/cities/{city_id}/places/{place_id}/reviews/{review_id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<(String, String, String)>,
) -> ApiResult<web::Json<RatingsResponse>> {
    let (city_id, place_id, review_id) = review_ids(path.into_inner())?;
    let ratings = state
        .catalogue_command
        .delete_review(&city_id, &place_id, &review_id)
        .await?;
    Ok(web::Json(RatingsResponse::new(
        "Review deleted successfully",
        ratings,
    )))
}

/// Recompute and persist a place's rating summary.
#[utoipa::path(
    post,
    path = "/api/cities/{city_id}/places/{place_id}/update-rating",
    params(
        ("city_id" = String, Path, description = "24 digit hexadecimal city id"),
        ("place_id" = String, Path, description = "24 digit hexadecimal place id")
    ),
    responses(
        (status = 200, description = "Rating refreshed", body = RatingsResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "refreshRating",
    security(("AccessToken" = []))
)]
#[post("/cities/{city_id}/places/{place_id}/update-rating")]
pub async fn refresh_rating(
    state: web::Data<HttpState>,
    _user: JwtUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<RatingsResponse>> {
    let (city_id, place_id) = place_ids(path.into_inner())?;
    let ratings = state
        .catalogue_command
        .refresh_rating(&city_id, &place_id)
        .await?;
    Ok(web::Json(RatingsResponse::new(
        "Rating updated successfully",
        ratings,
    )))
}

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;
