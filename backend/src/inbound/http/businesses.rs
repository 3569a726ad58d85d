//! Legacy business catalogue under `/api/v1.0/businesses`.
//!
//! Bodies are form encoded. Creation and replacement answer with the
//! absolute URL of the affected resource.
//!
//! ```text
//! POST /api/v1.0/businesses  name=Pie+Shop&town=Leeds&rating=4.5
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Business, BusinessDraft, BusinessReview, BusinessReviewDraft, DocumentId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::PageParams;
use crate::inbound::http::state::HttpState;

/// Form fields for a business.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BusinessForm {
    pub name: Option<String>,
    pub town: Option<String>,
    #[schema(example = "4.5")]
    pub rating: Option<String>,
}

impl TryFrom<BusinessForm> for BusinessDraft {
    type Error = Error;

    fn try_from(form: BusinessForm) -> Result<Self, Self::Error> {
        Self::parse(
            form.name.as_deref(),
            form.town.as_deref(),
            form.rating.as_deref(),
        )
    }
}

/// Form fields for a business review.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BusinessReviewForm {
    pub username: Option<String>,
    pub comment: Option<String>,
    #[schema(example = "5")]
    pub stars: Option<String>,
}

impl TryFrom<BusinessReviewForm> for BusinessReviewDraft {
    type Error = Error;

    fn try_from(form: BusinessReviewForm) -> Result<Self, Self::Error> {
        Self::parse(
            form.username.as_deref(),
            form.comment.as_deref(),
            form.stars.as_deref(),
        )
    }
}

/// Location of a created or replaced resource.
#[derive(Debug, Serialize, ToSchema)]
pub struct UrlResponse {
    #[schema(example = "http://127.0.0.1:2000/api/v1.0/businesses/65a1f0c2b3d4e5f60718293a")]
    pub url: String,
}

fn business_id(raw: &str) -> Result<DocumentId, Error> {
    DocumentId::parse_field("business_id", raw)
}

fn review_path(path: (String, String)) -> Result<(DocumentId, DocumentId), Error> {
    let (id, review_id) = path;
    Ok((
        business_id(&id)?,
        DocumentId::parse_field("review_id", &review_id)?,
    ))
}

/// Page through businesses in insertion order; an empty page is 404.
#[utoipa::path(
    get,
    path = "/api/v1.0/businesses",
    params(PageParams),
    responses(
        (status = 200, description = "Businesses", body = [Business]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Empty page", body = Error)
    ),
    tags = ["businesses"],
    operation_id = "listBusinesses"
)]
#[get("/v1.0/businesses")]
pub async fn list_businesses(
    state: web::Data<HttpState>,
    page: web::Query<PageParams>,
) -> ApiResult<web::Json<Vec<Business>>> {
    let businesses = state.businesses.list(page.to_request()?).await?;
    if businesses.is_empty() {
        return Err(Error::not_found("no businesses on this page"));
    }
    Ok(web::Json(businesses))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/businesses/{business_id}",
    params(("business_id" = String, Path, description = "24 digit hexadecimal business id")),
    responses(
        (status = 200, description = "Business", body = Business),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["businesses"],
    operation_id = "getBusiness"
)]
#[get("/v1.0/businesses/{business_id}")]
pub async fn get_business(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Business>> {
    let id = business_id(&path.into_inner())?;
    Ok(web::Json(state.businesses.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1.0/businesses",
    request_body(content = BusinessForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Business created", body = UrlResponse),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["businesses"],
    operation_id = "createBusiness"
)]
#[post("/v1.0/businesses")]
pub async fn create_business(
    state: web::Data<HttpState>,
    form: web::Form<BusinessForm>,
) -> ApiResult<HttpResponse> {
    let draft = BusinessDraft::try_from(form.into_inner())?;
    let id = state.businesses.create(draft).await?;
    info!(business = %id, "business created");
    Ok(HttpResponse::Created().json(UrlResponse {
        url: state.business_url(&id),
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1.0/businesses/{business_id}",
    params(("business_id" = String, Path, description = "24 digit hexadecimal business id")),
    request_body(content = BusinessForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Business replaced", body = UrlResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["businesses"],
    operation_id = "replaceBusiness"
)]
#[put("/v1.0/businesses/{business_id}")]
pub async fn replace_business(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    form: web::Form<BusinessForm>,
) -> ApiResult<web::Json<UrlResponse>> {
    let id = business_id(&path.into_inner())?;
    let draft = BusinessDraft::try_from(form.into_inner())?;
    state.businesses.replace(&id, draft).await?;
    Ok(web::Json(UrlResponse {
        url: state.business_url(&id),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1.0/businesses/{business_id}",
    params(("business_id" = String, Path, description = "24 digit hexadecimal business id")),
    responses(
        (status = 204, description = "Business deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["businesses"],
    operation_id = "deleteBusiness"
)]
#[delete("/v1.0/businesses/{business_id}")]
pub async fn delete_business(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = business_id(&path.into_inner())?;
    state.businesses.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/v1.0/businesses/{business_id}/reviews",
    params(("business_id" = String, Path, description = "24 digit hexadecimal business id")),
    responses(
        (status = 200, description = "Reviews", body = [BusinessReview]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["businesses"],
    operation_id = "listBusinessReviews"
)]
#[get("/v1.0/businesses/{business_id}/reviews")]
pub async fn list_business_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<BusinessReview>>> {
    let id = business_id(&path.into_inner())?;
    Ok(web::Json(state.businesses.list_reviews(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1.0/businesses/{business_id}/reviews",
    params(("business_id" = String, Path, description = "24 digit hexadecimal business id")),
    request_body(content = BusinessReviewForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Review added", body = UrlResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["businesses"],
    operation_id = "addBusinessReview"
)]
#[post("/v1.0/businesses/{business_id}/reviews")]
pub async fn add_business_review(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    form: web::Form<BusinessReviewForm>,
) -> ApiResult<HttpResponse> {
    let id = business_id(&path.into_inner())?;
    let draft = BusinessReviewDraft::try_from(form.into_inner())?;
    let review_id = state.businesses.add_review(&id, draft).await?;
    Ok(HttpResponse::Created().json(UrlResponse {
        url: state.business_review_url(&id, &review_id),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/businesses/{business_id}/reviews/{review_id}",
    params(
        ("business_id" = String, Path, description = "24 digit hexadecimal business id"),
        ("review_id" = String, Path, description = "24 digit hexadecimal review id")
    ),
    responses(
        (status = 200, description = "Review", body = BusinessReview),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["businesses"],
    operation_id = "getBusinessReview"
)]
#[get("/v1.0/businesses/{business_id}/reviews/{review_id}")]
pub async fn get_business_review(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<BusinessReview>> {
    let (id, review_id) = review_path(path.into_inner())?;
    Ok(web::Json(state.businesses.get_review(&id, &review_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1.0/businesses/{business_id}/reviews/{review_id}",
    params(
        ("business_id" = String, Path, description = "24 digit hexadecimal business id"),
        ("review_id" = String, Path, description = "24 digit hexadecimal review id")
    ),
    request_body(content = BusinessReviewForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Review replaced", body = UrlResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["businesses"],
    operation_id = "replaceBusinessReview"
)]
#[put("/v1.0/businesses/{business_id}/reviews/{review_id}")]
pub async fn replace_business_review(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    form: web::Form<BusinessReviewForm>,
) -> ApiResult<web::Json<UrlResponse>> {
    let (id, review_id) = review_path(path.into_inner())?;
    let draft = BusinessReviewDraft::try_from(form.into_inner())?;
    state
        .businesses
        .replace_review(&id, &review_id, draft)
        .await?;
    Ok(web::Json(UrlResponse {
        url: state.business_review_url(&id, &review_id),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1.0/businesses/{business_id}/reviews/{review_id}",
    params(
        ("business_id" = String, Path, description = "24 digit hexadecimal business id"),
        ("review_id" = String, Path, description = "24 digit hexadecimal review id")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["businesses"],
    operation_id = "deleteBusinessReview"
)]
#[delete("/v1.0/businesses/{business_id}/reviews/{review_id}")]
pub async fn delete_business_review(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (id, review_id) = review_path(path.into_inner())?;
    state.businesses.delete_review(&id, &review_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "businesses_tests.rs"]
mod tests;
