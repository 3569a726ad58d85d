//! Route guards expressed as Actix extractors.
//!
//! Handlers that require a caller identity take [`JwtUser`]; handlers that
//! additionally require admin rights take [`AdminUser`]. Both resolve the
//! bearer token through the [`crate::domain::ports::AuthGate`] held in
//! [`HttpState`], so guards stay independent of the token format.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, Principal};
use crate::inbound::http::state::HttpState;

/// Primary header carrying the bearer token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

const BEARER_PREFIX: &str = "Bearer ";

/// Read the token from `x-access-token`, falling back to
/// `Authorization: Bearer`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let primary = headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = primary {
        return Some(token.to_owned());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

async fn authenticate(req: HttpRequest) -> Result<Principal, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req.headers()).ok_or_else(|| {
        debug!(path = %req.path(), "request without bearer token");
        Error::unauthorized("Token is missing")
    })?;
    state.auth.authenticate(&token).await
}

/// Any caller holding a valid, unrevoked token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtUser(pub Principal);

impl JwtUser {
    /// The authenticated identity.
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

impl FromRequest for JwtUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            authenticate(req)
                .await
                .map(JwtUser)
                .map_err(actix_web::Error::from)
        })
    }
}

/// A caller whose token carries the admin claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser(pub Principal);

impl AdminUser {
    /// The authenticated identity.
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let principal = authenticate(req).await?;
            if !principal.is_admin {
                debug!(username = %principal.username, "admin route refused");
                return Err(Error::forbidden("Admin access required").into());
            }
            Ok(AdminUser(principal))
        })
    }
}
