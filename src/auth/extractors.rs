use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::services::{parse_basic_header, verify_credentials};
use crate::{config::AdminCredentials, error::ApiError};

/// Proof that the request carried the admin Basic credentials.
///
/// Rejects with 403 rather than 401 so browsers do not pop up a login dialog.
pub struct AdminAuth;

#[async_trait]
impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
    AdminCredentials: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let expected = AdminCredentials::from_ref(state);

        let Some(header) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        else {
            warn!(uri = %parts.uri, "missing Authorization header");
            return Err(ApiError::Unauthorized);
        };

        let Some(given) = parse_basic_header(header) else {
            warn!(uri = %parts.uri, "unparseable Basic credentials");
            return Err(ApiError::Unauthorized);
        };

        if !verify_credentials(&given, &expected) {
            warn!(username = %given.username, "invalid credentials");
            return Err(ApiError::Unauthorized);
        }

        Ok(AdminAuth)
    }
}
