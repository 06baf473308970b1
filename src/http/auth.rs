use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::AppState;

const BASIC_CHALLENGE: &str = "Basic realm=\"Admin\"";

/// 401 carrying the Basic auth challenge.
#[derive(Debug, Clone, Copy)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, BASIC_CHALLENGE)],
            "Unauthorized",
        )
            .into_response()
    }
}

/// Always requires valid Basic credentials.
#[derive(Debug, Clone)]
pub struct AdminAuth;

/// Requires valid Basic credentials only when `ENABLE_AUTH` is on.
#[derive(Debug, Clone)]
pub struct GatedAuth;

pub fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = Unauthorized;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.credentials.verify(authorization(&parts.headers)) {
            Ok(AdminAuth)
        } else {
            Err(Unauthorized)
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for GatedAuth {
    type Rejection = Unauthorized;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.enable_auth || state.credentials.verify(authorization(&parts.headers)) {
            Ok(GatedAuth)
        } else {
            Err(Unauthorized)
        }
    }
}
