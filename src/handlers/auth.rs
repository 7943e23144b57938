//! Authenticated identity echo.

use axum::{Extension, Json};
use serde::Serialize;

use crate::{error::AppError, response::ApiResponse, session::Identity};

/// Identity payload for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: String,
}

/// Return the identity the owner gate attached to this request.
///
/// `GET /auth/me` - owner gated, under the strict auth-class rate limit.
/// Lets clients confirm their session without touching any data routes.
pub async fn me(
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<MeResponse>>, AppError> {
    Ok(Json(ApiResponse::new(MeResponse {
        email: identity.email,
    })))
}
