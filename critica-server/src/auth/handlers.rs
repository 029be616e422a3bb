use axum::{Json, extract::State};
use serde::Serialize;
use tracing::info;

use critica_core::api_types::ApiResponse;
use critica_core::confirmation;
use critica_core::error::DomainError;
use critica_core::notify;
use critica_core::user::{SignupRequest, TokenRequest};
use critica_core::validate::Validate;

use super::jwt;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register (or re-register) an identity and dispatch a confirmation code.
///
/// Posting the exact same (username, email) pair again is idempotent and
/// re-issues a code, superseding the previous one. Delivery failures are
/// not surfaced; the code can always be re-requested.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> AppResult<Json<ApiResponse<SignupRequest>>> {
    request.validate()?;

    let user = state
        .users
        .get_or_create(&request.username, &request.email)
        .await?;

    let issued = confirmation::issue(user.id, &user.username, &state.auth.jwt_secret);
    state.users.store_confirmation(user.id, &issued.digest).await?;

    info!(username = %user.username, "confirmation code issued");

    // Fire and forget; a failed send is logged inside and swallowed
    let notifier = state.notifier.clone();
    let recipient = user.email.clone();
    tokio::spawn(async move {
        notify::send_confirmation(notifier.as_ref(), &recipient, &issued.code).await;
    });

    Ok(Json(ApiResponse::success(request)))
}

/// Exchange a confirmation code for a bearer token.
pub async fn token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    request.validate()?;

    let user = state
        .users
        .get_by_username(&request.username)
        .await?
        .ok_or_else(|| DomainError::UnknownUser(request.username.clone()))?;

    if !confirmation::verify(
        &request.confirmation_code,
        user.confirmation_hash.as_deref(),
    ) {
        return Err(DomainError::InvalidCode.into());
    }

    let token = jwt::mint(&user, &state.auth.jwt_secret, state.auth.token_ttl_secs)
        .map_err(|_| AppError::internal("Failed to mint access token"))?;

    Ok(Json(ApiResponse::success(TokenResponse { token })))
}
