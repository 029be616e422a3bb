//! User administration and the self-profile endpoint.
//!
//! The `/users` surface is admin-only down to reads; `/users/me` is open to
//! any authenticated caller and treats `role` as read-only.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use critica_core::api_types::ApiResponse;
use critica_core::error::DomainError;
use critica_core::policy::{Action, Actor, Target};
use critica_core::user::{UserCreateRequest, UserDto, UserUpdateRequest};
use critica_core::validate::Validate;

use super::ListQuery;
use crate::auth::{authorize, require_known};
use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<UserDto>>>> {
    authorize(actor, Action::List, Target::UserAccount)?;

    let users = state
        .users
        .list(query.search.as_deref(), query.page())
        .await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<UserCreateRequest>,
) -> AppResult<Json<ApiResponse<UserDto>>> {
    authorize(actor, Action::Create, Target::UserAccount)?;
    request.validate()?;

    let user = state.users.create(&request).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<UserDto>>> {
    authorize(actor, Action::Get, Target::UserAccount)?;

    let user = state
        .users
        .get_by_username(&username)
        .await?
        .ok_or(DomainError::UnknownUser(username))?;
    Ok(Json(ApiResponse::success(user.into())))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(username): Path<String>,
    Json(request): Json<UserUpdateRequest>,
) -> AppResult<Json<ApiResponse<UserDto>>> {
    authorize(actor, Action::Update, Target::UserAccount)?;
    request.validate()?;

    let user = state.users.update(&username, &request).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    authorize(actor, Action::Delete, Target::UserAccount)?;

    state.users.delete(&username).await?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn me_get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<ApiResponse<UserDto>>> {
    let (id, _) = require_known(actor)?;

    let user = state
        .users
        .get_by_id(id)
        .await?
        .ok_or(DomainError::UnknownUser("me".to_string()))?;
    Ok(Json(ApiResponse::success(user.into())))
}

pub async fn me_patch(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<UserUpdateRequest>,
) -> AppResult<Json<ApiResponse<UserDto>>> {
    let (id, _) = require_known(actor)?;
    request.validate()?;

    let user = state
        .users
        .get_by_id(id)
        .await?
        .ok_or(DomainError::UnknownUser("me".to_string()))?;

    // Role is read-only on the self-profile path, even if supplied
    let request = UserUpdateRequest {
        role: None,
        ..request
    };

    let updated = state.users.update(&user.username, &request).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}
