//! Reviews nested under titles.
//!
//! Authorship comes from the acting identity, never from the payload, and
//! ownership gates update/delete unless the actor moderates or administers.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use critica_core::api_types::ApiResponse;
use critica_core::policy::{Action, Actor, Target};
use critica_core::review::{ReviewCreate, ReviewDto, ReviewPatch};
use critica_core::validate::Validate;

use super::ListQuery;
use crate::auth::{authorize, require_known};
use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<ReviewDto>>>> {
    let reviews = state.reviews.list_reviews(title_id, query.page()).await?;
    Ok(Json(ApiResponse::success(reviews)))
}

pub async fn create_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(title_id): Path<Uuid>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<ApiResponse<ReviewDto>>> {
    authorize(actor, Action::Create, Target::Review { author: None })?;
    let (author_id, _) = require_known(actor)?;
    payload.validate()?;

    let review = state
        .reviews
        .create_review(title_id, author_id, &payload)
        .await?;
    Ok(Json(ApiResponse::success(review)))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<ReviewDto>>> {
    let review = state.reviews.get_review(title_id, review_id).await?;
    Ok(Json(ApiResponse::success(review)))
}

pub async fn update_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<ReviewPatch>,
) -> AppResult<Json<ApiResponse<ReviewDto>>> {
    let row = state.reviews.review_in_title(title_id, review_id).await?;
    authorize(
        actor,
        Action::Update,
        Target::Review {
            author: Some(row.author_id),
        },
    )?;
    patch.validate()?;

    let review = state.reviews.update_review(review_id, &patch).await?;
    Ok(Json(ApiResponse::success(review)))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let row = state.reviews.review_in_title(title_id, review_id).await?;
    authorize(
        actor,
        Action::Delete,
        Target::Review {
            author: Some(row.author_id),
        },
    )?;

    state.reviews.delete_review(review_id).await?;
    Ok(Json(ApiResponse::success(())))
}
