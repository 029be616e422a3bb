//! Comments nested under a title's review.
//!
//! Every operation first checks the review actually belongs to the title in
//! the path; a mismatch is a broken reference, not a lookup miss.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use critica_core::api_types::ApiResponse;
use critica_core::policy::{Action, Actor, Target};
use critica_core::review::{CommentCreate, CommentDto, CommentPatch};
use critica_core::validate::Validate;

use super::ListQuery;
use crate::auth::{authorize, require_known};
use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<CommentDto>>>> {
    state.reviews.review_in_title(title_id, review_id).await?;
    let comments = state.reviews.list_comments(review_id, query.page()).await?;
    Ok(Json(ApiResponse::success(comments)))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CommentCreate>,
) -> AppResult<Json<ApiResponse<CommentDto>>> {
    authorize(actor, Action::Create, Target::Comment { author: None })?;
    let (author_id, _) = require_known(actor)?;
    payload.validate()?;

    state.reviews.review_in_title(title_id, review_id).await?;
    let comment = state
        .reviews
        .create_comment(review_id, author_id, &payload)
        .await?;
    Ok(Json(ApiResponse::success(comment)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<CommentDto>>> {
    state.reviews.review_in_title(title_id, review_id).await?;
    let comment = state.reviews.get_comment(review_id, comment_id).await?;
    Ok(Json(ApiResponse::success(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(patch): Json<CommentPatch>,
) -> AppResult<Json<ApiResponse<CommentDto>>> {
    state.reviews.review_in_title(title_id, review_id).await?;
    let row = state.reviews.comment_in_review(review_id, comment_id).await?;
    authorize(
        actor,
        Action::Update,
        Target::Comment {
            author: Some(row.author_id),
        },
    )?;
    patch.validate()?;

    let comment = state.reviews.update_comment(comment_id, &patch).await?;
    Ok(Json(ApiResponse::success(comment)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.reviews.review_in_title(title_id, review_id).await?;
    let row = state.reviews.comment_in_review(review_id, comment_id).await?;
    authorize(
        actor,
        Action::Delete,
        Target::Comment {
            author: Some(row.author_id),
        },
    )?;

    state.reviews.delete_comment(comment_id).await?;
    Ok(Json(ApiResponse::success(())))
}
