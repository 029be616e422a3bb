//! Categories and genres: list, create, delete.
//!
//! The two namespaces share a shape, so the handlers delegate to common
//! helpers parameterized by [`TermKind`].

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use critica_core::api_types::ApiResponse;
use critica_core::catalog::{Term, TermPayload};
use critica_core::policy::{Action, Actor, Target};
use critica_core::store::TermKind;
use critica_core::validate::Validate;

use super::ListQuery;
use crate::auth::authorize;
use crate::infra::{app_state::AppState, errors::AppResult};

fn target_of(kind: TermKind) -> Target {
    match kind {
        TermKind::Category => Target::Category,
        TermKind::Genre => Target::Genre,
    }
}

async fn list_terms(
    state: AppState,
    kind: TermKind,
    query: ListQuery,
) -> AppResult<Json<ApiResponse<Vec<Term>>>> {
    let terms = state
        .catalog
        .list_terms(kind, query.search.as_deref(), query.page())
        .await?;
    Ok(Json(ApiResponse::success(terms)))
}

async fn create_term(
    state: AppState,
    actor: Actor,
    kind: TermKind,
    payload: TermPayload,
) -> AppResult<Json<ApiResponse<Term>>> {
    authorize(actor, Action::Create, target_of(kind))?;
    payload.validate()?;

    let term = state.catalog.create_term(kind, &payload).await?;
    Ok(Json(ApiResponse::success(term)))
}

async fn delete_term(
    state: AppState,
    actor: Actor,
    kind: TermKind,
    slug: String,
) -> AppResult<Json<ApiResponse<()>>> {
    authorize(actor, Action::Delete, target_of(kind))?;

    state.catalog.delete_term(kind, &slug).await?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Term>>>> {
    list_terms(state, TermKind::Category, query).await
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<TermPayload>,
) -> AppResult<Json<ApiResponse<Term>>> {
    create_term(state, actor, TermKind::Category, payload).await
}

pub async fn delete_category(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    delete_term(state, actor, TermKind::Category, slug).await
}

pub async fn list_genres(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Term>>>> {
    list_terms(state, TermKind::Genre, query).await
}

pub async fn create_genre(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<TermPayload>,
) -> AppResult<Json<ApiResponse<Term>>> {
    create_term(state, actor, TermKind::Genre, payload).await
}

pub async fn delete_genre(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    delete_term(state, actor, TermKind::Genre, slug).await
}
