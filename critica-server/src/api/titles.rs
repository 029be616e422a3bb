//! Title CRUD with filtering and derived ratings.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use critica_core::api_types::{ApiResponse, PageParams};
use critica_core::catalog::{TitleDraft, TitleDto, TitleFilter, TitlePatch};
use critica_core::policy::{Action, Actor, Target};
use critica_core::validate::Validate;

use crate::auth::authorize;
use crate::infra::{app_state::AppState, errors::AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct TitleQuery {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TitleQuery {
    fn split(self) -> (TitleFilter, PageParams) {
        (
            TitleFilter {
                category: self.category,
                genre: self.genre,
                year: self.year,
                name: self.name,
            },
            PageParams {
                limit: self.limit,
                offset: self.offset,
            },
        )
    }
}

pub async fn list_titles(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<ApiResponse<Vec<TitleDto>>>> {
    let (filter, page) = query.split();
    let titles = state.catalog.list_titles(&filter, page).await?;
    Ok(Json(ApiResponse::success(titles)))
}

pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TitleDto>>> {
    let title = state.catalog.get_title(id).await?;
    Ok(Json(ApiResponse::success(title)))
}

pub async fn create_title(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(draft): Json<TitleDraft>,
) -> AppResult<Json<ApiResponse<TitleDto>>> {
    authorize(actor, Action::Create, Target::Title)?;
    draft.validate()?;

    let title = state.catalog.create_title(&draft).await?;
    Ok(Json(ApiResponse::success(title)))
}

pub async fn update_title(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TitlePatch>,
) -> AppResult<Json<ApiResponse<TitleDto>>> {
    authorize(actor, Action::Update, Target::Title)?;
    patch.validate()?;

    let title = state.catalog.update_title(id, &patch).await?;
    Ok(Json(ApiResponse::success(title)))
}

pub async fn delete_title(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    authorize(actor, Action::Delete, Target::Title)?;

    state.catalog.delete_title(id).await?;
    Ok(Json(ApiResponse::success(())))
}
