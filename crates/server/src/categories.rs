//! Categories API endpoints

use api_types::category::{CategoryKind as ApiCategoryKind, CategoryNew, CategoryPatch, CategoryView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::CategoryKind) -> ApiCategoryKind {
    match kind {
        engine::CategoryKind::Income => ApiCategoryKind::Income,
        engine::CategoryKind::Expense => ApiCategoryKind::Expense,
    }
}

fn map_kind_in(kind: ApiCategoryKind) -> engine::CategoryKind {
    match kind {
        ApiCategoryKind::Income => engine::CategoryKind::Income,
        ApiCategoryKind::Expense => engine::CategoryKind::Expense,
    }
}

fn view(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        icon: category.icon,
        color: category.color,
        parent_id: category.parent_id,
        is_default: category.is_default,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let mut cmd = engine::NewCategory::new(payload.name, map_kind_in(payload.kind));
    if let Some(icon) = payload.icon {
        cmd = cmd.icon(icon);
    }
    if let Some(color) = payload.color {
        cmd = cmd.color(color);
    }
    if let Some(parent_id) = payload.parent_id {
        cmd = cmd.parent_id(parent_id);
    }

    let category = state.engine.create_category(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(category))))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.list_categories().await?;
    Ok(Json(categories.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(id).await?;
    Ok(Json(view(category)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPatch>,
) -> Result<Json<CategoryView>, ServerError> {
    let patch = engine::CategoryPatch {
        name: payload.name,
        kind: payload.kind.map(map_kind_in),
        icon: payload.icon,
        color: payload.color,
        parent_id: payload.parent_id,
    };

    let category = state.engine.update_category(id, patch).await?;
    Ok(Json(view(category)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
