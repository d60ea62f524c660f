use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{build_component, component};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::component::{
    ComponentResponse, CreateComponentRequest, DEFAULT_CURRENCY, UpdateComponentRequest,
    validate_create_component, validate_update_component,
};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Components",
    operation_id = "createComponent",
    summary = "Add a component to the catalog",
    description = "Creates a catalog component. Requires the `admin` role.",
    request_body = CreateComponentRequest,
    responses(
        (status = 201, description = "Component created", body = ComponentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_component(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateComponentRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_component(&payload)?;

    let now = chrono::Utc::now();
    let model = component::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(payload.name.trim().to_string()),
        brand: Set(payload.brand.trim().to_string()),
        model: Set(payload.model.trim().to_string()),
        category: Set(payload.category.as_str().to_string()),
        price: Set(payload.price),
        currency: Set(payload
            .currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
        specs: Set(payload.specs.unwrap_or_else(|| serde_json::json!({}))),
        images: Set(serde_json::json!(payload.images.unwrap_or_default())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(component_id = %model.id, "component created");
    Ok((
        StatusCode::CREATED,
        Json(ComponentResponse::try_from(model)?),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Components",
    operation_id = "getComponent",
    summary = "Get a catalog component",
    params(("id" = Uuid, Path, description = "Component ID")),
    responses(
        (status = 200, description = "Component details", body = ComponentResponse),
        (status = 404, description = "Component not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_component(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComponentResponse>, AppError> {
    let model = find_component(&state.db, id).await?;
    Ok(Json(model.try_into()?))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Components",
    operation_id = "updateComponent",
    summary = "Update a catalog component",
    description = "Partially updates a component. Requires the `admin` role. Price changes do not touch existing builds; they are picked up the next time a build's components are replaced or copied.",
    params(("id" = Uuid, Path, description = "Component ID")),
    request_body = UpdateComponentRequest,
    responses(
        (status = 200, description = "Component updated", body = ComponentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Component not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_component(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateComponentRequest>,
) -> Result<Json<ComponentResponse>, AppError> {
    auth_user.require_admin()?;
    validate_update_component(&payload)?;

    if payload == UpdateComponentRequest::default() {
        let existing = find_component(&state.db, id).await?;
        return Ok(Json(existing.try_into()?));
    }

    let txn = state.db.begin().await?;

    let existing = find_component(&txn, id).await?;
    let mut active: component::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref brand) = payload.brand {
        active.brand = Set(brand.trim().to_string());
    }
    if let Some(ref model) = payload.model {
        active.model = Set(model.trim().to_string());
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(currency) = payload.currency {
        active.currency = Set(currency);
    }
    if let Some(specs) = payload.specs {
        active.specs = Set(specs);
    }
    if let Some(images) = payload.images {
        active.images = Set(serde_json::json!(images));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.try_into()?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Components",
    operation_id = "deleteComponent",
    summary = "Remove a component from the catalog",
    description = "Deletes a component. Requires the `admin` role. A component that is still part of any build cannot be deleted.",
    params(("id" = Uuid, Path, description = "Component ID")),
    responses(
        (status = 204, description = "Component deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Component not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Component is used by builds (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_component(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;

    find_component(&txn, id).await?;

    let used_by = build_component::Entity::find()
        .filter(build_component::Column::ComponentId.eq(id))
        .count(&txn)
        .await?;
    if used_by > 0 {
        return Err(AppError::Conflict(format!(
            "Component is used by {used_by} build(s)"
        )));
    }

    component::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(component_id = %id, "component deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_component<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<component::Model, AppError> {
    component::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Component not found".into()))
}
