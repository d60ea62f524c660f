use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::extractors::json::AppJson;
use crate::models::build::{
    BuildListQuery, BuildListResponse, BuildResponse, CopyBuildRequest, CreateBuildRequest,
    PublicBuildListQuery, UpdateBuildRequest,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/my",
    tag = "Builds",
    operation_id = "listMyBuilds",
    summary = "List the caller's builds",
    description = "Returns the authenticated user's builds, public and private, most recently updated first.",
    params(BuildListQuery),
    responses(
        (status = 200, description = "Page of builds", body = BuildListResponse),
        (status = 400, description = "Invalid page or limit (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_my_builds(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<BuildListQuery>,
) -> Result<Json<BuildListResponse>, AppError> {
    let principal = auth_user.principal();
    let page = state
        .builds
        .list_owned(Some(&principal), query.page(), query.limit())
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/public",
    tag = "Builds",
    operation_id = "listPublicBuilds",
    summary = "List public builds",
    description = "Returns public builds of all users. Sort by `created_at` (default), `name` or `total_price`, `desc` by default. No authentication required.",
    params(PublicBuildListQuery),
    responses(
        (status = 200, description = "Page of public builds", body = BuildListResponse),
        (status = 400, description = "Invalid paging or sort parameters (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_public_builds(
    State(state): State<AppState>,
    Query(query): Query<PublicBuildListQuery>,
) -> Result<Json<BuildListResponse>, AppError> {
    let sort = query.sort()?;
    let page = state
        .builds
        .list_public(query.page(), query.limit(), sort)
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Builds",
    operation_id = "getBuild",
    summary = "Get a build by ID",
    description = "Public builds are visible to anyone. Private builds are visible to their owner only. An invalid token is treated as an anonymous caller.",
    params(("id" = Uuid, Path, description = "Build ID")),
    responses(
        (status = 200, description = "Build with owner and components", body = BuildResponse),
        (status = 403, description = "Private build of another user (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Build not found (NOT_FOUND)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, caller), fields(id = %id))]
pub async fn get_build(
    caller: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BuildResponse>, AppError> {
    let principal = caller.principal();
    let build = state.builds.get_by_id(id, principal.as_ref()).await?;
    Ok(Json(build.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Builds",
    operation_id = "createBuild",
    summary = "Create a build",
    description = "Creates a build from catalog components. The total price is computed from current catalog prices. Builds are private unless `is_public` is set.",
    request_body = CreateBuildRequest,
    responses(
        (status = 201, description = "Build created", body = BuildResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 422, description = "Unknown component IDs (COMPONENTS_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, name = %payload.name))]
pub async fn create_build(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBuildRequest>,
) -> Result<impl IntoResponse, AppError> {
    let principal = auth_user.principal();
    let build = state
        .builds
        .create(Some(&principal), payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(BuildResponse::from(build))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Builds",
    operation_id = "updateBuild",
    summary = "Update a build",
    description = "Partially updates a build. Owner only. Sending `components` replaces the whole component set and re-prices the build at current catalog prices. An empty payload returns the build unchanged.",
    params(("id" = Uuid, Path, description = "Build ID")),
    request_body = UpdateBuildRequest,
    responses(
        (status = 200, description = "Build updated", body = BuildResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Build not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Unknown component IDs (COMPONENTS_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id, user_id = auth_user.user_id))]
pub async fn update_build(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateBuildRequest>,
) -> Result<Json<BuildResponse>, AppError> {
    let principal = auth_user.principal();
    let build = state
        .builds
        .update(id, Some(&principal), payload.into())
        .await?;
    Ok(Json(build.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Builds",
    operation_id = "deleteBuild",
    summary = "Delete a build",
    description = "Deletes a build and its component list. Owner only.",
    params(("id" = Uuid, Path, description = "Build ID")),
    responses(
        (status = 204, description = "Build deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Build not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id, user_id = auth_user.user_id))]
pub async fn delete_build(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let principal = auth_user.principal();
    state.builds.delete(id, Some(&principal)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/copy",
    tag = "Builds",
    operation_id = "copyBuild",
    summary = "Copy a public build",
    description = "Creates a private copy of a public build owned by the caller, priced at current catalog prices. Private builds cannot be copied, not even by their owner.",
    params(("id" = Uuid, Path, description = "Source build ID")),
    request_body = CopyBuildRequest,
    responses(
        (status = 201, description = "Copy created", body = BuildResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Source build is private (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Build not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "A source component left the catalog (COMPONENTS_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id, user_id = auth_user.user_id))]
pub async fn copy_build(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<CopyBuildRequest>,
) -> Result<impl IntoResponse, AppError> {
    let principal = auth_user.principal();
    let build = state
        .builds
        .copy(id, Some(&principal), &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(BuildResponse::from(build))))
}
