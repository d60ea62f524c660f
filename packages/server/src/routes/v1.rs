use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/builds", build_routes())
        .nest("/components", component_routes())
        .routes(routes!(handlers::health::health))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
        .routes(routes!(handlers::auth::update_profile))
}

fn build_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::build::create_build))
        .routes(routes!(handlers::build::list_my_builds))
        .routes(routes!(handlers::build::list_public_builds))
        .routes(routes!(
            handlers::build::get_build,
            handlers::build::update_build,
            handlers::build::delete_build
        ))
        .routes(routes!(handlers::build::copy_build))
}

fn component_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::component::create_component))
        .routes(routes!(
            handlers::component::get_component,
            handlers::component::update_component,
            handlers::component::delete_component
        ))
}
