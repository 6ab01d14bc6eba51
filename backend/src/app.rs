use axum::{
    middleware as axum_middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    handlers,
    middleware::{cors, log_error_responses, AllowedOrigin},
    state::AppState,
};

/// Builds the gateway router. Unknown paths, and known paths hit with the
/// wrong method, fall through to the JSON 404.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let origin = AllowedOrigin::new(&state.config.allowed_origin)?;

    let router = Router::new()
        .route(
            "/api/v1/insert",
            strict(post(handlers::patients::insert_rows)),
        )
        .route("/api/v1/sql/", strict(get(handlers::sql::execute_sql)))
        .route(
            "/api/v1/sql/{*query}",
            strict(get(handlers::sql::execute_sql)),
        )
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(log_error_responses))
                .layer(axum_middleware::from_fn_with_state(origin, cors)),
        )
        .with_state(state);

    Ok(router)
}

/// Stops GET routes from answering HEAD and sends other methods to the 404.
fn strict(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route
        .head(handlers::not_found)
        .fallback(handlers::not_found)
}
