use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{self, protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router
///
/// - Public: `/health`, `/api/auth/register`, `/api/auth/login`
/// - Protected (bearer JWT): `/api/products[/:id]`, `/api/products/variants[/:id]`
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health::health))
        .merge(auth_public_routes())
        .merge(protected_routes(state.clone()))
        .layer(TraceLayer::new_for_http());

    if state.config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(product_routes())
        .merge(variant_routes())
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn product_routes() -> Router<AppState> {
    use protected::products;

    Router::new()
        .route("/api/products", post(products::create).get(products::list))
        .route(
            "/api/products/:id",
            get(products::get).put(products::update).delete(products::delete),
        )
}

fn variant_routes() -> Router<AppState> {
    use protected::variants;

    Router::new()
        // Static segment wins over /api/products/:id
        .route("/api/products/variants", post(variants::create).get(variants::list))
        .route(
            "/api/products/variants/:id",
            get(variants::get).put(variants::update).delete(variants::delete),
        )
}
