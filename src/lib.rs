pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod jsonapi;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::CorsConfig;
use crate::handlers::{articles, auth as auth_handlers, authors, categories, system};
use crate::jsonapi::API_PREFIX;
use crate::middleware::{guest_middleware, json_api_headers_middleware, token_auth_middleware};
use crate::state::AppState;

/// The full HTTP application: JSON:API resources and auth endpoints under
/// `/api/v1`, service info and health at the root.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .nest(
            API_PREFIX,
            resource_routes(&state)
                .merge(auth_routes(&state))
                .fallback(system::fallback),
        )
        .fallback(system::fallback)
        .layer(
            ServiceBuilder::new()
                // Applied by the `Bytes` extractors; over-limit bodies map to a JSON:API 413
                .layer(DefaultBodyLimit::max(config.server.max_request_size_bytes))
                .layer(cors_layer(&config.cors)),
        );

    if config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

/// JSON:API resources. Reads are public; writes need a token.
fn resource_routes(state: &AppState) -> Router<AppState> {
    let authenticated = from_fn_with_state(state.clone(), token_auth_middleware);

    Router::new()
        .route(
            "/articles",
            get(articles::index).merge(post(articles::store).route_layer(authenticated.clone())),
        )
        .route(
            "/articles/:slug",
            get(articles::show).merge(
                patch(articles::update)
                    .delete(articles::destroy)
                    .route_layer(authenticated),
            ),
        )
        .route("/articles/:slug/category", get(articles::related_category))
        .route("/articles/:slug/author", get(articles::related_author))
        .route(
            "/articles/:slug/relationships/category",
            get(articles::category_relationship),
        )
        .route(
            "/articles/:slug/relationships/author",
            get(articles::author_relationship),
        )
        .route("/categories", get(categories::index))
        .route("/categories/:slug", get(categories::show))
        .route("/authors", get(authors::index))
        .route("/authors/:id", get(authors::show))
        .route_layer(from_fn(json_api_headers_middleware))
}

/// Plain JSON token endpoints
fn auth_routes(state: &AppState) -> Router<AppState> {
    let guest = Router::new()
        .route("/login", post(auth_handlers::login_post))
        .route("/register", post(auth_handlers::register_post))
        .route_layer(from_fn_with_state(state.clone(), guest_middleware));

    let authenticated = Router::new()
        .route("/logout", post(auth_handlers::logout_post))
        .route_layer(from_fn_with_state(state.clone(), token_auth_middleware));

    guest.merge(authenticated)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if !cors.enabled {
        return CorsLayer::new();
    }
    if cors.origins.is_empty() || cors.origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
}
