use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
};
use frontier_shared::{COSMETIC_BASE, RESOURCE_BASE};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    let client_assets = Router::new().fallback_service(
        ServeDir::new(&state.dirs.client_dist)
            .precompressed_br()
            .precompressed_gzip(),
    );

    // Missing files must 404 so the client's overlay probe degrades cleanly.
    let app = Router::new()
        .route("/api/maps", axum::routing::get(routes::api::get_maps))
        .route("/api/health", axum::routing::get(routes::api::health))
        .nest_service(
            RESOURCE_BASE,
            ServeDir::new(&state.dirs.resources),
        )
        .nest_service(COSMETIC_BASE, ServeDir::new(&state.dirs.cosmetic));

    app.layer(CompressionLayer::new())
        .fallback_service(client_assets)
        .layer(middleware::from_fn(set_static_cache_control))
        .with_state(state)
}

async fn set_static_cache_control(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(cache_control) = cache_control_for_path(&path)
    {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
    }

    response
}

fn cache_control_for_path(path: &str) -> Option<&'static str> {
    if is_hashed_bundle_asset(path) {
        return Some("public, max-age=31536000, immutable");
    }

    if is_under(path, RESOURCE_BASE) || is_under(path, COSMETIC_BASE) {
        return Some("public, max-age=86400");
    }

    None
}

fn is_under(path: &str, base: &str) -> bool {
    path.strip_prefix(base)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
}

/// Trunk output like `frontier-client-71578f6b278221f3_bg.wasm`.
fn is_hashed_bundle_asset(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    let Some((stem, ext)) = file.rsplit_once('.') else {
        return false;
    };
    matches!(ext, "wasm" | "js" | "css") && stem.split(['-', '_', '.']).any(looks_like_hash)
}

fn looks_like_hash(segment: &str) -> bool {
    segment.len() >= 8 && segment.bytes().all(|b| b.is_ascii_hexdigit())
}
