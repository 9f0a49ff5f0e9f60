use std::future::Future;

use gloo_net::http::{Method, RequestBuilder};

use frontier_shared::MapManifest;

use crate::map_loader::AssetSource;

/// Fetches map assets from the page's origin (or absolute URLs in the catalog).
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpAssetSource;

impl AssetSource for HttpAssetSource {
    fn probe(&self, url: &str) -> impl Future<Output = Result<u16, String>> {
        async move {
            let response = RequestBuilder::new(url)
                .method(Method::HEAD)
                .send()
                .await
                .map_err(|e| format!("fetch error: {e}"))?;
            Ok(response.status())
        }
    }

    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, String>> {
        async move {
            let response = RequestBuilder::new(url)
                .method(Method::GET)
                .send()
                .await
                .map_err(|e| format!("fetch error: {e}"))?;

            if !response.ok() {
                return Err(format!("HTTP {}", response.status()));
            }

            response
                .binary()
                .await
                .map_err(|e| format!("read error: {e}"))
        }
    }
}

/// Which maps the server can currently serve.
pub async fn fetch_manifest() -> Result<MapManifest, String> {
    let response = gloo_net::http::Request::get("/api/maps")
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    response
        .json::<MapManifest>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}
