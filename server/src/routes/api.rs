use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use frontier_shared::{AssetEntry, AssetKind, MapManifest, MapManifestEntry};
use tracing::{debug, warn};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let manifest = manifest(&state).await;
    Json(serde_json::json!({
        "status": "ok",
        "maps_available": manifest.playable().count(),
    }))
}

/// What each catalog map can currently be served with, including checksums.
pub async fn get_maps(State(state): State<AppState>) -> Json<MapManifest> {
    Json((*manifest(&state).await).clone())
}

async fn manifest(state: &AppState) -> Arc<MapManifest> {
    state
        .manifest
        .get_or_init(|| async { Arc::new(build_manifest(state).await) })
        .await
        .clone()
}

pub(crate) async fn build_manifest(state: &AppState) -> MapManifest {
    let mut maps = Vec::new();
    for map in state.catalog.maps() {
        let Some(name) = state.catalog.file_name(map) else {
            continue;
        };
        let mut entry = MapManifestEntry::new(map, name);
        for kind in AssetKind::ALL {
            let Some(url) = state.catalog.url(map, kind) else {
                continue;
            };
            let dir = if kind.is_required() {
                &state.dirs.resources
            } else {
                &state.dirs.cosmetic
            };
            entry.set(kind, describe_file(&dir.join(kind.file_name(name)), url).await);
        }
        maps.push(entry);
    }

    let manifest = MapManifest {
        generated_at: Utc::now(),
        maps,
    };
    debug!(
        maps = manifest.maps.len(),
        playable = manifest.playable().count(),
        "map manifest built"
    );
    manifest
}

async fn describe_file(path: &Path, url: String) -> Option<AssetEntry> {
    match tokio::fs::read(path).await {
        Ok(data) => Some(AssetEntry::describe(url, &data)),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read map asset");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use frontier_shared::{GameMap, asset_checksum};

    use crate::state::{AppState, AssetDirs};

    static NEXT_FIXTURE: AtomicUsize = AtomicUsize::new(0);

    pub(crate) const MARS_TERRAIN: &[u8] = b"\x01\x02\x03\x04terrain";
    pub(crate) const MARS_MINI: &[u8] = b"\x01\x02mini";
    pub(crate) const MARS_NATIONS: &str =
        r#"{"name":"Mars","width":800,"height":600,"nations":[]}"#;
    pub(crate) const MARS_OVERLAY: &[u8] = b"\x89PNG\r\n\x1a\nfake";

    /// Throwaway asset directories under the system temp dir.
    pub(crate) struct MapFixture {
        root: PathBuf,
        dirs: AssetDirs,
    }

    impl MapFixture {
        pub(crate) fn new(label: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "frontier-server-{label}-{}-{}",
                std::process::id(),
                NEXT_FIXTURE.fetch_add(1, Ordering::Relaxed)
            ));
            let dirs = AssetDirs {
                resources: root.join("resources"),
                cosmetic: root.join("overlays"),
                client_dist: root.join("dist"),
            };
            for dir in [&dirs.resources, &dirs.cosmetic, &dirs.client_dist] {
                std::fs::create_dir_all(dir).expect("create fixture dir");
            }
            std::fs::write(dirs.client_dist.join("index.html"), "<html></html>")
                .expect("write index");
            Self { root, dirs }
        }

        pub(crate) fn publish_mars(&self) {
            let resources = &self.dirs.resources;
            std::fs::write(resources.join("Mars.bin"), MARS_TERRAIN).expect("write terrain");
            std::fs::write(resources.join("MarsMini.bin"), MARS_MINI).expect("write mini");
            std::fs::write(resources.join("Mars.json"), MARS_NATIONS).expect("write nations");
            std::fs::write(self.dirs.cosmetic.join("Mars_T.png"), MARS_OVERLAY)
                .expect("write overlay");
        }

        pub(crate) fn state(&self) -> AppState {
            AppState::new(self.dirs.clone())
        }
    }

    impl Drop for MapFixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    async fn spawn_test_server(state: AppState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let app = crate::app::build_app(state);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });
        (addr, handle)
    }

    #[tokio::test]
    async fn cosmetic_probe_reports_presence_by_status() {
        let fixture = MapFixture::new("probe");
        fixture.publish_mars();
        let (addr, server_handle) = spawn_test_server(fixture.state()).await;
        let client = reqwest::Client::new();

        let present = client
            .head(format!("http://{addr}/maps/Mars_T.png"))
            .send()
            .await
            .expect("probe present");
        assert_eq!(present.status(), reqwest::StatusCode::OK);

        let absent = client
            .head(format!("http://{addr}/maps/Japan_T.png"))
            .send()
            .await
            .expect("probe absent");
        assert_eq!(absent.status(), reqwest::StatusCode::NOT_FOUND);

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn serves_required_assets_byte_for_byte() {
        let fixture = MapFixture::new("assets");
        fixture.publish_mars();
        let (addr, server_handle) = spawn_test_server(fixture.state()).await;

        let terrain = reqwest::get(format!("http://{addr}/resources/maps/Mars.bin"))
            .await
            .expect("terrain request")
            .error_for_status()
            .expect("terrain status")
            .bytes()
            .await
            .expect("terrain body");
        assert_eq!(terrain.as_ref(), MARS_TERRAIN);

        let nations = reqwest::get(format!("http://{addr}/resources/maps/Mars.json"))
            .await
            .expect("nations request")
            .error_for_status()
            .expect("nations status")
            .json::<frontier_shared::NationMap>()
            .await
            .expect("parse nations");
        assert_eq!(nations.dimensions(), Some((800, 600)));

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn manifest_and_health_describe_published_maps() {
        let fixture = MapFixture::new("manifest");
        fixture.publish_mars();
        let (addr, server_handle) = spawn_test_server(fixture.state()).await;
        let client = reqwest::Client::new();

        let manifest = client
            .get(format!("http://{addr}/api/maps"))
            .send()
            .await
            .expect("manifest request")
            .error_for_status()
            .expect("manifest status")
            .json::<frontier_shared::MapManifest>()
            .await
            .expect("parse manifest");

        assert_eq!(manifest.maps.len(), GameMap::ALL.len());
        assert_eq!(manifest.playable().collect::<Vec<_>>(), vec![GameMap::Mars]);

        let mars = manifest
            .maps
            .iter()
            .find(|entry| entry.map == GameMap::Mars)
            .expect("mars entry");
        let overlay = mars.cosmetic.as_ref().expect("mars overlay");
        assert_eq!(overlay.url, "/maps/Mars_T.png");
        assert_eq!(overlay.bytes, MARS_OVERLAY.len() as u64);
        assert_eq!(overlay.crc32, asset_checksum(MARS_OVERLAY));
        assert_eq!(
            mars.terrain.as_ref().map(|t| t.url.as_str()),
            Some("/resources/maps/Mars.bin")
        );

        let world = manifest
            .maps
            .iter()
            .find(|entry| entry.map == GameMap::World)
            .expect("world entry");
        assert_eq!(world.name, "WorldMap");
        assert!(world.terrain.is_none());
        assert!(world.cosmetic.is_none());

        let health = client
            .get(format!("http://{addr}/api/health"))
            .send()
            .await
            .expect("health request")
            .error_for_status()
            .expect("health status")
            .json::<serde_json::Value>()
            .await
            .expect("parse health");
        assert_eq!(health.get("status").and_then(|v| v.as_str()), Some("ok"));
        assert_eq!(
            health.get("maps_available").and_then(|v| v.as_u64()),
            Some(1)
        );

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn unknown_paths_fall_back_to_client_dist() {
        let fixture = MapFixture::new("dist");
        let (addr, server_handle) = spawn_test_server(fixture.state()).await;

        let index = reqwest::get(format!("http://{addr}/index.html"))
            .await
            .expect("index request");
        assert_eq!(index.status(), reqwest::StatusCode::OK);
        assert_eq!(index.text().await.expect("index body"), "<html></html>");

        server_handle.abort();
        let _ = server_handle.await;
    }
}
