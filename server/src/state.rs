use std::path::PathBuf;
use std::sync::Arc;

use frontier_shared::{MapCatalog, MapManifest};
use tokio::sync::OnceCell;

use crate::config;

/// On-disk locations the server publishes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDirs {
    pub resources: PathBuf,
    pub cosmetic: PathBuf,
    pub client_dist: PathBuf,
}

impl AssetDirs {
    pub fn from_env() -> Self {
        Self {
            resources: config::map_resources_dir(),
            cosmetic: config::cosmetic_maps_dir(),
            client_dist: config::client_dist_dir(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dirs: Arc<AssetDirs>,
    pub catalog: Arc<MapCatalog>,
    /// Built on first request; map assets are deployed with the server.
    pub manifest: Arc<OnceCell<Arc<MapManifest>>>,
}

impl AppState {
    pub fn new(dirs: AssetDirs) -> Self {
        Self::with_catalog(dirs, MapCatalog::builtin())
    }

    pub fn with_catalog(dirs: AssetDirs, catalog: MapCatalog) -> Self {
        Self {
            dirs: Arc::new(dirs),
            catalog: Arc::new(catalog),
            manifest: Arc::new(OnceCell::new()),
        }
    }
}
