use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use tracing::{debug, info, warn};

use frontier_shared::{GameMap, MapCatalog, MapFiles, NationMap, UnknownMap};

/// Byte-level access to the conventional asset locations.
///
/// Transport failures are plain strings; the cache decides whether they are
/// fatal (required assets) or degrade to "absent" (cosmetic probe).
pub trait AssetSource {
    /// Metadata-only request. Returns the HTTP status.
    fn probe(&self, url: &str) -> impl Future<Output = Result<u16, String>>;

    /// Full body of a required asset. Non-success statuses are errors.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, String>>;
}

impl<T: AssetSource> AssetSource for Rc<T> {
    fn probe(&self, url: &str) -> impl Future<Output = Result<u16, String>> {
        (**self).probe(url)
    }

    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, String>> {
        (**self).fetch(url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapAssetError {
    /// The map has no file name mapping. Retrying cannot help.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to load {url}: {reason}")]
    AssetLoad { url: String, reason: String },
}

impl From<UnknownMap> for MapAssetError {
    fn from(err: UnknownMap) -> Self {
        MapAssetError::Configuration(err.to_string())
    }
}

/// Optional decorative overlay image for a map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CosmeticImage {
    /// Not probed yet.
    #[default]
    Unknown,
    Absent,
    Present(String),
}

impl CosmeticImage {
    pub fn url(&self) -> Option<&str> {
        match self {
            CosmeticImage::Present(url) => Some(url),
            CosmeticImage::Unknown | CosmeticImage::Absent => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, CosmeticImage::Unknown)
    }
}

/// Everything needed to render and simulate one map. Built whole or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct MapAssetBundle {
    pub terrain: Vec<u8>,
    pub mini_map: Vec<u8>,
    pub nations: NationMap,
    pub cosmetic: CosmeticImage,
}

type BundleResult = Result<Rc<MapAssetBundle>, MapAssetError>;
type InFlightLoad = Shared<LocalBoxFuture<'static, BundleResult>>;

struct CacheState<S> {
    source: S,
    catalog: MapCatalog,
    loaded: RefCell<HashMap<GameMap, Rc<MapAssetBundle>>>,
    load_order: RefCell<Vec<GameMap>>,
    in_flight: RefCell<HashMap<GameMap, InFlightLoad>>,
}

/// Per-map asset cache with single-flight loading.
///
/// Resolved bundles live for as long as the cache does. Concurrent requests for
/// the same map share one in-flight load; failures are not cached. Cloning the
/// cache shares its state.
///
/// Single-threaded: state sits in `RefCell`s and no borrow is held across an
/// await point.
pub struct MapAssetCache<S> {
    state: Rc<CacheState<S>>,
}

impl<S> Clone for MapAssetCache<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<S: AssetSource + 'static> MapAssetCache<S> {
    pub fn new(source: S, catalog: MapCatalog) -> Self {
        Self {
            state: Rc::new(CacheState {
                source,
                catalog,
                loaded: RefCell::new(HashMap::new()),
                load_order: RefCell::new(Vec::new()),
                in_flight: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub async fn get_bundle(&self, map: GameMap) -> BundleResult {
        if let Some(bundle) = self.state.loaded.borrow().get(&map) {
            return Ok(Rc::clone(bundle));
        }

        let load = self.join_or_start(map)?;
        load.await
    }

    pub fn is_loaded(&self, map: GameMap) -> bool {
        self.state
            .loaded
            .borrow()
            .get(&map)
            .is_some_and(|bundle| bundle.cosmetic.is_resolved())
    }

    pub fn is_loading(&self, map: GameMap) -> bool {
        self.state.in_flight.borrow().contains_key(&map)
    }

    /// Resolved maps in the order they finished loading.
    pub fn list_loaded(&self) -> Vec<GameMap> {
        self.state.load_order.borrow().clone()
    }

    pub fn cosmetic_image(&self, map: GameMap) -> CosmeticImage {
        self.state
            .loaded
            .borrow()
            .get(&map)
            .map(|bundle| bundle.cosmetic.clone())
            .unwrap_or_default()
    }

    fn join_or_start(&self, map: GameMap) -> Result<InFlightLoad, MapAssetError> {
        if let Some(load) = self.state.in_flight.borrow().get(&map) {
            debug!(%map, "joining in-flight map load");
            return Ok(load.clone());
        }

        let files = self.state.catalog.files(map).ok_or_else(|| {
            MapAssetError::Configuration(format!("no file name mapping found for map: {map}"))
        })?;

        let load = start_load(Rc::clone(&self.state), map, files);
        self.state
            .in_flight
            .borrow_mut()
            .insert(map, load.clone());
        Ok(load)
    }
}

fn start_load<S: AssetSource + 'static>(
    state: Rc<CacheState<S>>,
    map: GameMap,
    files: MapFiles,
) -> InFlightLoad {
    async move {
        let result = load_bundle(&state.source, &files).await.map(Rc::new);

        state.in_flight.borrow_mut().remove(&map);
        match &result {
            Ok(bundle) => {
                state.loaded.borrow_mut().insert(map, Rc::clone(bundle));
                state.load_order.borrow_mut().push(map);
                info!(
                    %map,
                    terrain_bytes = bundle.terrain.len(),
                    mini_map_bytes = bundle.mini_map.len(),
                    nations = bundle.nations.nations.len(),
                    cosmetic = bundle.cosmetic.url().is_some(),
                    "map assets loaded"
                );
            }
            Err(e) => warn!(%map, error = %e, "map asset load failed"),
        }
        result
    }
    .boxed_local()
    .shared()
}

async fn load_bundle<S: AssetSource>(
    source: &S,
    files: &MapFiles,
) -> Result<MapAssetBundle, MapAssetError> {
    let required = async {
        futures::try_join!(
            fetch_binary(source, &files.terrain),
            fetch_binary(source, &files.mini_map),
            fetch_nations(source, &files.nations),
        )
    };
    let (cosmetic, required) = futures::join!(probe_cosmetic(source, &files.cosmetic), required);
    let (terrain, mini_map, nations) = required?;

    Ok(MapAssetBundle {
        terrain,
        mini_map,
        nations,
        cosmetic,
    })
}

async fn probe_cosmetic<S: AssetSource>(source: &S, url: &str) -> CosmeticImage {
    match source.probe(url).await {
        Ok(status) if (200..300).contains(&status) => CosmeticImage::Present(url.to_string()),
        Ok(status) => {
            warn!(url, status, "cosmetic map image not found");
            CosmeticImage::Absent
        }
        Err(reason) => {
            warn!(url, %reason, "cosmetic map image probe failed");
            CosmeticImage::Absent
        }
    }
}

async fn fetch_binary<S: AssetSource>(source: &S, url: &str) -> Result<Vec<u8>, MapAssetError> {
    let bytes = source.fetch(url).await.map_err(|reason| asset_error(url, reason))?;
    if bytes.is_empty() {
        return Err(asset_error(url, "empty body"));
    }
    Ok(bytes)
}

async fn fetch_nations<S: AssetSource>(source: &S, url: &str) -> Result<NationMap, MapAssetError> {
    let bytes = source.fetch(url).await.map_err(|reason| asset_error(url, reason))?;
    serde_json::from_slice(&bytes).map_err(|e| asset_error(url, format!("parse error: {e}")))
}

fn asset_error(url: &str, reason: impl Into<String>) -> MapAssetError {
    MapAssetError::AssetLoad {
        url: url.to_string(),
        reason: reason.into(),
    }
}
