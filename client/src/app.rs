use gloo_storage::Storage;
use leptos::prelude::*;
use tracing::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use frontier_shared::{GameMap, MapCatalog};

use crate::asset_source::{self, HttpAssetSource};
use crate::canvas::MapCanvas;
use crate::cosmetic_image::{self, CosmeticOverlay};
use crate::map_loader::{MapAssetCache, MapAssetError};
use crate::viewport::Viewport;

const SELECTED_MAP_KEY: &str = "frontier_selected_map";

pub(crate) type ClientMapCache = MapAssetCache<HttpAssetSource>;

pub(crate) fn canvas_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (w, h)
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum LoadStatus {
    Idle,
    /// `joined` means another request for the same map was already in flight.
    Loading { map: GameMap, joined: bool },
    Ready {
        map: GameMap,
        nations: usize,
        cosmetic: bool,
    },
    Failed {
        map: Option<GameMap>,
        message: String,
    },
}

impl LoadStatus {
    pub(crate) fn describe(&self) -> String {
        match self {
            LoadStatus::Idle => "Pick a map".to_string(),
            LoadStatus::Loading { map, joined: false } => format!("Loading {}...", map.label()),
            LoadStatus::Loading { map, joined: true } => {
                format!("Still loading {}...", map.label())
            }
            LoadStatus::Ready {
                map,
                nations,
                cosmetic,
            } => {
                let overlay = if *cosmetic { "" } else { ", no overlay" };
                format!("{}: {nations} nations{overlay}", map.label())
            }
            LoadStatus::Failed {
                map: Some(map),
                message,
            } => format!("{} failed: {message}", map.label()),
            LoadStatus::Failed { map: None, message } => message.clone(),
        }
    }
}

fn fit_viewport(viewport: RwSignal<Viewport>, map_w: f64, map_h: f64) {
    let (canvas_w, canvas_h) = canvas_dimensions();
    viewport.update(|vp| vp.fit_map(map_w, map_h, canvas_w, canvas_h));
}

/// Fetch the map's bundle, then its overlay image. Results for a map the user
/// has already moved away from are dropped.
fn load_map(
    cache: ClientMapCache,
    map: GameMap,
    selected: RwSignal<GameMap>,
    status: RwSignal<LoadStatus>,
    overlay: RwSignal<CosmeticOverlay>,
    viewport: RwSignal<Viewport>,
) {
    if !cache.is_loaded(map) {
        status.set(LoadStatus::Loading {
            map,
            joined: cache.is_loading(map),
        });
    }
    overlay.set(CosmeticOverlay::default());

    spawn_local(async move {
        let result = cache.get_bundle(map).await;
        if selected.get_untracked() != map {
            return;
        }

        let bundle = match result {
            Ok(bundle) => bundle,
            Err(e) => {
                status.set(LoadStatus::Failed {
                    map: Some(map),
                    message: e.to_string(),
                });
                return;
            }
        };

        debug!(cached = ?cache.list_loaded(), "map cache");
        let declared = bundle.nations.dimensions();
        status.set(LoadStatus::Ready {
            map,
            nations: bundle.nations.nations.len(),
            cosmetic: cache.cosmetic_image(map).url().is_some(),
        });

        let Some(url) = bundle.cosmetic.url() else {
            if let Some((w, h)) = declared {
                fit_viewport(viewport, w as f64, h as f64);
                overlay.set(CosmeticOverlay::awaiting(w as f64, h as f64));
            }
            return;
        };

        match cosmetic_image::decode_image(url).await {
            Ok(image) => {
                if selected.get_untracked() != map {
                    return;
                }
                let (w, h) = cosmetic_image::overlay_extent(
                    declared,
                    (image.natural_width(), image.natural_height()),
                );
                fit_viewport(viewport, w, h);
                overlay.set(CosmeticOverlay::ready(image, w, h));
            }
            Err(reason) => warn!(%map, url, %reason, "cosmetic map image failed to decode"),
        }
    });
}

#[component]
pub fn App() -> impl IntoView {
    // One cache per app instance; `load_map` receives a handle to it.
    let cache: StoredValue<ClientMapCache, LocalStorage> = StoredValue::new_local(MapAssetCache::new(
        HttpAssetSource,
        MapCatalog::builtin(),
    ));
    let saved: GameMap =
        gloo_storage::LocalStorage::get(SELECTED_MAP_KEY).unwrap_or(GameMap::World);
    let selected: RwSignal<GameMap> = RwSignal::new(saved);
    let available: RwSignal<Vec<GameMap>> = RwSignal::new(GameMap::ALL.to_vec());
    let status: RwSignal<LoadStatus> = RwSignal::new(LoadStatus::Idle);
    let overlay: RwSignal<CosmeticOverlay> = RwSignal::new(CosmeticOverlay::default());
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());

    provide_context(overlay);
    provide_context(viewport);

    // Narrow the picker to what the server can actually serve.
    Effect::new(move || {
        spawn_local(async move {
            match asset_source::fetch_manifest().await {
                Ok(manifest) => {
                    let playable: Vec<GameMap> = manifest.playable().collect();
                    debug!(count = playable.len(), "map manifest loaded");
                    if !playable.is_empty() {
                        available.set(playable);
                    }
                }
                Err(reason) => warn!(%reason, "map manifest unavailable"),
            }
        });
    });

    Effect::new(move || {
        let map = selected.get();
        if let Err(e) = gloo_storage::LocalStorage::set(SELECTED_MAP_KEY, map) {
            warn!(%map, error = %e, "failed to persist selected map");
        }
        let cache = cache.with_value(|cache| cache.clone());
        load_map(cache, map, selected, status, overlay, viewport);
    });

    let on_select = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        match value.parse::<GameMap>().map_err(MapAssetError::from) {
            Ok(map) => selected.set(map),
            Err(e) => status.set(LoadStatus::Failed {
                map: None,
                message: e.to_string(),
            }),
        }
    };

    view! {
        <div style="position: fixed; inset: 0; overflow: hidden; background: #0d1b2a;">
            <MapCanvas />
            <div style="position: absolute; top: 12px; left: 12px; z-index: 2; display: flex; gap: 10px; align-items: center; padding: 6px 10px; background: rgba(13,27,42,0.85); border: 1px solid #2b3a55; border-radius: 4px; font-family: sans-serif; font-size: 0.8rem; color: #e0e6f0;">
                <select on:change=on_select prop:value=move || selected.get().as_str()>
                    {move || {
                        available
                            .get()
                            .into_iter()
                            .map(|map| {
                                view! { <option value=map.as_str()>{map.label()}</option> }
                            })
                            .collect_view()
                    }}
                </select>
                <span>{move || status.get().describe()}</span>
            </div>
        </div>
    }
}
