use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_MAP_RESOURCES_DIR: &str = "resources/maps";
pub const DEFAULT_COSMETIC_MAPS_DIR: &str = "static/maps";
pub const DEFAULT_CLIENT_DIST_DIR: &str = "client/dist";

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

/// Terrain binaries and nation documents.
pub fn map_resources_dir() -> PathBuf {
    dir_from_env("MAP_RESOURCES_DIR", DEFAULT_MAP_RESOURCES_DIR)
}

/// Optional `<name>_T.png` overlay images.
pub fn cosmetic_maps_dir() -> PathBuf {
    dir_from_env("COSMETIC_MAPS_DIR", DEFAULT_COSMETIC_MAPS_DIR)
}

pub fn client_dist_dir() -> PathBuf {
    dir_from_env("CLIENT_DIST_DIR", DEFAULT_CLIENT_DIST_DIR)
}

fn dir_from_env(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
