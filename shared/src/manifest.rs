use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::maps::{AssetKind, GameMap};

/// Hex CRC32 of an asset body. Cheap enough to compute on every manifest build.
pub fn asset_checksum(data: &[u8]) -> String {
    format!("{:08x}", crc32fast::hash(data))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub url: String,
    pub bytes: u64,
    pub crc32: String,
}

impl AssetEntry {
    pub fn describe(url: impl Into<String>, data: &[u8]) -> Self {
        Self {
            url: url.into(),
            bytes: data.len() as u64,
            crc32: asset_checksum(data),
        }
    }
}

/// What the server can currently serve for one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapManifestEntry {
    pub map: GameMap,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<AssetEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mini_map: Option<AssetEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nations: Option<AssetEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosmetic: Option<AssetEntry>,
}

impl MapManifestEntry {
    pub fn new(map: GameMap, name: impl Into<String>) -> Self {
        Self {
            map,
            name: name.into(),
            terrain: None,
            mini_map: None,
            nations: None,
            cosmetic: None,
        }
    }

    pub fn set(&mut self, kind: AssetKind, entry: Option<AssetEntry>) {
        match kind {
            AssetKind::Terrain => self.terrain = entry,
            AssetKind::MiniMap => self.mini_map = entry,
            AssetKind::Nations => self.nations = entry,
            AssetKind::Cosmetic => self.cosmetic = entry,
        }
    }

    /// All required assets are present; the cosmetic image never matters here.
    pub fn is_playable(&self) -> bool {
        self.terrain.is_some() && self.mini_map.is_some() && self.nations.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapManifest {
    pub generated_at: DateTime<Utc>,
    pub maps: Vec<MapManifestEntry>,
}

impl MapManifest {
    pub fn playable(&self) -> impl Iterator<Item = GameMap> + '_ {
        self.maps
            .iter()
            .filter(|entry| entry.is_playable())
            .map(|entry| entry.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_stable_hex() {
        assert_eq!(asset_checksum(b""), "00000000");
        assert_eq!(asset_checksum(b"123456789"), "cbf43926");
    }

    #[test]
    fn describe_records_size_and_checksum() {
        let entry = AssetEntry::describe("/resources/maps/Mars.bin", b"123456789");
        assert_eq!(entry.bytes, 9);
        assert_eq!(entry.crc32, "cbf43926");
        assert_eq!(entry.url, "/resources/maps/Mars.bin");
    }

    #[test]
    fn playable_ignores_cosmetic() {
        let mut entry = MapManifestEntry::new(GameMap::Mars, "Mars");
        assert!(!entry.is_playable());

        let asset = AssetEntry::describe("/x", b"x");
        entry.set(AssetKind::Terrain, Some(asset.clone()));
        entry.set(AssetKind::MiniMap, Some(asset.clone()));
        assert!(!entry.is_playable());
        entry.set(AssetKind::Nations, Some(asset));
        assert!(entry.is_playable());
        assert!(entry.cosmetic.is_none());
    }

    #[test]
    fn manifest_omits_missing_assets_in_json() {
        let manifest = MapManifest {
            generated_at: DateTime::parse_from_rfc3339("2026-10-19T00:00:00Z")
                .expect("timestamp")
                .with_timezone(&Utc),
            maps: vec![MapManifestEntry::new(GameMap::Iceland, "Iceland")],
        };
        let json = serde_json::to_value(&manifest).expect("serialize");
        let entry = &json["maps"][0];
        assert_eq!(entry["map"], "Iceland");
        assert!(entry.get("terrain").is_none());
        assert!(entry.get("cosmetic").is_none());
        assert_eq!(manifest.playable().count(), 0);
    }
}
