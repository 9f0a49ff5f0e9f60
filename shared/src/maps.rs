use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// URL prefix for terrain binaries and nation documents.
pub const RESOURCE_BASE: &str = "/resources/maps";
/// URL prefix for optional overlay images.
pub const COSMETIC_BASE: &str = "/maps";

/// One playable map. Used as the sole key of the client asset cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameMap {
    World,
    Europe,
    Mena,
    NorthAmerica,
    Oceania,
    BlackSea,
    Africa,
    Pangaea,
    Asia,
    Mars,
    SouthAmerica,
    Britannia,
    GatewayToTheAtlantic,
    Australia,
    Iceland,
    Japan,
    BetweenTwoSeas,
    KnownWorld,
    FaroeIslands,
    India,
}

impl GameMap {
    pub const ALL: [GameMap; 20] = [
        GameMap::World,
        GameMap::Europe,
        GameMap::Mena,
        GameMap::NorthAmerica,
        GameMap::Oceania,
        GameMap::BlackSea,
        GameMap::Africa,
        GameMap::Pangaea,
        GameMap::Asia,
        GameMap::Mars,
        GameMap::SouthAmerica,
        GameMap::Britannia,
        GameMap::GatewayToTheAtlantic,
        GameMap::Australia,
        GameMap::Iceland,
        GameMap::Japan,
        GameMap::BetweenTwoSeas,
        GameMap::KnownWorld,
        GameMap::FaroeIslands,
        GameMap::India,
    ];

    /// Variant name, stable across serialization and the `FromStr` impl.
    pub const fn as_str(self) -> &'static str {
        match self {
            GameMap::World => "World",
            GameMap::Europe => "Europe",
            GameMap::Mena => "Mena",
            GameMap::NorthAmerica => "NorthAmerica",
            GameMap::Oceania => "Oceania",
            GameMap::BlackSea => "BlackSea",
            GameMap::Africa => "Africa",
            GameMap::Pangaea => "Pangaea",
            GameMap::Asia => "Asia",
            GameMap::Mars => "Mars",
            GameMap::SouthAmerica => "SouthAmerica",
            GameMap::Britannia => "Britannia",
            GameMap::GatewayToTheAtlantic => "GatewayToTheAtlantic",
            GameMap::Australia => "Australia",
            GameMap::Iceland => "Iceland",
            GameMap::Japan => "Japan",
            GameMap::BetweenTwoSeas => "BetweenTwoSeas",
            GameMap::KnownWorld => "KnownWorld",
            GameMap::FaroeIslands => "FaroeIslands",
            GameMap::India => "India",
        }
    }

    /// Human-readable label for map pickers.
    pub const fn label(self) -> &'static str {
        match self {
            GameMap::World => "World",
            GameMap::Europe => "Europe",
            GameMap::Mena => "MENA",
            GameMap::NorthAmerica => "North America",
            GameMap::Oceania => "Oceania",
            GameMap::BlackSea => "Black Sea",
            GameMap::Africa => "Africa",
            GameMap::Pangaea => "Pangaea",
            GameMap::Asia => "Asia",
            GameMap::Mars => "Mars",
            GameMap::SouthAmerica => "South America",
            GameMap::Britannia => "Britannia",
            GameMap::GatewayToTheAtlantic => "Gateway to the Atlantic",
            GameMap::Australia => "Australia",
            GameMap::Iceland => "Iceland",
            GameMap::Japan => "Japan",
            GameMap::BetweenTwoSeas => "Between Two Seas",
            GameMap::KnownWorld => "Known World",
            GameMap::FaroeIslands => "Faroe Islands",
            GameMap::India => "India",
        }
    }
}

impl fmt::Display for GameMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown map identifier: {0:?}")]
pub struct UnknownMap(pub String);

impl FromStr for GameMap {
    type Err = UnknownMap;

    /// Accepts the variant name or the file name token, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        GameMap::ALL
            .into_iter()
            .find(|map| map.as_str().eq_ignore_ascii_case(needle))
            .or_else(|| {
                MAP_FILE_NAMES
                    .iter()
                    .find(|(_, name)| name.eq_ignore_ascii_case(needle))
                    .map(|&(map, _)| map)
            })
            .ok_or_else(|| UnknownMap(s.to_string()))
    }
}

/// File name token per map. Asset locations are derived from these.
const MAP_FILE_NAMES: &[(GameMap, &str)] = &[
    (GameMap::World, "WorldMap"),
    (GameMap::Europe, "Europe"),
    (GameMap::Mena, "Mena"),
    (GameMap::NorthAmerica, "NorthAmerica"),
    (GameMap::Oceania, "Oceania"),
    (GameMap::BlackSea, "BlackSea"),
    (GameMap::Africa, "Africa"),
    (GameMap::Pangaea, "Pangaea"),
    (GameMap::Asia, "Asia"),
    (GameMap::Mars, "Mars"),
    (GameMap::SouthAmerica, "SouthAmerica"),
    (GameMap::Britannia, "Britannia"),
    (GameMap::GatewayToTheAtlantic, "GatewayToTheAtlantic"),
    (GameMap::Australia, "Australia"),
    (GameMap::Iceland, "Iceland"),
    (GameMap::Japan, "Japan"),
    (GameMap::BetweenTwoSeas, "BetweenTwoSeas"),
    (GameMap::KnownWorld, "KnownWorld"),
    (GameMap::FaroeIslands, "FaroeIslands"),
    (GameMap::India, "India"),
];

/// The four assets published per map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Terrain,
    MiniMap,
    Nations,
    Cosmetic,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Terrain,
        AssetKind::MiniMap,
        AssetKind::Nations,
        AssetKind::Cosmetic,
    ];

    pub fn file_name(self, token: &str) -> String {
        match self {
            AssetKind::Terrain => format!("{token}.bin"),
            AssetKind::MiniMap => format!("{token}Mini.bin"),
            AssetKind::Nations => format!("{token}.json"),
            AssetKind::Cosmetic => format!("{token}_T.png"),
        }
    }

    /// Cosmetic images are optional and live under a separate base path.
    pub const fn is_required(self) -> bool {
        !matches!(self, AssetKind::Cosmetic)
    }
}

/// Resolved URLs for one map's assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFiles {
    pub name: String,
    pub terrain: String,
    pub mini_map: String,
    pub nations: String,
    pub cosmetic: String,
}

/// Map identifier to file name token. Asset URLs derive from the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapCatalog {
    names: Vec<(GameMap, String)>,
}

impl Default for MapCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MapCatalog {
    pub fn builtin() -> Self {
        Self::with_names(
            MAP_FILE_NAMES
                .iter()
                .map(|&(map, name)| (map, name.to_string())),
        )
    }

    /// Catalog with an explicit, possibly partial, name mapping.
    pub fn with_names(names: impl IntoIterator<Item = (GameMap, String)>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn file_name(&self, map: GameMap) -> Option<&str> {
        self.names
            .iter()
            .find(|(candidate, _)| *candidate == map)
            .map(|(_, name)| name.as_str())
    }

    pub fn maps(&self) -> impl Iterator<Item = GameMap> + '_ {
        self.names.iter().map(|(map, _)| *map)
    }

    pub fn url(&self, map: GameMap, kind: AssetKind) -> Option<String> {
        let name = self.file_name(map)?;
        let base = if kind.is_required() {
            RESOURCE_BASE
        } else {
            COSMETIC_BASE
        };
        Some(format!("{base}/{}", kind.file_name(name)))
    }

    pub fn files(&self, map: GameMap) -> Option<MapFiles> {
        let name = self.file_name(map)?;
        Some(MapFiles {
            name: name.to_string(),
            terrain: self.url(map, AssetKind::Terrain)?,
            mini_map: self.url(map, AssetKind::MiniMap)?,
            nations: self.url(map, AssetKind::Nations)?,
            cosmetic: self.url(map, AssetKind::Cosmetic)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_maps_every_identifier() {
        let catalog = MapCatalog::builtin();
        for map in GameMap::ALL {
            assert!(catalog.file_name(map).is_some(), "missing name for {map}");
        }
        assert_eq!(catalog.maps().count(), GameMap::ALL.len());
    }

    #[test]
    fn world_uses_worldmap_token() {
        let files = MapCatalog::builtin()
            .files(GameMap::World)
            .expect("world files");
        assert_eq!(files.name, "WorldMap");
        assert_eq!(files.terrain, "/resources/maps/WorldMap.bin");
        assert_eq!(files.mini_map, "/resources/maps/WorldMapMini.bin");
        assert_eq!(files.nations, "/resources/maps/WorldMap.json");
        assert_eq!(files.cosmetic, "/maps/WorldMap_T.png");
    }

    #[test]
    fn cosmetic_image_lives_under_its_own_base() {
        let catalog = MapCatalog::builtin();
        assert_eq!(
            catalog.url(GameMap::Japan, AssetKind::Terrain).as_deref(),
            Some("/resources/maps/Japan.bin")
        );
        assert_eq!(
            catalog.url(GameMap::Japan, AssetKind::Cosmetic).as_deref(),
            Some("/maps/Japan_T.png")
        );
    }

    #[test]
    fn partial_catalog_reports_missing_maps() {
        let catalog = MapCatalog::with_names([(GameMap::Mars, "Mars".to_string())]);
        assert!(catalog.files(GameMap::Mars).is_some());
        assert_eq!(catalog.files(GameMap::Europe), None);
        assert_eq!(catalog.url(GameMap::Europe, AssetKind::Nations), None);
    }

    #[test]
    fn parse_accepts_variant_and_file_token() {
        assert_eq!("World".parse::<GameMap>(), Ok(GameMap::World));
        assert_eq!("worldmap".parse::<GameMap>(), Ok(GameMap::World));
        assert_eq!(" blacksea ".parse::<GameMap>(), Ok(GameMap::BlackSea));
        assert_eq!(
            "Atlantis".parse::<GameMap>(),
            Err(UnknownMap("Atlantis".to_string()))
        );
    }

    #[test]
    fn serde_uses_variant_name() {
        let json = serde_json::to_string(&GameMap::FaroeIslands).expect("serialize");
        assert_eq!(json, "\"FaroeIslands\"");
        let back: GameMap = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, GameMap::FaroeIslands);
    }

    #[test]
    fn asset_kind_suffixes() {
        assert_eq!(AssetKind::Terrain.file_name("Asia"), "Asia.bin");
        assert_eq!(AssetKind::MiniMap.file_name("Asia"), "AsiaMini.bin");
        assert_eq!(AssetKind::Nations.file_name("Asia"), "Asia.json");
        assert_eq!(AssetKind::Cosmetic.file_name("Asia"), "Asia_T.png");
        assert!(!AssetKind::Cosmetic.is_required());
    }
}
