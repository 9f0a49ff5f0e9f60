use serde::{Deserialize, Serialize};

/// Nation/territory metadata published next to each map's terrain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NationMap {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub nations: Vec<Nation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nation {
    /// Spawn position in map tiles, `[x, y]`.
    pub coordinates: [i32; 2],
    #[serde(default)]
    pub flag: String,
    pub name: String,
    #[serde(default)]
    pub strength: f64,
}

impl NationMap {
    /// Map size when the document carries both dimensions.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }
}
