//! Tile style catalog and the walkers tile source backing it.
//!
//! Each style is an HTTP tile-URL template addressed by `{z}`/`{x}`/`{y}`
//! placeholders (the satellite style orders them `{z}/{y}/{x}`). Switching
//! styles re-points the tile source; position and zoom live in the map
//! memory and are unaffected.

use walkers::sources::{Attribution, TileSource};
use walkers::TileId;

/// A named source of map imagery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileStyle {
    /// Stable identifier used for persistence and button wiring.
    pub key: &'static str,
    /// Human-readable name shown on the style button.
    pub name: &'static str,
    /// Tile URL template with `{z}`, `{x}`, `{y}` placeholders.
    pub url: &'static str,
    /// Whether the imagery is dark; the UI matches its visuals to this.
    pub dark: bool,
}

/// The fixed set of available tile styles.
pub const TILE_STYLES: &[TileStyle] = &[
    TileStyle {
        key: "map",
        name: "Map",
        url: "https://a.tile.openstreetmap.org/{z}/{x}/{y}.png",
        dark: false,
    },
    TileStyle {
        key: "terrain",
        name: "Terrain",
        url: "https://a.tile.opentopomap.org/{z}/{x}/{y}.png",
        dark: false,
    },
    TileStyle {
        key: "paint",
        name: "Paint",
        url: "https://a.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
        dark: false,
    },
    TileStyle {
        key: "dark",
        name: "Dark",
        url: "https://a.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
        dark: true,
    },
    TileStyle {
        // ArcGIS addresses tiles row-first, hence {z}/{y}/{x}.
        key: "satellite",
        name: "Satellite",
        url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
        dark: false,
    },
    TileStyle {
        key: "topo",
        name: "Topo",
        url: "https://tile.opentopomap.org/{z}/{x}/{y}.png",
        dark: false,
    },
];

/// Looks up a style by key, falling back to the first (default) style.
pub fn style_by_key(key: &str) -> &'static TileStyle {
    TILE_STYLES
        .iter()
        .find(|s| s.key == key)
        .unwrap_or(&TILE_STYLES[0])
}

/// Walkers tile source over a [`TileStyle`] URL template.
#[derive(Debug, Clone, Copy)]
pub struct StyleTileSource {
    style: &'static TileStyle,
}

impl StyleTileSource {
    /// Creates a source serving tiles for the given style.
    pub fn new(style: &'static TileStyle) -> Self {
        Self { style }
    }
}

impl TileSource for StyleTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.style
            .url
            .replace("{z}", &tile_id.zoom.to_string())
            .replace("{x}", &tile_id.x.to_string())
            .replace("{y}", &tile_id.y.to_string())
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: self.style.name,
            url: "",
            logo_light: None,
            logo_dark: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(zoom: u8, x: u32, y: u32) -> TileId {
        TileId { x, y, zoom }
    }

    #[test]
    fn url_substitution_zxy() {
        let source = StyleTileSource::new(style_by_key("map"));
        assert_eq!(
            source.tile_url(tile(11, 1309, 842)),
            "https://a.tile.openstreetmap.org/11/1309/842.png"
        );
    }

    #[test]
    fn satellite_uses_zyx_order() {
        let source = StyleTileSource::new(style_by_key("satellite"));
        let url = source.tile_url(tile(5, 3, 7));
        assert!(url.ends_with("/5/7/3"), "got {url}");
    }

    #[test]
    fn unknown_key_falls_back_to_default() {
        assert_eq!(style_by_key("no-such-style").key, "map");
    }

    #[test]
    fn only_dark_style_is_flagged_dark() {
        let dark: Vec<_> = TILE_STYLES.iter().filter(|s| s.dark).collect();
        assert_eq!(dark.len(), 1);
        assert_eq!(dark[0].key, "dark");
    }
}
