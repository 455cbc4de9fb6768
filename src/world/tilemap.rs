//! Level geometry
//!
//! Levels are JSON files:
//!
//! ```json
//! { "tilemap": { "3;7": { "type": "grass", "variant": 1, "pos": [3, 7] } },
//!   "tile_size": 16,
//!   "offgrid": [ { "type": "decor", "variant": 0, "pos": [52.0, 97.5] } ] }
//! ```
//!
//! Grid tiles are addressed in tiles, off-grid tiles in pixels. The grid key
//! is derived from each tile's `pos`; the string keys only exist in the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::Terrain;
use crate::error::{GameError, GameResult};
use crate::renderer::shapes::fill_circle;
use crate::renderer::{Layer, Rgba};
use crate::sim::Rect;

/// 3x3 neighbourhood scanned for physics
const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Stone,
    Decor,
    LargeDecor,
    Spawners,
}

impl TileKind {
    /// Tiles the physics collides with
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub variant: u32,
    pub pos: [f32; 2],
}

impl Tile {
    pub fn new(kind: TileKind, variant: u32, pos: Vec2) -> Self {
        Self {
            kind,
            variant,
            pos: pos.to_array(),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::from_array(self.pos)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TilemapFile {
    tilemap: BTreeMap<String, Tile>,
    tile_size: i32,
    #[serde(default)]
    offgrid: Vec<Tile>,
}

/// Grid plus off-grid decoration for one level
#[derive(Debug, Clone, PartialEq)]
pub struct Tilemap {
    tile_size: i32,
    grid: BTreeMap<(i32, i32), Tile>,
    offgrid: Vec<Tile>,
}

impl Tilemap {
    pub fn new(tile_size: i32) -> Self {
        Self {
            tile_size,
            grid: BTreeMap::new(),
            offgrid: Vec::new(),
        }
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Place a tile on the grid (its `pos` is in tiles)
    pub fn insert(&mut self, tile: Tile) {
        let key = (tile.pos[0] as i32, tile.pos[1] as i32);
        self.grid.insert(key, tile);
    }

    /// Place a free-floating tile (its `pos` is in pixels)
    pub fn push_offgrid(&mut self, tile: Tile) {
        self.offgrid.push(tile);
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let file: TilemapFile = serde_json::from_str(text)?;
        let mut map = Tilemap::new(file.tile_size);
        for tile in file.tilemap.into_values() {
            map.insert(tile);
        }
        map.offgrid = file.offgrid;
        Ok(map)
    }

    pub fn load(path: &Path) -> GameResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
        Self::parse(&text).map_err(|source| GameError::LevelFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let file = TilemapFile {
            tilemap: self
                .grid
                .iter()
                .map(|((x, y), tile)| (format!("{x};{y}"), tile.clone()))
                .collect(),
            tile_size: self.tile_size,
            offgrid: self.offgrid.clone(),
        };
        serde_json::to_string(&file)
    }

    /// Collect every tile matching `pred`, with positions in pixels.
    /// Matches are removed from the map unless `keep` is set.
    pub fn extract(&mut self, pred: impl Fn(&Tile) -> bool, keep: bool) -> Vec<Tile> {
        let mut matches = Vec::new();

        self.offgrid.retain(|tile| {
            if pred(tile) {
                matches.push(tile.clone());
                keep
            } else {
                true
            }
        });

        let ts = self.tile_size as f32;
        self.grid.retain(|_, tile| {
            if pred(tile) {
                let mut found = tile.clone();
                found.pos = [tile.pos[0] * ts, tile.pos[1] * ts];
                matches.push(found);
                keep
            } else {
                true
            }
        });

        matches
    }

    fn grid_loc(&self, pos: Vec2) -> (i32, i32) {
        let ts = self.tile_size as f32;
        ((pos.x / ts).floor() as i32, (pos.y / ts).floor() as i32)
    }

    fn tiles_around(&self, pos: Vec2) -> impl Iterator<Item = &Tile> {
        let (x, y) = self.grid_loc(pos);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |(dx, dy)| self.grid.get(&(x + dx, y + dy)))
    }

    fn render_tile(&self, layer: &mut Layer, tile: &Tile, at: IVec2) {
        let ts = self.tile_size;
        match tile.kind {
            TileKind::Grass => {
                layer.fill_rect(Rect::new(at.x, at.y, ts, ts), Rgba::rgb(112, 84, 62));
                layer.fill_rect(Rect::new(at.x, at.y, ts, 4), Rgba::rgb(92, 168, 72));
            }
            TileKind::Stone => {
                let shade = 110 + (tile.variant % 4) as u8 * 6;
                layer.fill_rect(Rect::new(at.x, at.y, ts, ts), Rgba::rgb(shade, shade, shade + 12));
                layer.fill_rect(Rect::new(at.x, at.y, ts, 1), Rgba::rgb(160, 160, 172));
            }
            TileKind::Decor => {
                layer.fill_rect(Rect::new(at.x + 5, at.y + 10, 6, 6), Rgba::rgb(70, 140, 64));
            }
            TileKind::LargeDecor => {
                if tile.variant == 2 {
                    layer.fill_rect(Rect::new(at.x + 13, at.y + 14, 5, 22), Rgba::rgb(96, 66, 44));
                    fill_circle(
                        layer,
                        at.as_vec2() + Vec2::new(15.5, 10.5),
                        12.0,
                        Rgba::rgb(58, 128, 60),
                    );
                } else {
                    layer.fill_rect(Rect::new(at.x + 2, at.y + 6, 12, 10), Rgba::rgb(128, 128, 136));
                }
            }
            TileKind::Spawners => {}
        }
    }
}

impl Terrain for Tilemap {
    fn solid_check(&self, pos: Vec2) -> bool {
        self.grid
            .get(&self.grid_loc(pos))
            .is_some_and(|tile| tile.kind.is_solid())
    }

    fn physics_rects_around(&self, pos: Vec2) -> Vec<Rect> {
        let ts = self.tile_size;
        self.tiles_around(pos)
            .filter(|tile| tile.kind.is_solid())
            .map(|tile| Rect::new(tile.pos[0] as i32 * ts, tile.pos[1] as i32 * ts, ts, ts))
            .collect()
    }

    fn render(&self, layer: &mut Layer, offset: IVec2) {
        for tile in &self.offgrid {
            let at = tile.position().as_ivec2() - offset;
            self.render_tile(layer, tile, at);
        }

        let ts = self.tile_size;
        let x0 = offset.x.div_euclid(ts);
        let x1 = (offset.x + layer.width as i32).div_euclid(ts) + 1;
        let y0 = offset.y.div_euclid(ts);
        let y1 = (offset.y + layer.height as i32).div_euclid(ts) + 1;
        for x in x0..x1 {
            for y in y0..y1 {
                if let Some(tile) = self.grid.get(&(x, y)) {
                    let at = IVec2::new(x * ts, y * ts) - offset;
                    self.render_tile(layer, tile, at);
                }
            }
        }
    }
}

/// Every level available to the game, loaded up front
#[derive(Debug, Clone)]
pub struct LevelLibrary {
    maps: Vec<Tilemap>,
}

impl LevelLibrary {
    /// Load `0.json ..= (n-1).json` from `dir`, where n is the number of
    /// `*.json` files present. Any missing or malformed level fails.
    pub fn load_dir(dir: &Path) -> GameResult<Self> {
        let entries = fs::read_dir(dir).map_err(|e| GameError::io(dir, e))?;
        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|e| GameError::io(dir, e))?;
            if entry.path().extension().is_some_and(|ext| ext == "json") {
                count += 1;
            }
        }
        if count == 0 {
            return Err(GameError::NoLevels(dir.to_path_buf()));
        }

        let maps = (0..count)
            .map(|i| Tilemap::load(&Self::level_path(dir, i)))
            .collect::<GameResult<Vec<_>>>()?;
        log::info!("Loaded {} levels from {}", maps.len(), dir.display());
        Ok(Self { maps })
    }

    pub fn from_maps(maps: Vec<Tilemap>) -> Self {
        Self { maps }
    }

    pub fn level_path(dir: &Path, index: usize) -> PathBuf {
        dir.join(format!("{index}.json"))
    }

    pub fn count(&self) -> usize {
        self.maps.len()
    }

    /// Fresh copy of a level's geometry
    pub fn geometry(&self, index: usize) -> GameResult<Tilemap> {
        self.maps
            .get(index)
            .cloned()
            .ok_or(GameError::LevelNotFound {
                index,
                count: self.maps.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Tilemap {
        let mut map = Tilemap::new(16);
        for x in 0..5 {
            map.insert(Tile::new(TileKind::Grass, 1, Vec2::new(x as f32, 4.0)));
        }
        map.insert(Tile::new(TileKind::Decor, 0, Vec2::new(1.0, 3.0)));
        map.insert(Tile::new(TileKind::LargeDecor, 2, Vec2::new(3.0, 1.0)));
        map.insert(Tile::new(TileKind::Spawners, 0, Vec2::new(0.0, 3.0)));
        map.push_offgrid(Tile::new(TileKind::Spawners, 1, Vec2::new(40.5, 50.0)));
        map
    }

    #[test]
    fn test_parse_file_format() {
        let text = r#"{
            "tilemap": {
                "0;2": {"type": "stone", "variant": 3, "pos": [0, 2]},
                "1;2": {"type": "decor", "variant": 0, "pos": [1, 2]}
            },
            "tile_size": 16,
            "offgrid": [{"type": "large_decor", "variant": 2, "pos": [20.0, 4.5]}]
        }"#;
        let map = Tilemap::parse(text).unwrap();
        assert_eq!(map.tile_size(), 16);
        assert!(map.solid_check(Vec2::new(5.0, 40.0)));
        assert!(!map.solid_check(Vec2::new(20.0, 40.0)));
        assert_eq!(map.offgrid.len(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let map = sample();
        let back = Tilemap::parse(&map.to_json().unwrap()).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_solid_check_floors_negative() {
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::Stone, 0, Vec2::new(-1.0, -1.0)));
        assert!(map.solid_check(Vec2::new(-0.5, -0.5)));
        assert!(!map.solid_check(Vec2::new(0.5, -0.5)));
    }

    #[test]
    fn test_extract_keep_and_remove() {
        let mut map = sample();
        let trees = map.extract(|t| t.kind == TileKind::LargeDecor && t.variant == 2, true);
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].position(), Vec2::new(48.0, 16.0));
        assert_eq!(map.extract(|t| t.kind == TileKind::LargeDecor, true).len(), 1);

        let spawners = map.extract(|t| t.kind == TileKind::Spawners, false);
        assert_eq!(spawners.len(), 2);
        // Off-grid positions are already pixels
        assert!(spawners.iter().any(|s| s.position() == Vec2::new(40.5, 50.0)));
        assert!(spawners.iter().any(|s| s.position() == Vec2::new(0.0, 48.0)));
        assert!(map.extract(|t| t.kind == TileKind::Spawners, false).is_empty());
    }

    #[test]
    fn test_physics_rects_only_solid_neighbours() {
        let map = sample();
        let rects = map.physics_rects_around(Vec2::new(24.0, 56.0));
        // Row 4 under x tiles 0..=2
        assert_eq!(rects.len(), 3);
        assert!(rects.contains(&Rect::new(0, 64, 16, 16)));
        assert!(map.physics_rects_around(Vec2::new(500.0, 500.0)).is_empty());
    }

    #[test]
    fn test_render_draws_visible_tiles() {
        let map = sample();
        let mut layer = Layer::new(320, 240);
        map.render(&mut layer, IVec2::ZERO);
        assert_ne!(layer.pixel(8, 70), Rgba::TRANSPARENT);

        let mut shifted = Layer::new(320, 240);
        map.render(&mut shifted, IVec2::new(1000, 0));
        assert_eq!(shifted.count_opaque(0), 0);
    }

    #[test]
    fn test_library_loads_numbered_files() {
        let dir = TempDir::new().unwrap();
        let map = sample();
        for i in 0..2 {
            fs::write(LevelLibrary::level_path(dir.path(), i), map.to_json().unwrap()).unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let library = LevelLibrary::load_dir(dir.path()).unwrap();
        assert_eq!(library.count(), 2);
        assert_eq!(library.geometry(1).unwrap(), map);
        assert!(matches!(
            library.geometry(2),
            Err(GameError::LevelNotFound { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_library_rejects_gaps_and_empty_dirs() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            LevelLibrary::load_dir(dir.path()),
            Err(GameError::NoLevels(_))
        ));

        fs::write(dir.path().join("0.json"), sample().to_json().unwrap()).unwrap();
        fs::write(dir.path().join("5.json"), sample().to_json().unwrap()).unwrap();
        assert!(matches!(
            LevelLibrary::load_dir(dir.path()),
            Err(GameError::Io { .. })
        ));
    }

    #[test]
    fn test_library_reports_malformed_level() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("0.json"), "{\"tilemap\": 3}").unwrap();
        let err = LevelLibrary::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, GameError::LevelFormat { .. }));
    }

    #[test]
    fn test_bundled_levels_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/maps");
        let library = LevelLibrary::load_dir(&dir).unwrap();
        assert_eq!(library.count(), 3);
        for i in 0..library.count() {
            let mut map = library.geometry(i).unwrap();
            let players = map.extract(|t| t.kind == TileKind::Spawners && t.variant == 0, true);
            assert_eq!(players.len(), 1, "level {i}");
        }
    }
}
