//! Chunk column storage and block ids
//!
//! A chunk column is the full vertical stack of chunks at one horizontal chunk
//! coordinate. Blocks and fluids live in separate layers so water can share a cell
//! with nothing else while ice sits in the solid layer.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TerrainError};

pub type BlockId = u16;

pub const AIR: BlockId = 0;

/// Map from symbolic block codes to numeric ids
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    ids: HashMap<String, BlockId>,
    next_id: BlockId,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        let mut registry = Self {
            ids: HashMap::new(),
            next_id: 1,
        };
        for code in ["mantle", "rock", "water", "saltwater", "lakeice"] {
            registry.register(code);
        }
        registry
    }
}

impl BlockRegistry {
    pub fn empty() -> Self {
        Self {
            ids: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a code, returning its id (the existing one if already known)
    pub fn register(&mut self, code: &str) -> BlockId {
        if let Some(&id) = self.ids.get(code) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(code.to_string(), id);
        id
    }

    pub fn resolve(&self, code: &str) -> Result<BlockId> {
        self.ids
            .get(code)
            .copied()
            .ok_or_else(|| TerrainError::UnknownBlockCode(code.to_string()))
    }

    pub fn code_of(&self, id: BlockId) -> Option<&str> {
        self.ids.iter().find(|(_, &v)| v == id).map(|(k, _)| k.as_str())
    }
}

/// Block ids the terrain pass writes, resolved once at init
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockIds {
    pub mantle: BlockId,
    pub rock: BlockId,
    pub water: BlockId,
    pub salt_water: BlockId,
    pub lake_ice: BlockId,
}

impl BlockIds {
    pub fn resolve(registry: &BlockRegistry) -> Result<Self> {
        Ok(Self {
            mantle: registry.resolve("mantle")?,
            rock: registry.resolve("rock")?,
            water: registry.resolve("water")?,
            salt_water: registry.resolve("saltwater")?,
            lake_ice: registry.resolve("lakeice")?,
        })
    }
}

/// The eight horizontal neighbours of a chunk column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinal {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Cardinal {
    pub const ALL: [Cardinal; 8] = [
        Cardinal::North,
        Cardinal::NorthEast,
        Cardinal::East,
        Cardinal::SouthEast,
        Cardinal::South,
        Cardinal::SouthWest,
        Cardinal::West,
        Cardinal::NorthWest,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Chunk offset `(dx, dz)`; north is -z
    pub fn offset(self) -> (i32, i32) {
        match self {
            Cardinal::North => (0, -1),
            Cardinal::NorthEast => (1, -1),
            Cardinal::East => (1, 0),
            Cardinal::SouthEast => (1, 1),
            Cardinal::South => (0, 1),
            Cardinal::SouthWest => (-1, 1),
            Cardinal::West => (-1, 0),
            Cardinal::NorthWest => (-1, -1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        let (dx, dz) = self.offset();
        dx != 0 && dz != 0
    }

    /// The two straight neighbours sharing an edge with a diagonal one
    pub fn adjacent_straights(self) -> Option<[Cardinal; 2]> {
        match self {
            Cardinal::NorthEast => Some([Cardinal::North, Cardinal::East]),
            Cardinal::SouthEast => Some([Cardinal::South, Cardinal::East]),
            Cardinal::SouthWest => Some([Cardinal::South, Cardinal::West]),
            Cardinal::NorthWest => Some([Cardinal::North, Cardinal::West]),
            _ => None,
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Cardinal::North => "N",
            Cardinal::NorthEast => "NE",
            Cardinal::East => "E",
            Cardinal::SouthEast => "SE",
            Cardinal::South => "S",
            Cardinal::SouthWest => "SW",
            Cardinal::West => "W",
            Cardinal::NorthWest => "NW",
        };
        write!(f, "{}", name)
    }
}

/// Terrain height maps of already generated neighbours, `None` where not generated yet
#[derive(Clone, Debug, Default)]
pub struct NeighborHeightMaps {
    maps: [Option<Vec<u16>>; 8],
}

impl NeighborHeightMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, direction: Cardinal, height_map: Vec<u16>) {
        self.maps[direction.index()] = Some(height_map);
    }

    pub fn get(&self, direction: Cardinal) -> Option<&[u16]> {
        self.maps[direction.index()].as_deref()
    }

    /// Border smoothing is needed as soon as any neighbour exists
    pub fn requires_border_smoothing(&self) -> bool {
        self.maps.iter().any(|m| m.is_some())
    }
}

/// Block and fluid storage plus height maps of one chunk column.
/// Index layout is `(y * chunk_size + z) * chunk_size + x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkColumn {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub chunk_size: usize,
    pub map_height: usize,
    blocks: Vec<BlockId>,
    fluids: Vec<BlockId>,
    /// Highest solid Y per horizontal cell
    pub terrain_height_map: Vec<u16>,
    /// Highest Y rain stops at per horizontal cell (solid or water surface)
    pub rain_height_map: Vec<u16>,
    /// Maximum of `rain_height_map`
    pub y_max: u16,
}

impl ChunkColumn {
    pub fn new(chunk_x: i32, chunk_z: i32, chunk_size: usize, map_height: usize) -> Self {
        let volume = chunk_size * chunk_size * map_height;
        Self {
            chunk_x,
            chunk_z,
            chunk_size,
            map_height,
            blocks: vec![AIR; volume],
            fluids: vec![AIR; volume],
            terrain_height_map: vec![0; chunk_size * chunk_size],
            rain_height_map: vec![0; chunk_size * chunk_size],
            y_max: 0,
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.chunk_size + z) * self.chunk_size + x
    }

    #[inline]
    pub fn column_index(&self, x: usize, z: usize) -> usize {
        z * self.chunk_size + x
    }

    #[inline]
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[self.index(x, y, z)]
    }

    #[inline]
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        let idx = self.index(x, y, z);
        self.blocks[idx] = id;
    }

    #[inline]
    pub fn fluid(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.fluids[self.index(x, y, z)]
    }

    #[inline]
    pub fn set_fluid(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        let idx = self.index(x, y, z);
        self.fluids[idx] = id;
    }

    /// Neither a block nor a fluid
    #[inline]
    pub fn is_air(&self, x: usize, y: usize, z: usize) -> bool {
        let idx = self.index(x, y, z);
        self.blocks[idx] == AIR && self.fluids[idx] == AIR
    }

    /// Set a whole horizontal layer of the block layer at once
    pub fn fill_layer(&mut self, y: usize, id: BlockId) {
        let layer = self.chunk_size * self.chunk_size;
        let start = y * layer;
        self.blocks[start..start + layer].fill(id);
    }

    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    pub fn fluids(&self) -> &[BlockId] {
        &self.fluids
    }

    pub fn count_blocks(&self, id: BlockId) -> usize {
        self.blocks.iter().filter(|&&b| b == id).count()
    }

    pub fn count_fluids(&self, id: BlockId) -> usize {
        self.fluids.iter().filter(|&&b| b == id).count()
    }

    pub fn terrain_height(&self, x: usize, z: usize) -> u16 {
        self.terrain_height_map[self.column_index(x, z)]
    }

    /// Recompute `terrain_height_map` from the block layer after edits
    pub fn recompute_terrain_heights(&mut self) {
        for z in 0..self.chunk_size {
            for x in 0..self.chunk_size {
                let top = (0..self.map_height)
                    .rev()
                    .find(|&y| self.block(x, y, z) != AIR)
                    .unwrap_or(0);
                let idx = self.column_index(x, z);
                self.terrain_height_map[idx] = top as u16;
            }
        }
    }
}
