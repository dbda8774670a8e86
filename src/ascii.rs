//! ASCII rendering of generated terrain
//!
//! Two views: a vertical slice through the world at a fixed X, and a top-down height
//! map. Both downsample so the output fits a terminal.

use crate::chunk::{BlockIds, AIR};
use crate::tilemap::Tilemap;
use crate::world::TerrainWorld;

/// Get ASCII character for a terrain height relative to sea level
pub fn height_char(height: u16, sea_level: usize, map_height: usize) -> char {
    // Below sea level: water depth; above: land elevation
    const WATER: &[char] = &['~', '~', '-', '.'];
    const LAND: &[char] = &[',', ':', ';', '=', '+', '*', '#', '%', '^', 'A', 'M'];
    let height = height as f32;
    let sea = sea_level as f32;
    if height < sea - 1.0 {
        let depth = ((sea - height) / sea.max(1.0)).clamp(0.0, 1.0);
        let idx = ((1.0 - depth) * (WATER.len() - 1) as f32) as usize;
        WATER[idx.min(WATER.len() - 1)]
    } else {
        let span = (map_height as f32 - sea).max(1.0);
        let normalized = ((height - sea) / span).clamp(0.0, 1.0);
        let idx = (normalized * (LAND.len() - 1) as f32) as usize;
        LAND[idx.min(LAND.len() - 1)]
    }
}

/// Character for one block of a vertical slice
pub fn block_char(block: u16, fluid: u16, ids: &BlockIds) -> char {
    if block == ids.mantle {
        '='
    } else if block == ids.lake_ice {
        '_'
    } else if block != AIR {
        '#'
    } else if fluid == ids.salt_water {
        '~'
    } else if fluid != AIR {
        '-'
    } else {
        ' '
    }
}

/// Render the vertical slice at `world_x` through every generated column, top row
/// first. `y_step` and `z_step` merge blocks; a cell shows the most solid block in it.
pub fn render_slice(world: &TerrainWorld, world_x: i64, y_step: usize, z_step: usize) -> String {
    let Some((_, min_z, _, max_z)) = world.block_bounds() else {
        return String::new();
    };
    let config = world.generator().config();
    let ids = world.generator().block_ids();
    let cs = config.chunk_size as i64;
    let map_height = config.map_height;
    let y_step = y_step.max(1);
    let z_step = z_step.max(1) as i64;

    let chunk_x = world_x.div_euclid(cs) as i32;
    let lx = world_x.rem_euclid(cs) as usize;
    let rows = map_height.div_ceil(y_step);
    let mut result = String::new();

    for row in (0..rows).rev() {
        let mut z = min_z;
        while z < max_z {
            let mut ch = ' ';
            for dz in 0..z_step {
                let wz = z + dz;
                if wz >= max_z {
                    break;
                }
                let Some(column) = world.get(chunk_x, wz.div_euclid(cs) as i32) else {
                    continue;
                };
                let lz = wz.rem_euclid(cs) as usize;
                for y in row * y_step..((row + 1) * y_step).min(map_height) {
                    let c = block_char(column.block(lx, y, lz), column.fluid(lx, y, lz), ids);
                    if slice_rank(c) > slice_rank(ch) {
                        ch = c;
                    }
                }
            }
            result.push(ch);
            z += z_step;
        }
        result.push('\n');
    }
    result
}

fn slice_rank(c: char) -> u8 {
    match c {
        '=' => 5,
        '#' => 4,
        '_' => 3,
        '~' => 2,
        '-' => 1,
        _ => 0,
    }
}

/// Render a height map, one character per `step` x `step` block area (maximum height)
pub fn render_height_map(heights: &Tilemap<u16>, sea_level: usize, map_height: usize, step: usize) -> String {
    let step = step.max(1);
    let width = heights.width.div_ceil(step);
    let height = heights.height.div_ceil(step);
    let mut result = String::with_capacity((width + 1) * height);

    for row in 0..height {
        for col in 0..width {
            let mut max = 0;
            for z in row * step..((row + 1) * step).min(heights.height) {
                for x in col * step..((col + 1) * step).min(heights.width) {
                    max = max.max(*heights.get(x, z));
                }
            }
            result.push(height_char(max, sea_level, map_height));
        }
        result.push('\n');
    }
    result
}

/// Generate legend for the height map characters
pub fn height_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== HEIGHT LEGEND ===\n");
    legend.push_str("  ~ deep water   - . shallow water\n");
    legend.push_str("  , : ; shore    = + * lowland\n");
    legend.push_str("  # % hills      ^ A M mountains\n");
    legend
}

/// Generate legend for the slice characters
pub fn slice_legend() -> String {
    "  = mantle   # rock   _ lake ice   - water   ~ salt water\n".to_string()
}
