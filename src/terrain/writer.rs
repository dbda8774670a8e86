//! Turn column solidity into blocks
//!
//! Horizontal layers every column agreed on are written in one fill each: mantle at
//! Y 0, then rock up to `y_base`. Layers every column agreed are empty above `y_top`
//! are skipped entirely. Only the band in between is written column by column.

use crate::chunk::{BlockIds, ChunkColumn};
use crate::region::surface_temperature;

use super::column::{ColumnResult, LayerFlags};

/// Layer bounds and counts of one write pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// First layer written column by column
    pub y_base: usize,
    /// One past the last layer written column by column
    pub y_top: usize,
    pub y_max: u16,
    pub water_blocks: usize,
    pub ice_blocks: usize,
}

/// Write `results` (one per horizontal cell, `z * chunk_size + x`) into `column`.
/// With `bulk_layers` false every layer is written column by column, which must give
/// the same blocks.
pub fn write_chunk_column(
    column: &mut ChunkColumn,
    results: &[ColumnResult],
    flags: &LayerFlags,
    block_ids: &BlockIds,
    sea_level: usize,
    freezing_temperature: f32,
    bulk_layers: bool,
) -> WriteSummary {
    let map_height = column.map_height;
    let cs = column.chunk_size;

    column.fill_layer(0, block_ids.mantle);

    let mut y_base = 1;
    let mut y_top = map_height;
    if bulk_layers {
        while y_base < map_height && flags.is_fully_solid(y_base) {
            column.fill_layer(y_base, block_ids.rock);
            y_base += 1;
        }
        while y_top > y_base && flags.is_fully_empty(y_top - 1) {
            y_top -= 1;
        }
        // Water still has to be placed up to sea level
        y_top = y_top.max(sea_level).max(y_base).min(map_height);
    }

    let mut summary = WriteSummary {
        y_base,
        y_top,
        ..Default::default()
    };

    for lz in 0..cs {
        for lx in 0..cs {
            let result = &results[lz * cs + lx];
            let mut terrain_height = y_base - 1;
            let mut water_surface = false;

            for y in y_base..y_top {
                if result.solid[y] {
                    column.set_block(lx, y, lz, block_ids.rock);
                    terrain_height = y;
                } else if y < sea_level {
                    if y + 1 == sea_level {
                        water_surface = true;
                        let temperature = surface_temperature(result.climate, 0) + result.temperature_offset;
                        if temperature < freezing_temperature {
                            column.set_block(lx, y, lz, block_ids.lake_ice);
                            summary.ice_blocks += 1;
                            continue;
                        }
                    }
                    column.set_fluid(lx, y, lz, result.water_block);
                    summary.water_blocks += 1;
                }
            }

            let rain_height = if water_surface {
                terrain_height.max(sea_level - 1)
            } else {
                terrain_height
            };
            let idx = column.column_index(lx, lz);
            column.terrain_height_map[idx] = terrain_height as u16;
            column.rain_height_map[idx] = rain_height as u16;
            summary.y_max = summary.y_max.max(rain_height as u16);
        }
    }

    column.y_max = summary.y_max;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{BlockRegistry, AIR};
    use crate::region::pack_climate;

    fn ids() -> BlockIds {
        BlockIds::resolve(&BlockRegistry::default()).unwrap()
    }

    /// Heights per cell, flags cleared the way column workers would
    fn results_with_heights(cs: usize, height: usize, tops: &[usize], climate: i32) -> (Vec<ColumnResult>, LayerFlags) {
        let flags = LayerFlags::new(height);
        let water = ids().water;
        let results = tops
            .iter()
            .map(|&top| {
                let mut r = ColumnResult::new(height);
                r.water_block = water;
                r.climate = climate;
                for y in 1..height - 1 {
                    r.solid[y] = y <= top;
                    if r.solid[y] {
                        flags.mark_not_empty(y);
                    } else {
                        flags.mark_not_solid(y);
                    }
                }
                r
            })
            .collect();
        assert_eq!(tops.len(), cs * cs);
        (results, flags)
    }

    #[test]
    fn test_bulk_matches_column_by_column() {
        let tops = [10, 12, 15, 11, 9, 30, 10, 14, 13, 10, 10, 16, 20, 10, 11, 12];
        let (results, flags) = results_with_heights(4, 64, &tops, pack_climate(150, 100, 100));

        let mut bulk = ChunkColumn::new(0, 0, 4, 64);
        let summary = write_chunk_column(&mut bulk, &results, &flags, &ids(), 20, -15.0, true);
        let mut slow = ChunkColumn::new(0, 0, 4, 64);
        write_chunk_column(&mut slow, &results, &flags, &ids(), 20, -15.0, false);

        assert_eq!(summary.y_base, 10);
        assert_eq!(summary.y_top, 31);
        assert_eq!(bulk, slow);
    }

    #[test]
    fn test_heights_and_water() {
        let (results, flags) = results_with_heights(1, 32, &[5], pack_climate(150, 100, 100));
        let mut column = ChunkColumn::new(0, 0, 1, 32);
        let summary = write_chunk_column(&mut column, &results, &flags, &ids(), 12, -15.0, true);

        assert_eq!(column.block(0, 0, 0), ids().mantle);
        assert_eq!(column.block(0, 5, 0), ids().rock);
        assert_eq!(column.block(0, 6, 0), AIR);
        assert_eq!(column.fluid(0, 11, 0), ids().water);
        assert_eq!(column.fluid(0, 12, 0), AIR);
        assert_eq!(summary.water_blocks, 6);
        assert_eq!(column.terrain_height_map[0], 5);
        assert_eq!(column.rain_height_map[0], 11);
        assert_eq!(column.y_max, 11);
    }

    #[test]
    fn test_cold_surface_freezes() {
        // Raw temperature 10 is about -17.6 degrees
        let (results, flags) = results_with_heights(1, 32, &[5], pack_climate(10, 100, 100));
        let mut column = ChunkColumn::new(0, 0, 1, 32);
        let summary = write_chunk_column(&mut column, &results, &flags, &ids(), 12, -15.0, true);
        assert_eq!(column.block(0, 11, 0), ids().lake_ice);
        assert_eq!(column.fluid(0, 11, 0), AIR);
        assert_eq!(column.fluid(0, 10, 0), ids().water);
        assert_eq!(summary.ice_blocks, 1);
    }

    #[test]
    fn test_distortion_offset_moves_freeze_line() {
        // Raw temperature 21 is about -15.06 degrees, just below freezing
        let (mut results, flags) = results_with_heights(2, 32, &[5, 5, 5, 5], pack_climate(21, 100, 100));
        results[0].temperature_offset = 0.5;
        results[1].temperature_offset = -0.5;
        let mut column = ChunkColumn::new(0, 0, 2, 32);
        let summary = write_chunk_column(&mut column, &results, &flags, &ids(), 12, -15.0, true);

        assert_eq!(column.block(0, 11, 0), AIR);
        assert_eq!(column.fluid(0, 11, 0), ids().water);
        assert_eq!(column.block(1, 11, 0), ids().lake_ice);
        // No offset on the second row: frozen as well
        assert_eq!(column.block(0, 11, 1), ids().lake_ice);
        assert_eq!(summary.ice_blocks, 3);
    }
}
