//! Profiling tool comparing the early-exit and exhaustive column evaluation

use std::time::{Duration, Instant};

use terrain_generator::chunk::NeighborHeightMaps;
use terrain_generator::config::WorldGenConfig;
use terrain_generator::landform::Landforms;
use terrain_generator::terrain::{ColumnEvalMode, TerrainGenerator};

const RADIUS: i32 = 3;

fn profile(mode: ColumnEvalMode, seed: u64) -> Result<(Duration, usize), Box<dyn std::error::Error>> {
    let generator =
        TerrainGenerator::from_variants(WorldGenConfig::default(), seed, Landforms::default_variants()?)?.with_eval_mode(mode);
    let mut context = generator.new_context();
    let neighbors = NeighborHeightMaps::new();

    // Warm the region caches so the timing covers column work only
    for cz in -RADIUS..=RADIUS {
        for cx in -RADIUS..=RADIUS {
            generator.sample_corners(cx, cz);
        }
    }

    let mut solid = 0;
    let start = Instant::now();
    for cz in -RADIUS..=RADIUS {
        for cx in -RADIUS..=RADIUS {
            let mut column = generator.new_chunk_column(cx, cz);
            generator.generate(&mut context, &mut column, &neighbors);
            solid += column.count_blocks(generator.block_ids().rock);
        }
    }
    Ok((start.elapsed(), solid))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let seed = 1337u64;
    let side = 2 * RADIUS + 1;

    println!("=== Performance Profiling ===");
    println!("Chunk columns: {}x{}", side, side);
    println!();

    let (fast_time, fast_solid) = profile(ColumnEvalMode::Fast, seed)?;
    println!("Fast evaluation:       {:?}", fast_time);

    let (full_time, full_solid) = profile(ColumnEvalMode::Exhaustive, seed)?;
    println!("Exhaustive evaluation: {:?}", full_time);

    println!("\n=== Summary ===");
    println!("Rock blocks: {} / {}", fast_solid, full_solid);
    if fast_solid != full_solid {
        println!("WARNING: evaluation modes disagree by {} blocks", fast_solid.abs_diff(full_solid));
    }
    println!(
        "Speedup: {:.2}x",
        full_time.as_secs_f64() / fast_time.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}
