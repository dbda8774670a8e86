use std::error::Error;
use std::time::Instant;

use clap::Parser;

use terrain_generator::ascii;
use terrain_generator::config::WorldGenConfig;
use terrain_generator::export;
use terrain_generator::landform::Landforms;
use terrain_generator::terrain::{ColumnEvalMode, TerrainGenerator};
use terrain_generator::world::TerrainWorld;

#[derive(Parser, Debug)]
#[command(name = "terrain_generator")]
#[command(about = "Generate voxel terrain chunk columns from layered landform noise")]
struct Args {
    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Radius in chunk columns around the origin
    #[arg(short, long, default_value = "4")]
    radius: i32,

    /// World height in blocks (overrides the config file)
    #[arg(long)]
    map_height: Option<usize>,

    /// Sea level in blocks (overrides the config file)
    #[arg(long)]
    sea_level: Option<usize>,

    /// World generation config as JSON
    #[arg(long)]
    config: Option<String>,

    /// Landform variants as JSON (defaults to the built-in set)
    #[arg(long)]
    landforms: Option<String>,

    /// Evaluate every layer instead of stopping at the first guaranteed-air layer
    #[arg(long)]
    exhaustive: bool,

    /// Keep floating blocks
    #[arg(long)]
    no_prune: bool,

    /// Halve the worker pool again
    #[arg(long)]
    reduced_threads: bool,

    /// Blocks per character in the ASCII height map
    #[arg(long, default_value = "4")]
    ascii_step: usize,

    /// Print a vertical slice at this world X
    #[arg(long)]
    slice_x: Option<i64>,

    /// Export the height map to PNG (specify output path)
    #[arg(long)]
    export_heightmap: Option<String>,

    /// Export the landform map of the origin region to PNG (specify output path)
    #[arg(long)]
    export_landforms: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => WorldGenConfig::from_json_file(path)?,
        None => WorldGenConfig::default(),
    };
    if let Some(map_height) = args.map_height {
        config.map_height = map_height;
    }
    if args.sea_level.is_some() {
        config.sea_level = args.sea_level;
    }
    config.reduced_threads |= args.reduced_threads;

    let variants = match &args.landforms {
        Some(path) => Landforms::load_json_file(path)?,
        None => Landforms::default_variants()?,
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("Generating terrain with seed: {}", seed);
    println!(
        "World height: {}, sea level: {}, chunk size: {}",
        config.map_height,
        config.sea_level(),
        config.chunk_size
    );

    let mode = if args.exhaustive {
        ColumnEvalMode::Exhaustive
    } else {
        ColumnEvalMode::Fast
    };
    let generator = TerrainGenerator::from_variants(config, seed, variants)?.with_eval_mode(mode);
    println!(
        "Loaded {} landforms ({} terrain octaves)",
        generator.landforms().len(),
        generator.landforms().octave_count()
    );

    let mut world = TerrainWorld::new(generator);
    if args.no_prune {
        world = world.without_pruning();
    }

    let side = 2 * args.radius + 1;
    println!("Generating {}x{} chunk columns...", side, side);
    let start = Instant::now();
    let stats = world.generate_area(0, 0, args.radius);
    let elapsed = start.elapsed();

    println!("Generation complete in {:?}:", elapsed);
    println!("  Columns: {} ({} smoothed against neighbours)", stats.columns, stats.smoothed_columns);
    println!("  Water blocks: {}", stats.water_blocks);
    println!("  Lake ice blocks: {}", stats.ice_blocks);
    println!(
        "  Floating clusters removed: {} ({} blocks)",
        stats.clusters_removed, stats.blocks_removed
    );
    println!("  Highest block: {}", stats.max_height);
    if stats.columns > 0 {
        println!("  Per column: {:?}", elapsed / stats.columns as u32);
    }

    let sea_level = world.generator().sea_level();
    let map_height = world.generator().config().map_height;

    if let Some((heights, min_x, min_z)) = world.height_map() {
        println!();
        println!("Height map from ({}, {}):", min_x, min_z);
        print!("{}", ascii::render_height_map(&heights, sea_level, map_height, args.ascii_step));
        print!("{}", ascii::height_legend());

        if let Some(path) = &args.export_heightmap {
            export::export_heightmap(&heights, sea_level, map_height, path)?;
            println!("Exported height map to {}", path);
        }
    }

    if let Some(x) = args.slice_x {
        println!();
        println!("Slice at x = {}:", x);
        print!("{}", ascii::render_slice(&world, x, 4, 2));
        print!("{}", ascii::slice_legend());
    }

    if let Some(path) = &args.export_landforms {
        let region = world.generator().region(0, 0);
        export::export_landform_map(&region, world.generator().landforms(), path)?;
        println!("Exported landform map to {}", path);
    }

    Ok(())
}
