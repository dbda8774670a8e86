use image::{ImageBuffer, Rgb, RgbImage};

use crate::landform::Landforms;
use crate::region::MapRegion;
use crate::tilemap::Tilemap;

/// Land from the shore up to the world ceiling (matplotlib "Spectral", reversed)
const LAND_STOPS: [[f32; 3]; 11] = [
    [0.37, 0.31, 0.64],
    [0.20, 0.53, 0.74],
    [0.40, 0.76, 0.65],
    [0.67, 0.87, 0.64],
    [0.90, 0.96, 0.60],
    [1.00, 1.00, 0.75],
    [1.00, 0.88, 0.55],
    [0.99, 0.68, 0.38],
    [0.96, 0.43, 0.26],
    [0.84, 0.24, 0.31],
    [0.62, 0.00, 0.26],
];

/// Water from the surface down to Y 0
const WATER_STOPS: [[f32; 3]; 3] = [[0.24, 0.47, 0.78], [0.11, 0.28, 0.58], [0.02, 0.11, 0.36]];

/// Export terrain heights as PNG: blue below sea level, spectral above it
pub fn export_heightmap(
    heights: &Tilemap<u16>,
    sea_level: usize,
    map_height: usize,
    path: &str,
) -> Result<(), image::ImageError> {
    let mut img: RgbImage = ImageBuffer::new(heights.width as u32, heights.height as u32);

    for z in 0..heights.height {
        for x in 0..heights.width {
            let color = height_color(*heights.get(x, z), sea_level, map_height);
            img.put_pixel(x as u32, z as u32, Rgb(color));
        }
    }

    img.save(path)
}

/// Color of a terrain height. Cells whose top block sits below the water surface
/// (`sea_level - 1`) are shaded by depth.
fn height_color(height: u16, sea_level: usize, map_height: usize) -> [u8; 3] {
    let height = height as f32;
    let surface = sea_level as f32 - 1.0;
    if height < surface {
        gradient(&WATER_STOPS, (surface - height) / surface.max(1.0))
    } else {
        let span = (map_height as f32 - 1.0 - surface).max(1.0);
        gradient(&LAND_STOPS, (height - surface) / span)
    }
}

/// Piecewise linear color over evenly spaced stops, `t` clamped to [0, 1]
fn gradient(stops: &[[f32; 3]], t: f32) -> [u8; 3] {
    let segments = stops.len() - 1;
    let scaled = t.clamp(0.0, 1.0) * segments as f32;
    let idx = (scaled as usize).min(segments - 1);
    let frac = scaled - idx as f32;
    let (a, b) = (stops[idx], stops[idx + 1]);
    [0, 1, 2].map(|c| ((a[c] + (b[c] - a[c]) * frac) * 255.0).round() as u8)
}

/// Export a region's landform map (inner cells only) in each variant's debug color
pub fn export_landform_map(region: &MapRegion, landforms: &Landforms, path: &str) -> Result<(), image::ImageError> {
    let map = &region.landform_map;
    let size = map.inner_size();
    let mut img: RgbImage = ImageBuffer::new(size as u32, size as u32);

    for z in 0..size {
        for x in 0..size {
            let index = map.get_unpadded_int(x as i64, z as i64);
            let color = usize::try_from(index)
                .ok()
                .and_then(|i| landforms.get(i))
                .map(|v| v.color_int())
                .unwrap_or(0);
            img.put_pixel(
                x as u32,
                z as u32,
                Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8]),
            );
        }
    }

    img.save(path)
}
