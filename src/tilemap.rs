//! Padded 2D data maps
//!
//! Region-scale maps (climate, ocean, upheaval, landform index) are generated with a
//! few cells of padding on every side so that sampling at a region border can read
//! past it without touching the neighbouring region.

/// A dense 2D grid. Out-of-range coordinates are clamped to the edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    fn index(&self, x: usize, z: usize) -> usize {
        let x = x.min(self.width - 1);
        let z = z.min(self.height - 1);
        z * self.width + x
    }

    pub fn get(&self, x: usize, z: usize) -> &T {
        &self.data[self.index(x, z)]
    }

    pub fn set(&mut self, x: usize, z: usize, value: T) {
        let idx = self.index(x, z);
        self.data[idx] = value;
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

/// Integer map with padding, e.g. a climate map of 16x16 inner cells stored as 20x20.
#[derive(Clone, Debug, PartialEq)]
pub struct IntDataMap2D {
    pub data: Tilemap<i32>,
    /// Padded edge length
    pub size: usize,
    pub top_left_padding: usize,
    pub bottom_right_padding: usize,
}

impl IntDataMap2D {
    pub fn new(size: usize, top_left_padding: usize, bottom_right_padding: usize) -> Self {
        Self {
            data: Tilemap::new(size, size),
            size,
            top_left_padding,
            bottom_right_padding,
        }
    }

    /// Map of `inner_size` cells plus `padding` on every side, every cell `value`
    pub fn filled(inner_size: usize, padding: usize, value: i32) -> Self {
        let size = inner_size + 2 * padding;
        Self {
            data: Tilemap::new_with(size, size, value),
            size,
            top_left_padding: padding,
            bottom_right_padding: padding,
        }
    }

    /// Resolution without padding
    pub fn inner_size(&self) -> usize {
        self.size - self.top_left_padding - self.bottom_right_padding
    }

    /// Value at a coordinate relative to the first inner cell. Coordinates reaching
    /// into the padding are allowed; anything further out is clamped.
    pub fn get_unpadded_int(&self, x: i64, z: i64) -> i32 {
        let px = (x + self.top_left_padding as i64).clamp(0, self.size as i64 - 1) as usize;
        let pz = (z + self.top_left_padding as i64).clamp(0, self.size as i64 - 1) as usize;
        *self.data.get(px, pz)
    }

    /// Value at a padded coordinate
    pub fn get_int(&self, x: usize, z: usize) -> i32 {
        *self.data.get(x, z)
    }

    pub fn set_int(&mut self, x: usize, z: usize, value: i32) {
        self.data.set(x, z, value);
    }

    /// Bilinear blend of the four inner cells around a fractional unpadded position
    pub fn lerped_unpadded(&self, x: f64, z: f64) -> f64 {
        let x0 = x.floor();
        let z0 = z.floor();
        let fx = x - x0;
        let fz = z - z0;
        let (ix, iz) = (x0 as i64, z0 as i64);
        bilerp(
            self.get_unpadded_int(ix, iz) as f64,
            self.get_unpadded_int(ix + 1, iz) as f64,
            self.get_unpadded_int(ix, iz + 1) as f64,
            self.get_unpadded_int(ix + 1, iz + 1) as f64,
            fx,
            fz,
        )
    }
}

/// Bilinear interpolation: `top_left`..`top_right` along x, top..bottom along z
#[inline]
pub fn bilerp(top_left: f64, top_right: f64, bottom_left: f64, bottom_right: f64, fx: f64, fz: f64) -> f64 {
    let top = top_left + (top_right - top_left) * fx;
    let bottom = bottom_left + (bottom_right - bottom_left) * fx;
    top + (bottom - top) * fz
}

/// Per-channel bilinear blend of four packed 0xRRGGBB values
pub fn bilerp_packed_rgb(top_left: i32, top_right: i32, bottom_left: i32, bottom_right: i32, fx: f64, fz: f64) -> i32 {
    let mut result = 0;
    for shift in [16, 8, 0] {
        let channel = |v: i32| ((v >> shift) & 0xff) as f64;
        let value = bilerp(
            channel(top_left),
            channel(top_right),
            channel(bottom_left),
            channel(bottom_right),
            fx,
            fz,
        );
        result |= (value.round().clamp(0.0, 255.0) as i32) << shift;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpadded_access_reads_padding() {
        let mut map = IntDataMap2D::new(6, 1, 1);
        map.set_int(0, 0, 7);
        map.set_int(1, 1, 3);
        assert_eq!(map.inner_size(), 4);
        assert_eq!(map.get_unpadded_int(0, 0), 3);
        assert_eq!(map.get_unpadded_int(-1, -1), 7);
        // Clamped beyond the padding
        assert_eq!(map.get_unpadded_int(-5, -5), 7);
    }

    #[test]
    fn test_lerped_unpadded() {
        let mut map = IntDataMap2D::filled(2, 1, 0);
        map.set_int(2, 1, 10);
        assert_eq!(map.lerped_unpadded(0.5, 0.0), 5.0);
        assert_eq!(map.lerped_unpadded(1.0, 0.0), 10.0);
    }

    #[test]
    fn test_packed_rgb_channels_blend_independently() {
        let blended = bilerp_packed_rgb(0x000000, 0xff0000, 0x0000ff, 0xff00ff, 0.5, 0.5);
        assert_eq!((blended >> 16) & 0xff, 128);
        assert_eq!((blended >> 8) & 0xff, 0);
        assert_eq!(blended & 0xff, 128);
    }

    #[test]
    fn test_tilemap_clamps() {
        let mut map: Tilemap<u8> = Tilemap::new(3, 3);
        map.set(10, 10, 9);
        assert_eq!(*map.get(2, 2), 9);
    }
}
