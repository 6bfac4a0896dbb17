/// Per-frame color and depth storage
use serde::{Deserialize, Serialize};

/// An opaque 8-bit-per-channel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed `0xFFRRGGBB`
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn from_argb(argb: u32) -> Self {
        Self {
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }
}

fn index(x: i64, y: i64, width: usize, height: usize) -> Option<usize> {
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return None;
    }
    Some(y as usize * width + x as usize)
}

/// Nearest depth seen per pixel. Stored values only decrease within a frame.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![f64::INFINITY; width * height],
        }
    }

    pub fn reset(&mut self) {
        self.values.fill(f64::INFINITY);
    }

    pub fn get(&self, x: i64, y: i64) -> Option<f64> {
        index(x, y, self.width, self.height).map(|i| self.values[i])
    }

    /// Record `z` if it is nearer than the stored depth. Out-of-range pixels never pass.
    pub fn test_and_set(&mut self, x: i64, y: i64, z: f64) -> bool {
        match index(x, y, self.width, self.height) {
            Some(i) if z < self.values[i] => {
                self.values[i] = z;
                true
            }
            _ => false,
        }
    }
}

/// Framebuffer for software rendering: a color grid plus its depth buffer
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    pub depth: DepthBuffer,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
            depth: DepthBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fill with `background` and reset every depth to +infinity
    pub fn clear(&mut self, background: Rgb) {
        self.pixels.fill(background);
        self.depth.reset();
    }

    /// Silently ignored outside `[0, width) × [0, height)`
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(i) = index(x, y, self.width, self.height) {
            self.pixels[i] = color;
        }
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        index(x, y, self.width, self.height).map(|i| self.pixels[i])
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Row-major packed `0xFFRRGGBB` pixels for a display surface
    pub fn to_argb(&self) -> Vec<u32> {
        self.pixels.iter().map(|p| p.to_argb()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_packing() {
        assert_eq!(Rgb::new(0x12, 0x34, 0x56).to_argb(), 0xFF12_3456);
        assert_eq!(Rgb::from_argb(0xFF12_3456), Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(Rgb::BLACK.to_argb(), 0xFF00_0000);
    }

    #[test]
    fn test_out_of_range_writes_are_ignored() {
        let mut fb = FrameBuffer::new(4, 3);
        let red = Rgb::new(255, 0, 0);
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 3), (i64::MAX, i64::MIN)] {
            fb.set_pixel(x, y, red);
            assert_eq!(fb.pixel(x, y), None);
        }
        assert!(fb.pixels().iter().all(|p| *p == Rgb::BLACK));

        fb.set_pixel(3, 2, red);
        assert_eq!(fb.pixel(3, 2), Some(red));
        assert_eq!(fb.to_argb()[2 * 4 + 3], 0xFFFF_0000);
    }

    #[test]
    fn test_depth_only_decreases() {
        let mut depth = DepthBuffer::new(2, 2);
        assert_eq!(depth.get(1, 1), Some(f64::INFINITY));
        assert!(depth.test_and_set(1, 1, 0.5));
        assert!(!depth.test_and_set(1, 1, 0.7));
        assert!(!depth.test_and_set(1, 1, 0.5));
        assert!(depth.test_and_set(1, 1, 0.2));
        assert_eq!(depth.get(1, 1), Some(0.2));
        assert!(!depth.test_and_set(2, 1, 0.0));
    }

    #[test]
    fn test_clear_resets_color_and_depth() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(0, 0, Rgb::new(1, 2, 3));
        fb.depth.test_and_set(0, 0, 0.1);
        fb.clear(Rgb::new(9, 9, 9));
        assert_eq!(fb.pixel(0, 0), Some(Rgb::new(9, 9, 9)));
        assert_eq!(fb.depth.get(0, 0), Some(f64::INFINITY));
    }
}
