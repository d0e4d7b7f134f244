//! Frame rendering.
//!
//! Pixel `(x, y)` of a `W x H` frame samples the scene point `(x/W, y/H)`,
//! so the frame always shows the unit square. The frame is split into
//! buckets that are rendered in parallel with rayon; each bucket draws its
//! jitter from its own generator seeded from the frame seed and the bucket
//! index, so a seed always reproduces the same frame.

use crate::{Color, Scene};
use lux_math::Point;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGB. Radiance above 1.0 saturates; there is no
/// gamma curve.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        (255.0 * clamp_01(color.x)) as u8,
        (255.0 * clamp_01(color.y)) as u8,
        (255.0 * clamp_01(color.z)) as u8,
    ]
}

/// Scene point sampled by pixel `(x, y)`.
#[inline]
pub fn pixel_to_point(x: u32, y: u32, width: u32, height: u32) -> Point {
    Point::new(x as f32 / width as f32, y as f32 / height as f32)
}

/// Scene point to the pixel that samples it, if it falls on the frame.
pub fn point_to_pixel(p: Point, width: u32, height: u32) -> Option<(u32, u32)> {
    let x = (p.x * width as f32).floor();
    let y = (p.y * height as f32).floor();
    if x >= 0.0 && y >= 0.0 && x < width as f32 && y < height as f32 {
        Some((x as u32, y as u32))
    } else {
        None
    }
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Packed RGB bytes, row by row.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let rgb: Vec<[u8; 3]> = self.pixels.iter().map(|&c| color_to_rgb(c)).collect();
        bytemuck::cast_slice(&rgb).to_vec()
    }

    fn write_bucket(&mut self, bucket: &Bucket, pixels: &[Color]) {
        for (i, color) in pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }
}

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in row-major order; also selects the bucket's random stream
    pub index: usize,
}

impl Bucket {
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Tile a `width x height` frame into buckets, row-major. Buckets on the
/// right and bottom edges are clipped to the frame.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let mut buckets = Vec::new();

    for y in (0..height).step_by(size as usize) {
        for x in (0..width).step_by(size as usize) {
            buckets.push(Bucket {
                x,
                y,
                width: size.min(width - x),
                height: size.min(height - y),
                index: buckets.len(),
            });
        }
    }

    buckets
}

/// Render one bucket, returning its pixels row-major.
pub fn render_bucket(bucket: &Bucket, scene: &Scene, width: u32, height: u32, seed: u64) -> Vec<Color> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(bucket.index as u64));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for y in bucket.y..bucket.y + bucket.height {
        for x in bucket.x..bucket.x + bucket.width {
            pixels.push(scene.sample(pixel_to_point(x, y, width, height), &mut rng));
        }
    }

    pixels
}

/// Render the scene's radiance into a new frame.
pub fn render(scene: &Scene, width: u32, height: u32, seed: u64) -> ImageBuffer {
    let buckets = generate_buckets(width, height, DEFAULT_BUCKET_SIZE);
    log::debug!("Rendering {}x{} in {} buckets", width, height, buckets.len());

    let results: Vec<(Bucket, Vec<Color>)> = buckets
        .par_iter()
        .map(|b| (*b, render_bucket(b, scene, width, height, seed)))
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for (bucket, pixels) in &results {
        image.write_bucket(bucket, pixels);
    }
    image
}

/// Flat preview: each pixel shows the emission of the entity it lies in.
pub fn render_base(scene: &Scene, width: u32, height: u32) -> ImageBuffer {
    let pixels = (0..width * height)
        .into_par_iter()
        .map(|i| scene.base_color(pixel_to_point(i % width, i / width, width, height)))
        .collect();

    ImageBuffer {
        width,
        height,
        pixels,
    }
}
