//! Lux tracer - 2D light transport.
//!
//! Scenes are built from CSG shapes with emissive, reflective and refractive
//! materials. A quadtree accelerates nearest-hit queries and a recursive
//! integrator gathers the light arriving at any point of the unit square.

mod circle;
mod config;
mod debug;
mod entity;
mod half_plane;
mod quadtree;
mod renderer;
mod scene;
mod shape;
mod spectrum;
mod traceable;

pub use circle::Circle;
pub use config::{Channel, ChannelMode, TraceConfig};
pub use debug::{NoopSink, SegmentSink};
pub use entity::{Entity, Material, SpotCone, DEFAULT_SPOT_HALF_ANGLE};
pub use half_plane::HalfPlane;
pub use quadtree::{QuadTree, MIN_NODE_SIZE};
pub use renderer::{
    color_to_rgb, generate_buckets, pixel_to_point, point_to_pixel, render, render_base,
    render_bucket, Bucket, ImageBuffer, DEFAULT_BUCKET_SIZE,
};
pub use scene::{refract, Scene, SceneError};
pub use shape::{Shape, ShapeError, BOUNDARY_EPSILON};
pub use spectrum::{rainbow, spectral_weights, RAINBOW};
pub use traceable::{nearest_linear, Hit, Traceable};

/// Re-export common math types from lux_math
pub use lux_math::{Bounds, Color, Interval, Point, Ray, Vector};

use rand::{Rng, RngCore};

/// Uniform random `f32` in `[0, 1)`.
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
