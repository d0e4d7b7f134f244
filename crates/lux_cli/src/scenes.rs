//! Built-in demo scenes.
//!
//! Every scene is framed for the unit square with y pointing down. Lights
//! placed at negative y sit above the frame and shine into it.

use clap::ValueEnum;
use lux_tracer::{
    ChannelMode, Color, Entity, Material, Point, Shape, ShapeError, Vector,
    DEFAULT_SPOT_HALF_ANGLE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The demo scenes the CLI can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoScene {
    /// Gourd-shaped yellow light, a blue triangle light and two mirror blocks
    Gourd,
    /// Half-disc lens between a cyan and a magenta light
    Lens,
    /// Triangular prism under a white light
    Prism,
    /// Tilted glass slab under a white light
    GlassSlab,
    /// Prism hit by a narrow spot light
    LaserPrism,
    /// Half-disc lens under a white light
    WhiteLens,
    /// A single spot light shining diagonally
    Spotlight,
    /// Randomly scattered glass beads under a white light
    Stars,
}

/// Expand red, green and blue refraction indices to one per traced channel.
///
/// Spectral channels interpolate linearly from the red index through green
/// to the blue index.
pub fn channel_indices(rgb: [f32; 3], channels: ChannelMode) -> Vec<f32> {
    match channels {
        ChannelMode::Rgb => rgb.to_vec(),
        ChannelMode::Spectral(1) => vec![rgb[1]],
        ChannelMode::Spectral(n) => (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32 * 2.0;
                if t <= 1.0 {
                    rgb[0] + (rgb[1] - rgb[0]) * t
                } else {
                    rgb[1] + (rgb[2] - rgb[1]) * (t - 1.0)
                }
            })
            .collect(),
    }
}

fn light(shape: Shape, emissive: Color) -> Entity {
    Entity::new(shape, Material::emissive(emissive))
}

fn glass(shape: Shape, tint: Color, rgb: [f32; 3], channels: ChannelMode) -> Entity {
    Entity::new(
        shape,
        Material::emissive(tint)
            .with_reflectivity(0.2)
            .with_refraction(1.0, channel_indices(rgb, channels)),
    )
}

/// Lower half of the disc at (0.5, 0.3), flat side up.
fn half_disc_lens() -> Shape {
    Shape::intersection(
        Shape::half_plane(0.0, 1.0, -0.3),
        Shape::circle(Point::new(0.5, 0.3), 0.3),
    )
}

fn white_light(intensity: f32) -> Entity {
    light(Shape::circle(Point::new(0.5, -0.5), 0.05), Color::splat(intensity))
}

impl DemoScene {
    /// Build the entities of the scene.
    ///
    /// `channels` decides how many refraction indices transmissive
    /// materials carry; `seed` drives the scenes with random layout.
    pub fn build(self, channels: ChannelMode, seed: u64) -> Result<Vec<Entity>, ShapeError> {
        let dispersive = [1.2, 1.4, 1.6];
        let tinted = Color::new(0.01, 0.12, 0.17);

        let entities = match self {
            DemoScene::Gourd => {
                let gourd = Shape::union(
                    Shape::circle(Point::new(0.5, 0.6), 0.1),
                    Shape::circle(Point::new(0.5, 0.7), 0.12),
                );
                let triangle = Shape::convex_polygon(&[
                    Point::new(0.9, 0.5),
                    Point::new(0.7, 0.5),
                    Point::new(0.8, 0.4),
                ])?;
                let mirror = Material::emissive(Color::new(0.05, 0.05, 0.2)).with_reflectivity(0.8);
                vec![
                    light(gourd, Color::new(1.8, 0.9, 0.7)),
                    light(triangle, Color::new(0.2, 0.9, 1.1)),
                    Entity::new(square(Point::new(0.3, 0.3), 0.1)?, mirror.clone()),
                    Entity::new(square(Point::new(0.2, 0.5), 0.1)?, mirror),
                ]
            }
            DemoScene::Lens => vec![
                light(Shape::circle(Point::new(1.0, -0.5), 0.05), Color::new(2.0, 9.0, 11.0)),
                light(Shape::circle(Point::new(0.0, -0.5), 0.05), Color::new(11.0, 2.0, 9.0)),
                glass(half_disc_lens(), Color::ZERO, [1.5; 3], channels),
            ],
            DemoScene::Prism => {
                let prism = Shape::convex_polygon(&[
                    Point::new(0.3, 0.4),
                    Point::new(0.7, 0.5),
                    Point::new(0.7, 0.3),
                ])?;
                vec![white_light(10.0), glass(prism, tinted, dispersive, channels)]
            }
            DemoScene::GlassSlab => {
                // Thickens towards the left
                let slab = Shape::intersection(
                    Shape::half_plane(0.0, 1.0, 0.3),
                    Shape::half_plane(1.0, -12.5, 4.0),
                );
                vec![white_light(10.0), glass(slab, tinted, dispersive, channels)]
            }
            DemoScene::LaserPrism => {
                let laser = Entity::spot_light(
                    Shape::circle(Point::new(0.5, 0.1), 0.05),
                    Material::emissive(Color::splat(75.0)),
                    Vector::new(0.0, 1.0),
                    DEFAULT_SPOT_HALF_ANGLE,
                );
                let prism = Shape::convex_polygon(&[
                    Point::new(0.3, 0.3),
                    Point::new(0.7, 0.4),
                    Point::new(0.7, 0.2),
                ])?;
                vec![laser, glass(prism, tinted, dispersive, channels)]
            }
            DemoScene::WhiteLens => vec![
                white_light(20.0),
                glass(half_disc_lens(), Color::ZERO, [1.4, 1.5, 1.6], channels),
            ],
            DemoScene::Spotlight => vec![Entity::spot_light(
                Shape::circle(Point::new(0.1, 0.1), 0.05),
                Material::emissive(Color::splat(20.0)),
                Vector::new(0.707, 0.707),
                0.1,
            )],
            DemoScene::Stars => {
                let mut rng = StdRng::seed_from_u64(seed);
                let indices = channel_indices([1.4, 1.5, 1.6], channels);
                let mut entities = vec![white_light(20.0)];
                for _ in 0..6 {
                    let center = Point::new(rng.gen(), rng.gen());
                    let radius = rng.gen::<f32>() / 10.0;
                    let bead = Material::emissive(Color::ZERO)
                        .with_reflectivity(0.1)
                        .with_refraction(0.8, indices.clone());
                    entities.push(Entity::new(Shape::circle(center, radius), bead));
                }
                entities
            }
        };

        Ok(entities)
    }
}

/// Axis-aligned square with its top-left corner at `corner`.
fn square(corner: Point, side: f32) -> Result<Shape, ShapeError> {
    Shape::convex_polygon(&[
        corner,
        corner + Vector::new(side, 0.0),
        corner + Vector::new(side, side),
        corner + Vector::new(0.0, side),
    ])
}
