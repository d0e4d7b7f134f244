//! The scene and its light transport integrator.
//!
//! Radiance along a ray is the emission of the first entity it hits plus
//! ideal specular reflection and refraction, each traced recursively until
//! the configured depth. Refraction is traced per channel so that indices
//! that vary with the channel disperse light.

use std::f32::consts::TAU;

use crate::config::{Channel, ChannelMode, TraceConfig};
use crate::debug::{NoopSink, SegmentSink};
use crate::spectrum::spectral_weights;
use crate::traceable::{nearest_linear, Hit};
use crate::{gen_f32, Entity, QuadTree};
use lux_math::{reflect, Bounds, Color, Point, Ray, Vector};
use rand::RngCore;
use thiserror::Error;

/// Errors that can occur when assembling a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("entity {entity} has {found} refractive indices, expected {expected}")]
    RefractiveIndexCount {
        entity: usize,
        expected: usize,
        found: usize,
    },

    #[error("spectral mode needs at least one sample")]
    NoSpectralSamples,

    #[error("quadtree cells must be wider than zero, got {0}")]
    InvalidMinNodeSize(f32),
}

/// Direction of a ray after crossing a boundary with outward normal `n`.
///
/// `index` is the refractive index of the medium behind the boundary
/// relative to the medium in front of it. Entering (`d·n < 0`) bends by
/// `1/index`, leaving bends by `index`. Returns `None` under total internal
/// reflection.
pub fn refract(d: Vector, n: Vector, index: f32) -> Option<Vector> {
    if index <= 0.0 {
        return None;
    }
    let idotn = d.dot(n);
    let ri = if idotn > 0.0 { index } else { 1.0 / index };
    let k = 1.0 - ri * ri * (1.0 - idotn * idotn);
    if k < 0.0 {
        return None;
    }
    let a = if idotn > 0.0 {
        ri * idotn - k.sqrt()
    } else {
        ri * idotn + k.sqrt()
    };
    Some(d * ri - n * a)
}

/// An immutable collection of entities, ready to be traced.
#[derive(Debug, Clone)]
pub struct Scene {
    entities: Vec<Entity>,
    index: Option<QuadTree>,
    config: TraceConfig,
    /// Rainbow tints, one per spectral channel; empty in RGB mode
    weights: Vec<Color>,
}

impl Scene {
    /// Validate the entities against `config` and build the spatial index.
    pub fn new(entities: Vec<Entity>, config: TraceConfig) -> Result<Self, SceneError> {
        let weights = match config.channels {
            ChannelMode::Rgb => Vec::new(),
            ChannelMode::Spectral(0) => return Err(SceneError::NoSpectralSamples),
            ChannelMode::Spectral(n) => spectral_weights(n),
        };

        let min = config.min_node_size;
        if config.use_quadtree && (min.is_nan() || min <= 0.0) {
            return Err(SceneError::InvalidMinNodeSize(min));
        }

        let expected = config.channels.count();
        for (i, entity) in entities.iter().enumerate() {
            let material = entity.material();
            if material.refractivity > 0.0 && material.refractive_indices.len() != expected {
                return Err(SceneError::RefractiveIndexCount {
                    entity: i,
                    expected,
                    found: material.refractive_indices.len(),
                });
            }
            if material.reflectivity + material.refractivity > 1.0 {
                log::warn!(
                    "Entity {} reflects {} and refracts {}; it will add energy",
                    i,
                    material.reflectivity,
                    material.refractivity
                );
            }
        }

        let index = config
            .use_quadtree
            .then(|| QuadTree::build(&entities, Bounds::UNIT, config.min_node_size));

        Ok(Self {
            entities,
            index,
            config,
            weights,
        })
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// The spatial index, absent in brute-force mode.
    pub fn index(&self) -> Option<&QuadTree> {
        self.index.as_ref()
    }

    /// Nearest entity along the ray.
    pub fn nearest(&self, ray: &Ray) -> Option<Hit> {
        match &self.index {
            Some(tree) => tree.nearest(&self.entities, ray),
            None => nearest_linear(&self.entities, ray),
        }
    }

    /// Radiance arriving at `p` from direction `d`.
    pub fn get_color(&self, p: Point, d: Vector, channel: Channel, depth: u32) -> Color {
        self.get_color_traced(p, d, channel, depth, &NoopSink)
    }

    /// Like [`get_color`](Self::get_color), reporting every traced segment to `sink`.
    pub fn get_color_traced(
        &self,
        p: Point,
        d: Vector,
        channel: Channel,
        depth: u32,
        sink: &dyn SegmentSink,
    ) -> Color {
        if depth > self.config.max_depth {
            return Color::ZERO;
        }

        let ray = Ray::new(p, d);
        let Some(hit) = self.nearest(&ray) else {
            return Color::ZERO;
        };
        sink.segment(p, hit.point);

        let entity = &self.entities[hit.index];
        let normal = entity.shape().normal(hit.point).normalize_or_zero();
        let d = ray.direction;

        let reflected = self.reflect_color(entity, hit.point, d, normal, channel, depth + 1, sink);

        let refracted = match channel {
            Channel::Single(c) => {
                self.refract_color(entity, hit.point, d, normal, c, depth + 1, sink)
            }
            Channel::All => match self.config.channels {
                ChannelMode::Rgb => {
                    let mut rgb = Color::ZERO;
                    for c in 0..3 {
                        rgb[c] = self.refract_color(entity, hit.point, d, normal, c, depth + 1, sink)[c];
                    }
                    rgb
                }
                ChannelMode::Spectral(_) => self
                    .weights
                    .iter()
                    .enumerate()
                    .map(|(c, w)| {
                        self.refract_color(entity, hit.point, d, normal, c, depth + 1, sink) * *w
                    })
                    .sum::<Color>(),
            },
        };

        entity.material().emissive + reflected + refracted
    }

    #[allow(clippy::too_many_arguments)]
    fn reflect_color(
        &self,
        entity: &Entity,
        at: Point,
        d: Vector,
        normal: Vector,
        channel: Channel,
        depth: u32,
        sink: &dyn SegmentSink,
    ) -> Color {
        let reflectivity = entity.material().reflectivity;
        if depth > self.config.max_depth || reflectivity == 0.0 {
            return Color::ZERO;
        }
        let r = reflect(d, normal);
        self.get_color_traced(at + r * self.config.bias, r, channel, depth, sink) * reflectivity
    }

    #[allow(clippy::too_many_arguments)]
    fn refract_color(
        &self,
        entity: &Entity,
        at: Point,
        d: Vector,
        normal: Vector,
        channel: usize,
        depth: u32,
        sink: &dyn SegmentSink,
    ) -> Color {
        let refractivity = entity.material().refractivity;
        if depth > self.config.max_depth || refractivity == 0.0 {
            return Color::ZERO;
        }
        let Some(index) = entity.refractive_index(channel) else {
            return Color::ZERO;
        };
        let Some(t) = refract(d, normal, index) else {
            // Total internal reflection; the reflection term carries the light
            return Color::ZERO;
        };
        self.get_color_traced(
            at + t * self.config.bias,
            t,
            Channel::Single(channel),
            depth,
            sink,
        ) * refractivity
    }

    /// Average radiance arriving at `p` from all around.
    ///
    /// Casts `samples` rays, one per equal angular bucket, each jittered
    /// uniformly within its bucket.
    pub fn sample(&self, p: Point, rng: &mut dyn RngCore) -> Color {
        self.sample_traced(p, rng, &NoopSink)
    }

    /// Like [`sample`](Self::sample), reporting every traced segment to `sink`.
    pub fn sample_traced(&self, p: Point, rng: &mut dyn RngCore, sink: &dyn SegmentSink) -> Color {
        let n = self.config.samples;
        if n == 0 {
            return Color::ZERO;
        }

        let mut sum = Color::ZERO;
        for i in 0..n {
            let a = TAU * (i as f32 + gen_f32(rng)) / n as f32;
            let d = Vector::new(a.cos(), a.sin());
            sum += self.get_color_traced(p, d, Channel::All, 0, sink);
        }
        sum / n as f32
    }

    /// Emission of the first entity containing `p`, or black.
    ///
    /// A cheap flat preview of the scene layout.
    pub fn base_color(&self, p: Point) -> Color {
        self.entities
            .iter()
            .find(|e| e.shape().is_inside(p))
            .map_or(Color::ZERO, |e| e.material().emissive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Shape};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    fn lamp(center: Point, radius: f32) -> Entity {
        Entity::new(Shape::circle(center, radius), Material::emissive(Color::ONE))
    }

    /// Vertical glass slab covering 0.3 <= x <= 0.4.
    fn slab(indices: Vec<f32>) -> Entity {
        let shape = Shape::intersection(
            Shape::half_plane(1.0, 0.0, -0.3),
            Shape::half_plane(-1.0, 0.0, 0.4),
        );
        Entity::new(shape, Material::emissive(Color::ZERO).with_refraction(1.0, indices))
    }

    fn slab_scene(config: TraceConfig) -> Scene {
        let n = config.channels.count();
        Scene::new(
            vec![slab(vec![1.5; n]), lamp(Point::new(0.8, 0.5), 0.1)],
            config,
        )
        .unwrap()
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(Point, Point)>>);

    impl SegmentSink for Recorder {
        fn segment(&self, from: Point, to: Point) {
            self.0.lock().unwrap().push((from, to));
        }
    }

    #[test]
    fn test_empty_scene_is_black() {
        let scene = Scene::new(Vec::new(), TraceConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(scene.sample(Point::new(0.5, 0.5), &mut rng), Color::ZERO);
        assert_eq!(
            scene.get_color(Point::new(0.2, 0.7), Vector::X, Channel::All, 0),
            Color::ZERO
        );
    }

    #[test]
    fn test_miss_is_black() {
        let scene = Scene::new(vec![lamp(Point::new(0.5, 0.5), 0.1)], TraceConfig::default()).unwrap();
        let c = scene.get_color(Point::new(0.1, 0.1), Vector::new(-1.0, 0.0), Channel::All, 0);
        assert_eq!(c, Color::ZERO);
    }

    #[test]
    fn test_beyond_max_depth_is_black() {
        let scene = Scene::new(vec![lamp(Point::new(0.5, 0.5), 0.1)], TraceConfig::default()).unwrap();
        let p = Point::new(0.1, 0.5);
        assert_eq!(scene.get_color(p, Vector::X, Channel::All, 3), Color::ONE);
        assert_eq!(scene.get_color(p, Vector::X, Channel::All, 4), Color::ZERO);
    }

    #[test]
    fn test_sample_inside_emitter_is_exact() {
        for use_quadtree in [true, false] {
            let config = TraceConfig::default().with_index(use_quadtree, 0.1);
            let scene = Scene::new(vec![lamp(Point::new(0.5, 0.5), 0.1)], config).unwrap();
            let mut rng = StdRng::seed_from_u64(7);
            assert_eq!(scene.sample(Point::new(0.5, 0.5), &mut rng), Color::ONE);
        }
    }

    #[test]
    fn test_refract_round_trip() {
        let d = Vector::new(0.6, 0.8);
        // Enter through the top face, leave through the parallel bottom face
        let top = Vector::new(0.0, -1.0);
        let bottom = Vector::new(0.0, 1.0);

        let inside = refract(d, top, 1.5).unwrap();
        assert!(inside.x < d.x, "entering a denser medium bends towards the normal");
        assert!((inside.length() - 1.0).abs() < 1e-5);

        let out = refract(inside, bottom, 1.5).unwrap();
        assert!((out - d).length() < 1e-5);
    }

    #[test]
    fn test_refract_snell() {
        let d = Vector::new(0.6, 0.8);
        let t = refract(d, Vector::new(0.0, -1.0), 1.5).unwrap();
        // sin(theta_i) = 1.5 sin(theta_t)
        assert!((d.x - 1.5 * t.x).abs() < 1e-5);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        let d = Vector::new(0.9, 0.3).normalize();
        // Leaving glass at a grazing angle
        assert!(refract(d, Vector::new(0.0, 1.0), 1.5).is_none());
        // The same angle entering is fine
        assert!(refract(d, Vector::new(0.0, -1.0), 1.5).is_some());
        assert!(refract(d, Vector::new(0.0, 1.0), 0.0).is_none());
    }

    #[test]
    fn test_light_through_slab() {
        let scene = slab_scene(TraceConfig::default());
        let c = scene.get_color(Point::new(0.1, 0.5), Vector::X, Channel::All, 0);
        assert!((c - Color::ONE).length() < 1e-5, "got {c}");

        // The lamp is two refractions deep
        let shallow = slab_scene(TraceConfig::default().with_quality(64, 1));
        let c = shallow.get_color(Point::new(0.1, 0.5), Vector::X, Channel::All, 0);
        assert_eq!(c, Color::ZERO);
    }

    #[test]
    fn test_spectral_white_stays_white() {
        let scene = slab_scene(TraceConfig::default().with_channels(ChannelMode::Spectral(7)));
        let c = scene.get_color(Point::new(0.1, 0.5), Vector::X, Channel::All, 0);
        assert!((c - Color::ONE).length() < 1e-4, "got {c}");
    }

    #[test]
    fn test_single_channel_traces_one_index() {
        let scene = slab_scene(TraceConfig::default());
        let c = scene.get_color(Point::new(0.1, 0.5), Vector::X, Channel::Single(1), 0);
        assert!((c - Color::ONE).length() < 1e-5);
    }

    #[test]
    fn test_total_internal_reflection_keeps_reflection() {
        let glass = Entity::new(
            Shape::circle(Point::new(0.5, 0.5), 0.3),
            Material::emissive(Color::ZERO)
                .with_reflectivity(0.5)
                .with_refraction(0.5, [10.0, 10.0, 10.0]),
        );
        // Sits where the ray reflected off the inside of the glass lands
        let inner = lamp(Point::new(0.7, 0.5), 0.05);
        let scene = Scene::new(vec![glass, inner], TraceConfig::default()).unwrap();

        let p = Point::new(0.5, 0.3);
        let hit = scene.nearest(&Ray::new(p, Vector::X)).unwrap();
        assert_eq!(hit.index, 0);

        let entity = &scene.entities()[0];
        let normal = entity.shape().normal(hit.point).normalize();
        let refracted = scene.refract_color(entity, hit.point, Vector::X, normal, 0, 1, &NoopSink);
        let reflected =
            scene.reflect_color(entity, hit.point, Vector::X, normal, Channel::All, 1, &NoopSink);
        assert_eq!(refracted, Color::ZERO);
        assert!((reflected - Color::splat(0.5)).length() < 1e-5);

        let c = scene.get_color(p, Vector::X, Channel::All, 0);
        assert!((c - Color::splat(0.5)).length() < 1e-5);
    }

    #[test]
    fn test_reflection_off_mirror() {
        // Mirror wall at x = 0.6 facing left, lamp up and to the left
        let mirror = Entity::new(
            Shape::half_plane(1.0, 0.0, -0.6),
            Material::emissive(Color::ZERO).with_reflectivity(0.8),
        );
        let scene = Scene::new(vec![mirror, lamp(Point::new(0.2, 0.1), 0.05)], TraceConfig::default())
            .unwrap();
        // (0.2, 0.5) -> mirror at (0.6, 0.3) -> back towards (0.2, 0.1)
        let d = Vector::new(0.4, -0.2);
        let c = scene.get_color(Point::new(0.2, 0.5), d, Channel::All, 0);
        assert!((c - Color::splat(0.8)).length() < 1e-5, "got {c}");
    }

    #[test]
    fn test_segments_are_reported() {
        let scene = slab_scene(TraceConfig::default());
        let sink = Recorder::default();
        let p = Point::new(0.1, 0.5);
        scene.get_color_traced(p, Vector::X, Channel::All, 0, &sink);

        let segments = sink.0.into_inner().unwrap();
        // One to the slab, then per channel one across it and one to the lamp
        assert_eq!(segments.len(), 7);
        assert_eq!(segments[0].0, p);
        assert!((segments[0].1 - Point::new(0.3, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_base_color() {
        let red = Entity::new(
            Shape::circle(Point::new(0.3, 0.3), 0.1),
            Material::emissive(Color::new(1.0, 0.0, 0.0)),
        );
        let scene = Scene::new(vec![red, lamp(Point::new(0.35, 0.3), 0.1)], TraceConfig::default())
            .unwrap();
        // First containing entity wins
        assert_eq!(scene.base_color(Point::new(0.33, 0.3)), Color::new(1.0, 0.0, 0.0));
        assert_eq!(scene.base_color(Point::new(0.44, 0.3)), Color::ONE);
        assert_eq!(scene.base_color(Point::new(0.9, 0.9)), Color::ZERO);
    }

    #[test]
    fn test_validation() {
        let bad = Entity::new(
            Shape::circle(Point::new(0.5, 0.5), 0.1),
            Material::emissive(Color::ZERO).with_refraction(1.0, [1.5, 1.5]),
        );
        assert_eq!(
            Scene::new(vec![bad.clone()], TraceConfig::default()).unwrap_err(),
            SceneError::RefractiveIndexCount {
                entity: 0,
                expected: 3,
                found: 2
            }
        );
        assert!(
            Scene::new(vec![bad], TraceConfig::default().with_channels(ChannelMode::Spectral(2)))
                .is_ok()
        );
        assert_eq!(
            Scene::new(Vec::new(), TraceConfig::default().with_channels(ChannelMode::Spectral(0)))
                .unwrap_err(),
            SceneError::NoSpectralSamples
        );

        // Opaque entities need no indices at all
        assert!(Scene::new(vec![lamp(Point::new(0.5, 0.5), 0.1)], TraceConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_degenerate_cell_size() {
        // A zero-size circle fits every cell, however small
        let dot = vec![lamp(Point::new(0.3, 0.3), 0.0)];
        for min in [0.0, -0.5] {
            assert_eq!(
                Scene::new(dot.clone(), TraceConfig::default().with_index(true, min)).unwrap_err(),
                SceneError::InvalidMinNodeSize(min)
            );
        }
        assert!(matches!(
            Scene::new(dot.clone(), TraceConfig::default().with_index(true, f32::NAN)),
            Err(SceneError::InvalidMinNodeSize(m)) if m.is_nan()
        ));

        // Without an index the cell size is never used
        assert!(Scene::new(dot, TraceConfig::default().with_index(false, -0.5)).is_ok());
    }

    #[test]
    fn test_brute_force_builds_no_index() {
        let scene = Scene::new(
            vec![lamp(Point::new(0.5, 0.5), 0.1)],
            TraceConfig::default().with_index(false, 0.1),
        )
        .unwrap();
        assert!(scene.index().is_none());
        let hit = scene.nearest(&Ray::new(Point::new(0.1, 0.5), Vector::X)).unwrap();
        assert!((hit.distance - 0.3).abs() < 1e-5);
    }
}
