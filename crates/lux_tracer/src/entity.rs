//! Scene entities: a shape plus the optical material it is made of.

use crate::{Shape, Traceable};
use lux_math::{Bounds, Color, Point, Ray, Vector};

/// Default half-angle of a spot light cone, in radians.
pub const DEFAULT_SPOT_HALF_ANGLE: f32 = 0.03;

/// Optical properties of an entity.
///
/// Only ideal specular reflection and refraction are modelled. By convention
/// `reflectivity + refractivity <= 1`, but nothing enforces it; brighter
/// materials simply add energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Light emitted by the surface itself
    pub emissive: Color,
    /// Fraction of incoming light mirrored off the surface
    pub reflectivity: f32,
    /// Fraction of incoming light transmitted through the surface
    pub refractivity: f32,
    /// One index of refraction per traced channel
    pub refractive_indices: Vec<f32>,
}

impl Material {
    /// A purely emissive (or, with black, purely absorbing) material.
    pub fn emissive(emissive: Color) -> Self {
        Self {
            emissive,
            reflectivity: 0.0,
            refractivity: 0.0,
            refractive_indices: Vec::new(),
        }
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    /// Make the material transmissive with one refraction index per channel.
    pub fn with_refraction(mut self, refractivity: f32, indices: impl Into<Vec<f32>>) -> Self {
        self.refractivity = refractivity;
        self.refractive_indices = indices.into();
        self
    }

    /// Index of refraction for a channel, if the material has one.
    pub fn refractive_index(&self, channel: usize) -> Option<f32> {
        self.refractive_indices.get(channel).copied()
    }
}

/// Directional mask of a spot light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotCone {
    direction: Vector,
    cos_half_angle: f32,
}

impl SpotCone {
    pub fn new(direction: Vector, half_angle: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            cos_half_angle: half_angle.cos(),
        }
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    pub fn cos_half_angle(&self) -> f32 {
        self.cos_half_angle
    }

    /// Whether light leaving along the principal direction can reach a ray heading `d`.
    #[inline]
    pub fn admits(&self, d: Vector) -> bool {
        d.dot(-self.direction) >= self.cos_half_angle
    }
}

/// An object in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    shape: Shape,
    material: Material,
    cone: Option<SpotCone>,
}

impl Entity {
    pub fn new(shape: Shape, material: Material) -> Self {
        Self {
            shape,
            material,
            cone: None,
        }
    }

    /// An entity that is only visible from within a cone around `direction`.
    ///
    /// `direction` is where the light shines towards; rays looking back
    /// along it within `half_angle` radians can hit the entity.
    pub fn spot_light(shape: Shape, material: Material, direction: Vector, half_angle: f32) -> Self {
        Self {
            shape,
            material,
            cone: Some(SpotCone::new(direction, half_angle)),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn cone(&self) -> Option<&SpotCone> {
        self.cone.as_ref()
    }

    pub fn refractive_index(&self, channel: usize) -> Option<f32> {
        self.material.refractive_index(channel)
    }

    /// Nearest boundary point hit by the ray, after applying the spot light mask.
    pub fn intersect(&self, ray: &Ray) -> Option<Point> {
        match &self.cone {
            Some(cone) if !cone.admits(ray.direction) => None,
            _ => self.shape.intersect(ray),
        }
    }
}

impl Traceable for Entity {
    fn contained(&self, bounds: &Bounds) -> bool {
        self.shape.contained(bounds)
    }

    fn intersect(&self, ray: &Ray) -> Option<Point> {
        Entity::intersect(self, ray)
    }
}
