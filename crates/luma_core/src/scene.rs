//! Scene types for Luma.
//!
//! A scene is a flat arena of analytic spheres. Objects are referred to by
//! their `ObjectId` (an index into the arena), never by reference, so an
//! intersection result stays valid even if the caller holds it across a
//! scene rebuild.

use std::ops::Index;

use luma_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a sphere or material carries values the tracer cannot use.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("sphere {index}: radius must be finite and positive, got {radius}")]
    InvalidRadius { index: usize, radius: f32 },

    #[error("sphere {index}: position must be finite, got {position:?}")]
    InvalidPosition { index: usize, position: Vec3 },

    #[error("sphere {index}: material {field} must be within [0, 1], got {value}")]
    InvalidMaterial {
        index: usize,
        field: &'static str,
        value: f32,
    },

    #[error("sphere {index}: diffuse color must be finite and non-negative, got {diffuse:?}")]
    InvalidDiffuse { index: usize, diffuse: Vec3 },
}

/// Surface response of a sphere.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse color (linear RGB, usually 0-1)
    pub diffuse: Vec3,

    /// Amount of indirect light received (0 = none, 1 = full)
    pub albedo: f32,

    /// Strength of reflections (0 = purely diffuse)
    pub metallic: f32,

    /// Dispersion of reflections (0 = mirror, 1 = very rough)
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Vec3::new(0.5, 0.5, 0.5), // Grey default
            albedo: 1.0,
            metallic: 0.0,
            roughness: 0.5,
        }
    }
}

impl Material {
    /// Create a material from all four attributes.
    pub fn new(diffuse: Vec3, albedo: f32, metallic: f32, roughness: f32) -> Self {
        Self {
            diffuse,
            albedo,
            metallic,
            roughness,
        }
    }

    /// A purely diffuse material of the given color.
    pub fn diffuse(diffuse: Vec3) -> Self {
        Self {
            diffuse,
            metallic: 0.0,
            roughness: 0.0,
            ..Default::default()
        }
    }

    fn validate(&self, index: usize) -> Result<(), SceneError> {
        if !self.diffuse.is_finite() || self.diffuse.min_element() < 0.0 {
            return Err(SceneError::InvalidDiffuse {
                index,
                diffuse: self.diffuse,
            });
        }

        for (field, value) in [
            ("albedo", self.albedo),
            ("metallic", self.metallic),
            ("roughness", self.roughness),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SceneError::InvalidMaterial {
                    index,
                    field,
                    value,
                });
            }
        }

        Ok(())
    }
}

/// An analytic sphere primitive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Center in world space
    pub position: Vec3,

    pub radius: f32,

    #[serde(default)]
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(position: Vec3, radius: f32, material: Material) -> Self {
        Self {
            position,
            radius,
            material,
        }
    }

    fn validate(&self, index: usize) -> Result<(), SceneError> {
        if !self.position.is_finite() {
            return Err(SceneError::InvalidPosition {
                index,
                position: self.position,
            });
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SceneError::InvalidRadius {
                index,
                radius: self.radius,
            });
        }
        self.material.validate(index)
    }
}

/// Stable handle to a sphere inside a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// An ordered collection of spheres.
///
/// Insertion order only matters for tie-breaking between coincident hits.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    /// Create an empty scene. Every ray against it is a sky miss.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from spheres, validating each one.
    pub fn from_spheres(spheres: impl IntoIterator<Item = Sphere>) -> Result<Self, SceneError> {
        let mut scene = Self::new();
        for sphere in spheres {
            scene.add(sphere)?;
        }
        Ok(scene)
    }

    /// The five-sphere scene the viewer starts with: three small colored
    /// spheres, a large mirror-ish backdrop and a ground sphere.
    pub fn reference() -> Self {
        let small = |x: f32, diffuse: Vec3| {
            Sphere::new(
                Vec3::new(x, -0.5, -10.0),
                1.0,
                Material::new(diffuse, 1.0, 0.001, 0.4),
            )
        };

        Self {
            spheres: vec![
                small(0.0, Vec3::new(0.0, 0.0, 1.0)),
                Sphere::new(
                    Vec3::new(0.0, -102.0, 0.0),
                    100.0,
                    Material::new(Vec3::splat(0.6), 1.0, 0.1, 0.5),
                ),
                small(3.0, Vec3::new(0.0, 1.0, 0.0)),
                small(6.0, Vec3::new(1.0, 0.0, 0.0)),
                Sphere::new(
                    Vec3::new(3.0, -0.5, -23.0),
                    10.0,
                    Material::new(Vec3::ONE, 1.0, 0.4, 0.0),
                ),
            ],
        }
    }

    /// Add a sphere, returning its handle.
    pub fn add(&mut self, sphere: Sphere) -> Result<ObjectId, SceneError> {
        let id = ObjectId(self.spheres.len());
        sphere.validate(id.0)?;
        self.spheres.push(sphere);
        Ok(id)
    }

    /// Check every sphere; used after deserializing.
    pub fn validate(&self) -> Result<(), SceneError> {
        self.spheres
            .iter()
            .enumerate()
            .try_for_each(|(index, sphere)| sphere.validate(index))
    }

    /// Look up a sphere by handle.
    pub fn get(&self, id: ObjectId) -> Option<&Sphere> {
        self.spheres.get(id.0)
    }

    /// Iterate spheres together with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Sphere)> {
        self.spheres
            .iter()
            .enumerate()
            .map(|(index, sphere)| (ObjectId(index), sphere))
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl Index<ObjectId> for Scene {
    type Output = Sphere;

    fn index(&self, id: ObjectId) -> &Sphere {
        &self.spheres[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scene_is_valid() {
        let scene = Scene::reference();
        assert_eq!(scene.len(), 5);
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_add_returns_sequential_ids() {
        let mut scene = Scene::new();
        let a = scene.add(Sphere::new(Vec3::ZERO, 1.0, Material::default())).unwrap();
        let b = scene.add(Sphere::new(Vec3::X, 2.0, Material::default())).unwrap();

        assert_eq!(a, ObjectId(0));
        assert_eq!(b, ObjectId(1));
        assert_eq!(scene[b].radius, 2.0);
        assert!(scene.get(ObjectId(2)).is_none());
    }

    #[test]
    fn test_rejects_bad_radius() {
        let mut scene = Scene::new();
        let err = scene
            .add(Sphere::new(Vec3::ZERO, 0.0, Material::default()))
            .unwrap_err();

        assert_eq!(err, SceneError::InvalidRadius { index: 0, radius: 0.0 });
        assert!(scene.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_material() {
        let material = Material::new(Vec3::ONE, 1.0, 1.5, 0.0);
        let err = Scene::from_spheres([Sphere::new(Vec3::ZERO, 1.0, material)]).unwrap_err();

        assert!(matches!(
            err,
            SceneError::InvalidMaterial { field: "metallic", .. }
        ));
    }

    #[test]
    fn test_rejects_nan_material() {
        let material = Material::new(Vec3::ONE, f32::NAN, 0.0, 0.0);
        let err = Scene::from_spheres([Sphere::new(Vec3::ZERO, 1.0, material)]).unwrap_err();

        assert!(matches!(err, SceneError::InvalidMaterial { field: "albedo", .. }));
    }

    #[test]
    fn test_iter_preserves_order() {
        let scene = Scene::reference();
        let ids: Vec<_> = scene.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }
}
