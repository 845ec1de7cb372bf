//! Light-transport estimator.
//!
//! Each path is a chain of layers, one per surface hit. A layer keeps a share
//! of its surface color given by the Fresnel-Schlick reflectance and passes
//! the rest to the reflected sample behind it. Blending is done on squared
//! colors and the final result is square-rooted, which approximates
//! energy-correct mixing. Because squaring undoes the previous square root,
//! the whole chain reduces to a weighted sum of squared layer colors that is
//! accumulated front to back, with no recursion.

use luma_core::{Material, Scene};
use luma_math::{reflect, Interval, Ray, Vec3};
use rand::RngCore;

use crate::camera::Camera;
use crate::config::{Color, RenderConfig};
use crate::intersect::{trace_ray, Intersection};
use crate::sampling::{cosine_hemisphere, jitter};

/// Offset along the normal for rays leaving a surface.
pub const SURFACE_EPSILON: f32 = 1e-3;

/// Reflection jitter at roughness 1.
pub const ROUGHNESS_SPREAD: f32 = 0.5;

/// Fresnel-Schlick reflectance for a boundary whose relative index is `metallic`.
///
/// `r0 = (1 - m) / (1 + m)`, `r = r0 + (1 - r0)(1 - cosθ)^5`, clamped to
/// [0, 1]. When Snell's law has no transmitted direction
/// (`sin²θt = (1 - cos²θ) / m² > 1`) the boundary is totally reflecting and
/// the result is 1. A reflectance of 1 keeps the surface color; lower values
/// let the mirrored path through, so `metallic == 0` is purely diffuse.
pub fn fresnel_schlick(cos_theta: f32, metallic: f32) -> f32 {
    let cos_theta = Interval::UNIT.clamp(cos_theta);

    let sin2_t = (1.0 - cos_theta * cos_theta) / (metallic * metallic);
    if !(sin2_t <= 1.0) {
        return 1.0;
    }

    let r0 = (1.0 - metallic) / (1.0 + metallic);
    Interval::UNIT.clamp(r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5))
}

/// Exponential tonemap `1 - e^-x`, per channel.
#[inline]
pub fn tonemap(color: Color) -> Color {
    let map = |x: f32| 1.0 - (-x).exp();
    Color::new(map(color.x), map(color.y), map(color.z))
}

/// Quadratic blend: `sqrt(lerp(a², b², t))`.
#[inline]
pub fn perceptual_mix(a: Color, b: Color, t: f32) -> Color {
    sqrt((a * a).lerp(b * b, t))
}

#[inline]
fn sqrt(color: Color) -> Color {
    Color::new(
        color.x.max(0.0).sqrt(),
        color.y.max(0.0).sqrt(),
        color.z.max(0.0).sqrt(),
    )
}

/// Radiance estimator over a scene.
///
/// Holds only shared references, so one estimator serves every row of a
/// parallel frame; randomness comes from the generator passed per call.
#[derive(Clone, Copy)]
pub struct Estimator<'a> {
    scene: &'a Scene,
    config: &'a RenderConfig,
}

impl<'a> Estimator<'a> {
    pub fn new(scene: &'a Scene, config: &'a RenderConfig) -> Self {
        Self { scene, config }
    }

    /// Tonemapped color for pixel (x, y), averaged over `config.paths`
    /// independent estimates.
    pub fn render_pixel(&self, camera: &Camera, x: usize, y: usize, rng: &mut dyn RngCore) -> Color {
        let origin = camera.position();
        let direction = camera.ray(x, y);

        let paths = self.config.paths.max(1);
        let mut pixel_color = Color::ZERO;
        for _ in 0..paths {
            pixel_color += tonemap(self.radiance(origin, direction, rng));
        }

        pixel_color / paths as f32
    }

    /// Linear, unclamped radiance along a camera ray.
    pub fn radiance(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> Color {
        let config = self.config;
        let mut ray = Ray::new(origin, jitter(direction, config.noise, rng));

        // Sum of squared layer colors, and the share not yet claimed by a layer
        let mut energy = Color::ZERO;
        let mut throughput = 1.0;

        for bounce in 0..config.bounces {
            let hit = trace_ray(self.scene, &ray);
            let Some(id) = hit.object else {
                let sky = config.sky.color(ray.direction);
                energy += throughput * sky * sky;
                break;
            };

            let material = &self.scene[id].material;
            let surface = self.surface_color(&hit, material, rng);

            let view = ray.direction.normalize();
            let last = bounce + 1 == config.bounces || material.metallic <= 0.0;
            let reflectance = if last {
                1.0
            } else {
                fresnel_schlick((-view).dot(hit.normal), material.metallic)
            };

            energy += throughput * reflectance * surface * surface;
            throughput *= 1.0 - reflectance;
            if last || throughput <= 0.0 {
                break;
            }

            let reflected = reflect(view, hit.normal);
            let mut scattered = jitter(reflected, material.roughness * ROUGHNESS_SPREAD, rng);
            if scattered.dot(hit.normal) <= 0.0 {
                scattered = reflected;
            }

            ray = Ray::new(
                hit.position + hit.normal * SURFACE_EPSILON,
                jitter(scattered, config.noise, rng),
            );
        }

        sqrt(energy)
    }

    /// Diffuse color of a hit, with the indirect term blended in by albedo.
    fn surface_color(&self, hit: &Intersection, material: &Material, rng: &mut dyn RngCore) -> Color {
        let diffuse = material.diffuse;
        if material.albedo <= 0.0 || !self.config.indirect_enabled() {
            return diffuse;
        }

        let indirect = self.indirect(hit, rng);
        diffuse.lerp(diffuse * indirect, material.albedo)
    }

    /// Mean color seen by cosine-weighted hemisphere samples around the hit.
    fn indirect(&self, hit: &Intersection, rng: &mut dyn RngCore) -> Color {
        let origin = hit.position + hit.normal * SURFACE_EPSILON;
        let samples = self.config.samples;

        let mut total = Color::ZERO;
        for _ in 0..samples {
            let direction = cosine_hemisphere(hit.normal, rng);
            let cast = trace_ray(self.scene, &Ray::new(origin, direction));

            total += match cast.object {
                Some(id) => self.scene[id].material.diffuse,
                None => self.config.sky.color(direction),
            };
        }

        total / samples as f32
    }
}
