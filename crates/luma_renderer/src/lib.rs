//! Luma Renderer - progressive CPU sphere tracer
//!
//! Renders a scene of analytic spheres into a packed 32-bit framebuffer.
//! Every call to [`Renderer::render_to`] adds one sample per pixel to a
//! running average that restarts whenever the camera moves.

mod accumulator;
mod camera;
mod config;
mod intersect;
mod renderer;
pub mod sampling;
mod shading;

pub use accumulator::{accumulate, Accumulator};
pub use camera::{
    Camera, CameraError, CameraInput, BOOST_FACTOR, LOOK_SENSITIVITY, MOVEMENT_SPEED, PITCH_LIMIT,
};
pub use config::{Color, ConfigError, RenderConfig, RenderMode, Sky};
pub use intersect::{sphere_roots, trace_ray, Intersection};
pub use renderer::{pack_color, RenderError, Renderer};
pub use shading::{
    fresnel_schlick, perceptual_mix, tonemap, Estimator, ROUGHNESS_SPREAD, SURFACE_EPSILON,
};

/// Re-export math types from luma_math
pub use luma_math::{Interval, Ray, Vec2, Vec3};
