//! Render settings supplied by the host application.

use luma_math::{Interval, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color type alias (linear RGB, unclamped until tonemapping)
pub type Color = Vec3;

/// Errors for settings the renderer cannot work with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("resolution must be non-zero, got {width}x{height}")]
    ZeroResolution { width: u32, height: u32 },

    #[error("at least one bounce is required")]
    ZeroBounces,

    #[error("at least one path per pixel is required")]
    ZeroPaths,

    #[error("noise must be finite and non-negative, got {0}")]
    InvalidNoise(f32),

    #[error("sky colors must be finite and non-negative")]
    InvalidSky,
}

/// Which light-transport terms are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Direct and specular terms only; no indirect hemisphere samples.
    Raytrace,
    /// Direct, specular and stochastic indirect terms.
    #[default]
    Pathtrace,
}

/// Environment seen by rays that leave the scene.
///
/// A vertical gradient from `horizon` (horizontal rays) to `zenith`
/// (rays pointing straight up). Rays below the horizon see the horizon
/// color. Equal colors give a constant sky.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sky {
    pub zenith: Color,
    pub horizon: Color,
}

impl Default for Sky {
    fn default() -> Self {
        Self {
            zenith: Color::new(0.6, 0.7, 0.9),
            horizon: Color::ONE,
        }
    }
}

impl Sky {
    /// A sky of a single color.
    pub fn constant(color: Color) -> Self {
        Self {
            zenith: color,
            horizon: color,
        }
    }

    /// Sky color for a ray travelling along `direction`.
    pub fn color(&self, direction: Vec3) -> Color {
        let unit_direction = direction.normalize_or_zero();
        let a = Interval::UNIT.clamp(unit_direction.y);
        self.horizon.lerp(self.zenith, a)
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Maximum number of traced segments per path (primary ray included)
    pub bounces: u32,
    /// Indirect hemisphere samples per surface hit
    pub samples: u32,
    /// Independent estimates averaged per pixel per frame
    pub paths: u32,
    pub mode: RenderMode,
    /// Half-extent of the isotropic jitter added to every traced direction
    pub noise: f32,
    pub sky: Sky,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// When false, every frame starts from an empty accumulation buffer
    pub accumulate: bool,
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            bounces: 2,
            samples: 2,
            paths: 1,
            mode: RenderMode::Pathtrace,
            noise: 0.001,
            sky: Sky::default(),
            fov: 70.0,
            near: 0.1,
            far: 100.0,
            accumulate: true,
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Check the settings that are not camera intrinsics.
    ///
    /// `fov`, `near` and `far` are checked when the camera is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroResolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.bounces == 0 {
            return Err(ConfigError::ZeroBounces);
        }
        if self.paths == 0 {
            return Err(ConfigError::ZeroPaths);
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(ConfigError::InvalidNoise(self.noise));
        }

        let sky_ok = [self.sky.zenith, self.sky.horizon]
            .iter()
            .all(|c| c.is_finite() && c.min_element() >= 0.0);
        if !sky_ok {
            return Err(ConfigError::InvalidSky);
        }

        Ok(())
    }

    /// Number of pixels in a frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the stochastic indirect term is evaluated at all.
    pub fn indirect_enabled(&self) -> bool {
        self.mode == RenderMode::Pathtrace && self.samples > 0
    }
}
