//! Frame orchestration: camera update, accumulation and packing.

use std::time::{Duration, Instant};

use luma_core::{Scene, SceneError};
use luma_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use crate::accumulator::{accumulate, Accumulator};
use crate::camera::{Camera, CameraError, CameraInput};
use crate::config::{Color, ConfigError, RenderConfig};
use crate::shading::Estimator;

/// Mixes the row index into the frame seed.
const ROW_SEED_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// Errors from building or driving a [`Renderer`].
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid camera: {0}")]
    Camera(#[from] CameraError),

    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),

    #[error("target buffer holds {actual} pixels, expected {expected}")]
    TargetSize { expected: usize, actual: usize },
}

/// Pack a display color as `0xAARRGGBB` with opaque alpha.
///
/// Channels are scaled to [0, 255] and clamped before truncation, so
/// out-of-range values saturate instead of wrapping.
#[inline]
pub fn pack_color(color: Color) -> u32 {
    let byte = |v: f32| Interval::new(0.0, 255.0).clamp(v * 255.0) as u32;
    0xFF00_0000 | (byte(color.x) << 16) | (byte(color.y) << 8) | byte(color.z)
}

/// Progressive renderer owning the scene, camera and accumulation buffer.
pub struct Renderer {
    config: RenderConfig,
    scene: Scene,
    camera: Camera,
    accumulator: Accumulator,
    rng: StdRng,
    frametime: Duration,
}

impl Renderer {
    /// Validate `config` and `scene` and build a camera from the config's
    /// intrinsics.
    pub fn new(config: RenderConfig, scene: Scene) -> Result<Self, RenderError> {
        config.validate()?;
        scene.validate()?;

        let camera = Camera::new(config.fov, config.near, config.far, config.width, config.height)?;
        let accumulator = Accumulator::new(camera.pixel_count());

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "Renderer {}x{}: {} spheres, {:?} mode, {} bounces, {} samples, {} paths",
            config.width,
            config.height,
            scene.len(),
            config.mode,
            config.bounces,
            config.samples,
            config.paths
        );

        Ok(Self {
            config,
            scene,
            camera,
            accumulator,
            rng,
            frametime: Duration::ZERO,
        })
    }

    /// Render one frame into `target`, using the wall time of the previous
    /// call as the camera's time step.
    pub fn render_to(&mut self, target: &mut [u32], input: &CameraInput) -> Result<(), RenderError> {
        let start = Instant::now();
        self.render_to_with_dt(target, input, self.frametime)?;
        self.frametime = start.elapsed();
        Ok(())
    }

    /// Render one frame into `target` with an explicit camera time step.
    ///
    /// `target` is row-major with one packed color per pixel and must hold
    /// exactly `width * height` entries.
    pub fn render_to_with_dt(
        &mut self,
        target: &mut [u32],
        input: &CameraInput,
        dt: Duration,
    ) -> Result<(), RenderError> {
        let expected = self.camera.pixel_count();
        if target.len() != expected {
            return Err(RenderError::TargetSize {
                expected,
                actual: target.len(),
            });
        }

        let start = Instant::now();

        self.camera.update(dt, input);
        if self.camera.take_moved() || !self.config.accumulate {
            self.accumulator.reset();
            log::debug!("Accumulation reset");
        }

        // Zero-sized output (minimized window)
        if expected == 0 {
            return Ok(());
        }

        let frame_count = self.accumulator.begin_frame();
        let frame_seed = self.rng.next_u64();

        let estimator = Estimator::new(&self.scene, &self.config);
        let camera = &self.camera;
        let width = camera.width() as usize;

        target
            .par_chunks_mut(width)
            .zip(self.accumulator.data_mut().par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (row, sums))| {
                let mut rng = StdRng::seed_from_u64(frame_seed ^ (y as u64).wrapping_mul(ROW_SEED_MULTIPLIER));

                for (x, (pixel, sum)) in row.iter_mut().zip(sums.iter_mut()).enumerate() {
                    let sample = estimator.render_pixel(camera, x, y, &mut rng);
                    *pixel = pack_color(accumulate(sum, sample, frame_count));
                }
            });

        log::trace!("Frame {} rendered in {:?}", frame_count, start.elapsed());

        Ok(())
    }

    /// Change the output resolution. Zero dimensions are accepted; rendering
    /// then does nothing until a usable size arrives.
    ///
    /// Hosts may call this every frame; an unchanged size keeps the
    /// accumulated image.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.camera.width() && height == self.camera.height() {
            return;
        }

        log::debug!("Resizing to {}x{}", width, height);
        self.config.width = width;
        self.config.height = height;
        self.camera.resize(width, height);
        self.accumulator.resize(self.camera.pixel_count());
    }

    /// Replace the camera, e.g. to start from a different placement.
    ///
    /// The renderer adopts the camera's intrinsics and resolution into its
    /// config and restarts accumulation.
    pub fn set_camera(&mut self, camera: Camera) {
        self.config.fov = camera.fov();
        self.config.near = camera.near();
        self.config.far = camera.far();
        self.config.width = camera.width();
        self.config.height = camera.height();
        self.accumulator.resize(camera.pixel_count());
        self.camera = camera;
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Frames folded into the current image.
    pub fn frame_count(&self) -> u32 {
        self.accumulator.frame_count()
    }

    /// Wall time of the last [`Renderer::render_to`] call.
    pub fn frametime(&self) -> Duration {
        self.frametime
    }

    pub fn width(&self) -> u32 {
        self.camera.width()
    }

    pub fn height(&self) -> u32 {
        self.camera.height()
    }
}
