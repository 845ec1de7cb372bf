//! First-person camera with a precomputed per-pixel ray table.
//!
//! Orientation is stored as explicit yaw/pitch angles. Yaw 0, pitch 0 looks
//! down -Z with +Y up; positive yaw turns right, positive pitch looks up.
//! The direction is rebuilt from the angles on every change, and pitch is
//! clamped short of the poles so the `direction × up` basis never degenerates.

use std::f32::consts::PI;
use std::time::Duration;

use luma_math::{checked_inverse, checked_normalize, Mat4, Vec2, Vec3, Vec4};
use rayon::prelude::*;
use thiserror::Error;

/// Translation speed in world units per second.
pub const MOVEMENT_SPEED: f32 = 10.0;

/// Speed multiplier while the boost modifier is held.
pub const BOOST_FACTOR: f32 = 4.0;

/// Radians of rotation per pixel of look delta.
pub const LOOK_SENSITIVITY: f32 = 0.0006;

/// Pitch is clamped to ±89°.
pub const PITCH_LIMIT: f32 = 89.0 * PI / 180.0;

/// World up axis.
const UP: Vec3 = Vec3::Y;

/// Errors for camera intrinsics and placement the ray table cannot be built from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("resolution must be non-zero, got {width}x{height}")]
    ZeroResolution { width: u32, height: u32 },

    #[error("field of view must be within (0, 180) degrees, got {0}")]
    InvalidFov(f32),

    #[error("clip range must satisfy 0 < near < far, got near={near}, far={far}")]
    InvalidClipRange { near: f32, far: f32 },

    #[error("camera position must be finite, got {0:?}")]
    InvalidPosition(Vec3),

    #[error("camera direction must be finite and non-zero, got {0:?}")]
    InvalidDirection(Vec3),
}

/// Snapshot of the held movement keys and the look delta since the last frame.
///
/// Produced by the host's input layer once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Speed modifier (shift)
    pub boost: bool,
    /// Mouse travel in pixels; +x turns right, +y looks down
    pub look_delta: Vec2,
}

impl CameraInput {
    /// No keys held, no mouse travel.
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Camera for generating primary rays.
#[derive(Debug, Clone)]
pub struct Camera {
    // Intrinsics
    fov: f32,
    near: f32,
    far: f32,
    width: u32,
    height: u32,

    // Placement
    position: Vec3,
    yaw: f32,
    pitch: f32,
    direction: Vec3,

    // Derived, always recomputed together with their inverses
    projection: Mat4,
    projection_inverse: Mat4,
    view: Mat4,
    view_inverse: Mat4,

    rays: Vec<Vec3>,
    moved: bool,
}

impl Camera {
    /// Create a camera at `(0, 0, 6)` looking down -Z.
    ///
    /// - `fov`: vertical field of view in degrees
    /// - `near`, `far`: clip distances, `0 < near < far`
    pub fn new(fov: f32, near: f32, far: f32, width: u32, height: u32) -> Result<Self, CameraError> {
        if width == 0 || height == 0 {
            return Err(CameraError::ZeroResolution { width, height });
        }
        if !(fov > 0.0 && fov < 180.0) {
            return Err(CameraError::InvalidFov(fov));
        }
        if !(near.is_finite() && far.is_finite() && near > 0.0 && far > near) {
            return Err(CameraError::InvalidClipRange { near, far });
        }

        let mut camera = Self {
            fov,
            near,
            far,
            width,
            height,
            position: Vec3::new(0.0, 0.0, 6.0),
            yaw: 0.0,
            pitch: 0.0,
            direction: Vec3::NEG_Z,
            projection: Mat4::IDENTITY,
            projection_inverse: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            view_inverse: Mat4::IDENTITY,
            rays: Vec::new(),
            moved: false,
        };

        camera.recompute_projection();
        camera.recompute_view();
        camera.recompute_rays();

        log::info!(
            "Camera {}x{} fov={} near={} far={}",
            width,
            height,
            fov,
            near,
            far
        );

        Ok(camera)
    }

    /// Set camera position.
    pub fn with_position(mut self, position: Vec3) -> Result<Self, CameraError> {
        if !position.is_finite() {
            return Err(CameraError::InvalidPosition(position));
        }
        self.position = position;
        self.recompute_view();
        self.recompute_rays();
        self.moved = true;
        Ok(self)
    }

    /// Point the camera along `direction`.
    ///
    /// Pitch is clamped, so a near-vertical direction is bent back inside
    /// the allowed range.
    pub fn with_direction(mut self, direction: Vec3) -> Result<Self, CameraError> {
        let direction = checked_normalize(direction).ok_or(CameraError::InvalidDirection(direction))?;

        self.yaw = direction.x.atan2(-direction.z);
        self.pitch = direction.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.direction = direction_from_angles(self.yaw, self.pitch);
        self.recompute_view();
        self.recompute_rays();
        self.moved = true;
        Ok(self)
    }

    /// Point the camera at `target`.
    pub fn looking_at(self, target: Vec3) -> Result<Self, CameraError> {
        let direction = target - self.position;
        self.with_direction(direction)
    }

    /// Apply one frame of input.
    ///
    /// Translation is scaled by `dt`; rotation by the look delta only.
    /// Returns whether this call moved or rotated the camera. The view matrix
    /// and ray table are only rebuilt when it did.
    pub fn update(&mut self, dt: Duration, input: &CameraInput) -> bool {
        let mut moved = false;

        let right = self.direction.cross(UP).normalize();

        let mut translation = Vec3::ZERO;
        if input.forward {
            translation += self.direction;
        }
        if input.backward {
            translation -= self.direction;
        }
        if input.right {
            translation += right;
        }
        if input.left {
            translation -= right;
        }
        if input.up {
            translation += UP;
        }
        if input.down {
            translation -= UP;
        }

        let boost = if input.boost { BOOST_FACTOR } else { 1.0 };
        let step = translation * MOVEMENT_SPEED * boost * dt.as_secs_f32();
        if step != Vec3::ZERO {
            self.position += step;
            moved = true;
        }

        // Host input may carry NaN or infinite mouse travel; ignore it
        if input.look_delta != Vec2::ZERO && input.look_delta.is_finite() {
            let yaw = self.yaw + input.look_delta.x * LOOK_SENSITIVITY;
            let pitch = (self.pitch - input.look_delta.y * LOOK_SENSITIVITY)
                .clamp(-PITCH_LIMIT, PITCH_LIMIT);

            if yaw != self.yaw || pitch != self.pitch {
                self.yaw = yaw;
                self.pitch = pitch;
                self.direction = direction_from_angles(yaw, pitch);
                moved = true;
            }
        }

        if moved {
            self.recompute_view();
            self.recompute_rays();
            self.moved = true;

            log::debug!(
                "Camera moved to {:?}, yaw={:.3}, pitch={:.3}",
                self.position,
                self.yaw,
                self.pitch
            );
        }

        moved
    }

    /// Change the output resolution.
    ///
    /// A zero dimension (e.g. a minimized window) is accepted and leaves the
    /// ray table empty until a usable size arrives.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }

        self.width = width;
        self.height = height;
        self.moved = true;

        if width == 0 || height == 0 {
            log::warn!("Camera resized to {}x{}, ray table cleared", width, height);
            self.rays.clear();
            return;
        }

        self.recompute_projection();
        self.recompute_rays();
    }

    /// Read and clear the moved flag.
    pub fn take_moved(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    /// Whether the camera changed since the flag was last taken.
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// World-space direction through a point in normalized device coordinates.
    ///
    /// `(-1, -1)` is the bottom-left corner of the image, `(1, 1)` the top-right.
    pub fn unproject(&self, ndc: Vec2) -> Vec3 {
        unproject(&self.projection_inverse, &self.view_inverse, ndc)
    }

    /// Precomputed direction for pixel (x, y), row 0 being the top row.
    #[inline]
    pub fn ray(&self, x: usize, y: usize) -> Vec3 {
        self.rays[y * self.width as usize + x]
    }

    pub fn rays(&self) -> &[Vec3] {
        &self.rays
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn projection_inverse(&self) -> Mat4 {
        self.projection_inverse
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn view_inverse(&self) -> Mat4 {
        self.view_inverse
    }

    fn recompute_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect(), self.near, self.far);
        self.projection_inverse = invert(&self.projection, "projection");
    }

    fn recompute_view(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.position + self.direction, UP);
        self.view_inverse = invert(&self.view, "view");
    }

    fn recompute_rays(&mut self) {
        let width = self.width as usize;
        let height = self.height as usize;

        self.rays.clear();
        if width == 0 || height == 0 {
            return;
        }

        let projection_inverse = self.projection_inverse;
        let view_inverse = self.view_inverse;

        self.rays
            .par_extend((0..width * height).into_par_iter().map(move |index| {
                let ndc = pixel_to_ndc(index % width, index / width, width, height);
                unproject(&projection_inverse, &view_inverse, ndc)
            }));
    }
}

/// Unit direction for the given yaw and pitch.
fn direction_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        yaw.sin() * pitch.cos(),
        pitch.sin(),
        -yaw.cos() * pitch.cos(),
    )
}

/// Map the center of pixel (x, y) to NDC, row 0 at the top (+1).
fn pixel_to_ndc(x: usize, y: usize, width: usize, height: usize) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
        1.0 - (y as f32 + 0.5) / height as f32 * 2.0,
    )
}

fn unproject(projection_inverse: &Mat4, view_inverse: &Mat4, ndc: Vec2) -> Vec3 {
    // Point on the far plane, back in view space
    let target = *projection_inverse * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    let local = (target.truncate() / target.w).normalize();

    (*view_inverse * local.extend(0.0)).truncate().normalize()
}

/// The camera only builds matrices that are invertible for validated
/// intrinsics; a singular one is a bug, not an input error.
fn invert(m: &Mat4, what: &str) -> Mat4 {
    match checked_inverse(m) {
        Some(inverse) => inverse,
        None => panic!("{} matrix is singular: {:?}", what, m),
    }
}
