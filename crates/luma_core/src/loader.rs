//! JSON scene loading.
//!
//! A scene file is a serialized [`Scene`]:
//!
//! ```json
//! {
//!   "spheres": [
//!     {
//!       "position": [0.0, -0.5, -10.0],
//!       "radius": 1.0,
//!       "material": { "diffuse": [0.0, 0.0, 1.0], "albedo": 1.0, "metallic": 0.001, "roughness": 0.4 }
//!     }
//!   ]
//! }
//! ```
//!
//! Spheres without a `material` get the grey default.

use std::path::Path;

use thiserror::Error;

use crate::scene::{Scene, SceneError};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Invalid(#[from] SceneError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a JSON scene file and validate it.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let scene = load_scene_from_str(&text)?;

    log::info!("Loaded {} spheres from {}", scene.len(), path.display());
    Ok(scene)
}

/// Parse and validate a scene from a JSON string.
pub fn load_scene_from_str(text: &str) -> LoadResult<Scene> {
    let scene: Scene = serde_json::from_str(text)?;
    scene.validate()?;
    Ok(scene)
}
