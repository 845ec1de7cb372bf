//! Luma Core - Scene description for the Luma sphere tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Sphere`, `Material`
//! - **Scene loading**: JSON scene descriptions via serde
//!
//! # Example
//!
//! ```ignore
//! use luma_core::load_scene;
//!
//! let scene = load_scene("spheres.json")?;
//! println!("Loaded {} spheres", scene.len());
//! ```

pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use loader::{load_scene, load_scene_from_str, LoadError};
pub use scene::{Material, ObjectId, Scene, SceneError, Sphere};
