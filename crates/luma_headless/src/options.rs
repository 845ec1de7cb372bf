//! Options for a headless run, read from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use luma_renderer::RenderConfig;
use serde::{Deserialize, Serialize};

/// Everything a headless run needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessOptions {
    pub render: RenderConfig,
    /// Scene description; the built-in reference scene when absent
    pub scene: Option<PathBuf>,
    /// Number of frames to accumulate
    pub frames: u32,
    /// File receiving the packed framebuffer after every frame
    pub framebuffer: Option<PathBuf>,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            scene: None,
            frames: 1,
            framebuffer: None,
        }
    }
}

impl HeadlessOptions {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options from {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid options in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luma_renderer::RenderMode;

    #[test]
    fn test_empty_object_is_default() {
        let options = HeadlessOptions::from_json("{}").unwrap();
        assert_eq!(options, HeadlessOptions::default());
        assert_eq!(options.frames, 1);
        assert!(options.scene.is_none());
    }

    #[test]
    fn test_partial_options() {
        let options = HeadlessOptions::from_json(
            r#"{
                "render": { "width": 320, "height": 240, "mode": "raytrace", "seed": 3 },
                "frames": 8,
                "framebuffer": "out/luma.raw"
            }"#,
        )
        .unwrap();

        assert_eq!(options.render.width, 320);
        assert_eq!(options.render.height, 240);
        assert_eq!(options.render.mode, RenderMode::Raytrace);
        assert_eq!(options.render.seed, Some(3));
        assert_eq!(options.render.bounces, 2);
        assert_eq!(options.frames, 8);
        assert_eq!(options.framebuffer, Some(PathBuf::from("out/luma.raw")));
    }

    #[test]
    fn test_malformed_options() {
        assert!(HeadlessOptions::from_json(r#"{ "frames": "many" }"#).is_err());
        assert!(HeadlessOptions::load("/nonexistent/luma.json").is_err());
    }
}
