use std::env;
use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use luma_core::{load_scene, Scene};
use luma_renderer::{CameraInput, Renderer};

mod options;

use options::HeadlessOptions;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let options = match env::args().nth(1) {
        Some(path) => HeadlessOptions::load(&path)?,
        None => {
            log::info!("No options file given, using defaults");
            HeadlessOptions::default()
        }
    };

    let scene = match &options.scene {
        Some(path) => load_scene(path)?,
        None => Scene::reference(),
    };

    let mut renderer = Renderer::new(options.render.clone(), scene)?;
    let mut framebuffer = vec![0u32; renderer.camera().pixel_count()];
    let input = CameraInput::idle();

    log::info!("Starting headless render of {} frames", options.frames);

    for n in 1..=options.frames {
        let start = Instant::now();
        renderer.render_to(&mut framebuffer, &input)?;

        if let Some(path) = &options.framebuffer {
            fs::write(path, bytemuck::cast_slice::<u32, u8>(&framebuffer))
                .with_context(|| format!("Failed to write framebuffer to {}", path.display()))?;
        }

        log::info!("delivered frame {} in {} ms", n, start.elapsed().as_millis());
    }

    log::info!(
        "Accumulated {} frames at {}x{}",
        renderer.frame_count(),
        renderer.width(),
        renderer.height()
    );

    Ok(())
}
