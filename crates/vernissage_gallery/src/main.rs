//! `vernissage`: opens the gallery window.
//!
//! Usage: `vernissage [CONFIG]`, where `CONFIG` defaults to
//! `vernissage.toml` in the working directory.  Asset paths in the
//! configuration are resolved against the directory holding it.

mod scene;
mod scene_config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use vernissage_app::{config, logging, App, AppConfig, AppContext, VernissageApp, WgpuDevice};

use crate::scene::Scene;
use crate::scene_config::{GalleryConfig, SceneConfig};

const DEFAULT_CONFIG: &str = "vernissage.toml";

struct Gallery {
    config: SceneConfig,
    root: PathBuf,
    scene: Option<Scene<WgpuDevice>>,
}

impl VernissageApp for Gallery {
    fn setup(&mut self, ctx: &mut AppContext) -> anyhow::Result<()> {
        let scene = Scene::build(ctx.device, &self.config, &self.root, ctx.camera.handle())
            .context("building the gallery")?;
        log::info!(
            "gallery built: floor, {} panels, dome with {} vertices",
            scene.panel_count(),
            scene.dome().vertex_count()
        );
        self.scene = Some(scene);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut AppContext) -> anyhow::Result<()> {
        if let Some(scene) = &self.scene {
            scene.render(ctx.device, &ctx.time)?;
        }
        Ok(())
    }

    fn on_resize(&mut self, _new_size: (u32, u32), ctx: &mut AppContext) {
        if let Some(scene) = &self.scene {
            scene.push_projection(ctx.device);
        }
    }
}

fn run(path: &Path, app_config: AppConfig) -> anyhow::Result<()> {
    let gallery: GalleryConfig = config::load(path)?;
    let root = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    log::debug!("resolving assets against {}", root.display());

    App::new(Gallery {
        config: gallery.scene,
        root,
        scene: None,
    })
    .with_config(app_config)
    .run()
}

fn main() -> ExitCode {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let (app_config, config_error) = match AppConfig::load(&path) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Err(e) = logging::init(&app_config.log.level) {
        eprintln!("logger already installed: {e}");
    }
    if let Some(e) = config_error {
        log::error!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&path, app_config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
