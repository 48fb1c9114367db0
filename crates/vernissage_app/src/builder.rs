use std::path::Path;

use crate::config::{AppConfig, ConfigError};
use crate::runner::run_internal;
use crate::traits::VernissageApp;

/// Entry point: wraps an app with its window configuration.
///
/// ```no_run
/// # use vernissage_app::{App, VernissageApp};
/// struct Empty;
/// impl VernissageApp for Empty {}
///
/// App::new(Empty).with_title("empty").with_size(640, 480).run()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct App<A: VernissageApp> {
    app: A,
    config: AppConfig,
}

impl<A: VernissageApp> App<A> {
    pub fn new(app: A) -> Self {
        Self {
            app,
            config: AppConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the configuration with the contents of `path`.
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(self.with_config(AppConfig::load(path)?))
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.window.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.window.width = width;
        self.config.window.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.window.vsync = vsync;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Opens the window and runs until it is closed, Escape is pressed, the
    /// app requests an exit or a callback fails.
    pub fn run(self) -> anyhow::Result<()> {
        run_internal(self.app, self.config)
    }
}
