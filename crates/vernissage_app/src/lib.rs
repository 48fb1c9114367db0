//! vernissage_app: window, event loop and frame pacing around a
//! [`VernissageApp`].
//!
//! The runner owns the camera and input state.  Each frame it advances the
//! clock, lets the camera consume the input, calls `update`, opens the
//! render pass and calls `draw`.

pub mod builder;
pub mod config;
pub mod context;
pub mod gpu_context;
pub mod graphics;
pub mod logging;
mod runner;
pub mod traits;

pub use builder::App;
pub use config::{AppConfig, ConfigError, LogConfig, WindowConfig};
pub use context::AppContext;
pub use gpu_context::{ContextError, GpuContext};
pub use graphics::GraphicsState;
pub use traits::VernissageApp;

pub use vernissage_core::{Camera, InputState, KeyCode, Time};
pub use vernissage_renderer::WgpuDevice;
