//! vernissage_core: scene-side primitives shared by the asset, renderer and
//! app crates.
//!
//! | Module       | Responsibility                                          |
//! |--------------|---------------------------------------------------------|
//! | `camera`     | Fly camera + read-only `CameraHandle`                   |
//! | `controller` | Key bindings and motion parameters for the camera       |
//! | `input`      | Keyboard / mouse state fed by the event loop            |
//! | `interface`  | Attribute locations and uniform names used by shaders   |
//! | `time`       | Frame clock                                             |
//! | `transform`  | `Placement` and model-matrix composition                |

pub mod camera;
pub mod controller;
pub mod input;
pub mod interface;
pub mod time;
pub mod transform;

pub use camera::{Camera, CameraHandle, CameraMatrices};
pub use controller::FlyController;
pub use input::{InputState, KeyCode, MouseButton};
pub use time::{Time, TimeClock};
pub use transform::{compose_model_matrix, Placement};

pub use glam;
