//! `[scene]` table of `vernissage.toml`.
//!
//! Paths are relative to the directory holding the configuration file.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub floor: FloorConfig,
    pub panels: PanelsConfig,
    pub dome: DomeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    pub half_extent: f32,
    /// World Y of the floor plane.
    pub height: f32,
    pub color: [f32; 3],
    pub vertex_shader: String,
    pub fragment_shader: String,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            half_extent: 50.0,
            height: -10.0,
            color: [0.22, 0.22, 0.22],
            vertex_shader: "assets/shaders/basic.vert.wgsl".into(),
            fragment_shader: "assets/shaders/basic.frag.wgsl".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelsConfig {
    pub count: usize,
    pub half_extent: f32,
    /// Centre of the first panel.
    pub start: [f32; 3],
    /// Distance along +X between panel centres.
    pub spacing: f32,
    pub color: [f32; 3],
    pub vertex_shader: String,
    /// Cycled through in order, one per panel.
    pub fragment_shaders: Vec<String>,
}

impl Default for PanelsConfig {
    fn default() -> Self {
        Self {
            count: 11,
            half_extent: 15.0,
            start: [-80.0, 10.0, -30.0],
            spacing: 40.0,
            color: [0.5, 0.5, 0.5],
            vertex_shader: "assets/shaders/basic.vert.wgsl".into(),
            fragment_shaders: vec![
                "assets/shaders/panel_circles.frag.wgsl".into(),
                "assets/shaders/panel_rings.frag.wgsl".into(),
                "assets/shaders/panel_waves.frag.wgsl".into(),
                "assets/shaders/panel_checker.frag.wgsl".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DomeConfig {
    pub mesh: String,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub position: [f32; 3],
    /// Yaw in degrees.
    pub angle: f32,
    pub scale: f32,
}

impl Default for DomeConfig {
    fn default() -> Self {
        Self {
            mesh: "assets/models/dome.obj".into(),
            vertex_shader: "assets/shaders/dome.vert.wgsl".into(),
            fragment_shader: "assets/shaders/basic.frag.wgsl".into(),
            position: [0.0, 30.0, 20.0],
            angle: 0.0,
            scale: 20.0,
        }
    }
}
