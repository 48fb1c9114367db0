//! Names and locations shared between the CPU side and the WGSL shaders in
//! `assets/shaders`.  Changing anything here requires the matching change in
//! every shader.

/// `@location` of the object-space position attribute.
pub const VERTEX_POSITION_LOCATION: u32 = 0;
/// `@location` of the texture-coordinate attribute.
pub const UV_LOCATION: u32 = 1;
/// `@location` of the normal attribute.
pub const NORMAL_LOCATION: u32 = 2;

/// Bind group holding every uniform a program uses.
pub const UNIFORM_GROUP: u32 = 0;
/// Binding of the `f32` elapsed-time uniform.  Written by location, never by name.
pub const TIME_BINDING: u32 = 1;

pub const PROJECTION_MATRIX: &str = "projectionMatrix";
pub const VIEW_MATRIX: &str = "viewMatrix";
pub const MODEL_MATRIX: &str = "modelMatrix";
/// Flat color used by the floor and panel shaders.
pub const BASE_COLOR: &str = "baseColor";
