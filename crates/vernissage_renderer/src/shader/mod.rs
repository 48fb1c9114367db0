//! Shader programs: WGSL sources → validated stages → linked program →
//! scoped activation.
//!
//! ```text
//! ShaderSource ──compile()──▶ CompiledShader ──link()──▶ ShaderProgram
//!                                                          │ begin()
//!                                                          ▼
//!                                                    ActiveProgram ──end()/drop──▶ inactive
//! ```

pub mod program;
pub mod reflect;
pub mod source;

pub use program::{ActiveProgram, ShaderProgram, UniformData};
pub use reflect::{BindingShape, UniformBinding, UniformKind, UniformSlot, UniformTable};
pub use source::{CompiledShader, ShaderSource};
