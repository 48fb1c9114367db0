use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use vernissage_assets::ImportError;

/// Pipeline stage a WGSL file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point every stage file must define.
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    pub(crate) fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failure to turn shader sources into a linked program.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} stage of `{label}` failed to compile:\n{message}")]
    Compile {
        label: String,
        stage: ShaderStage,
        message: String,
    },

    #[error("failed to link `{label}`: {message}")]
    Link { label: String, message: String },
}

/// GPU-side allocation or submission failure.
///
/// None of these are retried; they indicate a lost or misconfigured device.
#[derive(Debug, Error)]
pub enum GpuResourceError {
    #[error("failed to allocate {what}: {message}")]
    Allocation { what: &'static str, message: String },

    #[error("refusing to upload an empty {0} buffer")]
    EmptyBuffer(&'static str),

    #[error("draw call issued outside of a frame")]
    NoActiveFrame,
}

/// Anything that can stop a [`RenderableGeometry`](crate::RenderableGeometry)
/// from being built.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("mesh import failed ({reason}): {0}", reason = .0.reason())]
    Import(#[from] ImportError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Gpu(#[from] GpuResourceError),
}
