//! The firework render shader and its validation.
//!
//! The WGSL is checked with naga before it reaches wgpu, so a broken shader
//! is reported as a [`ShaderError`] with a readable diagnostic instead of a
//! device panic.

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::ShaderError;

/// Vertex + fragment shader for firework sprites.
///
/// Bindings:
///
/// | group | binding | contents                                   |
/// |-------|---------|--------------------------------------------|
/// | 0     | 0       | camera uniform (`view_proj`)               |
/// | 1     | 0       | [`MaterialUniform`](crate::gpu::MaterialUniform) |
/// | 1     | 1       | sprite texture                             |
/// | 1     | 2       | sprite sampler                             |
pub const FIREWORK_SHADER: &str = include_str!("firework.wgsl");

/// Vertex entry point of [`FIREWORK_SHADER`].
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment entry point of [`FIREWORK_SHADER`].
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Validate the built-in firework shader.
pub fn validate_firework_shader() -> Result<(), ShaderError> {
    validate_wgsl(FIREWORK_SHADER, "Firework")
}

/// Parse and validate WGSL source.
pub fn validate_wgsl(source: &str, stage: &'static str) -> Result<(), ShaderError> {
    let module = wgsl::parse_str(source).map_err(|err| ShaderError {
        message: err.emit_to_string(source),
        stage,
    })?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator.validate(&module).map_err(|err| ShaderError {
        message: err.to_string(),
        stage,
    })?;

    Ok(())
}
