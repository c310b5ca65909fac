//! GPU Rain Renderer
//!
//! WebGPU (with WebGL2 fallback) renderer for the rain-on-glass shader.
//!
//! ## Design
//!
//! - Full-screen triangle rendered via vertex shader (no geometry needed)
//! - One uniform buffer holding `iResolution`, `iTime`, `rainAmount`, `glassBlur`
//! - Background texture (`iChannel0`) uploaded with its full mip chain so
//!   the shader can pick a blur level per fragment
//! - Swapping the texture rebuilds only the bind group

mod init;
mod render;
mod renderer;
mod shaders;
mod uniforms;

pub use render::fit_surface_size;
pub use renderer::RainRenderer;
pub use uniforms::Uniforms;
