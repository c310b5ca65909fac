use crate::inputs::ShaderInputs;

/// Uniform data sent to the rain shader
/// NOTE: This struct must match WGSL alignment requirements!
/// `vec3<f32>` is 16-byte aligned, so the scalars pack into its tail.
/// Total struct size must be 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub i_resolution: [f32; 3], // offset 0
    pub i_time: f32,            // offset 12
    pub rain_amount: f32,       // offset 16
    pub glass_blur: f32,        // offset 20
    pub _pad: [f32; 2],         // offset 24 - padding to 32 bytes
}

impl From<&ShaderInputs> for Uniforms {
    fn from(inputs: &ShaderInputs) -> Self {
        Self {
            i_resolution: inputs.resolution,
            i_time: inputs.time,
            rain_amount: inputs.rain_amount,
            glass_blur: inputs.glass_blur,
            _pad: [0.0, 0.0],
        }
    }
}

impl Uniforms {
    /// Replace the resolution with the size actually being drawn
    pub fn with_surface_size(mut self, width: u32, height: u32) -> Self {
        self.i_resolution = [width as f32, height as f32, 1.0];
        self
    }
}
