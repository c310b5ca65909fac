use super::init::*;
use super::render::*;
use super::uniforms::Uniforms;
use crate::hal::HalError;
use crate::inputs::ShaderInputs;
use crate::texture::TextureImage;

/// Intermediate struct for GPU resources during initialization
struct GpuResources {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    surface_format: wgpu::TextureFormat,
}

/// Bound background texture
struct Channel {
    texture: wgpu::Texture,
    sampler: wgpu::Sampler,
    bind_group: wgpu::BindGroup,
}

/// Rain-on-glass renderer drawing into one canvas
pub struct RainRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    pipeline: wgpu::RenderPipeline,
    channel: Channel,
    uniforms: Uniforms,
}

impl RainRenderer {
    /// Create a renderer for `canvas` with `texture` bound to `iChannel0`.
    ///
    /// The canvas drawing-buffer size must already be set; it is capped at
    /// the device's texture limit.
    pub async fn new(
        canvas: web_sys::HtmlCanvasElement,
        texture: &TextureImage,
        inputs: &ShaderInputs,
    ) -> Result<Self, String> {
        let (instance, surface, width, height) = Self::create_surface(canvas)?;
        let gpu = Self::setup_gpu(&instance, &surface, width, height).await?;

        let uniforms = Uniforms::from(inputs)
            .with_surface_size(gpu.surface_config.width, gpu.surface_config.height);
        let uniform_buffer = create_uniform_buffer(&gpu.device, &uniforms);
        let bind_group_layout = create_bind_group_layout(&gpu.device);
        let pipeline = create_pipeline(&gpu.device, &bind_group_layout, gpu.surface_format);

        check_texture_size(&gpu.device, texture).map_err(|e| e.to_string())?;
        let channel = Self::create_channel(
            &gpu.device,
            &gpu.queue,
            &bind_group_layout,
            &uniform_buffer,
            texture,
        );

        Ok(Self {
            device: gpu.device,
            queue: gpu.queue,
            surface,
            surface_config: gpu.surface_config,
            bind_group_layout,
            uniform_buffer,
            pipeline,
            channel,
            uniforms,
        })
    }

    /// Create the wgpu instance and surface from canvas
    #[cfg(target_arch = "wasm32")]
    fn create_surface(
        canvas: web_sys::HtmlCanvasElement,
    ) -> Result<(wgpu::Instance, wgpu::Surface<'static>, u32, u32), String> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| format!("Failed to create surface: {}", e))?;

        Ok((instance, surface, width, height))
    }

    /// Create the wgpu instance and surface from canvas (non-WASM stub)
    #[cfg(not(target_arch = "wasm32"))]
    fn create_surface(
        _canvas: web_sys::HtmlCanvasElement,
    ) -> Result<(wgpu::Instance, wgpu::Surface<'static>, u32, u32), String> {
        Err("RainRenderer only supports WASM targets".to_string())
    }

    /// Setup GPU device, queue, and surface configuration
    async fn setup_gpu(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<GpuResources, String> {
        let (device, queue, adapter) = create_device(instance, surface).await?;
        let max = device.limits().max_texture_dimension_2d;
        let (width, height) = fit_surface_size(width, height, max);
        let (surface_config, surface_format) =
            configure_surface(surface, &adapter, &device, width, height)?;

        Ok(GpuResources {
            device,
            queue,
            surface_config,
            surface_format,
        })
    }

    fn create_channel(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        image: &TextureImage,
    ) -> Channel {
        let (texture, view) = upload_texture(device, queue, image);
        let sampler = create_sampler(device, image.sampling());
        let bind_group = create_bind_group(device, layout, uniform_buffer, &view, &sampler);
        Channel {
            texture,
            sampler,
            bind_group,
        }
    }

    /// Largest drawing-buffer edge the device accepts
    pub fn max_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Current drawing-buffer size
    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Store new inputs; they are uploaded with the next frame
    pub fn set_inputs(&mut self, inputs: &ShaderInputs) {
        self.uniforms = Uniforms::from(inputs)
            .with_surface_size(self.surface_config.width, self.surface_config.height);
    }

    /// Upload `image` and bind it to `iChannel0`, releasing the previous texture.
    ///
    /// Called between frames only, so no submitted frame still samples the
    /// released texture.
    pub fn bind_texture(&mut self, image: &TextureImage) -> Result<(), HalError> {
        check_texture_size(&self.device, image)?;

        let channel = Self::create_channel(
            &self.device,
            &self.queue,
            &self.bind_group_layout,
            &self.uniform_buffer,
            image,
        );
        let previous = std::mem::replace(&mut self.channel, channel);
        previous.texture.destroy();
        Ok(())
    }

    /// Resize the drawing surface
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = fit_surface_size(width, height, self.max_dimension());

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);

        self.uniforms = self.uniforms.with_surface_size(width, height);
    }

    /// Render one frame
    pub fn render(&mut self) -> Result<(), HalError> {
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.uniforms]),
        );

        let output = self.get_surface_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Rain Encoder"),
            });

        render_rain_pass(&mut encoder, &self.pipeline, &self.channel.bind_group, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get surface texture with error handling
    fn get_surface_texture(&mut self) -> Result<wgpu::SurfaceTexture, HalError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                Err(HalError::FrameSkipped)
            }
            Err(wgpu::SurfaceError::Timeout) => Err(HalError::FrameSkipped),
            Err(wgpu::SurfaceError::OutOfMemory) => Err(HalError::Gpu),
        }
    }

    /// Release GPU resources: the rendering context first, then the
    /// pipeline, then the texture, then the device
    pub fn dispose(self) {
        let Self {
            device,
            queue,
            surface,
            pipeline,
            channel,
            uniform_buffer,
            bind_group_layout,
            ..
        } = self;

        drop(surface);
        drop(pipeline);
        drop(bind_group_layout);

        let Channel {
            texture,
            sampler,
            bind_group,
        } = channel;
        drop(bind_group);
        drop(sampler);
        texture.destroy();
        drop(texture);

        uniform_buffer.destroy();
        drop(queue);
        device.destroy();
    }
}

fn check_texture_size(device: &wgpu::Device, image: &TextureImage) -> Result<(), HalError> {
    let max = device.limits().max_texture_dimension_2d;
    if image.width() == 0 || image.height() == 0 || image.width() > max || image.height() > max {
        return Err(HalError::InvalidArgument);
    }
    Ok(())
}
