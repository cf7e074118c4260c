//! Sprite textures on the GPU.

use crate::textures::{TextureConfig, TexturePalette};

/// Uploaded sprite with its sampler.
pub struct GpuTexture {
    /// Full view of the sprite.
    pub view: wgpu::TextureView,
    /// Sampler built from the sprite's filter and address mode.
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Create the texture and copy `config`'s pixels into it.
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, config: &TextureConfig, label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };

        // Linear format: the red channel is read back as coverage, not color
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &config.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(config.width * 4),
                rows_per_image: Some(config.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Soft glows: smooth filtering, and no wrap bleeding at the quad edge
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { view, sampler }
    }

    /// Upload every palette entry, in slot order.
    pub fn upload_palette(device: &wgpu::Device, queue: &wgpu::Queue, palette: &TexturePalette) -> Vec<Self> {
        palette
            .iter()
            .enumerate()
            .map(|(i, config)| Self::upload(device, queue, config, &format!("Sprite {}", i + 1)))
            .collect()
    }
}
