//! Per-firework GPU buffers.
//!
//! Each firework gets an instance buffer holding one [`ParticleVertex`] per
//! particle and a small uniform buffer holding its [`MaterialUniform`]. The
//! bind group ties the uniform to the firework's sprite texture.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::allocator::ResourceAllocator;
use crate::error::FireworkError;
use crate::firework::FireworkMaterial;
use crate::sampler::ParticleBuffer;

use super::texture::GpuTexture;

/// Per-particle instance data, matching `Particle` in the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub size_factor: f32,
    pub time_multiplier: f32,
}

impl ParticleVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32];

    /// Instance-rate layout for the render pipeline.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Interleave a particle buffer.
    pub fn from_particles(particles: &ParticleBuffer) -> Vec<Self> {
        particles
            .iter()
            .map(|(position, size_factor, time_multiplier)| Self {
                position: position.to_array(),
                size_factor,
                time_multiplier,
            })
            .collect()
    }
}

/// Material parameters, matching `Material` in the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 3],
    pub size: f32,
    pub origin: [f32; 3],
    pub progress: f32,
    pub resolution: [f32; 2],
    pub _pad: [f32; 2],
}

impl From<&FireworkMaterial> for MaterialUniform {
    fn from(material: &FireworkMaterial) -> Self {
        Self {
            color: material.color.to_array(),
            size: material.size,
            origin: material.origin.to_array(),
            progress: material.progress,
            resolution: material.resolution.to_array(),
            _pad: [0.0; 2],
        }
    }
}

/// GPU side of one firework.
pub struct FireworkGpu {
    vertex_buffer: wgpu::Buffer,
    material_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_count: u32,
}

impl FireworkGpu {
    /// Record the draw for this firework. Expects the pipeline and camera
    /// bind group to be set already.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..6, 0..self.instance_count);
    }
}

/// Bind group layout for group 1 (material, sprite, sampler).
pub fn material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<MaterialUniform>() as u64),
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// [`ResourceAllocator`] backed by a wgpu device.
///
/// Borrowed from [`super::GpuState::allocator`] for the duration of a frame
/// or a spawn.
pub struct WgpuAllocator<'a> {
    pub(super) device: &'a wgpu::Device,
    pub(super) queue: &'a wgpu::Queue,
    pub(super) layout: &'a wgpu::BindGroupLayout,
    pub(super) palette: &'a [GpuTexture],
}

impl ResourceAllocator for WgpuAllocator<'_> {
    type Resources = FireworkGpu;

    fn allocate(
        &mut self,
        particles: &ParticleBuffer,
        material: &FireworkMaterial,
    ) -> Result<FireworkGpu, FireworkError> {
        let sprite = self.palette.get(material.texture.index()).ok_or_else(|| {
            FireworkError::ResourceAllocation(format!(
                "texture slot {} not in palette of {}",
                material.texture.index(),
                self.palette.len()
            ))
        })?;

        let vertices = ParticleVertex::from_particles(particles);
        let bytes = std::mem::size_of_val(vertices.as_slice()) as u64;
        let max = self.device.limits().max_buffer_size;
        if bytes > max {
            return Err(FireworkError::ResourceAllocation(format!(
                "{} particles need {bytes} bytes, device limit is {max}",
                particles.len()
            )));
        }
        let instance_count = u32::try_from(vertices.len()).map_err(|_| {
            FireworkError::ResourceAllocation(format!("{} particles exceed the instance limit", vertices.len()))
        })?;

        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firework Particles"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let material_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firework Material"),
            contents: bytemuck::bytes_of(&MaterialUniform::from(material)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Firework Bind Group"),
            layout: self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: material_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&sprite.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sprite.sampler),
                },
            ],
        });

        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            vertex_buffer.destroy();
            material_buffer.destroy();
            return Err(FireworkError::ResourceAllocation(error.to_string()));
        }

        Ok(FireworkGpu {
            vertex_buffer,
            material_buffer,
            bind_group,
            instance_count,
        })
    }

    fn update(&mut self, resources: &mut FireworkGpu, material: &FireworkMaterial) {
        self.queue.write_buffer(
            &resources.material_buffer,
            0,
            bytemuck::bytes_of(&MaterialUniform::from(material)),
        );
    }

    fn release(&mut self, resources: FireworkGpu) {
        resources.vertex_buffer.destroy();
        resources.material_buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sample_shell;
    use crate::textures::TextureHandle;
    use glam::{Vec2, Vec3};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_layouts_match_shader() {
        assert_eq!(std::mem::size_of::<ParticleVertex>(), 20);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
        assert_eq!(ParticleVertex::layout().array_stride, 20);
        assert_eq!(ParticleVertex::layout().step_mode, wgpu::VertexStepMode::Instance);
    }

    #[test]
    fn test_material_uniform_fields() {
        let material = FireworkMaterial {
            size: 0.3,
            resolution: Vec2::new(1920.0, 1080.0),
            texture: TextureHandle::default(),
            color: Vec3::new(0.0, 1.0, 1.0),
            origin: Vec3::new(1.0, 2.0, 3.0),
            progress: 0.25,
        };
        let uniform = MaterialUniform::from(&material);
        assert_eq!(uniform.color, [0.0, 1.0, 1.0]);
        assert_eq!(uniform.origin, [1.0, 2.0, 3.0]);
        assert_eq!(uniform.resolution, [1920.0, 1080.0]);
        assert_eq!(uniform.size, 0.3);
        assert_eq!(uniform.progress, 0.25);
    }

    #[test]
    fn test_particle_interleave() {
        let mut rng = SmallRng::seed_from_u64(8);
        let particles = sample_shell(16, 1.0, &mut rng);
        let vertices = ParticleVertex::from_particles(&particles);
        assert_eq!(vertices.len(), 16);
        assert_eq!(vertices[3].position, particles.positions()[3].to_array());
        assert_eq!(vertices[3].size_factor, particles.size_factors()[3]);
        assert_eq!(vertices[3].time_multiplier, particles.time_multipliers()[3]);
    }
}
