// Textured quad rendering

use std::ops::Range;

use super::{CameraUniform, RenderList, SpriteDraw};
use crate::engine::assets::{AssetManager, TextureHandle};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

/// Corner order: bottom-left, bottom-right, top-right, top-left
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Vertex for 2D sprite rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    /// Position in world units
    pub position: [f32; 2],
    /// Texture coordinates (UV)
    pub tex_coords: [f32; 2],
    /// Tint color (RGBA)
    pub color: [f32; 4],
}

impl SpriteVertex {
    /// Get the vertex buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Tex Coords
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// The four corners of a sprite. Image rows run top to bottom, so v grows
/// downward while world y grows upward.
pub fn quad_vertices(sprite: &SpriteDraw) -> [SpriteVertex; 4] {
    let min = sprite.position;
    let max = sprite.position + sprite.size;
    let uv = sprite.uv_max;
    let color = sprite.tint.to_array();

    [
        SpriteVertex {
            position: [min.x, min.y],
            tex_coords: [0.0, uv.y],
            color,
        },
        SpriteVertex {
            position: [max.x, min.y],
            tex_coords: [uv.x, uv.y],
            color,
        },
        SpriteVertex {
            position: [max.x, max.y],
            tex_coords: [uv.x, 0.0],
            color,
        },
        SpriteVertex {
            position: [min.x, max.y],
            tex_coords: [0.0, 0.0],
            color,
        },
    ]
}

/// CPU-side geometry for one frame of sprites
#[derive(Debug, Default)]
pub struct SpriteBatch {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u16>,
    /// Texture and index range of each sprite, in draw order
    pub draws: Vec<(TextureHandle, Range<u32>)>,
}

impl SpriteBatch {
    /// Rebuild the batch from a render list
    pub fn fill(&mut self, list: &RenderList) {
        self.vertices.clear();
        self.indices.clear();
        self.draws.clear();

        for sprite in list.sprites() {
            let base = self.vertices.len() as u16;
            let first_index = self.indices.len() as u32;

            self.vertices.extend_from_slice(&quad_vertices(sprite));
            self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
            self.draws
                .push((sprite.texture, first_index..self.indices.len() as u32));
        }
    }
}

/// Sprite renderer: one pipeline, one dynamic vertex/index buffer pair
pub struct SpriteRenderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    batch: SpriteBatch,
}

impl SpriteRenderer {
    /// Create a new sprite renderer
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        // Create camera bind group layout
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        // Create texture bind group layout
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[SpriteVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        // Room for a handful of quads; grown on demand
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Vertex Buffer"),
            size: (16 * 4 * std::mem::size_of::<SpriteVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Index Buffer"),
            size: (16 * QUAD_INDICES.len() * std::mem::size_of::<u16>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::new(Mat4::IDENTITY)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            texture_layout,
            batch: SpriteBatch::default(),
        }
    }

    /// Layout every sprite texture's bind group must follow
    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }

    /// Upload the projection and the sprite geometry of a render list
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, list: &RenderList) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform::new(list.projection)]),
        );

        self.batch.fill(list);
        if self.batch.draws.is_empty() {
            return;
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&self.batch.vertices);
        if vertex_bytes.len() as u64 > self.vertex_buffer.size() {
            self.vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Vertex Buffer"),
                contents: vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        } else {
            queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        }

        let index_bytes: &[u8] = bytemuck::cast_slice(&self.batch.indices);
        if index_bytes.len() as u64 > self.index_buffer.size() {
            self.index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Index Buffer"),
                contents: index_bytes,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            });
        } else {
            queue.write_buffer(&self.index_buffer, 0, index_bytes);
        }
    }

    /// Draw the prepared sprites. Sprites whose texture is gone are skipped.
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>, assets: &'a AssetManager) {
        if self.batch.draws.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        for (handle, range) in &self.batch.draws {
            let Some(texture) = assets.get_texture(*handle) else {
                log::trace!("Skipping sprite with unloaded texture {:?}", handle);
                continue;
            };
            render_pass.set_bind_group(1, &texture.bind_group, &[]);
            render_pass.draw_indexed(range.clone(), 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::AssetId;
    use crate::engine::renderer::{Color, DrawCommand, TextureWrap};
    use glam::Vec2;

    fn sprite(name: &str, position: Vec2, size: Vec2, uv_max: Vec2) -> SpriteDraw {
        SpriteDraw {
            texture: TextureHandle::new(AssetId::for_texture(name, TextureWrap::Clamp)),
            position,
            size,
            uv_max,
            tint: Color::WHITE,
        }
    }

    #[test]
    fn test_quad_corners_and_uvs() {
        let quad = quad_vertices(&sprite(
            "ground.png",
            Vec2::new(10.0, 20.0),
            Vec2::new(100.0, 50.0),
            Vec2::new(4.0, 2.0),
        ));

        assert_eq!(quad[0].position, [10.0, 20.0]);
        assert_eq!(quad[2].position, [110.0, 70.0]);
        assert_eq!(quad[0].tex_coords, [0.0, 2.0]);
        assert_eq!(quad[1].tex_coords, [4.0, 2.0]);
        assert_eq!(quad[3].tex_coords, [0.0, 0.0]);
        assert_eq!(quad[0].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_batch_ranges_follow_draw_order() {
        let mut list = RenderList::new(Mat4::IDENTITY);
        list.push(DrawCommand::Clear(Color::BLACK));
        list.push(DrawCommand::Sprite(sprite("ball.png", Vec2::ZERO, Vec2::ONE, Vec2::ONE)));
        list.push(DrawCommand::Sprite(sprite("ground.png", Vec2::ZERO, Vec2::ONE, Vec2::ONE)));

        let mut batch = SpriteBatch::default();
        batch.fill(&list);

        assert_eq!(batch.vertices.len(), 8);
        assert_eq!(batch.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_eq!(batch.draws.len(), 2);
        assert_eq!(batch.draws[0].1, 0..6);
        assert_eq!(batch.draws[1].1, 6..12);
        assert_eq!(batch.draws[1].0.id(), AssetId::for_texture("ground.png", TextureWrap::Clamp));

        // Refilling replaces the previous frame
        batch.fill(&RenderList::new(Mat4::IDENTITY));
        assert!(batch.vertices.is_empty());
        assert!(batch.draws.is_empty());
    }
}
