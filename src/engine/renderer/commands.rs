// Draw commands: a frame described as data, executed later by the renderer

use glam::{Mat4, Vec2};

use crate::engine::assets::TextureHandle;
use crate::engine::physics::DebugGeometry;

/// RGBA color with components in 0..1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

/// A textured quad in world units
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub texture: TextureHandle,
    /// Lower-left corner
    pub position: Vec2,
    pub size: Vec2,
    /// Texture coordinate at the upper-right corner; values above 1 tile
    /// textures sampled with repeat
    pub uv_max: Vec2,
    pub tint: Color,
}

/// One step of a frame
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear the frame buffer
    Clear(Color),
    /// Draw a textured quad with the list's projection
    Sprite(SpriteDraw),
    /// Draw line segments with their own view-projection
    DebugLines {
        view_proj: Mat4,
        geometry: DebugGeometry,
    },
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderList {
    /// Projection used for sprites
    pub projection: Mat4,
    pub commands: Vec<DrawCommand>,
}

impl RenderList {
    pub fn new(projection: Mat4) -> Self {
        Self {
            projection,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// The last clear color requested, if any
    pub fn clear_color(&self) -> Option<Color> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }

    /// Sprites in draw order
    pub fn sprites(&self) -> impl Iterator<Item = &SpriteDraw> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Sprite(sprite) => Some(sprite),
            _ => None,
        })
    }

    /// Debug line batches in draw order
    pub fn debug_lines(&self) -> impl Iterator<Item = (&Mat4, &DebugGeometry)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::DebugLines {
                view_proj,
                geometry,
            } => Some((view_proj, geometry)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::AssetId;
    use crate::engine::renderer::TextureWrap;

    #[test]
    fn test_color_from_rgb8() {
        let color = Color::from_rgb8(255, 0, 51);
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert!((color.b - 0.2).abs() < 1e-6);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_render_list_queries() {
        let mut list = RenderList::new(Mat4::IDENTITY);
        assert_eq!(list.clear_color(), None);

        list.push(DrawCommand::Clear(Color::BLACK));
        list.push(DrawCommand::Sprite(SpriteDraw {
            texture: TextureHandle::new(AssetId::for_texture("a.png", TextureWrap::Clamp)),
            position: Vec2::ZERO,
            size: Vec2::ONE,
            uv_max: Vec2::ONE,
            tint: Color::WHITE,
        }));
        list.push(DrawCommand::DebugLines {
            view_proj: Mat4::IDENTITY,
            geometry: DebugGeometry::default(),
        });
        list.push(DrawCommand::Clear(Color::WHITE));

        assert_eq!(list.clear_color(), Some(Color::WHITE));
        assert_eq!(list.sprites().count(), 1);
        assert_eq!(list.debug_lines().count(), 1);
    }
}
