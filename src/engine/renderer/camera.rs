// Orthographic camera for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// 2D orthographic camera.
///
/// The viewport is expressed in world units and does not have to match the
/// window size in pixels; `unproject` takes the window size separately.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space (center of the view)
    pub position: Vec2,
    /// Camera zoom level (1.0 = normal, 2.0 = zoomed in 2x)
    pub zoom: f32,
    /// Viewport width in world units
    viewport_width: f32,
    /// Viewport height in world units
    viewport_height: f32,
    /// View-projection matrix
    combined: Mat4,
}

impl Camera {
    /// Create a camera looking at the middle of a viewport whose lower-left
    /// corner is the world origin
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            position: Vec2::new(viewport_width / 2.0, viewport_height / 2.0),
            zoom: 1.0,
            viewport_width,
            viewport_height,
            combined: Mat4::IDENTITY,
        };
        camera.update();
        camera
    }

    /// Recompute the view-projection matrix
    pub fn update(&mut self) {
        let half_width = (self.viewport_width / 2.0) / self.zoom;
        let half_height = (self.viewport_height / 2.0) / self.zoom;

        self.combined = Mat4::orthographic_rh(
            self.position.x - half_width,
            self.position.x + half_width,
            self.position.y - half_height,
            self.position.y + half_height,
            -100.0, // Near plane
            100.0,  // Far plane
        );
    }

    /// Get the view-projection matrix
    pub fn combined(&self) -> Mat4 {
        self.combined
    }

    /// Viewport size in world units
    pub fn viewport_size(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Convert window coordinates (pixels, y down) to world coordinates
    pub fn unproject(&self, screen_pos: Vec2, screen_size: Vec2) -> Vec2 {
        let ndc = Vec3::new(
            (screen_pos.x / screen_size.x) * 2.0 - 1.0,
            1.0 - (screen_pos.y / screen_size.y) * 2.0,
            0.0,
        );

        self.combined.inverse().project_point3(ndc).truncate()
    }
}

/// Camera uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}
