use rapier2d::prelude::*;

use super::world::DebugData;

/// Segments used to approximate a circle outline
const CIRCLE_SEGMENTS: usize = 16;

/// A colored vertex of the physics wireframe, in meters
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Line-list wireframe of every collider in a physics world.
///
/// Pairs of entries in `indices` form one line segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugGeometry {
    pub vertices: Vec<DebugVertex>,
    pub indices: Vec<u16>,
}

impl DebugGeometry {
    /// Build the wireframe for all colliders
    pub fn from_world(data: &DebugData<'_>) -> Self {
        let mut geometry = Self::default();

        for (_handle, collider) in data.colliders.iter() {
            let parent_body = collider.parent().and_then(|h| data.rigid_bodies.get(h));

            // Get color based on body type
            let color = match parent_body.map(|b| b.body_type()) {
                Some(RigidBodyType::Dynamic) => [0.0, 1.0, 0.0, 0.8], // Green for dynamic
                Some(RigidBodyType::Fixed) => [0.5, 0.5, 0.5, 0.8],   // Gray for static
                Some(_) => [0.0, 0.5, 1.0, 0.8],                      // Blue for kinematic
                None => [1.0, 1.0, 1.0, 0.8],
            };

            let transform = match (parent_body, collider.position_wrt_parent()) {
                (Some(body), Some(local)) => body.position() * local,
                _ => *collider.position(),
            };
            geometry.push_collider_shape(collider, &transform, color);
        }

        geometry
    }

    /// Number of line segments
    pub fn line_count(&self) -> usize {
        self.indices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn push_collider_shape(
        &mut self,
        collider: &Collider,
        transform: &Isometry<Real>,
        color: [f32; 4],
    ) {
        let shape = collider.shape();
        if let Some(ball) = shape.as_ball() {
            self.push_circle(transform, ball.radius, color);
        } else if let Some(cuboid) = shape.as_cuboid() {
            self.push_box(transform, cuboid.half_extents, color);
        } else {
            self.push_cross(transform, 0.5, color);
        }
    }

    fn push_vertex(&mut self, transform: &Isometry<Real>, local: Point<Real>, color: [f32; 4]) {
        let point = transform * local;
        self.vertices.push(DebugVertex {
            position: [point.x, point.y],
            color,
        });
    }

    /// Circle outline plus a radius line so rotation is visible
    fn push_circle(&mut self, transform: &Isometry<Real>, radius: Real, color: [f32; 4]) {
        let start_idx = self.vertices.len() as u16;

        for i in 0..CIRCLE_SEGMENTS {
            let angle = (i as f32 / CIRCLE_SEGMENTS as f32) * std::f32::consts::TAU;
            self.push_vertex(
                transform,
                point![angle.cos() * radius, angle.sin() * radius],
                color,
            );

            let next = (i + 1) % CIRCLE_SEGMENTS;
            self.indices.push(start_idx + i as u16);
            self.indices.push(start_idx + next as u16);
        }

        let center_idx = self.vertices.len() as u16;
        self.push_vertex(transform, point![0.0, 0.0], color);
        self.indices.push(center_idx);
        self.indices.push(start_idx);
    }

    fn push_box(&mut self, transform: &Isometry<Real>, half_extents: Vector<Real>, color: [f32; 4]) {
        let start_idx = self.vertices.len() as u16;

        let corners = [
            point![-half_extents.x, -half_extents.y],
            point![half_extents.x, -half_extents.y],
            point![half_extents.x, half_extents.y],
            point![-half_extents.x, half_extents.y],
        ];
        for corner in corners {
            self.push_vertex(transform, corner, color);
        }

        for i in 0..4 {
            self.indices.push(start_idx + i);
            self.indices.push(start_idx + (i + 1) % 4);
        }
    }

    /// Draw a cross (for unsupported shapes)
    fn push_cross(&mut self, transform: &Isometry<Real>, size: Real, color: [f32; 4]) {
        let start_idx = self.vertices.len() as u16;

        let points = [
            point![-size, 0.0],
            point![size, 0.0],
            point![0.0, -size],
            point![0.0, size],
        ];
        for point in points {
            self.push_vertex(transform, point, color);
        }

        for i in 0..4 {
            self.indices.push(start_idx + i);
        }
    }
}
