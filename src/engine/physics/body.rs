use rapier2d::prelude::*;

/// Surface properties of a collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// How heavy the shape is per unit area
    pub density: Real,
    /// How slippery the surface is (0.0 = ice)
    pub friction: Real,
    /// How bouncy the surface is (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: Real,
}

impl Material {
    pub const fn new(density: Real, friction: Real, restitution: Real) -> Self {
        Self {
            density,
            friction,
            restitution,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(1.0, 0.5, 0.0)
    }
}

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    gravity_scale: Real,
    can_sleep: bool,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Isometry::identity(),
            gravity_scale: 1.0,
            can_sleep: true,
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Isometry::identity(),
            gravity_scale: 0.0,
            can_sleep: false,
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .build()
    }
}

/// Builder for colliders, the shape plus material attached to a body
pub struct ColliderBuilder2D {
    shape: SharedShape,
    material: Material,
}

impl ColliderBuilder2D {
    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self {
            shape: SharedShape::cuboid(half_width, half_height),
            material: Material::default(),
        }
    }

    /// Create a circle-shaped collider
    pub fn circle(radius: Real) -> Self {
        Self {
            shape: SharedShape::ball(radius),
            material: Material::default(),
        }
    }

    /// Set density, friction and restitution at once
    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        ColliderBuilder::new(self.shape)
            .density(self.material.density)
            .friction(self.material.friction)
            .restitution(self.material.restitution)
            .build()
    }
}

/// Body and collider configurations used by the demo scene
pub mod presets {
    use super::*;

    /// Radius of the ball (a 22cm football)
    pub const BALL_RADIUS: Real = 0.11;

    /// Half height of the ground box (50cm)
    pub const GROUND_HALF_HEIGHT: Real = 0.5;

    /// Ball and ground share the same material
    pub const BALL_MATERIAL: Material = Material::new(0.5, 0.5, 0.5);
    pub const GROUND_MATERIAL: Material = Material::new(0.5, 0.5, 0.5);

    /// Create the ball body (dynamic, never asleep so a long step still
    /// integrates)
    pub fn ball_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .can_sleep(false)
            .build()
    }

    /// Create the ball collider (circle shape)
    pub fn ball_collider() -> Collider {
        ColliderBuilder2D::circle(BALL_RADIUS)
            .material(BALL_MATERIAL)
            .build()
    }

    /// Create the ground body (fixed, at the world origin)
    pub fn ground_body() -> RigidBody {
        BodyBuilder::new_fixed().position(0.0, 0.0).build()
    }

    /// Create the ground collider (box shape)
    pub fn ground_collider(half_width: Real) -> Collider {
        ColliderBuilder2D::box_shape(half_width, GROUND_HALF_HEIGHT)
            .material(GROUND_MATERIAL)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_builder_dynamic() {
        let body = BodyBuilder::new_dynamic().position(10.0, 20.0).build();

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert_eq!(body.translation().x, 10.0);
        assert_eq!(body.translation().y, 20.0);
        assert_eq!(body.gravity_scale(), 1.0);
    }

    #[test]
    fn test_body_builder_fixed() {
        let body = BodyBuilder::new_fixed().position(1.0, -1.0).build();

        assert_eq!(body.body_type(), RigidBodyType::Fixed);
        assert_eq!(body.gravity_scale(), 0.0);
    }

    #[test]
    fn test_collider_builder_box() {
        let collider = ColliderBuilder2D::box_shape(1.0, 2.0)
            .material(Material::new(1.0, 0.3, 0.7))
            .build();

        let cuboid = collider.shape().as_cuboid().unwrap();
        assert_eq!(cuboid.half_extents.x, 1.0);
        assert_eq!(cuboid.half_extents.y, 2.0);
        assert_eq!(collider.friction(), 0.3);
        assert_eq!(collider.restitution(), 0.7);
    }

    #[test]
    fn test_ball_preset() {
        let body = presets::ball_body(2.0, 1.5);
        let collider = presets::ball_collider();

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert_eq!(collider.shape().as_ball().unwrap().radius, 0.11);
        assert_eq!(collider.density(), 0.5);
        assert_eq!(collider.friction(), 0.5);
        assert_eq!(collider.restitution(), 0.5);
    }

    #[test]
    fn test_ground_preset() {
        let body = presets::ground_body();
        let collider = presets::ground_collider(4.0);

        assert_eq!(body.body_type(), RigidBodyType::Fixed);
        assert_eq!(body.translation().x, 0.0);
        assert_eq!(body.translation().y, 0.0);
        let cuboid = collider.shape().as_cuboid().unwrap();
        assert_eq!(cuboid.half_extents.x, 4.0);
        assert_eq!(cuboid.half_extents.y, 0.5);
    }
}
