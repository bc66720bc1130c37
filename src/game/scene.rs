// The ball scene: world setup, per-frame stepping and frame description

use glam::{Mat4, Vec2, Vec3};
use log::debug;

use crate::core::math::{meters_to_pixels, pixels_to_meters, to_pixels, PIXEL_TO_METER, VIEWPORT_WIDTH};
use crate::engine::assets::TextureInfo;
use crate::engine::input::PointerState;
use crate::engine::physics::presets::{self, BALL_RADIUS, GROUND_HALF_HEIGHT};
use crate::engine::physics::{
    nalgebra, point, vector, ColliderHandle, DebugGeometry, PhysicsWorld, RigidBodyHandle,
};
use crate::engine::renderer::{Camera, Color, DrawCommand, RenderList, SpriteDraw};

/// Downward acceleration in m/s²
pub const GRAVITY: f32 = -3.0;

/// Solver effort per step
pub const VELOCITY_ITERATIONS: usize = 6;
pub const POSITION_ITERATIONS: usize = 2;

/// Force applied to the ball when it is touched, in newtons
pub const TAP_FORCE: f32 = 1.0;

/// Height/width ratio used when the screen size is unknown (800x600)
const DEFAULT_SCREEN_RATIO: f32 = 0.75;

/// Background color (103, 69, 117)
pub fn background_color() -> Color {
    Color::from_rgb8(103, 69, 117)
}

/// What the scene reads from the outside world each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub pointer: PointerState,
    /// Window size in pixels
    pub screen_size: Vec2,
}

/// Outcome of one frame step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Whether the pointer hit the ball and pushed it
    pub hit: bool,
}

/// Textures the scene draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneTextures {
    pub ball: TextureInfo,
    pub ground: TextureInfo,
}

/// One dynamic ball above one static ground box.
///
/// Physics runs in meters; the camera works in pixel-units
/// (`1 / PIXEL_TO_METER` per meter), so both pointer input and sprite
/// placement convert through the same scale.
pub struct BallScene {
    world: PhysicsWorld,
    camera: Camera,
    ball: RigidBodyHandle,
    ball_collider: ColliderHandle,
}

impl BallScene {
    /// Build the world for a screen of the given size in pixels
    pub fn new(screen_size: Vec2) -> Self {
        let ratio = if screen_size.x > 0.0 && screen_size.y > 0.0 {
            screen_size.y / screen_size.x
        } else {
            DEFAULT_SCREEN_RATIO
        };
        let viewport_height = VIEWPORT_WIDTH * ratio;

        let camera = Camera::new(to_pixels(VIEWPORT_WIDTH), to_pixels(viewport_height));

        let mut world = PhysicsWorld::with_gravity(vector![0.0, GRAVITY]);
        world.set_solver_iterations(VELOCITY_ITERATIONS, POSITION_ITERATIONS);

        // Ground box centered on the origin, reaching a full viewport width
        // to either side
        let ground = world.add_rigid_body(presets::ground_body());
        world.add_collider(presets::ground_collider(VIEWPORT_WIDTH), ground);

        // Ball in the middle of the viewport
        let ball = world.add_rigid_body(presets::ball_body(
            VIEWPORT_WIDTH / 2.0,
            viewport_height / 2.0,
        ));
        let ball_collider = world.add_collider(presets::ball_collider(), ball);

        let viewport = camera.viewport_size();
        debug!(
            "Scene created: {} bodies, gravity {}, viewport {}m x {:.2}m ({:.0}x{:.0} px), ball at ({}, {:.2})",
            world.body_count(),
            world.gravity().y,
            VIEWPORT_WIDTH,
            viewport_height,
            viewport.x,
            viewport.y,
            VIEWPORT_WIDTH / 2.0,
            viewport_height / 2.0
        );

        Self {
            world,
            camera,
            ball,
            ball_collider,
        }
    }

    /// Map a window position to simulation meters: unproject through the
    /// camera into pixel-units, then scale to meters
    pub fn screen_to_meters(&self, screen_pos: Vec2, screen_size: Vec2) -> Vec2 {
        pixels_to_meters(self.camera.unproject(screen_pos, screen_size))
    }

    /// Whether a point in meters lies on the ball's first fixture
    pub fn hit_test(&self, meters: Vec2) -> bool {
        let collider = self
            .world
            .first_collider(self.ball)
            .unwrap_or(self.ball_collider);
        self.world.test_point(collider, point![meters.x, meters.y])
    }

    /// Advance one frame: pointer input, physics, camera
    pub fn step(&mut self, delta: f32, input: &FrameInput) -> StepReport {
        let mut report = StepReport::default();

        let screen_known = input.screen_size.x > 0.0 && input.screen_size.y > 0.0;
        if input.pointer.active && screen_known {
            let target = self.screen_to_meters(input.pointer.position, input.screen_size);
            if self.hit_test(target) {
                self.world
                    .apply_force_to_center(self.ball, vector![0.0, TAP_FORCE]);
                report.hit = true;
                debug!(
                    "Ball hit at ({:.3}, {:.3}), vy {:.3}",
                    target.x,
                    target.y,
                    self.ball_velocity().y
                );
            }
        }

        self.world.step(delta);
        self.camera.update();

        report
    }

    /// Describe the current frame
    pub fn render_list(&self, textures: &SceneTextures) -> RenderList {
        let mut list = RenderList::new(self.camera.combined());
        list.push(DrawCommand::Clear(background_color()));

        // Ball sprite anchored at its lower-left corner, natural texture size
        let ball_corner = self.ball_position() - Vec2::splat(BALL_RADIUS);
        list.push(DrawCommand::Sprite(SpriteDraw {
            texture: textures.ball.handle,
            position: meters_to_pixels(ball_corner),
            size: Vec2::new(textures.ball.width as f32, textures.ball.height as f32),
            uv_max: Vec2::ONE,
            tint: Color::WHITE,
        }));

        // Ground texture tiled across the viewport width, 50cm high
        let ground_size = Vec2::new(
            to_pixels(VIEWPORT_WIDTH).trunc(),
            to_pixels(GROUND_HALF_HEIGHT).trunc(),
        );
        let ground_texture = Vec2::new(
            textures.ground.width.max(1) as f32,
            textures.ground.height.max(1) as f32,
        );
        list.push(DrawCommand::Sprite(SpriteDraw {
            texture: textures.ground.handle,
            position: Vec2::ZERO,
            size: ground_size,
            uv_max: ground_size / ground_texture,
            tint: Color::WHITE,
        }));

        list.push(DrawCommand::DebugLines {
            view_proj: self.debug_matrix(),
            geometry: DebugGeometry::from_world(&self.world.debug_data()),
        });

        list
    }

    /// Camera matrix for geometry expressed in meters
    pub fn debug_matrix(&self) -> Mat4 {
        let scale = 1.0 / PIXEL_TO_METER;
        self.camera.combined() * Mat4::from_scale(Vec3::new(scale, scale, 1.0))
    }

    /// Ball center in meters
    pub fn ball_position(&self) -> Vec2 {
        self.world
            .get_rigid_body(self.ball)
            .map(|b| Vec2::new(b.translation().x, b.translation().y))
            .unwrap_or_default()
    }

    /// Ball velocity in m/s
    pub fn ball_velocity(&self) -> Vec2 {
        self.world
            .get_rigid_body(self.ball)
            .map(|b| Vec2::new(b.linvel().x, b.linvel().y))
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    #[cfg(test)]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::{AssetId, TextureHandle};
    use crate::engine::renderer::TextureWrap;
    use approx::assert_relative_eq;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);
    const DT: f32 = 1.0 / 60.0;

    fn idle() -> FrameInput {
        FrameInput {
            pointer: PointerState::default(),
            screen_size: SCREEN,
        }
    }

    fn tap(x: f32, y: f32) -> FrameInput {
        FrameInput {
            pointer: PointerState::pressed_at(Vec2::new(x, y)),
            screen_size: SCREEN,
        }
    }

    fn textures() -> SceneTextures {
        SceneTextures {
            ball: TextureInfo {
                handle: TextureHandle::new(AssetId::for_texture("ball.png", TextureWrap::Clamp)),
                width: 200,
                height: 200,
            },
            ground: TextureInfo {
                handle: TextureHandle::new(AssetId::for_texture("ground.png", TextureWrap::Repeat)),
                width: 64,
                height: 64,
            },
        }
    }

    #[test]
    fn test_world_setup() {
        let scene = BallScene::new(SCREEN);

        assert_eq!(scene.world().body_count(), 2);
        assert_eq!(scene.world().gravity().y, -3.0);
        assert_relative_eq!(scene.ball_position().x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(scene.ball_position().y, 1.5, epsilon = 1e-6);
        assert_eq!(scene.ball_velocity(), Vec2::ZERO);

        let viewport = scene.camera().viewport_size();
        assert_relative_eq!(viewport.x, 4.0 / PIXEL_TO_METER, epsilon = 0.01);
        assert_relative_eq!(viewport.y, 3.0 / PIXEL_TO_METER, epsilon = 0.01);
    }

    #[test]
    fn test_screen_center_maps_to_ball_center() {
        let scene = BallScene::new(SCREEN);
        let meters = scene.screen_to_meters(Vec2::new(400.0, 300.0), SCREEN);

        assert_relative_eq!(meters.x, 2.0, epsilon = 1e-3);
        assert_relative_eq!(meters.y, 1.5, epsilon = 1e-3);

        let bottom_left = scene.screen_to_meters(Vec2::new(0.0, 600.0), SCREEN);
        assert_relative_eq!(bottom_left.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(bottom_left.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_hit_test_matches_circle() {
        let scene = BallScene::new(SCREEN);
        let center = scene.ball_position();

        for i in -20..=20 {
            for j in -20..=20 {
                let p = center + Vec2::new(i as f32, j as f32) * 0.01;
                let distance = (p - center).length();
                if (distance - BALL_RADIUS).abs() < 1e-4 {
                    continue;
                }
                assert_eq!(
                    scene.hit_test(p),
                    distance < BALL_RADIUS,
                    "point {:?} at distance {}",
                    p,
                    distance
                );
            }
        }
    }

    #[test]
    fn test_tap_near_edge_in_pixels() {
        // The 0.11m radius spans 22 window pixels at 800x600
        let mut scene = BallScene::new(SCREEN);
        assert!(scene.step(0.0, &tap(420.0, 300.0)).hit);
        assert!(!scene.step(0.0, &tap(425.0, 300.0)).hit);
        assert!(!scene.step(0.0, &tap(100.0, 100.0)).hit);
    }

    #[test]
    fn test_inactive_pointer_never_hits() {
        let mut scene = BallScene::new(SCREEN);
        let input = FrameInput {
            pointer: PointerState {
                active: false,
                position: Vec2::new(400.0, 300.0),
            },
            screen_size: SCREEN,
        };
        assert!(!scene.step(DT, &input).hit);
    }

    #[test]
    fn test_zero_delta_leaves_ball_untouched() {
        let mut scene = BallScene::new(SCREEN);
        let before = (scene.ball_position(), scene.ball_velocity());

        scene.step(0.0, &idle());

        assert_eq!((scene.ball_position(), scene.ball_velocity()), before);
    }

    #[test]
    fn test_ball_falls_until_contact() {
        let mut scene = BallScene::new(SCREEN);
        let mut last_y = scene.ball_position().y;

        let mut steps = 0;
        while last_y > GROUND_HALF_HEIGHT + BALL_RADIUS + 0.05 {
            scene.step(DT, &idle());
            let y = scene.ball_position().y;
            assert!(y < last_y, "ball rose during free fall at step {}", steps);
            last_y = y;
            steps += 1;
            assert!(steps < 200, "ball never reached the ground");
        }
    }

    #[test]
    fn test_ball_comes_to_rest_on_ground() {
        let mut scene = BallScene::new(SCREEN);

        for _ in 0..1200 {
            scene.step(DT, &idle());
        }

        let position = scene.ball_position();
        assert_relative_eq!(position.y, GROUND_HALF_HEIGHT + BALL_RADIUS, epsilon = 0.02);
        assert_relative_eq!(position.x, 2.0, epsilon = 0.01);
        assert!(scene.ball_velocity().length() < 0.05);
    }

    #[test]
    fn test_stalled_frame_moves_ball() {
        let mut scene = BallScene::new(SCREEN);

        scene.step(2.0, &idle());

        assert!(scene.ball_position().y < 1.5);
        assert!(scene.ball_velocity().y != 0.0);
    }

    #[test]
    fn test_tap_pushes_ball_up() {
        let mut tapped = BallScene::new(SCREEN);
        let mut free = BallScene::new(SCREEN);

        let report = tapped.step(DT, &tap(400.0, 300.0));
        free.step(DT, &idle());

        assert!(report.hit);
        assert!(tapped.ball_velocity().y > free.ball_velocity().y);
        assert!(free.ball_velocity().y < 0.0);
    }

    #[test]
    fn test_render_list_contents() {
        let scene = BallScene::new(SCREEN);
        let list = scene.render_list(&textures());

        assert_eq!(list.clear_color(), Some(background_color()));
        assert!(matches!(list.commands[0], DrawCommand::Clear(_)));
        assert_eq!(list.projection, scene.camera().combined());

        let sprites: Vec<_> = list.sprites().collect();
        assert_eq!(sprites.len(), 2);

        let ball = sprites[0];
        assert_eq!(ball.texture, textures().ball.handle);
        assert_relative_eq!(ball.position.x, 1.89 / PIXEL_TO_METER, epsilon = 0.05);
        assert_relative_eq!(ball.position.y, 1.39 / PIXEL_TO_METER, epsilon = 0.05);
        assert_eq!(ball.size, Vec2::new(200.0, 200.0));

        let ground = sprites[1];
        assert_eq!(ground.position, Vec2::ZERO);
        assert_eq!(ground.size, Vec2::new(3636.0, 454.0));
        assert_relative_eq!(ground.uv_max.x, 3636.0 / 64.0);
        assert_relative_eq!(ground.uv_max.y, 454.0 / 64.0);

        let (view_proj, geometry) = list.debug_lines().next().unwrap();
        assert_eq!(*view_proj, scene.debug_matrix());
        assert!(!geometry.is_empty());
    }

    #[test]
    fn test_debug_matrix_matches_sprite_matrix() {
        // A point in meters through the debug matrix lands where its
        // pixel-unit equivalent lands through the sprite matrix
        let scene = BallScene::new(SCREEN);
        let meters = Vec3::new(2.0, 1.5, 0.0);
        let pixels = Vec3::new(2.0 / PIXEL_TO_METER, 1.5 / PIXEL_TO_METER, 0.0);

        let a = scene.debug_matrix().project_point3(meters);
        let b = scene.camera().combined().project_point3(pixels);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-4);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-4);
    }

    #[test]
    fn test_unknown_screen_size_uses_default_ratio() {
        let mut scene = BallScene::new(Vec2::ZERO);
        assert_relative_eq!(scene.ball_position().y, 1.5, epsilon = 1e-6);

        let input = FrameInput {
            pointer: PointerState::pressed_at(Vec2::ZERO),
            screen_size: Vec2::ZERO,
        };
        assert!(!scene.step(DT, &input).hit);
    }
}
