// Screen lifecycle: enter, per-frame update, exit

use anyhow::{Context, Result};
use glam::Vec2;
use log::{info, warn};

use super::scene::{background_color, BallScene, FrameInput, SceneTextures};
use crate::engine::assets::TextureStore;
use crate::engine::renderer::{DrawCommand, RenderList, TextureWrap};

pub const BALL_TEXTURE: &str = "ball.png";
pub const GROUND_TEXTURE: &str = "ground.png";

/// Services a screen may use while entering or leaving
pub struct ScreenContext<'a> {
    pub textures: &'a mut dyn TextureStore,
    /// Window size in pixels
    pub screen_size: Vec2,
}

/// A full-window game state driven by the application loop
pub trait Screen {
    /// Acquire resources. A failure aborts the screen.
    fn on_enter(&mut self, ctx: &mut ScreenContext<'_>) -> Result<()>;

    /// Update with the elapsed time and describe the frame to draw
    fn on_frame(&mut self, delta: f32, input: &FrameInput) -> RenderList;

    /// Release everything acquired in `on_enter`
    fn on_exit(&mut self, ctx: &mut ScreenContext<'_>);
}

/// The only screen of the demo: the ball scene with its two textures
#[derive(Default)]
pub struct GameScreen {
    scene: Option<BallScene>,
    textures: Option<SceneTextures>,
    /// Frames in which the pointer pushed the ball
    hits: u64,
}

impl GameScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the screen currently holds its world and textures
    pub fn is_active(&self) -> bool {
        self.scene.is_some() && self.textures.is_some()
    }

    #[cfg(test)]
    pub fn scene(&self) -> Option<&BallScene> {
        self.scene.as_ref()
    }
}

impl Screen for GameScreen {
    fn on_enter(&mut self, ctx: &mut ScreenContext<'_>) -> Result<()> {
        if self.is_active() {
            warn!("Game screen entered twice, keeping the current scene");
            return Ok(());
        }

        let ball = ctx
            .textures
            .load_texture(BALL_TEXTURE, TextureWrap::Clamp)
            .with_context(|| format!("loading {}", BALL_TEXTURE))?;

        let ground = match ctx.textures.load_texture(GROUND_TEXTURE, TextureWrap::Repeat) {
            Ok(ground) => ground,
            Err(e) => {
                ctx.textures.unload_texture(ball.handle);
                return Err(e).with_context(|| format!("loading {}", GROUND_TEXTURE));
            }
        };

        self.textures = Some(SceneTextures { ball, ground });
        self.scene = Some(BallScene::new(ctx.screen_size));
        info!("Game screen entered");

        Ok(())
    }

    fn on_frame(&mut self, delta: f32, input: &FrameInput) -> RenderList {
        match (self.scene.as_mut(), self.textures.as_ref()) {
            (Some(scene), Some(textures)) => {
                if scene.step(delta, input).hit {
                    self.hits += 1;
                }
                scene.render_list(textures)
            }
            _ => {
                let mut list = RenderList::new(glam::Mat4::IDENTITY);
                list.push(DrawCommand::Clear(background_color()));
                list
            }
        }
    }

    fn on_exit(&mut self, ctx: &mut ScreenContext<'_>) {
        if let Some(textures) = self.textures.take() {
            ctx.textures.unload_texture(textures.ball.handle);
            ctx.textures.unload_texture(textures.ground.handle);
        }
        if self.scene.take().is_some() {
            info!(
                "Game screen exited after {} pushes, physics world released",
                self.hits
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::{AssetError, AssetId, TextureHandle, TextureInfo};
    use crate::engine::input::PointerState;
    use std::collections::HashSet;

    /// In-memory texture store that knows a fixed set of names
    struct FakeStore {
        available: Vec<&'static str>,
        resident: HashSet<TextureHandle>,
        loads: Vec<(String, TextureWrap)>,
    }

    impl FakeStore {
        fn with(available: &[&'static str]) -> Self {
            Self {
                available: available.to_vec(),
                resident: HashSet::new(),
                loads: Vec::new(),
            }
        }
    }

    impl TextureStore for FakeStore {
        fn load_texture(
            &mut self,
            name: &str,
            wrap: TextureWrap,
        ) -> Result<TextureInfo, AssetError> {
            if !self.available.iter().any(|n| *n == name) {
                return Err(AssetError::NotFound(name.to_string()));
            }
            let handle = TextureHandle::new(AssetId::for_texture(name, wrap));
            self.resident.insert(handle);
            self.loads.push((name.to_string(), wrap));
            Ok(TextureInfo {
                handle,
                width: 200,
                height: 200,
            })
        }

        fn unload_texture(&mut self, handle: TextureHandle) {
            self.resident.remove(&handle);
        }
    }

    fn input() -> FrameInput {
        FrameInput {
            pointer: PointerState::default(),
            screen_size: Vec2::new(800.0, 600.0),
        }
    }

    #[test]
    fn test_enter_loads_textures_and_builds_scene() {
        let mut store = FakeStore::with(&[BALL_TEXTURE, GROUND_TEXTURE]);
        let mut screen = GameScreen::new();

        let mut ctx = ScreenContext {
            textures: &mut store,
            screen_size: Vec2::new(800.0, 600.0),
        };
        screen.on_enter(&mut ctx).unwrap();

        assert!(screen.is_active());
        assert_eq!(store.resident.len(), 2);
        assert_eq!(
            store.loads,
            vec![
                (BALL_TEXTURE.to_string(), TextureWrap::Clamp),
                (GROUND_TEXTURE.to_string(), TextureWrap::Repeat),
            ]
        );
    }

    #[test]
    fn test_missing_texture_aborts_enter_without_leaking() {
        let mut store = FakeStore::with(&[BALL_TEXTURE]);
        let mut screen = GameScreen::new();

        let mut ctx = ScreenContext {
            textures: &mut store,
            screen_size: Vec2::new(800.0, 600.0),
        };
        let err = screen.on_enter(&mut ctx).unwrap_err();

        assert!(format!("{:#}", err).contains(GROUND_TEXTURE));
        assert!(!screen.is_active());
        assert!(store.resident.is_empty());
    }

    #[test]
    fn test_exit_releases_everything() {
        let mut store = FakeStore::with(&[BALL_TEXTURE, GROUND_TEXTURE]);
        let mut screen = GameScreen::new();

        let mut ctx = ScreenContext {
            textures: &mut store,
            screen_size: Vec2::new(800.0, 600.0),
        };
        screen.on_enter(&mut ctx).unwrap();
        screen.on_exit(&mut ctx);

        assert!(!screen.is_active());
        assert!(screen.scene().is_none());
        assert!(store.resident.is_empty());
    }

    #[test]
    fn test_second_enter_keeps_scene() {
        let mut store = FakeStore::with(&[BALL_TEXTURE, GROUND_TEXTURE]);
        let mut screen = GameScreen::new();
        let mut ctx = ScreenContext {
            textures: &mut store,
            screen_size: Vec2::new(800.0, 600.0),
        };
        screen.on_enter(&mut ctx).unwrap();
        screen.on_enter(&mut ctx).unwrap();

        assert!(screen.is_active());
        assert_eq!(store.loads.len(), 2);
    }

    #[test]
    fn test_frame_before_enter_only_clears() {
        let mut screen = GameScreen::new();
        let list = screen.on_frame(1.0 / 60.0, &input());

        assert_eq!(list.commands, vec![DrawCommand::Clear(background_color())]);
    }

    #[test]
    fn test_frame_steps_scene() {
        let mut store = FakeStore::with(&[BALL_TEXTURE, GROUND_TEXTURE]);
        let mut screen = GameScreen::new();
        let mut ctx = ScreenContext {
            textures: &mut store,
            screen_size: Vec2::new(800.0, 600.0),
        };
        screen.on_enter(&mut ctx).unwrap();

        let list = screen.on_frame(0.1, &input());

        assert_eq!(list.sprites().count(), 2);
        assert_eq!(screen.hits, 0);
        let scene = screen.scene().unwrap();
        assert!(scene.ball_position().y < 1.5);
    }

    #[test]
    fn test_tap_on_ball_counts_push() {
        let mut store = FakeStore::with(&[BALL_TEXTURE, GROUND_TEXTURE]);
        let mut screen = GameScreen::new();
        let mut ctx = ScreenContext {
            textures: &mut store,
            screen_size: Vec2::new(800.0, 600.0),
        };
        screen.on_enter(&mut ctx).unwrap();

        let tap = FrameInput {
            pointer: PointerState::pressed_at(Vec2::new(400.0, 300.0)),
            screen_size: Vec2::new(800.0, 600.0),
        };
        screen.on_frame(1.0 / 60.0, &tap);
        screen.on_frame(1.0 / 60.0, &input());

        assert_eq!(screen.hits, 1);
    }
}
