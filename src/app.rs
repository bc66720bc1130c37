// Window, event loop and the per-frame update/draw cycle

use anyhow::{Context, Result};
use glam::Vec2;
use log::{error, info};
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::config::LaunchConfig;
use crate::engine::game_loop::GameLoop;
use crate::engine::input::PointerInput;
use crate::engine::renderer::Renderer;
use crate::game::{FrameInput, GameScreen, Screen, ScreenContext};

/// Everything that lives for the duration of the event loop
struct App {
    window: Arc<Window>,
    renderer: Renderer,
    pointer: PointerInput,
    clock: GameLoop,
    screen: Box<dyn Screen>,
}

impl App {
    fn screen_size(&self) -> Vec2 {
        let size = self.renderer.size();
        Vec2::new(size.width as f32, size.height as f32)
    }

    fn enter(&mut self) -> Result<()> {
        let screen_size = self.screen_size();
        let mut ctx = ScreenContext {
            textures: &mut self.renderer,
            screen_size,
        };
        self.screen.on_enter(&mut ctx)
    }

    fn exit(&mut self) {
        let screen_size = self.screen_size();
        let mut ctx = ScreenContext {
            textures: &mut self.renderer,
            screen_size,
        };
        self.screen.on_exit(&mut ctx);
        info!(
            "Ran {} frames in {:.1}s (last {:.1} fps), {} textures still resident",
            self.clock.frame_count(),
            self.clock.elapsed().as_secs_f32(),
            self.clock.fps(),
            self.renderer.texture_count()
        );
    }

    fn frame(&mut self) -> Result<()> {
        let delta = self.clock.begin_frame();
        let input = FrameInput {
            pointer: self.pointer.state(),
            screen_size: self.screen_size(),
        };
        let list = self.screen.on_frame(delta, &input);
        self.renderer.render(&list)
    }
}

/// Open the window and run until it is closed
pub fn run(config: LaunchConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let renderer = pollster::block_on(Renderer::new(
        window.clone(),
        config.software,
        &config.assets,
    ))
    .context("creating renderer")?;

    let mut app = App {
        window,
        renderer,
        pointer: PointerInput::new(),
        clock: GameLoop::new(),
        screen: Box::new(GameScreen::new()),
    };
    app.enter().context("entering game screen")?;

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    app.renderer.resize(physical_size);
                }
                WindowEvent::RedrawRequested => {
                    if let Err(e) = app.frame() {
                        error!("Render failed: {:#}", e);
                        elwt.exit();
                    }
                }
                other => {
                    app.pointer.process_event(&other);
                }
            },
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            Event::LoopExiting => {
                app.exit();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
