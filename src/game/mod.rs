// Game layer: the ball scene and the screen that hosts it

pub mod scene;
pub mod screen;

pub use scene::FrameInput;
pub use screen::{GameScreen, Screen, ScreenContext};
