// Input handling system
//
// The demo only needs a single pointer: the mouse on desktop, the first
// finger on touch screens. Window events are folded into a `PointerState`
// that the frame loop polls once per frame.

pub mod pointer;

pub use pointer::{PointerInput, PointerState};
