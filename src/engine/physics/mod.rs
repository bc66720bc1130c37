// Physics system using rapier2d

pub mod body;
mod debug;
mod world;

pub use body::presets;
pub use debug::{DebugGeometry, DebugVertex};
pub use world::{ColliderHandle, PhysicsWorld, RigidBodyHandle};

// rapier's point!/vector! macros expand to `nalgebra::` paths
pub use rapier2d::prelude::{nalgebra, point, vector};
