// Asset management system
//
// Textures are read from `<asset root>/textures/`, decoded and uploaded to
// the GPU once, then referenced through handles.

mod handle;
mod loader;
mod manager;

pub use handle::{AssetId, TextureHandle, TextureInfo};
pub use loader::AssetLoader;
pub use manager::AssetManager;

use crate::engine::renderer::texture::TextureWrap;

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can load and release textures on behalf of a screen
pub trait TextureStore {
    /// Load a texture by file name
    fn load_texture(&mut self, name: &str, wrap: TextureWrap) -> Result<TextureInfo, AssetError>;

    /// Release a texture previously loaded through this store
    fn unload_texture(&mut self, handle: TextureHandle);
}
