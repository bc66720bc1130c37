// Central texture cache

use super::{AssetError, AssetId, AssetLoader, TextureHandle, TextureInfo};
use crate::engine::renderer::texture::{Texture, TextureWrap};
use log::info;
use std::collections::HashMap;
use std::path::Path;

/// Owns every loaded texture.
///
/// Dropping a texture (through `unload_texture` or by dropping the manager)
/// releases its GPU resources.
pub struct AssetManager {
    /// Asset loader
    loader: AssetLoader,

    /// Loaded textures, keyed by name and wrap mode
    textures: HashMap<AssetId, Texture>,
}

impl AssetManager {
    /// Create a new asset manager
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        let loader = AssetLoader::new(asset_path);
        info!("Asset root: {}", loader.base_path().display());

        Self {
            loader,
            textures: HashMap::new(),
        }
    }

    /// Load a texture from disk, or return the cached one.
    ///
    /// Requests for the same file with different wrap modes get separate
    /// textures, each with its own sampler.
    pub fn load_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        wrap: TextureWrap,
    ) -> Result<TextureInfo, AssetError> {
        let id = AssetId::for_texture(name, wrap);
        if let Some(texture) = self.textures.get(&id) {
            return Ok(texture_info(id, texture));
        }

        let bytes = self.loader.load_texture_bytes(name)?;
        let texture = Texture::from_bytes(device, queue, layout, &bytes, name, wrap)?;
        info!(
            "Loaded texture {} ({}x{}, {:?})",
            name, texture.width, texture.height, wrap
        );

        let info = texture_info(id, &texture);
        self.textures.insert(id, texture);

        Ok(info)
    }

    /// Release a texture. Returns false if it was not loaded.
    pub fn unload_texture(&mut self, handle: TextureHandle) -> bool {
        self.textures.remove(&handle.id()).is_some()
    }

    /// Get a texture by handle
    pub fn get_texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(&handle.id())
    }

    /// Number of textures currently held
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

fn texture_info(id: AssetId, texture: &Texture) -> TextureInfo {
    TextureInfo {
        handle: TextureHandle::new(id),
        width: texture.width,
        height: texture.height,
    }
}
