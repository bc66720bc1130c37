// Asset identifiers and handles

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::engine::renderer::texture::TextureWrap;

/// Unique identifier for an asset, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub(crate) u64);

impl AssetId {
    /// Identify a texture by file name and wrap mode. The same file sampled
    /// with another wrap mode is a separate texture.
    pub fn for_texture(name: &str, wrap: TextureWrap) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        wrap.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Handle to a texture held by the asset manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    pub(crate) id: AssetId,
}

impl TextureHandle {
    pub(crate) fn new(id: AssetId) -> Self {
        Self { id }
    }

    /// Get the underlying asset ID
    pub fn id(&self) -> AssetId {
        self.id
    }
}

/// A loaded texture as seen by game code: its handle and pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_from_name() {
        let id1 = AssetId::for_texture("ball.png", TextureWrap::Clamp);
        let id2 = AssetId::for_texture("ball.png", TextureWrap::Clamp);
        let id3 = AssetId::for_texture("ground.png", TextureWrap::Clamp);

        assert_eq!(id1, id2, "Same names should produce same IDs");
        assert_ne!(id1, id3, "Different names should produce different IDs");
    }

    #[test]
    fn test_wrap_mode_is_part_of_identity() {
        let clamp = AssetId::for_texture("ground.png", TextureWrap::Clamp);
        let repeat = AssetId::for_texture("ground.png", TextureWrap::Repeat);

        assert_ne!(clamp, repeat);
        assert_ne!(TextureHandle::new(clamp), TextureHandle::new(repeat));
    }
}
