// Asset file lookup and reading

use super::AssetError;
use std::path::{Path, PathBuf};

/// Directory under the asset root holding textures
const TEXTURE_DIRECTORY: &str = "textures";

/// Asset loader responsible for finding and reading asset files
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for a texture
    pub fn resolve_texture(&self, name: &str) -> PathBuf {
        self.base_path.join(TEXTURE_DIRECTORY).join(name)
    }

    /// Read texture bytes from disk
    pub fn load_texture_bytes(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve_texture(name);

        if !path.is_file() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }

        Ok(std::fs::read(&path)?)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
