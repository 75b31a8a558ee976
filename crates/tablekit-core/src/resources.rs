//! Texture resources.
//!
//! `ResourceProvider` is created once at startup and passed to whatever needs
//! textures. Lookups are keyed by the path string exactly as it is stored in
//! scene files. The cache only holds weak references: shapes own the
//! `Rc<Texture>`, so a texture is released when the last shape using it is
//! dropped, and a repeat lookup while any shape is alive returns the same
//! instance.
//!
//! Only the image header is read (for the native size). Uploading pixels to
//! the GPU is the render backend's job.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use crate::error::Result;

/// Prefix of keys that name built-in textures instead of files.
pub const BUILTIN_PREFIX: &str = "builtin:";

/// Textures that ship with the editor and never touch the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTexture {
    /// Placeholder portrait for new tokens.
    Token,
    /// Placeholder backdrop for new background images.
    Image,
}

impl BuiltinTexture {
    pub fn key(self) -> &'static str {
        match self {
            Self::Token => "builtin:token",
            Self::Image => "builtin:image",
        }
    }

    fn size(self) -> (u32, u32) {
        match self {
            Self::Token => (256, 256),
            Self::Image => (1024, 768),
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "builtin:token" => Some(Self::Token),
            "builtin:image" => Some(Self::Image),
            _ => None,
        }
    }
}

/// A texture known to the editor.
///
/// `size` is `None` when the file could not be read; such a texture is
/// still a valid handle, it just renders without a bound image.
#[derive(Debug, PartialEq, Eq)]
pub struct Texture {
    key: String,
    size: Option<(u32, u32)>,
}

impl Texture {
    /// The lookup key, which is also the path written to scene files.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Native pixel size, if the image could be read.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn is_valid(&self) -> bool {
        self.size.is_some()
    }

    pub fn is_builtin(&self) -> bool {
        self.key.starts_with(BUILTIN_PREFIX)
    }

    /// Native width / height.
    pub fn aspect(&self) -> Option<f32> {
        match self.size {
            Some((w, h)) if w > 0 && h > 0 => Some(w as f32 / h as f32),
            _ => None,
        }
    }
}

/// Path-keyed texture cache.
#[derive(Debug, Default)]
pub struct ResourceProvider {
    root: PathBuf,
    textures: HashMap<String, Weak<Texture>>,
}

impl ResourceProvider {
    /// Creates a provider resolving relative texture paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the texture for `key`, loading its header on first use.
    ///
    /// Keys starting with `builtin:` resolve to the built-in textures.
    pub fn texture(&mut self, key: &str) -> Rc<Texture> {
        if let Some(texture) = self.textures.get(key).and_then(Weak::upgrade) {
            return texture;
        }

        let texture = Rc::new(match BuiltinTexture::from_key(key) {
            Some(builtin) => Texture {
                key: key.to_string(),
                size: Some(builtin.size()),
            },
            None => self.load(key),
        });
        self.textures
            .insert(key.to_string(), Rc::downgrade(&texture));
        texture
    }

    /// Returns one of the built-in placeholder textures.
    pub fn builtin(&mut self, kind: BuiltinTexture) -> Rc<Texture> {
        self.texture(kind.key())
    }

    /// Number of textures currently held alive by at least one shape.
    pub fn live_count(&self) -> usize {
        self.textures
            .values()
            .filter(|t| t.strong_count() > 0)
            .count()
    }

    /// Drops cache entries whose texture has been released.
    pub fn purge(&mut self) {
        self.textures.retain(|_, t| t.strong_count() > 0);
    }

    fn load(&self, key: &str) -> Texture {
        let path = self.resolve(key);
        let size = match read_dimensions(&path) {
            Ok(size) => {
                tracing::debug!("Loaded texture {} ({}x{})", path.display(), size.0, size.1);
                Some(size)
            }
            Err(e) => {
                tracing::warn!("Failed to load texture {}: {}", path.display(), e);
                None
            }
        };
        Texture {
            key: key.to_string(),
            size,
        }
    }

    fn resolve(&self, key: &str) -> PathBuf {
        let path = Path::new(key);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    Ok(image::image_dimensions(path)?)
}
