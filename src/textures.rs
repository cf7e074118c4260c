//! Sprite textures for firework particles.
//!
//! Each firework samples one texture from a fixed palette loaded at startup
//! (`particles/1.png` … `particles/8.png`). The red channel of the sprite is
//! used as the particle's alpha, so the images are greyscale glows.
//!
//! A palette entry that fails to load is replaced by a procedural soft disc,
//! so the palette is always full and a missing asset never blocks a launch.
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::TextureError;

/// Number of sprites in the default palette.
pub const DEFAULT_PALETTE_SIZE: usize = 8;

/// Opaque handle to a palette texture.
///
/// Handles are only meaningful for the palette that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureHandle(usize);

impl TextureHandle {
    /// Palette slot this handle refers to.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// CPU-side pixels for a single sprite.
#[derive(Debug, Clone)]
pub struct TextureConfig {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
}

impl TextureConfig {
    /// Load a texture from an image file.
    ///
    /// Sprites are used as-is: row 0 is the top of the point sprite.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| TextureError::ImageLoad {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
        })
    }

    /// Procedural radial glow, bright in the middle and black at the rim.
    ///
    /// The falloff is `(1 - d)^falloff` where `d` is the distance from the
    /// center normalized to the inscribed circle.
    pub fn soft_disc(size: u32, falloff: f32) -> Self {
        let size = size.max(1);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        let half = size as f32 / 2.0;
        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 + 0.5 - half) / half;
                let dy = (y as f32 + 0.5 - half) / half;
                let d = (dx * dx + dy * dy).sqrt().min(1.0);
                let v = ((1.0 - d).powf(falloff) * 255.0).round() as u8;
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Self {
            data,
            width: size,
            height: size,
        }
    }
}

/// The fixed set of sprites fireworks pick from.
#[derive(Debug, Clone, Default)]
pub struct TexturePalette {
    textures: Vec<TextureConfig>,
}

impl TexturePalette {
    /// Build a palette from already-decoded textures.
    pub fn new(textures: Vec<TextureConfig>) -> Self {
        Self { textures }
    }

    /// Palette of `count` procedural glows with increasingly soft falloff.
    pub fn procedural(count: usize) -> Self {
        let textures = (0..count)
            .map(|i| TextureConfig::soft_disc(64, 1.0 + i as f32 * 0.5))
            .collect();
        Self { textures }
    }

    /// Load `dir/1.png` … `dir/{count}.png`.
    ///
    /// Entries that fail to load are logged and replaced with a procedural
    /// glow so the palette always has `count` textures.
    pub fn load_dir(dir: impl AsRef<Path>, count: usize) -> Self {
        let dir = dir.as_ref();
        let textures = palette_paths(dir, count)
            .into_iter()
            .enumerate()
            .map(|(i, path)| match TextureConfig::from_file(&path) {
                Ok(tex) => {
                    log::debug!("Loaded sprite {} ({}x{})", path.display(), tex.width, tex.height);
                    tex
                }
                Err(e) => {
                    log::warn!("{e}; using procedural sprite for slot {}", i + 1);
                    TextureConfig::soft_disc(64, 1.0 + i as f32 * 0.5)
                }
            })
            .collect();
        Self { textures }
    }

    /// Number of textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Handle for slot `index`, if it exists.
    pub fn handle(&self, index: usize) -> Option<TextureHandle> {
        (index < self.textures.len()).then_some(TextureHandle(index))
    }

    /// Uniformly pick a texture. Returns `None` for an empty palette.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<TextureHandle> {
        if self.textures.is_empty() {
            return None;
        }
        Some(TextureHandle(rng.gen_range(0..self.textures.len())))
    }

    /// Pixels behind a handle.
    pub fn get(&self, handle: TextureHandle) -> Option<&TextureConfig> {
        self.textures.get(handle.0)
    }

    /// Iterate textures in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &TextureConfig> {
        self.textures.iter()
    }
}

/// `dir/1.png` … `dir/{count}.png`.
pub fn palette_paths(dir: &Path, count: usize) -> Vec<PathBuf> {
    (1..=count).map(|i| dir.join(format!("{i}.png"))).collect()
}
