//! Asset registry: decoded images and sound effects, looked up by string key.
//!
//! Decoding files into these types happens outside this crate. Game states
//! only read from the registry; it is filled before the runner starts.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Errors from asset construction.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    PixelBufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("sprite sheet cell size {width}x{height} is empty")]
    EmptyCell { width: u32, height: u32 },
}

/// An RGBA8 image, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Image {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(AssetError::PixelBufferSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// An image filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            rgba: rgba.repeat(count),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }

    /// Copy of the `width`x`height` region at `(x, y)`, clipped to the image.
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Image {
        let w = width.min(self.width.saturating_sub(x));
        let h = height.min(self.height.saturating_sub(y));
        if w == 0 || h == 0 {
            return Image {
                width: 0,
                height: 0,
                rgba: Vec::new(),
            };
        }
        let mut rgba = Vec::with_capacity(w as usize * h as usize * 4);
        for row in y..y + h {
            let start = (row as usize * self.width as usize + x as usize) * 4;
            rgba.extend_from_slice(&self.rgba[start..start + w as usize * 4]);
        }
        Image {
            width: w,
            height: h,
            rgba,
        }
    }

    /// Slice a sprite sheet into `cell_width`x`cell_height` cells, row-major.
    ///
    /// Partial cells at the right and bottom edges are skipped.
    pub fn split_sheet(&self, cell_width: u32, cell_height: u32) -> Result<Vec<Image>, AssetError> {
        if cell_width == 0 || cell_height == 0 {
            return Err(AssetError::EmptyCell {
                width: cell_width,
                height: cell_height,
            });
        }
        let rows = self.height / cell_height;
        let cols = self.width / cell_width;
        let mut cells = Vec::with_capacity((rows * cols) as usize);
        for r in 0..rows {
            for c in 0..cols {
                cells.push(self.sub_image(c * cell_width, r * cell_height, cell_width, cell_height));
            }
        }
        Ok(cells)
    }
}

/// Decoded PCM samples, interleaved by channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEffect {
    samples: Arc<[f32]>,
    sample_rate: u32,
    channels: u16,
}

impl SoundEffect {
    pub fn new(samples: impl Into<Arc<[f32]>>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
            channels: channels.max(1),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let frames = self.samples.len() as f64 / self.channels as f64;
        Duration::from_secs_f64(frames / self.sample_rate as f64)
    }
}

/// Key-addressed store of shared asset handles.
///
/// Lookups of unknown keys return `None`; callers decide how to cope.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    images: BTreeMap<String, Arc<Image>>,
    sound_effects: BTreeMap<String, Arc<SoundEffect>>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image under `key`, replacing any previous entry.
    pub fn insert_image(&mut self, key: impl Into<String>, image: Image) -> Arc<Image> {
        let key = key.into();
        let handle = Arc::new(image);
        if self.images.insert(key.clone(), handle.clone()).is_some() {
            tracing::debug!(%key, "replaced image");
        }
        handle
    }

    /// Register a sound effect under `key`, replacing any previous entry.
    pub fn insert_sound_effect(&mut self, key: impl Into<String>, sound: SoundEffect) -> Arc<SoundEffect> {
        let key = key.into();
        let handle = Arc::new(sound);
        if self.sound_effects.insert(key.clone(), handle.clone()).is_some() {
            tracing::debug!(%key, "replaced sound effect");
        }
        handle
    }

    pub fn get_image(&self, key: &str) -> Option<Arc<Image>> {
        self.images.get(key).cloned()
    }

    pub fn get_sound_effect(&self, key: &str) -> Option<Arc<SoundEffect>> {
        self.sound_effects.get(key).cloned()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn sound_effect_count(&self) -> usize {
        self.sound_effects.len()
    }
}
