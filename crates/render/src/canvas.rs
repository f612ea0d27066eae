use simplegame_assets::Image;
use std::ops::{Deref, DerefMut};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Components scaled to `0.0..=1.0`.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

fn mix(src: u8, dst: u8, alpha: u32) -> u8 {
    ((src as u32 * alpha + dst as u32 * (255 - alpha) + 127) / 255) as u8
}

/// Source-over compositing of `src` onto `dst`.
fn blend(dst: &mut [u8], src: [u8; 4]) {
    let a = src[3] as u32;
    match a {
        0 => {}
        255 => dst.copy_from_slice(&src),
        _ => {
            dst[0] = mix(src[0], dst[0], a);
            dst[1] = mix(src[1], dst[1], a);
            dst[2] = mix(src[2], dst[2], a);
            dst[3] = (a + (dst[3] as u32 * (255 - a) + 127) / 255) as u8;
        }
    }
}

/// A CPU pixel buffer, RGBA8, row-major, top-left origin.
///
/// Every drawing call clips to the buffer; out-of-range geometry is
/// silently cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// A canvas cleared to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let i = self.index(x, y)?;
        Some(Color::rgba(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    /// Overwrite one pixel, without blending.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, width, height) else {
            return;
        };
        let rgba = color.to_array();
        let stride = self.width as usize * 4;
        for row in y0..y1 {
            let line = &mut self.pixels[row * stride + x0 * 4..row * stride + x1 * 4];
            for px in line.chunks_exact_mut(4) {
                blend(px, rgba);
            }
        }
    }

    /// One-pixel outline of the rectangle.
    pub fn stroke_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let width = width.min(i32::MAX as u32);
        let height = height.min(i32::MAX as u32);
        if width == 0 || height == 0 {
            return;
        }
        let right = x.saturating_add(width as i32 - 1);
        let bottom = y.saturating_add(height as i32 - 1);
        self.fill_rect(x, y, width, 1, color);
        if height > 1 {
            self.fill_rect(x, bottom, width, 1, color);
        }
        if height > 2 {
            self.fill_rect(x, y.saturating_add(1), 1, height - 2, color);
            if width > 1 {
                self.fill_rect(right, y.saturating_add(1), 1, height - 2, color);
            }
        }
    }

    /// Composite `image` with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, image: &Image, x: i32, y: i32) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, image.width(), image.height()) else {
            return;
        };
        let stride = self.width as usize * 4;
        let src_stride = image.width() as usize * 4;
        let src = image.rgba();
        for row in y0..y1 {
            let sy = (row as i64 - y as i64) as usize;
            for col in x0..x1 {
                let sx = (col as i64 - x as i64) as usize;
                let si = sy * src_stride + sx * 4;
                let di = row * stride + col * 4;
                let px = [src[si], src[si + 1], src[si + 2], src[si + 3]];
                blend(&mut self.pixels[di..di + 4], px);
            }
        }
    }

    /// Copy the RGBA bytes into `dst` when it is exactly the canvas size.
    pub fn write_to(&self, dst: &mut [u8]) -> bool {
        if dst.len() != self.pixels.len() {
            return false;
        }
        dst.copy_from_slice(&self.pixels);
        true
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    /// Intersect a rectangle with the canvas as half-open pixel ranges.
    fn clip(&self, x: i32, y: i32, width: u32, height: u32) -> Option<(usize, usize, usize, usize)> {
        let x0 = (x as i64).max(0);
        let y0 = (y as i64).max(0);
        let x1 = (x as i64 + width as i64).min(self.width as i64);
        let y1 = (y as i64 + height as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

/// The raster draw context: the back buffer, lent out for one frame.
#[derive(Debug)]
pub struct RasterFrame {
    canvas: Canvas,
}

impl RasterFrame {
    pub(crate) fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    pub fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub(crate) fn into_canvas(self) -> Canvas {
        self.canvas
    }
}

impl Deref for RasterFrame {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        &self.canvas
    }
}

impl DerefMut for RasterFrame {
    fn deref_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }
}
