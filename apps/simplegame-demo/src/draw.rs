use simplegame_assets::Image;
use simplegame_render::{Color, RasterFrame};
use simplegame_render_wgpu::GpuFrame;

/// The drawing calls the demo needs, over either backend's frame.
pub trait Draw2d {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn draw_image(&mut self, image: &Image, x: f32, y: f32);
}

/// The render context world entities draw into.
pub type DrawTarget = dyn Draw2d;

fn px(v: f32) -> i32 {
    v.round() as i32
}

fn len(v: f32) -> u32 {
    v.round().max(0.0) as u32
}

impl Draw2d for RasterFrame {
    fn clear(&mut self, color: Color) {
        self.canvas().clear(color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.canvas().fill_rect(px(x), px(y), len(width), len(height), color);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.canvas().stroke_rect(px(x), px(y), len(width), len(height), color);
    }

    fn draw_image(&mut self, image: &Image, x: f32, y: f32) {
        self.canvas().draw_image(image, px(x), px(y));
    }
}

impl Draw2d for GpuFrame {
    fn clear(&mut self, color: Color) {
        GpuFrame::clear(self, color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        GpuFrame::fill_rect(self, x, y, width, height, color);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        GpuFrame::stroke_rect(self, x, y, width, height, color);
    }

    // No textured pipeline: stand in with the image's center color.
    fn draw_image(&mut self, image: &Image, x: f32, y: f32) {
        if let Some(rgba) = image.pixel(image.width() / 2, image.height() / 2) {
            GpuFrame::fill_rect(self, x, y, image.width() as f32, image.height() as f32, rgba.into());
        }
    }
}
