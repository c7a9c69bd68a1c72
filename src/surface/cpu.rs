use std::path::Path;

use vello_cpu::kurbo::Shape as _;
use vello_cpu::peniko::{BlendMode, Compose, Mix};

use crate::{
    foundation::{
        core::{Affine, PixelSize, Point, Rect, Rgba8, Viewport},
        error::{StardeckError, StardeckResult},
    },
    surface::{Blend, DrawSurface, GradientStop, Paint},
};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRgba {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Software raster surface powered by `vello_cpu`.
///
/// Draw calls are encoded into a render context and rasterised into the backing pixmap on
/// [`DrawSurface::present`]; the pixmap therefore always holds the last presented frame.
pub struct CpuSurface {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    css_size: Option<Viewport>,
    transform: Affine,
    blend: Blend,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("css_size", &self.css_size)
            .field("blend", &self.blend)
            .finish()
    }
}

impl CpuSurface {
    pub fn new(size: PixelSize) -> StardeckResult<Self> {
        let (w, h) = checked_dims(size)?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            css_size: None,
            transform: Affine::IDENTITY,
            blend: Blend::Normal,
        })
    }

    pub fn pixel_size(&self) -> PixelSize {
        PixelSize {
            width: u32::from(self.pixmap.width()),
            height: u32::from(self.pixmap.height()),
        }
    }

    pub fn css_size(&self) -> Option<Viewport> {
        self.css_size
    }

    /// Read back the last presented frame.
    pub fn frame_rgba(&self, premultiplied: bool) -> FrameRgba {
        let mut data = self.pixmap.data_as_u8_slice().to_vec();
        if !premultiplied {
            unpremultiply_in_place(&mut data);
        }
        let size = self.pixel_size();
        FrameRgba {
            width: size.width,
            height: size.height,
            data,
            premultiplied,
        }
    }

    pub fn write_png(&self, path: &Path) -> StardeckResult<()> {
        let frame = self.frame_rgba(false);
        image::save_buffer_with_format(
            path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| {
            StardeckError::surface(format!("failed to write png '{}': {e}", path.display()))
        })
    }

    fn restore_state(&mut self) {
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_blend_mode(blend_to_cpu(self.blend));
    }

    fn covers_surface(&self, rect: Rect) -> bool {
        let Some(css) = self.css_size else {
            return false;
        };
        rect.x0 <= 0.0 && rect.y0 <= 0.0 && rect.x1 >= css.width && rect.y1 >= css.height
    }
}

impl DrawSurface for CpuSurface {
    fn resize(&mut self, size: PixelSize) -> StardeckResult<()> {
        let (w, h) = checked_dims(size)?;
        if self.ctx.width() != w || self.ctx.height() != h {
            self.ctx = vello_cpu::RenderContext::new(w, h);
            self.pixmap = vello_cpu::Pixmap::new(w, h);
        }
        self.restore_state();
        Ok(())
    }

    fn set_css_size(&mut self, viewport: Viewport) {
        self.css_size = Some(viewport);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.ctx.set_transform(affine_to_cpu(transform));
    }

    fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
        self.ctx.set_blend_mode(blend_to_cpu(blend));
    }

    fn clear_rect(&mut self, rect: Rect) {
        if self.covers_surface(rect) {
            // Nothing encoded so far this frame can survive a full clear.
            self.ctx.reset();
            self.restore_state();
            return;
        }
        self.ctx
            .set_blend_mode(BlendMode::new(Mix::Normal, Compose::Clear));
        self.ctx.set_paint(color_to_cpu(Rgba8::TRANSPARENT));
        self.ctx.fill_rect(&rect_to_cpu(rect));
        self.ctx.set_blend_mode(blend_to_cpu(self.blend));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.ctx.set_paint(paint_to_cpu(paint));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let circle = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius);
        self.ctx.set_paint(paint_to_cpu(paint));
        self.ctx.fill_path(&circle.to_path(0.1));
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, paint: &Paint) {
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(point_to_cpu(from));
        path.line_to(point_to_cpu(to));
        self.ctx.set_paint(paint_to_cpu(paint));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn present(&mut self) -> StardeckResult<()> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx.reset();
        self.restore_state();
        Ok(())
    }
}

fn checked_dims(size: PixelSize) -> StardeckResult<(u16, u16)> {
    let w = u16::try_from(size.width).ok().filter(|w| *w > 0);
    let h = u16::try_from(size.height).ok().filter(|h| *h > 0);
    match (w, h) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(StardeckError::surface(format!(
            "cpu surface size must be within 1..={} on both axes, got {}x{}",
            u16::MAX,
            size.width,
            size.height
        ))),
    }
}

fn unpremultiply_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn blend_to_cpu(blend: Blend) -> BlendMode {
    match blend {
        Blend::Normal => BlendMode::default(),
        Blend::Lighter => BlendMode::new(Mix::Normal, Compose::Plus),
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn stops_to_cpu(stops: &[GradientStop]) -> Vec<(f32, vello_cpu::peniko::Color)> {
    stops
        .iter()
        .map(|s| (s.offset.clamp(0.0, 1.0), color_to_cpu(s.color)))
        .collect()
}

fn paint_to_cpu(paint: &Paint) -> vello_cpu::PaintType {
    match paint {
        Paint::Solid(c) => color_to_cpu(*c).into(),
        Paint::Linear { start, end, stops } => {
            let stops = stops_to_cpu(stops);
            vello_cpu::peniko::Gradient::new_linear(point_to_cpu(*start), point_to_cpu(*end))
                .with_stops(stops.as_slice())
                .into()
        }
        Paint::Radial {
            center,
            radius,
            stops,
        } => {
            let stops = stops_to_cpu(stops);
            vello_cpu::peniko::Gradient::new_radial(point_to_cpu(*center), *radius as f32)
                .with_stops(stops.as_slice())
                .into()
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/surface/cpu.rs"]
mod tests;
