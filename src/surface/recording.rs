use crate::{
    foundation::{
        core::{Affine, PixelSize, Point, Rect, Viewport},
        error::{StardeckError, StardeckResult},
    },
    surface::{Blend, DrawSurface, Paint},
};

/// A single recorded surface call. Fill and stroke commands capture the blend mode that was
/// active when they were issued.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    Resize(PixelSize),
    CssSize(Viewport),
    Transform(Affine),
    Clear(Rect),
    FillRect {
        rect: Rect,
        paint: Paint,
        blend: Blend,
    },
    FillCircle {
        center: Point,
        radius: f64,
        paint: Paint,
        blend: Blend,
    },
    StrokeLine {
        from: Point,
        to: Point,
        width: f64,
        paint: Paint,
        blend: Blend,
    },
    Present,
}

/// Surface that rasterises nothing and records every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCmd>,
    blend: Blend,
    pixel_size: Option<PixelSize>,
    css_size: Option<Viewport>,
    transform: Affine,
    frames_presented: u64,
    max_pixels: Option<u64>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject resizes whose pixel count exceeds `max_pixels`, mimicking a backend limit.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = Some(max_pixels);
        self
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.commands)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn pixel_size(&self) -> Option<PixelSize> {
        self.pixel_size
    }

    pub fn css_size(&self) -> Option<Viewport> {
        self.css_size
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn blend(&self) -> Blend {
        self.blend
    }
}

impl DrawSurface for RecordingSurface {
    fn resize(&mut self, size: PixelSize) -> StardeckResult<()> {
        if let Some(max) = self.max_pixels {
            let px = u64::from(size.width) * u64::from(size.height);
            if px > max {
                return Err(StardeckError::surface(format!(
                    "{}x{} exceeds {max} pixels",
                    size.width, size.height
                )));
            }
        }
        self.pixel_size = Some(size);
        self.commands.push(DrawCmd::Resize(size));
        Ok(())
    }

    fn set_css_size(&mut self, viewport: Viewport) {
        self.css_size = Some(viewport);
        self.commands.push(DrawCmd::CssSize(viewport));
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.commands.push(DrawCmd::Transform(transform));
    }

    fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCmd::Clear(rect));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCmd::FillRect {
            rect,
            paint: paint.clone(),
            blend: self.blend,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        self.commands.push(DrawCmd::FillCircle {
            center,
            radius,
            paint: paint.clone(),
            blend: self.blend,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, paint: &Paint) {
        self.commands.push(DrawCmd::StrokeLine {
            from,
            to,
            width,
            paint: paint.clone(),
            blend: self.blend,
        });
    }

    fn present(&mut self) -> StardeckResult<()> {
        self.frames_presented += 1;
        self.commands.push(DrawCmd::Present);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/recording.rs"]
mod tests;
