//! Drawing surfaces.
//!
//! [`DrawSurface`] is the small canvas-like contract the particle field draws through. Any
//! backend that can size a pixel buffer, apply a transform and fill/stroke with solid or gradient
//! paint under two blend modes satisfies it.
use crate::foundation::{
    core::{Affine, PixelSize, Point, Rect, Rgba8, Viewport},
    error::StardeckResult,
};

pub mod cpu;
pub mod recording;

/// Compositing mode for subsequent fills and strokes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Blend {
    /// Source-over.
    #[default]
    Normal,
    /// Additive ("lighter"): overlapping draws brighten instead of occluding.
    Lighter,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba8,
}

impl GradientStop {
    pub fn new(offset: f32, color: Rgba8) -> Self {
        Self { offset, color }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Paint {
    Solid(Rgba8),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    Radial {
        center: Point,
        radius: f64,
        stops: Vec<GradientStop>,
    },
}

/// Canvas-like 2D drawing target.
///
/// Coordinates passed to drawing calls are transformed by the last [`DrawSurface::set_transform`].
pub trait DrawSurface {
    /// Resize the backing pixel buffer. Contents are undefined afterwards.
    fn resize(&mut self, size: PixelSize) -> StardeckResult<()>;

    /// Record the layout-facing size of the surface.
    fn set_css_size(&mut self, viewport: Viewport);

    fn set_transform(&mut self, transform: Affine);

    fn set_blend(&mut self, blend: Blend);

    /// Reset `rect` to fully transparent, ignoring the blend mode.
    fn clear_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint);

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, paint: &Paint);

    /// End of frame. Raster backends flush pending work here.
    fn present(&mut self) -> StardeckResult<()> {
        Ok(())
    }
}

impl<S: DrawSurface + ?Sized> DrawSurface for Box<S> {
    fn resize(&mut self, size: PixelSize) -> StardeckResult<()> {
        (**self).resize(size)
    }

    fn set_css_size(&mut self, viewport: Viewport) {
        (**self).set_css_size(viewport)
    }

    fn set_transform(&mut self, transform: Affine) {
        (**self).set_transform(transform)
    }

    fn set_blend(&mut self, blend: Blend) {
        (**self).set_blend(blend)
    }

    fn clear_rect(&mut self, rect: Rect) {
        (**self).clear_rect(rect)
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        (**self).fill_rect(rect, paint)
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        (**self).fill_circle(center, radius, paint)
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, paint: &Paint) {
        (**self).stroke_line(from, to, width, paint)
    }

    fn present(&mut self) -> StardeckResult<()> {
        (**self).present()
    }
}
