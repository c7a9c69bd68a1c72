use crate::foundation::error::{StardeckError, StardeckResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Viewport size in CSS (layout) units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> StardeckResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(StardeckError::validation(format!(
                "viewport must be finite and positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Backing-store size for this viewport at the given device pixel ratio.
    ///
    /// An unusable ratio is treated as 1, see [`sane_device_pixel_ratio`].
    pub fn to_pixels(self, device_pixel_ratio: f64) -> PixelSize {
        fn px(v: f64) -> u32 {
            // `max` discards NaN.
            v.round().max(1.0).min(f64::from(u32::MAX)) as u32
        }
        let ratio = sane_device_pixel_ratio(device_pixel_ratio);
        PixelSize {
            width: px(self.width * ratio),
            height: px(self.height * ratio),
        }
    }
}

/// `ratio` if it is finite and positive, else 1.
pub fn sane_device_pixel_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

/// Straight (non-premultiplied) RGBA8.
///
/// Serializes as `#rrggbbaa`; see [`crate::foundation::color`] for accepted input forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale alpha by `k`, clamped to `[0, 1]`.
    pub fn with_alpha_mul(self, k: f64) -> Self {
        let k = if k.is_finite() { k.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            a: (f64::from(self.a) * k).round() as u8,
            ..self
        }
    }

    /// Same colour at zero alpha, for fade-to-transparent gradient stops.
    pub fn transparent(self) -> Self {
        Self { a: 0, ..self }
    }

    pub fn to_premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
