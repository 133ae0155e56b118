//! How a floating research label is painted before it becomes a texture.

use crate::color::Rgb;

#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
    pub width: u32,
    pub height: u32,
    pub background: &'static str,
    pub border: Rgb,
    pub border_width: f64,
    pub text: &'static str,
    pub font: &'static str,
    pub glow: Rgb,
    pub glow_blur: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            width: 512,
            height: 128,
            background: "rgba(30, 41, 59, 0.9)",
            border: Rgb::hex(0x38bdf8),
            border_width: 4.0,
            text: "#ffffff",
            font: "bold 32px Inter, Arial, sans-serif",
            glow: Rgb::hex(0x38bdf8),
            glow_blur: 15.0,
        }
    }
}

impl LabelStyle {
    /// Border rectangle inset so the full stroke stays on the canvas.
    pub fn border_rect(&self) -> (f64, f64, f64, f64) {
        let inset = self.border_width / 2.0;
        (
            inset,
            inset,
            self.width as f64 - self.border_width,
            self.height as f64 - self.border_width,
        )
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_fits_canvas() {
        let s = LabelStyle::default();
        let (x, y, w, h) = s.border_rect();
        assert_eq!((x, y, w, h), (2.0, 2.0, 508.0, 124.0));
        assert_eq!(s.center(), (256.0, 64.0));
    }
}
