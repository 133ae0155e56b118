use serde::{Deserialize, Serialize};

/// RGB triple in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub fn hex(v: u32) -> Self {
        Rgb([
            ((v >> 16) & 0xff) as f32 / 255.0,
            ((v >> 8) & 0xff) as f32 / 255.0,
            (v & 0xff) as f32 / 255.0,
        ])
    }

    /// Hue wraps, saturation and lightness clamp to `[0, 1]`.
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Rgb([l, l, l]);
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;
        Rgb([
            hue_to_rgb(q, p, h + 1.0 / 3.0),
            hue_to_rgb(q, p, h),
            hue_to_rgb(q, p, h - 1.0 / 3.0),
        ])
    }

    pub fn scaled(self, k: f32) -> Self {
        let [r, g, b] = self.0;
        Rgb([r * k, g * k, b * k])
    }

    /// CSS `#rrggbb` form, used for 2D canvas styles.
    pub fn css(self) -> String {
        let [r, g, b] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: [f32; 3]) -> bool {
        a.0.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn hex_channels() {
        assert!(close(Rgb::hex(0xff0000), [1.0, 0.0, 0.0]));
        assert!(close(Rgb::hex(0x38bdf8), [56.0 / 255.0, 189.0 / 255.0, 248.0 / 255.0]));
    }

    #[test]
    fn hsl_primaries() {
        assert!(close(Rgb::hsl(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
        assert!(close(Rgb::hsl(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
        assert!(close(Rgb::hsl(2.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
        assert!(close(Rgb::hsl(0.3, 0.0, 0.25), [0.25, 0.25, 0.25]));
    }

    #[test]
    fn css_round_trips_hex() {
        assert_eq!(Rgb::hex(0x38bdf8).css(), "#38bdf8");
    }
}
