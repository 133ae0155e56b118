use glam::Vec3;

use crate::color::Rgb;

#[derive(Clone, Debug, PartialEq)]
pub struct Lights {
    pub ambient: Ambient,
    pub directional: Directional,
    pub point: PointLight,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ambient {
    pub color: Rgb,
    pub intensity: f32,
}

/// Parallel light travelling from `position` towards the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Directional {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub color: Rgb,
    pub intensity: f32,
    /// Zero intensity at and beyond this distance.
    pub range: f32,
    pub position: Vec3,
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: Ambient { color: Rgb::hex(0x404040), intensity: 1.5 },
            directional: Directional {
                color: Rgb::hex(0x38bdf8),
                intensity: 2.0,
                position: Vec3::new(10.0, 10.0, 5.0),
            },
            point: PointLight {
                color: Rgb::hex(0x0ea5e9),
                intensity: 1.0,
                range: 100.0,
                position: Vec3::new(-10.0, -10.0, -5.0),
            },
        }
    }
}

impl Directional {
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }
}
