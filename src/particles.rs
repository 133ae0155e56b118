//! Point Cloud Buffer.
//!
//! All buffers are boxed slices sized at creation; the per-tick update
//! rewrites `positions` in place from the fixed `rest` positions.

use rand::Rng;

use crate::color::Rgb;
use crate::config::ParticleLayout;
use crate::rng::{band, centered};

pub struct PointCloud {
    positions: Box<[f32]>,
    rest: Box<[f32]>,
    colors: Box<[f32]>,
    sizes: Box<[f32]>,
}

impl PointCloud {
    pub fn generate<R: Rng + ?Sized>(layout: &ParticleLayout, rng: &mut R) -> Self {
        let n = layout.count;
        let mut rest = Vec::with_capacity(n * 3);
        let mut colors = Vec::with_capacity(n * 3);
        let mut sizes = Vec::with_capacity(n);
        let [bx, by, bz] = layout.bounds;

        for _ in 0..n {
            rest.extend_from_slice(&[centered(rng, bx), centered(rng, by), centered(rng, bz)]);

            let hue = band(rng, layout.hue[0], layout.hue[1]);
            let light = band(rng, layout.lightness[0], layout.lightness[1]);
            colors.extend_from_slice(&Rgb::hsl(hue, 0.8, light).0);

            sizes.push(band(rng, layout.size[0], layout.size[1]));
        }

        let rest = rest.into_boxed_slice();
        Self {
            positions: rest.clone(),
            rest,
            colors: colors.into_boxed_slice(),
            sizes: sizes.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Interleaved xyz, `len() * 3` floats.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn rest(&self) -> &[f32] {
        &self.rest
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Cheap pseudo-fluid sway: each point bobs in y by a wave keyed on its
    /// x, and slides in x by a wave keyed on its z. `advance(0.0)` leaves
    /// every point at rest.
    pub fn advance(&mut self, t: f32) {
        for (live, rest) in self.positions.chunks_exact_mut(3).zip(self.rest.chunks_exact(3)) {
            let (x, y, z) = (rest[0], rest[1], rest[2]);
            let (kz, kx) = (z * WAVE, x * WAVE);
            live[0] = x + SWAY_X * ((t + kz).sin() - kz.sin());
            live[1] = y - SWAY_Y * ((t + kx).cos() - kx.cos());
            live[2] = z;
        }
    }
}

const WAVE: f32 = 0.008;
// Amplitudes of the closed-form integral of the per-frame nudges
// (0.002 / 0.003 per frame at 60 Hz).
const SWAY_X: f32 = 0.002 * 60.0;
const SWAY_Y: f32 = 0.003 * 60.0;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn cloud(count: usize) -> PointCloud {
        let layout = ParticleLayout { count, ..Default::default() };
        PointCloud::generate(&layout, &mut seeded(3))
    }

    #[test]
    fn buffers_sized_to_count() {
        let c = cloud(250);
        assert_eq!(c.len(), 250);
        assert_eq!(c.positions().len(), 750);
        assert_eq!(c.colors().len(), 750);
        assert_eq!(c.sizes().len(), 250);
    }

    #[test]
    fn length_never_changes_across_ticks() {
        let mut c = cloud(3000);
        let ptr = c.positions().as_ptr();
        for frame in 0..600 {
            c.advance(frame as f32 / 60.0);
            assert_eq!(c.positions().len(), 9000);
        }
        assert_eq!(c.positions().as_ptr(), ptr);
    }

    #[test]
    fn points_start_inside_bounds() {
        let c = cloud(2000);
        for p in c.rest().chunks_exact(3) {
            assert!(p[0].abs() <= 60.0 && p[1].abs() <= 30.0 && p[2].abs() <= 40.0);
        }
        assert!(c.sizes().iter().all(|s| (0.5..3.5).contains(s)));
    }

    #[test]
    fn first_tick_starts_at_rest() {
        let mut c = cloud(500);
        c.advance(0.0);
        assert_eq!(c.positions(), c.rest());

        c.advance(0.5);
        c.advance(0.0);
        assert_eq!(c.positions(), c.rest());
    }

    #[test]
    fn drift_stays_small() {
        let mut c = cloud(500);
        for frame in 0..1200 {
            c.advance(frame as f32 / 60.0);
            for (live, rest) in c.positions().chunks_exact(3).zip(c.rest().chunks_exact(3)) {
                assert!((live[0] - rest[0]).abs() <= 2.0 * SWAY_X + 1e-4);
                assert!((live[1] - rest[1]).abs() <= 2.0 * SWAY_Y + 1e-4);
                assert_eq!(live[2], rest[2]);
            }
        }
    }

    #[test]
    fn motion_is_pure_in_time() {
        let mut a = cloud(100);
        let mut b = cloud(100);
        a.advance(1.0);
        a.advance(9.0);
        a.advance(4.25);
        b.advance(4.25);
        assert_eq!(a.positions(), b.positions());
    }
}
