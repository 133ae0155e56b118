//! Animation Driver.
//!
//! Every pose is a pure function of elapsed seconds and the tag fixed on
//! the node at build time, so frames can be recomputed in any order.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::scene::{Backdrop, Transform};

/// Frame rate the per-frame nudges of the hand-tuned scene were written for.
const NOMINAL_HZ: f32 = 60.0;

/// `amp * (sin(freq·t + phase) - sin(phase))`; zero at `t = 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Wave {
    pub amp: f32,
    pub freq: f32,
    pub phase: f32,
}

impl Wave {
    pub const fn new(amp: f32, freq: f32, phase: f32) -> Self {
        Self { amp, freq, phase }
    }

    /// The displacement accumulated by adding `per_frame · cos(freq·t + phase)`
    /// every frame.
    pub fn accumulated(per_frame: f32, freq: f32, phase: f32) -> Self {
        Self::new(per_frame * NOMINAL_HZ / freq, freq, phase)
    }

    #[inline]
    pub fn at(&self, t: f32) -> f32 {
        if self.amp == 0.0 {
            return 0.0;
        }
        self.amp * ((self.freq * t + self.phase).sin() - self.phase.sin())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Motion {
    /// Lattice node: isotropic breathing plus a slow vertical drift.
    Pulse { phase: f32, speed: f32 },
    /// Constant angular velocity, radians per second per axis.
    Spin(Vec3),
    /// Spin plus a wobble on x and a bob on y.
    Sway { spin: Vec3, tilt: Wave, bob: Wave },
    /// Floating label: tumble, float, drift, and fade.
    Billboard { index: usize, spin: Vec3, float_speed: f32, float_offset: f32 },
}

/// Per-object animation parameters, read but never mutated per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationTag {
    pub rest: Transform,
    pub motion: Motion,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub transform: Transform,
    pub opacity: Option<f32>,
}

impl AnimationTag {
    pub fn new(rest: Transform, motion: Motion) -> Self {
        Self { rest, motion }
    }

    pub fn pose(&self, t: f32) -> Pose {
        let mut tf = self.rest;
        let mut opacity = None;
        match &self.motion {
            Motion::Pulse { phase, speed } => {
                let pulse = (t * speed + phase).sin() * 0.4 + 1.0;
                tf.scale = self.rest.scale * pulse;
                // 0.002·sin(0.5t + phase) per frame
                let drift = Wave::accumulated(0.002, 0.5, phase - FRAC_PI_2);
                tf.position.y += drift.at(t);
            }
            Motion::Spin(rate) => {
                tf.rotation += *rate * t;
            }
            Motion::Sway { spin, tilt, bob } => {
                tf.rotation += *spin * t;
                tf.rotation.x += tilt.at(t);
                tf.position.y += bob.at(t);
            }
            Motion::Billboard { index, spin, float_speed, float_offset } => {
                let i = *index as f32;
                tf.rotation += *spin * NOMINAL_HZ * t;
                tf.position.y += (t * float_speed + float_offset).sin() * 4.0;
                tf.position.x += Wave::accumulated(0.008, 0.08, i).at(t);
                tf.position.z += Wave::accumulated(0.008, 0.08, i - FRAC_PI_2).at(t);
                opacity = Some(0.5 + (t * 0.4 + i).sin() * 0.3);
            }
        }
        Pose { transform: tf, opacity }
    }
}

/// Camera orbit: a small Lissajous path in x/y, fixed depth, eyes on the origin.
pub fn camera_position(t: f32, distance: f32) -> Vec3 {
    Vec3::new((t * 0.08).sin() * 3.0, (t * 0.12).cos() * 2.0, distance)
}

/// Advance every tagged node, the point cloud and the camera to time `t`.
pub fn animate(backdrop: &mut Backdrop, t: f32) {
    for node in backdrop.scene.nodes_mut() {
        let Some(pose) = node.tag.as_ref().map(|tag| tag.pose(t)) else {
            continue;
        };
        node.transform = pose.transform;
        if let Some(o) = pose.opacity {
            node.material.opacity = o;
        }
    }

    backdrop.particles.advance(t);

    let distance = backdrop.camera_distance;
    backdrop.camera.position = camera_position(t, distance);
    backdrop.camera.look_at(Vec3::ZERO);
}

/// Seconds since the first observed timestamp.
#[derive(Clone, Copy, Debug, Default)]
pub struct Clock {
    start_ms: Option<f64>,
}

impl Clock {
    pub fn elapsed(&mut self, now_ms: f64) -> f32 {
        let start = *self.start_ms.get_or_insert(now_ms);
        ((now_ms - start) / 1000.0).max(0.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waves_start_at_rest() {
        for w in [Wave::new(2.0, 0.3, 0.0), Wave::new(1.5, 0.4, -FRAC_PI_2), Wave::new(-0.2, 0.5, 1.1)] {
            assert!(w.at(0.0).abs() < 1e-6);
        }
    }

    #[test]
    fn accumulated_matches_summed_nudges() {
        // Summing 0.01·sin(0.4t) per frame for ten seconds.
        let mut y = 0.0f32;
        let dt = 1.0 / NOMINAL_HZ;
        for f in 0..600 {
            y += (0.4 * (f as f32 * dt)).sin() * 0.01;
        }
        let w = Wave::accumulated(0.01, 0.4, -FRAC_PI_2);
        // sin(x) = cos(x - π/2)
        assert!((w.at(10.0) - y).abs() < 0.05, "{} vs {}", w.at(10.0), y);
    }

    #[test]
    fn pulse_scale_is_bounded() {
        let tag = AnimationTag::new(
            Transform::default(),
            Motion::Pulse { phase: 1.3, speed: 0.03 },
        );
        for i in 0..1000 {
            let s = tag.pose(i as f32 * 0.5).transform.scale.x;
            assert!((0.6..=1.4).contains(&s));
        }
    }

    #[test]
    fn billboard_fades_between_bounds() {
        let tag = AnimationTag::new(
            Transform::default(),
            Motion::Billboard { index: 3, spin: Vec3::ZERO, float_speed: 0.001, float_offset: 0.0 },
        );
        for i in 0..200 {
            let o = tag.pose(i as f32 * 0.1).opacity.unwrap();
            assert!((0.2..=0.8).contains(&o));
        }
    }

    #[test]
    fn spin_is_linear_in_time() {
        let tag = AnimationTag::new(Transform::default(), Motion::Spin(Vec3::new(0.0, 0.15, 0.0)));
        assert!((tag.pose(10.0).transform.rotation.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn camera_orbit_stays_near_axis() {
        for i in 0..500 {
            let p = camera_position(i as f32 * 0.7, 20.0);
            assert!(p.x.abs() <= 3.0 && p.y.abs() <= 2.0 && p.z == 20.0);
        }
    }

    #[test]
    fn clock_starts_at_first_tick() {
        let mut c = Clock::default();
        assert_eq!(c.elapsed(5000.0), 0.0);
        assert!((c.elapsed(6500.0) - 1.5).abs() < 1e-6);
    }
}
