use glam::{Mat4, Vec3};

/// Perspective camera that always aims at `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Camera {
    pub fn new(width: f32, height: f32, distance: f32) -> Self {
        let mut cam = Self {
            fov: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
        };
        cam.resize(width, height);
        cam
    }

    /// Degenerate sizes (minimised window) keep the previous aspect.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_tracks_latest_resize() {
        let mut cam = Camera::new(800.0, 600.0, 20.0);
        assert_eq!(cam.aspect, 800.0 / 600.0);
        for (w, h) in [(1920.0, 1080.0), (390.0, 844.0), (1.0, 1.0)] {
            cam.resize(w, h);
            assert_eq!(cam.aspect, w / h);
        }
        cam.resize(0.0, 500.0);
        assert_eq!(cam.aspect, 1.0);
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let cam = Camera::new(1280.0, 720.0, 20.0);
        let p = cam.view_projection().project_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!(p.z > -1.0 && p.z < 1.0);
    }
}
