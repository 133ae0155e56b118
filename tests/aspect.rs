use backdrop_wasm::animation::animate;
use backdrop_wasm::config::SceneLayout;
use backdrop_wasm::rng;
use backdrop_wasm::scene::{build, Backdrop};
use glam::Vec3;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::*;

#[cfg(target_arch = "wasm32")]
wasm_bindgen_test_configure!(run_in_browser);

fn backdrop(w: f32, h: f32) -> Backdrop {
    build(&SceneLayout::default(), w, h, &mut rng::seeded(7))
}

/// Half-width of the view frustum at the origin plane.
fn half_width(b: &Backdrop) -> f32 {
    let c = &b.camera;
    c.position.z * (c.fov.to_radians() / 2.0).tan() * c.aspect
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn frustum_edge_follows_resize() {
    let mut b = backdrop(1920.0, 1080.0);
    assert!((b.camera.aspect - 16.0 / 9.0).abs() < 1e-6);

    let edge = Vec3::new(half_width(&b), 0.0, 0.0);
    let ndc = b.camera.view_projection().project_point3(edge);
    assert!((ndc.x - 1.0).abs() < 1e-4, "ndc={:?}", ndc);

    // portrait: the same point now falls well outside the view
    b.camera.resize(1080.0, 1920.0);
    assert!((b.camera.aspect - 0.5625).abs() < 1e-6);
    let ndc = b.camera.view_projection().project_point3(edge);
    assert!(ndc.x > 3.0, "ndc={:?}", ndc);

    let edge = Vec3::new(half_width(&b), 0.0, 0.0);
    let ndc = b.camera.view_projection().project_point3(edge);
    assert!((ndc.x - 1.0).abs() < 1e-4, "ndc={:?}", ndc);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn zero_sized_resize_keeps_aspect() {
    let mut b = backdrop(800.0, 600.0);
    b.camera.resize(0.0, 600.0);
    b.camera.resize(800.0, 0.0);
    assert!((b.camera.aspect - 4.0 / 3.0).abs() < 1e-6);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn poses_depend_only_on_elapsed_time() {
    let mut direct = backdrop(1280.0, 720.0);
    let mut wandering = backdrop(1280.0, 720.0);

    animate(&mut direct, 5.0);
    for t in [1.0, 30.0, 0.25, 7.5, 5.0] {
        animate(&mut wandering, t);
    }

    let (a, b) = (direct.scene.nodes(), wandering.scene.nodes());
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_eq!(x.transform, y.transform, "node {}", x.name);
        assert_eq!(x.material.opacity, y.material.opacity, "node {}", x.name);
    }
    assert_eq!(direct.particles.positions(), wandering.particles.positions());
    assert_eq!(direct.camera.position, wandering.camera.position);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn camera_orbit_stays_near_start() {
    let mut b = backdrop(1280.0, 720.0);
    for i in 0..600 {
        animate(&mut b, i as f32 / 60.0);
        let p = b.camera.position;
        assert!(p.x.abs() <= 3.0 && p.y.abs() <= 2.0 && p.z == 20.0, "t={} p={:?}", i, p);
        assert_eq!(b.camera.target, Vec3::ZERO);
    }
}
