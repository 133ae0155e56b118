//! Mesh primitives generated on the CPU and uploaded once.

use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Mesh(MeshData),
    /// Endpoint pairs for `LINES`.
    Lines(Vec<[f32; 3]>),
}

impl MeshData {
    fn push(&mut self, p: Vec3, n: Vec3, uv: [f32; 2]) -> u32 {
        self.positions.push(p.to_array());
        self.normals.push(n.to_array());
        self.uvs.push(uv);
        (self.positions.len() - 1) as u32
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Unique triangle edges as `LINES` index pairs.
    pub fn edges(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    out.extend_from_slice(&[a, b]);
                }
            }
        }
        out
    }
}

pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut m = MeshData::default();
    let (ws, hs) = (width_segments.max(3), height_segments.max(2));
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let n = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            m.push(n * radius, n, [u, 1.0 - v]);
        }
    }
    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                m.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                m.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    m
}

/// Axis-aligned box centred on the origin.
pub fn cuboid(size: Vec3) -> MeshData {
    let mut m = MeshData::default();
    let h = size * 0.5;
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    for (n, u, v) in faces {
        let c = n * h;
        let du = u * h;
        let dv = v * h;
        let a = m.push(c - du + dv, n, [0.0, 1.0]);
        let b = m.push(c + du + dv, n, [1.0, 1.0]);
        let d = m.push(c - du - dv, n, [0.0, 0.0]);
        let e = m.push(c + du - dv, n, [1.0, 0.0]);
        m.indices.extend_from_slice(&[a, d, b, d, e, b]);
    }
    m
}

/// Y-aligned capped frustum centred on the origin.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial: u32) -> MeshData {
    let mut m = MeshData::default();
    let radial = radial.max(3);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(2);
    for y in 0..=1u32 {
        let v = y as f32;
        let r = v * (radius_bottom - radius_top) + radius_top;
        let mut row = Vec::with_capacity(radial as usize + 1);
        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let (s, c) = (u * TAU).sin_cos();
            let n = Vec3::new(s, slope, c).normalize();
            row.push(m.push(Vec3::new(r * s, half - v * height, r * c), n, [u, 1.0 - v]));
        }
        grid.push(row);
    }
    for x in 0..radial as usize {
        let a = grid[0][x];
        let b = grid[1][x];
        let c = grid[1][x + 1];
        let d = grid[0][x + 1];
        m.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    for (top, r, y) in [(true, radius_top, half), (false, radius_bottom, -half)] {
        if r <= 0.0 {
            continue;
        }
        let n = if top { Vec3::Y } else { Vec3::NEG_Y };
        let center = m.push(Vec3::new(0.0, y, 0.0), n, [0.5, 0.5]);
        let start = m.positions.len() as u32;
        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let (s, c) = (u * TAU).sin_cos();
            m.push(Vec3::new(r * s, y, r * c), n, [c * 0.5 + 0.5, s * 0.5 + 0.5]);
        }
        for x in 0..radial {
            let i = start + x;
            if top {
                m.indices.extend_from_slice(&[i, i + 1, center]);
            } else {
                m.indices.extend_from_slice(&[i + 1, i, center]);
            }
        }
    }
    m
}

const ICO_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

fn ico_vertices() -> [Vec3; 12] {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, t, 0.0), Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0), Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t), Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t), Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0), Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0), Vec3::new(-t, 0.0, 1.0),
    ]
    .map(Vec3::normalize)
}

/// Flat-shaded icosphere; each detail level quarters every face.
pub fn icosahedron(radius: f32, detail: u32) -> MeshData {
    let v = ico_vertices();
    let mut tris: Vec<[Vec3; 3]> = ICO_FACES.iter().map(|f| [v[f[0]], v[f[1]], v[f[2]]]).collect();
    for _ in 0..detail {
        tris = tris
            .into_iter()
            .flat_map(|[a, b, c]| {
                let ab = ((a + b) * 0.5).normalize();
                let bc = ((b + c) * 0.5).normalize();
                let ca = ((c + a) * 0.5).normalize();
                [[a, ab, ca], [ab, b, bc], [ca, bc, c], [ab, bc, ca]]
            })
            .collect();
    }
    flat(tris.into_iter().map(|t| t.map(|p| p * radius)))
}

/// Dual of the icosahedron: one pentagon per icosahedron vertex.
pub fn dodecahedron(radius: f32) -> MeshData {
    let v = ico_vertices();
    let centroids: Vec<Vec3> = ICO_FACES
        .iter()
        .map(|f| ((v[f[0]] + v[f[1]] + v[f[2]]) / 3.0).normalize() * radius)
        .collect();

    let mut tris = Vec::with_capacity(36);
    for (vi, axis) in v.iter().enumerate() {
        let u = axis.any_orthonormal_vector();
        let w = axis.cross(u);
        let mut ring: Vec<Vec3> = ICO_FACES
            .iter()
            .enumerate()
            .filter(|(_, f)| f.contains(&vi))
            .map(|(fi, _)| centroids[fi])
            .collect();
        ring.sort_by(|a, b| {
            let ta = a.dot(w).atan2(a.dot(u));
            let tb = b.dot(w).atan2(b.dot(u));
            ta.total_cmp(&tb)
        });
        for i in 1..ring.len() - 1 {
            tris.push([ring[0], ring[i], ring[i + 1]]);
        }
    }
    flat(tris.into_iter())
}

fn flat(tris: impl Iterator<Item = [Vec3; 3]>) -> MeshData {
    let mut m = MeshData::default();
    for [a, b, c] in tris {
        let mut n = (b - a).cross(c - a).normalize_or_zero();
        // keep outward facing for a centred convex solid
        if n.dot(a + b + c) < 0.0 {
            n = -n;
        }
        let i = m.push(a, n, [0.0, 0.0]);
        m.push(b, n, [1.0, 0.0]);
        m.push(c, n, [0.5, 1.0]);
        m.indices.extend_from_slice(&[i, i + 1, i + 2]);
    }
    m
}

/// Unit quad in the XY plane facing +Z.
pub fn plane(width: f32, height: f32) -> MeshData {
    let mut m = MeshData::default();
    let (hw, hh) = (width * 0.5, height * 0.5);
    m.push(Vec3::new(-hw, hh, 0.0), Vec3::Z, [0.0, 1.0]);
    m.push(Vec3::new(hw, hh, 0.0), Vec3::Z, [1.0, 1.0]);
    m.push(Vec3::new(-hw, -hh, 0.0), Vec3::Z, [0.0, 0.0]);
    m.push(Vec3::new(hw, -hh, 0.0), Vec3::Z, [1.0, 0.0]);
    m.indices.extend_from_slice(&[0, 2, 1, 2, 3, 1]);
    m
}

/// Sweep a circle of `radius` along `path` using parallel-transport frames.
pub fn tube(path: &[Vec3], radius: f32, radial: u32) -> MeshData {
    let mut m = MeshData::default();
    if path.len() < 2 {
        return m;
    }
    let radial = radial.max(3);
    let last = path.len() - 1;

    let tangents: Vec<Vec3> = (0..path.len())
        .map(|i| {
            let a = path[i.saturating_sub(1)];
            let b = path[(i + 1).min(last)];
            (b - a).normalize_or_zero()
        })
        .collect();

    let mut normal = tangents[0].any_orthonormal_vector();
    for (i, p) in path.iter().enumerate() {
        if i > 0 {
            normal = Quat::from_rotation_arc(tangents[i - 1], tangents[i]) * normal;
        }
        let binormal = tangents[i].cross(normal);
        for j in 0..=radial {
            let (s, c) = (j as f32 / radial as f32 * TAU).sin_cos();
            let dir = (normal * c + binormal * s).normalize();
            m.push(*p + dir * radius, dir, [i as f32 / last as f32, j as f32 / radial as f32]);
        }
    }

    let row = radial + 1;
    for i in 0..last as u32 {
        for j in 0..radial {
            let a = i * row + j;
            let b = (i + 1) * row + j;
            let c = (i + 1) * row + j + 1;
            let d = i * row + j + 1;
            m.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    m
}

pub fn segments(pairs: &[(Vec3, Vec3)]) -> Geometry {
    Geometry::Lines(pairs.iter().flat_map(|(a, b)| [a.to_array(), b.to_array()]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_radius(m: &MeshData) -> f32 {
        m.positions.iter().map(|p| Vec3::from(*p).length()).fold(0.0, f32::max)
    }

    #[test]
    fn polyhedra_face_counts() {
        assert_eq!(icosahedron(1.0, 0).indices.len() / 3, 20);
        assert_eq!(icosahedron(1.0, 1).indices.len() / 3, 80);
        assert_eq!(dodecahedron(1.0).indices.len() / 3, 36);
    }

    #[test]
    fn polyhedra_sit_on_their_radius() {
        assert!((max_radius(&icosahedron(1.8, 1)) - 1.8).abs() < 1e-4);
        assert!((max_radius(&dodecahedron(1.5)) - 1.5).abs() < 1e-4);
    }

    #[test]
    fn dodecahedron_normals_point_out() {
        let m = dodecahedron(1.0);
        for (p, n) in m.positions.iter().zip(&m.normals) {
            assert!(Vec3::from(*p).dot(Vec3::from(*n)) > 0.0);
        }
    }

    #[test]
    fn indices_in_range() {
        for m in [
            sphere(0.1, 16, 16),
            cuboid(Vec3::splat(0.4)),
            cylinder(1.2, 1.8, 0.6, 16),
            plane(4.5, 1.2),
        ] {
            let n = m.vertex_count() as u32;
            assert!(m.indices.iter().all(|&i| i < n));
            assert_eq!(m.indices.len() % 3, 0);
        }
    }

    #[test]
    fn tube_follows_path() {
        let path: Vec<Vec3> = (0..=10).map(|i| Vec3::new(0.0, i as f32, 0.0)).collect();
        let m = tube(&path, 0.5, 8);
        assert_eq!(m.vertex_count(), 11 * 9);
        assert_eq!(m.indices.len(), 10 * 8 * 6);
        for p in &m.positions {
            let r = Vec3::new(p[0], 0.0, p[2]).length();
            assert!((r - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn wireframe_edges_are_unique() {
        // faces share no vertices: four sides and a diagonal each
        assert_eq!(cuboid(Vec3::ONE).edges().len() / 2, 6 * 5);
    }
}
