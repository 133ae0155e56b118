//! Scene Builder: assembles the decorative backdrop once at load.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Quat, Vec3};
use rand::Rng;

use crate::animation::{Motion, Wave};
use crate::color::Rgb;
use crate::config::SceneLayout;
use crate::particles::PointCloud;
use crate::rng::{band, centered, chance};
use crate::scene::geometry::{self, Geometry};
use crate::scene::{Camera, Drawable, Lights, Material, Node, NodeId, Scene, Transform};

const ACCENT: u32 = 0x38bdf8;
const STEEL: u32 = 0x475569;
const RUNG_COLORS: [u32; 4] = [0xff6b6b, 0x4ecdc4, 0x45b7d1, 0xf9ca24];

/// Ids of the groups the driver and tests care about.
#[derive(Clone, Debug, Default)]
pub struct Handles {
    pub lattice: Vec<NodeId>,
    pub lattice_edges: usize,
    pub helix: Option<NodeId>,
    pub rungs: usize,
    pub protein: Option<NodeId>,
    pub network: Option<NodeId>,
    pub heatmap: Option<NodeId>,
    pub cubes: Vec<NodeId>,
    pub molecule: Option<NodeId>,
    pub bonds: usize,
    pub equipment: Option<NodeId>,
    pub artifacts: Option<NodeId>,
    pub billboards: Vec<NodeId>,
    pub particles: Option<NodeId>,
}

/// Everything the renderer and the driver share: the one context object
/// owned by the page controller.
pub struct Backdrop {
    pub scene: Scene,
    pub camera: Camera,
    pub camera_distance: f32,
    pub lights: Lights,
    pub particles: PointCloud,
    /// Billboard texts, indexed by `Material::label`.
    pub labels: Vec<String>,
    pub handles: Handles,
}

pub fn build<R: Rng + ?Sized>(layout: &SceneLayout, width: f32, height: f32, rng: &mut R) -> Backdrop {
    let mut b = Builder { scene: Scene::new(), handles: Handles::default(), layout };

    b.lattice(rng);
    b.helix();
    b.artifacts(rng);
    b.billboards(rng);

    let particles = PointCloud::generate(&layout.particles, rng);
    let root = b.scene.root();
    let cloud = b.scene.add(
        root,
        Node::new("particles", Drawable::Points, Material::default().translucent(0.7))
            .animated(Motion::Spin(Vec3::new(0.0, 0.04, 0.0))),
    );
    b.handles.particles = Some(cloud);

    let Builder { scene, handles, .. } = b;
    log::info!(
        "backdrop built: {} nodes, {} geometries, {} particles",
        scene.len(),
        scene.geometries().len(),
        particles.len()
    );

    Backdrop {
        scene,
        camera: Camera::new(width, height, layout.camera_distance),
        camera_distance: layout.camera_distance,
        lights: Lights::default(),
        particles,
        labels: layout.billboards.terms.clone(),
        handles,
    }
}

struct Builder<'a> {
    scene: Scene,
    handles: Handles,
    layout: &'a SceneLayout,
}

impl Builder<'_> {
    fn lattice<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let l = &self.layout.lattice;
        let root = self.scene.root();
        let group = self.scene.add(root, Node::group("lattice"));
        let sphere = self.scene.add_geometry(Geometry::Mesh(geometry::sphere(l.node_radius, 16, 16)));
        let material = Material::glowing(Rgb::hex(ACCENT), Rgb::hex(0x1e40af), 0.1);

        let mid_layer = (l.layers.len() as f32 - 1.0) / 2.0;
        let mut layers: Vec<Vec<Vec3>> = Vec::with_capacity(l.layers.len());
        for (layer, &count) in l.layers.iter().enumerate() {
            let x = (layer as f32 - mid_layer) * l.layer_spacing;
            let mid = (count as f32 - 1.0) / 2.0;
            let mut points = Vec::with_capacity(count);
            for i in 0..count {
                let p = Vec3::new(x, (i as f32 - mid) * l.node_spacing, centered(rng, l.depth_jitter));
                let motion = Motion::Pulse { phase: rng.gen::<f32>() * TAU, speed: band(rng, 0.02, 0.02) };
                let id = self.scene.add(
                    group,
                    Node::new("neuron", Drawable::Mesh(sphere), material.clone())
                        .with_transform(Transform::at(p))
                        .animated(motion),
                );
                self.handles.lattice.push(id);
                points.push(p);
            }
            layers.push(points);
        }

        let mut edges = Vec::new();
        for pair in layers.windows(2) {
            for &a in &pair[0] {
                for &b in &pair[1] {
                    if chance(rng, l.edge_probability) {
                        edges.push((a, b));
                    }
                }
            }
        }
        self.handles.lattice_edges = edges.len();
        let lines = self.scene.add_geometry(geometry::segments(&edges));
        self.scene.add(
            group,
            Node::new("synapses", Drawable::Lines(lines), Material::solid(ACCENT).translucent(0.3)),
        );
    }

    fn helix(&mut self) {
        let h = &self.layout.helix;
        let root = self.scene.root();
        let group = self.scene.add(
            root,
            Node::group("helix")
                .with_transform(Transform::at(Vec3::new(h.offset_x, 0.0, 0.0)))
                .animated(Motion::Sway {
                    spin: Vec3::new(0.0, 0.4, 0.0),
                    tilt: Wave::new(0.15, 0.25, 0.0),
                    bob: Wave::new(2.0, 0.3, 0.0),
                }),
        );
        self.handles.helix = Some(group);

        let samples = h.samples.max(2);
        let (mut a, mut b) = (Vec::with_capacity(samples + 1), Vec::with_capacity(samples + 1));
        for i in 0..=samples {
            let f = i as f32 / samples as f32;
            let angle = f * h.turns * TAU;
            let y = f * h.height - h.height / 2.0;
            a.push(Vec3::new(angle.cos() * h.radius, y, angle.sin() * h.radius));
            b.push(Vec3::new((angle + PI).cos() * h.radius, y, (angle + PI).sin() * h.radius));
        }

        let strand = Material::glowing(Rgb::hex(0x0ea5e9), Rgb::hex(0x0284c7), 0.1);
        for (name, path) in [("strand-a", &a), ("strand-b", &b)] {
            let mesh = self.scene.add_geometry(Geometry::Mesh(geometry::tube(path, h.tube_radius, 12)));
            self.scene.add(group, Node::new(name, Drawable::Mesh(mesh), strand.clone()));
        }

        let rung = self.scene.add_geometry(Geometry::Mesh(geometry::cylinder(0.04, 0.04, 1.0, 8)));
        let step = h.rung_every.max(1);
        for (k, i) in (0..a.len()).step_by(step).enumerate() {
            let color = Rgb::hex(RUNG_COLORS[k % RUNG_COLORS.len()]);
            let node = Node::new("base-pair", Drawable::Mesh(rung), Material::glowing(color, color, 0.05))
                .with_transform(span(a[i], b[i]));
            self.scene.add(group, node);
            self.handles.rungs += 1;
        }
    }

    fn artifacts<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let layout = self.layout;
        let root = self.scene.root();
        let group = self.scene.add(
            root,
            Node::group("artifacts").animated(Motion::Spin(Vec3::new(0.0, 0.06, 0.0))),
        );
        self.handles.artifacts = Some(group);

        let p = &layout.protein;
        let mesh = self.scene.add_geometry(Geometry::Mesh(geometry::icosahedron(p.radius, 1)));
        let protein = self.scene.add(
            group,
            Node::new("protein", Drawable::Mesh(mesh), Material::solid(p.color).wireframe())
                .with_transform(Transform::at(p.at.into()))
                .animated(Motion::Sway {
                    spin: Vec3::new(0.5, 0.3, 0.0),
                    tilt: Wave::default(),
                    bob: Wave::accumulated(0.01, 0.4, -FRAC_PI_2),
                }),
        );
        self.handles.protein = Some(protein);

        let n = &layout.network;
        let mesh = self.scene.add_geometry(Geometry::Mesh(geometry::dodecahedron(n.radius)));
        let network = self.scene.add(
            group,
            Node::new("network", Drawable::Mesh(mesh), Material::solid(n.color).translucent(0.8))
                .with_transform(Transform::at(n.at.into()))
                .animated(Motion::Sway {
                    spin: Vec3::new(0.25, 0.0, 0.2),
                    tilt: Wave::default(),
                    bob: Wave::accumulated(0.015, 0.35, 0.0),
                }),
        );
        self.handles.network = Some(network);

        self.heatmap(group, rng);
        self.molecule(group, rng);
        self.equipment(group);
    }

    fn heatmap<R: Rng + ?Sized>(&mut self, parent: NodeId, rng: &mut R) {
        let h = &self.layout.heatmap;
        let group = self.scene.add(
            parent,
            Node::group("heatmap")
                .with_transform(Transform::at(h.at.into()).with_scale(Vec3::splat(h.scale)))
                .animated(Motion::Spin(Vec3::new(0.0, 0.15, 0.0))),
        );
        self.handles.heatmap = Some(group);

        let cube = self.scene.add_geometry(Geometry::Mesh(geometry::cuboid(Vec3::splat(h.cube))));
        let (mr, mc) = ((h.rows as f32 - 1.0) / 2.0, (h.cols as f32 - 1.0) / 2.0);
        for i in 0..h.rows {
            for j in 0..h.cols {
                let k = self.handles.cubes.len();
                let intensity: f32 = rng.gen();
                let color = Rgb::hsl(0.7 - intensity * 0.7, 0.9, 0.3 + intensity * 0.5);
                let at = Vec3::new((i as f32 - mr) * h.spacing, (j as f32 - mc) * h.spacing, 0.0);
                let id = self.scene.add(
                    group,
                    Node::new("cell", Drawable::Mesh(cube), Material::glowing(color, color, 0.1))
                        .with_transform(Transform::at(at))
                        .animated(Motion::Spin(Vec3::new(0.1 + k as f32 * 0.01, 0.0, 0.0))),
                );
                self.handles.cubes.push(id);
            }
        }
    }

    fn molecule<R: Rng + ?Sized>(&mut self, parent: NodeId, rng: &mut R) {
        let m = &self.layout.molecule;
        let group = self.scene.add(
            parent,
            Node::group("molecule")
                .with_transform(Transform::at(m.at.into()))
                .animated(Motion::Sway {
                    spin: Vec3::new(0.0, 0.3, 0.0),
                    tilt: Wave::new(0.1, 0.2, 0.0),
                    bob: Wave::default(),
                }),
        );
        self.handles.molecule = Some(group);

        let atom = self.scene.add_geometry(Geometry::Mesh(geometry::sphere(m.atom_radius, 16, 16)));
        let bond = self.scene.add_geometry(Geometry::Mesh(geometry::cylinder(m.bond_radius, m.bond_radius, 1.0, 8)));
        let atoms: Vec<Vec3> = m.atoms.iter().map(|&p| p.into()).collect();

        for (i, &p) in atoms.iter().enumerate() {
            let color = Rgb::hex(m.colors.get(i).copied().unwrap_or(ACCENT));
            self.scene.add(
                group,
                Node::new("atom", Drawable::Mesh(atom), Material::glowing(color, color, 0.1))
                    .with_transform(Transform::at(p)),
            );
            for &q in &atoms[i + 1..] {
                if chance(rng, m.bond_probability) {
                    self.scene.add(
                        group,
                        Node::new("bond", Drawable::Mesh(bond), Material::solid(0x94a3b8))
                            .with_transform(span(p, q)),
                    );
                    self.handles.bonds += 1;
                }
            }
        }
    }

    fn equipment(&mut self, parent: NodeId) {
        let layout = self.layout;
        let group = self.scene.add(
            parent,
            Node::group("equipment").animated(Motion::Spin(Vec3::new(0.0, 0.08, 0.0))),
        );
        self.handles.equipment = Some(group);

        let scanner = self.scene.add(
            group,
            Node::group("scanner").with_transform(
                Transform::at(layout.scanner_at.into()).with_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2)),
            ),
        );
        let body = self.scene.add_geometry(Geometry::Mesh(geometry::cylinder(3.5, 3.5, 2.5, 20)));
        let bore = self.scene.add_geometry(Geometry::Mesh(geometry::cylinder(1.8, 1.8, 2.7, 20)));
        self.scene.add(scanner, Node::new("scanner-body", Drawable::Mesh(body), Material::solid(STEEL)));
        self.scene.add(scanner, Node::new("scanner-bore", Drawable::Mesh(bore), Material::solid(0x1e293b)));

        let scope = self.scene.add(
            group,
            Node::group("microscope").with_transform(Transform::at(layout.microscope_at.into())),
        );
        let base = self.scene.add_geometry(Geometry::Mesh(geometry::cylinder(1.2, 1.8, 0.6, 16)));
        let arm = self.scene.add_geometry(Geometry::Mesh(geometry::cylinder(0.2, 0.2, 3.0, 12)));
        self.scene.add(scope, Node::new("microscope-base", Drawable::Mesh(base), Material::solid(STEEL)));
        self.scene.add(
            scope,
            Node::new("microscope-arm", Drawable::Mesh(arm), Material::solid(STEEL))
                .with_transform(Transform::at(Vec3::new(0.0, 1.8, 0.0))),
        );
    }

    fn billboards<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let b = &self.layout.billboards;
        let root = self.scene.root();
        let group = self.scene.add(
            root,
            Node::group("billboards").animated(Motion::Spin(Vec3::new(0.0, 0.03, 0.0))),
        );
        let plane = self.scene.add_geometry(Geometry::Mesh(geometry::plane(b.size[0], b.size[1])));

        for index in 0..b.terms.len() {
            let at = Vec3::new(centered(rng, b.bounds[0]), centered(rng, b.bounds[1]), centered(rng, b.bounds[2]));
            let rotation = Vec3::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI, rng.gen::<f32>() * PI);
            let motion = Motion::Billboard {
                index,
                spin: Vec3::new(centered(rng, 0.015), centered(rng, 0.02), centered(rng, 0.01)),
                float_speed: band(rng, 0.0008, 0.002),
                float_offset: rng.gen::<f32>() * TAU,
            };
            let material = Material { label: Some(index), ..Material::default().translucent(0.8) };
            let id = self.scene.add(
                group,
                Node::new("billboard", Drawable::Mesh(plane), material)
                    .with_transform(Transform::at(at).with_rotation(rotation))
                    .animated(motion),
            );
            self.handles.billboards.push(id);
        }
    }
}

/// Unit-height Y cylinder stretched and turned to join `from` and `to`.
fn span(from: Vec3, to: Vec3) -> Transform {
    let d = to - from;
    let mut t = Transform::at((from + to) * 0.5).with_scale(Vec3::new(1.0, d.length(), 1.0));
    t.set_quat(Quat::from_rotation_arc(Vec3::Y, d.normalize_or_zero()));
    t
}
