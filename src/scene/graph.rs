use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::animation::{AnimationTag, Motion};
use crate::color::Rgb;
use crate::scene::geometry::Geometry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(usize);

impl GeometryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position, XYZ Euler rotation and scale, composed as T·R·S.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Vec3::ZERO, scale: Vec3::ONE }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self { position, ..Default::default() }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn set_quat(&mut self, q: Quat) {
        let (x, y, z) = q.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// Opaque visual description handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub opacity: f32,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub wireframe: bool,
    /// Index into the backdrop's label list; the mesh samples that texture.
    pub label: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Rgb::hex(0xffffff),
            opacity: 1.0,
            emissive: Rgb::hex(0x000000),
            emissive_intensity: 0.0,
            wireframe: false,
            label: None,
        }
    }
}

impl Material {
    pub fn solid(color: u32) -> Self {
        Self { color: Rgb::hex(color), ..Default::default() }
    }

    pub fn glowing(color: Rgb, emissive: Rgb, intensity: f32) -> Self {
        Self { color, emissive, emissive_intensity: intensity, ..Default::default() }
    }

    pub fn translucent(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn wireframe(mut self) -> Self {
        self.wireframe = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drawable {
    Group,
    Mesh(GeometryId),
    Lines(GeometryId),
    /// The backdrop's point cloud buffer.
    Points,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub drawable: Drawable,
    pub transform: Transform,
    pub material: Material,
    pub tag: Option<AnimationTag>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Drawable::Group, Material::default())
    }

    pub fn new(name: impl Into<String>, drawable: Drawable, material: Material) -> Self {
        Self {
            name: name.into(),
            drawable,
            transform: Transform::default(),
            material,
            tag: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Attach a motion whose rest pose is the node's current transform.
    pub fn animated(mut self, motion: Motion) -> Self {
        self.tag = Some(AnimationTag::new(self.transform, motion));
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena scene graph.
///
/// Nodes are only ever appended under an existing parent, so a parent's
/// index is always lower than its children's and world matrices resolve in
/// one forward pass.
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: Vec<Node>,
    geometries: Vec<Geometry>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self { nodes: vec![Node::group("scene")], geometries: Vec::new() }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> &Geometry {
        &self.geometries[id.0]
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Structural links stay private, so this cannot break parenting.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Model-to-world matrix for every node, indexed like `nodes()`.
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut out: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let world = match node.parent {
                Some(p) => out[p.0] * local,
                None => local,
            };
            out.push(world);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_node_has_one_parent() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = scene.add(root, Node::group("g"));
        let a = scene.add(g, Node::group("a"));
        let b = scene.add(g, Node::group("b"));

        assert_eq!(scene.node(a).parent(), Some(g));
        assert_eq!(scene.node(b).parent(), Some(g));
        assert_eq!(scene.node(g).children(), &[a, b]);
        assert_eq!(scene.node(root).parent(), None);

        let listed: usize = scene.nodes().iter().map(|n| n.children().len()).sum();
        assert_eq!(listed, scene.len() - 1);
    }

    #[test]
    fn world_matrix_composes_parent_first() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = scene.add(
            root,
            Node::group("g").with_transform(Transform::at(Vec3::new(10.0, 0.0, 0.0))),
        );
        let c = scene.add(
            g,
            Node::group("c").with_transform(Transform::at(Vec3::new(0.0, 2.0, 0.0))),
        );
        let m = scene.world_matrices();
        let p = m[c.index()].transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(10.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn quat_round_trips_through_euler() {
        let q = Quat::from_rotation_arc(Vec3::Y, Vec3::new(1.0, 1.0, 0.0).normalize());
        let mut t = Transform::default();
        t.set_quat(q);
        let v = t.quat() * Vec3::Y;
        assert!((v - q * Vec3::Y).length() < 1e-4);
    }
}
