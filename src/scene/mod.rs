pub mod builder;
pub mod camera;
pub mod geometry;
pub mod graph;
pub mod light;

pub use builder::{build, Backdrop, Handles};
pub use camera::Camera;
pub use graph::{Drawable, GeometryId, Material, Node, NodeId, Scene, Transform};
pub use light::Lights;
