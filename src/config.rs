//! Layout constants as data.
//!
//! `SceneLayout::default()` is the stock backdrop. A page can override any
//! subset of fields with an inline JSON block; unspecified fields keep
//! their defaults.

use serde::{Deserialize, Serialize};

use crate::error::BackdropError;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLayout {
    pub camera_distance: f32,
    pub lattice: LatticeLayout,
    pub helix: HelixLayout,
    pub protein: ProteinLayout,
    pub network: NetworkLayout,
    pub heatmap: HeatmapLayout,
    pub molecule: MoleculeLayout,
    pub scanner_at: [f32; 3],
    pub microscope_at: [f32; 3],
    pub billboards: BillboardLayout,
    pub particles: ParticleLayout,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            camera_distance: 20.0,
            lattice: LatticeLayout::default(),
            helix: HelixLayout::default(),
            protein: ProteinLayout::default(),
            network: NetworkLayout::default(),
            heatmap: HeatmapLayout::default(),
            molecule: MoleculeLayout::default(),
            scanner_at: [22.0, 2.0, -18.0],
            microscope_at: [-22.0, -8.0, 8.0],
            billboards: BillboardLayout::default(),
            particles: ParticleLayout::default(),
        }
    }
}

impl SceneLayout {
    /// Parse a partial override document on top of the defaults.
    pub fn from_json(src: &str) -> Result<Self, BackdropError> {
        Ok(serde_json::from_str(src)?)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeLayout {
    pub layers: Vec<usize>,
    pub layer_spacing: f32,
    pub node_spacing: f32,
    pub depth_jitter: f32,
    pub edge_probability: f32,
    pub node_radius: f32,
}

impl Default for LatticeLayout {
    fn default() -> Self {
        Self {
            layers: vec![6, 8, 8, 8, 6],
            layer_spacing: 8.0,
            node_spacing: 2.0,
            depth_jitter: 4.0,
            edge_probability: 0.7,
            node_radius: 0.1,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HelixLayout {
    pub radius: f32,
    pub height: f32,
    pub turns: f32,
    pub samples: usize,
    pub tube_radius: f32,
    pub rung_every: usize,
    pub offset_x: f32,
}

impl Default for HelixLayout {
    fn default() -> Self {
        Self {
            radius: 2.5,
            height: 25.0,
            turns: 8.0,
            samples: 300,
            tube_radius: 0.12,
            rung_every: 20,
            offset_x: 5.0,
        }
    }
}

/// Wireframe icosahedron standing in for a folded protein.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProteinLayout {
    pub radius: f32,
    pub at: [f32; 3],
    pub color: u32,
}

impl Default for ProteinLayout {
    fn default() -> Self {
        Self { radius: 1.8, at: [12.0, 8.0, -5.0], color: 0x22d3ee }
    }
}

/// Translucent dodecahedron standing in for a neural network.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkLayout {
    pub radius: f32,
    pub at: [f32; 3],
    pub color: u32,
}

impl Default for NetworkLayout {
    fn default() -> Self {
        Self { radius: 1.5, at: [-12.0, -6.0, 8.0], color: 0xf59e0b }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapLayout {
    pub rows: usize,
    pub cols: usize,
    pub cube: f32,
    pub spacing: f32,
    pub at: [f32; 3],
    pub scale: f32,
}

impl Default for HeatmapLayout {
    fn default() -> Self {
        Self { rows: 10, cols: 10, cube: 0.4, spacing: 0.5, at: [20.0, -5.0, 5.0], scale: 0.8 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MoleculeLayout {
    pub atoms: Vec<[f32; 3]>,
    pub colors: Vec<u32>,
    pub atom_radius: f32,
    pub bond_radius: f32,
    pub bond_probability: f32,
    pub at: [f32; 3],
}

impl Default for MoleculeLayout {
    fn default() -> Self {
        Self {
            atoms: vec![
                [0.0, 0.0, 0.0],
                [1.5, 0.8, 0.5],
                [-1.2, 0.4, -0.3],
                [0.7, -1.3, 1.0],
                [-0.5, -1.0, -1.2],
                [0.3, 1.5, -0.8],
                [-1.5, 0.2, 0.9],
            ],
            colors: vec![0xff6b6b, 0x4ecdc4, 0x45b7d1, 0xf9ca24, 0x6c5ce7, 0xff9ff3, 0x54a0ff],
            atom_radius: 0.25,
            bond_radius: 0.06,
            bond_probability: 0.5,
            at: [-8.0, 12.0, -10.0],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BillboardLayout {
    pub terms: Vec<String>,
    pub size: [f32; 2],
    pub bounds: [f32; 3],
}

impl Default for BillboardLayout {
    fn default() -> Self {
        let terms = [
            "Deep Learning", "Medical Imaging", "Genomics", "fMRI Analysis",
            "Neural Networks", "Mammography", "Multi-Omics", "Bioinformatics",
            "Machine Learning", "Computer Vision", "Structural Variants",
            "Behavioral Analysis", "DNA Sequencing", "PyTorch", "Transformers",
            "Autoencoder", "Aging Research",
        ];
        Self {
            terms: terms.iter().map(|s| s.to_string()).collect(),
            size: [4.5, 1.2],
            bounds: [100.0, 50.0, 80.0],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleLayout {
    pub count: usize,
    pub bounds: [f32; 3],
    pub hue: [f32; 2],
    pub lightness: [f32; 2],
    pub size: [f32; 2],
}

impl Default for ParticleLayout {
    fn default() -> Self {
        Self {
            count: 3000,
            bounds: [120.0, 60.0, 80.0],
            hue: [0.55, 0.15],
            lightness: [0.4, 0.4],
            size: [0.5, 3.0],
        }
    }
}

/// Where the adventure planner sends prompts.
///
/// The endpoint is a same-site proxy that holds any credentials for the
/// generation service; the page never sees a key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub endpoint: String,
}

impl PlannerConfig {
    /// `None` when no endpoint is configured; the planner stays inert.
    pub fn from_attrs(endpoint: Option<String>) -> Option<Self> {
        let endpoint = endpoint?.trim().to_string();
        if endpoint.is_empty() {
            return None;
        }
        Some(Self { endpoint })
    }

    pub fn request_url(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let layout = SceneLayout::from_json(r#"{"particles":{"count":500},"camera_distance":30}"#)
            .unwrap();
        assert_eq!(layout.particles.count, 500);
        assert_eq!(layout.particles.bounds, [120.0, 60.0, 80.0]);
        assert_eq!(layout.camera_distance, 30.0);
        assert_eq!(layout.lattice.layers, vec![6, 8, 8, 8, 6]);
    }

    #[test]
    fn bad_override_is_config_error() {
        assert!(matches!(
            SceneLayout::from_json("{not json"),
            Err(BackdropError::Config(_))
        ));
    }

    #[test]
    fn partial_solid_override_keeps_other_fields() {
        let layout = SceneLayout::from_json(r#"{"protein":{"radius":2.5},"network":{"at":[0,1,2]}}"#).unwrap();
        assert_eq!(layout.protein.radius, 2.5);
        assert_eq!(layout.protein.at, [12.0, 8.0, -5.0]);
        assert_eq!(layout.protein.color, 0x22d3ee);
        assert_eq!(layout.network.at, [0.0, 1.0, 2.0]);
        assert_eq!(layout.network.radius, 1.5);
        assert_eq!(layout.network.color, 0xf59e0b);
    }

    #[test]
    fn planner_config_needs_endpoint() {
        assert_eq!(PlannerConfig::from_attrs(None), None);
        assert_eq!(PlannerConfig::from_attrs(Some("  ".into())), None);

        let cfg = PlannerConfig::from_attrs(Some(" /api/plan ".into())).unwrap();
        assert_eq!(cfg.request_url(), "/api/plan");
    }

    #[test]
    fn endpoint_is_used_verbatim() {
        let cfg = PlannerConfig::from_attrs(Some("/proxy/adventure?v=2".into())).unwrap();
        assert_eq!(cfg.request_url(), "/proxy/adventure?v=2");
        assert!(!cfg.request_url().contains("key="));
    }
}
