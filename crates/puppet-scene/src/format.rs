//! Scene description format definitions

use puppet_core::{Axis, Material};
use serde::{Deserialize, Serialize};

/// Root structure of a scene TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub scene: SceneMetadata,
    pub root: NodeDef,
}

/// Scene metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Which node variant a definition builds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKindDef {
    #[default]
    Plain,
    Geometry,
    Joint,
}

/// One construction-time transform step, applied in listed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformOp {
    Translate([f32; 3]),
    Rotate { axis: Axis, degrees: f32 },
    Scale([f32; 3]),
}

/// Definition of a node and its subtree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    #[serde(default)]
    pub kind: NodeKindDef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<TransformOp>,
    /// Mesh batch key, required for geometry nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    /// Pitch range in degrees: [min, init, max]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_x: Option<[f64; 3]>,
    /// Yaw range in degrees: [min, init, max]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_y: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDef>,
}

impl NodeDef {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKindDef::Plain,
            transform: Vec::new(),
            mesh: None,
            material: None,
            joint_x: None,
            joint_y: None,
            children: Vec::new(),
        }
    }

    pub fn geometry(name: impl Into<String>, mesh: impl Into<String>) -> Self {
        Self {
            kind: NodeKindDef::Geometry,
            mesh: Some(mesh.into()),
            ..Self::plain(name)
        }
    }

    pub fn joint(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKindDef::Joint,
            ..Self::plain(name)
        }
    }

    pub fn with_joint_x(mut self, min: f64, init: f64, max: f64) -> Self {
        self.joint_x = Some([min, init, max]);
        self
    }

    pub fn with_joint_y(mut self, min: f64, init: f64, max: f64) -> Self {
        self.joint_y = Some([min, init, max]);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_transform(mut self, op: TransformOp) -> Self {
        self.transform.push(op);
        self
    }

    pub fn with_child(mut self, child: NodeDef) -> Self {
        self.children.push(child);
        self
    }

    /// Visit this definition and all descendants in pre-order
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a NodeDef)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

impl SceneFile {
    pub fn new(name: impl Into<String>, root: NodeDef) -> Self {
        Self {
            scene: SceneMetadata {
                name: name.into(),
                version: default_version(),
                description: None,
            },
            root,
        }
    }
}
