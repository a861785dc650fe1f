//! Tree command

use super::{format_structured, OutputFormat};
use anyhow::{Context, Result};
use puppet_core::{NodeId, NodeIdAllocator};
use puppet_scene::{load_scene, NodeKind, SceneNode, SceneTree};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TreeReport {
    pub scene: String,
    pub node_count: usize,
    pub root: NodeInfo,
}

#[derive(Debug, Serialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<String>,
    /// Articulated joint moving this geometry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joint: Option<NodeId>,
    /// Current rotation in degrees, `[pitch, yaw]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch_range: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaw_range: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeInfo>,
}

impl NodeInfo {
    pub fn from_node(node: &SceneNode) -> Self {
        let mut info = NodeInfo {
            id: node.id(),
            name: node.name.clone(),
            kind: node.kind().label(),
            mesh: None,
            joint: None,
            rotation: None,
            pitch_range: None,
            yaw_range: None,
            children: node.children().iter().map(NodeInfo::from_node).collect(),
        };
        match node.kind() {
            NodeKind::Plain => {}
            NodeKind::Geometry(geometry) => {
                info.mesh = Some(geometry.mesh_id().to_string());
                info.joint = geometry.parent_joint();
            }
            NodeKind::Joint(joint) => {
                let r = joint.rotation();
                info.rotation = Some([r.x.to_degrees(), r.y.to_degrees()]);
                let degrees = |min: f32, init: f32, max: f32| {
                    [min.to_degrees(), init.to_degrees(), max.to_degrees()]
                };
                let (x, y) = (joint.x_range(), joint.y_range());
                info.pitch_range = Some(degrees(x.min, x.init, x.max));
                info.yaw_range = Some(degrees(y.min, y.init, y.max));
            }
        }
        info
    }
}

pub fn report(scene_name: &str, tree: &SceneTree) -> TreeReport {
    TreeReport {
        scene: scene_name.to_string(),
        node_count: tree.node_count(),
        root: NodeInfo::from_node(tree.root()),
    }
}

pub fn run(scene_path: &str, format: OutputFormat) -> Result<()> {
    let mut alloc = NodeIdAllocator::new();
    let (tree, scene_file) = load_scene(scene_path, &mut alloc)
        .with_context(|| format!("Failed to load scene '{}'", scene_path))?;

    let output = match format {
        OutputFormat::Text => format!(
            "Scene: {} ({} nodes)\n{}",
            scene_file.scene.name,
            tree.node_count(),
            tree.describe()
        ),
        _ => format_structured(&report(&scene_file.scene.name, &tree), format)?,
    };
    println!("{}", output.trim_end());

    Ok(())
}
