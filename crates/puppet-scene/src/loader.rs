//! Building scene trees from scene descriptions

use crate::format::{NodeDef, NodeKindDef, SceneFile, TransformOp};
use crate::node::{GeometryNode, JointNode, SceneNode, HEAD_JOINT_NAME};
use crate::tree::SceneTree;
use glam::Vec3;
use puppet_core::{JointRange, NodeIdAllocator, PuppetError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a scene from a TOML file
pub fn load_scene<P: AsRef<Path>>(
    path: P,
    alloc: &mut NodeIdAllocator,
) -> Result<(SceneTree, SceneFile)> {
    let content = fs::read_to_string(path)?;
    load_scene_string(&content, alloc)
}

/// Load a scene from a TOML string
pub fn load_scene_string(
    content: &str,
    alloc: &mut NodeIdAllocator,
) -> Result<(SceneTree, SceneFile)> {
    let scene_file: SceneFile = toml::from_str(content)?;
    let tree = build_tree(&scene_file, alloc)?;
    Ok((tree, scene_file))
}

/// Build a fresh, initialized tree from a parsed description.
///
/// Every call draws new ids from `alloc`.
pub fn build_tree(scene_file: &SceneFile, alloc: &mut NodeIdAllocator) -> Result<SceneTree> {
    let root = build_node(&scene_file.root, alloc)?;
    let mut tree = SceneTree::new(root);
    tree.initialize_tree();
    log::info!(
        "Built scene '{}' with {} nodes",
        scene_file.scene.name,
        tree.node_count()
    );
    Ok(tree)
}

fn build_node(def: &NodeDef, alloc: &mut NodeIdAllocator) -> Result<SceneNode> {
    let mut node = match def.kind {
        NodeKindDef::Plain => SceneNode::new_plain(alloc, def.name.clone()),
        NodeKindDef::Geometry => {
            let mesh = def.mesh.as_ref().ok_or_else(|| {
                PuppetError::Scene(format!("Geometry node '{}' has no mesh", def.name))
            })?;
            let geometry = GeometryNode::new(mesh.clone())
                .with_material(def.material.unwrap_or_default());
            SceneNode::new_geometry(alloc, def.name.clone(), geometry)
        }
        NodeKindDef::Joint => {
            let mut joint = JointNode::new();
            if let Some([min, init, max]) = def.joint_x {
                joint.set_x_range(JointRange::checked_from_degrees(&def.name, min, init, max)?);
            }
            if let Some([min, init, max]) = def.joint_y {
                joint.set_y_range(JointRange::checked_from_degrees(&def.name, min, init, max)?);
            }
            SceneNode::new_joint(alloc, def.name.clone(), joint)
        }
    };

    for op in &def.transform {
        match *op {
            TransformOp::Translate(v) => node.translate(Vec3::from_array(v)),
            TransformOp::Rotate { axis, degrees } => node.rotate(axis, degrees),
            TransformOp::Scale(v) => node.scale(Vec3::from_array(v)),
        }
    }

    for child in &def.children {
        node.add_child(build_node(child, alloc)?);
    }

    Ok(node)
}

/// Check a description for problems that do not prevent loading
pub fn validate_scene(scene_file: &SceneFile) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    let mut has_head = false;

    scene_file.root.walk(&mut |def| {
        if !seen.insert(def.name.as_str()) {
            warnings.push(format!("Duplicate node name '{}'", def.name));
        }
        match def.kind {
            NodeKindDef::Joint => {
                if def.name == HEAD_JOINT_NAME {
                    has_head = true;
                }
                let degenerate = |r: Option<[f64; 3]>| r.map_or(true, |[min, _, max]| min == max);
                if degenerate(def.joint_x) && degenerate(def.joint_y) {
                    warnings.push(format!(
                        "Joint '{}' cannot move on either axis and is ignored by picking",
                        def.name
                    ));
                }
            }
            NodeKindDef::Geometry => {
                if def.mesh.is_none() {
                    warnings.push(format!("Geometry node '{}' has no mesh", def.name));
                }
            }
            NodeKindDef::Plain => {
                if def.mesh.is_some() || def.joint_x.is_some() || def.joint_y.is_some() {
                    warnings.push(format!(
                        "Plain node '{}' carries geometry or joint fields that are ignored",
                        def.name
                    ));
                }
            }
        }
    });

    if !has_head {
        warnings.push(format!("No joint named '{}'; head controls are inactive", HEAD_JOINT_NAME));
    }

    warnings
}
