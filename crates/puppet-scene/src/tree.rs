//! SceneTree - a single-rooted tree of exclusively owned nodes

use crate::node::{NodeKind, SceneNode};
use crate::visitor::SceneVisitor;
use glam::{Mat4, Vec2};
use puppet_core::NodeId;
use std::fmt::Write;

/// The scene tree for one session.
///
/// Lookups are depth-first searches; puppets have tens of nodes, so no
/// id index is kept.
#[derive(Debug, Clone)]
pub struct SceneTree {
    root: SceneNode,
}

impl SceneTree {
    /// Wrap a root node. Call [`SceneTree::initialize_tree`] once the tree is complete.
    pub fn new(root: SceneNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SceneNode {
        &mut self.root
    }

    pub fn node_count(&self) -> usize {
        self.root.subtree_len()
    }

    /// Link every geometry node to the nearest articulated ancestor joint.
    ///
    /// Joints that cannot move on either axis pass the inherited joint
    /// through, so they are invisible to picking.
    pub fn initialize_tree(&mut self) {
        link_parent_joints(&mut self.root, None);
    }

    /// Return every joint to its rest pose and clear all selection flags
    pub fn reset_tree(&mut self) {
        reset_subtree(&mut self.root);
    }

    pub fn draw<V: SceneVisitor + ?Sized>(&self, visitor: &mut V) {
        self.root.draw(visitor);
    }

    pub fn get_node(&self, id: NodeId) -> Option<&SceneNode> {
        find(&self.root, id)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        find_mut(&mut self.root, id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SceneNode> {
        find_where(&self.root, &|node: &SceneNode| node.name == name)
    }

    /// Ids of every joint, in pre-order
    pub fn joint_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        collect(&self.root, &mut |node: &SceneNode| {
            if node.as_joint().is_some() {
                out.push(node.id());
            }
        });
        out
    }

    /// Geometry nodes whose controlling joint is `joint`
    pub fn geometry_under_joint(&self, joint: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        collect(&self.root, &mut |node: &SceneNode| {
            if let Some(geometry) = node.as_geometry() {
                if geometry.parent_joint() == Some(joint) {
                    out.push(node.id());
                }
            }
        });
        out
    }

    /// Flip a node's selection flag. Returns false if no such node exists.
    pub fn toggle_selected(&mut self, id: NodeId) -> bool {
        match self.get_node_mut(id) {
            Some(node) => {
                node.toggle_selected();
                true
            }
            None => false,
        }
    }

    pub fn joint_rotation(&self, id: NodeId) -> Option<Vec2> {
        self.get_node(id)?.as_joint().map(|joint| joint.rotation())
    }

    /// Clamp and store a joint rotation. `None` if `id` is not a joint.
    pub fn set_joint_rotation(&mut self, id: NodeId, rotation: Vec2) -> Option<Vec2> {
        self.get_node_mut(id)?
            .as_joint_mut()
            .map(|joint| joint.set_rotation(rotation))
    }

    /// Product of local transforms from the root down to `id`
    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        world_of(&self.root, id, Mat4::IDENTITY)
    }

    /// Indented outline of the tree, one node per line
    pub fn describe(&self) -> String {
        let mut out = String::new();
        describe_node(&self.root, 0, &mut out);
        out
    }
}

fn link_parent_joints(node: &mut SceneNode, controller: Option<NodeId>) {
    let id = node.id();
    let controller = match node.kind_mut() {
        NodeKind::Joint(joint) if joint.is_articulated() => Some(id),
        NodeKind::Geometry(geometry) => {
            geometry.set_parent_joint(controller);
            controller
        }
        _ => controller,
    };
    for child in node.children_mut() {
        link_parent_joints(child, controller);
    }
}

fn reset_subtree(node: &mut SceneNode) {
    if let Some(joint) = node.as_joint_mut() {
        joint.reset();
    }
    node.set_selected(false);
    for child in node.children_mut() {
        reset_subtree(child);
    }
}

fn find(node: &SceneNode, id: NodeId) -> Option<&SceneNode> {
    if node.id() == id {
        return Some(node);
    }
    node.children().iter().find_map(|child| find(child, id))
}

fn find_mut(node: &mut SceneNode, id: NodeId) -> Option<&mut SceneNode> {
    if node.id() == id {
        return Some(node);
    }
    node.children_mut()
        .iter_mut()
        .find_map(|child| find_mut(child, id))
}

fn find_where<'a>(node: &'a SceneNode, pred: &dyn Fn(&SceneNode) -> bool) -> Option<&'a SceneNode> {
    if pred(node) {
        return Some(node);
    }
    node.children().iter().find_map(|child| find_where(child, pred))
}

fn collect(node: &SceneNode, f: &mut dyn FnMut(&SceneNode)) {
    f(node);
    for child in node.children() {
        collect(child, f);
    }
}

fn world_of(node: &SceneNode, id: NodeId, parent: Mat4) -> Option<Mat4> {
    let world = parent * node.local_transform();
    if node.id() == id {
        return Some(world);
    }
    node.children()
        .iter()
        .find_map(|child| world_of(child, id, world))
}

fn describe_node(node: &SceneNode, depth: usize, out: &mut String) {
    let _ = write!(out, "{}{}", "  ".repeat(depth), node);
    match node.kind() {
        NodeKind::Plain => {}
        NodeKind::Geometry(geometry) => {
            let _ = write!(out, " mesh={}", geometry.mesh_id());
            if let Some(joint) = geometry.parent_joint() {
                let _ = write!(out, " joint={}", joint);
            }
        }
        NodeKind::Joint(joint) => {
            let r = joint.rotation();
            let _ = write!(
                out,
                " pitch={:.1} yaw={:.1}",
                r.x.to_degrees(),
                r.y.to_degrees()
            );
        }
    }
    if node.is_selected() {
        out.push_str(" *");
    }
    out.push('\n');
    for child in node.children() {
        describe_node(child, depth + 1, out);
    }
}
