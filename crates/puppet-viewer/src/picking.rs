//! Picking via a false-colour render pass
//!
//! The picking pass draws every geometry node in a flat colour that
//! encodes its id in the low 24 bits, reads back the one pixel under the
//! cursor, and decodes it again. Picking a node selects the joint that
//! controls it, not the node itself.

use crate::render::{render_tree, MeshBatchTable, RenderFrame, RenderMode};
use glam::Mat4;
use puppet_core::NodeId;
use puppet_scene::SceneTree;
use std::collections::BTreeSet;

/// Encode a node id as an RGB triple: red holds the low byte
pub fn id_to_colour(id: NodeId) -> [u8; 3] {
    let v = id.raw();
    [(v & 0xff) as u8, ((v >> 8) & 0xff) as u8, ((v >> 16) & 0xff) as u8]
}

pub fn colour_to_id(colour: [u8; 3]) -> NodeId {
    NodeId(colour[0] as u32 | (colour[1] as u32) << 8 | (colour[2] as u32) << 16)
}

/// The GPU side of picking.
///
/// Implementations draw `frame` without presenting it and read back the
/// pixel at window coordinates `(x, y)` (top-left origin). This blocks
/// until the GPU has finished the pass.
pub trait PickReadback {
    fn read_pixel(&mut self, frame: &RenderFrame, x: u32, y: u32) -> Option<[u8; 3]>;
}

/// Joints currently selected for dragging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    joints: BTreeSet<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, joint: NodeId) -> bool {
        self.joints.contains(&joint)
    }

    pub fn joints(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.joints.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn clear(&mut self) {
        self.joints.clear();
    }

    fn insert(&mut self, joint: NodeId) {
        self.joints.insert(joint);
    }

    fn remove(&mut self, joint: NodeId) {
        self.joints.remove(&joint);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// The node became selected and its joint joined the selection
    Selected { node: NodeId, joint: NodeId },
    /// The node was deselected
    Deselected { node: NodeId, joint: NodeId },
    /// The node exists but no articulated joint controls it
    Uncontrolled(NodeId),
    /// Background or stale id
    Nothing,
}

/// Toggle a picked node and update the joint selection.
///
/// A joint stays selected while any geometry it controls is selected.
pub fn toggle_pick(tree: &mut SceneTree, selection: &mut Selection, node_id: NodeId) -> PickOutcome {
    let Some(node) = tree.get_node(node_id) else {
        log::debug!("Pick resolved to unknown node {}", node_id);
        return PickOutcome::Nothing;
    };
    let Some(joint) = node.as_geometry().and_then(|g| g.parent_joint()) else {
        log::debug!("Picked {} has no controlling joint", node);
        return PickOutcome::Uncontrolled(node_id);
    };

    let selected = tree
        .get_node_mut(node_id)
        .map(|node| node.toggle_selected())
        .unwrap_or(false);

    if selected {
        selection.insert(joint);
        log::debug!("Selected node {} (joint {})", node_id, joint);
        PickOutcome::Selected {
            node: node_id,
            joint,
        }
    } else {
        let still_held = tree
            .geometry_under_joint(joint)
            .into_iter()
            .any(|g| tree.get_node(g).is_some_and(|n| n.is_selected()));
        if !still_held {
            selection.remove(joint);
        }
        log::debug!("Deselected node {} (joint {})", node_id, joint);
        PickOutcome::Deselected {
            node: node_id,
            joint,
        }
    }
}

/// Resolve the node under a window pixel and toggle it
pub fn pick_at(
    tree: &mut SceneTree,
    selection: &mut Selection,
    batches: &MeshBatchTable,
    view: Mat4,
    reader: &mut dyn PickReadback,
    x: u32,
    y: u32,
) -> PickOutcome {
    let frame = render_tree(tree, batches, view, RenderMode::Picking, [0.0; 3]);
    let Some(colour) = reader.read_pixel(&frame, x, y) else {
        return PickOutcome::Nothing;
    };
    let id = colour_to_id(colour);
    if id == NodeId::BACKGROUND {
        return PickOutcome::Nothing;
    }
    toggle_pick(tree, selection, id)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::render::{BatchInfo, Shading};
    use puppet_core::NodeIdAllocator;
    use puppet_scene::{GeometryNode, JointNode, SceneNode};

    /// Fake readback: draw command `i` covers window column `i`
    pub(crate) struct ColumnReadback;

    impl PickReadback for ColumnReadback {
        fn read_pixel(&mut self, frame: &RenderFrame, x: u32, _y: u32) -> Option<[u8; 3]> {
            match frame.commands.get(x as usize).map(|c| c.shading) {
                Some(Shading::Flat(colour)) => Some(colour),
                Some(Shading::Lit { .. }) => None,
                None => Some([0, 0, 0]),
            }
        }
    }

    struct FixedPixel([u8; 3]);

    impl PickReadback for FixedPixel {
        fn read_pixel(&mut self, _frame: &RenderFrame, _x: u32, _y: u32) -> Option<[u8; 3]> {
            Some(self.0)
        }
    }

    struct Rig {
        tree: SceneTree,
        batches: MeshBatchTable,
        elbow: NodeId,
        upper: NodeId,
        lower: NodeId,
        body: NodeId,
    }

    /// root -> [body, elbow(articulated) -> [upper, lower]]
    fn rig() -> Rig {
        let mut alloc = NodeIdAllocator::new();
        let mut root = SceneNode::new_plain(&mut alloc, "root");
        let body = SceneNode::new_geometry(&mut alloc, "body", GeometryNode::new("cube"));
        let mut joint = JointNode::new();
        joint.set_joint_x(-45.0, 0.0, 45.0);
        let mut elbow = SceneNode::new_joint(&mut alloc, "elbow", joint);
        let upper = SceneNode::new_geometry(&mut alloc, "upper", GeometryNode::new("cube"));
        let lower = SceneNode::new_geometry(&mut alloc, "lower", GeometryNode::new("cube"));
        let (body_id, elbow_id, upper_id, lower_id) = (body.id(), elbow.id(), upper.id(), lower.id());
        elbow.add_child(upper);
        elbow.add_child(lower);
        root.add_child(body);
        root.add_child(elbow);
        let mut tree = SceneTree::new(root);
        tree.initialize_tree();

        let mut batches = MeshBatchTable::new();
        batches.insert(
            "cube",
            BatchInfo {
                start_index: 0,
                num_indices: 36,
            },
        );
        Rig {
            tree,
            batches,
            elbow: elbow_id,
            upper: upper_id,
            lower: lower_id,
            body: body_id,
        }
    }

    #[test]
    fn test_colour_encoding() {
        assert_eq!(id_to_colour(NodeId(0x123456)), [0x56, 0x34, 0x12]);
        assert_eq!(colour_to_id([0x56, 0x34, 0x12]), NodeId(0x123456));
        assert_eq!(colour_to_id(id_to_colour(NodeId(7))), NodeId(7));
        assert_eq!(colour_to_id(id_to_colour(NodeId::MAX_PICKABLE)), NodeId::MAX_PICKABLE);
    }

    #[test]
    fn test_pick_selects_controlling_joint() {
        let mut rig = rig();
        let mut selection = Selection::new();
        // draw order: body (column 0), upper (1), lower (2)
        let outcome = pick_at(
            &mut rig.tree,
            &mut selection,
            &rig.batches,
            Mat4::IDENTITY,
            &mut ColumnReadback,
            1,
            0,
        );
        assert_eq!(
            outcome,
            PickOutcome::Selected {
                node: rig.upper,
                joint: rig.elbow
            }
        );
        assert!(selection.contains(rig.elbow));
        assert!(rig.tree.get_node(rig.upper).unwrap().is_selected());
        assert!(!rig.tree.get_node(rig.elbow).unwrap().is_selected());
    }

    #[test]
    fn test_joint_stays_selected_while_sibling_selected() {
        let mut rig = rig();
        let mut selection = Selection::new();
        toggle_pick(&mut rig.tree, &mut selection, rig.upper);
        toggle_pick(&mut rig.tree, &mut selection, rig.lower);
        assert_eq!(selection.len(), 1);

        let outcome = toggle_pick(&mut rig.tree, &mut selection, rig.upper);
        assert!(matches!(outcome, PickOutcome::Deselected { .. }));
        assert!(selection.contains(rig.elbow));

        toggle_pick(&mut rig.tree, &mut selection, rig.lower);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_uncontrolled_pick_is_noop() {
        let mut rig = rig();
        let mut selection = Selection::new();
        let outcome = toggle_pick(&mut rig.tree, &mut selection, rig.body);
        assert_eq!(outcome, PickOutcome::Uncontrolled(rig.body));
        assert!(selection.is_empty());
        assert!(!rig.tree.get_node(rig.body).unwrap().is_selected());
    }

    #[test]
    fn test_unknown_colour_leaves_selection_unchanged() {
        let mut rig = rig();
        let mut selection = Selection::new();
        toggle_pick(&mut rig.tree, &mut selection, rig.upper);
        let before = selection.clone();

        let mut stale = FixedPixel(id_to_colour(NodeId(0xabcdef)));
        let outcome = pick_at(
            &mut rig.tree,
            &mut selection,
            &rig.batches,
            Mat4::IDENTITY,
            &mut stale,
            10,
            10,
        );
        assert_eq!(outcome, PickOutcome::Nothing);
        assert_eq!(selection, before);

        let outcome = pick_at(
            &mut rig.tree,
            &mut selection,
            &rig.batches,
            Mat4::IDENTITY,
            &mut ColumnReadback,
            99,
            0,
        );
        assert_eq!(outcome, PickOutcome::Nothing);
        assert_eq!(selection, before);
    }
}
