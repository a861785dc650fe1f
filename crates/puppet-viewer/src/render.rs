//! Render traversal: scene tree to draw commands
//!
//! `RenderVisitor` keeps an explicit transform stack. Every node pushes
//! `top * local` on enter and pops on exit, so the stack is back to the
//! identity seed once the traversal returns. Geometry nodes emit one
//! [`DrawCommand`] each; the GPU layer replays them.

use crate::picking::id_to_colour;
use glam::{Mat3, Mat4};
use puppet_core::{Material, NodeId};
use puppet_scene::{GeometryNode, JointNode, SceneNode, SceneTree, SceneVisitor};
use std::collections::HashMap;

/// Index range of one mesh inside the consolidated vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchInfo {
    pub start_index: u32,
    pub num_indices: u32,
}

/// Mesh id to draw range lookup, owned by the GPU layer
#[derive(Debug, Clone, Default)]
pub struct MeshBatchTable {
    batches: HashMap<String, BatchInfo>,
}

impl MeshBatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mesh_id: impl Into<String>, batch: BatchInfo) {
        self.batches.insert(mesh_id.into(), batch);
    }

    pub fn get(&self, mesh_id: &str) -> Option<BatchInfo> {
        self.batches.get(mesh_id).copied()
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Normal lit pass
    Shaded,
    /// Opaque false-colour pass, node id encoded as RGB
    Picking,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    Lit { material: Material, highlighted: bool },
    Flat([u8; 3]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub node_id: NodeId,
    pub mesh_id: String,
    pub batch: BatchInfo,
    pub model_view: Mat4,
    pub normal_matrix: Mat3,
    pub shading: Shading,
}

/// Everything the GPU layer needs to draw one pass
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub mode: RenderMode,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    pub fn command_for(&self, node: NodeId) -> Option<&DrawCommand> {
        self.commands.iter().find(|c| c.node_id == node)
    }
}

pub struct RenderVisitor<'a> {
    batches: &'a MeshBatchTable,
    view: Mat4,
    mode: RenderMode,
    highlight: [f32; 3],
    stack: Vec<Mat4>,
    commands: Vec<DrawCommand>,
}

impl<'a> RenderVisitor<'a> {
    pub fn new(batches: &'a MeshBatchTable, view: Mat4, mode: RenderMode) -> Self {
        Self {
            batches,
            view,
            mode,
            highlight: [1.0, 0.85, 0.1],
            stack: vec![Mat4::IDENTITY],
            commands: Vec::new(),
        }
    }

    pub fn with_highlight(mut self, colour: [f32; 3]) -> Self {
        self.highlight = colour;
        self
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn finish(self) -> RenderFrame {
        debug_assert_eq!(self.stack.len(), 1, "unbalanced transform stack");
        RenderFrame {
            mode: self.mode,
            commands: self.commands,
        }
    }

    fn push(&mut self, local: Mat4) {
        let top = self.top();
        self.stack.push(top * local);
    }

    fn top(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    fn shading(&self, node: &SceneNode, geometry: &GeometryNode) -> Shading {
        match self.mode {
            RenderMode::Picking => Shading::Flat(id_to_colour(node.id())),
            RenderMode::Shaded => {
                let highlighted = node.is_selected();
                let mut material = geometry.material;
                if highlighted {
                    material.kd = self.highlight;
                }
                Shading::Lit {
                    material,
                    highlighted,
                }
            }
        }
    }
}

impl SceneVisitor for RenderVisitor<'_> {
    fn enter_plain(&mut self, node: &SceneNode) {
        self.push(node.local_transform());
    }

    fn enter_geometry(&mut self, node: &SceneNode, geometry: &GeometryNode) {
        self.push(node.local_transform());

        let Some(batch) = self.batches.get(geometry.mesh_id()) else {
            log::warn!("No mesh batch '{}' for {}", geometry.mesh_id(), node);
            return;
        };

        let model_view = self.view * self.top();
        let normal_matrix = Mat3::from_mat4(model_view).inverse().transpose();
        let shading = self.shading(node, geometry);
        self.commands.push(DrawCommand {
            node_id: node.id(),
            mesh_id: geometry.mesh_id().to_string(),
            batch,
            model_view,
            normal_matrix,
            shading,
        });
    }

    fn enter_joint(&mut self, node: &SceneNode, _joint: &JointNode) {
        self.push(node.local_transform());
    }

    fn exit(&mut self, _node: &SceneNode) {
        self.stack.pop();
    }
}

/// Traverse the whole tree once and collect its draw commands
pub fn render_tree(
    tree: &SceneTree,
    batches: &MeshBatchTable,
    view: Mat4,
    mode: RenderMode,
    highlight: [f32; 3],
) -> RenderFrame {
    let mut visitor = RenderVisitor::new(batches, view, mode).with_highlight(highlight);
    tree.draw(&mut visitor);
    visitor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use puppet_core::NodeIdAllocator;

    fn batches() -> MeshBatchTable {
        let mut table = MeshBatchTable::new();
        table.insert(
            "cube",
            BatchInfo {
                start_index: 0,
                num_indices: 36,
            },
        );
        table
    }

    /// root(translate x=1) -> shoulder joint -> arm(translate y=2)
    fn arm_tree() -> (SceneTree, NodeId, NodeId) {
        let mut alloc = NodeIdAllocator::new();
        let mut root = SceneNode::new_plain(&mut alloc, "root");
        root.translate(Vec3::new(1.0, 0.0, 0.0));
        let mut joint = JointNode::new();
        joint.set_joint_x(-90.0, 0.0, 90.0);
        let mut shoulder = SceneNode::new_joint(&mut alloc, "shoulder", joint);
        let mut arm = SceneNode::new_geometry(&mut alloc, "arm", GeometryNode::new("cube"));
        arm.translate(Vec3::new(0.0, 2.0, 0.0));
        let (shoulder_id, arm_id) = (shoulder.id(), arm.id());
        shoulder.add_child(arm);
        root.add_child(shoulder);
        let mut tree = SceneTree::new(root);
        tree.initialize_tree();
        (tree, shoulder_id, arm_id)
    }

    #[test]
    fn test_geometry_model_view_accumulates_stack() {
        let (mut tree, shoulder, arm) = arm_tree();
        tree.set_joint_rotation(shoulder, Vec2::new(90f32.to_radians(), 0.0));

        let frame = render_tree(&tree, &batches(), Mat4::IDENTITY, RenderMode::Shaded, [1.0; 3]);
        assert_eq!(frame.commands.len(), 1);
        let cmd = frame.command_for(arm).unwrap();
        assert_eq!(cmd.batch.num_indices, 36);

        // the arm's origin: +2 in y rotated 90 degrees about x lands at +2 z, then root shift
        let origin = cmd.model_view.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(1.0, 0.0, 2.0), 1e-5));
        assert!(cmd.model_view.abs_diff_eq(tree.world_transform(arm).unwrap(), 1e-6));
    }

    #[test]
    fn test_picking_mode_uses_id_colour() {
        let (tree, _, arm) = arm_tree();
        let frame = render_tree(&tree, &batches(), Mat4::IDENTITY, RenderMode::Picking, [1.0; 3]);
        assert_eq!(frame.mode, RenderMode::Picking);
        assert_eq!(frame.commands[0].shading, Shading::Flat(id_to_colour(arm)));
    }

    #[test]
    fn test_selected_geometry_is_highlighted() {
        let (mut tree, _, arm) = arm_tree();
        tree.toggle_selected(arm);
        let frame = render_tree(&tree, &batches(), Mat4::IDENTITY, RenderMode::Shaded, [0.0, 1.0, 0.0]);
        match frame.commands[0].shading {
            Shading::Lit {
                material,
                highlighted,
            } => {
                assert!(highlighted);
                assert_eq!(material.kd, [0.0, 1.0, 0.0]);
            }
            Shading::Flat(_) => panic!("expected lit shading"),
        }
    }

    #[test]
    fn test_missing_mesh_is_skipped_and_stack_balanced() {
        let (tree, _, _) = arm_tree();
        let empty = MeshBatchTable::new();
        let mut visitor = RenderVisitor::new(&empty, Mat4::IDENTITY, RenderMode::Shaded);
        tree.draw(&mut visitor);
        assert_eq!(visitor.depth(), 1);
        assert!(visitor.finish().commands.is_empty());
    }

    #[test]
    fn test_view_matrix_applied() {
        let (tree, _, arm) = arm_tree();
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0));
        let frame = render_tree(&tree, &batches(), view, RenderMode::Shaded, [1.0; 3]);
        let origin = frame.command_for(arm).unwrap().model_view.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(1.0, 2.0, -10.0), 1e-5));
    }
}
