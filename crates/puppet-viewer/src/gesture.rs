//! Joint drag gestures
//!
//! A gesture spans one press/release of a manipulation button. It
//! snapshots every selected joint when the drag begins, rotates them on
//! each mouse move, and on release turns the snapshot into a
//! [`Command`] if anything actually moved.
//!
//! Button mapping:
//! - middle: other joints pitch with vertical motion, the head yaws with
//!   horizontal motion
//! - right: other joints yaw with horizontal motion, the head pitches with
//!   vertical motion (head yaw is off on this button)
//!
//! Change detection compares both axes for ordinary joints but only the
//! button's head axis for the head joint, even though both axes are
//! snapshotted.

use crate::input::MouseButton;
use crate::picking::Selection;
use crate::undo::{Command, JointState};
use glam::Vec2;
use puppet_core::NodeId;
use puppet_scene::SceneTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAxis {
    Pitch,
    Yaw,
}

/// The head joint's axis for a manipulation button
pub fn head_axis(button: MouseButton) -> Option<DragAxis> {
    match button {
        MouseButton::Middle => Some(DragAxis::Yaw),
        MouseButton::Right => Some(DragAxis::Pitch),
        MouseButton::Left => None,
    }
}

/// The axis ordinary joints move on for a manipulation button
pub fn joint_axis(button: MouseButton) -> Option<DragAxis> {
    match button {
        MouseButton::Middle => Some(DragAxis::Pitch),
        MouseButton::Right => Some(DragAxis::Yaw),
        MouseButton::Left => None,
    }
}

pub fn is_manipulation_button(button: MouseButton) -> bool {
    joint_axis(button).is_some()
}

#[derive(Debug, Clone, Copy)]
struct JointSnapshot {
    joint_id: NodeId,
    from: Vec2,
    is_head: bool,
}

#[derive(Debug, Clone)]
pub struct DragGesture {
    button: MouseButton,
    snapshots: Vec<JointSnapshot>,
}

impl DragGesture {
    /// Snapshot the pre-drag rotation of every selected joint
    pub fn begin(tree: &SceneTree, selection: &Selection, button: MouseButton) -> Self {
        let snapshots: Vec<JointSnapshot> = selection
            .joints()
            .filter_map(|id| {
                let node = tree.get_node(id)?;
                let joint = node.as_joint()?;
                Some(JointSnapshot {
                    joint_id: id,
                    from: joint.rotation(),
                    is_head: node.is_head(),
                })
            })
            .collect();
        log::debug!(
            "Begin {:?} drag over {} joint(s)",
            button,
            snapshots.len()
        );
        Self { button, snapshots }
    }

    pub fn button(&self) -> MouseButton {
        self.button
    }

    pub fn joint_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Rotate every snapshotted joint by a mouse delta in pixels
    pub fn apply_delta(&self, tree: &mut SceneTree, delta: Vec2, radians_per_pixel: f32) {
        for snapshot in &self.snapshots {
            let axis = if snapshot.is_head {
                head_axis(self.button)
            } else {
                joint_axis(self.button)
            };
            let Some(axis) = axis else { continue };
            let Some(current) = tree.joint_rotation(snapshot.joint_id) else {
                continue;
            };
            let step = match axis {
                DragAxis::Pitch => Vec2::new(delta.y * radians_per_pixel, 0.0),
                DragAxis::Yaw => Vec2::new(0.0, delta.x * radians_per_pixel),
            };
            tree.set_joint_rotation(snapshot.joint_id, current + step);
        }
    }

    /// Close the gesture. `None` when no joint changed, so nothing is recorded.
    pub fn finish(self, tree: &SceneTree) -> Option<Command> {
        let head_axis = head_axis(self.button);
        let mut any_changed = false;
        let mut states = Vec::with_capacity(self.snapshots.len());

        for snapshot in &self.snapshots {
            let Some(to) = tree.joint_rotation(snapshot.joint_id) else {
                continue;
            };
            let state = JointState {
                joint_id: snapshot.joint_id,
                from: snapshot.from,
                to,
            };
            let changed = if snapshot.is_head {
                match head_axis {
                    Some(DragAxis::Yaw) => state.from.y != state.to.y,
                    Some(DragAxis::Pitch) => state.from.x != state.to.x,
                    None => false,
                }
            } else {
                state.changed()
            };
            any_changed |= changed;
            states.push(state);
        }

        if !any_changed {
            log::debug!("{:?} drag ended with no change", self.button);
            return None;
        }
        Some(Command {
            description: format!("Rotate {} joint(s)", states.len()),
            states,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::toggle_pick;
    use puppet_core::NodeIdAllocator;
    use puppet_scene::{GeometryNode, JointNode, SceneNode, HEAD_JOINT_NAME};

    struct Rig {
        tree: SceneTree,
        selection: Selection,
        neck: NodeId,
        elbow: NodeId,
    }

    /// root -> [neckJoint -> head, elbow -> arm], both joints selected
    fn rig() -> Rig {
        let mut alloc = NodeIdAllocator::new();
        let mut root = SceneNode::new_plain(&mut alloc, "root");

        let mut neck = JointNode::new();
        neck.set_joint_x(-30.0, 0.0, 30.0);
        neck.set_joint_y(-60.0, 0.0, 60.0);
        let mut neck = SceneNode::new_joint(&mut alloc, HEAD_JOINT_NAME, neck);
        let head = SceneNode::new_geometry(&mut alloc, "head", GeometryNode::new("sphere"));

        let mut elbow = JointNode::new();
        elbow.set_joint_x(-90.0, 0.0, 90.0);
        elbow.set_joint_y(-90.0, 0.0, 90.0);
        let mut elbow = SceneNode::new_joint(&mut alloc, "elbow", elbow);
        let arm = SceneNode::new_geometry(&mut alloc, "arm", GeometryNode::new("cube"));

        let (neck_id, head_id, elbow_id, arm_id) = (neck.id(), head.id(), elbow.id(), arm.id());
        neck.add_child(head);
        elbow.add_child(arm);
        root.add_child(neck);
        root.add_child(elbow);
        let mut tree = SceneTree::new(root);
        tree.initialize_tree();

        let mut selection = Selection::new();
        toggle_pick(&mut tree, &mut selection, head_id);
        toggle_pick(&mut tree, &mut selection, arm_id);
        Rig {
            tree,
            selection,
            neck: neck_id,
            elbow: elbow_id,
        }
    }

    const RPP: f32 = 0.01;

    #[test]
    fn test_middle_drag_mapping() {
        let mut rig = rig();
        let gesture = DragGesture::begin(&rig.tree, &rig.selection, MouseButton::Middle);
        assert_eq!(gesture.joint_count(), 2);
        gesture.apply_delta(&mut rig.tree, Vec2::new(10.0, 20.0), RPP);

        let elbow = rig.tree.joint_rotation(rig.elbow).unwrap();
        assert!((elbow.x - 0.2).abs() < 1e-6);
        assert_eq!(elbow.y, 0.0);
        let neck = rig.tree.joint_rotation(rig.neck).unwrap();
        assert_eq!(neck.x, 0.0);
        assert!((neck.y - 0.1).abs() < 1e-6);

        let command = gesture.finish(&rig.tree).unwrap();
        assert_eq!(command.states.len(), 2);
    }

    #[test]
    fn test_right_drag_mapping() {
        let mut rig = rig();
        let gesture = DragGesture::begin(&rig.tree, &rig.selection, MouseButton::Right);
        gesture.apply_delta(&mut rig.tree, Vec2::new(10.0, 20.0), RPP);

        let elbow = rig.tree.joint_rotation(rig.elbow).unwrap();
        assert_eq!(elbow.x, 0.0);
        assert!((elbow.y - 0.1).abs() < 1e-6);
        let neck = rig.tree.joint_rotation(rig.neck).unwrap();
        assert!((neck.x - 0.2).abs() < 1e-6);
        assert_eq!(neck.y, 0.0);
    }

    #[test]
    fn test_drag_back_to_start_records_nothing() {
        let mut rig = rig();
        let gesture = DragGesture::begin(&rig.tree, &rig.selection, MouseButton::Middle);
        gesture.apply_delta(&mut rig.tree, Vec2::new(0.0, 25.0), RPP);
        gesture.apply_delta(&mut rig.tree, Vec2::new(0.0, -25.0), RPP);
        assert!(gesture.finish(&rig.tree).is_none());
    }

    #[test]
    fn test_head_only_counts_relevant_axis() {
        let mut rig = rig();
        // deselect the elbow so the head is the only joint in the gesture
        let arm = rig.tree.find_by_name("arm").unwrap().id();
        toggle_pick(&mut rig.tree, &mut rig.selection, arm);
        assert_eq!(rig.selection.len(), 1);

        // move the head's pitch behind the gesture's back during a middle drag
        let gesture = DragGesture::begin(&rig.tree, &rig.selection, MouseButton::Middle);
        rig.tree.set_joint_rotation(rig.neck, Vec2::new(0.25, 0.0));
        assert!(gesture.finish(&rig.tree).is_none());

        // yaw is the middle button's head axis, so this one counts
        let gesture = DragGesture::begin(&rig.tree, &rig.selection, MouseButton::Middle);
        gesture.apply_delta(&mut rig.tree, Vec2::new(30.0, 0.0), RPP);
        assert!(gesture.finish(&rig.tree).is_some());
    }

    #[test]
    fn test_head_right_drag_counts_only_pitch() {
        let mut rig = rig();
        let arm = rig.tree.find_by_name("arm").unwrap().id();
        toggle_pick(&mut rig.tree, &mut rig.selection, arm);
        assert_eq!(rig.selection.len(), 1);

        // a yaw change is not the right button's head axis
        let gesture = DragGesture::begin(&rig.tree, &rig.selection, MouseButton::Right);
        rig.tree.set_joint_rotation(rig.neck, Vec2::new(0.0, 0.4));
        assert!(gesture.finish(&rig.tree).is_none());

        let gesture = DragGesture::begin(&rig.tree, &rig.selection, MouseButton::Right);
        gesture.apply_delta(&mut rig.tree, Vec2::new(0.0, 15.0), RPP);
        let command = gesture.finish(&rig.tree).unwrap();
        assert_eq!(command.states.len(), 1);
        assert!((command.states[0].to.x - 0.15).abs() < 1e-6);
        assert!((command.states[0].to.y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_clamped_drag_that_cannot_move_records_nothing() {
        let mut rig = rig();
        // pin the elbow at its pitch limit
        rig.tree.set_joint_rotation(rig.elbow, Vec2::new(10.0, 0.0));
        let head = rig.tree.find_by_name("head").unwrap().id();
        toggle_pick(&mut rig.tree, &mut rig.selection, head);

        let gesture = DragGesture::begin(&rig.tree, &rig.selection, MouseButton::Middle);
        gesture.apply_delta(&mut rig.tree, Vec2::new(0.0, 50.0), RPP);
        assert!(gesture.finish(&rig.tree).is_none());
    }

    #[test]
    fn test_axis_tables() {
        assert_eq!(head_axis(MouseButton::Middle), Some(DragAxis::Yaw));
        assert_eq!(head_axis(MouseButton::Right), Some(DragAxis::Pitch));
        assert!(!is_manipulation_button(MouseButton::Left));
    }
}
