//! Undo/redo over joint rotations
//!
//! A linear history with a cursor. `position` is the index of the next
//! command to redo; pushing while commands are still redoable discards
//! them first.

use glam::Vec2;
use puppet_core::NodeId;
use puppet_scene::SceneTree;

/// One joint's rotation before and after a gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointState {
    pub joint_id: NodeId,
    pub from: Vec2,
    pub to: Vec2,
}

impl JointState {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// All joint changes made by a single drag gesture
#[derive(Debug, Clone)]
pub struct Command {
    pub states: Vec<JointState>,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    commands: Vec<Command>,
    position: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new command, discarding anything that could still be redone
    pub fn push(&mut self, command: Command) {
        if self.position < self.commands.len() {
            log::debug!(
                "Discarding {} redoable command(s)",
                self.commands.len() - self.position
            );
            self.commands.truncate(self.position);
        }
        log::debug!("Push '{}'", command.description);
        self.commands.push(command);
        self.position += 1;
    }

    /// Step back one command, restoring each joint's `from` rotation.
    ///
    /// Panics if there is nothing to undo; check [`CommandHistory::can_undo`] first.
    pub fn undo(&mut self, tree: &mut SceneTree) {
        assert!(self.can_undo(), "undo with no command before position 0");
        self.position -= 1;
        let command = &self.commands[self.position];
        log::debug!("Undo '{}'", command.description);
        for state in &command.states {
            apply(tree, state.joint_id, state.from, &command.description);
        }
    }

    /// Reapply the next command's `to` rotations.
    ///
    /// Panics if there is nothing to redo; check [`CommandHistory::can_redo`] first.
    pub fn redo(&mut self, tree: &mut SceneTree) {
        assert!(self.can_redo(), "redo with no command after position {}", self.position);
        let command = &self.commands[self.position];
        log::debug!("Redo '{}'", command.description);
        for state in &command.states {
            apply(tree, state.joint_id, state.to, &command.description);
        }
        self.position += 1;
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.commands.len()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.position
            .checked_sub(1)
            .map(|i| self.commands[i].description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.commands
            .get(self.position)
            .map(|c| c.description.as_str())
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.position = 0;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

fn apply(tree: &mut SceneTree, joint: NodeId, rotation: Vec2, description: &str) {
    if tree.set_joint_rotation(joint, rotation).is_none() {
        log::warn!("Joint {} from '{}' no longer exists; skipped", joint, description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puppet_core::NodeIdAllocator;
    use puppet_scene::{JointNode, SceneNode};

    fn deg(v: f32) -> f32 {
        v.to_radians()
    }

    /// J1 pitch in [-45, 45], J2 yaw in [-30, 30], both at rest 0
    fn two_joints() -> (SceneTree, NodeId, NodeId) {
        let mut alloc = NodeIdAllocator::new();
        let mut root = SceneNode::new_plain(&mut alloc, "root");
        let mut j1 = JointNode::new();
        j1.set_joint_x(-45.0, 0.0, 45.0);
        let mut j2 = JointNode::new();
        j2.set_joint_y(-30.0, 0.0, 30.0);
        let j1 = SceneNode::new_joint(&mut alloc, "J1", j1);
        let j2 = SceneNode::new_joint(&mut alloc, "J2", j2);
        let ids = (j1.id(), j2.id());
        root.add_child(j1);
        root.add_child(j2);
        (SceneTree::new(root), ids.0, ids.1)
    }

    fn rotate(tree: &mut SceneTree, joint: NodeId, to: Vec2) -> JointState {
        let from = tree.joint_rotation(joint).unwrap();
        let to = tree.set_joint_rotation(joint, to).unwrap();
        JointState {
            joint_id: joint,
            from,
            to,
        }
    }

    fn command(states: Vec<JointState>) -> Command {
        Command {
            description: format!("Rotate {} joint(s)", states.len()),
            states,
        }
    }

    #[test]
    fn test_two_joint_scenario() {
        let (mut tree, j1, j2) = two_joints();
        let mut history = CommandHistory::new();

        let s1 = rotate(&mut tree, j1, Vec2::new(deg(20.0), 0.0));
        let s2 = rotate(&mut tree, j2, Vec2::new(0.0, deg(10.0)));
        history.push(command(vec![s1, s2]));
        assert_eq!(history.len(), 1);
        assert_eq!(history.position(), 1);

        history.undo(&mut tree);
        assert_eq!(tree.joint_rotation(j1).unwrap().x, 0.0);
        assert_eq!(tree.joint_rotation(j2).unwrap().y, 0.0);
        assert_eq!(history.position(), 0);

        history.redo(&mut tree);
        assert!((tree.joint_rotation(j1).unwrap().x - deg(20.0)).abs() < 1e-6);
        assert!((tree.joint_rotation(j2).unwrap().y - deg(10.0)).abs() < 1e-6);
        assert_eq!(history.position(), 1);
    }

    #[test]
    fn test_undo_then_redo_restores_state() {
        let (mut tree, j1, j2) = two_joints();
        let mut history = CommandHistory::new();
        for step in 1..=3 {
            let s = rotate(&mut tree, j1, Vec2::new(deg(10.0 * step as f32), 0.0));
            let t = rotate(&mut tree, j2, Vec2::new(0.0, deg(-5.0 * step as f32)));
            history.push(command(vec![s, t]));
        }

        history.undo(&mut tree);
        let before = (tree.joint_rotation(j1), tree.joint_rotation(j2));
        history.undo(&mut tree);
        history.redo(&mut tree);
        assert_eq!((tree.joint_rotation(j1), tree.joint_rotation(j2)), before);
    }

    #[test]
    fn test_push_after_undo_discards_redo() {
        let (mut tree, j1, _) = two_joints();
        let mut history = CommandHistory::new();
        for step in 1..=3 {
            let s = rotate(&mut tree, j1, Vec2::new(deg(step as f32), 0.0));
            history.push(command(vec![s]));
        }
        history.undo(&mut tree);
        history.undo(&mut tree);
        assert!(history.can_redo());

        let s = rotate(&mut tree, j1, Vec2::new(deg(-5.0), 0.0));
        history.push(command(vec![s]));
        assert_eq!(history.len(), 2);
        assert_eq!(history.position(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_can_undo_can_redo_track_position() {
        let (mut tree, j1, _) = two_joints();
        let mut history = CommandHistory::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo_description(), None);

        let s = rotate(&mut tree, j1, Vec2::new(0.1, 0.0));
        history.push(command(vec![s]));
        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo_description(), Some("Rotate 1 joint(s)"));

        history.undo(&mut tree);
        assert!(!history.can_undo());
        assert!(history.can_redo());
        assert_eq!(history.redo_description(), Some("Rotate 1 joint(s)"));

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.position(), 0);
    }

    #[test]
    fn test_replay_skips_stale_joint() {
        let (mut tree, j1, _) = two_joints();
        let mut history = CommandHistory::new();
        let real = rotate(&mut tree, j1, Vec2::new(0.3, 0.0));
        let stale = JointState {
            joint_id: NodeId(500),
            from: Vec2::ZERO,
            to: Vec2::ONE,
        };
        history.push(command(vec![stale, real]));
        history.undo(&mut tree);
        assert_eq!(tree.joint_rotation(j1), Some(Vec2::ZERO));
    }

    #[test]
    #[should_panic]
    fn test_undo_on_empty_history_panics() {
        let (mut tree, _, _) = two_joints();
        CommandHistory::new().undo(&mut tree);
    }

    #[test]
    #[should_panic]
    fn test_redo_when_exhausted_panics() {
        let (mut tree, j1, _) = two_joints();
        let mut history = CommandHistory::new();
        let s = rotate(&mut tree, j1, Vec2::new(0.1, 0.0));
        history.push(command(vec![s]));
        history.redo(&mut tree);
    }
}
