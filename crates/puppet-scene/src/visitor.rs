//! Double-dispatch traversal over node variants
//!
//! Each node calls the enter callback matching its variant, then draws its
//! children in order, then calls `exit`. Visitors that keep a transform
//! stack push in `enter_*` and pop in `exit`.

use crate::node::{GeometryNode, JointNode, NodeKind, SceneNode};

/// Callbacks a tree traversal makes into, one per node variant
pub trait SceneVisitor {
    fn enter_plain(&mut self, node: &SceneNode);

    fn enter_geometry(&mut self, node: &SceneNode, geometry: &GeometryNode);

    fn enter_joint(&mut self, node: &SceneNode, joint: &JointNode);

    fn exit(&mut self, node: &SceneNode);
}

impl SceneNode {
    /// Visit this subtree: enter, children in order, exit
    pub fn draw<V: SceneVisitor + ?Sized>(&self, visitor: &mut V) {
        match self.kind() {
            NodeKind::Plain => visitor.enter_plain(self),
            NodeKind::Geometry(geometry) => visitor.enter_geometry(self, geometry),
            NodeKind::Joint(joint) => visitor.enter_joint(self, joint),
        }
        for child in self.children() {
            child.draw(visitor);
        }
        visitor.exit(self);
    }
}
