//! Puppet Scene - hierarchical scene nodes
//!
//! This crate holds the articulated node tree (plain, geometry and joint
//! nodes), its double-dispatch traversal, and the TOML scene description
//! that the tree is built from.

mod format;
mod loader;
mod node;
mod tree;
mod visitor;

pub use format::{NodeDef, NodeKindDef, SceneFile, SceneMetadata, TransformOp};
pub use loader::{build_tree, load_scene, load_scene_string, validate_scene};
pub use node::{GeometryNode, JointNode, NodeKind, SceneNode, HEAD_JOINT_NAME};
pub use tree::SceneTree;
pub use visitor::SceneVisitor;
