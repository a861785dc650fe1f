//! Puppet Viewer - interaction layer over the puppet scene tree
//!
//! Turns the scene tree into render commands, resolves picks from a
//! false-colour pass, and records joint drags as undoable commands.
//! GPU work lives behind the `PickReadback` trait and the draw commands
//! this crate emits; nothing here owns GPU resources.

pub mod config;
pub mod controller;
pub mod gesture;
pub mod input;
pub mod picking;
pub mod render;
pub mod undo;

pub use config::ViewerConfig;
pub use controller::PuppetController;
pub use input::{ButtonAction, Key, MouseButton};
pub use picking::{PickOutcome, PickReadback, Selection};
pub use render::{BatchInfo, DrawCommand, MeshBatchTable, RenderFrame, RenderMode, Shading};
pub use undo::{Command, CommandHistory, JointState};
