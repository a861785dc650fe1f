//! Puppet Core - Foundational types for the puppet viewer
//!
//! This crate provides the core types that all other puppet crates depend on:
//! - `NodeId`, `NodeIdAllocator` - Scene node identifiers
//! - `Material`, `JointRange` - Plain data carried by scene nodes
//! - Axis rotation helpers over glam matrices
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{PuppetError, Result};
pub use id::{NodeId, NodeIdAllocator};
pub use types::{axis_rotation, rotation_xy, Axis, JointRange, Material};
