//! Scene node identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a scene node, unique within one allocator.
///
/// Ids double as picking colours, so only the low 24 bits survive a
/// round trip through the framebuffer.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Id reserved for "no node"; the picking pass clears to this colour.
    pub const BACKGROUND: NodeId = NodeId(0);

    /// Largest id that survives the RGB picking round trip
    pub const MAX_PICKABLE: NodeId = NodeId(0xff_ffff);

    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out monotonically increasing node ids.
///
/// Passed explicitly into tree construction. Reusing one allocator across
/// rebuilds keeps numbering going, so ids held from an older tree no
/// longer resolve.
#[derive(Debug, Clone)]
pub struct NodeIdAllocator {
    next: u32,
}

impl NodeIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Panics in debug builds once ids no longer fit a picking colour
    pub fn next_id(&mut self) -> NodeId {
        debug_assert!(
            self.next <= NodeId::MAX_PICKABLE.0,
            "node id {} exceeds the 24-bit picking range",
            self.next
        );
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

impl Default for NodeIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
