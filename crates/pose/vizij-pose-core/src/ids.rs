//! Identifiers and simple allocators for tree nodes and value-store slots.

use serde::{Deserialize, Serialize};

/// Handle of a node in a [`BlendTree`](crate::tree::BlendTree) arena.
/// Only meaningful for the tree that produced it; rebuilt trees reissue handles.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The synthetic whole-tree root is always the first node.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Offset into a [`ValueStore`](crate::store::ValueStore).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub u32);

impl SlotId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Monotonic allocator for NodeId and SlotId.
/// Dense indices keep the arena and the store as flat vectors.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_node: u32,
    next_slot: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    #[inline]
    pub fn alloc_slot(&mut self) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;
        id
    }

    /// Number of slots handed out so far.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.next_slot as usize
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
