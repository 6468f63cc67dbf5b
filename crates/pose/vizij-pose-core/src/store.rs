//! Flat blend-factor storage for a tree.
//!
//! Slots are handed out by a pre-order walk: a node takes the next slot, a leaf
//! group's channels take the following N slots in declared order, then children
//! are visited in order. The layout depends only on tree shape, so rebuilding the
//! same tree yields the same layout, and nothing carries over between rebuilds.
//!
//! A group slot holds the last value broadcast to that subtree. Leaf slots edited
//! individually afterwards are not reflected back into it.

use crate::ids::{IdAllocator, NodeId, SlotId};
use crate::tree::TreeNode;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueStore {
    values: Vec<f32>,
    node_slots: Vec<SlotId>,
    /// First leaf slot and leaf count, per node.
    leaf_ranges: Vec<Option<(SlotId, usize)>>,
}

impl ValueStore {
    /// Lay out slots for `nodes` (an arena whose first entry is the root) and zero them.
    pub fn allocate(nodes: &[TreeNode]) -> Self {
        let mut store = ValueStore {
            values: Vec::new(),
            node_slots: vec![SlotId(0); nodes.len()],
            leaf_ranges: vec![None; nodes.len()],
        };
        if nodes.is_empty() {
            return store;
        }
        let mut ids = IdAllocator::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = &nodes[id.index()];
            store.node_slots[id.index()] = ids.alloc_slot();
            if let Some(leaves) = node.leaves() {
                let n = leaves.channels.len();
                if n > 0 {
                    let first = ids.alloc_slot();
                    for _ in 1..n {
                        ids.alloc_slot();
                    }
                    store.leaf_ranges[id.index()] = Some((first, n));
                }
            }
            stack.extend(node.children.iter().rev().copied());
        }
        store.values = vec![0.0; ids.slot_count()];
        store
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn node_slot(&self, id: NodeId) -> Option<SlotId> {
        self.node_slots.get(id.index()).copied()
    }

    pub fn leaf_slot(&self, id: NodeId, index: usize) -> Option<SlotId> {
        let (first, n) = (*self.leaf_ranges.get(id.index())?)?;
        (index < n).then(|| SlotId(first.0 + index as u32))
    }

    pub fn get(&self, id: NodeId) -> Option<f32> {
        self.node_slot(id).map(|s| self.values[s.index()])
    }

    pub fn set(&mut self, id: NodeId, t: f32) -> bool {
        match self.node_slot(id) {
            Some(s) => {
                self.values[s.index()] = t;
                true
            }
            None => false,
        }
    }

    pub fn leaf(&self, id: NodeId, index: usize) -> Option<f32> {
        self.leaf_slot(id, index).map(|s| self.values[s.index()])
    }

    pub fn set_leaf(&mut self, id: NodeId, index: usize, t: f32) -> bool {
        match self.leaf_slot(id, index) {
            Some(s) => {
                self.values[s.index()] = t;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0.0);
    }
}
