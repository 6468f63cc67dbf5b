//! Edits on a built tree.
//!
//! Every edit updates blend factors in the value store and emits one blended
//! value per affected channel to a [`ChannelSink`]. Channels missing from either
//! reference pose are skipped silently. Mirrored writes always follow the
//! primary ones.

use hashbrown::HashSet;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, RootPart};
use crate::ids::NodeId;
use crate::mirror::MirrorResolver;
use crate::outputs::ChannelSink;
use crate::tree::BlendTree;

/// A rig element picked by the host, outside of the tree's grouping.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selected {
    Root,
    Joint { name: String },
    Transform { path: String },
    Weight { mesh: String, weight: String },
}

impl Selected {
    pub fn joint(name: impl Into<String>) -> Self {
        Selected::Joint { name: name.into() }
    }

    pub fn transform(path: impl Into<String>) -> Self {
        Selected::Transform { path: path.into() }
    }

    pub fn weight(mesh: impl Into<String>, weight: impl Into<String>) -> Self {
        Selected::Weight {
            mesh: mesh.into(),
            weight: weight.into(),
        }
    }

    /// Counterpart through the rig's bilateral tables. The root has none.
    pub fn mirrored(&self, mirrors: &MirrorResolver) -> Option<Selected> {
        match self {
            Selected::Root => None,
            Selected::Joint { name } => mirrors.joint(name).map(Selected::joint),
            Selected::Transform { path } => mirrors.transform(path).map(Selected::transform),
            Selected::Weight { mesh, weight } => mirrors
                .weight(mesh, weight)
                .map(|w| Selected::weight(mesh.clone(), w)),
        }
    }
}

impl BlendTree {
    /// Broadcast `t` to `id` and everything beneath it, writing each channel in
    /// pre-order. With `apply_mirror`, the node's counterpart subtree gets the
    /// same `t` afterwards. Returns the number of writes.
    pub fn set_subtree(
        &mut self,
        id: NodeId,
        t: f32,
        apply_mirror: bool,
        sink: &mut dyn ChannelSink,
    ) -> usize {
        if self.node(id).is_none() {
            return 0;
        }
        let mut writes = self.write_subtree(id, t, sink);
        if apply_mirror {
            if let Some(m) = self.mirror_of(id) {
                writes += self.write_subtree(m, t, sink);
            }
        }
        writes
    }

    /// Set one leaf of a leaf group. With `apply_mirror`, the leaf channel's rig
    /// counterpart is written next, wherever it lives in the tree.
    pub fn set_leaf(
        &mut self,
        id: NodeId,
        index: usize,
        t: f32,
        apply_mirror: bool,
        sink: &mut dyn ChannelSink,
    ) -> usize {
        let Some(channel) = self.leaf_channels(id).get(index).cloned() else {
            return 0;
        };
        self.store.set_leaf(id, index, t);
        let mut writes = usize::from(self.emit(&channel, t, sink));

        if apply_mirror {
            if let Some(mirrored) = self.mirrors.channel(&channel) {
                if let Some((mid, mi)) = self.leaf_location(&mirrored) {
                    self.store.set_leaf(mid, mi, t);
                }
                writes += usize::from(self.emit(&mirrored, t, sink));
            }
        }
        writes
    }

    /// Write the channels of host-selected elements directly, ignoring grouping.
    ///
    /// With `apply_mirror`, each element's rig counterpart is written after all
    /// selected elements. Matching leaf and transform slots are updated so the
    /// store reflects the edit.
    pub fn set_selection(
        &mut self,
        selection: &[Selected],
        t: f32,
        apply_mirror: bool,
        sink: &mut dyn ChannelSink,
    ) -> usize {
        let mut writes = 0;
        for sel in selection {
            writes += self.write_selected(sel, t, sink);
        }
        if !apply_mirror {
            return writes;
        }

        let mut done: HashSet<Selected> = HashSet::new();
        if self.mirror_selection_dedup {
            done.extend(selection.iter().cloned());
        }
        for sel in selection {
            let Some(m) = sel.mirrored(&self.mirrors) else {
                continue;
            };
            if self.mirror_selection_dedup && !done.insert(m.clone()) {
                continue;
            }
            writes += self.write_selected(&m, t, sink);
        }
        writes
    }

    fn write_subtree(&mut self, id: NodeId, t: f32, sink: &mut dyn ChannelSink) -> usize {
        let mut writes = 0;
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let idx = cur.index();
            self.store.set(cur, t);
            for ch in self.nodes[idx].own_channels() {
                writes += usize::from(emit_blend(self, ch, t, sink));
            }
            let count = self.nodes[idx].leaves().map_or(0, |l| l.channels.len());
            for i in 0..count {
                self.store.set_leaf(cur, i, t);
            }
            if let Some(leaves) = self.nodes[idx].leaves() {
                for ch in &leaves.channels {
                    writes += usize::from(emit_blend(self, ch, t, sink));
                }
            }
            stack.extend(self.nodes[idx].children.iter().rev().copied());
        }
        writes
    }

    fn write_selected(&mut self, sel: &Selected, t: f32, sink: &mut dyn ChannelSink) -> usize {
        let channels: Vec<Channel> = match sel {
            Selected::Root => RootPart::ALL.into_iter().map(Channel::root).collect(),
            Selected::Joint { name } => self.catalog.joint_channels(name).cloned().collect(),
            Selected::Transform { path } => {
                self.catalog.transform_channels(path).cloned().collect()
            }
            Selected::Weight { mesh, weight } => {
                vec![Channel::weight(mesh.clone(), weight.clone())]
            }
        };

        let mut writes = 0;
        for ch in &channels {
            if self.family_root(ch.family()).is_none() {
                trace!("selection: {ch} skipped, family not in tree");
                continue;
            }
            if !self.emit(ch, t, sink) {
                continue;
            }
            writes += 1;
            if let Some((id, i)) = self.leaf_location(ch) {
                self.store.set_leaf(id, i, t);
            }
        }
        if writes > 0 {
            if let Selected::Transform { path } = sel {
                if let Some(id) = self.transform_node(path) {
                    self.store.set(id, t);
                }
            }
        }
        writes
    }

    fn emit(&self, channel: &Channel, t: f32, sink: &mut dyn ChannelSink) -> bool {
        emit_blend(self, channel, t, sink)
    }
}

fn emit_blend(tree: &BlendTree, channel: &Channel, t: f32, sink: &mut dyn ChannelSink) -> bool {
    match tree.tables.values(channel) {
        Some((a, b)) => {
            sink.write(channel, tree.interp.blend(channel, a, b, t));
            true
        }
        None => {
            trace!("{channel} skipped, not in both poses");
            false
        }
    }
}
