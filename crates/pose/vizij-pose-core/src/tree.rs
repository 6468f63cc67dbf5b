//! Blend tree arena.
//!
//! Nodes live in a flat `Vec` in pre-order; a [`NodeId`] is the node's position.
//! The synthetic root is always `NodeId::ROOT` and its children are the family
//! roots that survived filtering, in Skeletal, Generic, Deformer order.

use hashbrown::HashMap;
use serde::Serialize;

use crate::catalog::ChannelCatalog;
use crate::channel::{Channel, Family};
use crate::ids::NodeId;
use crate::index_table::TablePair;
use crate::interp::Interpolator;
use crate::mirror::{resolve_path, MirrorResolver};
use crate::store::ValueStore;

/// Terminal group exposing individually editable channels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeafGroup {
    pub channels: Vec<Channel>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NodePayload {
    /// Synthetic whole-tree root.
    Root,
    /// Skeletal family root (`leaves: None`) or an anatomical group.
    Skeletal { leaves: Option<LeafGroup> },
    /// Generic family root (`transform: None`) or one transform node. `channels` are
    /// the node's own properties; they are written with the node, not indexed.
    Generic {
        transform: Option<String>,
        channels: Vec<Channel>,
    },
    /// Deformer family root (`mesh: None`) or one mesh with its weight names.
    Deformer {
        mesh: Option<String>,
        leaves: Option<LeafGroup>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub display_name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Declared counterpart path, as written in the rig.
    pub mirror_path: Option<String>,
    /// Counterpart resolved when the tree was built.
    pub mirror: Option<NodeId>,
    pub payload: NodePayload,
}

impl TreeNode {
    pub fn family(&self) -> Option<Family> {
        match self.payload {
            NodePayload::Root => None,
            NodePayload::Skeletal { .. } => Some(Family::Skeletal),
            NodePayload::Generic { .. } => Some(Family::Generic),
            NodePayload::Deformer { .. } => Some(Family::Deformer),
        }
    }

    /// Indexed leaf channels, if this is a leaf group.
    pub fn leaves(&self) -> Option<&LeafGroup> {
        match &self.payload {
            NodePayload::Skeletal { leaves } | NodePayload::Deformer { leaves, .. } => {
                leaves.as_ref()
            }
            NodePayload::Root | NodePayload::Generic { .. } => None,
        }
    }

    /// Channels written with the node itself (generic transform properties).
    pub fn own_channels(&self) -> &[Channel] {
        match &self.payload {
            NodePayload::Generic { channels, .. } => channels,
            _ => &[],
        }
    }

    #[inline]
    pub fn is_leaf_group(&self) -> bool {
        self.leaves().is_some()
    }
}

/// A built blend tree with its value store and the pose tables it was built from.
///
/// Only the builder produces one, so every method here can assume both reference
/// poses are loaded and at least one channel is shared.
#[derive(Debug)]
pub struct BlendTree {
    pub(crate) nodes: Vec<TreeNode>,
    pub(crate) store: ValueStore,
    pub(crate) tables: TablePair,
    pub(crate) catalog: ChannelCatalog,
    pub(crate) interp: Interpolator,
    pub(crate) mirrors: MirrorResolver,
    pub(crate) mirror_selection_dedup: bool,
    /// Leaf channel → (owning leaf group, position in the group).
    pub(crate) leaf_index: HashMap<Channel, (NodeId, usize)>,
    /// Generic transform path → its node.
    pub(crate) transform_nodes: HashMap<String, NodeId>,
}

impl BlendTree {
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    /// All nodes in pre-order.
    #[inline]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Node ids in pre-order.
    pub fn preorder(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.store.len()
    }

    /// Never true for a built tree; kept for the usual `len`/`is_empty` pair.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn family_root(&self, family: Family) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|c| self.nodes[c.index()].family() == Some(family))
    }

    /// Resolve a '/'-separated path of display names starting below the synthetic
    /// root, e.g. `"Skeletal/Left Hand/Left Thumb"`.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.walk_path(NodeId::ROOT, path)
    }

    /// Resolve a path relative to `from` by matching child display names.
    pub fn walk_path(&self, from: NodeId, path: &str) -> Option<NodeId> {
        self.node(from)?;
        resolve_path(&self.nodes, from, path)
    }

    /// Display-name path from below the synthetic root; empty for the root itself.
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut cur = self.node(id)?;
        while let Some(parent) = cur.parent {
            names.push(cur.display_name.as_str());
            cur = &self.nodes[parent.index()];
        }
        names.reverse();
        Some(names.join("/"))
    }

    pub fn leaf_channels(&self, id: NodeId) -> &[Channel] {
        self.node(id)
            .and_then(|n| n.leaves())
            .map(|l| l.channels.as_slice())
            .unwrap_or(&[])
    }

    /// Every channel the tree can write, in pre-order.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.nodes.iter().flat_map(|n| {
            n.own_channels()
                .iter()
                .chain(n.leaves().into_iter().flat_map(|l| l.channels.iter()))
        })
    }

    /// Last blend factor broadcast to a node.
    pub fn value(&self, id: NodeId) -> Option<f32> {
        self.store.get(id)
    }

    pub fn leaf_value(&self, id: NodeId, index: usize) -> Option<f32> {
        self.store.leaf(id, index)
    }

    /// Where a leaf channel lives in the tree.
    pub fn leaf_location(&self, channel: &Channel) -> Option<(NodeId, usize)> {
        self.leaf_index.get(channel).copied()
    }

    pub fn transform_node(&self, path: &str) -> Option<NodeId> {
        self.transform_nodes.get(path).copied()
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    pub fn tables(&self) -> &TablePair {
        &self.tables
    }

    pub fn catalog(&self) -> &ChannelCatalog {
        &self.catalog
    }

    pub fn mirrors(&self) -> &MirrorResolver {
        &self.mirrors
    }

    /// Counterpart of a node in this tree.
    pub fn mirror_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.mirror)
    }

    /// Zero every slot without rebuilding.
    pub fn reset_values(&mut self) {
        self.store.reset();
    }
}
