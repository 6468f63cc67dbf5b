//! Vizij Pose Core (engine-agnostic)
//!
//! Blends a rig between two captured reference poses, channel by channel. A
//! [`BlendTree`] groups the channels both poses share (skeletal groups, generic
//! transforms, deformer meshes) so a host can drive a whole limb, a single leaf
//! channel, or an ad hoc selection with one blend factor. Every edit produces
//! ordered channel writes for an external [`ChannelSink`].

pub mod builder;
pub mod catalog;
pub mod channel;
pub mod config;
pub mod dataset;
pub mod edit;
pub mod error;
pub mod ids;
pub mod index_table;
pub mod interp;
pub mod mirror;
pub mod outputs;
pub mod rig;
pub mod session;
pub mod store;
pub mod tree;
pub mod value;

// Re-exports for consumers (editor hosts)
pub use builder::BlendTreeBuilder;
pub use catalog::ChannelCatalog;
pub use channel::{Channel, Dof, Family, RootPart, TransformProperty};
pub use config::{Config, FamilyToggles};
pub use dataset::{PoseDataset, PoseDocument, PoseSnapshot};
pub use edit::Selected;
pub use error::{PoseTreeError, RigError};
pub use ids::{NodeId, SlotId};
pub use index_table::{PoseIndexTable, TablePair};
pub use interp::{blend, Interpolator};
pub use mirror::MirrorResolver;
pub use outputs::{ChannelSink, ChannelWrite, WriteBatch};
pub use rig::{
    HumanoidRig, JointBinding, JointDef, JointGroupDef, MeshDef, Rig, TransformDef, WeightDef,
};
pub use session::PoseBlender;
pub use store::ValueStore;
pub use tree::{BlendTree, LeafGroup, NodePayload, TreeNode};
pub use value::{Value, ValueKind};
