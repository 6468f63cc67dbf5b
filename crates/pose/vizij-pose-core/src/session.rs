//! Pose blending session.
//!
//! Owns the rig, the two reference poses and the tree built from them. Any change
//! to one of those rebuilds catalog, index tables, tree and a zeroed value store
//! together, so nothing derived from an old pose survives the swap.

use log::debug;

use crate::builder::BlendTreeBuilder;
use crate::catalog::ChannelCatalog;
use crate::config::Config;
use crate::dataset::PoseDataset;
use crate::error::{PoseTreeError, RigError};
use crate::rig::Rig;
use crate::tree::BlendTree;

pub struct PoseBlender {
    rig: Rig,
    cfg: Config,
    catalog: ChannelCatalog,
    pose_a: Option<Box<dyn PoseDataset>>,
    pose_b: Option<Box<dyn PoseDataset>>,
    tree: Result<BlendTree, PoseTreeError>,
    revision: u64,
}

impl PoseBlender {
    /// Start a session for `rig` with no poses loaded.
    pub fn new(rig: Rig, cfg: Config) -> Result<Self, RigError> {
        rig.validate()?;
        let catalog = ChannelCatalog::from_rig(&rig);
        Ok(Self {
            rig,
            cfg,
            catalog,
            pose_a: None,
            pose_b: None,
            tree: Err(PoseTreeError::NoPoseData),
            revision: 0,
        })
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Replace the rig. On a validation error the session is left untouched.
    pub fn set_rig(&mut self, rig: Rig) -> Result<(), RigError> {
        rig.validate()?;
        self.catalog = ChannelCatalog::from_rig(&rig);
        self.rig = rig;
        self.rebuild();
        Ok(())
    }

    pub fn set_config(&mut self, cfg: Config) {
        self.cfg = cfg;
        self.rebuild();
    }

    pub fn set_pose_a(&mut self, pose: Box<dyn PoseDataset>) {
        debug!("pose A <- '{}'", pose.name());
        self.pose_a = Some(pose);
        self.rebuild();
    }

    pub fn set_pose_b(&mut self, pose: Box<dyn PoseDataset>) {
        debug!("pose B <- '{}'", pose.name());
        self.pose_b = Some(pose);
        self.rebuild();
    }

    pub fn clear_pose_a(&mut self) {
        self.pose_a = None;
        self.rebuild();
    }

    pub fn clear_pose_b(&mut self) {
        self.pose_b = None;
        self.rebuild();
    }

    pub fn has_tree(&self) -> bool {
        self.tree.is_ok()
    }

    pub fn tree(&self) -> Result<&BlendTree, PoseTreeError> {
        self.tree.as_ref().map_err(Clone::clone)
    }

    pub fn tree_mut(&mut self) -> Result<&mut BlendTree, PoseTreeError> {
        self.tree.as_mut().map_err(|e| e.clone())
    }

    /// Bumped on every rebuild. Node ids from an older revision are meaningless.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn rebuild(&mut self) {
        self.revision += 1;
        self.tree = BlendTreeBuilder::new(&self.rig, &self.cfg).build_with_catalog(
            self.catalog.clone(),
            self.pose_a.as_deref(),
            self.pose_b.as_deref(),
        );
        match &self.tree {
            Ok(tree) => debug!(
                "session rev {}: tree ready ({} nodes)",
                self.revision,
                tree.len()
            ),
            Err(e) => debug!("session rev {}: {e}", self.revision),
        }
    }
}
