//! Blend tree construction.
//!
//! Steps:
//! 1) probe both poses into index tables over the rig catalog
//! 2) draft each family subtree, keeping only channels present in both poses
//! 3) flatten drafts into a pre-order arena and resolve mirror counterparts
//! 4) lay out a zeroed value store over the arena

use hashbrown::HashMap;
use log::debug;

use crate::catalog::ChannelCatalog;
use crate::channel::{Channel, Family, RootPart, TransformProperty};
use crate::config::Config;
use crate::dataset::PoseDataset;
use crate::error::PoseTreeError;
use crate::ids::{IdAllocator, NodeId};
use crate::index_table::TablePair;
use crate::interp::Interpolator;
use crate::mirror::{resolve_path, MirrorResolver};
use crate::rig::{HumanoidRig, JointBinding, JointGroupDef, Rig, TransformDef};
use crate::store::ValueStore;
use crate::tree::{BlendTree, LeafGroup, NodePayload, TreeNode};

/// Nested form of a subtree before it is flattened into the arena.
struct Draft {
    name: String,
    mirror_path: Option<String>,
    payload: NodePayload,
    children: Vec<Draft>,
}

impl Draft {
    fn new(name: impl Into<String>, payload: NodePayload) -> Self {
        Self {
            name: name.into(),
            mirror_path: None,
            payload,
            children: Vec::new(),
        }
    }
}

pub struct BlendTreeBuilder<'a> {
    rig: &'a Rig,
    cfg: &'a Config,
}

impl<'a> BlendTreeBuilder<'a> {
    pub fn new(rig: &'a Rig, cfg: &'a Config) -> Self {
        Self { rig, cfg }
    }

    /// Build the tree for a pose pair. Either pose missing, or no surviving channel,
    /// yields [`PoseTreeError::NoPoseData`].
    pub fn build(
        &self,
        pose_a: Option<&dyn PoseDataset>,
        pose_b: Option<&dyn PoseDataset>,
    ) -> Result<BlendTree, PoseTreeError> {
        let catalog = ChannelCatalog::from_rig(self.rig);
        self.build_with_catalog(catalog, pose_a, pose_b)
    }

    pub fn build_with_catalog(
        &self,
        catalog: ChannelCatalog,
        pose_a: Option<&dyn PoseDataset>,
        pose_b: Option<&dyn PoseDataset>,
    ) -> Result<BlendTree, PoseTreeError> {
        let (Some(pose_a), Some(pose_b)) = (pose_a, pose_b) else {
            debug!("blend tree for rig '{}': missing reference pose", self.rig.name);
            return Err(PoseTreeError::NoPoseData);
        };
        let tables = TablePair::build(&catalog, pose_a, pose_b);

        let mut families = Vec::new();
        for family in Family::ALL {
            if !self.cfg.families.enabled(family) {
                continue;
            }
            let draft = match family {
                Family::Skeletal => self.skeletal(&tables),
                Family::Generic => self.generic(&tables),
                Family::Deformer => self.deformer(&tables),
            };
            families.extend(draft);
        }
        if families.is_empty() {
            debug!(
                "blend tree for rig '{}': poses '{}' and '{}' share no channel",
                self.rig.name,
                tables.a().name(),
                tables.b().name()
            );
            return Err(PoseTreeError::NoPoseData);
        }

        let mut root = Draft::new("All", NodePayload::Root);
        root.children = families;

        let mut nodes = Vec::new();
        let mut ids = IdAllocator::new();
        flatten(root, None, &mut ids, &mut nodes);

        let mirrors = MirrorResolver::from_rig(self.rig);
        let (leaf_index, transform_nodes) = index_nodes(&nodes);
        resolve_mirrors(&mut nodes, &mirrors, &transform_nodes);

        let store = ValueStore::allocate(&nodes);
        debug!(
            "blend tree for rig '{}' ('{}' x '{}'): {} nodes, {} slots",
            self.rig.name,
            tables.a().name(),
            tables.b().name(),
            nodes.len(),
            store.len()
        );

        Ok(BlendTree {
            nodes,
            store,
            tables,
            catalog,
            interp: Interpolator::new(self.cfg),
            mirrors,
            mirror_selection_dedup: self.cfg.mirror_selection_dedup,
            leaf_index,
            transform_nodes,
        })
    }

    fn admits(&self, binding: JointBinding) -> bool {
        match binding {
            JointBinding::Live => true,
            JointBinding::Virtual => self.cfg.include_virtual_joints,
            JointBinding::Unmapped => false,
        }
    }

    fn skeletal(&self, tables: &TablePair) -> Option<Draft> {
        let h = self.rig.humanoid.as_ref()?;
        let children: Vec<Draft> = h
            .groups
            .iter()
            .filter_map(|g| self.joint_group(h, g, tables))
            .collect();
        if children.is_empty() {
            return None;
        }
        let mut fam = Draft::new(
            Family::Skeletal.label(),
            NodePayload::Skeletal { leaves: None },
        );
        fam.children = children;
        Some(fam)
    }

    fn joint_group(&self, h: &HumanoidRig, g: &JointGroupDef, tables: &TablePair) -> Option<Draft> {
        if !g.children.is_empty() {
            let children: Vec<Draft> = g
                .children
                .iter()
                .filter_map(|c| self.joint_group(h, c, tables))
                .collect();
            if children.is_empty() {
                return None;
            }
            let mut d = Draft::new(g.name.clone(), NodePayload::Skeletal { leaves: None });
            d.mirror_path = g.mirror.clone();
            d.children = children;
            return Some(d);
        }

        let mut channels = Vec::new();
        for name in &g.joints {
            let Some(joint) = h.joints.iter().find(|j| &j.name == name) else {
                continue;
            };
            if !self.admits(joint.binding) {
                continue;
            }
            // each DOF stands alone: rotation can survive while translation does not
            channels.extend(
                joint
                    .dofs
                    .iter()
                    .map(|dof| Channel::joint(name.clone(), *dof))
                    .filter(|c| tables.in_both(c)),
            );
        }
        // root goes after every joint entry
        if g.includes_root && h.has_root {
            channels.extend(
                RootPart::ALL
                    .into_iter()
                    .map(Channel::root)
                    .filter(|c| tables.in_both(c)),
            );
        }
        if channels.is_empty() {
            return None;
        }
        let mut d = Draft::new(
            g.name.clone(),
            NodePayload::Skeletal {
                leaves: Some(LeafGroup { channels }),
            },
        );
        d.mirror_path = g.mirror.clone();
        Some(d)
    }

    fn generic(&self, tables: &TablePair) -> Option<Draft> {
        let root = self.rig.transform_root.as_ref()?;
        let children = transform_drafts(&root.children, "", tables);
        if children.is_empty() {
            return None;
        }
        let mut fam = Draft::new(
            Family::Generic.label(),
            NodePayload::Generic {
                transform: None,
                channels: Vec::new(),
            },
        );
        fam.children = children;
        Some(fam)
    }

    fn deformer(&self, tables: &TablePair) -> Option<Draft> {
        let mut meshes = Vec::new();
        for mesh in &self.rig.meshes {
            let channels: Vec<Channel> = mesh
                .weights
                .iter()
                .filter(|w| w.baseline.is_some())
                .map(|w| Channel::weight(mesh.name.clone(), w.name.clone()))
                .filter(|c| tables.in_both(c))
                .collect();
            if channels.is_empty() {
                continue;
            }
            meshes.push(Draft::new(
                mesh.name.clone(),
                NodePayload::Deformer {
                    mesh: Some(mesh.name.clone()),
                    leaves: Some(LeafGroup { channels }),
                },
            ));
        }
        if meshes.is_empty() {
            return None;
        }
        let mut fam = Draft::new(
            Family::Deformer.label(),
            NodePayload::Deformer {
                mesh: None,
                leaves: None,
            },
        );
        fam.children = meshes;
        Some(fam)
    }
}

/// Depth-first over transforms. A transform with no property shared by both poses
/// is dropped and its surviving descendants attach to the nearest kept ancestor.
fn transform_drafts(defs: &[TransformDef], prefix: &str, tables: &TablePair) -> Vec<Draft> {
    let mut out = Vec::new();
    for def in defs {
        let path = if prefix.is_empty() {
            def.name.clone()
        } else {
            format!("{prefix}/{}", def.name)
        };
        let channels: Vec<Channel> = TransformProperty::ALL
            .into_iter()
            .map(|p| Channel::transform(path.clone(), p))
            .filter(|c| tables.in_both(c))
            .collect();
        let children = transform_drafts(&def.children, &path, tables);
        if channels.is_empty() {
            out.extend(children);
            continue;
        }
        let mut d = Draft::new(
            def.name.clone(),
            NodePayload::Generic {
                transform: Some(path),
                channels,
            },
        );
        d.children = children;
        out.push(d);
    }
    out
}

fn flatten(draft: Draft, parent: Option<NodeId>, ids: &mut IdAllocator, nodes: &mut Vec<TreeNode>) -> NodeId {
    let id = ids.alloc_node();
    nodes.push(TreeNode {
        id,
        display_name: draft.name,
        parent,
        children: Vec::with_capacity(draft.children.len()),
        mirror_path: draft.mirror_path,
        mirror: None,
        payload: draft.payload,
    });
    for child in draft.children {
        let cid = flatten(child, Some(id), ids, nodes);
        nodes[id.index()].children.push(cid);
    }
    id
}

type LeafIndex = HashMap<Channel, (NodeId, usize)>;
type TransformIndex = HashMap<String, NodeId>;

fn index_nodes(nodes: &[TreeNode]) -> (LeafIndex, TransformIndex) {
    let mut leaves = HashMap::new();
    let mut transforms = HashMap::new();
    for node in nodes {
        if let Some(group) = node.leaves() {
            for (i, c) in group.channels.iter().enumerate() {
                leaves.insert(c.clone(), (node.id, i));
            }
        }
        if let NodePayload::Generic {
            transform: Some(path),
            ..
        } = &node.payload
        {
            transforms.insert(path.clone(), node.id);
        }
    }
    (leaves, transforms)
}

/// Group mirrors come from declared paths under the skeletal family root;
/// transform nodes use the rig's transform table. Unresolvable paths stay `None`.
fn resolve_mirrors(nodes: &mut [TreeNode], mirrors: &MirrorResolver, transforms: &TransformIndex) {
    let skeletal_root = nodes
        .first()
        .into_iter()
        .flat_map(|root| root.children.iter().copied())
        .find(|c| matches!(nodes[c.index()].payload, NodePayload::Skeletal { .. }));

    for i in 0..nodes.len() {
        let resolved = match &nodes[i].payload {
            NodePayload::Skeletal { .. } => match (&nodes[i].mirror_path, skeletal_root) {
                (Some(path), Some(fam)) => resolve_path(nodes, fam, path),
                _ => None,
            },
            NodePayload::Generic {
                transform: Some(path),
                ..
            } => mirrors
                .transform(path)
                .and_then(|p| transforms.get(p).copied()),
            _ => None,
        };
        nodes[i].mirror = resolved.filter(|m| m.index() != i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Dof;
    use crate::dataset::PoseSnapshot;
    use crate::rig::{JointDef, MeshDef, WeightDef};

    fn arms_rig() -> Rig {
        Rig::new("arms").with_humanoid(HumanoidRig {
            has_root: true,
            joints: vec![
                JointDef::new("Spine", &[Dof::RotationX]),
                JointDef::new("LeftHand", &[Dof::RotationX, Dof::TranslationX]),
                JointDef::new("RightHand", &[Dof::RotationX, Dof::TranslationX]),
                JointDef::new("LeftWing", &[Dof::RotationX]).with_binding(JointBinding::Virtual),
                JointDef::new("Tail", &[Dof::RotationX]).with_binding(JointBinding::Unmapped),
            ],
            groups: vec![
                JointGroupDef::leaf("Body", &["Spine", "Tail"]).with_root(),
                JointGroupDef::leaf("Left Arm", &["LeftHand", "LeftWing"]).mirrored("Right Arm"),
                JointGroupDef::leaf("Right Arm", &["RightHand"]).mirrored("Left Arm"),
            ],
            joint_mirrors: vec![["LeftHand".into(), "RightHand".into()]],
        })
    }

    fn full(name: &str) -> PoseSnapshot {
        PoseSnapshot::new(name)
            .with_root_position([0.0; 3])
            .with_root_rotation([0.0, 0.0, 0.0, 1.0])
            .with_joint("Spine", Dof::RotationX, 0.0)
            .with_joint("LeftHand", Dof::RotationX, 0.0)
            .with_joint("LeftHand", Dof::TranslationX, 0.0)
            .with_joint("RightHand", Dof::RotationX, 0.0)
            .with_joint("RightHand", Dof::TranslationX, 0.0)
            .with_joint("LeftWing", Dof::RotationX, 0.0)
            .with_joint("Tail", Dof::RotationX, 0.0)
    }

    #[test]
    fn missing_pose_is_no_pose_data() {
        let rig = arms_rig();
        let cfg = Config::default();
        let a = full("a");
        let b = BlendTreeBuilder::new(&rig, &cfg).build(Some(&a), None);
        assert_eq!(b.err(), Some(PoseTreeError::NoPoseData));
        let b = BlendTreeBuilder::new(&rig, &cfg).build(None, None);
        assert_eq!(b.err(), Some(PoseTreeError::NoPoseData));
    }

    #[test]
    fn disjoint_poses_are_no_pose_data() {
        let rig = arms_rig();
        let cfg = Config::default();
        let a = PoseSnapshot::new("a").with_joint("Spine", Dof::RotationX, 0.0);
        let b = PoseSnapshot::new("b").with_joint("LeftHand", Dof::RotationX, 0.0);
        let res = BlendTreeBuilder::new(&rig, &cfg).build(Some(&a), Some(&b));
        assert_eq!(res.err(), Some(PoseTreeError::NoPoseData));
    }

    #[test]
    fn root_is_last_and_unmapped_joints_are_dropped() {
        let rig = arms_rig();
        let cfg = Config::default();
        let (a, b) = (full("a"), full("b"));
        let tree = BlendTreeBuilder::new(&rig, &cfg)
            .build(Some(&a), Some(&b))
            .unwrap();
        let body = tree.find("Skeletal/Body").unwrap();
        assert_eq!(
            tree.leaf_channels(body),
            &[
                Channel::joint("Spine", Dof::RotationX),
                Channel::root(RootPart::Position),
                Channel::root(RootPart::Rotation),
            ]
        );
    }

    #[test]
    fn virtual_joints_follow_config() {
        let rig = arms_rig();
        let (a, b) = (full("a"), full("b"));
        let cfg = Config::default();
        let tree = BlendTreeBuilder::new(&rig, &cfg)
            .build(Some(&a), Some(&b))
            .unwrap();
        let left = tree.find("Skeletal/Left Arm").unwrap();
        assert_eq!(tree.leaf_channels(left).len(), 3);

        let cfg = Config {
            include_virtual_joints: false,
            ..Config::default()
        };
        let tree = BlendTreeBuilder::new(&rig, &cfg)
            .build(Some(&a), Some(&b))
            .unwrap();
        let left = tree.find("Skeletal/Left Arm").unwrap();
        assert_eq!(tree.leaf_channels(left).len(), 2);
    }

    #[test]
    fn translation_dof_is_independent_of_rotation() {
        let rig = arms_rig();
        let cfg = Config::default();
        let a = full("a");
        let mut b = PoseSnapshot::new("b").with_joint("LeftHand", Dof::RotationX, 1.0);
        b.set(
            Channel::joint("RightHand", Dof::TranslationX),
            crate::value::Value::Float(1.0),
        );
        let tree = BlendTreeBuilder::new(&rig, &cfg)
            .build(Some(&a), Some(&b))
            .unwrap();
        let left = tree.find("Skeletal/Left Arm").unwrap();
        let right = tree.find("Skeletal/Right Arm").unwrap();
        assert_eq!(
            tree.leaf_channels(left),
            &[Channel::joint("LeftHand", Dof::RotationX)]
        );
        assert_eq!(
            tree.leaf_channels(right),
            &[Channel::joint("RightHand", Dof::TranslationX)]
        );
        assert!(tree.find("Skeletal/Body").is_none());
    }

    #[test]
    fn group_mirrors_resolve_both_ways() {
        let rig = arms_rig();
        let cfg = Config::default();
        let (a, b) = (full("a"), full("b"));
        let tree = BlendTreeBuilder::new(&rig, &cfg)
            .build(Some(&a), Some(&b))
            .unwrap();
        let left = tree.find("Skeletal/Left Arm").unwrap();
        let right = tree.find("Skeletal/Right Arm").unwrap();
        assert_eq!(tree.mirror_of(left), Some(right));
        assert_eq!(tree.mirror_of(right), Some(left));
        assert_eq!(tree.mirror_of(tree.find("Skeletal/Body").unwrap()), None);
    }

    #[test]
    fn weights_need_a_baseline() {
        let rig = Rig::new("face").with_mesh(MeshDef {
            name: "Face".into(),
            weights: vec![
                WeightDef::new("Smile", Some(0.0)),
                WeightDef::new("Frown", None),
            ],
            mirrors: vec![],
        });
        let cfg = Config::default();
        let a = PoseSnapshot::new("a")
            .with_weight("Face", "Smile", 0.0)
            .with_weight("Face", "Frown", 0.0);
        let b = PoseSnapshot::new("b")
            .with_weight("Face", "Smile", 1.0)
            .with_weight("Face", "Frown", 1.0);
        let tree = BlendTreeBuilder::new(&rig, &cfg)
            .build(Some(&a), Some(&b))
            .unwrap();
        let face = tree.find("Deformer/Face").unwrap();
        assert_eq!(tree.leaf_channels(face), &[Channel::weight("Face", "Smile")]);
        assert!(tree.family_root(Family::Skeletal).is_none());
    }
}
