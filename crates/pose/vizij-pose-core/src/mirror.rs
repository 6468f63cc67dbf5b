//! Bilateral counterparts.
//!
//! Group nodes declare their counterpart as a path from the skeletal family root;
//! the builder resolves it to a [`NodeId`] once. Leaf channels, transforms and
//! selections go through the rig's bilateral tables instead.

use hashbrown::HashMap;

use crate::channel::Channel;
use crate::ids::NodeId;
use crate::rig::Rig;
use crate::tree::TreeNode;

/// Rig-level mirror tables, symmetric by construction.
#[derive(Clone, Debug, Default)]
pub struct MirrorResolver {
    joints: HashMap<String, String>,
    transforms: HashMap<String, String>,
    weights: HashMap<String, HashMap<String, String>>,
}

fn insert_pairs(map: &mut HashMap<String, String>, pairs: &[[String; 2]]) {
    for [l, r] in pairs {
        if l == r {
            continue;
        }
        map.insert(l.clone(), r.clone());
        map.insert(r.clone(), l.clone());
    }
}

impl MirrorResolver {
    pub fn from_rig(rig: &Rig) -> Self {
        let mut out = Self::default();
        if let Some(h) = &rig.humanoid {
            insert_pairs(&mut out.joints, &h.joint_mirrors);
        }
        insert_pairs(&mut out.transforms, &rig.transform_mirrors);
        for mesh in &rig.meshes {
            if mesh.mirrors.is_empty() {
                continue;
            }
            let mut names = HashMap::new();
            insert_pairs(&mut names, &mesh.mirrors);
            out.weights.insert(mesh.name.clone(), names);
        }
        out
    }

    pub fn joint(&self, name: &str) -> Option<&str> {
        self.joints.get(name).map(String::as_str)
    }

    pub fn transform(&self, path: &str) -> Option<&str> {
        self.transforms.get(path).map(String::as_str)
    }

    pub fn weight(&self, mesh: &str, name: &str) -> Option<&str> {
        self.weights.get(mesh)?.get(name).map(String::as_str)
    }

    /// Counterpart of a channel, keeping its DOF or property.
    /// The root has no counterpart.
    pub fn channel(&self, channel: &Channel) -> Option<Channel> {
        match channel {
            Channel::SkeletalRoot { .. } => None,
            Channel::SkeletalJoint { joint, dof } => Some(Channel::joint(self.joint(joint)?, *dof)),
            Channel::GenericTransform { node, property } => {
                Some(Channel::transform(self.transform(node)?, *property))
            }
            Channel::DeformerWeight { mesh, weight } => {
                Some(Channel::weight(mesh.clone(), self.weight(mesh, weight)?))
            }
        }
    }
}

/// Walk `path` from `from` by matching child display names in an arena.
/// Any unmatched segment yields `None`.
pub(crate) fn resolve_path(nodes: &[TreeNode], from: NodeId, path: &str) -> Option<NodeId> {
    let mut cur = from;
    for seg in path.split('/').filter(|s| !s.is_empty()) {
        cur = nodes[cur.index()]
            .children
            .iter()
            .copied()
            .find(|c| nodes[c.index()].display_name == seg)?;
    }
    (cur != from).then_some(cur)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Dof, RootPart, TransformProperty};
    use crate::rig::{HumanoidRig, MeshDef, TransformDef, WeightDef};

    fn rig() -> Rig {
        Rig::new("m")
            .with_humanoid(HumanoidRig::standard())
            .with_transforms(
                TransformDef::new(
                    "Armature",
                    vec![
                        TransformDef::new("EarL", vec![]),
                        TransformDef::new("EarR", vec![]),
                    ],
                ),
                vec![["EarL".into(), "EarR".into()]],
            )
            .with_mesh(MeshDef {
                name: "Face".into(),
                weights: vec![
                    WeightDef::new("BlinkL", Some(0.0)),
                    WeightDef::new("BlinkR", Some(0.0)),
                    WeightDef::new("Smile", Some(0.0)),
                ],
                mirrors: vec![["BlinkL".into(), "BlinkR".into()]],
            })
    }

    #[test]
    fn channels_mirror_both_ways() {
        let m = MirrorResolver::from_rig(&rig());
        let l = Channel::joint("LeftUpperArm", Dof::RotationY);
        let r = Channel::joint("RightUpperArm", Dof::RotationY);
        assert_eq!(m.channel(&l), Some(r.clone()));
        assert_eq!(m.channel(&r), Some(l));
        assert_eq!(
            m.channel(&Channel::transform("EarR", TransformProperty::Rotation)),
            Some(Channel::transform("EarL", TransformProperty::Rotation))
        );
        assert_eq!(
            m.channel(&Channel::weight("Face", "BlinkL")),
            Some(Channel::weight("Face", "BlinkR"))
        );
    }

    #[test]
    fn unpaired_channels_have_no_mirror() {
        let m = MirrorResolver::from_rig(&rig());
        assert_eq!(m.channel(&Channel::root(RootPart::Rotation)), None);
        assert_eq!(m.channel(&Channel::joint("Neck", Dof::RotationX)), None);
        assert_eq!(m.channel(&Channel::weight("Face", "Smile")), None);
        assert_eq!(m.channel(&Channel::weight("Body", "BlinkL")), None);
    }
}
