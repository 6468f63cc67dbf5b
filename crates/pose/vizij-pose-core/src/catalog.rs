//! Complete addressable channel set of a rig.
//!
//! Order is deterministic: root (position, rotation), joints in rig order with their
//! DOFs in declared order, generic transforms depth-first with position/rotation/scale,
//! then deformer weights mesh by mesh.

use hashbrown::HashMap;

use crate::channel::{Channel, RootPart, TransformProperty};
use crate::rig::Rig;

#[derive(Clone, Debug, Default)]
pub struct ChannelCatalog {
    channels: Vec<Channel>,
    index: HashMap<Channel, usize>,
}

impl ChannelCatalog {
    pub fn from_rig(rig: &Rig) -> Self {
        let mut channels = Vec::new();

        if let Some(h) = &rig.humanoid {
            if h.has_root {
                for part in RootPart::ALL {
                    channels.push(Channel::root(part));
                }
            }
            for joint in &h.joints {
                for dof in &joint.dofs {
                    channels.push(Channel::joint(joint.name.clone(), *dof));
                }
            }
        }

        for (path, _) in rig.transform_paths() {
            for property in TransformProperty::ALL {
                channels.push(Channel::transform(path.clone(), property));
            }
        }

        for mesh in &rig.meshes {
            for w in &mesh.weights {
                channels.push(Channel::weight(mesh.name.clone(), w.name.clone()));
            }
        }

        let index = channels
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self { channels, index }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Position of a channel in catalog order.
    #[inline]
    pub fn position(&self, channel: &Channel) -> Option<usize> {
        self.index.get(channel).copied()
    }

    #[inline]
    pub fn contains(&self, channel: &Channel) -> bool {
        self.index.contains_key(channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    /// All catalog channels belonging to one joint, in DOF order.
    pub fn joint_channels<'a>(&'a self, joint: &'a str) -> impl Iterator<Item = &'a Channel> + 'a {
        self.channels
            .iter()
            .filter(move |c| matches!(c, Channel::SkeletalJoint { joint: j, .. } if j == joint))
    }

    /// All catalog channels of one generic transform node.
    pub fn transform_channels<'a>(
        &'a self,
        node: &'a str,
    ) -> impl Iterator<Item = &'a Channel> + 'a {
        self.channels
            .iter()
            .filter(move |c| matches!(c, Channel::GenericTransform { node: n, .. } if n == node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Dof;
    use crate::rig::{HumanoidRig, JointDef, MeshDef, TransformDef, WeightDef};

    #[test]
    fn enumerates_all_three_families_in_order() {
        let rig = Rig::new("r")
            .with_humanoid(HumanoidRig {
                has_root: true,
                joints: vec![JointDef::new("Spine", &[Dof::RotationX, Dof::TranslationY])],
                groups: vec![],
                joint_mirrors: vec![],
            })
            .with_transforms(
                TransformDef::new("Root", vec![TransformDef::new("Prop", vec![])]),
                vec![],
            )
            .with_mesh(MeshDef {
                name: "Face".into(),
                weights: vec![WeightDef::new("Smile", Some(0.0))],
                mirrors: vec![],
            });
        let cat = ChannelCatalog::from_rig(&rig);
        let all: Vec<_> = cat.iter().cloned().collect();
        assert_eq!(
            all,
            vec![
                Channel::root(RootPart::Position),
                Channel::root(RootPart::Rotation),
                Channel::joint("Spine", Dof::RotationX),
                Channel::joint("Spine", Dof::TranslationY),
                Channel::transform("Prop", TransformProperty::Position),
                Channel::transform("Prop", TransformProperty::Rotation),
                Channel::transform("Prop", TransformProperty::Scale),
                Channel::weight("Face", "Smile"),
            ]
        );
        assert_eq!(cat.position(&Channel::weight("Face", "Smile")), Some(7));
        assert_eq!(cat.joint_channels("Spine").count(), 2);
        assert_eq!(cat.transform_channels("Prop").count(), 3);
    }

    #[test]
    fn empty_rig_has_empty_catalog() {
        let cat = ChannelCatalog::from_rig(&Rig::new("empty"));
        assert!(cat.is_empty());
        assert!(!cat.contains(&Channel::root(RootPart::Rotation)));
    }
}
