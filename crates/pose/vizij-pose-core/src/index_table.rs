//! Per-dataset channel availability.
//!
//! A table is captured once per dataset load by probing every catalog channel.
//! Present values are copied into a dense buffer so edits never go back to the
//! dataset. Tables can only be produced by [`PoseIndexTable::build`]; a dataset
//! swap means building a new one.

use hashbrown::HashMap;
use log::trace;

use crate::catalog::ChannelCatalog;
use crate::channel::Channel;
use crate::dataset::PoseDataset;
use crate::value::Value;

#[derive(Clone, Debug)]
pub struct PoseIndexTable {
    name: String,
    slots: HashMap<Channel, usize>,
    values: Vec<Value>,
}

impl PoseIndexTable {
    /// Probe `dataset` for every channel of `catalog`.
    ///
    /// A channel is present when the dataset has a value of the channel's kind.
    /// Root channels additionally need the dataset's explicit capture flag.
    pub fn build(catalog: &ChannelCatalog, dataset: &dyn PoseDataset) -> Self {
        let mut slots = HashMap::new();
        let mut values = Vec::new();
        for channel in catalog.iter() {
            if let Channel::SkeletalRoot { part } = channel {
                if !dataset.captured_root(*part) {
                    continue;
                }
            }
            let Some(value) = dataset.try_get_value(channel) else {
                continue;
            };
            if value.kind() != channel.value_kind() {
                trace!(
                    "pose '{}': {} has {:?}, expected {:?}; treated as absent",
                    dataset.name(),
                    channel,
                    value.kind(),
                    channel.value_kind()
                );
                continue;
            }
            slots.insert(channel.clone(), values.len());
            values.push(value);
        }
        Self {
            name: dataset.name().to_string(),
            slots,
            values,
        }
    }

    /// Storage slot of `channel`, or `None` when the dataset lacks it.
    #[inline]
    pub fn slot(&self, channel: &Channel) -> Option<usize> {
        self.slots.get(channel).copied()
    }

    #[inline]
    pub fn contains(&self, channel: &Channel) -> bool {
        self.slots.contains_key(channel)
    }

    #[inline]
    pub fn value(&self, channel: &Channel) -> Option<&Value> {
        self.slot(channel).map(|i| &self.values[i])
    }

    /// Number of present channels.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The two tables of a reference pose pair.
#[derive(Clone, Debug)]
pub struct TablePair {
    a: PoseIndexTable,
    b: PoseIndexTable,
}

impl TablePair {
    pub fn build(
        catalog: &ChannelCatalog,
        pose_a: &dyn PoseDataset,
        pose_b: &dyn PoseDataset,
    ) -> Self {
        Self {
            a: PoseIndexTable::build(catalog, pose_a),
            b: PoseIndexTable::build(catalog, pose_b),
        }
    }

    pub fn a(&self) -> &PoseIndexTable {
        &self.a
    }

    pub fn b(&self) -> &PoseIndexTable {
        &self.b
    }

    #[inline]
    pub fn in_both(&self, channel: &Channel) -> bool {
        self.a.contains(channel) && self.b.contains(channel)
    }

    /// Values from both poses, when both have the channel.
    #[inline]
    pub fn values(&self, channel: &Channel) -> Option<(&Value, &Value)> {
        Some((self.a.value(channel)?, self.b.value(channel)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Dof, RootPart};
    use crate::dataset::PoseSnapshot;
    use crate::rig::{HumanoidRig, JointDef, Rig};

    fn catalog() -> ChannelCatalog {
        ChannelCatalog::from_rig(&Rig::new("r").with_humanoid(HumanoidRig {
            has_root: true,
            joints: vec![JointDef::new("Neck", &[Dof::RotationX, Dof::RotationY])],
            groups: vec![],
            joint_mirrors: vec![],
        }))
    }

    #[test]
    fn records_presence_per_channel() {
        let pose = PoseSnapshot::new("a").with_joint("Neck", Dof::RotationY, 0.5);
        let table = PoseIndexTable::build(&catalog(), &pose);
        assert_eq!(table.len(), 1);
        assert_eq!(table.slot(&Channel::joint("Neck", Dof::RotationY)), Some(0));
        assert_eq!(table.slot(&Channel::joint("Neck", Dof::RotationX)), None);
        assert_eq!(
            table.value(&Channel::joint("Neck", Dof::RotationY)),
            Some(&Value::Float(0.5))
        );
    }

    #[test]
    fn root_requires_capture_flag() {
        let mut pose = PoseSnapshot::new("a");
        pose.set(Channel::root(RootPart::Rotation), Value::IDENTITY_QUAT);
        let table = PoseIndexTable::build(&catalog(), &pose);
        assert!(!table.contains(&Channel::root(RootPart::Rotation)));

        pose.set_root_flag(RootPart::Rotation, true);
        let table = PoseIndexTable::build(&catalog(), &pose);
        assert!(table.contains(&Channel::root(RootPart::Rotation)));
    }

    #[test]
    fn flag_without_value_is_absent() {
        let mut pose = PoseSnapshot::new("a");
        pose.set_root_flag(RootPart::Position, true);
        let table = PoseIndexTable::build(&catalog(), &pose);
        assert!(!table.contains(&Channel::root(RootPart::Position)));
    }

    #[test]
    fn wrong_kind_is_absent() {
        let mut pose = PoseSnapshot::new("a");
        pose.set(Channel::joint("Neck", Dof::RotationX), Value::IDENTITY_QUAT);
        let table = PoseIndexTable::build(&catalog(), &pose);
        assert!(table.is_empty());
    }

    #[test]
    fn empty_catalog_gives_empty_table() {
        let pose = PoseSnapshot::new("a").with_joint("Neck", Dof::RotationX, 1.0);
        let table = PoseIndexTable::build(&ChannelCatalog::default(), &pose);
        assert!(table.is_empty());
    }
}
