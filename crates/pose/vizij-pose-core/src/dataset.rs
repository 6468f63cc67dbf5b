//! Reference pose datasets.
//!
//! A dataset is a read-only snapshot of channel values captured by an external
//! template system. It may be partial: any channel can be missing. Root data is
//! additionally guarded by explicit capture flags.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, Dof, RootPart, TransformProperty};
use crate::value::Value;

/// Keyed lookup into one captured pose.
pub trait PoseDataset {
    fn try_get_value(&self, channel: &Channel) -> Option<Value>;

    /// Whether the capture explicitly recorded this half of the root.
    fn captured_root(&self, part: RootPart) -> bool;

    fn name(&self) -> &str {
        ""
    }
}

/// In-memory dataset keyed by channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseSnapshot {
    name: String,
    root_position: bool,
    root_rotation: bool,
    values: HashMap<Channel, Value>,
}

impl PoseSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Store a value without touching root flags.
    pub fn set(&mut self, channel: Channel, value: Value) {
        self.values.insert(channel, value);
    }

    pub fn set_root_flag(&mut self, part: RootPart, captured: bool) {
        match part {
            RootPart::Position => self.root_position = captured,
            RootPart::Rotation => self.root_rotation = captured,
        }
    }

    /// Record root position and flag it as captured.
    pub fn with_root_position(mut self, pos: [f32; 3]) -> Self {
        self.set(Channel::root(RootPart::Position), Value::Vec3(pos));
        self.root_position = true;
        self
    }

    /// Record root rotation and flag it as captured.
    pub fn with_root_rotation(mut self, rot: [f32; 4]) -> Self {
        self.set(Channel::root(RootPart::Rotation), Value::Quat(rot));
        self.root_rotation = true;
        self
    }

    pub fn with_joint(mut self, joint: &str, dof: Dof, value: f32) -> Self {
        self.set(Channel::joint(joint, dof), Value::Float(value));
        self
    }

    pub fn with_transform(mut self, node: &str, property: TransformProperty, value: Value) -> Self {
        self.set(Channel::transform(node, property), value);
        self
    }

    pub fn with_weight(mut self, mesh: &str, weight: &str, value: f32) -> Self {
        self.set(Channel::weight(mesh, weight), Value::Float(value));
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PoseDataset for PoseSnapshot {
    fn try_get_value(&self, channel: &Channel) -> Option<Value> {
        self.values.get(channel).copied()
    }

    fn captured_root(&self, part: RootPart) -> bool {
        match part {
            RootPart::Position => self.root_position,
            RootPart::Rotation => self.root_rotation,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Serialized form of a pose template as exported by the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseDocument {
    pub name: String,
    #[serde(default)]
    pub root: RootSample,
    #[serde(default)]
    pub joints: Vec<JointSample>,
    #[serde(default)]
    pub transforms: Vec<TransformSample>,
    #[serde(default)]
    pub deformers: Vec<DeformerSample>,
}

/// Root capture. Flags and values are independent: a template may flag the root
/// as captured and still omit the value, or carry a value it never flagged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootSample {
    #[serde(default)]
    pub has_position: bool,
    #[serde(default)]
    pub has_rotation: bool,
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    #[serde(default)]
    pub rotation: Option<[f32; 4]>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    pub joint: String,
    pub dof: Dof,
    pub value: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformSample {
    pub node: String,
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    #[serde(default)]
    pub rotation: Option<[f32; 4]>,
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeformerSample {
    pub mesh: String,
    pub weights: HashMap<String, f32>,
}

impl From<PoseDocument> for PoseSnapshot {
    fn from(doc: PoseDocument) -> Self {
        let mut snap = PoseSnapshot::new(doc.name);
        snap.root_position = doc.root.has_position;
        snap.root_rotation = doc.root.has_rotation;
        if let Some(p) = doc.root.position {
            snap.set(Channel::root(RootPart::Position), Value::Vec3(p));
        }
        if let Some(q) = doc.root.rotation {
            snap.set(Channel::root(RootPart::Rotation), Value::Quat(q));
        }
        for s in doc.joints {
            snap.set(Channel::joint(s.joint, s.dof), Value::Float(s.value));
        }
        for s in doc.transforms {
            if let Some(p) = s.position {
                snap.set(
                    Channel::transform(s.node.clone(), TransformProperty::Position),
                    Value::Vec3(p),
                );
            }
            if let Some(q) = s.rotation {
                snap.set(
                    Channel::transform(s.node.clone(), TransformProperty::Rotation),
                    Value::Quat(q),
                );
            }
            if let Some(sc) = s.scale {
                snap.set(
                    Channel::transform(s.node, TransformProperty::Scale),
                    Value::Vec3(sc),
                );
            }
        }
        for s in doc.deformers {
            for (name, w) in s.weights {
                snap.set(Channel::weight(s.mesh.clone(), name), Value::Float(w));
            }
        }
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_flags_are_independent_of_values() {
        let doc: PoseDocument = serde_json::from_value(serde_json::json!({
            "name": "half",
            "root": { "has_position": true, "rotation": [0.0, 0.0, 0.0, 1.0] },
            "joints": [ { "joint": "Neck", "dof": "rotation_x", "value": 0.25 } ],
            "transforms": [ { "node": "Hips/Tail", "scale": [1.0, 2.0, 1.0] } ],
            "deformers": [ { "mesh": "Face", "weights": { "Smile": 0.5 } } ]
        }))
        .unwrap();
        let snap = PoseSnapshot::from(doc);
        assert_eq!(snap.name(), "half");
        assert!(snap.captured_root(RootPart::Position));
        assert!(!snap.captured_root(RootPart::Rotation));
        assert_eq!(snap.try_get_value(&Channel::root(RootPart::Position)), None);
        assert!(snap
            .try_get_value(&Channel::root(RootPart::Rotation))
            .is_some());
        assert_eq!(
            snap.try_get_value(&Channel::joint("Neck", Dof::RotationX)),
            Some(Value::Float(0.25))
        );
        assert_eq!(
            snap.try_get_value(&Channel::transform("Hips/Tail", TransformProperty::Scale)),
            Some(Value::Vec3([1.0, 2.0, 1.0]))
        );
        assert_eq!(
            snap.try_get_value(&Channel::transform("Hips/Tail", TransformProperty::Position)),
            None
        );
        assert_eq!(
            snap.try_get_value(&Channel::weight("Face", "Smile")),
            Some(Value::Float(0.5))
        );
        assert_eq!(snap.len(), 4);
    }
}
