//! Channel identifiers: one independently blendable quantity of a rig.
//!
//! Channels are immutable keys. Equality is by family, element id and degree of
//! freedom, so two channels built from the same names always compare equal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

/// The three channel families a rig exposes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Skeletal,
    Generic,
    Deformer,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Skeletal, Family::Generic, Family::Deformer];

    /// Display name used for the family root node.
    pub fn label(self) -> &'static str {
        match self {
            Family::Skeletal => "Skeletal",
            Family::Generic => "Generic",
            Family::Deformer => "Deformer",
        }
    }
}

/// Half of the rig root pseudo-channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootPart {
    Position,
    Rotation,
}

impl RootPart {
    pub const ALL: [RootPart; 2] = [RootPart::Position, RootPart::Rotation];
}

/// Joint degree of freedom.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dof {
    RotationX,
    RotationY,
    RotationZ,
    TranslationX,
    TranslationY,
    TranslationZ,
}

impl Dof {
    pub const ROTATIONS: [Dof; 3] = [Dof::RotationX, Dof::RotationY, Dof::RotationZ];
    pub const TRANSLATIONS: [Dof; 3] = [Dof::TranslationX, Dof::TranslationY, Dof::TranslationZ];

    #[inline]
    pub fn is_rotational(self) -> bool {
        matches!(self, Dof::RotationX | Dof::RotationY | Dof::RotationZ)
    }

    #[inline]
    pub fn is_translational(self) -> bool {
        !self.is_rotational()
    }

    fn field(self) -> &'static str {
        match self {
            Dof::RotationX => "rotation_x",
            Dof::RotationY => "rotation_y",
            Dof::RotationZ => "rotation_z",
            Dof::TranslationX => "translation_x",
            Dof::TranslationY => "translation_y",
            Dof::TranslationZ => "translation_z",
        }
    }
}

/// Property of a generic transform node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformProperty {
    Position,
    Rotation,
    Scale,
}

impl TransformProperty {
    pub const ALL: [TransformProperty; 3] = [
        TransformProperty::Position,
        TransformProperty::Rotation,
        TransformProperty::Scale,
    ];
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Channel {
    /// Position or rotation of the rig root. Carries no joint.
    SkeletalRoot { part: RootPart },
    SkeletalJoint { joint: String, dof: Dof },
    /// `node` is the transform path relative to the rig root, e.g. "Hips/Tail".
    GenericTransform {
        node: String,
        property: TransformProperty,
    },
    DeformerWeight { mesh: String, weight: String },
}

impl Channel {
    pub fn root(part: RootPart) -> Self {
        Channel::SkeletalRoot { part }
    }

    pub fn joint(joint: impl Into<String>, dof: Dof) -> Self {
        Channel::SkeletalJoint {
            joint: joint.into(),
            dof,
        }
    }

    pub fn transform(node: impl Into<String>, property: TransformProperty) -> Self {
        Channel::GenericTransform {
            node: node.into(),
            property,
        }
    }

    pub fn weight(mesh: impl Into<String>, weight: impl Into<String>) -> Self {
        Channel::DeformerWeight {
            mesh: mesh.into(),
            weight: weight.into(),
        }
    }

    #[inline]
    pub fn family(&self) -> Family {
        match self {
            Channel::SkeletalRoot { .. } | Channel::SkeletalJoint { .. } => Family::Skeletal,
            Channel::GenericTransform { .. } => Family::Generic,
            Channel::DeformerWeight { .. } => Family::Deformer,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        matches!(self, Channel::SkeletalRoot { .. })
    }

    /// Value kind the channel carries in a well-formed dataset.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Channel::SkeletalRoot {
                part: RootPart::Position,
            } => ValueKind::Vec3,
            Channel::SkeletalRoot {
                part: RootPart::Rotation,
            } => ValueKind::Quat,
            Channel::SkeletalJoint { .. } => ValueKind::Float,
            Channel::GenericTransform { property, .. } => match property {
                TransformProperty::Rotation => ValueKind::Quat,
                TransformProperty::Position | TransformProperty::Scale => ValueKind::Vec3,
            },
            Channel::DeformerWeight { .. } => ValueKind::Float,
        }
    }
}

/// Formats as a typed path: `skeletal/LeftUpperArm.rotation_x`,
/// `generic/Hips/Tail.rotation`, `deformer/Face.Smile`.
impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::SkeletalRoot { part } => {
                let field = match part {
                    RootPart::Position => "position",
                    RootPart::Rotation => "rotation",
                };
                write!(f, "skeletal/Root.{field}")
            }
            Channel::SkeletalJoint { joint, dof } => {
                write!(f, "skeletal/{joint}.{}", dof.field())
            }
            Channel::GenericTransform { node, property } => {
                let field = match property {
                    TransformProperty::Position => "position",
                    TransformProperty::Rotation => "rotation",
                    TransformProperty::Scale => "scale",
                };
                write!(f, "generic/{node}.{field}")
            }
            Channel::DeformerWeight { mesh, weight } => write!(f, "deformer/{mesh}.{weight}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_family_id_and_dof() {
        assert_eq!(
            Channel::joint("LeftHand", Dof::RotationX),
            Channel::joint(String::from("LeftHand"), Dof::RotationX)
        );
        assert_ne!(
            Channel::joint("LeftHand", Dof::RotationX),
            Channel::joint("LeftHand", Dof::RotationY)
        );
        assert_ne!(Channel::weight("Face", "Hips"), Channel::joint("Hips", Dof::RotationX));
    }

    #[test]
    fn display_as_typed_path() {
        assert_eq!(
            Channel::joint("LeftUpperArm", Dof::RotationX).to_string(),
            "skeletal/LeftUpperArm.rotation_x"
        );
        assert_eq!(
            Channel::root(RootPart::Rotation).to_string(),
            "skeletal/Root.rotation"
        );
        assert_eq!(
            Channel::transform("Hips/Tail", TransformProperty::Scale).to_string(),
            "generic/Hips/Tail.scale"
        );
        assert_eq!(Channel::weight("Face", "Smile").to_string(), "deformer/Face.Smile");
    }

    #[test]
    fn root_value_kinds() {
        assert_eq!(Channel::root(RootPart::Position).value_kind(), ValueKind::Vec3);
        assert_eq!(Channel::root(RootPart::Rotation).value_kind(), ValueKind::Quat);
        assert!(Dof::TranslationY.is_translational());
        assert!(!Dof::RotationZ.is_translational());
    }
}
