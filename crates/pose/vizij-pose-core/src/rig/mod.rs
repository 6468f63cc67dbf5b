//! Rig description supplied by the host.
//!
//! The host engine owns the real skeleton; this crate only needs its shape:
//! - the humanoid joint list with degrees of freedom and anatomical groups,
//! - the generic transform hierarchy,
//! - deformer meshes with their named weights and recorded baselines,
//! - bilateral mirror tables for joints, transforms and weight names.
//!
//! Everything is plain serde data so hosts can hand it over as JSON.

mod humanoid;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::channel::Dof;
use crate::error::RigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    pub name: String,
    #[serde(default)]
    pub humanoid: Option<HumanoidRig>,
    /// The rig's own root transform. Its children are walked for the generic family;
    /// the root itself carries no channels.
    #[serde(default)]
    pub transform_root: Option<TransformDef>,
    /// Bilateral pairs of transform paths (relative to `transform_root`).
    #[serde(default)]
    pub transform_mirrors: Vec<[String; 2]>,
    #[serde(default)]
    pub meshes: Vec<MeshDef>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanoidRig {
    /// Whether the rig exposes the root pseudo-channel (position + rotation).
    #[serde(default = "default_true")]
    pub has_root: bool,
    pub joints: Vec<JointDef>,
    /// Anatomical groups in display order.
    pub groups: Vec<JointGroupDef>,
    /// Bilateral joint pairs, e.g. `["LeftHand", "RightHand"]`.
    #[serde(default)]
    pub joint_mirrors: Vec<[String; 2]>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointBinding {
    /// Mapped to a live bone.
    #[default]
    Live,
    /// No bone, but accepted as a virtual stand-in.
    Virtual,
    /// Declared by the avatar definition but not mapped on this rig.
    Unmapped,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointDef {
    pub name: String,
    #[serde(default = "default_rotations")]
    pub dofs: Vec<Dof>,
    #[serde(default)]
    pub binding: JointBinding,
}

impl JointDef {
    pub fn new(name: impl Into<String>, dofs: &[Dof]) -> Self {
        Self {
            name: name.into(),
            dofs: dofs.to_vec(),
            binding: JointBinding::Live,
        }
    }

    pub fn with_binding(mut self, binding: JointBinding) -> Self {
        self.binding = binding;
        self
    }
}

/// An anatomical joint group.
///
/// A group lists either `joints` (a terminal group) or `children` (subgroups),
/// never both. `mirror` is a '/'-separated path of group names from the skeletal
/// family root, e.g. `"Right Hand/Right Thumb"`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointGroupDef {
    pub name: String,
    #[serde(default)]
    pub mirror: Option<String>,
    #[serde(default)]
    pub joints: Vec<String>,
    /// The root pseudo-channel is edited through this group.
    #[serde(default)]
    pub includes_root: bool,
    #[serde(default)]
    pub children: Vec<JointGroupDef>,
}

impl JointGroupDef {
    pub fn leaf(name: impl Into<String>, joints: &[&str]) -> Self {
        Self {
            name: name.into(),
            joints: joints.iter().map(|j| j.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<JointGroupDef>) -> Self {
        Self {
            name: name.into(),
            children,
            ..Default::default()
        }
    }

    pub fn mirrored(mut self, path: impl Into<String>) -> Self {
        self.mirror = Some(path.into());
        self
    }

    pub fn with_root(mut self) -> Self {
        self.includes_root = true;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformDef {
    pub name: String,
    #[serde(default)]
    pub children: Vec<TransformDef>,
}

impl TransformDef {
    pub fn new(name: impl Into<String>, children: Vec<TransformDef>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDef {
    pub name: String,
    pub weights: Vec<WeightDef>,
    /// Bilateral weight-name pairs within this mesh, e.g. `["BlinkL", "BlinkR"]`.
    #[serde(default)]
    pub mirrors: Vec<[String; 2]>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightDef {
    pub name: String,
    /// Rest value recorded by the rig. Weights without one are never blended.
    #[serde(default)]
    pub baseline: Option<f32>,
}

impl WeightDef {
    pub fn new(name: impl Into<String>, baseline: Option<f32>) -> Self {
        Self {
            name: name.into(),
            baseline,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_rotations() -> Vec<Dof> {
    Dof::ROTATIONS.to_vec()
}

impl Rig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_humanoid(mut self, humanoid: HumanoidRig) -> Self {
        self.humanoid = Some(humanoid);
        self
    }

    pub fn with_transforms(mut self, root: TransformDef, mirrors: Vec<[String; 2]>) -> Self {
        self.transform_root = Some(root);
        self.transform_mirrors = mirrors;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshDef) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn joint(&self, name: &str) -> Option<&JointDef> {
        self.humanoid
            .as_ref()
            .and_then(|h| h.joints.iter().find(|j| j.name == name))
    }

    pub fn mesh(&self, name: &str) -> Option<&MeshDef> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// Visit every transform below the rig root depth-first (children in declared
    /// order), yielding its path relative to the root and its depth (1 = root child).
    pub fn transform_paths(&self) -> Vec<(String, usize)> {
        fn walk(node: &TransformDef, prefix: &str, depth: usize, out: &mut Vec<(String, usize)>) {
            for child in &node.children {
                let path = if prefix.is_empty() {
                    child.name.clone()
                } else {
                    format!("{prefix}/{}", child.name)
                };
                out.push((path.clone(), depth));
                walk(child, &path, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        if let Some(root) = &self.transform_root {
            walk(root, "", 1, &mut out);
        }
        out
    }

    /// Check the structural rules every consumer of the rig relies on.
    pub fn validate(&self) -> Result<(), RigError> {
        if let Some(h) = &self.humanoid {
            h.validate()?;
        }

        let mut paths = HashSet::new();
        for (path, _) in self.transform_paths() {
            if !paths.insert(path.clone()) {
                return Err(RigError::DuplicateTransform(path));
            }
        }
        for pair in &self.transform_mirrors {
            for p in pair {
                if !paths.contains(p) {
                    return Err(RigError::UnknownMirrorTransform(p.clone()));
                }
            }
        }

        let mut meshes = HashSet::new();
        for mesh in &self.meshes {
            if !meshes.insert(mesh.name.as_str()) {
                return Err(RigError::DuplicateMesh(mesh.name.clone()));
            }
            for pair in &mesh.mirrors {
                for w in pair {
                    if !mesh.weights.iter().any(|d| &d.name == w) {
                        return Err(RigError::UnknownMirrorWeight {
                            mesh: mesh.name.clone(),
                            weight: w.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl HumanoidRig {
    fn validate(&self) -> Result<(), RigError> {
        let mut names = HashSet::new();
        for j in &self.joints {
            if !names.insert(j.name.as_str()) {
                return Err(RigError::DuplicateJoint(j.name.clone()));
            }
        }

        fn check_groups(
            groups: &[JointGroupDef],
            names: &HashSet<&str>,
        ) -> Result<(), RigError> {
            let mut siblings = HashSet::new();
            for g in groups {
                if !siblings.insert(g.name.as_str()) {
                    return Err(RigError::DuplicateGroup(g.name.clone()));
                }
                if !g.children.is_empty() && (!g.joints.is_empty() || g.includes_root) {
                    return Err(RigError::MixedGroup(g.name.clone()));
                }
                for j in &g.joints {
                    if !names.contains(j.as_str()) {
                        return Err(RigError::UnknownGroupJoint {
                            group: g.name.clone(),
                            joint: j.clone(),
                        });
                    }
                }
                check_groups(&g.children, names)?;
            }
            Ok(())
        }
        check_groups(&self.groups, &names)?;

        for pair in &self.joint_mirrors {
            for j in pair {
                if !names.contains(j.as_str()) {
                    return Err(RigError::UnknownMirrorJoint(j.clone()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_rig() -> Rig {
        Rig::new("small")
            .with_humanoid(HumanoidRig {
                has_root: true,
                joints: vec![
                    JointDef::new("LeftHand", &Dof::ROTATIONS),
                    JointDef::new("RightHand", &Dof::ROTATIONS),
                ],
                groups: vec![
                    JointGroupDef::leaf("Left Arm", &["LeftHand"]).mirrored("Right Arm"),
                    JointGroupDef::leaf("Right Arm", &["RightHand"]).mirrored("Left Arm"),
                ],
                joint_mirrors: vec![["LeftHand".into(), "RightHand".into()]],
            })
            .with_transforms(
                TransformDef::new(
                    "Armature",
                    vec![TransformDef::new(
                        "Hips",
                        vec![TransformDef::new("Tail", vec![])],
                    )],
                ),
                vec![],
            )
    }

    #[test]
    fn transform_paths_skip_root() {
        let rig = small_rig();
        assert_eq!(
            rig.transform_paths(),
            vec![("Hips".to_string(), 1), ("Hips/Tail".to_string(), 2)]
        );
    }

    #[test]
    fn validate_accepts_well_formed_rig() {
        assert_eq!(small_rig().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_unknown_group_joint() {
        let mut rig = small_rig();
        rig.humanoid.as_mut().unwrap().groups[0]
            .joints
            .push("LeftFoot".into());
        assert_eq!(
            rig.validate(),
            Err(RigError::UnknownGroupJoint {
                group: "Left Arm".into(),
                joint: "LeftFoot".into()
            })
        );
    }

    #[test]
    fn validate_rejects_mixed_group() {
        let mut rig = small_rig();
        let h = rig.humanoid.as_mut().unwrap();
        h.groups[0].children.push(JointGroupDef::leaf("Inner", &[]));
        assert_eq!(rig.validate(), Err(RigError::MixedGroup("Left Arm".into())));
    }

    #[test]
    fn validate_rejects_unknown_mirror_weight() {
        let rig = small_rig().with_mesh(MeshDef {
            name: "Face".into(),
            weights: vec![WeightDef::new("BlinkL", Some(0.0))],
            mirrors: vec![["BlinkL".into(), "BlinkR".into()]],
        });
        assert_eq!(
            rig.validate(),
            Err(RigError::UnknownMirrorWeight {
                mesh: "Face".into(),
                weight: "BlinkR".into()
            })
        );
    }

    #[test]
    fn joint_defaults_from_json() {
        let j: JointDef = serde_json::from_str(r#"{ "name": "Neck" }"#).unwrap();
        assert_eq!(j.dofs, Dof::ROTATIONS.to_vec());
        assert_eq!(j.binding, JointBinding::Live);
    }
}
