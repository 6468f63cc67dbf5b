//! Canonical humanoid layout: joint set, anatomical groups and bilateral tables.

use super::{HumanoidRig, JointDef, JointGroupDef};
use crate::channel::Dof;

use Dof::{RotationX as RX, RotationY as RY, RotationZ as RZ};

const SIDES: [&str; 2] = ["Left", "Right"];
const DIGITS: [&str; 5] = ["Thumb", "Index", "Middle", "Ring", "Little"];
const PHALANGES: [&str; 3] = ["Proximal", "Intermediate", "Distal"];

fn sided(side: &str, joints: &[(&str, &[Dof])]) -> Vec<JointDef> {
    joints
        .iter()
        .map(|(name, dofs)| JointDef::new(format!("{side}{name}"), dofs))
        .collect()
}

fn other(side: &str) -> &'static str {
    if side == "Left" {
        "Right"
    } else {
        "Left"
    }
}

const ARM: [(&str, &[Dof]); 4] = [
    ("Shoulder", &[RY, RZ]),
    ("UpperArm", &[RX, RY, RZ]),
    ("LowerArm", &[RX, RZ]),
    ("Hand", &[RY, RZ]),
];

const LEG: [(&str, &[Dof]); 4] = [
    ("UpperLeg", &[RX, RY, RZ]),
    ("LowerLeg", &[RX, RZ]),
    ("Foot", &[RY, RZ]),
    ("Toes", &[RZ]),
];

impl HumanoidRig {
    /// Standard humanoid: body, head, arms, legs and per-digit finger groups,
    /// every bilateral group carrying the path of its counterpart.
    pub fn standard() -> Self {
        let mut joints = vec![
            JointDef::new("Hips", &[]),
            JointDef::new("Spine", &[RX, RY, RZ]),
            JointDef::new("Chest", &[RX, RY, RZ]),
            JointDef::new("UpperChest", &[RX, RY, RZ]),
            JointDef::new("Neck", &[RX, RY, RZ]),
            JointDef::new("Head", &[RX, RY, RZ]),
            JointDef::new("LeftEye", &[RY, RZ]),
            JointDef::new("RightEye", &[RY, RZ]),
            JointDef::new("Jaw", &[RY, RZ]),
        ];
        for side in SIDES {
            joints.extend(sided(side, &ARM));
            joints.extend(sided(side, &LEG));
            for digit in DIGITS {
                for (i, phalanx) in PHALANGES.iter().enumerate() {
                    let dofs: &[Dof] = if i == 0 { &[RY, RZ] } else { &[RZ] };
                    joints.push(JointDef::new(format!("{side}{digit}{phalanx}"), dofs));
                }
            }
        }

        let mut groups = vec![
            JointGroupDef::leaf("Body", &["Hips", "Spine", "Chest", "UpperChest"]).with_root(),
            JointGroupDef::leaf("Head", &["Neck", "Head", "LeftEye", "RightEye", "Jaw"]),
        ];
        for side in SIDES {
            let names: Vec<String> = ARM.iter().map(|(n, _)| format!("{side}{n}")).collect();
            groups.push(JointGroupDef {
                name: format!("{side} Arm"),
                mirror: Some(format!("{} Arm", other(side))),
                joints: names,
                ..Default::default()
            });
        }
        for side in SIDES {
            let names: Vec<String> = LEG.iter().map(|(n, _)| format!("{side}{n}")).collect();
            groups.push(JointGroupDef {
                name: format!("{side} Leg"),
                mirror: Some(format!("{} Leg", other(side))),
                joints: names,
                ..Default::default()
            });
        }
        for side in SIDES {
            let digits = DIGITS
                .iter()
                .map(|digit| JointGroupDef {
                    name: format!("{side} {digit}"),
                    mirror: Some(format!("{o} Hand/{o} {digit}", o = other(side))),
                    joints: PHALANGES
                        .iter()
                        .map(|p| format!("{side}{digit}{p}"))
                        .collect(),
                    ..Default::default()
                })
                .collect();
            groups.push(
                JointGroupDef::branch(format!("{side} Hand"), digits)
                    .mirrored(format!("{} Hand", other(side))),
            );
        }

        let joint_mirrors = joints
            .iter()
            .filter_map(|j| j.name.strip_prefix("Left"))
            .map(|rest| [format!("Left{rest}"), format!("Right{rest}")])
            .collect();

        Self {
            has_root: true,
            joints,
            groups,
            joint_mirrors,
        }
    }
}
