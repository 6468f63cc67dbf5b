//! Core configuration for vizij-pose-core.

use serde::{Deserialize, Serialize};

use crate::channel::Family;
use crate::interp::DEFAULT_QUAT_LERP_THRESHOLD;

/// Configuration for tree construction and blending.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which channel families the builder attempts.
    pub families: FamilyToggles,

    /// Admit joints the rig marks as virtual (no live bone).
    pub include_virtual_joints: bool,

    /// Above this |dot| rotation blending falls back to normalized lerp.
    pub quat_lerp_threshold: f32,

    /// When mirroring a selection, skip mirrored elements that are already selected.
    pub mirror_selection_dedup: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyToggles {
    pub skeletal: bool,
    pub generic: bool,
    pub deformer: bool,
}

impl FamilyToggles {
    #[inline]
    pub fn enabled(&self, family: Family) -> bool {
        match family {
            Family::Skeletal => self.skeletal,
            Family::Generic => self.generic,
            Family::Deformer => self.deformer,
        }
    }
}

impl Default for FamilyToggles {
    fn default() -> Self {
        Self {
            skeletal: true,
            generic: true,
            deformer: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            families: FamilyToggles::default(),
            include_virtual_joints: true,
            quat_lerp_threshold: DEFAULT_QUAT_LERP_THRESHOLD,
            mirror_selection_dedup: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{ "families": { "generic": false } }"#).unwrap();
        assert!(cfg.families.skeletal);
        assert!(!cfg.families.generic);
        assert!(cfg.include_virtual_joints);
        assert_eq!(cfg.quat_lerp_threshold, DEFAULT_QUAT_LERP_THRESHOLD);
    }
}
