use thiserror::Error;

/// Produced when no editable tree exists for the current dataset pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoseTreeError {
    /// One or both reference poses are missing, or they share no channel
    /// that the rig can address.
    #[error("no pose data: both reference poses must be loaded and share at least one channel")]
    NoPoseData,
}

/// Structural problems in a rig description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RigError {
    #[error("duplicate joint '{0}'")]
    DuplicateJoint(String),
    #[error("group '{group}' references unknown joint '{joint}'")]
    UnknownGroupJoint { group: String, joint: String },
    #[error("group '{0}' has both joints and subgroups")]
    MixedGroup(String),
    #[error("group '{0}' is declared more than once under the same parent")]
    DuplicateGroup(String),
    #[error("mirror table references unknown joint '{0}'")]
    UnknownMirrorJoint(String),
    #[error("duplicate transform path '{0}'")]
    DuplicateTransform(String),
    #[error("transform mirror table references unknown path '{0}'")]
    UnknownMirrorTransform(String),
    #[error("duplicate mesh '{0}'")]
    DuplicateMesh(String),
    #[error("mesh '{mesh}' mirror table references unknown weight '{weight}'")]
    UnknownMirrorWeight { mesh: String, weight: String },
}
