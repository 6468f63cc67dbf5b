//! Channel interpolation between two reference poses.
//!
//! Scalars and vectors blend linearly, rotations spherically along the shortest
//! arc. The blend factor is never clamped: numeric entry may push it outside
//! [0,1] and the result is the matching extrapolation.

pub mod functions;

use crate::channel::Channel;
use crate::config::Config;
use crate::value::Value;

use functions::{lerp_f32, lerp_vec3, slerp_quat};

/// Default |dot| above which rotations fall back to normalized lerp.
pub const DEFAULT_QUAT_LERP_THRESHOLD: f32 = 0.9995;

#[derive(Copy, Clone, Debug)]
pub struct Interpolator {
    quat_lerp_threshold: f32,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self {
            quat_lerp_threshold: DEFAULT_QUAT_LERP_THRESHOLD,
        }
    }
}

impl Interpolator {
    pub fn new(cfg: &Config) -> Self {
        Self {
            quat_lerp_threshold: cfg.quat_lerp_threshold,
        }
    }

    /// Blend `a` toward `b` at `t` for `channel`.
    ///
    /// Callers guarantee both values were found for the channel. Values whose kind
    /// does not match the channel keep `a` (fail-soft).
    pub fn blend(&self, channel: &Channel, a: &Value, b: &Value, t: f32) -> Value {
        let kind = channel.value_kind();
        if a.kind() != kind || b.kind() != kind {
            return *a;
        }
        match (a, b) {
            (Value::Float(va), Value::Float(vb)) => Value::Float(lerp_f32(*va, *vb, t)),
            (Value::Vec3(va), Value::Vec3(vb)) => Value::Vec3(lerp_vec3(*va, *vb, t)),
            (Value::Quat(qa), Value::Quat(qb)) => {
                Value::Quat(slerp_quat(*qa, *qb, t, self.quat_lerp_threshold))
            }
            _ => *a,
        }
    }
}

/// [`Interpolator::blend`] with default settings.
pub fn blend(channel: &Channel, a: &Value, b: &Value, t: f32) -> Value {
    Interpolator::default().blend(channel, a, b, t)
}
