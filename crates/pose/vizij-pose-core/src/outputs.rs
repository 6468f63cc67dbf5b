//! Channel writes produced by edits.
//!
//! A [`ChannelSink`] receives one `(channel, value)` per blended channel, in the
//! order the edit visits them. Sinks that apply "last write wins" per channel can
//! rely on that order. [`WriteBatch`] records writes for hosts that commit later.
//!
//! ChannelWrite serializes to JSON as:
//!   { "path": "skeletal/LeftHand.rotation_x", "channel": {..}, "value": { "type": "float", "data": 0.5 } }

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::value::Value;

pub trait ChannelSink {
    fn write(&mut self, channel: &Channel, value: Value);
}

impl<F> ChannelSink for F
where
    F: FnMut(&Channel, Value),
{
    fn write(&mut self, channel: &Channel, value: Value) {
        self(channel, value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelWrite {
    /// Display form of `channel`, for logs and JSON consumers.
    #[serde(default)]
    pub path: String,
    pub channel: Channel,
    pub value: Value,
}

impl ChannelWrite {
    pub fn new(channel: Channel, value: Value) -> Self {
        Self {
            path: channel.to_string(),
            channel,
            value,
        }
    }
}

impl fmt::Display for ChannelWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Float(v) => write!(f, "{} = {v}", self.channel),
            Value::Vec3(v) => write!(f, "{} = {v:?}", self.channel),
            Value::Quat(q) => write!(f, "{} = {q:?}", self.channel),
        }
    }
}

/// Ordered record of writes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WriteBatch(Vec<ChannelWrite>);

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    pub fn push(&mut self, write: ChannelWrite) {
        self.0.push(write);
    }

    pub fn append(&mut self, other: &mut WriteBatch) {
        self.0.append(&mut other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelWrite> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ChannelWrite> {
        self.0
    }

    /// Final value a last-write-wins sink would hold for `channel`.
    pub fn last_for(&self, channel: &Channel) -> Option<&Value> {
        self.0
            .iter()
            .rev()
            .find(|w| &w.channel == channel)
            .map(|w| &w.value)
    }

    /// Position of the first write to `channel`.
    pub fn position(&self, channel: &Channel) -> Option<usize> {
        self.0.iter().position(|w| &w.channel == channel)
    }
}

impl ChannelSink for WriteBatch {
    fn write(&mut self, channel: &Channel, value: Value) {
        self.0.push(ChannelWrite::new(channel.clone(), value));
    }
}

impl IntoIterator for WriteBatch {
    type Item = ChannelWrite;
    type IntoIter = std::vec::IntoIter<ChannelWrite>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a WriteBatch {
    type Item = &'a ChannelWrite;
    type IntoIter = std::slice::Iter<'a, ChannelWrite>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Dof;

    #[test]
    fn last_write_wins() {
        let ch = Channel::joint("Neck", Dof::RotationY);
        let mut batch = WriteBatch::new();
        batch.write(&ch, Value::Float(0.1));
        batch.write(&Channel::weight("Face", "Smile"), Value::Float(1.0));
        batch.write(&ch, Value::Float(0.7));
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.position(&ch), Some(0));
        assert_eq!(batch.last_for(&ch), Some(&Value::Float(0.7)));
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        let mut sink = |c: &Channel, v: Value| seen.push((c.to_string(), v));
        sink.write(&Channel::weight("Face", "Smile"), Value::Float(0.5));
        assert_eq!(seen, vec![("deformer/Face.Smile".to_string(), Value::Float(0.5))]);
    }

    #[test]
    fn json_carries_path() {
        let w = ChannelWrite::new(Channel::weight("Face", "Smile"), Value::Float(0.5));
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["path"], "deformer/Face.Smile");
        assert_eq!(json["value"]["type"], "float");
    }
}
