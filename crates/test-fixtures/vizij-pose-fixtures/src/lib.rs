//! JSON rigs and reference poses shared by the pose crates' tests and benches.
//!
//! Files live under the workspace `fixtures/` directory and are looked up by name
//! through `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    rigs: HashMap<String, String>,
    poses: HashMap<String, PoseEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PoseEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        rig: Option<String>,
    },
}

impl PoseEntry {
    fn as_path(&self) -> &str {
        match self {
            PoseEntry::Path(path) => path,
            PoseEntry::Detailed { path, .. } => path,
        }
    }

    fn rig(&self) -> Option<&str> {
        match self {
            PoseEntry::Path(_) => None,
            PoseEntry::Detailed { rig, .. } => rig.as_deref(),
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod rigs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.rigs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.rigs, "rig", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.rigs, "rig", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.rigs, "rig", name)?;
        Ok(resolve_path(rel))
    }
}

pub mod poses {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.poses.keys().cloned().collect()
    }

    /// Name of the rig a pose was captured on, when the manifest records it.
    pub fn rig_of(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.poses, "pose", name)?;
        Ok(entry.rig().map(str::to_owned))
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.poses, "pose", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.poses, "pose", name)?;
        super::load_json(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.poses, "pose", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_exists() {
        for name in rigs::keys() {
            assert!(rigs::path(&name).unwrap().is_file(), "rig {name}");
        }
        for name in poses::keys() {
            assert!(poses::path(&name).unwrap().is_file(), "pose {name}");
            if let Some(rig) = poses::rig_of(&name).unwrap() {
                assert!(rigs::keys().contains(&rig), "pose {name} names rig {rig}");
            }
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        let err = rigs::json("nope").unwrap_err();
        assert!(err.to_string().contains("unknown rig fixture 'nope'"));
    }
}
