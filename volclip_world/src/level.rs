use serde::{Deserialize, Serialize};

use volclip_ids::{ActorID, LevelID};

/// Final path segment with any `.Object` suffix removed:
/// `/Game/Maps/Sub_A.Sub_A` -> `Sub_A`.
pub fn short_name(package: &str) -> &str {
    let last = package.rsplit('/').next().unwrap_or(package);
    last.split('.').next().unwrap_or(last)
}

/// True if `name` refers to `package` by full path or by short name. A
/// full path under another directory still matches on its short name.
pub fn names_package(name: &str, package: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && (name == package || short_name(name) == short_name(package))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelID,
    /// Full package path, e.g. `/Game/Maps/Sub_A`.
    pub package: String,
}

impl Level {
    pub fn short_name(&self) -> &str {
        short_name(&self.package)
    }
}

/// A sub-level registered with the persistent level, loaded or not, and the
/// gate volumes that stream it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamingLevel {
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded: Option<LevelID>,
    #[serde(default)]
    pub gates: Vec<ActorID>,
}

impl StreamingLevel {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            loaded: None,
            gates: Vec::new(),
        }
    }

    pub fn short_name(&self) -> &str {
        short_name(&self.package)
    }

    pub fn matches(&self, name: &str) -> bool {
        names_package(name, &self.package)
    }
}
