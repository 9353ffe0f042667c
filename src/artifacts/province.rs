//! Province id table plus the ordered alias → province reverse index.
//!
//! File shape:
//!
//! ```json
//! {
//!   "UNKNOWN": 0,
//!   "Lusaka": 1,
//!   "Copperbelt": 2,
//!   "__reverse__": { "lusaka": "Lusaka", "kitwe": "Copperbelt", "ndola": "Copperbelt" }
//! }
//! ```
//!
//! The order of `__reverse__` entries is significant: resolution is
//! first-match-wins in file order, so the index is kept as a `Vec`.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};

use super::{read_json, ArtifactError};

/// Reserved key holding the alias index.
pub const REVERSE_KEY: &str = "__reverse__";
/// Sentinel province used when no alias matches.
pub const UNKNOWN_PROVINCE: &str = "UNKNOWN";

/// Integer region id fed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProvinceId(pub u32);

impl fmt::Display for ProvinceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ProvinceMap {
    ids: HashMap<String, ProvinceId>,
    /// `(alias, province name)` in file order.
    aliases: Vec<(String, String)>,
    unknown: ProvinceId,
}

impl ProvinceMap {
    /// Load and validate the province map at `path`.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let raw: Map<String, Value> = read_json(path)?;
        Self::from_json(raw).map_err(|reason| ArtifactError::invalid(path, reason))
    }

    /// Build from an already-parsed JSON object.
    pub fn from_json(raw: Map<String, Value>) -> Result<Self, String> {
        let mut ids = HashMap::new();
        let mut aliases = Vec::new();

        for (key, value) in raw {
            if key == REVERSE_KEY {
                let index = value
                    .as_object()
                    .ok_or_else(|| format!("`{REVERSE_KEY}` must be an object"))?;
                for (alias, province) in index {
                    let province = province
                        .as_str()
                        .ok_or_else(|| format!("alias `{alias}` must map to a province name"))?;
                    aliases.push((alias.clone(), province.to_string()));
                }
                continue;
            }

            let id = value
                .as_u64()
                .and_then(|id| u32::try_from(id).ok())
                .ok_or_else(|| format!("province `{key}` must map to a non-negative integer id"))?;
            ids.insert(key, ProvinceId(id));
        }

        let unknown = *ids
            .get(UNKNOWN_PROVINCE)
            .ok_or_else(|| format!("missing required `{UNKNOWN_PROVINCE}` province"))?;

        for (alias, province) in &aliases {
            if !ids.contains_key(province) {
                log::warn!("alias `{alias}` points at unmapped province `{province}`");
            }
        }

        Ok(Self {
            ids,
            aliases,
            unknown,
        })
    }

    /// Id of `province`, if the map has one.
    pub fn id_of(&self, province: &str) -> Option<ProvinceId> {
        self.ids.get(province).copied()
    }

    /// Id of the `UNKNOWN` sentinel.
    pub fn unknown_id(&self) -> ProvinceId {
        self.unknown
    }

    /// Alias entries in file order.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, p)| (a.as_str(), p.as_str()))
    }

    /// Number of provinces, `UNKNOWN` included.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}
