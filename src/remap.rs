//! Deprecated station id remapping.
//!
//! A [`RemapTable`] maps retired station ids onto the ids that replaced them.
//! It can be loaded from a plain JSON object on disk:
//! ```json
//! {
//!   "85": 23,
//!   "86": 25
//! }
//! ```
//! Tables are validated on construction so that applying one is idempotent:
//! no target id may itself be rewritten to a different id.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::types::StationId;

/// Ids retired when stations were relocated, and the stations that absorbed them.
static DEFAULT_REMAP: &[(StationId, StationId)] = &[
    (85, 23),
    (86, 25),
    (87, 49),
    (88, 69),
    (89, 72),
    (90, 72),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapTable {
    entries: BTreeMap<StationId, StationId>,
}

impl Default for RemapTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_REMAP.iter().copied().collect(),
        }
    }
}

impl RemapTable {
    /// Builds a table, rejecting any `old -> new` where `new` is itself
    /// rewritten to a different id.
    ///
    /// Self-mappings (`id -> id`) are accepted, and other ids may map onto
    /// them; they never change a record.
    pub fn new(entries: BTreeMap<StationId, StationId>) -> Result<Self> {
        for (&from, &to) in &entries {
            if from != to && entries.get(&to).is_some_and(|&next| next != to) {
                return Err(PipelineError::ChainedRemap { from, to });
            }
        }
        Ok(Self { entries })
    }

    /// A table that leaves every id untouched.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Loads and validates a table from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::RemapConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let entries: BTreeMap<StationId, StationId> =
            serde_json::from_str(&content).map_err(|e| PipelineError::RemapConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        debug!(path = %path.display(), entries = entries.len(), "Loaded remap config");
        Self::new(entries)
    }

    /// Returns the replacement for `id`, or `id` itself when it is not remapped.
    pub fn resolve(&self, id: StationId) -> StationId {
        self.entries.get(&id).copied().unwrap_or(id)
    }

    /// Iterates over all `(old, new)` pairs in ascending old-id order.
    pub fn iter(&self) -> impl Iterator<Item = (StationId, StationId)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_default_table_is_valid() {
        let table = RemapTable::default();
        let rebuilt = RemapTable::new(table.iter().collect()).unwrap();
        assert_eq!(rebuilt, table);
        assert_eq!(table.len(), 6);
        assert_eq!(table.resolve(85), 23);
        assert_eq!(table.resolve(90), 72);
    }

    #[test]
    fn test_resolve_passes_through_unknown_ids() {
        let table = RemapTable::default();
        assert_eq!(table.resolve(23), 23);
        assert_eq!(table.resolve(1), 1);
    }

    #[test]
    fn test_chained_table_is_rejected() {
        let entries = BTreeMap::from([(85, 86), (86, 25)]);
        let err = RemapTable::new(entries).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ChainedRemap { from: 85, to: 86 }
        ));
    }

    #[test]
    fn test_self_mapping_is_accepted() {
        let table = RemapTable::new(BTreeMap::from([(7, 7), (8, 7)])).unwrap();
        assert_eq!(table.resolve(8), 7);
        assert_eq!(table.resolve(7), 7);
        assert_eq!(table.resolve(table.resolve(8)), table.resolve(8));
    }

    #[test]
    fn test_mapping_onto_rewritten_id_is_rejected() {
        let err = RemapTable::new(BTreeMap::from([(1, 2), (2, 3), (3, 3)])).unwrap_err();
        assert!(matches!(err, PipelineError::ChainedRemap { from: 1, to: 2 }));
    }

    #[test]
    fn test_load_from_json() {
        let path = temp_path("bike_trips_test_remap.json");
        fs::write(&path, r#"{"85": 23, "86": 25}"#).unwrap();

        let table = RemapTable::load(&path).unwrap();
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![(85, 23), (86, 25)]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_chain() {
        let path = temp_path("bike_trips_test_remap_chain.json");
        fs::write(&path, r#"{"1": 2, "2": 3}"#).unwrap();

        let err = RemapTable::load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::ChainedRemap { .. }));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_non_numeric_ids() {
        let path = temp_path("bike_trips_test_remap_bad.json");
        fs::write(&path, r#"{"north": 2}"#).unwrap();

        let err = RemapTable::load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::RemapConfig { .. }));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = RemapTable::load(temp_path("bike_trips_no_such_remap.json")).unwrap_err();
        assert!(matches!(err, PipelineError::RemapConfig { .. }));
    }
}
