//! JSON-file backed seen registry.
//!
//! The id list is rewritten after every [`mark_seen`] by writing a temporary
//! file next to the target and renaming it into place, so the file on disk
//! is always either the previous list or the new one.  Write failures are
//! logged and the in-memory set stays authoritative for the rest of the run.
//!
//! A missing file starts an empty registry.  A file that exists but cannot be
//! read or parsed is a startup error: starting empty would overwrite the
//! history on the next write and re-open every item already handled.
//!
//! [`mark_seen`]: SeenRegistry::mark_seen

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use super::SeenRegistry;

/// Failure loading an existing seen-id file.
#[derive(Debug, Error)]
pub enum SeenFileError {
    #[error("cannot read seen registry {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seen registry {} is not a JSON id list: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct FileSeenRegistry {
    ids: HashSet<String>,
    /// Insertion order, which is also the on-disk order.
    order: Vec<String>,
    path: PathBuf,
}

impl FileSeenRegistry {
    /// Load ids from `path`, or start empty when the file does not exist.
    pub fn load_from(path: PathBuf) -> Result<Self, SeenFileError> {
        let mut order = Self::load_ids(&path)?;
        let mut ids = HashSet::new();
        order.retain(|id| ids.insert(id.clone()));
        log::info!("seen registry: {} ids loaded from {}", order.len(), path.display());
        Ok(Self { ids, order, path })
    }

    fn load_ids(path: &Path) -> Result<Vec<String>, SeenFileError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(path).map_err(|source| SeenFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| SeenFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn save(&self) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &self.order)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}

impl SeenRegistry for FileSeenRegistry {
    fn has_seen(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn mark_seen(&mut self, id: &str) {
        if self.ids.insert(id.to_string()) {
            self.order.push(id.to_string());
            if let Err(e) = self.save() {
                log::warn!("seen registry: failed to write {}: {e}", self.path.display());
            }
        }
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempdir().expect("temp dir");
        let reg = FileSeenRegistry::load_from(dir.path().join("seen.json")).unwrap();
        assert!(reg.is_empty());
    }

    #[test]
    fn persists_and_reloads() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("seen.json");

        {
            let mut reg = FileSeenRegistry::load_from(path.clone()).unwrap();
            reg.mark_seen("post_1");
            reg.mark_seen("comment_2");
            reg.mark_seen("post_1");
        }

        let reloaded = FileSeenRegistry::load_from(path.clone()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.has_seen("post_1"));
        assert!(reloaded.has_seen("comment_2"));

        let on_disk: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, vec!["post_1", "comment_2"]);
    }

    #[test]
    fn truncated_file_is_an_error_and_left_untouched() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("seen.json");

        {
            let mut reg = FileSeenRegistry::load_from(path.clone()).unwrap();
            for i in 0..100 {
                reg.mark_seen(&format!("comment_{i}"));
            }
        }
        let full = std::fs::read_to_string(&path).unwrap();
        let cut = &full[..full.len() / 2];
        std::fs::write(&path, cut).unwrap();

        let err = FileSeenRegistry::load_from(path.clone()).err().expect("load must fail");
        assert!(matches!(err, SeenFileError::Parse { .. }));
        assert!(err.to_string().contains("seen.json"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), cut);
    }

    #[test]
    fn non_list_json_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("seen.json");
        std::fs::write(&path, r#"{"ids": ["a"]}"#).unwrap();

        assert!(FileSeenRegistry::load_from(path).is_err());
    }

    #[test]
    fn writes_leave_no_temp_files_behind() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("seen.json");

        let mut reg = FileSeenRegistry::load_from(path.clone()).unwrap();
        reg.mark_seen("a");
        reg.mark_seen("b");

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("seen.json")]);
    }

    #[test]
    fn duplicate_ids_on_disk_collapse() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("seen.json");
        std::fs::write(&path, r#"["a", "b", "a"]"#).unwrap();

        let reg = FileSeenRegistry::load_from(path).unwrap();
        assert_eq!(reg.len(), 2);
    }
}
