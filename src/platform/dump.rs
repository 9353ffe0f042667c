//! Writes fetched items to one or more JSON files (`[{id, message}, …]`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use super::FetchedItem;

#[derive(Serialize)]
struct DumpedItem<'a> {
    id: &'a str,
    message: &'a str,
}

/// Write `items` as pretty JSON to every path, creating parent directories.
pub fn dump_items(items: &[FetchedItem], paths: &[PathBuf]) -> Result<()> {
    let dumped: Vec<DumpedItem<'_>> = items
        .iter()
        .map(|item| DumpedItem {
            id: &item.id,
            message: &item.message,
        })
        .collect();
    let content = serde_json::to_string_pretty(&dumped)?;

    for path in paths {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(path, &content).with_context(|| format!("writing {}", path.display()))?;
        log::info!("dumped {} items to {}", items.len(), path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_same_content_to_every_path() {
        let dir = tempdir().expect("temp dir");
        let root = dir.path().join("scraped_posts.json");
        let docs = dir.path().join("docs").join("scraped_posts.json");
        let items = vec![
            FetchedItem::post("1", "Bedspace in Lusaka ✅"),
            FetchedItem::post("2", ""),
        ];

        dump_items(&items, &[root.clone(), docs.clone()]).unwrap();

        let a = std::fs::read_to_string(&root).unwrap();
        let b = std::fs::read_to_string(&docs).unwrap();
        assert_eq!(a, b);

        let parsed: serde_json::Value = serde_json::from_str(&a).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([
                {"id": "1", "message": "Bedspace in Lusaka ✅"},
                {"id": "2", "message": ""}
            ])
        );
    }

    #[test]
    fn empty_batch_writes_empty_array() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.json");

        dump_items(&[], &[path.clone()]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
