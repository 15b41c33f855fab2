//! Plain-text export of the activity log.
//!
//! The artifact is named `seo-tools-logs-<YYYY-MM-DD>.txt` and holds one
//! `[HH:MM:SS] TYPE: message` line per entry, newest first.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use super::LogStore;

/// File name for an export created on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("seo-tools-logs-{}.txt", date.format("%Y-%m-%d"))
}

/// Write the export artifact into `dir` and return its path.
///
/// Fails with [`DashError::EmptyLog`](crate::error::DashError::EmptyLog)
/// (wrapped in `anyhow`) before touching the filesystem when the log is empty.
pub fn write_export(store: &LogStore, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    let text = store.export_text()?;

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(date));
    fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::LogKind;
    use crate::error::DashError;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("seodash-export-{}-{}", name, std::process::id()))
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "seo-tools-logs-2024-03-09.txt");
    }

    #[test]
    fn empty_store_writes_nothing() {
        let dir = scratch_dir("empty");
        let store = LogStore::default();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let err = write_export(&store, &dir, date).unwrap_err();
        assert_eq!(err.downcast_ref::<DashError>(), Some(&DashError::EmptyLog));
        assert!(!dir.join(export_file_name(date)).exists());
    }

    #[test]
    fn writes_lines_to_disk() {
        let dir = scratch_dir("lines");
        let mut store = LogStore::default();
        store.append(LogKind::Info, "hello");
        store.append(LogKind::Error, "boom");
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let path = write_export(&store, &dir, date).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        assert_eq!(body.lines().count(), 2);
        assert!(body.lines().next().unwrap().ends_with("ERROR: boom"));

        let _ = fs::remove_dir_all(&dir);
    }
}
