//! Infrastructure implementation of the `ProjectInspector` port.
//!
//! Reads a project directory once into a [`ProjectSnapshot`]; the
//! classification rules never touch the filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::application::ports::ProjectInspector;
use crate::domain::ProjectSnapshot;
use crate::domain::classify::{CONTENT_FILES, NOISE_DIRS, PROBED_PATHS};

/// Production filesystem implementation of `ProjectInspector`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalProjectInspector;

/// File count and total size in bytes, skipping [`NOISE_DIRS`] entries at any depth.
/// Unreadable entries are ignored.
fn walk(dir: &Path) -> (u64, u64) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return (0, 0);
    };
    let mut files = 0;
    let mut bytes = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if NOISE_DIRS.iter().any(|n| name == **n) {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            let (f, b) = walk(&entry.path());
            files += f;
            bytes += b;
        } else if file_type.is_file() {
            files += 1;
            bytes += entry.metadata().map_or(0, |m| m.len());
        }
    }
    (files, bytes)
}

impl ProjectInspector for LocalProjectInspector {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn snapshot(&self, path: &Path) -> ProjectSnapshot {
        let path_display = path.display().to_string();
        let Ok(entries) = std::fs::read_dir(path) else {
            tracing::debug!(path = %path_display, "project path unreadable");
            return ProjectSnapshot::unreadable(path_display);
        };

        let top_level: BTreeSet<String> = entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();

        let contents: BTreeMap<String, String> = CONTENT_FILES
            .iter()
            .filter(|name| top_level.contains(**name))
            .filter_map(|name| {
                std::fs::read_to_string(path.join(name))
                    .ok()
                    .map(|body| ((*name).to_string(), body))
            })
            .collect();

        let nested: BTreeSet<String> = PROBED_PATHS
            .iter()
            .filter(|p| path.join(p).exists())
            .map(|p| (*p).to_string())
            .collect();

        let (total_files, bytes) = walk(path);
        ProjectSnapshot {
            readable: true,
            path_display,
            top_level,
            contents,
            nested,
            total_files,
            total_size_kb: (bytes + 512) / 1024,
        }
    }
}
