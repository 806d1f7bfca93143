//! Manifest discovery under a scan root

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Find manifest files below `root`, in discovery order
///
/// Flat mode only looks one level down (`<root>/*/<manifest>`). Recursive
/// mode walks the whole tree, so a module nested inside another module's
/// directory is found as well. A manifest sitting directly in `root` is never
/// reported: the root is a container of modules, not a module itself.
///
/// Entries are visited in lexicographic path order. A missing root yields
/// nothing.
pub fn discover(root: &Path, manifest_name: &str, recursive: bool) -> Vec<PathBuf> {
    if !root.is_dir() {
        debug!("Scan location {:?} does not exist, skipping", root);
        return Vec::new();
    }

    let max_depth = if recursive { usize::MAX } else { 2 };

    let mut found = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(2)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {:?}: {}", root, e);
                continue;
            }
        };

        if entry.file_type().is_file() && entry.file_name() == manifest_name {
            found.push(entry.into_path());
        }
    }

    debug!("Found {} manifests under {:?}", found.len(), root);
    found
}
