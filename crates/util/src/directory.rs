//! Directory listings for the resume picker.

use std::cmp::Ordering;
use std::io;
use std::path::Path;

use coverletter_types::DirectoryEntry;

/// Lists `dir` for display in the file picker.
///
/// When `dir` has a parent, that parent is returned first so the picker can
/// render it as `/..`. The remaining entries are directories first, then
/// files, each group sorted case-insensitively. Hidden entries (dot files)
/// are skipped.
pub fn list_directory(dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let is_directory = path.is_dir();
        entries.push(DirectoryEntry { path, is_directory });
    }

    entries.sort_by(|left, right| match (left.is_directory, right.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => sort_key(&left.path).cmp(&sort_key(&right.path)),
    });

    if let Some(parent) = dir.parent() {
        entries.insert(
            0,
            DirectoryEntry {
                path: parent.to_path_buf(),
                is_directory: true,
            },
        );
    }
    Ok(entries)
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
