use std::path::{Path, PathBuf};

/// Resolve the roster project root.
///
/// `--root` / `ROSTER_ROOT` wins; otherwise walk upward from the current
/// directory looking for `.roster/`, falling back to the current directory.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_marker(&cwd).unwrap_or(cwd)
}

fn find_marker(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(roster_core::paths::ROSTER_DIR).is_dir())
        .map(Path::to_path_buf)
}
