use std::path::{Path, PathBuf};

/// Locate the directory holding the viewer's own static payload
/// (`index.html`, `css/`, `js/`).
///
/// Discovery strategy:
/// 1. Walk up from the executable's directory looking for an `assets/`
///    directory containing `index.html`.
/// 2. Walk up from the current working directory.
/// 3. Fall back to a bare relative `assets` (requests then get a clear
///    not-found instead of a startup crash).
pub fn find_asset_dir() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(found) = exe.parent().and_then(search_upward) {
            return found;
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(found) = search_upward(&cwd) {
            return found;
        }
    }

    PathBuf::from("assets")
}

/// Walk up from `start`, returning the first `assets` directory that
/// contains an `index.html`.
fn search_upward(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start.to_path_buf());
    while let Some(d) = dir {
        let candidate = d.join("assets");
        if candidate.join("index.html").is_file() {
            return Some(candidate);
        }
        dir = d.parent().map(|p| p.to_path_buf());
    }
    None
}
