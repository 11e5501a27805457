use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Existing paths are canonicalized; missing ones are only cleaned up lexically.
pub(crate) fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };
    let cleaned = lexical_clean(&joined);
    Ok(fs::canonicalize(&cleaned).unwrap_or(cleaned))
}

fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                );
                if !at_root {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

pub(crate) fn resolve_roots(roots: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    if roots.is_empty() {
        return Ok(vec![absolutize(Path::new("."))?]);
    }
    roots.iter().map(|root| absolutize(root)).collect()
}
