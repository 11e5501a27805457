use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

pub(crate) const MARKDOWN_REPORT: &str = "duplicate-report.md";
pub(crate) const JSON_REPORT: &str = "duplicate-report.json";
pub(crate) const MERGE_SCRIPT: &str = "merge-commands.sh";

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

pub(crate) struct Output {
    pub(crate) path: PathBuf,
    pub(crate) contents: String,
    pub(crate) executable: bool,
}

fn stage(output: &Output) -> Result<NamedTempFile> {
    let path = &output.path;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(output.contents.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    if output.executable {
        set_executable(tmp.path())
            .with_context(|| format!("failed to mark {} executable", path.display()))?;
    }
    Ok(tmp)
}

/// Stages every output before renaming any of them into place.
pub(crate) fn write_outputs(outputs: &[Output]) -> Result<()> {
    let staged = outputs
        .iter()
        .map(|output| stage(output).map(|tmp| (tmp, &output.path)))
        .collect::<Result<Vec<_>>>()?;

    for (tmp, path) in staged {
        tmp.persist(path)
            .map_err(|err| err.error)
            .with_context(|| format!("failed to replace {}", path.display()))?;
    }
    Ok(())
}
