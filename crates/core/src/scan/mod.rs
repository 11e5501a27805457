use std::collections::HashSet;
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{ScanOptions, ScanStats, ScriptFile, ScriptKind};

mod read;
mod walker;

#[cfg(test)]
mod tests;

pub(crate) use read::read_script_file;
pub(crate) use walker::visit_repo_files;

fn should_stop_due_to_max_files(options: &ScanOptions, stats: &mut ScanStats) -> bool {
    let Some(max_files) = options.max_files else {
        return false;
    };
    if stats.scanned_files < max_files as u64 {
        return false;
    }
    stats.skipped_budget_max_files = stats.skipped_budget_max_files.saturating_add(1);
    true
}

pub(crate) fn validate_roots(roots: &[PathBuf]) -> Result<()> {
    for root in roots {
        let meta = fs::metadata(root).map_err(|source| Error::RootUnreadable {
            path: root.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(Error::RootNotDirectory(root.clone()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub(crate) struct Repo {
    pub(crate) id: usize,
    pub(crate) root: PathBuf,
    pub(crate) label: String,
}

#[derive(Debug, Clone)]
pub(crate) struct RepoFile {
    pub(crate) abs_path: PathBuf,
    /// Extensionless file that only qualifies with a shell shebang.
    pub(crate) needs_shebang: bool,
}

pub(crate) fn repo_label(root: &Path, id: usize) -> String {
    root.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("repo{id}"))
}

pub(crate) fn make_rel_path(root: &Path, abs_path: &Path) -> String {
    match abs_path.strip_prefix(root) {
        Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
        Err(_) => abs_path.to_string_lossy().replace('\\', "/"),
    }
}

fn ignore_dirs_contains(ignore_dirs: &HashSet<String>, name: &str) -> bool {
    if ignore_dirs.contains(name) {
        return true;
    }
    #[cfg(windows)]
    {
        ignore_dirs.iter().any(|d| d.eq_ignore_ascii_case(name))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

pub(crate) fn candidate_kind(path: &Path, options: &ScanOptions) -> Option<RepoFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => options
            .extensions
            .iter()
            .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
            .then(|| RepoFile {
                abs_path: path.to_path_buf(),
                needs_shebang: false,
            }),
        None if options.script_kind == ScriptKind::Shell => Some(RepoFile {
            abs_path: path.to_path_buf(),
            needs_shebang: true,
        }),
        None => None,
    }
}

pub(crate) fn collect_script_files(
    roots: &[PathBuf],
    options: &ScanOptions,
    stats: &mut ScanStats,
) -> Result<Vec<ScriptFile>> {
    let repos: Vec<Repo> = roots
        .iter()
        .enumerate()
        .map(|(id, root)| Repo {
            id,
            root: root.clone(),
            label: repo_label(root, id),
        })
        .collect();

    let mut files = Vec::new();
    for repo in &repos {
        let flow = visit_repo_files(repo, options, stats, |stats, repo_file| {
            let Some(loaded) = read_script_file(&repo_file, options, stats) else {
                return Ok(ControlFlow::Continue(()));
            };

            files.push(ScriptFile::new(
                repo.id,
                repo.label.clone(),
                repo_file.abs_path.clone(),
                make_rel_path(&repo.root, &repo_file.abs_path),
                loaded.text,
                options.script_kind,
                loaded.modified,
            ));
            Ok(ControlFlow::Continue(()))
        })?;

        if flow.is_break() {
            debug!(repo = %repo.label, "scan stopped early by file budget");
            break;
        }
    }

    files.sort_by(|a, b| (a.repo_id, &a.rel_path).cmp(&(b.repo_id, &b.rel_path)));
    Ok(files)
}
