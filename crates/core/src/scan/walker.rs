use std::io;
use std::ops::ControlFlow;

use ignore::WalkBuilder;
use tracing::warn;

use crate::error::Result;
use crate::types::{ScanOptions, ScanStats};

use super::{Repo, RepoFile, candidate_kind, ignore_dirs_contains, should_stop_due_to_max_files};

fn record_walk_error(stats: &mut ScanStats, err: &ignore::Error) {
    match err.io_error().map(io::Error::kind) {
        Some(io::ErrorKind::NotFound) => {
            stats.skipped_not_found = stats.skipped_not_found.saturating_add(1);
        }
        Some(io::ErrorKind::PermissionDenied) => {
            stats.skipped_permission_denied = stats.skipped_permission_denied.saturating_add(1);
        }
        _ => {
            stats.skipped_walk_errors = stats.skipped_walk_errors.saturating_add(1);
        }
    }
    warn!(error = %err, "skipping unreadable entry");
}

/// Hidden directories, symlinks and `options.ignore_dirs` are pruned; unreadable entries are
/// counted and skipped so one bad directory never aborts the walk.
pub(crate) fn visit_repo_files<F>(
    repo: &Repo,
    options: &ScanOptions,
    stats: &mut ScanStats,
    mut on_file_cb: F,
) -> Result<ControlFlow<()>>
where
    F: FnMut(&mut ScanStats, RepoFile) -> Result<ControlFlow<()>>,
{
    if options.max_files == Some(0) {
        stats.skipped_budget_max_files = stats.skipped_budget_max_files.saturating_add(1);
        return Ok(ControlFlow::Break(()));
    }

    let ignore_dirs = options.ignore_dirs.clone();
    let respect_gitignore = options.respect_gitignore;
    let is_git_repo = repo.root.join(".git").exists();

    let mut builder = WalkBuilder::new(&repo.root);
    builder
        .hidden(false)
        .follow_links(false)
        .ignore(false)
        .git_ignore(respect_gitignore)
        .git_global(respect_gitignore && is_git_repo)
        .git_exclude(respect_gitignore && is_git_repo)
        .parents(false)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let walker = builder
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            if entry.path_is_symlink() {
                return false;
            }

            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if !is_dir {
                return true;
            }

            match entry.file_name().to_str() {
                Some(name) => !name.starts_with('.') && !ignore_dirs_contains(&ignore_dirs, name),
                None => true,
            }
        })
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                record_walk_error(stats, &err);
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let Some(file) = candidate_kind(entry.path(), options) else {
            continue;
        };

        if !file.needs_shebang {
            stats.candidate_files = stats.candidate_files.saturating_add(1);
        }

        if on_file_cb(stats, file)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }

        if should_stop_due_to_max_files(options, stats) {
            return Ok(ControlFlow::Break(()));
        }
    }

    Ok(ControlFlow::Continue(()))
}
