use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::SystemTime;

use tracing::warn;

use crate::types::{ScanOptions, ScanStats};

use super::RepoFile;

const SHELLS: &[&str] = &["sh", "bash", "zsh", "ksh", "dash"];

#[derive(Debug)]
pub(crate) struct LoadedScript {
    pub(crate) text: String,
    pub(crate) modified: Option<SystemTime>,
}

fn record_io_skip(stats: &mut ScanStats, path: &Path, err: &io::Error) {
    match err.kind() {
        io::ErrorKind::NotFound => {
            stats.skipped_not_found = stats.skipped_not_found.saturating_add(1);
        }
        io::ErrorKind::PermissionDenied => {
            stats.skipped_permission_denied = stats.skipped_permission_denied.saturating_add(1);
        }
        _ => {
            stats.skipped_walk_errors = stats.skipped_walk_errors.saturating_add(1);
        }
    }
    warn!(path = %path.display(), error = %err, "skipping unreadable file");
}

pub(crate) fn is_shell_shebang(first_line: &str) -> bool {
    let Some(rest) = first_line.strip_prefix("#!") else {
        return false;
    };
    let mut words = rest.split_whitespace();
    let Some(interpreter) = words.next() else {
        return false;
    };
    let program = interpreter.rsplit('/').next().unwrap_or(interpreter);
    let program = if program == "env" {
        match words.find(|w| !w.starts_with('-')) {
            Some(p) => p,
            None => return false,
        }
    } else {
        program
    };
    SHELLS.contains(&program)
}

fn has_shell_shebang(path: &Path) -> io::Result<bool> {
    let mut head = Vec::with_capacity(128);
    fs::File::open(path)?.take(128).read_to_end(&mut head)?;
    let head = String::from_utf8_lossy(&head);
    Ok(is_shell_shebang(head.lines().next().unwrap_or("")))
}

pub(crate) fn read_script_file(
    repo_file: &RepoFile,
    options: &ScanOptions,
    stats: &mut ScanStats,
) -> Option<LoadedScript> {
    let path = repo_file.abs_path.as_path();

    if repo_file.needs_shebang {
        match has_shell_shebang(path) {
            Ok(true) => stats.candidate_files = stats.candidate_files.saturating_add(1),
            Ok(false) => return None,
            Err(err) => {
                record_io_skip(stats, path, &err);
                return None;
            }
        }
    }

    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(err) => {
            record_io_skip(stats, path, &err);
            return None;
        }
    };
    if metadata.file_type().is_symlink() {
        stats.skipped_walk_errors = stats.skipped_walk_errors.saturating_add(1);
        return None;
    }

    if let Some(max_file_size) = options.max_file_size
        && metadata.len() > max_file_size
    {
        stats.skipped_too_large = stats.skipped_too_large.saturating_add(1);
        warn!(path = %path.display(), size = metadata.len(), "skipping oversized file");
        return None;
    }

    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(err) => {
            record_io_skip(stats, path, &err);
            return None;
        }
    };

    if bytes.contains(&0) {
        stats.skipped_binary = stats.skipped_binary.saturating_add(1);
        warn!(path = %path.display(), "skipping binary file");
        return None;
    }
    let len = bytes.len() as u64;

    let text = match String::from_utf8(bytes) {
        Ok(t) => t,
        Err(_) => {
            stats.skipped_not_utf8 = stats.skipped_not_utf8.saturating_add(1);
            warn!(path = %path.display(), "skipping file that is not valid UTF-8");
            return None;
        }
    };

    stats.scanned_files = stats.scanned_files.saturating_add(1);
    stats.scanned_bytes = stats.scanned_bytes.saturating_add(len);

    Some(LoadedScript {
        text,
        modified: metadata.modified().ok(),
    })
}
