use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gas_dedupe_core::ScanOptions;
use serde::Deserialize;
use tracing::debug;

use crate::args::ScanArgs;

pub(crate) const DEFAULT_CONFIG_FILE: &str = ".gas-dedupe.toml";

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) extensions: Option<Vec<String>>,
    pub(crate) ignore_dirs: Option<Vec<String>>,
    pub(crate) similarity_threshold: Option<f64>,
    pub(crate) max_similarity_files: Option<usize>,
    pub(crate) max_file_size: Option<u64>,
    pub(crate) respect_gitignore: Option<bool>,
    pub(crate) canonical_dir: Option<PathBuf>,
    pub(crate) service_prefixes: Option<Vec<String>>,
    pub(crate) shell_mode: Option<bool>,
}

pub(crate) fn parse_config(text: &str) -> Result<FileConfig> {
    Ok(toml::from_str(text)?)
}

/// An explicit path must exist; the default file in the primary root is optional.
pub(crate) fn load_config(explicit: Option<&Path>, primary_root: &Path) -> Result<FileConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (primary_root.join(DEFAULT_CONFIG_FILE), false),
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(FileConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {}", path.display()));
        }
    };

    debug!(path = %path.display(), "loaded config file");
    parse_config(&text).with_context(|| format!("invalid config {}", path.display()))
}

pub(crate) fn scan_options(file: &FileConfig, args: &ScanArgs) -> ScanOptions {
    let shell = args.shell || file.shell_mode.unwrap_or(false);
    let mut options = if shell {
        ScanOptions::shell()
    } else {
        ScanOptions::default()
    };

    if let Some(extensions) = &file.extensions {
        options.extensions = extensions.clone();
    }
    if let Some(ignore_dirs) = &file.ignore_dirs {
        options.ignore_dirs.extend(ignore_dirs.iter().cloned());
    }
    if let Some(threshold) = file.similarity_threshold {
        options.similarity_threshold = threshold;
    }
    if let Some(max) = file.max_similarity_files {
        options.max_similarity_files = max;
    }
    if let Some(max) = file.max_file_size {
        options.max_file_size = Some(max);
    }
    if let Some(respect) = file.respect_gitignore {
        options.respect_gitignore = respect;
    }
    if let Some(dir) = &file.canonical_dir {
        options.canonical_dir = dir.clone();
    }
    if let Some(prefixes) = &file.service_prefixes {
        options.service_prefixes = prefixes.clone();
    }

    if let Some(threshold) = args.similarity_threshold {
        options.similarity_threshold = threshold;
    }
    if let Some(max) = args.max_similarity_files {
        options.max_similarity_files = max;
    }
    if let Some(max) = args.max_file_size {
        options.max_file_size = Some(max);
    }
    if let Some(max) = args.max_files {
        options.max_files = Some(max);
    }
    if args.no_gitignore {
        options.respect_gitignore = false;
    }
    if let Some(dir) = &args.canonical_dir {
        options.canonical_dir = dir.clone();
    }
    options.ignore_dirs.extend(args.ignore_dirs.iter().cloned());

    options
}
