use std::collections::HashSet;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::fingerprint::{CommentStyle, clean_content, content_hash};
use crate::header::{ScriptHeader, parse_header};
use crate::signature::{signature_key, signatures_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    AppsScript,
    Shell,
}

impl ScriptKind {
    pub(crate) fn comment_style(self) -> CommentStyle {
        match self {
            ScriptKind::AppsScript => CommentStyle::CStyle,
            ScriptKind::Shell => CommentStyle::Hash,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub script_kind: ScriptKind,
    pub extensions: Vec<String>,
    pub ignore_dirs: HashSet<String>,
    pub max_file_size: Option<u64>,
    pub max_files: Option<usize>,
    pub respect_gitignore: bool,
    pub similarity_threshold: f64,
    pub max_similarity_files: usize,
    pub canonical_dir: PathBuf,
    pub service_prefixes: Vec<String>,
    pub recent_update_days: i64,
    /// Date used for recency scoring; `None` means the local date at scan time.
    pub today: Option<NaiveDate>,
}

pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.9;
pub const DEFAULT_MAX_SIMILARITY_FILES: usize = 2000;

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            script_kind: ScriptKind::AppsScript,
            extensions: vec!["gs".to_string()],
            ignore_dirs: default_ignore_dirs(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE_BYTES),
            max_files: None,
            respect_gitignore: true,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_similarity_files: DEFAULT_MAX_SIMILARITY_FILES,
            canonical_dir: PathBuf::from("scripts"),
            service_prefixes: default_service_prefixes(),
            recent_update_days: 30,
            today: None,
        }
    }
}

impl ScanOptions {
    pub fn shell() -> Self {
        Self {
            script_kind: ScriptKind::Shell,
            extensions: vec!["sh".to_string()],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite()
            || self.similarity_threshold <= 0.0
            || self.similarity_threshold > 1.0
        {
            return Err(Error::InvalidOptions(format!(
                "similarity threshold must be in (0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(Error::InvalidOptions(
                "at least one file extension is required".to_string(),
            ));
        }
        if self.recent_update_days < 0 {
            return Err(Error::InvalidOptions(
                "recent update window must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub candidate_files: u64,
    pub scanned_files: u64,
    pub scanned_bytes: u64,
    pub skipped_not_found: u64,
    pub skipped_permission_denied: u64,
    pub skipped_too_large: u64,
    pub skipped_binary: u64,
    pub skipped_not_utf8: u64,
    pub skipped_walk_errors: u64,
    pub skipped_budget_max_files: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome<T> {
    pub result: T,
    pub stats: ScanStats,
}

pub fn default_ignore_dirs() -> HashSet<String> {
    [".git", "node_modules"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn default_service_prefixes() -> Vec<String> {
    [
        "gmail", "drive", "sheets", "calendar", "docs", "forms", "slides", "tasks", "contacts",
        "chat", "utility",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[derive(Debug, Clone)]
pub struct ScriptFile {
    pub repo_id: usize,
    pub repo_label: String,
    pub abs_path: PathBuf,
    pub rel_path: String,
    pub basename: String,
    pub size: u64,
    pub content_hash: u128,
    pub raw_content: String,
    pub cleaned_content: String,
    /// Sorted, pipe-joined `name(params)` list; empty when no functions were found.
    pub signature: String,
    pub header: ScriptHeader,
    pub last_modified: Option<SystemTime>,
}

impl ScriptFile {
    pub fn new(
        repo_id: usize,
        repo_label: impl Into<String>,
        abs_path: PathBuf,
        rel_path: impl Into<String>,
        raw_content: String,
        kind: ScriptKind,
        last_modified: Option<SystemTime>,
    ) -> Self {
        let rel_path = rel_path.into();
        let basename = rel_path
            .rsplit('/')
            .next()
            .unwrap_or(rel_path.as_str())
            .to_string();
        let signature = signature_key(&signatures_for(kind, &raw_content));

        Self {
            repo_id,
            repo_label: repo_label.into(),
            abs_path,
            basename,
            size: raw_content.len() as u64,
            content_hash: content_hash(raw_content.as_bytes()),
            cleaned_content: clean_content(&raw_content, kind.comment_style()),
            signature,
            header: parse_header(&raw_content),
            rel_path,
            raw_content,
            last_modified,
        }
    }

    pub(crate) fn to_duplicate_file(&self) -> DuplicateFile {
        DuplicateFile {
            repo_id: self.repo_id,
            repo_label: self.repo_label.clone(),
            path: self.rel_path.clone(),
            abs_path: self.abs_path.clone(),
            size: self.size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFile {
    pub repo_id: usize,
    pub repo_label: String,
    pub path: String,
    pub abs_path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactDuplicateGroup {
    pub content_hash: u128,
    pub size: u64,
    pub files: Vec<DuplicateFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarPair {
    pub a: DuplicateFile,
    pub b: DuplicateFile,
    pub ratio: f64,
    /// Cleaned contents are equal; the files differ only in comments or whitespace.
    pub cleaned_identical: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollisionGroup {
    pub normalized_name: String,
    pub files: Vec<DuplicateFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionalDuplicateGroup {
    pub signature: String,
    pub files: Vec<DuplicateFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    Keep,
    Update,
    Add,
}

impl MergeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            MergeAction::Keep => "keep",
            MergeAction::Update => "update",
            MergeAction::Add => "add",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedFile {
    pub file: DuplicateFile,
    pub score: u8,
    pub updated: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeDecision {
    pub group_key: String,
    pub best: RankedFile,
    pub action: MergeAction,
    /// Destination relative to the first root.
    pub target: String,
    pub remove_candidates: Vec<RankedFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicationReport {
    pub generated_at: DateTime<Utc>,
    pub roots: Vec<PathBuf>,
    pub files_scanned: usize,
    pub bytes_scanned: u64,
    pub exact_duplicates: Vec<ExactDuplicateGroup>,
    pub similar_pairs: Vec<SimilarPair>,
    pub name_collisions: Vec<NameCollisionGroup>,
    pub functional_duplicates: Vec<FunctionalDuplicateGroup>,
    pub merge_decisions: Vec<MergeDecision>,
    /// The pairwise pass was skipped because the corpus exceeded the configured cap.
    pub similarity_skipped: bool,
}

impl DuplicationReport {
    pub fn has_findings(&self) -> bool {
        !self.exact_duplicates.is_empty()
            || !self.similar_pairs.is_empty()
            || !self.name_collisions.is_empty()
            || !self.functional_duplicates.is_empty()
    }

    pub fn exact_duplicate_savings(&self) -> u64 {
        self.exact_duplicates
            .iter()
            .map(|g| g.size.saturating_mul(g.files.len().saturating_sub(1) as u64))
            .sum()
    }

    pub fn merge_savings(&self) -> u64 {
        self.merge_decisions
            .iter()
            .flat_map(|d| d.remove_candidates.iter())
            .map(|r| r.file.size)
            .sum()
    }
}
