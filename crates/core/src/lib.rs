mod error;
mod fingerprint;
mod header;
mod merge;
mod naming;
mod quality;
mod report;
mod scan;
mod signature;
mod similarity;
mod types;

pub use error::{Error, Result};

pub use fingerprint::{CommentStyle, clean_content, content_hash, format_content_hash};
pub use header::{ScriptHeader, parse_date, parse_header};
pub use merge::{DEFAULT_SERVICE, decide_merge, detect_service};
pub use naming::normalize_basename;
pub use quality::{MAX_QUALITY_SCORE, QualitySignals, quality_score};
pub use signature::{
    FunctionSignature, extract_shell_signatures, extract_signatures, signature_key,
    signatures_for,
};
pub use similarity::{levenshtein, similarity};

pub use report::{
    analyze_script_files, generate_duplication_report, generate_duplication_report_with_stats,
};

pub use types::{
    DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_MAX_SIMILARITY_FILES, DEFAULT_SIMILARITY_THRESHOLD,
    DuplicateFile, DuplicationReport, ExactDuplicateGroup, FunctionalDuplicateGroup, MergeAction,
    MergeDecision, NameCollisionGroup, RankedFile, ScanOptions, ScanOutcome, ScanStats,
    ScriptFile, ScriptKind, SimilarPair, default_ignore_dirs, default_service_prefixes,
};
