use chrono::{DateTime, NaiveDate, Utc};
use gas_dedupe_core::{
    DuplicateFile, DuplicationReport, RankedFile, ScanStats, format_content_hash,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonScanStats {
    pub(crate) candidate_files: u64,
    pub(crate) scanned_files: u64,
    pub(crate) scanned_bytes: u64,
    pub(crate) skipped_not_found: u64,
    pub(crate) skipped_permission_denied: u64,
    pub(crate) skipped_too_large: u64,
    pub(crate) skipped_binary: u64,
    pub(crate) skipped_not_utf8: u64,
    pub(crate) skipped_walk_errors: u64,
    pub(crate) skipped_budget_max_files: u64,
}

impl From<&ScanStats> for JsonScanStats {
    fn from(stats: &ScanStats) -> Self {
        Self {
            candidate_files: stats.candidate_files,
            scanned_files: stats.scanned_files,
            scanned_bytes: stats.scanned_bytes,
            skipped_not_found: stats.skipped_not_found,
            skipped_permission_denied: stats.skipped_permission_denied,
            skipped_too_large: stats.skipped_too_large,
            skipped_binary: stats.skipped_binary,
            skipped_not_utf8: stats.skipped_not_utf8,
            skipped_walk_errors: stats.skipped_walk_errors,
            skipped_budget_max_files: stats.skipped_budget_max_files,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonDuplicateFile {
    pub(crate) repo_id: usize,
    pub(crate) repo_label: String,
    pub(crate) path: String,
    pub(crate) size: u64,
}

impl From<&DuplicateFile> for JsonDuplicateFile {
    fn from(file: &DuplicateFile) -> Self {
        Self {
            repo_id: file.repo_id,
            repo_label: file.repo_label.clone(),
            path: file.path.clone(),
            size: file.size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonExactGroup {
    pub(crate) hash: String,
    pub(crate) size: u64,
    pub(crate) files: Vec<JsonDuplicateFile>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonSimilarPair {
    pub(crate) a: JsonDuplicateFile,
    pub(crate) b: JsonDuplicateFile,
    pub(crate) ratio: f64,
    pub(crate) cleaned_identical: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonNameCollision {
    pub(crate) normalized_name: String,
    pub(crate) files: Vec<JsonDuplicateFile>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonFunctionalGroup {
    pub(crate) signature: String,
    pub(crate) files: Vec<JsonDuplicateFile>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonRankedFile {
    #[serde(flatten)]
    pub(crate) file: JsonDuplicateFile,
    pub(crate) score: u8,
    pub(crate) updated: Option<NaiveDate>,
}

impl From<&RankedFile> for JsonRankedFile {
    fn from(ranked: &RankedFile) -> Self {
        Self {
            file: JsonDuplicateFile::from(&ranked.file),
            score: ranked.score,
            updated: ranked.updated,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonMergeDecision {
    pub(crate) group_key: String,
    pub(crate) action: &'static str,
    pub(crate) target: String,
    pub(crate) best: JsonRankedFile,
    pub(crate) remove_candidates: Vec<JsonRankedFile>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonSpaceSavings {
    pub(crate) exact_duplicate_bytes: u64,
    pub(crate) merge_bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonDuplicationReport {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) roots: Vec<String>,
    pub(crate) files_scanned: usize,
    pub(crate) bytes_scanned: u64,
    pub(crate) exact_duplicates: Vec<JsonExactGroup>,
    pub(crate) similar_pairs: Vec<JsonSimilarPair>,
    pub(crate) similarity_skipped: bool,
    pub(crate) name_collisions: Vec<JsonNameCollision>,
    pub(crate) functional_duplicates: Vec<JsonFunctionalGroup>,
    pub(crate) merge_decisions: Vec<JsonMergeDecision>,
    pub(crate) space_savings: JsonSpaceSavings,
    pub(crate) scan_stats: JsonScanStats,
}

fn map_files(files: &[DuplicateFile]) -> Vec<JsonDuplicateFile> {
    files.iter().map(JsonDuplicateFile::from).collect()
}

pub(crate) fn map_report(report: &DuplicationReport, stats: &ScanStats) -> JsonDuplicationReport {
    JsonDuplicationReport {
        generated_at: report.generated_at,
        roots: report
            .roots
            .iter()
            .map(|root| root.to_string_lossy().into_owned())
            .collect(),
        files_scanned: report.files_scanned,
        bytes_scanned: report.bytes_scanned,
        exact_duplicates: report
            .exact_duplicates
            .iter()
            .map(|g| JsonExactGroup {
                hash: format_content_hash(g.content_hash),
                size: g.size,
                files: map_files(&g.files),
            })
            .collect(),
        similar_pairs: report
            .similar_pairs
            .iter()
            .map(|p| JsonSimilarPair {
                a: JsonDuplicateFile::from(&p.a),
                b: JsonDuplicateFile::from(&p.b),
                ratio: p.ratio,
                cleaned_identical: p.cleaned_identical,
            })
            .collect(),
        similarity_skipped: report.similarity_skipped,
        name_collisions: report
            .name_collisions
            .iter()
            .map(|g| JsonNameCollision {
                normalized_name: g.normalized_name.clone(),
                files: map_files(&g.files),
            })
            .collect(),
        functional_duplicates: report
            .functional_duplicates
            .iter()
            .map(|g| JsonFunctionalGroup {
                signature: g.signature.clone(),
                files: map_files(&g.files),
            })
            .collect(),
        merge_decisions: report
            .merge_decisions
            .iter()
            .map(|d| JsonMergeDecision {
                group_key: d.group_key.clone(),
                action: d.action.as_str(),
                target: d.target.clone(),
                best: JsonRankedFile::from(&d.best),
                remove_candidates: d.remove_candidates.iter().map(JsonRankedFile::from).collect(),
            })
            .collect(),
        space_savings: JsonSpaceSavings {
            exact_duplicate_bytes: report.exact_duplicate_savings(),
            merge_bytes: report.merge_savings(),
        },
        scan_stats: JsonScanStats::from(stats),
    }
}

pub(crate) fn to_json(report: &JsonDuplicationReport) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}
