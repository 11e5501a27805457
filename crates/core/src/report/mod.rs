mod groups;
mod util;


use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::Result;
use crate::merge::decide_merge;
use crate::scan::{collect_script_files, validate_roots};
use crate::similarity::find_similar_pairs;
use crate::types::{
    DuplicationReport, NameCollisionGroup, ScanOptions, ScanOutcome, ScanStats, ScriptFile,
};

use groups::{exact_duplicate_groups, functional_duplicate_groups, name_collision_buckets};
use util::{
    sort_exact_groups_for_report, sort_functional_groups_for_report,
    sort_similar_pairs_for_report,
};

fn empty_report(roots: &[PathBuf]) -> DuplicationReport {
    DuplicationReport {
        generated_at: Utc::now(),
        roots: roots.to_vec(),
        files_scanned: 0,
        bytes_scanned: 0,
        exact_duplicates: Vec::new(),
        similar_pairs: Vec::new(),
        name_collisions: Vec::new(),
        functional_duplicates: Vec::new(),
        merge_decisions: Vec::new(),
        similarity_skipped: false,
    }
}

pub fn generate_duplication_report(
    roots: &[PathBuf],
    options: &ScanOptions,
) -> Result<DuplicationReport> {
    Ok(generate_duplication_report_with_stats(roots, options)?.result)
}

pub fn generate_duplication_report_with_stats(
    roots: &[PathBuf],
    options: &ScanOptions,
) -> Result<ScanOutcome<DuplicationReport>> {
    options.validate()?;
    if roots.is_empty() {
        return Ok(ScanOutcome {
            result: empty_report(roots),
            stats: ScanStats::default(),
        });
    }
    validate_roots(roots)?;

    let mut stats = ScanStats::default();
    let files = collect_script_files(roots, options, &mut stats)?;
    info!(
        files = files.len(),
        candidates = stats.candidate_files,
        "collected scripts"
    );

    let result = analyze_script_files(roots, &files, options);
    Ok(ScanOutcome { result, stats })
}

/// `files` should be ordered by `(repo_id, rel_path)`; the first root is the canonical one.
pub fn analyze_script_files(
    roots: &[PathBuf],
    files: &[ScriptFile],
    options: &ScanOptions,
) -> DuplicationReport {
    let today = options.today();
    let mut report = empty_report(roots);
    report.files_scanned = files.len();
    report.bytes_scanned = files.iter().map(|f| f.size).sum();

    report.exact_duplicates = exact_duplicate_groups(files);
    sort_exact_groups_for_report(&mut report.exact_duplicates);
    debug!(groups = report.exact_duplicates.len(), "exact duplicates");

    match find_similar_pairs(files, options) {
        Some(mut pairs) => {
            sort_similar_pairs_for_report(&mut pairs);
            report.similar_pairs = pairs;
        }
        None => report.similarity_skipped = true,
    }

    let buckets = name_collision_buckets(files, &options.service_prefixes);
    report.merge_decisions = buckets
        .iter()
        .filter_map(|(key, members)| decide_merge(key, members, options, today))
        .collect();
    report.name_collisions = buckets
        .into_iter()
        .map(|(normalized_name, members)| NameCollisionGroup {
            normalized_name,
            files: members.iter().map(|f| f.to_duplicate_file()).collect(),
        })
        .collect();
    debug!(groups = report.name_collisions.len(), "name collisions");

    report.functional_duplicates = functional_duplicate_groups(files);
    sort_functional_groups_for_report(&mut report.functional_duplicates);
    debug!(
        groups = report.functional_duplicates.len(),
        "functional duplicates"
    );

    report
}
