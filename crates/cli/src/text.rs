use gas_dedupe_core::{DuplicationReport, ScanStats};

use crate::markdown::format_bytes;

/// Skips that mean part of the corpus was never looked at.
pub(crate) fn has_fatal_skips(stats: &ScanStats) -> bool {
    stats.skipped_permission_denied > 0
        || stats.skipped_walk_errors > 0
        || stats.skipped_budget_max_files > 0
}

pub(crate) fn format_scan_stats(stats: &ScanStats) -> String {
    let mut out = String::new();
    out.push_str("== scan stats ==\n");
    out.push_str(&format!(
        "candidates={} scanned={} bytes={}\n",
        stats.candidate_files, stats.scanned_files, stats.scanned_bytes
    ));

    let mut skips: Vec<(&str, u64)> = vec![
        ("not_found", stats.skipped_not_found),
        ("permission_denied", stats.skipped_permission_denied),
        ("too_large", stats.skipped_too_large),
        ("binary", stats.skipped_binary),
        ("not_utf8", stats.skipped_not_utf8),
        ("walk_errors", stats.skipped_walk_errors),
        ("budget_max_files", stats.skipped_budget_max_files),
    ];
    skips.retain(|(_, v)| *v > 0);
    if !skips.is_empty() {
        out.push_str("skipped:\n");
        for (k, v) in skips {
            out.push_str(&format!("- {k}={v}\n"));
        }
    }
    out.push('\n');
    out
}

pub(crate) fn format_summary(report: &DuplicationReport) -> String {
    let mut out = format!(
        "Scanned {} files ({}).\n",
        report.files_scanned,
        format_bytes(report.bytes_scanned)
    );
    if !report.has_findings() {
        out.push_str("No duplicates found.\n");
        return out;
    }
    out.push_str(&format!(
        "exact groups={} similar pairs={} name collisions={} functional groups={}\n",
        report.exact_duplicates.len(),
        report.similar_pairs.len(),
        report.name_collisions.len(),
        report.functional_duplicates.len()
    ));
    let savings = report.exact_duplicate_savings();
    if savings > 0 {
        out.push_str(&format!(
            "Reclaimable from exact duplicates: {}\n",
            format_bytes(savings)
        ));
    }
    out
}
