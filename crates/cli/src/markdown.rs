use std::fmt::Write;

use gas_dedupe_core::{
    DuplicateFile, DuplicationReport, MergeAction, RankedFile, SimilarPair, format_content_hash,
};

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

struct Renderer<'a> {
    report: &'a DuplicationReport,
    multi_root: bool,
    out: String,
}

impl Renderer<'_> {
    fn file(&self, file: &DuplicateFile) -> String {
        if self.multi_root {
            format!("`{}:{}`", file.repo_label, file.path)
        } else {
            format!("`{}`", file.path)
        }
    }

    fn ranked(&self, ranked: &RankedFile) -> String {
        match ranked.updated {
            Some(updated) => format!(
                "{} (score {}, updated {updated})",
                self.file(&ranked.file),
                ranked.score
            ),
            None => format!("{} (score {})", self.file(&ranked.file), ranked.score),
        }
    }

    fn pair(&self, pair: &SimilarPair) -> String {
        let detail = if pair.cleaned_identical {
            "100.0%, comments/whitespace only".to_string()
        } else {
            format!("{:.1}%", pair.ratio * 100.0)
        };
        format!("{} ↔ {} ({detail})", self.file(&pair.a), self.file(&pair.b))
    }

    fn heading(&mut self, title: &str) {
        let _ = write!(self.out, "\n## {title}\n\n");
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn files(&mut self, files: &[DuplicateFile]) {
        for file in files {
            let line = format!("- {}", self.file(file));
            self.line(line);
        }
    }

    fn header(&mut self) {
        let report = self.report;
        self.line("# Duplicate Script Report");
        self.line("");
        self.line(format!(
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        self.line("");
        for (idx, root) in report.roots.iter().enumerate() {
            let role = if idx == 0 { "primary" } else { "external" };
            self.line(format!("- Root ({role}): `{}`", root.display()));
        }
    }

    fn summary(&mut self) {
        let report = self.report;
        self.heading("Summary");
        self.line(format!(
            "- Files scanned: {} ({})",
            report.files_scanned,
            format_bytes(report.bytes_scanned)
        ));
        self.line(format!(
            "- Exact duplicate groups: {}",
            report.exact_duplicates.len()
        ));
        self.line(format!("- Similar pairs: {}", report.similar_pairs.len()));
        self.line(format!("- Name collisions: {}", report.name_collisions.len()));
        self.line(format!(
            "- Functional duplicate groups: {}",
            report.functional_duplicates.len()
        ));
        if report.similarity_skipped {
            self.line("");
            self.line(
                "> Similarity pass skipped: the corpus exceeds the configured file cap.",
            );
        }
        if !report.has_findings() {
            self.line("");
            self.line("No duplicates found.");
        }
    }

    fn exact_duplicates(&mut self) {
        let report = self.report;
        self.heading("Exact Duplicates");
        if report.exact_duplicates.is_empty() {
            self.line("No exact duplicates found.");
            return;
        }
        for (idx, group) in report.exact_duplicates.iter().enumerate() {
            if idx > 0 {
                self.line("");
            }
            self.line(format!(
                "### Group {} ({} files, {} each)",
                idx + 1,
                group.files.len(),
                format_bytes(group.size)
            ));
            self.line("");
            self.line(format!("Hash: `{}`", format_content_hash(group.content_hash)));
            self.line("");
            self.files(&group.files);
        }
    }

    fn similar_scripts(&mut self) {
        let report = self.report;
        self.heading("Similar Scripts");
        if report.similarity_skipped {
            self.line("Skipped: too many files for the pairwise comparison.");
            return;
        }
        if report.similar_pairs.is_empty() {
            self.line("No similar scripts found.");
            return;
        }
        for pair in &report.similar_pairs {
            let line = format!("- {}", self.pair(pair));
            self.line(line);
        }
    }

    fn name_collisions(&mut self) {
        let report = self.report;
        self.heading("Name Collisions");
        if report.name_collisions.is_empty() {
            self.line("No name collisions found.");
            return;
        }
        for (idx, group) in report.name_collisions.iter().enumerate() {
            if idx > 0 {
                self.line("");
            }
            self.line(format!(
                "### `{}` ({} files)",
                group.normalized_name,
                group.files.len()
            ));
            self.line("");
            self.files(&group.files);
        }
    }

    fn functional_duplicates(&mut self) {
        let report = self.report;
        self.heading("Functional Duplicates");
        if report.functional_duplicates.is_empty() {
            self.line("No functional duplicates found.");
            return;
        }
        for (idx, group) in report.functional_duplicates.iter().enumerate() {
            if idx > 0 {
                self.line("");
            }
            self.line(format!("### {} files", group.files.len()));
            self.line("");
            self.line("Functions:");
            for signature in group.signature.split('|') {
                self.line(format!("- `{signature}`"));
            }
            self.line("");
            self.line("Files:");
            self.files(&group.files);
        }
    }

    fn recommendations(&mut self) {
        let report = self.report;
        self.heading("Recommendations");
        if report.merge_decisions.is_empty() {
            self.line("No merge decisions: every script name is unique.");
            return;
        }
        for (idx, decision) in report.merge_decisions.iter().enumerate() {
            if idx > 0 {
                self.line("");
            }
            self.line(format!("### `{}`", decision.group_key));
            self.line("");
            let best = self.ranked(&decision.best);
            self.line(format!("- Best version: {best}"));
            let action = match decision.action {
                MergeAction::Keep => format!("keep `{}` in place", decision.target),
                MergeAction::Update => format!("update `{}` from the best version", decision.target),
                MergeAction::Add => format!("add as `{}`", decision.target),
            };
            self.line(format!("- Action: **{}**, {action}", decision.action.as_str()));
            for candidate in &decision.remove_candidates {
                let line = format!("- Remove candidate: {}", self.ranked(candidate));
                self.line(line);
            }
        }
    }

    fn space_savings(&mut self) {
        let report = self.report;
        self.heading("Space Savings");
        let exact = report.exact_duplicate_savings();
        let merge = report.merge_savings();
        if exact == 0 && merge == 0 {
            self.line("Nothing to reclaim.");
            return;
        }
        self.line(format!(
            "- Removing exact duplicates frees {} ({exact} bytes)",
            format_bytes(exact)
        ));
        self.line(format!(
            "- Removing merge candidates frees {} ({merge} bytes)",
            format_bytes(merge)
        ));
    }

    fn next_steps(&mut self) {
        let report = self.report;
        self.heading("Next Steps");
        if !report.has_findings() {
            self.line("Nothing to do.");
            return;
        }
        let mut steps: Vec<&str> = Vec::new();
        if !report.exact_duplicates.is_empty() {
            steps.push("Delete all but one copy of each exact duplicate group.");
        }
        if !report.similar_pairs.is_empty() {
            steps.push("Diff each similar pair and fold the differences into one script.");
        }
        if !report.merge_decisions.is_empty() {
            steps.push(
                "Review the recommendations, then run `gas-dedupe merge-versions` and read `merge-commands.sh` before executing it.",
            );
        }
        if !report.functional_duplicates.is_empty() {
            steps.push("Extract functions shared by functional duplicates into a common library.");
        }
        steps.push("Re-run `gas-dedupe detect-duplicates` to confirm the corpus is clean.");
        for (idx, step) in steps.into_iter().enumerate() {
            self.line(format!("{}. {step}", idx + 1));
        }
    }
}

pub(crate) fn render_markdown(report: &DuplicationReport) -> String {
    let mut renderer = Renderer {
        report,
        multi_root: report.roots.len() > 1,
        out: String::new(),
    };
    renderer.header();
    renderer.summary();
    renderer.exact_duplicates();
    renderer.similar_scripts();
    renderer.name_collisions();
    renderer.functional_duplicates();
    renderer.recommendations();
    renderer.space_savings();
    renderer.next_steps();
    renderer.out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::{NaiveDate, TimeZone, Utc};
    use gas_dedupe_core::{
        ExactDuplicateGroup, FunctionalDuplicateGroup, MergeDecision, NameCollisionGroup,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn file(repo_id: usize, path: &str, size: u64) -> DuplicateFile {
        DuplicateFile {
            repo_id,
            repo_label: format!("repo{repo_id}"),
            path: path.to_string(),
            abs_path: PathBuf::from(format!("/r{repo_id}")).join(path),
            size,
        }
    }

    fn empty() -> DuplicationReport {
        DuplicationReport {
            generated_at: Utc
                .with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
                .single()
                .expect("valid time"),
            roots: vec![PathBuf::from("/r0")],
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

    fn section_titles(markdown: &str) -> Vec<&str> {
        markdown
            .lines()
            .filter_map(|line| line.strip_prefix("## "))
            .collect()
    }

    #[test]
    fn formats_byte_counts() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn empty_report_has_every_section_and_says_so() {
        let markdown = render_markdown(&empty());
        assert_eq!(
            section_titles(&markdown),
            vec![
                "Summary",
                "Exact Duplicates",
                "Similar Scripts",
                "Name Collisions",
                "Functional Duplicates",
                "Recommendations",
                "Space Savings",
                "Next Steps",
            ]
        );
        assert!(markdown.contains("No duplicates found."));
        assert!(markdown.contains("No exact duplicates found."));
        assert!(markdown.contains("Generated: 2025-06-15 12:00:00 UTC"));
    }

    #[test]
    fn renders_pairs_with_one_decimal() {
        let mut report = empty();
        report.similar_pairs = vec![
            SimilarPair {
                a: file(0, "a.gs", 10),
                b: file(0, "b.gs", 10),
                ratio: 1.0,
                cleaned_identical: true,
            },
            SimilarPair {
                a: file(0, "c.gs", 10),
                b: file(0, "d.gs", 10),
                ratio: 0.97345,
                cleaned_identical: false,
            },
        ];
        let markdown = render_markdown(&report);
        assert!(markdown.contains("- `a.gs` ↔ `b.gs` (100.0%, comments/whitespace only)"));
        assert!(markdown.contains("- `c.gs` ↔ `d.gs` (97.3%)"));
        assert!(!markdown.contains("No duplicates found."));
    }

    #[test]
    fn renders_groups_decisions_and_savings() {
        let mut report = empty();
        report.roots.push(PathBuf::from("/r1"));
        report.exact_duplicates = vec![ExactDuplicateGroup {
            content_hash: 0xab,
            size: 2048,
            files: vec![file(0, "a.gs", 2048), file(1, "b.gs", 2048)],
        }];
        report.name_collisions = vec![NameCollisionGroup {
            normalized_name: "export".to_string(),
            files: vec![file(0, "scripts/gmail/export.gs", 100), file(1, "export-v2.gs", 300)],
        }];
        report.functional_duplicates = vec![FunctionalDuplicateGroup {
            signature: "a(x)|b()".to_string(),
            files: vec![file(0, "x.gs", 1), file(1, "y.gs", 2)],
        }];
        report.merge_decisions = vec![MergeDecision {
            group_key: "export".to_string(),
            best: RankedFile {
                file: file(1, "export-v2.gs", 300),
                score: 85,
                updated: NaiveDate::from_ymd_opt(2025, 6, 1),
            },
            action: MergeAction::Update,
            target: "scripts/gmail/export.gs".to_string(),
            remove_candidates: vec![RankedFile {
                file: file(0, "scripts/gmail/export.gs", 100),
                score: 10,
                updated: None,
            }],
        }];

        let markdown = render_markdown(&report);
        assert!(markdown.contains("### Group 1 (2 files, 2.0 KiB each)"));
        assert!(markdown.contains(&format!("Hash: `{}`", format_content_hash(0xab))));
        assert!(markdown.contains("- `repo1:b.gs`"));
        assert!(markdown.contains("### `export` (2 files)"));
        assert!(markdown.contains("- `a(x)`\n- `b()`"));
        assert!(markdown.contains("- Best version: `repo1:export-v2.gs` (score 85, updated 2025-06-01)"));
        assert!(markdown.contains("- Action: **update**, update `scripts/gmail/export.gs` from the best version"));
        assert!(markdown.contains("- Remove candidate: `repo0:scripts/gmail/export.gs` (score 10)"));
        assert!(markdown.contains("- Removing exact duplicates frees 2.0 KiB (2048 bytes)"));
        assert!(markdown.contains("- Removing merge candidates frees 100 B (100 bytes)"));
        assert!(markdown.contains("- Root (external): `/r1`"));
    }

    #[test]
    fn skipped_similarity_is_called_out() {
        let mut report = empty();
        report.similarity_skipped = true;
        let markdown = render_markdown(&report);
        assert!(markdown.contains("Similarity pass skipped"));
        assert!(markdown.contains("Skipped: too many files for the pairwise comparison."));
    }
}
