use std::fmt::Write;
use std::path::Path;

use gas_dedupe_core::{DuplicateFile, DuplicationReport, MergeAction, MergeDecision};

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '@' | '%' | '+' | '=' | ',')
}

pub(crate) fn shell_quote(raw: &str) -> String {
    if !raw.is_empty() && raw.chars().all(is_shell_safe) {
        return raw.to_string();
    }
    format!("'{}'", raw.replace('\'', r"'\''"))
}

fn source_path(file: &DuplicateFile) -> String {
    if file.repo_id == 0 {
        file.path.clone()
    } else {
        file.abs_path.to_string_lossy().into_owned()
    }
}

fn push_decision(out: &mut String, decision: &MergeDecision) {
    let best = &decision.best.file;
    let target = decision.target.as_str();
    let _ = writeln!(
        out,
        "# {}: {} {} (best: {}, score {})",
        decision.group_key,
        decision.action.as_str(),
        target,
        source_path(best),
        decision.best.score
    );

    match decision.action {
        MergeAction::Keep => {}
        MergeAction::Update | MergeAction::Add => {
            if decision.action == MergeAction::Add
                && let Some(parent) = Path::new(target).parent()
                && !parent.as_os_str().is_empty()
            {
                let _ = writeln!(out, "mkdir -p -- {}", shell_quote(&parent.to_string_lossy()));
            }
            let verb = if best.repo_id == 0 { "mv" } else { "cp" };
            let _ = writeln!(
                out,
                "{verb} -- {} {}",
                shell_quote(&source_path(best)),
                shell_quote(target)
            );
        }
    }

    for candidate in &decision.remove_candidates {
        let file = &candidate.file;
        if decision.action == MergeAction::Update && file.repo_id == 0 && file.path == target {
            continue;
        }
        let _ = writeln!(out, "rm -- {}", shell_quote(&source_path(file)));
    }
    out.push('\n');
}

pub(crate) fn render_merge_script(report: &DuplicationReport) -> String {
    let mut out = String::new();
    out.push_str("#!/usr/bin/env bash\n");
    let _ = writeln!(
        out,
        "# Generated by gas-dedupe on {}.",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out.push_str("# Review every command before running this script.\n");
    out.push_str("set -euo pipefail\n\n");

    if report.merge_decisions.is_empty() {
        out.push_str("# No name collisions; nothing to merge.\n");
        return out;
    }

    if let Some(primary) = report.roots.first() {
        let _ = writeln!(out, "cd {}\n", shell_quote(&primary.to_string_lossy()));
    }
    for decision in &report.merge_decisions {
        push_decision(&mut out, decision);
    }
    out
}
