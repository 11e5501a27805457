use std::cmp::Ordering;
use std::path::Path;

use chrono::NaiveDate;

use crate::quality::quality_score;
use crate::types::{MergeAction, MergeDecision, RankedFile, ScanOptions, ScriptFile};

pub const DEFAULT_SERVICE: &str = "utility";

const SERVICE_APIS: &[(&str, &str)] = &[
    ("GmailApp", "gmail"),
    ("DriveApp", "drive"),
    ("SpreadsheetApp", "sheets"),
    ("CalendarApp", "calendar"),
    ("DocumentApp", "docs"),
    ("FormApp", "forms"),
    ("SlidesApp", "slides"),
    ("TaskManager", "tasks"),
    ("Tasks.", "tasks"),
    ("ContactsApp", "contacts"),
    ("People.", "contacts"),
];

const SERVICE_ALIASES: &[(&str, &str)] = &[
    ("gmail", "gmail"),
    ("mail", "gmail"),
    ("drive", "drive"),
    ("sheets", "sheets"),
    ("sheet", "sheets"),
    ("spreadsheet", "sheets"),
    ("calendar", "calendar"),
    ("docs", "docs"),
    ("doc", "docs"),
    ("document", "docs"),
    ("forms", "forms"),
    ("form", "forms"),
    ("slides", "slides"),
    ("tasks", "tasks"),
    ("contacts", "contacts"),
    ("chat", "chat"),
    ("utility", "utility"),
];

pub fn detect_service(file: &ScriptFile) -> &'static str {
    if let Some(declared) = file.header.service.as_deref() {
        let first = declared
            .split(|c: char| !c.is_ascii_alphanumeric())
            .find(|w| !w.is_empty())
            .unwrap_or("")
            .to_ascii_lowercase();
        if let Some((_, service)) = SERVICE_ALIASES.iter().find(|(alias, _)| *alias == first) {
            return *service;
        }
    }

    SERVICE_APIS
        .iter()
        .filter_map(|(api, service)| file.raw_content.find(api).map(|pos| (pos, *service)))
        .min_by_key(|(pos, _)| *pos)
        .map_or(DEFAULT_SERVICE, |(_, service)| service)
}

fn in_canonical_tree(file: &ScriptFile, canonical_dir: &Path) -> bool {
    file.repo_id == 0 && Path::new(&file.rel_path).starts_with(canonical_dir)
}

fn add_target(file: &ScriptFile, canonical_dir: &Path) -> String {
    canonical_dir
        .join(detect_service(file))
        .join(&file.basename)
        .to_string_lossy()
        .replace('\\', "/")
}

struct Candidate<'a> {
    file: &'a ScriptFile,
    score: u8,
}

fn rank(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.file.header.updated.cmp(&a.file.header.updated))
        .then_with(|| b.file.last_modified.cmp(&a.file.last_modified))
        .then_with(|| {
            (a.file.repo_id, &a.file.rel_path).cmp(&(b.file.repo_id, &b.file.rel_path))
        })
}

fn ranked(candidate: &Candidate<'_>) -> RankedFile {
    RankedFile {
        file: candidate.file.to_duplicate_file(),
        score: candidate.score,
        updated: candidate.file.header.updated,
    }
}

/// Ordering is `(score desc, Updated: desc, mtime desc, path asc)`; missing dates sort last.
pub fn decide_merge(
    group_key: &str,
    members: &[&ScriptFile],
    options: &ScanOptions,
    today: NaiveDate,
) -> Option<MergeDecision> {
    if members.len() < 2 {
        return None;
    }

    let mut candidates: Vec<Candidate<'_>> = members
        .iter()
        .map(|&file| Candidate {
            file,
            score: quality_score(
                &file.raw_content,
                &file.header,
                today,
                options.recent_update_days,
            ),
        })
        .collect();
    candidates.sort_by(rank);

    let best = &candidates[0];
    let canonical_dir = options.canonical_dir.as_path();

    let (action, target) = if in_canonical_tree(best.file, canonical_dir) {
        (MergeAction::Keep, best.file.rel_path.clone())
    } else if let Some(sibling) = candidates[1..]
        .iter()
        .filter(|c| in_canonical_tree(c.file, canonical_dir))
        .min_by(|a, b| a.file.rel_path.cmp(&b.file.rel_path))
    {
        (MergeAction::Update, sibling.file.rel_path.clone())
    } else {
        (MergeAction::Add, add_target(best.file, canonical_dir))
    };

    Some(MergeDecision {
        group_key: group_key.to_string(),
        best: ranked(best),
        action,
        target,
        remove_candidates: candidates[1..].iter().map(ranked).collect(),
    })
}
