use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::header::ScriptHeader;

pub const MAX_QUALITY_SCORE: u8 = 100;

const HEADER_POINTS: u8 = 20;
const SUMMARY_POINTS: u8 = 20;
const PURPOSE_POINTS: u8 = 10;
const SETUP_POINTS: u8 = 15;
const FUNCTION_DOC_POINTS: u8 = 15;
const ERROR_HANDLING_POINTS: u8 = 10;
const LOGGING_POINTS: u8 = 5;
const RECENT_UPDATE_POINTS: u8 = 5;

static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?mi)^\s*(?:/\*+|\*+|//+|#+)\s*(?:summary|description|overview)\s*:|@(?:summary|description)\b",
    )
    .expect("valid regex")
});

static PURPOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^\s*(?:/\*+|\*+|//+|#+)\s*purpose\s*:").expect("valid regex")
});

static SETUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?mi)^\s*(?:/\*+|\*+|//+|#+)\s*(?:setup|installation|install|usage)(?:\s+(?:instructions|steps))?\s*:",
    )
    .expect("valid regex")
});

static FUNCTION_DOC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)\*/\s*function\s+[A-Za-z_$]|^[ \t]*#[^\n]*\n[ \t]*(?:function[ \t]+)?[A-Za-z_][\w-]*[ \t]*\(\)[ \t]*\{",
    )
    .expect("valid regex")
});

static TRY_CATCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\btry\s*\{.*\bcatch\b").expect("valid regex"));

static SHELL_ERROR_HANDLING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:set\s+-[A-Za-z]*e[A-Za-z]*\b|set\s+-o\s+errexit\b|trap\s)")
        .expect("valid regex")
});

static LOGGING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Logger\.log|console\.(?:log|info|warn|error|debug))\s*\(|>&2")
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualitySignals {
    pub header: bool,
    pub summary: bool,
    pub purpose: bool,
    pub setup: bool,
    pub function_docs: bool,
    pub error_handling: bool,
    pub logging: bool,
    pub recently_updated: bool,
}

impl QualitySignals {
    pub fn detect(
        text: &str,
        header: &ScriptHeader,
        today: NaiveDate,
        recent_days: i64,
    ) -> Self {
        let recently_updated = header.updated.is_some_and(|updated| {
            let age = (today - updated).num_days();
            (0..=recent_days).contains(&age)
        });

        Self {
            header: header.has_block,
            summary: SUMMARY.is_match(text),
            purpose: header.purpose.is_some() || PURPOSE.is_match(text),
            setup: SETUP.is_match(text),
            function_docs: FUNCTION_DOC.is_match(text),
            error_handling: TRY_CATCH.is_match(text) || SHELL_ERROR_HANDLING.is_match(text),
            logging: LOGGING.is_match(text),
            recently_updated,
        }
    }

    pub fn score(&self) -> u8 {
        let points = [
            (self.header, HEADER_POINTS),
            (self.summary, SUMMARY_POINTS),
            (self.purpose, PURPOSE_POINTS),
            (self.setup, SETUP_POINTS),
            (self.function_docs, FUNCTION_DOC_POINTS),
            (self.error_handling, ERROR_HANDLING_POINTS),
            (self.logging, LOGGING_POINTS),
            (self.recently_updated, RECENT_UPDATE_POINTS),
        ];
        let total: u32 = points
            .iter()
            .filter(|(present, _)| *present)
            .map(|(_, pts)| u32::from(*pts))
            .sum();
        total.min(u32::from(MAX_QUALITY_SCORE)) as u8
    }
}

pub fn quality_score(text: &str, header: &ScriptHeader, today: NaiveDate, recent_days: i64) -> u8 {
    QualitySignals::detect(text, header, today, recent_days).score()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::parse_header;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
    }

    fn score(text: &str) -> u8 {
        quality_score(text, &parse_header(text), today(), 30)
    }

    const COMPLETE: &str = "/**
 * Title: Export Emails
 * Service: Gmail
 * Purpose: Archive labelled threads into a Drive folder.
 * Summary: Searches Gmail and writes each thread as a PDF.
 * Created: 2024-01-05
 * Updated: 2025-06-01
 *
 * Setup:
 * 1. Create a label named Archive.
 * 2. Run installTrigger() once.
 */

/**
 * Saves one thread.
 * @param {GmailThread} thread
 */
function saveThread(thread) {
  try {
    DriveApp.createFile(thread.getFirstMessageSubject(), thread.getPermalink());
  } catch (e) {
    Logger.log('failed: ' + e);
  }
}
";

    #[test]
    fn complete_file_scores_full_marks() {
        let signals = QualitySignals::detect(COMPLETE, &parse_header(COMPLETE), today(), 30);
        assert_eq!(
            signals,
            QualitySignals {
                header: true,
                summary: true,
                purpose: true,
                setup: true,
                function_docs: true,
                error_handling: true,
                logging: true,
                recently_updated: true,
            }
        );
        assert_eq!(signals.score(), 100);
    }

    #[test]
    fn header_setup_and_try_catch_reach_eighty() {
        let stale = COMPLETE.replace("Updated: 2025-06-01", "Updated: 2020-01-01");
        let stale = stale.replace("Logger.log", "notify");
        assert!(score(&stale) >= 80, "{}", score(&stale));
    }

    #[test]
    fn bare_file_scores_zero() {
        assert_eq!(score("function a() {\n  return 1;\n}\n"), 0);
        assert_eq!(score(""), 0);
    }

    #[test]
    fn recency_window_is_inclusive_and_ignores_future_dates() {
        let on_edge = "/* Updated: 2025-05-16 */\n";
        let too_old = "/* Updated: 2025-05-15 */\n";
        let future = "/* Updated: 2025-07-01 */\n";
        let signals = |t: &str| QualitySignals::detect(t, &parse_header(t), today(), 30);
        assert!(signals(on_edge).recently_updated);
        assert!(!signals(too_old).recently_updated);
        assert!(!signals(future).recently_updated);
    }

    #[test]
    fn shell_markers_count() {
        let src = "#!/bin/bash\n# Title: Backup\n# Usage: backup.sh DIR\nset -euo pipefail\n\n# copies files\nbackup() {\n  echo \"failed\" >&2\n}\n";
        let signals = QualitySignals::detect(src, &parse_header(src), today(), 30);
        assert!(signals.header);
        assert!(signals.setup);
        assert!(signals.error_handling);
        assert!(signals.function_docs);
        assert!(signals.logging);
        assert!(!signals.summary);
    }

    #[test]
    fn score_is_bounded() {
        for text in [COMPLETE, "", "try { } catch (e) { console.log(e) }"] {
            assert!(score(text) <= MAX_QUALITY_SCORE);
        }
    }
}
