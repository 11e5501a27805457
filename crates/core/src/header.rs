use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?mi)^[\s/*#]*(title|script name|service|purpose|created|updated|last updated)\s*:\s*(.*?)\s*(?:\*/)?\s*$",
    )
    .expect("valid regex")
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptHeader {
    pub has_block: bool,
    pub title: Option<String>,
    pub service: Option<String>,
    pub purpose: Option<String>,
    pub created: Option<NaiveDate>,
    pub updated: Option<NaiveDate>,
}

fn leading_comment(text: &str) -> Option<&str> {
    let mut rest = text.trim_start_matches('\u{feff}');
    if rest.starts_with("#!") {
        rest = rest.split_once('\n').map_or("", |(_, tail)| tail);
    }
    let rest = rest.trim_start();

    if rest.starts_with("/*") {
        let end = rest.find("*/").map_or(rest.len(), |idx| idx + 2);
        return Some(&rest[..end]);
    }

    if rest.starts_with("//") || rest.starts_with('#') {
        let mut end = 0;
        for line in rest.split_inclusive('\n') {
            let trimmed = line.trim_start();
            if !(trimmed.starts_with("//") || trimmed.starts_with('#')) {
                break;
            }
            end += line.len();
        }
        return Some(&rest[..end]);
    }

    None
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let first_token = raw.split_whitespace().next().unwrap_or("");
    DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(raw, fmt)
            .or_else(|_| NaiveDate::parse_from_str(first_token, fmt))
            .ok()
    })
}

pub fn parse_header(text: &str) -> ScriptHeader {
    let Some(block) = leading_comment(text) else {
        return ScriptHeader::default();
    };

    let mut header = ScriptHeader::default();
    for caps in FIELD.captures_iter(block) {
        let value = caps[2].trim();
        if value.is_empty() {
            continue;
        }
        header.has_block = true;
        match caps[1].to_ascii_lowercase().as_str() {
            "title" | "script name" => {
                header.title.get_or_insert_with(|| value.to_string());
            }
            "service" => {
                header.service.get_or_insert_with(|| value.to_string());
            }
            "purpose" => {
                header.purpose.get_or_insert_with(|| value.to_string());
            }
            "created" => header.created = header.created.or_else(|| parse_date(value)),
            _ => header.updated = header.updated.or_else(|| parse_date(value)),
        }
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jsdoc_style_header() {
        let src = "/**\n * Title: Export Emails\n * Service: Gmail\n * Purpose: Save matching threads to Drive\n * Created: 2024-01-05\n * Updated: 2024/03/10\n */\nfunction run() {}\n";
        let header = parse_header(src);
        assert!(header.has_block);
        assert_eq!(header.title.as_deref(), Some("Export Emails"));
        assert_eq!(header.service.as_deref(), Some("Gmail"));
        assert_eq!(
            header.purpose.as_deref(),
            Some("Save matching threads to Drive")
        );
        assert_eq!(header.created, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(header.updated, NaiveDate::from_ymd_opt(2024, 3, 10));
    }

    #[test]
    fn parses_hash_header_after_shebang() {
        let src = "#!/bin/bash\n# Title: Backup\n# Updated: March 4, 2025\n\nbackup() { :; }\n";
        let header = parse_header(src);
        assert!(header.has_block);
        assert_eq!(header.title.as_deref(), Some("Backup"));
        assert_eq!(header.updated, NaiveDate::from_ymd_opt(2025, 3, 4));
    }

    #[test]
    fn fields_outside_the_leading_block_are_ignored() {
        let src = "function a() {}\n/* Title: Late */\n";
        assert_eq!(parse_header(src), ScriptHeader::default());
    }

    #[test]
    fn single_line_block_comment() {
        let header = parse_header("/* Updated: 01/31/2025 */\nvar x;");
        assert_eq!(header.updated, NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn date_with_trailing_note() {
        assert_eq!(
            parse_date("2024-12-01 (refactor)"),
            NaiveDate::from_ymd_opt(2024, 12, 1)
        );
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn plain_comment_is_not_a_header() {
        let header = parse_header("// helper functions\nfunction a() {}\n");
        assert!(!header.has_block);
    }
}
