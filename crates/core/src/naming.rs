use std::sync::LazyLock;

use regex::Regex;

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_\s]+").expect("valid regex"));

static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(?:v\d+|copy|alt|\d+)$").expect("valid regex"));

fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Lower-cases, collapses `-`/`_`/whitespace runs to one hyphen, drops one known
/// service prefix and any trailing version markers (`-v2`, `-copy`, `-alt`, `-1`).
pub fn normalize_basename(name: &str, service_prefixes: &[String]) -> String {
    let stem = file_stem(name).to_lowercase();
    let collapsed = SEPARATOR_RUN.replace_all(&stem, "-").into_owned();
    let mut key: &str = collapsed.trim_matches('-');

    for prefix in service_prefixes {
        let prefix = prefix.trim_end_matches('-').to_lowercase();
        if prefix.is_empty() {
            continue;
        }
        if let Some(rest) = key.strip_prefix(prefix.as_str())
            && let Some(rest) = rest.strip_prefix('-')
            && !rest.is_empty()
        {
            key = rest;
            break;
        }
    }

    let mut key = key.to_string();
    while let Some(m) = VERSION_SUFFIX.find(&key) {
        if m.start() == 0 {
            break;
        }
        key.truncate(m.start());
    }

    if key.is_empty() { stem } else { key }
}
