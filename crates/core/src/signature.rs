use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::ScriptKind;

static JS_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfunction\s+([A-Za-z_$][\w$]*)\s*\(([^(){}]*)\)\s*\{").expect("valid regex")
});

static SHELL_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:function[ \t]+([A-Za-z_][\w-]*)[ \t]*(?:\(\))?|([A-Za-z_][\w-]*)[ \t]*\(\))[ \t]*\{",
    )
    .expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionSignature {
    pub name: String,
    pub params: String,
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params)
    }
}

fn normalize_params(raw: &str) -> String {
    raw.split(',')
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn extract_signatures(text: &str) -> Vec<FunctionSignature> {
    JS_FUNCTION
        .captures_iter(text)
        .map(|caps| FunctionSignature {
            name: caps[1].to_string(),
            params: normalize_params(&caps[2]),
        })
        .collect()
}

pub fn extract_shell_signatures(text: &str) -> Vec<FunctionSignature> {
    SHELL_FUNCTION
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|name| FunctionSignature {
            name: name.as_str().to_string(),
            params: String::new(),
        })
        .collect()
}

pub fn signatures_for(kind: ScriptKind, text: &str) -> Vec<FunctionSignature> {
    match kind {
        ScriptKind::AppsScript => extract_signatures(text),
        ScriptKind::Shell => extract_shell_signatures(text),
    }
}

/// Sorted, de-duplicated, pipe-joined `name(params)` list. Empty input yields `""`.
pub fn signature_key(signatures: &[FunctionSignature]) -> String {
    let mut keys: Vec<String> = signatures.iter().map(ToString::to_string).collect();
    keys.sort();
    keys.dedup();
    keys.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_names_and_normalized_params_in_order() {
        let src = "function onOpen() {\n}\n\nfunction exportEmails( query ,\n   limit ) {\n  return 1;\n}\n";
        let sigs = extract_signatures(src);
        let rendered: Vec<String> = sigs.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["onOpen()", "exportEmails(query, limit)"]);
    }

    #[test]
    fn key_is_sorted_and_pipe_joined() {
        let src = "function zeta(a) {}\nfunction alpha() {}\nfunction zeta(a) {}\n";
        assert_eq!(
            signature_key(&extract_signatures(src)),
            "alpha()|zeta(a)"
        );
    }

    #[test]
    fn no_functions_means_empty_key() {
        assert_eq!(signature_key(&extract_signatures("var x = 1;")), "");
    }

    #[test]
    fn unbalanced_input_degrades_without_panicking() {
        let src = "function broken(a, b {\n function ok(x) {\n";
        let sigs = extract_signatures(src);
        assert_eq!(sigs.len(), 1);
        assert_eq!(sigs[0].to_string(), "ok(x)");
    }

    #[test]
    fn ignores_function_expressions_without_names() {
        let src = "var f = function (a) { return a; };\nfunction named(b) {}\n";
        let rendered: Vec<String> = extract_signatures(src)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, vec!["named(b)"]);
    }

    #[test]
    fn shell_functions_in_both_forms() {
        let src = "#!/bin/bash\nbackup() {\n  :\n}\nfunction cleanup {\n  :\n}\nfunction deploy_all() {\n}\n";
        let rendered: Vec<String> = extract_shell_signatures(src)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, vec!["backup()", "cleanup()", "deploy_all()"]);
    }
}
