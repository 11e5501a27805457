use super::*;

use std::fs;
use std::io;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, body: impl AsRef<[u8]>) -> io::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)
}

fn collect(root: &Path, options: &ScanOptions) -> (Vec<ScriptFile>, ScanStats) {
    let mut stats = ScanStats::default();
    let files = collect_script_files(&[root.to_path_buf()], options, &mut stats)
        .expect("collect succeeds");
    (files, stats)
}

fn rel_paths(files: &[ScriptFile]) -> Vec<&str> {
    files.iter().map(|f| f.rel_path.as_str()).collect()
}

#[test]
fn recognizes_shell_shebangs() {
    assert!(super::read::is_shell_shebang("#!/bin/bash"));
    assert!(super::read::is_shell_shebang("#!/bin/sh -e"));
    assert!(super::read::is_shell_shebang("#!/usr/bin/env bash"));
    assert!(super::read::is_shell_shebang("#!/usr/bin/env -S zsh"));
    assert!(!super::read::is_shell_shebang("#!/usr/bin/env python3"));
    assert!(!super::read::is_shell_shebang("#!"));
    assert!(!super::read::is_shell_shebang("# bash"));
}

#[test]
fn candidate_kind_matches_extensions_case_insensitively() {
    let options = ScanOptions::default();
    assert!(candidate_kind(Path::new("a/Main.GS"), &options).is_some());
    assert!(candidate_kind(Path::new("a/main.js"), &options).is_none());
    assert!(candidate_kind(Path::new("a/Makefile"), &options).is_none());

    let shell = ScanOptions::shell();
    let extensionless = candidate_kind(Path::new("bin/deploy"), &shell).expect("candidate");
    assert!(extensionless.needs_shebang);
    let sh = candidate_kind(Path::new("deploy.sh"), &shell).expect("candidate");
    assert!(!sh.needs_shebang);
}

#[test]
fn collects_sorted_relative_paths_with_labels() -> io::Result<()> {
    let dir = TempDir::new()?;
    write(dir.path(), "z.gs", "function z() {}\n")?;
    write(dir.path(), "a/b.gs", "function b() {}\n")?;
    write(dir.path(), "a/readme.md", "# not a script\n")?;

    let (files, stats) = collect(dir.path(), &ScanOptions::default());
    assert_eq!(rel_paths(&files), vec!["a/b.gs", "z.gs"]);
    assert_eq!(files[0].basename, "b.gs");
    assert_eq!(files[0].signature, "b()");
    assert_eq!(stats.candidate_files, 2);
    assert_eq!(stats.scanned_files, 2);
    let label = dir
        .path()
        .file_name()
        .and_then(|s| s.to_str())
        .expect("utf-8 temp name");
    assert_eq!(files[0].repo_label, label);
    Ok(())
}

#[test]
fn skips_oversized_binary_and_non_utf8_files() -> io::Result<()> {
    let dir = TempDir::new()?;
    write(dir.path(), "ok.gs", "function ok() {}\n")?;
    write(dir.path(), "big.gs", "x".repeat(64))?;
    write(dir.path(), "bin.gs", b"ab\0cd")?;
    write(dir.path(), "latin1.gs", [0x66u8, 0xe9, 0x0a])?;

    let options = ScanOptions {
        max_file_size: Some(32),
        ..ScanOptions::default()
    };
    let (files, stats) = collect(dir.path(), &options);
    assert_eq!(rel_paths(&files), vec!["ok.gs"]);
    assert_eq!(stats.candidate_files, 4);
    assert_eq!(stats.skipped_too_large, 1);
    assert_eq!(stats.skipped_binary, 1);
    assert_eq!(stats.skipped_not_utf8, 1);
    assert_eq!(stats.scanned_files, 1);
    assert_eq!(stats.scanned_bytes, 17);
    Ok(())
}

#[test]
fn binary_only_corpus_counts_nothing_as_scanned() -> io::Result<()> {
    let dir = TempDir::new()?;
    write(dir.path(), "bin.gs", b"a\0b")?;

    let (files, stats) = collect(dir.path(), &ScanOptions::default());
    assert!(files.is_empty());
    assert_eq!(stats.skipped_binary, 1);
    assert_eq!(stats.scanned_files, 0);
    assert_eq!(stats.scanned_bytes, 0);
    Ok(())
}

#[test]
fn extensionless_files_need_a_shell_shebang() -> io::Result<()> {
    let dir = TempDir::new()?;
    write(dir.path(), "bin/deploy", "#!/usr/bin/env bash\necho hi\n")?;
    write(dir.path(), "bin/data", "plain text\n")?;
    write(dir.path(), "lib.sh", "helper() { :; }\n")?;

    let (files, stats) = collect(dir.path(), &ScanOptions::shell());
    assert_eq!(rel_paths(&files), vec!["bin/deploy", "lib.sh"]);
    assert_eq!(stats.candidate_files, 2);
    assert_eq!(files[1].signature, "helper()");
    Ok(())
}

#[test]
fn max_files_budget_stops_the_walk() -> io::Result<()> {
    let dir = TempDir::new()?;
    for idx in 0..5 {
        write(dir.path(), &format!("f{idx}.gs"), format!("var x = {idx};\n"))?;
    }
    let options = ScanOptions {
        max_files: Some(2),
        ..ScanOptions::default()
    };
    let (files, stats) = collect(dir.path(), &options);
    assert_eq!(files.len(), 2);
    assert_eq!(stats.skipped_budget_max_files, 1);
    Ok(())
}

#[test]
fn multiple_roots_keep_their_ids() -> io::Result<()> {
    let first = TempDir::new()?;
    let second = TempDir::new()?;
    write(first.path(), "b.gs", "var b;\n")?;
    write(second.path(), "a.gs", "var a;\n")?;

    let mut stats = ScanStats::default();
    let files = collect_script_files(
        &[first.path().to_path_buf(), second.path().to_path_buf()],
        &ScanOptions::default(),
        &mut stats,
    )
    .expect("collect succeeds");
    let ids: Vec<(usize, &str)> = files
        .iter()
        .map(|f| (f.repo_id, f.rel_path.as_str()))
        .collect();
    assert_eq!(ids, vec![(0, "b.gs"), (1, "a.gs")]);
    Ok(())
}

#[test]
fn repo_label_falls_back_to_index() {
    assert_eq!(repo_label(Path::new("/"), 3), "repo3");
    assert_eq!(repo_label(Path::new("/tmp/project"), 0), "project");
}
