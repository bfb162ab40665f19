//! Hygiene: enforces coding standards at test time.
//!
//! Scans the board crate's production sources for antipatterns. Each pattern
//! has a budget (ideally zero). If you must add one, fix an existing one
//! first; the budget never grows.

use std::fs;
use std::path::{Path, PathBuf};

/// Pattern, budget, and why it is banned.
const BUDGETS: &[(&str, usize, &str)] = &[
    // Panics crash the page.
    (".unwrap()", 0, "panics on None/Err"),
    (".expect(", 0, "panics on None/Err"),
    ("panic!(", 0, "aborts the wasm instance"),
    ("unreachable!(", 0, "aborts the wasm instance"),
    ("todo!(", 0, "unfinished stub"),
    ("unimplemented!(", 0, "unfinished stub"),
    // Silent loss discards errors without inspecting them.
    ("let _ =", 0, "drops a Result unseen"),
    (".ok()", 0, "drops the error value"),
    // Output goes through the `log` facade.
    ("println!(", 0, "bypasses the log facade"),
    ("eprintln!(", 0, "bypasses the log facade"),
    ("dbg!(", 0, "debug leftover"),
    // Structure.
    ("#[allow(dead_code)]", 0, "hides unused code"),
];

/// Production `.rs` files under `src/`, excluding `*_test.rs`.
fn source_files() -> Vec<(PathBuf, String)> {
    let mut files = Vec::new();
    collect(Path::new("src"), &mut files);
    files
}

fn collect(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let is_rs = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.to_string_lossy().ends_with("_test.rs");
        if is_rs && !is_test {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((path, content));
            }
        }
    }
}

fn hits(files: &[(PathBuf, String)], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|(path, content)| {
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(move |(idx, _)| format!("  {}:{}", path.display(), idx + 1))
        })
        .collect()
}

fn check(pattern: &str) {
    let Some(&(_, budget, reason)) = BUDGETS.iter().find(|(p, _, _)| *p == pattern) else {
        panic!("no budget for {pattern}");
    };
    let found = hits(&source_files(), pattern);
    assert!(
        found.len() <= budget,
        "`{pattern}` budget exceeded ({reason}): found {}, max {budget}.\n{}",
        found.len(),
        found.join("\n")
    );
}

#[test]
fn sources_are_found() {
    assert!(source_files().iter().any(|(p, _)| p.ends_with("lib.rs")));
}

#[test]
fn unwrap_budget() {
    check(".unwrap()");
}

#[test]
fn expect_budget() {
    check(".expect(");
}

#[test]
fn panic_budget() {
    check("panic!(");
}

#[test]
fn unreachable_budget() {
    check("unreachable!(");
}

#[test]
fn todo_budget() {
    check("todo!(");
}

#[test]
fn unimplemented_budget() {
    check("unimplemented!(");
}

#[test]
fn silent_discard_budget() {
    check("let _ =");
}

#[test]
fn dot_ok_budget() {
    check(".ok()");
}

#[test]
fn print_budget() {
    check("println!(");
    check("eprintln!(");
    check("dbg!(");
}

#[test]
fn allow_dead_code_budget() {
    check("#[allow(dead_code)]");
}
