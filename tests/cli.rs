use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("valid json report")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn adoc_insight(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("adoc-insight"));
    cmd.env_remove("ADOC_INSIGHT_FORMAT")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root);
    cmd
}

#[test]
fn structure_reports_nested_headings() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("book.adoc"),
        "= Title\n== A\n=== A1\n== B\n",
    );

    let assert = adoc_insight(temp.path())
        .arg("structure")
        .arg("book.adoc")
        .assert()
        .success();
    let report = parse_json(&assert.get_output().stdout);

    assert_eq!(report["path"], "book.adoc");
    assert_eq!(report["title"], "Title");
    assert_eq!(report["total_headings"], 3);
    assert_eq!(report["max_depth"], 2);

    let children = report["tree"]["children"].as_array().unwrap();
    let titles: Vec<_> = children.iter().map(|c| c["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["A", "B"]);
    assert_eq!(children[0]["children"][0]["title"], "A1");
}

#[test]
fn includes_follow_nested_documents() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("book.adoc"),
        "= Book\n\ninclude::chapters/one.adoc[]\n",
    );
    write_file(
        &temp.path().join("chapters/one.adoc"),
        "== One\n\ninclude::snippets/code.adoc[]\n",
    );
    write_file(&temp.path().join("chapters/snippets/code.adoc"), "code\n");

    let assert = adoc_insight(temp.path())
        .arg("includes")
        .arg("book.adoc")
        .assert()
        .success();
    let report = parse_json(&assert.get_output().stdout);

    assert_eq!(report["total_includes"], 2);
    let edge = &report["includes"][0];
    assert_eq!(edge["target"], "chapters/one.adoc");
    assert_eq!(edge["exists"], true);
    assert_eq!(edge["children"][0]["target"], "snippets/code.adoc");
    assert_eq!(edge["children"][0]["exists"], true);
    assert_eq!(edge["children"][0]["depth"], 1);
}

#[test]
fn includes_without_recursion_omit_children() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("book.adoc"), "include::a.adoc[]\n");
    write_file(&temp.path().join("a.adoc"), "include::b.adoc[]\n");

    let assert = adoc_insight(temp.path())
        .arg("includes")
        .arg("book.adoc")
        .arg("--no-recursive")
        .assert()
        .success();
    let report = parse_json(&assert.get_output().stdout);

    assert_eq!(report["recursive"], false);
    assert_eq!(report["total_includes"], 1);
    assert!(report["includes"][0].get("children").is_none());
}

#[test]
fn metadata_reads_header() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("doc.adoc"),
        "= Doc\nJane Doe <jane@x.org>\n:version: 1.0\n",
    );

    let assert = adoc_insight(temp.path())
        .arg("metadata")
        .arg("doc.adoc")
        .assert()
        .success();
    let metadata = parse_json(&assert.get_output().stdout);

    assert_eq!(metadata["title"], "Doc");
    assert_eq!(metadata["author"], "Jane Doe");
    assert_eq!(metadata["email"], "jane@x.org");
    assert_eq!(metadata["attributes"]["version"], "1.0");
    assert!(metadata["file_info"]["content_hash"].is_string());
}

#[test]
fn search_single_document_with_context() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("doc.adoc"),
        "line 1\nline 2\nthe NEEDLE\nline 4\nline 5\n",
    );

    let assert = adoc_insight(temp.path())
        .arg("search")
        .arg("needle")
        .arg("doc.adoc")
        .assert()
        .success();
    let result = parse_json(&assert.get_output().stdout);

    assert_eq!(result["total_matches"], 1);
    let m = &result["matches"][0];
    assert_eq!(m["line"], 3);
    assert_eq!(m["context_before"], serde_json::json!(["line 1", "line 2"]));
    assert_eq!(m["context_after"], serde_json::json!(["line 4", "line 5"]));
}

#[test]
fn search_case_sensitive_flag() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("doc.adoc"), "Needle\nneedle\n");

    let assert = adoc_insight(temp.path())
        .arg("search")
        .arg("Needle")
        .arg("doc.adoc")
        .arg("--case-sensitive")
        .arg("--context")
        .arg("0")
        .assert()
        .success();
    let result = parse_json(&assert.get_output().stdout);

    assert_eq!(result["total_matches"], 1);
    assert_eq!(result["matches"][0]["line"], 1);
}

#[test]
fn search_without_file_covers_root() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a.adoc"), "needle\n");
    write_file(&temp.path().join("sub/b.asciidoc"), "no match\nneedle again\n");
    write_file(&temp.path().join("c.md"), "needle in markdown\n");

    let assert = adoc_insight(temp.path())
        .arg("search")
        .arg("needle")
        .assert()
        .success();
    let result = parse_json(&assert.get_output().stdout);

    assert_eq!(result["total_matches"], 2);
    let paths: Vec<_> = result["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["a.adoc", "sub/b.asciidoc"]);
}

#[test]
fn markdown_output_without_color() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("doc.adoc"), "= Doc\n== Intro\n");

    adoc_insight(temp.path())
        .arg("--format")
        .arg("md")
        .arg("--no-color")
        .arg("structure")
        .arg("doc.adoc")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Structure of `doc.adoc`"))
        .stdout(predicate::str::contains("- Intro (line 2)"))
        .stdout(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn format_from_environment() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("doc.adoc"), "= Doc\n");

    adoc_insight(temp.path())
        .env("ADOC_INSIGHT_FORMAT", "md")
        .arg("--no-color")
        .arg("metadata")
        .arg("doc.adoc")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Metadata"));
}

#[test]
fn missing_document_fails_with_message() {
    let temp = tempdir().unwrap();

    adoc_insight(temp.path())
        .arg("structure")
        .arg("missing.adoc")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn invalid_utf8_fails_unless_lossy() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("bad.adoc"), b"= Caf\xe9\n").unwrap();

    adoc_insight(temp.path())
        .arg("metadata")
        .arg("bad.adoc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("decode"));

    let assert = adoc_insight(temp.path())
        .arg("--lossy")
        .arg("metadata")
        .arg("bad.adoc")
        .assert()
        .success();
    let metadata = parse_json(&assert.get_output().stdout);
    assert_eq!(metadata["title"], "Caf\u{fffd}");
}
