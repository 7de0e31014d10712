use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_apiref")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn mode(dir: &str, label: &str) -> String {
    format!("{}={}", fixture_path(dir), label)
}

fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

// -- single mode --

#[test]
fn rust_single_mode_matches_expected() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-e", "rust", "-o", out.path().to_str().unwrap()])
        .args(["-m", &mode("rust/sync", "sync")])
        .arg(fixture_path("rust/sync"))
        .assert()
        .success();

    let output = fs::read_to_string(out.path().join("sync/Connection.adoc")).unwrap();
    let expected = fs::read_to_string(fixture_path("rust/sync.expected.adoc")).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn end_to_end_open_method() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-e", "rust", "-o", out.path().to_str().unwrap()])
        .args(["-m", &mode("rust/sync", "sync")])
        .arg(fixture_path("rust/sync"))
        .assert()
        .success();

    let output = fs::read_to_string(out.path().join("sync/Connection.adoc")).unwrap();
    assert!(output.contains("[#_struct_connection_method_open]\n==== open\n"));
    assert!(output.contains("----\npub fn open(uri: String) -> Result\n----"));
    assert!(output.contains("a| `uri` a| The address (host:port) on which the TypeDB Server is running a| `String` a|"));
    assert!(output.contains(".Returns\n[source,rust]\n----\nResult\n----"));
}

#[test]
fn repeated_runs_are_identical() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    for out in [&first, &second] {
        cmd()
            .args(["-e", "rust", "-o", out.path().to_str().unwrap()])
            .args(["-m", &mode("rust/sync", "sync")])
            .args(["-m", &mode("rust/async", "async")])
            .arg(fixture_path("rust/sync"))
            .arg(fixture_path("rust/async"))
            .assert()
            .success();
    }

    let names = list_files(first.path());
    assert_eq!(names, list_files(second.path()));
    for name in names {
        let a = fs::read(first.path().join(&name)).unwrap();
        let b = fs::read(second.path().join(&name)).unwrap();
        assert_eq!(a, b, "{} differs between runs", name);
    }
}

// -- two modes --

#[test]
fn two_modes_merge_into_output_root() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-e", "rust", "-o", out.path().to_str().unwrap()])
        .args(["-m", &mode("rust/sync", "sync")])
        .args(["-m", &mode("rust/async", "async")])
        .arg(fixture_path("rust/sync"))
        .arg(fixture_path("rust/async"))
        .assert()
        .success();

    // Runtime exists only in the secondary mode
    assert_eq!(list_files(out.path()), vec!["Connection.adoc"]);

    let output = fs::read_to_string(out.path().join("Connection.adoc")).unwrap();
    assert_eq!(output.matches("[#_struct_connection_method_open]").count(), 1);
    assert!(output.contains("[tabs]\n====\nsync::\n+\n--\n[source,rust]\n----\npub fn open(uri: String) -> Result"));
    assert!(output.contains("async::\n+\n--\n[source,rust]\n----\npub async fn open(uri: String) -> Result"));
    // close is identical in both modes
    assert!(output.contains("==== close\n\n[source,rust]\n----\npub fn close(self)\n----"));
    assert!(!output.contains("Only available"));
}

#[test]
fn swapped_modes_render_secondary_only_symbol() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-e", "rust", "-o", out.path().to_str().unwrap()])
        .args(["-m", &mode("rust/async", "async")])
        .args(["-m", &mode("rust/sync", "sync")])
        .arg(fixture_path("rust/async"))
        .arg(fixture_path("rust/sync"))
        .assert()
        .success();

    assert_eq!(
        list_files(out.path()),
        vec!["Connection.adoc", "Runtime.adoc"]
    );
    // The primary mode's variant comes first
    let output = fs::read_to_string(out.path().join("Connection.adoc")).unwrap();
    assert!(output.contains("[tabs]\n====\nasync::\n"));
}

// -- failures --

#[test]
fn inconsistent_signature_fails_without_output() {
    let out = TempDir::new().unwrap();
    let target = out.path().join("docs");

    cmd()
        .args(["-e", "rust", "-o", target.to_str().unwrap()])
        .args(["-m", &mode("rust/inconsistent", "sync")])
        .arg(fixture_path("rust/inconsistent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout"));

    assert!(!target.exists());
}

#[test]
fn inconsistent_signature_fails_in_keep_going_mode() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-e", "rust", "--keep-going", "-o", out.path().to_str().unwrap()])
        .args(["-m", &mode("rust/sync", "sync")])
        .args(["-m", &mode("rust/inconsistent", "broken")])
        .arg(fixture_path("rust/sync"))
        .arg(fixture_path("rust/inconsistent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 page(s) failed to parse"));

    assert!(list_files(out.path()).is_empty());
}

#[test]
fn missing_mode_is_rejected() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-e", "rust", "-o", out.path().to_str().unwrap()])
        .arg(fixture_path("rust/sync"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing --mode"));
}

#[test]
fn three_inputs_are_rejected() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-e", "rust", "-o", out.path().to_str().unwrap()])
        .args(["-m", &mode("rust/sync", "a")])
        .args(["-m", &mode("rust/async", "b")])
        .args(["-m", &mode("rust/inconsistent", "c")])
        .arg(fixture_path("rust/sync"))
        .arg(fixture_path("rust/async"))
        .arg(fixture_path("rust/inconsistent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("one or two input directories"));
}

#[test]
fn unknown_ecosystem_is_rejected() {
    cmd()
        .args(["-e", "cobol", "-o", "out"])
        .args(["-m", &mode("rust/sync", "sync")])
        .arg(fixture_path("rust/sync"))
        .assert()
        .failure();
}

// -- other ecosystems --

#[test]
fn python_module_page() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-e", "python", "-o", out.path().to_str().unwrap()])
        .args(["-m", &mode("python", "default")])
        .arg(fixture_path("python"))
        .assert()
        .success();

    let dir = out.path().join("default");
    assert_eq!(list_files(&dir), vec!["Driver.adoc", "TransactionType.adoc"]);

    let driver = fs::read_to_string(dir.join("Driver.adoc")).unwrap();
    assert!(driver.starts_with("[#_driver]\n=== Driver\n"));
    assert!(driver.contains("----\nopen(address: str, timeout: int = 30) -> Session\n----"));
    assert!(driver.contains("a| `timeout` a| Seconds to wait a| `int` a| `30`"));
    assert!(driver.contains("[source,python]"));

    let kind = fs::read_to_string(dir.join("TransactionType.adoc")).unwrap();
    assert!(kind.contains("a| `READ` a| `0`"));
}

#[test]
fn java_type_page() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-e", "java", "-o", out.path().to_str().unwrap()])
        .args(["-m", &mode("java", "default")])
        .arg(fixture_path("java"))
        .assert()
        .success();

    let dir = out.path().join("default");
    assert_eq!(list_files(&dir), vec!["Driver.adoc"]);

    let driver = fs::read_to_string(dir.join("Driver.adoc")).unwrap();
    assert!(driver.contains("[#_driver_session_java_lang_string_java_util_map_]"));
    assert!(driver.contains(".Implementors\n* `CloudDriver`\n* `DriverImpl`"));
    assert!(driver.contains("[source,java]"));
}
