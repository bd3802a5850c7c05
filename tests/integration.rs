// Every test runs the binary against a throwaway project directory.
use std::{fs, path::Path};

use predicates::prelude::*;

fn kaigyo(project: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("kaigyo").unwrap();
    cmd.current_dir(project).arg("--project").arg(project);
    cmd
}

#[test]
fn convert_tree_to_lf() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join(".kaigyo")).unwrap();
    fs::write(root.join("src").join("main.rs"), b"a\r\nb\nc\rd").unwrap();
    fs::write(root.join("src").join("locked.txt"), b"a\r\nb\r\n").unwrap();
    fs::write(root.join(".git").join("HEAD"), b"ref\r\n").unwrap();
    fs::write(root.join(".kaigyo").join("notes.md"), b"x\r\n").unwrap();
    let mut permissions = fs::metadata(root.join("src").join("locked.txt"))
        .unwrap()
        .permissions();
    permissions.set_readonly(true);
    fs::set_permissions(root.join("src").join("locked.txt"), permissions).unwrap();

    kaigyo(root)
        .arg("convert")
        .arg("--to")
        .arg("lf")
        .arg(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("main.rs"))
        .stdout(predicate::str::contains("1 converted to LF"));

    assert_eq!(
        fs::read(root.join("src").join("main.rs")).unwrap(),
        b"a\nb\nc\nd".to_vec()
    );
    assert_eq!(
        fs::read(root.join("src").join("locked.txt")).unwrap(),
        b"a\r\nb\r\n".to_vec()
    );
    assert_eq!(fs::read(root.join(".git").join("HEAD")).unwrap(), b"ref\r\n".to_vec());
    assert_eq!(
        fs::read(root.join(".kaigyo").join("notes.md")).unwrap(),
        b"x\r\n".to_vec()
    );
}

#[test]
fn convert_uses_configured_separator() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".kaigyo")).unwrap();
    fs::write(root.join(".kaigyo").join("config.toml"), "separator = \"crlf\"\n").unwrap();
    fs::write(root.join("a.txt"), b"one\ntwo\n").unwrap();
    fs::write(root.join("b.txt"), b"abc").unwrap();

    kaigyo(root).arg("convert").arg(root).assert().success();

    assert_eq!(fs::read(root.join("a.txt")).unwrap(), b"one\r\ntwo\r\n".to_vec());
    assert_eq!(fs::read(root.join("b.txt")).unwrap(), b"abc".to_vec());
}

#[test]
fn convert_without_separator_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"one\n").unwrap();

    kaigyo(dir.path())
        .arg("convert")
        .arg(dir.path().join("a.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No target line separator given"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"one\r\n").unwrap();
    fs::write(dir.path().join("b.txt"), b"two\r\n").unwrap();

    kaigyo(dir.path())
        .arg("convert")
        .arg("--to")
        .arg("cr")
        .arg("--dry-run")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("would convert"))
        .stdout(predicate::str::contains("2 would be converted to CR"));

    assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"one\r\n".to_vec());
}

#[test]
fn single_matching_file_is_not_converted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"one\nmixed\r\n").unwrap();

    kaigyo(dir.path())
        .arg("convert")
        .arg("--to")
        .arg("lf")
        .arg(dir.path().join("a.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("already uses"));

    assert_eq!(
        fs::read(dir.path().join("a.txt")).unwrap(),
        b"one\nmixed\r\n".to_vec()
    );
}

#[test]
fn convert_without_paths_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();

    kaigyo(dir.path())
        .arg("convert")
        .arg("--to")
        .arg("lf")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing selected"));
}

#[test]
fn unknown_separator_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    kaigyo(dir.path())
        .arg("convert")
        .arg("--to")
        .arg("nel")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown line separator"));
}

#[test]
fn detect_reports_dominant_and_mixed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("crlf.txt"), b"a\r\nb\r\n").unwrap();
    fs::write(dir.path().join("mixed.txt"), b"a\r\nb\nc\n").unwrap();
    fs::write(dir.path().join("plain.txt"), b"abc").unwrap();

    kaigyo(dir.path())
        .arg("detect")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("crlf.txt: "))
        .stdout(predicate::str::contains("mixed: CRLF 1, LF 2, CR 0"))
        .stdout(predicate::str::contains("plain.txt: "));
}
