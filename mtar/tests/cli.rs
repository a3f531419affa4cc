use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn mtar(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mtar"))
        .current_dir(cwd)
        .env_remove("MTAR_LOG")
        .args(args)
        .output()
        .expect("failed to spawn mtar")
}

fn stdout(o: &Output) -> String {
    String::from_utf8_lossy(&o.stdout).into_owned()
}

fn seed(dir: &Path) {
    fs::write(dir.join("a.txt"), b"abc").unwrap();
    fs::write(dir.join("b.txt"), b"").unwrap();
}

#[test]
fn create_list_extract() {
    let td = tempfile::tempdir().unwrap();
    seed(td.path());

    let out = mtar(td.path(), &["create", "t.mtar", "a.txt", "b.txt"]);
    assert!(out.status.success(), "{out:?}");
    let text = stdout(&out);
    assert!(text.contains("a.txt  3 bytes  checksum=0x4c27"), "{text}");
    assert!(text.contains("b.txt  0 bytes  checksum=0x0000"), "{text}");

    let out = mtar(td.path(), &["t", "t.mtar"]);
    assert!(out.status.success());
    let lines: Vec<String> = stdout(&out).lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("a.txt"));

    let dest = td.path().join("out");
    let out = mtar(td.path(), &["x", "t.mtar", "-C", "out"]);
    assert!(out.status.success(), "{out:?}");
    assert!(!stdout(&out).contains("MISMATCH"));
    assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"abc");
    assert_eq!(fs::read(dest.join("b.txt")).unwrap(), b"");
}

#[test]
fn extract_reports_mismatch_and_continues() {
    let td = tempfile::tempdir().unwrap();
    seed(td.path());
    assert!(mtar(td.path(), &["c", "t.mtar", "a.txt", "b.txt"]).status.success());

    let p = td.path().join("t.mtar");
    let mut bytes = fs::read(&p).unwrap();
    let last = bytes.len() - 1;
    bytes[last] = b'Z';
    fs::write(&p, bytes).unwrap();

    let out = mtar(td.path(), &["extract", "t.mtar", "-C", "out"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.lines().any(|l| l.contains("a.txt") && l.ends_with("MISMATCH")));
    assert!(text.lines().any(|l| l.contains("b.txt") && l.ends_with("ok")));

    let out = mtar(td.path(), &["extract", "t.mtar", "-C", "strict", "--strict"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("checksum mismatch"));

    let out = mtar(td.path(), &["verify", "t.mtar"]);
    assert!(!out.status.success());
}

#[test]
fn missing_input_fails_without_archive() {
    let td = tempfile::tempdir().unwrap();
    seed(td.path());
    let out = mtar(td.path(), &["create", "t.mtar", "a.txt", "missing.txt"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot read source file"));
    assert!(!td.path().join("t.mtar").exists());
}

#[test]
fn json_listing() {
    let td = tempfile::tempdir().unwrap();
    seed(td.path());
    assert!(mtar(td.path(), &["create", "t.mtar", "a.txt", "b.txt"]).status.success());

    let out = mtar(td.path(), &["list", "t.mtar", "--json"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("\"name\": \"a.txt\""), "{text}");
    assert!(text.contains("\"data_start\": 28"), "{text}");
}
