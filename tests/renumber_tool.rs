use std::fs;

use cube_steps::renumber::renumber_dir;

#[test]
fn renumber_rewrites_names_and_contents() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("snapshot_07");
    fs::create_dir(&dir).unwrap();
    fs::write(
        dir.join("snapshot_06.sln"),
        "Project(\"snapshot_06\") = \"snapshot_06.csproj\"",
    )
    .unwrap();
    fs::write(
        dir.join("snapshot_06.csproj"),
        "<AssemblyName>snapshot_06</AssemblyName>",
    )
    .unwrap();
    fs::write(dir.join("notes.md"), "scratch notes about snapshot_06").unwrap();

    let rewritten = renumber_dir(&dir, "snapshot").unwrap();
    assert_eq!(rewritten.len(), 2);

    assert!(dir.join("snapshot_07.sln").exists());
    assert!(dir.join("snapshot_07.csproj").exists());
    assert!(!dir.join("snapshot_06.sln").exists());
    assert!(!dir.join("snapshot_06.csproj").exists());

    let sln = fs::read_to_string(dir.join("snapshot_07.sln")).unwrap();
    assert!(sln.contains("snapshot_07.csproj"));
    assert!(!sln.contains("snapshot_06"));

    // Files without the numbered stem are left exactly as they were.
    assert_eq!(
        fs::read_to_string(dir.join("notes.md")).unwrap(),
        "scratch notes about snapshot_06"
    );
}

#[test]
fn renumber_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("snapshot_04");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("snapshot_02.sln"), "snapshot_02").unwrap();

    renumber_dir(&dir, "snapshot").unwrap();
    let first = fs::read_to_string(dir.join("snapshot_04.sln")).unwrap();

    renumber_dir(&dir, "snapshot").unwrap();
    let second = fs::read_to_string(dir.join("snapshot_04.sln")).unwrap();

    assert_eq!(first, "snapshot_04");
    assert_eq!(first, second);
}

#[test]
fn renumber_requires_a_numbered_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("no-number-here");
    fs::create_dir(&dir).unwrap();

    let err = renumber_dir(&dir, "snapshot").unwrap_err().to_string();
    assert!(err.contains("two-digit"), "unexpected error: {err}");
}
