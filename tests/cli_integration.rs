use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn draftpad(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("draftpad").unwrap();
    cmd.env("DRAFTPAD_HOME", home)
        .env_remove("DRAFTPAD_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn empty_store_lists_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    draftpad(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No documents found."));
}

#[test]
fn edit_session_saves_with_derived_title() {
    let temp_dir = tempfile::tempdir().unwrap();

    draftpad(temp_dir.path())
        .arg("edit")
        .write_stdin("# Groceries\n- milk\n:save\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved \"Groceries\""));

    draftpad(temp_dir.path())
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"));

    draftpad(temp_dir.path())
        .args(["view", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- milk"));
}

#[test]
fn rename_and_delete_by_index() {
    let temp_dir = tempfile::tempdir().unwrap();
    draftpad(temp_dir.path())
        .arg("edit")
        .write_stdin("body text\n:save Groceries\n")
        .assert()
        .success();

    draftpad(temp_dir.path())
        .args(["rename", "1", "Weekly", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed to \"Weekly shop\""));

    draftpad(temp_dir.path())
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Document deleted: Weekly shop"));

    draftpad(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No documents found."));
}

#[test]
fn unsaved_text_is_recovered_on_next_edit() {
    let temp_dir = tempfile::tempdir().unwrap();

    draftpad(temp_dir.path())
        .arg("edit")
        .write_stdin("an unsaved thought\n")
        .assert()
        .success();

    draftpad(temp_dir.path())
        .arg("recover")
        .assert()
        .success()
        .stdout(predicate::str::contains("an unsaved thought"));

    draftpad(temp_dir.path())
        .arg("edit")
        .write_stdin(":status\n:quit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Recovered unsaved text")
                .and(predicate::str::contains("unsaved draft"))
                .and(predicate::str::contains("unsaved changes")),
        );
}

#[test]
fn save_and_open_persists_edits_before_switching() {
    let temp_dir = tempfile::tempdir().unwrap();
    let script = "\
first doc
:save One
:new
second
:save Two
:open One
edited
:open Two
:save-open
:quit
";

    draftpad(temp_dir.path())
        .arg("edit")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Unsaved changes")
                .and(predicate::str::contains("Saved \"first doc\"")),
        );

    draftpad(temp_dir.path())
        .args(["view", "first doc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first doc\nedited"));
}

#[test]
fn editor_renames_without_touching_the_buffer() {
    let temp_dir = tempfile::tempdir().unwrap();
    draftpad(temp_dir.path())
        .arg("edit")
        .write_stdin("# Draft\nbody\n:save\n:rename 1 Final copy\n:status\n:quit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Renamed to \"Final copy\"")
                .and(predicate::str::contains("no unsaved changes")),
        );

    draftpad(temp_dir.path())
        .args(["view", "Final copy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Draft\nbody"));
}

#[test]
fn editor_keeps_going_after_bad_input() {
    let temp_dir = tempfile::tempdir().unwrap();
    draftpad(temp_dir.path())
        .arg("edit")
        .write_stdin(":bogus\n:open 9\nhello\n:save\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Unknown command :bogus")
                .and(predicate::str::contains("No document matches 9"))
                .and(predicate::str::contains("Saved \"hello\"")),
        );
}

#[test]
fn render_prints_html() {
    let temp_dir = tempfile::tempdir().unwrap();
    let file = temp_dir.path().join("note.md");
    std::fs::write(&file, "# Title\n\n**bold** and ~~gone~~").unwrap();

    draftpad(temp_dir.path())
        .arg("render")
        .arg(&file)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("<h1>Title</h1>")
                .and(predicate::str::contains("<strong>bold</strong>"))
                .and(predicate::str::contains("<del>gone</del>")),
        );
}

#[test]
fn config_round_trip_and_bad_key() {
    let temp_dir = tempfile::tempdir().unwrap();

    draftpad(temp_dir.path())
        .args(["config", "preview-debounce", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("preview-debounce set to 50"));

    draftpad(temp_dir.path())
        .args(["config", "preview-debounce"])
        .assert()
        .success()
        .stdout(predicate::str::contains("preview-debounce = 50"));

    draftpad(temp_dir.path())
        .args(["config", "colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn unknown_selector_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    draftpad(temp_dir.path())
        .args(["view", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No document matches 3"));
}
