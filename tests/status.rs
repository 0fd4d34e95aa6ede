mod common;

use common::command::{repository_dir, run_vcs_command, vcs_commit};
use common::file::write_file;
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn porcelain_output(dir: &std::path::Path) -> String {
    let output = run_vcs_command(dir, &["status", "--porcelain"])
        .assert()
        .success();
    String::from_utf8(output.get_output().stdout.clone()).unwrap()
}

#[rstest]
fn untracked_files_are_listed(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), "b.txt", "untracked");

    assert_eq!(porcelain_output(repository_dir.path()), "?? b.txt\n");
}

#[rstest]
fn staged_and_untracked_are_reported_in_their_sections(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), "a.txt", "hello\n");
    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    vcs_commit(repository_dir.path(), "first").assert().success();

    // new untracked file, modified + restaged tracked file
    write_file(repository_dir.path(), "b.txt", "new");
    write_file(repository_dir.path(), "a.txt", "hello changed\n");
    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    run_vcs_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes to be committed"))
        .stdout(predicate::str::contains("modified:"))
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("Untracked files"))
        .stdout(predicate::str::contains("b.txt"));

    let porcelain = porcelain_output(repository_dir.path());
    assert!(porcelain.contains("M  a.txt"), "got: {porcelain}");
    assert!(porcelain.contains("?? b.txt"), "got: {porcelain}");
}

#[rstest]
fn modifying_a_staged_file_reports_both_axes(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), "a.txt", "hello\n");
    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    vcs_commit(repository_dir.path(), "first").assert().success();

    write_file(repository_dir.path(), "a.txt", "hello changed\n");
    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    // modify again without staging
    write_file(repository_dir.path(), "a.txt", "hello changed again\n");

    run_vcs_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes to be committed"))
        .stdout(predicate::str::contains("Changes not staged for commit"));

    let porcelain = porcelain_output(repository_dir.path());
    assert!(porcelain.contains("MM a.txt"), "got: {porcelain}");
}

#[rstest]
fn staged_new_file_shows_as_added(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), "a.txt", "one");
    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    run_vcs_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes to be committed"))
        .stdout(predicate::str::contains("new file:"));

    assert_eq!(porcelain_output(repository_dir.path()), "A  a.txt\n");
}

#[rstest]
fn deleting_a_staged_file_shows_as_deleted(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), "a.txt", "hello\n");
    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    vcs_commit(repository_dir.path(), "first").assert().success();
    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    std::fs::remove_file(repository_dir.path().join("a.txt")).unwrap();

    let porcelain = porcelain_output(repository_dir.path());
    assert!(porcelain.contains(" D a.txt"), "got: {porcelain}");

    run_vcs_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes not staged for commit"))
        .stdout(predicate::str::contains("deleted:"));
}

#[rstest]
fn untracked_directories_are_collapsed(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), "newdir/deep/file.txt", "x");

    assert_eq!(porcelain_output(repository_dir.path()), "?? newdir/\n");
}

#[rstest]
fn empty_untracked_directories_are_not_reported(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    std::fs::create_dir_all(repository_dir.path().join("empty/inner")).unwrap();

    assert_eq!(porcelain_output(repository_dir.path()), "");

    run_vcs_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to commit, working tree clean"));
}

#[rstest]
fn ignored_files_never_appear(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), ".myignore", "*.log\n");
    write_file(repository_dir.path(), "debug.log", "noise");

    let porcelain = porcelain_output(repository_dir.path());
    assert!(!porcelain.contains("debug.log"), "got: {porcelain}");
    // the ignore file itself is reported as untracked
    assert!(porcelain.contains("?? .myignore"), "got: {porcelain}");
}
