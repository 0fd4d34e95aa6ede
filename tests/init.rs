mod common;

use common::command::{repository_dir, run_vcs_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn init_repository_successfully(repository_dir: TempDir) -> anyhow::Result<()> {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized empty repository in"));

    let vcs_dir = repository_dir.path().join(".vcs");
    assert!(vcs_dir.join("objects").is_dir());
    assert!(vcs_dir.join("refs/heads").is_dir());
    assert!(vcs_dir.join("refs/tags").is_dir());
    assert!(vcs_dir.join("index").is_file());

    let head = std::fs::read_to_string(vcs_dir.join("HEAD"))?;
    assert_eq!(head, "ref: refs/heads/master\n");

    // the default branch exists but has no commits yet
    let master = std::fs::read_to_string(vcs_dir.join("refs/heads/master"))?;
    assert_eq!(master, "");

    Ok(())
}

#[rstest]
fn init_with_explicit_path_creates_the_directory(repository_dir: TempDir) {
    let target = repository_dir.path().join("nested/project");

    run_vcs_command(repository_dir.path(), &["init", target.to_str().unwrap()])
        .assert()
        .success();

    assert!(target.join(".vcs/HEAD").is_file());
}

#[rstest]
fn init_twice_is_rejected(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[rstest]
fn commands_outside_a_repository_fail(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
