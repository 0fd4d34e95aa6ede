mod common;

use common::command::{
    branch_tip, load_index, open_database, repository_dir, run_vcs_command, vcs_commit,
};
use common::file::write_file;
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;
use vcs::artifacts::hasher;
use vcs::artifacts::objects::object_type::ObjectType;

#[rstest]
fn first_commit_writes_blob_tree_and_commit(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), "a.txt", "hello\n");

    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    vcs_commit(repository_dir.path(), "first")
        .assert()
        .success()
        .stdout(predicate::str::contains("(root-commit) "))
        .stdout(predicate::str::contains("first"));

    let database = open_database(repository_dir.path());

    // the blob is stored under the identity of its framed form
    let blob_oid = hasher::hash_object(ObjectType::Blob, b"hello\n");
    assert!(database.exists(&blob_oid));

    // the branch points at the new commit, which has no parent
    let commit_oid = branch_tip(repository_dir.path(), "master").expect("branch has a tip");
    let commit = database
        .parse_object_as_commit(&commit_oid)
        .unwrap()
        .expect("tip is a commit");
    assert_eq!(commit.parent(), None);
    assert_eq!(commit.message(), "first");

    // the root tree holds exactly the committed file
    let tree = database
        .parse_object_as_tree(commit.tree_oid())
        .unwrap()
        .expect("commit names a tree");
    let names: Vec<_> = tree.entries().map(|(name, _)| name.clone()).collect();
    assert_eq!(names, vec!["a.txt".to_string()]);
    assert_eq!(tree.record("a.txt").unwrap().oid, blob_oid);

    // the staging area was emptied by the commit
    assert_eq!(load_index(repository_dir.path()).len(), 0);
}

#[rstest]
fn commit_on_an_empty_index_is_rejected(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    vcs_commit(repository_dir.path(), "x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));

    // repository state is unchanged: branch still unborn, no objects
    assert_eq!(branch_tip(repository_dir.path(), "master"), None);
    assert_eq!(common::command::count_objects(repository_dir.path()), 0);
}

#[rstest]
fn nested_directories_become_nested_trees(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), "1.txt", "one");
    write_file(repository_dir.path(), "a/2.txt", "two");
    write_file(repository_dir.path(), "a/b/3.txt", "three");

    run_vcs_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    vcs_commit(repository_dir.path(), "nested").assert().success();

    let database = open_database(repository_dir.path());
    let commit_oid = branch_tip(repository_dir.path(), "master").unwrap();
    let tree_oid = database.read_commit_tree_oid(&commit_oid).unwrap();

    let mut flat = std::collections::BTreeMap::new();
    database
        .read_tree_flat(&tree_oid, Path::new(""), &mut flat)
        .unwrap();

    let paths: Vec<_> = flat.keys().cloned().collect();
    assert_eq!(
        paths,
        vec![
            std::path::PathBuf::from("1.txt"),
            std::path::PathBuf::from("a/2.txt"),
            std::path::PathBuf::from("a/b/3.txt"),
        ]
    );
    assert_eq!(
        flat.get(Path::new("a/b/3.txt")).unwrap().oid,
        hasher::hash_object(ObjectType::Blob, b"three")
    );
}

#[rstest]
fn second_commit_records_the_first_as_parent(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), "a.txt", "one");
    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    vcs_commit(repository_dir.path(), "first").assert().success();

    let first_oid = branch_tip(repository_dir.path(), "master").unwrap();

    write_file(repository_dir.path(), "a.txt", "two");
    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    vcs_commit(repository_dir.path(), "second")
        .assert()
        .success()
        .stdout(predicate::str::contains("(root-commit)").not());

    let second_oid = branch_tip(repository_dir.path(), "master").unwrap();
    assert_ne!(first_oid, second_oid);

    let commit = open_database(repository_dir.path())
        .parse_object_as_commit(&second_oid)
        .unwrap()
        .unwrap();
    assert_eq!(commit.parent(), Some(&first_oid));
}

/// Staging the same files in two different orders across two fresh
/// repositories must produce bit-equal root trees.
#[rstest]
fn tree_hashes_are_deterministic_across_repositories() {
    let build = |order: &[&str], date: &str| {
        let dir = TempDir::new().unwrap();
        run_vcs_command(dir.path(), &["init"]).assert().success();
        write_file(dir.path(), "a", "alpha");
        write_file(dir.path(), "b/c", "charlie");
        write_file(dir.path(), "b/d", "delta");

        for path in order {
            run_vcs_command(dir.path(), &["add", path]).assert().success();
        }

        let mut commit = run_vcs_command(dir.path(), &["commit", "-m", "snapshot"]);
        commit.envs(vec![
            ("VCS_AUTHOR_NAME", "someone"),
            ("VCS_AUTHOR_EMAIL", "someone@localhost"),
            ("VCS_AUTHOR_DATE", date),
        ]);
        commit.assert().success();

        let commit_oid = branch_tip(dir.path(), "master").unwrap();
        open_database(dir.path())
            .read_commit_tree_oid(&commit_oid)
            .unwrap()
    };

    let first = build(&["a", "b/c", "b/d"], "2023-01-01 12:00:00 +0000");
    let second = build(&["b/d", "a", "b/c"], "2024-06-15 08:30:00 +0200");

    assert_eq!(first, second);
}

#[rstest]
fn commit_message_is_trimmed(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(repository_dir.path(), "a.txt", "one");
    run_vcs_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    vcs_commit(repository_dir.path(), "  padded message \n")
        .assert()
        .success();

    let commit_oid = branch_tip(repository_dir.path(), "master").unwrap();
    let commit = open_database(repository_dir.path())
        .parse_object_as_commit(&commit_oid)
        .unwrap()
        .unwrap();
    assert_eq!(commit.message(), "padded message");
}
