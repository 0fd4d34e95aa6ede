use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const TEST_AUTHOR_NAME: &str = "fake_user";
pub const TEST_AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const TEST_AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one committed file at the root and two nested ones.
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    crate::common::file::write_file(repository_dir.path(), "1.txt", "one");
    crate::common::file::write_file(repository_dir.path(), "a/2.txt", "two");
    crate::common::file::write_file(repository_dir.path(), "a/b/3.txt", "three");

    run_vcs_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    vcs_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_vcs_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("vcs").expect("Failed to find vcs binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// `vcs commit -m <message>` with a pinned identity and timestamp so object
/// ids are reproducible across runs.
pub fn vcs_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_vcs_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("VCS_AUTHOR_NAME", TEST_AUTHOR_NAME),
        ("VCS_AUTHOR_EMAIL", TEST_AUTHOR_EMAIL),
        ("VCS_AUTHOR_DATE", TEST_AUTHOR_DATE),
    ]);
    cmd
}

/// Load the on-disk index of a repository for assertions.
pub fn load_index(dir: &Path) -> vcs::areas::index::Index {
    let mut index =
        vcs::areas::index::Index::new(dir.join(".vcs/index").into_boxed_path());
    index.load().expect("Failed to load index");
    index
}

/// Open the object database of a repository for assertions.
pub fn open_database(dir: &Path) -> vcs::areas::database::Database {
    vcs::areas::database::Database::new(dir.join(".vcs/objects").into_boxed_path())
}

/// Read the commit id at the tip of a branch.
pub fn branch_tip(dir: &Path, branch: &str) -> Option<vcs::artifacts::objects::object_id::ObjectId> {
    let refs = vcs::areas::refs::Refs::new(dir.join(".vcs").into_boxed_path());
    refs.read_branch_tip(branch).expect("Failed to read branch")
}

/// Count every object file materialized in the database.
pub fn count_objects(dir: &Path) -> usize {
    walkdir::WalkDir::new(dir.join(".vcs/objects"))
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .count()
}
