use derive_new::new;
use fake::Fake;
use fake::faker::lorem::en::{Word, Words};
use std::path::{Path, PathBuf};

/// A file to materialize in a test repository.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
}

/// Write a file under `dir`, creating parent directories as needed.
/// Returns the repository-relative path.
pub fn write_file(dir: &Path, rel: &str, content: &str) -> FileSpec {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    std::fs::write(&path, content).expect("Failed to write file");

    FileSpec::new(PathBuf::from(rel), content.to_string())
}

/// Generate `count` files with random names and content at the top level of
/// `dir`.
pub fn write_generated_files(dir: &Path, count: usize) -> Vec<FileSpec> {
    (0..count)
        .map(|i| {
            let name = format!("{}-{i}.txt", Word().fake::<String>());
            let content = Words(5..10).fake::<Vec<String>>().join(" ");
            write_file(dir, &name, &content)
        })
        .collect()
}
