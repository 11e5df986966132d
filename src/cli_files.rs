//! CLI file-argument expansion: turns the paths an invocation was given into loaded source
//! files. Deliberately small; glob/directory walking is the CLI's job (§1 scope), not the
//! engine's, so this uses only `std::fs` rather than pulling in a glob crate.

use crate::error::Result;
use crate::executor::SourceFile;
use std::path::{Path, PathBuf};

/// Expand `paths` (files and/or directories) into the full set of files to load, recursing into
/// directories and skipping common non-source directories.
pub fn expand(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();
    for path in paths {
        collect(path, &mut expanded)?;
    }
    expanded.sort();
    expanded.dedup();
    Ok(expanded)
}

fn collect(path: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    if path.is_file() {
        out.push(path.to_path_buf());
        return Ok(());
    }

    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let entry_path = entry.path();
            if is_skipped_dir(&entry_path) {
                continue;
            }
            collect(&entry_path, out)?;
        }
    }

    Ok(())
}

fn is_skipped_dir(path: &Path) -> bool {
    path.is_dir()
        && matches!(
            path.file_name().and_then(|n| n.to_str()),
            Some(".git") | Some("target") | Some("node_modules") | Some("dist") | Some("build")
        )
}

/// Read each expanded path into a [`SourceFile`], using the path as given (relative to the
/// invocation's working directory) as its reported identity.
pub fn load(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)?;
            Ok(SourceFile::new(path.to_string_lossy().into_owned(), content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn expand_recurses_into_directories_and_skips_target() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src/main.rs"), "fn main() {}").unwrap();
        fs::create_dir_all(tmp.path().join("target")).unwrap();
        fs::write(tmp.path().join("target/ignored.rs"), "x").unwrap();

        let expanded = expand(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(expanded, vec![tmp.path().join("src/main.rs")]);
    }

    #[test]
    fn expand_accepts_a_single_file_directly() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.rs");
        fs::write(&file, "fn main() {}").unwrap();

        let expanded = expand(&[file.clone()]).unwrap();
        assert_eq!(expanded, vec![file]);
    }

    #[test]
    fn load_reads_file_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.rs");
        fs::write(&file, "content").unwrap();

        let files = load(&[file]).unwrap();
        assert_eq!(files[0].content, "content");
    }
}
