//! Expansion of user-supplied paths into the list of files to load.

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use poi_loader_fs::{PathKind, classify_path};
use walkdir::WalkDir;

use crate::SourceFormat;

/// Resolve files and directories into supported source files.
///
/// Directories are walked recursively in file-name order, following
/// symbolic links. Missing paths and files with unsupported extensions are
/// logged and skipped. The result holds each file once, in first-seen order.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use poi_loader_data::resolve_paths;
///
/// let files = resolve_paths(&[Utf8PathBuf::from("does/not/exist.csv")]);
/// assert!(files.is_empty());
/// ```
#[must_use]
pub fn resolve_paths<P: AsRef<Utf8Path>>(paths: &[P]) -> Vec<Utf8PathBuf> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for path in paths {
        for file in expand(path.as_ref()) {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }
    debug!("resolved {} supported files", files.len());
    files
}

fn expand(path: &Utf8Path) -> Vec<Utf8PathBuf> {
    match classify_path(path) {
        Ok(PathKind::File) if SourceFormat::from_path(path).is_some() => vec![path.to_path_buf()],
        Ok(PathKind::Directory) => walk(path),
        Ok(PathKind::File | PathKind::Other | PathKind::Missing) => {
            warn!("Path not found or unsupported: {path}");
            Vec::new()
        }
        Err(err) => {
            warn!("Path not found or unsupported: {path} ({err})");
            Vec::new()
        }
    }
}

fn walk(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {root}: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(file) if SourceFormat::from_path(&file).is_some() => files.push(file),
            Ok(_) => {}
            Err(path) => warn!("skipping non UTF-8 path {}", path.display()),
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    #[fixture]
    fn tree() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 path");
        for relative in [
            "b.csv",
            "a.JSON",
            "notes.txt",
            "nested/c.xml",
            "nested/deeper/d.csv",
            "nested/deeper/e.md",
        ] {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent");
            }
            fs::write(&path, "").expect("write file");
        }
        (dir, root)
    }

    fn relative(root: &Utf8Path, files: &[Utf8PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|file| file.strip_prefix(root).expect("under root").as_str().replace('\\', "/"))
            .collect()
    }

    #[rstest]
    fn walks_directories_recursively(tree: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = tree;
        let files = resolve_paths(&[&root]);
        assert_eq!(
            relative(&root, &files),
            vec!["a.JSON", "b.csv", "nested/c.xml", "nested/deeper/d.csv"]
        );
    }

    #[rstest]
    fn keeps_first_occurrence_only(tree: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = tree;
        let file = root.join("b.csv");
        let files = resolve_paths(&[file.clone(), root.clone(), file]);
        assert_eq!(
            relative(&root, &files),
            vec!["b.csv", "a.JSON", "nested/c.xml", "nested/deeper/d.csv"]
        );
    }

    #[rstest]
    fn skips_unsupported_and_missing_paths(tree: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = tree;
        let files = resolve_paths(&[root.join("notes.txt"), root.join("missing.csv")]);
        assert!(files.is_empty());
    }

    #[cfg(unix)]
    #[rstest]
    fn resolves_files_and_directories_behind_symlinks(tree: (TempDir, Utf8PathBuf)) {
        use std::os::unix::fs::symlink;

        let (_guard, root) = tree;
        let links = root.join("links");
        fs::create_dir(&links).expect("create links dir");
        symlink(root.join("b.csv"), links.join("absolute.csv")).expect("absolute link");
        symlink("../nested/c.xml", links.join("relative.xml")).expect("relative link");
        let dirlink = root.join("dirlink");
        symlink(root.join("nested/deeper"), &dirlink).expect("directory link");

        let files = resolve_paths(&[
            links.join("absolute.csv"),
            links.join("relative.xml"),
            dirlink,
        ]);

        assert_eq!(
            relative(&root, &files),
            vec!["links/absolute.csv", "links/relative.xml", "dirlink/d.csv"]
        );
    }

    #[rstest]
    fn empty_input_resolves_to_nothing() {
        let none: [Utf8PathBuf; 0] = [];
        assert!(resolve_paths(&none).is_empty());
    }
}
