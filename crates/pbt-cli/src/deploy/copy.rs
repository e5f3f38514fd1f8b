//! File and tree copies with exclude patterns

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Gitignore-style patterns naming files that are never deployed
pub struct ExcludeFilter {
    root: PathBuf,
    matcher: Gitignore,
}

impl ExcludeFilter {
    /// Build a filter whose patterns are relative to `root`. Invalid
    /// patterns are logged and ignored.
    pub fn new(root: &Path, patterns: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                warn!("Ignoring invalid exclude pattern '{}': {}", pattern, e);
            }
        }
        let matcher = builder.build().unwrap_or_else(|e| {
            warn!("Exclude patterns could not be compiled: {}", e);
            Gitignore::empty()
        });
        ExcludeFilter {
            root: root.to_path_buf(),
            matcher,
        }
    }

    pub fn empty() -> Self {
        ExcludeFilter {
            root: PathBuf::new(),
            matcher: Gitignore::empty(),
        }
    }

    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        if self.matcher.is_empty() {
            return false;
        }
        match path.strip_prefix(&self.root) {
            Ok(relative) if !relative.as_os_str().is_empty() => self
                .matcher
                .matched_path_or_any_parents(relative, is_dir)
                .is_ignore(),
            // Outside the project: match on the name alone
            _ => path
                .file_name()
                .is_some_and(|name| self.matcher.matched(name, is_dir).is_ignore()),
        }
    }
}

fn missing(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

fn same_location(src: &Path, dst: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{} and {} are the same location", src.display(), dst.display()),
    )
}

/// Whether both paths exist and resolve to the same place
fn is_same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy one file, creating the destination's parent directories. Copying a
/// file onto itself is an error and leaves it untouched.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    if !src.is_file() {
        return Err(missing(src));
    }
    if is_same_path(src, dst) {
        return Err(same_location(src, dst));
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)
}

/// Merge the tree at `src` into `dst`: existing files are overwritten and
/// nothing already in `dst` is removed. Returns the number of files copied.
///
/// When `dst` lies inside `src` it is left out of the walk.
pub fn copy_tree(src: &Path, dst: &Path, filter: &ExcludeFilter) -> io::Result<usize> {
    if !src.is_dir() {
        return Err(missing(src));
    }
    if is_same_path(src, dst) {
        return Err(same_location(src, dst));
    }
    fs::create_dir_all(dst)?;
    let own_output = dst.canonicalize()?;
    let mut copied = 0;
    let walker = WalkDir::new(src).into_iter().filter_entry(|e| {
        if e.depth() == 0 {
            return true;
        }
        let is_dir = e.file_type().is_dir();
        if is_dir && e.path().canonicalize().is_ok_and(|p| p == own_output) {
            return false;
        }
        !filter.is_excluded(e.path(), is_dir)
    });
    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    debug!("Copied {} files from {} to {}", copied, src.display(), dst.display());
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, text: &str) -> bool {
        path.parent().is_some_and(|p| fs::create_dir_all(p).is_ok()) && fs::write(path, text).is_ok()
    }

    #[test]
    fn test_copy_file_creates_parents() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let src = dir.path().join("a.py");
        assert!(write(&src, "print()"));
        let dst = dir.path().join("out/deep/a.py");
        assert!(copy_file(&src, &dst).is_ok());
        assert!(fs::read_to_string(&dst).is_ok_and(|t| t == "print()"));
    }

    #[test]
    fn test_copy_file_missing_source() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let result = copy_file(&dir.path().join("nope.py"), &dir.path().join("out.py"));
        assert!(result.is_err_and(|e| e.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn test_copy_tree_merges() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let src = dir.path().join("icons");
        let dst = dir.path().join("deploy/icons");
        assert!(write(&src.join("a.png"), "new"));
        assert!(write(&src.join("sub/b.png"), "b"));
        assert!(write(&dst.join("a.png"), "old"));
        assert!(write(&dst.join("keep.png"), "keep"));

        let copied = copy_tree(&src, &dst, &ExcludeFilter::empty());
        assert!(copied.is_ok_and(|n| n == 2));
        assert!(fs::read_to_string(dst.join("a.png")).is_ok_and(|t| t == "new"));
        assert!(dst.join("sub/b.png").is_file());
        assert!(dst.join("keep.png").is_file());
    }

    #[test]
    fn test_copy_tree_honours_excludes() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let src = dir.path().join("scripts");
        let dst = dir.path().join("deploy/scripts");
        assert!(write(&src.join("run.py"), ""));
        assert!(write(&src.join("run.pyc"), ""));
        assert!(write(&src.join("__pycache__/x.py"), ""));

        let filter = ExcludeFilter::new(
            dir.path(),
            &["*.pyc".to_string(), "__pycache__/".to_string()],
        );
        assert!(copy_tree(&src, &dst, &filter).is_ok_and(|n| n == 1));
        assert!(dst.join("run.py").is_file());
        assert!(!dst.join("run.pyc").exists());
        assert!(!dst.join("__pycache__").exists());
    }

    #[test]
    fn test_copy_file_onto_itself_keeps_content() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let src = dir.path().join("src/a.py");
        assert!(write(&src, "print('keep')"));
        let same = dir.path().join("src/../src/a.py");

        let result = copy_file(&src, &same);
        assert!(result.is_err_and(|e| e.kind() == io::ErrorKind::InvalidInput));
        assert!(fs::read_to_string(&src).is_ok_and(|t| t == "print('keep')"));
    }

    #[test]
    fn test_copy_tree_skips_destination_inside_source() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let src = dir.path().join("project");
        let dst = src.join("build/demo");
        assert!(write(&src.join("a.py"), "a"));
        assert!(write(&src.join("icons/b.png"), "b"));
        assert!(write(&dst.join("old.py"), "old"));

        assert!(copy_tree(&src, &dst, &ExcludeFilter::empty()).is_ok_and(|n| n == 2));
        assert!(dst.join("a.py").is_file());
        assert!(dst.join("icons/b.png").is_file());
        assert!(!dst.join("build/demo").exists());
    }

    #[test]
    fn test_copy_tree_onto_itself_refused() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        assert!(write(&dir.path().join("icons/a.png"), "a"));
        let result = copy_tree(&dir.path().join("icons"), &dir.path().join("icons"), &ExcludeFilter::empty());
        assert!(result.is_err_and(|e| e.kind() == io::ErrorKind::InvalidInput));
    }

    #[test]
    fn test_filter_matches_outside_root_by_name() {
        let filter = ExcludeFilter::new(Path::new("/project"), &["*.bak".to_string()]);
        assert!(filter.is_excluded(Path::new("/elsewhere/notes.bak"), false));
        assert!(!filter.is_excluded(Path::new("/project/notes.txt"), false));
    }
}
