//! Modification-time staleness check

use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Whether `output` must be regenerated from `source`.
///
/// True when the output is missing or the source is strictly newer. Any
/// metadata error counts as stale so the artifact gets rebuilt.
pub fn is_stale(source: &Path, output: &Path) -> bool {
    match (modified(source), modified(output)) {
        (Some(src), Some(out)) => src > out,
        _ => true,
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use tempfile::TempDir;

    fn pair(src_secs: i64, out_secs: i64) -> Option<(TempDir, std::path::PathBuf, std::path::PathBuf)> {
        let dir = TempDir::new().ok()?;
        let src = dir.path().join("dlg.ui");
        let out = dir.path().join("dlg.py");
        fs::write(&src, "<ui/>").ok()?;
        fs::write(&out, "# generated").ok()?;
        set_file_mtime(&src, FileTime::from_unix_time(src_secs, 0)).ok()?;
        set_file_mtime(&out, FileTime::from_unix_time(out_secs, 0)).ok()?;
        Some((dir, src, out))
    }

    #[test]
    fn test_missing_output_is_stale() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let src = dir.path().join("dlg.ui");
        assert!(fs::write(&src, "<ui/>").is_ok());
        assert!(is_stale(&src, &dir.path().join("dlg.py")));
    }

    #[test]
    fn test_newer_source_is_stale() {
        let Some((_dir, src, out)) = pair(2_000, 1_000) else {
            return;
        };
        assert!(is_stale(&src, &out));
    }

    #[test]
    fn test_newer_output_is_fresh() {
        let Some((_dir, src, out)) = pair(1_000, 2_000) else {
            return;
        };
        assert!(!is_stale(&src, &out));
    }

    #[test]
    fn test_equal_times_are_fresh() {
        let Some((_dir, src, out)) = pair(1_500, 1_500) else {
            return;
        };
        assert!(!is_stale(&src, &out));
    }

    #[test]
    fn test_missing_source_is_stale() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let out = dir.path().join("dlg.py");
        assert!(fs::write(&out, "").is_ok());
        assert!(is_stale(&dir.path().join("dlg.ui"), &out));
    }
}
