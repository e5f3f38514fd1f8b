use crate::{GlobalOpts, PbtError};
use std::path::Path;

/// The manifest exactly as written
pub fn list_manifest(manifest_path: &Path) -> Result<String, PbtError> {
    Ok(pbt_manifest::raw_text(manifest_path)?)
}

pub fn handle_list(opts: &GlobalOpts) -> Result<(), String> {
    let text = list_manifest(&opts.manifest).map_err(|e| e.to_string())?;
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_is_verbatim() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let path = dir.path().join("pbt.toml");
        let text = "# comment kept\n[plugin]\nname   =   \"demo\"\n";
        assert!(fs::write(&path, text).is_ok());
        assert!(list_manifest(&path).is_ok_and(|listed| listed == text));
    }
}
