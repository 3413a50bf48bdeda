use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};

/// Files under `dir` with the given extension, sorted by path.
pub fn find_files(dir: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("directory does not exist: {}", dir.display());
    }
    let mut out = Vec::new();
    collect(dir, extension, recursive, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect(dir: &Path, extension: &str, recursive: bool, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect(&path, extension, recursive, out)?;
            }
        } else if path.extension().is_some_and(|e| e == extension) {
            out.push(path);
        }
    }
    Ok(())
}

/// Create `dir` (and its parents) if it is missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        log::info!("Creating directory: {}", dir.display());
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    Ok(())
}
