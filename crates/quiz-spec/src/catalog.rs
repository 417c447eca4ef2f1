use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use thiserror::Error;

pub const DEFAULT_PATTERN: &str = "*.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("failed to read quiz directory {}: {source}", .dir.display())]
    Directory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A quiz document available for loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub label: String,
    pub path: PathBuf,
}

/// Lists quiz documents in `dir` whose file names match `pattern`, sorted by label.
pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let matcher = Glob::new(pattern)?.compile_matcher();
    let read_dir = |source: io::Error| CatalogError::Directory {
        dir: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir)? {
        let path = entry.map_err(read_dir)?.path();
        if path.is_file()
            && let Some(entry) = catalog_entry(&matcher, path)
        {
            entries.push(entry);
        }
    }
    entries.sort_by(|left, right| left.label.cmp(&right.label));
    Ok(entries)
}

fn catalog_entry(matcher: &GlobMatcher, path: PathBuf) -> Option<CatalogEntry> {
    let file_name = path.file_name()?;
    if !matcher.is_match(file_name) {
        return None;
    }
    let label = path.file_stem()?.to_string_lossy().into_owned();
    Some(CatalogEntry { label, path })
}
