//! Unified diffs for `pilot diff`.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::error::CodegenError;
use crate::generate::GeneratedFile;
use crate::writer::{normalize_line_endings, output_location, read_existing};

/// A single generated file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Compare what [`write_files`](crate::write_files) would produce with the
/// current contents under `root`.
///
/// Skip-if-exists files that already exist are never rewritten and so are
/// not reported. Missing files diff against empty content. No files are
/// written.
pub fn diff_files(
    files: &[GeneratedFile],
    root: &Path,
    module_root: &str,
) -> Result<Vec<FileDiff>, CodegenError> {
    let mut diffs = Vec::new();
    for file in files {
        let rel = file.relative_path(module_root);
        let path = output_location(root, rel)?;
        if file.skip_if_exists && path.exists() {
            continue;
        }

        let rendered = normalize_line_endings(&file.content);
        let existing = read_existing(&path)?.unwrap_or_default();
        if existing == rendered {
            continue;
        }

        let old_header = format!("a/{rel}");
        let new_header = format!("b/{rel}");
        let unified = TextDiff::from_lines(&existing, &rendered)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path,
            unified_diff: unified,
        });
    }
    Ok(diffs)
}
