//! Writing generated files to disk.
//!
//! ## `atomic_write` protocol
//!
//! 1. Normalise line endings and SHA-256 hash the content.
//! 2. Compare with the file on disk → `Unchanged` if identical.
//! 3. Warn if the on-disk file no longer matches the recorded hash.
//! 4. Write to `<path>.pilot.tmp`, then rename to the final path.
//! 5. Record the new hash (the caller saves the store).
//!
//! Files planned as skip-if-exists are never touched once they exist.
//! Executable files get mode `0755` on Unix.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;

use crate::error::{io_err, CodegenError};
use crate::generate::GeneratedFile;
use crate::hash_store::{self, digest, HashStore};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// On-disk content already matches.
    Unchanged { path: PathBuf },
    /// Skip-if-exists file that already exists; left alone.
    Skipped { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::Skipped { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// write_files
// ---------------------------------------------------------------------------

/// Write `files` under `root`, mapping each output path to its location
/// relative to `module_root`.
///
/// The hash store under `root` is updated once all files are processed;
/// dry runs leave the filesystem untouched.
pub fn write_files(
    files: &[GeneratedFile],
    root: &Path,
    module_root: &str,
    dry_run: bool,
) -> Result<Vec<WriteResult>, CodegenError> {
    let started_at = Utc::now();
    let mut store = hash_store::load_at(root)?;
    let mut results = Vec::with_capacity(files.len());

    let locations = files
        .iter()
        .map(|file| {
            let rel = file.relative_path(module_root);
            output_location(root, rel).map(|path| (rel, path))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (file, (rel, path)) in files.iter().zip(locations) {
        if file.skip_if_exists && path.exists() {
            tracing::info!("skipped (exists): {}", path.display());
            results.push(WriteResult::Skipped { path });
            continue;
        }
        let mode = WriteMode {
            executable: file.executable,
            dry_run,
        };
        results.push(atomic_write(&path, rel, &file.content, &mut store.files, mode)?);
    }

    if !dry_run {
        store.generated_at = started_at;
        hash_store::save_at(root, &store)?;
    }
    Ok(results)
}

/// `root/rel`, provided `rel` is a plain relative path (no root, prefix,
/// `.` or `..` components).
pub(crate) fn output_location(root: &Path, rel: &str) -> Result<PathBuf, CodegenError> {
    let rel_path = Path::new(rel);
    let plain = !rel.is_empty()
        && rel_path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !plain {
        return Err(CodegenError::UnsafePath {
            path: rel.to_string(),
        });
    }
    Ok(root.join(rel_path))
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WriteMode {
    pub executable: bool,
    pub dry_run: bool,
}

/// Atomically write one file, keyed as `key` in `hashes`.
pub(crate) fn atomic_write(
    path: &Path,
    key: &str,
    content: &str,
    hashes: &mut HashStore,
    mode: WriteMode,
) -> Result<WriteResult, CodegenError> {
    let normalized = normalize_line_endings(content);
    let content = normalized.as_str();
    let new_hash = digest(content);

    let on_disk = read_existing(path)?.map(|existing| digest(&existing));
    if on_disk.as_deref() == Some(new_hash.as_str()) {
        tracing::debug!("unchanged: {}", path.display());
        if mode.executable && !mode.dry_run {
            set_executable(path)?;
        }
        hashes.insert(key.to_string(), new_hash);
        return Ok(WriteResult::Unchanged { path: path.to_path_buf() });
    }

    if let (Some(current), Some(recorded)) = (&on_disk, hashes.get(key)) {
        if current != recorded {
            tracing::warn!(
                "{} was modified since it was last generated; local changes will be overwritten",
                path.display()
            );
        }
    }

    if mode.dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite { path: path.to_path_buf() });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = PathBuf::from(format!("{}.pilot.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if mode.executable {
        if let Err(e) = set_executable(&tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
    }
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    hashes.insert(key.to_string(), new_hash);
    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written { path: path.to_path_buf() })
}

/// Current content of `path`, line endings normalised; `None` if absent.
pub(crate) fn read_existing(path: &Path) -> Result<Option<String>, CodegenError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(normalize_line_endings(&String::from_utf8_lossy(&bytes)))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

pub(crate) fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), CodegenError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), CodegenError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
