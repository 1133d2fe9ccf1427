//! Module-root detection for `pilot-detector`.
//!
//! `detect_module_root(path)` determines the importable root path of the Go
//! module that contains `path`. Sources are checked by specificity: a
//! `go.mod` in `path` or any ancestor takes priority over GOPATH layout.

use std::path::{Component, Path, PathBuf};
use std::fs;

use pilot_core::{ModuleRootResolver, ResolutionError};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Where a module root was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSource {
    /// `module` directive of this `go.mod`.
    GoMod(PathBuf),
    /// Path relative to this `$GOPATH/src`.
    GoPath(PathBuf),
}

/// A detected module root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRoot {
    /// Import path of the directory that was inspected (e.g.
    /// `github.com/acme/widget-operator`).
    pub import_path: String,
    pub source: ModuleSource,
}

/// Errors from module-root detection.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("could not determine module root for '{path}' — no go.mod found and not under GOPATH")]
    NoModule { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Detect the module root for `path`, using `$GOPATH` (or `~/go`) as the
/// GOPATH fallback.
pub fn detect_module_root(path: &Path) -> Result<ModuleRoot, DetectError> {
    detect_module_root_at(path, gopath().as_deref())
}

/// Same as [`detect_module_root`] with an explicit GOPATH.
pub fn detect_module_root_at(
    path: &Path,
    gopath: Option<&Path>,
) -> Result<ModuleRoot, DetectError> {
    if let Some(root) = detect_go_mod(path)? { return Ok(root); }
    if let Some(gopath) = gopath {
        if let Some(root) = detect_gopath(path, gopath) { return Ok(root); }
    }
    Err(DetectError::NoModule { path: path.to_path_buf() })
}

/// [`ModuleRootResolver`] backed by [`detect_module_root`].
#[derive(Debug, Clone)]
pub struct GoModuleResolver {
    dir: PathBuf,
    gopath: Option<PathBuf>,
}

impl GoModuleResolver {
    /// Resolve relative to `dir` using the ambient GOPATH.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        GoModuleResolver { dir: dir.into(), gopath: gopath() }
    }

    /// Resolve relative to `dir` with an explicit GOPATH (or none).
    pub fn with_gopath(dir: impl Into<PathBuf>, gopath: Option<PathBuf>) -> Self {
        GoModuleResolver { dir: dir.into(), gopath }
    }
}

impl ModuleRootResolver for GoModuleResolver {
    fn module_root(&self) -> Result<String, ResolutionError> {
        detect_module_root_at(&self.dir, self.gopath.as_deref())
            .map(|root| root.import_path)
            .map_err(|e| ResolutionError::ModuleRoot {
                dir: self.dir.clone(),
                reason: e.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Detectors
// ---------------------------------------------------------------------------

fn detect_go_mod(path: &Path) -> Result<Option<ModuleRoot>, DetectError> {
    for dir in path.ancestors() {
        let file = dir.join("go.mod");
        if !file.exists() { continue; }
        let content = fs::read_to_string(&file)?;
        let module = parse_module_directive(&content).ok_or_else(|| DetectError::ParseError {
            path: file.clone(),
            message: "missing module directive".to_string(),
        })?;

        let rel = path.strip_prefix(dir).unwrap_or(Path::new(""));
        return Ok(Some(ModuleRoot {
            import_path: join_import_path(&module, rel),
            source: ModuleSource::GoMod(file),
        }));
    }
    Ok(None)
}

fn detect_gopath(path: &Path, gopath: &Path) -> Option<ModuleRoot> {
    let src = gopath.join("src");
    let rel = path.strip_prefix(&src).ok()?;
    let import_path = join_import_path("", rel);
    if import_path.is_empty() {
        return None;
    }
    Some(ModuleRoot { import_path, source: ModuleSource::GoPath(src) })
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

/// Extract the module path from `go.mod` contents.
pub fn parse_module_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) { return None; }
        let module = rest.trim().trim_matches('"').trim_matches('`');
        (!module.is_empty()).then(|| module.to_string())
    })
}

fn join_import_path(base: &str, rel: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !base.is_empty() {
        parts.push(base.trim_end_matches('/').to_string());
    }
    for component in rel.components() {
        if let Component::Normal(seg) = component {
            parts.push(seg.to_string_lossy().into_owned());
        }
    }
    parts.join("/")
}

fn gopath() -> Option<PathBuf> {
    match std::env::var_os("GOPATH") {
        Some(value) if !value.is_empty() => std::env::split_paths(&value).next(),
        _ => dirs::home_dir().map(|home| home.join("go")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_directive_variants() {
        assert_eq!(
            parse_module_directive("module github.com/acme/op\n\ngo 1.21\n").as_deref(),
            Some("github.com/acme/op")
        );
        assert_eq!(
            parse_module_directive("// comment\nmodule \"example.com/quoted\" // trailing\n").as_deref(),
            Some("example.com/quoted")
        );
        assert!(parse_module_directive("go 1.21\n").is_none());
        assert!(parse_module_directive("modules are here\n").is_none());
    }

    #[test]
    fn join_skips_non_normal_components() {
        assert_eq!(join_import_path("a.com/b/", Path::new("c/d")), "a.com/b/c/d");
        assert_eq!(join_import_path("a.com/b", Path::new("")), "a.com/b");
    }
}
