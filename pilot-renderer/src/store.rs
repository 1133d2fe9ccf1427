//! Template content stores.
//!
//! A [`TemplateStore`] maps a logical template identifier such as
//! `code/main.go.tera` to its source text. The embedded set is compiled into
//! the binary; a directory store (configured via `--templates` or
//! `PILOT_TEMPLATES`) can be layered over it to override individual files.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use pilot_core::ResolutionError;

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("code/main.go.tera", include_str!("templates/code/main.go.tera")),
    ("code/scheduler.go.tera", include_str!("templates/code/scheduler.go.tera")),
    ("code/config.go.tera", include_str!("templates/code/config.go.tera")),
    ("code/doc.go.tera", include_str!("templates/code/doc.go.tera")),
    ("code/phases.go.tera", include_str!("templates/code/phases.go.tera")),
    ("code/register.go.tera", include_str!("templates/code/register.go.tera")),
    ("code/spec.go.tera", include_str!("templates/code/spec.go.tera")),
    ("code/types.go.tera", include_str!("templates/code/types.go.tera")),
    ("code/parameters.go.tera", include_str!("templates/code/parameters.go.tera")),
    ("code/worker.go.tera", include_str!("templates/code/worker.go.tera")),
    ("build/Dockerfile.tera", include_str!("templates/build/Dockerfile.tera")),
    ("build/user_setup.tera", include_str!("templates/build/user_setup.tera")),
    ("build/entrypoint.tera", include_str!("templates/build/entrypoint.tera")),
];

/// Source of template text keyed by logical identifier.
pub trait TemplateStore {
    /// Return the source of template `id`.
    fn load(&self, id: &str) -> Result<String, ResolutionError>;
}

impl<T: TemplateStore + ?Sized> TemplateStore for &T {
    fn load(&self, id: &str) -> Result<String, ResolutionError> {
        (**self).load(id)
    }
}

impl<T: TemplateStore + ?Sized> TemplateStore for Box<T> {
    fn load(&self, id: &str) -> Result<String, ResolutionError> {
        (**self).load(id)
    }
}

fn normalize_template_id(id: &str) -> String {
    id.replace('\\', "/")
}

fn not_found(id: &str) -> ResolutionError {
    ResolutionError::TemplateNotFound { id: id.to_string() }
}

// ---------------------------------------------------------------------------
// EmbeddedTemplates
// ---------------------------------------------------------------------------

/// The template set shipped with this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    /// The embedded set is versioned with the crate.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Every embedded template identifier, in a stable order.
    pub fn ids() -> impl Iterator<Item = &'static str> {
        TPLS.iter().map(|(id, _)| *id)
    }
}

impl TemplateStore for EmbeddedTemplates {
    fn load(&self, id: &str) -> Result<String, ResolutionError> {
        let id = normalize_template_id(id);
        TPLS.iter()
            .find(|(name, _)| *name == id)
            .map(|(_, content)| (*content).to_string())
            .ok_or_else(|| not_found(&id))
    }
}

// ---------------------------------------------------------------------------
// DirTemplateStore
// ---------------------------------------------------------------------------

/// Templates read from `<root>/<id>` on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirTemplateStore {
    root: PathBuf,
}

impl DirTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirTemplateStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifiers of every `.tera` file under the root, sorted.
    ///
    /// A missing root yields an empty list.
    pub fn ids(&self) -> Result<Vec<String>, ResolutionError> {
        if !self.root.exists() {
            return Ok(vec![]);
        }
        let mut files = Vec::new();
        collect_template_files(&self.root, &mut files)?;
        let mut ids: Vec<String> = files
            .iter()
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("tera"))
            .filter_map(|path| path.strip_prefix(&self.root).ok())
            .map(|rel| normalize_template_id(&rel.to_string_lossy()))
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let rel = Path::new(id);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        (!escapes).then(|| self.root.join(rel))
    }
}

impl TemplateStore for DirTemplateStore {
    fn load(&self, id: &str) -> Result<String, ResolutionError> {
        let id = normalize_template_id(id);
        let path = self.path_for(&id).ok_or_else(|| not_found(&id))?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found(&id)),
            Err(source) => Err(ResolutionError::TemplateIo { id, path, source }),
        }
    }
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ResolutionError> {
    let io_err = |source: std::io::Error| ResolutionError::TemplateIo {
        id: String::new(),
        path: dir.to_path_buf(),
        source,
    };
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(io_err)?;
        if file_type.is_dir() {
            collect_template_files(&path, out)?;
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MemoryTemplateStore
// ---------------------------------------------------------------------------

/// In-memory templates, mostly for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTemplateStore {
    templates: HashMap<String, String>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(normalize_template_id(&id.into()), source.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, id: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(id, source);
        self
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load(&self, id: &str) -> Result<String, ResolutionError> {
        let id = normalize_template_id(id);
        self.templates.get(&id).cloned().ok_or_else(|| not_found(&id))
    }
}

// ---------------------------------------------------------------------------
// LayeredTemplateStore
// ---------------------------------------------------------------------------

/// Looks in `primary` first and falls back to `fallback` only when the
/// template is absent from `primary`. Other failures are not masked.
#[derive(Debug, Clone)]
pub struct LayeredTemplateStore<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> LayeredTemplateStore<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        LayeredTemplateStore { primary, fallback }
    }
}

impl<P: TemplateStore, F: TemplateStore> TemplateStore for LayeredTemplateStore<P, F> {
    fn load(&self, id: &str) -> Result<String, ResolutionError> {
        match self.primary.load(id) {
            Err(ResolutionError::TemplateNotFound { .. }) => self.fallback.load(id),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
