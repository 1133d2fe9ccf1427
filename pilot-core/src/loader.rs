//! Descriptor loading: parse → validate → resolve module root → derive.
//!
//! # API pattern
//!
//! - [`load`] / [`load_file`] run the whole pipeline.
//! - [`parse_descriptor`], [`validate`] and [`derive`] are exposed
//!   separately so callers (and tests) can drive each step on its own.
//!
//! Derivation is pure: the same descriptor and module root always produce
//! an identical [`DerivedModel`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, MalformedDescriptor, ResolutionError};
use crate::model::DerivedModel;
use crate::naming;
use crate::types::ProjectDescriptor;

// ---------------------------------------------------------------------------
// Module root resolution
// ---------------------------------------------------------------------------

/// Supplies the importable root path of the module being generated.
pub trait ModuleRootResolver {
    fn module_root(&self) -> Result<String, ResolutionError>;
}

/// A module root known up front (CLI `--module-root`, tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticModuleRoot(pub String);

impl From<&str> for StaticModuleRoot {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl ModuleRootResolver for StaticModuleRoot {
    fn module_root(&self) -> Result<String, ResolutionError> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Pipeline steps
// ---------------------------------------------------------------------------

/// Parse raw YAML bytes into a [`ProjectDescriptor`]. No validation.
pub fn parse_descriptor(bytes: &[u8]) -> Result<ProjectDescriptor, MalformedDescriptor> {
    Ok(serde_yaml::from_slice(bytes)?)
}

/// Split `<group>/<version>`; both segments must be non-empty.
pub fn split_api_version(api_version: &str) -> Result<(&str, &str), MalformedDescriptor> {
    match api_version.split('/').collect::<Vec<_>>().as_slice() {
        [group, version] if !group.is_empty() && !version.is_empty() => Ok((group, version)),
        _ => Err(MalformedDescriptor::ApiVersion {
            value: api_version.to_string(),
        }),
    }
}

/// Check every structural invariant of a descriptor.
pub fn validate(descriptor: &ProjectDescriptor) -> Result<(), MalformedDescriptor> {
    split_api_version(&descriptor.api_version)?;

    let kind = &descriptor.kind.0;
    if kind.trim().is_empty() {
        return Err(MalformedDescriptor::EmptyKind);
    }
    if !is_go_identifier(kind) {
        return Err(MalformedDescriptor::InvalidKind { value: kind.clone() });
    }

    // worker package → first phase that claimed it
    let mut packages: HashMap<String, &str> = HashMap::new();
    for (index, phase) in descriptor.phases.iter().enumerate() {
        let name = &phase.name.0;
        if name.trim().is_empty() {
            return Err(MalformedDescriptor::EmptyPhaseName { index });
        }
        let package = phase.worker_package();
        if !is_go_identifier(&package) {
            return Err(MalformedDescriptor::InvalidPhaseName { name: name.clone() });
        }
        if let Some(first) = packages.get(&package) {
            if *first == name.as_str() {
                return Err(MalformedDescriptor::DuplicatePhase { name: name.clone() });
            }
            return Err(MalformedDescriptor::PhasePackageCollision {
                first: first.to_string(),
                second: name.clone(),
                package,
            });
        }
        packages.insert(package, name.as_str());
    }
    Ok(())
}

/// ASCII letter followed by ASCII letters or digits.
fn is_go_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Compute the [`DerivedModel`] for a validated descriptor.
///
/// A module root that is empty once trailing `/` are removed is rejected.
pub fn derive(descriptor: ProjectDescriptor, module_root: &str) -> Result<DerivedModel, LoadError> {
    let (group, version) = split_api_version(&descriptor.api_version)?;
    let (group, version) = (group.to_string(), version.to_string());
    let trimmed = module_root.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ResolutionError::EmptyModuleRoot {
            value: module_root.to_string(),
        }
        .into());
    }
    let module_root = trimmed.to_string();

    let kind = &descriptor.kind.0;
    let types_import_path = format!(
        "{module_root}/pkg/apis/{}/{version}",
        naming::pluralize(kind).to_lowercase()
    );
    let scheduler_import_path = format!("{module_root}/pkg/scheduler");
    let config_import_path = format!("{module_root}/pkg/config");
    let kind_lower_camel = naming::lower_camel(kind);
    let operator_name = descriptor
        .operator_name
        .clone()
        .unwrap_or_else(|| default_operator_name(&module_root, kind));

    Ok(DerivedModel {
        project: descriptor,
        module_root,
        group,
        version,
        types_import_path,
        scheduler_import_path,
        config_import_path,
        kind_lower_camel,
        operator_name,
    })
}

fn default_operator_name(module_root: &str, kind: &str) -> String {
    match module_root.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => format!("{}-operator", naming::kebab_case(kind)),
    }
}

// ---------------------------------------------------------------------------
// Whole pipeline
// ---------------------------------------------------------------------------

/// Load a descriptor from raw bytes.
///
/// Validation happens before the module root is resolved, so a malformed
/// descriptor never touches the resolver.
pub fn load(
    bytes: &[u8],
    resolver: &dyn ModuleRootResolver,
) -> Result<DerivedModel, LoadError> {
    let descriptor = parse_descriptor(bytes)?;
    validate(&descriptor)?;
    let module_root = resolver.module_root()?;
    derive(descriptor, &module_root)
}

/// Read `path` and [`load`] it.
pub fn load_file(
    path: &Path,
    resolver: &dyn ModuleRootResolver,
) -> Result<DerivedModel, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: PathBuf::from(path),
        source,
    })?;
    load(&bytes, resolver)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
