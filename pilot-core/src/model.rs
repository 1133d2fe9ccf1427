//! The derived rendering model.
//!
//! [`DerivedModel`] is built once per generation run by
//! [`crate::loader::derive`] and never mutated afterwards. Import paths are
//! `/`-separated regardless of host platform.

use std::ops::Deref;

use serde::Serialize;

use crate::types::{Phase, ProjectDescriptor};

/// The descriptor plus every field templates need that is computed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedModel {
    pub(crate) project: ProjectDescriptor,
    pub(crate) module_root: String,
    pub(crate) group: String,
    pub(crate) version: String,
    pub(crate) types_import_path: String,
    pub(crate) scheduler_import_path: String,
    pub(crate) config_import_path: String,
    pub(crate) kind_lower_camel: String,
    pub(crate) operator_name: String,
}

impl DerivedModel {
    pub fn project(&self) -> &ProjectDescriptor {
        &self.project
    }

    /// Importable root path of the generated module.
    pub fn module_root(&self) -> &str {
        &self.module_root
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `<root>/pkg/apis/<plural kind>/<version>`
    pub fn types_import_path(&self) -> &str {
        &self.types_import_path
    }

    /// `<root>/pkg/scheduler`
    pub fn scheduler_import_path(&self) -> &str {
        &self.scheduler_import_path
    }

    /// `<root>/pkg/config`
    pub fn config_import_path(&self) -> &str {
        &self.config_import_path
    }

    pub fn kind_lower_camel(&self) -> &str {
        &self.kind_lower_camel
    }

    pub fn operator_name(&self) -> &str {
        &self.operator_name
    }

    /// `<root>/pkg/workers/<phase package>`
    pub fn worker_import_path(&self, phase: &Phase) -> String {
        format!("{}/pkg/workers/{}", self.module_root, phase.worker_package())
    }

    /// Every phase in descriptor order, paired with this model.
    pub fn phases(&self) -> impl Iterator<Item = BoundPhase<'_>> + '_ {
        self.project
            .phases
            .iter()
            .map(move |phase| BoundPhase { phase, project: self })
    }

    /// Look up a phase by name.
    pub fn phase(&self, name: &str) -> Option<BoundPhase<'_>> {
        self.phases().find(|p| p.name.0 == name)
    }
}

/// A phase together with the model that owns it.
///
/// This is the rendering context for per-phase templates, which need both
/// the phase's own fields and project-level import paths. Serializes as
/// the phase's fields plus `worker_package`, `worker_import_path` and a
/// nested `project`.
#[derive(Debug, Clone, Copy)]
pub struct BoundPhase<'a> {
    phase: &'a Phase,
    project: &'a DerivedModel,
}

impl<'a> BoundPhase<'a> {
    pub fn phase(&self) -> &'a Phase {
        self.phase
    }

    pub fn project(&self) -> &'a DerivedModel {
        self.project
    }

    pub fn worker_import_path(&self) -> String {
        self.project.worker_import_path(self.phase)
    }
}

impl Deref for BoundPhase<'_> {
    type Target = Phase;

    fn deref(&self) -> &Phase {
        self.phase
    }
}

impl Serialize for BoundPhase<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a> {
            #[serde(flatten)]
            phase: &'a Phase,
            worker_package: String,
            worker_import_path: String,
            project: &'a DerivedModel,
        }

        View {
            phase: self.phase,
            worker_package: self.phase.worker_package(),
            worker_import_path: self.worker_import_path(),
            project: self.project,
        }
        .serialize(serializer)
    }
}
