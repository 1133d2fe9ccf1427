//! Descriptor types as they appear in `pilot.yaml`.
//!
//! Field names follow the descriptor's camelCase keys via serde.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::naming;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The resource type name a project manages (e.g. `Widget`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Kind(pub String);

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Kind {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Kind {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A phase name, unique within one descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhaseName(pub String);

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PhaseName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PhaseName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Descriptor structs
// ---------------------------------------------------------------------------

/// A named processing stage of the generated control loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: PhaseName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl Phase {
    /// Construct a phase with no description.
    pub fn new<I, O>(name: impl Into<PhaseName>, inputs: I, outputs: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Phase {
            name: name.into(),
            description: None,
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_inputs(&self) -> bool {
        !self.inputs.is_empty()
    }

    pub fn has_outputs(&self) -> bool {
        !self.outputs.is_empty()
    }

    /// Whether this phase gets its own worker files.
    ///
    /// A phase that declares neither inputs nor outputs is valid but
    /// contributes nothing.
    pub fn generates_files(&self) -> bool {
        self.has_inputs() || self.has_outputs()
    }

    /// Package directory name of this phase's worker (`build-image` → `buildimage`).
    pub fn worker_package(&self) -> String {
        naming::package_name(&self.name.0)
    }
}

/// Root of a `pilot.yaml` project descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    /// `<group>/<version>`, e.g. `apps.example.com/v1`.
    pub api_version: String,
    pub kind: Kind,
    /// Service name; defaults to the last segment of the module root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(Kind::from("Widget").to_string(), "Widget");
        assert_eq!(PhaseName::from("build").to_string(), "build");
    }

    #[test]
    fn capability_predicates() {
        let both = Phase::new("sync", ["spec"], ["status"]);
        assert!(both.has_inputs() && both.has_outputs());
        assert!(both.generates_files());

        let outputs_only = Phase::new("emit", Vec::<String>::new(), ["status"]);
        assert!(!outputs_only.has_inputs());
        assert!(outputs_only.generates_files());

        let noop = Phase::new("noop", Vec::<String>::new(), Vec::<String>::new());
        assert!(!noop.generates_files());
    }

    #[test]
    fn descriptor_uses_camel_case_keys() {
        let yaml = "apiVersion: apps.example.com/v1\nkind: Widget\noperatorName: widget-op\n";
        let d: ProjectDescriptor = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(d.api_version, "apps.example.com/v1");
        assert_eq!(d.operator_name.as_deref(), Some("widget-op"));
        assert!(d.phases.is_empty());
    }

    #[test]
    fn phase_lists_default_to_empty() {
        let p: Phase = serde_yaml::from_str("name: idle\n").expect("parse");
        assert!(p.inputs.is_empty());
        assert!(p.outputs.is_empty());
        assert_eq!(p.worker_package(), "idle");
    }
}
