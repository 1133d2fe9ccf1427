//! Kubernetes Deployment manifest for a generated operator.
//!
//! Only the subset of the `apps/v1` schema the operator needs is modelled.
//! Field order follows the API types so the YAML reads like `kubectl` output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pilot_core::DerivedModel;

use crate::error::CodegenError;

/// Placeholder image, replaced by the build pipeline.
pub const PLACEHOLDER_IMAGE: &str = "REPLACE_IMAGE";

pub const WATCH_NAMESPACE_ENV: &str = "WATCH_NAMESPACE";
pub const POD_NAME_ENV: &str = "POD_NAME";
pub const OPERATOR_NAME_ENV: &str = "OPERATOR_NAME";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: DeploymentSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSpec {
    pub replicas: i32,
    pub selector: LabelSelector,
    pub template: PodTemplateSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    pub match_labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodTemplateSpec {
    pub metadata: ObjectMeta,
    pub spec: PodSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    pub service_account_name: String,
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    pub command: Vec<String>,
    pub image_pull_policy: PullPolicy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullPolicy {
    Always,
    IfNotPresent,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<EnvVarSource>,
}

impl EnvVar {
    pub fn literal(name: &str, value: &str) -> Self {
        EnvVar {
            name: name.to_string(),
            value: Some(value.to_string()),
            value_from: None,
        }
    }

    /// Value taken from a field of the running pod (`metadata.name`, ...).
    pub fn field_ref(name: &str, field_path: &str) -> Self {
        EnvVar {
            name: name.to_string(),
            value: None,
            value_from: Some(EnvVarSource {
                field_ref: ObjectFieldSelector {
                    field_path: field_path.to_string(),
                },
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVarSource {
    pub field_ref: ObjectFieldSelector,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFieldSelector {
    pub field_path: String,
}

/// The single-replica Deployment that runs `operator_name`.
pub fn deployment(operator_name: &str) -> Deployment {
    let labels = BTreeMap::from([("name".to_string(), operator_name.to_string())]);
    Deployment {
        api_version: "apps/v1".to_string(),
        kind: "Deployment".to_string(),
        metadata: ObjectMeta {
            name: operator_name.to_string(),
            labels: BTreeMap::new(),
        },
        spec: DeploymentSpec {
            replicas: 1,
            selector: LabelSelector {
                match_labels: labels.clone(),
            },
            template: PodTemplateSpec {
                metadata: ObjectMeta {
                    name: operator_name.to_string(),
                    labels,
                },
                spec: PodSpec {
                    service_account_name: operator_name.to_string(),
                    containers: vec![Container {
                        name: operator_name.to_string(),
                        image: PLACEHOLDER_IMAGE.to_string(),
                        command: vec![operator_name.to_string()],
                        image_pull_policy: PullPolicy::Always,
                        env: vec![
                            EnvVar::field_ref(WATCH_NAMESPACE_ENV, "metadata.namespace"),
                            EnvVar::field_ref(POD_NAME_ENV, "metadata.name"),
                            EnvVar::literal(OPERATOR_NAME_ENV, operator_name),
                        ],
                    }],
                },
            },
        },
    }
}

/// [`deployment`] for the model's operator name.
pub fn deployment_for(model: &DerivedModel) -> Deployment {
    deployment(model.operator_name())
}

impl Deployment {
    pub fn to_yaml(&self) -> Result<String, CodegenError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
