//! # pilot-codegen
//!
//! Plans and renders the files of an operator scaffold, and writes them.
//!
//! - [`plan`] lists the files a [`DerivedModel`](pilot_core::DerivedModel)
//!   produces, without rendering.
//! - [`generate`] renders every planned file, failing on the first error.
//! - [`write_files`] and [`diff_files`] are the caller side: hash-gated
//!   atomic writes honouring skip-if-exists, and unified diffs.
//! - [`deploy`] builds the Deployment manifest for the operator.

pub mod deploy;
pub mod diff;
pub mod error;
pub mod generate;
pub mod hash_store;
pub mod plan;
pub mod writer;

pub use deploy::{deployment, deployment_for, Deployment};
pub use diff::{diff_files, FileDiff};
pub use error::CodegenError;
pub use generate::{generate, GeneratedFile};
pub use plan::{plan, FileScope, PlannedFile, PROJECT_FILE_COUNT};
pub use writer::{write_files, WriteResult};
