//! pilot core library — descriptor types, derived model, loader, errors.
//!
//! Public API surface:
//! - [`types`] — descriptor structs and newtypes
//! - [`model`] — [`DerivedModel`] and [`BoundPhase`]
//! - [`loader`] — parse / validate / derive
//! - [`naming`] — casing and pluralization helpers
//! - [`error`] — [`LoadError`], [`MalformedDescriptor`], [`ResolutionError`]

pub mod error;
pub mod loader;
pub mod model;
pub mod naming;
pub mod types;

pub use error::{LoadError, MalformedDescriptor, ResolutionError};
pub use loader::{load, load_file, ModuleRootResolver, StaticModuleRoot};
pub use model::{BoundPhase, DerivedModel};
pub use types::{Kind, Phase, PhaseName, ProjectDescriptor};
