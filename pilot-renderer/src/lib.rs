//! # pilot-renderer
//!
//! Tera-based template renderer for pilot scaffolds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pilot_core::{load, StaticModuleRoot};
//! use pilot_renderer::Renderer;
//!
//! fn render_main(yaml: &[u8]) {
//!     let root = StaticModuleRoot::from("github.com/acme/widget-operator");
//!     if let Ok(model) = load(yaml, &root) {
//!         let renderer = Renderer::embedded();
//!         if let Ok(text) = renderer.render("code/main.go.tera", &model) {
//!             println!("{text}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod store;

pub use context::{FunctionTable, RenderContext};
pub use engine::{render_source, OverrideStore, Renderer};
pub use error::RenderError;
pub use store::{
    DirTemplateStore, EmbeddedTemplates, LayeredTemplateStore, MemoryTemplateStore, TemplateStore,
};
