//! Tera rendering engine — [`Renderer`] and [`render_source`].
//!
//! Every render is independent: the template is loaded from the store,
//! parsed into a fresh [`Tera`] instance, bound to the context's
//! [`FunctionTable`](crate::FunctionTable) and executed. Nothing is cached
//! between calls, so the output is a pure function of template source and
//! context.

use std::path::Path;

use tera::Tera;

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::store::{DirTemplateStore, EmbeddedTemplates, LayeredTemplateStore, TemplateStore};

/// Directory overrides layered over the embedded set.
pub type OverrideStore = LayeredTemplateStore<DirTemplateStore, EmbeddedTemplates>;

/// Renders templates from a [`TemplateStore`].
#[derive(Debug, Clone)]
pub struct Renderer<S> {
    store: S,
}

impl Renderer<EmbeddedTemplates> {
    /// Renderer over the embedded template set only.
    pub fn embedded() -> Self {
        Renderer { store: EmbeddedTemplates }
    }
}

impl Renderer<OverrideStore> {
    /// Renderer whose templates in `dir` override the embedded defaults.
    pub fn with_overrides(dir: &Path) -> Self {
        Renderer {
            store: LayeredTemplateStore::new(DirTemplateStore::new(dir), EmbeddedTemplates),
        }
    }
}

impl<S: TemplateStore> Renderer<S> {
    pub fn new(store: S) -> Self {
        Renderer { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load `template_id` from the store and render it against `ctx`.
    pub fn render<C: RenderContext>(
        &self,
        template_id: &str,
        ctx: &C,
    ) -> Result<String, RenderError> {
        let source = self.store.load(template_id)?;
        render_source(template_id, &source, ctx)
    }
}

/// Parse `source` as template `template_id` and render it against `ctx`.
pub fn render_source<C: RenderContext>(
    template_id: &str,
    source: &str,
    ctx: &C,
) -> Result<String, RenderError> {
    let mut tera = Tera::default();
    // Generated files are source code, never HTML.
    tera.autoescape_on(vec![]);
    tera.add_raw_template(template_id, source)
        .map_err(|e| RenderError::syntax(template_id, &e))?;

    ctx.functions().bind(&mut tera);

    let tera_ctx =
        tera::Context::from_serialize(ctx).map_err(|e| RenderError::execution(template_id, &e))?;
    tera.render(template_id, &tera_ctx)
        .map_err(|e| RenderError::execution(template_id, &e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTemplateStore;
    use pilot_core::{load, DerivedModel, StaticModuleRoot};

    fn model() -> DerivedModel {
        let yaml = "\
apiVersion: apps.example.com/v1
kind: Widget
phases:
  - name: build
    inputs: [spec]
  - name: noop
";
        load(yaml.as_bytes(), &StaticModuleRoot::from("github.com/acme/widget-op")).unwrap()
    }

    #[test]
    fn renders_project_fields() {
        let out = render_source("t", "{{ types_import_path }} {{ kind_lower_camel }}", &model())
            .unwrap();
        assert_eq!(out, "github.com/acme/widget-op/pkg/apis/widgets/v1 widget");
    }

    #[test]
    fn renders_phase_fields_and_capabilities() {
        let m = model();
        let build = m.phase("build").unwrap();
        let out = render_source(
            "t",
            "{{ name }}:{{ has_inputs() }}:{{ has_outputs() }}:{{ project.version }}",
            &build,
        )
        .unwrap();
        assert_eq!(out, "build:true:false:v1");
    }

    #[test]
    fn filters_are_bound() {
        let out = render_source("t", "{{ project.kind | plural | snake_case }}", &model()).unwrap();
        assert_eq!(out, "widgets");
    }

    #[test]
    fn no_html_escaping() {
        let out = render_source("x.html", "{{ module_root }}<&>", &model()).unwrap();
        assert_eq!(out, "github.com/acme/widget-op<&>");
    }

    #[test]
    fn syntax_error_names_template() {
        let err = render_source("broken.tera", "{% if %}", &model()).unwrap_err();
        assert!(matches!(err, RenderError::Syntax { .. }));
        assert_eq!(err.template(), Some("broken.tera"));
    }

    #[test]
    fn missing_variable_is_execution_error_naming_field() {
        let err = render_source("missing.tera", "{{ no_such_field }}", &model()).unwrap_err();
        assert!(matches!(err, RenderError::Execution { .. }));
        let msg = err.to_string();
        assert!(msg.contains("missing.tera"), "{msg}");
        assert!(msg.contains("no_such_field"), "{msg}");
    }

    #[test]
    fn function_error_is_execution_error() {
        let err = render_source("fn.tera", "{{ has_inputs() }}", &model()).unwrap_err();
        assert!(matches!(err, RenderError::Execution { .. }));
        assert!(err.to_string().contains("phase"));
    }

    #[test]
    fn renderer_resolves_through_store() {
        let store = MemoryTemplateStore::new().with("greet.tera", "hello {{ group }}");
        let renderer = Renderer::new(store);
        assert_eq!(renderer.render("greet.tera", &model()).unwrap(), "hello apps.example.com");
        let err = renderer.render("absent.tera", &model()).unwrap_err();
        assert!(matches!(err, RenderError::Resolution(_)));
        assert_eq!(err.template(), Some("absent.tera"));
    }
}
