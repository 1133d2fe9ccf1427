//! Generation: plan, then render every planned file.

use std::ops::Deref;

use pilot_core::DerivedModel;
use pilot_renderer::{Renderer, TemplateStore};

use crate::error::CodegenError;
use crate::plan::{plan, FileScope, PlannedFile};

/// A planned file together with its rendered content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file: PlannedFile,
    pub content: String,
}

impl Deref for GeneratedFile {
    type Target = PlannedFile;

    fn deref(&self) -> &PlannedFile {
        &self.file
    }
}

/// Render every file [`plan`] produces for `model`.
///
/// Project files are rendered against the model, phase files against the
/// phase bound to it. The first failure aborts the run; nothing is written.
pub fn generate<S: TemplateStore>(
    model: &DerivedModel,
    renderer: &Renderer<S>,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    let planned = plan(model);
    tracing::debug!(files = planned.len(), module_root = model.module_root(), "planned");
    planned
        .into_iter()
        .map(|file| render_planned(model, renderer, file))
        .collect()
}

fn render_planned<S: TemplateStore>(
    model: &DerivedModel,
    renderer: &Renderer<S>,
    file: PlannedFile,
) -> Result<GeneratedFile, CodegenError> {
    let rendered = match &file.scope {
        FileScope::Project => renderer.render(file.template_id, model),
        FileScope::Phase(name) => {
            let phase = model.phase(&name.0).ok_or_else(|| CodegenError::UnknownPhase {
                output: file.output_path.clone(),
                phase: name.0.clone(),
            })?;
            renderer.render(file.template_id, &phase)
        }
    };
    let content = rendered.map_err(|source| CodegenError::Render {
        output: file.output_path.clone(),
        source,
    })?;
    tracing::debug!(
        output = %file.output_path,
        template = file.template_id,
        scope = %file.scope,
        bytes = content.len(),
        "rendered"
    );
    Ok(GeneratedFile { file, content })
}
