//! Options shared by every command that works on an existing descriptor.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use pilot_core::{load_file, DerivedModel, ModuleRootResolver, StaticModuleRoot};
use pilot_detector::GoModuleResolver;
use pilot_renderer::{
    DirTemplateStore, EmbeddedTemplates, LayeredTemplateStore, Renderer, TemplateStore,
};

/// Descriptor, module root, template and output locations.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Path to the project descriptor.
    #[arg(long, short = 'd', default_value = "pilot.yaml")]
    pub descriptor: PathBuf,

    /// Import path of the generated module; detected from go.mod or GOPATH
    /// when omitted.
    #[arg(long)]
    pub module_root: Option<String>,

    /// Directory whose templates override the built-in set.
    /// Defaults to ~/.pilot/templates when that directory exists.
    #[arg(long, env = "PILOT_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// Root directory generated files are written under (defaults to the
    /// descriptor's directory).
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Everything a command needs after loading the descriptor.
pub struct Session {
    pub model: DerivedModel,
    pub renderer: Renderer<Box<dyn TemplateStore>>,
    pub out_root: PathBuf,
}

impl ProjectArgs {
    /// Load and derive the model only.
    pub fn load_model(&self) -> Result<DerivedModel> {
        let project_dir = self.project_dir()?;
        let resolver: Box<dyn ModuleRootResolver> = match &self.module_root {
            Some(root) => Box::new(StaticModuleRoot::from(root.as_str())),
            None => Box::new(GoModuleResolver::new(&project_dir)),
        };
        let model = load_file(&self.descriptor, resolver.as_ref())
            .with_context(|| format!("failed to load '{}'", self.descriptor.display()))?;
        tracing::debug!(
            module_root = model.module_root(),
            phases = model.project().phases.len(),
            "loaded descriptor"
        );
        Ok(model)
    }

    /// Load the model and set up rendering and output locations.
    pub fn session(&self) -> Result<Session> {
        let model = self.load_model()?;
        let renderer = self.renderer()?;
        let out_root = match &self.out {
            Some(out) => out.clone(),
            None => self.project_dir()?,
        };
        Ok(Session {
            model,
            renderer,
            out_root,
        })
    }

    fn project_dir(&self) -> Result<PathBuf> {
        let dir = match self.descriptor.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        dir.canonicalize()
            .with_context(|| format!("cannot resolve directory '{}'", dir.display()))
    }

    fn renderer(&self) -> Result<Renderer<Box<dyn TemplateStore>>> {
        let overrides = match &self.templates {
            Some(dir) => {
                if !dir.is_dir() {
                    bail!("template directory '{}' does not exist", dir.display());
                }
                Some(dir.clone())
            }
            None => default_template_dir().filter(|dir| dir.is_dir()),
        };

        let store: Box<dyn TemplateStore> = match overrides {
            Some(dir) => {
                tracing::debug!("template overrides from {}", dir.display());
                Box::new(LayeredTemplateStore::new(DirTemplateStore::new(dir), EmbeddedTemplates))
            }
            None => Box::new(EmbeddedTemplates),
        };
        Ok(Renderer::new(store))
    }
}

/// `~/.pilot/templates`
fn default_template_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pilot").join("templates"))
}
