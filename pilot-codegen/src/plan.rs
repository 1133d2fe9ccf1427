//! File-set planning.
//!
//! [`plan`] turns a [`DerivedModel`] into the ordered list of files a
//! generation run produces: the fixed project-level set first, then two
//! files per phase (in descriptor order) for every phase that declares
//! inputs or outputs. Nothing is rendered here.

use std::fmt;

use pilot_core::{BoundPhase, DerivedModel, PhaseName};

/// Number of project-level files every plan starts with.
pub const PROJECT_FILE_COUNT: usize = 11;

/// Which rendering context a planned file is rendered against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileScope {
    Project,
    Phase(PhaseName),
}

impl fmt::Display for FileScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileScope::Project => f.write_str("project"),
            FileScope::Phase(name) => write!(f, "phase {name}"),
        }
    }
}

/// One output file of a generation run, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Module-root-prefixed, `/`-separated path (`<root>/pkg/config/config.go`).
    pub output_path: String,
    /// Identifier in the template store.
    pub template_id: &'static str,
    /// The file is meant to be hand-edited after the first generation.
    pub skip_if_exists: bool,
    /// Written with the execute bit set (container scripts).
    pub executable: bool,
    pub scope: FileScope,
}

impl PlannedFile {
    fn project(output_path: String, template_id: &'static str, skip_if_exists: bool) -> Self {
        PlannedFile {
            output_path,
            template_id,
            skip_if_exists,
            executable: false,
            scope: FileScope::Project,
        }
    }

    fn executable(mut self) -> Self {
        self.executable = true;
        self
    }

    /// `output_path` with the module root and its separator removed.
    ///
    /// Paths outside `module_root` are returned whole.
    pub fn relative_path<'a>(&'a self, module_root: &str) -> &'a str {
        self.output_path
            .strip_prefix(module_root)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.output_path)
    }
}

/// The fixed project-level file set.
pub fn project_files(model: &DerivedModel) -> Vec<PlannedFile> {
    let root = model.module_root();
    let scheduler = model.scheduler_import_path();
    let config = model.config_import_path();
    let types = model.types_import_path();

    vec![
        PlannedFile::project(format!("{root}/main.go"), "code/main.go.tera", false),
        PlannedFile::project(format!("{scheduler}/scheduler.go"), "code/scheduler.go.tera", false),
        PlannedFile::project(format!("{config}/config.go"), "code/config.go.tera", true),
        PlannedFile::project(format!("{types}/doc.go"), "code/doc.go.tera", false),
        PlannedFile::project(format!("{types}/phases.go"), "code/phases.go.tera", false),
        PlannedFile::project(format!("{types}/register.go"), "code/register.go.tera", false),
        PlannedFile::project(format!("{types}/spec.go"), "code/spec.go.tera", true),
        PlannedFile::project(format!("{types}/types.go"), "code/types.go.tera", false),
        PlannedFile::project(format!("{root}/build/Dockerfile"), "build/Dockerfile.tera", false),
        PlannedFile::project(format!("{root}/build/bin/user_setup"), "build/user_setup.tera", false)
            .executable(),
        PlannedFile::project(format!("{root}/build/bin/entrypoint"), "build/entrypoint.tera", false)
            .executable(),
    ]
}

/// Worker files for one phase; empty when the phase has neither inputs
/// nor outputs.
pub fn phase_files(phase: &BoundPhase<'_>) -> Vec<PlannedFile> {
    if !phase.generates_files() {
        return Vec::new();
    }
    let dir = phase.worker_import_path();
    let file = |name: &str, template_id: &'static str, skip_if_exists: bool| PlannedFile {
        output_path: format!("{dir}/{name}"),
        template_id,
        skip_if_exists,
        executable: false,
        scope: FileScope::Phase(phase.name.clone()),
    };
    vec![
        file("parameters.go", "code/parameters.go.tera", false),
        file("worker.go", "code/worker.go.tera", true),
    ]
}

/// Every file a generation run produces, in output order.
pub fn plan(model: &DerivedModel) -> Vec<PlannedFile> {
    let mut files = project_files(model);
    for phase in model.phases() {
        files.extend(phase_files(&phase));
    }
    files
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_core::{load, StaticModuleRoot};

    fn model(phases: &str) -> DerivedModel {
        let yaml = format!("apiVersion: apps.example.com/v1\nkind: Widget\nphases:\n{phases}");
        load(yaml.as_bytes(), &StaticModuleRoot::from("example.com/op")).unwrap()
    }

    #[test]
    fn project_file_set_is_fixed() {
        let m = model("  - name: noop\n");
        let files = project_files(&m);
        assert_eq!(files.len(), PROJECT_FILE_COUNT);
        assert_eq!(files[0].output_path, "example.com/op/main.go");
        assert_eq!(files[1].output_path, "example.com/op/pkg/scheduler/scheduler.go");
        assert_eq!(files[2].output_path, "example.com/op/pkg/config/config.go");
        assert_eq!(files[3].output_path, "example.com/op/pkg/apis/widgets/v1/doc.go");
        assert_eq!(files[10].output_path, "example.com/op/build/bin/entrypoint");
        assert!(files.iter().all(|f| f.scope == FileScope::Project));
    }

    #[test]
    fn only_container_scripts_are_executable() {
        let m = model("  - name: build\n    inputs: [spec]\n");
        let executable: Vec<_> = plan(&m)
            .into_iter()
            .filter(|f| f.executable)
            .map(|f| f.relative_path("example.com/op").to_string())
            .collect();
        assert_eq!(executable, ["build/bin/user_setup", "build/bin/entrypoint"]);
    }

    #[test]
    fn degenerate_phase_contributes_nothing() {
        let m = model("  - name: noop\n  - name: build\n    outputs: [image]\n");
        let files = plan(&m);
        assert_eq!(files.len(), PROJECT_FILE_COUNT + 2);
        assert!(phase_files(&m.phase("noop").unwrap()).is_empty());
    }

    #[test]
    fn phase_files_live_under_worker_package() {
        let m = model("  - name: build-image\n    inputs: [spec]\n");
        let files = phase_files(&m.phase("build-image").unwrap());
        let paths: Vec<_> = files.iter().map(|f| f.output_path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "example.com/op/pkg/workers/buildimage/parameters.go",
                "example.com/op/pkg/workers/buildimage/worker.go",
            ]
        );
        assert_eq!(files[0].scope, FileScope::Phase(PhaseName::from("build-image")));
    }

    #[test]
    fn relative_path_strips_module_root() {
        let m = model("  - name: noop\n");
        let files = project_files(&m);
        assert_eq!(files[2].relative_path("example.com/op"), "pkg/config/config.go");
        assert_eq!(files[2].relative_path("other.com/x"), files[2].output_path);
        // A root that is only a string prefix of a segment does not match.
        assert_eq!(files[0].relative_path("example.com/o"), "example.com/op/main.go");
    }

    #[test]
    fn scope_display() {
        assert_eq!(FileScope::Project.to_string(), "project");
        assert_eq!(FileScope::Phase("build".into()).to_string(), "phase build");
    }
}
