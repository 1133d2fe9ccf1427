//! Rendering tests for the embedded template set.

use pilot_core::{load, DerivedModel, StaticModuleRoot};
use pilot_renderer::{EmbeddedTemplates, RenderError, Renderer, TemplateStore};
use rstest::rstest;
use tempfile::TempDir;

const PROJECT_TEMPLATES: &[&str] = &[
    "code/main.go.tera",
    "code/scheduler.go.tera",
    "code/config.go.tera",
    "code/doc.go.tera",
    "code/phases.go.tera",
    "code/register.go.tera",
    "code/spec.go.tera",
    "code/types.go.tera",
    "build/Dockerfile.tera",
    "build/user_setup.tera",
    "build/entrypoint.tera",
];

const PHASE_TEMPLATES: &[&str] = &["code/parameters.go.tera", "code/worker.go.tera"];

fn make_model() -> DerivedModel {
    let yaml = "\
apiVersion: apps.example.com/v1
kind: Widget
phases:
  - name: build-image
    description: bakes the container image
    inputs: [spec]
    outputs: [image-ref]
  - name: publish
    outputs: [status]
  - name: idle
";
    load(yaml.as_bytes(), &StaticModuleRoot::from("github.com/acme/widget-operator"))
        .expect("load")
}

#[test]
fn template_lists_cover_embedded_set() {
    let mut all: Vec<&str> = PROJECT_TEMPLATES.iter().chain(PHASE_TEMPLATES).copied().collect();
    all.sort();
    let mut embedded: Vec<&str> = EmbeddedTemplates::ids().collect();
    embedded.sort();
    assert_eq!(all, embedded);
}

#[rstest]
fn every_project_template_renders(
    #[values(
        "code/main.go.tera",
        "code/scheduler.go.tera",
        "code/config.go.tera",
        "code/doc.go.tera",
        "code/phases.go.tera",
        "code/register.go.tera",
        "code/spec.go.tera",
        "code/types.go.tera",
        "build/Dockerfile.tera",
        "build/user_setup.tera",
        "build/entrypoint.tera"
    )]
    id: &str,
) {
    let model = make_model();
    let out = Renderer::embedded()
        .render(id, &model)
        .unwrap_or_else(|e| panic!("render failed for {id}: {e}"));
    assert!(!out.trim().is_empty(), "{id} rendered empty");
    assert!(!out.contains('\r'), "{id} contains CR");
    assert!(!out.contains("{{") && !out.contains("{%"), "{id} left template syntax behind");
}

#[rstest]
fn every_phase_template_renders(
    #[values("code/parameters.go.tera", "code/worker.go.tera")] id: &str,
    #[values("build-image", "publish")] phase: &str,
) {
    let model = make_model();
    let bound = model.phase(phase).expect("phase");
    let out = Renderer::embedded()
        .render(id, &bound)
        .unwrap_or_else(|e| panic!("render failed for {id}/{phase}: {e}"));
    assert!(out.contains(&format!("package {}", bound.worker_package())));
    assert!(out.contains("github.com/acme/widget-operator/pkg/apis/widgets/v1"));
}

#[test]
fn scheduler_imports_only_file_producing_workers() {
    let out = Renderer::embedded().render("code/scheduler.go.tera", &make_model()).unwrap();
    assert!(out.contains("\"github.com/acme/widget-operator/pkg/workers/buildimage\""));
    assert!(out.contains("\"github.com/acme/widget-operator/pkg/workers/publish\""));
    assert!(!out.contains("pkg/workers/idle"));
    assert!(out.contains("case v1.WidgetPhaseIdle:\n\t\treturn nil"));
    assert!(out.contains("(&buildimage.Worker{}).Sync(ctx, &widget)"));
}

#[test]
fn phases_file_declares_every_phase() {
    let out = Renderer::embedded().render("code/phases.go.tera", &make_model()).unwrap();
    assert!(out.contains("WidgetPhaseBuildImage WidgetPhase = \"build-image\""));
    assert!(out.contains("WidgetPhasePublish WidgetPhase = \"publish\""));
    assert!(out.contains("WidgetPhaseIdle WidgetPhase = \"idle\""));
}

#[test]
fn register_uses_group_and_plural_resource() {
    let out = Renderer::embedded().render("code/register.go.tera", &make_model()).unwrap();
    assert!(out.contains("Group: \"apps.example.com\", Version: \"v1\""));
    assert!(out.contains("WithResource(\"widgets\")"));
}

#[test]
fn parameters_reflect_declared_capabilities() {
    let model = make_model();
    let renderer = Renderer::embedded();

    let both = renderer
        .render("code/parameters.go.tera", &model.phase("build-image").unwrap())
        .unwrap();
    assert!(both.contains("type Inputs struct"));
    assert!(both.contains("\tSpec *v1.Widget"));
    assert!(both.contains("type Outputs struct"));
    assert!(both.contains("\tImageRef v1.WidgetStatus"));

    let outputs_only = renderer
        .render("code/parameters.go.tera", &model.phase("publish").unwrap())
        .unwrap();
    assert!(!outputs_only.contains("type Inputs struct"));
    assert!(outputs_only.contains("type Outputs struct"));
}

#[test]
fn worker_includes_description_when_present() {
    let model = make_model();
    let renderer = Renderer::embedded();
    let described = renderer
        .render("code/worker.go.tera", &model.phase("build-image").unwrap())
        .unwrap();
    assert!(described.contains("build-image phase: bakes the container image."));
    let plain = renderer
        .render("code/worker.go.tera", &model.phase("publish").unwrap())
        .unwrap();
    assert!(plain.contains("Worker runs the publish phase."));
}

#[test]
fn container_files_use_operator_name() {
    let renderer = Renderer::embedded();
    let model = make_model();
    let dockerfile = renderer.render("build/Dockerfile.tera", &model).unwrap();
    assert!(dockerfile.contains("USER_NAME=widget-operator"));
    let entrypoint = renderer.render("build/entrypoint.tera", &model).unwrap();
    assert!(entrypoint.starts_with("#!/bin/sh"));
}

#[test]
fn rendering_twice_is_identical() {
    let model = make_model();
    let renderer = Renderer::embedded();
    for id in PROJECT_TEMPLATES {
        let a = renderer.render(id, &model).unwrap();
        let b = renderer.render(id, &model).unwrap();
        assert_eq!(a, b, "{id} is not deterministic");
    }
    let phase = model.phase("build-image").unwrap();
    for id in PHASE_TEMPLATES {
        assert_eq!(renderer.render(id, &phase).unwrap(), renderer.render(id, &phase).unwrap());
    }
}

#[test]
fn directory_override_wins_over_embedded() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("code")).unwrap();
    std::fs::write(
        dir.path().join("code/main.go.tera"),
        "// custom main for {{ operator_name }}\n",
    )
    .unwrap();

    let renderer = Renderer::with_overrides(dir.path());
    let model = make_model();
    assert_eq!(
        renderer.render("code/main.go.tera", &model).unwrap(),
        "// custom main for widget-operator\n"
    );
    let doc = renderer.render("code/doc.go.tera", &model).unwrap();
    assert_eq!(doc, Renderer::embedded().render("code/doc.go.tera", &model).unwrap());
}

#[test]
fn broken_override_reports_syntax_error() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("code")).unwrap();
    std::fs::write(dir.path().join("code/doc.go.tera"), "{% for %}").unwrap();

    let renderer = Renderer::with_overrides(dir.path());
    assert!(renderer.store().load("code/doc.go.tera").is_ok());
    let err = renderer.render("code/doc.go.tera", &make_model()).unwrap_err();
    match err {
        RenderError::Syntax { template, .. } => assert_eq!(template, "code/doc.go.tera"),
        other => panic!("expected syntax error, got {other}"),
    }
}
