//! End-to-end generation: descriptor bytes → rendered file set → disk.

use std::fs;

use pilot_codegen::{
    generate, plan, write_files, FileScope, GeneratedFile, WriteResult, PROJECT_FILE_COUNT,
};
use pilot_core::{load, DerivedModel, LoadError, StaticModuleRoot};
use pilot_renderer::Renderer;
use rstest::rstest;
use tempfile::TempDir;

const MODULE_ROOT: &str = "github.com/acme/widget-operator";

fn load_model(yaml: &str) -> Result<DerivedModel, LoadError> {
    load(yaml.as_bytes(), &StaticModuleRoot::from(MODULE_ROOT))
}

fn descriptor(phases: &str) -> String {
    format!("apiVersion: apps.example.com/v1\nkind: Widget\nphases:\n{phases}")
}

fn phase_outputs(files: &[GeneratedFile], phase: &str) -> Vec<String> {
    files
        .iter()
        .filter(|f| f.scope == FileScope::Phase(phase.into()))
        .map(|f| f.output_path.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn phase_with_inputs_gets_parameters_and_worker() {
    let model = load_model(&descriptor("  - name: build\n    inputs: [spec]\n    outputs: []\n"))
        .expect("load");
    assert!(model.types_import_path().contains("widgets/v1"));

    let files = generate(&model, &Renderer::embedded()).expect("generate");
    assert_eq!(files.len(), PROJECT_FILE_COUNT + 2);
    assert_eq!(
        phase_outputs(&files, "build"),
        [
            format!("{MODULE_ROOT}/pkg/workers/build/parameters.go"),
            format!("{MODULE_ROOT}/pkg/workers/build/worker.go"),
        ]
    );
}

#[test]
fn phase_without_inputs_or_outputs_gets_nothing() {
    let model = load_model(&descriptor("  - name: noop\n    inputs: []\n    outputs: []\n"))
        .expect("load");
    let files = generate(&model, &Renderer::embedded()).expect("generate");
    assert_eq!(files.len(), PROJECT_FILE_COUNT);
    assert!(phase_outputs(&files, "noop").is_empty());
}

#[test]
fn malformed_api_version_fails_before_generation() {
    let err = load_model("apiVersion: badformat\nkind: Widget\nphases: []\n").unwrap_err();
    assert!(matches!(err, LoadError::Malformed(_)));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[rstest]
#[case("  - name: a\n    inputs: [x]\n", 2)]
#[case("  - name: a\n    outputs: [y]\n", 2)]
#[case("  - name: a\n    inputs: [x]\n    outputs: [y]\n", 2)]
#[case("  - name: a\n", 0)]
fn phase_file_count_is_zero_or_two(#[case] phases: &str, #[case] expected: usize) {
    let model = load_model(&descriptor(phases)).expect("load");
    let planned = plan(&model);
    let for_phase = planned
        .iter()
        .filter(|f| f.scope == FileScope::Phase("a".into()))
        .count();
    assert_eq!(for_phase, expected);
    assert_eq!(planned.len() - for_phase, PROJECT_FILE_COUNT);
}

#[test]
fn skip_flags_are_exactly_config_spec_and_workers() {
    let model = load_model(&descriptor(
        "  - name: build-image\n    inputs: [spec]\n  - name: publish\n    outputs: [ref]\n",
    ))
    .expect("load");
    let skipped: Vec<_> = plan(&model)
        .into_iter()
        .filter(|f| f.skip_if_exists)
        .map(|f| f.relative_path(MODULE_ROOT).to_string())
        .collect();
    assert_eq!(
        skipped,
        [
            "pkg/config/config.go",
            "pkg/apis/widgets/v1/spec.go",
            "pkg/workers/buildimage/worker.go",
            "pkg/workers/publish/worker.go",
        ]
    );
}

#[test]
fn phases_are_planned_in_descriptor_order() {
    let model = load_model(&descriptor(
        "  - name: zeta\n    inputs: [a]\n  - name: alpha\n    inputs: [b]\n",
    ))
    .expect("load");
    let planned = plan(&model);
    let scopes: Vec<_> = planned[PROJECT_FILE_COUNT..]
        .iter()
        .map(|f| f.scope.to_string())
        .collect();
    assert_eq!(scopes, ["phase zeta", "phase zeta", "phase alpha", "phase alpha"]);
}

#[test]
fn generation_is_deterministic() {
    let yaml = descriptor("  - name: build\n    inputs: [spec]\n    outputs: [image]\n");
    let renderer = Renderer::embedded();
    let first = generate(&load_model(&yaml).unwrap(), &renderer).unwrap();
    let second = generate(&load_model(&yaml).unwrap(), &renderer).unwrap();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

#[test]
fn regeneration_preserves_hand_edited_files() {
    let out = TempDir::new().expect("out");
    let model = load_model(&descriptor("  - name: build\n    inputs: [spec]\n")).expect("load");
    let files = generate(&model, &Renderer::embedded()).expect("generate");

    let first = write_files(&files, out.path(), MODULE_ROOT, false).expect("write");
    assert!(first.iter().all(|r| matches!(r, WriteResult::Written { .. })));
    assert!(out.path().join("build/bin/entrypoint").exists());

    let worker = out.path().join("pkg/workers/build/worker.go");
    fs::write(&worker, "package build\n\n// hand written\n").expect("edit");

    let second = write_files(&files, out.path(), MODULE_ROOT, false).expect("rewrite");
    let skipped = second
        .iter()
        .filter(|r| matches!(r, WriteResult::Skipped { .. }))
        .count();
    assert_eq!(skipped, 3);
    assert!(second
        .iter()
        .all(|r| matches!(r, WriteResult::Skipped { .. } | WriteResult::Unchanged { .. })));
    assert_eq!(
        fs::read_to_string(&worker).unwrap(),
        "package build\n\n// hand written\n"
    );
}
