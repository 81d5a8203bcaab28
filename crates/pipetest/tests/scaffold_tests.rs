//! Tests for project and pipeline scaffolding through `TestProject`.

mod common;

use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_yaml::Value;

use pipetest::project::{CATALOG_PATH, PARAMETERS_PATH};
use pipetest::TestProject;

#[test]
fn new_project_creates_expected_subtree() {
    common::setup();
    let mut project = TestProject::new().unwrap();
    let root = project.new_project("my_project").unwrap();

    assert!(root.is_absolute());
    let root = ChildPath::new(root.as_path());
    root.child("pipeline.toml").assert(predicate::path::exists());
    root.child("conf/base/catalog.yml")
        .assert(predicate::path::exists());
    root.child("conf/base/parameters.yml")
        .assert(predicate::path::exists());
    root.child("conf/local").assert(predicate::path::exists());
    root.child("data").assert(predicate::path::exists());
    root.child("src/my_project/pipelines")
        .assert(predicate::path::exists());
    root.child("src/my_project/registry.yml")
        .assert(predicate::path::exists());
}

#[test]
fn create_pipeline_adds_exactly_two_catalog_entries() {
    common::setup();
    let mut project = TestProject::new().unwrap();
    project.new_project("proj").unwrap();

    project.create_pipeline("pipe").unwrap();

    let catalog = project.read_yml(CATALOG_PATH).unwrap();
    assert_eq!(catalog.len(), 2);
    for key in ["pipe-input", "pipe-output"] {
        let entry = catalog
            .get(key)
            .and_then(Value::as_mapping)
            .unwrap();
        assert_eq!(
            entry.get("type").and_then(Value::as_str),
            Some("csv.CsvDataset")
        );
        assert!(entry.contains_key("filepath"));
    }

    let parameters = project.read_yml(PARAMETERS_PATH).unwrap();
    assert_eq!(
        parameters.get("pipe-param"),
        Some(&Value::from(1))
    );
}

#[test]
fn second_pipeline_merges_into_existing_catalog() {
    common::setup();
    let mut project = TestProject::new().unwrap();
    project.new_project("proj").unwrap();

    project.create_pipeline("first").unwrap();
    project.create_pipeline("second").unwrap();

    let catalog = project.read_yml(CATALOG_PATH).unwrap();
    assert_eq!(catalog.len(), 4);
    assert!(catalog.contains_key("first-input"));
    assert!(catalog.contains_key("second-input"));

    let registry = project.read_yml("src/proj/registry.yml").unwrap();
    let listed = registry
        .get("pipelines")
        .and_then(Value::as_sequence)
        .unwrap();
    assert_eq!(listed.len(), 2);
}

#[test]
fn creating_the_same_pipeline_twice_is_a_noop() {
    common::setup();
    let mut project = TestProject::new().unwrap();
    project.new_project("proj").unwrap();

    project.create_pipeline("pipe").unwrap();
    project.create_pipeline("pipe").unwrap();

    assert_eq!(project.pipelines(), ["pipe"]);
    let catalog = project.read_yml(CATALOG_PATH).unwrap();
    assert_eq!(catalog.len(), 2);
}

#[test]
fn pipeline_fragments_are_merged_over_the_default_definition() {
    common::setup();
    let mut project = TestProject::new().unwrap();
    project.new_project("proj").unwrap();

    let fragment: serde_yaml::Mapping = serde_yaml::from_str("description: custom pipeline").unwrap();
    project.create_pipeline_with("pipe", &[fragment]).unwrap();

    let definition = project.read_yml("src/proj/pipelines/pipe.yml").unwrap();
    assert_eq!(
        definition.get("description").and_then(Value::as_str),
        Some("custom pipeline")
    );
    // the default node survives alongside the fragment
    assert!(definition.contains_key("nodes"));
}

#[test]
fn sample_data_file_is_written_once_per_project() {
    common::setup();
    let mut project = TestProject::new().unwrap();
    let root = project.new_project("proj").unwrap();
    project.create_pipeline("pipe").unwrap();

    let csv = std::fs::read_to_string(root.join("data/input.csv")).unwrap();
    assert!(csv.starts_with("a,b\n"));
}
