//! Factory-id allocation over model files on disk.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use appbuilder_adapters::{LocalFilesystem, XotParser};
use appbuilder_core::{
    application::FactoryIdAllocator,
    domain::{DomainError, MODEL_NAMESPACE},
    error::AppBuilderError,
};
use tempfile::TempDir;

fn allocator() -> FactoryIdAllocator {
    FactoryIdAllocator::new(Arc::new(LocalFilesystem::new()), Arc::new(XotParser::new()))
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn model(ids: &[&str]) -> String {
    let mut out = format!(r#"<model xmlns="{MODEL_NAMESPACE}"><factories>"#);
    for id in ids {
        write!(out, r#"<factory name="F{id}" id="{id}"/>"#).unwrap();
    }
    out.push_str("</factories></model>");
    out
}

#[test]
fn fills_gaps_then_extends() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a/messages.xml", &model(&["2", "3"]));
    write(temp.path(), "b/c/state.xml", &model(&["7"]));

    assert_eq!(allocator().allocate(temp.path(), 4).unwrap(), [1, 4, 5, 6]);
}

#[test]
fn returns_every_gap_even_beyond_min_count() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "m.xml", &model(&["10"]));

    let ids = allocator().allocate(temp.path(), 2).unwrap();
    assert_eq!(ids, (1..10).collect::<Vec<u16>>());
}

#[test]
fn prefixed_model_namespace_is_recognised() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "m.xml",
        &format!(r#"<x:model xmlns:x="{MODEL_NAMESPACE}"><x:factory id="1"/></x:model>"#),
    );

    assert_eq!(allocator().allocate(temp.path(), 1).unwrap(), [2]);
}

#[test]
fn foreign_and_broken_files_are_skipped() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "pom.xml", r#"<project><factory id="40"/></project>"#);
    write(temp.path(), "broken.xml", "<model");
    write(temp.path(), "notes.txt", &model(&["50"]));
    write(temp.path(), "real.xml", &model(&["1", ""]));

    assert_eq!(allocator().allocate(temp.path(), 2).unwrap(), [2, 3]);
}

#[test]
fn malformed_identifier_is_fatal() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "m.xml", &model(&["1", "40000"]));

    let err = allocator().allocate(temp.path(), 1).unwrap_err();
    assert!(matches!(
        err,
        AppBuilderError::Domain(DomainError::MalformedIdentifier { .. })
    ));
}

#[test]
fn exhausted_range_is_an_error() {
    let temp = TempDir::new().unwrap();
    let all: Vec<String> = (1..=32767).map(|i| i.to_string()).collect();
    let refs: Vec<&str> = all.iter().map(String::as_str).collect();
    write(temp.path(), "m.xml", &model(&refs));

    let err = allocator().allocate(temp.path(), 1).unwrap_err();
    assert!(matches!(
        err,
        AppBuilderError::Domain(DomainError::IdentifiersExhausted { .. })
    ));
}

#[test]
fn application_scan_ignores_files_outside_models() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "svc/src/main/models/com/acme/m.xml", &model(&["1", "2"]));
    write(temp.path(), "svc/src/test/resources/m.xml", &model(&["3"]));

    assert_eq!(
        allocator().allocate_for_application(temp.path(), 2).unwrap(),
        [3, 4]
    );
}
