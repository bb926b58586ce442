//! End-to-end: create an application and add services with the built-in
//! templates on a real filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use appbuilder_adapters::{
    EmbeddedTemplateLoader, JsonProjectRecordStore, LocalFilesystem, TokenRenderer, XotParser,
};
use appbuilder_core::{
    application::{ApplicationError, ScaffoldService, ports::XmlParser},
    domain::{
        AppParams, BuildTool, Element, EncodingType, MessagingProvider, ServiceHaModel,
        ServiceParams, ServiceType,
    },
    error::AppBuilderError,
};
use tempfile::TempDir;

fn service() -> ScaffoldService {
    let filesystem = Arc::new(LocalFilesystem::new());
    ScaffoldService::new(
        Arc::new(EmbeddedTemplateLoader::new()),
        Arc::new(TokenRenderer::new()),
        filesystem.clone(),
        Arc::new(XotParser::new()),
        Arc::new(JsonProjectRecordStore::new(filesystem)),
    )
}

fn params(app_dir: &Path) -> AppParams {
    AppParams {
        app_name: "Order Book".into(),
        app_dir: app_dir.to_path_buf(),
        package_name: "com.acme.orderbook".into(),
        group_id: "com.acme".into(),
        artifact_prefix: "acme".into(),
        rumi_version: "4.0.1".into(),
        rumi_bindings_version: "4.0.1".into(),
        rumi_mgmt_version: "4.0.0".into(),
        encoding_type: EncodingType::Quark,
        messaging_provider: MessagingProvider::Kafka,
        build_tool: BuildTool::Maven,
    }
}

fn processor(name: &str) -> ServiceParams {
    ServiceParams::new(name, ServiceType::Processor, Some(ServiceHaModel::EventSourcing), true, 2)
        .unwrap()
}

fn config(root: &Path) -> Element {
    let text = fs::read_to_string(root.join("acme-orderbook-system/conf/config.xml")).unwrap();
    XotParser::new().parse(&text, "config.xml").unwrap()
}

fn child<'a>(el: &'a Element, name: &str) -> &'a Element {
    el.elements().find(|e| e.name() == name).unwrap()
}

fn create(temp: &TempDir) -> PathBuf {
    service().create_application(&params(temp.path())).unwrap()
}

#[test]
fn creates_application_skeleton() {
    let temp = TempDir::new().unwrap();
    let root = create(&temp);

    assert_eq!(root, temp.path().join("acme-orderbook"));
    assert!(root.join(".rumi").is_file());
    assert!(root.join("acme-orderbook-roe/src/main/models").is_dir());

    let pom = fs::read_to_string(root.join("pom.xml")).unwrap();
    assert!(pom.contains("<artifactId>acme-orderbook</artifactId>"));
    assert!(pom.contains("        <module>acme-orderbook-system</module>"));

    let system_pom = fs::read_to_string(root.join("acme-orderbook-system/pom.xml")).unwrap();
    assert!(system_pom.contains("<artifactId>nvx-rumi-kafka</artifactId>"));
    assert!(!system_pom.contains("{{"));
}

#[test]
fn refuses_to_overwrite_an_application() {
    let temp = TempDir::new().unwrap();
    create(&temp);

    let err = service().create_application(&params(temp.path())).unwrap_err();
    assert!(matches!(
        err,
        AppBuilderError::Application(ApplicationError::ProjectExists { .. })
    ));
}

#[test]
fn refuses_existing_plain_directory() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("acme-orderbook")).unwrap();

    let err = service().create_application(&params(temp.path())).unwrap_err();
    assert!(matches!(
        err,
        AppBuilderError::Application(ApplicationError::DirectoryExists { .. })
    ));
}

#[test]
fn adds_a_processor_service() {
    let temp = TempDir::new().unwrap();
    let root = create(&temp);

    let report = service()
        .add_service(&root, &processor("Order Processor"))
        .unwrap();

    assert_eq!(report.artifact_id, "acme-orderbook-order-processor");
    assert_eq!((report.state_model_id, report.message_model_id), (1, 2));
    assert!(report.pom_updated);
    assert!(report.config.injected() > 0);

    let module = root.join("acme-orderbook-order-processor");
    let main = fs::read_to_string(
        module.join("src/main/java/com/acme/orderbook/order/processor/Main.java"),
    )
    .unwrap();
    assert!(main.contains("package com.acme.orderbook.order.processor;"));
    assert!(main.contains("HAPolicy.EventSourcing"));

    let state = fs::read_to_string(
        module.join("src/main/models/com/acme/orderbook/order/processor/state/state.xml"),
    )
    .unwrap();
    assert!(state.contains(r#"id="1""#));

    let pom = fs::read_to_string(root.join("pom.xml")).unwrap();
    let service_line = pom.find("<module>acme-orderbook-order-processor</module>").unwrap();
    let system_line = pom.find("<module>acme-orderbook-system</module>").unwrap();
    assert!(service_line < system_line);

    let config = config(&root);
    let app = child(&config, "apps").elements().next().unwrap();
    assert_eq!(app.attribute("name"), Some("orderbook-order-processor"));
}

#[test]
fn second_service_gets_fresh_ids_and_shares_the_bus() {
    let temp = TempDir::new().unwrap();
    let root = create(&temp);
    let svc = service();

    svc.add_service(&root, &processor("Order Processor")).unwrap();
    let second = svc
        .add_service(
            &root,
            &ServiceParams::new("Market Feed", ServiceType::Driver, None, false, 1).unwrap(),
        )
        .unwrap();

    assert_eq!((second.state_model_id, second.message_model_id), (3, 4));
    assert_eq!(second.config.duplicates(), 1);

    let config = config(&root);
    assert_eq!(child(&config, "buses").elements().count(), 1);
    assert_eq!(child(&config, "apps").elements().count(), 2);
    assert_eq!(child(&config, "xvms").elements().count(), 2);
}

#[test]
fn re_adding_a_service_leaves_config_and_pom_unchanged() {
    let temp = TempDir::new().unwrap();
    let root = create(&temp);
    let svc = service();
    let params = processor("Order Processor");

    svc.add_service(&root, &params).unwrap();
    let config_path = root.join("acme-orderbook-system/conf/config.xml");
    let config_before = fs::read_to_string(&config_path).unwrap();
    let pom_before = fs::read_to_string(root.join("pom.xml")).unwrap();

    let again = svc.add_service(&root, &params).unwrap();

    assert!(!again.pom_updated);
    assert_eq!(again.config.injected(), 0);
    assert_eq!(fs::read_to_string(&config_path).unwrap(), config_before);
    assert_eq!(fs::read_to_string(root.join("pom.xml")).unwrap(), pom_before);
}

#[test]
fn add_service_outside_an_application_fails() {
    let temp = TempDir::new().unwrap();
    let err = service()
        .add_service(temp.path(), &processor("Order Processor"))
        .unwrap_err();
    assert!(matches!(
        err,
        AppBuilderError::Application(ApplicationError::NotAnApplication { .. })
    ));
}
