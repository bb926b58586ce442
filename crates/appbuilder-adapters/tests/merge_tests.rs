//! Configuration merging against real XML on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use appbuilder_adapters::{LocalFilesystem, XotParser};
use appbuilder_core::{
    application::{ApplicationError, ConfigInjector, ports::XmlParser},
    domain::{Element, RelativePath, TemplateTree, TokenMap},
    error::AppBuilderError,
};
use tempfile::TempDir;

const CONFIG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<model xmlns="http://www.neeveresearch.com/schema/x-ddl">
  <buses/>
      <apps>
    </apps>
  <profiles>
    <profile name="dev">
       <env>
           <nv.loglevel>info</nv.loglevel>
       </env>
    </profile>
  </profiles>
</model>
"#;

fn injector() -> ConfigInjector {
    ConfigInjector::new(Arc::new(LocalFilesystem::new()), Arc::new(XotParser::new()))
}

fn config_file(temp: &TempDir, content: &str) -> PathBuf {
    let path = temp.path().join("conf/config.xml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn tree(files: &[(&str, &str)]) -> TemplateTree {
    files.iter().fold(TemplateTree::new(), |tree, (path, content)| {
        tree.with_file(RelativePath::try_new(path).unwrap(), *content)
    })
}

fn inject(path: &Path, files: &[(&str, &str)], tokens: &TokenMap) -> appbuilder_core::domain::MergeReport {
    let injector = injector();
    let fragments = injector.collect_fragments(&tree(files), tokens).unwrap();
    injector.inject_file(path, fragments).unwrap()
}

fn parse(path: &Path) -> Element {
    let text = fs::read_to_string(path).unwrap();
    XotParser::new().parse(&text, "config.xml").unwrap()
}

fn child<'a>(el: &'a Element, name: &str) -> &'a Element {
    el.elements().find(|e| e.name() == name).unwrap()
}

#[test]
fn merging_twice_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let path = config_file(&temp, CONFIG);
    let files = [
        ("apps/config.xml", r#"<app name="{{Svc}}"><storage enabled="true"/></app>"#),
        ("profiles/dev/apps/config.xml", r#"<app name="{{Svc}}"/>"#),
    ];
    let tokens = TokenMap::builder().token("Svc", "orders").build();

    let first = inject(&path, &files, &tokens);
    assert_eq!(first.injected(), 2);
    let after_first = fs::read_to_string(&path).unwrap();

    let second = inject(&path, &files, &tokens);
    assert_eq!(second.injected(), 0);
    assert_eq!(second.duplicates(), 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
}

#[test]
fn carriage_returns_survive_repeated_merges() {
    let injector = injector();
    let document = "<model><v a=\"x&#13;y\">a&#13;b</v></model>";
    let fragment = || {
        injector
            .collect_fragments(&tree(&[("apps/config.xml", "<app name=\"orders\"/>")]), &TokenMap::new())
            .unwrap()
    };

    let (first, _) = injector.merge_text(document, "config.xml", fragment()).unwrap();
    assert!(first.contains(r#"<v a="x&#13;y">a&#13;b</v>"#), "{first}");

    let (second, report) = injector.merge_text(&first, "config.xml", fragment()).unwrap();
    assert_eq!(report.duplicates(), 1);
    assert_eq!(second, first);
}

#[test]
fn header_comment_survives_a_merge() {
    let temp = TempDir::new().unwrap();
    let with_header = CONFIG.replacen(
        "?>\n",
        "?>\n<!-- Copyright ACME Corp. Generated file, edit with care. -->\n",
        1,
    );
    let path = config_file(&temp, &with_header);
    let files = [("apps/config.xml", r#"<app name="orders"/>"#)];

    let report = inject(&path, &files, &TokenMap::new());
    assert_eq!(report.injected(), 1);

    let merged = fs::read_to_string(&path).unwrap();
    assert!(
        merged.starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <!-- Copyright ACME Corp. Generated file, edit with care. -->\n\
             <model "
        ),
        "{merged}"
    );

    inject(&path, &files, &TokenMap::new());
    assert_eq!(fs::read_to_string(&path).unwrap(), merged);
}

#[test]
fn output_is_canonical_with_no_blank_text() {
    let temp = TempDir::new().unwrap();
    let path = config_file(&temp, CONFIG);

    inject(
        &path,
        &[("apps/config.xml", "<app name=\"orders\">\n\n   <x/>\n</app>")],
        &TokenMap::new(),
    );

    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<model xmlns="http://www.neeveresearch.com/schema/x-ddl">
    <buses/>
    <apps>
        <app name="orders">
            <x/>
        </app>
    </apps>
    <profiles>
        <profile name="dev">
            <env>
                <nv.loglevel>info</nv.loglevel>
            </env>
        </profile>
    </profiles>
</model>
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn profiles_are_keyed_by_name() {
    let temp = TempDir::new().unwrap();
    let path = config_file(&temp, CONFIG);

    inject(
        &path,
        &[
            ("profiles/dev/apps/config.xml", r#"<app name="a"/>"#),
            ("profiles/test/apps/config.xml", r#"<app name="a"/>"#),
            ("profiles/test/xvms/config.xml", r#"<xvm name="a-1"/>"#),
        ],
        &TokenMap::new(),
    );

    let root = parse(&path);
    let profiles: Vec<&Element> = child(&root, "profiles").elements().collect();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].attribute("name"), Some("dev"));
    assert_eq!(profiles[1].attribute("name"), Some("test"));

    let test_children: Vec<&str> = profiles[1].elements().map(|e| e.name()).collect();
    assert_eq!(test_children, ["apps", "xvms"]);
}

#[test]
fn attribute_order_does_not_defeat_deduplication() {
    let temp = TempDir::new().unwrap();
    let path = config_file(&temp, CONFIG);

    let first = inject(
        &path,
        &[("apps/config.xml", r#"<app name="orders" autoStart="true"/>"#)],
        &TokenMap::new(),
    );
    let second = inject(
        &path,
        &[("apps/config.xml", r#"<app autoStart="true" name="orders"/>"#)],
        &TokenMap::new(),
    );

    assert_eq!(first.injected(), 1);
    assert_eq!(second.duplicates(), 1);
    assert_eq!(child(&parse(&path), "apps").elements().count(), 1);
}

#[test]
fn differing_attribute_values_coexist() {
    let temp = TempDir::new().unwrap();
    let path = config_file(&temp, CONFIG);

    inject(&path, &[("apps/config.xml", r#"<app name="orders"/>"#)], &TokenMap::new());
    inject(&path, &[("apps/config.xml", r#"<app name="fills"/>"#)], &TokenMap::new());

    let doc = parse(&path);
    let names: Vec<&str> = child(&doc, "apps")
        .elements()
        .filter_map(|e| e.attribute("name"))
        .collect();
    assert_eq!(names, ["orders", "fills"]);
}

#[test]
fn token_value_containing_delimiters_is_not_rescanned() {
    let temp = TempDir::new().unwrap();
    let path = config_file(&temp, CONFIG);
    let tokens = TokenMap::builder()
        .token("A", "{{B}}")
        .token("B", "never")
        .build();

    inject(&path, &[("apps/config.xml", r#"<app name="{{A}}"/>"#)], &tokens);

    let root = parse(&path);
    let app = child(&root, "apps").elements().next().unwrap();
    assert_eq!(app.attribute("name"), Some("{{B}}"));
}

#[test]
fn bad_fragment_leaves_document_untouched() {
    let temp = TempDir::new().unwrap();
    let path = config_file(&temp, CONFIG);

    let injector = injector();
    let err = injector
        .collect_fragments(
            &tree(&[
                ("apps/config.xml", r#"<app name="ok"/>"#),
                ("xvms/config.xml", r#"<xvm name="broken">"#),
            ]),
            &TokenMap::new(),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        AppBuilderError::Application(ApplicationError::FragmentParse { ref fragment, .. })
            if fragment == "xvms/config.xml"
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG);
}
