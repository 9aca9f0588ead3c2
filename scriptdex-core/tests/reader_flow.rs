use scriptdex_core::{Category, Config, IndexReader, MemberKind, ScriptdexError, SqliteIndex};
use tempfile::TempDir;

/// Index file populated the way the indexer writes a small widget library
fn widget_index(dir: &TempDir) -> SqliteIndex {
    let index = SqliteIndex::open(&dir.path().join("index.db")).unwrap();
    index
        .add_records([
            (Category::Type, "Widget\0\0A UI widget", "lib/widget.js"),
            (Category::Type, "Button\0Widget\0A clickable widget", "lib/button.js"),
            (Category::Type, "Broken", "lib/broken.js"),
            (Category::Type, "Foo\0\0first half", "lib/foo_a.js"),
            (Category::Type, "Foo\0\0second half", "lib/foo_b.js"),
            (Category::Property, "Widget\0visible\0Boolean", "lib/widget.js"),
            (Category::Property, "Button\0label\0String\0Caption text", "lib/button.js"),
            (
                Category::Function,
                "Widget\0moveTo\0Boolean\0x:Number,y:Number\0Moves the widget",
                "lib/widget.js",
            ),
            (Category::Event, "Button\0click\0x:Number,y:Number", "lib/button.js"),
            (Category::Require, "lib/widget.js,lib/util.js", "app.js"),
            (Category::Require, "lib/util.js,lib/button.js", "app.js"),
            (Category::Require, "lib/other.js", "other.js"),
        ])
        .unwrap();
    index
}

#[test]
fn test_widget_scenario() {
    let dir = TempDir::new().unwrap();
    let index = widget_index(&dir);
    let reader = IndexReader::default();

    let types = reader.get_type(&index, "Widget", true).unwrap();
    assert_eq!(types.len(), 1);

    let widget = &types[0];
    assert_eq!(widget.name, "Widget");
    assert!(widget.parent_types.is_empty());
    assert_eq!(widget.description.as_deref(), Some("A UI widget"));
    assert_eq!(widget.documents, vec!["lib/widget.js"]);
    assert!(widget.serialize_properties);

    let visible = widget.property("visible").unwrap();
    assert!(matches!(&visible.kind, MemberKind::Property(p) if p.types == ["Boolean"]));

    let move_to = widget.property("moveTo").unwrap();
    let MemberKind::Function(f) = &move_to.kind else {
        panic!("moveTo should decode as a function");
    };
    assert_eq!(f.signature(&move_to.name), "moveTo(x, y)");
}

#[test]
fn test_partial_definitions_are_not_merged() {
    let dir = TempDir::new().unwrap();
    let index = widget_index(&dir);

    let foos: Vec<_> = IndexReader::default()
        .get_types(&index, false)
        .unwrap()
        .into_iter()
        .filter(|t| t.name == "Foo")
        .collect();

    assert_eq!(foos.len(), 2);
    assert_eq!(foos[0].documents, vec!["lib/foo_a.js"]);
    assert_eq!(foos[1].documents, vec!["lib/foo_b.js"]);
}

#[test]
fn test_type_names_skip_broken_records() {
    let dir = TempDir::new().unwrap();
    let index = widget_index(&dir);

    let names = IndexReader::default().type_names(&index).unwrap();
    assert_eq!(names, vec!["Widget", "Button", "Foo", "Foo"]);
}

#[test]
fn test_get_types_with_members() {
    let dir = TempDir::new().unwrap();
    let index = widget_index(&dir);

    let types = IndexReader::default().get_types(&index, true).unwrap();
    let button = types.iter().find(|t| t.name == "Button").unwrap();

    assert_eq!(button.parent_types, vec!["Widget"]);
    assert_eq!(button.properties.len(), 1);
    assert_eq!(button.events.len(), 1);
    assert_eq!(button.properties[0].description.as_deref(), Some("Caption text"));
    assert!(types.iter().all(|t| t.serialize_properties));
}

#[test]
fn test_supertype_members() {
    let dir = TempDir::new().unwrap();
    let index = widget_index(&dir);
    let reader = IndexReader::default();

    assert_eq!(reader.type_ancestors(&index, "Button").unwrap(), vec!["Widget"]);

    let names: Vec<_> = reader
        .type_properties_with_ancestors(&index, "Button")
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["visible", "label", "moveTo"]);
}

#[test]
fn test_requires_for_location() {
    let dir = TempDir::new().unwrap();
    let index = widget_index(&dir);
    let reader = IndexReader::default();

    let requires: Vec<_> = reader
        .requires_for_location(&index, "app.js")
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(requires, vec!["lib/button.js", "lib/util.js", "lib/widget.js"]);
    assert!(reader.requires_for_location(&index, "missing.js").unwrap().is_empty());
}

#[test]
fn test_removed_document_disappears_from_queries() {
    let dir = TempDir::new().unwrap();
    let index = widget_index(&dir);
    let reader = IndexReader::default();

    index.remove_document("lib/button.js").unwrap();

    assert!(reader.get_type(&index, "Button", true).unwrap().is_empty());
    assert!(reader.events_for_type(&index, "Button").unwrap().is_empty());
    assert_eq!(reader.get_type(&index, "Widget", false).unwrap().len(), 1);
}

#[test]
fn test_configured_delimiters() {
    let config = Config::from_toml("[delimiters]\nprimary = \"#\"\nsub = \";\"\n").unwrap();
    let reader = IndexReader::from_config(&config);

    let index = SqliteIndex::open_in_memory().unwrap();
    index
        .add_records([
            (Category::Type, "Widget#Base;Observable#desc", "w.js"),
            (Category::Property, "Widget#visible#Boolean;String", "w.js"),
            (Category::Function, "Widget#moveTo##x:Number|String;y", "w.js"),
        ])
        .unwrap();

    let types = reader.get_type(&index, "Widget", true).unwrap();
    assert_eq!(types[0].parent_types, vec!["Base", "Observable"]);
    assert_eq!(types[0].properties[0].value_types(), ["Boolean", "String"]);

    let MemberKind::Function(f) = &types[0].properties[1].kind else {
        panic!("moveTo should decode as a function");
    };
    assert_eq!(f.parameters[0].types, vec!["Number", "String"]);
    assert_eq!(f.signature("moveTo"), "moveTo(x, y)");
}

#[test]
fn test_invalid_glob_from_engine_is_reported() {
    use scriptdex_core::{IndexEngine, MatchMode};

    let index = SqliteIndex::open_in_memory().unwrap();
    let err = index
        .query(&[Category::Type], "[", MatchMode::PATTERN_MATCH)
        .unwrap_err();
    assert!(matches!(err, ScriptdexError::InvalidPattern { mode: "glob", .. }));
}
