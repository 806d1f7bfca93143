//! Integration tests for the module entity

mod common;

use common::*;
use modkit_core::Error;
use modkit_modules::{Module, ModuleEventKind, ModuleManifest};
use serde_json::{json, Value};
use serial_test::serial;

#[test]
fn test_name_forms() {
    let fixture = ModulesFixture::new().unwrap();
    let module = Module::new(
        ModuleManifest::new("Recipe Name"),
        fixture.modules_dir().join("RecipeName"),
        MANIFEST,
        fixture.file_store(),
    );

    assert_eq!(module.name(), "Recipe Name");
    assert_eq!(module.lower_name(), "recipe name");
    assert_eq!(module.studly_name(), "RecipeName");
    assert_eq!(module.snake_name(), "recipe_name");
    assert_eq!(module.to_string(), "RecipeName");
}

#[test]
fn test_manifest_accessors() {
    let fixture = ModulesFixture::valid().unwrap();
    let module = fixture.repository().find_or_fail(RECIPE).unwrap();

    assert_eq!(module.alias(), "recipe");
    assert_eq!(module.description(), "recipe module");
    assert_eq!(module.version(), "0.1");
    assert_eq!(module.requires(), ["required_module"]);
    assert_eq!(module.priority(), 0);
    assert!(module.keywords().is_empty());
    assert_eq!(module.path(), fixture.modules_dir().join(RECIPE));
    assert_eq!(module.manifest_path(), fixture.modules_dir().join(RECIPE).join(MANIFEST));
    assert_eq!(
        module.extra_path("Assets/test.js"),
        fixture.modules_dir().join(RECIPE).join("Assets/test.js")
    );
}

#[test]
fn test_get_reads_manifest_keys() {
    let fixture = ModulesFixture::valid().unwrap();
    let module = fixture.repository().find_or_fail(RECIPE).unwrap();

    assert_eq!(module.get("version", Value::Null).unwrap(), json!("0.1"));
    assert_eq!(
        module.get("some-thing-non-there", "my default").unwrap(),
        json!("my default")
    );
}

#[test]
fn test_json_reads_other_files() {
    let fixture = ModulesFixture::valid().unwrap();
    let module = fixture.repository().find_or_fail(RECIPE).unwrap();
    std::fs::write(module.extra_path("composer.json"), r#"{"name": "acme/recipe"}"#).unwrap();

    let composer = module.json(Some("composer.json")).unwrap();
    assert_eq!(composer.get_str("name"), Some("acme/recipe"));
    assert_eq!(module.json(None).unwrap().get_str("name"), Some("Recipe"));
}

#[test]
fn test_enable_fires_events_in_order() {
    let fixture = ModulesFixture::valid().unwrap();
    let module = fixture.repository().find_or_fail(RECIPE).unwrap();

    module.enable().unwrap();
    module.disable().unwrap();

    assert_eq!(
        fixture.sink().names(),
        vec![
            "modules.recipe.enabling",
            "modules.recipe.enabled",
            "modules.recipe.disabling",
            "modules.recipe.disabled",
        ]
    );
}

#[test]
fn test_failed_write_skips_after_event() {
    let fixture = ModulesFixture::valid().unwrap();
    // A directory where the statuses file should be makes every write fail
    std::fs::create_dir_all(fixture.statuses_file()).unwrap();
    let module = fixture.repository().find_or_fail(RECIPE).unwrap();

    assert!(module.enable().is_err());
    let kinds: Vec<ModuleEventKind> = fixture.sink().events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ModuleEventKind::Enabling]);
}

#[test]
fn test_delete_removes_directory_and_status() {
    let fixture = ModulesFixture::valid().unwrap();
    let repository = fixture.repository();
    let module = repository.find_or_fail(RECIPE).unwrap();
    module.enable().unwrap();

    module.delete().unwrap();

    assert!(!module.path().exists());
    assert_eq!(fixture.statuses_content().unwrap(), "{}\n");
    assert_eq!(repository.count().unwrap(), VALID_MODULE_COUNT - 1);
}

#[test]
fn test_delete_tolerates_missing_directory() {
    let fixture = ModulesFixture::valid().unwrap();
    let module = fixture.repository().find_or_fail(ORDER).unwrap();
    std::fs::remove_dir_all(module.path()).unwrap();

    module.delete().unwrap();
}

#[test]
#[serial]
fn test_registered_macro_binds_module() {
    Module::flush_macros();
    let fixture = ModulesFixture::valid().unwrap();
    let module = fixture.repository().find_or_fail(RECIPE).unwrap();

    Module::register_macro("getReverseName", |module: &Module, _args: &[Value]| {
        Value::String(module.lower_name().chars().rev().collect())
    });

    assert!(Module::has_macro("getReverseName"));
    assert_eq!(
        module.call_macro("getReverseName", &[]).unwrap(),
        json!("epicer")
    );
    Module::flush_macros();
}

#[test]
#[serial]
fn test_macro_receives_arguments() {
    Module::flush_macros();
    let fixture = ModulesFixture::valid().unwrap();
    let module = fixture.repository().find_or_fail(ORDER).unwrap();

    Module::register_macro("prefixed", |module: &Module, args: &[Value]| {
        let prefix = args.first().and_then(Value::as_str).unwrap_or("");
        json!(format!("{}{}", prefix, module.name()))
    });

    assert_eq!(
        module.call_macro("prefixed", &[json!("mod-")]).unwrap(),
        json!("mod-Order")
    );
    Module::flush_macros();
}

#[test]
#[serial]
fn test_unknown_macro() {
    Module::flush_macros();
    let fixture = ModulesFixture::valid().unwrap();
    let module = fixture.repository().find_or_fail(RECIPE).unwrap();

    let err = module.call_macro("getReverseName", &[]).unwrap_err();
    assert!(matches!(err, Error::MacroNotFound { .. }));
    assert!(!Module::has_macro("getReverseName"));
}
