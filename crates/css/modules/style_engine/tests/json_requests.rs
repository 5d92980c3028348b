#![cfg(test)]

use core::error::Error;
use std::io::Write as _;

use serde_json::json;
use style_engine::{
    EngineConfig, PriorityMode, StaticEnvironment, StyleArgs, StyleDeclaration, StyleGroup,
    StyleRegistry, StyleType,
};
use tempfile::NamedTempFile;

fn init_logging() {
    if let Err(error) = env_logger::builder().is_test(true).try_init() {
        log::trace!("logger already initialised: {error}");
    }
}

#[test]
fn nested_style_groups_flatten_in_document_order() -> Result<(), Box<dyn Error>> {
    init_logging();
    let request = json!({
        "id": "divi/image-0",
        "orderIndex": "3",
        "storeInstance": 1,
        "presetPriority": 15,
        "group": "presetGroup",
        "styles": [
            {
                "module": {
                    "general": {
                        ".img": { "selector": ".img", "declaration": "width:100%;" }
                    },
                    "tablet": [
                        {
                            "selector": ".img",
                            "declaration": "width:50%;",
                            "atRules": "@media only screen and ( max-width: 980px )"
                        }
                    ]
                },
                "image": { "general": { "": { "selector": "", "declaration": ".x{top:0}" } } }
            },
            "not a group",
            null,
            []
        ]
    });
    let args = StyleArgs::from_json(&request)?;

    assert_eq!(args.id, "divi/image-0");
    assert_eq!(args.order_index, 3);
    assert_eq!(args.store_instance, Some(1));
    assert_eq!(args.priority, None);
    assert_eq!(args.preset_priority, Some(15));
    assert_eq!(args.group, Some(StyleGroup::PresetGroup));
    assert_eq!(
        args.styles,
        vec![
            StyleDeclaration::new(".img", "width:100%;"),
            StyleDeclaration::new(".img", "width:50%;")
                .at_rules("@media only screen and ( max-width: 980px )"),
            StyleDeclaration::free_form(".x{top:0}"),
        ]
    );
    Ok(())
}

#[test]
fn string_styles_degrade_to_no_styles() -> Result<(), Box<dyn Error>> {
    init_logging();
    let args = StyleArgs::from_json(&json!({ "id": "bad", "styles": ".a{color:red}" }))?;
    assert!(args.styles.is_empty());

    let mut registry = StyleRegistry::default();
    registry.add(&StaticEnvironment, args);
    assert!(registry.is_empty());
    Ok(())
}

#[test]
fn malformed_items_are_skipped() -> Result<(), Box<dyn Error>> {
    init_logging();
    let args = StyleArgs::from_json(&json!({
        "id": 7,
        "styles": [
            { "selector": ".a", "declaration": 12 },
            { "selector": ".b", "declaration": "color:red;" },
            { "selector": ".c" }
        ]
    }))?;
    assert_eq!(args.id, "7");
    assert_eq!(args.styles, vec![StyleDeclaration::new(".b", "color:red;")]);
    Ok(())
}

#[test]
fn non_object_requests_are_rejected() {
    init_logging();
    assert!(StyleArgs::from_json(&json!(["styles"])).is_err());
    assert!(StyleArgs::from_json(&json!("styles")).is_err());
}

#[test]
fn config_defaults_fill_missing_fields() -> Result<(), Box<dyn Error>> {
    let config = EngineConfig::from_json_str(r#"{ "priority_mode": "legacy" }"#)?;
    assert_eq!(config.priority_mode, PriorityMode::Legacy);
    assert_eq!(config.default_priority, 10);
    assert_eq!(config.style_tag_prefix, "et-builder-module-design");
    Ok(())
}

#[test]
fn config_rejects_unknown_fields() {
    assert!(EngineConfig::from_json_str(r#"{ "priorty_mode": "legacy" }"#).is_err());
}

#[test]
fn config_loads_from_file() -> Result<(), Box<dyn Error>> {
    init_logging();
    let mut file = NamedTempFile::new()?;
    file.write_all(
        br#"{
            "default_priority": 50,
            "style_tag_prefix": "page-styles",
            "media_queries": { "max_width_479": "" }
        }"#,
    )?;
    let config = EngineConfig::from_path(file.path())?;
    assert_eq!(config.default_priority, 50);
    assert!(config.media_query_table().get("max_width_479").is_none());

    let mut registry = StyleRegistry::new(config);
    registry.add(
        &StaticEnvironment,
        StyleArgs::new("one")
            .style(StyleDeclaration::new(".a", "color:red;"))
            .style(StyleDeclaration::new(".b", "color:blue;").at_rules("max_width_479")),
    );
    let stored = registry
        .get_style_array(None, None)
        .and_then(|buckets| buckets.get("general"))
        .and_then(|selectors| selectors.get(".a"))
        .map(|entry| entry.priority.base);
    assert_eq!(stored, Some(50));
    // A removed breakpoint name no longer resolves and falls back to the general bucket.
    let buckets = registry.get_style_array(None, None);
    assert!(buckets.is_some_and(|stored| !stored.contains_key("max_width_479")));
    assert!(
        buckets
            .and_then(|stored| stored.get("general"))
            .is_some_and(|selectors| selectors.contains_key(".b"))
    );
    let tag = registry.enqueue(&StaticEnvironment, StyleType::Default, None, None);
    assert_eq!(
        tag.as_deref(),
        Some(
            "<style id=\"page-styles-post-module\">.a {color:red;}\n.b {color:blue;}</style>"
        )
    );
    Ok(())
}

#[test]
fn missing_config_file_is_an_error() -> Result<(), Box<dyn Error>> {
    let directory = tempfile::tempdir()?;
    assert!(EngineConfig::from_path(&directory.path().join("absent.json")).is_err());
    Ok(())
}
