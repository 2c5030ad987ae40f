//! Structural properties of the generated token trees.

use std::collections::BTreeSet;

use launchpad_theme::{ThemeMode, create_theme};
use serde_json::Value;

fn keys(value: &Value) -> BTreeSet<String> {
    value
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

#[test]
fn modes_share_top_level_keys_and_color_roles() -> Result<(), serde_json::Error> {
    let light = serde_json::to_value(create_theme(ThemeMode::Light))?;
    let dark = serde_json::to_value(create_theme(ThemeMode::Dark))?;

    assert_eq!(keys(&light), keys(&dark));
    assert!(keys(&light).contains("semanticSpacing"));
    assert!(keys(&light).contains("glassEffects"));

    let light_roles = keys(&light["colors"]);
    let dark_roles = keys(&dark["colors"]);
    assert_eq!(light_roles, dark_roles);
    assert!(light_roles.contains("textSecondary"));
    assert_ne!(light["colors"], dark["colors"]);
    Ok(())
}

#[test]
fn create_theme_is_deterministic() {
    for mode in [ThemeMode::Light, ThemeMode::Dark] {
        assert_eq!(create_theme(mode), create_theme(mode));
    }
}

#[test]
fn toggling_twice_restores_the_tree() {
    let original = create_theme(ThemeMode::Light);
    let mode = original.mode.toggle();
    let toggled = create_theme(mode);
    assert_ne!(original, toggled);
    assert_eq!(create_theme(mode.toggle()), original);
}

#[test]
fn invalid_mode_strings_yield_the_light_tree() {
    assert_eq!(
        create_theme(ThemeMode::parse("neon")),
        create_theme(ThemeMode::Light)
    );
}

#[test]
fn serialized_spacing_uses_tier_names() -> Result<(), serde_json::Error> {
    let value = serde_json::to_value(create_theme(ThemeMode::Light))?;
    assert_eq!(value["spacing"]["3xl"], 64);
    assert_eq!(value["semanticSpacing"]["xs"], 8);
    assert_eq!(value["breakpoints"][5]["name"], "2xl");
    assert_eq!(value["mode"], "light");
    Ok(())
}
