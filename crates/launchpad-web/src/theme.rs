//! Theme context shared through the component tree.
//!
//! The provider owns the current mode; consumers read the token tree through
//! [`use_theme`] and never mutate it. A mode change replaces the whole tree.

use std::rc::Rc;
use std::sync::Arc;

use launchpad_theme::{Theme, ThemeMode, ThemeStyles};
use yew::prelude::*;

/// Attribute on the document root carrying the active mode.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Read-only view of the active theme plus a handle to change it.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeContext {
    theme: Arc<Theme>,
    set_mode: Callback<ThemeMode>,
}

impl ThemeContext {
    /// Context over `theme`; mode changes are reported through `set_mode`.
    #[must_use]
    pub const fn new(theme: Arc<Theme>, set_mode: Callback<ThemeMode>) -> Self {
        Self { theme, set_mode }
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.theme.mode
    }

    /// Active token tree.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Request a specific mode.
    pub fn set_mode(&self, mode: ThemeMode) {
        self.set_mode.emit(mode);
    }

    /// Request the opposite mode.
    pub fn toggle(&self) {
        self.set_mode(self.mode().toggle());
    }
}

/// Active theme from the nearest `ThemeProvider`.
///
/// # Panics
///
/// Panics when called outside a `ThemeProvider`; that is a wiring bug, not a
/// runtime condition.
#[hook]
pub fn use_theme() -> ThemeContext {
    match use_context::<ThemeContext>() {
        Some(context) => context,
        None => panic!("use_theme must be called inside a <ThemeProvider>"),
    }
}

/// Derived style presets for the active theme, recomputed only when the mode changes.
///
/// # Panics
///
/// Panics when called outside a `ThemeProvider`.
#[hook]
pub fn use_theme_styles() -> Rc<ThemeStyles> {
    let context = use_theme();
    let theme = Arc::clone(&context.theme);
    use_memo(move |_| theme.styles(), context.mode())
}

/// Element the active theme is mirrored onto (the document root in the browser).
pub trait ThemeTarget {
    /// Set one CSS custom property, leaving other inline declarations alone.
    ///
    /// # Errors
    ///
    /// Returns a description of the host failure.
    fn set_property(&self, name: &str, value: &str) -> Result<(), String>;

    /// Set an attribute.
    ///
    /// # Errors
    ///
    /// Returns a description of the host failure.
    fn set_attribute(&self, name: &str, value: &str) -> Result<(), String>;
}

/// Mirror `theme` onto `target`: every CSS custom property plus [`THEME_ATTRIBUTE`].
///
/// Failures are collected and returned; the remaining properties are still applied.
#[must_use]
pub fn mirror_theme(target: &impl ThemeTarget, theme: &Theme) -> Vec<String> {
    let mut failures = Vec::new();
    if let Err(err) = target.set_attribute(THEME_ATTRIBUTE, theme.mode.as_str()) {
        failures.push(err);
    }
    for (name, value) in theme.css_variables() {
        if let Err(err) = target.set_property(&name, &value) {
            failures.push(err);
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_theme::create_theme;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    #[test]
    fn toggle_requests_opposite_mode() {
        let requested = Rc::new(Cell::new(None::<ThemeMode>));
        let set_mode = {
            let requested = Rc::clone(&requested);
            Callback::from(move |mode: ThemeMode| requested.set(Some(mode)))
        };
        let context = ThemeContext::new(Arc::new(create_theme(ThemeMode::Light)), set_mode);

        context.toggle();
        assert_eq!(requested.get(), Some(ThemeMode::Dark));
        assert_eq!(context.mode(), ThemeMode::Light);
    }

    #[derive(Default)]
    struct RecordingTarget {
        properties: RefCell<BTreeMap<String, String>>,
        attributes: RefCell<BTreeMap<String, String>>,
    }

    impl ThemeTarget for RecordingTarget {
        fn set_property(&self, name: &str, value: &str) -> Result<(), String> {
            self.properties
                .borrow_mut()
                .insert(name.to_string(), value.to_string());
            Ok(())
        }

        fn set_attribute(&self, name: &str, value: &str) -> Result<(), String> {
            self.attributes
                .borrow_mut()
                .insert(name.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn mirroring_keeps_unrelated_inline_styles() {
        let target = RecordingTarget::default();
        target
            .properties
            .borrow_mut()
            .insert("overflow".into(), "hidden".into());

        let theme = create_theme(ThemeMode::Dark);
        assert!(mirror_theme(&target, &theme).is_empty());

        let properties = target.properties.borrow();
        assert_eq!(properties.get("overflow").map(String::as_str), Some("hidden"));
        assert_eq!(properties.len(), theme.css_variables().len() + 1);
        assert_eq!(
            properties.get("--color-primary").map(String::as_str),
            Some(theme.colors.primary)
        );
        assert_eq!(
            target.attributes.borrow().get(THEME_ATTRIBUTE).map(String::as_str),
            Some("dark")
        );
    }

    #[test]
    fn mode_switch_overwrites_theme_properties() {
        let target = RecordingTarget::default();
        assert!(mirror_theme(&target, &create_theme(ThemeMode::Light)).is_empty());
        let dark = create_theme(ThemeMode::Dark);
        assert!(mirror_theme(&target, &dark).is_empty());
        assert_eq!(
            target.properties.borrow().get("--color-background").map(String::as_str),
            Some(dark.colors.background)
        );
    }
}
