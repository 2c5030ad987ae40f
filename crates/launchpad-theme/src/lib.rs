#![forbid(unsafe_code)]
#![deny(
    warnings,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
//! Design-token engine for the Launchpad marketing site.
//!
//! A [`Theme`] is a pure function of [`ThemeMode`]: [`create_theme`] always
//! builds the full tree (colours, spacing, typography, shadows, glass effects,
//! animation presets, breakpoints) and never patches an existing one. Hosts
//! hold the current mode in a [`ThemeController`], which swaps the whole tree
//! on every change and persists the choice through a [`PreferenceStore`].

pub mod breakpoints;
pub mod color;
pub mod controller;
pub mod mode;
pub mod styles;
pub mod tokens;
pub mod utils;

pub use breakpoints::{BREAKPOINTS, Breakpoint};
pub use color::{ColorError, Rgba};
pub use controller::{
    MemoryPreferenceStore, PreferenceStore, StoreError, THEME_STORAGE_KEY, ThemeController,
};
pub use mode::ThemeMode;
pub use styles::ThemeStyles;
pub use tokens::{
    AnimationPreset, AnimationPresets, ColorRoles, FontFamilies, FontSizes, FontWeights,
    GlassEffect, GlassEffects, LetterSpacing, LineHeights, Shadows, SpacingScale, Typography,
};
pub use utils::ThemeUtils;

use serde::Serialize;

/// Complete token tree for a single [`ThemeMode`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Mode the tree was derived from.
    pub mode: ThemeMode,
    /// Semantic colour roles.
    pub colors: ColorRoles,
    /// Component spacing scale in pixels.
    pub spacing: SpacingScale,
    /// Layout rhythm scale (section and container gaps) in pixels.
    pub semantic_spacing: SpacingScale,
    /// Font stacks and type scales.
    pub typography: Typography,
    /// Box-shadow presets.
    pub shadows: Shadows,
    /// Frosted-glass surface presets.
    pub glass_effects: GlassEffects,
    /// Entrance and loading animation presets.
    pub animations: AnimationPresets,
    /// Responsive breakpoints.
    pub breakpoints: [Breakpoint; 6],
    /// Colour helpers derived from the tree.
    #[serde(skip)]
    pub utils: ThemeUtils,
}

/// Build the token tree for `mode`.
///
/// Only colours depend on the mode; every other group is shared, so two calls
/// with the same mode always produce equal trees.
#[must_use]
pub const fn create_theme(mode: ThemeMode) -> Theme {
    let colors = match mode {
        ThemeMode::Light => tokens::LIGHT_COLORS,
        ThemeMode::Dark => tokens::DARK_COLORS,
    };
    Theme {
        mode,
        colors,
        spacing: tokens::SPACING,
        semantic_spacing: tokens::SEMANTIC_SPACING,
        typography: tokens::TYPOGRAPHY,
        shadows: tokens::SHADOWS,
        glass_effects: tokens::GLASS_EFFECTS,
        animations: tokens::ANIMATIONS,
        breakpoints: BREAKPOINTS,
        utils: ThemeUtils,
    }
}

impl Default for Theme {
    fn default() -> Self {
        create_theme(ThemeMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_light() {
        assert_eq!(Theme::default().mode, ThemeMode::Light);
        assert_eq!(Theme::default(), create_theme(ThemeMode::Light));
    }

    #[test]
    fn only_colors_differ_between_modes() {
        let light = create_theme(ThemeMode::Light);
        let dark = create_theme(ThemeMode::Dark);
        assert_ne!(light.colors, dark.colors);
        assert_eq!(light.spacing, dark.spacing);
        assert_eq!(light.typography, dark.typography);
        assert_eq!(light.shadows, dark.shadows);
        assert_eq!(light.glass_effects, dark.glass_effects);
    }
}
