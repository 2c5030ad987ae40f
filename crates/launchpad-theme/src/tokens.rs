//! Static design tokens.
//!
//! Colours are the only mode-dependent group; spacing, typography, shadows,
//! glass effects and animations are shared by both modes.

use serde::Serialize;

/// Semantic colour roles. The struct shape fixes the role set, so both modes
/// always define exactly the same roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorRoles {
    /// Brand colour for primary actions.
    pub primary: &'static str,
    /// Hover/pressed state of [`ColorRoles::primary`].
    pub primary_hover: &'static str,
    /// Secondary brand colour used in gradients and links.
    pub secondary: &'static str,
    /// Highlight colour for badges and callouts.
    pub accent: &'static str,
    /// Page background.
    pub background: &'static str,
    /// Alternating section background.
    pub background_alt: &'static str,
    /// Card and panel background.
    pub surface: &'static str,
    /// Raised surfaces such as menus and modals.
    pub surface_elevated: &'static str,
    /// Body text.
    pub text: &'static str,
    /// Supporting text.
    pub text_secondary: &'static str,
    /// Captions, placeholders and disabled text.
    pub text_muted: &'static str,
    /// Default borders.
    pub border: &'static str,
    /// Hairline dividers.
    pub border_subtle: &'static str,
    /// Positive feedback.
    pub success: &'static str,
    /// Cautionary feedback.
    pub warning: &'static str,
    /// Error feedback.
    pub error: &'static str,
    /// Neutral informational feedback.
    pub info: &'static str,
}

impl ColorRoles {
    /// Role name/value pairs in declaration order, using the serialised role names.
    #[must_use]
    pub const fn roles(&self) -> [(&'static str, &'static str); 17] {
        [
            ("primary", self.primary),
            ("primaryHover", self.primary_hover),
            ("secondary", self.secondary),
            ("accent", self.accent),
            ("background", self.background),
            ("backgroundAlt", self.background_alt),
            ("surface", self.surface),
            ("surfaceElevated", self.surface_elevated),
            ("text", self.text),
            ("textSecondary", self.text_secondary),
            ("textMuted", self.text_muted),
            ("border", self.border),
            ("borderSubtle", self.border_subtle),
            ("success", self.success),
            ("warning", self.warning),
            ("error", self.error),
            ("info", self.info),
        ]
    }
}

/// Light mode colour roles.
pub const LIGHT_COLORS: ColorRoles = ColorRoles {
    primary: "#4F46E5",
    primary_hover: "#4338CA",
    secondary: "#0EA5E9",
    accent: "#F59E0B",
    background: "#FFFFFF",
    background_alt: "#F8FAFC",
    surface: "#FFFFFF",
    surface_elevated: "#F1F5F9",
    text: "#0F172A",
    text_secondary: "#475569",
    text_muted: "#94A3B8",
    border: "#E2E8F0",
    border_subtle: "#F1F5F9",
    success: "#16A34A",
    warning: "#D97706",
    error: "#DC2626",
    info: "#2563EB",
};

/// Dark mode colour roles.
pub const DARK_COLORS: ColorRoles = ColorRoles {
    primary: "#818CF8",
    primary_hover: "#6366F1",
    secondary: "#38BDF8",
    accent: "#FBBF24",
    background: "#0B0F19",
    background_alt: "#111827",
    surface: "#111827",
    surface_elevated: "#1F2937",
    text: "#F8FAFC",
    text_secondary: "#CBD5E1",
    text_muted: "#64748B",
    border: "#1F2937",
    border_subtle: "#161E2E",
    success: "#22C55E",
    warning: "#F59E0B",
    error: "#F87171",
    info: "#60A5FA",
};

/// Size tiers from `xs` to `3xl`, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SpacingScale {
    /// Extra small.
    pub xs: u16,
    /// Small.
    pub sm: u16,
    /// Medium.
    pub md: u16,
    /// Large.
    pub lg: u16,
    /// Extra large.
    pub xl: u16,
    /// Double extra large.
    #[serde(rename = "2xl")]
    pub xxl: u16,
    /// Triple extra large.
    #[serde(rename = "3xl")]
    pub xxxl: u16,
}

impl SpacingScale {
    /// Tier name/value pairs from smallest to largest.
    #[must_use]
    pub const fn tiers(&self) -> [(&'static str, u16); 7] {
        [
            ("xs", self.xs),
            ("sm", self.sm),
            ("md", self.md),
            ("lg", self.lg),
            ("xl", self.xl),
            ("2xl", self.xxl),
            ("3xl", self.xxxl),
        ]
    }
}

/// Component spacing (padding, gaps inside cards and forms).
pub const SPACING: SpacingScale = SpacingScale {
    xs: 4,
    sm: 8,
    md: 16,
    lg: 24,
    xl: 32,
    xxl: 48,
    xxxl: 64,
};

/// Layout rhythm (section padding, container gutters).
pub const SEMANTIC_SPACING: SpacingScale = SpacingScale {
    xs: 8,
    sm: 16,
    md: 32,
    lg: 48,
    xl: 64,
    xxl: 96,
    xxxl: 128,
};

/// Font stacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FontFamilies {
    /// Body copy.
    pub sans: &'static [&'static str],
    /// Code samples and API snippets.
    pub mono: &'static [&'static str],
    /// Headlines.
    pub display: &'static [&'static str],
}

/// Font size scale in `rem`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FontSizes {
    /// 0.75rem.
    pub xs: f32,
    /// 0.875rem.
    pub sm: f32,
    /// 1rem.
    pub base: f32,
    /// 1.125rem.
    pub lg: f32,
    /// 1.25rem.
    pub xl: f32,
    /// 1.5rem.
    #[serde(rename = "2xl")]
    pub xxl: f32,
    /// 1.875rem.
    #[serde(rename = "3xl")]
    pub xxxl: f32,
    /// 2.25rem.
    #[serde(rename = "4xl")]
    pub xxxxl: f32,
    /// 3rem.
    #[serde(rename = "5xl")]
    pub huge: f32,
    /// 3.75rem.
    #[serde(rename = "6xl")]
    pub hero: f32,
}

/// Numeric font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FontWeights {
    /// 300.
    pub light: u16,
    /// 400.
    pub normal: u16,
    /// 500.
    pub medium: u16,
    /// 600.
    pub semibold: u16,
    /// 700.
    pub bold: u16,
    /// 800.
    pub extrabold: u16,
}

/// Unitless line-height multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineHeights {
    /// Headlines.
    pub tight: f32,
    /// Subheadings.
    pub snug: f32,
    /// Body copy.
    pub normal: f32,
    /// Long-form blog content.
    pub relaxed: f32,
    /// Spacious captions.
    pub loose: f32,
}

/// Letter spacing in `em`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LetterSpacing {
    /// Large display type.
    pub tighter: f32,
    /// Headlines.
    pub tight: f32,
    /// Body copy.
    pub normal: f32,
    /// Buttons.
    pub wide: f32,
    /// Uppercase eyebrows.
    pub wider: f32,
}

/// Typography tokens.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    /// Font stacks.
    pub font_family: FontFamilies,
    /// Size scale.
    pub font_size: FontSizes,
    /// Weight scale.
    pub font_weight: FontWeights,
    /// Line-height scale.
    pub line_height: LineHeights,
    /// Tracking scale.
    pub letter_spacing: LetterSpacing,
}

/// Shared typography tokens.
pub const TYPOGRAPHY: Typography = Typography {
    font_family: FontFamilies {
        sans: &[
            "Inter",
            "-apple-system",
            "BlinkMacSystemFont",
            "Segoe UI",
            "Roboto",
            "sans-serif",
        ],
        mono: &["JetBrains Mono", "Fira Code", "Menlo", "monospace"],
        display: &["Cal Sans", "Inter", "sans-serif"],
    },
    font_size: FontSizes {
        xs: 0.75,
        sm: 0.875,
        base: 1.0,
        lg: 1.125,
        xl: 1.25,
        xxl: 1.5,
        xxxl: 1.875,
        xxxxl: 2.25,
        huge: 3.0,
        hero: 3.75,
    },
    font_weight: FontWeights {
        light: 300,
        normal: 400,
        medium: 500,
        semibold: 600,
        bold: 700,
        extrabold: 800,
    },
    line_height: LineHeights {
        tight: 1.25,
        snug: 1.375,
        normal: 1.5,
        relaxed: 1.625,
        loose: 2.0,
    },
    letter_spacing: LetterSpacing {
        tighter: -0.05,
        tight: -0.025,
        normal: 0.0,
        wide: 0.025,
        wider: 0.05,
    },
};

/// Box-shadow presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Shadows {
    /// Buttons and inputs.
    pub sm: &'static str,
    /// Cards.
    pub md: &'static str,
    /// Dropdowns.
    pub lg: &'static str,
    /// Modals and hero mockups.
    pub xl: &'static str,
    /// Brand glow behind primary calls to action.
    pub glow: &'static str,
}

/// Shared shadow presets.
pub const SHADOWS: Shadows = Shadows {
    sm: "0 1px 2px 0 rgba(0, 0, 0, 0.05)",
    md: "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -2px rgba(0, 0, 0, 0.1)",
    lg: "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -4px rgba(0, 0, 0, 0.1)",
    xl: "0 20px 25px -5px rgba(0, 0, 0, 0.1), 0 8px 10px -6px rgba(0, 0, 0, 0.1)",
    glow: "0 0 40px rgba(99, 102, 241, 0.35)",
};

/// A frosted-glass surface preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlassEffect {
    /// Translucent fill.
    pub background: &'static str,
    /// Border colour.
    pub border: &'static str,
    /// `backdrop-filter` value.
    pub backdrop_filter: &'static str,
}

/// Glass presets by strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GlassEffects {
    /// Barely frosted overlay.
    pub light: GlassEffect,
    /// Navigation bars.
    pub medium: GlassEffect,
    /// Modals over busy backgrounds.
    pub strong: GlassEffect,
}

/// Shared glass presets.
pub const GLASS_EFFECTS: GlassEffects = GlassEffects {
    light: GlassEffect {
        background: "rgba(255, 255, 255, 0.05)",
        border: "rgba(255, 255, 255, 0.1)",
        backdrop_filter: "blur(8px)",
    },
    medium: GlassEffect {
        background: "rgba(255, 255, 255, 0.1)",
        border: "rgba(255, 255, 255, 0.15)",
        backdrop_filter: "blur(12px) saturate(150%)",
    },
    strong: GlassEffect {
        background: "rgba(255, 255, 255, 0.2)",
        border: "rgba(255, 255, 255, 0.25)",
        backdrop_filter: "blur(20px) saturate(180%)",
    },
};

/// Named animation with timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationPreset {
    /// Keyframes name expected in the stylesheet.
    pub keyframes: &'static str,
    /// Duration in milliseconds.
    pub duration_ms: u16,
    /// CSS easing function.
    pub easing: &'static str,
}

impl AnimationPreset {
    /// CSS `animation` shorthand.
    #[must_use]
    pub fn css(&self) -> String {
        format!("{} {}ms {} both", self.keyframes, self.duration_ms, self.easing)
    }
}

/// Animation presets used by landing sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationPresets {
    /// Fade in place.
    pub fade_in: AnimationPreset,
    /// Fade while rising into place.
    pub slide_up: AnimationPreset,
    /// Grow from slightly smaller.
    pub scale_in: AnimationPreset,
    /// Loading skeleton sweep.
    pub shimmer: AnimationPreset,
}

/// Shared animation presets.
pub const ANIMATIONS: AnimationPresets = AnimationPresets {
    fade_in: AnimationPreset {
        keyframes: "fade-in",
        duration_ms: 400,
        easing: "ease-out",
    },
    slide_up: AnimationPreset {
        keyframes: "slide-up",
        duration_ms: 500,
        easing: "cubic-bezier(0.16, 1, 0.3, 1)",
    },
    scale_in: AnimationPreset {
        keyframes: "scale-in",
        duration_ms: 300,
        easing: "cubic-bezier(0.34, 1.56, 0.64, 1)",
    },
    shimmer: AnimationPreset {
        keyframes: "shimmer",
        duration_ms: 1500,
        easing: "linear",
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn spacing_tiers_increase_monotonically() {
        for scale in [SPACING, SEMANTIC_SPACING] {
            let tiers = scale.tiers();
            for pair in tiers.windows(2) {
                assert!(pair[0].1 < pair[1].1, "{} !< {}", pair[0].0, pair[1].0);
            }
        }
    }

    #[test]
    fn every_color_token_parses() {
        for colors in [LIGHT_COLORS, DARK_COLORS] {
            for (role, value) in colors.roles() {
                assert!(value.parse::<Rgba>().is_ok(), "{role} = {value}");
            }
        }
    }

    #[test]
    fn animation_shorthand_includes_timing() {
        assert_eq!(ANIMATIONS.fade_in.css(), "fade-in 400ms ease-out both");
    }
}
