//! Derived presentation presets and CSS custom-property mirroring.

use serde::Serialize;

use crate::Theme;

/// Ready-made inline style declarations derived from a [`Theme`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeStyles {
    /// Page body.
    pub page: String,
    /// Content card.
    pub card: String,
    /// Frosted-glass panel (navigation, floating widgets).
    pub glass_panel: String,
    /// Primary call-to-action button.
    pub button_primary: String,
    /// Secondary button.
    pub button_secondary: String,
    /// Form input.
    pub input: String,
    /// De-emphasised text.
    pub muted_text: String,
    /// Gradient-filled headline text.
    pub gradient_text: String,
}

impl Theme {
    /// Compute the derived style presets for this tree.
    #[must_use]
    pub fn styles(&self) -> ThemeStyles {
        let colors = &self.colors;
        let spacing = &self.spacing;
        let glass_fill = self
            .utils
            .alpha(colors.surface, 0.72)
            .unwrap_or_else(|_| colors.surface.to_string());
        let brand = self
            .utils
            .gradient(colors.primary, colors.secondary, None);

        ThemeStyles {
            page: format!(
                "background: {}; color: {}; font-family: {};",
                colors.background,
                colors.text,
                self.typography.font_family.sans.join(", ")
            ),
            card: format!(
                "background: {}; border: 1px solid {}; border-radius: 16px; box-shadow: {}; padding: {}px;",
                colors.surface, colors.border, self.shadows.md, spacing.lg
            ),
            glass_panel: format!(
                "background: {glass_fill}; border: 1px solid {}; backdrop-filter: {};",
                self.glass_effects.medium.border, self.glass_effects.medium.backdrop_filter
            ),
            button_primary: format!(
                "background: {brand}; color: #ffffff; padding: {}px {}px; border-radius: 12px; font-weight: {}; box-shadow: {};",
                spacing.sm + spacing.xs,
                spacing.lg,
                self.typography.font_weight.semibold,
                self.shadows.glow
            ),
            button_secondary: format!(
                "background: transparent; color: {}; border: 1px solid {}; padding: {}px {}px; border-radius: 12px;",
                colors.text,
                colors.border,
                spacing.sm + spacing.xs,
                spacing.lg
            ),
            input: format!(
                "background: {}; color: {}; border: 1px solid {}; padding: {}px {}px; border-radius: 10px;",
                colors.surface_elevated, colors.text, colors.border, spacing.sm, spacing.md
            ),
            muted_text: format!(
                "color: {}; font-size: {}rem;",
                colors.text_muted, self.typography.font_size.sm
            ),
            gradient_text: format!(
                "background: {brand}; -webkit-background-clip: text; background-clip: text; color: transparent;"
            ),
        }
    }

    /// CSS custom properties for the host to mirror onto the document root.
    #[must_use]
    pub fn css_variables(&self) -> Vec<(String, String)> {
        let mut vars = Vec::with_capacity(48);
        for (role, value) in self.colors.roles() {
            vars.push((format!("--color-{}", kebab_case(role)), value.to_string()));
        }
        for (tier, px) in self.spacing.tiers() {
            vars.push((format!("--spacing-{tier}"), format!("{px}px")));
        }
        for (tier, px) in self.semantic_spacing.tiers() {
            vars.push((format!("--space-{tier}"), format!("{px}px")));
        }
        let shadows = &self.shadows;
        for (name, value) in [
            ("sm", shadows.sm),
            ("md", shadows.md),
            ("lg", shadows.lg),
            ("xl", shadows.xl),
            ("glow", shadows.glow),
        ] {
            vars.push((format!("--shadow-{name}"), value.to_string()));
        }
        let fonts = &self.typography.font_family;
        vars.push(("--font-sans".to_string(), quote_stack(fonts.sans)));
        vars.push(("--font-mono".to_string(), quote_stack(fonts.mono)));
        vars.push(("--font-display".to_string(), quote_stack(fonts.display)));
        vars
    }

    /// Render [`Theme::css_variables`] as a `:root` rule.
    #[must_use]
    pub fn css_root_block(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.css_variables() {
            css.push_str("  ");
            css.push_str(&name);
            css.push_str(": ");
            css.push_str(&value);
            css.push_str(";\n");
        }
        css.push('}');
        css
    }
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn quote_stack(stack: &[&str]) -> String {
    stack
        .iter()
        .map(|font| {
            if font.contains(' ') {
                format!("\"{font}\"")
            } else {
                (*font).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
