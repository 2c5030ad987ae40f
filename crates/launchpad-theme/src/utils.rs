//! Colour helpers exposed on every [`Theme`](crate::Theme).

use crate::color::{ColorError, Rgba};

/// Default direction for brand gradients.
pub const DEFAULT_GRADIENT_DIRECTION: &str = "135deg";

/// Stateless helpers derived from the token tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeUtils;

impl ThemeUtils {
    /// Apply `opacity` to `color`.
    ///
    /// The colour is parsed into RGBA first, so `#abc`, `#aabbcc80`,
    /// `rgb()`/`rgba()` and named colours all work; any existing alpha is
    /// multiplied rather than replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] when `color` is not a supported CSS colour.
    pub fn alpha(self, color: &str, opacity: f32) -> Result<String, ColorError> {
        let parsed: Rgba = color.parse()?;
        Ok(parsed.scale_alpha(opacity).to_string())
    }

    /// CSS `linear-gradient` between two colours.
    #[must_use]
    pub fn gradient(self, from: &str, to: &str, direction: Option<&str>) -> String {
        let direction = direction
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_GRADIENT_DIRECTION);
        format!("linear-gradient({direction}, {from}, {to})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_handles_short_hex() -> Result<(), ColorError> {
        assert_eq!(ThemeUtils.alpha("#fff", 0.5)?, "rgba(255, 255, 255, 0.5)");
        Ok(())
    }

    #[test]
    fn alpha_multiplies_existing_alpha() -> Result<(), ColorError> {
        assert_eq!(
            ThemeUtils.alpha("rgba(0, 0, 0, 0.5)", 0.5)?,
            "rgba(0, 0, 0, 0.25)"
        );
        assert_eq!(
            ThemeUtils.alpha("#4F46E580", 1.0)?,
            "rgba(79, 70, 229, 0.502)"
        );
        Ok(())
    }

    #[test]
    fn alpha_handles_named_colors_and_full_opacity() -> Result<(), ColorError> {
        assert_eq!(ThemeUtils.alpha("white", 0.1)?, "rgba(255, 255, 255, 0.1)");
        assert_eq!(ThemeUtils.alpha("#4F46E5", 1.0)?, "#4f46e5");
        Ok(())
    }

    #[test]
    fn alpha_rejects_unknown_colors() {
        assert!(ThemeUtils.alpha("not-a-color", 0.5).is_err());
    }

    #[test]
    fn gradient_defaults_direction() {
        assert_eq!(
            ThemeUtils.gradient("#000", "#fff", None),
            "linear-gradient(135deg, #000, #fff)"
        );
        assert_eq!(
            ThemeUtils.gradient("#000", "#fff", Some("to right")),
            "linear-gradient(to right, #000, #fff)"
        );
        assert_eq!(
            ThemeUtils.gradient("#000", "#fff", Some("  ")),
            "linear-gradient(135deg, #000, #fff)"
        );
    }
}
