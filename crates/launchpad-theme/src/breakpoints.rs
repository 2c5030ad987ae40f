//! Responsive breakpoint definitions shared by layout code and CSS emission.

use serde::Serialize;

/// Individual breakpoint with an inclusive minimum width and optional maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    /// Tier name used in class names and CSS variables.
    pub name: &'static str,
    /// Inclusive lower bound in CSS pixels.
    pub min_width: u16,
    /// Inclusive upper bound, `None` for the widest tier.
    pub max_width: Option<u16>,
}

/// Phones in portrait.
pub const XS: Breakpoint = Breakpoint {
    name: "xs",
    min_width: 0,
    max_width: Some(639),
};
/// Large phones.
pub const SM: Breakpoint = Breakpoint {
    name: "sm",
    min_width: 640,
    max_width: Some(767),
};
/// Tablets.
pub const MD: Breakpoint = Breakpoint {
    name: "md",
    min_width: 768,
    max_width: Some(1023),
};
/// Laptops.
pub const LG: Breakpoint = Breakpoint {
    name: "lg",
    min_width: 1024,
    max_width: Some(1279),
};
/// Desktops.
pub const XL: Breakpoint = Breakpoint {
    name: "xl",
    min_width: 1280,
    max_width: Some(1535),
};
/// Wide screens.
pub const XXL: Breakpoint = Breakpoint {
    name: "2xl",
    min_width: 1536,
    max_width: None,
};

/// Ordered breakpoints used for layout decisions and CSS variable emission.
pub const BREAKPOINTS: [Breakpoint; 6] = [XS, SM, MD, LG, XL, XXL];

/// Find the first breakpoint matching the supplied width.
#[must_use]
pub fn for_width(width: u16) -> Breakpoint {
    BREAKPOINTS
        .iter()
        .copied()
        .find(|bp| width >= bp.min_width && bp.max_width.is_none_or(|max| width <= max))
        .unwrap_or(XXL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_selection_matches_ranges() {
        assert_eq!(for_width(0).name, XS.name);
        assert_eq!(for_width(640).name, SM.name);
        assert_eq!(for_width(1024).name, LG.name);
        assert_eq!(for_width(4000).name, XXL.name);
    }

    #[test]
    fn breakpoints_are_contiguous() {
        for pair in BREAKPOINTS.windows(2) {
            let max = pair[0].max_width.unwrap_or(u16::MAX);
            assert_eq!(max + 1, pair[1].min_width);
        }
    }
}
