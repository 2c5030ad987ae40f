//! RGBA colour parsing and serialisation.
//!
//! Tokens are stored as CSS strings; anything that needs to manipulate a
//! colour (opacity, blending) goes through [`Rgba`] so short hex forms,
//! functional notation and alpha-bearing inputs all behave the same way.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while parsing a CSS colour value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The value was empty after trimming.
    #[error("color value cannot be empty")]
    Empty,
    /// A `#` value had the wrong length or non-hex digits.
    #[error("invalid hex color")]
    InvalidHex {
        /// Original input.
        input: String,
    },
    /// An `rgb()`/`rgba()` value had a malformed or missing channel.
    #[error("invalid rgb channel")]
    InvalidChannel {
        /// Original input.
        input: String,
    },
    /// The value used an unsupported notation or colour name.
    #[error("unsupported color value")]
    Unsupported {
        /// Original input.
        input: String,
    },
}

/// A colour in the sRGB space with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Rgba {
    /// Opaque colour from channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same colour with its opacity scaled by `opacity` (clamped to `[0, 1]`).
    #[must_use]
    pub fn scale_alpha(self, opacity: f32) -> Self {
        let opacity = if opacity.is_nan() {
            1.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        Self {
            a: (self.a * opacity).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Whether the colour has no transparency.
    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ColorError::Empty);
        }
        if let Some(hex) = normalized.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorError::InvalidHex {
                input: input.to_string(),
            });
        }
        if let Some(body) = functional_body(&normalized) {
            return parse_functional(body).ok_or_else(|| ColorError::InvalidChannel {
                input: input.to_string(),
            });
        }
        named(&normalized).ok_or_else(|| ColorError::Unsupported {
            input: input.to_string(),
        })
    }
}

impl Display for Rgba {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(formatter, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                formatter,
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                format_alpha(self.a)
            )
        }
    }
}

fn format_alpha(alpha: f32) -> String {
    let rounded = (alpha * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let short = |index: usize| -> Option<u8> {
        u8::from_str_radix(hex.get(index..=index)?, 16)
            .ok()
            .map(|v| v * 17)
    };
    let long = |index: usize| -> Option<u8> { u8::from_str_radix(hex.get(index..index + 2)?, 16).ok() };
    match hex.len() {
        3 => Some(Rgba::rgb(short(0)?, short(1)?, short(2)?)),
        4 => Some(Rgba {
            a: f32::from(short(3)?) / 255.0,
            ..Rgba::rgb(short(0)?, short(1)?, short(2)?)
        }),
        6 => Some(Rgba::rgb(long(0)?, long(2)?, long(4)?)),
        8 => Some(Rgba {
            a: f32::from(long(6)?) / 255.0,
            ..Rgba::rgb(long(0)?, long(2)?, long(4)?)
        }),
        _ => None,
    }
}

fn functional_body(value: &str) -> Option<&str> {
    let rest = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?;
    rest.strip_suffix(')')
}

fn parse_functional(body: &str) -> Option<Rgba> {
    let (channels, slash_alpha) = match body.split_once('/') {
        Some((channels, alpha)) => (channels, Some(alpha.trim())),
        None => (body, None),
    };
    let parts: Vec<&str> = channels
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    let (rgb, comma_alpha) = match parts.as_slice() {
        [r, g, b] => ([*r, *g, *b], None),
        [r, g, b, a] if slash_alpha.is_none() => ([*r, *g, *b], Some(*a)),
        _ => return None,
    };

    let alpha = match slash_alpha.or(comma_alpha) {
        Some(raw) => parse_alpha(raw)?,
        None => 1.0,
    };
    Some(Rgba {
        r: parse_channel(rgb[0])?,
        g: parse_channel(rgb[1])?,
        b: parse_channel(rgb[2])?,
        a: alpha,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_channel(raw: &str) -> Option<u8> {
    let value = if let Some(percent) = raw.strip_suffix('%') {
        percent.parse::<f32>().ok()? * 255.0 / 100.0
    } else {
        raw.parse::<f32>().ok()?
    };
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(raw: &str) -> Option<f32> {
    let value = if let Some(percent) = raw.strip_suffix('%') {
        percent.parse::<f32>().ok()? / 100.0
    } else {
        raw.parse::<f32>().ok()?
    };
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

fn named(name: &str) -> Option<Rgba> {
    let color = match name {
        "transparent" => Rgba {
            a: 0.0,
            ..Rgba::rgb(0, 0, 0)
        },
        "black" => Rgba::rgb(0, 0, 0),
        "white" => Rgba::rgb(255, 255, 255),
        "red" => Rgba::rgb(255, 0, 0),
        "green" => Rgba::rgb(0, 128, 0),
        "blue" => Rgba::rgb(0, 0, 255),
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        "orange" => Rgba::rgb(255, 165, 0),
        "purple" => Rgba::rgb(128, 0, 128),
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: &str) -> Rgba {
        value.parse().unwrap_or_else(|err| panic!("{value}: {err}"))
    }

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(parse("#fff"), Rgba::rgb(255, 255, 255));
        assert_eq!(parse("#4F46E5"), Rgba::rgb(0x4F, 0x46, 0xE5));
        let with_alpha = parse("#00000080");
        assert_eq!((with_alpha.r, with_alpha.g, with_alpha.b), (0, 0, 0));
        assert!((with_alpha.a - 128.0 / 255.0).abs() < f32::EPSILON);
        assert!((parse("#0f08").a - 136.0 / 255.0).abs() < f32::EPSILON);
    }

    #[test]
    fn parses_functional_notation() {
        assert_eq!(parse("rgb(10, 20, 30)"), Rgba::rgb(10, 20, 30));
        assert_eq!(parse("rgb(10 20 30)"), Rgba::rgb(10, 20, 30));
        assert_eq!(parse("rgb(100%, 0%, 50%)"), Rgba::rgb(255, 0, 128));
        let translucent = parse("rgba(1, 2, 3, 0.4)");
        assert!((translucent.a - 0.4).abs() < f32::EPSILON);
        let slash = parse("rgb(1 2 3 / 25%)");
        assert!((slash.a - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn parses_named_colors() {
        assert_eq!(parse("White"), Rgba::rgb(255, 255, 255));
        assert!((parse("transparent").a).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!("".parse::<Rgba>(), Err(ColorError::Empty));
        assert!(matches!(
            "#12345".parse::<Rgba>(),
            Err(ColorError::InvalidHex { .. })
        ));
        assert!(matches!(
            "#ggg".parse::<Rgba>(),
            Err(ColorError::InvalidHex { .. })
        ));
        assert!(matches!(
            "rgb(1, 2)".parse::<Rgba>(),
            Err(ColorError::InvalidChannel { .. })
        ));
        assert!(matches!(
            "hsl(10, 20%, 30%)".parse::<Rgba>(),
            Err(ColorError::Unsupported { .. })
        ));
    }

    #[test]
    fn displays_hex_when_opaque_and_rgba_otherwise() {
        assert_eq!(Rgba::rgb(79, 70, 229).to_string(), "#4f46e5");
        assert_eq!(
            Rgba::rgb(255, 255, 255).scale_alpha(0.5).to_string(),
            "rgba(255, 255, 255, 0.5)"
        );
        assert_eq!(
            Rgba::rgb(0, 0, 0).scale_alpha(0.0).to_string(),
            "rgba(0, 0, 0, 0)"
        );
    }

    #[test]
    fn scale_alpha_clamps_and_multiplies() {
        let base = parse("rgba(0, 0, 0, 0.5)");
        assert!((base.scale_alpha(0.5).a - 0.25).abs() < f32::EPSILON);
        assert!((base.scale_alpha(4.0).a - 0.5).abs() < f32::EPSILON);
        assert!(base.scale_alpha(-1.0).a.abs() < f32::EPSILON);
        assert!((base.scale_alpha(f32::NAN).a - 0.5).abs() < f32::EPSILON);
    }
}
