//! Font metrics and the text measurement seam.
//!
//! Text extents drive every downstream box computation, so measurement sits
//! behind the [`TextMeasure`] trait: callers that run next to a real shaping
//! service can implement it remotely, while [`FontMetrics`] provides the
//! deterministic built-in implementation backed by a TOML glyph table.
//! Line breaking for long headings goes through the separate [`LineBreaker`]
//! trait; the composition pass falls back to greedy width-based breaking when
//! no collaborator is wired in.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing a metrics table
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Failed to read metrics file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse metrics TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Glyph key '{0}' must be a single character")]
    InvalidGlyphKey(String),
}

/// Measured extent of a run of text, in absolute units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
    /// Distance from the baseline to the top of the extent.
    pub ascent: f64,
}

impl TextExtent {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Anything that can measure text at a font size.
///
/// Object safe so a remote shaping service can stand in for the local table.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f64) -> TextExtent;
}

/// A collaborator that splits text into display lines under a width budget.
///
/// Implementations may be semantic (an external service choosing break
/// points by meaning); the built-in fallback is greedy and width-driven.
pub trait LineBreaker {
    fn break_lines(
        &self,
        text: &str,
        max_width: f64,
        font_size: f64,
        max_lines: usize,
    ) -> Result<Vec<String>, BreakError>;
}

/// Errors a [`LineBreaker`] collaborator can report
#[derive(Error, Debug)]
pub enum BreakError {
    #[error("line breaking service unavailable: {0}")]
    Unavailable(String),
    #[error("line breaking produced no lines")]
    Empty,
}

/// Per-glyph dimensions in em units (per 1.0 of font size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
    pub descent: f64,
}

/// A glyph-table metrics set for one font family.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Optional family name for diagnostics
    pub family: Option<String>,
    glyphs: HashMap<char, GlyphMetrics>,
    default_glyph: GlyphMetrics,
}

/// TOML structure for deserializing metrics tables
#[derive(Deserialize)]
struct TomlMetrics {
    metadata: Option<TomlMetadata>,
    default: TomlGlyph,
    #[serde(default)]
    glyphs: HashMap<String, TomlGlyph>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    family: Option<String>,
}

/// Vertical dimensions default to the `[default]` record so the glyph table
/// only has to carry advances.
#[derive(Deserialize, Clone, Copy)]
struct TomlGlyph {
    width: f64,
    height: Option<f64>,
    ascent: Option<f64>,
    descent: Option<f64>,
}

/// Default metrics: Helvetica-flavored advances for printable ASCII.
const DEFAULT_METRICS: &str = r#"
[metadata]
family = "Helvetica"

[default]
width = 0.556
height = 0.925
ascent = 0.718
descent = 0.207

[glyphs]
' ' = { width = 0.278 }
'!' = { width = 0.278 }
'"' = { width = 0.355 }
'#' = { width = 0.556 }
'$' = { width = 0.556 }
'%' = { width = 0.889 }
'&' = { width = 0.667 }
"'" = { width = 0.191 }
'(' = { width = 0.333 }
')' = { width = 0.333 }
'*' = { width = 0.389 }
'+' = { width = 0.584 }
',' = { width = 0.278 }
'-' = { width = 0.333 }
'.' = { width = 0.278 }
'/' = { width = 0.278 }
'0' = { width = 0.556 }
'1' = { width = 0.556 }
'2' = { width = 0.556 }
'3' = { width = 0.556 }
'4' = { width = 0.556 }
'5' = { width = 0.556 }
'6' = { width = 0.556 }
'7' = { width = 0.556 }
'8' = { width = 0.556 }
'9' = { width = 0.556 }
':' = { width = 0.278 }
';' = { width = 0.278 }
'<' = { width = 0.584 }
'=' = { width = 0.584 }
'>' = { width = 0.584 }
'?' = { width = 0.556 }
'@' = { width = 1.015 }
'A' = { width = 0.667 }
'B' = { width = 0.667 }
'C' = { width = 0.722 }
'D' = { width = 0.722 }
'E' = { width = 0.667 }
'F' = { width = 0.611 }
'G' = { width = 0.778 }
'H' = { width = 0.722 }
'I' = { width = 0.278 }
'J' = { width = 0.500 }
'K' = { width = 0.667 }
'L' = { width = 0.556 }
'M' = { width = 0.833 }
'N' = { width = 0.722 }
'O' = { width = 0.778 }
'P' = { width = 0.667 }
'Q' = { width = 0.778 }
'R' = { width = 0.722 }
'S' = { width = 0.667 }
'T' = { width = 0.611 }
'U' = { width = 0.722 }
'V' = { width = 0.667 }
'W' = { width = 0.944 }
'X' = { width = 0.667 }
'Y' = { width = 0.667 }
'Z' = { width = 0.611 }
'[' = { width = 0.278 }
'\' = { width = 0.278 }
']' = { width = 0.278 }
'^' = { width = 0.469 }
'_' = { width = 0.556 }
'`' = { width = 0.333 }
'a' = { width = 0.556 }
'b' = { width = 0.556 }
'c' = { width = 0.500 }
'd' = { width = 0.556 }
'e' = { width = 0.556 }
'f' = { width = 0.278 }
'g' = { width = 0.556 }
'h' = { width = 0.556 }
'i' = { width = 0.222 }
'j' = { width = 0.222 }
'k' = { width = 0.500 }
'l' = { width = 0.222 }
'm' = { width = 0.833 }
'n' = { width = 0.556 }
'o' = { width = 0.556 }
'p' = { width = 0.556 }
'q' = { width = 0.556 }
'r' = { width = 0.333 }
's' = { width = 0.500 }
't' = { width = 0.278 }
'u' = { width = 0.556 }
'v' = { width = 0.500 }
'w' = { width = 0.722 }
'x' = { width = 0.500 }
'y' = { width = 0.500 }
'z' = { width = 0.500 }
'{' = { width = 0.334 }
'|' = { width = 0.260 }
'}' = { width = 0.334 }
'~' = { width = 0.584 }
"#;

impl FontMetrics {
    /// Load a metrics table from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, MetricsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a metrics table from a TOML string
    pub fn from_str(content: &str) -> Result<Self, MetricsError> {
        let parsed: TomlMetrics = toml::from_str(content)?;
        let default_glyph = GlyphMetrics {
            width: parsed.default.width,
            height: parsed.default.height.unwrap_or(0.0),
            ascent: parsed.default.ascent.unwrap_or(0.0),
            descent: parsed.default.descent.unwrap_or(0.0),
        };

        let mut glyphs = HashMap::with_capacity(parsed.glyphs.len());
        for (key, glyph) in parsed.glyphs {
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => return Err(MetricsError::InvalidGlyphKey(key)),
            };
            glyphs.insert(
                ch,
                GlyphMetrics {
                    width: glyph.width,
                    height: glyph.height.unwrap_or(default_glyph.height),
                    ascent: glyph.ascent.unwrap_or(default_glyph.ascent),
                    descent: glyph.descent.unwrap_or(default_glyph.descent),
                },
            );
        }

        Ok(FontMetrics {
            family: parsed.metadata.and_then(|m| m.family),
            glyphs,
            default_glyph,
        })
    }

    /// Metrics for one glyph, falling back to the default record.
    pub fn glyph(&self, ch: char) -> GlyphMetrics {
        match self.glyphs.get(&ch) {
            Some(g) => *g,
            None => {
                log::debug!("no metrics for glyph {ch:?}, using default advance");
                self.default_glyph
            }
        }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::from_str(DEFAULT_METRICS).expect("Default metrics should be valid TOML")
    }
}

impl TextMeasure for FontMetrics {
    fn measure(&self, text: &str, font_size: f64) -> TextExtent {
        if text.is_empty() {
            return TextExtent::zero();
        }
        let mut width = 0.0;
        let mut height: f64 = 0.0;
        let mut ascent: f64 = 0.0;
        for ch in text.chars() {
            let g = self.glyph(ch);
            width += g.width;
            height = height.max(g.height);
            ascent = ascent.max(g.ascent);
        }
        TextExtent {
            width: width * font_size,
            height: height * font_size,
            ascent: ascent * font_size,
        }
    }
}
