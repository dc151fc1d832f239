//! Value types used by the document configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Predefined document style templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStyle {
    /// Formal report (default)
    #[default]
    Report,
    /// Internal note
    Note,
    /// Letter
    Letter,
    /// Memo
    Memo,
}

impl FromStr for DocumentStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "report" => Ok(DocumentStyle::Report),
            "note" => Ok(DocumentStyle::Note),
            "letter" => Ok(DocumentStyle::Letter),
            "memo" => Ok(DocumentStyle::Memo),
            other => Err(Error::InvalidConfig(format!(
                "Unknown document style: {}",
                other
            ))),
        }
    }
}

/// Supported paper sizes for document layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    /// 8.5 x 11 inches (215.9 x 279.4 mm)
    #[default]
    Letter,
    /// 8.5 x 14 inches (215.9 x 355.6 mm)
    Legal,
    /// 8.27 x 11.69 inches (210 x 297 mm)
    A4,
}

impl PaperSize {
    /// Page width and height in inches.
    pub fn dimensions_inches(self) -> (f64, f64) {
        match self {
            PaperSize::Letter => (8.5, 11.0),
            PaperSize::Legal => (8.5, 14.0),
            PaperSize::A4 => (8.27, 11.69),
        }
    }
}

impl FromStr for PaperSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" => Ok(PaperSize::Letter),
            "legal" => Ok(PaperSize::Legal),
            "a4" => Ok(PaperSize::A4),
            other => Err(Error::InvalidConfig(format!("Unknown paper size: {}", other))),
        }
    }
}

/// An RGB color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RgbRepr", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Create a color from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from unchecked integer components.
    ///
    /// Every component must lie in `0..=255`.
    pub fn from_components(r: i64, g: i64, b: i64) -> Result<Self> {
        let check = |c: i64| {
            u8::try_from(c).map_err(|_| {
                Error::InvalidConfig(format!(
                    "RGB values must be 0-255, got ({}, {}, {})",
                    r, g, b
                ))
            })
        };
        Ok(Self::new(check(r)?, check(g)?, check(b)?))
    }

    /// Parse a color from `#RRGGBB`, `RRGGBB` or `r,g,b`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(Error::InvalidConfig(format!(
                    "Color must be an RGB triple, got {}",
                    s
                )));
            }
            let mut values = [0i64; 3];
            for (slot, part) in values.iter_mut().zip(&parts) {
                *slot = part.parse().map_err(|_| {
                    Error::InvalidConfig(format!("Invalid color component '{}' in {}", part, s))
                })?;
            }
            return Self::from_components(values[0], values[1], values[2]);
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidConfig(format!(
                "Color must be #RRGGBB or r,g,b, got {}",
                s
            )));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Self::new(r, g, b)),
            _ => Err(Error::InvalidConfig(format!("Invalid hex color: {}", s))),
        }
    }

    /// Uppercase hex form without `#`, as used by `w:color`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rgb::parse(s)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RgbRepr {
    Text(String),
    Components([i64; 3]),
}

impl TryFrom<RgbRepr> for Rgb {
    type Error = Error;

    fn try_from(repr: RgbRepr) -> Result<Self> {
        match repr {
            RgbRepr::Text(s) => Rgb::parse(&s),
            RgbRepr::Components([r, g, b]) => Rgb::from_components(r, g, b),
        }
    }
}

/// Footer text for odd and even pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterText {
    /// Text shown before the page number on odd (right) pages
    pub odd: String,
    /// Text shown after the page number on even (left) pages
    pub even: String,
}

impl FooterText {
    /// Create footer text.
    pub fn new(odd: impl Into<String>, even: impl Into<String>) -> Self {
        Self {
            odd: odd.into(),
            even: even.into(),
        }
    }

    /// Build footer text from key/value pairs; both `odd` and `even` are required.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut odd = None;
        let mut even = None;
        for (key, value) in pairs {
            match key.as_ref() {
                "odd" => odd = Some(value.into()),
                "even" => even = Some(value.into()),
                other => {
                    return Err(Error::InvalidConfig(format!(
                        "Unknown footer key '{}': expected 'odd' or 'even'",
                        other
                    )))
                }
            }
        }
        match (odd, even) {
            (Some(odd), Some(even)) => Ok(Self { odd, even }),
            _ => Err(Error::InvalidConfig(
                "footer_text must have 'odd' and 'even' keys".to_string(),
            )),
        }
    }
}

impl Default for FooterText {
    fn default() -> Self {
        Self::new("Page", "Page")
    }
}

/// Page margins in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// Create margins (top, right, bottom, left).
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same margin on every side.
    pub fn uniform(cm: f64) -> Self {
        Self::new(cm, cm, cm, cm)
    }

    /// Parse `T,R,B,L` or a single uniform value.
    pub fn parse(s: &str) -> Result<Self> {
        let values: Vec<f64> = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| Error::InvalidConfig(format!("Invalid margins: {}", s)))?;
        match values.as_slice() {
            [all] => Ok(Self::uniform(*all)),
            [top, right, bottom, left] => Ok(Self::new(*top, *right, *bottom, *left)),
            _ => Err(Error::InvalidConfig(format!(
                "Margins must be 1 or 4 values, got {}",
                values.len()
            ))),
        }
    }

    /// Margins as an array (top, right, bottom, left).
    pub fn as_array(&self) -> [f64; 4] {
        [self.top, self.right, self.bottom, self.left]
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(2.0)
    }
}

impl From<[f64; 4]> for Margins {
    fn from(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

impl From<Margins> for [f64; 4] {
    fn from(margins: Margins) -> Self {
        margins.as_array()
    }
}
