//! The render spec: the one value that crosses stage boundaries.
//!
//! A [`RenderSpec`] is built atomically when the user leaves the editor and
//! is read-only from then on. Between stages it travels as a string→string
//! parameter map (the navigation wire format), so every field must survive
//! that round trip without coercion or loss.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// Vertical anchor of the overlay panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Center,
    #[default]
    Bottom,
}

impl Position {
    /// All legal values, in display order.
    pub const ALL: [Position; 3] = [Position::Top, Position::Center, Position::Bottom];

    /// The exact wire spelling of this value.
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Center => "center",
            Position::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top" => Ok(Position::Top),
            "center" => Ok(Position::Center),
            "bottom" => Ok(Position::Bottom),
            other => Err(AppError::param("position", other)),
        }
    }
}

/// Font family applied to the overlay text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontChoice {
    #[default]
    Normal,
    Serif,
    Monospace,
}

impl FontChoice {
    /// All legal values, in display order.
    pub const ALL: [FontChoice; 3] = [
        FontChoice::Normal,
        FontChoice::Serif,
        FontChoice::Monospace,
    ];

    /// The exact wire spelling of this value.
    pub fn as_str(self) -> &'static str {
        match self {
            FontChoice::Normal => "normal",
            FontChoice::Serif => "serif",
            FontChoice::Monospace => "monospace",
        }
    }
}

impl fmt::Display for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontChoice {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(FontChoice::Normal),
            "serif" => Ok(FontChoice::Serif),
            "monospace" => Ok(FontChoice::Monospace),
            other => Err(AppError::param("font", other)),
        }
    }
}

/// A validated `#rrggbb` color.
///
/// The original string is preserved verbatim, including letter case, so the
/// value survives the navigation round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextColor(String);

impl TextColor {
    /// Parses a `#rrggbb` hex string.
    pub fn parse(s: &str) -> Result<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| AppError::param("textColor", s))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::param("textColor", s));
        }
        Ok(Self(s.to_string()))
    }

    /// The original string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes to RGB channels.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.0[1..];
        // Validated in `parse`, so the slices are in range and hex-clean.
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        (r, g, b)
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self("#ffffff".to_string())
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TextColor {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An opaque reference to a locally addressable image resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageUri(String);

impl ImageUri {
    /// Wraps an already-encoded URI string without interpretation.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Builds a `file://` URI from a local path.
    ///
    /// Relative paths are resolved against the current directory first,
    /// since `file://` URIs must be absolute.
    pub fn from_path(path: &Path) -> Result<Self> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let url = Url::from_file_path(&absolute)
            .map_err(|_| AppError::acquisition(format!("Not a valid file path: {absolute:?}")))?;
        Ok(Self(url.to_string()))
    }

    /// Resolves the URI back to a local filesystem path.
    pub fn to_path(&self) -> Result<PathBuf> {
        let url = Url::parse(&self.0)
            .map_err(|e| AppError::acquisition(format!("Invalid image URI `{}`: {e}", self.0)))?;
        url.to_file_path()
            .map_err(|_| AppError::acquisition(format!("Image URI is not a local file: {}", self.0)))
    }

    /// The raw URI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fully specified instruction for re-rendering the composition.
///
/// Constructed once by [`crate::editor::EditorSession::proceed`] and consumed
/// read-only by the export stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSpec {
    #[serde(rename = "imageUri")]
    pub image_uri: ImageUri,
    #[serde(rename = "quoteId")]
    pub quote_id: String,
    #[serde(rename = "textColor")]
    pub text_color: TextColor,
    pub position: Position,
    pub font: FontChoice,
}

impl RenderSpec {
    pub fn new(
        image_uri: ImageUri,
        quote_id: impl Into<String>,
        text_color: TextColor,
        position: Position,
        font: FontChoice,
    ) -> Self {
        Self {
            image_uri,
            quote_id: quote_id.into(),
            text_color,
            position,
            font,
        }
    }

    /// Encodes the spec as string navigation parameters.
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("imageUri".to_string(), self.image_uri.as_str().to_string());
        params.insert("quoteId".to_string(), self.quote_id.clone());
        params.insert(
            "textColor".to_string(),
            self.text_color.as_str().to_string(),
        );
        params.insert("position".to_string(), self.position.as_str().to_string());
        params.insert("font".to_string(), self.font.as_str().to_string());
        params
    }

    /// Decodes a spec from string navigation parameters.
    ///
    /// Fails if any field is missing or holds an illegal value. The decoded
    /// spec is field-for-field identical to the one that was encoded.
    pub fn from_params(params: &BTreeMap<String, String>) -> Result<Self> {
        let get = |key: &str| -> Result<&String> {
            params.get(key).ok_or_else(|| AppError::param(key, "<missing>"))
        };

        Ok(Self {
            image_uri: ImageUri::new(get("imageUri")?.clone()),
            quote_id: get("quoteId")?.clone(),
            text_color: get("textColor")?.parse()?,
            position: get("position")?.parse()?,
            font: get("font")?.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_spellings() {
        for pos in Position::ALL {
            assert_eq!(pos.as_str().parse::<Position>().unwrap(), pos);
        }
        assert!("middle".parse::<Position>().is_err());
        assert!("Top".parse::<Position>().is_err());
        assert!("".parse::<Position>().is_err());
    }

    #[test]
    fn test_font_spellings() {
        for font in FontChoice::ALL {
            assert_eq!(font.as_str().parse::<FontChoice>().unwrap(), font);
        }
        assert!("courier".parse::<FontChoice>().is_err());
        assert!("Serif".parse::<FontChoice>().is_err());
    }

    #[test]
    fn test_defaults_match_editor_initial_state() {
        assert_eq!(Position::default(), Position::Bottom);
        assert_eq!(FontChoice::default(), FontChoice::Normal);
        assert_eq!(TextColor::default().as_str(), "#ffffff");
    }

    #[test]
    fn test_color_parse_and_channels() {
        let color = TextColor::parse("#ff69b4").unwrap();
        assert_eq!(color.rgb(), (0xff, 0x69, 0xb4));

        assert!(TextColor::parse("ff69b4").is_err());
        assert!(TextColor::parse("#ff69b").is_err());
        assert!(TextColor::parse("#ff69bzz").is_err());
        assert!(TextColor::parse("#gg0000").is_err());
    }

    #[test]
    fn test_color_preserves_case() {
        let color = TextColor::parse("#FFD700").unwrap();
        assert_eq!(color.as_str(), "#FFD700");
        assert_eq!(color.rgb(), (0xff, 0xd7, 0x00));
    }

    #[test]
    fn test_image_uri_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo1.jpg");
        std::fs::write(&path, b"jpg").unwrap();

        let uri = ImageUri::from_path(&path).unwrap();
        assert!(uri.as_str().starts_with("file://"));
        assert_eq!(uri.to_path().unwrap(), path);
    }

    #[test]
    fn test_render_spec_param_round_trip() {
        let spec = RenderSpec::new(
            ImageUri::new("file:///photos/photo1.jpg"),
            "q3",
            TextColor::parse("#FFD700").unwrap(),
            Position::Top,
            FontChoice::Serif,
        );

        let params = spec.to_params();
        assert_eq!(params["imageUri"], "file:///photos/photo1.jpg");
        assert_eq!(params["quoteId"], "q3");
        assert_eq!(params["textColor"], "#FFD700");
        assert_eq!(params["position"], "top");
        assert_eq!(params["font"], "serif");

        let decoded = RenderSpec::from_params(&params).unwrap();
        assert_eq!(decoded, spec);
    }

    #[test]
    fn test_render_spec_rejects_missing_or_illegal_params() {
        let spec = RenderSpec::new(
            ImageUri::new("file:///p.jpg"),
            "q1",
            TextColor::default(),
            Position::Bottom,
            FontChoice::Normal,
        );

        let mut params = spec.to_params();
        params.remove("quoteId");
        assert!(RenderSpec::from_params(&params).is_err());

        let mut params = spec.to_params();
        params.insert("position".to_string(), "sideways".to_string());
        assert!(RenderSpec::from_params(&params).is_err());
    }

    #[test]
    fn test_render_spec_json_round_trip() {
        let spec = RenderSpec::new(
            ImageUri::new("file:///p.jpg"),
            "q2",
            TextColor::parse("#00ffff").unwrap(),
            Position::Center,
            FontChoice::Monospace,
        );
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"position\":\"center\""));
        assert!(json.contains("\"font\":\"monospace\""));
        let back: RenderSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
