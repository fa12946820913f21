//! The overlay configuration stage.
//!
//! Holds the transient style selections for one editing session and emits a
//! complete [`RenderSpec`] when the user proceeds. The quote is chosen once,
//! at session entry, and threaded through the session explicitly; re-entering
//! the stage may pick a different quote, which is accepted nondeterminism.

use crate::quotes::{self, Quote};
use crate::spec::{FontChoice, ImageUri, Position, RenderSpec, TextColor};

/// The fixed palette the user picks the text color from.
pub const PRESET_COLORS: [&str; 5] = ["#ffffff", "#000000", "#ff69b4", "#00ffff", "#FFD700"];

/// In-memory state of one configuration-stage entry.
pub struct EditorSession {
    image_uri: ImageUri,
    quote: &'static Quote,
    text_color: TextColor,
    position: Position,
    font: FontChoice,
}

impl EditorSession {
    /// Enters the stage: picks the session's quote at random and starts from
    /// the default style (white text, bottom anchor, normal font).
    pub fn new(image_uri: ImageUri) -> Self {
        Self::with_quote(image_uri, quotes::random_quote())
    }

    /// Enters the stage with a predetermined quote.
    pub fn with_quote(image_uri: ImageUri, quote: &'static Quote) -> Self {
        Self {
            image_uri,
            quote,
            text_color: TextColor::default(),
            position: Position::default(),
            font: FontChoice::default(),
        }
    }

    /// The quote fixed for this session's lifetime.
    pub fn quote(&self) -> &'static Quote {
        self.quote
    }

    pub fn image_uri(&self) -> &ImageUri {
        &self.image_uri
    }

    pub fn text_color(&self) -> &TextColor {
        &self.text_color
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn font(&self) -> FontChoice {
        self.font
    }

    /// Selects a text color. Only palette selection reaches this in the UI,
    /// so the value is always a legal color by construction.
    pub fn set_text_color(&mut self, color: TextColor) {
        self.text_color = color;
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn set_font(&mut self, font: FontChoice) {
        self.font = font;
    }

    /// Leaves the stage: packages the image URI, the session's quote id and
    /// the three style selections into a render spec, atomically.
    pub fn proceed(&self) -> RenderSpec {
        RenderSpec::new(
            self.image_uri.clone(),
            self.quote.id,
            self.text_color.clone(),
            self.position,
            self.font,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::find_quote;

    #[test]
    fn test_session_defaults() {
        let session = EditorSession::new(ImageUri::new("file:///p.jpg"));
        assert_eq!(session.text_color().as_str(), "#ffffff");
        assert_eq!(session.position(), Position::Bottom);
        assert_eq!(session.font(), FontChoice::Normal);
    }

    #[test]
    fn test_quote_fixed_for_session_lifetime() {
        let session = EditorSession::new(ImageUri::new("file:///p.jpg"));
        let first = session.quote().id;
        for _ in 0..10 {
            assert_eq!(session.quote().id, first);
        }
    }

    #[test]
    fn test_proceed_packages_current_selections() {
        let quote = find_quote("q3").unwrap();
        let mut session = EditorSession::with_quote(ImageUri::new("file://photo1.jpg"), quote);
        session.set_text_color(TextColor::parse("#000000").unwrap());
        session.set_position(Position::Top);
        session.set_font(FontChoice::Serif);

        let spec = session.proceed();
        assert_eq!(spec.image_uri.as_str(), "file://photo1.jpg");
        assert_eq!(spec.quote_id, "q3");
        assert_eq!(spec.text_color.as_str(), "#000000");
        assert_eq!(spec.position, Position::Top);
        assert_eq!(spec.font, FontChoice::Serif);
    }

    #[test]
    fn test_palette_entries_are_all_valid_colors() {
        for entry in PRESET_COLORS {
            let color = TextColor::parse(entry).unwrap();
            assert_eq!(color.as_str(), entry);
        }
    }
}
