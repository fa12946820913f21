//! Quote-overlay composition.
//!
//! One compositor serves both the live editor preview and the export render.
//! Style resolution is a pure function and layout geometry lives in small
//! standalone helpers, so preview/export equivalence holds by construction
//! rather than by keeping two renderers in sync.
//!
//! All layout constants are expressed in a 320-pixel-wide design space and
//! scaled by the actual background width, so the same spec produces the same
//! proportions on any image.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::quotes::Quote;
use crate::spec::{FontChoice, Position, TextColor};
use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{Blend, draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Width of the design space the layout constants are expressed in.
const DESIGN_WIDTH: f32 = 320.0;

/// Quote line point size in design space.
const QUOTE_PT: f32 = 18.0;
/// Author line point size in design space.
const AUTHOR_PT: f32 = 14.0;
/// Quote line advance in design space.
const QUOTE_LINE_HEIGHT: f32 = 24.0;
/// Author line advance in design space.
const AUTHOR_LINE_HEIGHT: f32 = 19.0;
/// Gap between the panel and the nearest image edge.
const EDGE_INSET: f32 = 20.0;
/// Inner padding of the panel.
const PANEL_PADDING: f32 = 14.0;

/// Author line opacity (80%).
const AUTHOR_ALPHA: u8 = 204;
/// Panel fill: black at 35% opacity.
const PANEL_ALPHA: u8 = 89;

/// A fully resolved presentation record.
///
/// Produced by [`resolve_style`] from the three user-facing choices; both
/// renderers consume exactly this, never the raw choices.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub anchor: Position,
    pub family: FontChoice,
    /// Quote line fill, fully opaque.
    pub fill: Rgba<u8>,
    /// Author line fill: same color at reduced emphasis.
    pub author_fill: Rgba<u8>,
    /// Translucent backdrop behind the text.
    pub panel_fill: Rgba<u8>,
}

/// Maps `(position, font, color)` to a fully resolved style record.
///
/// Pure: no ambient state, no conditional style fragments.
pub fn resolve_style(position: Position, font: FontChoice, color: &TextColor) -> ResolvedStyle {
    let (r, g, b) = color.rgb();
    ResolvedStyle {
        anchor: position,
        family: font,
        fill: Rgba([r, g, b, 255]),
        author_fill: Rgba([r, g, b, AUTHOR_ALPHA]),
        panel_fill: Rgba([0, 0, 0, PANEL_ALPHA]),
    }
}

/// Scale factor from design space to a background of the given width.
pub fn scale_factor(width: u32) -> f32 {
    (width as f32 / DESIGN_WIDTH).max(0.5)
}

/// Vertical origin of the overlay panel for an anchor position.
///
/// `top` sits one inset below the top edge, `bottom` one inset above the
/// bottom edge, `center` starts at 40% of the image height. The result is
/// clamped so the panel stays inside the image.
pub fn anchor_origin(position: Position, image_height: i32, panel_height: i32, inset: i32) -> i32 {
    let y = match position {
        Position::Top => inset,
        Position::Center => (image_height as f32 * 0.40) as i32,
        Position::Bottom => image_height - inset - panel_height,
    };
    y.clamp(0, (image_height - panel_height).max(0))
}

/// Greedy word wrap against an arbitrary measuring function.
///
/// A word wider than `max_width` gets a line of its own rather than being
/// split mid-word.
pub fn wrap_text(text: &str, max_width: i32, measure: impl Fn(&str) -> i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// The three font families the overlay can use.
pub struct FontSet {
    normal: FontVec,
    serif: FontVec,
    monospace: FontVec,
}

/// Directories searched for font files, in order.
const SEARCH_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/TTF",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "C:\\Windows\\Fonts",
];

const NORMAL_CANDIDATES: &[&str] = &[
    "DejaVuSans.ttf",
    "LiberationSans-Regular.ttf",
    "Arial.ttf",
    "arial.ttf",
];

const SERIF_CANDIDATES: &[&str] = &[
    "DejaVuSerif.ttf",
    "LiberationSerif-Regular.ttf",
    "Georgia.ttf",
    "georgia.ttf",
    "times.ttf",
];

const MONOSPACE_CANDIDATES: &[&str] = &[
    "DejaVuSansMono.ttf",
    "LiberationMono-Regular.ttf",
    "Courier New.ttf",
    "cour.ttf",
];

impl FontSet {
    /// Resolves all three families from the configured font directory and
    /// the platform font directories.
    pub fn load(config: &Config) -> Result<Self> {
        let extra = config.font_dir.as_deref();
        Ok(Self {
            normal: Self::load_family("normal", NORMAL_CANDIDATES, extra)?,
            serif: Self::load_family("serif", SERIF_CANDIDATES, extra)?,
            monospace: Self::load_family("monospace", MONOSPACE_CANDIDATES, extra)?,
        })
    }

    fn load_family(family: &str, candidates: &[&str], extra: Option<&Path>) -> Result<FontVec> {
        let path = Self::locate(candidates, extra).ok_or_else(|| {
            AppError::render(format!(
                "No usable {family} font found; set QUOTECAM_FONT_DIR to a directory containing one of {candidates:?}"
            ))
        })?;

        debug!(family, path = %path.display(), "font resolved");
        let bytes = fs::read(&path)?;
        FontVec::try_from_vec(bytes)
            .map_err(|_| AppError::render(format!("Invalid font file: {}", path.display())))
    }

    fn locate(candidates: &[&str], extra: Option<&Path>) -> Option<PathBuf> {
        let extra_iter = extra.map(Path::to_path_buf).into_iter();
        let dirs = extra_iter.chain(SEARCH_DIRS.iter().map(PathBuf::from));

        for dir in dirs {
            for name in candidates {
                let path = dir.join(name);
                if path.is_file() {
                    return Some(path);
                }
            }
        }
        None
    }

    fn font_for(&self, family: FontChoice) -> &FontVec {
        match family {
            FontChoice::Normal => &self.normal,
            FontChoice::Serif => &self.serif,
            FontChoice::Monospace => &self.monospace,
        }
    }
}

/// Renders quote overlays onto background images.
pub struct Compositor {
    fonts: FontSet,
}

impl Compositor {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            fonts: FontSet::load(config)?,
        })
    }

    pub fn with_fonts(fonts: FontSet) -> Self {
        Self { fonts }
    }

    /// Lays the quote and author line over the background at the anchor
    /// implied by `position`, in the family implied by `font`, filled with
    /// `color`. Deterministic: the same inputs always produce the same
    /// pixels, which is what makes the preview trustworthy.
    pub fn compose(
        &self,
        background: &DynamicImage,
        quote: &Quote,
        color: &TextColor,
        position: Position,
        font: FontChoice,
    ) -> Result<RgbaImage> {
        let style = resolve_style(position, font, color);
        let font = self.fonts.font_for(style.family);

        let mut canvas = Blend(background.to_rgba8());
        let width = canvas.0.width() as i32;
        let height = canvas.0.height() as i32;

        let s = scale_factor(canvas.0.width());
        let quote_scale = PxScale::from(QUOTE_PT * s);
        let author_scale = PxScale::from(AUTHOR_PT * s);
        let quote_advance = (QUOTE_LINE_HEIGHT * s) as i32;
        let author_advance = (AUTHOR_LINE_HEIGHT * s) as i32;
        let pad = (PANEL_PADDING * s) as i32;
        // Keep the panel on-image even for very narrow backgrounds.
        let inset = ((EDGE_INSET * s) as i32).min(width / 8);

        let quote_line = format!("\"{}\"", quote.text);
        let author_line = format!("- {}", quote.author);

        let max_text_width = (width - 2 * inset - 2 * pad).max(1);
        let lines = wrap_text(&quote_line, max_text_width, |t| {
            let (w, _) = text_size(quote_scale, font, t);
            w as i32
        });

        let panel_height = 2 * pad + lines.len() as i32 * quote_advance + author_advance;
        let panel_y = anchor_origin(style.anchor, height, panel_height, inset);
        let panel_width = (width - 2 * inset).max(1) as u32;

        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(inset, panel_y).of_size(panel_width, panel_height.max(1) as u32),
            style.panel_fill,
        );

        let mut y = panel_y + pad;
        for line in &lines {
            let (line_width, _) = text_size(quote_scale, font, line);
            let x = (width - line_width as i32) / 2;
            draw_text_mut(&mut canvas, style.fill, x, y, quote_scale, font, line);
            y += quote_advance;
        }

        let (author_width, _) = text_size(author_scale, font, &author_line);
        let x = (width - author_width as i32) / 2;
        draw_text_mut(&mut canvas, style.author_fill, x, y, author_scale, font, &author_line);

        Ok(canvas.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_background(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 255, 255, 255]),
        ))
    }

    fn test_quote() -> Quote {
        Quote {
            id: "q3",
            text: "Be the change.",
            author: "Gandhi",
        }
    }

    /// Pixel tests need real font files; skip when the host has none.
    fn compositor() -> Option<Compositor> {
        match Compositor::new(&Config::default()) {
            Ok(c) => Some(c),
            Err(e) => {
                eprintln!("skipping pixel test, no fonts available: {e}");
                None
            }
        }
    }

    #[test]
    fn test_resolve_style_is_a_direct_mapping() {
        let color = TextColor::parse("#ff69b4").unwrap();
        for position in Position::ALL {
            for font in FontChoice::ALL {
                let style = resolve_style(position, font, &color);
                assert_eq!(style.anchor, position);
                assert_eq!(style.family, font);
            }
        }
    }

    #[test]
    fn test_resolve_style_fills() {
        let style = resolve_style(
            Position::Top,
            FontChoice::Serif,
            &TextColor::parse("#000000").unwrap(),
        );
        assert_eq!(style.fill, Rgba([0, 0, 0, 255]));
        assert_eq!(style.author_fill, Rgba([0, 0, 0, AUTHOR_ALPHA]));
        assert_eq!(style.panel_fill, Rgba([0, 0, 0, PANEL_ALPHA]));
    }

    #[test]
    fn test_resolve_style_same_inputs_same_output() {
        let color = TextColor::parse("#FFD700").unwrap();
        let a = resolve_style(Position::Center, FontChoice::Monospace, &color);
        let b = resolve_style(Position::Center, FontChoice::Monospace, &color);
        assert_eq!(a, b);
    }

    #[test]
    fn test_anchor_origin_mapping() {
        assert_eq!(anchor_origin(Position::Top, 1000, 100, 20), 20);
        assert_eq!(anchor_origin(Position::Bottom, 1000, 100, 20), 880);
        assert_eq!(anchor_origin(Position::Center, 1000, 100, 20), 400);
    }

    #[test]
    fn test_anchor_origin_clamps_to_image() {
        // Panel taller than the space below the 40% line
        assert_eq!(anchor_origin(Position::Center, 100, 80, 10), 20);
        // Panel taller than the image entirely
        assert_eq!(anchor_origin(Position::Bottom, 50, 80, 10), 0);
    }

    #[test]
    fn test_wrap_text_greedy() {
        let measure = |s: &str| s.chars().count() as i32;
        let lines = wrap_text("one two three four", 9, measure);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_wrap_text_single_line() {
        let measure = |s: &str| s.chars().count() as i32;
        assert_eq!(wrap_text("short", 100, measure), vec!["short"]);
    }

    #[test]
    fn test_wrap_text_oversized_word_gets_own_line() {
        let measure = |s: &str| s.chars().count() as i32;
        let lines = wrap_text("a incomprehensibilities b", 10, measure);
        assert_eq!(lines, vec!["a", "incomprehensibilities", "b"]);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let Some(compositor) = compositor() else { return };
        let bg = white_background(320, 320);
        let color = TextColor::parse("#000000").unwrap();

        let a = compositor
            .compose(&bg, &test_quote(), &color, Position::Top, FontChoice::Serif)
            .unwrap();
        let b = compositor
            .compose(&bg, &test_quote(), &color, Position::Top, FontChoice::Serif)
            .unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_compose_anchors_panel_per_position() {
        let Some(compositor) = compositor() else { return };
        let bg = white_background(320, 320);
        let color = TextColor::default();

        let top = compositor
            .compose(&bg, &test_quote(), &color, Position::Top, FontChoice::Normal)
            .unwrap();
        let bottom = compositor
            .compose(&bg, &test_quote(), &color, Position::Bottom, FontChoice::Normal)
            .unwrap();

        // The translucent panel darkens the white background where it sits.
        let near_top = top.get_pixel(160, 30);
        assert!(near_top[0] < 255, "top anchor must darken the upper band");
        let bottom_upper = bottom.get_pixel(160, 30);
        assert_eq!(bottom_upper[0], 255, "bottom anchor must leave the upper band untouched");

        let near_bottom = bottom.get_pixel(160, 290);
        assert!(near_bottom[0] < 255, "bottom anchor must darken the lower band");
        let top_lower = top.get_pixel(160, 290);
        assert_eq!(top_lower[0], 255, "top anchor must leave the lower band untouched");
    }

    #[test]
    fn test_compose_preserves_dimensions() {
        let Some(compositor) = compositor() else { return };
        let bg = white_background(640, 480);
        let out = compositor
            .compose(
                &bg,
                &test_quote(),
                &TextColor::default(),
                Position::Center,
                FontChoice::Monospace,
            )
            .unwrap();
        assert_eq!(out.dimensions(), (640, 480));
    }

    #[test]
    fn test_compose_font_choice_changes_output() {
        let Some(compositor) = compositor() else { return };
        let bg = white_background(320, 320);
        let color = TextColor::parse("#000000").unwrap();

        let normal = compositor
            .compose(&bg, &test_quote(), &color, Position::Bottom, FontChoice::Normal)
            .unwrap();
        let mono = compositor
            .compose(&bg, &test_quote(), &color, Position::Bottom, FontChoice::Monospace)
            .unwrap();
        assert_ne!(normal.as_raw(), mono.as_raw());
    }
}
