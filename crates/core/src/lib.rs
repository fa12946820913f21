//! QuoteCam Core Library
//!
//! This library provides the core functionality for the QuoteCam tool:
//! acquiring a photo, overlaying a quotation on it with configurable color,
//! position, and font, and exporting the composite for sharing.
//!
//! # Overview
//!
//! QuoteCam is a linear, forward-only pipeline of three stages:
//!
//! - **Image Source Provider**: camera capture or gallery pick via the
//!   [`source`] module
//! - **Overlay Configuration**: style selection against a live preview via
//!   [`editor`] and [`ui`]
//! - **Capture & Export**: deterministic re-render, rasterization,
//!   persistence, and share via [`export`]
//!
//! The only value crossing stage boundaries is the [`spec::RenderSpec`],
//! created atomically when the user leaves the editor and consumed read-only
//! by the export stage. Both the preview and the export render go through
//! the one [`compose::Compositor`], which is what makes the preview
//! trustworthy.
//!
//! # Quick Start
//!
//! The simplest way to use the library is through the [`QuoteCam`] facade:
//!
//! ```ignore
//! use quotecam_core::QuoteCam;
//! use quotecam_core::spec::ImageUri;
//!
//! let app = QuoteCam::new()?;
//!
//! // Launch the interactive editor on a picked image
//! let uri = ImageUri::from_path("photo1.jpg".as_ref())?;
//! app.run_editor(&uri)?;
//! ```
//!
//! # Module Structure
//!
//! - [`source`]: image acquisition (camera permission gate, gallery pick)
//! - [`quotes`]: the static quotation collection
//! - [`spec`]: the render spec and its navigation wire format
//! - [`editor`]: the configuration stage's session state
//! - [`compose`]: style resolution and overlay composition
//! - [`export`]: rasterization, media persistence, and sharing
//! - [`ui`]: the interactive editor window
//! - [`config`]: configuration loading
//! - [`error`]: error types and result aliases

pub mod compose;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod quotes;
pub mod source;
pub mod spec;
pub mod ui;

// Re-export primary types for convenience
pub use compose::Compositor;
pub use config::Config;
pub use error::{AppError, Result};
pub use export::ExportOutcome;
pub use quotes::Quote;
pub use spec::RenderSpec;

use export::{ClipboardShare, ExportStage, NoShare, PicturesMediaStore};
use image::RgbaImage;
use spec::ImageUri;

/// Main entry point for the QuoteCam application.
///
/// This struct provides a facade over the pipeline stages, handling
/// configuration and orchestration. It's the recommended way to use the
/// library for most use cases.
pub struct QuoteCam {
    config: Config,
}

impl QuoteCam {
    /// Creates a new QuoteCam instance with environment configuration.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: Config::load()?,
        })
    }

    /// Creates an instance with custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Launches the interactive editor on an acquired image.
    ///
    /// This is the main entry point for the visual workflow: the editor
    /// screen with its live preview, then the share screen.
    pub fn run_editor(&self, image_uri: &ImageUri) -> Result<()> {
        let background = source::load_image(image_uri)?;
        ui::run_editor_ui(background, image_uri.clone(), self.config.clone())
    }

    /// Re-renders the composition a spec describes, without UI.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::QuoteNotFound`] if the spec's quote id does not
    /// resolve; nothing is rendered in that case.
    pub fn compose_spec(&self, spec: &RenderSpec) -> Result<RgbaImage> {
        let quote = export::resolve_quote(&spec.quote_id)?;
        let background = source::load_image(&spec.image_uri)?;
        let compositor = Compositor::new(&self.config)?;
        compositor.compose(
            &background,
            quote,
            &spec.text_color,
            spec.position,
            spec.font,
        )
    }

    /// Headless export: compose, rasterize, persist, and optionally share.
    pub fn export_spec(&self, spec: &RenderSpec, share: bool) -> Result<ExportOutcome> {
        let composed = self.compose_spec(spec)?;
        let store = PicturesMediaStore::new(self.config.output_dir.clone())?;
        if share {
            ExportStage::new(store, ClipboardShare).save_and_share(&composed, spec)
        } else {
            ExportStage::new(store, NoShare).save_and_share(&composed, spec)
        }
    }
}

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup before using any other functions.
pub fn init() {
    let _ = dotenvy::dotenv();
}
