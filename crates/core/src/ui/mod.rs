//! User interface components for QuoteCam.
//!
//! This module provides the editor and share screens as a single eframe
//! window driven by a forward-only screen state machine.
//!
//! # Architecture
//!
//! - [`state`]: screen state machine and export event definitions
//! - [`app`]: the main application window
//!
//! # Usage
//!
//! ```ignore
//! use quotecam_core::{Config, spec::ImageUri, ui};
//!
//! let config = Config::load()?;
//! let image = image::open("photo1.jpg")?;
//! ui::run_editor_ui(image, ImageUri::from_path("photo1.jpg".as_ref())?, config)?;
//! ```

mod app;
mod state;

// Public API exports
pub use app::{QuoteCamApp, run_editor_ui};
pub use state::{Screen, ShareStatus};
