//! The capture & export stage.
//!
//! Re-resolves the quote from a render spec, rasterizes the composed view to
//! PNG, persists it to the media store, and hands it to the share service.
//! Persistence and sharing are independent sequential steps; a share failure
//! never rolls back the save.

use crate::error::{AppError, Result};
use crate::quotes::{self, Quote};
use crate::spec::RenderSpec;
use arboard::{Clipboard, ImageData};
use directories::UserDirs;
use image::{ImageFormat, RgbaImage};
use std::borrow::Cow;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Resolves the quote a spec refers to.
///
/// A miss is terminal for the stage: it indicates an upstream invariant
/// violation, not a retryable condition.
pub fn resolve_quote(quote_id: &str) -> Result<&'static Quote> {
    quotes::find_quote(quote_id).ok_or_else(|| AppError::QuoteNotFound(quote_id.to_string()))
}

/// Rasterizes a composed view into a flat PNG.
pub fn encode_png(composed: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    composed
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| AppError::export(format!("Rasterization failed: {e}")))?;
    Ok(buffer)
}

/// Media persistence service (platform black box).
pub trait MediaStore {
    /// Asks for permission to write to the shared media store.
    fn request_permission(&mut self) -> Result<bool>;

    /// Saves the rasterized image under the given file name, returning where
    /// it landed.
    fn save(&mut self, png: &[u8], name: &str) -> Result<PathBuf>;
}

/// Share service (platform black box).
pub trait ShareService {
    /// Whether the native share mechanism is present.
    fn is_available(&self) -> bool;

    /// Invokes the native share mechanism with the persisted image.
    fn share(&mut self, path: &Path, image: &RgbaImage) -> Result<()>;

    /// Generic share fallback used when the native mechanism is absent.
    fn share_fallback(&mut self, path: &Path) -> Result<()> {
        info!(path = %path.display(), "share sheet unavailable, image left in media store");
        Ok(())
    }
}

/// How a completed "Save & Share" action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Saved and handed to the native share mechanism.
    Shared { saved_to: PathBuf },
    /// Saved and handed to the generic fallback.
    SharedFallback { saved_to: PathBuf },
    /// Another invocation of the same action was already running; this one
    /// did nothing.
    SkippedInFlight,
}

impl ExportOutcome {
    /// Where the exported image was persisted, when it was.
    pub fn saved_to(&self) -> Option<&Path> {
        match self {
            ExportOutcome::Shared { saved_to } | ExportOutcome::SharedFallback { saved_to } => {
                Some(saved_to)
            }
            ExportOutcome::SkippedInFlight => None,
        }
    }
}

/// Runs the export pipeline over a media store and a share service.
pub struct ExportStage<M, S> {
    store: M,
    share: S,
    in_flight: bool,
}

impl<M: MediaStore, S: ShareService> ExportStage<M, S> {
    pub fn new(store: M, share: S) -> Self {
        Self {
            store,
            share,
            in_flight: false,
        }
    }

    /// Rasterizes, persists, and shares the composed view.
    ///
    /// Idempotent per user gesture: a second invocation while one is in
    /// flight is a recorded no-op. Permission denial aborts before anything
    /// is written. Any failure leaves no partial state needing cleanup; the
    /// rasterization is held only in memory until persistence succeeds.
    pub fn save_and_share(
        &mut self,
        composed: &RgbaImage,
        spec: &RenderSpec,
    ) -> Result<ExportOutcome> {
        if self.in_flight {
            warn!("save_and_share already in flight, ignoring");
            return Ok(ExportOutcome::SkippedInFlight);
        }
        self.in_flight = true;
        let result = self.run(composed, spec);
        self.in_flight = false;
        result
    }

    fn run(&mut self, composed: &RgbaImage, spec: &RenderSpec) -> Result<ExportOutcome> {
        let png = encode_png(composed)?;

        if !self.store.request_permission()? {
            return Err(AppError::denied(
                "Please allow media access to save the image.",
            ));
        }

        let saved_to = self.store.save(&png, &export_name(spec))?;
        info!(path = %saved_to.display(), "image saved");

        if self.share.is_available() {
            self.share.share(&saved_to, composed)?;
            Ok(ExportOutcome::Shared { saved_to })
        } else {
            self.share.share_fallback(&saved_to)?;
            Ok(ExportOutcome::SharedFallback { saved_to })
        }
    }
}

fn export_name(spec: &RenderSpec) -> String {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("quotecam-{}-{stamp}.png", spec.quote_id)
}

/// Persists exports into the user's pictures directory.
pub struct PicturesMediaStore {
    dir: PathBuf,
}

impl PicturesMediaStore {
    /// Uses the configured output directory when set, otherwise the platform
    /// pictures directory, otherwise `~/Pictures`.
    pub fn new(output_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match output_dir {
            Some(dir) => dir,
            None => UserDirs::new()
                .and_then(|dirs| {
                    dirs.picture_dir()
                        .map(Path::to_path_buf)
                        .or_else(|| Some(dirs.home_dir().join("Pictures")))
                })
                .ok_or_else(|| AppError::config("No home directory to save images into"))?,
        };
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MediaStore for PicturesMediaStore {
    fn request_permission(&mut self) -> Result<bool> {
        // Write access to the target directory is the desktop analog of the
        // media-library permission.
        Ok(fs::create_dir_all(&self.dir).is_ok())
    }

    fn save(&mut self, png: &[u8], name: &str) -> Result<PathBuf> {
        let path = self.dir.join(name);
        fs::write(&path, png)
            .map_err(|e| AppError::export(format!("Could not save image: {e}")))?;
        Ok(path)
    }
}

/// Shares by placing the image on the system clipboard.
pub struct ClipboardShare;

impl ShareService for ClipboardShare {
    fn is_available(&self) -> bool {
        Clipboard::new().is_ok()
    }

    fn share(&mut self, _path: &Path, image: &RgbaImage) -> Result<()> {
        let mut clipboard = Clipboard::new()
            .map_err(|e| AppError::export(format!("Could not access clipboard: {e}")))?;
        clipboard
            .set_image(ImageData {
                width: image.width() as usize,
                height: image.height() as usize,
                bytes: Cow::Borrowed(image.as_raw()),
            })
            .map_err(|e| AppError::export(format!("Could not share image: {e}")))?;
        Ok(())
    }

    fn share_fallback(&mut self, path: &Path) -> Result<()> {
        println!("Image saved to {}; share it from there.", path.display());
        Ok(())
    }
}

/// Disables sharing: the export ends at the media store.
pub struct NoShare;

impl ShareService for NoShare {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&mut self, _path: &Path, _image: &RgbaImage) -> Result<()> {
        Ok(())
    }
}
