//! The image source provider: first stage of the pipeline.
//!
//! Produces a single image URI from either a camera capture or a gallery
//! pick, then hands it forward to the editor. The camera path is gated on a
//! runtime permission; the gallery path is not (the picker grants scoped
//! access implicitly on the platforms this targets).

use crate::error::{AppError, Result};
use crate::spec::ImageUri;
use image::DynamicImage;
use screenshots::Screen;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Outcome of a single acquisition attempt.
///
/// A denial or cancellation is terminal for that attempt; the user must
/// re-invoke the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// An image was obtained; navigate forward with this URI.
    Image(ImageUri),
    /// Permission was denied; surface a message, do not proceed.
    Denied(String),
    /// The user dismissed the dialog; abort silently.
    Cancelled,
}

/// Camera capture service (platform black box).
pub trait CameraService {
    /// Asks the platform for camera permission.
    fn request_permission(&mut self) -> Result<bool>;

    /// Launches the capture UI. `None` means the user cancelled.
    fn capture(&mut self) -> Result<Option<ImageUri>>;
}

/// Gallery picker service (platform black box).
pub trait GalleryService {
    /// Launches the picker. `None` means the user cancelled.
    fn pick(&mut self) -> Result<Option<ImageUri>>;
}

/// Acquires an image via the camera, permission first.
///
/// If permission is denied, the capture UI is never launched and the
/// attempt ends with [`Acquisition::Denied`].
pub fn acquire_from_camera(camera: &mut impl CameraService) -> Result<Acquisition> {
    if !camera.request_permission()? {
        info!("camera permission denied");
        return Ok(Acquisition::Denied("Camera access is required.".to_string()));
    }

    match camera.capture()? {
        Some(uri) => {
            debug!(uri = %uri, "camera capture complete");
            Ok(Acquisition::Image(uri))
        }
        None => Ok(Acquisition::Cancelled),
    }
}

/// Acquires an image via the gallery picker.
pub fn acquire_from_gallery(gallery: &mut impl GalleryService) -> Result<Acquisition> {
    match gallery.pick()? {
        Some(uri) => {
            debug!(uri = %uri, "gallery pick complete");
            Ok(Acquisition::Image(uri))
        }
        None => Ok(Acquisition::Cancelled),
    }
}

/// The machine's capture device: a screen grab standing in for the camera.
///
/// Permission maps to display availability; the shot is written to a
/// temporary PNG and referenced by `file://` URI.
pub struct ScreenCamera {
    screens: Vec<Screen>,
}

impl ScreenCamera {
    pub fn new() -> Result<Self> {
        let screens = Screen::all()
            .map_err(|e| AppError::acquisition(format!("Failed to enumerate screens: {e}")))?;
        Ok(Self { screens })
    }

    fn grab_primary(&self) -> Result<DynamicImage> {
        let screen = self
            .screens
            .first()
            .ok_or_else(|| AppError::acquisition("No capture device available"))?;

        let captured = screen
            .capture()
            .map_err(|e| AppError::acquisition(format!("Capture failed: {e}")))?;

        let width = captured.width();
        let height = captured.height();
        let rgba_data = captured.into_raw();

        let buffer = image::ImageBuffer::from_raw(width, height, rgba_data)
            .ok_or_else(|| AppError::acquisition("Failed to create image buffer"))?;

        Ok(DynamicImage::ImageRgba8(buffer))
    }

    fn temp_shot_path() -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("quotecam-shot-{stamp}.png"))
    }
}

impl CameraService for ScreenCamera {
    fn request_permission(&mut self) -> Result<bool> {
        Ok(!self.screens.is_empty())
    }

    fn capture(&mut self) -> Result<Option<ImageUri>> {
        let shot = self.grab_primary()?;
        let path = Self::temp_shot_path();
        shot.save(&path)?;
        info!(path = %path.display(), "capture saved");
        Ok(Some(ImageUri::from_path(&path)?))
    }
}

/// A gallery picker fed by an explicit path choice.
///
/// The CLI passes the path the user named; picking fails softly (cancel)
/// when no path was given at all.
pub struct FileGallery {
    choice: Option<PathBuf>,
}

impl FileGallery {
    pub fn new(choice: Option<PathBuf>) -> Self {
        Self { choice }
    }
}

impl GalleryService for FileGallery {
    fn pick(&mut self) -> Result<Option<ImageUri>> {
        let Some(path) = self.choice.take() else {
            return Ok(None);
        };
        if !path.is_file() {
            return Err(AppError::acquisition(format!(
                "No such image: {}",
                path.display()
            )));
        }
        Ok(Some(ImageUri::from_path(&path)?))
    }
}

/// Loads the image a URI points at into memory.
pub fn load_image(uri: &ImageUri) -> Result<DynamicImage> {
    let path = uri.to_path()?;
    Ok(image::open(&path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted camera that records whether capture was ever launched.
    struct MockCamera {
        grant: bool,
        capture_result: Option<ImageUri>,
        capture_calls: usize,
    }

    impl CameraService for MockCamera {
        fn request_permission(&mut self) -> Result<bool> {
            Ok(self.grant)
        }

        fn capture(&mut self) -> Result<Option<ImageUri>> {
            self.capture_calls += 1;
            Ok(self.capture_result.clone())
        }
    }

    struct MockGallery {
        pick_result: Option<ImageUri>,
    }

    impl GalleryService for MockGallery {
        fn pick(&mut self) -> Result<Option<ImageUri>> {
            Ok(self.pick_result.clone())
        }
    }

    #[test]
    fn test_denial_short_circuits_capture() {
        let mut camera = MockCamera {
            grant: false,
            capture_result: Some(ImageUri::new("file:///never.jpg")),
            capture_calls: 0,
        };

        let outcome = acquire_from_camera(&mut camera).unwrap();
        assert!(matches!(outcome, Acquisition::Denied(_)));
        assert_eq!(camera.capture_calls, 0, "capture must not launch after denial");
    }

    #[test]
    fn test_camera_cancellation_is_silent() {
        let mut camera = MockCamera {
            grant: true,
            capture_result: None,
            capture_calls: 0,
        };

        let outcome = acquire_from_camera(&mut camera).unwrap();
        assert_eq!(outcome, Acquisition::Cancelled);
        assert_eq!(camera.capture_calls, 1);
    }

    #[test]
    fn test_camera_success_passes_uri_through() {
        let mut camera = MockCamera {
            grant: true,
            capture_result: Some(ImageUri::new("file:///shot.png")),
            capture_calls: 0,
        };

        let outcome = acquire_from_camera(&mut camera).unwrap();
        assert_eq!(
            outcome,
            Acquisition::Image(ImageUri::new("file:///shot.png"))
        );
    }

    #[test]
    fn test_gallery_cancellation_yields_no_navigation() {
        let mut gallery = MockGallery { pick_result: None };
        let outcome = acquire_from_gallery(&mut gallery).unwrap();
        assert_eq!(outcome, Acquisition::Cancelled);
    }

    #[test]
    fn test_gallery_success() {
        let mut gallery = MockGallery {
            pick_result: Some(ImageUri::new("file://photo1.jpg")),
        };
        let outcome = acquire_from_gallery(&mut gallery).unwrap();
        assert_eq!(outcome, Acquisition::Image(ImageUri::new("file://photo1.jpg")));
    }

    #[test]
    fn test_file_gallery_picks_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo1.jpg");
        std::fs::write(&path, b"jpg").unwrap();

        let mut gallery = FileGallery::new(Some(path.clone()));
        let outcome = acquire_from_gallery(&mut gallery).unwrap();
        match outcome {
            Acquisition::Image(uri) => assert_eq!(uri.to_path().unwrap(), path),
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_file_gallery_missing_file_is_an_error() {
        let mut gallery = FileGallery::new(Some(PathBuf::from("/definitely/not/here.jpg")));
        assert!(gallery.pick().is_err());
    }

    #[test]
    fn test_file_gallery_no_choice_is_cancel() {
        let mut gallery = FileGallery::new(None);
        assert_eq!(acquire_from_gallery(&mut gallery).unwrap(), Acquisition::Cancelled);
    }
}
