use crate::error::Result;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Directory where exported images are saved. Defaults to the platform
    /// pictures directory when unset.
    pub output_dir: Option<PathBuf>,
    /// Extra directory searched first when resolving font families.
    pub font_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        let output_dir = env::var("QUOTECAM_OUTPUT_DIR").ok().map(PathBuf::from);
        let font_dir = env::var("QUOTECAM_FONT_DIR").ok().map(PathBuf::from);

        Ok(Self {
            output_dir,
            font_dir,
        })
    }
}
