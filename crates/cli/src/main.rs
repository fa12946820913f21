use anyhow::{Context, Result};
use clap::Parser;
use quotecam_core::error::AppError;
use quotecam_core::source::{self, Acquisition, FileGallery, ScreenCamera};
use quotecam_core::spec::{FontChoice, ImageUri, Position, RenderSpec, TextColor};
use quotecam_core::{Config, QuoteCam, init, quotes};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to overlay the quote on (the gallery pick)
    image: Option<PathBuf>,

    /// Capture the screen instead of picking an image
    #[arg(long, default_value_t = false)]
    camera: bool,

    /// Skip the editor window and export directly
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Quote id to use in headless mode (random when omitted)
    #[arg(short, long)]
    quote: Option<String>,

    /// Overlay text color in headless mode
    #[arg(long, default_value = "#ffffff")]
    color: String,

    /// Overlay position in headless mode: top, center, or bottom
    #[arg(long, default_value = "bottom")]
    position: String,

    /// Overlay font in headless mode: normal, serif, or monospace
    #[arg(long, default_value = "normal")]
    font: String,

    /// Save the export without sharing it
    #[arg(long, default_value_t = false)]
    no_share: bool,

    /// Override the export directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List available quotes and exit
    #[arg(long)]
    list_quotes: bool,
}

fn main() -> Result<()> {
    // Setup
    init_logging();
    let _ = dotenvy::dotenv();
    init();
    let args = Args::parse();

    // Load config and apply CLI overrides
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(dir) = args.output.clone() {
        config.output_dir = Some(dir);
    }

    // Handle --list-quotes
    if args.list_quotes {
        println!("Available quotes:");
        for quote in quotes::QUOTES {
            println!("{:>4}  \"{}\" - {}", quote.id, quote.text, quote.author);
        }
        return Ok(());
    }

    let app = QuoteCam::with_config(config);

    // Acquire the image
    let acquisition = if args.camera {
        let mut camera = ScreenCamera::new().context("Failed to initialize capture device")?;
        source::acquire_from_camera(&mut camera)?
    } else {
        let mut gallery = FileGallery::new(args.image.clone());
        source::acquire_from_gallery(&mut gallery)?
    };

    let image_uri = match acquisition {
        Acquisition::Image(uri) => uri,
        Acquisition::Denied(message) => {
            eprintln!("Permission Denied: {message}");
            return Ok(());
        }
        Acquisition::Cancelled => {
            println!("Cancelled");
            return Ok(());
        }
    };

    if args.headless {
        run_headless(&app, &args, image_uri)
    } else {
        app.run_editor(&image_uri).context("Failed to run UI")
    }
}

/// Composes and exports directly from CLI arguments, no editor window.
fn run_headless(app: &QuoteCam, args: &Args, image_uri: ImageUri) -> Result<()> {
    let quote = match &args.quote {
        Some(id) => quotecam_core::export::resolve_quote(id)
            .with_context(|| format!("Unknown quote id `{id}`, try --list-quotes"))?,
        None => quotes::random_quote(),
    };

    let spec = RenderSpec::new(
        image_uri,
        quote.id,
        args.color.parse::<TextColor>()?,
        args.position.parse::<Position>()?,
        args.font.parse::<FontChoice>()?,
    );

    match app.export_spec(&spec, !args.no_share) {
        Ok(outcome) => {
            if let Some(path) = outcome.saved_to() {
                println!("Saved to {}", path.display());
            }
            Ok(())
        }
        Err(AppError::PermissionDenied(message)) => {
            eprintln!("Permission required: {message}");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            eprintln!("Could not share the image.");
            Ok(())
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
