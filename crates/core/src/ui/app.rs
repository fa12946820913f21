//! Main QuoteCam window.
//!
//! Implements the editor and share screens as one `eframe::App` with a
//! forward-only screen state machine. Both screens render their image through
//! the shared [`Compositor`], so the preview shown while editing is the same
//! composition the export stage rasterizes.

use super::state::{ExportEvent, Screen, ShareStatus};
use crate::compose::Compositor;
use crate::config::Config;
use crate::editor::{EditorSession, PRESET_COLORS};
use crate::error::{AppError, Result};
use crate::export::{ClipboardShare, ExportOutcome, ExportStage, PicturesMediaStore, resolve_quote};
use crate::spec::{FontChoice, ImageUri, Position, RenderSpec, TextColor};
use eframe::egui;
use image::{DynamicImage, RgbaImage};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;
use tracing::error;

/// Maximum on-screen size of the composed image.
const PREVIEW_MAX: egui::Vec2 = egui::Vec2 { x: 440.0, y: 440.0 };

pub struct QuoteCamApp {
    background: DynamicImage,
    compositor: Compositor,
    config: Config,

    screen: Screen,
    session: EditorSession,

    // Editor preview, recomposed whenever a style selection changes
    preview_texture: Option<egui::TextureHandle>,
    preview_dirty: bool,
    preview_error: Option<String>,

    // Share screen render, composed once per spec
    share_image: Option<RgbaImage>,
    share_texture: Option<egui::TextureHandle>,

    status: ShareStatus,
    rx: Receiver<ExportEvent>,
    tx: Sender<ExportEvent>,
}

impl QuoteCamApp {
    pub fn new(background: DynamicImage, image_uri: ImageUri, config: Config) -> Result<Self> {
        let compositor = Compositor::new(&config)?;
        let session = EditorSession::new(image_uri);
        let (tx, rx) = channel();

        Ok(Self {
            background,
            compositor,
            config,
            screen: Screen::Editor,
            session,
            preview_texture: None,
            preview_dirty: true,
            preview_error: None,
            share_image: None,
            share_texture: None,
            status: ShareStatus::Idle,
            rx,
            tx,
        })
    }

    fn load_texture(
        ctx: &egui::Context,
        name: &str,
        image: &RgbaImage,
    ) -> egui::TextureHandle {
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
    }

    /// Scales a texture size to fit the preview area.
    fn fitted(size: egui::Vec2) -> egui::Vec2 {
        let scale = (PREVIEW_MAX.x / size.x)
            .min(PREVIEW_MAX.y / size.y)
            .min(1.0);
        size * scale
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        if !self.preview_dirty && self.preview_texture.is_some() {
            return;
        }
        match self.compositor.compose(
            &self.background,
            self.session.quote(),
            self.session.text_color(),
            self.session.position(),
            self.session.font(),
        ) {
            Ok(composed) => {
                self.preview_texture = Some(Self::load_texture(ctx, "preview", &composed));
                self.preview_error = None;
            }
            Err(e) => {
                error!(error = %e, "preview composition failed");
                self.preview_error = Some(e.to_string());
            }
        }
        self.preview_dirty = false;
    }

    /// Leaves the editor: builds the spec, passes it through the navigation
    /// wire format, and resolves its quote on the receiving side.
    fn proceed_to_share(&mut self) {
        let params = self.session.proceed().to_params();
        let spec = match RenderSpec::from_params(&params) {
            Ok(spec) => spec,
            Err(e) => {
                error!(error = %e, "navigation params failed to decode");
                self.preview_error = Some(e.to_string());
                return;
            }
        };

        self.screen = match resolve_quote(&spec.quote_id) {
            Ok(quote) => Screen::Share { spec, quote },
            Err(_) => Screen::QuoteMissing,
        };
        self.share_image = None;
        self.share_texture = None;
        self.status = ShareStatus::Idle;
    }

    fn begin_export(&mut self, composed: RgbaImage, spec: RenderSpec) {
        self.status = ShareStatus::Pending;
        let tx = self.tx.clone();
        let output_dir = self.config.output_dir.clone();

        thread::spawn(move || {
            let result = PicturesMediaStore::new(output_dir).and_then(|store| {
                ExportStage::new(store, ClipboardShare).save_and_share(&composed, &spec)
            });
            let event = match result {
                Ok(outcome) => ExportEvent::Finished(outcome),
                Err(e) => {
                    error!(error = %e, "export failed");
                    ExportEvent::Failed(failure_message(&e))
                }
            };
            let _ = tx.send(event);
        });
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.rx.try_recv() {
            self.status = match event {
                ExportEvent::Finished(ExportOutcome::Shared { saved_to }) => ShareStatus::Done(
                    format!("Saved to {} and copied to your clipboard.", saved_to.display()),
                ),
                ExportEvent::Finished(ExportOutcome::SharedFallback { saved_to }) => {
                    ShareStatus::Done(format!("Saved to {}.", saved_to.display()))
                }
                ExportEvent::Finished(ExportOutcome::SkippedInFlight) => ShareStatus::Idle,
                ExportEvent::Failed(message) => ShareStatus::Error(message),
            };
            ctx.request_repaint();
        }
    }

    fn show_editor(&mut self, ui: &mut egui::Ui) {
        ui.heading("Customize Your Quote");
        ui.add_space(8.0);

        if let Some(err) = &self.preview_error {
            ui.colored_label(egui::Color32::RED, err);
        } else if let Some(texture) = &self.preview_texture {
            let size = Self::fitted(texture.size_vec2());
            ui.image((texture.id(), size));
        }

        ui.add_space(8.0);
        ui.label("Position");
        ui.horizontal(|ui| {
            for position in Position::ALL {
                let selected = self.session.position() == position;
                if ui.selectable_label(selected, position.as_str()).clicked() {
                    self.session.set_position(position);
                    self.preview_dirty = true;
                }
            }
        });

        ui.label("Text Color");
        ui.horizontal(|ui| {
            for preset in PRESET_COLORS {
                let Ok(color) = TextColor::parse(preset) else {
                    continue;
                };
                let (r, g, b) = color.rgb();
                let selected = self.session.text_color().as_str() == preset;
                let stroke = if selected {
                    egui::Stroke::new(3.0, egui::Color32::BLACK)
                } else {
                    egui::Stroke::new(1.0, egui::Color32::GRAY)
                };
                let swatch = egui::Button::new("")
                    .fill(egui::Color32::from_rgb(r, g, b))
                    .stroke(stroke)
                    .min_size(egui::vec2(26.0, 26.0));
                if ui.add(swatch).clicked() {
                    self.session.set_text_color(color);
                    self.preview_dirty = true;
                }
            }
        });

        ui.label("Font");
        ui.horizontal(|ui| {
            for font in FontChoice::ALL {
                let selected = self.session.font() == font;
                if ui.selectable_label(selected, font.as_str()).clicked() {
                    self.session.set_font(font);
                    self.preview_dirty = true;
                }
            }
        });

        ui.add_space(12.0);
        if ui.button("Next: Share").clicked() {
            self.proceed_to_share();
        }
    }

    fn show_share(&mut self, ui: &mut egui::Ui) {
        let (spec, quote) = match &self.screen {
            Screen::Share { spec, quote } => (spec.clone(), *quote),
            _ => return,
        };

        ui.heading("Your Quote Image");
        ui.add_space(8.0);

        if self.share_image.is_none() {
            match self.compositor.compose(
                &self.background,
                quote,
                &spec.text_color,
                spec.position,
                spec.font,
            ) {
                Ok(composed) => {
                    self.share_texture = Some(Self::load_texture(ui.ctx(), "share", &composed));
                    self.share_image = Some(composed);
                }
                Err(e) => {
                    error!(error = %e, "share composition failed");
                    self.status = ShareStatus::Error("Could not share the image.".to_string());
                }
            }
        }

        if let Some(texture) = &self.share_texture {
            let size = Self::fitted(texture.size_vec2());
            ui.image((texture.id(), size));
        }

        ui.add_space(12.0);
        let pending = self.status == ShareStatus::Pending;
        let clicked = ui
            .add_enabled(!pending, egui::Button::new("Save & Share"))
            .clicked();

        match &self.status {
            ShareStatus::Pending => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Sharing...");
                });
            }
            ShareStatus::Done(message) => {
                ui.label(message);
            }
            ShareStatus::Error(message) => {
                ui.colored_label(egui::Color32::RED, message);
            }
            ShareStatus::Idle => {}
        }

        if clicked && !pending {
            if let Some(composed) = self.share_image.clone() {
                self.begin_export(composed, spec);
            }
        }
    }
}

impl eframe::App for QuoteCamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);

        if self.status == ShareStatus::Pending {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        if matches!(self.screen, Screen::Editor) {
            self.refresh_preview(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if matches!(self.screen, Screen::Editor) {
                self.show_editor(ui);
            } else if matches!(self.screen, Screen::Share { .. }) {
                self.show_share(ui);
            } else {
                ui.heading("Quote not found!");
            }
        });
    }
}

/// User-facing message for an export failure.
///
/// Permission denials keep their specific message; everything else collapses
/// to the single generic alert. Details stay in the log.
fn failure_message(e: &AppError) -> String {
    match e {
        AppError::PermissionDenied(message) => message.clone(),
        _ => "Could not share the image.".to_string(),
    }
}

/// Launches the QuoteCam window over an acquired image.
pub fn run_editor_ui(background: DynamicImage, image_uri: ImageUri, config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([500.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "QuoteCam",
        options,
        Box::new(move |_cc| {
            let app = QuoteCamApp::new(background, image_uri, config)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
            Ok(Box::new(app) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {e}")))
}
