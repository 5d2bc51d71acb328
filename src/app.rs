use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use eframe::egui;
use image::RgbaImage;

use crate::data::loader;
use crate::data::region::PlotRequest;
use crate::data::roi_mean::{LabelMap, Volume};
use crate::error::{GrapherError, Result};
use crate::export::sink::{DialogSink, FileSink, SaveRequest};
use crate::export::snapshot::{compose_snapshot, encode_png};
use crate::state::session::GrapherSession;
use crate::state::settings::Settings;
use crate::ui::grapher_window::{self, GrapherAction};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Preview width of the snapshot dialog, in points.
const PREVIEW_WIDTH: f32 = 300.0;

/// What the user starts the application with.
#[derive(Debug, Default)]
pub struct Startup {
    pub table: Option<PlotRequest>,
    pub image: Option<Volume>,
    pub objectmap: Option<LabelMap>,
    pub extra_width: f32,
}

/// A captured snapshot waiting for the user to save or discard it.
struct SnapshotPreview {
    image: RgbaImage,
    texture: egui::TextureHandle,
}

pub struct VoiGraphApp {
    session: GrapherSession,
    settings: Settings,
    sink: Box<dyn FileSink>,
    image: Option<Volume>,
    objectmap: Option<LabelMap>,
    extra_width: f32,
    /// An error message shown in the footer until dismissed.
    error_message: Option<String>,
    /// Chart rect of the last frame, used to crop snapshots.
    chart_rect: Option<egui::Rect>,
    pending_snapshot: bool,
    snapshot_preview: Option<SnapshotPreview>,
    viewer_size: Option<[f32; 2]>,
}

impl VoiGraphApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, startup: Startup) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.visuals.window_corner_radius = egui::CornerRadius::same(8);
        ctx.set_style(style);
        ctx.set_visuals(egui::Visuals::dark());

        let mut app = Self {
            session: GrapherSession::new(settings.resize_debounce()),
            settings,
            sink: Box::new(DialogSink),
            image: startup.image,
            objectmap: startup.objectmap,
            extra_width: startup.extra_width,
            error_message: None,
            chart_rect: None,
            pending_snapshot: false,
            snapshot_preview: None,
            viewer_size: None,
        };

        if let Some(table) = startup.table {
            let result = app.session.plot(table, &app.settings.palette).map(|_| ());
            app.report(result);
        } else if app.image.is_some() || app.objectmap.is_some() {
            app.plot_roi();
        }
        app
    }

    /// Log a failure and show it in the footer.
    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::error!("{e}");
            self.error_message = Some(e.to_string());
        }
    }

    fn plot_roi(&mut self) {
        let result = self
            .session
            .plot_roi(
                self.image.as_ref(),
                self.objectmap.as_ref(),
                self.extra_width,
                &self.settings.palette,
            )
            .map(|_| ());
        self.report(result);
    }

    fn pick_file(filter: &str, extensions: &[&str]) -> Option<std::path::PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter, extensions)
            .add_filter("All Files", &["*"])
            .pick_file()
    }

    fn open_table(&mut self, path: &Path) {
        let result = loader::load_voi_table(path)
            .and_then(|table| self.session.plot(table, &self.settings.palette).map(|_| ()));
        self.report(result);
    }

    fn open_image(&mut self, path: &Path) {
        match loader::load_volume(path) {
            Ok(volume) => {
                tracing::info!("Loaded image {:?} ({} frames)", volume.dims, volume.frames);
                self.image = Some(volume);
            }
            Err(e) => self.report(Err(e)),
        }
    }

    fn open_objectmap(&mut self, path: &Path) {
        match loader::load_label_map(path) {
            Ok(map) => {
                tracing::info!("Loaded object map {:?}", map.dims);
                self.objectmap = Some(map);
            }
            Err(e) => self.report(Err(e)),
        }
    }

    fn export_csv(&mut self) {
        let result = self
            .session
            .export_csv(self.sink.as_mut(), &self.settings.csv_file_name)
            .map(|path| {
                if let Some(path) = path {
                    tracing::info!("Exported CSV to {:?}", path);
                }
            });
        self.report(result);
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: GrapherAction) {
        let palette = &self.settings.palette;
        match action {
            GrapherAction::None => {}
            GrapherAction::Close => self.session.close(),
            GrapherAction::PlotValues => {
                let result = self.session.replot(false, palette).map(|_| ());
                self.report(result);
            }
            GrapherAction::PlotVolumes => {
                let result = self.session.replot(true, palette).map(|_| ());
                self.report(result);
            }
            GrapherAction::ExportCsv => self.export_csv(),
            GrapherAction::SaveSnapshot => {
                self.pending_snapshot = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
        }
    }

    /// Turn a screenshot event into a snapshot preview.
    fn receive_screenshot(&mut self, ctx: &egui::Context) {
        let mut screenshot: Option<Arc<egui::ColorImage>> = None;
        ctx.input(|i| {
            for event in &i.raw.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    screenshot = Some(image.clone());
                }
            }
        });
        let Some(frame) = screenshot else {
            return;
        };
        self.pending_snapshot = false;

        let composed = compose_snapshot(
            &frame,
            self.chart_rect,
            ctx.pixels_per_point(),
            self.settings.snapshot_background,
        );
        match composed {
            Ok(image) => {
                let size = [image.width() as usize, image.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
                let texture =
                    ctx.load_texture("voi_snapshot", color_image, egui::TextureOptions::LINEAR);
                self.snapshot_preview = Some(SnapshotPreview { image, texture });
            }
            Err(e) => self.report(Err(e)),
        }
    }

    fn save_snapshot(&mut self, image: &RgbaImage) -> Result<()> {
        let bytes = encode_png(image)?;
        let request = SaveRequest::png(&self.settings.snapshot_file_name);
        if let Some(path) = self.sink.write_binary(&request, &bytes)? {
            tracing::info!("Saved snapshot to {:?}", path);
        }
        Ok(())
    }

    fn copy_snapshot(image: &RgbaImage) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| GrapherError::Clipboard(e.to_string()))?;
        let data = arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: std::borrow::Cow::Borrowed(image.as_raw().as_slice()),
        };
        clipboard
            .set_image(data)
            .map_err(|e| GrapherError::Clipboard(e.to_string()))?;
        tracing::info!("Copied snapshot to clipboard");
        Ok(())
    }

    fn show_snapshot_preview(&mut self, ctx: &egui::Context) {
        let Some(preview) = &self.snapshot_preview else {
            return;
        };
        let (w, h) = preview.image.dimensions();
        let scale = PREVIEW_WIDTH / w.max(1) as f32;

        let mut save = false;
        let mut copy = false;
        let mut close = false;
        let mut open = true;
        egui::Window::new("Snapshot")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!("This is the snapshot (size={w}x{h})."));
                ui.label("Click Save To File to output as png.");
                ui.add_space(6.0);
                ui.add(egui::Image::new(egui::load::SizedTexture::new(
                    preview.texture.id(),
                    egui::vec2(PREVIEW_WIDTH, h as f32 * scale),
                )));
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("Save To File").clicked() {
                        save = true;
                    }
                    if ui.button("Copy to Clipboard").clicked() {
                        copy = true;
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });

        if save || copy || close || !open {
            if let Some(preview) = self.snapshot_preview.take() {
                let result = if save {
                    self.save_snapshot(&preview.image)
                } else if copy {
                    Self::copy_snapshot(&preview.image)
                } else {
                    Ok(())
                };
                self.report(result);
            }
        }
    }
}

impl eframe::App for VoiGraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.pending_snapshot {
            self.receive_screenshot(ctx);
        }

        // Dropped tables are plotted directly.
        let mut dropped: Vec<std::path::PathBuf> = Vec::new();
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    dropped.push(path.clone());
                }
            }
        });
        for path in dropped {
            self.open_table(&path);
        }

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("VOI Grapher");
                    ui.separator();
                    if ui.button("Open Table").on_hover_text("VOI CSV export or JSON").clicked() {
                        if let Some(path) = Self::pick_file("VOI Tables", &["csv", "json"]) {
                            self.open_table(&path);
                        }
                    }
                    if ui.button("Open Image").clicked() {
                        if let Some(path) = Self::pick_file("Image Volumes", &["json"]) {
                            self.open_image(&path);
                        }
                    }
                    if ui.button("Open Object Map").clicked() {
                        if let Some(path) = Self::pick_file("Object Maps", &["json"]) {
                            self.open_objectmap(&path);
                        }
                    }
                    if ui.button("Plot VOI").on_hover_text("Average the image in each region").clicked() {
                        self.plot_roi();
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let status = match (&self.image, &self.objectmap) {
                        (Some(img), Some(_)) => format!("image {:?} x {} frames, object map loaded", img.dims, img.frames),
                        (Some(img), None) => format!("image {:?}, no object map", img.dims),
                        (None, Some(_)) => "object map loaded, no image".to_string(),
                        (None, None) => "no image or object map".to_string(),
                    };
                    ui.label(egui::RichText::new(status).weak());

                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        let central = egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.last_request().is_none() {
                ui.add_space(80.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(
                            "Open a VOI table, or an image and an object map, then click \"Plot VOI\".",
                        )
                        .weak(),
                    );
                });
            }
        });

        // The central panel plays the viewer the grapher window fits itself to.
        let size = central.response.rect.size();
        let viewer = Some([size.x, size.y]);
        let now = Instant::now();
        if self.viewer_size != viewer {
            self.viewer_size = viewer;
            self.session.notify_resize(viewer, now);
        }
        if let Err(e) = self.session.poll_resize(now, &self.settings.palette) {
            self.report(Err(e));
        }
        if let Some(wait) = self.session.resize_pending(now) {
            ctx.request_repaint_after(wait);
        }

        let (action, rect) = grapher_window::show_grapher_window(ctx, &mut self.session, &self.settings);
        if rect.is_some() {
            self.chart_rect = rect;
        }
        self.handle_action(ctx, action);

        self.show_snapshot_preview(ctx);
    }
}
