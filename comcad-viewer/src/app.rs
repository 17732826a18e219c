//! Main application state and eframe integration.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use comcad_core::config::ZOOM_STEP;
use comcad_core::loader::SUPPORTED_EXTENSIONS;
use comcad_core::{
    CanvasConfig, CanvasController, Capabilities, GridAnchor, GridSpec, LoadOptions, LoadResult,
    LoadedDocument, PdfBackends, PointerSample, SnapMode, Vector,
};
use egui::{
    Align, Align2, CentralPanel, ColorImage, Context, Key, Layout, Modifiers, RichText, Sense,
    Shape, SidePanel, Stroke, TextureHandle, TextureOptions, TopBottomPanel, Ui, Vec2,
};

use crate::canvas;
use crate::layers::LayerVisibility;
use crate::loading::BackgroundLoader;
use crate::settings;
use crate::splash::{self, SplashPhase, SplashTimeline};
use crate::status::{StatusLine, MESSAGE_TIMEOUT};
use crate::theme;

/// Which top-level screen is showing.
#[derive(Debug, Clone, Copy)]
enum Screen {
    /// Started at `started` seconds of egui time.
    Splash {
        timeline: SplashTimeline,
        started: f64,
    },
    Main,
}

/// Main application state.
pub struct ComcadApp {
    screen: Screen,

    /// Persisted settings, refreshed from the canvas before saving
    config: CanvasConfig,
    /// Grid, snap, overlay and view state
    canvas: CanvasController,
    /// Layer visibility toggles
    layers: LayerVisibility,

    caps: Capabilities,
    backends: PdfBackends,
    loader: BackgroundLoader,
    /// Last successfully loaded plan
    document: Option<LoadResult>,
    preview_texture: Option<TextureHandle>,

    /// Latest pointer sample, fed by the canvas notifier
    pointer_readout: Rc<RefCell<Option<PointerSample>>>,
    /// Transient status message
    status: StatusLine,

    /// Flag to trigger fit-to-content on next frame
    fit_pending: bool,
    /// Grid shapes for the current view, rebuilt when the scene is dirty
    grid_cache: Vec<Shape>,
    grid_cache_rect: Option<egui::Rect>,
    /// Last hover position, to publish only real pointer moves
    last_hover: Option<egui::Pos2>,

    show_close_dialog: bool,
    /// Close confirmed; let the next close request through
    allow_close: bool,
}

impl ComcadApp {
    /// Create the application, starting on the splash screen.
    pub fn new(cc: &eframe::CreationContext<'_>, initial_file: Option<PathBuf>) -> Self {
        let config = settings::load_settings();
        let mut canvas = CanvasController::from_config(&config, 0.0, 0.0);

        let pointer_readout = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&pointer_readout);
        canvas.subscribe(move |sample: &PointerSample| *sink.borrow_mut() = Some(*sample));

        let backends = PdfBackends::detect();
        let caps = Capabilities::detect(&backends);
        tracing::info!("Loader capabilities: {:?}", caps);

        let timeline = SplashTimeline::new();
        tracing::debug!("Splash runs for {} ms", timeline.total().as_millis());

        let mut app = Self {
            screen: Screen::Splash {
                timeline,
                started: cc.egui_ctx.input(|i| i.time),
            },
            layers: LayerVisibility::with_grid(config.show_grid),
            config,
            canvas,
            caps,
            backends,
            loader: BackgroundLoader::new(),
            document: None,
            preview_texture: None,
            pointer_readout,
            status: StatusLine::new(),
            fit_pending: true,
            grid_cache: Vec::new(),
            grid_cache_rect: None,
            last_hover: None,
            show_close_dialog: false,
            allow_close: false,
        };

        // Parse while the splash is up
        if let Some(path) = initial_file {
            app.start_load(path);
        }

        app
    }

    /// Load a plan in the background.
    fn start_load(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        tracing::info!("Opening {}", path.display());
        self.status
            .show(format!("Loading {}...", name), MESSAGE_TIMEOUT, Instant::now());

        let options = LoadOptions {
            preview_max_px: self.config.preview_max_px(),
        };
        self.loader
            .start(path, options, self.caps, self.backends.clone());
    }

    /// Pick up a finished load, if any.
    fn poll_loader(&mut self, ctx: &Context) {
        let Some(result) = self.loader.poll() else {
            return;
        };

        let now = Instant::now();
        if result.is_ok() {
            self.preview_texture = result
                .pdf()
                .and_then(|info| info.preview.as_ref())
                .map(|image| preview_texture(ctx, image));
            self.status.show(
                format!("Loaded {} | {}", result.file_name(), result.short_description()),
                MESSAGE_TIMEOUT,
                now,
            );
            self.document = Some(result);
            self.fit_pending = true;
        } else {
            // Keep showing whatever was loaded before.
            self.status
                .show(result.short_description(), MESSAGE_TIMEOUT, now);
        }
    }

    /// Open file dialog and load selected file.
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Plans", &plan_extensions()[..])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    fn pending_action(&mut self, name: &str) {
        self.status
            .show(format!("{} (pending)", name), MESSAGE_TIMEOUT, Instant::now());
    }

    fn set_snap_enabled(&mut self, enabled: bool) {
        self.canvas.set_snap_enabled(enabled);
        let text = if enabled { "Snap on" } else { "Snap off" };
        self.status.show(text, MESSAGE_TIMEOUT, Instant::now());
    }

    /// Copy the live canvas settings into the persisted config.
    fn sync_config(&mut self) {
        let snap = *self.canvas.snap_settings();
        let grid = *self.canvas.grid();
        self.config.snap_enabled = snap.enabled;
        self.config.snap_mode = snap.mode;
        self.config.snap_tolerance_px = snap.tolerance_px;
        self.config.show_crosshair = self.canvas.show_crosshair();
        self.config.show_grid = self.layers.grid;
        self.config.minor_spacing = grid.minor_spacing();
        self.config.major_every = grid.major_every();
        self.config.major_anchor = grid.anchor();
    }

    fn element_count(&self) -> usize {
        self.document
            .as_ref()
            .and_then(LoadResult::document)
            .map_or(0, LoadedDocument::element_count)
    }

    // ==================== Splash ====================

    fn update_splash(&mut self, ctx: &Context) {
        let Screen::Splash {
            mut timeline,
            started,
        } = self.screen
        else {
            return;
        };

        let t = Duration::from_secs_f64(ctx.input(|i| i.time - started).max(0.0));
        let skip = ctx.input(|i| {
            i.pointer.any_pressed()
                || i.events
                    .iter()
                    .any(|e| matches!(e, egui::Event::Key { pressed: true, .. }))
        });
        if skip {
            timeline.skip(t);
        }

        if timeline.phase(t) == SplashPhase::Done {
            tracing::info!("Splash finished after {} ms", t.as_millis());
            self.screen = Screen::Main;
            ctx.request_repaint();
            return;
        }
        self.screen = Screen::Splash { timeline, started };

        CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::SPLASH_BACKDROP))
            .show(ctx, |ui| {
                splash::render(ui.painter(), ui.max_rect(), &timeline, t);
            });

        // Animation runs continuously until done
        ctx.request_repaint();
    }

    // ==================== Main window ====================

    /// Render the toolbar.
    fn render_toolbar(&mut self, ctx: &Context) {
        TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open").on_hover_text("Open plan (Ctrl+O)").clicked() {
                    self.open_file_dialog();
                }
                if ui.button("New").clicked() {
                    self.pending_action("New");
                }
                if ui.button("Save").clicked() {
                    self.pending_action("Save");
                }
            });
        });
    }

    /// Render the action buttons on the left.
    fn render_actions(&mut self, ctx: &Context) {
        SidePanel::left("actions")
            .exact_width(200.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                let size = Vec2::new(ui.available_width(), 44.0);
                if ui.add_sized(size, egui::Button::new("Open plan")).clicked() {
                    self.open_file_dialog();
                }
                if ui.add_sized(size, egui::Button::new("Insert symbol")).clicked() {
                    self.pending_action("Insert symbol");
                }
                if ui.add_sized(size, egui::Button::new("Draw conduit")).clicked() {
                    self.pending_action("Draw conduit");
                }
                if ui.add_sized(size, egui::Button::new("Generate report")).clicked() {
                    self.pending_action("Generate report");
                }
            });
    }

    /// Render the inspector side panel.
    fn render_inspector(&mut self, ctx: &Context) {
        SidePanel::right("inspector")
            .default_width(300.0)
            .min_width(240.0)
            .max_width(400.0)
            .show(ctx, |ui| {
                ui.heading("Inspector");
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    if let Some(path) = self.loader.pending_path() {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(format!("Loading {}", path.display()));
                        });
                        ui.separator();
                    }

                    match &self.document {
                        Some(result) => render_document_info(ui, result),
                        None => {
                            ui.label(RichText::new("No plan loaded").color(theme::DIM_TEXT));
                        }
                    }

                    ui.separator();
                    self.render_snap_controls(ui);
                    ui.separator();
                    self.render_grid_controls(ui);
                    ui.separator();
                    self.render_view_controls(ui);
                    ui.separator();

                    ui.collapsing("Capabilities", |ui| {
                        ui.label(self.caps.to_string());
                    });
                });
            });
    }

    fn render_snap_controls(&mut self, ui: &mut Ui) {
        ui.collapsing("Snap", |ui| {
            let settings = *self.canvas.snap_settings();

            let mut enabled = settings.enabled;
            if ui.checkbox(&mut enabled, "Snap to grid (S)").changed() {
                self.set_snap_enabled(enabled);
            }

            let mut mode = settings.mode;
            egui::ComboBox::from_label("Mode")
                .selected_text(match mode {
                    SnapMode::Grid => "Grid",
                    SnapMode::None => "None",
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut mode, SnapMode::Grid, "Grid");
                    ui.selectable_value(&mut mode, SnapMode::None, "None");
                });
            if mode != settings.mode {
                self.canvas.set_snap_mode(mode);
            }

            let mut tolerance = settings.tolerance_px;
            let response = ui.add(
                egui::DragValue::new(&mut tolerance)
                    .range(0.0..=100.0)
                    .speed(0.5)
                    .suffix(" px"),
            );
            if response.changed() {
                if let Err(e) = self.canvas.set_snap_tolerance(tolerance) {
                    self.status
                        .show(e.to_string(), MESSAGE_TIMEOUT, Instant::now());
                }
            }

            if let Some(point) = self.canvas.last_snap_point() {
                ui.label(format!("Snapped to ({:.2}, {:.2})", point.x, point.y));
            }
        });
    }

    fn render_grid_controls(&mut self, ui: &mut Ui) {
        ui.collapsing("Grid", |ui| {
            ui.checkbox(&mut self.layers.grid, "Show grid (G)");

            let grid = *self.canvas.grid();
            let mut spacing = grid.minor_spacing();
            let mut major_every = grid.major_every();
            let mut anchor = grid.anchor();

            egui::Grid::new("grid_settings")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Spacing");
                    ui.add(
                        egui::DragValue::new(&mut spacing)
                            .range(0.01..=10_000.0)
                            .speed(0.5),
                    );
                    ui.end_row();

                    ui.label("Major every");
                    ui.add(egui::DragValue::new(&mut major_every).range(1..=50));
                    ui.end_row();

                    ui.label("Anchor");
                    egui::ComboBox::from_id_salt("grid_anchor")
                        .selected_text(match anchor {
                            GridAnchor::Viewport => "Viewport",
                            GridAnchor::World => "World",
                        })
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut anchor, GridAnchor::Viewport, "Viewport");
                            ui.selectable_value(&mut anchor, GridAnchor::World, "World");
                        });
                    ui.end_row();
                });

            let updated = GridSpec::clamped(spacing, major_every).with_anchor(anchor);
            if updated != grid {
                self.canvas.set_grid(updated);
            }
        });
    }

    fn render_view_controls(&mut self, ui: &mut Ui) {
        ui.collapsing("View", |ui| {
            let mut crosshair = self.canvas.show_crosshair();
            if ui.checkbox(&mut crosshair, "Crosshair (C)").changed() {
                self.canvas.toggle_crosshair(crosshair);
            }
            ui.checkbox(&mut self.layers.extents, "Document extents");
            ui.checkbox(&mut self.layers.preview, "Page preview");
            ui.checkbox(&mut self.layers.origin, "Origin axes");

            ui.horizontal(|ui| {
                if ui.button("Fit (F)").clicked() {
                    self.fit_pending = true;
                }
                if ui.button("+").clicked() {
                    self.canvas.zoom_by(ZOOM_STEP);
                }
                if ui.button("-").clicked() {
                    self.canvas.zoom_by(1.0 / ZOOM_STEP);
                }
            });
            ui.label(format!("Zoom: {}", self.canvas.view().zoom_percent()));
        });
    }

    /// Render the status bar.
    fn render_status_bar(&mut self, ctx: &Context) {
        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                // A transient message temporarily replaces the coordinates
                match self.status.current(Instant::now()) {
                    Some(message) => {
                        ui.label(message);
                    }
                    None => {
                        let coords = match *self.pointer_readout.borrow() {
                            Some(sample) => sample.status_text(),
                            None => "-, -".to_string(),
                        };
                        ui.label(format!("Coordinates: {}", coords));
                    }
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let file = self
                        .document
                        .as_ref()
                        .map_or_else(|| "none".to_string(), LoadResult::file_name);
                    ui.label(format!("File: {}", file));
                    ui.separator();
                    ui.label(format!("Elements: {}", self.element_count()));
                    ui.separator();
                    ui.label(self.canvas.view().zoom_percent());
                });
            });
        });
    }

    /// Render the header card and the canvas.
    fn render_central(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            egui::Frame::group(ui.style())
                .fill(theme::CARD_BG)
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("ComCAD V1").size(20.0).strong());
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            ui.label("Main area - plan loading and editing");
                        });
                    });
                });
            ui.add_space(6.0);

            egui::Frame::none()
                .fill(theme::CANVAS_BG)
                .stroke(Stroke::new(1.0, theme::CANVAS_BORDER))
                .show(ui, |ui| self.render_canvas(ui));
        });
    }

    fn render_canvas(&mut self, ui: &mut Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let canvas_rect = response.rect;
        self.canvas
            .resize(f64::from(canvas_rect.width()), f64::from(canvas_rect.height()));

        if self.fit_pending {
            let extents = self
                .document
                .as_ref()
                .and_then(LoadResult::document)
                .and_then(LoadedDocument::content_extents);
            self.canvas.fit_to_content(extents);
            self.fit_pending = false;
        }

        // Handle pan (middle mouse or right mouse drag)
        if response.dragged_by(egui::PointerButton::Middle)
            || response.dragged_by(egui::PointerButton::Secondary)
        {
            let delta = response.drag_delta();
            self.canvas
                .pan(Vector::new(f64::from(delta.x), f64::from(delta.y)));
        }

        // Handle zoom (scroll wheel)
        let scroll_delta = ui.ctx().input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            if let Some(hover_pos) = response.hover_pos() {
                self.canvas.on_wheel(
                    f64::from(scroll_delta.y),
                    canvas::screen_to_pixel(canvas_rect, hover_pos),
                );
            }
        }

        // Track the pointer
        match response.hover_pos() {
            Some(pos) if self.last_hover != Some(pos) => {
                self.canvas
                    .on_pointer_move(canvas::screen_to_pixel(canvas_rect, pos));
                self.last_hover = Some(pos);
            }
            Some(_) => {}
            None => {
                if self.last_hover.take().is_some() {
                    self.canvas.on_pointer_leave();
                    *self.pointer_readout.borrow_mut() = None;
                }
            }
        }

        // Grid geometry is only recomputed when the view or grid changed
        let dirty = self.canvas.take_dirty();
        if dirty.scene || self.grid_cache_rect != Some(canvas_rect) {
            let lines = self.canvas.grid_lines(self.config.min_grid_pixel_spacing);
            self.grid_cache = canvas::grid_shapes(&lines, self.canvas.view(), canvas_rect);
            self.grid_cache_rect = Some(canvas_rect);
        }

        let painter = painter.with_clip_rect(canvas_rect);
        let view = self.canvas.view();
        let extents = self
            .document
            .as_ref()
            .and_then(LoadResult::document)
            .and_then(LoadedDocument::content_extents);

        if self.layers.preview {
            if let (Some(texture), Some(page)) = (&self.preview_texture, extents) {
                canvas::render_preview(&painter, texture.id(), page, view, canvas_rect);
            }
        }
        if self.layers.grid {
            painter.extend(self.grid_cache.iter().cloned());
        }
        if self.layers.origin {
            canvas::render_origin(&painter, view, canvas_rect);
        }
        if self.layers.extents {
            if let Some(extents) = extents {
                canvas::render_extents(&painter, extents, view, canvas_rect);
            }
        }

        if self.document.is_none() {
            let hint = match self.loader.pending_path() {
                Some(_) => "Loading plan...",
                None => "No plan loaded\n\nUse Open plan or Ctrl+O",
            };
            canvas::render_placeholder(&painter, canvas_rect, hint);
        }

        canvas::render_overlay(
            &painter,
            &self.canvas.overlay_primitives(),
            view,
            canvas_rect,
        );
    }

    /// Handle keyboard shortcuts.
    fn handle_keyboard(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let mut open_requested = false;
        let mut snap_toggled = false;
        ctx.input(|i| {
            // Ctrl+O: Open file
            if i.modifiers.ctrl && i.key_pressed(Key::O) {
                open_requested = true;
            }

            let plain = i.modifiers == Modifiers::NONE;

            // F: Fit to content
            if plain && i.key_pressed(Key::F) {
                self.fit_pending = true;
            }

            // +/=: Zoom in
            if i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals) {
                self.canvas.zoom_by(ZOOM_STEP);
            }

            // -: Zoom out
            if i.key_pressed(Key::Minus) {
                self.canvas.zoom_by(1.0 / ZOOM_STEP);
            }

            // S: Toggle snap
            if plain && i.key_pressed(Key::S) {
                snap_toggled = true;
            }

            // C: Toggle crosshair
            if plain && i.key_pressed(Key::C) {
                let show = !self.canvas.show_crosshair();
                self.canvas.toggle_crosshair(show);
            }

            // G: Toggle grid
            if plain && i.key_pressed(Key::G) {
                self.layers.grid = !self.layers.grid;
            }

            // Escape: Dismiss dialogs
            if i.key_pressed(Key::Escape) {
                self.show_close_dialog = false;
            }
        });

        if snap_toggled {
            let enabled = !self.canvas.snap_settings().enabled;
            self.set_snap_enabled(enabled);
        }
        if open_requested {
            self.open_file_dialog();
        }
    }

    /// Intercept window close until the user confirms.
    fn handle_close_request(&mut self, ctx: &Context) {
        if !ctx.input(|i| i.viewport().close_requested()) {
            return;
        }
        if matches!(self.screen, Screen::Main) && !self.allow_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_close_dialog = true;
            return;
        }
        self.sync_config();
        settings::save_settings(&self.config);
    }

    /// Show the close confirmation dialog.
    fn show_close_confirmation(&mut self, ctx: &Context) {
        if !self.show_close_dialog {
            return;
        }

        egui::Window::new("Confirm close")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Are you sure you want to close the window?");
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        self.allow_close = true;
                        self.show_close_dialog = false;
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    if ui.button("No").clicked() {
                        self.show_close_dialog = false;
                    }
                });
            });
    }
}

/// Dialog filter extensions, in both cases for case-sensitive file pickers.
fn plan_extensions() -> Vec<String> {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| ext.trim_start_matches('.'))
        .flat_map(|ext| [ext.to_string(), ext.to_uppercase()])
        .collect()
}

fn preview_texture(ctx: &Context, image: &image::RgbImage) -> TextureHandle {
    let size = [image.width() as usize, image.height() as usize];
    ctx.load_texture(
        "pdf_preview",
        ColorImage::from_rgb(size, image.as_raw()),
        TextureOptions::LINEAR,
    )
}

/// File, layer and metadata sections for a loaded plan.
fn render_document_info(ui: &mut Ui, result: &LoadResult) {
    ui.collapsing("File", |ui| {
        ui.label(format!("Name: {}", result.file_name()));
        ui.label(result.short_description());
    });

    match result.document() {
        Some(LoadedDocument::Dwg(info)) => {
            ui.label(format!("Read with: {}", info.library));
            ui.collapsing(format!("Layers ({})", info.layers.len()), |ui| {
                egui::Grid::new("layer_grid")
                    .num_columns(3)
                    .striped(true)
                    .show(ui, |ui| {
                        for layer in &info.layers {
                            ui.label(&layer.name);
                            ui.label(layer.entity_count.to_string());
                            let mut flags = Vec::new();
                            if !layer.on {
                                flags.push("off");
                            }
                            if layer.frozen == Some(true) {
                                flags.push("frozen");
                            }
                            if layer.locked == Some(true) {
                                flags.push("locked");
                            }
                            ui.label(flags.join(", "));
                            ui.end_row();
                        }
                    });
            });
            ui.collapsing("Entity types", |ui| {
                for (name, count) in &info.entity_types {
                    ui.label(format!("{}: {}", name, count));
                }
            });
            match info.extents {
                Some(e) => ui.label(format!(
                    "Extents: ({:.2}, {:.2}) - ({:.2}, {:.2})",
                    e.min.x, e.min.y, e.max.x, e.max.y
                )),
                None => ui.label("Extents: unknown"),
            };
        }
        Some(LoadedDocument::Pdf(info)) => {
            ui.label(format!("Read with: {}", info.library));
            ui.label(format!("Pages: {}", info.page_count));
            if let Some((w, h)) = info.page_size {
                ui.label(format!("Page size: {:.0} x {:.0} pt", w, h));
            }
            ui.collapsing("Metadata", |ui| {
                egui::Grid::new("pdf_metadata")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (key, value) in &info.metadata {
                            ui.label(key);
                            ui.label(value);
                            ui.end_row();
                        }
                    });
            });
        }
        None => {}
    }
}

impl eframe::App for ComcadApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_close_request(ctx);

        if matches!(self.screen, Screen::Splash { .. }) {
            self.update_splash(ctx);
            return;
        }

        self.poll_loader(ctx);
        self.handle_keyboard(ctx);
        self.render_toolbar(ctx);
        self.render_actions(ctx);
        self.render_inspector(ctx);
        self.render_status_bar(ctx);
        self.render_central(ctx);
        self.show_close_confirmation(ctx);

        // Only repaint when there's actual interaction, not continuously
        if ctx.input(|i| {
            i.pointer.is_moving() || i.pointer.any_down() || i.raw_scroll_delta != Vec2::ZERO
        }) {
            ctx.request_repaint();
        }
        if self.loader.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
        if let Some(remaining) = self.status.remaining(Instant::now()) {
            ctx.request_repaint_after(remaining);
        }
    }
}
