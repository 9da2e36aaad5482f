use std::{
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use anyhow::Context;
use eframe::egui::{
    self, Color32, CornerRadius, Pos2, Rect, Sense, TextureHandle, Vec2, ViewportCommand,
};
use tracing::{info, warn};

use crate::{
    artwork::Artwork,
    catalog::Catalog,
    config::Config,
    display::CUSTOM_TRACK_ICON,
    drag::{self, WindowPosition},
    help_pad::{HelpPad, Onboarding},
    notice::NoticeFile,
    player::RodioBackend,
    transport::TransportButton,
    tray::{self, Tray, TrayAction},
    volume::{COLLAPSED_HEIGHT, FRAME_WIDTH},
    window::{MainWindow, WindowEffect},
};

const DRAG_BAR_WIDTH: f32 = 15.0;
const STAGE_WIDTH: f32 = FRAME_WIDTH - DRAG_BAR_WIDTH;
const PLAYBACK_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// The floating widget: owns the catalog, the main window wiring, the tray and the
/// onboarding pad.
pub struct PetApp {
    config: Config,
    catalog: Catalog,
    window: MainWindow<RodioBackend>,
    artwork: Artwork,
    tray: Option<Tray>,
    tray_rx: Option<Receiver<TrayAction>>,
    help_pad: Option<HelpPad>,
    positioned: bool,
}

impl PetApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        catalog: Catalog,
        mut artwork: Artwork,
    ) -> anyhow::Result<Self> {
        let backend = RodioBackend::try_default().context("Audio output unavailable")?;
        let window = MainWindow::new(
            backend,
            &catalog,
            config.audio.initial_volume(),
            config.audio.autoplay,
        );

        if config.assets.hot_reload {
            if let Err(err) = artwork.enable_hot_reload() {
                warn!("Artwork hot reload disabled: {err:#}");
            }
        }

        let tray = match Tray::build(&artwork) {
            Ok(tray) => Some(tray),
            Err(err) => {
                warn!("Running without a tray icon: {err:#}");
                None
            }
        };
        let tray_rx = Some(tray::forward_events(&cc.egui_ctx));

        let help_pad = Onboarding::for_startup(Box::new(NoticeFile::new(
            config.assets.notice_file.clone(),
        )))
        .map(HelpPad::new);

        Ok(Self {
            config,
            catalog,
            window,
            artwork,
            tray,
            tray_rx,
            help_pad,
            positioned: false,
        })
    }

    fn apply_effect(&self, ctx: &egui::Context, effect: WindowEffect) {
        match effect {
            WindowEffect::Resize(size) => {
                ctx.send_viewport_cmd(ViewportCommand::InnerSize(size));
            }
            WindowEffect::MoveTo(pos) => {
                ctx.send_viewport_cmd(ViewportCommand::OuterPosition(pos));
            }
            WindowEffect::SetVisible(visible) => {
                ctx.send_viewport_cmd(ViewportCommand::Visible(visible));
                if let Some(tray) = self.tray.as_ref() {
                    tray.set_window_visible(visible);
                }
            }
        }
    }

    fn maybe_place_window(&mut self, ctx: &egui::Context) {
        if self.positioned {
            return;
        }
        let Some(area) = placement_area(ctx) else {
            return;
        };
        let margin = Vec2::new(
            self.config.window.margin_right,
            self.config.window.margin_bottom,
        );
        let effect = self.window.place_at(WindowPosition::bottom_right(area, margin));
        self.apply_effect(ctx, effect);
        self.positioned = true;
    }

    fn drain_tray_actions(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();
        if let Some(rx) = self.tray_rx.as_ref() {
            loop {
                match rx.try_recv() {
                    Ok(action) => actions.push(action),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.tray_rx = None;
                        break;
                    }
                }
            }
        }

        for action in actions {
            self.dispatch_tray_action(ctx, action);
        }
    }

    fn dispatch_tray_action(&mut self, ctx: &egui::Context, action: TrayAction) {
        info!(?action, "Tray action");
        match action {
            TrayAction::Help => {
                let path = self.config.assets.help_document_path();
                if let Err(err) = open::that(&path) {
                    warn!("Failed to open {}: {err}", path.display());
                }
            }
            TrayAction::ToggleVisibility => {
                let effect = self.window.toggle_visibility();
                self.apply_effect(ctx, effect);
            }
            TrayAction::Quit => ctx.send_viewport_cmd(ViewportCommand::Close),
        }
    }

    fn paint_texture(ui: &egui::Ui, rect: Rect, texture: Option<&TextureHandle>) {
        let painter = ui.painter_at(rect);
        match texture {
            Some(texture) => {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture.id(), rect, uv, Color32::WHITE);
            }
            None => {
                painter.rect_filled(rect, CornerRadius::ZERO, Color32::from_rgb(25, 38, 58));
            }
        }
    }

    fn render_drag_bar(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(
            Vec2::new(DRAG_BAR_WIDTH, COLLAPSED_HEIGHT),
            Sense::drag(),
        );
        let texture = self.artwork.texture(ui.ctx(), "drag_bar.png");
        Self::paint_texture(ui, rect, texture.as_ref());

        if response.hovered() || response.dragged() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Move);
        }

        let pointer = response.interact_pointer_pos();
        let origin = ui.ctx().input(|i| i.viewport().outer_rect.map(|rect| rect.min));
        if response.drag_started() {
            if let Some(pos) = pointer {
                self.window.begin_drag(pos, origin);
            }
        }
        if response.dragged() {
            if let Some(effect) = pointer.and_then(|pos| self.window.drag_to(pos, origin)) {
                self.apply_effect(ui.ctx(), effect);
            }
        }
        if response.drag_stopped() {
            self.window.end_drag();
        }
    }

    fn render_stage(&mut self, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(
            Vec2::new(STAGE_WIDTH, COLLAPSED_HEIGHT),
            Sense::hover(),
        );
        let pointer_inside = ui.rect_contains_pointer(rect);
        self.window.hover_mut().update(pointer_inside);

        if self.window.hover_mut().shows_transport() {
            self.render_transport(ui, rect);
        } else {
            let name = self.window.display().icon().file_name();
            let texture = self.artwork.texture_or(ui.ctx(), &name, CUSTOM_TRACK_ICON);
            Self::paint_texture(ui, rect, texture.as_ref());
        }
    }

    fn render_transport(&mut self, ui: &mut egui::Ui, stage: Rect) {
        let mut x = stage.min.x;
        let mut effects = Vec::new();

        for (button, width) in TransportButton::LAYOUT {
            let rect = Rect::from_min_size(
                Pos2::new(x, stage.min.y),
                Vec2::new(width, stage.height()),
            );
            x += width;

            let id = ui.id().with(("transport", button as u8));
            let response = ui.interact(rect, id, Sense::click());
            if response.is_pointer_button_down_on() {
                self.window.transport_mut().press(button);
            }
            if response.clicked() {
                if let Some(effect) = self.window.release(button) {
                    effects.push(effect);
                }
            }

            let transport = self.window.transport();
            let name = transport.icon_name(button);
            let fallback = transport.released_icon_name(button);
            let texture = self.artwork.texture_or(ui.ctx(), name, fallback);
            Self::paint_texture(ui, rect, texture.as_ref());
        }

        if !ui.input(|i| i.pointer.primary_down()) {
            self.window.transport_mut().cancel_press();
        }

        for effect in effects {
            self.apply_effect(ui.ctx(), effect);
        }
    }

    fn render_volume(&mut self, ui: &mut egui::Ui) {
        if !self.window.volume().visible() {
            return;
        }
        if let Some(value) = self.window.volume_mut().ui(ui) {
            self.window.set_volume(value);
        }
    }
}

/// The desktop work area in points, falling back to the whole monitor where the
/// platform does not report one.
fn placement_area(ctx: &egui::Context) -> Option<Rect> {
    let (monitor_size, pixels_per_point) = ctx.input(|i| {
        let viewport = i.viewport();
        (viewport.monitor_size, viewport.native_pixels_per_point)
    });
    let work_area = pixels_per_point.and_then(|ppp| {
        drag::work_area().map(|area| {
            Rect::from_min_max(
                (area.min.to_vec2() / ppp).to_pos2(),
                (area.max.to_vec2() / ppp).to_pos2(),
            )
        })
    });
    work_area.or_else(|| monitor_size.map(|size| Rect::from_min_size(Pos2::ZERO, size)))
}

impl eframe::App for PetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.maybe_place_window(ctx);
        self.drain_tray_actions(ctx);
        self.window.pump(&self.catalog);

        if self.artwork.hot_reload_enabled() && self.artwork.poll_hot_reload() {
            ctx.request_repaint();
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(Color32::TRANSPARENT))
            .show(ctx, |ui| {
                ui.spacing_mut().item_spacing = Vec2::ZERO;
                ui.vertical(|column| {
                    column.horizontal(|row| {
                        self.render_drag_bar(row);
                        self.render_stage(row);
                    });
                    self.render_volume(column);
                });
            });

        if let Some(pad) = self.help_pad.as_mut() {
            if !pad.show(ctx, &mut self.artwork) {
                self.help_pad = None;
            }
        }

        ctx.request_repaint_after(PLAYBACK_POLL_INTERVAL);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }
}
