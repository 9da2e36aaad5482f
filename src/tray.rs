use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};
use eframe::egui;
use tracing::{debug, warn};
use tray_icon::{
    menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem},
    Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent,
};

use crate::artwork::Artwork;

const TOOLTIP: &str = "Double-click: show/hide\nMiddle-click: quit";

/// Every way of interacting with the tray converges on one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    Help,
    ToggleVisibility,
    Quit,
}

impl TrayAction {
    pub const MENU: [TrayAction; 3] = [
        TrayAction::Help,
        TrayAction::ToggleVisibility,
        TrayAction::Quit,
    ];

    pub fn menu_id(self) -> &'static str {
        match self {
            TrayAction::Help => "help",
            TrayAction::ToggleVisibility => "toggle",
            TrayAction::Quit => "quit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrayAction::Help => "Help",
            TrayAction::ToggleVisibility => "Show/Hide",
            TrayAction::Quit => "Quit",
        }
    }

    pub fn from_menu_id(id: &str) -> Option<Self> {
        Self::MENU.into_iter().find(|action| action.menu_id() == id)
    }

    /// Double-click toggles the window, middle-click quits; other clicks open the menu.
    pub fn from_icon_event(event: &TrayIconEvent) -> Option<Self> {
        match event {
            TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            } => Some(TrayAction::ToggleVisibility),
            TrayIconEvent::Click {
                button: MouseButton::Middle,
                button_state: MouseButtonState::Up,
                ..
            } => Some(TrayAction::Quit),
            _ => None,
        }
    }
}

/// Routes menu and icon events into a channel drained by the main window, waking the
/// UI thread for each one.
pub fn forward_events(ctx: &egui::Context) -> Receiver<TrayAction> {
    let (tx, rx) = mpsc::channel();

    let menu_tx = tx.clone();
    let menu_ctx = ctx.clone();
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        let id = event.id.0.as_str();
        debug!("Tray menu event: {id}");
        if let Some(action) = TrayAction::from_menu_id(id) {
            let _ = menu_tx.send(action);
            menu_ctx.request_repaint();
        }
    }));

    let icon_ctx = ctx.clone();
    TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
        if let Some(action) = TrayAction::from_icon_event(&event) {
            let _ = tx.send(action);
            icon_ctx.request_repaint();
        }
    }));

    rx
}

pub struct Tray {
    handle: Option<TrayIcon>,
    normal: Icon,
    hollow: Option<Icon>,
}

impl Tray {
    pub fn build(artwork: &Artwork) -> Result<Self> {
        let normal = load_icon(artwork, "icon_16.png")?;
        let hollow = match load_icon(artwork, "icon_hollow_16.png") {
            Ok(icon) => Some(icon),
            Err(err) => {
                warn!("{err:#}");
                None
            }
        };

        Ok(Self {
            handle: spawn_icon(normal.clone())?,
            normal,
            hollow,
        })
    }

    /// Swaps to the hollow icon while the main window is hidden.
    pub fn set_window_visible(&self, visible: bool) {
        let Some(handle) = self.handle.as_ref() else {
            return;
        };
        let icon = if visible {
            Some(self.normal.clone())
        } else {
            self.hollow.clone().or_else(|| Some(self.normal.clone()))
        };
        if let Err(err) = handle.set_icon(icon) {
            warn!("Failed to update tray icon: {err}");
        }
    }
}

fn load_icon(artwork: &Artwork, name: &str) -> Result<Icon> {
    let image = artwork.rgba(name)?;
    Icon::from_rgba(image.rgba, image.width, image.height)
        .with_context(|| format!("Invalid tray icon: {name}"))
}

fn build_icon(icon: Icon) -> Result<TrayIcon> {
    let menu = Menu::new();
    let items: Vec<MenuItem> = TrayAction::MENU
        .into_iter()
        .map(|action| MenuItem::with_id(action.menu_id(), action.label(), true, None))
        .collect();
    menu.append_items(&[
        &items[0],
        &PredefinedMenuItem::separator(),
        &items[1],
        &PredefinedMenuItem::separator(),
        &items[2],
    ])
    .context("Failed to build tray menu")?;

    TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip(TOOLTIP)
        .with_icon(icon)
        .build()
        .context("Failed to create tray icon")
}

#[cfg(not(target_os = "linux"))]
fn spawn_icon(icon: Icon) -> Result<Option<TrayIcon>> {
    build_icon(icon).map(Some)
}

/// GTK owns the tray on Linux, so the icon lives on its own thread running the GTK loop
/// and cannot be swapped afterwards.
#[cfg(target_os = "linux")]
fn spawn_icon(icon: Icon) -> Result<Option<TrayIcon>> {
    std::thread::Builder::new()
        .name("tray".into())
        .spawn(move || {
            if let Err(err) = gtk::init() {
                warn!("GTK init failed, no tray icon: {err}");
                return;
            }
            match build_icon(icon) {
                Ok(_tray) => gtk::main(),
                Err(err) => warn!("{err:#}"),
            }
        })
        .context("Failed to spawn tray thread")?;
    Ok(None)
}
