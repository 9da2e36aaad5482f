use crate::catalog::Catalog;

pub const IDLE_ICON: &str = "flame.png";
pub const CUSTOM_TRACK_ICON: &str = "display.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayIcon {
    Idle,
    /// Bundled track, carries the artwork stem.
    Track(String),
    /// User-supplied track; no matching artwork ships for it.
    Custom,
}

impl DisplayIcon {
    pub fn file_name(&self) -> String {
        match self {
            DisplayIcon::Idle => IDLE_ICON.to_owned(),
            DisplayIcon::Track(stem) => format!("{stem}.png"),
            DisplayIcon::Custom => CUSTOM_TRACK_ICON.to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayArea {
    icon: DisplayIcon,
}

impl Default for DisplayArea {
    fn default() -> Self {
        Self {
            icon: DisplayIcon::Idle,
        }
    }
}

impl DisplayArea {
    pub fn show_idle(&mut self) {
        self.icon = DisplayIcon::Idle;
    }

    pub fn show_track(&mut self, index: usize, catalog: &Catalog) {
        self.icon = match catalog.get(index) {
            Some(entry) if catalog.is_bundled(index) => {
                DisplayIcon::Track(entry.artwork_stem().to_owned())
            }
            _ => DisplayIcon::Custom,
        };
    }

    pub fn icon(&self) -> &DisplayIcon {
        &self.icon
    }
}

/// The display area and the transport cluster share one screen region; exactly one
/// of them is visible at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverSwap {
    #[default]
    Display,
    Transport,
}

impl HoverSwap {
    /// Pointer entered the display area: reveal the transport cluster.
    pub fn pointer_entered(&mut self) {
        *self = HoverSwap::Transport;
    }

    /// Pointer left the transport cluster: restore the display area.
    pub fn pointer_left(&mut self) {
        *self = HoverSwap::Display;
    }

    /// Applies this frame's hover state; returns true when the visible side flipped.
    pub fn update(&mut self, pointer_inside: bool) -> bool {
        let before = *self;
        match (before, pointer_inside) {
            (HoverSwap::Display, true) => self.pointer_entered(),
            (HoverSwap::Transport, false) => self.pointer_left(),
            _ => {}
        }
        before != *self
    }

    pub fn shows_transport(self) -> bool {
        self == HoverSwap::Transport
    }
}
