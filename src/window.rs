use std::sync::mpsc::Receiver;

use eframe::egui::{Pos2, Vec2};
use tracing::{error, info};

use crate::{
    catalog::Catalog,
    display::{DisplayArea, HoverSwap},
    drag::{DragBar, WindowPosition},
    player::{AudioBackend, PlaybackEngine, PlayerEvent},
    transport::{TransportButton, TransportControl, TransportIntent},
    volume::VolumePanel,
};

/// Window-level side effects the eframe shell turns into viewport commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEffect {
    Resize(Vec2),
    MoveTo(Pos2),
    SetVisible(bool),
}

/// Composition of the drag bar, display area, transport cluster and volume panel
/// around the playback engine. Holds no toolkit handles so the wiring is testable.
pub struct MainWindow<B: AudioBackend> {
    engine: PlaybackEngine<B>,
    player_events: Receiver<PlayerEvent>,
    transport: TransportControl,
    display: DisplayArea,
    hover: HoverSwap,
    drag: DragBar,
    position: WindowPosition,
    volume: VolumePanel,
    visible: bool,
}

impl<B: AudioBackend> MainWindow<B> {
    pub fn new(backend: B, catalog: &Catalog, initial_volume: u8, autoplay: bool) -> Self {
        let (mut engine, player_events) = PlaybackEngine::new(backend, catalog, initial_volume);
        if autoplay {
            engine.play();
        }

        Self {
            transport: TransportControl::new(catalog.len(), autoplay),
            volume: VolumePanel::new(engine.volume()),
            engine,
            player_events,
            display: DisplayArea::default(),
            hover: HoverSwap::default(),
            drag: DragBar::default(),
            position: WindowPosition::new(Pos2::ZERO),
            visible: true,
        }
    }

    pub fn release(&mut self, button: TransportButton) -> Option<WindowEffect> {
        let intent = self.transport.release(button);
        self.handle_intent(intent)
    }

    pub fn handle_intent(&mut self, intent: TransportIntent) -> Option<WindowEffect> {
        match intent {
            TransportIntent::Play => self.engine.play(),
            TransportIntent::Pause => self.engine.pause(),
            TransportIntent::Previous(index) | TransportIntent::Next(index) => {
                if let Err(err) = self.engine.set_current_index(index) {
                    error!("Transport requested an invalid track: {err}");
                }
            }
            TransportIntent::VolumePanel(show) => {
                return Some(WindowEffect::Resize(self.volume.set_visible(show)));
            }
        }
        None
    }

    /// Advances playback on track end and applies the engine's notifications.
    pub fn pump(&mut self, catalog: &Catalog) {
        self.engine.poll();

        let changes: Vec<_> = self.player_events.try_iter().collect();
        for PlayerEvent::TrackChanged(index) in changes {
            self.display.show_track(index, catalog);
            self.transport.follow_track(index);
        }
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.engine.set_volume(volume);
    }

    pub fn place_at(&mut self, position: WindowPosition) -> WindowEffect {
        self.position = position;
        WindowEffect::MoveTo(position.top_left())
    }

    /// `origin` is the window's top-left as last reported by the OS. When known it
    /// replaces the remembered position, which may never have been placed.
    pub fn begin_drag(&mut self, local: Pos2, origin: Option<Pos2>) {
        if let Some(origin) = origin {
            self.position = WindowPosition::new(origin);
        }
        let global = self.pointer_to_global(local, origin);
        self.drag.press(global);
    }

    /// Pointer deltas are measured against the reported origin, so a move the OS has not
    /// applied yet does not count twice.
    pub fn drag_to(&mut self, local: Pos2, origin: Option<Pos2>) -> Option<WindowEffect> {
        let global = self.pointer_to_global(local, origin);
        let delta = self.drag.move_to(global)?;
        if delta == Vec2::ZERO {
            return None;
        }
        Some(WindowEffect::MoveTo(self.position.apply(delta)))
    }

    pub fn end_drag(&mut self) {
        self.drag.release();
    }

    fn pointer_to_global(&self, local: Pos2, origin: Option<Pos2>) -> Pos2 {
        match origin {
            Some(origin) => origin + local.to_vec2(),
            None => self.position.to_global(local),
        }
    }

    pub fn toggle_visibility(&mut self) -> WindowEffect {
        self.visible = !self.visible;
        info!(visible = self.visible, "Main window visibility toggled");
        WindowEffect::SetVisible(self.visible)
    }

    pub fn engine(&self) -> &PlaybackEngine<B> {
        &self.engine
    }

    pub fn transport(&self) -> &TransportControl {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut TransportControl {
        &mut self.transport
    }

    pub fn display(&self) -> &DisplayArea {
        &self.display
    }

    pub fn hover_mut(&mut self) -> &mut HoverSwap {
        &mut self.hover
    }

    pub fn volume_mut(&mut self) -> &mut VolumePanel {
        &mut self.volume
    }

    pub fn volume(&self) -> &VolumePanel {
        &self.volume
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> WindowPosition {
        self.position
    }
}
