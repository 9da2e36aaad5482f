/// What the transport cluster asks the main window to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportIntent {
    Play,
    Pause,
    Previous(usize),
    Next(usize),
    /// `true` when the volume panel is about to be shown, `false` when it is about to hide.
    VolumePanel(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportButton {
    Previous,
    PlayPause,
    Next,
    VolumeToggle,
}

impl TransportButton {
    /// Left-to-right order inside the cluster, with each control's width in points.
    pub const LAYOUT: [(TransportButton, f32); 4] = [
        (TransportButton::Previous, 30.0),
        (TransportButton::PlayPause, 30.0),
        (TransportButton::Next, 30.0),
        (TransportButton::VolumeToggle, 15.0),
    ];
}

pub fn next_index(current: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    if current + 1 < count {
        current + 1
    } else {
        0
    }
}

pub fn previous_index(current: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    if current > 0 && current < count {
        current - 1
    } else {
        count - 1
    }
}

/// Press/release state of the four transport controls. Nothing fires on press; each
/// control commits its intent on release.
///
/// The play/pause toggle only tracks its own clicks and never reads the engine's state.
#[derive(Debug, Clone)]
pub struct TransportControl {
    current_index: usize,
    count: usize,
    is_playing: bool,
    volume_shown: bool,
    pressed: Option<TransportButton>,
}

impl TransportControl {
    pub fn new(count: usize, is_playing: bool) -> Self {
        Self {
            current_index: 0,
            count,
            is_playing,
            volume_shown: false,
            pressed: None,
        }
    }

    pub fn press(&mut self, button: TransportButton) {
        self.pressed = Some(button);
    }

    /// Drops a press whose release happened outside the control.
    pub fn cancel_press(&mut self) {
        self.pressed = None;
    }

    pub fn release(&mut self, button: TransportButton) -> TransportIntent {
        self.pressed = None;
        match button {
            TransportButton::PlayPause => {
                self.is_playing = !self.is_playing;
                if self.is_playing {
                    TransportIntent::Play
                } else {
                    TransportIntent::Pause
                }
            }
            TransportButton::Previous => {
                self.current_index = previous_index(self.current_index, self.count);
                TransportIntent::Previous(self.current_index)
            }
            TransportButton::Next => {
                self.current_index = next_index(self.current_index, self.count);
                TransportIntent::Next(self.current_index)
            }
            TransportButton::VolumeToggle => {
                self.volume_shown = !self.volume_shown;
                TransportIntent::VolumePanel(self.volume_shown)
            }
        }
    }

    /// Keeps navigation in step with the engine when it changes track on its own.
    pub fn follow_track(&mut self, index: usize) {
        if index < self.count {
            self.current_index = index;
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn pressed(&self) -> Option<TransportButton> {
        self.pressed
    }

    pub fn icon_name(&self, button: TransportButton) -> &'static str {
        let pressed = self.pressed == Some(button);
        match (button, pressed) {
            (TransportButton::PlayPause, false) if self.is_playing => "pause.png",
            (TransportButton::PlayPause, true) if self.is_playing => "pause_pressed.png",
            (TransportButton::PlayPause, false) => "play.png",
            (TransportButton::PlayPause, true) => "play_pressed.png",
            (TransportButton::Previous, false) => "previous.png",
            (TransportButton::Previous, true) => "previous_pressed.png",
            (TransportButton::Next, false) => "next.png",
            (TransportButton::Next, true) => "next_pressed.png",
            (TransportButton::VolumeToggle, _) => "option_bar.png",
        }
    }

    /// Artwork to use when the pressed variant is missing.
    pub fn released_icon_name(&self, button: TransportButton) -> &'static str {
        match button {
            TransportButton::PlayPause if self.is_playing => "pause.png",
            TransportButton::PlayPause => "play.png",
            TransportButton::Previous => "previous.png",
            TransportButton::Next => "next.png",
            TransportButton::VolumeToggle => "option_bar.png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_applied_n_times_returns_to_start() {
        for count in 1..8 {
            for start in 0..count {
                let mut index = start;
                for _ in 0..count {
                    index = next_index(index, count);
                }
                assert_eq!(index, start, "count={count} start={start}");
            }
        }
    }

    #[test]
    fn wraparound_at_both_ends() {
        assert_eq!(previous_index(0, 5), 4);
        assert_eq!(next_index(4, 5), 0);
        assert_eq!(next_index(0, 1), 0);
        assert_eq!(previous_index(0, 1), 0);
    }

    #[test]
    fn press_alone_emits_nothing_and_release_commits() {
        let mut transport = TransportControl::new(3, true);
        transport.press(TransportButton::Next);
        assert_eq!(transport.current_index(), 0);
        assert_eq!(transport.icon_name(TransportButton::Next), "next_pressed.png");

        let intent = transport.release(TransportButton::Next);
        assert_eq!(intent, TransportIntent::Next(1));
        assert_eq!(transport.pressed(), None);
        assert_eq!(transport.icon_name(TransportButton::Next), "next.png");
    }

    #[test]
    fn play_pause_alternates() {
        let mut transport = TransportControl::new(3, true);
        assert_eq!(transport.icon_name(TransportButton::PlayPause), "pause.png");
        assert_eq!(
            transport.release(TransportButton::PlayPause),
            TransportIntent::Pause
        );
        assert_eq!(transport.icon_name(TransportButton::PlayPause), "play.png");
        assert_eq!(
            transport.release(TransportButton::PlayPause),
            TransportIntent::Play
        );
    }

    #[test]
    fn volume_toggle_alternates_show_and_hide() {
        let mut transport = TransportControl::new(3, true);
        assert_eq!(
            transport.release(TransportButton::VolumeToggle),
            TransportIntent::VolumePanel(true)
        );
        assert_eq!(
            transport.release(TransportButton::VolumeToggle),
            TransportIntent::VolumePanel(false)
        );
    }

    #[test]
    fn previous_from_first_wraps_to_last() {
        let mut transport = TransportControl::new(3, true);
        assert_eq!(
            transport.release(TransportButton::Previous),
            TransportIntent::Previous(2)
        );
    }

    #[test]
    fn navigation_continues_from_engine_position() {
        let mut transport = TransportControl::new(3, true);
        transport.follow_track(2);
        assert_eq!(
            transport.release(TransportButton::Next),
            TransportIntent::Next(0)
        );
        transport.follow_track(9);
        assert_eq!(transport.current_index(), 0);
    }
}
