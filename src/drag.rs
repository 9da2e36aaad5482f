use eframe::egui::{Pos2, Rect, Vec2};

/// Tracks a drag on the drag bar and turns it into incremental window moves.
#[derive(Debug, Clone, Default)]
pub struct DragBar {
    last: Option<Pos2>,
}

impl DragBar {
    pub fn press(&mut self, global: Pos2) {
        self.last = Some(global);
    }

    /// Delta since the previous recorded position. The reference point advances on every
    /// call so consecutive moves add up exactly.
    pub fn move_to(&mut self, global: Pos2) -> Option<Vec2> {
        let last = self.last.as_mut()?;
        let delta = global - *last;
        *last = global;
        Some(delta)
    }

    pub fn release(&mut self) {
        self.last = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}

/// The main window's remembered top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPosition {
    top_left: Pos2,
}

impl WindowPosition {
    pub fn new(top_left: Pos2) -> Self {
        Self { top_left }
    }

    /// Anchored `margin` points in from the bottom-right corner of `area`, never past
    /// its top-left.
    pub fn bottom_right(area: Rect, margin: Vec2) -> Self {
        Self::new((area.max - margin).max(area.min))
    }

    pub fn apply(&mut self, delta: Vec2) -> Pos2 {
        self.top_left += delta;
        self.top_left
    }

    pub fn top_left(&self) -> Pos2 {
        self.top_left
    }

    /// Converts a window-local pointer position to screen space.
    pub fn to_global(&self, local: Pos2) -> Pos2 {
        self.top_left + local.to_vec2()
    }
}

/// Desktop area not covered by the taskbar, in physical pixels.
#[cfg(windows)]
pub fn work_area() -> Option<Rect> {
    use windows::Win32::{
        Foundation::RECT,
        UI::WindowsAndMessaging::{
            SystemParametersInfoW, SPI_GETWORKAREA, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS,
        },
    };

    let mut area = RECT::default();
    // SAFETY: SPI_GETWORKAREA writes exactly one RECT through the pointer.
    let result = unsafe {
        SystemParametersInfoW(
            SPI_GETWORKAREA,
            0,
            Some(&mut area as *mut RECT as *mut _),
            SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
        )
    };
    if let Err(err) = result {
        tracing::debug!("Work area unavailable: {err}");
        return None;
    }
    Some(Rect::from_min_max(
        Pos2::new(area.left as f32, area.top as f32),
        Pos2::new(area.right as f32, area.bottom as f32),
    ))
}

#[cfg(not(windows))]
pub fn work_area() -> Option<Rect> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[test]
    fn moves_accumulate_without_drift() {
        let mut bar = DragBar::default();
        let mut window = WindowPosition::new(pos2(100.0, 200.0));

        bar.press(pos2(500.0, 500.0));
        let first = bar.move_to(pos2(510.0, 500.0)).unwrap();
        assert_eq!(first, vec2(10.0, 0.0));
        window.apply(first);
        let second = bar.move_to(pos2(510.0, 505.0)).unwrap();
        assert_eq!(second, vec2(0.0, 5.0));
        window.apply(second);

        assert_eq!(window.top_left(), pos2(110.0, 205.0));
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let mut bar = DragBar::default();
        assert_eq!(bar.move_to(pos2(3.0, 3.0)), None);
        bar.press(pos2(0.0, 0.0));
        assert!(bar.is_dragging());
        bar.release();
        assert_eq!(bar.move_to(pos2(3.0, 3.0)), None);
    }

    #[test]
    fn initial_position_sits_in_bottom_right_corner() {
        let screen = Rect::from_min_size(Pos2::ZERO, vec2(1920.0, 1040.0));
        let position = WindowPosition::bottom_right(screen, vec2(150.0, 70.0));
        assert_eq!(position.top_left(), pos2(1770.0, 970.0));
        assert_eq!(position.to_global(pos2(5.0, 5.0)), pos2(1775.0, 975.0));
    }

    #[test]
    fn placement_respects_taskbar_edges() {
        // Taskbar docked at the bottom, 120 points tall.
        let work_area = Rect::from_min_max(pos2(0.0, 0.0), pos2(1920.0, 960.0));
        let position = WindowPosition::bottom_right(work_area, vec2(150.0, 70.0));
        assert_eq!(position.top_left(), pos2(1770.0, 890.0));

        // Taskbar docked on the left of a small display.
        let work_area = Rect::from_min_max(pos2(100.0, 0.0), pos2(200.0, 50.0));
        let position = WindowPosition::bottom_right(work_area, vec2(150.0, 70.0));
        assert_eq!(position.top_left(), pos2(100.0, 0.0));
    }
}
