use eframe::egui::{self, Color32, CornerRadius, Pos2, Rect, Sense, Stroke, Vec2};

pub const FRAME_WIDTH: f32 = 120.0;
pub const COLLAPSED_HEIGHT: f32 = 50.0;
pub const EXPANDED_HEIGHT: f32 = 58.0;
pub const SLIDER_HEIGHT: f32 = EXPANDED_HEIGHT - COLLAPSED_HEIGHT;

const TRACK_BACKGROUND: Color32 = Color32::from_rgb(171, 183, 183);
const TRACK_FILL: Color32 = Color32::from_rgb(37, 168, 198);
const HANDLE: Color32 = Color32::from_rgb(51, 51, 51);
const HANDLE_WIDTH: f32 = 6.0;

pub fn frame_size(panel_visible: bool) -> Vec2 {
    let height = if panel_visible {
        EXPANDED_HEIGHT
    } else {
        COLLAPSED_HEIGHT
    };
    Vec2::new(FRAME_WIDTH, height)
}

/// Horizontal `[0, 100]` slider below the main row. Every change is forwarded as-is.
#[derive(Debug, Clone)]
pub struct VolumePanel {
    value: u8,
    visible: bool,
}

impl VolumePanel {
    pub fn new(initial: u8) -> Self {
        Self {
            value: initial.min(100),
            visible: false,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the panel and returns the window frame size to apply.
    pub fn set_visible(&mut self, visible: bool) -> Vec2 {
        self.visible = visible;
        frame_size(visible)
    }

    /// Returns the new value when it actually changed.
    pub fn set_value(&mut self, value: u8) -> Option<u8> {
        let value = value.min(100);
        if value == self.value {
            return None;
        }
        self.value = value;
        Some(value)
    }

    /// Value under pointer x-coordinate `x` for a track spanning `track`.
    pub fn value_at(track_min_x: f32, track_width: f32, x: f32) -> u8 {
        let t = ((x - track_min_x) / track_width.max(1.0)).clamp(0.0, 1.0);
        (t * 100.0).round() as u8
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<u8> {
        let (rect, response) = ui.allocate_exact_size(
            Vec2::new(FRAME_WIDTH, SLIDER_HEIGHT),
            Sense::click_and_drag(),
        );

        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let track_min_x = rect.min.x + HANDLE_WIDTH / 2.0;
        let track_max_x = rect.max.x - HANDLE_WIDTH / 2.0;
        let track_width = (track_max_x - track_min_x).max(1.0);

        let mut changed = None;
        if response.dragged() || response.drag_started() || response.clicked() {
            if let Some(pos) = ui.input(|input| input.pointer.interact_pos()) {
                changed = self.set_value(Self::value_at(track_min_x, track_width, pos.x));
            }
        }

        let fraction = f32::from(self.value) / 100.0;
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, CornerRadius::ZERO, TRACK_BACKGROUND);
        let fill_rect = Rect::from_min_max(
            rect.min,
            Pos2::new(track_min_x + track_width * fraction, rect.max.y),
        );
        painter.rect_filled(fill_rect, CornerRadius::ZERO, TRACK_FILL);
        painter.hline(rect.x_range(), rect.min.y, Stroke::new(1.0, HANDLE));

        let handle_center = Pos2::new(track_min_x + track_width * fraction, rect.center().y);
        let handle = Rect::from_center_size(handle_center, Vec2::new(HANDLE_WIDTH, rect.height()));
        painter.rect_filled(handle, CornerRadius::same(2), HANDLE);

        changed
    }
}
