use eframe::egui::{
    self, Color32, RichText, Sense, TextureHandle, ViewportBuilder, ViewportCommand, ViewportId,
    WindowLevel,
};
use tracing::{info, warn};

use crate::{artwork::Artwork, notice::NoticeStore};

const PAD_SIZE: [f32; 2] = [280.0, 150.0];
const CONTROL_SIZE: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpStep {
    Welcome,
    Guide,
    Personal,
    End,
}

impl HelpStep {
    pub fn index(self) -> usize {
        match self {
            HelpStep::Welcome => 0,
            HelpStep::Guide => 1,
            HelpStep::Personal => 2,
            HelpStep::End => 3,
        }
    }

    pub fn next(self) -> Option<HelpStep> {
        match self {
            HelpStep::Welcome => Some(HelpStep::Guide),
            HelpStep::Guide => Some(HelpStep::Personal),
            HelpStep::Personal => Some(HelpStep::End),
            HelpStep::End => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            HelpStep::Welcome => "Welcome",
            HelpStep::Guide => "Getting around",
            HelpStep::Personal => "Your own sounds",
            HelpStep::End => "All set",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            HelpStep::Welcome => "A tiny player for ambient sounds. It floats above your windows and stays out of the way.",
            HelpStep::Guide => "Hover the picture to reveal play/pause, previous and next. The narrow bar on the right opens the volume slider; drag the left edge to move the widget.",
            HelpStep::Personal => "Drop .wav, .mp3, .wma or .m4a files into the sound folder and they join the playlist after the bundled tracks on next start.",
            HelpStep::End => "Double-click the tray icon to hide or show the widget, middle-click it to quit. Help is in the tray menu.",
        }
    }
}

/// Four-step, forward-only onboarding tour. Closing it with the acknowledgement ticked
/// persists the flag; closing it otherwise leaves the store untouched.
pub struct Onboarding {
    step: HelpStep,
    acknowledged: bool,
    open: bool,
    store: Box<dyn NoticeStore>,
}

impl Onboarding {
    pub fn new(store: Box<dyn NoticeStore>) -> Self {
        Self {
            step: HelpStep::Welcome,
            acknowledged: false,
            open: true,
            store,
        }
    }

    /// `None` when a previous run already acknowledged the tour.
    pub fn for_startup(store: Box<dyn NoticeStore>) -> Option<Self> {
        if store.is_acknowledged() {
            info!("Onboarding already acknowledged");
            return None;
        }
        Some(Self::new(store))
    }

    pub fn step(&self) -> HelpStep {
        self.step
    }

    pub fn acknowledged(&self) -> bool {
        self.acknowledged
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The checkbox only exists on the last step.
    pub fn set_acknowledged(&mut self, acknowledged: bool) {
        if self.open && self.step == HelpStep::End {
            self.acknowledged = acknowledged;
        }
    }

    /// "Next" control: moves one step forward, or closes the pad from the last step.
    pub fn advance(&mut self) {
        if !self.open {
            return;
        }
        match self.step.next() {
            Some(step) => self.step = step,
            None => self.close(),
        }
    }

    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if self.acknowledged {
            match self.store.acknowledge() {
                Ok(()) => info!("Onboarding acknowledged"),
                Err(err) => warn!("Failed to persist onboarding flag: {err:#}"),
            }
        }
    }
}

// Quitting from the tray or the main window tears the pad down without a close
// event, so the acknowledgement is settled here as well.
impl Drop for Onboarding {
    fn drop(&mut self) {
        self.close();
    }
}

/// The onboarding tour rendered in its own small frameless viewport.
pub struct HelpPad {
    onboarding: Onboarding,
}

impl HelpPad {
    pub fn new(onboarding: Onboarding) -> Self {
        Self { onboarding }
    }

    /// Draws the pad for this frame. Returns false once it has been closed.
    pub fn show(&mut self, ctx: &egui::Context, artwork: &mut Artwork) -> bool {
        if !self.onboarding.is_open() {
            return false;
        }

        let advance_icon = if self.onboarding.step() == HelpStep::End {
            artwork.texture(ctx, "close.png")
        } else {
            artwork.texture(ctx, "right.png")
        };

        ctx.show_viewport_immediate(
            ViewportId::from_hash_of("help_pad"),
            ViewportBuilder::default()
                .with_title("Help")
                .with_inner_size(PAD_SIZE)
                .with_decorations(false)
                .with_resizable(false)
                .with_taskbar(false)
                .with_window_level(WindowLevel::AlwaysOnTop),
            |ctx, _class| {
                if ctx.input(|i| i.viewport().close_requested()) {
                    self.onboarding.close();
                    return;
                }
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.render_step(ui, advance_icon.as_ref());
                });
            },
        );

        self.onboarding.is_open()
    }

    fn render_step(&mut self, ui: &mut egui::Ui, advance_icon: Option<&TextureHandle>) {
        let step = self.onboarding.step();

        let header = ui.interact(ui.max_rect(), ui.id().with("drag"), Sense::drag());
        if header.drag_started() {
            ui.ctx().send_viewport_cmd(ViewportCommand::StartDrag);
        }

        ui.horizontal(|row| {
            row.label(RichText::new(step.title()).strong().size(16.0));
            row.with_layout(egui::Layout::right_to_left(egui::Align::Center), |right| {
                right.label(
                    RichText::new(format!("{}/4", step.index() + 1)).color(Color32::GRAY),
                );
            });
        });
        ui.add_space(4.0);
        ui.label(step.body());

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Max), |bottom| {
            bottom.horizontal(|row| {
                row.with_layout(egui::Layout::right_to_left(egui::Align::Center), |right| {
                    let hint = if step == HelpStep::End { "Close" } else { "Next" };
                    let response = match advance_icon {
                        Some(texture) => right.add(
                            egui::Button::image(
                                egui::Image::new(texture)
                                    .fit_to_exact_size(egui::vec2(CONTROL_SIZE, CONTROL_SIZE)),
                            )
                            .frame(false),
                        ),
                        None => right.button(hint),
                    }
                    .on_hover_text(hint);

                    if step == HelpStep::End {
                        let mut acknowledged = self.onboarding.acknowledged();
                        if right
                            .checkbox(&mut acknowledged, "Don't show this again")
                            .changed()
                        {
                            self.onboarding.set_acknowledged(acknowledged);
                        }
                    }

                    if response.clicked() {
                        self.onboarding.advance();
                    }
                });
            });
        });

        if !self.onboarding.is_open() {
            ui.ctx().send_viewport_cmd(ViewportCommand::Close);
        }
    }
}
