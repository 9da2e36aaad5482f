// End-to-end walks through the widget's behaviour without a window or audio device.

use std::{fs, path::Path};

use eframe::egui::pos2;
use pure_widget::{
    catalog::{Catalog, RECOGNIZED_EXTENSIONS},
    display::DisplayIcon,
    drag::WindowPosition,
    error::PlaybackError,
    help_pad::{HelpStep, Onboarding},
    notice::{NoticeFile, NoticeStore},
    player::AudioBackend,
    transport::TransportButton,
    window::{MainWindow, WindowEffect},
};

#[derive(Default)]
struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn load(&mut self, _path: &Path) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn is_finished(&self) -> bool {
        false
    }
}

fn sample_catalog(root: &Path) -> Catalog {
    let default_dir = root.join("default");
    fs::create_dir(&default_dir).unwrap();
    fs::write(default_dir.join("a.mp3"), b"").unwrap();
    fs::write(default_dir.join("b.mp3"), b"").unwrap();
    fs::write(root.join("c.mp3"), b"").unwrap();
    Catalog::build(&default_dir, root, &RECOGNIZED_EXTENSIONS).unwrap()
}

#[test]
fn next_walks_catalog_and_wraps_with_matching_artwork() {
    let root = tempfile::tempdir().unwrap();
    let catalog = sample_catalog(root.path());
    let mut window = MainWindow::new(SilentBackend, &catalog, 50, true);
    assert_eq!(window.engine().current_index(), 0);

    let mut icons = Vec::new();
    for _ in 0..3 {
        window.release(TransportButton::Next);
        window.pump(&catalog);
        icons.push((window.engine().current_index(), window.display().icon().clone()));
    }

    assert_eq!(
        icons,
        [
            (1, DisplayIcon::Track("b".into())),
            (2, DisplayIcon::Custom),
            (0, DisplayIcon::Track("a".into())),
        ]
    );
}

#[test]
fn previous_from_first_track_lands_on_last() {
    let root = tempfile::tempdir().unwrap();
    let catalog = sample_catalog(root.path());
    let mut window = MainWindow::new(SilentBackend, &catalog, 50, true);

    window.release(TransportButton::Previous);
    window.pump(&catalog);
    assert_eq!(window.engine().current_index(), catalog.len() - 1);
}

#[test]
fn dragging_by_two_deltas_moves_by_their_sum() {
    let root = tempfile::tempdir().unwrap();
    let catalog = sample_catalog(root.path());
    let mut window = MainWindow::new(SilentBackend, &catalog, 50, true);
    window.place_at(WindowPosition::new(pos2(300.0, 300.0)));

    window.begin_drag(pos2(7.0, 25.0), None);
    window.drag_to(pos2(17.0, 25.0), None);
    let last = window.drag_to(pos2(7.0, 30.0), None);
    window.end_drag();

    assert_eq!(last, Some(WindowEffect::MoveTo(pos2(310.0, 305.0))));
}

#[test]
fn acknowledged_onboarding_is_suppressed_on_next_start() {
    let dir = tempfile::tempdir().unwrap();
    let flag = dir.path().join("notice.txt");

    let mut tour = Onboarding::for_startup(Box::new(NoticeFile::new(&flag))).unwrap();
    for _ in 0..3 {
        tour.advance();
    }
    assert_eq!(tour.step(), HelpStep::End);
    tour.set_acknowledged(true);
    tour.close();

    assert_eq!(fs::read_to_string(&flag).unwrap(), "noticed:1\n");
    assert!(Onboarding::for_startup(Box::new(NoticeFile::new(&flag))).is_none());
}

#[test]
fn unacknowledged_close_leaves_no_flag_behind() {
    let dir = tempfile::tempdir().unwrap();
    let flag = dir.path().join("notice.txt");

    let mut tour = Onboarding::for_startup(Box::new(NoticeFile::new(&flag))).unwrap();
    for _ in 0..4 {
        tour.advance();
    }
    assert!(!tour.is_open());
    assert!(!flag.exists());
    assert!(!NoticeFile::new(&flag).is_acknowledged());
    assert!(Onboarding::for_startup(Box::new(NoticeFile::new(&flag))).is_some());
}

#[test]
fn malformed_flag_file_shows_onboarding() {
    let dir = tempfile::tempdir().unwrap();
    let flag = dir.path().join("notice.txt");
    fs::write(&flag, "noticed=yes").unwrap();

    assert!(Onboarding::for_startup(Box::new(NoticeFile::new(&flag))).is_some());
}

#[test]
fn quitting_with_acknowledgement_ticked_still_persists() {
    let dir = tempfile::tempdir().unwrap();
    let flag = dir.path().join("notice.txt");

    let mut tour = Onboarding::for_startup(Box::new(NoticeFile::new(&flag))).unwrap();
    for _ in 0..3 {
        tour.advance();
    }
    tour.set_acknowledged(true);
    drop(tour);

    assert!(NoticeFile::new(&flag).is_acknowledged());
    assert!(Onboarding::for_startup(Box::new(NoticeFile::new(&flag))).is_none());
}
