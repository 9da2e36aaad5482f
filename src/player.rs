use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, info, warn};

use crate::{catalog::Catalog, error::PlaybackError};

/// Notifications raised by the engine, drained by the main window once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    TrackChanged(usize),
}

/// Audio output the engine drives. Implementations hold at most one loaded source.
pub trait AudioBackend {
    /// Replace the current source with the file at `path`, left paused.
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError>;
    fn play(&mut self);
    fn pause(&mut self);
    /// Linear gain in `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f32);
    /// True once the loaded source has played out (or nothing is loaded).
    fn is_finished(&self) -> bool;
}

pub struct RodioBackend {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Sink,
    volume: f32,
}

impl RodioBackend {
    pub fn try_default() -> Result<Self, PlaybackError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| PlaybackError::StreamInitFailed(Box::new(e)))?;
        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| PlaybackError::StreamInitFailed(Box::new(e)))?;
        sink.pause();

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink,
            volume: 1.0,
        })
    }

    fn fresh_sink(&self) -> Result<Sink, PlaybackError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| PlaybackError::StreamInitFailed(Box::new(e)))?;
        sink.pause();
        sink.set_volume(self.volume);
        Ok(sink)
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        // A stopped sink cannot be reused, so every track gets its own.
        self.sink.stop();
        self.sink = self.fresh_sink()?;

        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        self.sink.append(source);
        Ok(())
    }

    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.sink.set_volume(self.volume);
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

/// Looping playlist over the catalog. After the last entry playback wraps to entry 0.
pub struct PlaybackEngine<B: AudioBackend> {
    backend: B,
    playlist: Vec<PathBuf>,
    current_index: usize,
    is_playing: bool,
    volume: u8,
    unplayable: HashSet<usize>,
    events: Sender<PlayerEvent>,
}

impl<B: AudioBackend> PlaybackEngine<B> {
    /// Seeds the playlist from `catalog` and loads entry 0, paused. No event is raised
    /// for the initial track.
    pub fn new(mut backend: B, catalog: &Catalog, volume: u8) -> (Self, Receiver<PlayerEvent>) {
        let (events, rx) = mpsc::channel();
        let volume = volume.min(100);
        backend.set_volume(f32::from(volume) / 100.0);

        let mut engine = Self {
            backend,
            playlist: catalog.paths().map(Path::to_path_buf).collect(),
            current_index: 0,
            is_playing: false,
            volume,
            unplayable: HashSet::new(),
            events,
        };
        if !engine.playlist.is_empty() {
            engine.load_current();
        }
        (engine, rx)
    }

    pub fn play(&mut self) {
        self.is_playing = true;
        self.backend.play();
        debug!(index = self.current_index, "Playback started");
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
        self.backend.pause();
        debug!(index = self.current_index, "Playback paused");
    }

    pub fn set_current_index(&mut self, index: usize) -> Result<(), PlaybackError> {
        if index >= self.playlist.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: self.playlist.len(),
            });
        }
        self.switch_to(index);
        Ok(())
    }

    /// `volume` is on the `[0, 100]` slider scale.
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.backend.set_volume(f32::from(self.volume) / 100.0);
    }

    /// Advances to the next entry once the current one has played out. Pauses instead
    /// when no entry in the playlist could be loaded.
    pub fn poll(&mut self) {
        if !self.is_playing || self.playlist.is_empty() || !self.backend.is_finished() {
            return;
        }
        if self.unplayable.len() == self.playlist.len() {
            warn!("No track in the playlist can be played, pausing");
            self.pause();
            return;
        }
        let next = (self.current_index + 1) % self.playlist.len();
        self.switch_to(next);
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    fn switch_to(&mut self, index: usize) {
        self.current_index = index;
        self.load_current();
        if self.is_playing {
            self.backend.play();
        }
        info!(index, "Current track changed");
        let _ = self.events.send(PlayerEvent::TrackChanged(index));
    }

    fn load_current(&mut self) {
        let index = self.current_index;
        match self.backend.load(&self.playlist[index]) {
            Ok(()) => {
                self.unplayable.remove(&index);
            }
            Err(err) => {
                // Logged once per track; the engine moves on when the empty source "finishes".
                if self.unplayable.insert(index) {
                    warn!("Track {index} cannot be played: {err}");
                }
            }
        }
    }
}
