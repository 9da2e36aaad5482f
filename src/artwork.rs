use std::{
    collections::HashMap,
    fs,
    io::Cursor,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver},
};

use anyhow::{anyhow, Result};
use eframe::egui::{self, ColorImage, IconData, TextureHandle};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::error::AssetError;

/// Decoded straight-alpha RGBA pixels.
pub struct RgbaImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Fixed-name button and track artwork from the image directory, uploaded lazily.
pub struct Artwork {
    root: PathBuf,
    textures: HashMap<String, Option<TextureHandle>>,
    watcher: Option<RecommendedWatcher>,
    changes_rx: Option<Receiver<notify::Result<notify::Event>>>,
}

impl Artwork {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, AssetError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(AssetError::MissingDirectory(root));
        }
        Ok(Self {
            root,
            textures: HashMap::new(),
            watcher: None,
            changes_rx: None,
        })
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Cached texture for `name`. Missing or broken files are remembered as misses so
    /// they are not retried every frame.
    pub fn texture(&mut self, ctx: &egui::Context, name: &str) -> Option<TextureHandle> {
        if let Some(cached) = self.textures.get(name) {
            return cached.clone();
        }

        let path = self.path_of(name);
        let loaded = match load_rgba(&path) {
            Ok(image) => Some(ctx.load_texture(
                format!("artwork-{name}"),
                to_color_image(&image),
                egui::TextureOptions::LINEAR,
            )),
            Err(err) => {
                debug!("Artwork unavailable: {err}");
                None
            }
        };
        self.textures.insert(name.to_owned(), loaded.clone());
        loaded
    }

    pub fn texture_or(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        fallback: &str,
    ) -> Option<TextureHandle> {
        self.texture(ctx, name)
            .or_else(|| self.texture(ctx, fallback))
    }

    pub fn rgba(&self, name: &str) -> Result<RgbaImage, AssetError> {
        load_rgba(&self.path_of(name))
    }

    pub fn icon_data(&self, name: &str) -> Option<IconData> {
        match self.rgba(name) {
            Ok(image) => Some(IconData {
                rgba: image.rgba,
                width: image.width,
                height: image.height,
            }),
            Err(err) => {
                warn!("Window icon unavailable: {err}");
                None
            }
        }
    }

    pub fn enable_hot_reload(&mut self) -> Result<()> {
        if self.watcher.is_some() {
            return Ok(());
        }
        if !self.root.exists() {
            return Err(anyhow!(
                "Image directory {} does not exist",
                self.root.display()
            ));
        }

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&self.root, RecursiveMode::NonRecursive)?;

        self.changes_rx = Some(rx);
        self.watcher = Some(watcher);
        Ok(())
    }

    pub fn hot_reload_enabled(&self) -> bool {
        self.watcher.is_some()
    }

    /// Drops cached textures whose files changed on disk. Returns true if any were dropped.
    pub fn poll_hot_reload(&mut self) -> bool {
        let mut events = Vec::new();
        if let Some(rx) = self.changes_rx.as_ref() {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }

        let mut reloaded = false;
        for event in events {
            match event {
                Ok(evt) => {
                    for path in &evt.paths {
                        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
                            continue;
                        };
                        if self.textures.remove(name.as_ref()).is_some() {
                            debug!("Reloading artwork {name}");
                            reloaded = true;
                        }
                    }
                }
                Err(err) => warn!("Artwork watcher error: {err}"),
            }
        }
        reloaded
    }
}

pub fn load_rgba(path: &Path) -> Result<RgbaImage, AssetError> {
    let data = fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let decode_err = |source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let image = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|source| AssetError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(decode_err)?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(RgbaImage {
        rgba: image.into_raw(),
        width,
        height,
    })
}

fn to_color_image(image: &RgbaImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [image.width as usize, image.height as usize],
        &image.rgba,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str) {
        let image = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        image.save(dir.join(name)).unwrap();
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = Artwork::open(dir.path().join("img"));
        assert!(matches!(result, Err(AssetError::MissingDirectory(_))));
    }

    #[test]
    fn decodes_png_pixels() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "icon_16.png");
        let artwork = Artwork::open(dir.path()).unwrap();

        let image = artwork.rgba("icon_16.png").unwrap();
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
        assert!(artwork.icon_data("icon_128.png").is_none());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.png"), [0u8, 1, 2, 3]).unwrap();
        let artwork = Artwork::open(dir.path()).unwrap();
        assert!(artwork.rgba("broken.png").is_err());
    }

    #[test]
    fn missing_track_artwork_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "display.png");
        let mut artwork = Artwork::open(dir.path()).unwrap();
        let ctx = egui::Context::default();

        assert!(artwork.texture(&ctx, "rain.png").is_none());
        let fallback = artwork.texture_or(&ctx, "rain.png", "display.png");
        assert!(fallback.is_some());
    }
}
