use anyhow::Context;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub assets: AssetsConfig,
    pub window: WindowConfig,
    pub audio: AudioConfig,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = env::current_dir() {
            candidates.push(current_dir.join("config.toml"));
            candidates.push(current_dir.join("config").join("config.toml"));
            candidates.push(current_dir.join("config").join("pure.toml"));
        }

        if let Ok(exe) = env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join("config.toml"));
                candidates.push(dir.join("config").join("config.toml"));
                candidates.push(dir.join("config").join("pure.toml"));
            }
        }

        for path in candidates {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&data)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_toml_str(data: &str) -> anyhow::Result<Self> {
        let doc: ConfigDocument = toml::from_str(data)?;
        Ok(doc.into())
    }
}

/// Locations of everything the widget reads or writes on disk.
#[derive(Debug, Clone)]
pub struct AssetsConfig {
    pub default_sound_dir: PathBuf,
    pub user_sound_dir: PathBuf,
    pub image_dir: PathBuf,
    pub help_document: PathBuf,
    pub notice_file: PathBuf,
    pub hot_reload: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            default_sound_dir: PathBuf::from("sound").join("default"),
            user_sound_dir: PathBuf::from("sound"),
            image_dir: PathBuf::from("img"),
            help_document: PathBuf::from("help.pdf"),
            notice_file: PathBuf::from("notice.txt"),
            hot_reload: false,
        }
    }
}

impl AssetsConfig {
    /// The help document is resolved against the working directory, not the config file.
    pub fn help_document_path(&self) -> PathBuf {
        if self.help_document.is_absolute() {
            return self.help_document.clone();
        }
        env::current_dir()
            .map(|dir| dir.join(&self.help_document))
            .unwrap_or_else(|_| self.help_document.clone())
    }
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub always_on_top: bool,
    pub margin_right: f32,
    pub margin_bottom: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            always_on_top: true,
            margin_right: 150.0,
            margin_bottom: 70.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub initial_volume: i64,
    pub autoplay: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            initial_volume: 50,
            autoplay: true,
        }
    }
}

impl AudioConfig {
    pub fn initial_volume(&self) -> u8 {
        self.initial_volume.clamp(0, 100) as u8
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    assets: AssetsSection,
    #[serde(default)]
    window: WindowSection,
    #[serde(default)]
    audio: AudioSection,
}

impl From<ConfigDocument> for Config {
    fn from(value: ConfigDocument) -> Self {
        let assets_default = AssetsConfig::default();
        let window_default = WindowConfig::default();
        let audio_default = AudioConfig::default();

        let assets = AssetsConfig {
            default_sound_dir: value
                .assets
                .default_sound_dir
                .unwrap_or(assets_default.default_sound_dir),
            user_sound_dir: value
                .assets
                .user_sound_dir
                .unwrap_or(assets_default.user_sound_dir),
            image_dir: value.assets.image_dir.unwrap_or(assets_default.image_dir),
            help_document: value
                .assets
                .help_document
                .unwrap_or(assets_default.help_document),
            notice_file: value
                .assets
                .notice_file
                .unwrap_or(assets_default.notice_file),
            hot_reload: value.assets.hot_reload.unwrap_or(assets_default.hot_reload),
        };

        let window = WindowConfig {
            always_on_top: value
                .window
                .always_on_top
                .unwrap_or(window_default.always_on_top),
            margin_right: value
                .window
                .margin_right
                .unwrap_or(window_default.margin_right),
            margin_bottom: value
                .window
                .margin_bottom
                .unwrap_or(window_default.margin_bottom),
        };

        let audio = AudioConfig {
            initial_volume: value
                .audio
                .initial_volume
                .unwrap_or(audio_default.initial_volume),
            autoplay: value.audio.autoplay.unwrap_or(audio_default.autoplay),
        };

        Config {
            assets,
            window,
            audio,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AssetsSection {
    default_sound_dir: Option<PathBuf>,
    user_sound_dir: Option<PathBuf>,
    image_dir: Option<PathBuf>,
    help_document: Option<PathBuf>,
    notice_file: Option<PathBuf>,
    hot_reload: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct WindowSection {
    always_on_top: Option<bool>,
    margin_right: Option<f32>,
    margin_bottom: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct AudioSection {
    initial_volume: Option<i64>,
    autoplay: Option<bool>,
}
