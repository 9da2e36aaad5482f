use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::error::CatalogError;

pub const RECOGNIZED_EXTENSIONS: [&str; 4] = [".wav", ".mp3", ".wma", ".m4a"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundEntry {
    /// File name including its extension, e.g. `rain.mp3`.
    pub display_name: String,
    pub file_path: PathBuf,
    pub is_user_supplied: bool,
}

impl SoundEntry {
    /// Display name without its extension; bundled tracks ship `<stem>.png` artwork.
    pub fn artwork_stem(&self) -> &str {
        strip_extension(&self.display_name)
    }
}

/// Ordered list of playable sounds: bundled entries first, then the user's own.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<SoundEntry>,
    default_count: usize,
}

impl Catalog {
    pub fn build(
        default_dir: impl AsRef<Path>,
        user_dir: impl AsRef<Path>,
        recognized_extensions: &[&str],
    ) -> Result<Self, CatalogError> {
        let default_dir = default_dir.as_ref();
        let user_dir = user_dir.as_ref();

        let defaults = scan_dir(default_dir, recognized_extensions)?;
        let users = scan_dir(user_dir, recognized_extensions)?;
        let catalog = Self::from_names(default_dir, defaults, user_dir, users);

        if catalog.is_empty() {
            return Err(CatalogError::Empty {
                default_dir: default_dir.to_path_buf(),
                user_dir: user_dir.to_path_buf(),
            });
        }

        info!(
            bundled = catalog.default_count,
            user = catalog.len() - catalog.default_count,
            "Sound catalog built"
        );
        Ok(catalog)
    }

    fn from_names<'a>(
        default_dir: &'a Path,
        defaults: Vec<String>,
        user_dir: &'a Path,
        users: Vec<String>,
    ) -> Self {
        let default_count = defaults.len();
        let entries = defaults
            .into_iter()
            .map(|name| (default_dir, name))
            .chain(users.into_iter().map(|name| (user_dir, name)))
            .enumerate()
            .map(|(position, (dir, name))| SoundEntry {
                file_path: dir.join(&name),
                display_name: name,
                is_user_supplied: position >= default_count,
            })
            .collect();

        Self {
            entries,
            default_count,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_count(&self) -> usize {
        self.default_count
    }

    pub fn get(&self, index: usize) -> Option<&SoundEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[SoundEntry] {
        &self.entries
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|entry| entry.file_path.as_path())
    }

    /// Whether `index` falls inside the bundled range (and so has matching artwork).
    pub fn is_bundled(&self, index: usize) -> bool {
        index < self.default_count
    }
}

/// Case-sensitive match on the last four characters of the file name.
pub fn has_recognized_extension(file_name: &str, recognized_extensions: &[&str]) -> bool {
    recognized_extensions.iter().any(|ext| file_name.ends_with(ext))
}

fn strip_extension(file_name: &str) -> &str {
    RECOGNIZED_EXTENSIONS
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name)
}

/// Lists recognised sound files in `dir` (non-recursive), sorted by file name so that
/// playback order does not depend on the platform's directory listing.
fn scan_dir(dir: &Path, recognized_extensions: &[&str]) -> Result<Vec<String>, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::MissingDirectory(dir.to_path_buf()));
    }

    let read_err = |source| CatalogError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.file_type().map_err(read_err)?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if has_recognized_extension(&name, recognized_extensions) {
            names.push(name);
        } else {
            debug!("Skipping unrecognised file {}", entry.path().display());
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn extension_check_is_case_sensitive() {
        assert!(has_recognized_extension("rain.mp3", &RECOGNIZED_EXTENSIONS));
        assert!(has_recognized_extension("birds.m4a", &RECOGNIZED_EXTENSIONS));
        assert!(!has_recognized_extension("rain.MP3", &RECOGNIZED_EXTENSIONS));
        assert!(!has_recognized_extension("notes.txt", &RECOGNIZED_EXTENSIONS));
        assert!(!has_recognized_extension("rain.flac", &RECOGNIZED_EXTENSIONS));
        assert!(has_recognized_extension(".mp3", &RECOGNIZED_EXTENSIONS));
    }

    #[test]
    fn artwork_stem_drops_extension() {
        let entry = SoundEntry {
            display_name: "sea.wave.wav".into(),
            file_path: PathBuf::from("sound/default/sea.wave.wav"),
            is_user_supplied: false,
        };
        assert_eq!(entry.artwork_stem(), "sea.wave");
    }

    #[test]
    fn defaults_come_before_user_entries() {
        let root = tempfile::tempdir().unwrap();
        let default_dir = root.path().join("default");
        fs::create_dir(&default_dir).unwrap();
        touch(&default_dir, "b.mp3");
        touch(&default_dir, "a.wav");
        touch(&default_dir, "cover.png");
        touch(root.path(), "c.m4a");
        touch(root.path(), "readme.md");

        let catalog = Catalog::build(&default_dir, root.path(), &RECOGNIZED_EXTENSIONS).unwrap();

        let names: Vec<_> = catalog
            .entries()
            .iter()
            .map(|e| e.display_name.as_str())
            .collect();
        assert_eq!(names, ["a.wav", "b.mp3", "c.m4a"]);
        assert_eq!(catalog.default_count(), 2);
        assert!(!catalog.entries()[1].is_user_supplied);
        assert!(catalog.entries()[2].is_user_supplied);
        assert_eq!(catalog.entries()[2].file_path, root.path().join("c.m4a"));
        assert!(catalog.is_bundled(1));
        assert!(!catalog.is_bundled(2));
    }

    #[test]
    fn missing_directory_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("default");
        let err = Catalog::build(&missing, root.path(), &RECOGNIZED_EXTENSIONS).unwrap_err();
        assert!(matches!(err, CatalogError::MissingDirectory(path) if path == missing));
    }

    #[test]
    fn missing_user_directory_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let default_dir = root.path().join("default");
        fs::create_dir(&default_dir).unwrap();
        touch(&default_dir, "rain.mp3");
        let user_dir = root.path().join("sound");

        let err = Catalog::build(&default_dir, &user_dir, &RECOGNIZED_EXTENSIONS).unwrap_err();
        assert!(matches!(err, CatalogError::MissingDirectory(path) if path == user_dir));
    }

    #[test]
    fn catalog_without_sounds_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let default_dir = root.path().join("default");
        fs::create_dir(&default_dir).unwrap();
        touch(root.path(), "notes.txt");

        let err = Catalog::build(&default_dir, root.path(), &RECOGNIZED_EXTENSIONS).unwrap_err();
        assert!(matches!(err, CatalogError::Empty { .. }));
    }
}
