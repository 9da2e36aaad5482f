use std::path::PathBuf;
use thiserror::Error;

/// Failures while discovering the sound catalog at startup. All of them are fatal.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Sound directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to list sound directory: {}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No playable sounds found in {} or {}", .default_dir.display(), .user_dir.display())]
    Empty {
        default_dir: PathBuf,
        user_dir: PathBuf,
    },
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Track index {index} is out of range for a playlist of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to open sound file: {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode sound file: {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to initialize audio output stream")]
    StreamInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Image directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to read image: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn error_display() {
        let err = PlaybackError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "Track index 7 is out of range for a playlist of 3"
        );

        let err = CatalogError::MissingDirectory(PathBuf::from("sound/default"));
        assert_eq!(err.to_string(), "Sound directory not found: sound/default");
    }

    #[test]
    fn error_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CatalogError::ReadDir {
            path: PathBuf::from("sound"),
            source: io_err,
        };
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Failed to list sound directory: sound");
    }
}
