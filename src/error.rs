use std::path::PathBuf;

use gtk4::glib;

use crate::game::board::{PAIR_COUNT, TILE_COUNT};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board needs {expected} tiles, got {found}", expected = TILE_COUNT)]
    WrongLength { found: usize },

    #[error("tile value {value} is outside 0..{limit}", limit = PAIR_COUNT)]
    ValueOutOfRange { value: u8 },

    #[error("tile value {value} appears {count} times, expected exactly twice")]
    UnpairedValue { value: u8, count: usize },
}

/// Problems with the image directory. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("image folder {} was not found", .0.display())]
    MissingDirectory(PathBuf),

    #[error("back image {} was not found", .0.display())]
    MissingBackImage(PathBuf),

    #[error("at least {required} images are needed, found {found}")]
    NotEnoughImages { found: usize, required: usize },

    #[error("manifest {}: {reason}", .path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: glib::Error,
    },

    #[error("could not prepare {} for display: {reason}", .path.display())]
    Render { path: PathBuf, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Assets(#[from] AssetError),
}
