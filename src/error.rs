//! Error types for the wallpaper engine
use thiserror::Error;

/// Wallpaper engine errors
#[derive(Error, Debug)]
pub enum WallError {
    /// No usable audio device
    #[error("Audio device error: {0}")]
    Device(String),

    /// Building or driving an audio stream failed
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// Audio file could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] hound::Error),

    /// Audio file decoded to nothing playable
    #[error("Empty audio file: {0}")]
    EmptyTrack(String),

    /// Operation not valid in the current session state
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// Invalid parameter value
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// GPU surface or device failure
    #[error("Graphics error: {0}")]
    Graphics(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for wallpaper operations
pub type Result<T> = std::result::Result<T, WallError>;
