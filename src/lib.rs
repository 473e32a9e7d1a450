//! Wavewall library - audio-reactive wallpaper generator

pub mod audio;
pub mod cli;
pub mod error;
pub mod export;
pub mod logging;
pub mod params;
pub mod recording;
pub mod rendering;
pub mod scene;
