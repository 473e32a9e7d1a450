//! Audio capture, playback and spectrum analysis.
//!
//! Device callbacks feed a shared sample tap; the frame loop pulls a
//! byte-magnitude spectrum from it once per redraw.

mod analyser;
mod backend;
mod file;
mod sampler;
mod session;
mod tap;

// Re-export public types
pub use analyser::{blackman_window, Analyser};
pub use backend::{AudioBackend, CpalBackend, StreamHandle};
pub use file::AudioTrack;
pub use sampler::{Spectrum, SpectrumSampler};
pub use session::{AudioSession, SourceState};
pub use tap::SampleTap;
