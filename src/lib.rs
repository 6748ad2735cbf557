//! msconv: batch-convert a music folder into numbered mono tracks for a
//! radio-style player, using ffmpeg as the conversion engine.

pub mod config;
pub mod driver;
pub mod engine;
pub mod prompt;
