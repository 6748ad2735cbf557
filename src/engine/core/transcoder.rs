use anyhow::Result;
use std::path::{Path, PathBuf};

use super::ffmpeg_cmd::run_convert;
use super::ffmpeg_info::is_engine_available;
use super::profile::Profile;
use super::types::AudioJob;

/// External audio engine seen by the batch converter
pub trait Transcoder {
    /// Whether the engine can be started at all
    fn is_available(&self) -> bool;

    /// Convert one job; the error message is the engine's diagnostic
    fn convert(&self, job: &AudioJob, profile: &Profile) -> Result<()>;
}

/// ffmpeg invoked as a subprocess
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder for Ffmpeg {
    fn is_available(&self) -> bool {
        is_engine_available(&self.program)
    }

    fn convert(&self, job: &AudioJob, profile: &Profile) -> Result<()> {
        run_convert(&self.program, job, profile)
    }
}
