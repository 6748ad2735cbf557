//! One conversion session, start to finish
//!
//! Probe the engine (installing it if allowed), ask for the input folder,
//! reset the output area and run the batch. Every outside capability is
//! passed in, so the whole sequence runs in tests without a terminal,
//! network or real ffmpeg.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::engine::install::{EngineStatus, HostInfo, InstallError, PackageInstaller, ensure_engine};
use crate::engine::{
    AudioJob, BatchSummary, OutputFs, Profile, Transcoder, build_job_queue, reset_output_dir,
    run_batch_with_callback, scan,
};
use crate::prompt::Prompt;

pub const INPUT_DIR_PROMPT: &str = "Enter the path to the music folder: ";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Install(#[from] InstallError),

    #[error("{}", missing_input_message(.0))]
    MissingInput(PathBuf),

    #[error("Failed to read the music folder path: {0:#}")]
    Prompt(anyhow::Error),

    #[error("Failed to prepare output folder {}: {source:#}", .path.display())]
    OutputReset {
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("Failed to list {}: {source:#}", .path.display())]
    Scan {
        path: PathBuf,
        source: anyhow::Error,
    },
}

impl SessionError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionError::MissingInput(_) => 2,
            _ => 1,
        }
    }
}

/// Everything a session needs from the outside world
pub struct Session<'a> {
    pub transcoder: &'a dyn Transcoder,
    pub installer: &'a dyn PackageInstaller,
    pub host: HostInfo,
    pub prompt: &'a mut dyn Prompt,
    pub fs: &'a dyn OutputFs,
    pub profile: Profile,
    pub output_dir: PathBuf,

    /// Skip the folder prompt when already known
    pub input_dir: Option<PathBuf>,

    /// Pre-confirm automatic engine installation
    pub assume_yes: bool,
}

impl Session<'_> {
    pub fn run(self) -> Result<BatchSummary, SessionError> {
        self.run_with_callback(|_job| {})
    }

    /// Run the session, calling `on_finished` after each conversion attempt
    pub fn run_with_callback<F>(self, on_finished: F) -> Result<BatchSummary, SessionError>
    where
        F: FnMut(&AudioJob),
    {
        let Session {
            transcoder,
            installer,
            host,
            prompt,
            fs,
            profile,
            output_dir,
            input_dir,
            assume_yes,
        } = self;

        if ensure_engine(transcoder, &host, prompt, installer, assume_yes)?
            == EngineStatus::Installed
        {
            info!("Continuing with the freshly installed ffmpeg");
        }

        let input_dir = match input_dir {
            Some(dir) => dir,
            None => PathBuf::from(prompt.ask(INPUT_DIR_PROMPT).map_err(SessionError::Prompt)?),
        };
        check_input_dir(&input_dir)?;

        reset_output_dir(fs, &output_dir).map_err(|source| SessionError::OutputReset {
            path: output_dir.clone(),
            source,
        })?;

        let files = scan(&input_dir, &profile).map_err(|source| SessionError::Scan {
            path: input_dir.clone(),
            source,
        })?;
        let queue = build_job_queue(files, &output_dir, &profile);
        info!(
            jobs = queue.len(),
            input = %input_dir.display(),
            output = %output_dir.display(),
            "starting conversion"
        );

        Ok(run_batch_with_callback(
            transcoder,
            queue,
            &profile,
            on_finished,
        ))
    }
}

fn missing_input_message(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        "No music folder was given.".to_string()
    } else {
        format!("The folder {} does not exist.", path.display())
    }
}

fn check_input_dir(path: &Path) -> Result<(), SessionError> {
    if path.as_os_str().is_empty() || !path.exists() {
        return Err(SessionError::MissingInput(path.to_path_buf()));
    }
    Ok(())
}
