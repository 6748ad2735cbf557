use super::profile::Profile;
use super::types::{AudioJob, JobQueue};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List the eligible audio files directly inside `dir`, sorted by file name
///
/// Subdirectories are not descended into. Names sort byte-wise, so
/// `A.FLAC` comes before `a.wav`.
pub fn scan(dir: &Path, profile: &Profile) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
        let path = entry.path();
        // is_file() follows links, so symlinked tracks still count
        if path.is_file() && profile.accepts(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Number the files `1..` in order and map each to its output path
///
/// At most `profile.max_tracks` jobs are produced; any extra file sets
/// `truncated` and is not looked at further.
pub fn build_job_queue(files: Vec<PathBuf>, output_dir: &Path, profile: &Profile) -> JobQueue {
    let cap = profile.max_tracks;
    let mut queue = JobQueue {
        jobs: Vec::new(),
        truncated: false,
        cap,
    };

    let mut count = 0;
    for input_path in files {
        if count >= cap {
            queue.truncated = true;
            break;
        }
        count += 1;
        let output_path = output_dir.join(profile.output_file_name(count));
        queue.jobs.push(AudioJob::new(count, input_path, output_path));
    }

    queue
}
