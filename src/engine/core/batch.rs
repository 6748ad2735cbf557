use tracing::{debug, warn};

use super::profile::Profile;
use super::transcoder::Transcoder;
use super::types::{AudioJob, BatchSummary, JobQueue};

/// Run every job in the queue, one at a time
pub fn run_batch(transcoder: &dyn Transcoder, queue: JobQueue, profile: &Profile) -> BatchSummary {
    run_batch_with_callback(transcoder, queue, profile, |_job| {})
}

/// Run every job in the queue, calling `on_finished` after each attempt
///
/// A failing job is recorded with its diagnostic and the batch moves on.
pub fn run_batch_with_callback<F>(
    transcoder: &dyn Transcoder,
    queue: JobQueue,
    profile: &Profile,
    mut on_finished: F,
) -> BatchSummary
where
    F: FnMut(&AudioJob),
{
    let JobQueue {
        jobs,
        truncated,
        cap,
    } = queue;

    let mut finished = Vec::with_capacity(jobs.len());
    for mut job in jobs {
        match transcoder.convert(&job, profile) {
            Ok(()) => {
                job.mark_done();
                debug!(
                    input = %job.input_path.display(),
                    output = %job.output_path.display(),
                    "converted"
                );
            }
            Err(e) => {
                job.mark_failed(format!("{:#}", e));
                debug!(input = %job.input_path.display(), "conversion failed");
            }
        }
        on_finished(&job);
        finished.push(job);
    }

    let summary = BatchSummary {
        jobs: finished,
        truncated,
        cap,
    };
    if let Some(notice) = summary.overflow_notice() {
        warn!("{}", notice);
    }

    summary
}
