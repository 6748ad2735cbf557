use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Done,
    Failed,
}

/// One engine invocation: exactly one input file to one numbered output file
#[derive(Debug, Clone)]
pub struct AudioJob {
    /// 1-based track number, also used in the output file name
    pub index: usize,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub status: JobStatus,

    /// Engine diagnostic (stderr) when the job failed
    pub last_error: Option<String>,
}

impl AudioJob {
    /// Create a new pending job
    pub fn new(index: usize, input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            index,
            input_path,
            output_path,
            status: JobStatus::Pending,
            last_error: None,
        }
    }

    pub fn mark_done(&mut self) {
        self.status = JobStatus::Done;
        self.last_error = None;
    }

    pub fn mark_failed(&mut self, diagnostic: String) {
        self.status = JobStatus::Failed;
        self.last_error = Some(diagnostic);
    }
}

/// Jobs planned for a run, capped at the profile's track limit
#[derive(Debug, Clone, Default)]
pub struct JobQueue {
    pub jobs: Vec<AudioJob>,

    /// Set when more eligible files existed than the cap allowed
    pub truncated: bool,

    pub cap: usize,
}

impl JobQueue {
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Outcome of a batch: every attempted job with its final status
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub jobs: Vec<AudioJob>,
    pub truncated: bool,
    pub cap: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    pub fn converted(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| job.status == JobStatus::Done)
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &AudioJob> {
        self.jobs
            .iter()
            .filter(|job| job.status == JobStatus::Failed)
    }

    /// Operator notice when eligible files were left out by the cap
    pub fn overflow_notice(&self) -> Option<String> {
        self.truncated.then(|| {
            format!(
                "More than {} tracks found, the rest were skipped",
                self.cap
            )
        })
    }
}
