mod batch;
mod ffmpeg_cmd;
mod ffmpeg_info;
mod output;
mod profile;
mod scan;
mod transcoder;
mod types;

pub use batch::{run_batch, run_batch_with_callback};
pub use ffmpeg_cmd::{build_convert_cmd, format_cmd, run_convert};
pub use ffmpeg_info::{ffmpeg_version, is_engine_available};
pub use output::{OutputFs, RealFs, reset_output_dir};
pub use profile::{DEFAULT_PROFILE, Profile};
pub use scan::{build_job_queue, scan};
pub use transcoder::{Ffmpeg, Transcoder};
pub use types::{AudioJob, BatchSummary, JobQueue, JobStatus};
