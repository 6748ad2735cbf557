use crate::cli::{Cli, Commands};
use msconv::config::Config;
use msconv::driver::Session;
use msconv::engine::install::{HostInfo, MsiInstaller};
use msconv::engine::{self, AudioJob, BatchSummary, Ffmpeg, JobStatus, Profile, RealFs};
use msconv::prompt::StdinPrompt;
use std::path::PathBuf;
use std::process;

/// Settings after applying command-line overrides to the config file
struct Resolved {
    config: Config,
    profile: Profile,
    engine: Ffmpeg,
    output_dir: PathBuf,
}

fn resolve(cli: &Cli) -> Resolved {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: {:#}", e);
        eprintln!("Using built-in defaults.");
        Config::default()
    });

    let profile_name = cli
        .profile
        .clone()
        .unwrap_or_else(|| config.defaults.profile.clone());
    let profile = match config.profile(&profile_name) {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let engine = Ffmpeg::new(
        cli.engine
            .clone()
            .unwrap_or_else(|| config.defaults.engine.clone()),
    );
    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| config.defaults.output_dir.clone());

    Resolved {
        config,
        profile,
        engine,
        output_dir,
    }
}

pub fn run(cli: Cli) {
    if let Some(command) = &cli.command {
        match command {
            Commands::CheckFfmpeg => handle_check_ffmpeg(&cli),
            Commands::Scan { directory } => handle_scan(&cli, directory.clone()),
            Commands::DryRun { directory } => handle_dry_run(&cli, directory.clone()),
            Commands::InitConfig => handle_init_config(),
        }
        return;
    }

    handle_convert(&cli);
}

fn handle_convert(cli: &Cli) {
    let resolved = resolve(cli);
    let installer = MsiInstaller::new(resolved.config.defaults.installer_url.clone());
    let mut prompt = StdinPrompt;

    let session = Session {
        transcoder: &resolved.engine,
        installer: &installer,
        host: HostInfo::detect(),
        prompt: &mut prompt,
        fs: &RealFs,
        profile: resolved.profile,
        output_dir: resolved.output_dir,
        input_dir: cli.input.clone(),
        assume_yes: cli.yes,
    };

    match session.run_with_callback(print_job) {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn print_job(job: &AudioJob) {
    match job.status {
        JobStatus::Done => println!(
            "Converted: {} -> {}",
            job.input_path.display(),
            job.output_path.display()
        ),
        JobStatus::Failed => eprintln!(
            "Error converting {}: {}",
            job.input_path.display(),
            job.last_error.as_deref().unwrap_or("unknown error")
        ),
        JobStatus::Pending => {}
    }
}

fn print_summary(summary: &BatchSummary) {
    if let Some(notice) = summary.overflow_notice() {
        println!("{}.", notice);
    }
    let failed = summary.failed().count();
    if failed > 0 {
        println!(
            "{} of {} tracks failed to convert.",
            failed,
            summary.total()
        );
    }
    println!("Conversion complete.");
}

fn handle_check_ffmpeg(cli: &Cli) {
    let resolved = resolve(cli);
    match engine::ffmpeg_version(resolved.engine.program()) {
        Ok(version) => {
            println!("ffmpeg found: {}", version);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn scan_dir(directory: Option<PathBuf>) -> PathBuf {
    directory.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn plan(cli: &Cli, directory: Option<PathBuf>) -> (Resolved, engine::JobQueue) {
    let resolved = resolve(cli);
    let dir = scan_dir(directory);

    match engine::scan(&dir, &resolved.profile) {
        Ok(files) => {
            let queue = engine::build_job_queue(files, &resolved.output_dir, &resolved.profile);
            (resolved, queue)
        }
        Err(e) => {
            eprintln!("Error scanning directory: {:#}", e);
            process::exit(1);
        }
    }
}

fn handle_scan(cli: &Cli, directory: Option<PathBuf>) {
    let (_, queue) = plan(cli, directory);

    for job in &queue.jobs {
        println!(
            "- {} -> {}",
            job.input_path.display(),
            job.output_path.display()
        );
    }
    println!("Total jobs: {}", queue.len());
    if queue.truncated {
        println!("More than {} tracks found, the rest would be skipped", queue.cap);
    }
}

fn handle_dry_run(cli: &Cli, directory: Option<PathBuf>) {
    let (resolved, queue) = plan(cli, directory);

    for job in &queue.jobs {
        let cmd = engine::build_convert_cmd(resolved.engine.program(), job, &resolved.profile);
        println!("{}", engine::format_cmd(&cmd));
    }
}

fn handle_init_config() {
    match Config::config_path() {
        Ok(path) if path.exists() => match Config::load() {
            Ok(cfg) => {
                println!("Config loaded successfully from {}", path.display());
                println!("{:#?}", cfg);
            }
            Err(e) => {
                eprintln!("Config at {} is invalid: {:#}", path.display(), e);
                process::exit(1);
            }
        },
        Ok(path) => {
            println!("Creating default config...");
            if let Err(e) = Config::default().save() {
                eprintln!("Failed to save default config: {:#}", e);
                process::exit(1);
            }
            println!("Default config saved to {}", path.display());
        }
        Err(e) => {
            eprintln!("Config path unknown: {:#}", e);
            process::exit(1);
        }
    }
}
