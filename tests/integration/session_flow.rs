// End-to-end session tests with scripted answers and a fake engine

use msconv::driver::{INPUT_DIR_PROMPT, Session, SessionError};
use msconv::engine::install::{CONFIRM_PROMPT, HostInfo, InstallError, PackageInstaller, WindowsVersion};
use msconv::engine::{AudioJob, JobStatus, OutputFs, Profile, RealFs};
use msconv::prompt::ScriptedPrompt;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::common::helpers::*;

#[derive(Default)]
struct FakeInstaller {
    runs: Cell<u32>,
}

impl PackageInstaller for FakeInstaller {
    fn install(&self) -> Result<(), InstallError> {
        self.runs.set(self.runs.get() + 1);
        Ok(())
    }
}

fn linux_host() -> HostInfo {
    HostInfo {
        os: "linux".to_string(),
        version: None,
        arch: "x86_64".to_string(),
    }
}

fn windows_host(major: u32, minor: u32, arch: &str) -> HostInfo {
    HostInfo {
        os: "windows".to_string(),
        version: Some(WindowsVersion { major, minor }),
        arch: arch.to_string(),
    }
}

fn session<'a>(
    engine: &'a FakeEngine,
    installer: &'a FakeInstaller,
    prompt: &'a mut ScriptedPrompt,
    fs: &'a MemoryFs,
    host: HostInfo,
) -> Session<'a> {
    Session {
        transcoder: engine,
        installer,
        host,
        prompt,
        fs,
        profile: Profile::radio(),
        output_dir: PathBuf::from("output/Radio"),
        input_dir: None,
        assume_yes: false,
    }
}

#[test]
fn test_interactive_run_converts_folder() {
    let input = TempDir::new().unwrap();
    touch_all(input.path(), &["b.mp3", "a.wav", "c.txt", "A.FLAC"]);
    let engine = FakeEngine::new();
    let installer = FakeInstaller::default();
    let mut prompt = ScriptedPrompt::new([input.path().to_string_lossy().to_string()]);
    let memfs = MemoryFs::new();
    memfs.add_file("output/Radio/track7.ogg");

    let summary = session(&engine, &installer, &mut prompt, &memfs, linux_host())
        .run()
        .unwrap();

    assert_eq!(summary.converted(), 3);
    assert_eq!(
        engine.call_names(),
        vec![
            ("A.FLAC".to_string(), "track1.ogg".to_string()),
            ("a.wav".to_string(), "track2.ogg".to_string()),
            ("b.mp3".to_string(), "track3.ogg".to_string()),
        ]
    );
    assert_eq!(prompt.asked(), &[INPUT_DIR_PROMPT]);
    assert!(memfs.children(Path::new("output/Radio")).is_empty());
    assert_eq!(installer.runs.get(), 0);
}

#[test]
fn test_empty_folder_still_prepares_output_area() {
    let input = TempDir::new().unwrap();
    let engine = FakeEngine::new();
    let installer = FakeInstaller::default();
    let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
    let memfs = MemoryFs::new();

    let mut s = session(&engine, &installer, &mut prompt, &memfs, linux_host());
    s.input_dir = Some(input.path().to_path_buf());
    let summary = s.run().unwrap();

    assert_eq!(summary.total(), 0);
    assert!(memfs.is_dir(Path::new("output/Radio")));
    assert!(prompt.asked().is_empty(), "input given up front, no prompt");
}

#[test]
fn test_missing_input_folder_is_distinct_error() {
    let work = TempDir::new().unwrap();
    let missing = work.path().join("no-such-folder");
    let engine = FakeEngine::new();
    let installer = FakeInstaller::default();
    let mut prompt = ScriptedPrompt::new([missing.to_string_lossy().to_string()]);
    let memfs = MemoryFs::new();
    memfs.add_file("output/Radio/track1.ogg");

    let err = session(&engine, &installer, &mut prompt, &memfs, linux_host())
        .run()
        .unwrap_err();

    assert!(matches!(err, SessionError::MissingInput(ref p) if p == &missing));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(
        err.to_string(),
        format!("The folder {} does not exist.", missing.display())
    );
    assert!(
        memfs.exists(Path::new("output/Radio/track1.ogg")),
        "output area is left alone when the input is missing"
    );
    assert_eq!(engine.call_count(), 0);
}

#[test]
fn test_blank_answer_is_missing_input() {
    let engine = FakeEngine::new();
    let installer = FakeInstaller::default();
    let mut prompt = ScriptedPrompt::new(["   "]);
    let memfs = MemoryFs::new();

    let err = session(&engine, &installer, &mut prompt, &memfs, linux_host())
        .run()
        .unwrap_err();

    assert!(matches!(err, SessionError::MissingInput(_)));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(err.to_string(), "No music folder was given.");
}

#[test]
fn test_output_reset_failure_is_fatal() {
    let input = TempDir::new().unwrap();
    touch_all(input.path(), &["a.mp3"]);
    let engine = FakeEngine::new();
    let installer = FakeInstaller::default();
    let mut prompt = ScriptedPrompt::new([input.path().to_string_lossy().to_string()]);
    let memfs = MemoryFs::with_locked("output/Radio/track1.ogg");
    memfs.add_file("output/Radio/track1.ogg");

    let err = session(&engine, &installer, &mut prompt, &memfs, linux_host())
        .run()
        .unwrap_err();

    assert!(matches!(err, SessionError::OutputReset { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("Permission denied"));
    assert_eq!(engine.call_count(), 0);
}

#[test]
fn test_missing_engine_off_windows_is_fatal() {
    let engine = FakeEngine::unavailable();
    let installer = FakeInstaller::default();
    let mut prompt = ScriptedPrompt::new(["/music"]);
    let memfs = MemoryFs::new();

    let err = session(&engine, &installer, &mut prompt, &memfs, linux_host())
        .run()
        .unwrap_err();

    assert!(matches!(err, SessionError::Install(InstallError::NotFound)));
    assert_eq!(err.exit_code(), 1);
    assert!(prompt.asked().is_empty(), "nothing is asked before failing");
    assert!(!memfs.exists(Path::new("output/Radio")));
}

#[test]
fn test_missing_engine_on_windows_installs_after_confirmation() {
    let input = TempDir::new().unwrap();
    touch_all(input.path(), &["a.mp3"]);
    let engine = FakeEngine::unavailable();
    let installer = FakeInstaller::default();
    let mut prompt = ScriptedPrompt::new([
        String::new(),
        input.path().to_string_lossy().to_string(),
    ]);
    let memfs = MemoryFs::new();

    let summary = session(
        &engine,
        &installer,
        &mut prompt,
        &memfs,
        windows_host(10, 0, "AMD64"),
    )
    .run()
    .unwrap();

    assert_eq!(installer.runs.get(), 1);
    assert_eq!(prompt.asked(), &[CONFIRM_PROMPT, INPUT_DIR_PROMPT]);
    assert_eq!(summary.converted(), 1);
}

#[test]
fn test_declined_install_stops_session() {
    let engine = FakeEngine::unavailable();
    let installer = FakeInstaller::default();
    let mut prompt = ScriptedPrompt::new(["no", "/music"]);
    let memfs = MemoryFs::new();

    let err = session(
        &engine,
        &installer,
        &mut prompt,
        &memfs,
        windows_host(6, 1, "x86_64"),
    )
    .run()
    .unwrap_err();

    assert!(matches!(err, SessionError::Install(InstallError::Declined)));
    assert_eq!(installer.runs.get(), 0);
    assert_eq!(prompt.asked(), &[CONFIRM_PROMPT]);
}

#[test]
fn test_callback_reports_every_attempt_and_real_fs_ends_clean() {
    let input = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("output").join("Radio");
    std::fs::create_dir_all(output.join("stale")).unwrap();
    std::fs::write(output.join("track42.ogg"), b"old").unwrap();
    touch_all(input.path(), &["1.mp3", "2-bad.mp3", "3.mp3"]);

    let engine = FakeEngine::failing_on("bad").writing_outputs();
    let installer = FakeInstaller::default();
    let mut prompt = ScriptedPrompt::new(Vec::<String>::new());

    let session = Session {
        transcoder: &engine,
        installer: &installer,
        host: linux_host(),
        prompt: &mut prompt,
        fs: &RealFs,
        profile: Profile::radio(),
        output_dir: output.clone(),
        input_dir: Some(input.path().to_path_buf()),
        assume_yes: false,
    };

    let mut seen: Vec<(usize, JobStatus)> = Vec::new();
    let summary = session
        .run_with_callback(|job: &AudioJob| seen.push((job.index, job.status.clone())))
        .unwrap();

    assert_eq!(
        seen,
        vec![
            (1, JobStatus::Done),
            (2, JobStatus::Failed),
            (3, JobStatus::Done)
        ]
    );
    assert_eq!(summary.failed().count(), 1);
    assert_eq!(dir_listing(&output), vec!["track1.ogg", "track3.ogg"]);
}
