//! ffmpeg bootstrapper for Windows
//!
//! When the engine is missing, Windows hosts that pass the version and
//! architecture gates can download the ffmpeg MSI package and install it
//! silently with `msiexec`. Every other host gets a fatal "not found" error.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use sysinfo::System;
use thiserror::Error;
use tracing::{error, info, warn};

use super::core::Transcoder;
use crate::prompt::{Prompt, is_affirmative};

pub const DEFAULT_INSTALLER_URL: &str =
    "https://github.com/icedterminal/ffmpeg-installer/releases/download/latest/FFmpeg_Essentials.msi";

const INSTALLER_FILE_NAME: &str = "FFmpeg_Essentials.msi";

pub const CONFIRM_PROMPT: &str = "ffmpeg not found. Install it automatically? (Y/n): ";

/// Windows 7
pub const MIN_WINDOWS_VERSION: WindowsVersion = WindowsVersion { major: 6, minor: 1 };

// NT 10.x on ARM64 has no working package
const EXCLUDED_ARM_MAJOR: u32 = 10;

const ALLOWED_ARCHES: &[&str] = &["x86_64", "amd64", "arm64", "aarch64"];
const ARM_ARCHES: &[&str] = &["arm64", "aarch64"];

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("ffmpeg not found. Please install ffmpeg and add it to PATH.")]
    NotFound,

    #[error(
        "ffmpeg not found. Please install ffmpeg and add it to PATH. Automatic installation requires Windows 7 (6.1) or newer. Your system: Windows {0}"
    )]
    OsTooOld(WindowsVersion),

    #[error("ffmpeg not found. Please install ffmpeg and add it to PATH. Could not determine the Windows version for automatic installation.")]
    UnknownOsVersion,

    #[error("Automatic ffmpeg installation is not possible for architecture: {0}")]
    UnsupportedArch(String),

    #[error(
        "ffmpeg not found. Please install ffmpeg and add it to PATH. Automatic ffmpeg installation is not supported on Windows 10 on ARM64."
    )]
    ExcludedPlatform,

    #[error("ffmpeg not found. Please install ffmpeg and add it to PATH.")]
    Declined,

    #[error("Failed to read the installation answer: {0}")]
    Prompt(String),

    #[error("Failed to download the ffmpeg installer from {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("ffmpeg installation failed: {0}")]
    InstallerFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Windows NT version, e.g. 6.1 for Windows 7 and 10.0 for Windows 10/11
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WindowsVersion {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for WindowsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Facts about the machine that decide whether auto-install is allowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// `std::env::consts::OS` naming, e.g. "windows", "linux"
    pub os: String,
    /// Only detected on Windows
    pub version: Option<WindowsVersion>,
    pub arch: String,
}

impl HostInfo {
    pub fn detect() -> Self {
        let os = std::env::consts::OS.to_string();
        let version = if cfg!(windows) {
            detect_windows_version()
        } else {
            None
        };
        let arch = System::cpu_arch()
            .filter(|arch| !arch.trim().is_empty())
            .unwrap_or_else(|| std::env::consts::ARCH.to_string());

        Self { os, version, arch }
    }

    pub fn is_windows(&self) -> bool {
        self.os.eq_ignore_ascii_case("windows")
    }
}

fn detect_windows_version() -> Option<WindowsVersion> {
    let output = Command::new("cmd").args(["/C", "ver"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_ver_output(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the output of `ver`, e.g. "Microsoft Windows [Version 10.0.19045.3803]"
///
/// Only the first dotted number matters, so localized banners parse too.
pub fn parse_ver_output(output: &str) -> Option<WindowsVersion> {
    output
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .find_map(|token| {
            let mut parts = token.split('.');
            let major = parts.next()?.parse().ok()?;
            let minor = parts.next()?.parse().ok()?;
            Some(WindowsVersion { major, minor })
        })
}

/// Decide whether automatic installation may be attempted on this host
pub fn check_eligibility(host: &HostInfo) -> Result<(), InstallError> {
    if !host.is_windows() {
        return Err(InstallError::NotFound);
    }

    let version = host.version.ok_or(InstallError::UnknownOsVersion)?;
    if version < MIN_WINDOWS_VERSION {
        return Err(InstallError::OsTooOld(version));
    }

    let arch = host.arch.to_lowercase();
    if !ALLOWED_ARCHES.contains(&arch.as_str()) {
        return Err(InstallError::UnsupportedArch(arch));
    }

    if version.major == EXCLUDED_ARM_MAJOR && ARM_ARCHES.contains(&arch.as_str()) {
        return Err(InstallError::ExcludedPlatform);
    }

    Ok(())
}

/// Puts the engine on the machine
pub trait PackageInstaller {
    fn install(&self) -> Result<(), InstallError>;
}

/// Downloads the ffmpeg MSI and runs `msiexec /i <package> /qn`
#[derive(Debug, Clone)]
pub struct MsiInstaller {
    pub url: String,
    pub download_dir: PathBuf,
}

impl Default for MsiInstaller {
    fn default() -> Self {
        Self {
            url: DEFAULT_INSTALLER_URL.to_string(),
            download_dir: std::env::temp_dir(),
        }
    }
}

impl MsiInstaller {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    fn download(&self, artifact: &InstallerArtifact) -> Result<(), InstallError> {
        info!("Downloading ffmpeg installer from {}", self.url);

        let download_err = |reason: String| InstallError::Download {
            url: self.url.clone(),
            reason,
        };

        let mut response = reqwest::blocking::get(&self.url)
            .and_then(|response| response.error_for_status())
            .map_err(|e| download_err(e.to_string()))?;

        let mut file = fs::File::create(artifact.path())?;
        response
            .copy_to(&mut file)
            .map_err(|e| download_err(e.to_string()))?;

        info!("Installer saved to {}", artifact.path().display());
        Ok(())
    }

    fn run_msiexec(&self, package: &Path) -> Result<(), InstallError> {
        info!("Running ffmpeg installer");

        let status = Command::new("msiexec")
            .arg("/i")
            .arg(package)
            .arg("/qn")
            .status()
            .map_err(|e| InstallError::InstallerFailed(format!("could not start msiexec: {}", e)))?;

        if !status.success() {
            return Err(InstallError::InstallerFailed(format!(
                "msiexec exited with status {}",
                status
            )));
        }

        info!("ffmpeg installed successfully");
        Ok(())
    }
}

impl PackageInstaller for MsiInstaller {
    fn install(&self) -> Result<(), InstallError> {
        let artifact = InstallerArtifact::new(self.download_dir.join(INSTALLER_FILE_NAME));

        if let Err(e) = self.download(&artifact) {
            error!("{}", e);
            return Err(e);
        }

        self.run_msiexec(artifact.path())
    }
}

/// Downloaded installer package, deleted when dropped
#[derive(Debug)]
pub struct InstallerArtifact {
    path: PathBuf,
}

impl InstallerArtifact {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstallerArtifact {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(
                "Could not delete temporary installer {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// Found on the first probe
    Available,
    /// Installed during this run
    Installed,
}

/// Make sure the engine is usable, installing it when the host allows
///
/// `assume_yes` skips the confirmation prompt.
pub fn ensure_engine(
    transcoder: &dyn Transcoder,
    host: &HostInfo,
    prompt: &mut dyn Prompt,
    installer: &dyn PackageInstaller,
    assume_yes: bool,
) -> Result<EngineStatus, InstallError> {
    if transcoder.is_available() {
        info!("ffmpeg is installed");
        return Ok(EngineStatus::Available);
    }

    check_eligibility(host)?;

    if !assume_yes {
        let answer = prompt
            .ask(CONFIRM_PROMPT)
            .map_err(|e| InstallError::Prompt(format!("{:#}", e)))?;
        if !is_affirmative(&answer) {
            return Err(InstallError::Declined);
        }
    }

    installer.install()?;
    Ok(EngineStatus::Installed)
}
