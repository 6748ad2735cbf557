use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the built-in profile used when nothing else is configured
pub const DEFAULT_PROFILE: &str = "radio";

fn default_extensions() -> Vec<String> {
    ["mp3", "wav", "flac", "aac", "ogg"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_channels() -> u32 {
    1
}

fn default_sample_rate() -> u32 {
    22050
}

fn default_audio_codec() -> String {
    "libvorbis".to_string()
}

fn default_container() -> String {
    "ogg".to_string()
}

fn default_track_prefix() -> String {
    "track".to_string()
}

// Track limit of the radio device
fn default_max_tracks() -> usize {
    199
}

/// Conversion settings for one target device
///
/// Every field falls back to the radio preset, so a custom profile in the
/// config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,

    /// Accepted input extensions, compared case-insensitively, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_channels")]
    pub channels: u32,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Output file extension
    #[serde(default = "default_container")]
    pub container: String,

    #[serde(default = "default_track_prefix")]
    pub track_prefix: String,

    #[serde(default = "default_max_tracks")]
    pub max_tracks: usize,

    /// Extra engine arguments, shell-quoted, placed before the output path
    #[serde(default)]
    pub additional_args: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self::radio()
    }
}

impl Profile {
    /// Mono 22.05 kHz Vorbis, at most 199 tracks
    pub fn radio() -> Self {
        Self {
            name: DEFAULT_PROFILE.to_string(),
            extensions: default_extensions(),
            channels: default_channels(),
            sample_rate: default_sample_rate(),
            audio_codec: default_audio_codec(),
            container: default_container(),
            track_prefix: default_track_prefix(),
            max_tracks: default_max_tracks(),
            additional_args: String::new(),
        }
    }

    /// Look up a built-in profile by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            DEFAULT_PROFILE => Some(Self::radio()),
            _ => None,
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &[DEFAULT_PROFILE]
    }

    /// Whether a path has one of the accepted extensions
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').to_lowercase() == ext)
    }

    /// File name for the n-th produced track, e.g. `track3.ogg`
    pub fn output_file_name(&self, index: usize) -> String {
        format!("{}{}.{}", self.track_prefix, index, self.container)
    }
}
