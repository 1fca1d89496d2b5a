/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// Loading happens before logging is set up (the log file path is itself a
/// setting), so problems are handed back to the caller to report once the
/// subscriber exists.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub audio: AudioConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    /// Frame period; 16 ms is roughly 60 frames per second.
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioConfig {
    /// Background music on when the game starts.
    pub music: bool,
    /// Music volume, clamped to 0.0..=1.0.
    pub volume: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogConfig {
    pub file: PathBuf,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_music")]
    music: bool,
    #[serde(default = "default_volume")]
    volume: f32,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }
fn default_music() -> bool { true }
fn default_volume() -> f32 { 0.5 }
fn default_log_file() -> String { "coinrunner.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio { music: default_music(), volume: default_volume() }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { file: default_log_file(), level: default_log_level() }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            timing: TimingConfig {
                // a zero period would spin the loop
                tick_rate_ms: t.timing.tick_rate_ms.max(1),
            },
            audio: AudioConfig {
                music: t.audio.music,
                volume: t.audio.volume.clamp(0.0, 1.0),
            },
            log: LogConfig {
                file: PathBuf::from(t.log.file),
                level: t.log.level,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults; an
    /// unreadable or malformed file falls back too and the error is returned
    /// alongside.
    pub fn load() -> (Self, Option<ConfigError>) {
        match find_config(&candidate_dirs()) {
            Some(path) => match load_file(&path) {
                Ok(cfg) => (cfg, None),
                Err(e) => (GameConfig::default(), Some(e)),
            },
            None => (GameConfig::default(), None),
        }
    }

    /// Parse config text. Keys that are absent take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from)
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn find_config(search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs
        .iter()
        .map(|dir| dir.join("config.toml"))
        .find(|path| path.exists())
}

fn load_file(path: &Path) -> Result<GameConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    GameConfig::from_toml_str(&text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}
