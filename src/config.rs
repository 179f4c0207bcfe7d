//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--root`, `--no-mouse`, `--theme`)
//! 2. `--config <file>`
//! 3. `$HX_CONFIG` environment variable (path to config file)
//! 4. Project-local `.hx.toml` in the current working directory
//! 5. Global `~/.config/haiku-explorer/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::archive::loader::SourcePaths;
use crate::explore::filter::TagMatchRule;
use crate::explore::view::DEFAULT_OPEN_DEPTH;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable mouse support.
    pub mouse: Option<bool>,
    /// Use nerd font icons (false = ASCII fallback).
    pub use_icons: Option<bool>,
}

/// Where the archive lives and which documents to read from it.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Site root: a local directory or an `http(s)://` base URL.
    pub root: Option<String>,
    pub manifest: Option<String>,
    pub tags: Option<String>,
    /// Pointer to the current pick shown at startup.
    pub current: Option<String>,
    /// Status document used by `hx summary`.
    pub status: Option<String>,
    /// Upper bound for each fetch, in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Structure explorer settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Quiet period after the last keystroke before highlighting.
    pub debounce_ms: Option<u64>,
    /// Directories shallower than this start expanded.
    pub open_depth: Option<usize>,
    /// Tag membership rule: "exact", "suffix", "filename".
    pub tag_match: Option<String>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file used while the explorer owns the terminal.
    pub file: Option<String>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_bg: Option<String>,
    pub tree_fg: Option<String>,
    pub tree_selected_bg: Option<String>,
    pub tree_selected_fg: Option<String>,
    pub tree_dir_fg: Option<String>,
    pub tree_file_fg: Option<String>,
    pub highlight_exact_fg: Option<String>,
    pub highlight_ancestor_fg: Option<String>,
    pub content_bg: Option<String>,
    pub content_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub dialog_bg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub archive: ArchiveConfig,
    pub explorer: ExplorerConfig,
    pub logging: LoggingConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_MANIFEST_PATH: &str = "data/manifest.json";
pub const DEFAULT_TAGS_PATH: &str = "data/tags.json";
pub const DEFAULT_CURRENT_PATH: &str = "data/current_haiku.json";
pub const DEFAULT_STATUS_PATH: &str = "data/current_status.json";
/// Default fetch timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Default keystroke debounce in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 120;

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("HX_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".hx.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("haiku-explorer").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                mouse: other.general.mouse.or(self.general.mouse),
                use_icons: other.general.use_icons.or(self.general.use_icons),
            },
            archive: ArchiveConfig {
                root: other.archive.root.clone().or(self.archive.root),
                manifest: other.archive.manifest.clone().or(self.archive.manifest),
                tags: other.archive.tags.clone().or(self.archive.tags),
                current: other.archive.current.clone().or(self.archive.current),
                status: other.archive.status.clone().or(self.archive.status),
                timeout_ms: other.archive.timeout_ms.or(self.archive.timeout_ms),
            },
            explorer: ExplorerConfig {
                debounce_ms: other.explorer.debounce_ms.or(self.explorer.debounce_ms),
                open_depth: other.explorer.open_depth.or(self.explorer.open_depth),
                tag_match: other
                    .explorer
                    .tag_match
                    .clone()
                    .or(self.explorer.tag_match),
            },
            logging: LoggingConfig {
                file: other.logging.file.clone().or(self.logging.file),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so higher sources overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    /// Whether to use nerd font icons.
    pub fn use_icons(&self) -> bool {
        self.general.use_icons.unwrap_or(true)
    }

    pub fn root(&self) -> &str {
        self.archive.root.as_deref().unwrap_or(DEFAULT_ROOT)
    }

    /// Site-relative document locations.
    pub fn source_paths(&self) -> SourcePaths {
        let a = &self.archive;
        SourcePaths {
            manifest: a.manifest.as_deref().unwrap_or(DEFAULT_MANIFEST_PATH).to_string(),
            tags: a.tags.as_deref().unwrap_or(DEFAULT_TAGS_PATH).to_string(),
            current: a.current.as_deref().unwrap_or(DEFAULT_CURRENT_PATH).to_string(),
            status: a.status.as_deref().unwrap_or(DEFAULT_STATUS_PATH).to_string(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.archive.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.explorer.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    pub fn open_depth(&self) -> usize {
        self.explorer.open_depth.unwrap_or(DEFAULT_OPEN_DEPTH)
    }

    pub fn tag_match(&self) -> TagMatchRule {
        self.explorer
            .tag_match
            .as_deref()
            .map(TagMatchRule::from_name)
            .unwrap_or_default()
    }

    /// Explicit log file, if configured.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging.file.as_deref().map(PathBuf::from)
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
