//! Configuration file support for passport-photo.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/passport-photo/config.toml` (lowest priority)
//! - Project-local: `.passport-photo.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)
//!
//! Service credentials never come from these files; see
//! [`passport_photo_adapters::AzureCredentials`].

use std::path::{Path, PathBuf};

use passport_photo_adapters::azure::defaults::RETRY_LIMIT;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Rule thresholds.
    pub rules: RulesConfig,
    /// Gateway transport settings.
    pub gateway: GatewayConfig,
    /// Output formatting settings for `check`.
    pub output: OutputConfig,
}

/// HTTP server configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: Option<String>,
    /// Bind port.
    pub port: Option<u16>,
    /// Upload limit in megabytes.
    pub max_upload_mb: Option<u64>,
}

/// Rule threshold configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Minimum face area ÷ image area.
    pub min_face_area_ratio: Option<f64>,
    /// Maximum face-center offset ÷ image dimension.
    pub position_tolerance_ratio: Option<f64>,
    /// Minimum mean brightness.
    pub min_brightness: Option<f64>,
    /// Maximum mean brightness.
    pub max_brightness: Option<f64>,
    /// Maximum background standard deviation.
    pub max_background_stddev: Option<f64>,
    /// Maximum absolute yaw.
    pub max_yaw: Option<f64>,
    /// Maximum absolute roll.
    pub max_roll: Option<f64>,
}

/// Gateway transport configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Retries after the first attempt.
    pub max_retries: Option<u32>,
    /// Initial retry backoff in milliseconds.
    pub retry_backoff_ms: Option<u64>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

/// Clears `value` and records a warning when it fails `valid`.
fn check<T: Copy + std::fmt::Display>(
    value: &mut Option<T>,
    name: &str,
    expected: &str,
    valid: impl Fn(T) -> bool,
    warnings: &mut Vec<String>,
) {
    if let Some(v) = *value {
        if !valid(v) {
            warnings.push(format!("{name} must be {expected}, got {v}; using default"));
            *value = None;
        }
    }
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/passport-photo/config.toml`
    /// 2. Project-local: `.passport-photo.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are reported as
    /// warnings and fall back to their defaults.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        config.sanitize();

        config
    }

    /// Drops out-of-range values so their defaults apply, returning one
    /// warning per dropped value.
    #[rustfmt::skip]
    fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        let ratio = |v: f64| (0.0..=1.0).contains(&v);
        let level = |v: f64| (0.0..=255.0).contains(&v);
        let angle = |v: f64| (0.0..=180.0).contains(&v);

        let rules = &mut self.rules;
        let w = &mut warnings;
        check(&mut rules.min_face_area_ratio, "rules.min_face_area_ratio", "0.0-1.0", ratio, w);
        check(&mut rules.position_tolerance_ratio, "rules.position_tolerance_ratio", "0.0-1.0", ratio, w);
        check(&mut rules.min_brightness, "rules.min_brightness", "0-255", level, w);
        check(&mut rules.max_brightness, "rules.max_brightness", "0-255", level, w);
        check(&mut rules.max_background_stddev, "rules.max_background_stddev", "non-negative", |v| v >= 0.0, w);
        check(&mut rules.max_yaw, "rules.max_yaw", "0-180", angle, w);
        check(&mut rules.max_roll, "rules.max_roll", "0-180", angle, w);
        if let (Some(min), Some(max)) = (rules.min_brightness, rules.max_brightness) {
            if min > max {
                warnings.push(format!(
                    "rules.min_brightness ({min}) exceeds rules.max_brightness ({max}); using defaults"
                ));
                rules.min_brightness = None;
                rules.max_brightness = None;
            }
        }

        let positive = |v: u64| v > 0;
        let w = &mut warnings;
        check(&mut self.server.max_upload_mb, "server.max_upload_mb", "positive", positive, w);
        check(&mut self.gateway.timeout_secs, "gateway.timeout_secs", "positive", positive, w);
        check(&mut self.gateway.max_retries, "gateway.max_retries", "0-10", |v| v <= RETRY_LIMIT, w);

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                warnings.push(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'; using default"
                ));
                self.output.format = None;
            }
        }

        for w in &warnings {
            warn!("{w}");
        }
        warnings
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Server
        self.server.host = other.server.host.or_else(|| self.server.host.take());
        self.server.port = other.server.port.or(self.server.port);
        self.server.max_upload_mb = other.server.max_upload_mb.or(self.server.max_upload_mb);

        // Rules
        let (r, o) = (&mut self.rules, other.rules);
        r.min_face_area_ratio = o.min_face_area_ratio.or(r.min_face_area_ratio);
        r.position_tolerance_ratio = o.position_tolerance_ratio.or(r.position_tolerance_ratio);
        r.min_brightness = o.min_brightness.or(r.min_brightness);
        r.max_brightness = o.max_brightness.or(r.max_brightness);
        r.max_background_stddev = o.max_background_stddev.or(r.max_background_stddev);
        r.max_yaw = o.max_yaw.or(r.max_yaw);
        r.max_roll = o.max_roll.or(r.max_roll);

        // Gateway
        self.gateway.timeout_secs = other.gateway.timeout_secs.or(self.gateway.timeout_secs);
        self.gateway.max_retries = other.gateway.max_retries.or(self.gateway.max_retries);
        self.gateway.retry_backoff_ms = other
            .gateway
            .retry_backoff_ms
            .or(self.gateway.retry_backoff_ms);

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("passport-photo").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.passport-photo.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".passport-photo.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
