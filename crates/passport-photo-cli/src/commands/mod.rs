//! CLI command definitions and handlers.

pub mod check;
pub mod serve;

use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use passport_photo_adapters::azure::defaults as gateway_defaults;
use passport_photo_adapters::ClientSettings;
use passport_photo_core::Thresholds;

use crate::config::{GatewayConfig, RulesConfig};

/// Passport photo validation service and checker
#[derive(Parser)]
#[command(name = "passport-photo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server arguments used when no subcommand is given.
    #[command(flatten)]
    pub serve: serve::ServeArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP upload endpoint (default)
    Serve(serve::ServeArgs),
    /// Check local photo files and print the results as JSON
    Check(check::CheckArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every photo passed.
    Success = 0,
    /// At least one photo failed a check.
    ChecksFailed = 1,
    /// Usage, configuration, gateway or I/O error.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Builds a clap value parser for an `f64` within `range`.
fn bounded(
    range: std::ops::RangeInclusive<f64>,
) -> impl Fn(&str) -> Result<f64, String> + Clone + Send + Sync + 'static {
    move |s: &str| {
        let value: f64 = s
            .parse()
            .map_err(|_| format!("'{s}' is not a valid number"))?;
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(format!(
                "{value} is not in {}..={}",
                range.start(),
                range.end()
            ))
        }
    }
}

/// Parse a fraction (0.0-1.0).
fn parse_ratio(s: &str) -> Result<f64, String> {
    bounded(0.0..=1.0)(s)
}

/// Parse a grayscale level (0-255).
fn parse_level(s: &str) -> Result<f64, String> {
    bounded(0.0..=255.0)(s)
}

/// Parse an angle in degrees (0-180).
fn parse_angle(s: &str) -> Result<f64, String> {
    bounded(0.0..=180.0)(s)
}

/// Parse a non-negative standard deviation.
fn parse_stddev(s: &str) -> Result<f64, String> {
    bounded(0.0..=f64::MAX)(s)
}

/// Parse a strictly positive integer.
fn parse_positive(s: &str) -> Result<u64, String> {
    match s.parse::<u64>() {
        Ok(0) => Err("must be greater than 0".to_string()),
        Ok(v) => Ok(v),
        Err(_) => Err(format!("'{s}' is not a valid positive integer")),
    }
}

/// Rule threshold flags shared by `serve` and `check`.
#[derive(Args, Clone, Debug, Default)]
pub struct RuleArgs {
    /// Minimum face area as a fraction of the image (0.0-1.0)
    #[arg(long, value_parser = parse_ratio)]
    pub min_face_area_ratio: Option<f64>,

    /// Maximum face-center offset as a fraction of the image (0.0-1.0)
    #[arg(long, value_parser = parse_ratio)]
    pub position_tolerance_ratio: Option<f64>,

    /// Minimum mean brightness (0-255)
    #[arg(long, value_parser = parse_level)]
    pub min_brightness: Option<f64>,

    /// Maximum mean brightness (0-255)
    #[arg(long, value_parser = parse_level)]
    pub max_brightness: Option<f64>,

    /// Maximum background standard deviation
    #[arg(long, value_parser = parse_stddev)]
    pub max_background_stddev: Option<f64>,

    /// Maximum absolute head yaw in degrees (0-180)
    #[arg(long, value_parser = parse_angle)]
    pub max_yaw: Option<f64>,

    /// Maximum absolute head roll in degrees (0-180)
    #[arg(long, value_parser = parse_angle)]
    pub max_roll: Option<f64>,
}

impl RuleArgs {
    /// Resolves thresholds: CLI flag, then config value, then default.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved brightness range is inverted.
    pub fn thresholds(&self, config: &RulesConfig) -> Result<Thresholds> {
        let d = Thresholds::default();
        let t = Thresholds {
            min_face_area_ratio: self
                .min_face_area_ratio
                .or(config.min_face_area_ratio)
                .unwrap_or(d.min_face_area_ratio),
            position_tolerance_ratio: self
                .position_tolerance_ratio
                .or(config.position_tolerance_ratio)
                .unwrap_or(d.position_tolerance_ratio),
            min_brightness: self
                .min_brightness
                .or(config.min_brightness)
                .unwrap_or(d.min_brightness),
            max_brightness: self
                .max_brightness
                .or(config.max_brightness)
                .unwrap_or(d.max_brightness),
            max_background_stddev: self
                .max_background_stddev
                .or(config.max_background_stddev)
                .unwrap_or(d.max_background_stddev),
            max_yaw: self.max_yaw.or(config.max_yaw).unwrap_or(d.max_yaw),
            max_roll: self.max_roll.or(config.max_roll).unwrap_or(d.max_roll),
        };

        if t.min_brightness > t.max_brightness {
            bail!(
                "minimum brightness {} exceeds maximum brightness {}",
                t.min_brightness,
                t.max_brightness
            );
        }
        Ok(t)
    }
}

/// Gateway transport flags shared by `serve` and `check`.
#[derive(Args, Clone, Debug, Default)]
pub struct GatewayArgs {
    /// Per-request timeout for the perception services, in seconds
    #[arg(long, value_parser = parse_positive)]
    pub timeout_secs: Option<u64>,

    /// Retries after a transient gateway failure
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(gateway_defaults::RETRY_LIMIT)))]
    pub max_retries: Option<u32>,
}

impl GatewayArgs {
    /// Resolves transport settings: CLI flag, then config value, then default.
    #[must_use]
    pub fn settings(&self, config: &GatewayConfig) -> ClientSettings {
        ClientSettings {
            timeout: self
                .timeout_secs
                .or(config.timeout_secs)
                .map_or(gateway_defaults::TIMEOUT, Duration::from_secs),
            max_retries: self
                .max_retries
                .or(config.max_retries)
                .unwrap_or(gateway_defaults::MAX_RETRIES),
            retry_backoff: config
                .retry_backoff_ms
                .map_or(gateway_defaults::RETRY_BACKOFF, Duration::from_millis),
        }
    }
}
