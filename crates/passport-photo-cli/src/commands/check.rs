//! Check command - validate local photo files.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use passport_photo_adapters::{gateways, AzureCredentials, FsImageSource};
use passport_photo_core::{
    format_tags, ImageSource, PhotoAnalyser, PhotoImage, PhotoRecord, ProgressEvent,
    ProgressSink, ResultOutput,
};
use tracing::{debug, info, warn};

use super::{ExitCode, GatewayArgs, RuleArgs};
use crate::config::AppConfig;
use crate::output::{JsonOutput, OutputFormat, ProgressBar};

/// Arguments for `check`.
#[derive(Args, Clone, Debug, Default)]
pub struct CheckArgs {
    /// Files or directories to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub rules: RuleArgs,

    #[command(flatten)]
    pub gateway: GatewayArgs,
}

impl CheckArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Rule and gateway values are resolved later against the same config.
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }
        args
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Tally of one `check` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    /// Photos analysed.
    pub processed: usize,
    /// Photos that could not be loaded or analysed.
    pub skipped: usize,
    /// Analysed photos with a failing verdict.
    pub failed: usize,
}

impl CheckSummary {
    /// Skips outrank failures: a partial run is an error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        if self.skipped > 0 {
            ExitCode::Error
        } else if self.failed > 0 {
            ExitCode::ChecksFailed
        } else {
            ExitCode::Success
        }
    }
}

/// Run the check command.
///
/// Expects `args` to have been processed through `with_config()` first.
///
/// # Errors
///
/// Returns an error if credentials are missing, thresholds are inconsistent,
/// the HTTP client cannot be built or output cannot be written.
pub fn run(args: &CheckArgs, config: &AppConfig) -> Result<CheckSummary> {
    info!("Running check command on {} paths", args.paths.len());

    let thresholds = args.rules.thresholds(&config.rules)?;
    let settings = args.gateway.settings(&config.gateway);
    let credentials = AzureCredentials::from_env()?;
    let analyser = PhotoAnalyser::new(
        gateways(&credentials, settings).context("Failed to set up gateway clients")?,
        thresholds,
    );
    debug!(?thresholds, "Analyser ready");

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);
    let output = JsonOutput::stdout(args.format(), args.pretty);

    process_images(&source, &analyser, &output, &progress)
}

/// Analyses every photo from `source`, writing one record per analysed photo.
///
/// A photo that cannot be decoded or whose analysis fails is reported as
/// skipped and the batch continues.
///
/// # Errors
///
/// Returns an error only if writing output fails.
pub fn process_images(
    source: &dyn ImageSource,
    analyser: &PhotoAnalyser,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
) -> Result<CheckSummary> {
    let total = source.count_hint();
    let mut summary = CheckSummary {
        processed: 0,
        skipped: 0,
        failed: 0,
    };

    for (index, image_result) in source.images().enumerate() {
        let image = match image_result {
            Ok(img) => img,
            Err(e) => {
                // The error message names the path via anyhow context.
                progress.on_event(ProgressEvent::Skipped {
                    path: format!("image {index}"),
                    reason: format!("{e:#}"),
                });
                summary.skipped += 1;
                continue;
            }
        };

        let path = image.source().to_string();
        progress.on_event(ProgressEvent::Started {
            path: path.clone(),
            index,
            total,
        });

        let record = match analyse(analyser, &image) {
            Ok(record) => record,
            Err(e) => {
                warn!("Analysis failed for {path}: {e}");
                progress.on_event(ProgressEvent::Skipped {
                    path,
                    reason: e.to_string(),
                });
                summary.skipped += 1;
                continue;
            }
        };

        if !record.results.status {
            summary.failed += 1;
        }
        output.write(&record)?;
        progress.on_event(ProgressEvent::Completed {
            record: Box::new(record),
        });
        summary.processed += 1;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished {
        processed: summary.processed,
        skipped: summary.skipped,
    });
    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.failed,
        "Check finished"
    );

    Ok(summary)
}

fn analyse(
    analyser: &PhotoAnalyser,
    image: &PhotoImage,
) -> Result<PhotoRecord, passport_photo_core::AnalysisError> {
    let analysis = analyser.analyse(image)?;
    Ok(PhotoRecord {
        path: image.source().to_string(),
        timestamp: iso_timestamp(),
        dimensions: image.dimensions(),
        tags: format_tags(&analysis.tags),
        results: analysis.report,
        checks: analysis.checks,
    })
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use passport_photo_core::Thresholds;
    use passport_photo_test_support::{
        FaceBuilder, MockContentModerator, MockFaceDetector, MockGateways, MockImageSource,
        MockImageTagger, MockProgressSink, MockResultOutput, SyntheticImageBuilder,
    };

    use super::*;

    fn analyser(gateways: &MockGateways) -> PhotoAnalyser {
        PhotoAnalyser::new(gateways.gateways(), Thresholds::default())
    }

    #[test]
    fn test_passing_batch() {
        let gateways = MockGateways::with_face(FaceBuilder::passing().build());
        let source = MockImageSource::new(vec![
            SyntheticImageBuilder::passport_photo(),
            SyntheticImageBuilder::passport_photo(),
        ]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let summary = process_images(&source, &analyser(&gateways), &output, &progress).unwrap();

        assert_eq!(
            summary,
            CheckSummary {
                processed: 2,
                skipped: 0,
                failed: 0
            }
        );
        assert_eq!(summary.exit_code(), ExitCode::Success);
        let records = output.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].checks.len(), 11);
        assert_eq!(records[0].tags, vec!["Name: person, Confidence: 0.99"]);
        assert_eq!(output.flush_count(), 1);
        assert_eq!(progress.completed_count(), 2);
        assert_eq!(progress.finished_counts(), Some((2, 0)));
    }

    #[test]
    fn test_failing_photo_sets_exit_code() {
        let gateways = MockGateways::without_face();
        let source = MockImageSource::new(vec![SyntheticImageBuilder::passport_photo()]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let summary = process_images(&source, &analyser(&gateways), &output, &progress).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exit_code(), ExitCode::ChecksFailed);
        let records = output.records();
        assert!(!records[0].results.status);
        assert!(records[0].checks.is_empty());
        assert!(records[0].tags.is_empty());
    }

    #[test]
    fn test_unreadable_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_broken.jpg"), b"not a jpeg").unwrap();
        std::fs::write(
            dir.path().join("b_good.png"),
            SyntheticImageBuilder::png_bytes(100, 100, 150),
        )
        .unwrap();

        let gateways = MockGateways::with_face(FaceBuilder::passing().build());
        let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let summary = process_images(&source, &analyser(&gateways), &output, &progress).unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.exit_code(), ExitCode::Error);
        assert_eq!(progress.skipped_count(), 1);
        let skipped = progress.events().into_iter().find_map(|e| match e {
            ProgressEvent::Skipped { reason, .. } => Some(reason),
            _ => None,
        });
        assert!(skipped.unwrap().contains("a_broken.jpg"));
        assert!(output.records()[0].path.ends_with("b_good.png"));
    }

    #[test]
    fn test_gateway_failure_is_skipped_and_batch_continues() {
        let gateways = MockGateways::new(
            MockFaceDetector::failing(503),
            MockContentModerator::clean(),
            MockImageTagger::empty(),
        );
        let source = MockImageSource::new(vec![
            SyntheticImageBuilder::passport_photo(),
            SyntheticImageBuilder::passport_photo(),
        ]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let summary = process_images(&source, &analyser(&gateways), &output, &progress).unwrap();

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.processed, 0);
        assert!(output.records().is_empty());
        assert_eq!(gateways.faces.calls(), 2);
        assert_eq!(progress.finished_counts(), Some((0, 2)));
    }

    #[test]
    fn test_skips_outrank_failures() {
        let summary = CheckSummary {
            processed: 3,
            skipped: 1,
            failed: 2,
        };
        assert_eq!(summary.exit_code(), ExitCode::Error);
    }

    #[test]
    fn test_with_config_respects_cli() {
        let mut config = AppConfig::default();
        config.output.format = Some("json".to_string());
        config.output.pretty = Some(true);

        let args = CheckArgs::with_config(CheckArgs::default(), &config);
        assert_eq!(args.format(), OutputFormat::Json);
        assert!(args.pretty);

        let cli = CheckArgs {
            format: Some(OutputFormat::Jsonl),
            ..CheckArgs::default()
        };
        let args = CheckArgs::with_config(cli, &config);
        assert_eq!(args.format(), OutputFormat::Jsonl);
    }

    #[test]
    fn test_iso_timestamp_is_utc_rfc3339() {
        let ts = iso_timestamp();
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert!(ts.ends_with('Z'));
    }
}
