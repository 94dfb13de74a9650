//! Progress reporting port for UI integration.

use crate::domain::PhotoRecord;

/// Events emitted while a batch of photos is checked.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Analysis started for a photo.
    Started {
        /// Path to the photo.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total photos in batch, if known.
        total: Option<usize>,
    },
    /// Analysis completed for a photo.
    Completed {
        /// The finished record.
        record: Box<PhotoRecord>,
    },
    /// A photo was skipped because it could not be loaded or analysed.
    Skipped {
        /// Path to the photo.
        path: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All photos have been processed.
    Finished {
        /// Photos analysed.
        processed: usize,
        /// Photos skipped.
        skipped: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
