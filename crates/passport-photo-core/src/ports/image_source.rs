//! Image source port for the batch `check` command.

use crate::domain::PhotoImage;

/// Port for loading photos from a source.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over decoded photos from this source.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if a photo fails to load; the error
    /// names the offending path.
    fn images(&self) -> Box<dyn Iterator<Item = anyhow::Result<PhotoImage>> + Send + '_>;

    /// Returns the total number of photos, if known.
    fn count_hint(&self) -> Option<usize>;
}
