use crate::Result;
use std::path::Path;

/// Whether a model's weights came from training or from a random bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Trained,
    Untrained,
}

/// A model that can be persisted to, and restored from, a single file.
///
/// Writers are not required to be atomic; the model store writes to a
/// sibling path and renames it into place.
pub trait Artifact: Sized + Send + Sync {
    /// Load-time options, e.g. an input geometry the file itself does not record.
    type Options;

    /// Short name used in logs.
    const KIND: &'static str;

    fn load(path: &Path, options: &Self::Options) -> Result<Self>;

    fn save(&self, path: &Path) -> Result<()>;
}
