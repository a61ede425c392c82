//! Loading, saving and bootstrapping of model artifacts
//!
//! Saves go to a sibling temporary file that is renamed into place, so a
//! reader never observes a half-written artifact. Bootstrapping is
//! serialized per artifact path: concurrent callers for the same path wait
//! for the first one and then load what it persisted.

use dashmap::DashMap;
use eyescan_types::{Artifact, EyescanError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Where a loaded artifact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Persisted,
    Bootstrapped,
}

#[derive(Debug)]
pub struct Loaded<A> {
    pub artifact: A,
    pub origin: Origin,
}

/// A freshly built artifact and whether it is worth writing to disk.
pub struct Bootstrapped<A> {
    pub artifact: A,
    pub persist: bool,
}

#[derive(Clone, Default)]
pub struct ModelStore {
    gates: Arc<DashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<A: Artifact>(&self, path: &Path, options: &A::Options) -> Result<A> {
        let artifact = A::load(path, options)?;
        tracing::info!(kind = A::KIND, path = %path.display(), "loaded model artifact");
        Ok(artifact)
    }

    pub fn save<A: Artifact>(&self, path: &Path, artifact: &A) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| EyescanError::persistence(parent, e))?;
        }

        let tmp = temp_sibling(path);
        if let Err(e) = artifact.save(&tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(EyescanError::persistence(path, e));
        }

        tracing::info!(kind = A::KIND, path = %path.display(), "saved model artifact");
        Ok(())
    }

    /// Loads the artifact at `path`, or builds one with `bootstrap` when the
    /// file is missing or unreadable.
    ///
    /// A failed save after bootstrapping is logged and the fresh artifact is
    /// still returned.
    pub fn load_or_bootstrap<A, F>(
        &self,
        path: &Path,
        options: &A::Options,
        bootstrap: F,
    ) -> Result<Loaded<A>>
    where
        A: Artifact,
        F: FnOnce() -> Result<Bootstrapped<A>>,
    {
        let gate = self.gate(path);
        let _guard = gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        match self.load::<A>(path, options) {
            Ok(artifact) => {
                return Ok(Loaded {
                    artifact,
                    origin: Origin::Persisted,
                });
            }
            Err(e) if e.is_persistence() => {
                tracing::warn!(kind = A::KIND, path = %path.display(), error = %e, "bootstrapping model");
            }
            Err(e) => return Err(e),
        }

        let Bootstrapped { artifact, persist } = bootstrap()?;
        if persist {
            if let Err(e) = self.save(path, &artifact) {
                tracing::warn!(kind = A::KIND, error = %e, "could not persist bootstrapped model");
            }
        }

        Ok(Loaded {
            artifact,
            origin: Origin::Bootstrapped,
        })
    }

    fn gate(&self, path: &Path) -> Arc<Mutex<()>> {
        self.gates.entry(path.to_path_buf()).or_default().clone()
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
