//! Versioned on-disk envelope for text models
//!
//! The model is serialized to MessagePack, then wrapped with a format version
//! and a model-type tag. Readers reject any other version or tag instead of
//! decoding a payload built for a different feature space.

use eyescan_types::{EyescanError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const FORMAT_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u8,
    model_type: String,
    payload: Vec<u8>,
}

pub fn encode<T: Serialize>(path: &Path, model_type: &str, model: &T) -> Result<Vec<u8>> {
    let payload = rmp_serde::to_vec_named(model).map_err(|e| {
        EyescanError::persistence(path, format!("MessagePack serialization failed: {e}"))
    })?;
    let envelope = Envelope {
        version: FORMAT_VERSION,
        model_type: model_type.to_string(),
        payload,
    };
    rmp_serde::to_vec(&envelope)
        .map_err(|e| EyescanError::persistence(path, format!("envelope serialization failed: {e}")))
}

pub fn decode<T: DeserializeOwned>(path: &Path, model_type: &str, bytes: &[u8]) -> Result<T> {
    let envelope: Envelope = rmp_serde::from_slice(bytes)
        .map_err(|e| EyescanError::persistence(path, format!("unreadable envelope: {e}")))?;

    if envelope.version != FORMAT_VERSION {
        return Err(EyescanError::persistence(
            path,
            format!("unsupported format version {}", envelope.version),
        ));
    }
    if envelope.model_type != model_type {
        return Err(EyescanError::persistence(
            path,
            format!(
                "expected a `{model_type}` artifact, found `{}`",
                envelope.model_type
            ),
        ));
    }

    rmp_serde::from_slice(&envelope.payload)
        .map_err(|e| EyescanError::persistence(path, format!("MessagePack decoding failed: {e}")))
}

pub fn read<T: DeserializeOwned>(path: &Path, model_type: &str) -> Result<T> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(EyescanError::ArtifactNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(EyescanError::persistence(path, e)),
    };
    decode(path, model_type, &bytes)
}

pub fn write<T: Serialize>(path: &Path, model_type: &str, model: &T) -> Result<()> {
    let bytes = encode(path, model_type, model)?;
    std::fs::write(path, bytes).map_err(|e| EyescanError::persistence(path, e))
}
