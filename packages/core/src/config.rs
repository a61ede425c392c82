use eyescan_types::EyescanError;
use eyescan_vision::{ImageModelOptions, MIN_INPUT_SIZE};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const IMAGE_ARTIFACT_FILE: &str = "eye_disease_cnn.safetensors";
pub const TEXT_ARTIFACT_FILE: &str = "symptom_classifier.msgpack";

pub const MODELS_DIR_VAR: &str = "EYESCAN_MODELS_DIR";
pub const IMAGE_SIZE_VAR: &str = "EYESCAN_IMAGE_SIZE";
pub const FETCH_TIMEOUT_VAR: &str = "EYESCAN_FETCH_TIMEOUT_SECS";
pub const UNTRAINED_POLICY_VAR: &str = "EYESCAN_UNTRAINED_IMAGE_POLICY";
pub const MAX_IMAGE_BYTES_VAR: &str = "EYESCAN_MAX_IMAGE_BYTES";

pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// What the image pipeline does when only random weights are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UntrainedPolicy {
    /// Scoring fails with an inference error.
    #[default]
    Refuse,
    /// Scores are returned and every record is marked unreliable.
    Flag,
}

impl UntrainedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UntrainedPolicy::Refuse => "refuse",
            UntrainedPolicy::Flag => "flag",
        }
    }
}

impl std::fmt::Display for UntrainedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UntrainedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refuse" => Ok(UntrainedPolicy::Refuse),
            "flag" => Ok(UntrainedPolicy::Flag),
            other => Err(format!("expected `refuse` or `flag`, got `{other}`")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding both model artifacts
    pub models_dir: PathBuf,
    /// Side of the square image the network is built for
    pub image_size: u32,
    /// Upper bound on fetching an image reference (seconds)
    pub fetch_timeout_secs: u64,
    pub untrained_image_policy: UntrainedPolicy,
    /// Largest image body accepted from a fetch
    pub max_image_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            image_size: eyescan_vision::DEFAULT_INPUT_SIZE,
            fetch_timeout_secs: 30,
            untrained_image_policy: UntrainedPolicy::Refuse,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    ///
    /// Validation runs once on the parsed result, so a caller layering
    /// overrides over the environment should do it inside `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let config = Config {
            models_dir: lookup(MODELS_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.models_dir),
            image_size: parse(&lookup, IMAGE_SIZE_VAR)?.unwrap_or(defaults.image_size),
            fetch_timeout_secs: parse(&lookup, FETCH_TIMEOUT_VAR)?
                .unwrap_or(defaults.fetch_timeout_secs),
            untrained_image_policy: parse(&lookup, UNTRAINED_POLICY_VAR)?
                .unwrap_or(defaults.untrained_image_policy),
            max_image_bytes: parse(&lookup, MAX_IMAGE_BYTES_VAR)?
                .unwrap_or(defaults.max_image_bytes),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if (self.image_size as usize) < MIN_INPUT_SIZE {
            return Err(ConfigError::ImageSizeTooSmall(self.image_size));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(FETCH_TIMEOUT_VAR.to_string()));
        }
        if self.max_image_bytes == 0 {
            return Err(ConfigError::InvalidValue(MAX_IMAGE_BYTES_VAR.to_string()));
        }
        Ok(())
    }

    pub fn image_artifact_path(&self) -> PathBuf {
        self.models_dir.join(IMAGE_ARTIFACT_FILE)
    }

    pub fn text_artifact_path(&self) -> PathBuf {
        self.models_dir.join(TEXT_ARTIFACT_FILE)
    }

    pub fn image_options(&self) -> ImageModelOptions {
        ImageModelOptions {
            input_size: self.image_size,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
    ImageSizeTooSmall(u32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
            ConfigError::ImageSizeTooSmall(size) => write!(
                f,
                "Image size {} is below the minimum of {}",
                size, MIN_INPUT_SIZE
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for EyescanError {
    fn from(err: ConfigError) -> Self {
        EyescanError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.models_dir, PathBuf::from("models"));
        assert_eq!(config.image_size, 224);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.untrained_image_policy, UntrainedPolicy::Refuse);
        assert_eq!(config.max_image_bytes, 20 * 1024 * 1024);
        assert_eq!(
            config.text_artifact_path(),
            PathBuf::from("models").join("symptom_classifier.msgpack")
        );
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("EYESCAN_MODELS_DIR", "/tmp/eyescan"),
            ("EYESCAN_IMAGE_SIZE", "64"),
            ("EYESCAN_FETCH_TIMEOUT_SECS", "5"),
            ("EYESCAN_UNTRAINED_IMAGE_POLICY", "FLAG"),
            ("EYESCAN_MAX_IMAGE_BYTES", "4096"),
        ]))
        .unwrap();
        assert_eq!(
            config.image_artifact_path(),
            PathBuf::from("/tmp/eyescan/eye_disease_cnn.safetensors")
        );
        assert_eq!(config.image_options().input_size, 64);
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.untrained_image_policy, UntrainedPolicy::Flag);
        assert_eq!(config.max_image_bytes, 4096);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = Config::from_lookup(lookup(&[("EYESCAN_IMAGE_SIZE", "big")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for: EYESCAN_IMAGE_SIZE");

        let err = Config::from_lookup(lookup(&[("EYESCAN_UNTRAINED_IMAGE_POLICY", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("EYESCAN_UNTRAINED_IMAGE_POLICY"));
    }

    #[test]
    fn image_size_has_a_floor() {
        let err = Config::from_lookup(lookup(&[("EYESCAN_IMAGE_SIZE", "16")])).unwrap_err();
        assert!(matches!(err, ConfigError::ImageSizeTooSmall(16)));
        assert!(Config::from_lookup(lookup(&[("EYESCAN_IMAGE_SIZE", "22")])).is_ok());
    }

    #[test]
    fn zero_byte_cap_is_rejected() {
        let err = Config::from_lookup(lookup(&[("EYESCAN_MAX_IMAGE_BYTES", "0")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for: EYESCAN_MAX_IMAGE_BYTES");
    }
}
