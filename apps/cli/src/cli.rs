use clap::{Parser, Subcommand};
use eyescan::config::{
    FETCH_TIMEOUT_VAR, IMAGE_SIZE_VAR, MAX_IMAGE_BYTES_VAR, MODELS_DIR_VAR, UNTRAINED_POLICY_VAR,
};
use eyescan::{Config, ConfigError, UntrainedPolicy};
use std::path::PathBuf;

/// Suggest eye conditions from a photo or a symptom description.
///
/// Every command prints one JSON document to stdout, including on failure.
#[derive(Parser, Debug)]
#[command(name = "eyescan", version)]
pub struct Cli {
    /// Directory holding the model artifacts [env: EYESCAN_MODELS_DIR]
    #[arg(long, global = true)]
    pub models_dir: Option<PathBuf>,

    /// Square input size of the image network [env: EYESCAN_IMAGE_SIZE]
    #[arg(long, global = true)]
    pub image_size: Option<u32>,

    /// Image fetch timeout in seconds [env: EYESCAN_FETCH_TIMEOUT_SECS]
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// `refuse` or `flag` when the image model is untrained [env: EYESCAN_UNTRAINED_IMAGE_POLICY]
    #[arg(long, global = true)]
    pub untrained_policy: Option<UntrainedPolicy>,

    /// Largest image body accepted, in bytes [env: EYESCAN_MAX_IMAGE_BYTES]
    #[arg(long, global = true)]
    pub max_image_bytes: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Classify the eye photo at URL
    Image { url: Option<String> },
    /// Classify a free-text symptom description
    Symptoms { text: Option<String> },
    /// Run both classifiers and combine their results
    Diagnose {
        url: Option<String>,
        text: Option<String>,
    },
}

impl Command {
    /// The subcommand named in raw arguments that failed to parse.
    /// Anything unrecognized is treated as a symptom request.
    pub fn guess(args: &[String]) -> Self {
        args.iter()
            .skip(1)
            .find_map(|arg| match arg.as_str() {
                "image" => Some(Command::Image { url: None }),
                "symptoms" => Some(Command::Symptoms { text: None }),
                "diagnose" => Some(Command::Diagnose {
                    url: None,
                    text: None,
                }),
                _ => None,
            })
            .unwrap_or(Command::Symptoms { text: None })
    }
}

impl Cli {
    /// Environment config with command-line overrides applied.
    pub fn config(&self) -> Result<Config, ConfigError> {
        self.config_over(|key| std::env::var(key).ok())
    }

    /// Flags replace environment values before anything is parsed, so a bad
    /// variable that a flag overrides never fails the run.
    fn config_over(&self, env: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| self.flag_value(key).or_else(|| env(key)))
    }

    fn flag_value(&self, key: &str) -> Option<String> {
        match key {
            MODELS_DIR_VAR => self
                .models_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
            IMAGE_SIZE_VAR => self.image_size.map(|size| size.to_string()),
            FETCH_TIMEOUT_VAR => self.timeout_secs.map(|secs| secs.to_string()),
            UNTRAINED_POLICY_VAR => self.untrained_policy.map(|policy| policy.to_string()),
            MAX_IMAGE_BYTES_VAR => self.max_image_bytes.map(|bytes| bytes.to_string()),
            _ => None,
        }
    }
}
