use crate::acquire::{ImageFetcher, require_input};
use crate::config::Config;
use crate::diagnosis::Diagnosis;
use crate::pipeline::{ImagePipeline, Pipeline, TextPipeline};
use crate::store::ModelStore;
use eyescan_types::{EyescanError, Modality, RankedResult, Report, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Owns both pipelines for the lifetime of a process.
///
/// Each model is loaded (or bootstrapped) on first use and then shared
/// read-only; the image network is only built when an image is scored.
pub struct Classifiers {
    config: Config,
    store: ModelStore,
    fetcher: ImageFetcher,
    image: OnceCell<Arc<ImagePipeline>>,
    text: OnceCell<Arc<TextPipeline>>,
}

impl Classifiers {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let fetcher = ImageFetcher::new(config.fetch_timeout(), config.max_image_bytes)?;
        Ok(Self {
            config,
            store: ModelStore::new(),
            fetcher,
            image: OnceCell::new(),
            text: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn image_pipeline(&self) -> Result<Arc<ImagePipeline>> {
        self.image
            .get_or_try_init(|| {
                let config = self.config.clone();
                let store = self.store.clone();
                async move {
                    blocking(move || ImagePipeline::load(&config, &store))
                        .await
                        .map(Arc::new)
                }
            })
            .await
            .cloned()
    }

    pub async fn text_pipeline(&self) -> Result<Arc<TextPipeline>> {
        self.text
            .get_or_try_init(|| {
                let config = self.config.clone();
                let store = self.store.clone();
                async move {
                    blocking(move || TextPipeline::load(&config, &store))
                        .await
                        .map(Arc::new)
                }
            })
            .await
            .cloned()
    }

    /// Fetches and scores the image at `url`.
    pub async fn classify_image(&self, url: Option<&str>) -> Report {
        Report::from_outcome(Modality::Image, self.evaluate_image(url).await)
    }

    /// Scores a free-text symptom description.
    pub async fn classify_symptoms(&self, text: Option<&str>) -> Report {
        Report::from_outcome(Modality::Text, self.evaluate_symptoms(text).await)
    }

    /// Runs both pipelines concurrently and fuses their reports.
    pub async fn diagnose(&self, url: Option<&str>, text: Option<&str>) -> Diagnosis {
        let (image, text) = tokio::join!(self.classify_image(url), self.classify_symptoms(text));
        Diagnosis::new(image, text)
    }

    async fn evaluate_image(&self, url: Option<&str>) -> Result<(Vec<RankedResult>, bool)> {
        let url = require_input(url, "image URL")?;
        let bytes = self.fetcher.fetch(url).await?;
        let pipeline = self.image_pipeline().await?;
        blocking(move || pipeline.evaluate(&bytes)).await
    }

    async fn evaluate_symptoms(&self, text: Option<&str>) -> Result<(Vec<RankedResult>, bool)> {
        let text = require_input(text, "symptom text")?.to_string();
        let pipeline = self.text_pipeline().await?;
        blocking(move || pipeline.evaluate(&text)).await
    }
}

/// Runs CPU-bound model work off the async executor. A panic in `f`
/// surfaces as an inference error.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| EyescanError::Inference(format!("model task failed: {e}")))?
}
