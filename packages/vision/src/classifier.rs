use crate::candle_to_inference;
use crate::model::{EyeCnn, MIN_INPUT_SIZE};
use crate::preprocess::preprocess_image;
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use eyescan_types::{Artifact, ConditionLabel, EyescanError, LabelScores, Readiness, Result};
use ndarray::Array4;
use std::path::Path;

pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Geometry the network is built for. Weight files do not record it, so a
/// file saved for another size fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageModelOptions {
    pub input_size: u32,
}

impl Default for ImageModelOptions {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_INPUT_SIZE,
        }
    }
}

/// Scores eye images against every declared label.
///
/// A classifier is either restored from trained weights or built with random
/// weights; the latter reports [`Readiness::Untrained`] and its scores are
/// marked unreliable.
pub struct ImageClassifier {
    varmap: VarMap,
    model: EyeCnn,
    readiness: Readiness,
    input_size: u32,
    device: Device,
}

impl ImageClassifier {
    fn build(options: &ImageModelOptions) -> Result<(VarMap, EyeCnn)> {
        if (options.input_size as usize) < MIN_INPUT_SIZE {
            return Err(EyescanError::Config(format!(
                "image input size must be at least {MIN_INPUT_SIZE}, got {}",
                options.input_size
            )));
        }
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let model = EyeCnn::new(vb, options.input_size as usize, ConditionLabel::ALL.len())
            .map_err(|e| candle_to_inference("building image network", e))?;
        Ok((varmap, model))
    }

    /// A network with freshly initialized random weights.
    pub fn untrained(options: &ImageModelOptions) -> Result<Self> {
        let (varmap, model) = Self::build(options)?;
        tracing::warn!(
            input_size = options.input_size,
            "image model initialized with random weights; predictions are not meaningful"
        );
        Ok(Self {
            varmap,
            model,
            readiness: Readiness::Untrained,
            input_size: options.input_size,
            device: Device::Cpu,
        })
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Scores an encoded image.
    pub fn score(&self, bytes: &[u8]) -> Result<LabelScores> {
        let pixels = preprocess_image(bytes, self.input_size)?;
        self.score_pixels(&pixels)
    }

    /// Scores a preprocessed `(1, H, W, 3)` array.
    pub fn score_pixels(&self, pixels: &Array4<f32>) -> Result<LabelScores> {
        let side = self.input_size as usize;
        let (batch, height, width, channels) = pixels.dim();
        if (batch, height, width, channels) != (1, side, side, 3) {
            return Err(EyescanError::Inference(format!(
                "expected input of shape [1, {side}, {side}, 3], got {:?}",
                pixels.shape()
            )));
        }

        let data: Vec<f32> = pixels.iter().copied().collect();
        let probs = Tensor::from_vec(data, (batch, height, width, channels), &self.device)
            .and_then(|t| t.permute((0, 3, 1, 2)))
            .and_then(|t| t.contiguous())
            .and_then(|xs| self.model.forward(&xs))
            .and_then(|out| out.squeeze(0))
            .and_then(|out| out.to_vec1::<f32>())
            .map_err(|e| candle_to_inference("image forward pass", e))?;

        if probs.len() != ConditionLabel::ALL.len() {
            return Err(EyescanError::Inference(format!(
                "network produced {} outputs for {} labels",
                probs.len(),
                ConditionLabel::ALL.len()
            )));
        }

        let scores = ConditionLabel::ALL
            .into_iter()
            .zip(probs.into_iter().map(f64::from))
            .collect();
        Ok(match self.readiness {
            Readiness::Trained => LabelScores::new(scores),
            Readiness::Untrained => LabelScores::unreliable(scores),
        })
    }
}

impl Artifact for ImageClassifier {
    type Options = ImageModelOptions;

    const KIND: &'static str = "image-cnn";

    fn load(path: &Path, options: &ImageModelOptions) -> Result<Self> {
        if !path.exists() {
            return Err(EyescanError::ArtifactNotFound(path.to_path_buf()));
        }
        let (mut varmap, model) = Self::build(options)?;
        varmap
            .load(path)
            .map_err(|e| EyescanError::persistence(path, e))?;
        Ok(Self {
            varmap,
            model,
            readiness: Readiness::Trained,
            input_size: options.input_size,
            device: Device::Cpu,
        })
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.varmap
            .save(path)
            .map_err(|e| EyescanError::persistence(path, e))
    }
}
