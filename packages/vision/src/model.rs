//! Convolutional eye image classifier
//!
//! Three `conv3x3 → relu → maxpool2` blocks (32, 64, 128 channels), flatten,
//! dropout 0.5, a 512-unit hidden layer and a softmax head with one output
//! per declared label.

use candle_core::{Result, Tensor};
use candle_nn::{Conv2d, Conv2dConfig, Dropout, Linear, Module, VarBuilder, conv2d, linear};

pub const CHANNELS: [usize; 3] = [32, 64, 128];
pub const KERNEL_SIZE: usize = 3;
pub const HIDDEN_UNITS: usize = 512;
pub const DROPOUT_RATE: f32 = 0.5;

/// Smallest input side that survives three conv+pool blocks.
pub const MIN_INPUT_SIZE: usize = 22;

/// Length of the flattened feature map for a square input of side `input_size`.
pub fn flattened_len(input_size: usize) -> usize {
    let side = (0..CHANNELS.len()).fold(input_size, |side, _| {
        side.saturating_sub(KERNEL_SIZE - 1) / 2
    });
    CHANNELS[CHANNELS.len() - 1] * side * side
}

#[derive(Debug, Clone)]
pub struct EyeCnn {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    dropout: Dropout,
    fc1: Linear,
    fc2: Linear,
}

impl EyeCnn {
    pub fn new(vb: VarBuilder, input_size: usize, num_classes: usize) -> Result<Self> {
        if input_size < MIN_INPUT_SIZE {
            candle_core::bail!("input size {input_size} is below the minimum of {MIN_INPUT_SIZE}");
        }
        let conv_cfg = Conv2dConfig::default();
        let conv1 = conv2d(3, CHANNELS[0], KERNEL_SIZE, conv_cfg, vb.pp("conv1"))?;
        let conv2 = conv2d(CHANNELS[0], CHANNELS[1], KERNEL_SIZE, conv_cfg, vb.pp("conv2"))?;
        let conv3 = conv2d(CHANNELS[1], CHANNELS[2], KERNEL_SIZE, conv_cfg, vb.pp("conv3"))?;
        let fc1 = linear(flattened_len(input_size), HIDDEN_UNITS, vb.pp("fc1"))?;
        let fc2 = linear(HIDDEN_UNITS, num_classes, vb.pp("fc2"))?;
        Ok(Self {
            conv1,
            conv2,
            conv3,
            dropout: Dropout::new(DROPOUT_RATE),
            fc1,
            fc2,
        })
    }

    /// `xs` is `(batch, 3, H, W)`; returns `(batch, num_classes)` probabilities.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = self.conv1.forward(xs)?.relu()?.max_pool2d(2)?;
        let xs = self.conv2.forward(&xs)?.relu()?.max_pool2d(2)?;
        let xs = self.conv3.forward(&xs)?.relu()?.max_pool2d(2)?;
        let xs = xs.flatten_from(1)?;
        // inference only: dropout is the identity
        let xs = self.dropout.forward(&xs, false)?;
        let xs = self.fc1.forward(&xs)?.relu()?;
        let xs = self.fc2.forward(&xs)?;
        candle_nn::ops::softmax_last_dim(&xs)
    }
}
