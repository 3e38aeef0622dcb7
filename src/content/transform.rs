// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-region frame transforms.
//!
//! A transform takes the shared camera frame and returns a new frame of
//! the same size. Transforms come either from code (registered closures)
//! or from function modules: YAML files under `interactive_functions/`
//! that map entry-point names to chains of built-in operations.

use crate::io::media::Frame;
use anyhow::{Context, Result};
use image::imageops;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// File extension of function modules.
pub const MODULE_EXTENSION: &str = "yaml";

/// A frame-to-frame transform.
pub trait FrameTransform {
    fn apply(&self, frame: &Frame) -> Result<Frame>;
}

impl<F> FrameTransform for F
where
    F: Fn(&Frame) -> Result<Frame>,
{
    fn apply(&self, frame: &Frame) -> Result<Frame> {
        self(frame)
    }
}

/// One built-in operation of a function module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformStep {
    Identity,
    Invert,
    Grayscale,
    FlipHorizontal,
    FlipVertical,
    Rotate180,
    Blur { sigma: f32 },
    Brighten { value: i32 },
    Contrast { value: f32 },
    /// Binarize on luma: pixels at or above `level` turn white.
    Threshold { level: u8 },
}

impl TransformStep {
    fn run(&self, mut frame: Frame) -> Frame {
        match *self {
            TransformStep::Identity => frame,
            TransformStep::Invert => {
                imageops::invert(&mut frame);
                frame
            }
            TransformStep::Grayscale => {
                let luma = imageops::grayscale(&frame);
                image::DynamicImage::ImageLuma8(luma).to_rgb8()
            }
            TransformStep::FlipHorizontal => {
                imageops::flip_horizontal_in_place(&mut frame);
                frame
            }
            TransformStep::FlipVertical => {
                imageops::flip_vertical_in_place(&mut frame);
                frame
            }
            TransformStep::Rotate180 => {
                imageops::rotate180_in_place(&mut frame);
                frame
            }
            TransformStep::Blur { sigma } => imageops::blur(&frame, sigma),
            TransformStep::Brighten { value } => imageops::brighten(&frame, value),
            TransformStep::Contrast { value } => imageops::contrast(&frame, value),
            TransformStep::Threshold { level } => {
                let luma = imageops::grayscale(&frame);
                for (pixel, l) in frame.pixels_mut().zip(luma.pixels()) {
                    let v = if l.0[0] >= level { 255 } else { 0 };
                    pixel.0 = [v, v, v];
                }
                frame
            }
        }
    }
}

/// An ordered chain of built-in operations, applied left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct StepChain {
    steps: Vec<TransformStep>,
}

impl StepChain {
    pub fn new(steps: Vec<TransformStep>) -> Self {
        Self { steps }
    }
}

impl FrameTransform for StepChain {
    fn apply(&self, frame: &Frame) -> Result<Frame> {
        Ok(self
            .steps
            .iter()
            .fold(frame.clone(), |frame, step| step.run(frame)))
    }
}

/// A function module: entry-point name to operation chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionModule {
    pub functions: BTreeMap<String, Vec<TransformStep>>,
}

impl FunctionModule {
    /// The module the builder seeds every deck with.
    pub fn loopback() -> Self {
        let mut functions = BTreeMap::new();
        functions.insert("process_frame".to_string(), vec![TransformStep::Identity]);
        Self { functions }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&yaml).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn entry_point(&self, name: &str) -> Option<StepChain> {
        self.functions.get(name).cloned().map(StepChain::new)
    }
}
