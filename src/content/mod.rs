// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Content sources feeding placement regions.
//!
//! Every region pulls one frame per render iteration from its source. The
//! camera frame of the current iteration is passed in, so camera-backed
//! and transform-backed regions all observe the same shared feed.

pub mod registry;
pub mod transform;

use crate::io::media::{Frame, FrameStream};
use anyhow::{bail, Result};
use registry::SharedTransform;

/// A video stream that holds its last good frame once reads stop
/// succeeding.
pub struct VideoSource {
    stream: Box<dyn FrameStream>,
    last_frame: Option<Frame>,
    label: String,
}

impl VideoSource {
    pub fn new(stream: Box<dyn FrameStream>, label: impl Into<String>) -> Self {
        Self {
            stream,
            last_frame: None,
            label: label.into(),
        }
    }

    /// Read the next frame, or repeat the last good one when the stream is
    /// exhausted or fails. `None` only before the first successful read.
    pub fn pull(&mut self) -> Option<Frame> {
        match self.stream.read_frame() {
            Ok(Some(frame)) => {
                self.last_frame = Some(frame.clone());
                Some(frame)
            }
            Ok(None) => self.last_frame.clone(),
            Err(e) => {
                log::debug!("Read from {} failed, holding last frame: {}", self.label, e);
                self.last_frame.clone()
            }
        }
    }

    /// Seek back to the first frame without reopening the stream.
    pub fn rewind(&mut self) {
        if let Err(e) = self.stream.rewind() {
            log::warn!("Failed to restart {}: {}", self.label, e);
        }
    }
}

/// Where a region's frames come from.
pub enum ContentSource {
    /// The shared, mirrored camera feed.
    Camera,
    Video(VideoSource),
    /// A transform applied to the shared camera frame.
    Callback {
        id: String,
        transform: SharedTransform,
    },
    /// A source that failed to load; renders nothing.
    Disabled,
}

impl ContentSource {
    /// Produce this iteration's frame for the region.
    ///
    /// `Ok(None)` means there is nothing to draw. Errors only come from
    /// transforms and are confined to the region that raised them.
    pub fn pull(&mut self, camera: &Frame) -> Result<Option<Frame>> {
        match self {
            ContentSource::Camera => Ok(Some(camera.clone())),
            ContentSource::Video(video) => Ok(video.pull()),
            ContentSource::Callback { id, transform } => {
                let frame = transform.apply(camera)?;
                if frame.dimensions() != camera.dimensions() {
                    bail!(
                        "transform '{}' returned a {}x{} frame for a {}x{} input",
                        id,
                        frame.width(),
                        frame.height(),
                        camera.width(),
                        camera.height()
                    );
                }
                Ok(Some(frame))
            }
            ContentSource::Disabled => Ok(None),
        }
    }

    /// Restart playback. Only videos react.
    pub fn rewind(&mut self) {
        if let ContentSource::Video(video) = self {
            video.rewind();
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, ContentSource::Video(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ContentSource::Camera => "camera",
            ContentSource::Video(_) => "video",
            ContentSource::Callback { .. } => "callback",
            ContentSource::Disabled => "disabled",
        }
    }
}
