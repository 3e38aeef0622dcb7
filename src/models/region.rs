// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Placement region data structures.
//!
//! A region is a resolution-independent window on a slide where dynamic
//! content (camera, video or a frame transform) is composited at runtime.

use serde::{Deserialize, Serialize};

/// Content reference that selects the raw camera feed.
pub const CAMERA_CONTENT: &str = "camera";

/// File suffixes that mark a content reference as a video asset.
pub const VIDEO_SUFFIXES: [&str; 2] = ["mp4", "gif"];

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Decoded form of a region's `position` list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// `[x_frac, y_frac, scale]`: scale is a height fraction, width follows
    /// the content's aspect ratio.
    Scaled { x: f64, y: f64, scale: f64 },
    /// `[x_frac, y_frac, width_frac, height_frac]`: explicit box, content is
    /// stretched to fit.
    Boxed {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl Placement {
    /// Decode a raw position list. Any arity other than 3 or 4 yields `None`.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match *position {
            [x, y, scale] => Some(Placement::Scaled { x, y, scale }),
            [x, y, width, height] => Some(Placement::Boxed {
                x,
                y,
                width,
                height,
            }),
            _ => None,
        }
    }

    /// Whether every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.to_position().iter().all(|v| v.is_finite())
    }

    /// Normalized center of the placement window.
    pub fn center(&self) -> (f64, f64) {
        match *self {
            Placement::Scaled { x, y, .. } | Placement::Boxed { x, y, .. } => (x, y),
        }
    }

    pub fn to_position(&self) -> Vec<f64> {
        match *self {
            Placement::Scaled { x, y, scale } => vec![x, y, scale],
            Placement::Boxed {
                x,
                y,
                width,
                height,
            } => vec![x, y, width, height],
        }
    }
}

/// What feeds a region at runtime, as named by its content reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRef<'a> {
    Camera,
    /// File name under the deck's `videos/` folder.
    Video(&'a str),
    /// `module.function` identifier of a frame transform.
    Callback(&'a str),
}

/// A region as persisted in the deck descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Raw placement list, kept verbatim so unsupported arities survive a
    /// load/save cycle and are skipped only at composite time.
    pub position: Vec<f64>,
    /// Video file name or `module.function`; absent means the camera feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl Region {
    pub fn new(placement: Placement, function: impl Into<String>) -> Self {
        Self {
            position: placement.to_position(),
            function: Some(function.into()),
        }
    }

    pub fn placement(&self) -> Option<Placement> {
        Placement::from_position(&self.position)
    }

    /// Classify the content reference.
    pub fn content(&self) -> ContentRef<'_> {
        let Some(reference) = self.function.as_deref().map(str::trim) else {
            return ContentRef::Camera;
        };
        if reference.is_empty() || reference.eq_ignore_ascii_case(CAMERA_CONTENT) {
            return ContentRef::Camera;
        }
        let is_video = std::path::Path::new(reference)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| VIDEO_SUFFIXES.iter().any(|s| ext.eq_ignore_ascii_case(s)))
            .unwrap_or(false);
        if is_video {
            ContentRef::Video(reference)
        } else {
            ContentRef::Callback(reference)
        }
    }
}
