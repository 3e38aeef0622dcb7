// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Blitting region content onto slide backgrounds.
//!
//! Placements are normalized, so they are mapped against the pixel size of
//! whatever background is being drawn on. Content is resized, clipped to
//! the background and copied over it; there is no blending.

use crate::io::media::Frame;
use crate::models::region::{Placement, Point};
use crate::util::geometry::{clamp_window, denormalize_coordinates, PixelWindow};
use image::imageops::{self, FilterType};

/// Resized content larger than this many backgrounds is not materialized;
/// only the part that survives clipping is resampled.
const MAX_RESIZE_BACKGROUNDS: u64 = 4;

/// Pixel size the content is resized to before clipping.
///
/// Scaled placements keep the content's aspect ratio with the height set
/// by the scale; boxed placements stretch to an explicit box. Returns
/// `None` when either side rounds to zero.
pub fn target_size(
    placement: &Placement,
    background: (u32, u32),
    content: (u32, u32),
) -> Option<(u32, u32)> {
    let (bg_width, bg_height) = (f64::from(background.0), f64::from(background.1));
    let (width, height) = match *placement {
        Placement::Scaled { scale, .. } => {
            if content.0 == 0 || content.1 == 0 {
                return None;
            }
            let aspect_ratio = f64::from(content.0) / f64::from(content.1);
            let new_height = (bg_height * scale).round();
            (new_height * aspect_ratio, new_height)
        }
        Placement::Boxed { width, height, .. } => (width * bg_width, height * bg_height),
    };
    let (width, height) = (width.round(), height.round());
    if !(width >= 1.0 && height >= 1.0) {
        return None;
    }
    Some((width as u32, height as u32))
}

/// Pixel window a placement of the given content size occupies, clipped to
/// the background.
pub fn placement_window(
    placement: &Placement,
    background: (u32, u32),
    size: (u32, u32),
) -> Option<PixelWindow> {
    let (x, y) = placement.center();
    let (center_x, center_y) =
        denormalize_coordinates(&Point::new(x, y), background.0, background.1);
    clamp_window(center_x, center_y, size.0, size.1, background.0, background.1)
}

/// Composites region content onto a background.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    filter: FilterType,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl Compositor {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Resize `content` for `placement` and copy it into `background`.
    ///
    /// Returns the window written to, or `None` when the region collapsed
    /// to nothing and the background was left untouched. Clipped windows
    /// take the top-left part of the resized content.
    pub fn blit(
        &self,
        background: &mut Frame,
        placement: &Placement,
        content: &Frame,
    ) -> Option<PixelWindow> {
        let bounds = background.dimensions();
        let (width, height) = target_size(placement, bounds, content.dimensions())?;
        let window = placement_window(placement, bounds, (width, height))?;

        let area = u64::from(width) * u64::from(height);
        let limit =
            (u64::from(bounds.0) * u64::from(bounds.1)).saturating_mul(MAX_RESIZE_BACKGROUNDS);
        let cropped = if area > limit {
            self.resize_visible(content, (width, height), &window)
        } else {
            let resized = if content.dimensions() == (width, height) {
                content.clone()
            } else {
                imageops::resize(content, width, height, self.filter)
            };
            imageops::crop_imm(&resized, 0, 0, window.width, window.height).to_image()
        };
        imageops::replace(
            background,
            &cropped,
            i64::from(window.left),
            i64::from(window.top),
        );
        Some(window)
    }

    /// Resample only the top-left part of `content` that lands inside
    /// `window` once scaled to `size`.
    fn resize_visible(&self, content: &Frame, size: (u32, u32), window: &PixelWindow) -> Frame {
        let (src_width, src_height) = content.dimensions();
        let visible = |src: u32, shown: u32, full: u32| {
            let part = (f64::from(src) * f64::from(shown) / f64::from(full)).ceil();
            (part as u32).clamp(1, src)
        };
        let part = imageops::crop_imm(
            content,
            0,
            0,
            visible(src_width, window.width, size.0),
            visible(src_height, window.height, size.1),
        )
        .to_image();
        imageops::resize(&part, window.width, window.height, self.filter)
    }
}
