// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Conversions between pixel and normalized coordinates, derivation of
//! placement regions from marker polygons, and the clamped pixel windows
//! the compositor blits into.

use crate::models::region::{Placement, Point};

/// Half-pixel bias added to the summed y extents before halving.
pub const Y_CENTER_BIAS_PX: f64 = 1.0;

/// Padding added to the height fraction only. Markers sit next to the
/// content they annotate, not on top of it.
pub const HEIGHT_PADDING: f64 = 0.05;

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: u32, height: u32) -> Point {
    Point {
        x: pixel_x / width as f64,
        y: pixel_y / height as f64,
    }
}

/// Convert normalized coordinates to the nearest pixel coordinates.
pub fn denormalize_coordinates(point: &Point, width: u32, height: u32) -> (i64, i64) {
    (
        (point.x * width as f64).round() as i64,
        (point.y * height as f64).round() as i64,
    )
}

/// Derive a scaled placement from one marker's corner polygon.
///
/// The polygon is reduced to its axis-aligned bounding box; the center is
/// normalized against the image size and the scale is the larger of the
/// width fraction and the padded height fraction. Returns `None` for an
/// empty polygon or an empty image.
pub fn derive_placement(corners: &[Point], width: u32, height: u32) -> Option<Placement> {
    if corners.is_empty() || width == 0 || height == 0 {
        return None;
    }

    let (x_min, x_max, y_min, y_max) = corners.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(x_min, x_max, y_min, y_max), p| {
            (x_min.min(p.x), x_max.max(p.x), y_min.min(p.y), y_max.max(p.y))
        },
    );

    let center = normalize_coordinates(
        0.5 * (x_min + x_max),
        0.5 * (y_min + y_max + Y_CENTER_BIAS_PX),
        width,
        height,
    );
    let width_frac = (x_max - x_min) / width as f64;
    let height_frac = (y_max - y_min) / height as f64 + HEIGHT_PADDING;

    Some(Placement::Scaled {
        x: center.x,
        y: center.y,
        scale: width_frac.max(height_frac).max(0.0),
    })
}

/// A pixel-aligned window inside a raster, `[left, left + width) x
/// [top, top + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Center a `width x height` window on `(center_x, center_y)` and clamp it
/// to `[0, bounds_width) x [0, bounds_height)`.
///
/// Returns `None` when nothing of the window remains inside the bounds.
pub fn clamp_window(
    center_x: i64,
    center_y: i64,
    width: u32,
    height: u32,
    bounds_width: u32,
    bounds_height: u32,
) -> Option<PixelWindow> {
    let left = center_x.saturating_sub(i64::from(width / 2));
    let top = center_y.saturating_sub(i64::from(height / 2));
    let right = left
        .saturating_add(i64::from(width))
        .min(i64::from(bounds_width));
    let bottom = top
        .saturating_add(i64::from(height))
        .min(i64::from(bounds_height));
    let left = left.max(0);
    let top = top.max(0);

    if right <= left || bottom <= top {
        return None;
    }

    Some(PixelWindow {
        left: left as u32,
        top: top as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}
