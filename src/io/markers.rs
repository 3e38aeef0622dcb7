// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Fiducial marker detection.
//!
//! Only the corner geometry of each marker is reported; marker identities
//! play no part in deck building.

use crate::models::region::Point;
use anyhow::Result;
use image::GrayImage;

/// Corner polygon of one detected marker, in pixel coordinates.
pub type MarkerCorners = [Point; 4];

/// Finds markers in a grayscale image.
pub trait MarkerDetector {
    fn detect(&mut self, image: &GrayImage) -> Result<Vec<MarkerCorners>>;
}

#[cfg(feature = "video-opencv")]
mod opencv_impl {
    use super::*;
    use opencv::core::{Mat, Point2f, Scalar, Vector, CV_8UC1};
    use opencv::objdetect::{
        self, ArucoDetector, DetectorParameters, PredefinedDictionaryType, RefineParameters,
    };
    use opencv::prelude::*;

    /// AprilTag 36h11 detector from OpenCV's objdetect module.
    pub struct ArucoMarkerDetector {
        detector: ArucoDetector,
    }

    impl ArucoMarkerDetector {
        pub fn new() -> Result<Self> {
            let dictionary =
                objdetect::get_predefined_dictionary(PredefinedDictionaryType::DICT_APRILTAG_36h11)?;
            let parameters = DetectorParameters::default()?;
            let refine = RefineParameters::new(10.0, 3.0, true)?;
            Ok(Self {
                detector: ArucoDetector::new(&dictionary, &parameters, refine)?,
            })
        }
    }

    impl MarkerDetector for ArucoMarkerDetector {
        fn detect(&mut self, image: &GrayImage) -> Result<Vec<MarkerCorners>> {
            let mut mat = Mat::new_rows_cols_with_default(
                image.height() as i32,
                image.width() as i32,
                CV_8UC1,
                Scalar::all(0.0),
            )?;
            mat.data_bytes_mut()?.copy_from_slice(image.as_raw());

            let mut corners: Vector<Vector<Point2f>> = Vector::new();
            let mut ids: Vector<i32> = Vector::new();
            let mut rejected: Vector<Vector<Point2f>> = Vector::new();
            self.detector
                .detect_markers(&mat, &mut corners, &mut ids, &mut rejected)?;

            let mut markers = Vec::with_capacity(corners.len());
            for polygon in corners.iter() {
                if polygon.len() != 4 {
                    log::warn!("Skipping marker with {} corners", polygon.len());
                    continue;
                }
                let mut quad = [Point::new(0.0, 0.0); 4];
                for (slot, corner) in quad.iter_mut().zip(polygon.iter()) {
                    *slot = Point::new(f64::from(corner.x), f64::from(corner.y));
                }
                markers.push(quad);
            }
            Ok(markers)
        }
    }
}

#[cfg(feature = "video-opencv")]
pub use opencv_impl::ArucoMarkerDetector;

/// The marker detector this build was compiled with.
pub fn default_detector() -> Result<Box<dyn MarkerDetector>> {
    #[cfg(feature = "video-opencv")]
    {
        Ok(Box::new(ArucoMarkerDetector::new()?))
    }
    #[cfg(not(feature = "video-opencv"))]
    {
        anyhow::bail!("marker detection not enabled. Build with --features video-opencv")
    }
}
